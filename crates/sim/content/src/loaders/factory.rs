//! Content factory for building simulations from scenario files.

use std::path::{Path, PathBuf};

use sim_core::{Frame, SimConfig, SimError, Simulation, StatusKey};

use crate::config::ContentConfig;
use crate::loaders::{ConfigFile, ConfigLoader, LoadResult, RosterLoader, RosterSpec, RotationLoader};
use crate::rotation::{RotationError, RotationStep, RunReport, run_rotation};

/// Everything needed to run a rotation, as plain data.
///
/// A scenario owns no engine state, so it can be cloned and handed to
/// independent workers that each build their own [`Simulation`].
#[derive(Clone, Debug, PartialEq)]
pub struct Scenario {
    pub sim: SimConfig,
    pub content: ContentConfig,
    pub roster: RosterSpec,
    pub rotation: Vec<RotationStep>,
}

impl Scenario {
    pub fn new(config: ConfigFile, roster: RosterSpec, rotation: Vec<RotationStep>) -> Self {
        Self {
            sim: config.sim,
            content: config.content,
            roster,
            rotation,
        }
    }

    /// Fresh simulation with every party member and target in place.
    pub fn build(&self) -> Result<Simulation, SimError> {
        let mut sim = Simulation::new(self.sim.clone());
        for spec in &self.roster.characters {
            let index = sim.add_character(spec.profile.clone(), spec.kit.build(&self.content))?;
            for status in &spec.statuses {
                sim.engine_mut()
                    .add_status_for(StatusKey::on(index, status.name.as_str()), status.duration());
            }
        }
        for target in &self.roster.targets {
            sim.add_target(target.to_target());
        }
        Ok(sim)
    }

    /// Builds a simulation and plays the rotation through `until`.
    pub fn run(&self, until: Frame) -> Result<RunReport, RotationError> {
        let mut sim = self.build().map_err(RotationError::Setup)?;
        run_rotation(&mut sim, &self.rotation, until)
    }
}

/// Content factory that loads a scenario from its files.
///
/// # Files
///
/// ```text
/// roster.ron     party members and targets
/// rotation.ron   ordered action steps
/// sim.toml       optional; [sim] and [content] tables
/// ```
pub struct ContentFactory {
    roster: PathBuf,
    rotation: PathBuf,
    config: Option<PathBuf>,
}

impl ContentFactory {
    pub fn new(roster: impl Into<PathBuf>, rotation: impl Into<PathBuf>) -> Self {
        Self {
            roster: roster.into(),
            rotation: rotation.into(),
            config: None,
        }
    }

    #[must_use]
    pub fn with_config(mut self, config: impl Into<PathBuf>) -> Self {
        self.config = Some(config.into());
        self
    }

    /// Load configuration, or defaults when no config file was given.
    pub fn load_config(&self) -> LoadResult<ConfigFile> {
        match &self.config {
            Some(path) => ConfigLoader::load(path),
            None => Ok(ConfigFile::default()),
        }
    }

    pub fn load_roster(&self) -> LoadResult<RosterSpec> {
        RosterLoader::load(&self.roster)
    }

    pub fn load_rotation(&self) -> LoadResult<Vec<RotationStep>> {
        RotationLoader::load(&self.rotation)
    }

    /// Load all three files and check that every step names a roster member.
    pub fn load_scenario(&self) -> LoadResult<Scenario> {
        let config = self.load_config()?;
        let roster = self.load_roster()?;
        let rotation = self.load_rotation()?;

        for (i, step) in rotation.iter().enumerate() {
            let known = roster
                .characters
                .iter()
                .any(|spec| spec.profile.name.eq_ignore_ascii_case(&step.actor));
            if !known {
                anyhow::bail!(
                    "{}: step {} names `{}`, who is not in the roster",
                    self.rotation.display(),
                    i,
                    step.actor
                );
            }
        }
        tracing::debug!(
            characters = roster.characters.len(),
            targets = roster.targets.len(),
            steps = rotation.len(),
            "scenario loaded"
        );
        Ok(Scenario::new(config, roster, rotation))
    }

    pub fn roster_path(&self) -> &Path {
        &self.roster
    }

    pub fn rotation_path(&self) -> &Path {
        &self.rotation
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_factory_paths() {
        let factory = ContentFactory::new("/tmp/roster.ron", "/tmp/rotation.ron");
        assert_eq!(factory.roster_path(), Path::new("/tmp/roster.ron"));
        assert_eq!(factory.rotation_path(), Path::new("/tmp/rotation.ron"));
        assert_eq!(factory.load_config().unwrap(), ConfigFile::default());
    }
}
