//! Roster loader: party members and targets.

use std::path::Path;

use serde::{Deserialize, Serialize};
use sim_core::{CharacterProfile, Duration, Point, Target, TargetKey};

use crate::characters::KitKind;
use crate::loaders::{LoadResult, read_file};

/// One party member: which kit drives it and its stats.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CharacterSpec {
    pub kit: KitKind,
    pub profile: CharacterProfile,
    /// Statuses the character starts the run with.
    #[serde(default)]
    pub statuses: Vec<StatusSpec>,
}

/// A status on a party member at frame 0, e.g. `(name: "xilonen-nightsoul",
/// frames: Some(540))`. No `frames` keeps it up for the whole run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StatusSpec {
    pub name: String,
    #[serde(default)]
    pub frames: Option<u64>,
}

impl StatusSpec {
    pub fn duration(&self) -> Duration {
        self.frames.map_or(Duration::Permanent, Duration::Frames)
    }
}

/// Enemy placement. Unset fields take the [`Target::new`] defaults.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TargetSpec {
    pub key: u32,
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub radius: Option<f64>,
    #[serde(default)]
    pub level: Option<u32>,
    #[serde(default)]
    pub weak_point: Option<bool>,
    #[serde(default)]
    pub resistance: Option<f64>,
}

impl TargetSpec {
    pub fn to_target(&self) -> Target {
        let mut target = Target::new(TargetKey(self.key), Point::new(self.x, self.y));
        if let Some(radius) = self.radius {
            target.radius = radius;
        }
        if let Some(level) = self.level {
            target.level = level;
        }
        if let Some(weak_point) = self.weak_point {
            target.weak_point = weak_point;
        }
        if let Some(resistance) = self.resistance {
            target.base_resistance = resistance;
        }
        target
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RosterSpec {
    pub characters: Vec<CharacterSpec>,
    pub targets: Vec<TargetSpec>,
}

/// Loader for rosters from RON files.
pub struct RosterLoader;

impl RosterLoader {
    /// Load a roster from a RON file.
    ///
    /// RON format: `(characters: [CharacterSpec], targets: [TargetSpec])`
    pub fn load(path: &Path) -> LoadResult<RosterSpec> {
        let content = read_file(path)?;
        Self::parse(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse roster RON at {}: {}", path.display(), e))
    }

    pub fn parse(content: &str) -> LoadResult<RosterSpec> {
        let roster: RosterSpec = ron::from_str(content)?;
        Self::validate(&roster)?;
        Ok(roster)
    }

    fn validate(roster: &RosterSpec) -> LoadResult<()> {
        if roster.characters.is_empty() {
            anyhow::bail!("roster has no characters");
        }
        if roster.characters.len() > sim_core::SimConfig::MAX_PARTY {
            anyhow::bail!(
                "roster has {} characters, a party holds at most {}",
                roster.characters.len(),
                sim_core::SimConfig::MAX_PARTY
            );
        }
        for (i, spec) in roster.characters.iter().enumerate() {
            let clash = roster.characters[..i]
                .iter()
                .any(|other| other.profile.name.eq_ignore_ascii_case(&spec.profile.name));
            if clash {
                anyhow::bail!("duplicate character name `{}`", spec.profile.name);
            }
            if spec.statuses.iter().any(|status| status.name.is_empty()) {
                anyhow::bail!("{} has a status with an empty name", spec.profile.name);
            }
        }
        if roster.targets.is_empty() {
            tracing::warn!("roster has no targets; every attack will miss");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ROSTER: &str = r#"
        (
            characters: [
                (
                    kit: rosaria,
                    profile: (
                        name: "Rosaria",
                        level: 90,
                        element: cryo,
                        base: (hp: 12289.0, atk: 240.0, def: 710.0),
                        stats: { crit_rate: 0.6 },
                        energy_max: 60.0,
                    ),
                ),
            ],
            targets: [(key: 1, x: 0.0, y: 2.0, resistance: Some(0.2))],
        )
    "#;

    #[test]
    fn parses_profiles_and_targets() {
        let roster = RosterLoader::parse(ROSTER).unwrap();
        assert_eq!(roster.characters[0].kit, KitKind::Rosaria);
        assert_eq!(roster.characters[0].profile.talents.burst, 9);

        let target = roster.targets[0].to_target();
        assert_eq!(target.key, TargetKey(1));
        assert_eq!(target.base_resistance, 0.2);
        assert_eq!(target.radius, 1.0);
    }

    #[test]
    fn statuses_default_to_none() {
        let roster = RosterLoader::parse(ROSTER).unwrap();
        assert!(roster.characters[0].statuses.is_empty());

        let blessed = ROSTER.replace(
            "energy_max: 60.0,\n                    ),",
            r#"energy_max: 60.0,
                    ),
                    statuses: [(name: "blessing", frames: Some(300)), (name: "aura")],"#,
        );
        let statuses = &RosterLoader::parse(&blessed).unwrap().characters[0].statuses;
        assert_eq!(statuses.len(), 2);
        assert_eq!(statuses[0].duration(), Duration::Frames(300));
        assert_eq!(statuses[1].duration(), Duration::Permanent);
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let doubled = ROSTER.replace(
            "characters: [",
            r#"characters: [
                (kit: sethos, profile: (name: "rosaria", level: 90, element: electro,
                    base: (hp: 1.0, atk: 1.0, def: 1.0), energy_max: 60.0)),"#,
        );
        let err = RosterLoader::parse(&doubled).unwrap_err();
        assert!(err.to_string().contains("duplicate"));
    }
}
