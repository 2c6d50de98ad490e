//! Rotation driver.
//!
//! A rotation is an ordered list of steps. Each step waits for the earliest
//! frame its action is legal (animation cancel and cooldown), swapping the
//! actor in first if needed, then invokes it.
//!
//! A step refused with a recoverable error (say, a burst without full
//! energy) is skipped and listed in the report. Any other error ends the
//! run.

use std::collections::BTreeMap;

use sim_core::{ActionKind, CharIndex, EngineError, Frame, Params, SimError, Simulation};

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RotationStep {
    /// Character name as given in the roster.
    pub actor: String,
    pub action: ActionKind,
    #[cfg_attr(feature = "serde", serde(default))]
    pub params: Params,
}

impl RotationStep {
    pub fn new(actor: impl Into<String>, action: ActionKind) -> Self {
        Self {
            actor: actor.into(),
            action,
            params: Params::new(),
        }
    }

    #[must_use]
    pub fn with_params(mut self, params: Params) -> Self {
        self.params = params;
        self
    }
}

#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum RotationError {
    #[error("could not assemble the party: {0}")]
    Setup(#[source] SimError),

    #[error("step {step}: no party member named `{name}`")]
    UnknownActor { step: usize, name: String },

    #[error("step {step} ({action} by {actor}) failed at {frame}: {source}")]
    Step {
        step: usize,
        actor: String,
        action: ActionKind,
        frame: Frame,
        #[source]
        source: SimError,
    },

    #[error("run failed after the last step: {0}")]
    Drain(#[source] SimError),
}

/// A step the driver passed over.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct SkippedStep {
    pub step: usize,
    pub actor: String,
    pub action: ActionKind,
    pub frame: Frame,
    pub code: &'static str,
    pub reason: String,
}

/// Outcome of one rotation run.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct RunReport {
    pub end_frame: Frame,
    pub hits: usize,
    pub total_damage: f64,
    pub damage_by_label: BTreeMap<String, f64>,
    /// Hex SHA-256 of the damage trace.
    pub digest: String,
    pub skipped: Vec<SkippedStep>,
}

impl RunReport {
    /// Damage per second over the run.
    pub fn dps(&self, frames_per_second: u32) -> f64 {
        if self.end_frame.0 == 0 {
            return 0.0;
        }
        self.total_damage * f64::from(frames_per_second) / self.end_frame.0 as f64
    }
}

fn resolve_actor(sim: &Simulation, step: usize, name: &str) -> Result<CharIndex, RotationError> {
    sim.engine()
        .party()
        .iter()
        .position(|member| member.profile.name.eq_ignore_ascii_case(name))
        .map(CharIndex)
        .ok_or_else(|| RotationError::UnknownActor {
            step,
            name: name.to_string(),
        })
}

/// Plays `steps` in order, then keeps the clock running until `until` so
/// queued hits and lingering fields resolve.
pub fn run_rotation(sim: &mut Simulation, steps: &[RotationStep], until: Frame) -> Result<RunReport, RotationError> {
    let mut skipped = Vec::new();
    for (index, step) in steps.iter().enumerate() {
        let actor = resolve_actor(sim, index, &step.actor)?;
        if let Err(err) = play_step(sim, actor, step) {
            let frame = sim.engine().now();
            if !err.severity().is_recoverable() {
                tracing::error!(
                    step = index,
                    actor = %step.actor,
                    action = %step.action,
                    code = err.error_code(),
                    "rotation step rejected"
                );
                return Err(RotationError::Step {
                    step: index,
                    actor: step.actor.clone(),
                    action: step.action,
                    frame,
                    source: err,
                });
            }
            tracing::warn!(
                step = index,
                actor = %step.actor,
                action = %step.action,
                code = err.error_code(),
                "rotation step skipped: {err}"
            );
            skipped.push(SkippedStep {
                step: index,
                actor: step.actor.clone(),
                action: step.action,
                frame,
                code: err.error_code(),
                reason: err.to_string(),
            });
        }
    }

    sim.run_until(until).map_err(RotationError::Drain)?;

    let log = sim.engine().damage_log();
    Ok(RunReport {
        end_frame: sim.engine().now(),
        hits: log.len(),
        total_damage: log.total(),
        damage_by_label: log.totals_by_label(),
        digest: log.digest_hex(),
        skipped,
    })
}

fn play_step(sim: &mut Simulation, actor: CharIndex, step: &RotationStep) -> Result<(), SimError> {
    if step.action != ActionKind::Swap && !sim.engine().is_active(actor) {
        sim.invoke_when_ready(actor, ActionKind::Swap, &Params::new())?;
    }
    sim.invoke_when_ready(actor, step.action, &step.params)?;
    Ok(())
}
