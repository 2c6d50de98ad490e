use crate::action::{ActionInfo, ActionKind, Params};
use crate::engine::Engine;
use crate::error::SimError;
use crate::types::CharIndex;

/// Ability definitions for one character.
///
/// A kit is immutable; all per-run state (counters, statuses, energy) lives
/// on the engine. `invoke` runs synchronously at the frame the action
/// starts and registers its hits and follow-ups with the engine.
pub trait Kit {
    fn name(&self) -> &str;

    /// Actions this kit implements. Movement actions are handled by the
    /// simulation and never reach the kit.
    fn supports(&self, kind: ActionKind) -> bool;

    /// Called once when the character joins the party.
    fn init(&self, _engine: &mut Engine, _actor: CharIndex) -> Result<(), SimError> {
        Ok(())
    }

    /// Extra readiness checks beyond animation and cooldown, e.g. energy.
    fn check(
        &self,
        _engine: &Engine,
        _actor: CharIndex,
        _kind: ActionKind,
        _params: &Params,
    ) -> Result<(), SimError> {
        Ok(())
    }

    fn invoke(
        &self,
        engine: &mut Engine,
        actor: CharIndex,
        kind: ActionKind,
        params: &Params,
    ) -> Result<ActionInfo, SimError>;
}
