//! Party of kits driven against one engine.

use crate::action::{ActionError, ActionInfo, ActionKind, Params};
use crate::character::{CharacterProfile, Kit};
use crate::combat::Target;
use crate::config::SimConfig;
use crate::engine::Engine;
use crate::error::SimError;
use crate::types::{CharIndex, Frame};

/// An engine plus the kit of every party member, in slot order.
pub struct Simulation {
    engine: Engine,
    kits: Vec<Box<dyn Kit>>,
}

impl Simulation {
    pub fn new(config: SimConfig) -> Self {
        Self {
            engine: Engine::new(config),
            kits: Vec::new(),
        }
    }

    pub fn add_character(&mut self, profile: CharacterProfile, kit: Box<dyn Kit>) -> Result<CharIndex, SimError> {
        let index = self.engine.add_character(profile)?;
        kit.init(&mut self.engine, index)?;
        self.kits.push(kit);
        Ok(index)
    }

    pub fn add_target(&mut self, target: Target) {
        self.engine.add_target(target);
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut Engine {
        &mut self.engine
    }

    pub fn into_engine(self) -> Engine {
        self.engine
    }

    pub fn kit(&self, actor: CharIndex) -> Result<&dyn Kit, SimError> {
        self.kits
            .get(actor.0)
            .map(|kit| kit.as_ref())
            .ok_or_else(|| ActionError::UnknownCharacter { index: actor }.into())
    }

    /// Starts `kind` for `actor` at the current frame.
    ///
    /// Fails without side effects when the action is not legal right now.
    pub fn invoke(&mut self, actor: CharIndex, kind: ActionKind, params: &Params) -> Result<ActionInfo, SimError> {
        let now = self.engine.now();
        let info = match kind {
            ActionKind::Swap => self.engine.swap_to(actor)?,
            ActionKind::Dash | ActionKind::Jump | ActionKind::Walk => {
                self.engine.check_action(actor, kind)?;
                let info = self.engine.movement_info(kind, params)?;
                self.engine.begin_action(actor, kind, info)?;
                info
            }
            _ => {
                let kit = self
                    .kits
                    .get(actor.0)
                    .ok_or(ActionError::UnknownCharacter { index: actor })?;
                if !kit.supports(kind) {
                    return Err(ActionError::Unsupported { actor, action: kind }.into());
                }
                self.engine.check_action(actor, kind)?;
                kit.check(&self.engine, actor, kind, params)?;

                let info = kit.invoke(&mut self.engine, actor, kind, params)?;
                self.engine.begin_action(actor, kind, info)?;
                tracing::info!(
                    frame = now.0,
                    %actor,
                    kit = kit.name(),
                    action = %kind,
                    can_queue_after = info.can_queue_after,
                    animation = info.animation_length,
                    "action started"
                );
                info
            }
        };
        Ok(info)
    }

    /// Earliest frame `kind` could start for `actor`, from animation and
    /// cooldown state.
    pub fn ready_at(&self, actor: CharIndex, kind: ActionKind) -> Result<Frame, SimError> {
        self.engine.action_ready_at(actor, kind)
    }

    /// Advances to the earliest legal frame for `kind`, then invokes it.
    pub fn invoke_when_ready(
        &mut self,
        actor: CharIndex,
        kind: ActionKind,
        params: &Params,
    ) -> Result<ActionInfo, SimError> {
        let ready_at = self.ready_at(actor, kind)?;
        self.engine.run_until(ready_at)?;
        self.invoke(actor, kind, params)
    }

    pub fn run_until(&mut self, frame: Frame) -> Result<(), SimError> {
        self.engine.run_until(frame)
    }
}
