//! Frame-quantized combat rotation engine.
//!
//! A run is a single [`Engine`]: a 60 fps clock with a deferred task queue,
//! a combat resolver that turns attack descriptions into damage events,
//! a hit-lag controller that freezes pending work, timed stat modifiers and
//! status flags, and a per-character action state machine. Character ability
//! catalogs plug in through the [`Kit`] trait and are driven by a
//! [`Simulation`].
//!
//! The crate is deterministic and single-threaded per run. Parallelism, if
//! any, happens one level up by running independent simulations.

pub mod action;
pub mod character;
pub mod combat;
pub mod config;
pub mod engine;
pub mod error;
pub mod sim;
pub mod stats;
pub mod types;

pub use action::{ActionError, ActionInfo, ActionKind, ActionStateMachine, AnimationState, FrameTable, Params};
pub use character::{CharacterProfile, CharacterState, EnergyLedger, Kit, TalentLevels};
pub use combat::{
    AttackFlags, AttackInfo, AttackPattern, AttackTag, CombatError, DamageLog, Element, HitEvent, IcdGroup, IcdRule,
    IcdTag, Point, StrikeType, Target,
};
pub use config::{EnergyConfig, MovementFrames, SimConfig};
pub use engine::{AttackRequest, Engine, OnHit, Particles, ScheduleError, Scheduler};
pub use error::{EngineError, ErrorSeverity, SimError};
pub use sim::Simulation;
pub use stats::{
    BaseStats, Duration, ModValue, Stat, StatError, StatMask, StatMod, StatVector, StatusKey, StatusScope,
};
pub use types::{CharIndex, EntityId, Frame, TargetKey};
