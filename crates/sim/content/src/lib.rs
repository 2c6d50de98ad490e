//! Character kits and data-driven scenario loading.
//!
//! This crate sits on top of `sim-core` and provides:
//! - Ability kits for the supported characters (talent tables, frame data)
//! - Content-level tuning that is not part of the engine ([`ContentConfig`])
//! - A rotation driver that replays a list of steps against a simulation
//! - Loaders for rosters and rotations (RON) and configuration (TOML)
//!
//! Kits only talk to the engine through its public API; nothing here reaches
//! into engine internals.

pub mod characters;
pub mod config;
pub mod rotation;

#[cfg(feature = "loaders")]
pub mod loaders;

pub use characters::{KitKind, Rosaria, Sethos, TalentTable, Xilonen};
pub use config::ContentConfig;
pub use rotation::{RotationError, RotationStep, RunReport, SkippedStep, run_rotation};

#[cfg(feature = "loaders")]
pub use loaders::{
    CharacterSpec, ConfigFile, ConfigLoader, ContentFactory, RosterLoader, RosterSpec,
    RotationLoader, Scenario, StatusSpec, TargetSpec,
};
