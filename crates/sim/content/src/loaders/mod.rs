//! Loaders for scenario files.
//!
//! Rosters and rotations are RON, configuration is TOML. Every loader
//! returns [`LoadResult`] and names the offending file in its errors.

pub mod config;
pub mod factory;
pub mod roster;
pub mod rotation;

pub use config::{ConfigFile, ConfigLoader};
pub use factory::{ContentFactory, Scenario};
pub use roster::{CharacterSpec, RosterLoader, RosterSpec, StatusSpec, TargetSpec};
pub use rotation::RotationLoader;

use std::path::Path;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

/// Helper function to read file contents.
pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read file {}: {}", path.display(), e))
}
