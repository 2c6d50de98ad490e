//! Stats, timed modifiers and status flags.
//!
//! ```text
//! [ profile base stats ] + [ modifier registry ] = effective stats
//!                                 ↑
//!                     live modifiers may read statuses
//! ```

pub mod modifiers;
pub mod stat;
pub mod status;

pub use modifiers::{ClockView, Duration, Expiry, LiveFn, ModContext, ModValue, ModifierRegistry, StatMask, StatMod};
pub use stat::{BaseStats, Stat, StatMap, StatVector};
pub use status::{StatusKey, StatusRegistry, StatusScope};

use crate::error::{EngineError, ErrorSeverity};
use crate::types::EntityId;

/// Errors raised by stat and modifier lookups.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum StatError {
    #[error("entity {entity} is not registered")]
    UnknownEntity { entity: EntityId },

    #[error("modifier `{key}` on {entity} was refreshed with a different stat set")]
    MaskChanged { entity: EntityId, key: String },
}

impl EngineError for StatError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::UnknownEntity { .. } | Self::MaskChanged { .. } => ErrorSeverity::Fatal,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::UnknownEntity { .. } => "STAT_UNKNOWN_ENTITY",
            Self::MaskChanged { .. } => "STAT_MASK_CHANGED",
        }
    }
}
