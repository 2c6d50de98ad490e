//! Attack descriptions and their resolution against targets.
//!
//! The resolution pipeline itself lives on the engine because it touches
//! every registry; this module holds the pure pieces it is built from.

pub mod attack;
pub mod damage;
pub mod event;
pub mod geometry;
pub mod hitlag;
pub mod icd;
pub mod pattern;
pub mod target;

pub use attack::{AttackFlags, AttackInfo, AttackTag, Element, HitlagSpec, StrikeType};
pub use damage::{AttackerSnapshot, DamageRoll};
pub use event::{DamageLog, HitEvent};
pub use geometry::Point;
pub use hitlag::HitlagController;
pub use icd::{IcdGroup, IcdRule, IcdTag, IcdTracker};
pub use pattern::AttackPattern;
pub use target::{CombatRoster, Target};

use crate::error::{EngineError, ErrorSeverity};
use crate::types::TargetKey;

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum CombatError {
    #[error("target {key} is not in the roster")]
    UnknownTarget { key: TargetKey },

    #[error("attack `{label}` needs a primary target")]
    NoPrimaryTarget { label: String },
}

impl EngineError for CombatError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::UnknownTarget { .. } => ErrorSeverity::Fatal,
            Self::NoPrimaryTarget { .. } => ErrorSeverity::Validation,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::UnknownTarget { .. } => "COMBAT_UNKNOWN_TARGET",
            Self::NoPrimaryTarget { .. } => "COMBAT_NO_PRIMARY_TARGET",
        }
    }
}
