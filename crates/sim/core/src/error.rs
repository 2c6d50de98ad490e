//! Common error infrastructure for sim-core.
//!
//! Domain errors (`ScheduleError`, `ActionError`, `StatError`, `CombatError`)
//! live next to the component they guard. They all implement [`EngineError`]
//! so callers can classify failures uniformly, and they all fold into
//! [`SimError`] at the engine boundary.
//!
//! # Classification
//!
//! - **Recoverable**: a normal outcome such as not enough energy; try later
//! - **Validation**: the caller supplied a bad option; fix the input
//! - **Internal**: an invariant broke; the ability definition has a bug
//! - **Fatal**: the run cannot continue and has been torn down

use crate::action::ActionError;
use crate::combat::CombatError;
use crate::engine::ScheduleError;
use crate::stats::StatError;

/// Severity level of an error, used for categorization and recovery strategies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// Can retry later, e.g. energy not yet full or still animating.
    Recoverable,

    /// Invalid input, should not retry without changes.
    Validation,

    /// Unexpected state inconsistency.
    Internal,

    /// The run is aborted.
    Fatal,
}

impl ErrorSeverity {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
            Self::Internal => "internal",
            Self::Fatal => "fatal",
        }
    }

    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable)
    }

    /// Returns true if this error indicates a bug upstream of the engine.
    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal | Self::Fatal)
    }
}

/// Common trait for all sim-core errors.
pub trait EngineError: core::fmt::Display + core::fmt::Debug {
    /// Returns the severity level of this error.
    fn severity(&self) -> ErrorSeverity;

    /// Returns a static string identifier for this error variant.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}

/// Errors surfaced at the engine boundary.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum SimError {
    #[error("scheduling failed: {0}")]
    Schedule(#[from] ScheduleError),

    #[error("action rejected: {0}")]
    Action(#[from] ActionError),

    #[error("stat lookup failed: {0}")]
    Stat(#[from] StatError),

    #[error("combat resolution failed: {0}")]
    Combat(#[from] CombatError),
}

impl EngineError for SimError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            SimError::Schedule(e) => e.severity(),
            SimError::Action(e) => e.severity(),
            SimError::Stat(e) => e.severity(),
            SimError::Combat(e) => e.severity(),
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            SimError::Schedule(e) => e.error_code(),
            SimError::Action(e) => e.error_code(),
            SimError::Stat(e) => e.error_code(),
            SimError::Combat(e) => e.error_code(),
        }
    }
}
