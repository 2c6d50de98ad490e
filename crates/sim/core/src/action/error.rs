//! Errors returned synchronously by action invocation.

use super::kind::ActionKind;
use crate::error::{EngineError, ErrorSeverity};
use crate::types::{CharIndex, Frame};

#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum ActionError {
    #[error("{action} is not ready until {ready_at}")]
    NotReady { action: ActionKind, ready_at: Frame },

    #[error("{from} cannot be cancelled into {to}; wait for the animation to end at {until}")]
    IllegalTransition {
        from: ActionKind,
        to: ActionKind,
        until: Frame,
    },

    #[error("{action} is on cooldown until {ready_at}")]
    OnCooldown { action: ActionKind, ready_at: Frame },

    #[error("{actor} has {have:.1} energy, needs {need:.1}")]
    InsufficientEnergy { actor: CharIndex, have: f64, need: f64 },

    #[error("no character in slot {index}")]
    UnknownCharacter { index: CharIndex },

    #[error("party already has {capacity} members")]
    PartyFull { capacity: usize },

    #[error("{actor} is not on field")]
    NotOnField { actor: CharIndex },

    #[error("{actor} is already on field")]
    AlreadyOnField { actor: CharIndex },

    #[error("{actor} has no {action} ability")]
    Unsupported { actor: CharIndex, action: ActionKind },

    #[error("invalid value {value} for `{key}` on {action}")]
    InvalidParam {
        action: ActionKind,
        key: String,
        value: i64,
    },

    #[error("unknown option `{key}` for {action}")]
    UnknownOption { action: ActionKind, key: String },
}

impl EngineError for ActionError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::NotReady { .. } | Self::OnCooldown { .. } | Self::InsufficientEnergy { .. } => {
                ErrorSeverity::Recoverable
            }
            Self::IllegalTransition { .. }
            | Self::NotOnField { .. }
            | Self::AlreadyOnField { .. }
            | Self::Unsupported { .. }
            | Self::InvalidParam { .. }
            | Self::UnknownOption { .. }
            | Self::PartyFull { .. } => ErrorSeverity::Validation,
            Self::UnknownCharacter { .. } => ErrorSeverity::Fatal,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::NotReady { .. } => "ACTION_NOT_READY",
            Self::IllegalTransition { .. } => "ACTION_ILLEGAL_TRANSITION",
            Self::OnCooldown { .. } => "ACTION_ON_COOLDOWN",
            Self::InsufficientEnergy { .. } => "ACTION_INSUFFICIENT_ENERGY",
            Self::UnknownCharacter { .. } => "ACTION_UNKNOWN_CHARACTER",
            Self::PartyFull { .. } => "ACTION_PARTY_FULL",
            Self::NotOnField { .. } => "ACTION_NOT_ON_FIELD",
            Self::AlreadyOnField { .. } => "ACTION_ALREADY_ON_FIELD",
            Self::Unsupported { .. } => "ACTION_UNSUPPORTED",
            Self::InvalidParam { .. } => "ACTION_INVALID_PARAM",
            Self::UnknownOption { .. } => "ACTION_UNKNOWN_OPTION",
        }
    }
}

impl ActionError {
    /// Frame at which retrying the same request could succeed, if known.
    pub fn retry_at(&self) -> Option<Frame> {
        match self {
            Self::NotReady { ready_at, .. } | Self::OnCooldown { ready_at, .. } => Some(*ready_at),
            Self::IllegalTransition { until, .. } => Some(*until),
            _ => None,
        }
    }
}
