use strum::{AsRefStr, Display, EnumCount, EnumIter, EnumString};

/// Every action a character can be asked to perform.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    EnumCount,
    EnumIter,
    EnumString,
    AsRefStr,
    Display,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ActionKind {
    Attack,
    Charge,
    Aim,
    Skill,
    Burst,
    Dash,
    Jump,
    Swap,
    Walk,
}

/// Animation state reported by an invocation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, AsRefStr, Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum AnimationState {
    Idle,
    NormalAttack,
    ChargeAttack,
    Aim,
    Skill,
    Burst,
    Dash,
    Jump,
    Swap,
    Walk,
}

impl ActionKind {
    pub const fn default_state(self) -> AnimationState {
        match self {
            ActionKind::Attack => AnimationState::NormalAttack,
            ActionKind::Charge => AnimationState::ChargeAttack,
            ActionKind::Aim => AnimationState::Aim,
            ActionKind::Skill => AnimationState::Skill,
            ActionKind::Burst => AnimationState::Burst,
            ActionKind::Dash => AnimationState::Dash,
            ActionKind::Jump => AnimationState::Jump,
            ActionKind::Swap => AnimationState::Swap,
            ActionKind::Walk => AnimationState::Walk,
        }
    }

    /// Actions that are implemented by the engine rather than by a kit.
    pub const fn is_movement(self) -> bool {
        matches!(self, ActionKind::Dash | ActionKind::Jump | ActionKind::Walk | ActionKind::Swap)
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    #[test]
    fn parses_snake_case_names() {
        assert_eq!(ActionKind::from_str("burst"), Ok(ActionKind::Burst));
        assert_eq!(ActionKind::Aim.to_string(), "aim");
        assert!(ActionKind::from_str("ultimate").is_err());
    }
}
