//! Per-character animation and cooldown gate.
//!
//! ```text
//! Idle ──invoke──▶ Animating(kind) ──cancel window──▶ Animating(next)
//!                       │
//!                       └──animation end──▶ Idle
//! ```

use std::collections::BTreeMap;

use super::error::ActionError;
use super::frames::ActionInfo;
use super::kind::{ActionKind, AnimationState};
use crate::types::Frame;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Animating {
    kind: ActionKind,
    started: Frame,
    info: ActionInfo,
}

impl Animating {
    fn ends_at(&self) -> Frame {
        self.started + u64::from(self.info.animation_length)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ActionStateMachine {
    current: Option<Animating>,
    cooldowns: BTreeMap<ActionKind, Frame>,
}

impl ActionStateMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self, now: Frame) -> AnimationState {
        match self.current {
            Some(anim) if now < anim.ends_at() => anim.info.state,
            _ => AnimationState::Idle,
        }
    }

    /// Action whose animation is playing at `now`.
    pub fn current(&self, now: Frame) -> Option<ActionKind> {
        self.current
            .filter(|anim| now < anim.ends_at())
            .map(|anim| anim.kind)
    }

    /// Frame the current animation ends, or `None` when idle.
    pub fn animation_end(&self, now: Frame) -> Option<Frame> {
        self.current
            .map(|anim| anim.ends_at())
            .filter(|end| now < *end)
    }

    /// Earliest frame `next` could start, ignoring cooldowns.
    ///
    /// Illegal transitions resolve to the end of the animation.
    pub fn cancel_frame(&self, next: ActionKind) -> Frame {
        match self.current {
            None => Frame::ZERO,
            Some(anim) => anim.started + u64::from(anim.info.cancel_frames(next)),
        }
    }

    /// Earliest frame `next` could start, including its cooldown.
    pub fn ready_at(&self, next: ActionKind) -> Frame {
        let cancel = self.cancel_frame(next);
        match self.cooldowns.get(&next) {
            Some(cd) => cancel.max(*cd),
            None => cancel,
        }
    }

    /// Validates that `next` may start at `now`.
    pub fn check(&self, next: ActionKind, now: Frame) -> Result<(), ActionError> {
        if let Some(&ready_at) = self.cooldowns.get(&next) {
            if now < ready_at {
                return Err(ActionError::OnCooldown {
                    action: next,
                    ready_at,
                });
            }
        }

        let Some(anim) = self.current else {
            return Ok(());
        };
        let end = anim.ends_at();
        if now >= end {
            return Ok(());
        }

        match anim.info.frames.get(next) {
            None => Err(ActionError::IllegalTransition {
                from: anim.kind,
                to: next,
                until: end,
            }),
            Some(_) => {
                let ready_at = self.cancel_frame(next);
                if now < ready_at {
                    Err(ActionError::NotReady {
                        action: next,
                        ready_at,
                    })
                } else {
                    Ok(())
                }
            }
        }
    }

    /// Records that `kind` started at `now` with the given frame data.
    pub fn begin(&mut self, kind: ActionKind, info: ActionInfo, now: Frame) {
        self.current = Some(Animating {
            kind,
            started: now,
            info,
        });
    }

    /// Drops the current animation, e.g. when the character swaps out.
    pub fn interrupt(&mut self) {
        self.current = None;
    }

    pub fn set_cooldown(&mut self, kind: ActionKind, now: Frame, frames: u64) {
        self.cooldowns.insert(kind, now + frames);
    }

    pub fn cooldown_ready_at(&self, kind: ActionKind, now: Frame) -> Option<Frame> {
        self.cooldowns.get(&kind).copied().filter(|at| now < *at)
    }

    /// Shortens an active cooldown by `frames`.
    pub fn reduce_cooldown(&mut self, kind: ActionKind, frames: u64) {
        if let Some(at) = self.cooldowns.get_mut(&kind) {
            at.0 = at.0.saturating_sub(frames);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::frames::FrameTable;

    fn burst_info() -> ActionInfo {
        let table = FrameTable::uniform(70)
            .with(ActionKind::Dash, 57)
            .with(ActionKind::Jump, 59)
            .with(ActionKind::Swap, 69);
        ActionInfo::new(table, 57, AnimationState::Burst)
    }

    #[test]
    fn cancel_before_window_is_not_ready() {
        let mut sm = ActionStateMachine::new();
        sm.begin(ActionKind::Burst, burst_info(), Frame(100));

        let err = sm.check(ActionKind::Dash, Frame(156)).unwrap_err();
        assert_eq!(
            err,
            ActionError::NotReady {
                action: ActionKind::Dash,
                ready_at: Frame(157),
            }
        );
        assert!(sm.check(ActionKind::Dash, Frame(157)).is_ok());
        assert!(sm.check(ActionKind::Attack, Frame(169)).is_err());
        assert!(sm.check(ActionKind::Attack, Frame(170)).is_ok());
    }

    #[test]
    fn returns_to_idle_after_animation() {
        let mut sm = ActionStateMachine::new();
        assert_eq!(sm.state(Frame(0)), AnimationState::Idle);

        sm.begin(ActionKind::Burst, burst_info(), Frame(0));
        assert_eq!(sm.state(Frame(69)), AnimationState::Burst);
        assert_eq!(sm.state(Frame(70)), AnimationState::Idle);
        assert_eq!(sm.current(Frame(70)), None);
    }

    #[test]
    fn illegal_transition_waits_for_animation_end() {
        let table = FrameTable::normal_cancel(13, 35).illegal(ActionKind::Charge);
        let mut sm = ActionStateMachine::new();
        sm.begin(
            ActionKind::Attack,
            ActionInfo::new(table, 13, AnimationState::NormalAttack),
            Frame(0),
        );

        let err = sm.check(ActionKind::Charge, Frame(20)).unwrap_err();
        assert!(matches!(err, ActionError::IllegalTransition { until: Frame(35), .. }));
        assert_eq!(sm.ready_at(ActionKind::Charge), Frame(35));
        assert!(sm.check(ActionKind::Charge, Frame(35)).is_ok());
    }

    #[test]
    fn cooldown_gates_independently_of_animation() {
        let mut sm = ActionStateMachine::new();
        sm.set_cooldown(ActionKind::Burst, Frame(0), 900);

        assert!(matches!(
            sm.check(ActionKind::Burst, Frame(500)),
            Err(ActionError::OnCooldown { ready_at: Frame(900), .. })
        ));
        assert_eq!(sm.ready_at(ActionKind::Burst), Frame(900));

        sm.reduce_cooldown(ActionKind::Burst, 400);
        assert!(sm.check(ActionKind::Burst, Frame(500)).is_ok());
    }
}
