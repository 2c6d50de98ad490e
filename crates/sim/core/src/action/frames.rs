//! Cancel-frame tables.
//!
//! For every possible next action a table stores how many frames after the
//! start of the current animation that action becomes legal. `None` marks a
//! transition the animation does not allow at all; it becomes legal only
//! once the animation has fully ended.

use strum::EnumCount;

use super::kind::{ActionKind, AnimationState};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FrameTable {
    cancels: [Option<u32>; ActionKind::COUNT],
    animation_length: u32,
}

impl FrameTable {
    /// Every follow-up becomes legal when the animation ends.
    pub fn uniform(animation_length: u32) -> Self {
        Self {
            cancels: [Some(animation_length); ActionKind::COUNT],
            animation_length,
        }
    }

    /// Normal-attack style table: skill, burst, dash, jump and swap may
    /// cancel right after `hitmark`.
    pub fn normal_cancel(hitmark: u32, animation_length: u32) -> Self {
        Self::uniform(animation_length)
            .with(ActionKind::Skill, hitmark)
            .with(ActionKind::Burst, hitmark)
            .with(ActionKind::Dash, hitmark)
            .with(ActionKind::Jump, hitmark)
            .with(ActionKind::Swap, hitmark)
    }

    #[must_use]
    pub fn with(mut self, next: ActionKind, frames: u32) -> Self {
        self.cancels[next as usize] = Some(frames);
        self
    }

    #[must_use]
    pub fn illegal(mut self, next: ActionKind) -> Self {
        self.cancels[next as usize] = None;
        self
    }

    /// Table with every entry moved `skip` frames earlier.
    #[must_use]
    pub fn shortened(mut self, skip: u32) -> Self {
        for frames in self.cancels.iter_mut().flatten() {
            *frames = frames.saturating_sub(skip);
        }
        self.animation_length = self.animation_length.saturating_sub(skip);
        self
    }

    /// Table scaled down by an attack speed bonus (`0.1` = 10 % faster).
    #[must_use]
    pub fn with_attack_speed(mut self, speed: f64) -> Self {
        let divisor = 1.0 + speed;
        if divisor <= 0.0 || speed == 0.0 {
            return self;
        }
        let scale = |frames: u32| (f64::from(frames) / divisor).floor() as u32;
        for frames in self.cancels.iter_mut().flatten() {
            *frames = scale(*frames);
        }
        self.animation_length = scale(self.animation_length);
        self
    }

    pub fn get(&self, next: ActionKind) -> Option<u32> {
        self.cancels[next as usize]
    }

    pub fn animation_length(&self) -> u32 {
        self.animation_length
    }

    /// Earliest legal cancel across all follow-ups.
    pub fn earliest_cancel(&self) -> u32 {
        self.cancels
            .iter()
            .flatten()
            .copied()
            .min()
            .unwrap_or(self.animation_length)
            .min(self.animation_length)
    }
}

/// What an invocation reports back to the rotation driver.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActionInfo {
    pub frames: FrameTable,
    pub animation_length: u32,
    /// Earliest frame the driver may queue the next action.
    pub can_queue_after: u32,
    pub state: AnimationState,
}

impl ActionInfo {
    pub fn new(frames: FrameTable, can_queue_after: u32, state: AnimationState) -> Self {
        Self {
            frames,
            animation_length: frames.animation_length(),
            can_queue_after,
            state,
        }
    }

    /// Frames from the start of this action until `next` is legal, capped
    /// at the animation length.
    pub fn cancel_frames(&self, next: ActionKind) -> u32 {
        self.frames
            .get(next)
            .map_or(self.animation_length, |frames| frames.min(self.animation_length))
    }
}
