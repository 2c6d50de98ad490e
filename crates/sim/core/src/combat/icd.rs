//! Internal cooldown (ICD) of elemental application.
//!
//! Hits are bucketed by `(target, actor, tag)`. Inside a bucket, the group
//! rule decides which hits apply their element: a window opens on the first
//! hit and lasts `reset_frames`; within it the n-th hit applies if
//! `sequence[n % len]` is set. A suppressed hit still deals damage.

use std::collections::BTreeMap;

use arrayvec::ArrayVec;

use crate::config::SimConfig;
use crate::types::{CharIndex, Frame, TargetKey};

/// Tag identifying which ICD bucket a hit counts against.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum IcdTag {
    /// Always applies; never tracked.
    #[default]
    None,
    NormalAttack,
    ExtraAttack,
    ElementalArt,
    ElementalBurst,
}

/// Rule family for an ICD bucket.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum IcdGroup {
    /// 2.5 s window, every third hit applies.
    #[default]
    Default,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IcdRule {
    pub reset_frames: u64,
    pub sequence: ArrayVec<bool, { SimConfig::MAX_ICD_SEQUENCE }>,
}

impl IcdRule {
    pub fn new(reset_frames: u64, sequence: &[bool]) -> Self {
        Self {
            reset_frames,
            sequence: sequence
                .iter()
                .copied()
                .take(SimConfig::MAX_ICD_SEQUENCE)
                .collect(),
        }
    }

    pub fn for_group(group: IcdGroup) -> Self {
        match group {
            IcdGroup::Default => Self::new(150, &[true, false, false]),
        }
    }

    fn applies(&self, counter: usize) -> bool {
        if self.sequence.is_empty() {
            return true;
        }
        self.sequence[counter % self.sequence.len()]
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
struct IcdKey {
    target: TargetKey,
    actor: CharIndex,
    tag: IcdTag,
}

#[derive(Clone, Copy, Debug)]
struct IcdWindow {
    opened_at: Frame,
    counter: usize,
}

/// Per-run ICD bookkeeping.
#[derive(Clone, Debug, Default)]
pub struct IcdTracker {
    windows: BTreeMap<IcdKey, IcdWindow>,
}

impl IcdTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a hit and reports whether it applies its element.
    pub fn check(
        &mut self,
        target: TargetKey,
        actor: CharIndex,
        tag: IcdTag,
        rule: &IcdRule,
        now: Frame,
    ) -> bool {
        if tag == IcdTag::None {
            return true;
        }

        let window = self
            .windows
            .entry(IcdKey { target, actor, tag })
            .or_insert(IcdWindow {
                opened_at: now,
                counter: 0,
            });

        if now.since(window.opened_at) >= rule.reset_frames {
            *window = IcdWindow {
                opened_at: now,
                counter: 0,
            };
        }

        let applies = rule.applies(window.counter);
        window.counter += 1;
        applies
    }
}
