//! Timed stat modifiers.
//!
//! A modifier is keyed by its identity string within its owner. Adding a
//! modifier whose identity is already present replaces it (duration refresh);
//! stacking effects use distinct identities per stack.
//!
//! Values come in two flavors:
//! - [`ModValue::Snapshot`]: frozen when the modifier is created
//! - [`ModValue::Live`]: recomputed on every query from the owner's state
//!
//! Expiry is lazy: a modifier is dropped the first time a query finds it
//! expired.

use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use bitflags::bitflags;

use super::stat::{Stat, StatVector};
use super::status::{StatusKey, StatusRegistry};
use super::StatError;
use crate::types::{EntityId, Frame};

bitflags! {
    /// Set of stats a modifier is allowed to touch. Fixed at creation.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct StatMask: u32 {
        const _ = !0;
    }
}

impl From<Stat> for StatMask {
    fn from(stat: Stat) -> Self {
        StatMask::from_bits_retain(stat.bit())
    }
}

impl StatMask {
    pub fn has(self, stat: Stat) -> bool {
        self.contains(StatMask::from(stat))
    }
}

/// Everything a live modifier may read about its owner.
///
/// Live modifiers cannot read other modifiers, so a query never recurses.
pub struct ModContext<'a> {
    pub clock: ClockView,
    pub owner: EntityId,
    /// Profile stats of the owner (characters only).
    pub base: Option<&'a StatVector>,
    /// Free-form per-character counters.
    pub tags: Option<&'a BTreeMap<String, i64>>,
    pub statuses: &'a StatusRegistry,
}

impl ModContext<'_> {
    pub fn now(&self) -> Frame {
        self.clock.now
    }

    pub fn status_active(&self, key: &StatusKey) -> bool {
        self.statuses.is_active(key, self.clock)
    }

    pub fn base_stat(&self, stat: Stat) -> f64 {
        self.base.map_or(0.0, |base| base[stat])
    }

    pub fn tag(&self, key: &str) -> i64 {
        self.tags
            .and_then(|tags| tags.get(key))
            .copied()
            .unwrap_or_default()
    }
}

/// Recompute closure. Returning `None` means "inactive right now".
pub type LiveFn = Rc<dyn Fn(&ModContext<'_>) -> Option<StatVector>>;

#[derive(Clone)]
pub enum ModValue {
    Snapshot(StatVector),
    Live(LiveFn),
}

impl fmt::Debug for ModValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModValue::Snapshot(v) => f.debug_tuple("Snapshot").field(v).finish(),
            ModValue::Live(_) => f.write_str("Live(..)"),
        }
    }
}

/// When a modifier stops contributing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Expiry {
    Never,
    /// Wall frame; expired once `now >= frame`.
    At(Frame),
    /// Logical frame; hit-lag pushes it back like pending tasks.
    Hitlag(i64),
}

/// Clock readings needed to evaluate an [`Expiry`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ClockView {
    pub now: Frame,
    pub logical: i64,
}

impl Expiry {
    /// Expiry of something lasting `duration` from `clock`.
    pub fn after(duration: Duration, clock: ClockView) -> Self {
        match duration {
            Duration::Permanent => Expiry::Never,
            Duration::Frames(frames) => Expiry::At(clock.now + frames),
            Duration::FramesWithHitlag(frames) => Expiry::Hitlag(clock.logical + frames as i64),
        }
    }

    pub fn is_expired(&self, clock: ClockView) -> bool {
        match *self {
            Expiry::Never => false,
            Expiry::At(frame) => clock.now >= frame,
            Expiry::Hitlag(logical) => clock.logical >= logical,
        }
    }

    /// Frames until expiry, `None` for permanent modifiers.
    pub fn remaining(&self, clock: ClockView) -> Option<u64> {
        match *self {
            Expiry::Never => None,
            Expiry::At(frame) => Some(frame.since(clock.now)),
            Expiry::Hitlag(logical) => Some((logical - clock.logical).max(0) as u64),
        }
    }
}

/// How long a new modifier lasts, resolved to an [`Expiry`] on insertion.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Duration {
    Permanent,
    Frames(u64),
    /// Extended by every hit-lag freeze that happens while it is active.
    FramesWithHitlag(u64),
}

#[derive(Clone, Debug)]
pub struct StatMod {
    key: String,
    affected: StatMask,
    value: ModValue,
    duration: Duration,
}

impl StatMod {
    pub fn new(key: impl Into<String>, affected: StatMask, value: ModValue, duration: Duration) -> Self {
        Self {
            key: key.into(),
            affected,
            value,
            duration,
        }
    }

    /// Single-stat snapshot modifier.
    pub fn snapshot(key: impl Into<String>, stat: Stat, amount: f64, duration: Duration) -> Self {
        Self::new(
            key,
            stat.into(),
            ModValue::Snapshot(StatVector::single(stat, amount)),
            duration,
        )
    }

    /// Live modifier over `affected`.
    pub fn live(
        key: impl Into<String>,
        affected: StatMask,
        duration: Duration,
        f: impl Fn(&ModContext<'_>) -> Option<StatVector> + 'static,
    ) -> Self {
        Self::new(key, affected, ModValue::Live(Rc::new(f)), duration)
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn affected(&self) -> StatMask {
        self.affected
    }
}

#[derive(Clone, Debug)]
struct ActiveMod {
    key: String,
    affected: StatMask,
    value: ModValue,
    expiry: Expiry,
}

impl ActiveMod {
    fn evaluate(&self, ctx: &ModContext<'_>) -> Option<StatVector> {
        match &self.value {
            ModValue::Snapshot(v) => Some(*v),
            ModValue::Live(f) => f(ctx),
        }
    }
}

/// Per-entity modifier storage.
#[derive(Clone, Debug, Default)]
pub struct ModifierRegistry {
    entries: BTreeMap<EntityId, Vec<ActiveMod>>,
}

impl ModifierRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes `owner` known to the registry. Queries for unknown owners fail.
    pub fn register(&mut self, owner: EntityId) {
        self.entries.entry(owner).or_default();
    }

    pub fn is_registered(&self, owner: EntityId) -> bool {
        self.entries.contains_key(&owner)
    }

    /// Inserts or refreshes a modifier.
    ///
    /// A refresh must touch the same stats as the entry it replaces; the
    /// registry is left unchanged otherwise.
    pub fn add(&mut self, owner: EntityId, modifier: StatMod, clock: ClockView) -> Result<(), StatError> {
        let mods = self.mods_mut(owner)?;
        let active = ActiveMod {
            expiry: Expiry::after(modifier.duration, clock),
            key: modifier.key,
            affected: modifier.affected,
            value: modifier.value,
        };

        match mods.iter_mut().find(|m| m.key == active.key) {
            Some(existing) if existing.affected != active.affected => Err(StatError::MaskChanged {
                entity: owner,
                key: active.key,
            }),
            Some(existing) => {
                *existing = active;
                Ok(())
            }
            None => {
                mods.push(active);
                Ok(())
            }
        }
    }

    /// Removes a modifier immediately. Returns true if it was present.
    pub fn remove(&mut self, owner: EntityId, key: &str) -> Result<bool, StatError> {
        let mods = self.mods_mut(owner)?;
        let before = mods.len();
        mods.retain(|m| m.key != key);
        Ok(mods.len() != before)
    }

    /// Frames left on a modifier; `Ok(None)` when absent or expired.
    pub fn remaining(&self, owner: EntityId, key: &str, clock: ClockView) -> Result<Option<Duration>, StatError> {
        let mods = self.mods(owner)?;
        Ok(mods
            .iter()
            .find(|m| m.key == key && !m.expiry.is_expired(clock))
            .map(|m| match m.expiry.remaining(clock) {
                None => Duration::Permanent,
                Some(frames) => Duration::Frames(frames),
            }))
    }

    pub fn is_active(&self, owner: EntityId, key: &str, clock: ClockView) -> Result<bool, StatError> {
        Ok(self.remaining(owner, key, clock)?.is_some())
    }

    /// Sum of every unexpired contribution to `stat`.
    pub fn query(&mut self, stat: Stat, ctx: &ModContext<'_>) -> Result<f64, StatError> {
        let clock = ctx.clock;
        let mods = self.mods_mut(ctx.owner)?;
        mods.retain(|m| !m.expiry.is_expired(clock));

        Ok(mods
            .iter()
            .filter(|m| m.affected.has(stat))
            .filter_map(|m| m.evaluate(ctx))
            .map(|v| v[stat])
            .sum())
    }

    /// Every stat at once, masked per modifier.
    pub fn query_all(&mut self, ctx: &ModContext<'_>) -> Result<StatVector, StatError> {
        let clock = ctx.clock;
        let mods = self.mods_mut(ctx.owner)?;
        mods.retain(|m| !m.expiry.is_expired(clock));

        let mut total = StatVector::new();
        for m in mods.iter() {
            let Some(values) = m.evaluate(ctx) else {
                continue;
            };
            for (stat, value) in values.iter() {
                if m.affected.has(stat) {
                    total[stat] += value;
                }
            }
        }
        Ok(total)
    }

    /// Number of stored entries for `owner`, including ones not yet pruned.
    pub fn len(&self, owner: EntityId) -> usize {
        self.entries.get(&owner).map_or(0, Vec::len)
    }

    fn mods(&self, owner: EntityId) -> Result<&Vec<ActiveMod>, StatError> {
        self.entries
            .get(&owner)
            .ok_or(StatError::UnknownEntity { entity: owner })
    }

    fn mods_mut(&mut self, owner: EntityId) -> Result<&mut Vec<ActiveMod>, StatError> {
        self.entries
            .get_mut(&owner)
            .ok_or(StatError::UnknownEntity { entity: owner })
    }
}
