//! Named, time-bounded status flags.
//!
//! Statuses gate behavior (a field is up, a blessing is active) rather than
//! contributing stat values. Entries expire the same way modifiers do: on a
//! wall frame, or on a logical frame that hit-lag pushes back. Expired
//! entries are swept by [`StatusRegistry::remove_expired`] on every clock
//! advance.

use std::collections::BTreeMap;
use std::fmt;

use super::modifiers::{ClockView, Duration, Expiry};
use crate::types::EntityId;

/// Where a status lives.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StatusScope {
    Global,
    Entity(EntityId),
}

/// Scope plus name.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatusKey {
    pub scope: StatusScope,
    pub name: String,
}

impl StatusKey {
    pub fn global(name: impl Into<String>) -> Self {
        Self {
            scope: StatusScope::Global,
            name: name.into(),
        }
    }

    pub fn on(entity: impl Into<EntityId>, name: impl Into<String>) -> Self {
        Self {
            scope: StatusScope::Entity(entity.into()),
            name: name.into(),
        }
    }
}

impl fmt::Display for StatusKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.scope {
            StatusScope::Global => write!(f, "{}", self.name),
            StatusScope::Entity(entity) => write!(f, "{}@{}", self.name, entity),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StatusRegistry {
    entries: BTreeMap<StatusKey, Expiry>,
}

impl StatusRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets `key` to last `duration` from `clock`.
    ///
    /// Re-adding overwrites the previous expiry, shorter or longer.
    pub fn add(&mut self, key: StatusKey, clock: ClockView, duration: Duration) -> Expiry {
        let expiry = Expiry::after(duration, clock);
        self.entries.insert(key, expiry);
        expiry
    }

    pub fn is_active(&self, key: &StatusKey, clock: ClockView) -> bool {
        self.expiry(key, clock).is_some()
    }

    /// Expiry of an active status.
    pub fn expiry(&self, key: &StatusKey, clock: ClockView) -> Option<Expiry> {
        self.entries.get(key).copied().filter(|expiry| !expiry.is_expired(clock))
    }

    /// Frames left before the status lapses, zero when inactive and `None`
    /// for a permanent one.
    pub fn remaining(&self, key: &StatusKey, clock: ClockView) -> Option<u64> {
        match self.expiry(key, clock) {
            Some(expiry) => expiry.remaining(clock),
            None => Some(0),
        }
    }

    pub fn remove_expired(&mut self, clock: ClockView) {
        self.entries.retain(|_, expiry| !expiry.is_expired(clock));
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
