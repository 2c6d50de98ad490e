//! Damage events and the per-run damage log.

use std::collections::BTreeMap;

use sha2::{Digest, Sha256};

use super::attack::{AttackTag, Element};
use crate::types::{CharIndex, Frame, TargetKey};

/// One resolved hit on one target.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HitEvent {
    pub frame: Frame,
    pub actor: CharIndex,
    pub target: TargetKey,
    pub label: String,
    pub tag: AttackTag,
    pub element: Element,
    pub amount: f64,
    /// Zero when ICD suppressed the elemental application.
    pub durability: f64,
    pub weak_point: bool,
    pub crit_rate: f64,
}

impl HitEvent {
    pub fn applied_element(&self) -> bool {
        self.durability > 0.0
    }
}

#[derive(Clone, Debug, Default)]
pub struct DamageLog {
    events: Vec<HitEvent>,
}

impl DamageLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: HitEvent) {
        self.events.push(event);
    }

    pub fn events(&self) -> &[HitEvent] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn total(&self) -> f64 {
        self.events.iter().map(|e| e.amount).sum()
    }

    /// Damage summed per ability label.
    pub fn totals_by_label(&self) -> BTreeMap<String, f64> {
        let mut totals = BTreeMap::new();
        for event in &self.events {
            *totals.entry(event.label.clone()).or_insert(0.0) += event.amount;
        }
        totals
    }

    /// Frames on which hits with `label` landed, in order.
    pub fn frames_of(&self, label: &str) -> Vec<u64> {
        self.events
            .iter()
            .filter(|e| e.label == label)
            .map(|e| e.frame.0)
            .collect()
    }

    /// SHA-256 over the ordered trace. Two runs with the same inputs must
    /// produce the same digest.
    pub fn digest(&self) -> [u8; 32] {
        let mut hasher = Sha256::new();
        for event in &self.events {
            hasher.update(event.frame.0.to_le_bytes());
            hasher.update((event.actor.0 as u64).to_le_bytes());
            hasher.update(event.target.0.to_le_bytes());
            hasher.update(event.label.as_bytes());
            hasher.update([0u8]);
            hasher.update(event.amount.to_bits().to_le_bytes());
            hasher.update(event.durability.to_bits().to_le_bytes());
        }
        hasher.finalize().into()
    }

    pub fn digest_hex(&self) -> String {
        hex::encode(self.digest())
    }
}
