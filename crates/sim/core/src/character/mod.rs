//! Party members: static profile plus per-run mutable state.

pub mod energy;
pub mod kit;
pub mod profile;

use std::collections::BTreeMap;

pub use energy::{EnergyLedger, ParticleReceiver};
pub use kit::Kit;
pub use profile::{CharacterProfile, MAX_TALENT_LEVEL, TalentLevels};

use crate::action::ActionStateMachine;

#[derive(Clone, Debug, PartialEq)]
pub struct CharacterState {
    pub profile: CharacterProfile,
    pub energy: EnergyLedger,
    pub actions: ActionStateMachine,
    /// Position in the normal attack chain.
    pub normal_counter: usize,
    /// Free-form counters kits use for their own bookkeeping.
    pub tags: BTreeMap<String, i64>,
}

impl CharacterState {
    pub fn new(profile: CharacterProfile) -> Self {
        let energy = EnergyLedger::full(profile.energy_max);
        Self {
            profile,
            energy,
            actions: ActionStateMachine::new(),
            normal_counter: 0,
            tags: BTreeMap::new(),
        }
    }

    pub fn tag(&self, key: &str) -> i64 {
        self.tags.get(key).copied().unwrap_or_default()
    }

    pub fn set_tag(&mut self, key: impl Into<String>, value: i64) {
        self.tags.insert(key.into(), value);
    }

    /// Advances the normal chain, wrapping after `chain_len` hits.
    pub fn advance_normal(&mut self, chain_len: usize) {
        self.normal_counter = (self.normal_counter + 1) % chain_len.max(1);
    }

    pub fn reset_normal(&mut self) {
        self.normal_counter = 0;
    }
}
