use std::collections::BTreeMap;

use crate::combat::{IcdGroup, IcdRule};

/// Simulation configuration constants and tunable parameters.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SimConfig {
    /// Frames per simulated second.
    pub frames_per_second: u32,

    /// When false, qualifying hits never freeze pending work.
    pub hitlag_enabled: bool,

    /// Frames a character must wait after swapping in before swapping again.
    pub swap_cooldown_frames: u32,

    /// Energy granted per particle, before Energy Recharge.
    pub energy: EnergyConfig,

    /// Animation lengths of actions the engine performs itself.
    pub movement: MovementFrames,

    /// Overrides for ICD group rules. Groups absent here use
    /// [`IcdRule::for_group`].
    pub icd_rules: BTreeMap<IcdGroup, IcdRule>,
}

/// Particle energy constants.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EnergyConfig {
    pub same_element: f64,
    pub neutral: f64,
    pub off_element: f64,
    /// Multiplier for characters receiving particles while off-field.
    pub off_field_factor: f64,
}

/// Frame data for dash, jump and swap.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct MovementFrames {
    pub dash: u32,
    pub jump: u32,
    /// Frames the incoming character spends before it can act.
    pub swap: u32,
}

impl SimConfig {
    // ===== compile-time constants =====
    pub const MAX_PARTY: usize = 4;
    pub const MAX_ICD_SEQUENCE: usize = 16;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_FRAMES_PER_SECOND: u32 = 60;
    pub const DEFAULT_SWAP_COOLDOWN: u32 = 60;

    pub fn new() -> Self {
        Self {
            frames_per_second: Self::DEFAULT_FRAMES_PER_SECOND,
            hitlag_enabled: true,
            swap_cooldown_frames: Self::DEFAULT_SWAP_COOLDOWN,
            energy: EnergyConfig::default(),
            movement: MovementFrames::default(),
            icd_rules: BTreeMap::new(),
        }
    }

    pub fn without_hitlag() -> Self {
        Self {
            hitlag_enabled: false,
            ..Self::new()
        }
    }

    /// Converts seconds to frames, the way ability tables declare hit-lag
    /// (`0.06 * 60`). The result may be fractional.
    pub fn seconds(&self, seconds: f64) -> f64 {
        seconds * f64::from(self.frames_per_second)
    }

    pub fn icd_rule(&self, group: IcdGroup) -> IcdRule {
        self.icd_rules
            .get(&group)
            .cloned()
            .unwrap_or_else(|| IcdRule::for_group(group))
    }
}

impl Default for SimConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl Default for EnergyConfig {
    fn default() -> Self {
        Self {
            same_element: 3.0,
            neutral: 2.0,
            off_element: 1.0,
            off_field_factor: 0.6,
        }
    }
}

impl Default for MovementFrames {
    fn default() -> Self {
        Self {
            dash: 20,
            jump: 30,
            swap: 1,
        }
    }
}
