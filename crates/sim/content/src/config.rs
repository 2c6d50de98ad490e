/// Tuning values owned by the character kits rather than the engine.
///
/// Loaded from the `[content]` table of the same TOML file as
/// [`sim_core::SimConfig`].
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ContentConfig {
    /// Share of the A1 energy a level-1 charged shot consumes.
    pub sethos_lv1_energy_factor: f64,
    /// Upper bound on the crit rate Rosaria's A4 hands out.
    pub rosaria_a4_cap: f64,
}

impl ContentConfig {
    pub const DEFAULT_SETHOS_LV1_ENERGY_FACTOR: f64 = 0.5;
    pub const DEFAULT_ROSARIA_A4_CAP: f64 = 0.15;

    pub fn new() -> Self {
        Self {
            sethos_lv1_energy_factor: Self::DEFAULT_SETHOS_LV1_ENERGY_FACTOR,
            rosaria_a4_cap: Self::DEFAULT_ROSARIA_A4_CAP,
        }
    }
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self::new()
    }
}
