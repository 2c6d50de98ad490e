use crate::combat::Element;
use crate::stats::{BaseStats, StatVector};

/// Highest talent level a table has to cover (10 + constellation boosts).
pub const MAX_TALENT_LEVEL: u8 = 15;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TalentLevels {
    pub attack: u8,
    pub skill: u8,
    pub burst: u8,
}

impl TalentLevels {
    pub const fn new(attack: u8, skill: u8, burst: u8) -> Self {
        Self {
            attack,
            skill,
            burst,
        }
    }

    /// Zero-based index into a per-level table.
    pub fn index(level: u8) -> usize {
        usize::from(level.clamp(1, MAX_TALENT_LEVEL) - 1)
    }
}

impl Default for TalentLevels {
    fn default() -> Self {
        Self::new(9, 9, 9)
    }
}

/// Static per-character data: everything that does not change during a run.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CharacterProfile {
    pub name: String,
    pub level: u32,
    pub element: Element,
    pub base: BaseStats,
    /// Weapon, artifact and ascension stats.
    #[cfg_attr(feature = "serde", serde(default))]
    pub stats: StatVector,
    #[cfg_attr(feature = "serde", serde(default))]
    pub talents: TalentLevels,
    #[cfg_attr(feature = "serde", serde(default))]
    pub constellation: u8,
    pub energy_max: f64,
}

impl CharacterProfile {
    pub fn new(name: impl Into<String>, element: Element, base: BaseStats, energy_max: f64) -> Self {
        Self {
            name: name.into(),
            level: 90,
            element,
            base,
            stats: StatVector::new(),
            talents: TalentLevels::default(),
            constellation: 0,
            energy_max,
        }
    }

    #[must_use]
    pub fn with_stats(mut self, stats: StatVector) -> Self {
        self.stats = stats;
        self
    }

    #[must_use]
    pub fn with_talents(mut self, talents: TalentLevels) -> Self {
        self.talents = talents;
        self
    }

    #[must_use]
    pub fn with_constellation(mut self, constellation: u8) -> Self {
        self.constellation = constellation;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn talent_index_is_clamped() {
        assert_eq!(TalentLevels::index(1), 0);
        assert_eq!(TalentLevels::index(10), 9);
        assert_eq!(TalentLevels::index(0), 0);
        assert_eq!(TalentLevels::index(20), 14);
    }
}
