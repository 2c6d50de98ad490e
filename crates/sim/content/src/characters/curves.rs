//! Talent multiplier tables.
//!
//! Every talent scales its level-1 multiplier along one of two shared
//! growth curves, so a table is stored as the fifteen scaled values.

use sim_core::TalentLevels;
use sim_core::character::MAX_TALENT_LEVEL;

const LEVELS: usize = MAX_TALENT_LEVEL as usize;

/// Growth of physical normal and aimed attacks.
pub const PHYSICAL: [f64; LEVELS] = [
    1.0, 1.0811, 1.1622, 1.2784, 1.3595, 1.4527, 1.5811, 1.7088, 1.8365, 1.976, 2.1358, 2.3237,
    2.5117, 2.6996, 2.9046,
];

/// Growth of elemental skills, bursts and charged shots.
pub const ELEMENTAL: [f64; LEVELS] = [
    1.0, 1.075, 1.15, 1.25, 1.325, 1.4, 1.5, 1.6, 1.7, 1.8, 1.9, 2.0, 2.125, 2.25, 2.375,
];

/// Multiplier per talent level 1..=15.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TalentTable([f64; LEVELS]);

impl TalentTable {
    pub const fn new(values: [f64; LEVELS]) -> Self {
        Self(values)
    }

    /// Table whose level-1 value is `base`, grown along `curve`.
    pub const fn scaled(base: f64, curve: &[f64; LEVELS]) -> Self {
        let mut values = [0.0; LEVELS];
        let mut i = 0;
        while i < LEVELS {
            values[i] = base * curve[i];
            i += 1;
        }
        Self(values)
    }

    /// Value at `level`, clamped into the table.
    pub fn at(&self, level: u8) -> f64 {
        self.0[TalentLevels::index(level)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scaled_table_starts_at_base() {
        let table = TalentTable::scaled(1.04, &ELEMENTAL);
        assert_eq!(table.at(1), 1.04);
        assert!((table.at(10) - 1.872).abs() < 1e-12);
        assert_eq!(table.at(15), table.at(40));
    }

    #[test]
    fn curves_are_monotonic() {
        for curve in [PHYSICAL, ELEMENTAL] {
            assert!(curve.windows(2).all(|pair| pair[0] < pair[1]));
        }
    }
}
