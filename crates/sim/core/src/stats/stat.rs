//! Stat identifiers and dense stat vectors.

use std::collections::BTreeMap;
use std::ops::{Add, AddAssign, Index, IndexMut};

use strum::{AsRefStr, Display, EnumCount, EnumIter, IntoEnumIterator};

/// Every stat a modifier can contribute to.
///
/// Base HP/ATK/DEF are not listed: they come from the character profile and
/// can never be modified.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, EnumCount, EnumIter, AsRefStr, Display,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Stat {
    Hp,
    HpPercent,
    Atk,
    AtkPercent,
    Def,
    DefPercent,
    ElementalMastery,
    EnergyRecharge,
    CritRate,
    CritDamage,
    HealingBonus,
    DamageBonus,
    PhysicalBonus,
    PyroBonus,
    HydroBonus,
    ElectroBonus,
    CryoBonus,
    AnemoBonus,
    GeoBonus,
    DendroBonus,
    AttackSpeed,
    DefShred,
    ResShred,
    PhysicalResShred,
}

impl Stat {
    pub const fn bit(self) -> u32 {
        1 << self as u32
    }
}

/// One value per [`Stat`], indexed by the enum.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(from = "StatMap", into = "StatMap"))]
pub struct StatVector([f64; Stat::COUNT]);

/// Sparse form used for serialization: only non-zero stats are written.
pub type StatMap = BTreeMap<Stat, f64>;

impl StatVector {
    pub const ZERO: Self = Self([0.0; Stat::COUNT]);

    pub fn new() -> Self {
        Self::ZERO
    }

    /// A vector with a single non-zero entry.
    pub fn single(stat: Stat, value: f64) -> Self {
        Self::ZERO.with(stat, value)
    }

    /// Builder-style setter.
    #[must_use]
    pub fn with(mut self, stat: Stat, value: f64) -> Self {
        self[stat] = value;
        self
    }

    pub fn get(&self, stat: Stat) -> f64 {
        self[stat]
    }

    pub fn iter(&self) -> impl Iterator<Item = (Stat, f64)> + '_ {
        Stat::iter().map(|stat| (stat, self[stat]))
    }

    pub fn is_zero(&self) -> bool {
        self.0.iter().all(|v| *v == 0.0)
    }
}

impl Default for StatVector {
    fn default() -> Self {
        Self::ZERO
    }
}

impl Index<Stat> for StatVector {
    type Output = f64;
    fn index(&self, stat: Stat) -> &f64 {
        &self.0[stat as usize]
    }
}

impl IndexMut<Stat> for StatVector {
    fn index_mut(&mut self, stat: Stat) -> &mut f64 {
        &mut self.0[stat as usize]
    }
}

impl Add for StatVector {
    type Output = StatVector;
    fn add(mut self, rhs: StatVector) -> StatVector {
        self += rhs;
        self
    }
}

impl AddAssign for StatVector {
    fn add_assign(&mut self, rhs: StatVector) {
        for (lhs, rhs) in self.0.iter_mut().zip(rhs.0) {
            *lhs += rhs;
        }
    }
}

impl From<StatMap> for StatVector {
    fn from(map: StatMap) -> Self {
        map.into_iter()
            .fold(Self::ZERO, |acc, (stat, value)| acc.with(stat, value))
    }
}

impl From<StatVector> for StatMap {
    fn from(vector: StatVector) -> Self {
        vector.iter().filter(|(_, v)| *v != 0.0).collect()
    }
}

/// Final HP/ATK/DEF given unmodifiable base values and the summed vector.
///
/// `total = base × (1 + percent) + flat`
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BaseStats {
    pub hp: f64,
    pub atk: f64,
    pub def: f64,
}

impl BaseStats {
    pub fn new(hp: f64, atk: f64, def: f64) -> Self {
        Self { hp, atk, def }
    }

    pub fn total_hp(&self, stats: &StatVector) -> f64 {
        self.hp * (1.0 + stats[Stat::HpPercent]) + stats[Stat::Hp]
    }

    pub fn total_atk(&self, stats: &StatVector) -> f64 {
        self.atk * (1.0 + stats[Stat::AtkPercent]) + stats[Stat::Atk]
    }

    pub fn total_def(&self, stats: &StatVector) -> f64 {
        self.def * (1.0 + stats[Stat::DefPercent]) + stats[Stat::Def]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sparse_map_round_trip_keeps_non_zero_entries() {
        let vector = StatVector::single(Stat::CritRate, 0.25).with(Stat::AtkPercent, 0.18);
        let map: StatMap = vector.into();

        assert_eq!(map.len(), 2);
        assert_eq!(StatVector::from(map), vector);
    }

    #[test]
    fn totals_apply_percent_then_flat() {
        let base = BaseStats::new(10_000.0, 800.0, 600.0);
        let stats = StatVector::new()
            .with(Stat::AtkPercent, 0.5)
            .with(Stat::Atk, 311.0)
            .with(Stat::DefPercent, 0.2);

        assert_eq!(base.total_atk(&stats), 1511.0);
        assert_eq!(base.total_def(&stats), 720.0);
        assert_eq!(base.total_hp(&stats), 10_000.0);
    }
}
