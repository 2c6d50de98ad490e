//! Expected-value damage formula.
//!
//! ```text
//! base     = multiplier × (ATK | DEF) + flat
//! bonus    = 1 + DMG% + element DMG%
//! crit     = 1 + clamp(CR, 0, 1) × CD          (CR = 1 on weak-point hits)
//! def_mult = (L + 100) / ((L + 100) + (Lt + 100)(1 − shred))
//! res_mult = 1 − r/2 (r < 0) | 1 − r (r < 0.75) | 1 / (4r + 1)
//! ```

use super::attack::{AttackFlags, AttackInfo};
use super::target::Target;
use crate::stats::{BaseStats, Stat, StatVector};

/// Attacker stats frozen when an attack is snapshotted.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AttackerSnapshot {
    pub level: u32,
    pub base: BaseStats,
    /// Profile stats plus every active modifier.
    pub stats: StatVector,
}

impl AttackerSnapshot {
    pub fn total_atk(&self) -> f64 {
        self.base.total_atk(&self.stats)
    }

    pub fn total_def(&self) -> f64 {
        self.base.total_def(&self.stats)
    }
}

/// Outcome of the formula for one target.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DamageRoll {
    pub amount: f64,
    /// Crit rate actually used, after clamping and weak-point override.
    pub crit_rate: f64,
}

pub fn compute(attack: &AttackInfo, snapshot: &AttackerSnapshot, target: &Target, target_shred: &StatVector) -> DamageRoll {
    let scaling = if attack.has(AttackFlags::USE_DEF) {
        snapshot.total_def()
    } else {
        snapshot.total_atk()
    };
    let base = attack.multiplier * scaling + attack.flat_damage;

    let stats = &snapshot.stats;
    let bonus = 1.0 + stats[Stat::DamageBonus] + stats[attack.element.bonus_stat()];

    let crit_rate = if attack.has(AttackFlags::HIT_WEAK_POINT) && target.weak_point {
        1.0
    } else {
        stats[Stat::CritRate].clamp(0.0, 1.0)
    };
    let crit = 1.0 + crit_rate * stats[Stat::CritDamage];

    let def_mult = defense_multiplier(snapshot.level, target.level, target_shred[Stat::DefShred]);

    let res = target.resistance(attack.element) - target_shred[attack.element.shred_stat()];
    let res_mult = resistance_multiplier(res);

    DamageRoll {
        amount: base * bonus * crit * def_mult * res_mult,
        crit_rate,
    }
}

pub fn defense_multiplier(attacker_level: u32, target_level: u32, shred: f64) -> f64 {
    let attacker = f64::from(attacker_level) + 100.0;
    let target = (f64::from(target_level) + 100.0) * (1.0 - shred.clamp(0.0, 1.0));
    attacker / (attacker + target)
}

pub fn resistance_multiplier(res: f64) -> f64 {
    if res < 0.0 {
        1.0 - res / 2.0
    } else if res < 0.75 {
        1.0 - res
    } else {
        1.0 / (4.0 * res + 1.0)
    }
}
