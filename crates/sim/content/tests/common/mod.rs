#![allow(dead_code)]

use sim_content::{ContentConfig, KitKind};
use sim_core::{
    BaseStats, CharIndex, CharacterProfile, Element, Point, SimConfig, Simulation, Stat, StatVector, Target,
    TargetKey,
};

pub const ROSARIA: CharIndex = CharIndex(0);
pub const XILONEN: CharIndex = CharIndex(1);
pub const SETHOS: CharIndex = CharIndex(2);

pub fn rosaria(crit_rate: f64) -> CharacterProfile {
    CharacterProfile::new("Rosaria", Element::Cryo, BaseStats::new(12_289.0, 240.0, 710.0), 60.0)
        .with_stats(StatVector::single(Stat::CritRate, crit_rate))
}

pub fn xilonen(def: f64) -> CharacterProfile {
    CharacterProfile::new("Xilonen", Element::Geo, BaseStats::new(12_405.0, 275.0, def), 60.0)
        .with_stats(StatVector::single(Stat::CritRate, 0.05))
}

pub fn sethos(em: f64) -> CharacterProfile {
    CharacterProfile::new("Sethos", Element::Electro, BaseStats::new(9_787.0, 227.0, 560.0), 60.0)
        .with_stats(StatVector::single(Stat::CritRate, 0.05).with(Stat::ElementalMastery, em))
}

/// One character of `kind` facing a single target two units ahead.
pub fn solo(config: SimConfig, kind: KitKind, profile: CharacterProfile) -> Simulation {
    let mut sim = Simulation::new(config);
    sim.add_character(profile, kind.build(&ContentConfig::default())).unwrap();
    sim.add_target(Target::new(TargetKey(1), Point::new(0.0, 2.0)));
    sim
}

/// Rosaria, Xilonen and Sethos in slots 0, 1 and 2.
pub fn party(config: SimConfig, content: &ContentConfig, rosaria_crit: f64) -> Simulation {
    let mut sim = Simulation::new(config);
    sim.add_character(rosaria(rosaria_crit), KitKind::Rosaria.build(content)).unwrap();
    sim.add_character(xilonen(800.0), KitKind::Xilonen.build(content)).unwrap();
    sim.add_character(sethos(0.0), KitKind::Sethos.build(content)).unwrap();
    sim.add_target(Target::new(TargetKey(1), Point::new(0.0, 2.0)));
    sim
}
