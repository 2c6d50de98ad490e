mod common;

use common::{sethos, solo};
use sim_content::characters::sethos::Sethos;
use sim_content::{ContentConfig, KitKind};
use sim_core::{
    ActionError, ActionKind, CharIndex, Element, EngineError, ErrorSeverity, Frame, Params, Point, SimConfig,
    SimError, Simulation, Target, TargetKey,
};

const ACTOR: CharIndex = CharIndex(0);

fn hold(level: i64) -> Params {
    Params::new().with("hold", level)
}

fn quiet(em: f64) -> Simulation {
    solo(SimConfig::without_hitlag(), KitKind::Sethos, sethos(em))
}

#[test]
fn charged_shot_is_shortened_by_a1_and_spends_half_the_energy() {
    let mut sim = quiet(0.0);
    let info = sim.invoke(ACTOR, ActionKind::Aim, &hold(1)).unwrap();
    assert_eq!(info.can_queue_after, 15);
    assert_eq!(info.animation_length, 94 - 71);
    assert_eq!(info.cancel_frames(ActionKind::Dash), 86 - 71);

    sim.run_until(Frame(14)).unwrap();
    assert_eq!(sim.engine().energy(ACTOR).unwrap(), 60.0);
    sim.run_until(Frame(15)).unwrap();
    assert_eq!(sim.engine().energy(ACTOR).unwrap(), 50.0);

    sim.run_until(Frame(40)).unwrap();
    let log = sim.engine().damage_log();
    assert_eq!(log.frames_of("Fully-Charged Aimed Shot"), vec![25]);
    assert_eq!(log.events()[0].element, Element::Dendro);
}

#[test]
fn lv1_energy_share_is_configurable() {
    let content = ContentConfig {
        sethos_lv1_energy_factor: 1.0,
        ..ContentConfig::default()
    };
    let mut sim = Simulation::new(SimConfig::without_hitlag());
    sim.add_character(sethos(0.0), KitKind::Sethos.build(&content)).unwrap();
    sim.add_target(Target::new(TargetKey(1), Point::new(0.0, 2.0)));

    sim.invoke(ACTOR, ActionKind::Aim, &hold(1)).unwrap();
    sim.run_until(Frame(20)).unwrap();
    assert_eq!(sim.engine().energy(ACTOR).unwrap(), 40.0);
}

#[test]
fn physical_shot_is_not_shortened_and_costs_nothing() {
    let mut sim = quiet(0.0);
    let info = sim
        .invoke(ACTOR, ActionKind::Aim, &hold(0).with("travel", 4))
        .unwrap();
    assert_eq!(info.animation_length, 23);
    assert_eq!(info.can_queue_after, 15);

    sim.run_until(Frame(40)).unwrap();
    let log = sim.engine().damage_log();
    assert_eq!(log.frames_of("Aimed Shot"), vec![19]);
    assert_eq!(log.events()[0].element, Element::Physical);
    assert_eq!(sim.engine().energy(ACTOR).unwrap(), 60.0);
}

#[test]
fn shadow_pierce_is_the_default_and_waits_the_full_charge_without_energy() {
    let mut sim = quiet(0.0);
    sim.engine_mut().drain_energy(ACTOR).unwrap();

    let info = sim.invoke(ACTOR, ActionKind::Aim, &Params::new()).unwrap();
    assert_eq!(info.can_queue_after, 375);
    assert_eq!(info.animation_length, 383);

    sim.run_until(Frame(400)).unwrap();
    let log = sim.engine().damage_log();
    assert_eq!(log.frames_of("Shadow Piercing Arrow"), vec![385]);
    assert_eq!(log.events()[0].element, Element::Electro);
}

#[test]
fn shadow_pierce_spends_the_converted_energy_at_release() {
    let mut sim = quiet(0.0);
    let (skip, energy) = Sethos::a1_skip(sim.engine(), ACTOR).unwrap();
    assert_eq!(energy, 20.0);
    let release = 375 - u64::from(skip.min(360));

    let info = sim.invoke(ACTOR, ActionKind::Aim, &hold(2)).unwrap();
    assert_eq!(u64::from(info.can_queue_after), release);

    sim.run_until(Frame(release - 1)).unwrap();
    assert_eq!(sim.engine().energy(ACTOR).unwrap(), 60.0);
    sim.run_until(Frame(release)).unwrap();
    assert_eq!(sim.engine().energy(ACTOR).unwrap(), 40.0);

    sim.run_until(Frame(release + 10)).unwrap();
    assert_eq!(
        sim.engine().damage_log().frames_of("Shadow Piercing Arrow"),
        vec![release + 10]
    );
}

#[test]
fn shadow_pierce_reaches_targets_behind_the_primary() {
    let mut sim = quiet(0.0);
    sim.engine_mut().drain_energy(ACTOR).unwrap();
    sim.add_target(Target::new(TargetKey(2), Point::new(0.0, 10.0)));
    sim.add_target(Target::new(TargetKey(3), Point::new(3.0, 2.0)));

    sim.invoke(ACTOR, ActionKind::Aim, &hold(2)).unwrap();
    sim.run_until(Frame(400)).unwrap();

    let targets: Vec<_> = sim.engine().damage_log().events().iter().map(|e| e.target).collect();
    assert_eq!(targets, vec![TargetKey(1), TargetKey(2)]);
}

#[test]
fn shadow_pierce_adds_elemental_mastery_as_flat_damage() {
    let arrow = |em: f64| {
        let mut sim = quiet(em);
        sim.engine_mut().drain_energy(ACTOR).unwrap();
        sim.invoke(ACTOR, ActionKind::Aim, &hold(2)).unwrap();
        sim.run_until(Frame(400)).unwrap();
        sim.engine().damage_log().total()
    };
    assert!(arrow(500.0) > arrow(0.0));
}

#[test]
fn charged_shot_hitlag_needs_a_weak_point() {
    let shoot = |params: Params| {
        let mut sim = solo(SimConfig::new(), KitKind::Sethos, sethos(0.0));
        sim.invoke(ACTOR, ActionKind::Aim, &params).unwrap();
        sim.run_until(Frame(40)).unwrap();
        sim.into_engine()
    };

    let body = shoot(hold(1));
    assert_eq!(body.damage_log().len(), 1);
    assert_eq!(body.hitlag().events(), 0);

    let head = shoot(hold(1).with("weakspot", 1));
    assert!(head.damage_log().events()[0].weak_point);
    assert_eq!(head.hitlag().total_frames(), 7);
}

#[test]
fn invalid_hold_is_a_validation_error_without_side_effects() {
    let mut sim = quiet(0.0);
    let err = sim.invoke(ACTOR, ActionKind::Aim, &hold(3)).unwrap_err();
    assert_eq!(
        err,
        SimError::Action(ActionError::InvalidParam {
            action: ActionKind::Aim,
            key: "hold".to_string(),
            value: 3,
        })
    );
    assert_eq!(err.severity(), ErrorSeverity::Validation);
    assert_eq!(sim.engine().pending(), 0);
    assert!(sim.engine().character(ACTOR).unwrap().actions.current(Frame(0)).is_none());
}

#[test]
fn unknown_options_and_negative_travel_are_rejected() {
    let mut sim = quiet(0.0);
    assert!(matches!(
        sim.invoke(ACTOR, ActionKind::Aim, &hold(1).with("speed", 2)),
        Err(SimError::Action(ActionError::UnknownOption { .. }))
    ));
    assert!(matches!(
        sim.invoke(ACTOR, ActionKind::Aim, &hold(1).with("travel", -1)),
        Err(SimError::Action(ActionError::InvalidParam { .. }))
    ));
}
