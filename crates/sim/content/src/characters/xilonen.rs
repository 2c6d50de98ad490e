//! Xilonen: normal attack chain and Blade Roller.
//!
//! While the nightsoul status is up, normal attacks become the four-hit
//! Blade Roller chain: Geo, scaling off DEF and ignoring infusion.

use std::rc::Rc;

use sim_core::{
    ActionError, ActionInfo, ActionKind, AnimationState, AttackFlags, AttackInfo, AttackPattern,
    AttackRequest, AttackTag, CharIndex, Element, Engine, FrameTable, HitEvent, IcdGroup, IcdTag,
    Kit, OnHit, Params, SimError, Stat, StatusKey, StrikeType,
};

use super::curves::{ELEMENTAL, PHYSICAL, TalentTable};

/// Per-character status marking Nightsoul's Blessing.
pub const NIGHTSOUL_STATUS: &str = "xilonen-nightsoul";
/// Tag holding the current nightsoul point count.
pub const NIGHTSOUL_POINTS: &str = "nightsoul-points";
pub const MAX_NIGHTSOUL_POINTS: i64 = 90;

const A1_ICD_STATUS: &str = "xilonen-a1-icd";
const A1_POINTS: i64 = 35;
const A1_ICD: u64 = 6;

const HITBOX: f64 = 1.5;

const ATTACK_HITMARKS: [&[i64]; 3] = [&[10], &[9, 19], &[13]];
const ATTACK_OFFSETS: [&[f64]; 3] = [&[0.8], &[0.6, 0.6], &[0.8]];
const ATTACK_HALT: [f64; 3] = [0.03, 0.03, 0.06];

pub const ATTACK_1: TalentTable = TalentTable::scaled(0.5179, &PHYSICAL);
pub const ATTACK_2: TalentTable = TalentTable::scaled(0.2737, &PHYSICAL);
pub const ATTACK_3: TalentTable = TalentTable::scaled(0.7295, &PHYSICAL);
const ATTACK: [&[TalentTable]; 3] = [&[ATTACK_1], &[ATTACK_2, ATTACK_2], &[ATTACK_3]];

const ROLLER_HITMARKS: [i64; 4] = [10, 9, 13, 13];
const ROLLER_OFFSETS: [f64; 4] = [0.8, 0.6, 0.8, 0.8];
const ROLLER_HALT: [f64; 4] = [0.03, 0.03, 0.06, 0.06];

pub const ROLLER: [TalentTable; 4] = [
    TalentTable::scaled(0.5602, &ELEMENTAL),
    TalentTable::scaled(0.5505, &ELEMENTAL),
    TalentTable::scaled(0.6589, &ELEMENTAL),
    TalentTable::scaled(0.8624, &ELEMENTAL),
];

fn attack_frames() -> [FrameTable; 3] {
    [
        FrameTable::normal_cancel(10, 35).with(ActionKind::Attack, 18),
        FrameTable::normal_cancel(19, 29).with(ActionKind::Attack, 24),
        FrameTable::normal_cancel(13, 35).illegal(ActionKind::Charge),
    ]
}

fn roller_frames() -> [FrameTable; 4] {
    [
        FrameTable::normal_cancel(10, 35).with(ActionKind::Attack, 18),
        FrameTable::normal_cancel(9, 29).with(ActionKind::Attack, 24),
        FrameTable::normal_cancel(13, 35).with(ActionKind::Attack, 29),
        FrameTable::normal_cancel(13, 35),
    ]
}

pub fn nightsoul(actor: CharIndex) -> StatusKey {
    StatusKey::on(actor, NIGHTSOUL_STATUS)
}

#[derive(Clone, Copy, Debug, Default)]
pub struct Xilonen;

impl Xilonen {
    pub fn new() -> Self {
        Self
    }

    fn attack(&self, engine: &mut Engine, actor: CharIndex) -> Result<ActionInfo, SimError> {
        if engine.status_active(&nightsoul(actor)) {
            return self.roller(engine, actor);
        }

        let state = engine.character(actor)?;
        let n = state.normal_counter % ATTACK.len();
        let level = state.profile.talents.attack;
        let template = AttackInfo::new(actor, format!("Normal {n}"), AttackTag::Normal)
            .icd(IcdTag::NormalAttack, IcdGroup::Default)
            .strike(StrikeType::Slash)
            .element(Element::Physical, 25.0)
            .hitlag(engine.config().seconds(ATTACK_HALT[n]), 0.01)
            .flags(AttackFlags::DEFENSE_HALTABLE);

        for (i, table) in ATTACK[n].iter().enumerate() {
            let hit = template.clone().multiplier(table.at(level));
            let pattern = AttackPattern::circle_on_player(ATTACK_OFFSETS[n][i], HITBOX);
            engine.schedule_for(actor, ATTACK_HITMARKS[n][i], "xilonen normal", move |e| {
                e.resolve(AttackRequest::new(hit, pattern))
            })?;
        }
        engine.character_mut(actor)?.advance_normal(ATTACK.len());

        let speed = engine.stat(actor, Stat::AttackSpeed)?;
        let hitmarks = ATTACK_HITMARKS[n];
        let can_queue_after = hitmarks[hitmarks.len() - 1] as u32;
        Ok(ActionInfo::new(
            attack_frames()[n].with_attack_speed(speed),
            can_queue_after,
            AnimationState::NormalAttack,
        ))
    }

    fn roller(&self, engine: &mut Engine, actor: CharIndex) -> Result<ActionInfo, SimError> {
        let state = engine.character(actor)?;
        let n = state.normal_counter % ROLLER.len();
        let level = state.profile.talents.attack;
        let hit = AttackInfo::new(actor, format!("Blade Roller {n}"), AttackTag::Normal)
            .icd(IcdTag::NormalAttack, IcdGroup::Default)
            .strike(StrikeType::Slash)
            .element(Element::Geo, 25.0)
            .multiplier(ROLLER[n].at(level))
            .hitlag(engine.config().seconds(ROLLER_HALT[n]), 0.01)
            .flags(AttackFlags::DEFENSE_HALTABLE | AttackFlags::USE_DEF | AttackFlags::IGNORE_INFUSION);

        let pattern = AttackPattern::circle_on_player(ROLLER_OFFSETS[n], HITBOX);
        let a1 = Self::a1();
        engine.schedule_for(actor, ROLLER_HITMARKS[n], "xilonen roller", move |e| {
            e.resolve(AttackRequest::new(hit, pattern).with_callback(a1))
        })?;
        engine.character_mut(actor)?.advance_normal(ROLLER.len());

        let speed = engine.stat(actor, Stat::AttackSpeed)?;
        Ok(ActionInfo::new(
            roller_frames()[n].with_attack_speed(speed),
            ROLLER_HITMARKS[n] as u32,
            AnimationState::NormalAttack,
        ))
    }

    /// A1: roller hits grant nightsoul points, at most once per 0.1 s.
    fn a1() -> OnHit {
        Rc::new(|engine: &mut Engine, event: &HitEvent| {
            let icd = StatusKey::on(event.actor, A1_ICD_STATUS);
            if engine.status_active(&icd) {
                return Ok(());
            }
            engine.add_status(icd, A1_ICD);
            let points = (engine.tag(event.actor, NIGHTSOUL_POINTS)? + A1_POINTS).min(MAX_NIGHTSOUL_POINTS);
            tracing::trace!(frame = engine.now().0, actor = %event.actor, points, "xilonen a1");
            engine.set_tag(event.actor, NIGHTSOUL_POINTS, points)
        })
    }
}

impl Kit for Xilonen {
    fn name(&self) -> &str {
        "xilonen"
    }

    fn supports(&self, kind: ActionKind) -> bool {
        kind == ActionKind::Attack
    }

    fn invoke(
        &self,
        engine: &mut Engine,
        actor: CharIndex,
        kind: ActionKind,
        params: &Params,
    ) -> Result<ActionInfo, SimError> {
        match kind {
            ActionKind::Attack => {
                params.expect_only(kind, &[])?;
                self.attack(engine, actor)
            }
            _ => Err(ActionError::Unsupported { actor, action: kind }.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chains_share_shape_per_hit() {
        for (hitmarks, offsets) in ATTACK_HITMARKS.iter().zip(ATTACK_OFFSETS) {
            assert_eq!(hitmarks.len(), offsets.len());
        }
        assert_eq!(ATTACK.map(<[TalentTable]>::len), [1, 2, 1]);
    }

    #[test]
    fn third_normal_forbids_charge() {
        let frames = attack_frames();
        assert_eq!(frames[2].get(ActionKind::Charge), None);
        assert_eq!(frames[2].get(ActionKind::Attack), Some(35));
    }

    #[test]
    fn third_roller_hit_cancels_into_attack_early() {
        let frames = roller_frames();
        assert_eq!(frames[2].get(ActionKind::Attack), Some(29));
        assert_eq!(frames[2].get(ActionKind::Charge), Some(35));
        assert_eq!(frames[3].get(ActionKind::Attack), Some(35));
    }
}
