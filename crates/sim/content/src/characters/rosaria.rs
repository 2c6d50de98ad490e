//! Rosaria: Rites of Termination.
//!
//! The burst slashes around the player, then drops a lance that lands 56
//! frames after the cast. The lance hit opens a field that pulses every two
//! seconds; every pulse is snapshotted when the lance lands.

use std::rc::Rc;

use sim_core::{
    ActionError, ActionInfo, ActionKind, AnimationState, AttackInfo, AttackPattern, AttackRequest,
    AttackTag, CharIndex, Duration, Element, Engine, FrameTable, HitEvent, Kit, OnHit, Params,
    SimError, Stat, StatMod, StatusKey, StrikeType,
};

use super::curves::{ELEMENTAL, TalentTable};
use crate::config::ContentConfig;

/// Global status that stays up while the lance field is active.
pub const BURST_STATUS: &str = "rosaria-burst";
/// Modifier key of the crit share handed to the rest of the party.
pub const A4_KEY: &str = "rosaria-a4";
pub const C6_KEY: &str = "rosaria-c6";

pub const BURST_HIT_1: TalentTable = TalentTable::scaled(1.04, &ELEMENTAL);
pub const BURST_HIT_2: TalentTable = TalentTable::scaled(1.52, &ELEMENTAL);
pub const BURST_DOT: TalentTable = TalentTable::scaled(1.32, &ELEMENTAL);

const HIT_1_FRAME: i64 = 15;
const LANCE_FRAME: i64 = 56;
const FIELD_DURATION: u64 = 510;
const C2_EXTENSION: u64 = 240;
const DOT_INTERVAL: usize = 120;
const A4_DURATION: u64 = 600;
const C6_DURATION: u64 = 600;
const C6_SHRED: f64 = 0.2;
const COOLDOWN: u64 = 15 * 60;
const ENERGY_DRAIN_DELAY: i64 = 6;

fn burst_frames() -> FrameTable {
    FrameTable::uniform(70)
        .with(ActionKind::Dash, 57)
        .with(ActionKind::Jump, 59)
        .with(ActionKind::Swap, 69)
}

#[derive(Clone, Debug)]
pub struct Rosaria {
    a4_cap: f64,
}

impl Rosaria {
    pub fn new(config: &ContentConfig) -> Self {
        Self {
            a4_cap: config.rosaria_a4_cap,
        }
    }

    /// Physical RES shred on every target a burst hit lands on.
    fn c6(constellation: u8) -> Option<OnHit> {
        if constellation < 6 {
            return None;
        }
        let on_hit: OnHit = Rc::new(|engine: &mut Engine, event: &HitEvent| {
            engine.add_modifier(
                event.target,
                StatMod::snapshot(C6_KEY, Stat::PhysicalResShred, C6_SHRED, Duration::Frames(C6_DURATION)),
            )
        });
        Some(on_hit)
    }

    fn burst(&self, engine: &mut Engine, actor: CharIndex, params: &Params) -> Result<ActionInfo, SimError> {
        params.expect_only(ActionKind::Burst, &[])?;
        let profile = &engine.character(actor)?.profile;
        let level = profile.talents.burst;
        let constellation = profile.constellation;
        let c6 = Self::c6(constellation);

        let hit_1 = AttackInfo::new(actor, "Rites of Termination (Hit 1)", AttackTag::ElementalBurst)
            .strike(StrikeType::Slash)
            .element(Element::Cryo, 25.0)
            .multiplier(BURST_HIT_1.at(level))
            .hitlag(engine.config().seconds(0.06), 0.01);
        let hit_2 = hit_1
            .clone()
            .labeled("Rites of Termination (Hit 2)")
            .strike(StrikeType::Default)
            .multiplier(BURST_HIT_2.at(level))
            .without_hitlag();

        engine.resolve(
            AttackRequest::new(hit_1, AttackPattern::circle_on_player(0.5, 3.5))
                .with_delay(HIT_1_FRAME)
                .with_optional_callback(c6.clone()),
        )?;

        let mut duration = FIELD_DURATION;
        if constellation >= 2 {
            duration += C2_EXTENSION;
        }
        engine.schedule_for(actor, LANCE_FRAME, "rosaria lance", move |e| {
            e.resolve(
                AttackRequest::new(hit_2, AttackPattern::circle_on_player(3.0, 6.0))
                    .with_optional_callback(c6.clone()),
            )?;

            let field = StatusKey::global(BURST_STATUS);
            e.add_status_for(field.clone(), Duration::FramesWithHitlag(duration));

            let dot = AttackInfo::new(actor, "Rites of Termination (DoT)", AttackTag::ElementalBurst)
                .element(Element::Cryo, 25.0)
                .multiplier(BURST_DOT.at(level));
            for travel in (DOT_INTERVAL..duration as usize).step_by(DOT_INTERVAL) {
                e.resolve(
                    AttackRequest::new(dot.clone(), AttackPattern::circle_on_player(3.0, 6.5))
                        .with_travel(travel as i64)
                        .with_guard(field.clone())
                        .with_optional_callback(c6.clone()),
                )?;
            }
            Ok(())
        })?;

        self.share_crit(engine, actor)?;

        engine.set_cooldown(actor, ActionKind::Burst, COOLDOWN)?;
        engine.schedule_for(actor, ENERGY_DRAIN_DELAY, "rosaria energy", move |e| {
            e.drain_energy(actor)?;
            Ok(())
        })?;

        Ok(ActionInfo::new(burst_frames(), 57, AnimationState::Burst))
    }

    /// A4: 15 % of Rosaria's crit rate at cast, capped, to every other
    /// party member.
    fn share_crit(&self, engine: &mut Engine, actor: CharIndex) -> Result<(), SimError> {
        let share = (0.15 * engine.stat(actor, Stat::CritRate)?).min(self.a4_cap);
        for member in engine.party_indices().filter(|&index| index != actor) {
            engine.add_modifier(
                member,
                StatMod::snapshot(A4_KEY, Stat::CritRate, share, Duration::FramesWithHitlag(A4_DURATION)),
            )?;
        }
        tracing::debug!(
            frame = engine.now().0,
            %actor,
            crit_share = share,
            ends_on = (engine.now() + A4_DURATION).0,
            "rosaria a4 activation"
        );
        Ok(())
    }
}

impl Kit for Rosaria {
    fn name(&self) -> &str {
        "rosaria"
    }

    fn supports(&self, kind: ActionKind) -> bool {
        kind == ActionKind::Burst
    }

    fn check(&self, engine: &Engine, actor: CharIndex, kind: ActionKind, _params: &Params) -> Result<(), SimError> {
        let energy = &engine.character(actor)?.energy;
        if kind == ActionKind::Burst && !energy.is_full() {
            return Err(ActionError::InsufficientEnergy {
                actor,
                have: energy.current(),
                need: energy.max(),
            }
            .into());
        }
        Ok(())
    }

    fn invoke(
        &self,
        engine: &mut Engine,
        actor: CharIndex,
        kind: ActionKind,
        params: &Params,
    ) -> Result<ActionInfo, SimError> {
        match kind {
            ActionKind::Burst => self.burst(engine, actor, params),
            _ => Err(ActionError::Unsupported { actor, action: kind }.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn burst_frames_open_dash_first() {
        let table = burst_frames();
        assert_eq!(table.earliest_cancel(), 57);
        assert_eq!(table.get(ActionKind::Swap), Some(69));
        assert_eq!(table.get(ActionKind::Attack), Some(70));
    }

    #[test]
    fn c6_callback_needs_six_constellations() {
        assert!(Rosaria::c6(5).is_none());
        assert!(Rosaria::c6(6).is_some());
    }

    #[test]
    fn talent_tables_use_burst_level() {
        assert_eq!(BURST_HIT_1.at(1), 1.04);
        assert!(BURST_DOT.at(13) > BURST_DOT.at(10));
    }
}
