//! Sethos: aimed shots and Shadowpiercing Shot.
//!
//! Options for `aim`:
//!
//! | key        | default | meaning                                         |
//! |------------|---------|-------------------------------------------------|
//! | `hold`     | 2       | 0 aimed shot, 1 fully charged, 2 shadow pierce  |
//! | `travel`   | 10      | frames between release and impact               |
//! | `weakspot` | 0       | 1 if the arrow hits a weak point                |
//!
//! A1 converts up to 20 energy into a shorter charge, 0.285 s per point.
//! The energy is spent when the arrow is released, not at cast.

use sim_core::{
    ActionError, ActionInfo, ActionKind, AnimationState, AttackFlags, AttackInfo, AttackPattern,
    AttackRequest, AttackTag, CharIndex, Element, Engine, FrameTable, Kit, Params, SimError, Stat,
    StrikeType,
};

use super::curves::{ELEMENTAL, PHYSICAL, TalentTable};
use crate::config::ContentConfig;

pub const AIM: TalentTable = TalentTable::scaled(0.4361, &PHYSICAL);
pub const FULL_AIM: TalentTable = TalentTable::scaled(1.24, &ELEMENTAL);
pub const SHADOW_PIERCE_ATK: TalentTable = TalentTable::scaled(1.4, &ELEMENTAL);
pub const SHADOW_PIERCE_EM: TalentTable = TalentTable::scaled(1.344, &ELEMENTAL);

const HITMARKS: [u32; 3] = [15, 86, 375];
const START_CHARGE: u32 = HITMARKS[0];
const A1_SECONDS_PER_ENERGY: f64 = 0.285;
const A1_MAX_ENERGY: f64 = 20.0;
const DEFAULT_TRAVEL: i64 = 10;
/// How far past the primary target a shadow pierce keeps going.
const PIERCE_REACH: f64 = 15.0;

/// Charge level selected by the `hold` option.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AimLevel {
    Physical,
    Charged,
    ShadowPierce,
}

impl AimLevel {
    fn hitmark(self) -> u32 {
        HITMARKS[self as usize]
    }

    fn frames(self) -> FrameTable {
        let length = match self {
            AimLevel::Physical => 23,
            AimLevel::Charged => 94,
            AimLevel::ShadowPierce => 383,
        };
        let hitmark = self.hitmark();
        FrameTable::uniform(length)
            .with(ActionKind::Dash, hitmark)
            .with(ActionKind::Jump, hitmark)
    }
}

impl TryFrom<i64> for AimLevel {
    type Error = i64;

    fn try_from(hold: i64) -> Result<Self, Self::Error> {
        match hold {
            0 => Ok(AimLevel::Physical),
            1 => Ok(AimLevel::Charged),
            2 => Ok(AimLevel::ShadowPierce),
            other => Err(other),
        }
    }
}

#[derive(Clone, Debug)]
pub struct Sethos {
    lv1_energy_factor: f64,
}

impl Sethos {
    pub fn new(config: &ContentConfig) -> Self {
        Self {
            lv1_energy_factor: config.sethos_lv1_energy_factor,
        }
    }

    /// Frames A1 cuts from the charge, and the energy that pays for them.
    pub fn a1_skip(engine: &Engine, actor: CharIndex) -> Result<(u32, f64), SimError> {
        let energy = engine.energy(actor)?.min(A1_MAX_ENERGY);
        let frames = energy * A1_SECONDS_PER_ENERGY * f64::from(engine.config().frames_per_second);
        Ok((frames as u32, energy))
    }

    fn aim(&self, engine: &mut Engine, actor: CharIndex, params: &Params) -> Result<ActionInfo, SimError> {
        let action = ActionKind::Aim;
        params.expect_only(action, &["hold", "travel", "weakspot"])?;
        let aim = AimLevel::try_from(params.get_or("hold", 2)).map_err(|value| ActionError::InvalidParam {
            action,
            key: "hold".to_string(),
            value,
        })?;
        let travel = params.get_or("travel", DEFAULT_TRAVEL);
        if travel < 0 {
            return Err(ActionError::InvalidParam {
                action,
                key: "travel".to_string(),
                value: travel,
            }
            .into());
        }
        let weakspot = params.get_or("weakspot", 0) == 1;

        let hitmark = aim.hitmark();
        let (skip, energy) = Self::a1_skip(engine, actor)?;
        let skip = skip.min(hitmark - START_CHARGE);
        let release = i64::from(hitmark - skip);

        let level = engine.character(actor)?.profile.talents.attack;
        let halt = engine.config().seconds(0.12);
        let mut flags = AttackFlags::HITLAG_HEADSHOT_ONLY | AttackFlags::DEPLOYABLE;
        if weakspot {
            flags |= AttackFlags::HIT_WEAK_POINT;
        }

        match aim {
            AimLevel::Physical | AimLevel::Charged => {
                let mut shot = AttackInfo::new(actor, "Fully-Charged Aimed Shot", AttackTag::Extra)
                    .strike(StrikeType::Pierce)
                    .element(Element::Dendro, 25.0)
                    .multiplier(FULL_AIM.at(level))
                    .hitlag(halt, 0.01)
                    .flags(flags);
                if aim == AimLevel::Physical {
                    shot = shot
                        .labeled("Aimed Shot")
                        .element(Element::Physical, 25.0)
                        .multiplier(AIM.at(level));
                }
                let cost = if aim == AimLevel::Charged {
                    energy * self.lv1_energy_factor
                } else {
                    0.0
                };
                engine.schedule_for(actor, release, "sethos aimed shot", move |e| {
                    e.resolve(
                        AttackRequest::new(shot, AttackPattern::box_on_target(-0.5, 0.1, 1.0)).with_travel(travel),
                    )?;
                    if cost > 0.0 {
                        e.consume_energy_up_to(actor, cost)?;
                    }
                    Ok(())
                })?;
            }
            AimLevel::ShadowPierce => {
                engine.schedule_for(actor, release, "sethos shadow pierce", move |e| {
                    let flat = SHADOW_PIERCE_EM.at(level) * e.stat(actor, Stat::ElementalMastery)?;
                    let mut arrow = AttackInfo::new(actor, "Shadow Piercing Arrow", AttackTag::Extra)
                        .strike(StrikeType::Pierce)
                        .element(Element::Electro, 25.0)
                        .multiplier(SHADOW_PIERCE_ATK.at(level))
                        .flat_damage(flat)
                        .flags(flags);
                    if weakspot {
                        arrow = arrow.hitlag(halt, 0.01);
                    }

                    let roster = e.roster();
                    let dist = roster
                        .primary()
                        .map_or(0.0, |target| (roster.player - target.pos).magnitude());
                    let pattern = AttackPattern::box_on_target(-dist, 0.1, PIERCE_REACH + dist);
                    e.resolve(AttackRequest::new(arrow, pattern).with_travel(travel))?;
                    let spent = e.consume_energy_up_to(actor, energy)?;
                    tracing::debug!(frame = e.now().0, %actor, spent, "sethos a1 energy");
                    Ok(())
                })?;
            }
        }

        Ok(ActionInfo::new(
            aim.frames().shortened(skip),
            hitmark - skip,
            AnimationState::Aim,
        ))
    }
}

impl Kit for Sethos {
    fn name(&self) -> &str {
        "sethos"
    }

    fn supports(&self, kind: ActionKind) -> bool {
        kind == ActionKind::Aim
    }

    fn invoke(
        &self,
        engine: &mut Engine,
        actor: CharIndex,
        kind: ActionKind,
        params: &Params,
    ) -> Result<ActionInfo, SimError> {
        match kind {
            ActionKind::Aim => self.aim(engine, actor, params),
            _ => Err(ActionError::Unsupported { actor, action: kind }.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hold_levels_map_to_hitmarks() {
        assert_eq!(AimLevel::try_from(0_i64).map(AimLevel::hitmark), Ok(15));
        assert_eq!(AimLevel::try_from(1_i64).map(AimLevel::hitmark), Ok(86));
        assert_eq!(AimLevel::try_from(2_i64).map(AimLevel::hitmark), Ok(375));
        assert_eq!(AimLevel::try_from(3_i64), Err(3));
    }

    #[test]
    fn shadow_pierce_uses_the_long_table() {
        let frames = AimLevel::ShadowPierce.frames();
        assert_eq!(frames.animation_length(), 383);
        assert_eq!(frames.get(ActionKind::Dash), Some(375));
        assert_eq!(frames.get(ActionKind::Attack), Some(383));
    }
}
