//! Attack descriptions.
//!
//! An [`AttackInfo`] is an immutable value describing a single hit. Multi-hit
//! abilities build one per sub-hit by cloning a template and overriding the
//! label and multiplier, so later edits to the template never leak into hits
//! that were already queued.

use bitflags::bitflags;
use strum::{AsRefStr, Display, EnumCount, EnumIter};

use super::icd::{IcdGroup, IcdTag};
use crate::stats::Stat;
use crate::types::CharIndex;

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, EnumCount, EnumIter, AsRefStr, Display,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Element {
    Physical,
    Pyro,
    Hydro,
    Electro,
    Cryo,
    Anemo,
    Geo,
    Dendro,
}

impl Element {
    /// Damage bonus stat matching this element.
    pub const fn bonus_stat(self) -> Stat {
        match self {
            Element::Physical => Stat::PhysicalBonus,
            Element::Pyro => Stat::PyroBonus,
            Element::Hydro => Stat::HydroBonus,
            Element::Electro => Stat::ElectroBonus,
            Element::Cryo => Stat::CryoBonus,
            Element::Anemo => Stat::AnemoBonus,
            Element::Geo => Stat::GeoBonus,
            Element::Dendro => Stat::DendroBonus,
        }
    }

    /// Resistance shred stat that lowers this element's resistance.
    pub const fn shred_stat(self) -> Stat {
        match self {
            Element::Physical => Stat::PhysicalResShred,
            _ => Stat::ResShred,
        }
    }
}

/// Which talent produced the hit; buffs filter on this.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, AsRefStr, Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum AttackTag {
    Normal,
    /// Charged and aimed shots.
    Extra,
    Plunge,
    ElementalArt,
    ElementalBurst,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, AsRefStr, Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum StrikeType {
    #[default]
    Default,
    Slash,
    Pierce,
    Blunt,
    Spear,
}

bitflags! {
    /// Boolean properties of an attack.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct AttackFlags: u8 {
        const DEFENSE_HALTABLE     = 1 << 0;
        const HITLAG_HEADSHOT_ONLY = 1 << 1;
        const DEPLOYABLE           = 1 << 2;
        const IGNORE_INFUSION      = 1 << 3;
        /// Scale off DEF instead of ATK.
        const USE_DEF              = 1 << 4;
        const HIT_WEAK_POINT       = 1 << 5;
    }
}

/// Combat freeze requested by a hit, in frames (may be fractional).
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HitlagSpec {
    pub halt_frames: f64,
    pub factor: f64,
}

impl HitlagSpec {
    pub const NONE: Self = Self {
        halt_frames: 0.0,
        factor: 0.0,
    };

    pub fn is_none(&self) -> bool {
        self.halt_frames <= 0.0
    }
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AttackInfo {
    pub actor: CharIndex,
    pub label: String,
    pub tag: AttackTag,
    pub icd_tag: IcdTag,
    pub icd_group: IcdGroup,
    pub strike: StrikeType,
    pub element: Element,
    pub durability: f64,
    /// Talent multiplier, already resolved for the talent level.
    pub multiplier: f64,
    pub flat_damage: f64,
    pub flags: AttackFlags,
    pub hitlag: HitlagSpec,
}

impl AttackInfo {
    /// Physical, no-ICD, 25-durability template.
    pub fn new(actor: CharIndex, label: impl Into<String>, tag: AttackTag) -> Self {
        Self {
            actor,
            label: label.into(),
            tag,
            icd_tag: IcdTag::None,
            icd_group: IcdGroup::Default,
            strike: StrikeType::Default,
            element: Element::Physical,
            durability: 25.0,
            multiplier: 0.0,
            flat_damage: 0.0,
            flags: AttackFlags::empty(),
            hitlag: HitlagSpec::NONE,
        }
    }

    #[must_use]
    pub fn labeled(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    #[must_use]
    pub fn icd(mut self, tag: IcdTag, group: IcdGroup) -> Self {
        self.icd_tag = tag;
        self.icd_group = group;
        self
    }

    #[must_use]
    pub fn strike(mut self, strike: StrikeType) -> Self {
        self.strike = strike;
        self
    }

    #[must_use]
    pub fn element(mut self, element: Element, durability: f64) -> Self {
        self.element = element;
        self.durability = durability;
        self
    }

    #[must_use]
    pub fn multiplier(mut self, multiplier: f64) -> Self {
        self.multiplier = multiplier;
        self
    }

    #[must_use]
    pub fn flat_damage(mut self, flat: f64) -> Self {
        self.flat_damage = flat;
        self
    }

    #[must_use]
    pub fn flags(mut self, flags: AttackFlags) -> Self {
        self.flags |= flags;
        self
    }

    /// Halt expressed in frames, e.g. `config.seconds(0.06)`.
    #[must_use]
    pub fn hitlag(mut self, halt_frames: f64, factor: f64) -> Self {
        self.hitlag = HitlagSpec {
            halt_frames,
            factor,
        };
        self
    }

    #[must_use]
    pub fn without_hitlag(mut self) -> Self {
        self.hitlag = HitlagSpec::NONE;
        self
    }

    pub fn has(&self, flag: AttackFlags) -> bool {
        self.flags.contains(flag)
    }
}
