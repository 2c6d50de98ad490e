//! Enemy targets and the live roster.

use std::collections::BTreeMap;

use super::attack::Element;
use super::geometry::{Circle, Point};
use super::CombatError;
use crate::types::TargetKey;

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Target {
    pub key: TargetKey,
    pub pos: Point,
    pub radius: f64,
    pub level: u32,
    /// Whether the target exposes a weak point that shots can headshot.
    pub weak_point: bool,
    /// Base resistance for elements not listed in `resistances`.
    pub base_resistance: f64,
    pub resistances: BTreeMap<Element, f64>,
    #[cfg_attr(feature = "serde", serde(skip))]
    pub damage_taken: f64,
    #[cfg_attr(feature = "serde", serde(skip))]
    pub hits_taken: u32,
    /// Total durability of elements actually applied.
    #[cfg_attr(feature = "serde", serde(skip))]
    pub applied_durability: f64,
}

impl Target {
    pub fn new(key: TargetKey, pos: Point) -> Self {
        Self {
            key,
            pos,
            radius: 1.0,
            level: 100,
            weak_point: true,
            base_resistance: 0.1,
            resistances: BTreeMap::new(),
            damage_taken: 0.0,
            hits_taken: 0,
            applied_durability: 0.0,
        }
    }

    #[must_use]
    pub fn with_level(mut self, level: u32) -> Self {
        self.level = level;
        self
    }

    #[must_use]
    pub fn with_radius(mut self, radius: f64) -> Self {
        self.radius = radius;
        self
    }

    #[must_use]
    pub fn with_resistance(mut self, element: Element, res: f64) -> Self {
        self.resistances.insert(element, res);
        self
    }

    pub fn resistance(&self, element: Element) -> f64 {
        self.resistances
            .get(&element)
            .copied()
            .unwrap_or(self.base_resistance)
    }

    pub fn hitbox(&self) -> Circle {
        Circle {
            center: self.pos,
            radius: self.radius,
        }
    }
}

/// Player position plus the live targets, in insertion order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CombatRoster {
    pub player: Point,
    targets: Vec<Target>,
    primary: Option<TargetKey>,
}

impl CombatRoster {
    pub fn new(player: Point) -> Self {
        Self {
            player,
            targets: Vec::new(),
            primary: None,
        }
    }

    /// Adds a target. The first target added becomes primary.
    pub fn add(&mut self, target: Target) {
        self.primary.get_or_insert(target.key);
        self.targets.push(target);
    }

    /// Removes a target (killed or despawned). Pending attacks simply stop
    /// matching it.
    pub fn remove(&mut self, key: TargetKey) -> Option<Target> {
        let index = self.targets.iter().position(|t| t.key == key)?;
        let removed = self.targets.remove(index);
        if self.primary == Some(key) {
            self.primary = self.targets.first().map(|t| t.key);
        }
        Some(removed)
    }

    pub fn set_primary(&mut self, key: TargetKey) -> Result<(), CombatError> {
        self.get(key)?;
        self.primary = Some(key);
        Ok(())
    }

    pub fn primary(&self) -> Option<&Target> {
        self.primary.and_then(|key| self.targets.iter().find(|t| t.key == key))
    }

    pub fn get(&self, key: TargetKey) -> Result<&Target, CombatError> {
        self.targets
            .iter()
            .find(|t| t.key == key)
            .ok_or(CombatError::UnknownTarget { key })
    }

    pub fn get_mut(&mut self, key: TargetKey) -> Result<&mut Target, CombatError> {
        self.targets
            .iter_mut()
            .find(|t| t.key == key)
            .ok_or(CombatError::UnknownTarget { key })
    }

    pub fn iter(&self) -> impl Iterator<Item = &Target> {
        self.targets.iter()
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    /// Unit vector from the player toward the primary target.
    pub fn facing(&self) -> Point {
        match self.primary() {
            Some(target) => (target.pos - self.player).normalized(),
            None => Point::FORWARD,
        }
    }
}
