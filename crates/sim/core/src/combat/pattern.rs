//! Target-selection shapes.
//!
//! A pattern only records *how* to place the shape. It is turned into
//! concrete geometry at resolution time against the roster as it is then,
//! so targets that moved, spawned or died in the meantime are handled.

use super::geometry::{Circle, Point, Rect};
use super::target::{CombatRoster, Target};

#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AttackPattern {
    /// Circle centered on the player, offset in the player's facing frame.
    CircleOnPlayer { offset: Point, radius: f64 },
    /// Circle centered on the primary target.
    CircleOnTarget { offset: Point, radius: f64 },
    /// Box anchored on the primary target and oriented along the
    /// player→target line. The near edge sits `offset` along that line
    /// from the target; the box extends `height` further along it.
    BoxOnTarget { offset: f64, width: f64, height: f64 },
}

/// Concrete geometry of a pattern at one instant.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Shape {
    Circle(Circle),
    Rect(Rect),
}

impl Shape {
    pub fn intersects(&self, target: &Target) -> bool {
        let hitbox = target.hitbox();
        match self {
            Shape::Circle(circle) => circle.intersects_circle(&hitbox),
            Shape::Rect(rect) => rect.intersects_circle(&hitbox),
        }
    }
}

impl AttackPattern {
    pub fn circle_on_player(offset_y: f64, radius: f64) -> Self {
        AttackPattern::CircleOnPlayer {
            offset: Point::new(0.0, offset_y),
            radius,
        }
    }

    pub fn circle_on_target(radius: f64) -> Self {
        AttackPattern::CircleOnTarget {
            offset: Point::ORIGIN,
            radius,
        }
    }

    pub fn box_on_target(offset: f64, width: f64, height: f64) -> Self {
        AttackPattern::BoxOnTarget {
            offset,
            width,
            height,
        }
    }

    /// Places the pattern; `None` when it needs a primary target and there
    /// is none.
    pub fn shape(&self, roster: &CombatRoster) -> Option<Shape> {
        let facing = roster.facing();
        match *self {
            AttackPattern::CircleOnPlayer { offset, radius } => Some(Shape::Circle(Circle {
                center: roster.player + facing.rotate_local(offset),
                radius,
            })),
            AttackPattern::CircleOnTarget { offset, radius } => {
                let target = roster.primary()?;
                Some(Shape::Circle(Circle {
                    center: target.pos + facing.rotate_local(offset),
                    radius,
                }))
            }
            AttackPattern::BoxOnTarget {
                offset,
                width,
                height,
            } => {
                let target = roster.primary()?;
                Some(Shape::Rect(Rect {
                    base: target.pos + facing * offset,
                    dir: facing,
                    width,
                    height,
                }))
            }
        }
    }

    /// Keys of every live target the pattern touches, in roster order.
    pub fn select(&self, roster: &CombatRoster) -> Vec<crate::types::TargetKey> {
        let Some(shape) = self.shape(roster) else {
            return Vec::new();
        };
        roster
            .iter()
            .filter(|target| shape.intersects(target))
            .map(|target| target.key)
            .collect()
    }
}
