//! Planar hit-testing primitives.

use std::ops::{Add, Mul, Sub};

#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ORIGIN: Self = Self { x: 0.0, y: 0.0 };
    /// Facing used when two positions coincide.
    pub const FORWARD: Self = Self { x: 0.0, y: 1.0 };

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn magnitude(self) -> f64 {
        self.x.hypot(self.y)
    }

    pub fn dot(self, other: Point) -> f64 {
        self.x * other.x + self.y * other.y
    }

    /// Unit vector, or [`Point::FORWARD`] for the zero vector.
    pub fn normalized(self) -> Point {
        let len = self.magnitude();
        if len <= f64::EPSILON {
            Point::FORWARD
        } else {
            Point::new(self.x / len, self.y / len)
        }
    }

    /// Right-hand perpendicular of a facing vector.
    pub fn perpendicular(self) -> Point {
        Point::new(self.y, -self.x)
    }

    /// Maps `local` (x across, y along) into world space for this facing.
    pub fn rotate_local(self, local: Point) -> Point {
        self.perpendicular() * local.x + self * local.y
    }
}

impl Add for Point {
    type Output = Point;
    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Point;
    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f64> for Point {
    type Output = Point;
    fn mul(self, rhs: f64) -> Point {
        Point::new(self.x * rhs, self.y * rhs)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Circle {
    pub center: Point,
    pub radius: f64,
}

impl Circle {
    pub fn intersects_circle(&self, other: &Circle) -> bool {
        (self.center - other.center).magnitude() <= self.radius + other.radius
    }
}

/// Oriented rectangle described by the midpoint of its near edge.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub base: Point,
    /// Unit vector pointing from the near edge into the box.
    pub dir: Point,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn intersects_circle(&self, circle: &Circle) -> bool {
        let rel = circle.center - self.base;
        let along = rel.dot(self.dir);
        let across = rel.dot(self.dir.perpendicular());

        let half = self.width / 2.0;
        let nearest_along = along.clamp(0.0, self.height);
        let nearest_across = across.clamp(-half, half);

        let dx = along - nearest_along;
        let dy = across - nearest_across;
        dx.hypot(dy) <= circle.radius
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn circles_touching_edges_intersect() {
        let a = Circle {
            center: Point::ORIGIN,
            radius: 1.0,
        };
        let b = Circle {
            center: Point::new(3.0, 0.0),
            radius: 2.0,
        };
        let c = Circle {
            center: Point::new(3.1, 0.0),
            radius: 2.0,
        };
        assert!(a.intersects_circle(&b));
        assert!(!a.intersects_circle(&c));
    }

    #[test]
    fn rect_covers_its_extent_only() {
        let rect = Rect {
            base: Point::ORIGIN,
            dir: Point::FORWARD,
            width: 0.1,
            height: 10.0,
        };
        let inside = Circle {
            center: Point::new(0.0, 9.0),
            radius: 0.5,
        };
        let behind = Circle {
            center: Point::new(0.0, -2.0),
            radius: 0.5,
        };
        let beside = Circle {
            center: Point::new(1.0, 5.0),
            radius: 0.5,
        };
        assert!(rect.intersects_circle(&inside));
        assert!(!rect.intersects_circle(&behind));
        assert!(!rect.intersects_circle(&beside));
    }

    #[test]
    fn local_offsets_follow_facing() {
        let facing = Point::new(1.0, 0.0);
        let moved = facing.rotate_local(Point::new(0.0, 2.0));
        assert_eq!(moved, Point::new(2.0, 0.0));
        assert_eq!(Point::ORIGIN.normalized(), Point::FORWARD);
    }
}
