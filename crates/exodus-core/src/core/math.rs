//! Angle and rectangle math for the simulation.
//!
//! All gameplay angles are in degrees, unnormalized (they may exceed ±360°);
//! the convention is 0° = "up" (negative Y), increasing clockwise. Vector
//! arithmetic itself comes from `glam`.

use glam::Vec2;

pub fn to_radians(degrees: f32) -> f32 {
    degrees * std::f32::consts::PI / 180.0
}

pub fn to_degrees(radians: f32) -> f32 {
    radians * 180.0 / std::f32::consts::PI
}

/// Signed difference `a - b`, wrapped into [-180, 180).
///
/// The double offset-and-wrap is deliberate: `%` keeps the sign of the
/// dividend, so a single wrap goes negative for angles left of the
/// ±180° boundary.
pub fn angle_diff(a: f32, b: f32) -> f32 {
    ((a - b + 180.0) % 360.0 + 360.0) % 360.0 - 180.0
}

/// Displacement of magnitude `a` along heading `angle` (degrees).
/// Heading 0° points up (negative Y), 90° points right.
pub fn angle_movement(angle: f32, a: f32) -> Vec2 {
    let rads = to_radians(angle);
    Vec2::new(rads.sin() * a, -rads.cos() * a)
}

/// An axis-aligned rectangle in world space, stored as min/max corners.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub min: Vec2,
    pub max: Vec2,
}

impl Rect {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Rect { min, max }
    }

    pub fn from_center_half(center: Vec2, half: Vec2) -> Self {
        Rect {
            min: center - half,
            max: center + half,
        }
    }

    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }

    pub fn center(&self) -> Vec2 {
        (self.min + self.max) / 2.0
    }

    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }

    pub fn intersects(&self, other: &Rect) -> bool {
        self.min.x < other.max.x
            && self.min.y < other.max.y
            && self.max.x > other.min.x
            && self.max.y > other.min.y
    }
}
