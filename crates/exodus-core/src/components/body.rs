use glam::Vec2;

use crate::core::math::{to_degrees, Rect};

/// Spatial state shared by every world entity and planet resident:
/// position, size, heading, plus the deletion and visibility flags the
/// owning collection polls between passes.
///
/// `size` is a full extent (the diameter for round things); distance and
/// radius math halve it. `rot` is in degrees and unnormalized — callers
/// compare headings through `angle_diff`, never by raw value.
#[derive(Debug, Clone)]
pub struct Body {
    pub pos: Vec2,
    pub size: Vec2,
    pub rot: f32,
    deleted: bool,
    visible: bool,
}

impl Body {
    pub fn new(pos: Vec2, size: Vec2) -> Self {
        Body {
            pos,
            size,
            rot: 0.0,
            deleted: false,
            visible: false,
        }
    }

    /// Conservative cull box: the position padded by the full size on each
    /// side. Twice as large as the drawn footprint, which only costs a few
    /// extra draws at the view edge.
    pub fn bounding_box(&self) -> Rect {
        Rect::new(self.pos - self.size, self.pos + self.size)
    }

    /// Approximate surface-to-surface gap: center distance minus the mean of
    /// the two Y extents. Zero or less means contact. Used uniformly for the
    /// ship and for round planets, where `size.y / 2` is the radius.
    pub fn distance_to(&self, other: &Body) -> f32 {
        self.pos.distance(other.pos) - (self.size.y + other.size.y) / 2.0
    }

    /// Bearing from this body to `other`, in [0, 360) with 0° = up.
    pub fn angle_to(&self, other: &Body) -> f32 {
        let d = other.pos - self.pos;
        (to_degrees(d.y.atan2(d.x)) + 90.0 + 360.0) % 360.0
    }

    /// Flag this body for removal at the end of the current update pass.
    /// The owning collection compacts after the pass, never mid-iteration.
    pub fn delete(&mut self) {
        self.deleted = true;
    }

    pub fn to_be_deleted(&self) -> bool {
        self.deleted
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounding_box_pads_by_full_size() {
        let body = Body::new(Vec2::new(10.0, 20.0), Vec2::new(4.0, 6.0));
        let bb = body.bounding_box();
        assert_eq!(bb.min, Vec2::new(6.0, 14.0));
        assert_eq!(bb.max, Vec2::new(14.0, 26.0));
    }

    #[test]
    fn distance_to_subtracts_mean_y_extent() {
        let a = Body::new(Vec2::ZERO, Vec2::new(40.0, 48.0));
        let b = Body::new(Vec2::new(0.0, 100.0), Vec2::new(80.0, 80.0));
        // 100 - (48 + 80) / 2 = 36
        assert!((a.distance_to(&b) - 36.0).abs() < 1e-4);
    }

    #[test]
    fn angle_to_uses_up_is_zero_convention() {
        let center = Body::new(Vec2::ZERO, Vec2::ZERO);
        let above = Body::new(Vec2::new(0.0, -100.0), Vec2::ZERO);
        let right = Body::new(Vec2::new(100.0, 0.0), Vec2::ZERO);
        let below = Body::new(Vec2::new(0.0, 100.0), Vec2::ZERO);
        assert!((center.angle_to(&above) - 0.0).abs() < 1e-4);
        assert!((center.angle_to(&right) - 90.0).abs() < 1e-4);
        assert!((center.angle_to(&below) - 180.0).abs() < 1e-4);
    }

    #[test]
    fn delete_is_a_flag_not_a_removal() {
        let mut body = Body::new(Vec2::ZERO, Vec2::ZERO);
        assert!(!body.to_be_deleted());
        body.delete();
        assert!(body.to_be_deleted());
    }
}
