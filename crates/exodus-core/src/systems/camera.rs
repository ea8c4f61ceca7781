use glam::Vec2;

use crate::api::types::EntityId;
use crate::core::math::Rect;

/// Zoom smoothing factor: each frame closes `1 - SMOOTHING^(dt * 60)` of
/// the remaining gap to the target, so the rate is frame-rate independent.
const ZOOM_SMOOTHING: f32 = 0.9;

/// World-to-screen mapping for one frame: `screen = world * scale + offset`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewTransform {
    pub scale: f32,
    pub offset: Vec2,
}

/// Focus-tracking camera with thrust-driven zoom.
///
/// Position snaps to the focused entity every frame; zoom eases toward a
/// target derived from the focused ship's thrust, so the view pulls back
/// smoothly as the ship speeds up and never jumps.
#[derive(Debug, Clone)]
pub struct Camera {
    focus: Option<EntityId>,
    pos: Vec2,
    zoom: f32,
    zoom_target: f32,
    pixel_scale: f32,
    viewport: Vec2,
}

impl Camera {
    pub fn new(viewport_width: f32, viewport_height: f32) -> Self {
        Camera {
            focus: None,
            pos: Vec2::ZERO,
            zoom: 1.0,
            zoom_target: 1.0,
            pixel_scale: 1.0,
            viewport: Vec2::new(viewport_width, viewport_height),
        }
    }

    pub fn with_pixel_scale(mut self, pixel_scale: f32) -> Self {
        self.pixel_scale = pixel_scale;
        self
    }

    pub fn focus_entity(&mut self, id: EntityId) {
        self.focus = Some(id);
    }

    pub fn focused(&self) -> Option<EntityId> {
        self.focus
    }

    pub fn clear_focus(&mut self) {
        self.focus = None;
    }

    /// Viewport resize (e.g. on window resize in the shell).
    pub fn resize(&mut self, width: f32, height: f32) {
        self.viewport = Vec2::new(width, height);
    }

    pub fn set_pixel_scale(&mut self, pixel_scale: f32) {
        self.pixel_scale = pixel_scale;
    }

    pub fn pos(&self) -> Vec2 {
        self.pos
    }

    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    /// Track the focused object for this frame. `focus_pos` is the focused
    /// entity's position (None keeps the camera where it is); `focus_thrust`
    /// drives the zoom-out target.
    pub fn update(&mut self, dt: f32, focus_pos: Option<Vec2>, focus_thrust: f32) {
        if let Some(pos) = focus_pos {
            self.pos = pos;
        }

        self.zoom_target = (focus_thrust.abs().sqrt() / 2.0).max(1.0);

        let lerp = 1.0 - ZOOM_SMOOTHING.powf(dt * 60.0);
        self.zoom += (self.zoom_target - self.zoom) * lerp;
    }

    /// The visible world rectangle, for culling and the interstellar check.
    pub fn view_rect(&self) -> Rect {
        let half = self.viewport * self.zoom / self.pixel_scale / 2.0;
        Rect::from_center_half(self.pos, half)
    }

    /// The viewport in screen coordinates, for overlay placement.
    pub fn screen_rect(&self) -> Rect {
        Rect::new(Vec2::ZERO, self.viewport)
    }

    /// The transform that centers the focused object at the current zoom
    /// and device pixel density.
    pub fn transform(&self) -> ViewTransform {
        let scale = self.pixel_scale / self.zoom;
        ViewTransform {
            scale,
            offset: self.viewport / 2.0 - self.pos * scale,
        }
    }

    pub fn world_to_screen(&self, world: Vec2) -> Vec2 {
        let t = self.transform();
        world * t.scale + t.offset
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snaps_to_focus_position() {
        let mut cam = Camera::new(800.0, 600.0);
        cam.update(0.016, Some(Vec2::new(500.0, -300.0)), 0.0);
        assert_eq!(cam.pos(), Vec2::new(500.0, -300.0));
    }

    #[test]
    fn zoom_target_follows_thrust() {
        let mut cam = Camera::new(800.0, 600.0);
        // Low thrust: stays at the 1.0 floor.
        cam.update(0.016, None, 1.0);
        assert_eq!(cam.zoom_target, 1.0);
        // sqrt(100)/2 = 5.
        cam.update(0.016, None, 100.0);
        assert_eq!(cam.zoom_target, 5.0);
        // Reverse thrust zooms out the same way.
        cam.update(0.016, None, -100.0);
        assert_eq!(cam.zoom_target, 5.0);
    }

    #[test]
    fn zoom_eases_instead_of_snapping() {
        let mut cam = Camera::new(800.0, 600.0);
        cam.update(0.016, None, 400.0); // target 10
        assert!(cam.zoom() > 1.0 && cam.zoom() < 10.0);

        let mut last = cam.zoom();
        for _ in 0..300 {
            cam.update(0.016, None, 400.0);
            assert!(cam.zoom() >= last);
            last = cam.zoom();
        }
        assert!((cam.zoom() - 10.0).abs() < 0.01, "converges to target");
    }

    #[test]
    fn view_rect_grows_with_zoom() {
        let mut cam = Camera::new(800.0, 600.0);
        let base = cam.view_rect();
        assert_eq!(base.width(), 800.0);

        for _ in 0..600 {
            cam.update(0.016, None, 16.0); // target 2
        }
        let zoomed = cam.view_rect();
        assert!((zoomed.width() - 1600.0).abs() < 1.0);
    }

    #[test]
    fn transform_centers_focus() {
        let mut cam = Camera::new(800.0, 600.0);
        cam.update(0.016, Some(Vec2::new(100.0, 200.0)), 0.0);
        let screen = cam.world_to_screen(Vec2::new(100.0, 200.0));
        assert!((screen - Vec2::new(400.0, 300.0)).length() < 1e-3);
    }

    #[test]
    fn pixel_scale_shrinks_visible_area() {
        let cam = Camera::new(800.0, 600.0).with_pixel_scale(2.0);
        assert_eq!(cam.view_rect().width(), 400.0);
    }
}
