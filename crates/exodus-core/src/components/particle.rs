use glam::Vec2;

use crate::api::types::Color;
use crate::core::math::angle_movement;
use crate::core::rng::Rng;

/// Explosion debris palette, hottest to darkest.
const EXPLOSION_COLORS: [Color; 4] = [
    Color::rgb(0xff, 0x57, 0x33),
    Color::rgb(0xc7, 0x00, 0x39),
    Color::rgb(0x90, 0x0c, 0x3f),
    Color::rgb(0x58, 0x18, 0x45),
];

/// A short-lived visual effect: a colored disc drifting along a fixed
/// heading while fading out. Particles never collide and never interact
/// with entities; the world keeps them in their own collection.
#[derive(Debug, Clone)]
pub struct Particle {
    pub pos: Vec2,
    pub size: Vec2,
    pub rot: f32,
    /// Drift speed in world units per second along `rot`.
    pub speed: f32,
    pub scale: f32,
    pub opacity: f32,
    pub color: Color,
    decay_in: f32,
    decay_start: f32,
}

impl Particle {
    pub fn new(pos: Vec2, size: Vec2, rot: f32, speed: f32, decay_in: f32, color: Color) -> Self {
        Particle {
            pos,
            size,
            rot,
            speed,
            scale: 1.0,
            opacity: 1.0,
            color,
            decay_in,
            decay_start: decay_in,
        }
    }

    /// One debris fragment of a planet or ship explosion: random outward
    /// heading, optionally offset from the center by `distance` along that
    /// heading. Smaller fragments fly faster when no speed is given.
    pub fn explosion(rng: &mut Rng, pos: Vec2, size: Vec2, distance: f32, speed: Option<f32>) -> Self {
        let color = EXPLOSION_COLORS[rng.next_int(4) as usize];
        let rot = rng.range(0.0, 360.0);
        let offset_pos = pos + angle_movement(rot, distance);
        let speed = speed.unwrap_or(80.0 / (15.5 - size.x));
        let decay_in = rng.range(1.0, 5.0);
        Particle::new(offset_pos, size, rot, speed, decay_in, color)
    }

    /// The single white flash left where a destroyed planet stood.
    pub fn implosion(pos: Vec2, size: Vec2) -> Self {
        Particle::new(pos, size, 0.0, 0.0, 3.0, Color::WHITE)
    }

    pub fn update(&mut self, dt: f32) {
        self.pos += angle_movement(self.rot, self.speed * dt);
        self.opacity = self.decay_in / self.decay_start;
        self.decay_in = (self.decay_in - dt).max(0.0);
    }

    pub fn is_dead(&self) -> bool {
        self.decay_in <= 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dies_exactly_when_decay_elapses() {
        let mut p = Particle::new(Vec2::ZERO, Vec2::splat(2.0), 0.0, 0.0, 2.0, Color::WHITE);
        let mut elapsed = 0.0;
        while elapsed < 2.0 - 1e-6 {
            assert!(!p.is_dead(), "died early at {elapsed}");
            p.update(0.25);
            elapsed += 0.25;
        }
        p.update(0.25);
        assert!(p.is_dead());
    }

    #[test]
    fn opacity_decreases_monotonically_to_zero() {
        let mut p = Particle::new(Vec2::ZERO, Vec2::splat(2.0), 0.0, 0.0, 2.0, Color::WHITE);
        let mut last = f32::INFINITY;
        for _ in 0..10 {
            p.update(0.25);
            assert!(p.opacity <= last);
            last = p.opacity;
        }
        assert_eq!(p.opacity, 0.0);
    }

    #[test]
    fn drifts_along_heading() {
        let mut p = Particle::new(Vec2::ZERO, Vec2::splat(2.0), 90.0, 10.0, 5.0, Color::WHITE);
        p.update(1.0);
        assert!((p.pos.x - 10.0).abs() < 1e-4);
        assert!(p.pos.y.abs() < 1e-4);
    }

    #[test]
    fn explosion_fragments_spread() {
        let mut rng = Rng::new(3);
        let a = Particle::explosion(&mut rng, Vec2::ZERO, Vec2::splat(8.0), 100.0, None);
        let b = Particle::explosion(&mut rng, Vec2::ZERO, Vec2::splat(8.0), 100.0, None);
        assert!(a.rot != b.rot);
        assert!((a.pos.length() - 100.0).abs() < 1e-3);
    }
}
