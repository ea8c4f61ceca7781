//! Particle effects container.
//!
//! Owns the world's particle collection plus the seeded RNG every spawn site
//! draws from. Entities receive this by `&mut` during the update pass so they
//! can emit exhaust, debris and blood without touching the entity collection.

use glam::Vec2;

use crate::components::particle::Particle;
use crate::core::rng::Rng;

pub struct Effects {
    pub particles: Vec<Particle>,
    pub rng: Rng,
}

impl Effects {
    pub fn new(seed: u64) -> Self {
        Effects {
            particles: Vec::new(),
            rng: Rng::new(seed.wrapping_add(7919)),
        }
    }

    pub fn push(&mut self, particle: Particle) {
        self.particles.push(particle);
    }

    /// Spawn `count` explosion fragments around `pos`. Fragments start
    /// `distance` out from the center along their own heading; `speed_range`
    /// overrides the size-derived default speed when given.
    pub fn explosion_burst(
        &mut self,
        pos: Vec2,
        count: usize,
        distance: f32,
        speed_range: Option<(f32, f32)>,
    ) {
        for _ in 0..count {
            let side = self.rng.range(5.0, 15.0);
            let speed = speed_range.map(|(lo, hi)| self.rng.range(lo, hi));
            let p = Particle::explosion(&mut self.rng, pos, Vec2::splat(side), distance, speed);
            self.particles.push(p);
        }
    }

    /// Advance all particles, then drop the dead ones. Two phases on
    /// purpose: removal must not affect update order within the pass.
    pub fn tick(&mut self, dt: f32) {
        for p in &mut self.particles {
            p.update(dt);
        }
        self.particles.retain(|p| !p.is_dead());
    }

    pub fn clear(&mut self) {
        self.particles.clear();
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn burst_spawns_requested_count() {
        let mut fx = Effects::new(42);
        fx.explosion_burst(Vec2::ZERO, 25, 0.0, None);
        assert_eq!(fx.len(), 25);
    }

    #[test]
    fn tick_compacts_after_update() {
        let mut fx = Effects::new(42);
        fx.push(Particle::new(
            Vec2::ZERO,
            Vec2::splat(2.0),
            0.0,
            0.0,
            0.1,
            crate::api::types::Color::WHITE,
        ));
        fx.push(Particle::new(
            Vec2::ZERO,
            Vec2::splat(2.0),
            0.0,
            0.0,
            10.0,
            crate::api::types::Color::WHITE,
        ));
        fx.tick(0.5);
        assert_eq!(fx.len(), 1);
    }
}
