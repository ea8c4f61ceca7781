use glam::Vec2;

use crate::api::score::Score;
use crate::api::types::Color;
use crate::components::body::Body;
use crate::components::particle::Particle;
use crate::core::math::{angle_diff, angle_movement};
use crate::core::rng::Rng;
use crate::systems::effects::Effects;

/// Planet size at which resident tuning constants are calibrated.
pub const REFERENCE_PLANET_SIZE: f32 = 4000.0;

/// How fast a fleeing human closes on the player's heading, deg/s.
const FLEE_TURN_SPEED: f32 = 15.0;

const TREE_SIZE: Vec2 = Vec2::new(4.0, 24.0);
const HOUSE_SIZE: Vec2 = Vec2::new(24.0, 24.0);
const HUMAN_SIZE: Vec2 = Vec2::new(4.0, 12.0);

const LEAF_COLORS: [Color; 5] = [
    Color::rgb(0xaf, 0xbd, 0x22),
    Color::rgb(0x6d, 0xb3, 0x3f),
    Color::rgb(0x00, 0x95, 0x8f),
    Color::rgb(0x00, 0xb1, 0x93),
    Color::rgb(0xa0, 0xd5, 0xb5),
];

const HEAD_COLORS: [Color; 5] = [
    Color::rgb(0xfb, 0xc5, 0xa1),
    Color::rgb(0xe3, 0x7e, 0x62),
    Color::rgb(0xfd, 0xdc, 0xab),
    Color::rgb(0xc1, 0x8c, 0x60),
    Color::rgb(0xfe, 0xc4, 0x84),
];

const BLOOD_COLOR: Color = Color::rgb(0xc7, 0x00, 0x39);

/// One canopy blob of a tree, in tree-local coordinates.
#[derive(Debug, Clone)]
pub struct Leaf {
    pub pos: Vec2,
    pub color: Color,
    pub size: f32,
}

/// Mutable state of a human resident.
#[derive(Debug, Clone)]
pub struct HumanState {
    /// Signed wander speed in deg/s before planet-size scaling.
    walk_speed: f32,
    pub body_color: Color,
    pub head_color: Color,
    /// Phase offset for the hand-waving animation.
    pub hands_offset: f32,
}

#[derive(Debug, Clone)]
pub enum ResidentKind {
    Tree { leaves: Vec<Leaf> },
    House,
    Human(HumanState),
}

/// A surface object owned by a planet: a tree, a house, or a human.
///
/// Residents have no independently meaningful position — it is recomputed
/// from scratch every frame from the owning planet's center, their own
/// surface angle, and the planet radius, so they can never drift off the
/// surface no matter how long the simulation runs.
#[derive(Debug, Clone)]
pub struct Resident {
    pub body: Body,
    pub kind: ResidentKind,
}

impl Resident {
    pub fn tree(rng: &mut Rng) -> Self {
        let leaves = (0..4)
            .map(|_| Leaf {
                pos: Vec2::new(rng.range(-4.0, 4.0), rng.range(12.0, 20.0)),
                color: LEAF_COLORS[rng.next_int(LEAF_COLORS.len() as u32) as usize],
                size: rng.range(4.0, 8.0),
            })
            .collect();
        let mut body = Body::new(Vec2::ZERO, TREE_SIZE);
        body.rot = rng.range(0.0, 360.0);
        Resident {
            body,
            kind: ResidentKind::Tree { leaves },
        }
    }

    pub fn house(rng: &mut Rng) -> Self {
        let mut body = Body::new(Vec2::ZERO, HOUSE_SIZE);
        body.rot = rng.range(0.0, 360.0);
        Resident {
            body,
            kind: ResidentKind::House,
        }
    }

    pub fn human(rng: &mut Rng) -> Self {
        let mut body = Body::new(Vec2::ZERO, HUMAN_SIZE);
        body.rot = rng.range(0.0, 360.0);
        let state = HumanState {
            walk_speed: rng.range(1.0, 2.0) * rng.sign(),
            body_color: Color::from_hsl(rng.range(0.0, 360.0), 1.0, 0.5),
            head_color: HEAD_COLORS[rng.next_int(HEAD_COLORS.len() as u32) as usize],
            hands_offset: rng.range(0.0, 1000.0),
        };
        Resident {
            body,
            kind: ResidentKind::Human(state),
        }
    }

    pub fn is_human(&self) -> bool {
        matches!(self.kind, ResidentKind::Human(_))
    }

    /// Advance one frame. `flee_target` is the landed player's heading when
    /// the owning planet is doomed and carries a player; humans then run
    /// toward it instead of wandering.
    ///
    /// Returns true when a fleeing human overshoots the target heading —
    /// it has caught up with the player and is ready for pickup.
    pub fn update(
        &mut self,
        dt: f32,
        planet_center: Vec2,
        planet_radius: f32,
        planet_rot_speed: f32,
        planet_size: f32,
        flee_target: Option<f32>,
    ) -> bool {
        let mut reached = false;

        self.body.rot += planet_rot_speed * dt;

        if let ResidentKind::Human(human) = &self.kind {
            match flee_target {
                Some(target) => {
                    let before = angle_diff(self.body.rot, target);
                    if before == 0.0 {
                        reached = true;
                    } else {
                        let step = FLEE_TURN_SPEED * dt;
                        self.body.rot += if before > 0.0 { -step } else { step };
                        let after = angle_diff(self.body.rot, target);
                        // Sign flip means we passed the player's spot: snap
                        // exactly onto it so the pickup happens in place.
                        if after == 0.0 || (after > 0.0) != (before > 0.0) {
                            self.body.rot = target;
                            reached = true;
                        }
                    }
                }
                None => {
                    // Wander speed scales inversely with planet size so
                    // residents on small planets cover the same fraction of
                    // circumference per second.
                    self.body.rot +=
                        human.walk_speed * (REFERENCE_PLANET_SIZE / planet_size) * dt;
                }
            }
        }

        // Recomputed from scratch, never integrated.
        self.body.pos = planet_center + angle_movement(self.body.rot, planet_radius);

        reached
    }

    /// Kill this resident (ship strike or collateral): flags it deleted,
    /// bumps the killed counter for humans, and sprays a short-lived burst
    /// of red particles.
    pub fn kill(&mut self, fx: &mut Effects, score: &mut Score) {
        if self.body.to_be_deleted() {
            return;
        }
        self.body.delete();
        if self.is_human() {
            score.killed_people += 1;
        }
        for _ in 0..20 {
            let rot = fx.rng.range(0.0, 360.0);
            let speed = fx.rng.range(20.0, 60.0);
            let decay = fx.rng.range(0.5, 1.5);
            fx.push(Particle::new(
                self.body.pos,
                Vec2::splat(1.5),
                rot,
                speed,
                decay,
                BLOOD_COLOR,
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn position_recomputed_from_planet_each_frame() {
        let mut rng = Rng::new(5);
        let mut tree = Resident::tree(&mut rng);
        let center = Vec2::new(100.0, -50.0);
        let radius = 400.0;
        for _ in 0..50 {
            tree.update(0.016, center, radius, 3.0, 800.0, None);
            let expected = center + angle_movement(tree.body.rot, radius);
            assert!((tree.body.pos - expected).length() < 1e-3);
        }
    }

    #[test]
    fn human_wander_scales_with_planet_size() {
        let mut rng = Rng::new(9);
        let mut small = Resident::human(&mut rng);
        let mut large = small.clone();
        small.body.rot = 0.0;
        large.body.rot = 0.0;

        // No planet spin so only the walk contributes.
        small.update(1.0, Vec2::ZERO, 100.0, 0.0, 400.0, None);
        large.update(1.0, Vec2::ZERO, 1000.0, 0.0, 4000.0, None);

        assert!(
            small.body.rot.abs() > large.body.rot.abs(),
            "small-planet walk {} should beat large-planet walk {}",
            small.body.rot,
            large.body.rot
        );
    }

    #[test]
    fn fleeing_human_snaps_onto_target_heading() {
        let mut rng = Rng::new(9);
        let mut human = Resident::human(&mut rng);
        human.body.rot = 10.0;
        let target = 0.0;

        let mut reached = false;
        for _ in 0..200 {
            if human.update(0.1, Vec2::ZERO, 400.0, 0.0, 800.0, Some(target)) {
                reached = true;
                break;
            }
        }
        assert!(reached);
        assert_eq!(human.body.rot, target);
    }

    #[test]
    fn kill_is_idempotent_on_counters() {
        let mut rng = Rng::new(9);
        let mut fx = Effects::new(1);
        let mut score = Score::default();
        let mut human = Resident::human(&mut rng);

        human.kill(&mut fx, &mut score);
        human.kill(&mut fx, &mut score);

        assert_eq!(score.killed_people, 1);
        assert_eq!(fx.len(), 20);
    }

    #[test]
    fn trees_do_not_walk() {
        let mut rng = Rng::new(21);
        let mut tree = Resident::tree(&mut rng);
        tree.body.rot = 42.0;
        tree.update(1.0, Vec2::ZERO, 400.0, 0.0, 800.0, None);
        assert_eq!(tree.body.rot, 42.0);
    }
}
