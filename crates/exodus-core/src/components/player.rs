use glam::Vec2;

use crate::api::score::Score;
use crate::api::types::{Color, EntityId, GameEvent};
use crate::components::body::Body;
use crate::components::particle::Particle;
use crate::components::planet::Planet;
use crate::core::math::{angle_diff, angle_movement, to_radians};
use crate::input::state::InputState;
use crate::systems::effects::Effects;

pub const PLAYER_SIZE: Vec2 = Vec2::new(40.0, 48.0);

/// Contact is a landing when the ship's heading is within this many degrees
/// of the planet's outward bearing — i.e. the ship settles tail-first with
/// its nose pointing away from the surface.
pub const SAFE_LANDING_MAX_ANGLE: f32 = 40.0;

/// Tuning constants are calibrated against a 60 Hz reference frame; each
/// update scales them by `dt / REFERENCE_FRAME_TIME`.
const REFERENCE_FRAME_TIME: f32 = 0.016;

const FRONT_ACCEL: f32 = 0.1;
const BACK_ACCEL: f32 = 0.05;
const TURN_STEP: f32 = 5.0;
const TURN_THRUST_DECAY: f32 = 1.02;
const BRAKE_DECAY: f32 = 1.01;
const COAST_DECAY: f32 = 1.004;
const COAST_THRESHOLD: f32 = 10.0;

const GRAVITY_RANGE: f32 = 500.0;
const MIN_INFLUENCE: f32 = 0.02;
const PLANET_WEIGHT: f32 = 6.0;

const CRASH_BURST: usize = 1000;

/// Mutable view of the nearest collidable planet, assembled by the world's
/// player pass from the entity collection.
pub struct NearestPlanet<'a> {
    pub id: EntityId,
    pub body: &'a mut Body,
    pub planet: &'a mut Planet,
}

/// The controlled ship. `thrust` is a signed displacement magnitude along
/// the heading, applied per frame; it has no hard cap, and neither does the
/// heading — compare headings with `angle_diff`, never by raw value.
#[derive(Debug, Clone)]
pub struct Player {
    thrust: f32,
    color: Color,
    on_planet: Option<EntityId>,
}

impl Player {
    pub fn new() -> Self {
        Player {
            thrust: 0.0,
            color: Color::WHITE,
            on_planet: None,
        }
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    pub fn thrust(&self) -> f32 {
        self.thrust
    }

    pub fn set_thrust(&mut self, thrust: f32) {
        self.thrust = thrust;
    }

    pub fn color(&self) -> Color {
        self.color
    }

    /// The planet currently landed on, if any.
    pub fn on_planet(&self) -> Option<EntityId> {
        self.on_planet
    }

    /// One frame of flight: controls, gravity steering, movement, and
    /// contact resolution against the nearest collidable planet. With no
    /// planet in the world the ship simply drifts.
    pub(crate) fn update(
        &mut self,
        body: &mut Body,
        dt: f32,
        input: &InputState,
        mut nearest: Option<NearestPlanet<'_>>,
        fx: &mut Effects,
        score: &mut Score,
        events: &mut Vec<GameEvent>,
    ) {
        let normalized = dt / REFERENCE_FRAME_TIME;

        if input.left {
            body.rot -= TURN_STEP * normalized;
            self.thrust /= TURN_THRUST_DECAY;
            self.emit_side_particles(body, fx, 30.0);
        }
        if input.right {
            body.rot += TURN_STEP * normalized;
            self.thrust /= TURN_THRUST_DECAY;
            self.emit_side_particles(body, fx, -30.0);
        }
        if input.back {
            if self.thrust > 0.0 {
                self.thrust = self.thrust / (BRAKE_DECAY * normalized) - BACK_ACCEL * normalized;
            } else {
                self.thrust -= BACK_ACCEL * normalized;
            }
            self.emit_side_particles(body, fx, 30.0);
            self.emit_side_particles(body, fx, -30.0);
        } else if input.forward {
            self.thrust += FRONT_ACCEL * normalized;
            self.emit_exhaust_particles(body, fx);
        } else if self.thrust > COAST_THRESHOLD {
            self.thrust /= COAST_DECAY * normalized;
        }

        // Displacement uses this frame's pre-gravity thrust and heading;
        // the steering below only shapes the next frame.
        let dpos = angle_movement(body.rot, self.thrust);

        if let Some(planet) = &nearest {
            let planet_body = &*planet.body;
            let bearing = body.angle_to(planet_body);
            let distance = planet_body.distance_to(body);
            let influence = 1.0 - (distance / GRAVITY_RANGE).clamp(MIN_INFLUENCE, 1.0);
            let diff = angle_diff(body.rot, bearing);

            // Pulls hardest when the nose already points at the planet;
            // pushes back when flying nose-out (retro approach).
            self.thrust += influence * FRONT_ACCEL * to_radians(diff).cos();

            // Auto-alignment assist, suppressed once the ship points away
            // hard enough to be on a landing approach.
            if diff.abs() < 180.0 - SAFE_LANDING_MAX_ANGLE {
                let step = influence * 5.0 / PLANET_WEIGHT;
                body.rot += if diff > 0.0 { -step } else { step };
            }
        }

        body.pos += dpos;

        match nearest.as_mut() {
            Some(planet) => {
                let dist = planet.body.distance_to(body);
                let outward = planet.body.angle_to(body);
                let diff = angle_diff(outward, body.rot);

                if dist <= 0.0 {
                    // Contact stops the engine unless the pilot is holding
                    // forward on a safe approach (taking off again).
                    if !(input.forward && diff.abs() < SAFE_LANDING_MAX_ANGLE) {
                        self.thrust = 0.0;
                    }

                    if diff.abs() < SAFE_LANDING_MAX_ANGLE {
                        planet.planet.move_with_planet(planet.body, body, dt);
                        // Nudge back out by the penetration depth plus a hair
                        // so the next frame doesn't re-trigger contact.
                        body.pos += angle_movement(body.rot, -(dist + 0.001));
                        planet.planet.set_player_on_planet(Some(&*body), fx, score);
                        self.on_planet = Some(planet.id);
                    } else {
                        self.die(body, fx, events);
                    }
                } else {
                    planet.planet.set_player_on_planet(None, fx, score);
                    if self.on_planet == Some(planet.id) {
                        self.on_planet = None;
                    }
                }
            }
            None => {
                self.on_planet = None;
            }
        }
    }

    /// Fatal crash or destruction-proximity kill: flags the ship deleted,
    /// signals game over, and throws a large debris burst. Safe to call
    /// more than once; only the first call fires.
    pub fn die(&mut self, body: &mut Body, fx: &mut Effects, events: &mut Vec<GameEvent>) {
        if body.to_be_deleted() {
            return;
        }
        body.delete();
        self.on_planet = None;
        events.push(GameEvent::GameOver);
        fx.explosion_burst(body.pos, CRASH_BURST, 0.0, None);
    }

    fn emit_thrust_particle(&self, body: &Body, fx: &mut Effects, rot: f32, speed: f32, extra_distance: f32) {
        let distance = 10.0 + extra_distance;
        let speed = speed.clamp(100.0, 800.0);
        let pos = body.pos + angle_movement(rot, distance);
        let jitter = fx.rng.range(-22.5, 22.5);
        fx.push(Particle::new(
            pos,
            Vec2::splat(2.0),
            rot + jitter,
            speed,
            1.0,
            self.color,
        ));
    }

    /// Main drive plume, streaming backward while accelerating.
    fn emit_exhaust_particles(&self, body: &Body, fx: &mut Effects) {
        for _ in 0..5 {
            let extra = fx.rng.next_f32() * 5.0 * self.thrust;
            self.emit_thrust_particle(body, fx, body.rot - 180.0, 0.0, extra);
        }
    }

    /// Maneuvering jets: emitted on the side opposite the turn.
    fn emit_side_particles(&self, body: &Body, fx: &mut Effects, side_angle: f32) {
        for _ in 0..2 {
            self.emit_thrust_particle(body, fx, body.rot + side_angle, self.thrust * 75.0, 0.0);
        }
    }
}

impl Default for Player {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::rng::Rng;

    /// Planet of diameter 800 at the origin, ship just above its north pole.
    /// Surface metric contact happens at center distance 424.
    fn contact_fixture(heading: f32, start_gap: f32) -> (Planet, Body, Player, Body) {
        let mut rng = Rng::new(99);
        let planet = Planet::new(&mut rng, 800.0);
        let planet_body = Body::new(Vec2::ZERO, Vec2::splat(800.0));
        let mut ship_body = Body::new(Vec2::new(0.0, -(424.0 + start_gap)), PLAYER_SIZE);
        ship_body.rot = heading;
        (planet, planet_body, Player::new(), ship_body)
    }

    fn step(
        player: &mut Player,
        body: &mut Body,
        planet: &mut Planet,
        planet_body: &mut Body,
        input: InputState,
    ) -> (Vec<GameEvent>, Score) {
        let mut fx = Effects::new(5);
        let mut score = Score::new();
        let mut events = Vec::new();
        let nearest = Some(NearestPlanet {
            id: EntityId(1),
            body: planet_body,
            planet,
        });
        player.update(body, 0.016, &input, nearest, &mut fx, &mut score, &mut events);
        (events, score)
    }

    #[test]
    fn forward_input_builds_thrust() {
        let (mut planet, mut planet_body, mut player, mut body) = contact_fixture(0.0, 2000.0);
        let input = InputState {
            forward: true,
            ..InputState::NONE
        };
        step(&mut player, &mut body, &mut planet, &mut planet_body, input);
        assert!(player.thrust() > 0.0);
    }

    #[test]
    fn turning_bleeds_thrust() {
        let (mut planet, mut planet_body, mut player, mut body) = contact_fixture(0.0, 2000.0);
        player.set_thrust(102.0);
        let input = InputState {
            left: true,
            ..InputState::NONE
        };
        step(&mut player, &mut body, &mut planet, &mut planet_body, input);
        assert!(body.rot < 0.0);
        assert!(player.thrust() < 102.0);
    }

    #[test]
    fn contact_inside_cone_lands() {
        let (mut planet, mut planet_body, mut player, mut body) = contact_fixture(0.0, -4.0);
        let (events, _) = step(
            &mut player,
            &mut body,
            &mut planet,
            &mut planet_body,
            InputState::NONE,
        );
        assert!(!body.to_be_deleted());
        assert!(events.is_empty());
        assert!(planet.player_on_planet().is_some());
        assert_eq!(player.on_planet(), Some(EntityId(1)));
        // Nudged back to the surface by the penetration depth, settling a
        // hair inside so contact stays alive next frame.
        let gap = planet_body.distance_to(&body);
        assert!(gap.abs() < 0.1, "gap {gap}");
    }

    #[test]
    fn contact_at_39_degrees_lands_but_41_crashes() {
        for (heading, lands) in [(39.0, true), (41.0, false)] {
            let (mut planet, mut planet_body, mut player, mut body) =
                contact_fixture(heading, -4.0);
            let (events, _) = step(
                &mut player,
                &mut body,
                &mut planet,
                &mut planet_body,
                InputState::NONE,
            );
            if lands {
                assert!(!body.to_be_deleted(), "heading {heading} should land");
                assert!(planet.player_on_planet().is_some());
            } else {
                assert!(body.to_be_deleted(), "heading {heading} should crash");
                assert_eq!(events, vec![GameEvent::GameOver]);
            }
        }
    }

    #[test]
    fn perpendicular_contact_crashes_with_one_game_over() {
        let (mut planet, mut planet_body, mut player, mut body) = contact_fixture(90.0, -4.0);
        let (events, _) = step(
            &mut player,
            &mut body,
            &mut planet,
            &mut planet_body,
            InputState::NONE,
        );
        assert!(body.to_be_deleted());
        assert_eq!(
            events.iter().filter(|e| **e == GameEvent::GameOver).count(),
            1
        );
        assert_eq!(player.on_planet(), None);
    }

    #[test]
    fn no_planets_means_free_drift() {
        let mut player = Player::new();
        let mut body = Body::new(Vec2::ZERO, PLAYER_SIZE);
        player.set_thrust(12.0);
        let mut fx = Effects::new(5);
        let mut score = Score::new();
        let mut events = Vec::new();

        player.update(
            &mut body,
            0.016,
            &InputState::NONE,
            None,
            &mut fx,
            &mut score,
            &mut events,
        );

        // Moved straight up by the thrust, nothing else happened.
        assert!(body.pos.y < 0.0);
        assert!(events.is_empty());
        assert!(!body.to_be_deleted());
    }

    #[test]
    fn die_only_fires_once() {
        let mut player = Player::new();
        let mut body = Body::new(Vec2::ZERO, PLAYER_SIZE);
        let mut fx = Effects::new(5);
        let mut events = Vec::new();

        player.die(&mut body, &mut fx, &mut events);
        let burst = fx.len();
        player.die(&mut body, &mut fx, &mut events);

        assert_eq!(events.len(), 1);
        assert_eq!(fx.len(), burst);
    }

    #[test]
    fn gravity_pulls_retro_approach_inward() {
        // Nose-out above the planet: gravity should push thrust negative,
        // accelerating the tail-first descent.
        let (mut planet, mut planet_body, mut player, mut body) = contact_fixture(0.0, 100.0);
        step(
            &mut player,
            &mut body,
            &mut planet,
            &mut planet_body,
            InputState::NONE,
        );
        assert!(player.thrust() < 0.0);
    }
}
