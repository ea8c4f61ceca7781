use glam::Vec2;

use crate::api::score::Score;
use crate::api::settings::Settings;
use crate::api::types::{Color, EntityId};
use crate::components::body::Body;
use crate::components::particle::Particle;
use crate::components::resident::{Resident, REFERENCE_PLANET_SIZE};
use crate::core::math::to_radians;
use crate::core::rng::Rng;
use crate::systems::effects::Effects;
use crate::systems::spawn::{ResidentSeed, SpawnQueue};

pub const DOOMSDAY_MS: f64 = 12_000.0;
pub const DOOMSDAY_LATENCY_MS: f64 = 1_000.0;
pub const EMERGING_MS: f64 = 5_000.0;
pub const EMERGING_LATENCY_MS: f64 = 1_000.0;
pub const MAX_BUILD_TIME_MS: f64 = 20_000.0;

/// Residents within this distance of a landing ship are struck dead.
const SHIP_STRIKE_RADIUS: f32 = 16.0;

const COLOR_SCHEMAS: [[Color; 4]; 4] = [
    [
        Color::rgb(0xa7, 0x79, 0x79),
        Color::rgb(0x70, 0x4f, 0x4f),
        Color::rgb(0x55, 0x39, 0x39),
        Color::rgb(0x47, 0x2d, 0x2d),
    ],
    [
        Color::rgb(0x87, 0x4c, 0x62),
        Color::rgb(0xc9, 0x84, 0x74),
        Color::rgb(0xf2, 0xd3, 0x88),
        Color::rgb(0xa7, 0xd2, 0xcb),
    ],
    [
        Color::rgb(0xf3, 0xc8, 0x92),
        Color::rgb(0xff, 0xf1, 0xbd),
        Color::rgb(0xa3, 0xda, 0x8d),
        Color::rgb(0x14, 0x63, 0x56),
    ],
    [
        Color::rgb(0xfc, 0xff, 0xb2),
        Color::rgb(0xb6, 0xe3, 0x88),
        Color::rgb(0xc7, 0xf2, 0xa4),
        Color::rgb(0xe1, 0xff, 0xb1),
    ],
];

/// Molten colors the emerging spots cool down from.
pub const HEAT_COLORS: [Color; 3] = [
    Color::rgb(0xeb, 0x40, 0x34),
    Color::rgb(0xeb, 0x40, 0x34),
    Color::rgb(0x9b, 0x24, 0x01),
];

/// A decorative surface blotch, in planet-local coordinates.
#[derive(Debug, Clone)]
pub struct ColorSpot {
    pub pos: Vec2,
    pub color: Color,
    pub size: f32,
}

/// Interpolation endpoints for one spot of the emerging animation:
/// each field lerps from `.0` to `.1` as emergence progresses.
#[derive(Debug, Clone)]
pub struct EmergingSpot {
    pub angle: (f32, f32),
    pub size: (f32, f32),
    pub color: Color,
    pub offset: f32,
}

/// Returned from an update in which the planet finished its doomsday
/// countdown; the world uses it for the proximity kill and the event.
#[derive(Debug, Clone, Copy)]
pub struct Destruction {
    pub pos: Vec2,
    pub size: Vec2,
}

/// A rotating body the ship can land on, carrying a settlement of
/// residents on its surface.
///
/// Lifecycle: `emerging` (non-collidable spawn-in) → stable → `doomsday`
/// (countdown, visually pulsing) → destroyed. The doomsday deadline is
/// never cleared once set.
#[derive(Debug, Clone)]
pub struct Planet {
    color: Color,
    rot_speed: f32,
    player_on_planet: Option<f32>,
    is_emerging: bool,
    emerging_end: Option<f64>,
    doomsday_end: Option<f64>,
    color_spots: Vec<ColorSpot>,
    emerging_spots: Vec<EmergingSpot>,
    residents: Vec<Resident>,
}

impl Planet {
    /// Roll a new planet of the given size (diameter): rotation speed in
    /// [2.5, 5.0] deg/s, one of the four palettes, and its surface spots.
    pub fn new(rng: &mut Rng, size: f32) -> Self {
        let rot_speed = (rng.next_f32() * 0.5 + 0.5) * 5.0;
        let schema = &COLOR_SCHEMAS[rng.next_int(COLOR_SCHEMAS.len() as u32) as usize];

        let num_spots = rng.range(10.0, 20.0).floor() as usize;
        let mut color_spots = Vec::with_capacity(num_spots);
        for i in 0..num_spots {
            let color = schema[rng.next_int(schema.len() as u32) as usize];
            // Earlier spots are allowed to be larger so later ones read as
            // detail on top of them.
            let spot_size = rng.next_f32() * size * ((num_spots - i) as f32 / num_spots as f32);
            color_spots.push(ColorSpot {
                pos: Vec2::new(
                    rng.range(-size / 2.0, size / 2.0),
                    rng.range(-size / 2.0, size / 2.0),
                ),
                color,
                size: spot_size,
            });
        }

        Planet {
            color: schema[0],
            rot_speed,
            player_on_planet: None,
            is_emerging: false,
            emerging_end: None,
            doomsday_end: None,
            color_spots,
            emerging_spots: Vec::new(),
            residents: Vec::new(),
        }
    }

    pub fn rot_speed(&self) -> f32 {
        self.rot_speed
    }

    pub fn base_color(&self) -> Color {
        self.color
    }

    pub fn color_spots(&self) -> &[ColorSpot] {
        &self.color_spots
    }

    pub fn emerging_spots(&self) -> &[EmergingSpot] {
        &self.emerging_spots
    }

    pub fn residents(&self) -> &[Resident] {
        &self.residents
    }

    pub(crate) fn residents_mut(&mut self) -> &mut Vec<Resident> {
        &mut self.residents
    }

    pub fn is_emerging(&self) -> bool {
        self.is_emerging
    }

    /// An emerging planet is intangible: it must not attract, land, or
    /// crash the ship until fully formed.
    pub fn is_collidable(&self) -> bool {
        !self.is_emerging
    }

    pub fn will_get_destroyed(&self) -> bool {
        self.doomsday_end.is_some()
    }

    pub fn player_on_planet(&self) -> Option<f32> {
        self.player_on_planet
    }

    /// Begin the spawn-in phase and seed the molten-spot animation from the
    /// final surface spots.
    pub fn start_emerging(&mut self, body: &Body, now_ms: f64, rng: &mut Rng) {
        self.is_emerging = true;
        self.emerging_end = Some(now_ms + EMERGING_MS);

        let radius = body.size.x / 2.0;
        let count = self.color_spots.len();
        self.emerging_spots = (0..count)
            .map(|i| EmergingSpot {
                angle: (
                    i as f32 * (360.0 / count as f32),
                    rng.range(-360.0, 360.0) * 5.0,
                ),
                size: (
                    rng.range(5.0, 15.0),
                    radius / 4.0 * rng.next_f32() + radius / 2.0,
                ),
                color: self.color_spots[i].color,
                offset: rng.next_f32(),
            })
            .collect();
    }

    /// Arm the destruction countdown. Idempotent: once doomed, a planet
    /// stays doomed until it explodes.
    pub fn start_doomsday(&mut self, now_ms: f64) {
        if self.doomsday_end.is_none() {
            self.doomsday_end = Some(now_ms + DOOMSDAY_MS);
        }
    }

    /// Emergence progress in [0, 1]; 1 when not emerging.
    pub fn emerging_progress(&self, now_ms: f64) -> f32 {
        match self.emerging_end {
            None => 1.0,
            Some(end) => (1.0 - (end - now_ms) / EMERGING_MS).min(1.0) as f32,
        }
    }

    /// Doomsday progress in [0, 1]; 0 when not doomed.
    pub fn doomsday_progress(&self, now_ms: f64) -> f32 {
        match self.doomsday_end {
            None => 0.0,
            Some(end) => (1.0 - (end - now_ms) / DOOMSDAY_MS).min(1.0) as f32,
        }
    }

    /// Populate the settlement. Counts scale with planet size relative to
    /// the reference size, and (for decorative kinds) with the graphics
    /// multiplier. When `emerging`, every resident is scheduled with a
    /// random delay inside the build window instead of materializing now,
    /// which produces the staggered settlement-growing visual.
    pub fn create_residents(
        &mut self,
        id: EntityId,
        body: &Body,
        emerging: bool,
        now_ms: f64,
        settings: &Settings,
        rng: &mut Rng,
        spawns: &mut SpawnQueue,
    ) {
        let scalar = body.size.x / REFERENCE_PLANET_SIZE;
        let mult = settings.graphics_multiplier() as f32;
        let num_trees = (rng.range(10.0, 20.0) * scalar * mult).floor() as usize;
        let num_houses = (rng.range(5.0, 10.0) * scalar * mult).floor() as usize;
        let num_humans = (rng.range(100.0, 200.0) * scalar).floor() as usize;

        let kinds = [
            (ResidentSeed::Tree, num_trees),
            (ResidentSeed::House, num_houses),
            (ResidentSeed::Human, num_humans),
        ];
        for (seed, count) in kinds {
            for _ in 0..count {
                if emerging {
                    let delay = EMERGING_LATENCY_MS + rng.next_f32() as f64 * MAX_BUILD_TIME_MS;
                    spawns.push((now_ms + delay) as u64, id, seed);
                } else {
                    self.insert_resident(body, seed, rng);
                }
            }
        }
    }

    /// Materialize one resident on the surface, placing it immediately.
    pub(crate) fn insert_resident(&mut self, body: &Body, seed: ResidentSeed, rng: &mut Rng) {
        let mut resident = match seed {
            ResidentSeed::Tree => Resident::tree(rng),
            ResidentSeed::House => Resident::house(rng),
            ResidentSeed::Human => Resident::human(rng),
        };
        resident.update(
            0.0,
            body.pos,
            body.size.x / 2.0,
            self.rot_speed,
            body.size.x,
            None,
        );
        self.residents.push(resident);
    }

    /// Advance one frame. Returns the destruction record when the doomsday
    /// countdown (plus its grace latency) ran out this frame.
    pub fn update(
        &mut self,
        id: EntityId,
        body: &mut Body,
        dt: f32,
        now_ms: f64,
        settings: &Settings,
        spawns: &mut SpawnQueue,
        fx: &mut Effects,
        score: &mut Score,
    ) -> Option<Destruction> {
        if let Some(end) = self.doomsday_end {
            if now_ms > end + DOOMSDAY_LATENCY_MS {
                return Some(self.destroy(body, settings, fx));
            }
        }

        if self.is_emerging && self.emerging_progress(now_ms) >= 1.0 {
            self.end_emerging(id, body, now_ms, settings, fx, spawns);
        }

        body.rot += self.rot_speed * dt;

        // Humans only run once the planet is doomed and somebody is there
        // to run to.
        let flee_target = if self.doomsday_end.is_some() {
            self.player_on_planet
        } else {
            None
        };

        let radius = body.size.x / 2.0;
        let mut pickups: Vec<usize> = Vec::new();
        for (i, resident) in self.residents.iter_mut().enumerate() {
            let reached = resident.update(
                dt,
                body.pos,
                radius,
                self.rot_speed,
                body.size.x,
                flee_target,
            );
            if reached {
                pickups.push(i);
            }
        }
        for i in pickups {
            self.set_human_ready_for_pickup(i, score);
        }
        self.residents.retain(|r| !r.body.to_be_deleted());

        None
    }

    /// A fleeing human has reached the player's landing spot: remove it and
    /// count the rescue. Guarded so a human that reaches pickup twice before
    /// compaction is only counted once.
    pub fn set_human_ready_for_pickup(&mut self, index: usize, score: &mut Score) {
        let Some(resident) = self.residents.get_mut(index) else {
            return;
        };
        if resident.body.to_be_deleted() {
            return;
        }
        resident.body.delete();
        score.rescued_people += 1;
    }

    /// Record whether a player is currently landed here, storing its
    /// heading. On the transition from empty to occupied, residents caught
    /// under the ship are struck dead. Re-asserting the same presence state
    /// never re-runs the strike scan.
    pub fn set_player_on_planet(
        &mut self,
        player: Option<&Body>,
        fx: &mut Effects,
        score: &mut Score,
    ) {
        let was_occupied = self.player_on_planet.is_some();
        self.player_on_planet = player.map(|b| b.rot);

        if let Some(player_body) = player {
            if !was_occupied {
                for resident in &mut self.residents {
                    if !resident.is_human() {
                        continue;
                    }
                    if resident.body.distance_to(player_body) <= SHIP_STRIKE_RADIUS {
                        resident.kill(fx, score);
                    }
                }
            }
        }
    }

    /// Displace `obj` by the arc the surface swept this frame, so it stays
    /// glued to the rotating planet, and align its heading to the new
    /// outward bearing. Used for the landed ship; residents re-derive their
    /// position from scratch instead.
    pub fn move_with_planet(&self, body: &Body, obj: &mut Body, dt: f32) {
        let radius = body.size.x / 2.0 + obj.size.y / 2.0;
        let angle_to_obj = body.angle_to(obj);
        let new_angle = angle_to_obj + self.rot_speed * dt;

        let r1 = to_radians(angle_to_obj);
        let r2 = to_radians(new_angle);
        obj.pos += Vec2::new(
            (r2.sin() - r1.sin()) * radius,
            -(r2.cos() - r1.cos()) * radius,
        );
        obj.rot = new_angle;
    }

    fn end_emerging(
        &mut self,
        id: EntityId,
        body: &Body,
        now_ms: f64,
        settings: &Settings,
        fx: &mut Effects,
        spawns: &mut SpawnQueue,
    ) {
        self.is_emerging = false;
        self.emerging_end = None;
        self.create_residents(id, body, true, now_ms, settings, &mut fx.rng, spawns);
    }

    fn destroy(&mut self, body: &mut Body, settings: &Settings, fx: &mut Effects) -> Destruction {
        body.delete();

        let count = 100 * settings.graphics_multiplier() as usize;
        fx.explosion_burst(body.pos, count, body.size.x / 2.0, Some((10.0, 110.0)));
        fx.push(Particle::implosion(body.pos, body.size * 1.1));

        Destruction {
            pos: body.pos,
            size: body.size,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn planet_with_body(size: f32) -> (Planet, Body, Rng) {
        let mut rng = Rng::new(1234);
        let planet = Planet::new(&mut rng, size);
        let body = Body::new(Vec2::ZERO, Vec2::splat(size));
        (planet, body, rng)
    }

    #[test]
    fn rotation_speed_in_range() {
        let mut rng = Rng::new(77);
        for _ in 0..100 {
            let planet = Planet::new(&mut rng, 800.0);
            assert!((2.5..=5.0).contains(&planet.rot_speed()));
        }
    }

    #[test]
    fn emerging_planet_is_not_collidable() {
        let (mut planet, body, mut rng) = planet_with_body(800.0);
        assert!(planet.is_collidable());
        planet.start_emerging(&body, 0.0, &mut rng);
        assert!(!planet.is_collidable());
        assert!(planet.emerging_progress(0.0) < 1.0);
        assert!(planet.emerging_progress(EMERGING_MS) >= 1.0);
    }

    #[test]
    fn emergence_completes_and_schedules_residents() {
        let (mut planet, mut body, mut rng) = planet_with_body(4000.0);
        planet.start_emerging(&body, 0.0, &mut rng);

        let settings = Settings::default();
        let mut spawns = SpawnQueue::new();
        let mut fx = Effects::new(1);
        let mut score = Score::new();

        planet.update(
            EntityId(1),
            &mut body,
            0.016,
            EMERGING_MS + 1.0,
            &settings,
            &mut spawns,
            &mut fx,
            &mut score,
        );

        assert!(planet.is_collidable());
        assert!(planet.residents().is_empty(), "deferred, not immediate");
        assert!(!spawns.is_empty());
    }

    #[test]
    fn doomsday_destroys_after_latency() {
        let (mut planet, mut body, _) = planet_with_body(800.0);
        planet.start_doomsday(0.0);

        let settings = Settings::default();
        let mut spawns = SpawnQueue::new();
        let mut fx = Effects::new(1);
        let mut score = Score::new();

        let mut tick = |planet: &mut Planet, body: &mut Body, now: f64| {
            planet.update(
                EntityId(1),
                body,
                0.016,
                now,
                &settings,
                &mut spawns,
                &mut fx,
                &mut score,
            )
        };

        assert!(tick(&mut planet, &mut body, DOOMSDAY_MS + 500.0).is_none());
        let boom = tick(&mut planet, &mut body, DOOMSDAY_MS + DOOMSDAY_LATENCY_MS + 1.0);
        assert!(boom.is_some());
        assert!(body.to_be_deleted());
        // 100 × multiplier debris plus one implosion flash.
        assert_eq!(fx.len(), 100 * settings.graphics_multiplier() as usize + 1);
    }

    #[test]
    fn start_doomsday_never_extends_the_deadline() {
        let (mut planet, _, _) = planet_with_body(800.0);
        planet.start_doomsday(0.0);
        let progress = planet.doomsday_progress(6_000.0);
        planet.start_doomsday(6_000.0);
        assert_eq!(planet.doomsday_progress(6_000.0), progress);
    }

    #[test]
    fn move_with_planet_keeps_object_on_surface() {
        let (planet, body, _) = planet_with_body(800.0);
        let surface_radius = 400.0 + 24.0; // planet radius + half ship height
        let mut ship = Body::new(Vec2::new(0.0, -surface_radius), Vec2::new(40.0, 48.0));
        ship.rot = 0.0;

        for _ in 0..100 {
            planet.move_with_planet(&body, &mut ship, 0.016);
            assert!((ship.pos.length() - surface_radius).abs() < 0.5);
        }
        // Heading tracks the outward bearing as the planet turns.
        assert!((ship.rot - body.angle_to(&ship)).abs() < 1.0);
    }

    #[test]
    fn landing_strike_kills_humans_under_the_ship_once() {
        let (mut planet, body, mut rng) = planet_with_body(800.0);
        let mut fx = Effects::new(1);
        let mut score = Score::new();

        planet.insert_resident(&body, ResidentSeed::Human, &mut rng);
        planet.insert_resident(&body, ResidentSeed::Human, &mut rng);
        // Park the ship exactly on the first human.
        let ship = {
            let human = &planet.residents()[0];
            let mut b = Body::new(human.body.pos, Vec2::new(40.0, 48.0));
            b.rot = human.body.rot;
            b
        };
        // Move the second human to the far side.
        {
            let radius = body.size.x / 2.0;
            let far = &mut planet.residents_mut()[1];
            far.body.rot += 180.0;
            far.body.pos = body.pos + crate::core::math::angle_movement(far.body.rot, radius);
        }

        planet.set_player_on_planet(Some(&ship), &mut fx, &mut score);
        assert_eq!(score.killed_people, 1);

        // Re-asserting presence must not re-run the strike scan.
        planet.set_player_on_planet(Some(&ship), &mut fx, &mut score);
        assert_eq!(score.killed_people, 1);
        assert!(planet.player_on_planet().is_some());

        planet.set_player_on_planet(None, &mut fx, &mut score);
        assert!(planet.player_on_planet().is_none());
    }

    #[test]
    fn pickup_counts_each_human_exactly_once() {
        let (mut planet, body, mut rng) = planet_with_body(800.0);
        let mut score = Score::new();
        planet.insert_resident(&body, ResidentSeed::Human, &mut rng);

        planet.set_human_ready_for_pickup(0, &mut score);
        planet.set_human_ready_for_pickup(0, &mut score);

        assert_eq!(score.rescued_people, 1);
    }
}
