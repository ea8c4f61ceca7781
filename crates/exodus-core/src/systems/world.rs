//! The world: entity and particle ownership, the update/render passes, the
//! playfield layout, and the periodic doomsday cycle.
//!
//! Update discipline: every pass runs to completion over a stable
//! collection, with kills/spawns/deletions applied as flags and compacted
//! afterwards. Nothing is removed or reordered mid-iteration.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::api::score::Score;
use crate::api::settings::Settings;
use crate::api::types::{EntityId, GameEvent};
use crate::components::body::Body;
use crate::components::entity::{Entity, EntityKind};
use crate::components::particle::Particle;
use crate::components::planet::{Destruction, Planet};
use crate::components::player::{NearestPlanet, Player, PLAYER_SIZE};
use crate::core::math::{angle_movement, Rect};
use crate::core::time::WorldClock;
use crate::input::state::InputState;
use crate::renderer::draw::{self, DrawList};
use crate::systems::effects::Effects;
use crate::systems::spawn::SpawnQueue;

/// One planet is doomed and one spawned every time this epoch rolls over.
const CYCLE_INTERVAL_MS: f64 = 30_000.0;
/// Placement attempts per planet before it is skipped.
const PLACEMENT_ATTEMPTS: u32 = 16;
/// Required center-to-center gap, as a multiple of the summed radii.
const PLACEMENT_GAP_FACTOR: f32 = 1.35;

/// Playfield layout parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorldConfig {
    pub planet_count: usize,
    pub planet_size_min: f32,
    pub planet_size_max: f32,
    /// Target fraction of the placement disk left empty; the disk is sized
    /// from the total planet area so bigger fields grow the world.
    pub empty_space_fraction: f32,
    /// Exclusion radius around the world center, kept clear for the ship.
    pub inner_gap: f32,
    pub seed: u64,
}

impl Default for WorldConfig {
    fn default() -> Self {
        WorldConfig {
            planet_count: 8,
            planet_size_min: 600.0,
            planet_size_max: 1600.0,
            empty_space_fraction: 0.985,
            inner_gap: 1200.0,
            seed: 0x5eed,
        }
    }
}

impl WorldConfig {
    /// Parse a config from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

pub struct World {
    entities: Vec<Entity>,
    fx: Effects,
    spawns: SpawnQueue,
    clock: WorldClock,
    config: WorldConfig,
    placement_radius: f32,
    map_radius: f32,
    last_epoch: i64,
    next_id: u32,
    interstellar: bool,
}

impl World {
    /// Build a fresh playfield: scatter the configured planets in the
    /// annulus between the inner gap and the derived placement radius, and
    /// put the ship at the center.
    pub fn create(config: WorldConfig, settings: &Settings) -> Self {
        let mut world = World {
            entities: Vec::new(),
            fx: Effects::new(config.seed),
            spawns: SpawnQueue::new(),
            clock: WorldClock::new(),
            placement_radius: 0.0,
            map_radius: 0.0,
            last_epoch: 0,
            next_id: 1,
            interstellar: false,
            config,
        };

        let sizes: Vec<f32> = (0..world.config.planet_count)
            .map(|_| {
                world
                    .fx
                    .rng
                    .range(world.config.planet_size_min, world.config.planet_size_max)
            })
            .collect();

        let total_area: f32 = sizes
            .iter()
            .map(|s| std::f32::consts::PI * (s / 2.0) * (s / 2.0))
            .sum();
        let disk_area = total_area / (1.0 - world.config.empty_space_fraction);
        world.placement_radius = (disk_area / std::f32::consts::PI).sqrt();
        world.map_radius = world.placement_radius + world.config.planet_size_max;

        let mut placed = 0usize;
        for size in sizes {
            match world.find_spot(size) {
                Some(pos) => {
                    world.spawn_planet(pos, size, false, settings);
                    placed += 1;
                }
                None => {
                    log::warn!(
                        "no room for a planet of size {size:.0} after {PLACEMENT_ATTEMPTS} attempts, skipping"
                    );
                }
            }
        }
        log::info!(
            "world created: {placed}/{} planets, map radius {:.0}",
            world.config.planet_count,
            world.map_radius
        );

        world.spawn_player(Vec2::ZERO);
        world
    }

    // ── Spawning ─────────────────────────────────────────────────────────

    fn alloc_id(&mut self) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Search the annulus for a position keeping the configured gap from
    /// every existing planet. None after the attempt budget runs out.
    fn find_spot(&mut self, size: f32) -> Option<Vec2> {
        let r_lo = self.config.inner_gap + size / 2.0;
        let r_hi = self.placement_radius.max(r_lo);

        for _ in 0..PLACEMENT_ATTEMPTS {
            let angle = self.fx.rng.range(0.0, 360.0);
            let r = self.fx.rng.range(r_lo, r_hi);
            let pos = angle_movement(angle, r);

            let clear = self.entities.iter().all(|e| match e.as_planet() {
                Some(_) => {
                    let min_gap = (size + e.body.size.x) / 2.0 * PLACEMENT_GAP_FACTOR;
                    pos.distance(e.body.pos) >= min_gap
                }
                None => true,
            });
            if clear {
                return Some(pos);
            }
        }
        None
    }

    pub fn spawn_planet(
        &mut self,
        pos: Vec2,
        size: f32,
        emerging: bool,
        settings: &Settings,
    ) -> EntityId {
        let id = self.alloc_id();
        let now = self.clock.now_ms();

        let mut planet = Planet::new(&mut self.fx.rng, size);
        let body = Body::new(pos, Vec2::splat(size));
        if emerging {
            planet.start_emerging(&body, now, &mut self.fx.rng);
        } else {
            planet.create_residents(
                id,
                &body,
                false,
                now,
                settings,
                &mut self.fx.rng,
                &mut self.spawns,
            );
        }

        self.entities
            .push(Entity::new(id, body, EntityKind::Planet(planet)));
        id
    }

    pub fn spawn_player(&mut self, pos: Vec2) -> EntityId {
        let id = self.alloc_id();
        self.entities.push(Entity::new(
            id,
            Body::new(pos, PLAYER_SIZE),
            EntityKind::Player(Player::new()),
        ));
        id
    }

    // ── Queries ──────────────────────────────────────────────────────────

    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    pub fn entity(&self, id: EntityId) -> Option<&Entity> {
        self.entities.iter().find(|e| e.id == id)
    }

    pub fn entity_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.iter_mut().find(|e| e.id == id)
    }

    pub fn planets(&self) -> impl Iterator<Item = &Entity> {
        self.entities.iter().filter(|e| e.is_planet())
    }

    pub fn player(&self) -> Option<&Entity> {
        self.entities.iter().find(|e| e.is_player())
    }

    pub fn particles(&self) -> &[Particle] {
        &self.fx.particles
    }

    pub fn map_radius(&self) -> f32 {
        self.map_radius
    }

    pub fn now_ms(&self) -> f64 {
        self.clock.now_ms()
    }

    /// True while the player is outside the map radius.
    pub fn is_interstellar(&self) -> bool {
        self.interstellar
    }

    // ── Update ───────────────────────────────────────────────────────────

    /// One simulation frame. `view` is the camera's visible rectangle from
    /// this frame's transform, used for render-cost culling only.
    pub fn update(
        &mut self,
        dt: f32,
        input: &InputState,
        settings: &Settings,
        score: &mut Score,
        view: Rect,
        events: &mut Vec<GameEvent>,
    ) {
        self.clock.advance(dt);
        let now = self.clock.now_ms();

        let epoch = self.clock.epoch(CYCLE_INTERVAL_MS);
        if epoch != self.last_epoch {
            self.last_epoch = epoch;
            self.run_doomsday_cycle(now, settings, events);
        }

        self.materialize_due_spawns(now);

        // Planet pass. Destructions are recorded and resolved after the
        // pass so no entity mutates another mid-iteration.
        let mut destroyed: Vec<(EntityId, Destruction)> = Vec::new();
        {
            let World {
                entities,
                fx,
                spawns,
                ..
            } = self;
            for entity in entities.iter_mut() {
                let Entity { id, body, kind } = entity;
                if let EntityKind::Planet(planet) = kind {
                    if let Some(d) = planet.update(*id, body, dt, now, settings, spawns, fx, score)
                    {
                        destroyed.push((*id, d));
                    }
                }
            }
        }

        self.player_pass(dt, input, score, events);

        for (id, destruction) in destroyed {
            events.push(GameEvent::PlanetDestroyed(id));
            self.resolve_destruction_kill(&destruction, events);
        }

        self.update_interstellar(events);

        self.fx.tick(dt);

        // Compact after the full pass, never during it.
        self.entities.retain(|e| !e.body.to_be_deleted());

        for entity in &mut self.entities {
            let visible = entity.body.bounding_box().intersects(&view);
            entity.body.set_visible(visible);
        }
    }

    /// Every epoch: doom one random stable planet and start one new planet
    /// emerging to replace the lost real estate.
    fn run_doomsday_cycle(&mut self, now: f64, settings: &Settings, events: &mut Vec<GameEvent>) {
        let candidates: Vec<usize> = self
            .entities
            .iter()
            .enumerate()
            .filter(|(_, e)| {
                e.as_planet().is_some_and(|p| {
                    p.is_collidable() && !p.will_get_destroyed() && !e.body.to_be_deleted()
                })
            })
            .map(|(i, _)| i)
            .collect();

        if let Some(&pick) = candidates
            .get(self.fx.rng.next_int(candidates.len().max(1) as u32) as usize)
        {
            let id = self.entities[pick].id;
            if let Some(planet) = self.entities[pick].as_planet_mut() {
                planet.start_doomsday(now);
            }
            events.push(GameEvent::PlanetDoomed(id));
            log::info!("doomsday cycle: planet {} is doomed", id.0);
        }

        let size = self
            .fx
            .rng
            .range(self.config.planet_size_min, self.config.planet_size_max);
        match self.find_spot(size) {
            Some(pos) => {
                self.spawn_planet(pos, size, true, settings);
            }
            None => log::warn!("doomsday cycle: no room for a replacement planet"),
        }
    }

    /// Materialize deferred residents that have come due, dropping entries
    /// whose owning planet no longer exists.
    fn materialize_due_spawns(&mut self, now: f64) {
        let World {
            entities,
            fx,
            spawns,
            ..
        } = self;
        while let Some(pending) = spawns.pop_due(now) {
            let Some(entity) = entities.iter_mut().find(|e| e.id == pending.planet) else {
                continue;
            };
            if entity.body.to_be_deleted() {
                continue;
            }
            let Entity { body, kind, .. } = entity;
            if let EntityKind::Planet(planet) = kind {
                planet.insert_resident(body, pending.seed, &mut fx.rng);
            }
        }
    }

    fn player_pass(
        &mut self,
        dt: f32,
        input: &InputState,
        score: &mut Score,
        events: &mut Vec<GameEvent>,
    ) {
        let World { entities, fx, .. } = self;
        let Some(player_idx) = entities.iter().position(|e| e.is_player()) else {
            return;
        };

        // Nearest collidable planet by the approximate surface metric;
        // ties break to the first found in iteration order.
        let player_body = &entities[player_idx].body;
        let mut nearest: Option<(usize, f32)> = None;
        for (i, entity) in entities.iter().enumerate() {
            let Some(planet) = entity.as_planet() else {
                continue;
            };
            if !planet.is_collidable() || entity.body.to_be_deleted() {
                continue;
            }
            let d = entity.body.distance_to(player_body);
            if nearest.map_or(true, |(_, best)| d < best) {
                nearest = Some((i, d));
            }
        }

        let previously_on = entities[player_idx]
            .as_player()
            .and_then(|p| p.on_planet());

        match nearest {
            Some((planet_idx, _)) => {
                let (player_entity, planet_entity) = pair_mut(entities, player_idx, planet_idx);
                let Entity {
                    body: player_body,
                    kind: player_kind,
                    ..
                } = player_entity;
                let Entity {
                    id: planet_id,
                    body: planet_body,
                    kind: planet_kind,
                } = planet_entity;
                if let (EntityKind::Player(player), EntityKind::Planet(planet)) =
                    (player_kind, planet_kind)
                {
                    let contact = NearestPlanet {
                        id: *planet_id,
                        body: planet_body,
                        planet,
                    };
                    player.update(player_body, dt, input, Some(contact), fx, score, events);
                }
            }
            None => {
                let Entity { body, kind, .. } = &mut entities[player_idx];
                if let EntityKind::Player(player) = kind {
                    player.update(body, dt, input, None, fx, score, events);
                }
            }
        }

        // The planet we were landed on last frame loses its occupant flag
        // if we are no longer landed there.
        let now_on = entities[player_idx].as_player().and_then(|p| p.on_planet());
        if let Some(prev_id) = previously_on {
            if now_on != Some(prev_id) {
                if let Some(entity) = entities.iter_mut().find(|e| e.id == prev_id) {
                    if let EntityKind::Planet(planet) = &mut entity.kind {
                        planet.set_player_on_planet(None, fx, score);
                    }
                }
            }
        }
    }

    /// A planet just exploded: kill the player if it was close enough to be
    /// caught in the blast.
    fn resolve_destruction_kill(&mut self, destruction: &Destruction, events: &mut Vec<GameEvent>) {
        let World { entities, fx, .. } = self;
        let Some(entity) = entities.iter_mut().find(|e| e.is_player()) else {
            return;
        };
        let Entity { body, kind, .. } = entity;
        if let EntityKind::Player(player) = kind {
            let threshold = destruction.size.x / 20.0;
            let dist =
                destruction.pos.distance(body.pos) - (destruction.size.y + body.size.y) / 2.0;
            if dist < threshold {
                player.die(body, fx, events);
            }
        }
    }

    fn update_interstellar(&mut self, events: &mut Vec<GameEvent>) {
        let Some(player) = self.entities.iter().find(|e| e.is_player()) else {
            return;
        };
        let outside = player.body.pos.length() > self.map_radius;
        if outside != self.interstellar {
            self.interstellar = outside;
            events.push(if outside {
                GameEvent::InterstellarEntered
            } else {
                GameEvent::InterstellarLeft
            });
        }
    }

    // ── Render ───────────────────────────────────────────────────────────

    /// Emit this frame's draw commands: the boundary ring, every visible
    /// entity back to front in insertion order, then particles. The
    /// interstellar banner itself belongs to the GUI collaborator, keyed
    /// off `is_interstellar` and the transition events.
    pub fn render(&self, view: &Rect, out: &mut DrawList) {
        draw::draw_boundary(self.map_radius, out);

        let now = self.clock.now_ms();
        for entity in &self.entities {
            if !entity.body.is_visible() {
                continue;
            }
            match &entity.kind {
                EntityKind::Planet(planet) => draw::draw_planet(planet, &entity.body, now, out),
                EntityKind::Player(player) => draw::draw_player(player, &entity.body, out),
            }
        }

        for particle in &self.fx.particles {
            let half = particle.size * particle.scale;
            if Rect::from_center_half(particle.pos, half).intersects(view) {
                draw::draw_particle(particle, out);
            }
        }
    }
}

/// Disjoint mutable access to two entities of the same slice.
fn pair_mut(entities: &mut [Entity], a: usize, b: usize) -> (&mut Entity, &mut Entity) {
    debug_assert_ne!(a, b);
    if a < b {
        let (left, right) = entities.split_at_mut(b);
        (&mut left[a], &mut right[0])
    } else {
        let (left, right) = entities.split_at_mut(a);
        (&mut right[0], &mut left[b])
    }
}
