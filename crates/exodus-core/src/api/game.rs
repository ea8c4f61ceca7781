use crate::api::score::Score;
use crate::api::settings::{GraphicsLevel, Settings};
use crate::api::types::GameEvent;
use crate::input::state::{InputState, KeySource};
use crate::renderer::draw::DrawList;
use crate::systems::camera::Camera;
use crate::systems::world::{World, WorldConfig};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameState {
    Playing,
    GameOver,
}

/// Top-level driver: owns the world, camera, score and settings, and runs
/// the frame loop step. The embedding shell calls `tick` once per display
/// frame with the elapsed wall-clock delta, then `render`, then reads the
/// frame's events for GUI work (game-over screen, interstellar banner).
pub struct Game {
    pub world: World,
    pub camera: Camera,
    pub score: Score,
    pub settings: Settings,
    config: WorldConfig,
    state: GameState,
    events: Vec<GameEvent>,
}

impl Game {
    pub fn new(
        config: WorldConfig,
        settings: Settings,
        viewport_width: f32,
        viewport_height: f32,
    ) -> Self {
        let world = World::create(config.clone(), &settings);
        let mut camera = Camera::new(viewport_width, viewport_height);
        if let Some(player) = world.player() {
            camera.focus_entity(player.id);
        }
        Game {
            world,
            camera,
            score: Score::new(),
            settings,
            config,
            state: GameState::Playing,
            events: Vec::new(),
        }
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    /// Events produced by the most recent tick.
    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    /// One frame: sample input, run the world update pass, then track the
    /// camera. Input is ignored once the run has ended; the world keeps
    /// simulating so debris and doomed planets play out behind the
    /// game-over overlay.
    pub fn tick(&mut self, dt: f32, keys: &impl KeySource) {
        self.events.clear();

        let input = match self.state {
            GameState::Playing => InputState::sample(keys),
            GameState::GameOver => InputState::NONE,
        };

        let view = self.camera.view_rect();
        self.world.update(
            dt,
            &input,
            &self.settings,
            &mut self.score,
            view,
            &mut self.events,
        );

        let focus = self
            .camera
            .focused()
            .and_then(|id| self.world.entity(id));
        let (focus_pos, focus_thrust) = match focus {
            Some(entity) => (
                Some(entity.body.pos),
                entity.as_player().map(|p| p.thrust()).unwrap_or(0.0),
            ),
            None => (None, 0.0),
        };
        self.camera.update(dt, focus_pos, focus_thrust);

        if self.events.contains(&GameEvent::GameOver) {
            self.state = GameState::GameOver;
        }
    }

    /// Produce this frame's draw commands.
    pub fn render(&self, out: &mut DrawList) {
        let view = self.camera.view_rect();
        self.world.render(&view, out);
    }

    /// Throw the current world away and start a fresh run. The layout seed
    /// advances so consecutive runs differ.
    pub fn restart(&mut self) {
        self.config.seed = self.config.seed.wrapping_add(1);
        self.world = World::create(self.config.clone(), &self.settings);
        self.score.reset();
        self.state = GameState::Playing;
        if let Some(player) = self.world.player() {
            self.camera.focus_entity(player.id);
        }
    }

    /// Graphics changes rescale resident and particle counts, which only
    /// take effect through a full world restart.
    pub fn change_graphics_level(&mut self, level: GraphicsLevel) {
        self.settings.graphics_level = level;
        self.restart();
    }

    /// Window resize from the shell.
    pub fn resize(&mut self, viewport_width: f32, viewport_height: f32) {
        self.camera.resize(viewport_width, viewport_height);
    }
}
