pub mod api;
pub mod components;
pub mod core;
pub mod input;
pub mod renderer;
pub mod systems;

// Re-export key types at crate root for convenience
pub use api::game::{Game, GameState};
pub use api::score::Score;
pub use api::settings::{GraphicsLevel, Settings};
pub use api::types::{Color, EntityId, GameEvent};
pub use components::body::Body;
pub use components::entity::{Entity, EntityKind};
pub use components::particle::Particle;
pub use components::planet::Planet;
pub use components::player::Player;
pub use components::resident::{Resident, ResidentKind};
pub use crate::core::math::{angle_diff, angle_movement, Rect};
pub use crate::core::rng::Rng;
pub use crate::core::time::WorldClock;
pub use input::state::{HeldKeys, InputState, Key, KeySource};
pub use renderer::draw::{DrawCommand, DrawList, Shape};
pub use systems::camera::{Camera, ViewTransform};
pub use systems::effects::Effects;
pub use systems::spawn::{PendingSpawn, ResidentSeed, SpawnQueue};
pub use systems::world::{World, WorldConfig};
