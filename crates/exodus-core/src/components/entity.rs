use crate::api::types::EntityId;
use crate::components::body::Body;
use crate::components::planet::Planet;
use crate::components::player::Player;

/// Closed set of world entity kinds. Dispatch is a match on this tag —
/// there is no downcasting anywhere in the simulation.
#[derive(Debug, Clone)]
pub enum EntityKind {
    Planet(Planet),
    Player(Player),
}

/// A world entity: shared spatial state plus the kind-specific payload.
/// Owned by the world; render order is the collection's insertion order.
#[derive(Debug, Clone)]
pub struct Entity {
    pub id: EntityId,
    pub body: Body,
    pub kind: EntityKind,
}

impl Entity {
    pub fn new(id: EntityId, body: Body, kind: EntityKind) -> Self {
        Entity { id, body, kind }
    }

    pub fn is_player(&self) -> bool {
        matches!(self.kind, EntityKind::Player(_))
    }

    pub fn is_planet(&self) -> bool {
        matches!(self.kind, EntityKind::Planet(_))
    }

    pub fn as_planet(&self) -> Option<&Planet> {
        match &self.kind {
            EntityKind::Planet(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_planet_mut(&mut self) -> Option<&mut Planet> {
        match &mut self.kind {
            EntityKind::Planet(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_player(&self) -> Option<&Player> {
        match &self.kind {
            EntityKind::Player(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_player_mut(&mut self) -> Option<&mut Player> {
        match &mut self.kind {
            EntityKind::Player(p) => Some(p),
            _ => None,
        }
    }
}
