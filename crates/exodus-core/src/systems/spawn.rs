//! Deferred resident spawning.
//!
//! While a planet settles after emerging, its residents appear one by one
//! over a build window instead of all at once. Each scheduled resident is a
//! "due at time T" entry in a min-heap the world polls once per frame.
//! There is no cancel path — entries for a planet that has since been
//! destroyed are discarded at materialization time by a liveness check.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use crate::api::types::EntityId;

/// What kind of resident to materialize when an entry comes due.
/// Appearance (colors, leaves, walk speed) is rolled at materialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ResidentSeed {
    Tree,
    House,
    Human,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct PendingSpawn {
    pub due_ms: u64,
    pub planet: EntityId,
    pub seed: ResidentSeed,
}

/// Min-heap of pending spawns, ordered by due time.
#[derive(Debug, Default)]
pub struct SpawnQueue {
    heap: BinaryHeap<Reverse<PendingSpawn>>,
}

impl SpawnQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, due_ms: u64, planet: EntityId, seed: ResidentSeed) {
        self.heap.push(Reverse(PendingSpawn {
            due_ms,
            planet,
            seed,
        }));
    }

    /// Pop the next entry that is due at or before `now_ms`, if any.
    /// Call in a loop to drain everything due this frame.
    pub fn pop_due(&mut self, now_ms: f64) -> Option<PendingSpawn> {
        match self.heap.peek() {
            Some(Reverse(entry)) if entry.due_ms as f64 <= now_ms => {
                self.heap.pop().map(|Reverse(e)| e)
            }
            _ => None,
        }
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    pub fn clear(&mut self) {
        self.heap.clear();
    }
}
