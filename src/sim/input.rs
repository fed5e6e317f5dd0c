//! Input controller: held-key snapshot plus one-shot intent queue
//!
//! Raw key-down/key-up events arrive at any time, even between ticks. Once
//! per tick the controller is sampled into a [`TickInput`]: the current set
//! of held keys (continuous movement) and a FIFO of discrete intents built
//! from key-down edges only (rotation, drops, turns). Keys the active engine
//! does not map are ignored; intents the engine vetoes are never queued.

use std::collections::{HashSet, VecDeque};

use glam::IVec2;

use super::engine::RulesEngine;

/// A grid heading for snake-style movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dir {
    Up,
    Down,
    Left,
    Right,
}

impl Dir {
    pub fn opposite(self) -> Self {
        match self {
            Dir::Up => Dir::Down,
            Dir::Down => Dir::Up,
            Dir::Left => Dir::Right,
            Dir::Right => Dir::Left,
        }
    }

    /// Unit step on a top-left-origin grid (y grows downward).
    pub fn delta(self) -> IVec2 {
        match self {
            Dir::Up => IVec2::new(0, -1),
            Dir::Down => IVec2::new(0, 1),
            Dir::Left => IVec2::new(-1, 0),
            Dir::Right => IVec2::new(1, 0),
        }
    }
}

/// A discrete, one-shot action derived from a key-down edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    Turn(Dir),
    Rotate,
    ShiftLeft,
    ShiftRight,
    SoftDrop,
    HardDrop,
}

/// Read-only view of the input state for one tick.
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    pub held: HashSet<String>,
    pub intents: Vec<Intent>,
}

impl TickInput {
    pub fn is_down(&self, key: &str) -> bool {
        self.held.contains(key)
    }
}

/// Translates raw key events into per-tick input snapshots.
#[derive(Debug, Default)]
pub struct InputController {
    held: HashSet<String>,
    queue: VecDeque<Intent>,
}

impl InputController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a key-down. Queues an intent only on the press edge, only if
    /// the engine maps the key, and only if the engine accepts the intent
    /// (e.g. snake drops turns that reverse its heading).
    pub fn key_down(&mut self, key: &str, engine: &dyn RulesEngine) {
        if self.held.insert(key.to_owned())
            && let Some(intent) = engine.map_key(key)
            && engine.accepts_intent(intent)
        {
            self.queue.push_back(intent);
        }
    }

    pub fn key_up(&mut self, key: &str) {
        let _ = self.held.remove(key);
    }

    /// Sample the controller for one tick, draining the intent queue.
    pub fn sample(&mut self) -> TickInput {
        TickInput {
            held: self.held.clone(),
            intents: self.queue.drain(..).collect(),
        }
    }

    /// Forget all held keys and pending intents (restart, variant switch).
    pub fn clear(&mut self) {
        self.held.clear();
        self.queue.clear();
    }
}
