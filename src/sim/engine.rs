//! The rules-engine contract shared by all four game variants
//!
//! Each variant owns its entity state exclusively and is advanced only by
//! the scheduler through [`RulesEngine::advance`]. Variant selection happens
//! once, at session creation, by constructing a trait object; nothing in the
//! tick path dispatches on a variant identifier.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::input::{Intent, TickInput};
use super::scene::Scene;

/// Result of one simulation tick. Produced by an engine, consumed exactly
/// once by the session, never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Nothing scored, game continues.
    Continue,
    /// Points were earned this tick.
    ScoreDelta(u32),
    /// The run ended, carrying the final score.
    Terminal(u64),
}

/// Side-effect notifications emitted alongside outcomes. Consumed outside
/// the simulation (audio hooks, UI flashes); never read back by engines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    WallBounce,
    PaddleHit,
    FoodEaten,
    LinesCleared(u32),
    BrickBroken,
    PointScored,
    LifeLost,
    GameOver,
    NewHighScore,
}

/// One game variant's rules, entity state, and key mapping.
pub trait RulesEngine {
    /// Rebuild the entity state to its initial configuration.
    fn reset(&mut self);

    /// Advance one fixed step. The timestep is implicit: engines are tuned
    /// to their cadence and never see wall-clock time.
    fn advance(&mut self, input: &TickInput, events: &mut Vec<GameEvent>) -> Outcome;

    /// Read-only snapshot sufficient to draw one frame.
    fn render_model(&self) -> Scene;

    /// Fixed step duration. Re-read by the session after every tick.
    fn cadence(&self) -> Duration;

    /// Which physical key maps to which one-shot intent. Keys not mapped
    /// here are still visible to the engine as held keys.
    fn map_key(&self, key: &str) -> Option<Intent>;

    /// Veto hook for intents that would corrupt state if queued. The
    /// default accepts everything; snake rejects heading reversals.
    fn accepts_intent(&self, _intent: Intent) -> bool {
        true
    }
}

/// The four playable variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Variant {
    Snake,
    FallingBlocks,
    PaddleDuel,
    BrickBreaker,
}

impl Variant {
    pub const ALL: [Variant; 4] = [
        Variant::Snake,
        Variant::FallingBlocks,
        Variant::PaddleDuel,
        Variant::BrickBreaker,
    ];

    /// Stable identifier used for high-score storage keys.
    pub fn id(self) -> &'static str {
        match self {
            Variant::Snake => "snake",
            Variant::FallingBlocks => "tetris",
            Variant::PaddleDuel => "pong",
            Variant::BrickBreaker => "breakout",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Variant::Snake => "Snake",
            Variant::FallingBlocks => "Falling Blocks",
            Variant::PaddleDuel => "Paddle Duel",
            Variant::BrickBreaker => "Brick Breaker",
        }
    }

    /// Build this variant's engine with a deterministic RNG seed.
    pub fn create_engine(self, seed: u64) -> Box<dyn RulesEngine> {
        match self {
            Variant::Snake => Box::new(super::snake::SnakeGame::new(seed)),
            Variant::FallingBlocks => Box::new(super::blocks::FallingBlocks::new(seed)),
            Variant::PaddleDuel => Box::new(super::duel::PaddleDuel::new(seed)),
            Variant::BrickBreaker => Box::new(super::breaker::BrickBreaker::new(seed)),
        }
    }
}
