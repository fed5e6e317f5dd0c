//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only, driven by the tick scheduler
//! - Seeded RNG only
//! - No rendering or platform dependencies
//!
//! A [`Session`] wraps one [`RulesEngine`] behind the shared state machine;
//! the scheduler is the only driver of mutation.

pub mod blocks;
pub mod breaker;
pub mod duel;
pub mod engine;
pub mod geom;
pub mod input;
pub mod scene;
pub mod scheduler;
pub mod score;
pub mod session;
pub mod snake;

pub use blocks::FallingBlocks;
pub use breaker::BrickBreaker;
pub use duel::PaddleDuel;
pub use engine::{GameEvent, Outcome, RulesEngine, Variant};
pub use geom::{Circle, Rect, circle_rect_overlap, rect_overlap};
pub use input::{Dir, InputController, Intent, TickInput};
pub use scene::{Color, Scene};
pub use scheduler::TickScheduler;
pub use score::ScoreTracker;
pub use session::{Session, SessionPhase};
pub use snake::SnakeGame;
