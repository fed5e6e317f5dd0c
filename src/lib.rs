//! Retro Arena - four classic arcade games on one simulation core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (collision, input mapping, rules
//!   engines, session state machine, tick scheduling)
//! - `highscores`: Per-variant high score persistence
//! - `settings`: User preferences
//! - `audio`: Side-effect hooks driven by simulation events
//! - `term`: Terminal render adapter and raw key event source

pub mod audio;
pub mod highscores;
pub mod settings;
pub mod sim;
pub mod term;

pub use highscores::{HighScoreStore, JsonHighScores, MemoryHighScores};
pub use settings::Settings;
pub use sim::{GameEvent, Outcome, RulesEngine, Session, SessionPhase, TickScheduler, Variant};
