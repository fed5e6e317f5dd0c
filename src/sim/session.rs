//! Session state machine
//!
//! Owns one variant's engine plus the input controller, score tracker, and
//! tick scheduler, and gates everything on the lifecycle phase. Ticks only
//! land while `Playing`; pause stops the scheduler outright, so no tick
//! scheduled before the pause can fire after it.

use std::mem;
use std::time::{Duration, Instant};

use crate::highscores::HighScoreStore;

use super::engine::{GameEvent, Outcome, RulesEngine, Variant};
use super::input::InputController;
use super::scene::Scene;
use super::scheduler::TickScheduler;
use super::score::ScoreTracker;

/// Lifecycle phase of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// Created or restarted, not yet running.
    Menu,
    /// Ticks advance the engine.
    Playing,
    /// Frozen mid-run; entity state intact.
    Paused,
    /// A terminal outcome landed. Only restart leaves this phase.
    GameOver,
}

pub struct Session {
    variant: Variant,
    phase: SessionPhase,
    engine: Box<dyn RulesEngine>,
    input: InputController,
    tracker: ScoreTracker,
    scheduler: TickScheduler,
    store: Box<dyn HighScoreStore>,
    events: Vec<GameEvent>,
    final_score: Option<u64>,
}

impl Session {
    /// Build a session for one variant. The engine is constructed here,
    /// once; every subsequent tick goes through the same trait object.
    pub fn new(variant: Variant, seed: u64, store: Box<dyn HighScoreStore>) -> Self {
        let high = store.get(variant).unwrap_or(0);
        Self {
            variant,
            phase: SessionPhase::Menu,
            engine: variant.create_engine(seed),
            input: InputController::new(),
            tracker: ScoreTracker::new(variant, high),
            scheduler: TickScheduler::new(),
            store,
            events: Vec::new(),
            final_score: None,
        }
    }

    pub fn variant(&self) -> Variant {
        self.variant
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn score(&self) -> u64 {
        self.tracker.score()
    }

    pub fn high_score(&self) -> u64 {
        self.tracker.high_score()
    }

    /// Final score of the completed run, once `GameOver` is reached.
    pub fn final_score(&self) -> Option<u64> {
        self.final_score
    }

    /// Menu -> Playing. Arms the scheduler with the engine's cadence.
    pub fn start(&mut self, now: Instant) {
        if self.phase != SessionPhase::Menu {
            return;
        }
        self.phase = SessionPhase::Playing;
        self.scheduler.start(self.engine.cadence(), now);
        log::info!("{} session started", self.variant.id());
    }

    /// Playing -> Paused. Stops the scheduler; a pending tick dies with it.
    pub fn pause(&mut self) {
        if self.phase != SessionPhase::Playing {
            return;
        }
        self.phase = SessionPhase::Paused;
        self.scheduler.stop();
    }

    /// Paused -> Playing. Re-arms a full cadence from `now`.
    pub fn resume(&mut self, now: Instant) {
        if self.phase != SessionPhase::Paused {
            return;
        }
        self.phase = SessionPhase::Playing;
        self.scheduler.start(self.engine.cadence(), now);
    }

    /// Any phase -> Menu with fresh entity state. Score resets, the loaded
    /// high score and its store survive.
    pub fn restart(&mut self) {
        self.engine.reset();
        self.tracker.reset();
        self.input.clear();
        self.scheduler.stop();
        self.events.clear();
        self.final_score = None;
        self.phase = SessionPhase::Menu;
    }

    /// Raw key-down from the platform layer. Safe to call in any phase;
    /// intents queue against the engine's mapping and veto.
    pub fn key_down(&mut self, key: &str) {
        self.input.key_down(key, self.engine.as_ref());
    }

    pub fn key_up(&mut self, key: &str) {
        self.input.key_up(key);
    }

    /// Poll for a due tick and run it. Returns whether a tick landed.
    pub fn tick(&mut self, now: Instant) -> bool {
        if self.phase != SessionPhase::Playing || !self.scheduler.tick_due(now) {
            return false;
        }
        self.step();
        true
    }

    fn step(&mut self) {
        let input = self.input.sample();
        let outcome = self.engine.advance(&input, &mut self.events);

        match outcome {
            Outcome::Continue => {}
            Outcome::ScoreDelta(delta) => {
                self.tracker
                    .apply(delta, self.store.as_mut(), &mut self.events);
            }
            Outcome::Terminal(final_score) => {
                self.tracker
                    .finalize(final_score, self.store.as_mut(), &mut self.events);
                self.final_score = Some(self.tracker.score());
                self.phase = SessionPhase::GameOver;
                self.scheduler.stop();
                log::info!(
                    "{} game over, final score {}",
                    self.variant.id(),
                    self.tracker.score()
                );
                return;
            }
        }

        // Engines own their cadence; re-read in case it varies over a run.
        self.scheduler.set_cadence(self.engine.cadence());
    }

    /// Snapshot of the current frame for the render adapter.
    pub fn scene(&self) -> Scene {
        self.engine.render_model()
    }

    /// Take the events accumulated since the last drain.
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        mem::take(&mut self.events)
    }

    /// How long the event loop may sleep before the next tick is due.
    pub fn time_until_tick(&self, now: Instant) -> Option<Duration> {
        self.scheduler.time_until_due(now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::highscores::MemoryHighScores;

    fn snake_session() -> Session {
        Session::new(Variant::Snake, 1, Box::new(MemoryHighScores::default()))
    }

    fn cadence_of(session: &Session) -> Duration {
        session.engine.cadence()
    }

    #[test]
    fn ticks_only_land_while_playing() {
        let t0 = Instant::now();
        let mut session = snake_session();
        let step = cadence_of(&session);

        // Menu: scheduler not armed.
        assert!(!session.tick(t0 + step * 2));

        session.start(t0);
        assert!(!session.tick(t0));
        assert!(session.tick(t0 + step));

        session.pause();
        assert_eq!(session.phase(), SessionPhase::Paused);
        assert!(!session.tick(t0 + step * 10));

        session.resume(t0 + step * 10);
        assert!(session.tick(t0 + step * 11));
    }

    #[test]
    fn terminal_outcome_moves_to_game_over_and_stops_ticks() {
        let t0 = Instant::now();
        let mut session = snake_session();
        let step = cadence_of(&session);
        session.start(t0);
        session.key_down("ArrowUp");

        // Head starts at row 10; the wall is 11 steps up at most.
        let mut now = t0;
        for _ in 0..30 {
            now += step;
            let _ = session.tick(now);
            if session.phase() == SessionPhase::GameOver {
                break;
            }
        }
        assert_eq!(session.phase(), SessionPhase::GameOver);
        assert_eq!(session.final_score(), Some(0));
        assert!(session.drain_events().contains(&GameEvent::GameOver));

        // Stuck in GameOver until restart.
        assert!(!session.tick(now + step * 5));
        session.restart();
        assert_eq!(session.phase(), SessionPhase::Menu);
        assert_eq!(session.final_score(), None);
        assert_eq!(session.score(), 0);
    }

    #[test]
    fn score_flows_from_engine_to_tracker() {
        let t0 = Instant::now();
        let mut session = snake_session();
        let step = cadence_of(&session);
        session.start(t0);

        // Food sits at (15,15); walk right 5 then down 5 from (10,10).
        session.key_down("ArrowRight");
        let mut now = t0;
        for _ in 0..5 {
            now += step;
            assert!(session.tick(now));
        }
        session.key_up("ArrowRight");
        session.key_down("ArrowDown");
        for _ in 0..5 {
            now += step;
            assert!(session.tick(now));
        }

        assert_eq!(session.score(), 10);
        assert_eq!(session.high_score(), 10);
        let events = session.drain_events();
        assert!(events.contains(&GameEvent::FoodEaten));
        assert!(events.contains(&GameEvent::NewHighScore));
    }

    #[test]
    fn high_score_survives_restart() {
        let t0 = Instant::now();
        let mut session = snake_session();
        let step = cadence_of(&session);
        session.start(t0);
        session.key_down("ArrowRight");
        let mut now = t0;
        for _ in 0..5 {
            now += step;
            let _ = session.tick(now);
        }
        session.key_up("ArrowRight");
        session.key_down("ArrowDown");
        for _ in 0..5 {
            now += step;
            let _ = session.tick(now);
        }
        assert_eq!(session.high_score(), 10);

        session.restart();
        assert_eq!(session.score(), 0);
        assert_eq!(session.high_score(), 10);
    }

    #[test]
    fn drain_events_empties_the_queue() {
        let t0 = Instant::now();
        let mut session = snake_session();
        let step = cadence_of(&session);
        session.start(t0);
        session.key_down("ArrowLeft");
        let mut now = t0;
        // Head at column 10: the left wall ends the run quickly.
        for _ in 0..15 {
            now += step;
            let _ = session.tick(now);
        }
        assert!(!session.drain_events().is_empty());
        assert!(session.drain_events().is_empty());
    }

    #[test]
    fn start_is_a_no_op_outside_menu() {
        let t0 = Instant::now();
        let mut session = snake_session();
        session.start(t0);
        session.pause();
        // A second start must not un-pause.
        session.start(t0);
        assert_eq!(session.phase(), SessionPhase::Paused);
    }
}
