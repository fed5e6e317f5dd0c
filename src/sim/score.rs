//! Score tracker
//!
//! Accumulates score deltas for the active run, compares against the
//! persisted per-variant high score, and signals the store whenever the
//! current score moves past it. Read access is cheap and available every
//! tick regardless of what the outcome was.

use crate::highscores::HighScoreStore;

use super::engine::{GameEvent, Variant};

#[derive(Debug)]
pub struct ScoreTracker {
    variant: Variant,
    score: u64,
    high_score: u64,
    /// The NewHighScore event fires once per run, on the first crossing.
    announced: bool,
}

impl ScoreTracker {
    pub fn new(variant: Variant, high_score: u64) -> Self {
        Self {
            variant,
            score: 0,
            high_score,
            announced: false,
        }
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn high_score(&self) -> u64 {
        self.high_score
    }

    /// Add a tick's score delta and persist a new high score if crossed.
    pub fn apply(
        &mut self,
        delta: u32,
        store: &mut dyn HighScoreStore,
        events: &mut Vec<GameEvent>,
    ) {
        self.score += u64::from(delta);
        self.check_high(store, events);
    }

    /// Reconcile with a terminal outcome's final score. Engines report the
    /// authoritative final total (a last tick can both score and end the
    /// run), so the tracker adopts it if it is ahead.
    pub fn finalize(
        &mut self,
        final_score: u64,
        store: &mut dyn HighScoreStore,
        events: &mut Vec<GameEvent>,
    ) {
        if final_score > self.score {
            self.score = final_score;
        }
        self.check_high(store, events);
    }

    /// Back to zero for a fresh run. The loaded high score survives.
    pub fn reset(&mut self) {
        self.score = 0;
        self.announced = false;
    }

    fn check_high(&mut self, store: &mut dyn HighScoreStore, events: &mut Vec<GameEvent>) {
        if self.score > self.high_score {
            self.high_score = self.score;
            store.set(self.variant, self.score);
            if !self.announced {
                self.announced = true;
                events.push(GameEvent::NewHighScore);
                log::info!(
                    "new high score for {}: {}",
                    self.variant.id(),
                    self.score
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::highscores::MemoryHighScores;

    #[test]
    fn deltas_accumulate() {
        let mut store = MemoryHighScores::default();
        let mut events = Vec::new();
        let mut tracker = ScoreTracker::new(Variant::Snake, 0);
        tracker.apply(10, &mut store, &mut events);
        tracker.apply(10, &mut store, &mut events);
        assert_eq!(tracker.score(), 20);
    }

    #[test]
    fn high_score_signalled_once_but_persisted_on_every_improvement() {
        let mut store = MemoryHighScores::default();
        let mut events = Vec::new();
        let mut tracker = ScoreTracker::new(Variant::Snake, 15);

        tracker.apply(10, &mut store, &mut events);
        assert!(events.is_empty());
        assert_eq!(store.get(Variant::Snake), None);

        tracker.apply(10, &mut store, &mut events);
        assert_eq!(events, vec![GameEvent::NewHighScore]);
        assert_eq!(store.get(Variant::Snake), Some(20));

        events.clear();
        tracker.apply(10, &mut store, &mut events);
        assert!(events.is_empty());
        assert_eq!(store.get(Variant::Snake), Some(30));
    }

    #[test]
    fn reset_zeroes_score_but_keeps_high_score() {
        let mut store = MemoryHighScores::default();
        let mut events = Vec::new();
        let mut tracker = ScoreTracker::new(Variant::PaddleDuel, 0);
        tracker.apply(5, &mut store, &mut events);
        tracker.reset();
        assert_eq!(tracker.score(), 0);
        assert_eq!(tracker.high_score(), 5);
    }

    #[test]
    fn finalize_adopts_a_larger_terminal_score() {
        let mut store = MemoryHighScores::default();
        let mut events = Vec::new();
        let mut tracker = ScoreTracker::new(Variant::FallingBlocks, 0);
        tracker.apply(100, &mut store, &mut events);
        // Final tick both cleared lines and topped out.
        tracker.finalize(300, &mut store, &mut events);
        assert_eq!(tracker.score(), 300);
        assert_eq!(store.get(Variant::FallingBlocks), Some(300));
    }
}
