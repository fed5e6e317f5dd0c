//! Tick scheduler: a poll-driven periodic timer
//!
//! The scheduler owns at most one pending tick. The event loop asks
//! [`TickScheduler::tick_due`] whether the cadence has elapsed; a `true`
//! answer immediately re-arms the timer from the *current* time, so a tick
//! whose work overran the cadence produces exactly one follow-up tick, never
//! a catch-up burst. A stopped scheduler never reports a due tick, which is
//! what guarantees that pause/restart/variant-switch cancel any tick that
//! would otherwise have fired.

use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
pub struct TickScheduler {
    cadence: Duration,
    next_due: Option<Instant>,
}

impl Default for TickScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl TickScheduler {
    pub fn new() -> Self {
        Self {
            cadence: Duration::from_millis(16),
            next_due: None,
        }
    }

    /// Arm the timer: the first tick is due one cadence from `now`.
    pub fn start(&mut self, cadence: Duration, now: Instant) {
        self.cadence = cadence;
        self.next_due = Some(now + cadence);
    }

    /// Cancel the pending tick. Takes effect before the next poll: after
    /// `stop` returns, `tick_due` answers `false` until `start` is called.
    pub fn stop(&mut self) {
        self.next_due = None;
    }

    pub fn is_running(&self) -> bool {
        self.next_due.is_some()
    }

    /// Change the cadence without disturbing the pending tick. The new
    /// value applies when the timer next re-arms.
    pub fn set_cadence(&mut self, cadence: Duration) {
        self.cadence = cadence;
    }

    /// Poll the timer. Answers `true` at most once per elapsed cadence and
    /// re-arms relative to `now`.
    pub fn tick_due(&mut self, now: Instant) -> bool {
        match self.next_due {
            Some(due) if now >= due => {
                self.next_due = Some(now + self.cadence);
                true
            }
            _ => false,
        }
    }

    /// Time remaining until the pending tick, if armed. Zero when overdue.
    /// Used by the event loop to size its input-poll timeout.
    pub fn time_until_due(&self, now: Instant) -> Option<Duration> {
        self.next_due.map(|due| due.saturating_duration_since(now))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CADENCE: Duration = Duration::from_millis(100);

    #[test]
    fn not_due_before_cadence_elapses() {
        let t0 = Instant::now();
        let mut sched = TickScheduler::new();
        sched.start(CADENCE, t0);
        assert!(!sched.tick_due(t0));
        assert!(!sched.tick_due(t0 + Duration::from_millis(99)));
        assert!(sched.tick_due(t0 + CADENCE));
    }

    #[test]
    fn stopped_scheduler_never_fires() {
        let t0 = Instant::now();
        let mut sched = TickScheduler::new();
        sched.start(CADENCE, t0);
        sched.stop();
        assert!(!sched.is_running());
        assert!(!sched.tick_due(t0 + Duration::from_secs(10)));
    }

    #[test]
    fn overrun_yields_one_tick_not_a_burst() {
        let t0 = Instant::now();
        let mut sched = TickScheduler::new();
        sched.start(CADENCE, t0);

        // Five cadences pass without polling (a long tick, a stalled loop).
        let late = t0 + CADENCE * 5;
        assert!(sched.tick_due(late));
        // Re-armed from `late`, not from the missed grid points.
        assert!(!sched.tick_due(late));
        assert!(!sched.tick_due(late + Duration::from_millis(99)));
        assert!(sched.tick_due(late + CADENCE));
    }

    #[test]
    fn cadence_change_applies_on_next_rearm() {
        let t0 = Instant::now();
        let mut sched = TickScheduler::new();
        sched.start(CADENCE, t0);
        sched.set_cadence(Duration::from_millis(50));

        // Pending tick still on the old schedule.
        assert!(!sched.tick_due(t0 + Duration::from_millis(60)));
        assert!(sched.tick_due(t0 + CADENCE));
        // Re-armed with the new cadence.
        let t1 = t0 + CADENCE;
        assert!(sched.tick_due(t1 + Duration::from_millis(50)));
    }

    #[test]
    fn time_until_due_saturates_at_zero() {
        let t0 = Instant::now();
        let mut sched = TickScheduler::new();
        assert_eq!(sched.time_until_due(t0), None);
        sched.start(CADENCE, t0);
        assert_eq!(sched.time_until_due(t0), Some(CADENCE));
        assert_eq!(
            sched.time_until_due(t0 + CADENCE * 2),
            Some(Duration::ZERO)
        );
    }
}
