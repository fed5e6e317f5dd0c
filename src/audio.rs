//! Audio cue mapping
//!
//! The simulation never produces sound directly; it emits [`GameEvent`]s
//! and the platform layer turns them into cues. Synthesis is out of scope
//! here, so the shipped hooks are the terminal bell and a silent stub, but
//! the cue table carries the tone frequencies a tone-capable backend
//! would use.

use crate::sim::GameEvent;
use crate::Settings;

/// A sound cue: a square-ish beep at a frequency for a duration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cue {
    pub frequency_hz: f32,
    pub duration_ms: u32,
}

/// The cue each event maps to. Every event has one; whether it actually
/// plays is the hook's call.
pub fn cue_for(event: &GameEvent) -> Cue {
    match event {
        GameEvent::FoodEaten | GameEvent::BrickBroken => Cue {
            frequency_hz: 800.0,
            duration_ms: 60,
        },
        GameEvent::WallBounce => Cue {
            frequency_hz: 400.0,
            duration_ms: 40,
        },
        GameEvent::PaddleHit => Cue {
            frequency_hz: 300.0,
            duration_ms: 40,
        },
        GameEvent::LinesCleared(_) => Cue {
            frequency_hz: 600.0,
            duration_ms: 120,
        },
        GameEvent::PointScored => Cue {
            frequency_hz: 500.0,
            duration_ms: 80,
        },
        GameEvent::NewHighScore => Cue {
            frequency_hz: 900.0,
            duration_ms: 150,
        },
        GameEvent::GameOver => Cue {
            frequency_hz: 150.0,
            duration_ms: 300,
        },
        GameEvent::LifeLost => Cue {
            frequency_hz: 200.0,
            duration_ms: 120,
        },
    }
}

/// Sink for game events on the audio side.
pub trait AudioHook {
    fn handle(&mut self, event: &GameEvent);
}

/// No sound at all. Used when sound is disabled in settings.
#[derive(Debug, Default)]
pub struct NullAudio;

impl AudioHook for NullAudio {
    fn handle(&mut self, _event: &GameEvent) {}
}

/// Terminal-bell audio: the only portable beep a terminal offers. Rings
/// for the loud events, stays quiet for per-tick bounces.
#[derive(Debug, Default)]
pub struct BellAudio;

impl AudioHook for BellAudio {
    fn handle(&mut self, event: &GameEvent) {
        use std::io::Write;
        let ring = matches!(
            event,
            GameEvent::FoodEaten
                | GameEvent::BrickBroken
                | GameEvent::LinesCleared(_)
                | GameEvent::PointScored
                | GameEvent::LifeLost
                | GameEvent::GameOver
                | GameEvent::NewHighScore
        );
        if ring {
            let mut out = std::io::stdout();
            let _ = out.write_all(b"\x07");
            let _ = out.flush();
        }
    }
}

/// Pick the hook the settings ask for.
pub fn from_settings(settings: &Settings) -> Box<dyn AudioHook> {
    if settings.sound && settings.master_volume > 0.0 {
        Box::new(BellAudio)
    } else {
        Box::new(NullAudio)
    }
}
