//! Terminal front end: lobby, event loop, rendering, audio cues.

use std::collections::HashMap;
use std::io;
use std::path::Path;
use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use crossterm::terminal;

use retro_arena::audio::{self, AudioHook};
use retro_arena::sim::SessionPhase;
use retro_arena::term::{self, Renderer, TermGuard};
use retro_arena::{JsonHighScores, Session, Settings, Variant};

/// How long a key counts as held after its last press event, on terminals
/// without release reporting. Two keyboard auto-repeat periods.
const KEY_SUSTAIN: Duration = Duration::from_millis(150);

/// Idle poll timeout while no tick is pending (menu, pause, game over).
const IDLE_POLL: Duration = Duration::from_millis(50);

const SETTINGS_PATH: &str = "retro-arena-settings.json";

fn main() -> io::Result<()> {
    env_logger::init();

    let settings = Settings::load(Path::new(SETTINGS_PATH));
    let mut audio = audio::from_settings(&settings);

    let guard = TermGuard::new()?;
    let mut app = App::new(guard, settings);
    app.run(audio.as_mut())
}

struct App {
    guard: TermGuard,
    settings: Settings,
    renderer: Renderer,
    session: Session,
    /// Last press instant per key, for the sustain fallback.
    sustain: HashMap<String, Instant>,
}

impl App {
    fn new(guard: TermGuard, settings: Settings) -> Self {
        let (cols, rows) = terminal::size().unwrap_or((80, 24));
        Self {
            guard,
            settings,
            renderer: Renderer::new(cols, rows),
            session: new_session(Variant::Snake),
            sustain: HashMap::new(),
        }
    }

    fn run(&mut self, audio: &mut dyn AudioHook) -> io::Result<()> {
        loop {
            let now = Instant::now();
            let timeout = match self.session.time_until_tick(now) {
                Some(remaining) => remaining.min(IDLE_POLL),
                None => IDLE_POLL,
            };

            if event::poll(timeout)? {
                match event::read()? {
                    Event::Key(key) => {
                        if self.handle_key(key.code, key.kind) {
                            self.settings.save(Path::new(SETTINGS_PATH));
                            return Ok(());
                        }
                    }
                    Event::Resize(cols, rows) => self.renderer.resize(cols, rows),
                    _ => {}
                }
            }

            if !self.guard.enhanced_keys() {
                self.expire_sustained_keys(Instant::now());
            }

            let _ = self.session.tick(Instant::now());

            for game_event in self.session.drain_events() {
                audio.handle(&game_event);
            }

            self.draw()?;
        }
    }

    /// Returns true when the app should quit.
    fn handle_key(&mut self, code: KeyCode, kind: KeyEventKind) -> bool {
        let Some(key) = term::key_id(code) else {
            return false;
        };

        if kind == KeyEventKind::Release {
            self.session.key_up(&key);
            return false;
        }

        if !self.guard.enhanced_keys() {
            self.sustain.insert(key.clone(), Instant::now());
        }

        match (self.session.phase(), key.as_str()) {
            (_, "q") | (_, "Escape") => return true,

            (SessionPhase::Menu, "1") => self.switch_variant(Variant::Snake),
            (SessionPhase::Menu, "2") => self.switch_variant(Variant::FallingBlocks),
            (SessionPhase::Menu, "3") => self.switch_variant(Variant::PaddleDuel),
            (SessionPhase::Menu, "4") => self.switch_variant(Variant::BrickBreaker),
            (SessionPhase::Menu, "Enter") => self.session.start(Instant::now()),

            (SessionPhase::Playing, "p") => self.session.pause(),
            (SessionPhase::Paused, "p") => self.session.resume(Instant::now()),

            (SessionPhase::Playing | SessionPhase::Paused | SessionPhase::GameOver, "r") => {
                self.session.restart();
                self.sustain.clear();
            }

            (SessionPhase::Playing, _) => self.session.key_down(&key),
            _ => {}
        }
        false
    }

    /// Rebuild the session for a different variant, re-reading the score
    /// file so another process's scores are picked up.
    fn switch_variant(&mut self, variant: Variant) {
        if self.session.variant() != variant {
            self.session = new_session(variant);
            self.sustain.clear();
        }
    }

    /// Synthesize key-up for keys whose auto-repeat stream went quiet.
    fn expire_sustained_keys(&mut self, now: Instant) {
        let expired: Vec<String> = self
            .sustain
            .iter()
            .filter(|&(_, &pressed)| now.duration_since(pressed) > KEY_SUSTAIN)
            .map(|(key, _)| key.clone())
            .collect();
        for key in expired {
            self.session.key_up(&key);
            self.sustain.remove(&key);
        }
    }

    fn draw(&mut self) -> io::Result<()> {
        let scene = self.session.scene();
        let status = self.status_line();
        self.renderer.draw(self.guard.out(), &scene)?;
        let row = terminal::size().map(|(_, rows)| rows.saturating_sub(1)).unwrap_or(23);
        self.renderer.status_line(self.guard.out(), row, &status)?;
        use std::io::Write;
        self.guard.out().flush()
    }

    fn status_line(&self) -> String {
        let base = format!(
            "[{}] score {}  best {}",
            self.session.variant().title(),
            self.session.score(),
            self.session.high_score(),
        );
        match self.session.phase() {
            SessionPhase::Menu => format!(
                "{base}  |  1-4 pick game, Enter start, q quit"
            ),
            SessionPhase::Playing => format!("{base}  |  p pause, r restart, q quit"),
            SessionPhase::Paused => format!("{base}  |  PAUSED, p to resume"),
            SessionPhase::GameOver => {
                let final_score = self.session.final_score().unwrap_or(0);
                format!("{base}  |  GAME OVER, final {final_score}, r to restart")
            }
        }
    }
}

fn new_session(variant: Variant) -> Session {
    let store = JsonHighScores::load(retro_arena::highscores::default_path());
    let seed = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0);
    Session::new(variant, seed, Box::new(store))
}
