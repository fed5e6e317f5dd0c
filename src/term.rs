//! Terminal platform layer
//!
//! Raw-mode guard, key translation, and a half-block renderer that scales
//! a [`Scene`] from playfield coordinates to the terminal cell grid. Each
//! character cell carries two vertical pixels via `▀`, so the effective
//! pixel height is twice the row count.
//!
//! Key release events only exist under the kitty keyboard protocol; the
//! guard pushes the enhancement flags when the terminal supports them and
//! reports back whether it succeeded, so the caller can fall back to a
//! key-sustain timer on plain terminals.

use std::io::{self, Stdout, Write, stdout};

use crossterm::{
    cursor,
    event::{
        KeyCode, KeyboardEnhancementFlags, PopKeyboardEnhancementFlags,
        PushKeyboardEnhancementFlags,
    },
    execute, queue,
    style::{self, Color as CColor},
    terminal,
};
use glam::Vec2;

use crate::sim::scene::{Color, Scene};

/// RAII guard for the terminal state. Restores everything on drop, even
/// when the event loop unwinds.
pub struct TermGuard {
    out: Stdout,
    enhanced_keys: bool,
}

impl TermGuard {
    pub fn new() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        let mut out = stdout();
        execute!(
            out,
            terminal::EnterAlternateScreen,
            cursor::Hide,
            terminal::DisableLineWrap,
        )?;

        let enhanced_keys = terminal::supports_keyboard_enhancement().unwrap_or(false);
        if enhanced_keys {
            execute!(
                out,
                PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)
            )?;
            log::info!("keyboard enhancement active, real key-release events");
        } else {
            log::info!("no keyboard enhancement, using key-sustain fallback");
        }

        Ok(Self { out, enhanced_keys })
    }

    /// Whether the terminal delivers genuine key-release events.
    pub fn enhanced_keys(&self) -> bool {
        self.enhanced_keys
    }

    pub fn out(&mut self) -> &mut Stdout {
        &mut self.out
    }
}

impl Drop for TermGuard {
    fn drop(&mut self) {
        if self.enhanced_keys {
            let _ = execute!(self.out, PopKeyboardEnhancementFlags);
        }
        let _ = execute!(
            self.out,
            terminal::LeaveAlternateScreen,
            cursor::Show,
            terminal::EnableLineWrap,
        );
        let _ = terminal::disable_raw_mode();
    }
}

/// Browser-style key identifier for a key code, the form the engines'
/// `map_key` tables use.
pub fn key_id(code: KeyCode) -> Option<String> {
    match code {
        KeyCode::Up => Some("ArrowUp".to_owned()),
        KeyCode::Down => Some("ArrowDown".to_owned()),
        KeyCode::Left => Some("ArrowLeft".to_owned()),
        KeyCode::Right => Some("ArrowRight".to_owned()),
        KeyCode::Enter => Some("Enter".to_owned()),
        KeyCode::Esc => Some("Escape".to_owned()),
        KeyCode::Char(c) => Some(c.to_string()),
        _ => None,
    }
}

/// Scene renderer backed by a pixel buffer at double vertical resolution.
pub struct Renderer {
    cols: usize,
    rows: usize,
    px: Vec<Color>,
}

impl Renderer {
    pub fn new(cols: u16, rows: u16) -> Self {
        let cols = cols as usize;
        let rows = rows as usize;
        Self {
            cols,
            rows,
            px: vec![Color::BACKDROP; cols * rows * 2],
        }
    }

    pub fn resize(&mut self, cols: u16, rows: u16) {
        self.cols = cols as usize;
        self.rows = rows as usize;
        self.px.clear();
        self.px.resize(self.cols * self.rows * 2, Color::BACKDROP);
    }

    fn set(&mut self, x: i32, y: i32, c: Color) {
        if x >= 0 && y >= 0 && (x as usize) < self.cols && (y as usize) < self.rows * 2 {
            self.px[y as usize * self.cols + x as usize] = c;
        }
    }

    fn get(&self, x: usize, y: usize) -> Color {
        self.px[y * self.cols + x]
    }

    /// Uniform scale factor that fits the scene into the pixel grid.
    fn scale(&self, scene: &Scene) -> f32 {
        let sx = self.cols as f32 / scene.width.max(1.0);
        let sy = (self.rows * 2) as f32 / scene.height.max(1.0);
        sx.min(sy)
    }

    /// Rasterize and flush one frame. Labels are drawn afterwards as real
    /// text on top of the pixel rows.
    pub fn draw(&mut self, out: &mut impl Write, scene: &Scene) -> io::Result<()> {
        self.px.fill(Color::BACKDROP);
        let scale = self.scale(scene);

        for sr in &scene.rects {
            let pos = sr.rect.pos * scale;
            let size = (sr.rect.size * scale).max(Vec2::ONE);
            for dy in 0..size.y as i32 {
                for dx in 0..size.x as i32 {
                    self.set(pos.x as i32 + dx, pos.y as i32 + dy, sr.color);
                }
            }
        }

        for sc in &scene.circles {
            let center = sc.circle.center * scale;
            let radius = (sc.circle.radius * scale).max(1.0);
            let r = radius.ceil() as i32;
            for dy in -r..=r {
                for dx in -r..=r {
                    if (dx * dx + dy * dy) as f32 <= radius * radius {
                        self.set(center.x as i32 + dx, center.y as i32 + dy, sc.color);
                    }
                }
            }
        }

        self.blit(out)?;
        self.labels(out, scene, scale)?;
        out.flush()
    }

    fn blit(&self, out: &mut impl Write) -> io::Result<()> {
        queue!(out, cursor::MoveTo(0, 0))?;
        for row in 0..self.rows {
            for col in 0..self.cols {
                let top = self.get(col, row * 2);
                let bot = self.get(col, row * 2 + 1);
                queue!(
                    out,
                    style::SetForegroundColor(CColor::Rgb {
                        r: top.0,
                        g: top.1,
                        b: top.2
                    }),
                    style::SetBackgroundColor(CColor::Rgb {
                        r: bot.0,
                        g: bot.1,
                        b: bot.2
                    }),
                    style::Print('\u{2580}')
                )?;
            }
            if row < self.rows - 1 {
                queue!(out, style::ResetColor, style::Print("\r\n"))?;
            }
        }
        queue!(out, style::ResetColor)?;
        Ok(())
    }

    fn labels(&self, out: &mut impl Write, scene: &Scene, scale: f32) -> io::Result<()> {
        for label in &scene.labels {
            let col = (label.pos.x * scale) as u16;
            let row = ((label.pos.y * scale) / 2.0) as u16;
            if (row as usize) >= self.rows {
                continue;
            }
            queue!(
                out,
                cursor::MoveTo(col, row),
                style::SetForegroundColor(CColor::Rgb {
                    r: label.color.0,
                    g: label.color.1,
                    b: label.color.2
                }),
                style::SetBackgroundColor(CColor::Rgb {
                    r: Color::BACKDROP.0,
                    g: Color::BACKDROP.1,
                    b: Color::BACKDROP.2
                }),
                style::Print(&label.text),
                style::ResetColor
            )?;
        }
        Ok(())
    }

    /// One line of status text on a given terminal row.
    pub fn status_line(&self, out: &mut impl Write, row: u16, text: &str) -> io::Result<()> {
        queue!(
            out,
            cursor::MoveTo(0, row),
            terminal::Clear(terminal::ClearType::CurrentLine),
            style::SetForegroundColor(CColor::Rgb {
                r: 255,
                g: 255,
                b: 255
            }),
            style::Print(text),
            style::ResetColor
        )?;
        Ok(())
    }
}
