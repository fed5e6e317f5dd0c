//! Falling-Blocks rules engine
//!
//! A 10x20 board. The engine ticks fast (50 ms) so lateral shifts, soft
//! drops, hard drops, and rotations land on the tick after the key press;
//! gravity runs on its own slower interval via an internal fall
//! accumulator. The fall interval shortens by 100 ms per level, floored at
//! 100 ms.

use std::time::Duration;

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::engine::{GameEvent, Outcome, RulesEngine};
use super::geom::Rect;
use super::input::{Intent, TickInput};
use super::scene::{Color, Scene};

pub const BOARD_W: i32 = 10;
pub const BOARD_H: i32 = 20;
pub const CELL: f32 = 30.0;
const LINE_POINTS: u64 = 100;
const TICK: Duration = Duration::from_millis(50);

/// The seven tetrominoes: shape matrix plus color, in the source's order
/// (I, O, T, S, Z, J, L).
const PIECES: [(&[&[u8]], Color); 7] = [
    (&[&[1, 1, 1, 1]], Color::CYAN),
    (&[&[1, 1], &[1, 1]], Color::YELLOW),
    (&[&[0, 1, 0], &[1, 1, 1]], Color::MAGENTA),
    (&[&[0, 1, 1], &[1, 1, 0]], Color::GREEN),
    (&[&[1, 1, 0], &[0, 1, 1]], Color::RED),
    (&[&[1, 0, 0], &[1, 1, 1]], Color::DEEP_BLUE),
    (&[&[0, 0, 1], &[1, 1, 1]], Color::ORANGE),
];

#[derive(Debug, Clone)]
struct Piece {
    shape: Vec<Vec<u8>>,
    color: Color,
    x: i32,
    y: i32,
}

impl Piece {
    fn cells(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        self.shape.iter().enumerate().flat_map(move |(dy, row)| {
            row.iter()
                .enumerate()
                .filter(|&(_, &cell)| cell != 0)
                .map(move |(dx, _)| (self.x + dx as i32, self.y + dy as i32))
        })
    }

    /// Transpose-and-reverse-rows, the source's rotation.
    fn rotated(&self) -> Vec<Vec<u8>> {
        let rows = self.shape.len();
        let cols = self.shape[0].len();
        (0..cols)
            .map(|c| (0..rows).rev().map(|r| self.shape[r][c]).collect())
            .collect()
    }
}

#[derive(Debug)]
pub struct FallingBlocks {
    rng: Pcg32,
    board: [[bool; BOARD_W as usize]; BOARD_H as usize],
    piece: Piece,
    /// Time accumulated toward the next gravity step.
    fall_timer: Duration,
    lines: u32,
    level: u32,
    score: u64,
}

impl FallingBlocks {
    pub fn new(seed: u64) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let piece = Self::random_piece(&mut rng);
        Self {
            rng,
            board: [[false; BOARD_W as usize]; BOARD_H as usize],
            piece,
            fall_timer: Duration::ZERO,
            lines: 0,
            level: 1,
            score: 0,
        }
    }

    pub fn lines(&self) -> u32 {
        self.lines
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    fn random_piece(rng: &mut Pcg32) -> Piece {
        let (shape, color) = PIECES[rng.random_range(0..PIECES.len())];
        let shape: Vec<Vec<u8>> = shape.iter().map(|row| row.to_vec()).collect();
        let width = shape[0].len() as i32;
        Piece {
            x: BOARD_W / 2 - width / 2,
            y: 0,
            shape,
            color,
        }
    }

    /// Would the piece's shape fit at its position offset by (dx, dy)?
    /// Cells above the board (y < 0) are allowed; the spawn row is row 0.
    fn fits(&self, shape: &[Vec<u8>], x: i32, y: i32) -> bool {
        for (dy, row) in shape.iter().enumerate() {
            for (dx, &cell) in row.iter().enumerate() {
                if cell == 0 {
                    continue;
                }
                let cx = x + dx as i32;
                let cy = y + dy as i32;
                if cx < 0 || cx >= BOARD_W || cy >= BOARD_H {
                    return false;
                }
                if cy >= 0 && self.board[cy as usize][cx as usize] {
                    return false;
                }
            }
        }
        true
    }

    fn piece_fits(&self, dx: i32, dy: i32) -> bool {
        self.fits(&self.piece.shape, self.piece.x + dx, self.piece.y + dy)
    }

    /// Time between gravity steps, shrinking as the level rises.
    fn fall_interval(&self) -> Duration {
        let ms = 1000u64.saturating_sub(u64::from(self.level - 1) * 100).max(100);
        Duration::from_millis(ms)
    }

    fn apply_intents(&mut self, input: &TickInput) {
        for intent in &input.intents {
            match intent {
                Intent::ShiftLeft => {
                    if self.piece_fits(-1, 0) {
                        self.piece.x -= 1;
                    }
                }
                Intent::ShiftRight => {
                    if self.piece_fits(1, 0) {
                        self.piece.x += 1;
                    }
                }
                Intent::SoftDrop => {
                    if self.piece_fits(0, 1) {
                        self.piece.y += 1;
                    }
                }
                Intent::HardDrop => {
                    while self.piece_fits(0, 1) {
                        self.piece.y += 1;
                    }
                }
                Intent::Rotate => {
                    let rotated = self.piece.rotated();
                    if self.fits(&rotated, self.piece.x, self.piece.y) {
                        self.piece.shape = rotated;
                    }
                }
                Intent::Turn(_) => {}
            }
        }
    }

    /// Lock the piece into the board, clear full rows, and spawn the next
    /// piece. Returns the points awarded (level read before the update).
    fn lock_and_clear(&mut self, events: &mut Vec<GameEvent>) -> u32 {
        for (cx, cy) in self.piece.cells().collect::<Vec<_>>() {
            if cy >= 0 {
                self.board[cy as usize][cx as usize] = true;
            }
        }

        // Bottom-to-top scan; a cleared row re-checks the row shifted into
        // its place.
        let mut cleared = 0u32;
        let mut y = BOARD_H as usize - 1;
        loop {
            if self.board[y].iter().all(|&cell| cell) {
                for row in (1..=y).rev() {
                    self.board[row] = self.board[row - 1];
                }
                self.board[0] = [false; BOARD_W as usize];
                cleared += 1;
                // Same index again: the row above just moved in.
            } else if y == 0 {
                break;
            } else {
                y -= 1;
            }
        }

        let mut awarded = 0u32;
        if cleared > 0 {
            // Score from the level in effect before this clear.
            awarded = cleared * LINE_POINTS as u32 * self.level;
            self.score += u64::from(awarded);
            self.lines += cleared;
            self.level = self.lines / 10 + 1;
            events.push(GameEvent::LinesCleared(cleared));
        }

        self.piece = Self::random_piece(&mut self.rng);
        awarded
    }

    fn cell_rect(cx: i32, cy: i32) -> Rect {
        Rect::new(
            cx as f32 * CELL + 1.0,
            cy as f32 * CELL + 1.0,
            CELL - 2.0,
            CELL - 2.0,
        )
    }
}

impl RulesEngine for FallingBlocks {
    fn reset(&mut self) {
        self.board = [[false; BOARD_W as usize]; BOARD_H as usize];
        self.piece = Self::random_piece(&mut self.rng);
        self.fall_timer = Duration::ZERO;
        self.lines = 0;
        self.level = 1;
        self.score = 0;
    }

    fn advance(&mut self, input: &TickInput, events: &mut Vec<GameEvent>) -> Outcome {
        self.apply_intents(input);

        // Gravity only fires when the accumulator crosses the fall
        // interval; every other tick exists just to apply intents.
        self.fall_timer += TICK;
        if self.fall_timer < self.fall_interval() {
            return Outcome::Continue;
        }
        self.fall_timer = Duration::ZERO;

        if self.piece_fits(0, 1) {
            self.piece.y += 1;
            return Outcome::Continue;
        }

        let awarded = self.lock_and_clear(events);

        if !self.piece_fits(0, 0) {
            // Board full: the fresh spawn overlaps settled cells.
            events.push(GameEvent::GameOver);
            return Outcome::Terminal(self.score);
        }

        if awarded > 0 {
            Outcome::ScoreDelta(awarded)
        } else {
            Outcome::Continue
        }
    }

    fn render_model(&self) -> Scene {
        let board_h = BOARD_H as f32 * CELL;
        // Extra band below the board for the stats labels.
        let mut scene = Scene::new(BOARD_W as f32 * CELL, board_h + 80.0);

        for (cy, row) in self.board.iter().enumerate() {
            for (cx, &cell) in row.iter().enumerate() {
                if cell {
                    scene.push_rect(Self::cell_rect(cx as i32, cy as i32), Color::CYAN);
                }
            }
        }
        for (cx, cy) in self.piece.cells() {
            if cy >= 0 {
                scene.push_rect(Self::cell_rect(cx, cy), self.piece.color);
            }
        }

        scene.push_label(
            Vec2::new(10.0, board_h + 25.0),
            format!("Score: {}", self.score),
            Color::WHITE,
        );
        scene.push_label(
            Vec2::new(10.0, board_h + 45.0),
            format!("Lines: {}", self.lines),
            Color::WHITE,
        );
        scene.push_label(
            Vec2::new(10.0, board_h + 65.0),
            format!("Level: {}", self.level),
            Color::WHITE,
        );

        scene
    }

    fn cadence(&self) -> Duration {
        TICK
    }

    fn map_key(&self, key: &str) -> Option<Intent> {
        match key {
            "ArrowLeft" => Some(Intent::ShiftLeft),
            "ArrowRight" => Some(Intent::ShiftRight),
            "ArrowDown" => Some(Intent::SoftDrop),
            "ArrowUp" => Some(Intent::Rotate),
            " " => Some(Intent::HardDrop),
            _ => None,
        }
    }
}
