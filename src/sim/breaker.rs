//! Brick-Breaker rules engine
//!
//! A 600x400 field, a 5x10 wall of bricks, one paddle, three lives. The
//! paddle is driven by held keys sampled every tick; bricks are worth ten
//! points each and clearing the wall ends the run as a win. 16 ms cadence.

use std::time::Duration;

use glam::Vec2;

use super::engine::{GameEvent, Outcome, RulesEngine};
use super::geom::{circle_rect_overlap, Circle, Rect};
use super::input::{Intent, TickInput};
use super::scene::{Color, Scene};

pub const FIELD_W: f32 = 600.0;
pub const FIELD_H: f32 = 400.0;
const PADDLE_W: f32 = 100.0;
const PADDLE_H: f32 = 10.0;
const PADDLE_Y: f32 = 370.0;
const PADDLE_SPEED: f32 = 8.0;
const BALL_RADIUS: f32 = 8.0;
const BALL_START: Vec2 = Vec2::new(300.0, 350.0);
const BALL_START_VEL: Vec2 = Vec2::new(4.0, -4.0);

const BRICK_ROWS: usize = 5;
const BRICK_COLS: usize = 10;
const BRICK_W: f32 = 58.0;
const BRICK_H: f32 = 20.0;
const BRICK_PAD: f32 = 2.0;
const BRICK_TOP: f32 = 50.0;
const BRICK_POINTS: u32 = 10;
const START_LIVES: u32 = 3;
const CADENCE: Duration = Duration::from_millis(16);

const ROW_COLORS: [Color; BRICK_ROWS] = [
    Color::RED,
    Color::ORANGE,
    Color::YELLOW,
    Color::GREEN,
    Color::BLUE,
];

#[derive(Debug)]
pub struct BrickBreaker {
    paddle_x: f32,
    ball: Vec2,
    vel: Vec2,
    bricks: [[bool; BRICK_COLS]; BRICK_ROWS],
    lives: u32,
    score: u64,
}

impl BrickBreaker {
    pub fn new(_seed: u64) -> Self {
        Self {
            paddle_x: (FIELD_W - PADDLE_W) / 2.0,
            ball: BALL_START,
            vel: BALL_START_VEL,
            bricks: [[true; BRICK_COLS]; BRICK_ROWS],
            lives: START_LIVES,
            score: 0,
        }
    }

    pub fn lives(&self) -> u32 {
        self.lives
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn bricks_left(&self) -> usize {
        self.bricks.iter().flatten().filter(|&&b| b).count()
    }

    fn paddle_rect(&self) -> Rect {
        Rect::new(self.paddle_x, PADDLE_Y, PADDLE_W, PADDLE_H)
    }

    fn brick_rect(row: usize, col: usize) -> Rect {
        Rect::new(
            col as f32 * (BRICK_W + BRICK_PAD) + BRICK_PAD,
            row as f32 * (BRICK_H + BRICK_PAD) + BRICK_TOP,
            BRICK_W,
            BRICK_H,
        )
    }

    fn move_paddle(&mut self, input: &TickInput) {
        if input.is_down("ArrowLeft") || input.is_down("a") || input.is_down("A") {
            self.paddle_x -= PADDLE_SPEED;
        }
        if input.is_down("ArrowRight") || input.is_down("d") || input.is_down("D") {
            self.paddle_x += PADDLE_SPEED;
        }
        self.paddle_x = self.paddle_x.clamp(0.0, FIELD_W - PADDLE_W);
    }

    fn respawn_ball(&mut self) {
        self.ball = BALL_START;
        self.vel = BALL_START_VEL;
    }
}

impl RulesEngine for BrickBreaker {
    fn reset(&mut self) {
        self.paddle_x = (FIELD_W - PADDLE_W) / 2.0;
        self.ball = BALL_START;
        self.vel = BALL_START_VEL;
        self.bricks = [[true; BRICK_COLS]; BRICK_ROWS];
        self.lives = START_LIVES;
        self.score = 0;
    }

    fn advance(&mut self, input: &TickInput, events: &mut Vec<GameEvent>) -> Outcome {
        self.move_paddle(input);

        self.ball += self.vel;

        if self.ball.x - BALL_RADIUS <= 0.0 || self.ball.x + BALL_RADIUS >= FIELD_W {
            self.vel.x = -self.vel.x;
            events.push(GameEvent::WallBounce);
        }
        if self.ball.y - BALL_RADIUS <= 0.0 {
            self.vel.y = -self.vel.y;
            events.push(GameEvent::WallBounce);
        }

        // Paddle check gates on downward travel so the ball cannot re-hit
        // while already climbing away.
        let paddle = self.paddle_rect();
        let ball = Circle {
            center: self.ball,
            radius: BALL_RADIUS,
        };
        if self.vel.y > 0.0 && circle_rect_overlap(&ball, &paddle) {
            self.vel.y = -self.vel.y;
            let hit = (self.ball.x - paddle.left()) / PADDLE_W;
            self.vel.x = (hit - 0.5) * 8.0;
            events.push(GameEvent::PaddleHit);
        }

        // Every brick is checked independently against the post-move ball,
        // each hit flipping the vertical velocity. A ball that clips two
        // bricks in one tick scores both and leaves with its original
        // vertical direction.
        let mut delta = 0u32;
        let ball = Circle {
            center: self.ball,
            radius: BALL_RADIUS,
        };
        for row in 0..BRICK_ROWS {
            for col in 0..BRICK_COLS {
                if self.bricks[row][col]
                    && circle_rect_overlap(&ball, &Self::brick_rect(row, col))
                {
                    self.bricks[row][col] = false;
                    self.vel.y = -self.vel.y;
                    delta += BRICK_POINTS;
                    events.push(GameEvent::BrickBroken);
                }
            }
        }
        if delta > 0 {
            self.score += u64::from(delta);
            if self.bricks_left() == 0 {
                events.push(GameEvent::GameOver);
                return Outcome::Terminal(self.score);
            }
            return Outcome::ScoreDelta(delta);
        }

        // Life lost once the ball's center passes the bottom edge.
        if self.ball.y > FIELD_H {
            self.lives -= 1;
            events.push(GameEvent::LifeLost);
            if self.lives == 0 {
                events.push(GameEvent::GameOver);
                return Outcome::Terminal(self.score);
            }
            self.respawn_ball();
        }

        Outcome::Continue
    }

    fn render_model(&self) -> Scene {
        let mut scene = Scene::new(FIELD_W, FIELD_H);

        for row in 0..BRICK_ROWS {
            for col in 0..BRICK_COLS {
                if self.bricks[row][col] {
                    scene.push_rect(Self::brick_rect(row, col), ROW_COLORS[row]);
                }
            }
        }
        scene.push_rect(self.paddle_rect(), Color::CYAN);
        scene.push_circle(
            Circle {
                center: self.ball,
                radius: BALL_RADIUS,
            },
            Color::WHITE,
        );

        scene.push_label(
            Vec2::new(10.0, 30.0),
            format!("Score: {}", self.score),
            Color::WHITE,
        );
        scene.push_label(
            Vec2::new(FIELD_W - 90.0, 30.0),
            format!("Lives: {}", self.lives),
            Color::WHITE,
        );

        scene
    }

    fn cadence(&self) -> Duration {
        CADENCE
    }

    fn map_key(&self, _key: &str) -> Option<Intent> {
        None
    }
}
