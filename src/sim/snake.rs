//! Snake rules engine
//!
//! A 30x20 cell grid. The snake does nothing until the first turn intent is
//! accepted; after that it steps one cell per tick, growing when it eats and
//! dying on walls or its own body. Grid movement does not need 60 Hz, so the
//! cadence is a leisurely 150 ms.

use std::collections::VecDeque;
use std::time::Duration;

use glam::{IVec2, Vec2};
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::engine::{GameEvent, Outcome, RulesEngine};
use super::geom::Rect;
use super::input::{Dir, Intent, TickInput};
use super::scene::{Color, Scene};

pub const GRID_W: i32 = 30;
pub const GRID_H: i32 = 20;
pub const CELL: f32 = 20.0;
const FOOD_POINTS: u32 = 10;
const CADENCE: Duration = Duration::from_millis(150);

const START_CELL: IVec2 = IVec2::new(10, 10);
const START_FOOD: IVec2 = IVec2::new(15, 15);

#[derive(Debug)]
pub struct SnakeGame {
    rng: Pcg32,
    /// Head first; insertion order is traversal order.
    body: VecDeque<IVec2>,
    food: IVec2,
    heading: Option<Dir>,
    score: u64,
}

impl SnakeGame {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
            body: VecDeque::from([START_CELL]),
            food: START_FOOD,
            heading: None,
            score: 0,
        }
    }

    pub fn head(&self) -> IVec2 {
        *self.body.front().expect("snake always has a head")
    }

    pub fn body_len(&self) -> usize {
        self.body.len()
    }

    pub fn heading(&self) -> Option<Dir> {
        self.heading
    }

    pub fn food(&self) -> IVec2 {
        self.food
    }

    /// Uniform over the whole grid. Deliberately does not exclude the snake
    /// body, matching the original behavior; a rejection-sampling guard
    /// would change observable RNG streams.
    fn spawn_food(&mut self) -> IVec2 {
        IVec2::new(
            self.rng.random_range(0..GRID_W),
            self.rng.random_range(0..GRID_H),
        )
    }

    fn apply_turns(&mut self, input: &TickInput) {
        for intent in &input.intents {
            if let Intent::Turn(dir) = *intent {
                // Re-validated here: an earlier turn in the same tick could
                // have made a queued-valid turn into a reversal.
                if self.heading != Some(dir.opposite()) {
                    self.heading = Some(dir);
                }
            }
        }
    }

    fn cell_rect(cell: IVec2) -> Rect {
        // Inset by 1 px on each side so adjacent cells read as segments.
        Rect::new(
            cell.x as f32 * CELL + 1.0,
            cell.y as f32 * CELL + 1.0,
            CELL - 2.0,
            CELL - 2.0,
        )
    }
}

impl RulesEngine for SnakeGame {
    fn reset(&mut self) {
        self.body = VecDeque::from([START_CELL]);
        self.food = START_FOOD;
        self.heading = None;
        self.score = 0;
    }

    fn advance(&mut self, input: &TickInput, events: &mut Vec<GameEvent>) -> Outcome {
        self.apply_turns(input);

        let Some(heading) = self.heading else {
            // No direction chosen yet: the snake waits.
            return Outcome::Continue;
        };

        let head = self.head() + heading.delta();

        if head.x < 0 || head.x >= GRID_W || head.y < 0 || head.y >= GRID_H {
            events.push(GameEvent::GameOver);
            return Outcome::Terminal(self.score);
        }
        if self.body.contains(&head) {
            events.push(GameEvent::GameOver);
            return Outcome::Terminal(self.score);
        }

        self.body.push_front(head);

        if head == self.food {
            self.score += u64::from(FOOD_POINTS);
            self.food = self.spawn_food();
            events.push(GameEvent::FoodEaten);
            Outcome::ScoreDelta(FOOD_POINTS)
        } else {
            let _ = self.body.pop_back();
            Outcome::Continue
        }
    }

    fn render_model(&self) -> Scene {
        let mut scene = Scene::new(GRID_W as f32 * CELL, GRID_H as f32 * CELL);

        for (index, &segment) in self.body.iter().enumerate() {
            let color = if index == 0 {
                Color::CYAN
            } else {
                Color::LIGHT_CYAN
            };
            scene.push_rect(Self::cell_rect(segment), color);
        }
        scene.push_rect(Self::cell_rect(self.food), Color::MAGENTA);
        scene.push_label(
            Vec2::new(10.0, 30.0),
            format!("Score: {}", self.score),
            Color::WHITE,
        );

        scene
    }

    fn cadence(&self) -> Duration {
        CADENCE
    }

    fn map_key(&self, key: &str) -> Option<Intent> {
        match key {
            "ArrowUp" => Some(Intent::Turn(Dir::Up)),
            "ArrowDown" => Some(Intent::Turn(Dir::Down)),
            "ArrowLeft" => Some(Intent::Turn(Dir::Left)),
            "ArrowRight" => Some(Intent::Turn(Dir::Right)),
            _ => None,
        }
    }

    fn accepts_intent(&self, intent: Intent) -> bool {
        match intent {
            Intent::Turn(dir) => self.heading != Some(dir.opposite()),
            _ => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn turn(dir: Dir) -> TickInput {
        TickInput {
            intents: vec![Intent::Turn(dir)],
            ..TickInput::default()
        }
    }

    fn coast() -> TickInput {
        TickInput::default()
    }

    #[test]
    fn waits_until_first_turn_is_accepted() {
        let mut game = SnakeGame::new(1);
        let mut events = Vec::new();

        for _ in 0..5 {
            assert_eq!(game.advance(&coast(), &mut events), Outcome::Continue);
            assert_eq!(game.head(), IVec2::new(10, 10));
        }

        assert_eq!(game.advance(&turn(Dir::Right), &mut events), Outcome::Continue);
        assert_eq!(game.head(), IVec2::new(11, 10));
        // No food hit: tail dropped, length unchanged.
        assert_eq!(game.body_len(), 1);
    }

    #[test]
    fn eating_food_grows_and_scores() {
        let mut game = SnakeGame::new(1);
        game.food = IVec2::new(11, 10);
        let mut events = Vec::new();

        assert_eq!(
            game.advance(&turn(Dir::Right), &mut events),
            Outcome::ScoreDelta(10)
        );
        assert_eq!(game.body_len(), 2);
        assert_eq!(events, vec![GameEvent::FoodEaten]);
        assert_ne!(game.food(), IVec2::new(11, 10));
    }

    #[test]
    fn wall_collision_is_terminal_with_final_score() {
        let mut game = SnakeGame::new(1);
        let mut events = Vec::new();
        let _ = game.advance(&turn(Dir::Up), &mut events);

        let mut outcome = Outcome::Continue;
        for _ in 0..GRID_H {
            outcome = game.advance(&coast(), &mut events);
            if matches!(outcome, Outcome::Terminal(_)) {
                break;
            }
        }
        assert_eq!(outcome, Outcome::Terminal(0));
        assert!(events.contains(&GameEvent::GameOver));
    }

    #[test]
    fn self_collision_is_terminal() {
        let mut game = SnakeGame::new(1);
        // Long enough to curl into itself.
        game.body = VecDeque::from([
            IVec2::new(10, 10),
            IVec2::new(10, 11),
            IVec2::new(11, 11),
            IVec2::new(12, 11),
            IVec2::new(12, 10),
        ]);
        game.heading = Some(Dir::Right);
        let mut events = Vec::new();

        // Turning down at (11,10) would be fine; heading right into (11,10)?
        // Head moves right to (11,10), which is free; then down into (11,11)
        // which is body.
        assert_eq!(game.advance(&coast(), &mut events), Outcome::Continue);
        assert!(matches!(
            game.advance(&turn(Dir::Down), &mut events),
            Outcome::Terminal(_)
        ));
    }

    #[test]
    fn reversal_within_one_tick_is_dropped_at_apply_time() {
        let mut game = SnakeGame::new(1);
        let mut events = Vec::new();
        let _ = game.advance(&turn(Dir::Right), &mut events);

        // Both turns pass the queue-time check against heading Right, but
        // after Up applies, Down would be a reversal.
        let input = TickInput {
            intents: vec![Intent::Turn(Dir::Up), Intent::Turn(Dir::Down)],
            ..TickInput::default()
        };
        let _ = game.advance(&input, &mut events);
        assert_eq!(game.heading(), Some(Dir::Up));
    }

    #[test]
    fn reset_restores_initial_layout() {
        let mut game = SnakeGame::new(1);
        let mut events = Vec::new();
        let _ = game.advance(&turn(Dir::Down), &mut events);
        game.reset();
        assert_eq!(game.head(), IVec2::new(10, 10));
        assert_eq!(game.food(), IVec2::new(15, 15));
        assert_eq!(game.heading(), None);
        assert_eq!(game.body_len(), 1);
    }

    proptest! {
        /// The heading never becomes the exact inverse of what it was at
        /// the start of the tick, no matter what turns are queued.
        #[test]
        fn heading_never_reverses(dirs in proptest::collection::vec(0u8..4, 1..40)) {
            let mut game = SnakeGame::new(99);
            let mut events = Vec::new();

            for d in dirs {
                let before = game.heading();
                let intent = Intent::Turn(match d {
                    0 => Dir::Up,
                    1 => Dir::Down,
                    2 => Dir::Left,
                    _ => Dir::Right,
                });
                let intents = if game.accepts_intent(intent) {
                    vec![intent]
                } else {
                    Vec::new()
                };
                let input = TickInput { intents, ..TickInput::default() };
                if matches!(game.advance(&input, &mut events), Outcome::Terminal(_)) {
                    break;
                }
                if let (Some(b), Some(a)) = (before, game.heading()) {
                    prop_assert_ne!(a, b.opposite());
                }
            }
        }
    }
}
