//! Two-player snake on a 30x20 grid

use std::collections::VecDeque;

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::input::{ControlSet, Direction, InputSampler};
use super::match_state::{MatchConfig, MatchState, PlayerSlot};
use super::{Game, SimClock};

pub const CELL: f32 = 20.0;
pub const COLS: i32 = 30;
pub const ROWS: i32 = 20;
pub const START_LENGTH: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SnakeTuning {
    pub step_ms: f64,
    /// Leaving one edge re-enters from the opposite edge
    pub wrap: bool,
}

impl Default for SnakeTuning {
    fn default() -> Self {
        Self {
            step_ms: 200.0,
            wrap: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cell {
    pub x: i32,
    pub y: i32,
}

impl Cell {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    fn in_bounds(self) -> bool {
        (0..COLS).contains(&self.x) && (0..ROWS).contains(&self.y)
    }

    fn wrapped(self) -> Self {
        Self::new(self.x.rem_euclid(COLS), self.y.rem_euclid(ROWS))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Snake {
    /// Head first
    pub body: VecDeque<Cell>,
    /// Direction requested for the next step
    pub dir: Direction,
    /// Direction of the last step taken; turning back onto it is refused
    moved: Direction,
}

impl Snake {
    fn spawn(slot: PlayerSlot) -> Self {
        let y = ROWS / 2;
        let (body, dir) = match slot {
            PlayerSlot::One => (
                (0..START_LENGTH as i32).map(|i| Cell::new(5 - i, y)).collect(),
                Direction::Right,
            ),
            PlayerSlot::Two => (
                (0..START_LENGTH as i32).map(|i| Cell::new(25 + i, y)).collect(),
                Direction::Left,
            ),
        };
        Self { body, dir, moved: dir }
    }

    pub fn head(&self) -> Cell {
        self.body.front().copied().unwrap_or(Cell::new(0, 0))
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    fn turn(&mut self, dir: Direction) {
        if dir != self.moved.opposite() {
            self.dir = dir;
        }
    }

    fn next_head(&self, wrap: bool) -> Cell {
        let (dx, dy) = self.dir.offset();
        let head = self.head();
        let next = Cell::new(head.x + dx, head.y + dy);
        if wrap { next.wrapped() } else { next }
    }

    fn contains(&self, cell: Cell) -> bool {
        self.body.contains(&cell)
    }
}

pub struct SnakeGame {
    tuning: SnakeTuning,
    pub snakes: [Snake; 2],
    pub apple: Cell,
    next_step_ms: f64,
    rng: Pcg32,
    pub match_state: MatchState,
    clock: SimClock,
}

const CONTROLS: [ControlSet; 2] = [ControlSet::WASD, ControlSet::ARROWS];

impl SnakeGame {
    pub fn new(config: &MatchConfig, seed: u64) -> Self {
        Self::with_tuning(config, SnakeTuning::default(), seed)
    }

    pub fn with_tuning(config: &MatchConfig, tuning: SnakeTuning, seed: u64) -> Self {
        let mut game = Self {
            tuning,
            snakes: [Snake::spawn(PlayerSlot::One), Snake::spawn(PlayerSlot::Two)],
            apple: Cell::new(0, 0),
            next_step_ms: tuning.step_ms,
            rng: Pcg32::seed_from_u64(seed),
            match_state: MatchState::new(config),
            clock: SimClock::default(),
        };
        game.apple = game.random_apple();
        game
    }

    pub fn tuning(&self) -> &SnakeTuning {
        &self.tuning
    }

    pub fn set_wrap(&mut self, wrap: bool) {
        self.tuning.wrap = wrap;
    }

    pub fn snake(&self, slot: PlayerSlot) -> &Snake {
        &self.snakes[slot.index()]
    }

    fn random_apple(&mut self) -> Cell {
        let free: Vec<Cell> = (0..ROWS)
            .flat_map(|y| (0..COLS).map(move |x| Cell::new(x, y)))
            .filter(|c| !self.snakes.iter().any(|s| s.contains(*c)))
            .collect();
        if free.is_empty() {
            return Cell::new(0, 0);
        }
        free[self.rng.random_range(0..free.len())]
    }

    fn advance(&mut self, slot: PlayerSlot) {
        let wrap = self.tuning.wrap;
        let snake = &mut self.snakes[slot.index()];
        let head = snake.next_head(wrap);
        snake.body.push_front(head);
        snake.moved = snake.dir;
        if head == self.apple {
            self.apple = self.random_apple();
        } else {
            self.snakes[slot.index()].body.pop_back();
        }
    }

    fn crashed(&self, slot: PlayerSlot) -> bool {
        let me = &self.snakes[slot.index()];
        let other = &self.snakes[slot.other().index()];
        let head = me.head();
        me.body.iter().skip(1).any(|c| *c == head)
            || other.contains(head)
            || (!self.tuning.wrap && !head.in_bounds())
    }

    /// Move both snakes one cell and apply the collision rules
    pub fn step(&mut self) {
        if self.match_state.is_over() {
            return;
        }
        self.advance(PlayerSlot::One);
        self.advance(PlayerSlot::Two);

        let heads_met = self.snakes[0].head() == self.snakes[1].head();
        let (c1, c2) = (self.crashed(PlayerSlot::One), self.crashed(PlayerSlot::Two));
        let winner = if heads_met || (c1 && c2) {
            let coin = self.rng.random_bool(0.5);
            Some(if coin { PlayerSlot::One } else { PlayerSlot::Two })
        } else if c1 {
            Some(PlayerSlot::Two)
        } else if c2 {
            Some(PlayerSlot::One)
        } else {
            None
        };
        if let Some(slot) = winner {
            self.match_state.declare_winner(slot);
        }
    }
}

impl Game for SnakeGame {
    fn tick(&mut self, input: &InputSampler, dt: f32) {
        if self.match_state.is_over() {
            return;
        }
        self.clock.advance(dt);

        for (snake, controls) in self.snakes.iter_mut().zip(CONTROLS.iter()) {
            for dir in input.fresh_directions(controls) {
                snake.turn(dir);
            }
        }

        if self.clock.now_ms() + 1e-6 >= self.next_step_ms {
            self.next_step_ms += self.tuning.step_ms;
            self.step();
        }
    }

    fn reset(&mut self) {
        self.snakes = [Snake::spawn(PlayerSlot::One), Snake::spawn(PlayerSlot::Two)];
        self.apple = self.random_apple();
        self.clock.reset();
        self.next_step_ms = self.tuning.step_ms;
        self.match_state.new_round();
    }

    fn match_state(&self) -> &MatchState {
        &self.match_state
    }

    fn hud_text(&self) -> String {
        format!(
            "{}: длина {} | {}: длина {} | {}",
            self.match_state.name(PlayerSlot::One),
            self.snakes[0].len(),
            self.match_state.name(PlayerSlot::Two),
            self.snakes[1].len(),
            self.match_state.status_line()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;
    use crate::sim::input::Key;

    fn game() -> SnakeGame {
        let mut game = SnakeGame::new(&MatchConfig::default(), 5);
        game.apple = Cell::new(0, 0);
        game
    }

    fn run(game: &mut SnakeGame, input: &mut InputSampler, seconds: f32) {
        for _ in 0..(seconds / SIM_DT).round() as u32 {
            game.tick(input, SIM_DT);
            input.end_tick();
        }
    }

    #[test]
    fn test_start_positions() {
        let game = game();
        let one: Vec<_> = game.snake(PlayerSlot::One).body.iter().copied().collect();
        assert_eq!(one, vec![Cell::new(5, 10), Cell::new(4, 10), Cell::new(3, 10)]);
        assert_eq!(game.snake(PlayerSlot::Two).head(), Cell::new(25, 10));
        assert_eq!(game.snake(PlayerSlot::Two).dir, Direction::Left);
    }

    #[test]
    fn test_one_cell_per_step_interval() {
        let mut game = game();
        let mut input = InputSampler::new();
        run(&mut game, &mut input, 0.2);
        assert_eq!(game.snake(PlayerSlot::One).head(), Cell::new(6, 10));
        assert_eq!(game.snake(PlayerSlot::Two).head(), Cell::new(24, 10));
        assert_eq!(game.snake(PlayerSlot::One).len(), START_LENGTH);
    }

    #[test]
    fn test_reverse_is_refused() {
        let mut game = game();
        let mut input = InputSampler::new();
        input.key_down(Key::A, 0.0, false);
        run(&mut game, &mut input, 0.2);
        assert_eq!(game.snake(PlayerSlot::One).head(), Cell::new(6, 10));

        // Up then left before the next step would fold back onto the neck
        input.key_down(Key::W, 10.0, false);
        game.tick(&input, SIM_DT);
        input.end_tick();
        input.key_up(Key::A);
        input.key_down(Key::A, 20.0, false);
        game.tick(&input, SIM_DT);
        assert_eq!(game.snake(PlayerSlot::One).dir, Direction::Up);
    }

    #[test]
    fn test_apple_grows_snake() {
        let mut game = game();
        game.apple = Cell::new(6, 10);
        game.step();
        assert_eq!(game.snake(PlayerSlot::One).len(), START_LENGTH + 1);
        assert_ne!(game.apple, Cell::new(6, 10));
        assert!(!game.snakes.iter().any(|s| s.contains(game.apple)));
    }

    #[test]
    fn test_wall_crash_loses() {
        let mut game = game();
        game.snakes[0].turn(Direction::Up);
        for _ in 0..15 {
            game.step();
        }
        assert_eq!(game.match_state.winner(), Some(PlayerSlot::Two));
    }

    #[test]
    fn test_wrap_passes_through_edges() {
        let mut game = game();
        game.set_wrap(true);
        game.snakes[1].turn(Direction::Down);
        for _ in 0..12 {
            game.step();
        }
        game.snakes[1].turn(Direction::Left);
        for _ in 0..25 {
            game.step();
        }
        assert!(!game.match_state.is_over());
        assert_eq!(game.snake(PlayerSlot::One).head(), Cell::new(12, 10));
    }

    #[test]
    fn test_head_on_picks_seeded_winner() {
        let play = |seed| {
            let mut game = SnakeGame::new(&MatchConfig::default(), seed);
            game.apple = Cell::new(0, 0);
            for _ in 0..20 {
                game.step();
            }
            game.match_state.winner()
        };
        let first = play(9);
        assert!(first.is_some());
        assert_eq!(first, play(9));
    }

    #[test]
    fn test_reset_restores_snakes_keeps_score() {
        let mut game = game();
        game.snakes[0].turn(Direction::Up);
        for _ in 0..15 {
            game.step();
        }
        game.reset();
        assert_eq!(game.snake(PlayerSlot::One).head(), Cell::new(5, 10));
        assert!(!game.match_state.is_over());
        assert_eq!(game.match_state.score(PlayerSlot::Two), 1);
    }
}
