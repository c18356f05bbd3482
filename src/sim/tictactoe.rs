//! Tic-tac-toe with an optional per-turn timer
//!
//! Player one plays X and moves first. When the timer runs out the turn
//! passes to the other player without a mark.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::input::InputSampler;
use super::match_state::{MatchConfig, MatchState, PlayerSlot};
use super::{Game, SimClock};

/// Side of one board cell in pixels
pub const CELL: f32 = 100.0;
pub const BOARD_SIZE: f32 = CELL * 3.0;

const LINES: [[usize; 3]; 8] = [
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8],
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8],
    [0, 4, 8],
    [2, 4, 6],
];

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TicTacToeTuning {
    /// `None` disables the turn timer
    pub turn_ms: Option<f64>,
}

impl Default for TicTacToeTuning {
    fn default() -> Self {
        Self {
            turn_ms: Some(10_000.0),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MoveError {
    #[error("no such cell")]
    OutOfBounds,
    #[error("cell is taken")]
    Occupied,
    #[error("round is over")]
    RoundOver,
}

/// Board cell under a point, if any
pub fn cell_at(p: Vec2) -> Option<usize> {
    if !(0.0..BOARD_SIZE).contains(&p.x) || !(0.0..BOARD_SIZE).contains(&p.y) {
        return None;
    }
    let col = (p.x / CELL) as usize;
    let row = (p.y / CELL) as usize;
    Some(row * 3 + col)
}

fn line_winner(board: &[Option<PlayerSlot>; 9]) -> Option<PlayerSlot> {
    LINES.iter().find_map(|&[a, b, c]| match (board[a], board[b], board[c]) {
        (Some(x), Some(y), Some(z)) if x == y && y == z => Some(x),
        _ => None,
    })
}

pub struct TicTacToeGame {
    tuning: TicTacToeTuning,
    pub board: [Option<PlayerSlot>; 9],
    turn: PlayerSlot,
    turn_started_ms: f64,
    pub match_state: MatchState,
    clock: SimClock,
}

impl TicTacToeGame {
    pub fn new(config: &MatchConfig) -> Self {
        Self::with_tuning(config, TicTacToeTuning::default())
    }

    pub fn with_tuning(config: &MatchConfig, tuning: TicTacToeTuning) -> Self {
        Self {
            tuning,
            board: [None; 9],
            turn: PlayerSlot::One,
            turn_started_ms: 0.0,
            match_state: MatchState::new(config),
            clock: SimClock::default(),
        }
    }

    pub fn turn(&self) -> PlayerSlot {
        self.turn
    }

    pub fn turn_timer(&self) -> Option<f64> {
        self.tuning.turn_ms
    }

    pub fn set_turn_timer(&mut self, turn_ms: Option<f64>) {
        self.tuning.turn_ms = turn_ms;
        self.turn_started_ms = self.clock.now_ms();
    }

    /// Whole seconds left on the turn timer
    pub fn seconds_left(&self) -> Option<u32> {
        let limit = self.tuning.turn_ms?;
        let left = (limit - (self.clock.now_ms() - self.turn_started_ms)).max(0.0);
        Some((left / 1000.0).ceil() as u32)
    }

    fn pass_turn(&mut self) {
        self.turn = self.turn.other();
        self.turn_started_ms = self.clock.now_ms();
    }

    /// Mark a cell (0..9, row-major) for the player to move
    pub fn place(&mut self, cell: usize) -> Result<(), MoveError> {
        if self.match_state.is_over() {
            return Err(MoveError::RoundOver);
        }
        let slot = self.board.get_mut(cell).ok_or(MoveError::OutOfBounds)?;
        if slot.is_some() {
            return Err(MoveError::Occupied);
        }
        *slot = Some(self.turn);

        if let Some(winner) = line_winner(&self.board) {
            self.match_state.declare_winner(winner);
        } else if self.board.iter().all(Option::is_some) {
            self.match_state.declare_draw();
        } else {
            self.pass_turn();
        }
        Ok(())
    }
}

impl Game for TicTacToeGame {
    fn tick(&mut self, input: &InputSampler, dt: f32) {
        if self.match_state.is_over() {
            return;
        }
        self.clock.advance(dt);

        for &click in input.clicks() {
            let Some(cell) = cell_at(click) else {
                continue;
            };
            if let Err(e) = self.place(cell) {
                log::debug!("Move rejected: {e}");
            }
        }

        if let Some(limit) = self.tuning.turn_ms
            && !self.match_state.is_over()
            && self.clock.now_ms() - self.turn_started_ms >= limit
        {
            log::debug!("Turn timer expired for {:?}", self.turn);
            self.pass_turn();
        }
    }

    fn reset(&mut self) {
        self.board = [None; 9];
        self.turn = PlayerSlot::One;
        self.clock.reset();
        self.turn_started_ms = 0.0;
        self.match_state.new_round();
    }

    fn match_state(&self) -> &MatchState {
        &self.match_state
    }

    fn hud_text(&self) -> String {
        if self.match_state.is_over() {
            return self.match_state.status_line();
        }
        let mover = self.match_state.name(self.turn);
        match self.seconds_left() {
            Some(s) => format!("Ход: {mover} | таймер: {s}s | {}", self.match_state.status_line()),
            None => format!("Ход: {mover} | {}", self.match_state.status_line()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;
    use crate::sim::match_state::Outcome;

    fn game() -> TicTacToeGame {
        TicTacToeGame::new(&MatchConfig::new("Аня", "Боря"))
    }

    #[test]
    fn test_row_wins_for_x() {
        let mut game = game();
        for cell in [0, 3, 1, 4, 2] {
            game.place(cell).unwrap();
        }
        assert_eq!(game.match_state.winner_name(), Some("Аня"));
        assert_eq!(game.place(8), Err(MoveError::RoundOver));
    }

    #[test]
    fn test_full_board_is_draw() {
        let mut game = game();
        for cell in [0, 1, 2, 4, 3, 5, 7, 6, 8] {
            game.place(cell).unwrap();
        }
        assert_eq!(game.match_state.outcome(), Some(Outcome::Draw));
        assert_eq!(game.match_state.score(PlayerSlot::One), 0);
    }

    #[test]
    fn test_rejects_taken_and_missing_cells() {
        let mut game = game();
        game.place(4).unwrap();
        assert_eq!(game.place(4), Err(MoveError::Occupied));
        assert_eq!(game.place(9), Err(MoveError::OutOfBounds));
        assert_eq!(game.turn(), PlayerSlot::Two);
    }

    #[test]
    fn test_timer_passes_turn() {
        let mut game = game();
        let idle = InputSampler::new();
        for _ in 0..(9.9 / SIM_DT) as u32 {
            game.tick(&idle, SIM_DT);
        }
        assert_eq!(game.turn(), PlayerSlot::One);
        assert_eq!(game.seconds_left(), Some(1));
        for _ in 0..(0.2 / SIM_DT) as u32 {
            game.tick(&idle, SIM_DT);
        }
        assert_eq!(game.turn(), PlayerSlot::Two);
        assert_eq!(game.seconds_left(), Some(10));
    }

    #[test]
    fn test_click_marks_cell() {
        let mut game = game();
        let mut input = InputSampler::new();
        input.click(Vec2::new(250.0, 150.0));
        game.tick(&input, SIM_DT);
        assert_eq!(game.board[5], Some(PlayerSlot::One));
        assert_eq!(cell_at(Vec2::new(300.0, 10.0)), None);
    }

    #[test]
    fn test_reset_keeps_score() {
        let mut game = game();
        for cell in [0, 3, 1, 4, 2] {
            game.place(cell).unwrap();
        }
        game.reset();
        assert!(game.board.iter().all(Option::is_none));
        assert_eq!(game.turn(), PlayerSlot::One);
        assert_eq!(game.match_state.score(PlayerSlot::One), 1);
    }
}
