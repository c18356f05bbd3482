//! Red light / green light on a cell grid
//!
//! Players step one cell per step interval toward the finish row while the
//! light is green. Any movement input while red loses the round. A push
//! shoves the opponent two cells away; if that happens under a red light the
//! pushed player has moved on red and loses.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::input::{ControlSet, Direction, InputSampler};
use super::match_state::{MatchConfig, MatchState, PlayerSlot};
use super::{Game, SimClock};
use crate::consts::SIM_DT;

pub const CELL: f32 = 20.0;
pub const COLS: i32 = 45;
pub const ROWS: i32 = 26;
pub const FINISH_ROW: i32 = 0;
pub const MIN_STEPS_PER_SECOND: u32 = 2;
pub const MAX_STEPS_PER_SECOND: u32 = 12;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RedLightTuning {
    pub steps_per_second: u32,
    /// Push reach, in cells (euclidean)
    pub push_range: f32,
    /// Cells the pushed player is displaced
    pub push_distance: i32,
    pub push_cooldown_ms: f64,
    pub signal_min_ms: f64,
    pub signal_max_ms: f64,
}

impl Default for RedLightTuning {
    fn default() -> Self {
        Self {
            steps_per_second: 6,
            push_range: 3.0,
            push_distance: 2,
            push_cooldown_ms: 450.0,
            signal_min_ms: 1800.0,
            signal_max_ms: 3200.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Signal {
    Red,
    Green,
}

impl Signal {
    fn toggled(self) -> Self {
        match self {
            Signal::Red => Signal::Green,
            Signal::Green => Signal::Red,
        }
    }
}

/// Grid cell coordinate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cell {
    pub x: i32,
    pub y: i32,
}

impl Cell {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    fn clamped(x: i32, y: i32) -> Self {
        Self::new(x.clamp(0, COLS - 1), y.clamp(0, ROWS - 1))
    }

    fn stepped(self, dir: Direction) -> Self {
        let (dx, dy) = dir.offset();
        Self::clamped(self.x + dx, self.y + dy)
    }
}

fn start_cells() -> [Cell; 2] {
    [
        Cell::new(COLS / 4, ROWS - 4),
        Cell::new(COLS * 3 / 4, ROWS - 4),
    ]
}

const CONTROLS: [ControlSet; 2] = [ControlSet::WASD, ControlSet::ARROWS];

/// Held direction first; a press released within the same tick still counts
fn intended_direction(input: &InputSampler, controls: &ControlSet) -> Option<Direction> {
    input
        .active_direction(controls)
        .or_else(|| input.fresh_directions(controls).last())
}

pub struct RedLightGame {
    tuning: RedLightTuning,
    pub players: [Cell; 2],
    signal: Signal,
    next_toggle_ms: f64,
    ticks_since_step: u32,
    last_push_ms: [Option<f64>; 2],
    rng: Pcg32,
    pub match_state: MatchState,
    clock: SimClock,
}

impl RedLightGame {
    pub fn new(config: &MatchConfig, seed: u64) -> Self {
        Self::with_tuning(config, RedLightTuning::default(), seed)
    }

    pub fn with_tuning(config: &MatchConfig, tuning: RedLightTuning, seed: u64) -> Self {
        let mut game = Self {
            tuning,
            players: start_cells(),
            signal: Signal::Red,
            next_toggle_ms: 0.0,
            ticks_since_step: 0,
            last_push_ms: [None, None],
            rng: Pcg32::seed_from_u64(seed),
            match_state: MatchState::new(config),
            clock: SimClock::default(),
        };
        game.set_steps_per_second(tuning.steps_per_second);
        game.schedule_toggle();
        game
    }

    pub fn signal(&self) -> Signal {
        self.signal
    }

    pub fn player(&self, slot: PlayerSlot) -> Cell {
        self.players[slot.index()]
    }

    pub fn steps_per_second(&self) -> u32 {
        self.tuning.steps_per_second
    }

    pub fn set_steps_per_second(&mut self, steps: u32) {
        self.tuning.steps_per_second = steps.clamp(MIN_STEPS_PER_SECOND, MAX_STEPS_PER_SECOND);
    }

    /// Simulation ticks between two automatic steps
    pub fn step_interval_ticks(&self) -> u32 {
        ((1.0 / SIM_DT) / self.tuning.steps_per_second as f32).round().max(1.0) as u32
    }

    /// Milliseconds until the light changes
    pub fn signal_remaining_ms(&self) -> f64 {
        (self.next_toggle_ms - self.clock.now_ms()).max(0.0)
    }

    fn schedule_toggle(&mut self) {
        let lo = self.tuning.signal_min_ms;
        let hi = self.tuning.signal_max_ms.max(lo + 1.0);
        self.next_toggle_ms = self.clock.now_ms() + self.rng.random_range(lo..hi);
    }

    /// Set the light and restart its timer
    pub fn force_signal(&mut self, signal: Signal) {
        self.signal = signal;
        self.schedule_toggle();
    }

    /// Green light now. Starts a fresh round if the last one is over.
    pub fn start(&mut self) {
        if self.match_state.is_over() {
            self.match_state.new_round();
            self.reset_positions();
        }
        self.force_signal(Signal::Green);
        self.ticks_since_step = 0;
    }

    /// New round from the start line under a red light
    pub fn restart(&mut self) {
        self.match_state.new_round();
        self.reset_positions();
        self.force_signal(Signal::Red);
    }

    fn reset_positions(&mut self) {
        self.players = start_cells();
        self.last_push_ms = [None, None];
        self.ticks_since_step = 0;
    }

    /// One grid step. Under red, any held or freshly tapped direction loses
    /// (player one is checked first); under green each player moves one cell
    /// in their most recent held direction, or the tap if already released.
    pub fn step(&mut self, input: &InputSampler) {
        if self.match_state.is_over() {
            return;
        }
        self.ticks_since_step = 0;

        if self.signal == Signal::Red {
            for slot in PlayerSlot::BOTH {
                if intended_direction(input, &CONTROLS[slot.index()]).is_some() {
                    log::debug!("{slot:?} moved on red");
                    self.match_state.declare_winner(slot.other());
                    return;
                }
            }
            return;
        }

        for slot in PlayerSlot::BOTH {
            if let Some(dir) = intended_direction(input, &CONTROLS[slot.index()]) {
                let cell = &mut self.players[slot.index()];
                *cell = cell.stepped(dir);
            }
        }
        for slot in PlayerSlot::BOTH {
            if self.players[slot.index()].y <= FINISH_ROW {
                self.match_state.declare_winner(slot);
                return;
            }
        }
    }

    /// Push the opponent if in range and off cooldown. Returns true if the
    /// push was attempted (cooldown consumed).
    pub fn try_push(&mut self, from: PlayerSlot) -> bool {
        if self.match_state.is_over() {
            return false;
        }
        let now = self.clock.now_ms();
        if self.last_push_ms[from.index()]
            .is_some_and(|last| now - last < self.tuning.push_cooldown_ms)
        {
            return false;
        }
        self.last_push_ms[from.index()] = Some(now);

        let to = from.other();
        let (src, dst) = (self.players[from.index()], self.players[to.index()]);
        let (dx, dy) = ((dst.x - src.x) as f32, (dst.y - src.y) as f32);
        let dist = dx.hypot(dy);
        if dist > self.tuning.push_range {
            return true;
        }
        let (nx, ny) = if dist == 0.0 {
            (0, -1)
        } else {
            ((dx / dist).round() as i32, (dy / dist).round() as i32)
        };
        let pushed = Cell::clamped(
            dst.x + nx * self.tuning.push_distance,
            dst.y + ny * self.tuning.push_distance,
        );
        if pushed != dst {
            self.players[to.index()] = pushed;
            if self.signal == Signal::Red {
                log::debug!("{to:?} pushed on red");
                self.match_state.declare_winner(from);
            }
        }
        true
    }
}

impl Game for RedLightGame {
    fn tick(&mut self, input: &InputSampler, dt: f32) {
        if self.match_state.is_over() {
            return;
        }
        self.clock.advance(dt);

        if self.clock.now_ms() >= self.next_toggle_ms {
            self.signal = self.signal.toggled();
            self.schedule_toggle();
        }

        for slot in PlayerSlot::BOTH {
            if input.just_pressed(CONTROLS[slot.index()].action) {
                self.try_push(slot);
            }
        }

        self.ticks_since_step += 1;
        let fresh_move = CONTROLS
            .iter()
            .any(|set| input.fresh_directions(set).next().is_some());
        if fresh_move || self.ticks_since_step >= self.step_interval_ticks() {
            self.step(input);
        }
    }

    fn reset(&mut self) {
        self.clock.reset();
        self.restart();
    }

    fn match_state(&self) -> &MatchState {
        &self.match_state
    }

    fn hud_text(&self) -> String {
        let light = match self.signal {
            Signal::Red => "КРАСНЫЙ",
            Signal::Green => "ЗЕЛЁНЫЙ",
        };
        format!(
            "{} ({:.1} с) | шагов/с: {} | {}",
            light,
            self.signal_remaining_ms() / 1000.0,
            self.tuning.steps_per_second,
            self.match_state.status_line()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::input::Key;

    fn game() -> RedLightGame {
        RedLightGame::new(&MatchConfig::new("Аня", "Боря"), 7)
    }

    #[test]
    fn test_held_key_on_red_loses_within_one_tick() {
        let mut game = game();
        game.force_signal(Signal::Red);
        let mut input = InputSampler::new();
        input.key_down(Key::W, 0.0, false);
        game.tick(&input, SIM_DT);
        assert_eq!(game.match_state.winner_name(), Some("Боря"));
    }

    #[test]
    fn test_player_one_checked_first_on_red() {
        let mut game = game();
        game.force_signal(Signal::Red);
        let mut input = InputSampler::new();
        input.key_down(Key::ArrowUp, 0.0, false);
        input.key_down(Key::D, 1.0, false);
        game.step(&input);
        assert_eq!(game.match_state.winner(), Some(PlayerSlot::Two));
    }

    #[test]
    fn test_green_moves_one_cell_per_step_interval() {
        let mut game = game();
        game.force_signal(Signal::Green);
        let start = game.player(PlayerSlot::One);
        let interval = game.step_interval_ticks();
        assert_eq!(interval, 20);

        let mut input = InputSampler::new();
        input.key_down(Key::W, 0.0, false);
        game.tick(&input, SIM_DT);
        input.end_tick();
        assert_eq!(game.player(PlayerSlot::One).y, start.y - 1);

        for expected in 2..=3 {
            for _ in 0..interval {
                game.tick(&input, SIM_DT);
                input.end_tick();
            }
            assert_eq!(game.player(PlayerSlot::One).y, start.y - expected);
        }
        assert_eq!(game.player(PlayerSlot::Two), start_cells()[1]);
    }

    #[test]
    fn test_tap_released_before_tick_still_moves() {
        let mut game = game();
        game.force_signal(Signal::Green);
        let start = game.player(PlayerSlot::One);
        let mut input = InputSampler::new();
        input.key_down(Key::D, 0.0, false);
        input.key_up(Key::D);
        game.tick(&input, SIM_DT);
        assert_eq!(game.player(PlayerSlot::One), Cell::new(start.x + 1, start.y));
    }

    #[test]
    fn test_tap_released_before_tick_loses_on_red() {
        let mut game = game();
        game.force_signal(Signal::Red);
        let mut input = InputSampler::new();
        input.key_down(Key::ArrowDown, 0.0, false);
        input.key_up(Key::ArrowDown);
        game.tick(&input, SIM_DT);
        assert_eq!(game.match_state.winner_name(), Some("Аня"));
    }

    #[test]
    fn test_direct_step_is_exactly_one_cell() {
        let mut game = game();
        game.force_signal(Signal::Green);
        let mut input = InputSampler::new();
        input.key_down(Key::ArrowLeft, 0.0, false);
        let before = game.player(PlayerSlot::Two);
        game.step(&input);
        assert_eq!(game.player(PlayerSlot::Two), Cell::new(before.x - 1, before.y));
    }

    #[test]
    fn test_reaching_finish_row_wins() {
        let mut game = game();
        game.force_signal(Signal::Green);
        game.players[1] = Cell::new(10, 1);
        let mut input = InputSampler::new();
        input.key_down(Key::ArrowUp, 0.0, false);
        game.step(&input);
        assert_eq!(game.match_state.winner_name(), Some("Боря"));
    }

    #[test]
    fn test_push_on_red_loses_for_pushed_player() {
        let mut game = game();
        game.force_signal(Signal::Red);
        game.players = [Cell::new(10, 10), Cell::new(12, 10)];
        assert!(game.try_push(PlayerSlot::One));
        assert_eq!(game.player(PlayerSlot::Two), Cell::new(14, 10));
        assert_eq!(game.match_state.winner(), Some(PlayerSlot::One));
    }

    #[test]
    fn test_push_out_of_range_or_into_wall_changes_nothing() {
        let mut game = game();
        game.force_signal(Signal::Red);
        game.players = [Cell::new(0, 10), Cell::new(10, 10)];
        game.try_push(PlayerSlot::One);
        assert_eq!(game.player(PlayerSlot::Two), Cell::new(10, 10));

        game.players = [Cell::new(COLS - 3, 10), Cell::new(COLS - 1, 10)];
        game.last_push_ms = [None, None];
        game.try_push(PlayerSlot::One);
        assert!(game.match_state.winner().is_none());
    }

    #[test]
    fn test_push_cooldown() {
        let mut game = game();
        game.force_signal(Signal::Green);
        game.players = [Cell::new(10, 10), Cell::new(11, 10)];
        assert!(game.try_push(PlayerSlot::One));
        assert!(!game.try_push(PlayerSlot::One));
        assert_eq!(game.player(PlayerSlot::Two), Cell::new(13, 10));
    }

    #[test]
    fn test_signal_toggles_within_bounds() {
        let mut game = game();
        let idle = InputSampler::new();
        let first = game.signal();
        for _ in 0..(3.3 / SIM_DT) as u32 {
            game.tick(&idle, SIM_DT);
        }
        assert_ne!(game.signal(), first);
    }

    #[test]
    fn test_start_after_win_begins_new_round() {
        let mut game = game();
        game.match_state.declare_winner(PlayerSlot::One);
        game.start();
        assert!(!game.match_state.is_over());
        assert_eq!(game.signal(), Signal::Green);
        assert_eq!(game.players, start_cells());
    }

    #[test]
    fn test_steps_per_second_clamped() {
        let mut game = game();
        game.set_steps_per_second(50);
        assert_eq!(game.steps_per_second(), MAX_STEPS_PER_SECOND);
        assert_eq!(game.step_interval_ticks(), 10);
    }
}
