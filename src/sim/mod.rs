//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Timers read `SimClock`, never wall time
//! - No rendering or platform dependencies

pub mod entity;
pub mod geometry;
pub mod guess;
pub mod input;
pub mod lawn;
pub mod match_state;
pub mod platformer;
pub mod race;
pub mod red_light;
pub mod settings;
pub mod snake;
pub mod tanks;
pub mod tictactoe;
pub mod track;
pub mod vehicle;

pub use entity::{Arena, Body, Obstacle, Projectile};
pub use geometry::{
    Contact, Rect, merge_axis_aligned_rects, point_in_polygon, reflect_velocity,
    resolve_circle_circle, resolve_circle_rect, resolve_rect_rect, segments_intersect,
};
pub use guess::{Feedback, GuessError, GuessGame};
pub use input::{ControlSet, Direction, InputSampler, Key};
pub use lawn::{LawnGame, PlaceError, PlantKind};
pub use match_state::{MatchConfig, MatchState, Outcome, PlayerSlot};
pub use platformer::PlatformerGame;
pub use race::RaceGame;
pub use red_light::{RedLightGame, Signal};
pub use settings::{Setting, SettingError};
pub use snake::SnakeGame;
pub use tanks::{TankTuning, TanksGame};
pub use tictactoe::{MoveError, TicTacToeGame};
pub use track::{Track, TrackError};
pub use vehicle::{Vehicle, VehicleParams};

/// One mini game as seen by the frame driver
pub trait Game {
    /// Advance by one fixed timestep
    fn tick(&mut self, input: &InputSampler, dt: f32);

    /// Back to start-of-round values; running scores survive
    fn reset(&mut self);

    fn match_state(&self) -> &MatchState;

    /// Status line for the page HUD
    fn hud_text(&self) -> String;

    fn is_over(&self) -> bool {
        self.match_state().is_over()
    }
}

/// Elapsed simulated time, counted in ticks
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SimClock {
    ticks: u64,
    elapsed_ms: f64,
}

impl SimClock {
    #[inline]
    pub fn advance(&mut self, dt: f32) {
        self.ticks += 1;
        self.elapsed_ms += f64::from(dt) * 1000.0;
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    #[inline]
    pub fn now_ms(&self) -> f64 {
        self.elapsed_ms
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Which game a page address mounts
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameKind {
    Tanks,
    /// Racing on a built-in map id
    Race(String),
    RedLight,
    Lawn,
    Platformer,
    Snake,
    TicTacToe,
    Guess,
}

impl GameKind {
    pub const ALL_ROUTES: [&'static str; 8] = [
        "tanks",
        "race",
        "squid",
        "pvz",
        "redball",
        "snake",
        "tictactoe",
        "guess",
    ];

    /// Parse a location hash such as `#/race/octagon` or `snake`
    pub fn from_hash(hash: &str) -> Option<Self> {
        let path = hash.trim_start_matches('#').trim_matches('/');
        let mut parts = path.split('/');
        let route = parts.next()?.to_ascii_lowercase();
        let kind = match route.as_str() {
            "tanks" => GameKind::Tanks,
            "race" | "races" => {
                let map = parts.next().filter(|m| !m.is_empty()).unwrap_or("ring");
                GameKind::Race(map.to_string())
            }
            "squid" | "red-light" | "redlight" => GameKind::RedLight,
            "pvz" | "lawn" => GameKind::Lawn,
            "redball" | "platformer" => GameKind::Platformer,
            "snake" => GameKind::Snake,
            "tictactoe" | "tic-tac-toe" => GameKind::TicTacToe,
            "guess" | "guess-number" => GameKind::Guess,
            _ => return None,
        };
        Some(kind)
    }

    pub fn title(&self) -> &'static str {
        match self {
            GameKind::Tanks => "Танки",
            GameKind::Race(_) => "Гонки",
            GameKind::RedLight => "Тише едешь",
            GameKind::Lawn => "Газон",
            GameKind::Platformer => "Красный шар",
            GameKind::Snake => "Змейка",
            GameKind::TicTacToe => "Крестики-нолики",
            GameKind::Guess => "Угадай число",
        }
    }
}

/// Every game behind one type, so the driver needs no generics at the page level
pub enum AnyGame {
    Tanks(TanksGame),
    Race(RaceGame),
    RedLight(RedLightGame),
    Lawn(LawnGame),
    Platformer(PlatformerGame),
    Snake(SnakeGame),
    TicTacToe(TicTacToeGame),
    Guess(GuessGame),
}

impl AnyGame {
    pub fn new(kind: &GameKind, config: &MatchConfig, seed: u64) -> Self {
        match kind {
            GameKind::Tanks => AnyGame::Tanks(TanksGame::new(config)),
            GameKind::Race(map) => AnyGame::Race(RaceGame::new(config, Track::builtin(map))),
            GameKind::RedLight => AnyGame::RedLight(RedLightGame::new(config, seed)),
            GameKind::Lawn => AnyGame::Lawn(LawnGame::new(config, seed)),
            GameKind::Platformer => AnyGame::Platformer(PlatformerGame::new(config)),
            GameKind::Snake => AnyGame::Snake(SnakeGame::new(config, seed)),
            GameKind::TicTacToe => AnyGame::TicTacToe(TicTacToeGame::new(config)),
            GameKind::Guess => AnyGame::Guess(GuessGame::new(config)),
        }
    }

    fn inner(&self) -> &dyn Game {
        match self {
            AnyGame::Tanks(g) => g,
            AnyGame::Race(g) => g,
            AnyGame::RedLight(g) => g,
            AnyGame::Lawn(g) => g,
            AnyGame::Platformer(g) => g,
            AnyGame::Snake(g) => g,
            AnyGame::TicTacToe(g) => g,
            AnyGame::Guess(g) => g,
        }
    }

    fn inner_mut(&mut self) -> &mut dyn Game {
        match self {
            AnyGame::Tanks(g) => g,
            AnyGame::Race(g) => g,
            AnyGame::RedLight(g) => g,
            AnyGame::Lawn(g) => g,
            AnyGame::Platformer(g) => g,
            AnyGame::Snake(g) => g,
            AnyGame::TicTacToe(g) => g,
            AnyGame::Guess(g) => g,
        }
    }
}

impl Game for AnyGame {
    fn tick(&mut self, input: &InputSampler, dt: f32) {
        self.inner_mut().tick(input, dt);
    }

    fn reset(&mut self) {
        self.inner_mut().reset();
    }

    fn match_state(&self) -> &MatchState {
        self.inner().match_state()
    }

    fn hud_text(&self) -> String {
        self.inner().hud_text()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;

    #[test]
    fn test_clock_counts_ticks() {
        let mut clock = SimClock::default();
        for _ in 0..120 {
            clock.advance(SIM_DT);
        }
        assert_eq!(clock.ticks(), 120);
        assert!((clock.now_ms() - 1000.0).abs() < 1e-3);
        clock.reset();
        assert_eq!(clock.now_ms(), 0.0);
    }

    #[test]
    fn test_game_kind_from_hash() {
        assert_eq!(GameKind::from_hash("#/tanks"), Some(GameKind::Tanks));
        assert_eq!(
            GameKind::from_hash("#/race/octagon"),
            Some(GameKind::Race("octagon".into()))
        );
        assert_eq!(GameKind::from_hash("race"), Some(GameKind::Race("ring".into())));
        assert_eq!(GameKind::from_hash("#squid"), Some(GameKind::RedLight));
        assert_eq!(GameKind::from_hash("#/about"), None);
        assert_eq!(GameKind::from_hash(""), None);
        for route in GameKind::ALL_ROUTES {
            assert!(GameKind::from_hash(route).is_some(), "{route}");
        }
    }

    #[test]
    fn test_any_game_delegates() {
        let config = MatchConfig::new("Аня", "Боря");
        let mut game = AnyGame::new(&GameKind::Guess, &config, 1);
        assert!(!game.is_over());
        if let AnyGame::Guess(g) = &mut game {
            g.set_secret("1").unwrap();
            g.submit_guess("1").unwrap();
        }
        assert!(game.is_over());
        assert!(game.hud_text().contains("Боря"));
        game.reset();
        assert!(!game.is_over());
    }
}
