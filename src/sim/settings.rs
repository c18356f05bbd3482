//! Adjustments made from the page's settings panel

use thiserror::Error;

use super::AnyGame;
use super::match_state::MatchState;
use super::tanks::TankTuning;

/// One change requested by the page. Values are applied as given; each game
/// clamps or filters them the same way its constructor does.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Setting {
    /// Zero both players' running scores (every game)
    ResetScores,
    Tanks(TankTuning),
    SnakeWrap(bool),
    RedLightSpeed(u32),
    /// Green light now, opening a new round if the last one is over
    RedLightStart,
    /// Back to the start line under a red light
    RedLightRestart,
    /// Per-turn limit in milliseconds; `None` turns the timer off
    TurnTimer(Option<f64>),
    /// Guess limit; `None` or zero means unlimited
    GuessAttempts(Option<u32>),
}

impl Setting {
    pub fn name(&self) -> &'static str {
        match self {
            Setting::ResetScores => "reset-scores",
            Setting::Tanks(_) => "tanks",
            Setting::SnakeWrap(_) => "snake-wrap",
            Setting::RedLightSpeed(_) => "red-light-speed",
            Setting::RedLightStart => "red-light-start",
            Setting::RedLightRestart => "red-light-restart",
            Setting::TurnTimer(_) => "turn-timer",
            Setting::GuessAttempts(_) => "guess-attempts",
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SettingError {
    #[error("setting {setting} does not apply to {game}")]
    NotApplicable {
        setting: &'static str,
        game: &'static str,
    },
}

impl AnyGame {
    /// Route name of the mounted game
    pub fn name(&self) -> &'static str {
        match self {
            AnyGame::Tanks(_) => "tanks",
            AnyGame::Race(_) => "race",
            AnyGame::RedLight(_) => "squid",
            AnyGame::Lawn(_) => "pvz",
            AnyGame::Platformer(_) => "redball",
            AnyGame::Snake(_) => "snake",
            AnyGame::TicTacToe(_) => "tictactoe",
            AnyGame::Guess(_) => "guess",
        }
    }

    pub fn match_state_mut(&mut self) -> &mut MatchState {
        match self {
            AnyGame::Tanks(g) => &mut g.match_state,
            AnyGame::Race(g) => &mut g.match_state,
            AnyGame::RedLight(g) => &mut g.match_state,
            AnyGame::Lawn(g) => &mut g.match_state,
            AnyGame::Platformer(g) => &mut g.match_state,
            AnyGame::Snake(g) => &mut g.match_state,
            AnyGame::TicTacToe(g) => &mut g.match_state,
            AnyGame::Guess(g) => &mut g.match_state,
        }
    }

    /// Apply a page setting to the running game
    pub fn apply(&mut self, setting: Setting) -> Result<(), SettingError> {
        match (self, setting) {
            (game, Setting::ResetScores) => game.match_state_mut().reset_scores(),
            (AnyGame::Tanks(g), Setting::Tanks(tuning)) => g.set_tuning(tuning),
            (AnyGame::Snake(g), Setting::SnakeWrap(wrap)) => g.set_wrap(wrap),
            (AnyGame::RedLight(g), Setting::RedLightSpeed(steps)) => g.set_steps_per_second(steps),
            (AnyGame::RedLight(g), Setting::RedLightStart) => g.start(),
            (AnyGame::RedLight(g), Setting::RedLightRestart) => g.restart(),
            (AnyGame::TicTacToe(g), Setting::TurnTimer(turn_ms)) => {
                g.set_turn_timer(turn_ms.filter(|ms| ms.is_finite() && *ms > 0.0))
            }
            (AnyGame::Guess(g), Setting::GuessAttempts(max)) => g.set_max_attempts(max),
            (game, setting) => {
                return Err(SettingError::NotApplicable {
                    setting: setting.name(),
                    game: game.name(),
                });
            }
        }
        log::debug!("Applied setting {}", setting.name());
        Ok(())
    }
}
