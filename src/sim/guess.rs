//! Guess the number: player one hides an integer, player two guesses it

use std::fmt;

use thiserror::Error;

use super::input::InputSampler;
use super::match_state::{MatchConfig, MatchState, PlayerSlot};
use super::Game;

pub const MIN_SECRET: i64 = 0;
pub const MAX_SECRET: i64 = 100;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GuessError {
    #[error("Введите целое число от 0 до 100")]
    NotAnInteger,
    #[error("Введите целое число от 0 до 100")]
    OutOfRange,
    #[error("Сначала нужно загадать число")]
    NoSecret,
    #[error("Раунд окончен")]
    RoundOver,
}

/// Answer to one guess
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feedback {
    /// The secret is bigger than the guess
    Higher,
    Lower,
    Correct,
}

impl fmt::Display for Feedback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Feedback::Higher => "Больше",
            Feedback::Lower => "Меньше",
            Feedback::Correct => "Верно!",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GuessRecord {
    pub attempt: u32,
    pub guess: i64,
    pub feedback: Feedback,
}

/// Parse form input as an integer in `0..=100`. Accepts `"42"` and `"42.0"`.
pub fn parse_number(text: &str) -> Result<i64, GuessError> {
    let value: f64 = text.trim().parse().map_err(|_| GuessError::NotAnInteger)?;
    if !value.is_finite() || value.fract() != 0.0 {
        return Err(GuessError::NotAnInteger);
    }
    if !(MIN_SECRET as f64..=MAX_SECRET as f64).contains(&value) {
        return Err(GuessError::OutOfRange);
    }
    Ok(value as i64)
}

pub struct GuessGame {
    secret: Option<i64>,
    max_attempts: Option<u32>,
    /// Most recent first
    history: Vec<GuessRecord>,
    attempts: u32,
    pub match_state: MatchState,
}

impl GuessGame {
    pub fn new(config: &MatchConfig) -> Self {
        Self::with_max_attempts(config, None)
    }

    /// With a limit, running out of attempts gives the round to player one
    pub fn with_max_attempts(config: &MatchConfig, max_attempts: Option<u32>) -> Self {
        Self {
            secret: None,
            max_attempts: max_attempts.filter(|&n| n > 0),
            history: Vec::new(),
            attempts: 0,
            match_state: MatchState::new(config),
        }
    }

    pub fn has_secret(&self) -> bool {
        self.secret.is_some()
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn max_attempts(&self) -> Option<u32> {
        self.max_attempts
    }

    /// Change the limit mid-round; it is checked on the next guess
    pub fn set_max_attempts(&mut self, max_attempts: Option<u32>) {
        self.max_attempts = max_attempts.filter(|&n| n > 0);
    }

    pub fn history(&self) -> &[GuessRecord] {
        &self.history
    }

    /// Player one hides a number; starts a fresh guessing round
    pub fn set_secret(&mut self, text: &str) -> Result<(), GuessError> {
        let secret = parse_number(text)?;
        if self.match_state.is_over() {
            self.match_state.new_round();
        }
        self.secret = Some(secret);
        self.history.clear();
        self.attempts = 0;
        Ok(())
    }

    /// Player two guesses
    pub fn submit_guess(&mut self, text: &str) -> Result<Feedback, GuessError> {
        if self.match_state.is_over() {
            return Err(GuessError::RoundOver);
        }
        let secret = self.secret.ok_or(GuessError::NoSecret)?;
        let guess = parse_number(text)?;

        self.attempts += 1;
        let feedback = match guess.cmp(&secret) {
            std::cmp::Ordering::Less => Feedback::Higher,
            std::cmp::Ordering::Greater => Feedback::Lower,
            std::cmp::Ordering::Equal => Feedback::Correct,
        };
        self.history.insert(
            0,
            GuessRecord {
                attempt: self.attempts,
                guess,
                feedback,
            },
        );

        if feedback == Feedback::Correct {
            log::info!("Secret found in {} attempts", self.attempts);
            self.match_state.declare_winner(PlayerSlot::Two);
            self.secret = None;
        } else if self.max_attempts.is_some_and(|max| self.attempts >= max) {
            self.match_state.declare_winner(PlayerSlot::One);
            self.secret = None;
        }
        Ok(feedback)
    }
}

impl Game for GuessGame {
    /// Turn-based; all progress comes from form submissions
    fn tick(&mut self, _input: &InputSampler, _dt: f32) {}

    fn reset(&mut self) {
        self.secret = None;
        self.history.clear();
        self.attempts = 0;
        self.match_state.new_round();
    }

    fn match_state(&self) -> &MatchState {
        &self.match_state
    }

    fn hud_text(&self) -> String {
        let p1 = self.match_state.name(PlayerSlot::One);
        let p2 = self.match_state.name(PlayerSlot::Two);
        if self.match_state.is_over() {
            return format!("{} (попыток: {})", self.match_state.status_line(), self.attempts);
        }
        if self.secret.is_none() {
            return format!("{p1}, загадай число от 0 до 100");
        }
        let last = self
            .history
            .first()
            .map(|r| format!(" | {} → {}", r.guess, r.feedback))
            .unwrap_or_default();
        let limit = self.max_attempts.map(|m| format!("/{m}")).unwrap_or_default();
        format!("{p2}, угадай число | попытка {}{limit}{last}", self.attempts + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_five_guesses_to_win() {
        let mut game = GuessGame::with_max_attempts(&MatchConfig::new("Аня", "Боря"), Some(5));
        game.set_secret("42").unwrap();
        let feedback: Vec<_> = ["10", "90", "50", "40"]
            .iter()
            .map(|g| game.submit_guess(g).unwrap().to_string())
            .collect();
        assert_eq!(feedback, ["Больше", "Меньше", "Меньше", "Больше"]);
        assert!(!game.match_state.is_over());

        assert_eq!(game.submit_guess("42"), Ok(Feedback::Correct));
        assert_eq!(game.attempts(), 5);
        assert_eq!(game.match_state.winner_name(), Some("Боря"));
        assert_eq!(game.history()[0].attempt, 5);
    }

    #[test]
    fn test_bad_secret_keeps_state() {
        let mut game = GuessGame::new(&MatchConfig::default());
        assert_eq!(game.set_secret("abc"), Err(GuessError::NotAnInteger));
        assert_eq!(game.set_secret("4.5"), Err(GuessError::NotAnInteger));
        assert_eq!(game.set_secret("101"), Err(GuessError::OutOfRange));
        assert_eq!(game.set_secret("-1"), Err(GuessError::OutOfRange));
        assert!(!game.has_secret());
        assert_eq!(
            GuessError::OutOfRange.to_string(),
            "Введите целое число от 0 до 100"
        );
        assert_eq!(game.set_secret(" 7.0 "), Ok(()));
    }

    #[test]
    fn test_guess_before_secret() {
        let mut game = GuessGame::new(&MatchConfig::default());
        assert_eq!(game.submit_guess("5"), Err(GuessError::NoSecret));
        assert_eq!(game.attempts(), 0);
    }

    #[test]
    fn test_invalid_guess_does_not_cost_attempt() {
        let mut game = GuessGame::new(&MatchConfig::default());
        game.set_secret("3").unwrap();
        assert_eq!(game.submit_guess("x"), Err(GuessError::NotAnInteger));
        assert_eq!(game.attempts(), 0);
        assert!(game.history().is_empty());
    }

    #[test]
    fn test_exhausted_attempts_give_round_to_setter() {
        let mut game = GuessGame::with_max_attempts(&MatchConfig::default(), Some(2));
        game.set_secret("60").unwrap();
        game.submit_guess("1").unwrap();
        game.submit_guess("2").unwrap();
        assert_eq!(game.match_state.winner(), Some(PlayerSlot::One));
        assert_eq!(game.submit_guess("60"), Err(GuessError::RoundOver));

        game.set_secret("10").unwrap();
        assert!(!game.match_state.is_over());
        assert_eq!(game.match_state.score(PlayerSlot::One), 1);
    }
}
