//! Players, round outcome, and running score

use serde::{Deserialize, Serialize};

/// Placeholder names used when the profile has none
pub const DEFAULT_PLAYER1: &str = "Красный";
pub const DEFAULT_PLAYER2: &str = "Синий";

/// One of the two seats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlayerSlot {
    One,
    Two,
}

impl PlayerSlot {
    pub const BOTH: [PlayerSlot; 2] = [PlayerSlot::One, PlayerSlot::Two];

    #[inline]
    pub const fn index(self) -> usize {
        match self {
            PlayerSlot::One => 0,
            PlayerSlot::Two => 1,
        }
    }

    #[inline]
    pub const fn other(self) -> Self {
        match self {
            PlayerSlot::One => PlayerSlot::Two,
            PlayerSlot::Two => PlayerSlot::One,
        }
    }
}

/// Display names handed to a game at construction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchConfig {
    pub player1: String,
    pub player2: String,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            player1: DEFAULT_PLAYER1.to_string(),
            player2: DEFAULT_PLAYER2.to_string(),
        }
    }
}

impl MatchConfig {
    pub fn new(player1: impl Into<String>, player2: impl Into<String>) -> Self {
        let mut config = Self {
            player1: player1.into(),
            player2: player2.into(),
        };
        if config.player1.trim().is_empty() {
            config.player1 = DEFAULT_PLAYER1.to_string();
        }
        if config.player2.trim().is_empty() {
            config.player2 = DEFAULT_PLAYER2.to_string();
        }
        config
    }
}

/// How a round ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Winner(PlayerSlot),
    Draw,
    /// Cooperative games (lawn defense) lost by both players
    Defeat,
}

/// Names, round outcome, and per-player score
#[derive(Debug, Clone, PartialEq)]
pub struct MatchState {
    players: [String; 2],
    outcome: Option<Outcome>,
    scores: [u32; 2],
}

impl MatchState {
    pub fn new(config: &MatchConfig) -> Self {
        Self {
            players: [config.player1.clone(), config.player2.clone()],
            outcome: None,
            scores: [0, 0],
        }
    }

    pub fn name(&self, slot: PlayerSlot) -> &str {
        &self.players[slot.index()]
    }

    pub fn score(&self, slot: PlayerSlot) -> u32 {
        self.scores[slot.index()]
    }

    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    pub fn is_over(&self) -> bool {
        self.outcome.is_some()
    }

    pub fn winner(&self) -> Option<PlayerSlot> {
        match self.outcome {
            Some(Outcome::Winner(slot)) => Some(slot),
            _ => None,
        }
    }

    /// Winner's display name, if the round has one
    pub fn winner_name(&self) -> Option<&str> {
        self.winner().map(|slot| self.name(slot))
    }

    /// Set the winner and bump their score. Only the first outcome of a round
    /// sticks; later calls return false and change nothing.
    pub fn declare_winner(&mut self, slot: PlayerSlot) -> bool {
        if self.outcome.is_some() {
            return false;
        }
        self.outcome = Some(Outcome::Winner(slot));
        self.scores[slot.index()] += 1;
        log::info!("Round won by {}", self.name(slot));
        true
    }

    pub fn declare_draw(&mut self) -> bool {
        if self.outcome.is_some() {
            return false;
        }
        self.outcome = Some(Outcome::Draw);
        log::info!("Round drawn");
        true
    }

    pub fn declare_defeat(&mut self) -> bool {
        if self.outcome.is_some() {
            return false;
        }
        self.outcome = Some(Outcome::Defeat);
        log::info!("Round lost");
        true
    }

    /// Clear the outcome for a new round; scores carry over
    pub fn new_round(&mut self) {
        self.outcome = None;
    }

    pub fn reset_scores(&mut self) {
        self.scores = [0, 0];
    }

    /// Short status line for the HUD
    pub fn status_line(&self) -> String {
        match self.outcome {
            Some(Outcome::Winner(slot)) => format!("Победил {}!", self.name(slot)),
            Some(Outcome::Draw) => "Ничья".to_string(),
            Some(Outcome::Defeat) => "Игра окончена".to_string(),
            None => format!(
                "{} {} : {} {}",
                self.players[0], self.scores[0], self.scores[1], self.players[1]
            ),
        }
    }
}
