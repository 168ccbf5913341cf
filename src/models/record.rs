//! Win/loss/tie records and score comparison.

use serde::{Deserialize, Serialize};
use std::ops::AddAssign;

/// Default tolerance for comparing two fantasy scores.
pub const SCORE_EPSILON: f64 = 1e-6;

/// Result of one comparison from the first team's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Win,
    Loss,
    Tie,
}

impl Outcome {
    /// The same game seen from the other side.
    pub fn flipped(self) -> Self {
        match self {
            Outcome::Win => Outcome::Loss,
            Outcome::Loss => Outcome::Win,
            Outcome::Tie => Outcome::Tie,
        }
    }
}

/// Compare two scores. A difference within `epsilon` is a tie.
pub fn compare_scores(score: f64, opponent: f64, epsilon: f64) -> Outcome {
    let diff = score - opponent;
    if diff.abs() <= epsilon {
        Outcome::Tie
    } else if diff > 0.0 {
        Outcome::Win
    } else {
        Outcome::Loss
    }
}

/// Win/loss/tie record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct WinLossRecord {
    pub wins: u32,
    pub losses: u32,
    pub ties: u32,
}

/// Record of one identity against another.
pub type PairRecord = WinLossRecord;

impl WinLossRecord {
    /// Create a new record.
    pub fn new(wins: u32, losses: u32, ties: u32) -> Self {
        Self { wins, losses, ties }
    }

    /// Total games played.
    pub fn total_games(&self) -> u32 {
        self.wins + self.losses + self.ties
    }

    /// Winning percentage with ties counted as half a win.
    pub fn win_pct(&self) -> f64 {
        let total = self.total_games();
        if total == 0 {
            0.0
        } else {
            (self.wins as f64 + 0.5 * self.ties as f64) / total as f64
        }
    }

    /// Record one outcome.
    pub fn record(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Win => self.wins += 1,
            Outcome::Loss => self.losses += 1,
            Outcome::Tie => self.ties += 1,
        }
    }

    /// The opponent's view of this record.
    pub fn inverse(&self) -> Self {
        Self {
            wins: self.losses,
            losses: self.wins,
            ties: self.ties,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.total_games() == 0
    }
}

impl AddAssign for WinLossRecord {
    fn add_assign(&mut self, rhs: Self) {
        self.wins += rhs.wins;
        self.losses += rhs.losses;
        self.ties += rhs.ties;
    }
}

impl std::fmt::Display for WinLossRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}-{}", self.wins, self.losses, self.ties)
    }
}
