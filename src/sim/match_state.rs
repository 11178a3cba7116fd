//! Match state machine: score, losses, win detection
//!
//! `Playing -> GameOver -> (restart) -> Playing`. Once the match is over the
//! counters are frozen; late rescues and captures still happen on the field
//! but no longer count.

use serde::Serialize;

use crate::consts::FAVORABLE_LOSS_LIMIT;

/// Current phase of the match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum GamePhase {
    /// Active gameplay
    Playing,
    /// Winning score reached
    GameOver,
}

/// Final verdict shown on the game-over overlay
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub favorable: bool,
    pub headline: String,
    pub detail: String,
}

/// Score and loss bookkeeping for one match
#[derive(Debug, Clone)]
pub struct MatchState {
    pub phase: GamePhase,
    /// Hatchlings brought to safety
    pub score: u32,
    /// Hatchlings caught by enemies
    pub lost_hatchlings: u32,
    pub winning_score: u32,
}

impl MatchState {
    pub fn new(winning_score: u32) -> Self {
        Self {
            phase: GamePhase::Playing,
            score: 0,
            lost_hatchlings: 0,
            winning_score,
        }
    }

    #[inline]
    pub fn is_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    /// Count a rescued hatchling (no-op once over)
    pub fn record_rescue(&mut self) -> bool {
        if self.is_over() {
            return false;
        }
        self.score += 1;
        true
    }

    /// Count a captured hatchling (no-op once over)
    pub fn record_capture(&mut self) -> bool {
        if self.is_over() {
            return false;
        }
        self.lost_hatchlings += 1;
        true
    }

    /// Move to `GameOver` once the winning score is reached
    ///
    /// Returns true only on the transition itself.
    pub fn check_win(&mut self) -> bool {
        if self.phase == GamePhase::Playing && self.score >= self.winning_score {
            self.phase = GamePhase::GameOver;
            log::info!(
                "Match over: score {} with {} hatchlings lost",
                self.score,
                self.lost_hatchlings
            );
            return true;
        }
        false
    }

    /// Zero the counters and start playing again
    pub fn reset(&mut self) {
        *self = Self::new(self.winning_score);
    }

    /// Game-over messages, once the match is over
    pub fn outcome(&self) -> Option<Outcome> {
        if !self.is_over() {
            return None;
        }
        Some(if self.lost_hatchlings <= FAVORABLE_LOSS_LIMIT {
            Outcome {
                favorable: true,
                headline: "Bullseye!!!".to_string(),
                detail: "You bullied the bullies!".to_string(),
            }
        } else {
            Outcome {
                favorable: false,
                headline: "Bullocks!".to_string(),
                detail: format!(
                    "You lost {} hatchlings, don't be a pushover!",
                    self.lost_hatchlings
                ),
            }
        })
    }
}
