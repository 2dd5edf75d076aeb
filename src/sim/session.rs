//! Session state machine: score and Playing/GameOver phase

use serde::{Deserialize, Serialize};

/// Phase of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionPhase {
    /// Active gameplay
    Playing,
    /// Run ended; terminal until restart
    GameOver,
}

/// Score and phase for one run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    score: u32,
    phase: SessionPhase,
    final_score: Option<u32>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        Self {
            score: 0,
            phase: SessionPhase::Playing,
            final_score: None,
        }
    }

    /// Award a point for a freshly stepped pulpit.
    /// Returns the new score, or `None` once the run is over.
    pub fn on_platform_stepped(&mut self) -> Option<u32> {
        if self.phase != SessionPhase::Playing {
            return None;
        }
        self.score += 1;
        log::debug!("Score = {}", self.score);
        Some(self.score)
    }

    /// End the run. Returns the final score the first time only.
    pub fn trigger_game_over(&mut self) -> Option<u32> {
        if self.phase != SessionPhase::Playing {
            return None;
        }
        self.phase = SessionPhase::GameOver;
        self.final_score = Some(self.score);
        log::info!("Game over - final score: {}", self.score);
        Some(self.score)
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn final_score(&self) -> Option<u32> {
        self.final_score
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == SessionPhase::GameOver
    }
}
