use serde::{Deserialize, Serialize};

pub const GAME_DURATION_SECS: u32 = 30;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum GameResult {
    Win,
    Lose,
}

/// Where a session is in its life. Exactly one of "not started", "playing"
/// or "finished with a result" holds at any time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionPhase {
    #[default]
    NotStarted,
    Playing,
    Finished(GameResult),
}

impl SessionPhase {
    pub fn is_playing(&self) -> bool {
        matches!(self, SessionPhase::Playing)
    }

    pub fn result(&self) -> Option<GameResult> {
        match self {
            SessionPhase::Finished(result) => Some(*result),
            _ => None,
        }
    }

    /// The difficulty may only change before any session has run, or after a reset.
    pub fn accepts_difficulty_change(&self) -> bool {
        matches!(self, SessionPhase::NotStarted)
    }
}
