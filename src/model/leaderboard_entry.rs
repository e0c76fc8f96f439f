use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use super::Difficulty;

/// One finished session, as persisted under the `leaderboard` key.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LeaderboardEntry {
    pub score: u32,
    /// Seconds played, `30 - time remaining` when the session ended.
    #[serde(rename = "time")]
    pub elapsed_seconds: u32,
    /// Local date and time, formatted for display.
    pub date: String,
    pub level: Difficulty,
}

impl LeaderboardEntry {
    pub fn new(score: u32, elapsed_seconds: u32, difficulty: Difficulty) -> Self {
        Self {
            score,
            elapsed_seconds,
            date: format_date(Local::now()),
            level: difficulty,
        }
    }
}

fn format_date(now: DateTime<Local>) -> String {
    now.format("%-m/%-d/%Y, %-I:%M:%S %p").to_string()
}
