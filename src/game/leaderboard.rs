use std::io;
use std::rc::Rc;

use super::storage::KeyValueStore;
use crate::model::LeaderboardEntry;

pub const LEADERBOARD_KEY: &str = "leaderboard";
pub const LEADERBOARD_CAPACITY: usize = 5;

/// Most recent results, newest first, kept in a `KeyValueStore`.
pub struct Leaderboard {
    store: Rc<dyn KeyValueStore>,
}

impl std::fmt::Debug for Leaderboard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Leaderboard {{ key: {:?} }}", LEADERBOARD_KEY)
    }
}

impl Leaderboard {
    pub fn new(store: Rc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Stored entries; missing or malformed data reads as empty.
    pub fn entries(&self) -> Vec<LeaderboardEntry> {
        let Some(contents) = self.store.get(LEADERBOARD_KEY) else {
            return Vec::new();
        };
        match serde_json::from_str(&contents) {
            Ok(entries) => entries,
            Err(err) => {
                log::warn!(target: "leaderboard", "Ignoring unreadable leaderboard: {}", err);
                Vec::new()
            }
        }
    }

    /// Put `entry` in front, keep the newest `LEADERBOARD_CAPACITY` and
    /// write them back. Returns the list as it now stands.
    pub fn record(&self, entry: LeaderboardEntry) -> Vec<LeaderboardEntry> {
        let mut entries = self.entries();
        entries.insert(0, entry);
        entries.truncate(LEADERBOARD_CAPACITY);

        if let Err(err) = self.save(&entries) {
            log::error!(target: "leaderboard", "Failed to save leaderboard: {}", err);
        }
        entries
    }

    fn save(&self, entries: &[LeaderboardEntry]) -> io::Result<()> {
        let contents = serde_json::to_string(entries)?;
        self.store.set(LEADERBOARD_KEY, &contents)
    }
}
