use crate::model::Difficulty;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const APP_DATA_DIR: &str = "click-target";
const SETTINGS_FILE: &str = "settings.json";
const CURRENT_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Settings {
    #[serde(default = "default_version")]
    version: u32,

    /// Last difficulty picked, restored at startup.
    #[serde(default)]
    pub difficulty: Difficulty,
}

fn default_version() -> u32 {
    CURRENT_VERSION
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            version: CURRENT_VERSION,
            difficulty: Difficulty::default(),
        }
    }
}

impl Settings {
    /// Where the settings and the leaderboard live.
    pub fn data_dir() -> PathBuf {
        glib::user_data_dir().join(APP_DATA_DIR)
    }

    pub fn load() -> Self {
        Self::load_from(&Self::data_dir())
    }

    pub fn save(&self) -> Result<(), std::io::Error> {
        self.save_to(&Self::data_dir())
    }

    fn load_from(dir: &Path) -> Self {
        let path = dir.join(SETTINGS_FILE);
        if let Ok(contents) = fs::read_to_string(&path) {
            match serde_json::from_str::<Settings>(&contents) {
                Ok(mut settings) => {
                    settings.migrate();
                    return settings;
                }
                Err(err) => {
                    log::warn!(target: "settings", "Replacing unreadable settings {:?}: {}", path, err)
                }
            }
        }
        let default = Settings::default();
        if let Err(err) = default.save_to(dir) {
            log::error!(target: "settings", "Failed to write default settings: {}", err);
        }
        default
    }

    fn save_to(&self, dir: &Path) -> Result<(), std::io::Error> {
        fs::create_dir_all(dir)?;
        let contents = serde_json::to_string(self)?;
        fs::write(dir.join(SETTINGS_FILE), contents)
    }

    fn migrate(&mut self) {
        if self.version < CURRENT_VERSION {
            self.version = CURRENT_VERSION;
        }
    }

    pub fn is_debug_mode() -> bool {
        std::env::var("DEBUG").map(|v| v == "1").unwrap_or(false)
    }

    /// Fixed seed for target placement, for reproducible runs.
    pub fn seed_from_env() -> Option<u64> {
        std::env::var("SEED").ok().and_then(|v| match v.parse::<u64>() {
            Ok(seed) => Some(seed),
            Err(_) => {
                log::warn!(target: "settings", "Ignoring non-numeric SEED {:?}", v);
                None
            }
        })
    }
}
