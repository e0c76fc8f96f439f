pub mod celebration;
pub mod game_engine;
pub mod leaderboard;
pub mod scheduler;
pub mod settings;
pub mod storage;

pub use celebration::Celebration;
pub use game_engine::GameEngine;
pub use leaderboard::Leaderboard;
pub use scheduler::{GlibScheduler, Scheduler, TimerHandle};
pub use settings::Settings;
pub use storage::{FileStore, KeyValueStore};
