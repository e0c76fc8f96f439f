mod confetti;
mod difficulty;
mod game_engine_command;
mod game_engine_event;
mod leaderboard_entry;
mod session_phase;
mod target_position;

pub use confetti::{
    rgb_channels, BurstOrigin, ConfettiField, HexColor, Particle, ParticleBurst,
    CELEBRATION_DURATION, CONFETTI_COLORS,
};
pub use difficulty::Difficulty;
pub use game_engine_command::GameEngineCommand;
pub use game_engine_event::GameEngineEvent;
pub use leaderboard_entry::LeaderboardEntry;
pub use session_phase::{GameResult, SessionPhase, GAME_DURATION_SECS};
pub use target_position::{TargetPosition, TARGET_POSITION_MAX};
