use super::{Difficulty, GameResult, LeaderboardEntry, SessionPhase, TargetPosition};

#[derive(Debug, Clone)]
pub enum GameEngineEvent {
    DifficultyChanged {
        difficulty: Difficulty,
        target_score: u32,
    },
    PhaseChanged(SessionPhase),
    ScoreChanged(u32),
    TimeRemainingChanged(u32),
    TargetMoved(TargetPosition),
    GameFinished {
        result: GameResult,
        score: u32,
        elapsed_seconds: u32,
    },
    LeaderboardChanged(Vec<LeaderboardEntry>),
}
