use super::Difficulty;

#[derive(Debug, Clone)]
pub enum GameEngineCommand {
    /// Re-emit the full engine state for freshly built widgets.
    InitDisplay,
    SelectDifficulty(Difficulty),
    StartGame,
    RegisterHit,
    /// Leave a finished session so a new difficulty can be picked.
    ResetSession,
}
