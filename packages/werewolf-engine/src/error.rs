use crate::models::{GamePhase, PlayerId};

/// Rejections raised by [`crate::Game`] operations.
///
/// Every operation validates before it mutates, so the game is unchanged
/// whenever one of these is returned.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GameError {
    #[error("player name already exists: {0}")]
    DuplicateName(String),
    #[error("player not found: {0}")]
    PlayerNotFound(PlayerId),
    #[error("player is already dead: {0}")]
    AlreadyDead(PlayerId),
    #[error("target player is not alive: {0}")]
    TargetNotAlive(PlayerId),
    #[error("operation is not allowed during phase '{}'", .actual.as_str())]
    InvalidPhase { actual: GamePhase },
}
