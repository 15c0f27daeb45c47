use axum::http::StatusCode;
use werewolf_engine::{GameError, GamePhase, PlayerId, Role};

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("session not found: {0}")]
    SessionNotFound(String),
    #[error(transparent)]
    Game(#[from] GameError),
    #[error("player name must not be empty")]
    EmptyName,
    #[error("at least {required} players are needed to start, got {actual}")]
    NotEnoughPlayers { required: usize, actual: usize },
    #[error("{action} is not available during phase '{}'", .phase.as_str())]
    WrongPhase {
        action: &'static str,
        phase: GamePhase,
    },
    #[error("there is no night action to take in this phase")]
    NoNightAction,
    #[error("no living {0:?} can act")]
    RoleNotAlive(Role),
    #[error("player {0} cannot be chosen for this action")]
    TargetNotEligible(PlayerId),
    #[error("player {0} was not executed today")]
    MediumTargetMismatch(PlayerId),
    #[error("a player was already executed on day {0}")]
    AlreadyExecutedToday(u32),
    #[error("no candidates were given for random execution")]
    NoCandidates,
}

impl SessionError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            SessionError::SessionNotFound(_) => StatusCode::NOT_FOUND,
            SessionError::Game(GameError::PlayerNotFound(_)) => StatusCode::NOT_FOUND,
            SessionError::Game(GameError::DuplicateName(_))
            | SessionError::Game(GameError::AlreadyDead(_))
            | SessionError::Game(GameError::InvalidPhase { .. })
            | SessionError::WrongPhase { .. }
            | SessionError::NoNightAction
            | SessionError::RoleNotAlive(_)
            | SessionError::AlreadyExecutedToday(_) => StatusCode::CONFLICT,
            SessionError::Game(GameError::TargetNotAlive(_))
            | SessionError::EmptyName
            | SessionError::NotEnoughPlayers { .. }
            | SessionError::TargetNotEligible(_)
            | SessionError::MediumTargetMismatch(_)
            | SessionError::NoCandidates => StatusCode::BAD_REQUEST,
        }
    }
}
