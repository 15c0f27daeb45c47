use uuid::Uuid;
use werewolf_engine::{GameRules, Player, PlayerId, Role};

use crate::{
    error::SessionError,
    models::{
        log::SessionLog,
        session::{
            ExecutionResponse, NightActionOutcome, PhaseResponse, RevertResponse, Session,
            SessionSnapshot,
        },
    },
    state::AppState,
};

async fn with_session<T>(
    state: &AppState,
    session_id: &str,
    f: impl FnOnce(&mut Session) -> Result<T, SessionError>,
) -> Result<T, SessionError> {
    let mut sessions = state.sessions.lock().await;
    let session = sessions
        .get_mut(session_id)
        .ok_or_else(|| SessionError::SessionNotFound(session_id.to_string()))?;
    let result = f(session);
    if let Err(e) = &result {
        tracing::debug!("[{}] request rejected: {}", session_id, e);
    }
    result
}

pub async fn create_session(state: &AppState) -> String {
    let session_id = Uuid::new_v4().to_string();
    let session = Session::new(
        session_id.clone(),
        state.config.default_rules(),
        state.session_rng(),
    );

    let mut sessions = state.sessions.lock().await;
    sessions.insert(session_id.clone(), session);
    tracing::info!("Session created: {}", session_id);
    session_id
}

pub async fn get_session_state(
    state: &AppState,
    session_id: &str,
) -> Result<SessionSnapshot, SessionError> {
    let min_players = state.config.min_players;
    with_session(state, session_id, |s| Ok(s.snapshot(min_players))).await
}

pub async fn delete_session(state: &AppState, session_id: &str) -> Result<(), SessionError> {
    let mut sessions = state.sessions.lock().await;
    match sessions.remove(session_id) {
        Some(_) => {
            tracing::info!("Session deleted: {}", session_id);
            Ok(())
        }
        None => Err(SessionError::SessionNotFound(session_id.to_string())),
    }
}

pub async fn update_rules(
    state: &AppState,
    session_id: &str,
    rules: GameRules,
) -> Result<GameRules, SessionError> {
    with_session(state, session_id, |s| {
        s.update_rules(rules)?;
        Ok(s.game().rules().clone())
    })
    .await
}

pub async fn add_player(
    state: &AppState,
    session_id: &str,
    name: &str,
    role: Role,
) -> Result<Player, SessionError> {
    with_session(state, session_id, |s| s.add_player(name, role)).await
}

pub async fn remove_player(
    state: &AppState,
    session_id: &str,
    player_id: PlayerId,
) -> Result<Player, SessionError> {
    with_session(state, session_id, |s| s.remove_player(player_id)).await
}

pub async fn start_game(state: &AppState, session_id: &str) -> Result<PhaseResponse, SessionError> {
    let min_players = state.config.min_players;
    let response = with_session(state, session_id, |s| s.start(min_players)).await?;
    tracing::info!("[{}] game started: {:?}", session_id, response.phase);
    Ok(response)
}

pub async fn advance_phase(
    state: &AppState,
    session_id: &str,
) -> Result<PhaseResponse, SessionError> {
    let response = with_session(state, session_id, |s| s.advance()).await?;
    tracing::info!(
        "[{}] phase: day {} {:?}",
        session_id,
        response.day,
        response.phase
    );
    Ok(response)
}

pub async fn revert_phase(
    state: &AppState,
    session_id: &str,
) -> Result<RevertResponse, SessionError> {
    with_session(state, session_id, |s| Ok(s.revert())).await
}

pub async fn cast_vote(
    state: &AppState,
    session_id: &str,
    target_id: PlayerId,
) -> Result<ExecutionResponse, SessionError> {
    with_session(state, session_id, |s| s.vote(target_id)).await
}

pub async fn random_execution(
    state: &AppState,
    session_id: &str,
    candidate_ids: &[PlayerId],
) -> Result<ExecutionResponse, SessionError> {
    with_session(state, session_id, |s| s.random_execute(candidate_ids)).await
}

pub async fn night_action(
    state: &AppState,
    session_id: &str,
    target_id: PlayerId,
) -> Result<NightActionOutcome, SessionError> {
    with_session(state, session_id, |s| s.night_action(target_id)).await
}

pub async fn night_action_candidates(
    state: &AppState,
    session_id: &str,
) -> Result<Vec<Player>, SessionError> {
    with_session(state, session_id, |s| {
        Ok(s.night_action_candidates()?.into_iter().cloned().collect())
    })
    .await
}

pub async fn get_logs(state: &AppState, session_id: &str) -> Result<SessionLog, SessionError> {
    with_session(state, session_id, |s| Ok(s.log().clone())).await
}
