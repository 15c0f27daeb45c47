use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post, put},
    Json, Router,
};
use serde::Serialize;
use werewolf_engine::{GameRules, PlayerId};

use crate::{
    error::SessionError,
    models::session::{AddPlayerRequest, RandomExecutionRequest, TargetRequest},
    services::session_service,
    state::AppState,
};

pub fn routes(state: AppState) -> Router {
    Router::new()
        // セッション作成
        // curl -X POST http://localhost:8080/api/session/create
        .route("/create", post(create_session))
        // セッションの状態取得
        // curl http://localhost:8080/api/session/{id}/state
        .route("/:id/state", get(get_session_state))
        // セッション削除
        // curl -X DELETE http://localhost:8080/api/session/{id}
        .route("/:id", delete(delete_session))
        // ルール変更（開始前のみ）
        // curl -X PUT -H 'Content-Type: application/json' -d '{"day_seconds":180,"night_seconds":90,"first_day_seer":"random_white"}' http://localhost:8080/api/session/{id}/rules
        .route("/:id/rules", put(update_rules))
        // 参加者追加
        // curl -X POST -H 'Content-Type: application/json' -d '{"name":"Alice","role":"seer"}' http://localhost:8080/api/session/{id}/players
        .route("/:id/players", post(add_player))
        // 参加者削除
        // curl -X DELETE http://localhost:8080/api/session/{id}/players/{player_id}
        .route("/:id/players/:player_id", delete(remove_player))
        // ゲーム開始
        // curl -X POST http://localhost:8080/api/session/{id}/start
        .route("/:id/start", post(start_game))
        // 次のフェーズへ
        // curl -X POST http://localhost:8080/api/session/{id}/phase/next
        .route("/:id/phase/next", post(advance_phase))
        // 直前の夜フェーズへ戻る
        // curl -X POST http://localhost:8080/api/session/{id}/phase/previous
        .route("/:id/phase/previous", post(revert_phase))
        // 投票による処刑
        // curl -X POST -H 'Content-Type: application/json' -d '{"target_id":"..."}' http://localhost:8080/api/session/{id}/actions/vote
        .route("/:id/actions/vote", post(cast_vote))
        // RPP（候補からランダムに処刑）
        // curl -X POST -H 'Content-Type: application/json' -d '{"candidate_ids":["...","..."]}' http://localhost:8080/api/session/{id}/actions/rpp
        .route("/:id/actions/rpp", post(random_execution))
        // 夜の行動
        // curl -X POST -H 'Content-Type: application/json' -d '{"target_id":"..."}' http://localhost:8080/api/session/{id}/actions/night
        .route("/:id/actions/night", post(night_action))
        // 夜の行動の対象候補
        // curl http://localhost:8080/api/session/{id}/candidates
        .route("/:id/candidates", get(night_action_candidates))
        // 進行ログ
        // curl http://localhost:8080/api/session/{id}/logs
        .route("/:id/logs", get(get_logs))
        .with_state(state)
}

fn respond<T: Serialize>(result: Result<T, SessionError>) -> Response {
    match result {
        Ok(body) => (StatusCode::OK, Json(body)).into_response(),
        Err(e) => (e.status_code(), Json(e.to_string())).into_response(),
    }
}

pub async fn create_session(State(state): State<AppState>) -> impl IntoResponse {
    let session_id = session_service::create_session(&state).await;
    (
        StatusCode::OK,
        Json(serde_json::json!({ "session_id": session_id })),
    )
}

async fn get_session_state(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Response {
    respond(session_service::get_session_state(&state, &session_id).await)
}

async fn delete_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Response {
    match session_service::delete_session(&state, &session_id).await {
        Ok(()) => (StatusCode::OK, Json("Session deleted")).into_response(),
        Err(e) => (e.status_code(), Json(e.to_string())).into_response(),
    }
}

async fn update_rules(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    Json(rules): Json<GameRules>,
) -> Response {
    respond(session_service::update_rules(&state, &session_id, rules).await)
}

async fn add_player(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    Json(request): Json<AddPlayerRequest>,
) -> Response {
    respond(session_service::add_player(&state, &session_id, &request.name, request.role).await)
}

async fn remove_player(
    State(state): State<AppState>,
    Path((session_id, player_id)): Path<(String, PlayerId)>,
) -> Response {
    respond(session_service::remove_player(&state, &session_id, player_id).await)
}

async fn start_game(State(state): State<AppState>, Path(session_id): Path<String>) -> Response {
    respond(session_service::start_game(&state, &session_id).await)
}

async fn advance_phase(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Response {
    respond(session_service::advance_phase(&state, &session_id).await)
}

async fn revert_phase(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Response {
    respond(session_service::revert_phase(&state, &session_id).await)
}

async fn cast_vote(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    Json(request): Json<TargetRequest>,
) -> Response {
    respond(session_service::cast_vote(&state, &session_id, request.target_id).await)
}

async fn random_execution(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    Json(request): Json<RandomExecutionRequest>,
) -> Response {
    respond(
        session_service::random_execution(&state, &session_id, &request.candidate_ids).await,
    )
}

async fn night_action(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    Json(request): Json<TargetRequest>,
) -> Response {
    respond(session_service::night_action(&state, &session_id, request.target_id).await)
}

async fn night_action_candidates(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Response {
    respond(session_service::night_action_candidates(&state, &session_id).await)
}

async fn get_logs(State(state): State<AppState>, Path(session_id): Path<String>) -> Response {
    respond(session_service::get_logs(&state, &session_id).await)
}
