use super::state::AppState;
use crate::companion::NewCompanion;
use crate::directory::{Caller, CompanionFilter, DirectoryError, DEFAULT_PAGE_SIZE};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct LimitQuery {
    /// Maximum number of companions (default: 10)
    #[serde(default = "default_limit")]
    pub limit: usize,
}

fn default_limit() -> usize {
    DEFAULT_PAGE_SIZE
}

#[derive(Debug, Serialize, Deserialize)]
pub struct QuotaResponse {
    pub allowed: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

fn error_response(err: DirectoryError) -> Response {
    let status = match &err {
        DirectoryError::NotFound(_) => StatusCode::NOT_FOUND,
        DirectoryError::InvalidInput(_) => StatusCode::BAD_REQUEST,
        DirectoryError::Persistence { .. } => {
            error!("Directory operation failed: {}", err);
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };

    (
        status,
        Json(ErrorResponse {
            error: err.to_string(),
        }),
    )
        .into_response()
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /companions
/// Create a companion authored by the caller
pub async fn create_companion(
    State(state): State<AppState>,
    caller: Caller,
    Json(req): Json<NewCompanion>,
) -> Response {
    info!("Creating companion {:?} for {}", req.name, caller.user_id);

    match state.directory.create(&caller, req).await {
        Ok(companion) => (StatusCode::CREATED, Json(companion)).into_response(),
        Err(e) => {
            warn!("Failed to create companion: {}", e);
            error_response(e)
        }
    }
}

/// GET /companions?subject=&topic=&page=&limit=
/// List companions matching the filters
pub async fn list_companions(
    State(state): State<AppState>,
    Query(filter): Query<CompanionFilter>,
) -> Response {
    match state.directory.list(&filter).await {
        Ok(companions) => (StatusCode::OK, Json(companions)).into_response(),
        Err(e) => error_response(e),
    }
}

/// GET /companions/:id
pub async fn get_companion(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    match state.directory.get_by_id(&id).await {
        Ok(companion) => (StatusCode::OK, Json(companion)).into_response(),
        Err(e) => error_response(e),
    }
}

/// POST /companions/:id/sessions
/// Record that the caller started a call with a companion
pub async fn record_session(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<String>,
) -> Response {
    match state.directory.record_session_start(&caller, &id).await {
        Ok(entry) => (StatusCode::CREATED, Json(entry)).into_response(),
        Err(e) => error_response(e),
    }
}

/// GET /sessions/recent?limit=
/// Companions from the most recent sessions of all users
pub async fn recent_sessions(
    State(state): State<AppState>,
    Query(query): Query<LimitQuery>,
) -> Response {
    match state.directory.recent_sessions(query.limit).await {
        Ok(companions) => (StatusCode::OK, Json(companions)).into_response(),
        Err(e) => error_response(e),
    }
}

/// GET /users/:user_id/sessions?limit=
pub async fn user_sessions(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Query(query): Query<LimitQuery>,
) -> Response {
    match state.directory.sessions_for_user(&user_id, query.limit).await {
        Ok(companions) => (StatusCode::OK, Json(companions)).into_response(),
        Err(e) => error_response(e),
    }
}

/// GET /users/:user_id/companions
pub async fn user_companions(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Response {
    match state.directory.list_for_author(&user_id).await {
        Ok(companions) => (StatusCode::OK, Json(companions)).into_response(),
        Err(e) => error_response(e),
    }
}

/// GET /quota/companions
/// Whether the caller may create another companion
pub async fn creation_quota(State(state): State<AppState>, caller: Caller) -> Response {
    match state.directory.check_creation_quota(&caller).await {
        Ok(allowed) => (StatusCode::OK, Json(QuotaResponse { allowed })).into_response(),
        Err(e) => error_response(e),
    }
}

/// GET /health
/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}
