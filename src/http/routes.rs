use super::handlers;
use super::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Create the HTTP router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Companion directory
        .route(
            "/companions",
            get(handlers::list_companions).post(handlers::create_companion),
        )
        .route("/companions/:id", get(handlers::get_companion))
        .route("/companions/:id/sessions", post(handlers::record_session))
        .route("/quota/companions", get(handlers::creation_quota))
        // Session history
        .route("/sessions/recent", get(handlers::recent_sessions))
        .route("/users/:user_id/sessions", get(handlers::user_sessions))
        .route("/users/:user_id/companions", get(handlers::user_companions))
        // Add tracing middleware for request logging
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
