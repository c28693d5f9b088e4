//! HTTP API for the companion directory
//!
//! This module provides a REST API over the directory operations:
//! - POST /companions - Create a companion (authenticated)
//! - GET /companions - List companions, filtered and paged
//! - GET /companions/:id - Fetch one companion
//! - POST /companions/:id/sessions - Record a call session (authenticated)
//! - GET /sessions/recent - Companions from the latest sessions
//! - GET /users/:user_id/sessions - Companions from a user's latest sessions
//! - GET /users/:user_id/companions - Companions a user created
//! - GET /quota/companions - Whether the caller may create another (authenticated)
//! - GET /health - Health check

mod auth;
mod handlers;
mod routes;
mod state;

pub use auth::{USER_FEATURES_HEADER, USER_ID_HEADER, USER_PLAN_HEADER};
pub use handlers::{ErrorResponse, QuotaResponse};
pub use routes::create_router;
pub use state::AppState;
