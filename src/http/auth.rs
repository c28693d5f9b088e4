use super::handlers::ErrorResponse;
use crate::directory::Caller;
use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{request::Parts, HeaderMap, StatusCode},
    Json,
};

/// Headers set by the authenticating gateway in front of this service
pub const USER_ID_HEADER: &str = "x-user-id";
pub const USER_PLAN_HEADER: &str = "x-user-plan";
/// Comma-separated feature entitlements
pub const USER_FEATURES_HEADER: &str = "x-user-features";

fn header<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
}

fn caller_from_headers(headers: &HeaderMap) -> Option<Caller> {
    let mut caller = Caller::new(header(headers, USER_ID_HEADER)?);

    if let Some(plan) = header(headers, USER_PLAN_HEADER) {
        caller = caller.with_plan(plan);
    }

    for feature in header(headers, USER_FEATURES_HEADER)
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|f| !f.is_empty())
    {
        caller = caller.with_feature(feature);
    }

    Some(caller)
}

#[async_trait]
impl<S> FromRequestParts<S> for Caller
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, Json<ErrorResponse>);

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        caller_from_headers(&parts.headers).ok_or_else(|| {
            (
                StatusCode::UNAUTHORIZED,
                Json(ErrorResponse {
                    error: "Authentication required".to_string(),
                }),
            )
        })
    }
}
