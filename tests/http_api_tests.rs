// Integration tests for the HTTP API
//
// Requests are driven through the router in-process with `oneshot`.

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use learning_companion::http::{QuotaResponse, USER_FEATURES_HEADER, USER_ID_HEADER, USER_PLAN_HEADER};
use learning_companion::{create_router, AppState, Companion, SessionHistoryEntry};
use serde::de::DeserializeOwned;
use serde_json::json;
use tower::ServiceExt;

fn app() -> Router {
    create_router(AppState::in_memory())
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, body.to_vec())
}

fn json_body<T: DeserializeOwned>(body: &[u8]) -> T {
    serde_json::from_slice(body).unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn create_request(user: &str, name: &str, subject: &str, topic: &str) -> Request<Body> {
    let body = json!({
        "subject": subject,
        "topic": topic,
        "name": name,
        "voice": "female",
        "style": "casual",
    });

    Request::builder()
        .method("POST")
        .uri("/companions")
        .header("content-type", "application/json")
        .header(USER_ID_HEADER, user)
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn create(app: &Router, user: &str, name: &str, subject: &str, topic: &str) -> Companion {
    let (status, body) = send(app, create_request(user, name, subject, topic)).await;
    assert_eq!(status, StatusCode::CREATED);
    json_body(&body)
}

#[tokio::test]
async fn test_health() {
    let (status, body) = send(&app(), get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, b"OK");
}

#[tokio::test]
async fn test_create_and_fetch() {
    let app = app();
    let created = create(&app, "user-1", "Neura", "science", "Neurons").await;

    assert_eq!(created.author, "user-1");

    let (status, body) = send(&app, get(&format!("/companions/{}", created.id))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json_body::<Companion>(&body), created);
}

#[tokio::test]
async fn test_create_requires_caller() {
    let request = Request::builder()
        .method("POST")
        .uri("/companions")
        .header("content-type", "application/json")
        .body(Body::from(
            json!({"subject": "maths", "topic": "t", "name": "n", "voice": "v", "style": "s"})
                .to_string(),
        ))
        .unwrap();

    let (status, body) = send(&app(), request).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(json_body::<serde_json::Value>(&body)["error"], "Authentication required");
}

#[tokio::test]
async fn test_create_rejects_blank_name() {
    let (status, _) = send(&app(), create_request("user-1", "   ", "maths", "Fractions")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_unknown_companion_is_404() {
    let (status, body) = send(&app(), get("/companions/nope")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(json_body::<serde_json::Value>(&body)["error"]
        .as_str()
        .unwrap()
        .contains("nope"));
}

#[tokio::test]
async fn test_list_with_filters_and_paging() {
    let app = app();
    create(&app, "u", "Countsy", "maths", "Algebra basics").await;
    create(&app, "u", "Algebrina", "maths", "Derivatives").await;
    create(&app, "u", "Neura", "science", "Neurons").await;

    let (status, body) = send(&app, get("/companions?subject=Math&topic=algebra")).await;
    assert_eq!(status, StatusCode::OK);
    let names: Vec<String> = json_body::<Vec<Companion>>(&body)
        .into_iter()
        .map(|c| c.name)
        .collect();
    assert_eq!(names, vec!["Countsy", "Algebrina"]);

    let (_, body) = send(&app, get("/companions?page=2&limit=2")).await;
    let page: Vec<Companion> = json_body(&body);
    assert_eq!(page.len(), 1);
    assert_eq!(page[0].name, "Neura");

    let (status, _) = send(&app, get("/companions?page=0")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_sessions_flow() {
    let app = app();
    let companion = create(&app, "author", "Chrono", "history", "Rome").await;

    let request = Request::builder()
        .method("POST")
        .uri(format!("/companions/{}/sessions", companion.id))
        .header(USER_ID_HEADER, "alice")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::CREATED);
    let entry: SessionHistoryEntry = json_body(&body);
    assert_eq!(entry.user_id, "alice");

    let (_, body) = send(&app, get("/sessions/recent?limit=5")).await;
    assert_eq!(json_body::<Vec<Companion>>(&body), vec![companion.clone()]);

    let (_, body) = send(&app, get("/users/alice/sessions")).await;
    assert_eq!(json_body::<Vec<Companion>>(&body).len(), 1);

    let (_, body) = send(&app, get("/users/bob/sessions")).await;
    assert!(json_body::<Vec<Companion>>(&body).is_empty());

    let (_, body) = send(&app, get("/users/author/companions")).await;
    assert_eq!(json_body::<Vec<Companion>>(&body), vec![companion]);
}

#[tokio::test]
async fn test_session_for_unknown_companion_is_404() {
    let request = Request::builder()
        .method("POST")
        .uri("/companions/missing/sessions")
        .header(USER_ID_HEADER, "alice")
        .body(Body::empty())
        .unwrap();

    let (status, _) = send(&app(), request).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_creation_quota() {
    let app = app();

    let quota = |user: &str, plan: Option<&str>, features: &str| {
        let mut builder = Request::builder()
            .uri("/quota/companions")
            .header(USER_ID_HEADER, user)
            .header(USER_FEATURES_HEADER, features);
        if let Some(plan) = plan {
            builder = builder.header(USER_PLAN_HEADER, plan);
        }
        builder.body(Body::empty()).unwrap()
    };

    let (status, body) = send(&app, quota("free", None, "")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(!json_body::<QuotaResponse>(&body).allowed);

    let (_, body) = send(&app, quota("basic", None, "reports, 3_active_companions")).await;
    assert!(json_body::<QuotaResponse>(&body).allowed);

    for _ in 0..3 {
        create(&app, "basic", "Lexi", "language", "Verbs").await;
    }
    let (_, body) = send(&app, quota("basic", None, "3_active_companions")).await;
    assert!(!json_body::<QuotaResponse>(&body).allowed);

    let (_, body) = send(&app, quota("free", Some("pro"), "")).await;
    assert!(json_body::<QuotaResponse>(&body).allowed);

    let (status, _) = send(&app, get("/quota/companions")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}
