//! In-process stand-ins for the logbook API and a Discord webhook, served
//! on an ephemeral local port, plus a renderer over the bundled fonts.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use axum::{
    body::Bytes,
    extract::{Form, Path, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};

use crate::module::report::{ReportRenderer, ReportStyle, WorkoutReport};

pub const MOCK_ACCESS_TOKEN: &str = "mock_access_token_12345";
pub const MOCK_REFRESH_TOKEN: &str = "mock_refresh_token_67890";
pub const MOCK_AUTH_CODE: &str = "good-code";
pub const MOCK_USER_ID: u64 = 1688;

/// Renderer over `resources/fonts` only, so output does not depend on the host
pub fn test_renderer() -> ReportRenderer {
    let fonts_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("resources/fonts");
    ReportRenderer::with_fonts(Some(&fonts_dir), false).unwrap()
}

pub fn test_report() -> WorkoutReport {
    WorkoutReport::new(ReportStyle::default(), test_renderer())
}

type Recorder<T> = Arc<Mutex<Vec<T>>>;

pub struct MockServer<T> {
    pub url: String,
    recorded: Recorder<T>,
}

impl<T: Clone> MockServer<T> {
    pub fn recorded(&self) -> Vec<T> {
        self.recorded.lock().unwrap().clone()
    }
}

async fn serve(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

/// Logbook API answering for user 1688. Records every grant type requested.
pub async fn spawn_mock_logbook() -> MockServer<String> {
    let recorded: Recorder<String> = Arc::default();
    let app = Router::new()
        .route("/oauth/access_token", post(token))
        .route("/api/users/me", get(current_user))
        .route("/api/users/me/results/{id}", get(result))
        .with_state(recorded.clone());

    MockServer {
        url: serve(app).await,
        recorded,
    }
}

/// Webhook endpoint at `{url}/webhook` answering `status`. Records raw bodies.
pub async fn spawn_mock_discord(status: StatusCode) -> MockServer<Vec<u8>> {
    let recorded: Recorder<Vec<u8>> = Arc::default();
    let app = Router::new()
        .route(
            "/webhook",
            post(move |State(rec): State<Recorder<Vec<u8>>>, body: Bytes| async move {
                rec.lock().unwrap().push(body.to_vec());
                status
            }),
        )
        .with_state(recorded.clone());

    MockServer {
        url: serve(app).await,
        recorded,
    }
}

async fn token(
    State(rec): State<Recorder<String>>,
    Form(params): Form<HashMap<String, String>>,
) -> Response {
    let grant = params.get("grant_type").cloned().unwrap_or_default();
    rec.lock().unwrap().push(grant.clone());

    let accepted = match grant.as_str() {
        "authorization_code" => params.get("code").map(String::as_str) == Some(MOCK_AUTH_CODE),
        "refresh_token" => {
            params.get("refresh_token").map(String::as_str) == Some(MOCK_REFRESH_TOKEN)
        }
        _ => false,
    };
    if !accepted {
        return (StatusCode::BAD_REQUEST, Json(json!({ "error": "invalid_grant" }))).into_response();
    }

    Json(json!({
        "access_token": MOCK_ACCESS_TOKEN,
        "refresh_token": MOCK_REFRESH_TOKEN,
        "expires_in": 3600,
        "token_type": "Bearer",
        "scope": "user:read,results:read",
    }))
    .into_response()
}

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == format!("Bearer {}", MOCK_ACCESS_TOKEN))
}

async fn current_user(headers: HeaderMap) -> Response {
    if !authorized(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    Json(json!({
        "data": {
            "id": MOCK_USER_ID,
            "username": "test_user",
            "profile_image": "https://example.com/avatar.jpg",
        }
    }))
    .into_response()
}

async fn result(headers: HeaderMap, Path(id): Path<u64>) -> Response {
    if !authorized(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    match mock_result(id) {
        Some(data) => Json(json!({ "data": data })).into_response(),
        None => (StatusCode::NOT_FOUND, Json(json!({ "error": "Not found" }))).into_response(),
    }
}

/// 1: 8000 m in five splits. 2: 4 x 1000 m with rests.
pub fn mock_result(id: u64) -> Option<Value> {
    match id {
        1 => Some(json!({
            "id": 1,
            "user_id": MOCK_USER_ID,
            "date": "2025-09-18 07:30:00",
            "distance": 8000,
            "time": 21671,
            "stroke_rate": 19,
            "workout": {
                "splits": [
                    { "type": "distance", "time": 4357, "distance": 1600, "stroke_rate": 18 },
                    { "type": "distance", "time": 4334, "distance": 1600, "stroke_rate": 19 },
                    { "type": "distance", "time": 4313, "distance": 1600, "stroke_rate": 19 },
                    { "type": "distance", "time": 4354, "distance": 1600, "stroke_rate": 19 },
                    { "type": "distance", "time": 4312, "distance": 1600, "stroke_rate": 20 }
                ]
            }
        })),
        2 => Some(json!({
            "id": 2,
            "user_id": MOCK_USER_ID,
            "date": "2026-02-04 11:53:00",
            "distance": 4000,
            "time": 9543,
            "stroke_rate": 26,
            "workout": {
                "intervals": [
                    { "type": "distance", "time": 2396, "distance": 1000, "stroke_rate": 27 },
                    { "type": "rest", "time": 600, "distance": 0 },
                    { "type": "distance", "time": 2371, "distance": 1000, "stroke_rate": 27 },
                    { "type": "rest", "time": 600, "distance": 0 },
                    { "type": "distance", "time": 2380, "distance": 1000, "stroke_rate": 26 },
                    { "type": "rest", "time": 600, "distance": 0 },
                    { "type": "distance", "time": 2396, "distance": 1000, "stroke_rate": 26 }
                ]
            }
        })),
        _ => None,
    }
}
