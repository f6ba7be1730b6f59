use std::collections::HashMap;
use std::sync::Arc;

use anyhow::Result;
use axum::{
    body::Bytes,
    extract::{Query, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Router,
};
use rowbot_common::HookEvent;
use serde::Deserialize;
use tower_http::trace::TraceLayer;
use tracing::{debug, error, info, warn};

use crate::model::User;
use crate::module::handler::{HookDisposition, WorkoutHandler};
use crate::pages;

const ACCESS_COOKIE: &str = "access_token";
const REFRESH_COOKIE: &str = "refresh_token";
const COOKIE_MAX_AGE_SECONDS: u32 = 3600;

/// Shared by every request
#[derive(Clone)]
pub struct AppState {
    handler: Arc<WorkoutHandler>,
    redirect_uri: Arc<str>,
    login_url: Arc<str>,
}

impl AppState {
    pub fn new(handler: WorkoutHandler, redirect_uri: &str) -> Result<Self> {
        let login_url = pages::login_url(
            handler.logbook().base_url(),
            &handler.credentials().client_id,
            redirect_uri,
        )?;
        Ok(Self {
            handler: Arc::new(handler),
            redirect_uri: redirect_uri.into(),
            login_url: login_url.into(),
        })
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/callback", get(callback))
        .route("/logout", post(logout))
        .route("/webhook", post(webhook))
        .route("/health", get(health_check))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// `name=value` pairs from the Cookie header
fn parse_cookies(headers: &HeaderMap) -> HashMap<String, String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| {
            let (name, value) = pair.trim().split_once('=')?;
            (!name.is_empty() && !value.is_empty()).then(|| (name.to_string(), value.to_string()))
        })
        .collect()
}

fn cookie(name: &str, value: &str, max_age: u32) -> String {
    format!(
        "{}={}; HttpOnly; Secure; SameSite=Strict; Max-Age={}; Path=/",
        name, value, max_age
    )
}

fn with_cookies(mut response: Response, cookies: &[String]) -> Response {
    for cookie in cookies {
        match HeaderValue::from_str(cookie) {
            Ok(value) => {
                response.headers_mut().append(header::SET_COOKIE, value);
            }
            Err(e) => warn!("Dropping unrepresentable cookie: {}", e),
        }
    }
    response
}

async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

async fn index(State(state): State<AppState>, headers: HeaderMap) -> Html<String> {
    let logged_in = parse_cookies(&headers).contains_key(ACCESS_COOKIE);
    Html(pages::main_page(logged_in, &state.login_url))
}

#[derive(Debug, Deserialize)]
pub struct CallbackParams {
    code: Option<String>,
    error: Option<String>,
}

async fn callback(State(state): State<AppState>, Query(params): Query<CallbackParams>) -> Response {
    if let Some(error) = params.error {
        warn!("Logbook authorization refused: {}", error);
        return Html(pages::error_page(&error)).into_response();
    }
    let Some(code) = params.code.filter(|code| !code.is_empty()) else {
        return Html(pages::error_page("No authorization code received")).into_response();
    };

    match link_account(&state, &code).await {
        Ok(user) => {
            info!("Linked logbook user {} ({})", user.logbook_username, user.logbook_id);
            with_cookies(
                Html(pages::success_page(&user.logbook_username)).into_response(),
                &[
                    cookie(ACCESS_COOKIE, &user.access_token, COOKIE_MAX_AGE_SECONDS),
                    cookie(REFRESH_COOKIE, &user.refresh_token, COOKIE_MAX_AGE_SECONDS),
                ],
            )
        }
        Err(e) => {
            error!("Token exchange error: {:#}", e);
            Html(pages::error_page("Failed to exchange authorization code")).into_response()
        }
    }
}

/// Exchange the code, look up who it belongs to and remember them
async fn link_account(state: &AppState, code: &str) -> Result<User> {
    let handler = &state.handler;
    let credentials = handler.credentials();

    let tokens = handler
        .logbook()
        .token_from_auth_code(
            code,
            &credentials.client_id,
            &credentials.client_secret,
            &state.redirect_uri,
        )
        .await?;
    let me = handler.logbook().current_user(&tokens.access_token).await?;

    handler
        .store()
        .upsert_user(
            me.id,
            &me.username,
            me.profile_image_url.as_deref(),
            &tokens.access_token,
            &tokens.refresh_token,
        )
        .await
}

async fn logout() -> Response {
    with_cookies(
        "OK".into_response(),
        &[cookie(ACCESS_COOKIE, "", 0), cookie(REFRESH_COOKIE, "", 0)],
    )
}

async fn webhook(State(state): State<AppState>, body: Bytes) -> Response {
    let event: HookEvent = match serde_json::from_slice(&body) {
        Ok(event) => event,
        Err(e) => {
            error!("Webhook body is not valid JSON: {}", e);
            return (StatusCode::INTERNAL_SERVER_ERROR, "Error processing webhook").into_response();
        }
    };

    match HookDisposition::of(&event) {
        HookDisposition::Unsupported => {
            debug!("Ignoring hook of type '{}'", event.kind);
            "unsupported type".into_response()
        }
        HookDisposition::MissingResult => {
            warn!("Got a result-added hook without a result: {}", String::from_utf8_lossy(&body));
            "cannot parse result from hook data".into_response()
        }
        HookDisposition::Process(result) => {
            info!(
                "Processing webhook with user_id:{} result_id:{}",
                result.user_id, result.id
            );
            if let Err(e) = state.handler.process_hook(result).await {
                error!("Error processing webhook: {:#}", e);
            }
            "OK".into_response()
        }
    }
}
