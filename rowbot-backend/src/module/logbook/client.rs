use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::{Client, Response};
use rowbot_common::{LogbookEnvelope, RawResult};
use serde::de::DeserializeOwned;

use super::types::{LogbookUser, TokenData};

const REQUEST_TIMEOUT_SECONDS: u64 = 30;
const TOKEN_PATH: &str = "/oauth/access_token";

/// Client for the Concept2 logbook REST API
#[derive(Debug, Clone)]
pub struct LogbookClient {
    base_url: String,
    http: Client,
}

impl LogbookClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECONDS))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self::with_http(base_url, http))
    }

    pub fn with_http(base_url: impl Into<String>, http: Client) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { base_url, http }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Exchange the code from the OAuth redirect for a token pair
    pub async fn token_from_auth_code(
        &self,
        code: &str,
        client_id: &str,
        client_secret: &str,
        redirect_uri: &str,
    ) -> Result<TokenData> {
        self.request_token(&[
            ("grant_type", "authorization_code"),
            ("client_id", client_id),
            ("client_secret", client_secret),
            ("code", code),
            ("redirect_uri", redirect_uri),
        ])
        .await
        .context("Authorization code exchange failed")
    }

    /// Trade a refresh token for a new token pair. The old refresh token is
    /// spent afterwards, so callers must persist the new one.
    pub async fn token_from_refresh(
        &self,
        refresh_token: &str,
        client_id: &str,
        client_secret: &str,
    ) -> Result<TokenData> {
        self.request_token(&[
            ("grant_type", "refresh_token"),
            ("client_id", client_id),
            ("client_secret", client_secret),
            ("refresh_token", refresh_token),
        ])
        .await
        .context("Token refresh failed")
    }

    pub async fn current_user(&self, access_token: &str) -> Result<LogbookUser> {
        self.get_data(access_token, "/api/users/me")
            .await
            .context("Failed to fetch current logbook user")
    }

    pub async fn result_by_id(&self, access_token: &str, result_id: u64) -> Result<RawResult> {
        self.get_data(access_token, &format!("/api/users/me/results/{}", result_id))
            .await
            .with_context(|| format!("Failed to fetch logbook result {}", result_id))
    }

    async fn request_token(&self, form: &[(&str, &str)]) -> Result<TokenData> {
        let url = format!("{}{}", self.base_url, TOKEN_PATH);
        let response = self
            .http
            .post(&url)
            .form(form)
            .send()
            .await
            .with_context(|| format!("Failed to send request to {}", url))?;

        let token: TokenData = ensure_success(response)
            .await?
            .json()
            .await
            .context("Failed to parse token response")?;

        tracing::debug!("Received {} token, expires in {}s", token.token_type, token.expires_in);
        Ok(token)
    }

    /// GET a `{"data": ...}` endpoint with a bearer token
    async fn get_data<T: DeserializeOwned>(&self, access_token: &str, path: &str) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);
        let response = self
            .http
            .get(&url)
            .bearer_auth(access_token)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .with_context(|| format!("Failed to send request to {}", url))?;

        let envelope: LogbookEnvelope<T> = ensure_success(response)
            .await?
            .json()
            .await
            .with_context(|| format!("Failed to parse JSON response from {}", path))?;

        Ok(envelope.data)
    }
}

/// Turn a non-2xx response into an error carrying the status and body
pub(crate) async fn ensure_success(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let url = response.url().to_string();
    let body = response.text().await.unwrap_or_default();
    Err(anyhow::anyhow!("HTTP error {} from {}: {}", status, url, body))
}
