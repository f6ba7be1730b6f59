//! Turns a logbook webhook into a report posted to Discord.
use std::sync::Arc;

use anyhow::{Context, Result};
use rowbot_common::{HookEvent, HookResultRef};
use uuid::Uuid;

use crate::model::UserStore;
use super::discord::{activity_message, DiscordWebhook, REPORT_FILE_NAME};
use super::logbook::LogbookClient;
use super::report::WorkoutReport;

/// What the webhook endpoint should do with an event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookDisposition {
    /// Not a `result-added` event
    Unsupported,
    /// `result-added` without a result reference
    MissingResult,
    Process(HookResultRef),
}

impl HookDisposition {
    pub fn of(event: &HookEvent) -> Self {
        if !event.is_result_added() {
            return HookDisposition::Unsupported;
        }
        match event.result {
            Some(result) => HookDisposition::Process(result),
            None => HookDisposition::MissingResult,
        }
    }
}

/// OAuth client registration with the logbook
#[derive(Debug, Clone)]
pub struct LogbookCredentials {
    pub client_id: String,
    pub client_secret: String,
}

/// Everything needed to go from a hook to a Discord post
pub struct WorkoutHandler {
    logbook: LogbookClient,
    credentials: LogbookCredentials,
    store: Arc<UserStore>,
    discord: DiscordWebhook,
    report: Arc<WorkoutReport>,
}

impl WorkoutHandler {
    pub fn new(
        logbook: LogbookClient,
        credentials: LogbookCredentials,
        store: Arc<UserStore>,
        discord: DiscordWebhook,
        report: WorkoutReport,
    ) -> Self {
        Self {
            logbook,
            credentials,
            store,
            discord,
            report: Arc::new(report),
        }
    }

    pub fn logbook(&self) -> &LogbookClient {
        &self.logbook
    }

    pub fn credentials(&self) -> &LogbookCredentials {
        &self.credentials
    }

    pub fn store(&self) -> &UserStore {
        &self.store
    }

    /// Refresh the user's tokens, fetch the result, render it and post it.
    /// The first failing step aborts the rest.
    pub async fn process_hook(&self, hook: HookResultRef) -> Result<()> {
        let delivery = Uuid::now_v7();
        tracing::info!(
            "[{}] Processing result {} for logbook user {}",
            delivery,
            hook.id,
            hook.user_id
        );

        let user = self
            .store
            .get_by_logbook_id(hook.user_id)
            .await
            .context("Hook for an unregistered user")?;

        let tokens = self
            .logbook
            .token_from_refresh(
                &user.refresh_token,
                &self.credentials.client_id,
                &self.credentials.client_secret,
            )
            .await?;
        self.store
            .update_tokens(user.logbook_id, &tokens.access_token, &tokens.refresh_token)
            .await?;
        tracing::debug!("[{}] Tokens refreshed for {}", delivery, user.logbook_username);

        let result = self
            .logbook
            .result_by_id(&tokens.access_token, hook.id)
            .await?;
        tracing::debug!(
            "[{}] Fetched result {}: {} m in {} tenths",
            delivery,
            result.id,
            result.distance,
            result.time
        );

        let report = self.report.clone();
        let png = tokio::task::spawn_blocking(move || report.render(&result))
            .await
            .context("Render task failed")?
            .context("Failed to render workout report")?;

        self.discord
            .send_image(
                &activity_message(&user.logbook_username),
                user.profile_image_url.as_deref(),
                REPORT_FILE_NAME,
                png,
            )
            .await?;

        tracing::info!("[{}] Finished result {}", delivery, hook.id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{
        spawn_mock_discord, spawn_mock_logbook, test_report, MockServer, MOCK_ACCESS_TOKEN,
        MOCK_REFRESH_TOKEN, MOCK_USER_ID,
    };
    use axum::http::StatusCode;
    use tempfile::TempDir;

    const PNG_MAGIC: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

    struct Fixture {
        handler: WorkoutHandler,
        discord: MockServer<Vec<u8>>,
        _logbook: MockServer<String>,
        _dir: TempDir,
    }

    async fn fixture(discord_status: StatusCode) -> Fixture {
        let dir = TempDir::new().unwrap();
        let store = UserStore::load(dir.path().join("users.json")).await.unwrap();
        store
            .upsert_user(MOCK_USER_ID, "test_user", Some("https://example.com/avatar.jpg"), "stale", MOCK_REFRESH_TOKEN)
            .await
            .unwrap();

        let logbook = spawn_mock_logbook().await;
        let discord = spawn_mock_discord(discord_status).await;
        let handler = WorkoutHandler::new(
            LogbookClient::new(&logbook.url).unwrap(),
            LogbookCredentials {
                client_id: "id".to_string(),
                client_secret: "secret".to_string(),
            },
            Arc::new(store),
            DiscordWebhook::new(format!("{}/webhook", discord.url), None).unwrap(),
            test_report(),
        );

        Fixture {
            handler,
            discord,
            _logbook: logbook,
            _dir: dir,
        }
    }

    fn event(json: &str) -> HookEvent {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_disposition() {
        assert_eq!(
            HookDisposition::of(&event(r#"{"type":"result-updated","result":{"id":1,"user_id":2}}"#)),
            HookDisposition::Unsupported
        );
        assert_eq!(
            HookDisposition::of(&event(r#"{"type":"result-added"}"#)),
            HookDisposition::MissingResult
        );
        assert_eq!(
            HookDisposition::of(&event(r#"{"type":"result-added","result":{"id":1,"user_id":2}}"#)),
            HookDisposition::Process(HookResultRef { id: 1, user_id: 2 })
        );
    }

    #[tokio::test]
    async fn test_process_hook_posts_report() {
        let f = fixture(StatusCode::NO_CONTENT).await;
        f.handler
            .process_hook(HookResultRef { id: 1, user_id: MOCK_USER_ID })
            .await
            .unwrap();

        let user = f.handler.store().get_by_logbook_id(MOCK_USER_ID).await.unwrap();
        assert_eq!(user.access_token, MOCK_ACCESS_TOKEN);

        let bodies = f.discord.recorded();
        assert_eq!(bodies.len(), 1);
        let body = &bodies[0];
        assert!(body.windows(PNG_MAGIC.len()).any(|w| w == PNG_MAGIC));
        let text = String::from_utf8_lossy(body);
        assert!(text.contains("**test_user** completed a rowing activity!"));
        assert!(text.contains("https://example.com/avatar.jpg"));
    }

    #[tokio::test]
    async fn test_interval_result_posts_report() {
        let f = fixture(StatusCode::OK).await;
        f.handler
            .process_hook(HookResultRef { id: 2, user_id: MOCK_USER_ID })
            .await
            .unwrap();
        assert_eq!(f.discord.recorded().len(), 1);
    }

    #[tokio::test]
    async fn test_unknown_user_stops_before_discord() {
        let f = fixture(StatusCode::NO_CONTENT).await;
        let err = f
            .handler
            .process_hook(HookResultRef { id: 1, user_id: 99 })
            .await
            .unwrap_err();
        assert!(format!("{:#}", err).contains("unregistered user"));
        assert!(f.discord.recorded().is_empty());
    }

    #[tokio::test]
    async fn test_missing_result_stops_before_discord() {
        let f = fixture(StatusCode::NO_CONTENT).await;
        let err = f
            .handler
            .process_hook(HookResultRef { id: 404, user_id: MOCK_USER_ID })
            .await
            .unwrap_err();
        assert!(format!("{:#}", err).contains("result 404"));
        assert!(f.discord.recorded().is_empty());

        // the refresh already happened, so the new pair is kept
        let user = f.handler.store().get_by_logbook_id(MOCK_USER_ID).await.unwrap();
        assert_eq!(user.access_token, MOCK_ACCESS_TOKEN);
    }

    #[tokio::test]
    async fn test_discord_failure_is_reported() {
        let f = fixture(StatusCode::BAD_REQUEST).await;
        let err = f
            .handler
            .process_hook(HookResultRef { id: 1, user_id: MOCK_USER_ID })
            .await
            .unwrap_err();
        assert!(format!("{:#}", err).contains("Discord rejected the webhook"));
    }
}
