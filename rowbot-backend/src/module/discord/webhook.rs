use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::Serialize;

use crate::module::logbook::client::ensure_success;

pub const REPORT_FILE_NAME: &str = "row-results.png";
const REQUEST_TIMEOUT_SECONDS: u64 = 30;

/// Channel announcement for a finished workout
pub fn activity_message(username: &str) -> String {
    format!(
        ":person_rowing_boat: **{}** completed a rowing activity!",
        username
    )
}

#[derive(Debug, Serialize)]
struct Payload<'a> {
    content: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    username: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    avatar_url: Option<&'a str>,
    attachments: [Attachment<'a>; 1],
}

#[derive(Debug, Serialize)]
struct Attachment<'a> {
    id: u32,
    filename: &'a str,
}

/// An incoming webhook URL plus the display name to post under
#[derive(Debug, Clone)]
pub struct DiscordWebhook {
    url: String,
    username: Option<String>,
    http: Client,
}

impl DiscordWebhook {
    pub fn new(url: impl Into<String>, username: Option<String>) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECONDS))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            url: url.into(),
            username,
            http,
        })
    }

    /// Post `content` with one PNG attachment
    pub async fn send_image(
        &self,
        content: &str,
        avatar_url: Option<&str>,
        file_name: &str,
        png: Vec<u8>,
    ) -> Result<()> {
        let payload = Payload {
            content,
            username: self.username.as_deref(),
            avatar_url,
            attachments: [Attachment {
                id: 0,
                filename: file_name,
            }],
        };
        let payload_json =
            serde_json::to_string(&payload).context("Failed to serialize webhook payload")?;

        let size = png.len();
        let file = Part::bytes(png)
            .file_name(file_name.to_string())
            .mime_str("image/png")
            .context("Invalid attachment MIME type")?;
        let form = Form::new()
            .text("payload_json", payload_json)
            .part("files[0]", file);

        let response = self
            .http
            .post(&self.url)
            .multipart(form)
            .send()
            .await
            .context("Failed to send Discord webhook")?;
        ensure_success(response)
            .await
            .context("Discord rejected the webhook")?;

        tracing::info!("Posted {} ({} bytes) to Discord", file_name, size);
        Ok(())
    }
}
