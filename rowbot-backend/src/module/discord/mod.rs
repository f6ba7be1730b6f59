//! Posting finished workouts to a Discord channel webhook

pub mod webhook;

pub use webhook::{activity_message, DiscordWebhook, REPORT_FILE_NAME};
