use std::sync::Arc;

use anyhow::{Context, Result};

use rowbot_backend::config;
use rowbot_backend::model::UserStore;
use rowbot_backend::module::discord::DiscordWebhook;
use rowbot_backend::module::handler::{LogbookCredentials, WorkoutHandler};
use rowbot_backend::module::logbook::LogbookClient;
use rowbot_backend::module::report::{ReportRenderer, ReportStyle, WorkoutReport};
use rowbot_backend::service::{self, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration
    let config = config::read_config(None)?;

    // Initialize logging
    let _logging_guard = rowbot_backend::logging::init_logging("logs", "rowbot", &config.log_level)?;

    tracing::info!("RowBot starting...");
    tracing::info!("Server will listen on {}", config.server_address());

    let store = UserStore::load(&config.store.path).await?;

    let style = ReportStyle::named(config.report.style_name()?);
    tracing::info!("Using report style '{}'", style.name);
    let fonts_dir = config.report.fonts_dir.clone();
    let load_system_fonts = config.report.load_system_fonts;
    // font discovery walks the disk
    let renderer = tokio::task::spawn_blocking(move || {
        ReportRenderer::with_fonts(fonts_dir.as_deref(), load_system_fonts)
    })
    .await
    .context("Font loading task failed")?
    .context("Failed to load fonts for the report renderer")?;

    let handler = WorkoutHandler::new(
        LogbookClient::new(&config.logbook.api_base_url)?,
        LogbookCredentials {
            client_id: config.logbook.client_id.clone(),
            client_secret: config.logbook.client_secret.clone(),
        },
        Arc::new(store),
        DiscordWebhook::new(&config.discord.webhook_url, config.discord.username.clone())?,
        WorkoutReport::new(style, renderer),
    );
    let state = AppState::new(handler, &config.logbook_redirect_uri())?;
    let app = service::router(state);

    let listener = tokio::net::TcpListener::bind(config.server_address())
        .await
        .with_context(|| format!("Failed to bind {}", config.server_address()))?;
    tracing::info!("HTTP server listening on {}", config.server_address());
    axum::serve(listener, app).await?;

    Ok(())
}
