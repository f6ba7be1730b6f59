use std::path::PathBuf;
use std::sync::OnceLock;

use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};

use crate::module::report::StyleName;

/// Environment variable overriding the config file location
pub const CONFIG_PATH_ENV: &str = "ROWBOT_CONFIG";
pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub server: ServerConfig,

    pub logbook: LogbookConfig,

    pub discord: DiscordConfig,

    #[serde(default)]
    pub store: StoreConfig,

    #[serde(default)]
    pub report: ReportConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Public base URL the OAuth redirect points back to
    #[serde(default = "default_external_url")]
    pub external_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogbookConfig {
    #[serde(default = "default_logbook_url")]
    pub api_base_url: String,
    pub client_id: String,
    pub client_secret: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscordConfig {
    pub webhook_url: String,

    /// Overrides the webhook's configured name when set
    #[serde(default)]
    pub username: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    #[serde(default = "default_store_path")]
    pub path: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    #[serde(default = "default_style")]
    pub style: String,

    #[serde(default)]
    pub fonts_dir: Option<PathBuf>,

    #[serde(default = "default_load_system_fonts")]
    pub load_system_fonts: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_external_url() -> String {
    "http://localhost:3000".to_string()
}

fn default_logbook_url() -> String {
    "https://log.concept2.com".to_string()
}

fn default_store_path() -> PathBuf {
    PathBuf::from("data/users.json")
}

fn default_style() -> String {
    StyleName::default().to_string()
}

fn default_load_system_fonts() -> bool {
    true
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            external_url: default_external_url(),
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: default_store_path(),
        }
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            style: default_style(),
            fonts_dir: None,
            load_system_fonts: default_load_system_fonts(),
        }
    }
}

impl ReportConfig {
    pub fn style_name(&self) -> anyhow::Result<StyleName> {
        self.style.parse::<StyleName>().map_err(anyhow::Error::msg)
    }
}

impl AppConfig {
    pub fn from_file(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file '{}'", path))?;
        Self::from_toml(&content).with_context(|| format!("Invalid config file '{}'", path))
    }

    pub fn from_toml(content: &str) -> anyhow::Result<Self> {
        let config: AppConfig = toml::from_str(content).context("Failed to parse config")?;
        config.validate()?;
        Ok(config)
    }

    /// Reject configs the service cannot run with
    pub fn validate(&self) -> anyhow::Result<()> {
        let required = [
            ("logbook.client_id", &self.logbook.client_id),
            ("logbook.client_secret", &self.logbook.client_secret),
            ("discord.webhook_url", &self.discord.webhook_url),
        ];
        for (key, value) in required {
            if value.trim().is_empty() {
                bail!("Missing required config value '{}'", key);
            }
        }
        self.report.style_name()?;
        Ok(())
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    pub fn logbook_redirect_uri(&self) -> String {
        format!("{}/callback", self.server.external_url.trim_end_matches('/'))
    }
}

pub static CONFIG: OnceLock<AppConfig> = OnceLock::new();

/// Load the config once per process. `ROWBOT_CONFIG` overrides `path`.
pub fn read_config(path: Option<&str>) -> anyhow::Result<&'static AppConfig> {
    if let Some(config) = CONFIG.get() {
        return Ok(config);
    }

    let path = std::env::var(CONFIG_PATH_ENV)
        .ok()
        .or_else(|| path.map(str::to_string))
        .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());
    let config = AppConfig::from_file(&path)?;

    Ok(CONFIG.get_or_init(|| config))
}
