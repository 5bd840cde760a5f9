use std::path::PathBuf;

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use tracing::warn;
use uuid::Uuid;

/// Placeholder admin password used when none is configured.
pub const DEFAULT_ADMIN_PASSWORD: &str = "admin123";

#[derive(Debug, Deserialize, Clone)]
pub struct CorsConfig {
    pub allow_origins: Vec<String>,
    pub max_age: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub cors: CorsConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AdminConfig {
    /// Shared secret for the admin flow.
    pub password: String,
}

impl AdminConfig {
    pub fn uses_default_password(&self) -> bool {
        self.password == DEFAULT_ADMIN_PASSWORD
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    /// HMAC key for admin session tokens. Generated per process when empty.
    #[serde(default)]
    pub jwt_secret: String,
    /// Lifetime of an admin session token, in hours.
    #[serde(default = "default_token_ttl_hours")]
    pub token_ttl_hours: i64,
}

fn default_token_ttl_hours() -> i64 {
    12
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: String::new(),
            token_ttl_hours: default_token_ttl_hours(),
        }
    }
}

/// 244 random bits from two v4 UUIDs, hex encoded.
fn random_secret() -> String {
    format!("{}{}", Uuid::new_v4().simple(), Uuid::new_v4().simple())
}

#[derive(Debug, Deserialize, Clone)]
pub struct AdsConfig {
    /// How long a simulated ad plays before it can be completed.
    #[serde(default = "default_countdown_secs")]
    pub countdown_secs: u64,
    /// How long a finished playback may wait for completion before it is dropped.
    #[serde(default = "default_playback_ttl_secs")]
    pub playback_ttl_secs: u64,
    #[serde(default = "default_sweep_interval_secs")]
    pub sweep_interval_secs: u64,
    /// Insert a default platform on startup when none exist.
    #[serde(default)]
    pub seed_default_platform: bool,
}

fn default_countdown_secs() -> u64 {
    5
}
fn default_playback_ttl_secs() -> u64 {
    600
}
fn default_sweep_interval_secs() -> u64 {
    60
}

impl Default for AdsConfig {
    fn default() -> Self {
        Self {
            countdown_secs: default_countdown_secs(),
            playback_ttl_secs: default_playback_ttl_secs(),
            sweep_interval_secs: default_sweep_interval_secs(),
            seed_default_platform: false,
        }
    }
}

/// Which ad views count toward an open caption gate.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum CreditMode {
    /// Ads watched since the last gated caption; spent when that gate is passed.
    #[default]
    PerCycle,
    /// Every ad the user ever watched.
    Cumulative,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct GatingConfig {
    #[serde(default)]
    pub credit_mode: CreditMode,
}

#[derive(Debug, Deserialize, Clone)]
pub struct CaptionConfig {
    /// Image-to-text inference endpoint.
    pub endpoint: String,
    pub api_token: Option<String>,
    #[serde(default = "default_caption_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,
}

fn default_caption_timeout_secs() -> u64 {
    60
}
fn default_max_upload_bytes() -> usize {
    10 * 1024 * 1024
}

#[derive(Debug, Deserialize, Clone)]
pub struct StorageConfig {
    /// Directory for the business settings file, exports and backups.
    pub data_dir: PathBuf,
}

impl StorageConfig {
    pub fn settings_path(&self) -> PathBuf {
        self.data_dir.join("business_config.json")
    }

    pub fn exports_dir(&self) -> PathBuf {
        self.data_dir.join("exports")
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub admin: AdminConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub ads: AdsConfig,
    #[serde(default)]
    pub gating: GatingConfig,
    pub caption: CaptionConfig,
    pub storage: StorageConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        let s = Config::builder()
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 8501)?
            .set_default("server.cors.allow_origins", Vec::<String>::new())?
            .set_default("server.cors.max_age", 3600)?
            .set_default("database.url", "sqlite://instacaption.db?mode=rwc")?
            .set_default("admin.password", DEFAULT_ADMIN_PASSWORD)?
            .set_default(
                "caption.endpoint",
                "https://api-inference.huggingface.co/models/Salesforce/blip-image-captioning-base",
            )?
            .set_default("storage.data_dir", "./data")?
            // Load from config/config.toml
            .add_source(File::with_name("config/config").required(false))
            // Override from environment (e.g., INSTACAPTION__ADMIN__PASSWORD)
            .add_source(Environment::with_prefix("INSTACAPTION").separator("__"))
            .set_override_option("admin.password", std::env::var("ADMIN_PASSWORD").ok())?
            .build()?;

        let mut config: AppConfig = s.try_deserialize()?;
        if config.auth.jwt_secret.trim().is_empty() {
            warn!("No auth.jwt_secret configured; admin sessions will not survive a restart");
            config.auth.jwt_secret = random_secret();
        }
        Ok(config)
    }
}
