//! Application configuration structs
//!
//! Loads configuration from environment variables (with a `.env` file if
//! present). Only the platform secrets are required; everything else has a
//! deployment-friendly default.

use serde::Deserialize;
use std::env;

use warden_core::TierThresholds;

/// Main application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub app: AppSettings,
    pub platform: PlatformConfig,
    pub store: StoreConfig,
    pub moderation: ModerationConfig,
    pub sweep: SweepConfig,
}

/// General application settings
#[derive(Debug, Clone, Deserialize)]
pub struct AppSettings {
    #[serde(default = "default_app_name")]
    pub name: String,
    #[serde(default = "default_env")]
    pub env: Environment,
}

/// Environment type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Production,
}

impl Environment {
    #[must_use]
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

/// Chat platform credentials, treated as opaque secrets
#[derive(Debug, Clone, Deserialize)]
pub struct PlatformConfig {
    pub bot_token: String,
    pub application_id: String,
}

/// Document store configuration
#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    #[serde(default = "default_data_path")]
    pub data_path: String,
}

/// Names of the moderation resources provisioned per community
///
/// The channel name is raw; it is slugified before any platform call.
#[derive(Debug, Clone, Deserialize)]
pub struct ModerationConfig {
    #[serde(default = "default_role_name")]
    pub role_name: String,
    #[serde(default = "default_category_name")]
    pub category_name: String,
    #[serde(default = "default_channel_name")]
    pub channel_name: String,
}

impl Default for ModerationConfig {
    fn default() -> Self {
        Self {
            role_name: default_role_name(),
            category_name: default_category_name(),
            channel_name: default_channel_name(),
        }
    }
}

/// Inactivity sweep configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SweepConfig {
    #[serde(default)]
    pub thresholds: TierThresholds,
    #[serde(default = "default_period_hours")]
    pub period_hours: u64,
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
    /// Actually kick `Removable` members instead of only posting the notice
    #[serde(default)]
    pub actually_remove: bool,
    /// Re-send a tier's warning on every sweep while the member stays in it
    #[serde(default = "default_repeat_warnings")]
    pub repeat_warnings: bool,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            thresholds: TierThresholds::default(),
            period_hours: default_period_hours(),
            concurrency: default_concurrency(),
            actually_remove: false,
            repeat_warnings: default_repeat_warnings(),
        }
    }
}

// Default value functions
fn default_app_name() -> String {
    "afk-warden".to_string()
}

fn default_env() -> Environment {
    Environment::Development
}

fn default_data_path() -> String {
    "./warden-data.json".to_string()
}

fn default_role_name() -> String {
    "AFK".to_string()
}

fn default_category_name() -> String {
    "Warden".to_string()
}

fn default_channel_name() -> String {
    "Warden Log".to_string()
}

fn default_period_hours() -> u64 {
    24
}

fn default_concurrency() -> usize {
    4
}

fn default_repeat_warnings() -> bool {
    true
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    /// Returns an error if required environment variables are missing or
    /// if the tier thresholds do not form an ascending sequence.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let thresholds = TierThresholds {
            warn_after: parse_var("WARN_AFTER_DAYS", 30)?,
            final_warn_after: parse_var("FINAL_WARN_AFTER_DAYS", 37)?,
            last_chance_after: parse_var("LAST_CHANCE_AFTER_DAYS", 44)?,
            remove_after: parse_var("REMOVE_AFTER_DAYS", 50)?,
        };
        thresholds
            .validate()
            .map_err(|e| ConfigError::InvalidValue("WARN_AFTER_DAYS..", e.to_string()))?;

        Ok(Self {
            app: AppSettings {
                name: env::var("APP_NAME").unwrap_or_else(|_| default_app_name()),
                env: env::var("APP_ENV")
                    .ok()
                    .and_then(|s| match s.to_lowercase().as_str() {
                        "production" => Some(Environment::Production),
                        "development" => Some(Environment::Development),
                        _ => None,
                    })
                    .unwrap_or_default(),
            },
            platform: PlatformConfig {
                bot_token: env::var("BOT_TOKEN").map_err(|_| ConfigError::MissingVar("BOT_TOKEN"))?,
                application_id: env::var("APPLICATION_ID")
                    .map_err(|_| ConfigError::MissingVar("APPLICATION_ID"))?,
            },
            store: StoreConfig {
                data_path: env::var("DATA_PATH").unwrap_or_else(|_| default_data_path()),
            },
            moderation: ModerationConfig {
                role_name: env::var("MODERATION_ROLE").unwrap_or_else(|_| default_role_name()),
                category_name: env::var("MODERATION_CATEGORY")
                    .unwrap_or_else(|_| default_category_name()),
                channel_name: env::var("MODERATION_CHANNEL")
                    .unwrap_or_else(|_| default_channel_name()),
            },
            sweep: SweepConfig {
                thresholds,
                period_hours: parse_var("SWEEP_PERIOD_HOURS", default_period_hours())?,
                concurrency: parse_var("SWEEP_CONCURRENCY", default_concurrency())?,
                actually_remove: parse_var("ACTUALLY_REMOVE", false)?,
                repeat_warnings: parse_var("REPEAT_WARNINGS", default_repeat_warnings())?,
            },
        })
    }
}

/// Parse an optional environment variable, rejecting malformed values
///
/// An unset variable yields the default; a set-but-unparseable one is a
/// configuration error rather than a silent fallback.
fn parse_var<T: std::str::FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(raw) => raw
            .parse()
            .map_err(|_| ConfigError::InvalidValue(name, raw)),
        Err(_) => Ok(default),
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(&'static str),

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(&'static str, String),
}
