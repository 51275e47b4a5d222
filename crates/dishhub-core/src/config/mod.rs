//! Application configuration schemas.
//!
//! All configuration structs are deserialized via the `config` crate from
//! TOML files layered with `DISHHUB_`-prefixed environment variables. Each
//! sub-module represents a logical configuration section.

pub mod logging;
pub mod platform;
pub mod session;
pub mod upload;

use serde::{Deserialize, Serialize};

pub use self::logging::LoggingConfig;
pub use self::platform::{PlatformConfig, PlatformProvider};
pub use self::session::{BackoffKind, RetryConfig, SessionConfig};
pub use self::upload::{FeedConfig, UploadConfig};

use crate::error::AppError;

/// Prefix of environment variables overriding file configuration.
const ENV_PREFIX: &str = "DISHHUB";

/// Separator between nested keys in environment variable names.
const ENV_SEPARATOR: &str = "__";

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Hosted platform settings.
    #[serde(default)]
    pub platform: PlatformConfig,
    /// Session manager settings.
    #[serde(default)]
    pub session: SessionConfig,
    /// Upload limits.
    #[serde(default)]
    pub upload: UploadConfig,
    /// Feed defaults.
    #[serde(default)]
    pub feed: FeedConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration.
    ///
    /// Merges the file at `path` (extension optional), an optional
    /// `config/{env}` overlay, and environment variables such as
    /// `DISHHUB_PLATFORM__PROJECT_ID`. Missing values are not an error here;
    /// call [`AppConfig::validate`] before use.
    pub fn load(path: &str, env: &str) -> Result<Self, AppError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name(path).required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .separator(ENV_SEPARATOR)
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))
    }

    /// Parse configuration from a TOML document only.
    pub fn from_toml(source: &str) -> Result<Self, AppError> {
        config::Config::builder()
            .add_source(config::File::from_str(source, config::FileFormat::Toml))
            .build()?
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))
    }

    /// Keys of required values that are empty, in declaration order.
    pub fn missing_keys(&self) -> Vec<&'static str> {
        let platform = &self.platform;
        [
            ("platform.endpoint", &platform.endpoint),
            ("platform.project_id", &platform.project_id),
            ("platform.database_id", &platform.database_id),
            ("platform.collection_id", &platform.collection_id),
            ("platform.bucket_id", &platform.bucket_id),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(key, _)| key)
        .collect()
    }

    /// Check every required value and report all missing ones at once.
    pub fn validate(&self) -> Result<(), AppError> {
        let missing = self.missing_keys();
        if missing.is_empty() {
            return Ok(());
        }

        let listed: Vec<String> = missing
            .iter()
            .map(|key| format!("{key} ({})", env_var_name(key)))
            .collect();
        Err(AppError::configuration(format!(
            "Missing required configuration values: {}",
            listed.join(", ")
        )))
    }
}

/// Environment variable that overrides a dotted configuration key.
pub fn env_var_name(key: &str) -> String {
    let nested = key.to_uppercase().replace('.', ENV_SEPARATOR);
    format!("{ENV_PREFIX}_{nested}")
}
