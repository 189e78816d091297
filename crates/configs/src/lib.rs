//! # configs
//!
//! Runtime settings, built once at startup and handed to whatever needs them.
//!
//! Sources, lowest precedence first:
//! 1. built-in defaults
//! 2. a `.env` file in the working directory (if present)
//! 3. process environment, `COMPANION_` prefix, `__` between sections
//!    (e.g. `COMPANION_TWITCH__WEBHOOK_SECRET`, `COMPANION_SERVER__PORT`)

use std::path::PathBuf;
use std::time::Duration;

use config::{Config, Environment, Map};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use thiserror::Error;

pub const ENV_PREFIX: &str = "COMPANION";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error(transparent)]
    Load(#[from] config::ConfigError),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub storage: StorageSettings,
    pub twitch: TwitchSettings,
    #[serde(default)]
    pub discord: DiscordSettings,
    pub log: LogSettings,
    /// The `.env` file that was read, if any. Logged by the caller once
    /// tracing is up.
    #[serde(skip)]
    pub env_file: Option<PathBuf>,
}

#[derive(Debug, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Memory,
    Redis,
}

#[derive(Debug, Deserialize)]
pub struct StorageSettings {
    pub backend: StorageBackend,
    #[serde(default)]
    pub redis_url: Option<SecretString>,
    /// Key of the list holding every idea.
    pub ideas_key: String,
    pub timeout_ms: u64,
}

#[derive(Debug, Deserialize)]
pub struct TwitchSettings {
    /// Shared secret registered with the EventSub subscription.
    pub webhook_secret: SecretString,
}

#[derive(Debug, Default, Deserialize)]
pub struct DiscordSettings {
    #[serde(default)]
    pub webhook_url: Option<SecretString>,
    #[serde(default = "default_discord_timeout_ms")]
    pub timeout_ms: u64,
}

#[derive(Debug, Deserialize)]
pub struct LogSettings {
    pub json: bool,
    pub filter: String,
}

fn default_discord_timeout_ms() -> u64 {
    5_000
}

impl ServerSettings {
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl StorageSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl DiscordSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl Settings {
    /// Reads `.env` (if any) and the process environment.
    pub fn load() -> Result<Self, ConfigError> {
        let env_file = dotenvy::dotenv().ok();
        let mut settings = Self::build(environment())?;
        settings.env_file = env_file;
        Ok(settings)
    }

    /// Builds settings from an explicit variable map instead of the process
    /// environment. Keys use the same `COMPANION_...` names.
    pub fn from_vars(vars: Map<String, String>) -> Result<Self, ConfigError> {
        Self::build(environment().source(Some(vars)))
    }

    fn build(env: Environment) -> Result<Self, ConfigError> {
        let settings: Settings = Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 3000)?
            .set_default("storage.backend", "memory")?
            .set_default("storage.ideas_key", "ideas")?
            .set_default("storage.timeout_ms", 3_000)?
            .set_default("log.json", false)?
            .set_default("log.filter", "info")?
            .add_source(env)
            .build()?
            .try_deserialize()?;

        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.twitch.webhook_secret.expose_secret().trim().is_empty() {
            return Err(ConfigError::Invalid("twitch.webhook_secret must not be empty".into()));
        }
        if self.storage.backend == StorageBackend::Redis && self.storage.redis_url.is_none() {
            return Err(ConfigError::Invalid(
                "storage.redis_url is required when storage.backend = redis".into(),
            ));
        }
        if self.storage.ideas_key.is_empty() {
            return Err(ConfigError::Invalid("storage.ideas_key must not be empty".into()));
        }
        Ok(())
    }
}

fn environment() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
}
