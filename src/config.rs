use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

use crate::error::{BotError, BotResult};

pub const PRACTICUM_TOKEN_VAR: &str = "PRACTICUM_TOKEN";
pub const TELEGRAM_TOKEN_VAR: &str = "TELEGRAM_TOKEN";
pub const TELEGRAM_CHAT_ID_VAR: &str = "TELEGRAM_CHAT_ID";

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub practicum: PracticumConfig,
    #[serde(default)]
    pub telegram: TelegramConfig,
    #[serde(default)]
    pub poller: PollerConfig,
}

#[derive(Deserialize, Clone)]
pub struct PracticumConfig {
    #[serde(default)]
    pub token: String,
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl Default for PracticumConfig {
    fn default() -> Self {
        Self {
            token: String::new(),
            endpoint: default_endpoint(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

#[derive(Deserialize, Clone, Default)]
pub struct TelegramConfig {
    #[serde(default)]
    pub bot_token: String,
    #[serde(default)]
    pub chat_id: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct PollerConfig {
    #[serde(default = "default_retry_period_secs")]
    pub retry_period_secs: u64,
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self {
            retry_period_secs: default_retry_period_secs(),
        }
    }
}

/// Stand-in for a secret in `Debug` output.
fn redacted(secret: &str) -> &'static str {
    if secret.is_empty() {
        "<unset>"
    } else {
        "<redacted>"
    }
}

impl std::fmt::Debug for PracticumConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PracticumConfig")
            .field("token", &redacted(&self.token))
            .field("endpoint", &self.endpoint)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .finish()
    }
}

impl std::fmt::Debug for TelegramConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelegramConfig")
            .field("bot_token", &redacted(&self.bot_token))
            .field("chat_id", &self.chat_id)
            .finish()
    }
}

/// The three secrets the bot cannot start without.
#[derive(Clone)]
pub struct Credentials {
    pub practicum_token: String,
    pub telegram_token: String,
    pub chat_id: String,
}

// Tokens must never reach the logs.
impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("practicum_token", &redacted(&self.practicum_token))
            .field("telegram_token", &redacted(&self.telegram_token))
            .field("chat_id", &self.chat_id)
            .finish()
    }
}

fn default_endpoint() -> String {
    "https://practicum.yandex.ru/api/user_api/homework_statuses/".to_string()
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_retry_period_secs() -> u64 {
    600
}

impl Config {
    /// Load settings from `path`. A missing file yields the defaults, since
    /// every secret can also come from the environment.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Overlay secrets from the environment. Non-empty variables win over
    /// whatever the file said.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        if let Some(token) = non_empty(PRACTICUM_TOKEN_VAR) {
            self.practicum.token = token;
        }
        if let Some(token) = non_empty(TELEGRAM_TOKEN_VAR) {
            self.telegram.bot_token = token;
        }
        if let Some(chat_id) = non_empty(TELEGRAM_CHAT_ID_VAR) {
            self.telegram.chat_id = chat_id;
        }
    }

    /// All three secrets, or `ConfigurationMissing` naming the absent ones.
    pub fn credentials(&self) -> BotResult<Credentials> {
        let mut missing = Vec::new();
        if self.practicum.token.trim().is_empty() {
            missing.push(PRACTICUM_TOKEN_VAR);
        }
        if self.telegram.bot_token.trim().is_empty() {
            missing.push(TELEGRAM_TOKEN_VAR);
        }
        if self.telegram.chat_id.trim().is_empty() {
            missing.push(TELEGRAM_CHAT_ID_VAR);
        }

        if !missing.is_empty() {
            return Err(BotError::ConfigurationMissing(missing));
        }

        Ok(Credentials {
            practicum_token: self.practicum.token.trim().to_string(),
            telegram_token: self.telegram.bot_token.trim().to_string(),
            chat_id: self.telegram.chat_id.trim().to_string(),
        })
    }

    pub fn retry_period(&self) -> Duration {
        Duration::from_secs(self.poller.retry_period_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.practicum.request_timeout_secs)
    }
}
