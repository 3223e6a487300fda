use crate::error::{PlantError, Result};
use crate::paths;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// ConfigWarning / WarnLevel
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigWarning {
    pub level: WarnLevel,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarnLevel {
    Warning,
    Error,
}

impl std::fmt::Display for WarnLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WarnLevel::Warning => f.write_str("warning"),
            WarnLevel::Error => f.write_str("error"),
        }
    }
}

// ---------------------------------------------------------------------------
// SlackConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlackConfig {
    /// Channel that receives task notifications and the scoreboard.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bot_token: Option<String>,
    #[serde(default = "default_api_base")]
    pub api_base: String,
}

fn default_api_base() -> String {
    slack_client::DEFAULT_API_BASE.to_string()
}

impl Default for SlackConfig {
    fn default() -> Self {
        Self {
            channel_id: None,
            bot_token: None,
            api_base: default_api_base(),
        }
    }
}

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_db_path")]
    pub db_path: PathBuf,
    #[serde(default)]
    pub slack: SlackConfig,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_retry_attempts")]
    pub retry_attempts: u32,
}

fn default_db_path() -> PathBuf {
    PathBuf::from(paths::DEFAULT_DB_FILE)
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_retry_attempts() -> u32 {
    3
}

impl Default for Config {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
            slack: SlackConfig::default(),
            request_timeout_secs: default_request_timeout_secs(),
            retry_attempts: default_retry_attempts(),
        }
    }
}

impl Config {
    /// Read `<root>/.plantcare/config.yaml`, or defaults when it is absent.
    pub fn load(root: &Path) -> Result<Self> {
        let path = paths::config_path(root);
        if !path.exists() {
            return Ok(Self::default());
        }
        let data = std::fs::read_to_string(&path)?;
        let cfg: Config = serde_yaml::from_str(&data)?;
        Ok(cfg)
    }

    /// File config with environment overrides applied.
    pub fn load_effective(root: &Path) -> Result<Self> {
        let mut cfg = Self::load(root)?;
        cfg.apply_env_from(|key| std::env::var(key).ok())?;
        Ok(cfg)
    }

    pub fn save(&self, root: &Path) -> Result<()> {
        let path = paths::config_path(root);
        let data = serde_yaml::to_string(self)?;
        crate::io::atomic_write(&path, data.as_bytes())
    }

    /// Apply `PLANTCARE_*` / `SLACK_*` overrides read through `lookup`.
    pub fn apply_env_from(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(db) = lookup("PLANTCARE_DB") {
            self.db_path = PathBuf::from(db);
        }
        if let Some(channel) = lookup("SLACK_CHANNEL_ID") {
            self.slack.channel_id = Some(channel);
        }
        if let Some(token) = lookup("SLACK_BOT_TOKEN") {
            self.slack.bot_token = Some(token);
        }
        if let Some(base) = lookup("SLACK_API_BASE") {
            self.slack.api_base = base;
        }
        if let Some(secs) = lookup("PLANTCARE_REQUEST_TIMEOUT_SECS") {
            self.request_timeout_secs = parse_env("PLANTCARE_REQUEST_TIMEOUT_SECS", &secs)?;
        }
        if let Some(attempts) = lookup("PLANTCARE_RETRY_ATTEMPTS") {
            self.retry_attempts = parse_env("PLANTCARE_RETRY_ATTEMPTS", &attempts)?;
        }
        Ok(())
    }

    /// Absolute path of the store for a workspace rooted at `root`.
    pub fn db_path_in(&self, root: &Path) -> PathBuf {
        paths::db_path(root, &self.db_path)
    }

    /// Copy safe to print: the bot token is masked.
    pub fn redacted(&self) -> Self {
        let mut copy = self.clone();
        if copy.slack.bot_token.is_some() {
            copy.slack.bot_token = Some("********".to_string());
        }
        copy
    }

    // -----------------------------------------------------------------------
    // Validation
    // -----------------------------------------------------------------------

    pub fn validate(&self) -> Vec<ConfigWarning> {
        let mut warnings = Vec::new();

        if self.slack.bot_token.as_deref().map_or(true, str::is_empty) {
            warnings.push(ConfigWarning {
                level: WarnLevel::Warning,
                message: "slack.bot_token is not set; notifications are disabled".to_string(),
            });
        }
        if self.slack.channel_id.as_deref().map_or(true, str::is_empty) {
            warnings.push(ConfigWarning {
                level: WarnLevel::Warning,
                message: "slack.channel_id is not set; notifications are disabled".to_string(),
            });
        }
        if self.request_timeout_secs == 0 {
            warnings.push(ConfigWarning {
                level: WarnLevel::Error,
                message: "request_timeout_secs must be greater than zero".to_string(),
            });
        }
        if self.retry_attempts == 0 {
            warnings.push(ConfigWarning {
                level: WarnLevel::Error,
                message: "retry_attempts must be at least 1".to_string(),
            });
        }

        warnings
    }
}

fn parse_env<T: std::str::FromStr>(key: &str, value: &str) -> Result<T>
where
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse()
        .map_err(|e: T::Err| PlantError::InvalidConfig(format!("{key}={value:?}: {e}")))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
