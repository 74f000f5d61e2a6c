use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};
use teloxide::types::ChatId;

/// Environment variable consulted when the config file has no token.
pub const TOKEN_ENV_VAR: &str = "TELEGRAM_BOT_TOKEN";

/// Errors that can occur when loading configuration.
#[derive(Debug)]
pub enum ConfigError {
    /// Failed to read the config file.
    ReadFile { path: PathBuf, source: std::io::Error },
    /// Failed to parse JSON.
    ParseJson { path: PathBuf, source: serde_json::Error },
    /// Validation error.
    Validation(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ReadFile { path, source } => {
                write!(f, "failed to read config file '{}': {}", path.display(), source)
            }
            Self::ParseJson { path, source } => {
                write!(f, "failed to parse config file '{}': {}", path.display(), source)
            }
            Self::Validation(msg) => write!(f, "config validation error: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::ReadFile { source, .. } => Some(source),
            Self::ParseJson { source, .. } => Some(source),
            Self::Validation(_) => None,
        }
    }
}

#[derive(Deserialize)]
struct ConfigFile {
    /// May be left empty when TELEGRAM_BOT_TOKEN is set.
    #[serde(default)]
    telegram_bot_token: String,
    /// Directory for state files (database, logs). Defaults to current directory.
    data_dir: Option<String>,
    /// Glossary database file. Defaults to `<data_dir>/glossary.db`.
    database_path: Option<String>,
    /// JSON list of terms to seed an empty database with, instead of the built-in list.
    seed_path: Option<String>,
    log_chat_id: Option<i64>,
}

pub struct Config {
    pub telegram_bot_token: String,
    /// Directory for state files (database, logs).
    pub data_dir: PathBuf,
    pub database_path: PathBuf,
    pub seed_path: Option<PathBuf>,
    /// Chat that receives forwarded log lines.
    pub log_chat_id: Option<ChatId>,
}

impl Config {
    /// Load from a JSON file, falling back to `TELEGRAM_BOT_TOKEN` for the token.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        Self::load_with_env_token(path, std::env::var(TOKEN_ENV_VAR).ok())
    }

    fn load_with_env_token<P: AsRef<Path>>(
        path: P,
        env_token: Option<String>,
    ) -> Result<Self, ConfigError> {
        let config_path = path.as_ref().to_path_buf();
        let content = std::fs::read_to_string(&config_path)
            .map_err(|e| ConfigError::ReadFile { path: config_path.clone(), source: e })?;
        let file: ConfigFile = serde_json::from_str(&content)
            .map_err(|e| ConfigError::ParseJson { path: config_path.clone(), source: e })?;

        let telegram_bot_token = if file.telegram_bot_token.is_empty() {
            env_token.unwrap_or_default()
        } else {
            file.telegram_bot_token
        };
        if telegram_bot_token.is_empty() {
            return Err(ConfigError::Validation(format!(
                "telegram_bot_token is required (or set {TOKEN_ENV_VAR})"
            )));
        }
        // Telegram tokens are formatted as {bot_id}:{secret} where bot_id is numeric
        let token_parts: Vec<&str> = telegram_bot_token.split(':').collect();
        if token_parts.len() != 2 || token_parts[0].parse::<u64>().is_err() || token_parts[1].is_empty() {
            return Err(ConfigError::Validation(
                "telegram_bot_token appears invalid (expected format: 123456789:ABCdefGHI...)".into()
            ));
        }

        let data_dir = file
            .data_dir
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("."));
        let database_path = file
            .database_path
            .map(PathBuf::from)
            .unwrap_or_else(|| data_dir.join("glossary.db"));

        Ok(Self {
            telegram_bot_token,
            data_dir,
            database_path,
            seed_path: file.seed_path.map(PathBuf::from),
            log_chat_id: file.log_chat_id.map(ChatId),
        })
    }
}
