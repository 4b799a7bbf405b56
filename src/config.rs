use crate::store::KeyColumn;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Configuration for the health-assistant core
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// User table configuration
    pub store: StoreConfig,
    /// Emergency alert configuration
    pub alerting: AlertingConfig,
    /// AI assistant configuration
    pub assistant: AssistantConfig,
    /// Dispatch report output configuration
    pub report: ReportConfig,
}

/// User table configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Path to the user table file
    pub users_file: PathBuf,
    /// When set, login lookups and signup duplicate checks both key on
    /// this column. When unset, login keys on `user_id` and signup
    /// duplicate checks on `user_name`.
    pub primary_key: Option<KeyColumn>,
}

/// Emergency alert configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlertingConfig {
    /// Messaging platform bot token (env: TELEGRAM_BOT_TOKEN)
    pub bot_token: Option<String>,
    /// Comma-separated recipient chat ids (env: EMERGENCY_CONTACTS)
    pub recipients: String,
    /// Per-recipient delivery timeout in seconds
    pub delivery_timeout_seconds: u64,
}

/// AI assistant configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssistantConfig {
    /// Generative API key (env: GEMINI_API_KEY)
    pub api_key: Option<String>,
    /// Model name
    pub model: String,
}

/// Dispatch report output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Report format: "json", "jsonl", or "console"
    pub format: String,
    /// Report file path (if format is not "console")
    pub file_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            store: StoreConfig {
                users_file: PathBuf::from("users.csv"),
                primary_key: None,
            },
            alerting: AlertingConfig {
                bot_token: None,
                recipients: String::new(),
                delivery_timeout_seconds: 10,
            },
            assistant: AssistantConfig {
                api_key: None,
                model: "gemini-pro".to_string(),
            },
            report: ReportConfig {
                format: "console".to_string(),
                file_path: None,
            },
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn from_file(path: &PathBuf) -> Result<Self, Box<dyn std::error::Error>> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Save configuration to a file
    pub fn to_file(&self, path: &PathBuf) -> Result<(), Box<dyn std::error::Error>> {
        let contents = toml::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Fill secrets and the recipient list from the environment.
    ///
    /// Environment values win over file values; blank variables are
    /// ignored.
    pub fn apply_env(&mut self) {
        if let Ok(token) = std::env::var("TELEGRAM_BOT_TOKEN") {
            if !token.trim().is_empty() {
                self.alerting.bot_token = Some(token);
            }
        }
        if let Ok(list) = std::env::var("EMERGENCY_CONTACTS") {
            if !list.trim().is_empty() {
                self.alerting.recipients = list;
            }
        }
        if let Ok(key) = std::env::var("GEMINI_API_KEY") {
            if !key.trim().is_empty() {
                self.assistant.api_key = Some(key);
            }
        }
    }
}
