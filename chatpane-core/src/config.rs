use config::{Config as ConfigBuilder, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

use crate::error::ChatResult;
use crate::models::{Message, RawMessage};

#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Missing required configuration: {0}")]
    MissingRequired(String),

    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ChatpaneConfig {
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub agent: AgentConfig,
    #[serde(default)]
    pub conversation: ConversationConfig,
    #[serde(default)]
    pub tui: TuiConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log file; an empty string turns file logging off.
    #[serde(default = "default_log_file")]
    pub file_path: String,
}

/// The scripted business agent that answers in the demo.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentConfig {
    #[serde(default = "default_agent_name")]
    pub display_name: Option<String>,

    #[serde(default = "default_reply_delay")]
    pub reply_delay_ms: u64,

    #[serde(default = "default_greeting")]
    pub greeting: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ConversationConfig {
    /// History the conversation starts with. Entries may omit any field.
    #[serde(default)]
    pub history: Vec<RawMessage>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TuiConfig {
    #[serde(default = "default_tick_rate")]
    pub tick_rate_ms: u64,

    #[serde(default = "default_theme")]
    pub theme: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_file() -> String {
    get_cache_dir()
        .map(|dir| dir.join("chatpane.log").to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn default_agent_name() -> Option<String> {
    Some("Ava".to_string())
}

fn default_reply_delay() -> u64 {
    600
}

fn default_greeting() -> Option<String> {
    Some("Hi there! How can we help today?".to_string())
}

fn default_tick_rate() -> u64 {
    100
}

fn default_theme() -> String {
    "Tokyo Night".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file_path: default_log_file(),
        }
    }
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            display_name: default_agent_name(),
            reply_delay_ms: default_reply_delay(),
            greeting: default_greeting(),
        }
    }
}

impl Default for TuiConfig {
    fn default() -> Self {
        Self {
            tick_rate_ms: default_tick_rate(),
            theme: default_theme(),
        }
    }
}

impl ChatpaneConfig {
    pub fn load() -> ChatResult<Self> {
        Ok(Self::load_from_paths(get_config_paths())?)
    }

    /// Loads from an explicit file, which must exist, on top of the defaults.
    pub fn load_from_file(path: PathBuf) -> ChatResult<Self> {
        if !path.exists() {
            return Err(ConfigLoadError::MissingRequired(format!(
                "config file {}",
                path.display()
            ))
            .into());
        }
        Ok(Self::load_from_paths(vec![path])?)
    }

    pub fn load_from_paths(paths: Vec<PathBuf>) -> Result<Self, ConfigLoadError> {
        load_dotenv_files();

        let mut builder = ConfigBuilder::builder();

        for path in paths {
            if path.exists() {
                builder = builder.add_source(File::from(path).required(false));
            }
        }

        builder = builder.add_source(
            Environment::with_prefix("CHATPANE")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build()?;
        let mut chatpane_config: ChatpaneConfig = config.try_deserialize()?;

        if let Ok(level) = std::env::var("CHATPANE_LOG_LEVEL") {
            chatpane_config.logging.level = level;
        } else if let Ok(level) = std::env::var("RUST_LOG") {
            chatpane_config.logging.level = level;
        }

        chatpane_config.validate()?;

        Ok(chatpane_config)
    }

    pub fn validate(&self) -> Result<(), ConfigLoadError> {
        if self.tui.tick_rate_ms == 0 {
            return Err(ConfigLoadError::InvalidValue {
                key: "tui.tick_rate_ms".to_string(),
                message: "Must be greater than 0".to_string(),
            });
        }

        if self.tui.theme.trim().is_empty() {
            return Err(ConfigLoadError::MissingRequired("tui.theme".to_string()));
        }

        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        let level_lower = self.logging.level.to_lowercase();
        if !valid_levels.contains(&level_lower.as_str()) && !level_lower.contains('=') {
            return Err(ConfigLoadError::InvalidValue {
                key: "logging.level".to_string(),
                message: format!(
                    "Invalid log level '{}'. Must be one of: {:?}",
                    self.logging.level, valid_levels
                ),
            });
        }

        Ok(())
    }

    pub fn log_level(&self) -> &str {
        &self.logging.level
    }

    pub fn log_file(&self) -> Option<PathBuf> {
        let path = self.logging.file_path.trim();
        if path.is_empty() {
            None
        } else {
            Some(PathBuf::from(path))
        }
    }

    /// Opening history for the conversation, with the greeting appended.
    pub fn initial_history(&self) -> Vec<Message> {
        let mut history: Vec<Message> = self
            .conversation
            .history
            .iter()
            .cloned()
            .map(Message::from)
            .collect();

        if let Some(greeting) = self.agent.greeting.as_deref() {
            if !greeting.trim().is_empty() {
                history.push(Message::from_business(
                    greeting,
                    self.agent.display_name.clone(),
                ));
            }
        }

        history
    }
}

fn get_config_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        paths.push(cwd.join("config").join("default.toml"));
        paths.push(cwd.join("config").join("local.toml"));
        paths.push(cwd.join("chatpane.toml"));
    }

    if let Some(config_dir) = get_config_dir() {
        paths.push(config_dir.join("config.toml"));
    }

    if let Some(home) = dirs::home_dir() {
        paths.push(home.join(".chatpane").join("config.toml"));
    }

    paths
}

fn load_dotenv_files() {
    let mut paths = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        paths.push(cwd.join(".env"));
    }

    if let Some(config_dir) = get_config_dir() {
        paths.push(config_dir.join(".env"));
    }

    for path in paths {
        if path.exists() {
            let _ = dotenvy::from_path(&path);
        }
    }
}

pub fn get_config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("chatpane"))
}

pub fn get_cache_dir() -> Option<PathBuf> {
    dirs::cache_dir().map(|d| d.join("chatpane"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ChatError;
    use crate::models::Role;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = ChatpaneConfig::default();
        assert_eq!(config.log_level(), "info");
        assert_eq!(config.agent.display_name.as_deref(), Some("Ava"));
        assert_eq!(config.agent.reply_delay_ms, 600);
        assert_eq!(config.tui.tick_rate_ms, 100);
        assert_eq!(config.tui.theme, "Tokyo Night");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_tick_rate() {
        let mut config = ChatpaneConfig::default();
        config.tui.tick_rate_ms = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigLoadError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_validate_log_levels() {
        let mut config = ChatpaneConfig::default();
        config.logging.level = "chatpane=debug".to_string();
        assert!(config.validate().is_ok());

        config.logging.level = "loud".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_empty_log_file_disables_file_logging() {
        let mut config = ChatpaneConfig::default();
        config.logging.file_path = "  ".to_string();
        assert!(config.log_file().is_none());

        config.logging.file_path = "/tmp/chatpane.log".to_string();
        assert_eq!(config.log_file(), Some(PathBuf::from("/tmp/chatpane.log")));
    }

    #[test]
    fn test_load_from_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("chatpane.toml");
        fs::write(
            &path,
            r#"
[agent]
display_name = "Support"
reply_delay_ms = 10

[tui]
tick_rate_ms = 50

[[conversation.history]]
text = "hey"
role = "user"

[[conversation.history]]
role = "appMaker"
"#,
        )
        .unwrap();

        let config = ChatpaneConfig::load_from_file(path).unwrap();
        assert_eq!(config.agent.display_name.as_deref(), Some("Support"));
        assert_eq!(config.agent.reply_delay_ms, 10);
        assert_eq!(config.tui.tick_rate_ms, 50);
        assert_eq!(config.tui.theme, "Tokyo Night");
        assert_eq!(config.conversation.history.len(), 2);

        let history = config.initial_history();
        assert_eq!(history.len(), 3);
        assert_eq!(history[0].display_text(), "hey");
        assert_eq!(history[1].role(), Role::Business);
        assert_eq!(history[1].text(), "");
        assert_eq!(
            history[2].display_text(),
            "Support says: Hi there! How can we help today?"
        );
    }

    #[test]
    fn test_load_from_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("absent.toml");
        assert!(matches!(
            ChatpaneConfig::load_from_file(path),
            Err(ChatError::Config(ConfigLoadError::MissingRequired(_)))
        ));
    }

    #[test]
    fn test_invalid_file_reports_config_code() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("chatpane.toml");
        fs::write(&path, "[tui]\ntick_rate_ms = 0\n").unwrap();

        let err = ChatpaneConfig::load_from_file(path).unwrap_err();
        assert_eq!(err.code(), "E2001");
        assert!(!err.is_programming_error());
        assert!(err.to_string().starts_with("[E2001]"));
    }

    #[test]
    fn test_initial_history_without_greeting() {
        let mut config = ChatpaneConfig::default();
        config.agent.greeting = None;
        assert!(config.initial_history().is_empty());
    }
}
