use std::path::PathBuf;

use anyhow::{Context, Result};
use chatpane_core::{ChatError, ChatpaneConfig};
use clap::Parser;

#[derive(Parser, Debug, Default)]
#[command(name = "chatpane")]
#[command(author, version, about = "Terminal chat UI bound to a conversation provider")]
pub struct Cli {
    /// Config file to load instead of the default search paths
    #[arg(short, long, env = "CHATPANE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Theme to start with
    #[arg(long)]
    pub theme: Option<String>,

    /// Display name the demo agent signs its replies with ("" for none)
    #[arg(long)]
    pub agent_name: Option<String>,

    /// Delay before the demo agent replies, in milliseconds
    #[arg(long)]
    pub reply_delay_ms: Option<u64>,

    /// Start without the agent's greeting
    #[arg(long)]
    pub no_greeting: bool,
}

impl Cli {
    pub fn load_config(&self) -> Result<ChatpaneConfig> {
        let mut config = match &self.config {
            Some(path) => ChatpaneConfig::load_from_file(path.clone())
                .with_context(|| format!("Failed to load config from {:?}", path))?,
            None => ChatpaneConfig::load().context("Failed to load configuration")?,
        };

        self.apply(&mut config);
        config
            .validate()
            .map_err(ChatError::from)
            .context("Invalid configuration")?;
        Ok(config)
    }

    pub fn apply(&self, config: &mut ChatpaneConfig) {
        if let Some(theme) = &self.theme {
            config.tui.theme = theme.clone();
        }

        if let Some(name) = &self.agent_name {
            let name = name.trim();
            config.agent.display_name = (!name.is_empty()).then(|| name.to_string());
        }

        if let Some(delay) = self.reply_delay_ms {
            config.agent.reply_delay_ms = delay;
        }

        if self.no_greeting {
            config.agent.greeting = None;
        }
    }
}
