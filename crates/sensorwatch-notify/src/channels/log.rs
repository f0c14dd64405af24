use crate::error::{NotifyError, Result as NotifyResult};
use crate::plugin::ChannelPlugin;
use crate::ChannelSender;
use anyhow::Result;
use serde::Deserialize;
use serde_json::Value;
use tracing;

/// Writes every message to the `tracing` log instead of a transport.
pub struct LogChannel {
    name: String,
    prefix: Option<String>,
}

impl LogChannel {
    pub fn new(name: &str, prefix: Option<String>) -> Self {
        Self {
            name: name.to_string(),
            prefix,
        }
    }
}

impl ChannelSender for LogChannel {
    fn send(&self, message: &str) -> Result<()> {
        match &self.prefix {
            Some(prefix) => tracing::info!(channel = %self.name, "{prefix} {message}"),
            None => tracing::info!(channel = %self.name, "{message}"),
        }
        Ok(())
    }

    fn channel_name(&self) -> &str {
        &self.name
    }
}

// Plugin

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct LogConfig {
    #[serde(default)]
    prefix: Option<String>,
}

pub struct LogPlugin;

impl LogPlugin {
    fn parse(config: &Value) -> NotifyResult<LogConfig> {
        // An absent config section is the same as an empty one.
        if config.is_null() {
            return Ok(LogConfig { prefix: None });
        }
        serde_json::from_value(config.clone())
            .map_err(|e| NotifyError::InvalidConfig(format!("Invalid log config: {e}")))
    }
}

impl ChannelPlugin for LogPlugin {
    fn name(&self) -> &str {
        "log"
    }

    fn validate_config(&self, config: &Value) -> NotifyResult<()> {
        Self::parse(config).map(|_| ())
    }

    fn create_channel(&self, instance_name: &str, config: &Value) -> NotifyResult<Box<dyn ChannelSender>> {
        let cfg = Self::parse(config)?;
        Ok(Box::new(LogChannel::new(instance_name, cfg.prefix)))
    }
}
