use crate::error::{NotifyError, Result as NotifyResult};
use crate::plugin::ChannelPlugin;
use crate::ChannelSender;
use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::Value;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Appends one line per message to a local file.
pub struct FileChannel {
    name: String,
    path: PathBuf,
}

impl FileChannel {
    pub fn new(name: &str, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.to_string(),
            path: path.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ChannelSender for FileChannel {
    fn send(&self, message: &str) -> Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .with_context(|| format!("opening {}", self.path.display()))?;
        // One message per line; embedded newlines would split a record.
        writeln!(file, "{}", message.replace('\n', " "))
            .with_context(|| format!("writing {}", self.path.display()))?;
        Ok(())
    }

    fn channel_name(&self) -> &str {
        &self.name
    }
}

// Plugin

#[derive(Deserialize)]
struct FileConfig {
    path: PathBuf,
}

pub struct FilePlugin;

impl FilePlugin {
    fn parse(config: &Value) -> NotifyResult<FileConfig> {
        let cfg: FileConfig = serde_json::from_value(config.clone())
            .map_err(|e| NotifyError::InvalidConfig(format!("Invalid file config: {e}")))?;
        if cfg.path.as_os_str().is_empty() {
            return Err(NotifyError::InvalidConfig(
                "Invalid file config: path is empty".to_string(),
            ));
        }
        Ok(cfg)
    }
}

impl ChannelPlugin for FilePlugin {
    fn name(&self) -> &str {
        "file"
    }

    fn validate_config(&self, config: &Value) -> NotifyResult<()> {
        Self::parse(config).map(|_| ())
    }

    fn create_channel(&self, instance_name: &str, config: &Value) -> NotifyResult<Box<dyn ChannelSender>> {
        let cfg = Self::parse(config)?;
        Ok(Box::new(FileChannel::new(instance_name, cfg.path)))
    }
}
