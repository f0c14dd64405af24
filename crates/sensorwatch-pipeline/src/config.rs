use crate::pipeline::AlertPipeline;
use anyhow::{Context, Result};
use sensorwatch_alert::engine::AlertEngine;
use sensorwatch_common::clock::Clock;
use sensorwatch_common::id::IdGenerator;
use sensorwatch_common::types::AlertRule;
use sensorwatch_notify::plugin::ChannelRegistry;
use sensorwatch_notify::{ChannelKind, ChannelSender, NotificationDispatcher};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;

/// Top-level TOML configuration for the `sensorwatch` binary.
///
/// ```toml
/// [[rules]]
/// sensor_type = "vibration"
/// threshold = 10.0
/// severity = "critical"
/// cooldown_secs = 300
///
/// [channels.email]
/// type = "file"
/// config = { path = "alerts-email.log" }
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PipelineConfig {
    #[serde(default)]
    pub rules: Vec<AlertRule>,
    #[serde(default)]
    pub channels: ChannelsConfig,
    /// Suppressions applied once at startup, before any reading is replayed.
    #[serde(default)]
    pub suppressions: Vec<SuppressionConfig>,
    #[serde(default)]
    pub ids: IdConfig,
}

/// Snowflake origin for this pipeline's alert IDs (each 0-31).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdConfig {
    #[serde(default = "default_id_part")]
    pub machine_id: i32,
    #[serde(default = "default_id_part")]
    pub node_id: i32,
}

impl Default for IdConfig {
    fn default() -> Self {
        Self {
            machine_id: default_id_part(),
            node_id: default_id_part(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChannelsConfig {
    #[serde(default)]
    pub chat: ChannelConfig,
    #[serde(default)]
    pub email: ChannelConfig,
    #[serde(default)]
    pub sms: ChannelConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChannelConfig {
    /// Plugin type name registered in the [`ChannelRegistry`].
    #[serde(rename = "type", default = "default_channel_type")]
    pub channel_type: String,
    #[serde(default)]
    pub config: serde_json::Value,
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            channel_type: default_channel_type(),
            config: serde_json::Value::Null,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuppressionConfig {
    pub sensor_type: String,
    #[serde(default = "default_suppression_secs")]
    pub duration_secs: u64,
}

fn default_channel_type() -> String {
    "log".to_string()
}

fn default_suppression_secs() -> u64 {
    3600
}

fn default_id_part() -> i32 {
    1
}

impl ChannelsConfig {
    pub fn get(&self, kind: ChannelKind) -> &ChannelConfig {
        match kind {
            ChannelKind::Chat => &self.chat,
            ChannelKind::Email => &self.email,
            ChannelKind::Sms => &self.sms,
        }
    }
}

impl PipelineConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_toml(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Builds the engine (rules and startup suppressions) and the dispatcher
    /// (one sender per channel kind, created through `registry`).
    pub fn build_pipeline(
        &self,
        registry: &ChannelRegistry,
        clock: Arc<dyn Clock>,
    ) -> Result<AlertPipeline> {
        if !(0..32).contains(&self.ids.machine_id) || !(0..32).contains(&self.ids.node_id) {
            anyhow::bail!(
                "ids.machine_id and ids.node_id must be within 0-31 (got {}, {})",
                self.ids.machine_id,
                self.ids.node_id
            );
        }
        let ids = IdGenerator::new(self.ids.machine_id, self.ids.node_id);
        let mut engine = AlertEngine::with_clock_and_ids(clock, ids);
        for rule in &self.rules {
            if !rule.severity.is_known() {
                tracing::warn!(
                    sensor_type = %rule.sensor_type,
                    "Rule has an unrecognised severity; its alerts will not be routed"
                );
            }
            engine.add_rule(rule.clone());
        }
        for suppression in &self.suppressions {
            engine.suppress_alert(&suppression.sensor_type, suppression.duration_secs);
        }

        let sender = |kind: ChannelKind| -> Result<Box<dyn ChannelSender>> {
            let channel = self.channels.get(kind);
            registry
                .create_channel(&channel.channel_type, kind.as_str(), &channel.config)
                .with_context(|| format!("Failed to create {kind} channel"))
        };
        let dispatcher = NotificationDispatcher::new(
            sender(ChannelKind::Email)?,
            sender(ChannelKind::Sms)?,
            sender(ChannelKind::Chat)?,
        );

        tracing::info!(
            rules = self.rules.len(),
            suppressions = self.suppressions.len(),
            chat = %self.channels.chat.channel_type,
            email = %self.channels.email.channel_type,
            sms = %self.channels.sms.channel_type,
            "Alert pipeline configured"
        );

        Ok(AlertPipeline::new(engine, dispatcher))
    }
}
