use sensorwatch_common::types::Severity;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChannelKind {
    Chat,
    Email,
    Sms,
}

impl ChannelKind {
    pub const ALL: [ChannelKind; 3] = [ChannelKind::Chat, ChannelKind::Email, ChannelKind::Sms];

    pub fn as_str(&self) -> &'static str {
        match self {
            ChannelKind::Chat => "chat",
            ChannelKind::Email => "email",
            ChannelKind::Sms => "sms",
        }
    }
}

impl std::fmt::Display for ChannelKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Channels invoked for `severity`, in invocation order.
///
/// Routing is cumulative: each level includes every channel of the levels
/// below it. [`Severity::Unknown`] routes nowhere.
pub fn channels_for(severity: Severity) -> &'static [ChannelKind] {
    match severity {
        Severity::Info => &[ChannelKind::Chat],
        Severity::Warning => &[ChannelKind::Chat, ChannelKind::Email],
        Severity::Critical => &[ChannelKind::Chat, ChannelKind::Email, ChannelKind::Sms],
        Severity::Unknown => &[],
    }
}
