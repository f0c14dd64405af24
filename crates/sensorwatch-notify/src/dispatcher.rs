use crate::error::{NotifyError, Result};
use crate::routing::{channels_for, ChannelKind};
use crate::ChannelSender;
use chrono::{DateTime, Utc};
use sensorwatch_common::types::{AlertEvent, Severity};
use serde::{Deserialize, Serialize};
use tracing;

/// One completed dispatch: which channels an alert actually went out on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DispatchRecord {
    pub alert_id: String,
    pub timestamp: DateTime<Utc>,
    pub severity: Severity,
    pub channels: Vec<ChannelKind>,
}

pub struct NotificationDispatcher {
    email: Box<dyn ChannelSender>,
    sms: Box<dyn ChannelSender>,
    chat: Box<dyn ChannelSender>,
    dispatch_history: Vec<DispatchRecord>,
}

impl NotificationDispatcher {
    pub fn new(
        email: Box<dyn ChannelSender>,
        sms: Box<dyn ChannelSender>,
        chat: Box<dyn ChannelSender>,
    ) -> Self {
        Self {
            email,
            sms,
            chat,
            dispatch_history: Vec::new(),
        }
    }

    fn sender(&self, kind: ChannelKind) -> &dyn ChannelSender {
        match kind {
            ChannelKind::Chat => self.chat.as_ref(),
            ChannelKind::Email => self.email.as_ref(),
            ChannelKind::Sms => self.sms.as_ref(),
        }
    }

    pub fn format_message(event: &AlertEvent) -> String {
        format!(
            "[sensorwatch][{severity}] {sensor}: {message}",
            severity = event.severity,
            sensor = event.sensor_type,
            message = event.message,
        )
    }

    /// Sends `event` to every channel its severity routes to and returns the
    /// channels used, in order.
    ///
    /// # Errors
    ///
    /// Stops at the first channel that fails and returns
    /// [`NotifyError::ChannelSend`]. Channels before it have already received
    /// the message; nothing is appended to the dispatch history.
    pub fn dispatch(&mut self, event: &AlertEvent) -> Result<Vec<ChannelKind>> {
        let route = channels_for(event.severity);
        if route.is_empty() {
            tracing::warn!(
                alert_id = %event.alert_id,
                severity = %event.severity,
                "No channels routed for severity"
            );
        }

        let message = Self::format_message(event);
        let mut used = Vec::with_capacity(route.len());

        for &kind in route {
            let sender = self.sender(kind);
            if let Err(e) = sender.send(&message) {
                tracing::error!(
                    alert_id = %event.alert_id,
                    channel = %kind,
                    sender = sender.channel_name(),
                    error = %e,
                    "Failed to send notification"
                );
                return Err(NotifyError::ChannelSend {
                    channel: kind,
                    source: e,
                });
            }
            used.push(kind);
        }

        tracing::info!(
            alert_id = %event.alert_id,
            severity = %event.severity,
            channels = ?used,
            "Alert dispatched"
        );

        self.dispatch_history.push(DispatchRecord {
            alert_id: event.alert_id.clone(),
            timestamp: event.timestamp,
            severity: event.severity,
            channels: used.clone(),
        });

        Ok(used)
    }

    /// Snapshot of all completed dispatches, in call order.
    pub fn get_dispatch_history(&self) -> Vec<DispatchRecord> {
        self.dispatch_history.clone()
    }
}
