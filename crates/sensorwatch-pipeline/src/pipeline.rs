use chrono::{DateTime, Utc};
use sensorwatch_alert::engine::AlertEngine;
use sensorwatch_common::types::AlertEvent;
use sensorwatch_notify::error::NotifyError;
use sensorwatch_notify::{ChannelKind, NotificationDispatcher};

/// What a reading turned into when it raised an alert.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineOutcome {
    pub event: AlertEvent,
    pub channels: Vec<ChannelKind>,
    pub timestamp: DateTime<Utc>,
}

/// Engine + dispatcher. Holds no decision logic of its own.
pub struct AlertPipeline {
    engine: AlertEngine,
    dispatcher: NotificationDispatcher,
}

impl AlertPipeline {
    pub fn new(engine: AlertEngine, dispatcher: NotificationDispatcher) -> Self {
        Self { engine, dispatcher }
    }

    /// Evaluates one reading and dispatches the alert it raises, if any.
    ///
    /// # Errors
    ///
    /// Propagates [`NotifyError::ChannelSend`] from the dispatcher. The alert
    /// itself has already been recorded by the engine at that point.
    pub fn process_reading(
        &mut self,
        sensor_type: &str,
        value: f64,
        timestamp: DateTime<Utc>,
    ) -> Result<Option<PipelineOutcome>, NotifyError> {
        let Some(event) = self.engine.check_reading(sensor_type, value, timestamp) else {
            return Ok(None);
        };

        let channels = self.dispatcher.dispatch(&event)?;
        Ok(Some(PipelineOutcome {
            event,
            channels,
            timestamp,
        }))
    }

    pub fn engine(&self) -> &AlertEngine {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut AlertEngine {
        &mut self.engine
    }

    pub fn dispatcher(&self) -> &NotificationDispatcher {
        &self.dispatcher
    }
}
