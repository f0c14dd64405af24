//! Replays recorded sensor readings through an [`AlertPipeline`].
//!
//! Input is JSON lines, one reading per line:
//!
//! ```text
//! {"sensor_type": "vibration", "value": 15.0, "timestamp": "2024-03-01T10:00:00Z"}
//! ```
//!
//! Blank lines and lines starting with `#` are skipped.

use crate::pipeline::{AlertPipeline, PipelineOutcome};
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::io::BufRead;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    pub sensor_type: String,
    pub value: f64,
    pub timestamp: DateTime<Utc>,
}

pub fn parse_readings<R: BufRead>(reader: R) -> Result<Vec<Reading>> {
    let mut readings = Vec::new();
    for (idx, line) in reader.lines().enumerate() {
        let line = line.with_context(|| format!("Failed to read line {}", idx + 1))?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let reading: Reading = serde_json::from_str(trimmed)
            .with_context(|| format!("Invalid reading on line {}", idx + 1))?;
        readings.push(reading);
    }
    Ok(readings)
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ReplaySummary {
    pub readings: usize,
    pub alerts: usize,
    pub notifications: usize,
    pub failed_dispatches: usize,
}

/// Feeds `readings` through `pipeline` in order.
///
/// A failed dispatch is logged and counted; replay continues with the next
/// reading.
pub fn replay(pipeline: &mut AlertPipeline, readings: &[Reading]) -> ReplaySummary {
    let mut summary = ReplaySummary::default();

    for reading in readings {
        summary.readings += 1;
        match pipeline.process_reading(&reading.sensor_type, reading.value, reading.timestamp) {
            Ok(Some(PipelineOutcome { event, channels, .. })) => {
                summary.alerts += 1;
                summary.notifications += channels.len();
                tracing::info!(
                    alert_id = %event.alert_id,
                    sensor_type = %event.sensor_type,
                    value = event.value,
                    channels = ?channels,
                    "Reading raised alert"
                );
            }
            Ok(None) => {}
            Err(e) => {
                summary.alerts += 1;
                summary.failed_dispatches += 1;
                tracing::error!(
                    sensor_type = %reading.sensor_type,
                    timestamp = %reading.timestamp,
                    error = %e,
                    "Alert dispatch failed"
                );
            }
        }
    }

    summary
}
