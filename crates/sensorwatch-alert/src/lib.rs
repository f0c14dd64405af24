//! Alert rule engine for sensor readings.
//!
//! The [`engine::AlertEngine`] holds one [`AlertRule`] per sensor type and
//! decides, reading by reading, whether an alert fires. Cooldown windows are
//! measured on reading timestamps; operator suppressions are measured on the
//! engine's injected [`Clock`](sensorwatch_common::clock::Clock).

pub mod engine;


pub use engine::AlertEngine;
pub use sensorwatch_common::types::{AlertEvent, AlertRule, Severity};
