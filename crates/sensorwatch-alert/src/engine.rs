use chrono::{DateTime, Duration, Utc};
use sensorwatch_common::clock::{Clock, SystemClock};
use sensorwatch_common::id::IdGenerator;
use sensorwatch_common::types::{AlertEvent, AlertRule};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tracing;

/// Evaluates readings against per-sensor-type rules.
///
/// The engine never fails: unknown sensor types, values at or below the
/// threshold, suppressed types and readings inside the cooldown window all
/// yield `None`. State only changes when an alert fires, when an operator
/// (un)suppresses a type, or when an expired suppression is dropped.
pub struct AlertEngine {
    rules: BTreeMap<String, AlertRule>,
    last_alert_time: HashMap<String, DateTime<Utc>>,
    active_alerts: Vec<AlertEvent>,
    /// sensor_type -> suppression expiry (clock time)
    suppressions: HashMap<String, DateTime<Utc>>,
    clock: Arc<dyn Clock>,
    ids: IdGenerator,
}

impl AlertEngine {
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self::with_clock_and_ids(clock, IdGenerator::default())
    }

    /// Engines sharing a process should each get their own
    /// `(machine_id, node_id)` so alert IDs stay unique across them.
    pub fn with_clock_and_ids(clock: Arc<dyn Clock>, ids: IdGenerator) -> Self {
        Self {
            rules: BTreeMap::new(),
            last_alert_time: HashMap::new(),
            active_alerts: Vec::new(),
            suppressions: HashMap::new(),
            clock,
            ids,
        }
    }

    /// Insert or replace the rule for `rule.sensor_type`.
    pub fn add_rule(&mut self, rule: AlertRule) {
        tracing::debug!(
            sensor_type = %rule.sensor_type,
            threshold = rule.threshold,
            severity = %rule.severity,
            cooldown_secs = rule.cooldown_secs,
            "Alert rule registered"
        );
        self.rules.insert(rule.sensor_type.clone(), rule);
    }

    /// Remove a rule by sensor type. Returns true if found and removed.
    pub fn remove_rule(&mut self, sensor_type: &str) -> bool {
        self.rules.remove(sensor_type).is_some()
    }

    pub fn get_rule(&self, sensor_type: &str) -> Option<&AlertRule> {
        self.rules.get(sensor_type)
    }

    /// Registered rules, ordered by sensor type.
    pub fn rules(&self) -> impl Iterator<Item = &AlertRule> {
        self.rules.values()
    }

    pub fn check_reading(
        &mut self,
        sensor_type: &str,
        value: f64,
        timestamp: DateTime<Utc>,
    ) -> Option<AlertEvent> {
        let Some((threshold, cooldown_secs)) = self
            .rules
            .get(sensor_type)
            .map(|rule| (rule.threshold, rule.cooldown_secs))
        else {
            tracing::debug!(sensor_type, "No rule registered, reading ignored");
            return None;
        };

        // Strict: a reading equal to the threshold never alerts. NaN never alerts.
        if value.is_nan() || value <= threshold {
            return None;
        }

        if self.is_suppressed(sensor_type) {
            tracing::debug!(sensor_type, value, "Alert suppressed (operator suppression)");
            return None;
        }

        if let Some(last) = self.last_alert_time.get(sensor_type) {
            // Replayed timestamps earlier than the last alert land inside the window too.
            if timestamp - *last < secs_duration(cooldown_secs) {
                tracing::debug!(
                    sensor_type,
                    value,
                    last_alert = %last,
                    "Alert suppressed (cooldown period)"
                );
                return None;
            }
        }

        let alert_id = self.ids.next_id();
        let rule = self.rules.get(sensor_type)?;
        let event = AlertEvent::new(alert_id, rule, value, timestamp);
        self.last_alert_time.insert(sensor_type.to_string(), timestamp);
        self.active_alerts.push(event.clone());

        tracing::info!(
            alert_id = %event.alert_id,
            sensor_type,
            value,
            threshold,
            severity = %event.severity,
            "Alert fired"
        );

        Some(event)
    }

    /// Snapshot of every alert fired so far, in firing order.
    pub fn get_active_alerts(&self) -> Vec<AlertEvent> {
        self.active_alerts.clone()
    }

    /// Silence `sensor_type` until `clock.now() + duration_secs`, replacing
    /// any existing suppression.
    pub fn suppress_alert(&mut self, sensor_type: &str, duration_secs: u64) {
        let expiry = self
            .clock
            .now()
            .checked_add_signed(secs_duration(duration_secs))
            .unwrap_or(DateTime::<Utc>::MAX_UTC);
        tracing::info!(sensor_type, until = %expiry, "Alerts suppressed");
        self.suppressions.insert(sensor_type.to_string(), expiry);
    }

    pub fn clear_suppression(&mut self, sensor_type: &str) {
        if self.suppressions.remove(sensor_type).is_some() {
            tracing::info!(sensor_type, "Suppression cleared");
        }
    }

    /// Whether `sensor_type` is currently suppressed.
    ///
    /// A suppression whose expiry has been reached is removed here, so once
    /// this returns false for an expired entry it stays false until the type
    /// is suppressed again.
    pub fn is_suppressed(&mut self, sensor_type: &str) -> bool {
        let Some(expiry) = self.suppressions.get(sensor_type).copied() else {
            return false;
        };

        if self.clock.now() >= expiry {
            self.suppressions.remove(sensor_type);
            tracing::info!(sensor_type, expired_at = %expiry, "Suppression expired");
            return false;
        }

        true
    }

    pub fn id_origin(&self) -> (i32, i32) {
        (self.ids.machine_id(), self.ids.node_id())
    }

    /// Expiry of the stored suppression, without triggering expiry cleanup.
    pub fn suppression_expiry(&self, sensor_type: &str) -> Option<DateTime<Utc>> {
        self.suppressions.get(sensor_type).copied()
    }
}

impl Default for AlertEngine {
    fn default() -> Self {
        Self::new()
    }
}

fn secs_duration(secs: u64) -> Duration {
    i64::try_from(secs)
        .ok()
        .and_then(Duration::try_seconds)
        .unwrap_or(Duration::MAX)
}
