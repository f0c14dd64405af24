use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Alert severity level, ordered from lowest to highest.
///
/// Labels are matched case-insensitively. Anything outside
/// `info`/`warning`/`critical` becomes [`Severity::Unknown`], which sorts
/// below every known level and is never routed to a channel.
///
/// # Examples
///
/// ```
/// use sensorwatch_common::types::Severity;
///
/// let sev: Severity = "WARNING".parse().unwrap();
/// assert_eq!(sev, Severity::Warning);
/// assert_eq!(sev.to_string(), "warning");
/// assert!(Severity::Critical > Severity::Info);
/// assert_eq!(Severity::from_label("urgent"), Severity::Unknown);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Severity {
    Unknown,
    Info,
    Warning,
    Critical,
}

impl Severity {
    /// Lenient parse: unrecognised labels map to [`Severity::Unknown`].
    pub fn from_label(label: &str) -> Self {
        label.parse().unwrap_or(Severity::Unknown)
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, Severity::Unknown)
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Unknown => write!(f, "unknown"),
            Severity::Info => write!(f, "info"),
            Severity::Warning => write!(f, "warning"),
            Severity::Critical => write!(f, "critical"),
        }
    }
}

impl std::str::FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "info" => Ok(Severity::Info),
            "warning" => Ok(Severity::Warning),
            "critical" => Ok(Severity::Critical),
            _ => Err(format!("unknown severity: {s}")),
        }
    }
}

impl From<String> for Severity {
    fn from(label: String) -> Self {
        Severity::from_label(&label)
    }
}

impl From<Severity> for String {
    fn from(severity: Severity) -> Self {
        severity.to_string()
    }
}

/// Per-sensor-type alerting rule. At most one is active per `sensor_type`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertRule {
    pub sensor_type: String,
    /// Readings strictly above this value are candidates.
    pub threshold: f64,
    pub severity: Severity,
    /// Minimum seconds between two alerts for the same sensor type.
    #[serde(default, alias = "cooldown_seconds")]
    pub cooldown_secs: u64,
}

impl AlertRule {
    pub fn new(
        sensor_type: impl Into<String>,
        threshold: f64,
        severity: Severity,
        cooldown_secs: u64,
    ) -> Self {
        Self {
            sensor_type: sensor_type.into(),
            threshold,
            severity,
            cooldown_secs,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertEvent {
    pub alert_id: String,
    /// Timestamp of the triggering reading, not of evaluation.
    pub timestamp: DateTime<Utc>,
    pub sensor_type: String,
    pub value: f64,
    pub threshold: f64,
    pub severity: Severity,
    pub message: String,
}

impl AlertEvent {
    /// Builds the event for `rule` firing on `value` at `timestamp`.
    pub fn new(
        alert_id: impl Into<String>,
        rule: &AlertRule,
        value: f64,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            alert_id: alert_id.into(),
            timestamp,
            sensor_type: rule.sensor_type.clone(),
            value,
            threshold: rule.threshold,
            severity: rule.severity,
            message: alert_message(rule.severity, &rule.sensor_type, value, rule.threshold),
        }
    }
}

/// Human-readable alert text.
///
/// # Examples
///
/// ```
/// use sensorwatch_common::types::{alert_message, Severity};
///
/// assert_eq!(
///     alert_message(Severity::Critical, "vibration", 15.0, 10.0),
///     "CRITICAL: vibration reading 15.00 exceeds threshold 10.00"
/// );
/// ```
pub fn alert_message(severity: Severity, sensor_type: &str, value: f64, threshold: f64) -> String {
    format!(
        "{}: {} reading {:.2} exceeds threshold {:.2}",
        severity.to_string().to_uppercase(),
        sensor_type,
        value,
        threshold
    )
}
