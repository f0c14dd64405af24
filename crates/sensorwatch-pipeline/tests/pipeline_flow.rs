mod common;

use chrono::Duration;
use common::{build_test_context, build_test_context_with_failing, t0};
use sensorwatch_common::clock::ManualClock;
use sensorwatch_common::types::{AlertRule, Severity};
use sensorwatch_notify::error::NotifyError;
use sensorwatch_notify::plugin::ChannelRegistry;
use sensorwatch_notify::ChannelKind;
use sensorwatch_pipeline::config::PipelineConfig;
use sensorwatch_pipeline::replay;
use std::sync::Arc;

fn vibration_rule() -> AlertRule {
    AlertRule::new("vibration", 10.0, Severity::Critical, 300)
}

#[test]
fn critical_vibration_respects_cooldown_end_to_end() {
    let mut ctx = build_test_context();
    ctx.pipeline.engine_mut().add_rule(vibration_rule());

    let first = ctx
        .pipeline
        .process_reading("vibration", 15.0, t0())
        .unwrap()
        .expect("first reading should alert");
    assert_eq!(
        first.channels,
        vec![ChannelKind::Chat, ChannelKind::Email, ChannelKind::Sms]
    );
    assert_eq!(first.timestamp, t0());
    assert_eq!(first.event.sensor_type, "vibration");

    let during_cooldown = ctx
        .pipeline
        .process_reading("vibration", 15.0, t0() + Duration::seconds(10))
        .unwrap();
    assert!(during_cooldown.is_none());

    let after_cooldown = ctx
        .pipeline
        .process_reading("vibration", 15.0, t0() + Duration::seconds(301))
        .unwrap()
        .expect("cooldown has elapsed");
    assert_ne!(after_cooldown.event.alert_id, first.event.alert_id);

    assert_eq!(ctx.pipeline.engine().get_active_alerts().len(), 2);
    assert_eq!(ctx.pipeline.dispatcher().get_dispatch_history().len(), 2);
    assert_eq!(ctx.sms.lock().unwrap().len(), 2);
}

#[test]
fn reading_without_rule_creates_no_dispatch() {
    let mut ctx = build_test_context();

    let outcome = ctx.pipeline.process_reading("pressure", 999.0, t0()).unwrap();
    assert!(outcome.is_none());
    assert!(ctx.pipeline.dispatcher().get_dispatch_history().is_empty());
    assert!(ctx.chat.lock().unwrap().is_empty());
}

#[test]
fn below_threshold_reading_is_not_dispatched() {
    let mut ctx = build_test_context();
    ctx.pipeline.engine_mut().add_rule(vibration_rule());

    assert!(ctx
        .pipeline
        .process_reading("vibration", 10.0, t0())
        .unwrap()
        .is_none());
    assert!(ctx.pipeline.dispatcher().get_dispatch_history().is_empty());
}

#[test]
fn suppression_silences_pipeline_until_clock_passes_expiry() {
    let mut ctx = build_test_context();
    ctx.pipeline
        .engine_mut()
        .add_rule(AlertRule::new("temperature", 80.0, Severity::Warning, 0));
    ctx.pipeline.engine_mut().suppress_alert("temperature", 60);

    assert!(ctx
        .pipeline
        .process_reading("temperature", 95.0, t0())
        .unwrap()
        .is_none());

    ctx.clock.advance(Duration::seconds(61));
    let outcome = ctx
        .pipeline
        .process_reading("temperature", 95.0, t0() + Duration::seconds(1))
        .unwrap()
        .expect("suppression expired");
    assert_eq!(outcome.channels, vec![ChannelKind::Chat, ChannelKind::Email]);
    assert!(ctx.sms.lock().unwrap().is_empty());
}

#[test]
fn channel_failure_propagates_and_skips_history() {
    let mut ctx = build_test_context_with_failing(&["sms"]);
    ctx.pipeline.engine_mut().add_rule(vibration_rule());

    let err = ctx
        .pipeline
        .process_reading("vibration", 15.0, t0())
        .expect_err("sms failure should surface");
    assert!(matches!(
        err,
        NotifyError::ChannelSend {
            channel: ChannelKind::Sms,
            ..
        }
    ));

    // The engine still fired; chat and email were already sent.
    assert_eq!(ctx.pipeline.engine().get_active_alerts().len(), 1);
    assert_eq!(ctx.chat.lock().unwrap().len(), 1);
    assert_eq!(ctx.email.lock().unwrap().len(), 1);
    assert!(ctx.pipeline.dispatcher().get_dispatch_history().is_empty());
}

#[test]
fn config_file_builds_working_pipeline() {
    let dir = tempfile::tempdir().unwrap();
    let sms_log = dir.path().join("sms.log");
    let config_path = dir.path().join("sensorwatch.toml");
    std::fs::write(
        &config_path,
        format!(
            r#"
[[rules]]
sensor_type = "vibration"
threshold = 10.0
severity = "critical"
cooldown_secs = 300

[[rules]]
sensor_type = "humidity"
threshold = 90.0
severity = "info"

[channels.sms]
type = "file"
config = {{ path = "{}" }}

[[suppressions]]
sensor_type = "humidity"
duration_secs = 600
"#,
            sms_log.display().to_string().replace('\\', "\\\\")
        ),
    )
    .unwrap();

    let config = PipelineConfig::load(&config_path).unwrap();
    let clock = Arc::new(ManualClock::new(t0()));
    let mut pipeline = config
        .build_pipeline(&ChannelRegistry::default(), clock.clone())
        .unwrap();

    let readings = replay::parse_readings(
        "\
{\"sensor_type\":\"vibration\",\"value\":15.0,\"timestamp\":\"2024-03-01T10:00:00Z\"}
{\"sensor_type\":\"vibration\",\"value\":16.0,\"timestamp\":\"2024-03-01T10:00:10Z\"}
{\"sensor_type\":\"humidity\",\"value\":95.0,\"timestamp\":\"2024-03-01T10:00:20Z\"}
{\"sensor_type\":\"pressure\",\"value\":999.0,\"timestamp\":\"2024-03-01T10:00:30Z\"}
{\"sensor_type\":\"vibration\",\"value\":15.0,\"timestamp\":\"2024-03-01T10:05:01Z\"}
"
        .as_bytes(),
    )
    .unwrap();

    let summary = replay::replay(&mut pipeline, &readings);
    assert_eq!(summary.readings, 5);
    assert_eq!(summary.alerts, 2);
    assert_eq!(summary.notifications, 6);
    assert_eq!(summary.failed_dispatches, 0);

    let sms_lines = std::fs::read_to_string(&sms_log).unwrap();
    assert_eq!(sms_lines.lines().count(), 2);
    assert!(sms_lines.contains("[sensorwatch][critical] vibration"));
}

#[test]
fn unknown_channel_type_in_config_is_rejected() {
    let config = PipelineConfig::from_toml(
        r#"
[channels.email]
type = "carrier-pigeon"
"#,
    )
    .unwrap();

    let err = config
        .build_pipeline(&ChannelRegistry::default(), Arc::new(ManualClock::new(t0())))
        .err()
        .expect("unknown channel type should fail");
    assert!(err.to_string().contains("email"), "error was: {err}");
}

#[test]
fn unknown_severity_rule_fires_but_routes_nowhere() {
    let config = PipelineConfig::from_toml(
        r#"
[[rules]]
sensor_type = "humidity"
threshold = 90.0
severity = "urgent"
"#,
    )
    .unwrap();
    let mut pipeline = config
        .build_pipeline(&ChannelRegistry::default(), Arc::new(ManualClock::new(t0())))
        .unwrap();

    let outcome = pipeline
        .process_reading("humidity", 91.0, t0())
        .unwrap()
        .expect("engine still raises the alert");
    assert!(outcome.channels.is_empty());
    assert_eq!(outcome.event.severity, Severity::Unknown);

    let history = pipeline.dispatcher().get_dispatch_history();
    assert_eq!(history.len(), 1);
    assert!(history[0].channels.is_empty());
}
