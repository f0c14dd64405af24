use anyhow::{Context, Result};
use sensorwatch_common::clock::SystemClock;
use sensorwatch_notify::plugin::ChannelRegistry;
use sensorwatch_pipeline::config::PipelineConfig;
use sensorwatch_pipeline::replay::{self, ReplaySummary};
use std::fs::File;
use std::io::{self, BufReader};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[allow(clippy::print_stderr)]
fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  sensorwatch <config.toml> <readings.jsonl>    Replay readings through the alert pipeline");
    eprintln!("  sensorwatch <config.toml> -                   Read readings from stdin");
}

#[allow(clippy::print_stdout)]
fn print_summary(summary: &ReplaySummary) {
    println!(
        "readings={} alerts={} notifications={} failed_dispatches={}",
        summary.readings, summary.alerts, summary.notifications, summary.failed_dispatches
    );
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("sensorwatch=info".parse()?))
        .init();

    let args: Vec<String> = std::env::args().collect();
    let (Some(config_path), Some(readings_path)) = (args.get(1), args.get(2)) else {
        print_usage();
        anyhow::bail!("sensorwatch requires <config.toml> and <readings.jsonl> arguments");
    };

    let config = PipelineConfig::load(config_path)?;
    let registry = ChannelRegistry::default();
    let mut pipeline = config.build_pipeline(&registry, Arc::new(SystemClock))?;

    let readings = if readings_path == "-" {
        replay::parse_readings(io::stdin().lock())?
    } else {
        let file = File::open(readings_path)
            .with_context(|| format!("Failed to open readings file {readings_path}"))?;
        replay::parse_readings(BufReader::new(file))?
    };

    tracing::info!(count = readings.len(), "Replaying readings");
    let summary = replay::replay(&mut pipeline, &readings);
    print_summary(&summary);

    if summary.failed_dispatches > 0 {
        anyhow::bail!("{} alert(s) could not be dispatched", summary.failed_dispatches);
    }
    Ok(())
}
