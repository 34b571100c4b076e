//! Headway
//!
//! Classify raw arrival-trend signals and replay recorded polls through the
//! status stabilizer.

use anyhow::{Context, Result};
use clap::Parser;
use headway_classifier::{classify, CLASSIFICATION_TABLE};
use headway_cli::cli::{Cli, Commands};
use headway_cli::config::{validate_speed, HeadwayConfig, OutputFormat};
use headway_cli::replay::{apply, final_labels, pacing_delay};
use headway_cli::scenario::Scenario;
use headway_core::Timestamp;
use headway_stabilizer::{Stabilizer, StatusTracker};
use headway_telemetry::MetricsCollector;
use std::path::Path;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    init_tracing(cli.verbose, cli.log_json);

    match cli.command {
        Commands::Classify {
            drift,
            confidence,
            stability,
        } => {
            let (label, color) = classify(drift, confidence, stability);
            println!(
                "{}  severity={}  color={} ({})",
                label,
                label.severity(),
                color.as_str(),
                color.hex()
            );
        }

        Commands::Table => {
            println!(
                "{:<8} {:<11} {:<10} {:<14} {:<8} color",
                "drift", "confidence", "stability", "label", "severity"
            );
            for row in CLASSIFICATION_TABLE.iter() {
                println!(
                    "{:<8} {:<11} {:<10} {:<14} {:<8} {}",
                    row.drift.as_str(),
                    row.confidence.as_str(),
                    row.stability.as_str(),
                    row.label.as_str(),
                    row.label.severity().to_string(),
                    row.label.color().as_str()
                );
            }
        }

        Commands::Replay {
            scenario,
            config,
            format,
            realtime,
            speed,
        } => {
            let speed = validate_speed(speed)?;
            run_replay(&scenario, &config, format, realtime.then_some(speed)).await?;
        }
    }

    Ok(())
}

async fn run_replay(
    scenario_path: &Path,
    config_path: &Path,
    format: Option<OutputFormat>,
    realtime_speed: Option<f64>,
) -> Result<()> {
    let config = HeadwayConfig::load(config_path, format)
        .with_context(|| format!("failed to load config {}", config_path.display()))?;
    let scenario = Scenario::from_file(scenario_path)
        .with_context(|| format!("failed to read scenario {}", scenario_path.display()))?;
    let steps = scenario
        .steps()
        .with_context(|| format!("invalid scenario {}", scenario_path.display()))?;

    info!(polls = steps.len(), "replaying scenario");

    MetricsCollector::describe();
    let stabilizer = Stabilizer::new(config.stabilizer.clone())?;
    let mut tracker = StatusTracker::new(stabilizer);

    let mut previous_at: Option<Timestamp> = None;
    for step in &steps {
        if let (Some(speed), Some(prev)) = (realtime_speed, previous_at) {
            let delay = pacing_delay(step.at - prev, speed)
                .with_context(|| format!("cannot pace poll {}", step.index))?;
            tokio::time::sleep(delay).await;
        }
        previous_at = Some(step.at);

        let line = apply(&mut tracker, step);
        match config.output.format {
            OutputFormat::Table => println!("{line}"),
            OutputFormat::Json => println!("{}", serde_json::to_string(&line)?),
        }
    }

    if config.output.summary {
        print_summary(&tracker, config.output.format)?;
    }

    Ok(())
}

fn print_summary(tracker: &StatusTracker, format: OutputFormat) -> Result<()> {
    let snapshot = tracker.metrics().snapshot();
    let finals = final_labels(tracker);

    match format {
        OutputFormat::Json => {
            let labels: Vec<_> = finals
                .iter()
                .map(|(key, label)| serde_json::json!({ "entity": key.to_string(), "label": label }))
                .collect();
            println!(
                "{}",
                serde_json::json!({ "summary": snapshot, "final": labels })
            );
        }
        OutputFormat::Table => {
            println!();
            println!(
                "polls={} initial={} escalated={} lateral={} downgraded={} held={} fallbacks={}",
                snapshot.observations,
                snapshot.initial,
                snapshot.escalated,
                snapshot.lateral,
                snapshot.downgraded,
                snapshot.held,
                snapshot.fallbacks
            );
            println!("hold rate: {:.1}%", snapshot.hold_rate() * 100.0);
            for (key, label) in finals {
                println!("  {:<14} {}", key.to_string(), label);
            }
        }
    }

    Ok(())
}

/// Initialize tracing/logging
fn init_tracing(verbose: bool, json: bool) {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = if verbose {
        EnvFilter::new("headway=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("headway=info"))
    };

    // Logs go to stderr so replay output on stdout stays machine-readable
    let (json_layer, text_layer) = if json {
        (Some(fmt::layer().json().with_writer(std::io::stderr)), None)
    } else {
        (None, Some(fmt::layer().with_writer(std::io::stderr)))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(json_layer)
        .with(text_layer)
        .init();
}
