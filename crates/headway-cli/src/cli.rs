use crate::config::OutputFormat;
use clap::{Parser, Subcommand};
use headway_core::{Confidence, Drift, Stability};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "headway")]
#[command(author, version, about = "Flicker-free bus status labels from noisy arrival trends")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Classify one raw signal
    Classify {
        /// Arrival trend: DOWN, STABLE, UP or UNKNOWN
        #[arg(short, long, value_parser = parse_drift)]
        drift: Drift,

        /// Estimate confidence: HIGH, MEDIUM or LOW
        #[arg(short, long, value_parser = parse_confidence)]
        confidence: Confidence,

        /// Observation variance: STABLE, UNSTABLE or UNKNOWN
        #[arg(short, long, value_parser = parse_stability)]
        stability: Stability,
    },

    /// Print the full classification table
    Table,

    /// Replay a recorded scenario through the stabilizer
    Replay {
        /// Scenario file (YAML)
        scenario: PathBuf,

        /// Configuration file path
        #[arg(short, long, default_value = "headway.yaml")]
        config: PathBuf,

        /// Output format: table or json
        #[arg(short, long, value_parser = parse_format)]
        format: Option<OutputFormat>,

        /// Sleep between polls for the recorded gaps
        #[arg(long)]
        realtime: bool,

        /// Playback speed multiplier for --realtime
        #[arg(long, default_value = "1.0")]
        speed: f64,
    },
}

fn parse_drift(s: &str) -> Result<Drift, String> {
    s.parse().map_err(|e: headway_core::Error| e.to_string())
}

fn parse_confidence(s: &str) -> Result<Confidence, String> {
    s.parse().map_err(|e: headway_core::Error| e.to_string())
}

fn parse_stability(s: &str) -> Result<Stability, String> {
    s.parse().map_err(|e: headway_core::Error| e.to_string())
}

fn parse_format(s: &str) -> Result<OutputFormat, String> {
    s.parse()
}
