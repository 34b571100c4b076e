//! Headway CLI
//!
//! Library half of the `headway` binary: argument parsing, configuration,
//! scenario files, and replay through a status tracker.

pub mod cli;
pub mod config;
pub mod replay;
pub mod scenario;

pub use config::{HeadwayConfig, OutputConfig, OutputFormat};
pub use replay::{apply, final_labels, pacing_delay, replay, ReplayLine};
pub use scenario::{Poll, PollTime, Scenario, ScenarioStep, StepInput};
