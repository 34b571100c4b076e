//! Headway Telemetry
//!
//! Counters for stabilizer decisions, kept in-process for summaries and
//! mirrored to the `metrics` facade for whatever recorder the host installs.

pub mod metrics;

pub use crate::metrics::{MetricsCollector, MetricsSnapshot};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::metrics::{MetricsCollector, MetricsSnapshot};
}
