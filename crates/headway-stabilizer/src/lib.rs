//! Headway Stabilizer
//!
//! Turns the per-poll candidate label of each tracked bus into a label that
//! is safe to show without flicker.
//!
//! The rules, per entity and per poll:
//! - First observation: show the candidate.
//! - More severe candidate: show it immediately.
//! - Same-severity candidate: show it immediately, keep the hold clock.
//! - Calmer candidate: wait for the hold time and confirmations, then step
//!   down one severity rank.

pub mod config;
pub mod stabilizer;
pub mod state;
pub mod tracker;

pub use config::{StabilizerConfig, DEFAULT_CONFIRMATIONS, DEFAULT_HOLD_SECS, DEFAULT_LABELS};
pub use stabilizer::{resolve, Resolution, Stabilizer};
pub use state::StabilizerState;
pub use tracker::{DisplayStatus, SharedTracker, StatusTracker};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::config::StabilizerConfig;
    pub use crate::stabilizer::{resolve, Resolution, Stabilizer};
    pub use crate::state::StabilizerState;
    pub use crate::tracker::{DisplayStatus, SharedTracker, StatusTracker};
}
