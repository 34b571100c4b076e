//! Headway Core
//!
//! Core types and utilities shared across Headway components.
//!
//! This crate provides:
//! - The raw signal enums (`Drift`, `Confidence`, `Stability`)
//! - The closed set of display labels with their severity ranks and colors
//! - Entity identity for tracked bus services
//! - Error types and result handling

pub mod error;
pub mod types;

pub use error::{Error, Result};
pub use types::{
    ColorHint, Confidence, Drift, EntityKey, Label, Severity, Signal, Stability, Timestamp,
    Transition,
};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::types::{
        ColorHint, Confidence, Drift, EntityKey, Label, Severity, Signal, Stability, Timestamp,
        Transition,
    };
}
