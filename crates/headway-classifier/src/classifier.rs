//! Classifier trait and common types

use headway_core::{ColorHint, Label, Severity, Signal};
use serde::Serialize;

/// Trait for all signal classifiers
///
/// Implementations must be total: every `Signal` maps to some label.
pub trait Classifier: Send + Sync {
    /// Classify one raw signal
    fn classify(&self, signal: Signal) -> Classification;

    /// Get the classifier name
    fn name(&self) -> &str;
}

/// Result of classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Classification {
    /// Candidate label for the stabilizer
    pub label: Label,

    /// Color the rendering layer should use
    pub color: ColorHint,

    /// True when no table row matched and the fallback was used
    pub fallback: bool,
}

impl Classification {
    /// Create a classification for a matched label
    pub fn new(label: Label) -> Self {
        Self {
            label,
            color: label.color(),
            fallback: false,
        }
    }

    /// The fixed result for an unmapped signal
    pub fn fallback() -> Self {
        Self {
            label: FALLBACK_LABEL,
            color: FALLBACK_LABEL.color(),
            fallback: true,
        }
    }

    /// Severity of the classified label
    pub fn severity(&self) -> Severity {
        self.label.severity()
    }

    /// The `(label, color)` pair
    pub fn into_pair(self) -> (Label, ColorHint) {
        (self.label, self.color)
    }
}

/// Label returned when a signal has no table row
pub const FALLBACK_LABEL: Label = Label::Initializing;
