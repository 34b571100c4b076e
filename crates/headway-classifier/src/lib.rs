//! Headway Classifier
//!
//! Maps a raw `(drift, confidence, stability)` signal to a candidate status
//! label and color hint.
//!
//! Classification is a pure lookup in a fixed 36-row table. It never fails:
//! a signal with no matching row yields `INITIALIZING`.

pub mod classifier;
pub mod table;

use headway_core::{ColorHint, Confidence, Drift, Label, Signal, Stability};

pub use classifier::{Classification, Classifier, FALLBACK_LABEL};
pub use table::{ClassificationRow, TableClassifier, CLASSIFICATION_TABLE};

/// Classify a signal against the standard table
pub fn classify(drift: Drift, confidence: Confidence, stability: Stability) -> (Label, ColorHint) {
    TableClassifier::new()
        .classify(Signal::new(drift, confidence, stability))
        .into_pair()
}

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::classifier::{Classification, Classifier};
    pub use crate::classify;
    pub use crate::table::TableClassifier;
}
