//! The fixed classification table
//!
//! One row per `(drift, confidence, stability)` combination. The rows are
//! product decisions rather than derived logic, so they are kept as data and
//! tested cell by cell.

use crate::classifier::{Classification, Classifier};
use headway_core::{Confidence, Drift, Label, Signal, Stability};

/// One row of the classification table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClassificationRow {
    pub drift: Drift,
    pub confidence: Confidence,
    pub stability: Stability,
    pub label: Label,
}

impl ClassificationRow {
    const fn new(drift: Drift, confidence: Confidence, stability: Stability, label: Label) -> Self {
        Self {
            drift,
            confidence,
            stability,
            label,
        }
    }

    /// Whether this row applies to `signal`
    pub fn matches(&self, signal: &Signal) -> bool {
        self.drift == signal.drift
            && self.confidence == signal.confidence
            && self.stability == signal.stability
    }
}

use Confidence::{High, Low, Medium};

const DOWN: Drift = Drift::Down;
const STEADY: Drift = Drift::Stable;
const UP: Drift = Drift::Up;
const DRIFT_UNKNOWN: Drift = Drift::Unknown;

const STABLE: Stability = Stability::Stable;
const UNSTABLE: Stability = Stability::Unstable;
const VAR_UNKNOWN: Stability = Stability::Unknown;

/// The full 4 x 3 x 3 table
#[rustfmt::skip]
pub static CLASSIFICATION_TABLE: [ClassificationRow; 36] = [
    // HIGH confidence
    ClassificationRow::new(DOWN,          High,   STABLE,      Label::Reliable),
    ClassificationRow::new(STEADY,        High,   STABLE,      Label::OnTrack),
    ClassificationRow::new(UP,            High,   STABLE,      Label::Slowing),
    ClassificationRow::new(DRIFT_UNKNOWN, High,   STABLE,      Label::Estimating),
    ClassificationRow::new(DOWN,          High,   UNSTABLE,    Label::Fluctuating),
    ClassificationRow::new(STEADY,        High,   UNSTABLE,    Label::Fluctuating),
    ClassificationRow::new(UP,            High,   UNSTABLE,    Label::Disrupted),
    ClassificationRow::new(DRIFT_UNKNOWN, High,   UNSTABLE,    Label::Uncertain),
    ClassificationRow::new(DOWN,          High,   VAR_UNKNOWN, Label::Improving),
    ClassificationRow::new(STEADY,        High,   VAR_UNKNOWN, Label::OnTrack),
    ClassificationRow::new(UP,            High,   VAR_UNKNOWN, Label::Delaying),
    ClassificationRow::new(DRIFT_UNKNOWN, High,   VAR_UNKNOWN, Label::Initializing),
    // MEDIUM confidence
    ClassificationRow::new(DOWN,          Medium, STABLE,      Label::Improving),
    ClassificationRow::new(STEADY,        Medium, STABLE,      Label::OnTrack),
    ClassificationRow::new(UP,            Medium, STABLE,      Label::Slowing),
    ClassificationRow::new(DRIFT_UNKNOWN, Medium, STABLE,      Label::Estimating),
    ClassificationRow::new(DOWN,          Medium, UNSTABLE,    Label::Uncertain),
    ClassificationRow::new(STEADY,        Medium, UNSTABLE,    Label::Fluctuating),
    ClassificationRow::new(UP,            Medium, UNSTABLE,    Label::Disrupted),
    ClassificationRow::new(DRIFT_UNKNOWN, Medium, UNSTABLE,    Label::Uncertain),
    ClassificationRow::new(DOWN,          Medium, VAR_UNKNOWN, Label::Improving),
    ClassificationRow::new(STEADY,        Medium, VAR_UNKNOWN, Label::OnTrack),
    ClassificationRow::new(UP,            Medium, VAR_UNKNOWN, Label::Delaying),
    ClassificationRow::new(DRIFT_UNKNOWN, Medium, VAR_UNKNOWN, Label::Initializing),
    // LOW confidence
    ClassificationRow::new(DOWN,          Low,    STABLE,      Label::Uncertain),
    ClassificationRow::new(STEADY,        Low,    STABLE,      Label::Uncertain),
    ClassificationRow::new(UP,            Low,    STABLE,      Label::Unreliable),
    ClassificationRow::new(DRIFT_UNKNOWN, Low,    STABLE,      Label::Uncertain),
    ClassificationRow::new(DOWN,          Low,    UNSTABLE,    Label::Uncertain),
    ClassificationRow::new(STEADY,        Low,    UNSTABLE,    Label::Unreliable),
    ClassificationRow::new(UP,            Low,    UNSTABLE,    Label::Unreliable),
    ClassificationRow::new(DRIFT_UNKNOWN, Low,    UNSTABLE,    Label::Unreliable),
    ClassificationRow::new(DOWN,          Low,    VAR_UNKNOWN, Label::Uncertain),
    ClassificationRow::new(STEADY,        Low,    VAR_UNKNOWN, Label::Uncertain),
    ClassificationRow::new(UP,            Low,    VAR_UNKNOWN, Label::Unreliable),
    ClassificationRow::new(DRIFT_UNKNOWN, Low,    VAR_UNKNOWN, Label::Initializing),
];

/// Classifier backed by a static lookup table
#[derive(Debug, Clone)]
pub struct TableClassifier {
    name: String,
    rows: &'static [ClassificationRow],
}

impl TableClassifier {
    /// Classifier over the standard table
    pub fn new() -> Self {
        Self::with_rows("table", &CLASSIFICATION_TABLE)
    }

    /// Classifier over a custom table; unmatched signals fall back
    pub fn with_rows(name: impl Into<String>, rows: &'static [ClassificationRow]) -> Self {
        Self {
            name: name.into(),
            rows,
        }
    }
}

impl Default for TableClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl Classifier for TableClassifier {
    fn classify(&self, signal: Signal) -> Classification {
        match self.rows.iter().find(|row| row.matches(&signal)) {
            Some(row) => Classification::new(row.label),
            None => {
                tracing::warn!(
                    classifier = %self.name,
                    drift = %signal.drift,
                    confidence = %signal.confidence,
                    stability = %signal.stability,
                    "no classification row for signal, using fallback"
                );
                Classification::fallback()
            }
        }
    }

    fn name(&self) -> &str {
        &self.name
    }
}
