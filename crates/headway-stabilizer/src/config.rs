//! Stabilizer parameters
//!
//! All tables are indexed by severity rank (0 calmest, 3 most severe).

use headway_core::{Error, Label, Result, Severity};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Seconds a label must have been shown before a downgrade *from* its
/// severity can be accepted
pub const DEFAULT_HOLD_SECS: [u64; Severity::COUNT] = [60, 90, 30, 0];

/// Consecutive confirming polls required to enter a severity on a downgrade
pub const DEFAULT_CONFIRMATIONS: [u32; Severity::COUNT] = [2, 3, 2, 1];

/// Label shown when stepping down to a severity the candidate is not at
pub const DEFAULT_LABELS: [Label; Severity::COUNT] = [
    Label::Estimating,
    Label::Okay,
    Label::Delaying,
    Label::Unreliable,
];

/// Hysteresis parameters for the stabilizer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StabilizerConfig {
    /// Minimum hold time per current severity (seconds)
    #[serde(default = "default_hold_secs")]
    pub hold_secs: [u64; Severity::COUNT],

    /// Confirmations required to enter each severity
    #[serde(default = "default_confirmations")]
    pub confirmations: [u32; Severity::COUNT],

    /// Canonical label per severity
    #[serde(default = "default_labels")]
    pub default_labels: [Label; Severity::COUNT],
}

impl StabilizerConfig {
    /// Load a validated config from a YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a validated config from a YAML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Check that every table entry is usable
    pub fn validate(&self) -> Result<()> {
        for severity in Severity::ALL {
            let i = severity.index();

            if self.confirmations[i] == 0 {
                return Err(Error::config(format!(
                    "confirmations[{i}] must be at least 1"
                )));
            }

            // Millisecond arithmetic on the hold must not overflow
            if self.hold_secs[i] > i64::MAX as u64 / 1000 {
                return Err(Error::config(format!(
                    "hold_secs[{i}] = {} is out of range",
                    self.hold_secs[i]
                )));
            }

            let label = self.default_labels[i];
            if label.severity() != severity {
                return Err(Error::config(format!(
                    "default_labels[{i}] = {label} has severity {}, expected {i}",
                    label.severity()
                )));
            }
        }
        Ok(())
    }

    /// Minimum hold in milliseconds before leaving `current`
    pub fn hold_millis(&self, current: Severity) -> i64 {
        (self.hold_secs[current.index()] as i64).saturating_mul(1000)
    }

    /// Confirmations required to step down into `target`
    pub fn confirmations_for(&self, target: Severity) -> u32 {
        self.confirmations[target.index()]
    }

    /// Canonical label for `severity`
    pub fn default_label(&self, severity: Severity) -> Label {
        self.default_labels[severity.index()]
    }
}

impl Default for StabilizerConfig {
    fn default() -> Self {
        Self {
            hold_secs: DEFAULT_HOLD_SECS,
            confirmations: DEFAULT_CONFIRMATIONS,
            default_labels: DEFAULT_LABELS,
        }
    }
}

fn default_hold_secs() -> [u64; Severity::COUNT] {
    DEFAULT_HOLD_SECS
}

fn default_confirmations() -> [u32; Severity::COUNT] {
    DEFAULT_CONFIRMATIONS
}

fn default_labels() -> [Label; Severity::COUNT] {
    DEFAULT_LABELS
}
