//! Recorded poll sequences
//!
//! A scenario lists polls in playback order. Each poll names the entity
//! (`STOP:SERVICE`), when it happened, and either the raw signal triple or an
//! already classified `label`. A poll with `forget: true` drops the entity,
//! as if it had scrolled off the board.
//!
//! ```yaml
//! start: 2024-05-01T08:00:00Z
//! polls:
//!   - { entity: "83139:15", at: 0, drift: UP, confidence: HIGH, stability: UNSTABLE }
//!   - { entity: "83139:15", at: 30, label: OKAY }
//!   - { entity: "83139:15", at: 60, forget: true }
//! ```

use chrono::{DateTime, Duration};
use headway_core::{
    Confidence, Drift, EntityKey, Error, Label, Result, Signal, Stability, Timestamp,
};
use serde::Deserialize;
use std::path::Path;

/// A scenario file as written
#[derive(Debug, Clone, Deserialize)]
pub struct Scenario {
    /// Base instant for offset times
    #[serde(default = "default_start")]
    pub start: Timestamp,

    /// Polls in playback order
    pub polls: Vec<Poll>,
}

/// When a poll happened
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(untagged)]
pub enum PollTime {
    /// Seconds after the scenario start
    Offset(i64),
    /// Absolute instant
    Instant(Timestamp),
}

/// One recorded poll
#[derive(Debug, Clone, Deserialize)]
pub struct Poll {
    pub entity: String,
    pub at: PollTime,
    pub drift: Option<Drift>,
    pub confidence: Option<Confidence>,
    pub stability: Option<Stability>,
    pub label: Option<Label>,
    #[serde(default)]
    pub forget: bool,
}

/// What a resolved step feeds the tracker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepInput {
    Signal(Signal),
    Label(Label),
    Forget,
}

/// A validated poll ready for playback
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScenarioStep {
    pub index: usize,
    pub entity: EntityKey,
    pub at: Timestamp,
    pub input: StepInput,
}

impl Scenario {
    /// Parse a scenario from YAML
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Load a scenario file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Validate every poll and resolve its time and input
    pub fn steps(&self) -> Result<Vec<ScenarioStep>> {
        self.polls
            .iter()
            .enumerate()
            .map(|(index, poll)| poll.resolve(index, self.start))
            .collect()
    }
}

impl Poll {
    fn resolve(&self, index: usize, start: Timestamp) -> Result<ScenarioStep> {
        let entity = self
            .entity
            .parse::<EntityKey>()
            .map_err(|e| Error::scenario(format!("poll {index}: {e}")))?;

        let at = match self.at {
            PollTime::Offset(secs) => Duration::try_seconds(secs)
                .and_then(|offset| start.checked_add_signed(offset))
                .ok_or_else(|| Error::scenario(format!("poll {index}: offset {secs}s out of range")))?,
            PollTime::Instant(ts) => ts,
        };

        let has_signal = self.drift.is_some() || self.confidence.is_some() || self.stability.is_some();
        let input = match (self.forget, self.label, has_signal) {
            (true, None, false) => StepInput::Forget,
            (false, Some(label), false) => StepInput::Label(label),
            (false, None, true) => match (self.drift, self.confidence, self.stability) {
                (Some(drift), Some(confidence), Some(stability)) => {
                    StepInput::Signal(Signal::new(drift, confidence, stability))
                }
                _ => {
                    return Err(Error::scenario(format!(
                        "poll {index}: drift, confidence and stability must be given together"
                    )))
                }
            },
            (false, None, false) => {
                return Err(Error::scenario(format!(
                    "poll {index}: needs a signal, a label, or forget"
                )))
            }
            _ => {
                return Err(Error::scenario(format!(
                    "poll {index}: signal, label and forget are mutually exclusive"
                )))
            }
        };

        Ok(ScenarioStep {
            index,
            entity,
            at,
            input,
        })
    }
}

fn default_start() -> Timestamp {
    DateTime::UNIX_EPOCH
}
