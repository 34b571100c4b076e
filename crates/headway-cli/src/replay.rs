//! Scenario playback through a status tracker

use headway_core::{EntityKey, Error, Label, Result, Timestamp};
use headway_stabilizer::{DisplayStatus, StatusTracker};
use serde::Serialize;
use std::fmt;
use std::time::Duration;

use crate::scenario::{ScenarioStep, StepInput};

/// Result of playing one step
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReplayLine {
    pub index: usize,
    pub entity: EntityKey,
    pub at: Timestamp,
    #[serde(flatten)]
    pub status: Option<DisplayStatus>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub forgotten: bool,
}

/// Play one step against `tracker`
pub fn apply(tracker: &mut StatusTracker, step: &ScenarioStep) -> ReplayLine {
    let status = match step.input {
        StepInput::Signal(signal) => Some(tracker.observe(&step.entity, signal, step.at)),
        StepInput::Label(label) => Some(tracker.observe_label(&step.entity, label, step.at)),
        StepInput::Forget => {
            tracker.forget(&step.entity);
            None
        }
    };

    ReplayLine {
        index: step.index,
        entity: step.entity.clone(),
        at: step.at,
        status,
        forgotten: status.is_none(),
    }
}

/// Play every step in order
pub fn replay(tracker: &mut StatusTracker, steps: &[ScenarioStep]) -> Vec<ReplayLine> {
    steps.iter().map(|step| apply(tracker, step)).collect()
}

/// Final label per entity after playback, sorted by entity
pub fn final_labels(tracker: &StatusTracker) -> Vec<(EntityKey, Label)> {
    let mut labels: Vec<(EntityKey, Label)> = tracker
        .entities()
        .filter_map(|key| tracker.current(key).map(|label| (key.clone(), label)))
        .collect();
    labels.sort_by(|a, b| a.0.cmp(&b.0));
    labels
}

/// Wall-clock wait between two polls `gap` apart when playing at `speed`
///
/// Polls that go back in time are played without waiting.
pub fn pacing_delay(gap: chrono::Duration, speed: f64) -> Result<Duration> {
    let gap = gap.to_std().unwrap_or_default();
    Duration::try_from_secs_f64(gap.as_secs_f64() / speed).map_err(|e| {
        Error::config(format!(
            "cannot pace a {}s gap at speed {speed}: {e}",
            gap.as_secs_f64()
        ))
    })
}

impl fmt::Display for ReplayLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let time = self.at.format("%H:%M:%S");
        match &self.status {
            Some(status) => write!(
                f,
                "{:>4}  {}  {:<14} {:<12} -> {:<12} {:<10} {}",
                self.index,
                time,
                self.entity.to_string(),
                status.candidate.as_str(),
                status.label.as_str(),
                status.transition.as_str(),
                status.color.hex(),
            ),
            None => write!(
                f,
                "{:>4}  {}  {:<14} (forgotten)",
                self.index,
                time,
                self.entity.to_string()
            ),
        }
    }
}
