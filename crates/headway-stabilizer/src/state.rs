//! Per-entity hysteresis state

use headway_core::{Label, Timestamp};
use serde::{Deserialize, Serialize};

/// Hysteresis record for one tracked entity
///
/// Created empty the first time an entity is seen and mutated only by
/// [`Stabilizer::resolve`](crate::Stabilizer::resolve). A record has a single
/// writer; callers sharing one across tasks must serialize access.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StabilizerState {
    current_label: Option<Label>,
    candidate_label: Option<Label>,
    candidate_count: u32,
    last_change_ts: Option<Timestamp>,
}

impl StabilizerState {
    /// An empty state (no label shown yet)
    pub fn new() -> Self {
        Self::default()
    }

    /// A state already showing `label` since `since`
    pub fn showing(label: Label, since: Timestamp) -> Self {
        Self {
            current_label: Some(label),
            candidate_label: None,
            candidate_count: 0,
            last_change_ts: Some(since),
        }
    }

    /// Label currently displayed
    pub fn current_label(&self) -> Option<Label> {
        self.current_label
    }

    /// Downgrade candidate being accumulated
    pub fn candidate_label(&self) -> Option<Label> {
        self.candidate_label
    }

    /// Consecutive polls supporting the candidate
    pub fn candidate_count(&self) -> u32 {
        self.candidate_count
    }

    /// When the displayed label last changed severity
    pub fn last_change_ts(&self) -> Option<Timestamp> {
        self.last_change_ts
    }

    /// Record one more poll supporting `candidate`, returning the new count
    pub(crate) fn track_candidate(&mut self, candidate: Label) -> u32 {
        if self.candidate_label == Some(candidate) {
            self.candidate_count = self.candidate_count.saturating_add(1);
        } else {
            self.candidate_label = Some(candidate);
            self.candidate_count = 1;
        }
        self.candidate_count
    }

    /// Show `label`; `at` restarts the hold clock when given
    pub(crate) fn accept(&mut self, label: Label, at: Option<Timestamp>) {
        self.current_label = Some(label);
        if let Some(ts) = at {
            self.last_change_ts = Some(ts);
        }
        self.candidate_label = None;
        self.candidate_count = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_new_state_is_cold() {
        let state = StabilizerState::new();
        assert_eq!(state.current_label(), None);
        assert_eq!(state.candidate_label(), None);
        assert_eq!(state.candidate_count(), 0);
        assert_eq!(state.last_change_ts(), None);
    }

    #[test]
    fn test_track_candidate_resets_on_identity_change() {
        let mut state = StabilizerState::new();
        assert_eq!(state.track_candidate(Label::Okay), 1);
        assert_eq!(state.track_candidate(Label::Okay), 2);
        assert_eq!(state.track_candidate(Label::Reliable), 1);
        assert_eq!(state.candidate_label(), Some(Label::Reliable));
    }

    #[test]
    fn test_accept_clears_candidate() {
        let t0 = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
        let t1 = Utc.timestamp_opt(1_700_000_030, 0).unwrap();
        let mut state = StabilizerState::showing(Label::Slowing, t0);
        state.track_candidate(Label::Okay);

        state.accept(Label::Delaying, None);
        assert_eq!(state.current_label(), Some(Label::Delaying));
        assert_eq!(state.last_change_ts(), Some(t0));
        assert_eq!(state.candidate_label(), None);
        assert_eq!(state.candidate_count(), 0);

        state.accept(Label::Okay, Some(t1));
        assert_eq!(state.last_change_ts(), Some(t1));
    }
}
