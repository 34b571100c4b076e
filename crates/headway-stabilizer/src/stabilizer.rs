//! Hysteresis resolution
//!
//! Worse news is shown immediately. Same-severity relabels are shown
//! immediately but leave the hold clock alone. Improvements wait for both a
//! minimum hold on the current severity and a run of consecutive confirming
//! polls, and then move down exactly one severity rank.

use headway_core::{Label, Result, Timestamp, Transition};
use serde::Serialize;
use std::cmp::Ordering;

use crate::config::StabilizerConfig;
use crate::state::StabilizerState;

/// Outcome of resolving one poll
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Resolution {
    /// Label to display
    pub label: Label,

    /// What the stabilizer decided
    pub transition: Transition,

    /// Label displayed before this poll
    pub previous: Option<Label>,
}

/// Per-entity hysteresis state machine
#[derive(Debug, Clone, Default)]
pub struct Stabilizer {
    config: StabilizerConfig,
}

impl Stabilizer {
    /// Create a stabilizer with validated parameters
    pub fn new(config: StabilizerConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Resolve `candidate` against `state` and return the label to display
    pub fn resolve(&self, state: &mut StabilizerState, candidate: Label, now: Timestamp) -> Label {
        self.resolve_detailed(state, candidate, now).label
    }

    /// Resolve `candidate` against `state`, reporting which rule applied
    pub fn resolve_detailed(
        &self,
        state: &mut StabilizerState,
        candidate: Label,
        now: Timestamp,
    ) -> Resolution {
        let Some(current) = state.current_label() else {
            state.accept(candidate, Some(now));
            return Resolution {
                label: candidate,
                transition: Transition::Initial,
                previous: None,
            };
        };

        let transition = match candidate.severity().cmp(&current.severity()) {
            Ordering::Greater => {
                state.accept(candidate, Some(now));
                Transition::Escalated
            }
            Ordering::Equal => {
                state.accept(candidate, None);
                Transition::Lateral
            }
            Ordering::Less => self.consider_downgrade(state, current, candidate, now),
        };

        Resolution {
            label: state.current_label().unwrap_or(current),
            transition,
            previous: Some(current),
        }
    }

    fn consider_downgrade(
        &self,
        state: &mut StabilizerState,
        current: Label,
        candidate: Label,
        now: Timestamp,
    ) -> Transition {
        let count = state.track_candidate(candidate);

        // candidate < current, so current is never at the bottom rank
        let Some(target) = current.severity().step_down() else {
            return Transition::Held;
        };

        let held_ms = state
            .last_change_ts()
            .map_or(0, |since| (now - since).num_milliseconds());
        let required = self.config.confirmations_for(target);

        if held_ms < self.config.hold_millis(current.severity()) || count < required {
            tracing::trace!(
                current = %current,
                candidate = %candidate,
                count,
                required,
                held_ms,
                "downgrade pending"
            );
            return Transition::Held;
        }

        let next = if candidate.severity() == target {
            candidate
        } else {
            self.config.default_label(target)
        };
        state.accept(next, Some(now));
        Transition::Downgraded
    }
}

/// Resolve with the standard parameters
pub fn resolve(state: &mut StabilizerState, candidate: Label, now: Timestamp) -> Label {
    Stabilizer::default().resolve(state, candidate, now)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};

    fn t0() -> Timestamp {
        Utc.timestamp_opt(1_700_000_000, 0).unwrap()
    }

    fn at(secs: i64) -> Timestamp {
        t0() + Duration::seconds(secs)
    }

    #[test]
    fn test_cold_start_adopts_candidate() {
        let mut state = StabilizerState::new();
        let result = Stabilizer::default().resolve_detailed(&mut state, Label::Fluctuating, t0());

        assert_eq!(result.label, Label::Fluctuating);
        assert_eq!(result.transition, Transition::Initial);
        assert_eq!(result.previous, None);
        assert_eq!(state.current_label(), Some(Label::Fluctuating));
        assert_eq!(state.last_change_ts(), Some(t0()));
        assert_eq!(state.candidate_count(), 0);
    }

    #[test]
    fn test_escalation_is_immediate() {
        let mut state = StabilizerState::showing(Label::OnTrack, t0());
        let result = Stabilizer::default().resolve_detailed(&mut state, Label::Disrupted, at(1));

        assert_eq!(result.label, Label::Disrupted);
        assert_eq!(result.transition, Transition::Escalated);
        assert_eq!(result.previous, Some(Label::OnTrack));
        assert_eq!(state.last_change_ts(), Some(at(1)));
    }

    #[test]
    fn test_escalation_clears_pending_candidate() {
        let stabilizer = Stabilizer::default();
        let mut state = StabilizerState::showing(Label::Slowing, t0());

        stabilizer.resolve(&mut state, Label::OnTrack, at(1));
        assert_eq!(state.candidate_count(), 1);

        stabilizer.resolve(&mut state, Label::Unreliable, at(2));
        assert_eq!(state.candidate_label(), None);
        assert_eq!(state.candidate_count(), 0);
    }

    #[test]
    fn test_lateral_swap_keeps_hold_clock() {
        let mut state = StabilizerState::showing(Label::Slowing, t0());
        let result = Stabilizer::default().resolve_detailed(&mut state, Label::Delaying, at(5));

        assert_eq!(result.label, Label::Delaying);
        assert_eq!(result.transition, Transition::Lateral);
        assert_eq!(state.last_change_ts(), Some(t0()));
    }

    #[test]
    fn test_single_step_from_severe() {
        let stabilizer = Stabilizer::default();
        let mut state = StabilizerState::showing(Label::Disrupted, t0());

        assert_eq!(stabilizer.resolve(&mut state, Label::Reliable, at(1)), Label::Disrupted);
        assert_eq!(stabilizer.resolve(&mut state, Label::Reliable, at(2)), Label::Delaying);
    }

    #[test]
    fn test_downgrade_to_candidate_when_one_rank_below() {
        let stabilizer = Stabilizer::default();
        let mut state = StabilizerState::showing(Label::Unreliable, t0());

        assert_eq!(stabilizer.resolve(&mut state, Label::Slowing, at(1)), Label::Unreliable);
        assert_eq!(stabilizer.resolve(&mut state, Label::Slowing, at(2)), Label::Slowing);
    }

    #[test]
    fn test_hold_time_blocks_downgrade() {
        let stabilizer = Stabilizer::default();
        let mut state = StabilizerState::showing(Label::Okay, t0());

        // confirmations are met by the second poll; the 90s hold is not
        for secs in [30, 45, 59] {
            let result = stabilizer.resolve_detailed(&mut state, Label::Estimating, at(secs));
            assert_eq!(result.label, Label::Okay);
            assert_eq!(result.transition, Transition::Held);
        }
        assert_eq!(state.candidate_count(), 3);

        let result = stabilizer.resolve_detailed(&mut state, Label::Estimating, at(90));
        assert_eq!(result.label, Label::Estimating);
        assert_eq!(result.transition, Transition::Downgraded);
        assert_eq!(state.last_change_ts(), Some(at(90)));
    }

    #[test]
    fn test_candidate_identity_change_restarts_count() {
        let stabilizer = Stabilizer::default();
        let mut state = StabilizerState::showing(Label::Unreliable, t0());

        // confirmations for entering severity 2 is 2; alternating never gets there
        assert_eq!(stabilizer.resolve(&mut state, Label::Okay, at(1)), Label::Unreliable);
        assert_eq!(stabilizer.resolve(&mut state, Label::Reliable, at(2)), Label::Unreliable);
        assert_eq!(state.candidate_count(), 1);
        assert_eq!(stabilizer.resolve(&mut state, Label::Okay, at(3)), Label::Unreliable);
        assert_eq!(stabilizer.resolve(&mut state, Label::Okay, at(4)), Label::Delaying);
    }

    #[test]
    fn test_backwards_clock_never_satisfies_hold() {
        let stabilizer = Stabilizer::default();
        let mut state = StabilizerState::showing(Label::Unreliable, t0());

        stabilizer.resolve(&mut state, Label::Slowing, at(-10));
        let result = stabilizer.resolve_detailed(&mut state, Label::Slowing, at(-5));
        assert_eq!(result.transition, Transition::Held);
    }

    #[test]
    fn test_confirmations_counted_for_target_severity() {
        let stabilizer = Stabilizer::new(StabilizerConfig {
            hold_secs: [0, 0, 0, 0],
            confirmations: [5, 1, 1, 1],
            ..StabilizerConfig::default()
        })
        .unwrap();
        let mut state = StabilizerState::showing(Label::Delaying, t0());

        // ESTIMATING sits two ranks below, so the step enters severity 1
        let result = stabilizer.resolve_detailed(&mut state, Label::Estimating, at(1));
        assert_eq!(result.label, Label::Okay);
        assert_eq!(result.transition, Transition::Downgraded);

        // Entering severity 0 takes the five confirmations of that rank
        for secs in 2..6 {
            assert_eq!(stabilizer.resolve(&mut state, Label::Estimating, at(secs)), Label::Okay);
        }
        assert_eq!(stabilizer.resolve(&mut state, Label::Estimating, at(6)), Label::Estimating);
    }

    #[test]
    fn test_free_function_uses_defaults() {
        let mut state = StabilizerState::new();
        assert_eq!(resolve(&mut state, Label::OnTrack, t0()), Label::OnTrack);
        assert_eq!(resolve(&mut state, Label::Slowing, at(1)), Label::Slowing);
    }
}
