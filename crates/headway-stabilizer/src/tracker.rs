//! Tracking of many entities at once
//!
//! One [`StabilizerState`] per [`EntityKey`], created lazily on the first
//! poll and discarded once the entity is no longer displayed.

use headway_classifier::{Classifier, TableClassifier};
use headway_core::{ColorHint, EntityKey, Label, Severity, Signal, Timestamp, Transition};
use headway_telemetry::MetricsCollector;
use parking_lot::Mutex;
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::{debug, info};

use crate::stabilizer::Stabilizer;
use crate::state::StabilizerState;

/// Tracker shared between polling tasks; the mutex serializes writers
pub type SharedTracker = Arc<Mutex<StatusTracker>>;

/// What the rendering layer should show for one entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DisplayStatus {
    /// Stable label to display
    pub label: Label,

    /// Color hint for `label`
    pub color: ColorHint,

    /// Severity of `label`
    pub severity: Severity,

    /// Raw candidate this poll classified to
    pub candidate: Label,

    /// What the stabilizer decided
    pub transition: Transition,
}

/// Classifier plus per-entity stabilizer states
pub struct StatusTracker {
    classifier: Arc<dyn Classifier>,
    stabilizer: Stabilizer,
    states: HashMap<EntityKey, StabilizerState>,
    metrics: MetricsCollector,
}

impl StatusTracker {
    /// Create a tracker using the standard classification table
    pub fn new(stabilizer: Stabilizer) -> Self {
        Self::with_classifier(stabilizer, Arc::new(TableClassifier::new()))
    }

    /// Create a tracker with a custom classifier
    pub fn with_classifier(stabilizer: Stabilizer, classifier: Arc<dyn Classifier>) -> Self {
        Self {
            classifier,
            stabilizer,
            states: HashMap::new(),
            metrics: MetricsCollector::new(),
        }
    }

    /// Report into an existing metrics collector
    pub fn with_metrics(mut self, metrics: MetricsCollector) -> Self {
        self.metrics = metrics;
        self
    }

    /// Wrap the tracker for use from several tasks
    pub fn into_shared(self) -> SharedTracker {
        Arc::new(Mutex::new(self))
    }

    /// Classify a raw signal and resolve it for `key`
    pub fn observe(&mut self, key: &EntityKey, signal: Signal, now: Timestamp) -> DisplayStatus {
        let classification = self.classifier.classify(signal);
        if classification.fallback {
            self.metrics.record_fallback();
        }
        self.observe_label(key, classification.label, now)
    }

    /// Resolve an already classified candidate for `key`
    pub fn observe_label(&mut self, key: &EntityKey, candidate: Label, now: Timestamp) -> DisplayStatus {
        let state = self.states.entry(key.clone()).or_default();
        let resolution = self.stabilizer.resolve_detailed(state, candidate, now);
        self.metrics.record_transition(resolution.transition);

        if resolution.transition.is_change() && resolution.previous != Some(resolution.label) {
            debug!(
                entity = %key,
                from = ?resolution.previous,
                to = %resolution.label,
                transition = %resolution.transition,
                "display label changed"
            );
        }

        DisplayStatus {
            label: resolution.label,
            color: resolution.label.color(),
            severity: resolution.label.severity(),
            candidate,
            transition: resolution.transition,
        }
    }

    /// Label currently displayed for `key`
    pub fn current(&self, key: &EntityKey) -> Option<Label> {
        self.states.get(key).and_then(StabilizerState::current_label)
    }

    /// Hysteresis state for `key`
    pub fn state(&self, key: &EntityKey) -> Option<&StabilizerState> {
        self.states.get(key)
    }

    /// Drop the state for one entity
    pub fn forget(&mut self, key: &EntityKey) -> bool {
        let removed = self.states.remove(key).is_some();
        if removed {
            self.metrics.record_evictions(1);
        }
        removed
    }

    /// Keep only the given entities, returning how many were evicted
    pub fn retain<'a>(&mut self, keys: impl IntoIterator<Item = &'a EntityKey>) -> usize {
        let keep: HashSet<&EntityKey> = keys.into_iter().collect();
        let before = self.states.len();
        self.states.retain(|key, _| keep.contains(key));

        let evicted = before - self.states.len();
        if evicted > 0 {
            info!(evicted, remaining = self.states.len(), "evicted untracked entities");
            self.metrics.record_evictions(evicted as u64);
        }
        evicted
    }

    /// Tracked entity keys
    pub fn entities(&self) -> impl Iterator<Item = &EntityKey> {
        self.states.keys()
    }

    /// Number of tracked entities
    pub fn len(&self) -> usize {
        self.states.len()
    }

    /// Whether no entity is tracked
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Metrics for this tracker
    pub fn metrics(&self) -> &MetricsCollector {
        &self.metrics
    }
}

impl Default for StatusTracker {
    fn default() -> Self {
        Self::new(Stabilizer::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};
    use headway_core::{Confidence, Drift, Stability};

    fn at(secs: i64) -> Timestamp {
        Utc.timestamp_opt(1_700_000_000, 0).unwrap() + Duration::seconds(secs)
    }

    fn signal(drift: Drift, confidence: Confidence, stability: Stability) -> Signal {
        Signal::new(drift, confidence, stability)
    }

    #[test]
    fn test_observe_classifies_and_stabilizes() {
        let mut tracker = StatusTracker::default();
        let key = EntityKey::new("83139", "15");

        let status = tracker.observe(&key, signal(Drift::Up, Confidence::High, Stability::Unstable), at(0));
        assert_eq!(status.label, Label::Disrupted);
        assert_eq!(status.color, ColorHint::Red);
        assert_eq!(status.severity, Severity::SEVERE);
        assert_eq!(status.transition, Transition::Initial);

        let status = tracker.observe(&key, signal(Drift::Stable, Confidence::High, Stability::Stable), at(30));
        assert_eq!(status.candidate, Label::OnTrack);
        assert_eq!(status.label, Label::Disrupted);
        assert_eq!(status.transition, Transition::Held);

        let status = tracker.observe(&key, signal(Drift::Stable, Confidence::High, Stability::Stable), at(60));
        assert_eq!(status.label, Label::Delaying);
        assert_eq!(status.transition, Transition::Downgraded);
        assert_eq!(tracker.current(&key), Some(Label::Delaying));
    }

    #[test]
    fn test_entities_are_independent() {
        let mut tracker = StatusTracker::default();
        let a = EntityKey::new("83139", "15");
        let b = EntityKey::new("83139", "155");

        tracker.observe_label(&a, Label::Unreliable, at(0));
        tracker.observe_label(&b, Label::OnTrack, at(0));
        tracker.observe_label(&a, Label::Okay, at(1));

        assert_eq!(tracker.current(&a), Some(Label::Unreliable));
        assert_eq!(tracker.current(&b), Some(Label::OnTrack));
        assert_eq!(tracker.state(&b).map(|s| s.candidate_count()), Some(0));
        assert_eq!(tracker.len(), 2);
    }

    #[test]
    fn test_retain_evicts_untracked() {
        let mut tracker = StatusTracker::default();
        let keys: Vec<EntityKey> = (1..=3).map(|n| EntityKey::new("10009", n.to_string())).collect();
        for key in &keys {
            tracker.observe_label(key, Label::OnTrack, at(0));
        }

        let evicted = tracker.retain(&keys[..1]);
        assert_eq!(evicted, 2);
        assert_eq!(tracker.len(), 1);
        assert_eq!(tracker.current(&keys[1]), None);
        assert_eq!(tracker.metrics().snapshot().evictions, 2);

        assert!(tracker.forget(&keys[0]));
        assert!(!tracker.forget(&keys[0]));
        assert!(tracker.is_empty());
    }

    #[test]
    fn test_forgotten_entity_cold_starts() {
        let mut tracker = StatusTracker::default();
        let key = EntityKey::new("10009", "7");

        tracker.observe_label(&key, Label::Disrupted, at(0));
        tracker.forget(&key);

        let status = tracker.observe_label(&key, Label::Reliable, at(1));
        assert_eq!(status.transition, Transition::Initial);
        assert_eq!(status.label, Label::Reliable);
    }

    #[test]
    fn test_metrics_count_transitions() {
        let mut tracker = StatusTracker::default();
        let key = EntityKey::new("10009", "7");

        tracker.observe_label(&key, Label::OnTrack, at(0));
        tracker.observe_label(&key, Label::Reliable, at(30));
        tracker.observe_label(&key, Label::Slowing, at(60));
        tracker.observe_label(&key, Label::OnTrack, at(90));

        let snapshot = tracker.metrics().snapshot();
        assert_eq!(snapshot.observations, 4);
        assert_eq!(snapshot.initial, 1);
        assert_eq!(snapshot.lateral, 1);
        assert_eq!(snapshot.escalated, 1);
        assert_eq!(snapshot.held, 1);
    }

    #[test]
    fn test_shared_tracker_serializes_access() {
        let shared = StatusTracker::default().into_shared();
        let key = EntityKey::new("10009", "7");

        let handles: Vec<_> = (0..4)
            .map(|i| {
                let shared = Arc::clone(&shared);
                let key = key.clone();
                std::thread::spawn(move || {
                    shared.lock().observe_label(&key, Label::OnTrack, at(i));
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let tracker = shared.lock();
        assert_eq!(tracker.metrics().snapshot().observations, 4);
        assert_eq!(tracker.current(&key), Some(Label::OnTrack));
    }
}
