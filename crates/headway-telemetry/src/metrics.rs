//! Metrics collection and reporting

use headway_core::Transition;
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Name of the facade counter for stabilizer decisions
pub const TRANSITIONS_TOTAL: &str = "headway_transitions_total";

/// Name of the facade counter for classifier fallbacks
pub const FALLBACKS_TOTAL: &str = "headway_classifier_fallbacks_total";

/// Name of the facade counter for evicted entity states
pub const EVICTIONS_TOTAL: &str = "headway_evictions_total";

/// Metrics collector for stabilizer decisions
#[derive(Clone)]
pub struct MetricsCollector {
    inner: Arc<MetricsInner>,
}

#[derive(Default)]
struct MetricsInner {
    observations: AtomicU64,
    initial: AtomicU64,
    escalated: AtomicU64,
    lateral: AtomicU64,
    downgraded: AtomicU64,
    held: AtomicU64,
    fallbacks: AtomicU64,
    evictions: AtomicU64,
}

impl MetricsCollector {
    /// Create a new metrics collector
    pub fn new() -> Self {
        Self {
            inner: Arc::new(MetricsInner::default()),
        }
    }

    /// Describe the facade counters to the installed recorder
    pub fn describe() {
        ::metrics::describe_counter!(
            TRANSITIONS_TOTAL,
            "Stabilizer decisions by transition kind"
        );
        ::metrics::describe_counter!(
            FALLBACKS_TOTAL,
            "Signals that had no classification row"
        );
        ::metrics::describe_counter!(
            EVICTIONS_TOTAL,
            "Entity states discarded because the entity is no longer tracked"
        );
    }

    /// Record one resolved poll
    pub fn record_transition(&self, transition: Transition) {
        self.inner.observations.fetch_add(1, Ordering::Relaxed);

        let counter = match transition {
            Transition::Initial => &self.inner.initial,
            Transition::Escalated => &self.inner.escalated,
            Transition::Lateral => &self.inner.lateral,
            Transition::Downgraded => &self.inner.downgraded,
            Transition::Held => &self.inner.held,
        };
        counter.fetch_add(1, Ordering::Relaxed);

        ::metrics::counter!(TRANSITIONS_TOTAL, "kind" => transition.as_str()).increment(1);
    }

    /// Record a classifier fallback
    pub fn record_fallback(&self) {
        self.inner.fallbacks.fetch_add(1, Ordering::Relaxed);
        ::metrics::counter!(FALLBACKS_TOTAL).increment(1);
    }

    /// Record discarded entity states
    pub fn record_evictions(&self, count: u64) {
        if count == 0 {
            return;
        }
        self.inner.evictions.fetch_add(count, Ordering::Relaxed);
        ::metrics::counter!(EVICTIONS_TOTAL).increment(count);
    }

    /// Get current metrics snapshot
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            observations: self.inner.observations.load(Ordering::Relaxed),
            initial: self.inner.initial.load(Ordering::Relaxed),
            escalated: self.inner.escalated.load(Ordering::Relaxed),
            lateral: self.inner.lateral.load(Ordering::Relaxed),
            downgraded: self.inner.downgraded.load(Ordering::Relaxed),
            held: self.inner.held.load(Ordering::Relaxed),
            fallbacks: self.inner.fallbacks.load(Ordering::Relaxed),
            evictions: self.inner.evictions.load(Ordering::Relaxed),
        }
    }
}

impl Default for MetricsCollector {
    fn default() -> Self {
        Self::new()
    }
}

/// Snapshot of current metrics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub observations: u64,
    pub initial: u64,
    pub escalated: u64,
    pub lateral: u64,
    pub downgraded: u64,
    pub held: u64,
    pub fallbacks: u64,
    pub evictions: u64,
}

impl MetricsSnapshot {
    /// Count for one transition kind
    pub fn count(&self, transition: Transition) -> u64 {
        match transition {
            Transition::Initial => self.initial,
            Transition::Escalated => self.escalated,
            Transition::Lateral => self.lateral,
            Transition::Downgraded => self.downgraded,
            Transition::Held => self.held,
        }
    }

    /// Fraction of polls where the displayed label was allowed to change
    pub fn change_rate(&self) -> f64 {
        if self.observations == 0 {
            0.0
        } else {
            (self.observations - self.held) as f64 / self.observations as f64
        }
    }

    /// Fraction of polls that were held back
    pub fn hold_rate(&self) -> f64 {
        if self.observations == 0 {
            0.0
        } else {
            self.held as f64 / self.observations as f64
        }
    }
}
