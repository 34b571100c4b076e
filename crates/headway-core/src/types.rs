//! Core types for Headway

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// Wall-clock instant of a poll
pub type Timestamp = DateTime<Utc>;

/// Direction of change in an entity's estimated arrival trend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Drift {
    /// Arrival estimate is moving earlier
    Down,
    /// Arrival estimate is steady
    Stable,
    /// Arrival estimate is moving later
    Up,
    /// Not enough observations to tell
    Unknown,
}

impl Drift {
    pub const ALL: [Drift; 4] = [Self::Down, Self::Stable, Self::Up, Self::Unknown];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Down => "DOWN",
            Self::Stable => "STABLE",
            Self::Up => "UP",
            Self::Unknown => "UNKNOWN",
        }
    }
}

/// Trust level in the underlying arrival estimate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Confidence {
    High,
    Medium,
    Low,
}

impl Confidence {
    pub const ALL: [Confidence; 3] = [Self::High, Self::Medium, Self::Low];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::High => "HIGH",
            Self::Medium => "MEDIUM",
            Self::Low => "LOW",
        }
    }
}

/// Variance characteristic of recent observations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Stability {
    Stable,
    Unstable,
    Unknown,
}

impl Stability {
    pub const ALL: [Stability; 3] = [Self::Stable, Self::Unstable, Self::Unknown];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Stable => "STABLE",
            Self::Unstable => "UNSTABLE",
            Self::Unknown => "UNKNOWN",
        }
    }
}

/// Raw per-poll classification input for one tracked entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Signal {
    pub drift: Drift,
    pub confidence: Confidence,
    pub stability: Stability,
}

impl Signal {
    /// Create a new signal
    pub fn new(drift: Drift, confidence: Confidence, stability: Stability) -> Self {
        Self {
            drift,
            confidence,
            stability,
        }
    }

    /// Every possible signal, in drift-major order
    pub fn all() -> impl Iterator<Item = Signal> {
        Drift::ALL.into_iter().flat_map(|drift| {
            Confidence::ALL.into_iter().flat_map(move |confidence| {
                Stability::ALL
                    .into_iter()
                    .map(move |stability| Signal::new(drift, confidence, stability))
            })
        })
    }
}

/// Ordinal urgency rank of a label (0 calmest, 3 most severe)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Severity(u8);

impl Severity {
    /// Warm-up labels with no trend yet
    pub const QUIET: Severity = Severity(0);
    /// Normal service
    pub const NORMAL: Severity = Severity(1);
    /// Degrading or noisy service
    pub const ELEVATED: Severity = Severity(2);
    /// Service that cannot be trusted
    pub const SEVERE: Severity = Severity(3);

    /// Number of severity ranks
    pub const COUNT: usize = 4;

    /// All ranks, calmest first
    pub const ALL: [Severity; Self::COUNT] =
        [Self::QUIET, Self::NORMAL, Self::ELEVATED, Self::SEVERE];

    /// Index into per-severity lookup arrays
    pub fn index(self) -> usize {
        self.0 as usize
    }

    /// The next calmer rank, or `None` at the bottom
    pub fn step_down(self) -> Option<Self> {
        self.0.checked_sub(1).map(Severity)
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Representative color hint for a label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorHint {
    Grey,
    Green,
    Teal,
    Yellow,
    Amber,
    Orange,
    Red,
}

impl ColorHint {
    /// Hex RGB value the rendering layer can use directly
    pub fn hex(&self) -> &'static str {
        match self {
            Self::Grey => "#9E9E9E",
            Self::Green => "#2E7D32",
            Self::Teal => "#00897B",
            Self::Yellow => "#FBC02D",
            Self::Amber => "#FFA000",
            Self::Orange => "#EF6C00",
            Self::Red => "#C62828",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Grey => "grey",
            Self::Green => "green",
            Self::Teal => "teal",
            Self::Yellow => "yellow",
            Self::Amber => "amber",
            Self::Orange => "orange",
            Self::Red => "red",
        }
    }
}

/// User-facing status tag shown for a tracked bus
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Label {
    Initializing,
    Estimating,
    Reliable,
    OnTrack,
    Improving,
    Okay,
    Uncertain,
    Fluctuating,
    Slowing,
    Delaying,
    Disrupted,
    Unreliable,
}

impl Label {
    pub const ALL: [Label; 12] = [
        Self::Initializing,
        Self::Estimating,
        Self::Reliable,
        Self::OnTrack,
        Self::Improving,
        Self::Okay,
        Self::Uncertain,
        Self::Fluctuating,
        Self::Slowing,
        Self::Delaying,
        Self::Disrupted,
        Self::Unreliable,
    ];

    /// Urgency rank of this label
    pub fn severity(&self) -> Severity {
        match self {
            Self::Initializing | Self::Estimating => Severity::QUIET,
            Self::Reliable | Self::OnTrack | Self::Improving | Self::Okay | Self::Uncertain => {
                Severity::NORMAL
            }
            Self::Fluctuating | Self::Slowing | Self::Delaying => Severity::ELEVATED,
            Self::Disrupted | Self::Unreliable => Severity::SEVERE,
        }
    }

    /// Representative color for this label
    pub fn color(&self) -> ColorHint {
        match self {
            Self::Initializing | Self::Estimating => ColorHint::Grey,
            Self::Reliable | Self::OnTrack | Self::Okay => ColorHint::Green,
            Self::Improving => ColorHint::Teal,
            Self::Uncertain => ColorHint::Yellow,
            Self::Fluctuating => ColorHint::Amber,
            Self::Slowing | Self::Delaying => ColorHint::Orange,
            Self::Disrupted | Self::Unreliable => ColorHint::Red,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Initializing => "INITIALIZING",
            Self::Estimating => "ESTIMATING",
            Self::Reliable => "RELIABLE",
            Self::OnTrack => "ONTRACK",
            Self::Improving => "IMPROVING",
            Self::Okay => "OKAY",
            Self::Uncertain => "UNCERTAIN",
            Self::Fluctuating => "FLUCTUATING",
            Self::Slowing => "SLOWING",
            Self::Delaying => "DELAYING",
            Self::Disrupted => "DISRUPTED",
            Self::Unreliable => "UNRELIABLE",
        }
    }
}

/// Kind of decision the stabilizer took on one poll
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Transition {
    /// First observation of the entity
    Initial,
    /// Moved to a more severe label
    Escalated,
    /// Swapped to another label of the same severity
    Lateral,
    /// Accepted a one-rank downgrade
    Downgraded,
    /// Kept the current label (pending or absent downgrade)
    Held,
}

impl Transition {
    pub const ALL: [Transition; 5] = [
        Self::Initial,
        Self::Escalated,
        Self::Lateral,
        Self::Downgraded,
        Self::Held,
    ];

    /// Whether the displayed label may have changed
    pub fn is_change(&self) -> bool {
        !matches!(self, Self::Held)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Initial => "initial",
            Self::Escalated => "escalated",
            Self::Lateral => "lateral",
            Self::Downgraded => "downgraded",
            Self::Held => "held",
        }
    }
}

impl fmt::Display for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identity of one tracked bus service at one stop
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityKey {
    pub stop_code: String,
    pub service_no: String,
}

impl EntityKey {
    /// Create a new entity key
    pub fn new(stop_code: impl Into<String>, service_no: impl Into<String>) -> Self {
        Self {
            stop_code: stop_code.into(),
            service_no: service_no.into(),
        }
    }
}

impl fmt::Display for EntityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.stop_code, self.service_no)
    }
}

impl FromStr for EntityKey {
    type Err = Error;

    /// Parse `STOP:SERVICE`, e.g. `83139:15`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once(':') {
            Some((stop, service)) if !stop.is_empty() && !service.is_empty() => {
                Ok(Self::new(stop.trim(), service.trim()))
            }
            _ => Err(Error::invalid("entity key", s)),
        }
    }
}

macro_rules! display_from_str {
    ($ty:ty, $kind:literal) => {
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $ty {
            type Err = Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let s = s.trim();
                Self::ALL
                    .iter()
                    .copied()
                    .find(|v| v.as_str().eq_ignore_ascii_case(s))
                    .ok_or_else(|| Error::invalid($kind, s))
            }
        }
    };
}

display_from_str!(Drift, "drift");
display_from_str!(Confidence, "confidence");
display_from_str!(Stability, "stability");
display_from_str!(Label, "label");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_ranks() {
        assert_eq!(Label::Initializing.severity(), Severity::QUIET);
        assert_eq!(Label::Estimating.severity(), Severity::QUIET);
        assert_eq!(Label::Uncertain.severity(), Severity::NORMAL);
        assert_eq!(Label::Okay.severity(), Severity::NORMAL);
        assert_eq!(Label::Delaying.severity(), Severity::ELEVATED);
        assert_eq!(Label::Fluctuating.severity(), Severity::ELEVATED);
        assert_eq!(Label::Unreliable.severity(), Severity::SEVERE);
        assert!(Severity::SEVERE > Severity::NORMAL);
    }

    #[test]
    fn test_step_down() {
        assert_eq!(Severity::SEVERE.step_down(), Some(Severity::ELEVATED));
        assert_eq!(Severity::QUIET.step_down(), None);
    }

    #[test]
    fn test_label_round_trips_through_wire_name() {
        for label in Label::ALL {
            assert_eq!(label.as_str().parse::<Label>().unwrap(), label);
            let json = serde_json::to_string(&label).unwrap();
            assert_eq!(json, format!("\"{}\"", label.as_str()));
        }
    }

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!("up".parse::<Drift>().unwrap(), Drift::Up);
        assert_eq!(" Medium ".parse::<Confidence>().unwrap(), Confidence::Medium);
        assert_eq!("ontrack".parse::<Label>().unwrap(), Label::OnTrack);
        assert!("sideways".parse::<Drift>().is_err());
    }

    #[test]
    fn test_signal_all_covers_every_combination() {
        let signals: Vec<Signal> = Signal::all().collect();
        assert_eq!(signals.len(), 36);

        let unique: std::collections::HashSet<_> = signals.iter().collect();
        assert_eq!(unique.len(), 36);
    }

    #[test]
    fn test_entity_key_parse() {
        let key: EntityKey = "83139:15".parse().unwrap();
        assert_eq!(key, EntityKey::new("83139", "15"));
        assert_eq!(key.to_string(), "83139:15");
        assert!("83139".parse::<EntityKey>().is_err());
        assert!(":15".parse::<EntityKey>().is_err());
    }
}
