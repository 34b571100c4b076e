//! Error types for Headway

/// Result type alias using Headway's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for Headway operations
///
/// Classification and stabilization are total and never produce an error;
/// these variants cover the boundaries around them (configuration files,
/// recorded scenarios, and unparseable enum names).
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Configuration errors
    #[error("configuration error: {0}")]
    Config(String),

    /// Scenario file errors
    #[error("scenario error: {0}")]
    Scenario(String),

    /// Unknown enum value at an input boundary
    #[error("invalid {kind}: {value:?}")]
    InvalidValue {
        /// What was being parsed (e.g. "drift")
        kind: &'static str,
        /// The offending input
        value: String,
    },

    /// IO errors
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML serialization errors
    #[error("yaml error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// JSON serialization errors
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create a new configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a new scenario error
    pub fn scenario(msg: impl Into<String>) -> Self {
        Self::Scenario(msg.into())
    }

    /// Create a new invalid-value error
    pub fn invalid(kind: &'static str, value: impl Into<String>) -> Self {
        Self::InvalidValue {
            kind,
            value: value.into(),
        }
    }
}
