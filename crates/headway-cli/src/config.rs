//! CLI configuration

use headway_core::{Error, Result};
use headway_stabilizer::StabilizerConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;

/// Top-level configuration file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HeadwayConfig {
    /// Hysteresis parameters
    #[serde(default)]
    pub stabilizer: StabilizerConfig,

    /// Replay output settings
    #[serde(default)]
    pub output: OutputConfig,
}

impl HeadwayConfig {
    /// Load configuration from file and CLI overrides
    pub fn load(config_path: &Path, format: Option<OutputFormat>) -> Result<Self> {
        // Try to load from file, or use defaults
        let mut config = if config_path.exists() {
            let content = std::fs::read_to_string(config_path)?;
            Self::from_yaml(&content)?
        } else {
            tracing::debug!(path = %config_path.display(), "no config file, using defaults");
            Self::default()
        };

        // Apply CLI overrides
        if let Some(format) = format {
            config.output.format = format;
        }

        Ok(config)
    }

    /// Parse and validate a YAML configuration
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.stabilizer.validate()?;
        Ok(config)
    }
}

/// Output configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// How replay results are printed
    #[serde(default)]
    pub format: OutputFormat,

    /// Print a metrics summary after the replay
    #[serde(default = "default_true")]
    pub summary: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::default(),
            summary: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Aligned text columns
    #[default]
    Table,
    /// One JSON object per line
    Json,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "table" => Ok(Self::Table),
            "json" => Ok(Self::Json),
            other => Err(format!("unknown output format {other:?} (expected table or json)")),
        }
    }
}

fn default_true() -> bool {
    true
}

/// Reject playback speeds that cannot scale a sleep
pub fn validate_speed(speed: f64) -> Result<f64> {
    if speed.is_finite() && speed > 0.0 {
        Ok(speed)
    } else {
        Err(Error::config(format!("speed must be a positive number, got {speed}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_missing_file_uses_defaults() {
        let config = HeadwayConfig::load(Path::new("/nonexistent/headway.yaml"), None).unwrap();
        assert_eq!(config.stabilizer, StabilizerConfig::default());
        assert_eq!(config.output.format, OutputFormat::Table);
        assert!(config.output.summary);
    }

    #[test]
    fn test_cli_override_wins() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "output:\n  format: table\n  summary: false").unwrap();

        let config = HeadwayConfig::load(file.path(), Some(OutputFormat::Json)).unwrap();
        assert_eq!(config.output.format, OutputFormat::Json);
        assert!(!config.output.summary);
    }

    #[test]
    fn test_stabilizer_section_is_validated() {
        let yaml = r#"
stabilizer:
  confirmations: [2, 3, 0, 1]
"#;
        assert!(HeadwayConfig::from_yaml(yaml).is_err());
    }

    #[test]
    fn test_parse_format() {
        assert_eq!("JSON".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert!("xml".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn test_validate_speed() {
        assert_eq!(validate_speed(2.0).unwrap(), 2.0);
        assert!(validate_speed(0.0).is_err());
        assert!(validate_speed(f64::NAN).is_err());
    }
}
