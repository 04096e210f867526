//! Core configuration with serde defaults.
//!
//! # Responsibility
//! - Describe logging and report settings as plain deserializable data.
//! - Validate settings before any subsystem consumes them.
//!
//! # Invariants
//! - Every field has a default, so partial documents deserialize.
//! - `validate()` is the only place that rejects settings.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

/// Title printed at the top of test reports.
pub const DEFAULT_REPORT_TITLE: &str = "Article Qualifier Test Results";
/// Console width used when none is configured.
pub const DEFAULT_REPORT_WIDTH: usize = 100;
/// Narrowest width the report layout still fits in.
pub const MIN_REPORT_WIDTH: usize = 20;

const LOG_DIR_NAME: &str = "articlekit-logs";

/// Configuration validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    UnsupportedLogLevel(String),
    EmptyLogDir,
    RelativeLogDir(PathBuf),
    EmptyReportTitle,
    ReportTooNarrow { width: usize, min: usize },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnsupportedLogLevel(level) => write!(
                f,
                "unsupported log level `{level}`; expected trace|debug|info|warn|error"
            ),
            Self::EmptyLogDir => write!(f, "log_dir cannot be empty"),
            Self::RelativeLogDir(path) => write!(
                f,
                "log_dir must be an absolute path, got `{}`",
                path.display()
            ),
            Self::EmptyReportTitle => write!(f, "report title cannot be empty"),
            Self::ReportTooNarrow { width, min } => {
                write!(f, "report width {width} is below the minimum of {min}")
            }
        }
    }
}

impl Error for ConfigError {}

/// Returns the default log level for current build mode.
///
/// - `debug` builds -> `debug`
/// - `release` builds -> `info`
pub fn default_log_level() -> &'static str {
    if cfg!(debug_assertions) {
        "debug"
    } else {
        "info"
    }
}

/// File logging settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// One of `trace|debug|info|warn|error`, case-insensitive.
    pub level: String,
    /// Absolute directory for rolling log files.
    pub log_dir: PathBuf,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level().to_string(),
            log_dir: std::env::temp_dir().join(LOG_DIR_NAME),
        }
    }
}

impl LoggingConfig {
    pub fn new(level: impl Into<String>, log_dir: impl Into<PathBuf>) -> Self {
        Self {
            level: level.into(),
            log_dir: log_dir.into(),
        }
    }

    /// Canonical spelling of `level`; `warning` is accepted as `warn`.
    pub fn normalized_level(&self) -> Result<&'static str, ConfigError> {
        match self.level.trim().to_ascii_lowercase().as_str() {
            "trace" => Ok("trace"),
            "debug" => Ok("debug"),
            "info" => Ok("info"),
            "warn" | "warning" => Ok("warn"),
            "error" => Ok("error"),
            other => Err(ConfigError::UnsupportedLogLevel(other.to_string())),
        }
    }

    /// `log_dir` checked to be non-empty and absolute.
    pub fn normalized_log_dir(&self) -> Result<PathBuf, ConfigError> {
        let raw = self.log_dir.to_string_lossy();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ConfigError::EmptyLogDir);
        }
        let path = Path::new(trimmed);
        if !path.is_absolute() {
            return Err(ConfigError::RelativeLogDir(path.to_path_buf()));
        }
        Ok(path.to_path_buf())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.normalized_level()?;
        self.normalized_log_dir()?;
        Ok(())
    }
}

/// Test report layout settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    pub title: String,
    /// Maximum characters per output line.
    pub max_width: usize,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            title: DEFAULT_REPORT_TITLE.to_string(),
            max_width: DEFAULT_REPORT_WIDTH,
        }
    }
}

impl ReportConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.title.trim().is_empty() {
            return Err(ConfigError::EmptyReportTitle);
        }
        if self.max_width < MIN_REPORT_WIDTH {
            return Err(ConfigError::ReportTooNarrow {
                width: self.max_width,
                min: MIN_REPORT_WIDTH,
            });
        }
        Ok(())
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoreConfig {
    pub logging: LoggingConfig,
    pub report: ReportConfig,
}

impl CoreConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.logging.validate()?;
        self.report.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::{ConfigError, CoreConfig, LoggingConfig, ReportConfig, DEFAULT_REPORT_WIDTH};
    use std::path::PathBuf;

    #[test]
    fn defaults_are_valid() {
        let config = CoreConfig::default();
        config.validate().expect("default config should validate");
        assert_eq!(config.report.max_width, DEFAULT_REPORT_WIDTH);
    }

    #[test]
    fn normalized_level_accepts_known_values() {
        let config = LoggingConfig::new(" WARNING ", "/tmp/logs");
        assert_eq!(config.normalized_level().expect("warning should normalize"), "warn");
    }

    #[test]
    fn rejects_unknown_level_and_relative_dir() {
        let err = LoggingConfig::new("verbose", "/tmp/logs")
            .validate()
            .expect_err("unknown level must fail");
        assert_eq!(err, ConfigError::UnsupportedLogLevel("verbose".to_string()));

        let err = LoggingConfig::new("info", "logs/dev")
            .validate()
            .expect_err("relative dir must fail");
        assert_eq!(err, ConfigError::RelativeLogDir(PathBuf::from("logs/dev")));
        assert!(err.to_string().contains("absolute"));
    }

    #[test]
    fn rejects_narrow_report() {
        let config = ReportConfig {
            max_width: 12,
            ..ReportConfig::default()
        };
        assert_eq!(
            config.validate().expect_err("narrow width must fail"),
            ConfigError::ReportTooNarrow { width: 12, min: 20 }
        );
    }
}
