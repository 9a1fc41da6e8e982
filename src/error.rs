//! Configuration errors.
//!
//! The simulation step itself never fails; only loading and validating
//! settings at startup can return an error.

use std::fmt;

#[derive(Debug)]
pub enum ConfigError {
    /// Settings file could not be read.
    Io(std::io::Error),
    /// Settings file is not valid JSON for [`crate::Settings`].
    Parse(serde_json::Error),
    /// A numeric setting is outside its accepted range.
    OutOfRange {
        name: &'static str,
        value: f32,
        expected: &'static str,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(err) => write!(f, "failed to read settings: {err}"),
            ConfigError::Parse(err) => write!(f, "failed to parse settings: {err}"),
            ConfigError::OutOfRange {
                name,
                value,
                expected,
            } => write!(f, "setting `{name}` = {value} is out of range (expected {expected})"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io(err) => Some(err),
            ConfigError::Parse(err) => Some(err),
            ConfigError::OutOfRange { .. } => None,
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(err: std::io::Error) -> Self {
        ConfigError::Io(err)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        ConfigError::Parse(err)
    }
}
