//! Typed error variants for the chatiq-config crate.
//!
//! Provides structured error types for config I/O and validation so that
//! library consumers can match on specific failure modes.

use std::fmt;

/// Errors that can occur when loading or validating widget configuration.
///
/// # Example
///
/// ```rust,no_run
/// use chatiq_config::{ConfigError, WidgetConfig};
///
/// match WidgetConfig::load_from("widget.yaml") {
///     Ok(config) => println!("site: {:?}", config.site_id),
///     Err(ConfigError::Io(io)) => eprintln!("I/O error: {io}"),
///     Err(ConfigError::Parse(p)) => eprintln!("YAML parse error: {p}"),
///     Err(ConfigError::Validation(msg)) => eprintln!("Validation: {msg}"),
/// }
/// ```
#[derive(Debug)]
pub enum ConfigError {
    /// An I/O error occurred reading the config file.
    Io(std::io::Error),

    /// The config file contained invalid YAML that could not be parsed.
    Parse(serde_yaml_ng::Error),

    /// A field value failed semantic validation.
    ///
    /// The inner string describes which field is invalid and why.
    Validation(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "I/O error reading widget config: {e}"),
            ConfigError::Parse(e) => write!(f, "YAML parse error in widget config: {e}"),
            ConfigError::Validation(msg) => write!(f, "Widget config validation error: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io(e) => Some(e),
            ConfigError::Parse(e) => Some(e),
            ConfigError::Validation(_) => None,
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::Io(e)
    }
}

impl From<serde_yaml_ng::Error> for ConfigError {
    fn from(e: serde_yaml_ng::Error) -> Self {
        ConfigError::Parse(e)
    }
}
