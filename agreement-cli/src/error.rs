//! Error handling for the CLI application

use std::fmt;

/// Custom error type for CLI-specific errors
#[derive(Debug)]
pub enum CliError {
    /// A required input path was given neither as a flag nor in the config file
    MissingInput(String),
    /// Configuration error
    ConfigError(String),
    /// One or more files failed validation
    ValidationFailed(usize),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::MissingInput(name) => write!(
                f,
                "Missing input: {name} (pass it as a flag or set it in the config file)"
            ),
            CliError::ConfigError(msg) => write!(f, "Configuration error: {msg}"),
            CliError::ValidationFailed(count) => {
                write!(f, "Validation failed for {count} file(s)")
            }
        }
    }
}

impl std::error::Error for CliError {}
