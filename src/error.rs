//! Error types and handling infrastructure for flightctl.
//!
//! The control core (command state, edge dispatch, surface mixing) has no failure
//! paths: absent actuators are skipped and thrust saturates. Errors only arise in the
//! layers around it: configuration files, key-binding names, the terminal, and the
//! channels connecting the control worker to the front end.

use thiserror::Error;

/// The main error type for flightctl operations.
#[derive(Error, Debug)]
pub enum FlightCtlError {
    /// File system related errors (config file unreadable, etc.)
    #[error("File operation failed: {message}")]
    FileError {
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Configuration could not be parsed or failed validation
    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    /// A key name in the bindings table is not recognised
    #[error("Unknown key name in binding: {name}")]
    InvalidBinding { name: String },

    /// UI and terminal related errors
    #[error("UI operation failed: {message}")]
    UIError { message: String },

    /// The control worker or input thread went away
    #[error("Channel closed: {message}")]
    ChannelClosed { message: String },
}

/// Standard Result type for flightctl operations.
pub type Result<T> = std::result::Result<T, FlightCtlError>;

impl FlightCtlError {
    /// Create a FileError from an io::Error with additional context
    pub fn file_error(message: impl Into<String>, source: std::io::Error) -> Self {
        Self::FileError {
            message: message.into(),
            source,
        }
    }

    /// Create a ConfigError with a descriptive message
    pub fn config(message: impl Into<String>) -> Self {
        Self::ConfigError {
            message: message.into(),
        }
    }

    /// Create a UIError with a descriptive message
    pub fn ui(message: impl Into<String>) -> Self {
        Self::UIError {
            message: message.into(),
        }
    }

    /// Create a ChannelClosed error with a descriptive message
    pub fn channel_closed(message: impl Into<String>) -> Self {
        Self::ChannelClosed {
            message: message.into(),
        }
    }
}

impl From<std::io::Error> for FlightCtlError {
    fn from(err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => Self::FileError {
                message: "File not found".to_string(),
                source: err,
            },
            std::io::ErrorKind::PermissionDenied => Self::FileError {
                message: "Permission denied".to_string(),
                source: err,
            },
            _ => Self::FileError {
                message: "IO operation failed".to_string(),
                source: err,
            },
        }
    }
}

impl From<toml::de::Error> for FlightCtlError {
    fn from(err: toml::de::Error) -> Self {
        Self::ConfigError {
            message: err.to_string(),
        }
    }
}
