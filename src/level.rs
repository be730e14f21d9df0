//! # Severity Levels

use crate::error::Error;
use std::{fmt, str::FromStr};

/// Severity of a log event.
///
/// Levels are ordered by increasing severity:
/// `Debug < Info < Warn < Error < Critical`. A channel configured with a
/// minimum level drops every event below it before the event ever reaches
/// a backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Level {
    /// Development diagnostics.
    Debug = 0,

    /// General runtime events.
    Info = 1,

    /// Potential problems that do not stop the application.
    Warn = 2,

    /// Failed operations.
    Error = 3,

    /// Failures the application is unlikely to recover from.
    Critical = 4,
}

impl Level {
    /// Single-character signature printed in front of a formatted line.
    ///
    /// Info lines carry a plain space so columns stay aligned across levels.
    pub fn signature(self) -> char {
        match self {
            Level::Debug => 'D',
            Level::Info => ' ',
            Level::Warn => 'W',
            Level::Error => 'E',
            Level::Critical => 'C',
        }
    }

    /// Prefix inserted before the message text for error-grade events,
    /// empty for everything below [`Level::Error`].
    pub fn error_prefix(self) -> &'static str {
        match self {
            Level::Error => "Error: ",
            Level::Critical => "Critical: ",
            _ => "",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Level::Debug => "DEBUG",
            Level::Info => "INFO",
            Level::Warn => "WARN",
            Level::Error => "ERROR",
            Level::Critical => "CRITICAL",
        };
        write!(f, "{name}")
    }
}

impl FromStr for Level {
    type Err = Error;

    /// Parses a string into a `Level`.
    ///
    /// Accepts `"debug"`, `"info"`, `"warn"`, `"error"` and `"critical"`
    /// (case-insensitive). Returns [`Error::InvalidLevel`] for anything else.
    fn from_str(s: &str) -> Result<Self, Error> {
        match s.to_lowercase().as_str() {
            "debug" => Ok(Level::Debug),
            "info" => Ok(Level::Info),
            "warn" => Ok(Level::Warn),
            "error" => Ok(Level::Error),
            "critical" => Ok(Level::Critical),
            _ => Err(Error::InvalidLevel(s.to_string())),
        }
    }
}
