//! # Error Handling

use std::fmt;

/// Represents all possible errors that can occur in the log_spool system.
///
/// Producers never see these: `display` is fire-and-forget and the worker
/// owns every retry/drop decision. Errors surface only from the synchronous
/// lifecycle calls (`create_log`, `apply_config`, config parsing).
pub enum Error {
    /// Represents an underlying I/O error.
    Io(std::io::Error),

    /// Error triggered when the backend is configured with an invalid log
    /// level string.
    ///
    /// This usually comes from a misconfiguration or a typo in
    /// environment/config values.
    InvalidLevel(String),

    /// A configuration option is missing or could not be parsed.
    ///
    /// # Fields
    /// - `key`: The option name.
    /// - `value`: The rejected value, empty when the option was missing.
    InvalidConfig { key: String, value: String },

    /// The backend has already been shut down.
    ///
    /// Lifecycle calls after shutdown report this instead of touching the
    /// stopped worker.
    Shutdown(String),
}

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(err) => f.debug_tuple("Io").field(err).finish(),
            Error::InvalidLevel(level) => f.debug_tuple("InvalidLevel").field(level).finish(),
            Error::InvalidConfig { key, value } => f
                .debug_struct("InvalidConfig")
                .field("key", key)
                .field("value", value)
                .finish(),
            Error::Shutdown(msg) => f.debug_tuple("Shutdown").field(msg).finish(),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(err) => write!(f, "IO error: {err}"),
            Error::InvalidLevel(level) => write!(f, "Invalid log level: {level}"),
            Error::InvalidConfig { key, value } => {
                if value.is_empty() {
                    write!(f, "Missing config option: {key}")
                } else {
                    write!(f, "Invalid value for config option {key}: {value}")
                }
            }
            Error::Shutdown(msg) => write!(f, "Backend shut down: {msg}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err)
    }
}
