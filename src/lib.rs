//! # log_spool - Buffered Asynchronous File Logging
//!
//! log_spool is a process-local logging library built around one idea:
//! the thread that produces a log line should never wait on the disk.
//! Producers format a line, copy it into a shared in-memory buffer under a
//! short-lived lock, and return. A dedicated writer thread per backend
//! drains the buffer, coalesces the drained lines into large writes and
//! applies size-based rotation to the log file.
//!
//! ## Key Features
//!
//! - **Asynchronous Writing**: all file I/O happens on a background writer
//!   thread, never at the logging call site
//! - **Coalesced Batches**: buffered lines are written in one syscall per
//!   drain instead of one per message
//! - **Size-Based Rotation**: the file is truncated in place once the next
//!   write would push it past the configured maximum size
//! - **Bounded Memory**: a queue limit forces an early drain under flood
//!   conditions, ahead of the periodic flush timer
//! - **Graceful Shutdown**: closing the backend drains every buffered byte
//!   before the writer thread exits
//! - **Fire-and-Forget**: no I/O error ever propagates to the log call
//!   site; the backend owns all retry and drop decisions
//!
//! ## Architecture
//!
//! The library uses a producer-consumer pattern:
//! - **Producers**: any thread calling [`Backend::display`]; the line is
//!   appended to an [`OutputBuffer`](buffer) under a mutex held only for
//!   the in-memory copy
//! - **Consumer**: a writer thread per [`FileBackend`] that swaps the
//!   buffer out under the same lock and writes the swapped-out batch with
//!   the lock released
//! - **Control channel**: an unbounded MPSC channel carrying wake-up and
//!   shutdown signals from the backend to its writer
//!
//! The writer wakes on the first of three conditions: the periodic flush
//! timer (default 3 s), a data-ready signal sent when buffered bytes reach
//! the queue limit (default 8 MiB), or an explicit flush request.
//!
//! ## Usage Example
//!
//! ```rust
//! use log_spool::{Backend, Context, FileBackend, FileBackendConfig, Level};
//!
//! let dir = tempfile::tempdir().unwrap();
//! let config = FileBackendConfig::new(dir.path().join("app.log"));
//!
//! let mut backend = FileBackend::new(config);
//! backend.create_log().unwrap();
//!
//! backend.display(&Context::new(Level::Info, "main"), "application started");
//! backend.display(
//!     &Context::new(Level::Error, "main").with_location(file!(), line!()),
//!     "something failed",
//! );
//!
//! // drains all pending lines, then stops the writer thread
//! backend.close_log();
//! ```
//!
//! ## Custom Configuration
//!
//! ```rust
//! use std::collections::HashMap;
//! use log_spool::FileBackendConfig;
//!
//! let mut options: HashMap<String, String> = HashMap::new();
//! options.insert("filename".to_string(), "tmp/app.log".to_string());
//! options.insert("append".to_string(), "false".to_string());
//! options.insert("max_size".to_string(), "1048576".to_string());
//!
//! let config = FileBackendConfig::from_hashmap(&options).unwrap();
//! assert_eq!(config.max_size, 1024 * 1024);
//! ```

mod backend;
mod buffer;
mod config;
mod context;
mod error;
mod file_io;
mod level;
mod worker;

use std::collections::HashMap;
use std::path::PathBuf;

pub use crate::backend::FileBackend;
pub use crate::config::FileBackendConfig;
pub use crate::context::{Context, OutputFlags};
pub use crate::error::Error;
pub use crate::file_io::FileIo;
pub use crate::level::Level;

/// A pluggable output sink for a log channel.
///
/// A channel formats nothing itself; it hands each event's [`Context`] and
/// message text to every attached backend and lets the backend decide how
/// to render and where to deliver it. [`FileBackend`] is the file-based
/// implementation shipped with this crate.
///
/// # Thread Safety
///
/// `display` takes `&self` and must be safe to call from multiple producer
/// threads at once. The configuration call takes `&mut self`; the owning
/// channel is responsible for not reconfiguring a backend while other
/// threads are inside `display`.
pub trait Backend: Send + Sync {
    /// Delivers one log event to the sink.
    ///
    /// Must not block on I/O and must not surface errors to the caller;
    /// logging is fire-and-forget from the producer's perspective.
    fn display(&self, context: &Context<'_>, line: &str);

    /// Parses a configuration from `options` and applies it.
    ///
    /// Returns `false` when the options are invalid; the previous
    /// configuration stays in effect.
    fn apply_config(&mut self, options: &HashMap<String, String>) -> bool;

    /// Path of the sink's `index`-th output file, for introspection.
    /// `None` when the sink has no such file.
    fn get_path_name(&self, index: usize) -> Option<PathBuf> {
        let _ = index;
        None
    }
}
