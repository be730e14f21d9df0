//! # File Backend
//!
//! The producer-facing side of the file sink. A `FileBackend` owns the
//! shared [`OutputBuffer`], the control channel to its [`Worker`] and the
//! backend lifecycle: [`create_log`](FileBackend::create_log) opens the file
//! and starts the writer thread, [`close_log`](FileBackend::close_log)
//! drains and stops it, and dropping the backend closes it implicitly.
//!
//! `display` is fire-and-forget: it formats the event, copies the line into
//! the shared buffer under a short-lived lock and at most sends a wake-up
//! signal. It never performs I/O and never reports errors back to the log
//! call site.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, PoisonError};

use futures::channel::mpsc::{self, UnboundedSender};

use crate::{
    buffer::OutputBuffer,
    config::FileBackendConfig,
    context::{Context, OutputFlags},
    error::Error,
    file_io::FileIo,
    worker::{Signal, Worker},
    Backend,
};

/// A log backend that spools formatted lines to a single file through a
/// background writer thread.
///
/// ## Thread safety
///
/// `display` and `request_flush` take `&self` and are safe to call from any
/// number of producer threads. The lifecycle calls (`create_log`,
/// `close_log`, `apply_config`) take `&mut self`, so the owning channel
/// serializes them against in-flight configuration changes by construction.
///
/// ## Shutdown
///
/// `close_log` signals the worker, then blocks on the thread join until the
/// final drain has finished: every byte appended before the call is written
/// to the file (or counted as dropped if the file became unwritable). A
/// second `close_log` is a no-op, and `display` after close does nothing.
#[derive(Debug)]
pub struct FileBackend {
    config: FileBackendConfig,
    flags: OutputFlags,
    shared: Arc<Mutex<OutputBuffer>>,
    sender: Option<UnboundedSender<Signal>>,
    worker: Option<Worker>,
    shutdown_called: bool,
}

impl FileBackend {
    /// Creates a backend for `config` without touching the filesystem.
    /// Nothing is written until [`create_log`](Self::create_log) runs.
    pub fn new(config: FileBackendConfig) -> Self {
        let shared = Arc::new(Mutex::new(OutputBuffer::new(config.grow_size)));
        FileBackend {
            config,
            flags: OutputFlags::default(),
            shared,
            sender: None,
            worker: None,
            shutdown_called: false,
        }
    }

    /// Replaces the formatting flags used for every subsequent `display`.
    pub fn set_flags(&mut self, flags: OutputFlags) {
        self.flags = flags;
    }

    pub fn config(&self) -> &FileBackendConfig {
        &self.config
    }

    /// Whether the writer thread is running.
    pub fn is_open(&self) -> bool {
        self.worker.is_some()
    }

    /// Opens (or creates) the log file and starts the writer thread.
    ///
    /// Repeated calls while the writer is running are no-ops. After
    /// [`close_log`](Self::close_log) the backend is stopped for good and
    /// this returns [`Error::Shutdown`].
    pub fn create_log(&mut self) -> Result<(), Error> {
        if self.worker.is_some() {
            return Ok(());
        }
        if self.shutdown_called {
            return Err(Error::Shutdown("create_log after close_log".to_string()));
        }

        let file = FileIo::open(&self.config.filename, self.config.append)?;
        let (sender, receiver) = mpsc::unbounded();
        let worker = Worker::spawn(
            format!("log-writer-{}", std::process::id()),
            Arc::clone(&self.shared),
            receiver,
            file,
            self.config.clone(),
        )?;

        self.sender = Some(sender);
        self.worker = Some(worker);
        Ok(())
    }

    /// Asks the writer to drain ahead of its timer. Returns immediately;
    /// the actual write happens on the writer thread.
    pub fn request_flush(&self) {
        self.signal(Signal::Flush);
    }

    /// Flushes all pending data and stops the writer thread.
    ///
    /// Blocks until the final drain has completed. Idempotent; a no-op when
    /// the log was never created.
    pub fn close_log(&mut self) {
        if self.shutdown_called {
            return;
        }
        if let Some(sender) = self.sender.take() {
            self.shutdown_called = true;
            let _ = sender.unbounded_send(Signal::Shutdown);
            drop(sender);
        }
        if let Some(worker) = self.worker.take() {
            worker.join();
        }
    }

    fn append_string(&self, text: &str) {
        let total = self
            .shared
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .append(text.as_bytes());
        self.conditional_flush(total);
    }

    /// Wakes the writer early once the buffer crosses the queue limit, so
    /// memory stays bounded under flood conditions.
    fn conditional_flush(&self, buffered: usize) {
        if buffered >= self.config.queue_limit {
            self.signal(Signal::DataReady);
        }
    }

    fn signal(&self, signal: Signal) {
        if let Some(sender) = &self.sender {
            let _ = sender.unbounded_send(signal);
        }
    }
}

impl Backend for FileBackend {
    /// Formats the event and queues the resulting line for the writer.
    ///
    /// A no-op while the log is not open (before `create_log`, after
    /// `close_log`).
    fn display(&self, context: &Context<'_>, line: &str) {
        if self.worker.is_none() {
            return;
        }
        let text = context.format(line, &self.flags);
        self.append_string(&text);
    }

    /// Parses a fresh configuration from `options` and applies it.
    ///
    /// Returns `false` when the options do not parse; the old configuration
    /// stays in effect. When the writer was running it is drained and
    /// stopped first, then restarted under the new configuration, so a
    /// config swap never races an in-flight write.
    fn apply_config(&mut self, options: &HashMap<String, String>) -> bool {
        let config = match FileBackendConfig::from_hashmap(options) {
            Ok(config) => config,
            Err(_) => return false,
        };

        let was_running = self.worker.is_some();
        self.close_log();
        self.shutdown_called = false;

        self.config = config;
        self.shared = Arc::new(Mutex::new(OutputBuffer::new(self.config.grow_size)));

        if was_running {
            self.create_log().is_ok()
        } else {
            true
        }
    }

    fn get_path_name(&self, index: usize) -> Option<PathBuf> {
        match index {
            0 => Some(self.config.filename.clone()),
            _ => None,
        }
    }
}

impl Drop for FileBackend {
    fn drop(&mut self) {
        self.close_log();
    }
}
