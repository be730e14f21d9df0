//! # Writer Worker
//!
//! The background half of the producer/consumer pair. Each file backend
//! owns exactly one `Worker`: a dedicated thread that drains the shared
//! [`OutputBuffer`] and writes the drained batches to disk, applying the
//! size-based rotation policy along the way.
//!
//! The thread wakes on the first of:
//! - the periodic flush timer (`flush_interval`),
//! - a [`Signal::DataReady`] sent by a producer that crossed the
//!   `queue_limit` threshold,
//! - an explicit [`Signal::Flush`] request,
//! - [`Signal::Shutdown`] (or closure of the control channel), which drains
//!   everything still buffered before the thread exits.
//!
//! Draining always swaps the buffer out under the lock and performs I/O on
//! the swapped-out copy, so producers are never stalled behind a disk
//! write.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use futures::channel::mpsc::UnboundedReceiver;
use futures::executor::LocalPool;
use futures::future::Either;
use futures::stream::StreamExt;

use crate::{buffer::OutputBuffer, config::FileBackendConfig, file_io::FileIo};

/// Control messages from the backend to its worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Signal {
    /// The buffer crossed the force-flush threshold.
    DataReady,
    /// Explicit flush request.
    Flush,
    /// Drain everything and exit.
    Shutdown,
}

/// Handle to the writer thread of one file backend.
#[derive(Debug)]
pub(crate) struct Worker {
    name: String,
    handle: Option<JoinHandle<()>>,
}

impl Worker {
    /// Spawns the writer thread.
    ///
    /// The thread takes sole ownership of the open file; the shared buffer
    /// is the only state it touches that producers can also reach.
    pub fn spawn(
        name: String,
        shared: Arc<Mutex<OutputBuffer>>,
        receiver: UnboundedReceiver<Signal>,
        file: FileIo,
        config: FileBackendConfig,
    ) -> std::io::Result<Worker> {
        let handle = thread::Builder::new().name(name.clone()).spawn(move || {
            let mut pool = LocalPool::new();
            pool.run_until(run_loop(receiver, shared, file, config));
        })?;

        Ok(Worker {
            name,
            handle: Some(handle),
        })
    }

    /// Blocks until the writer thread has exited.
    ///
    /// Called after [`Signal::Shutdown`] has been sent; returning from here
    /// means the final drain has completed and the shutdown caller may
    /// proceed.
    pub fn join(mut self) {
        if let Some(handle) = self.handle.take() {
            if let Err(e) = handle.join() {
                eprintln!("log_spool worker {} failed to join: {:?}", self.name, e);
            }
        }
    }
}

async fn run_loop(
    mut receiver: UnboundedReceiver<Signal>,
    shared: Arc<Mutex<OutputBuffer>>,
    mut file: FileIo,
    config: FileBackendConfig,
) {
    let flush_interval = Duration::from_millis(config.flush_interval.max(1));
    let mut last_flush = Instant::now();
    let mut dropped: u64 = 0;

    loop {
        let wake = futures::future::select(
            Box::pin(receiver.next()),
            Box::pin(futures_timer::Delay::new(flush_interval)),
        )
        .await;

        match wake {
            Either::Left((Some(Signal::Shutdown), _)) | Either::Left((None, _)) => break,
            Either::Left((Some(_), _)) => {
                // DataReady or Flush: drain now, and keep draining while
                // producers are refilling faster than we write
                while write_pending(&shared, &mut file, &config, &mut dropped) {}
                last_flush = Instant::now();
            }
            Either::Right((_, _)) => {
                if last_flush.elapsed() >= flush_interval {
                    while write_pending(&shared, &mut file, &config, &mut dropped) {}
                    last_flush = Instant::now();
                }
            }
        }
    }

    // final drain: everything appended before the shutdown request must be
    // on disk (or counted as dropped) before the thread exits
    while write_pending(&shared, &mut file, &config, &mut dropped) {}

    if dropped > 0 {
        eprintln!(
            "log_spool: {} bytes were dropped on {}",
            dropped,
            file.path().display()
        );
    }
}

/// Captures and writes one batch. Returns `true` when a batch was handled
/// and the caller should immediately re-check for more, `false` when the
/// buffer was empty or the batch was re-queued for a later retry.
fn write_pending(
    shared: &Mutex<OutputBuffer>,
    file: &mut FileIo,
    config: &FileBackendConfig,
    dropped: &mut u64,
) -> bool {
    let (data, sizes) = lock(shared).take();
    if data.is_empty() {
        return false;
    }

    if write_batch(file, config, &data).is_ok() {
        return true;
    }

    // the handle may have gone stale (path removed, disk detached); reopen
    // in append mode so surviving content is kept, then retry once
    match FileIo::open(file.path().to_path_buf(), true) {
        Ok(reopened) => {
            *file = reopened;
            match write_batch(file, config, &data) {
                Ok(()) => true,
                Err(err) => {
                    eprintln!(
                        "log_spool: write to {} failed ({err}), keeping {} bytes queued",
                        file.path().display(),
                        data.len()
                    );
                    lock(shared).restore(data, sizes);
                    false
                }
            }
        }
        Err(err) => {
            *dropped += data.len() as u64;
            eprintln!(
                "log_spool: cannot reopen {} ({err}), dropping {} bytes",
                file.path().display(),
                data.len()
            );
            true
        }
    }
}

/// Truncate-in-place rotation, then the write. A batch that would push the
/// file past `max_size` lands in a freshly emptied file; a batch larger
/// than `max_size` on its own is still written whole.
fn write_batch(
    file: &mut FileIo,
    config: &FileBackendConfig,
    data: &[u8],
) -> std::io::Result<()> {
    let size = file.size();
    if size > 0 && size + data.len() as u64 > config.max_size {
        file.truncate()?;
    }
    file.write(data)
}

/// A poisoned buffer lock only means some producer panicked mid-append;
/// the buffer itself is still structurally sound, so keep going.
fn lock(shared: &Mutex<OutputBuffer>) -> MutexGuard<'_, OutputBuffer> {
    shared.lock().unwrap_or_else(PoisonError::into_inner)
}
