//! # Output Buffer

/// Shared accumulation buffer between producer threads and the writer.
///
/// Formatted lines are appended as raw bytes into `data` while `sizes`
/// records the byte length of every message in arrival order. The writer
/// drains the whole thing with [`take`](OutputBuffer::take), which swaps the
/// storage out under the caller's lock so producers never see a
/// half-drained buffer. Actual file I/O happens on the swapped-out copy,
/// outside the lock.
///
/// Invariant whenever the owning lock is held: `sizes` sums to `data.len()`.
use std::mem;

#[derive(Debug)]
pub struct OutputBuffer {
    data: Vec<u8>,
    sizes: Vec<usize>,
    grow_size: usize,
}

impl OutputBuffer {
    /// Creates an empty buffer that grows in `grow_size`-byte steps.
    ///
    /// Fixed-increment growth keeps reallocation pauses bounded for an
    /// append-heavy, bursty workload; a zero `grow_size` falls back to a
    /// single-byte step.
    pub fn new(grow_size: usize) -> Self {
        OutputBuffer {
            data: Vec::new(),
            sizes: Vec::new(),
            grow_size: grow_size.max(1),
        }
    }

    /// Appends one message and records its length.
    ///
    /// Returns the total number of buffered bytes after the append, so the
    /// caller can decide under the same lock whether the force-flush
    /// threshold has been crossed.
    pub fn append(&mut self, bytes: &[u8]) -> usize {
        let needed = self.data.len() + bytes.len();
        if needed > self.data.capacity() {
            let target = needed.div_ceil(self.grow_size) * self.grow_size;
            self.data.reserve_exact(target - self.data.len());
        }
        self.data.extend_from_slice(bytes);
        self.sizes.push(bytes.len());
        self.data.len()
    }

    /// Moves the buffered bytes and length sequence out, leaving the buffer
    /// empty.
    pub fn take(&mut self) -> (Vec<u8>, Vec<usize>) {
        (mem::take(&mut self.data), mem::take(&mut self.sizes))
    }

    /// Puts an undelivered batch back at the front of the buffer.
    ///
    /// Used by the writer when a batch could not be written: the batch must
    /// precede anything appended while the write was in flight, otherwise
    /// FIFO order is lost on retry.
    pub fn restore(&mut self, mut data: Vec<u8>, mut sizes: Vec<usize>) {
        data.extend_from_slice(&self.data);
        sizes.extend_from_slice(&self.sizes);
        self.data = data;
        self.sizes = sizes;
    }

    /// Total buffered bytes.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Number of buffered messages.
    pub fn message_count(&self) -> usize {
        self.sizes.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};
    use std::thread;

    #[test]
    fn test_new_buffer_is_empty() {
        let buffer = OutputBuffer::new(64);
        assert!(buffer.is_empty());
        assert_eq!(buffer.len(), 0);
        assert_eq!(buffer.message_count(), 0);
    }

    #[test]
    fn test_append_returns_running_total() {
        let mut buffer = OutputBuffer::new(64);
        assert_eq!(buffer.append(b"hello\n"), 6);
        assert_eq!(buffer.append(b"world!\n"), 13);
        assert_eq!(buffer.message_count(), 2);
    }

    #[test]
    fn test_take_returns_concatenation_in_order() {
        let mut buffer = OutputBuffer::new(64);
        buffer.append(b"first\n");
        buffer.append(b"second\n");
        buffer.append(b"third\n");

        let (data, sizes) = buffer.take();
        assert_eq!(data, b"first\nsecond\nthird\n");
        assert_eq!(sizes, vec![6, 7, 6]);
        assert_eq!(sizes.iter().sum::<usize>(), data.len());
        assert!(buffer.is_empty());
    }

    #[test]
    fn test_take_on_empty_buffer() {
        let mut buffer = OutputBuffer::new(64);
        let (data, sizes) = buffer.take();
        assert!(data.is_empty());
        assert!(sizes.is_empty());
    }

    #[test]
    fn test_length_sum_invariant() {
        let mut buffer = OutputBuffer::new(16);
        for i in 0..100 {
            buffer.append(format!("message {i}\n").as_bytes());
        }
        let (data, sizes) = buffer.take();
        assert_eq!(sizes.iter().sum::<usize>(), data.len());
        assert_eq!(sizes.len(), 100);
    }

    #[test]
    fn test_fixed_increment_growth() {
        let mut buffer = OutputBuffer::new(64);
        buffer.append(&[b'x'; 10]);
        assert_eq!(buffer.data.capacity(), 64);

        // 10 + 60 = 70 crosses one step, capacity moves to the next multiple
        buffer.append(&[b'y'; 60]);
        assert_eq!(buffer.data.capacity(), 128);

        buffer.append(&[b'z'; 300]);
        assert_eq!(buffer.data.capacity(), 384);
    }

    #[test]
    fn test_zero_grow_size_does_not_panic() {
        let mut buffer = OutputBuffer::new(0);
        buffer.append(b"still works\n");
        assert_eq!(buffer.len(), 12);
    }

    #[test]
    fn test_restore_preserves_fifo_order() {
        let mut buffer = OutputBuffer::new(64);
        buffer.append(b"one\n");
        buffer.append(b"two\n");
        let (batch, batch_sizes) = buffer.take();

        // a producer appends while the batch is in flight
        buffer.append(b"three\n");

        buffer.restore(batch, batch_sizes);
        let (data, sizes) = buffer.take();
        assert_eq!(data, b"one\ntwo\nthree\n");
        assert_eq!(sizes, vec![4, 4, 6]);
    }

    #[test]
    fn test_restore_into_empty_buffer() {
        let mut buffer = OutputBuffer::new(64);
        buffer.append(b"pending\n");
        let (batch, batch_sizes) = buffer.take();
        buffer.restore(batch, batch_sizes);
        assert_eq!(buffer.len(), 8);
        assert_eq!(buffer.message_count(), 1);
    }

    #[test]
    fn test_concurrent_appends_do_not_corrupt() {
        let shared = Arc::new(Mutex::new(OutputBuffer::new(64)));
        let mut handles = Vec::new();

        for t in 0..8 {
            let shared = Arc::clone(&shared);
            handles.push(thread::spawn(move || {
                for i in 0..100 {
                    let line = format!("producer {t} message {i}\n");
                    shared.lock().unwrap().append(line.as_bytes());
                }
            }));
        }
        for handle in handles {
            handle.join().unwrap();
        }

        let (data, sizes) = shared.lock().unwrap().take();
        assert_eq!(sizes.len(), 800);
        assert_eq!(sizes.iter().sum::<usize>(), data.len());

        // every message survives intact regardless of interleaving
        let text = String::from_utf8(data).unwrap();
        for t in 0..8 {
            for i in 0..100 {
                let line = format!("producer {t} message {i}\n");
                assert!(text.contains(&line), "missing {line:?}");
            }
        }
    }
}
