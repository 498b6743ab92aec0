// src/exec/ring_buffer.rs

//! Fixed-capacity trailing window over a byte stream.

use std::io;

use crate::errors::{ProvisionerError, Result};

/// Append-only byte sink that keeps only the most recent `capacity` bytes.
///
/// Writes never fail and never block: once the window is full the oldest
/// bytes are dropped to make room. Used to attach the tail of a build
/// tool's output to its error without letting a chatty process grow memory
/// without bound.
#[derive(Debug, Clone)]
pub struct BoundedSink {
    capacity: usize,
    buf: Vec<u8>,
    total_written: u64,
}

impl BoundedSink {
    pub fn new(capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(ProvisionerError::Settings(
                "capture capacity must be >= 1 (got 0)".to_string(),
            ));
        }

        Ok(Self {
            capacity,
            buf: Vec::with_capacity(capacity),
            total_written: 0,
        })
    }

    /// Append `data`, trimming from the front if the window overflows.
    ///
    /// Always reports the full length as written.
    pub fn write(&mut self, data: &[u8]) -> usize {
        self.total_written += data.len() as u64;

        if data.len() >= self.capacity {
            self.buf.clear();
            self.buf
                .extend_from_slice(&data[data.len() - self.capacity..]);
            return data.len();
        }

        let overflow = (self.buf.len() + data.len()).saturating_sub(self.capacity);
        if overflow > 0 {
            self.buf.drain(..overflow);
        }
        self.buf.extend_from_slice(data);

        data.len()
    }

    /// The trailing window: the last `min(capacity, total_written)` bytes.
    pub fn contents(&self) -> &[u8] {
        &self.buf
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Bytes ever written, including the ones already dropped.
    pub fn total_written(&self) -> u64 {
        self.total_written
    }
}

impl io::Write for BoundedSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        Ok(BoundedSink::write(self, buf))
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_capacity_is_rejected() {
        assert!(BoundedSink::new(0).is_err());
    }

    #[test]
    fn keeps_everything_below_capacity() {
        let mut sink = BoundedSink::new(8).unwrap();
        assert_eq!(sink.write(b"abc"), 3);
        assert_eq!(sink.write(b"de"), 2);
        assert_eq!(sink.contents(), b"abcde");
    }

    #[test]
    fn drops_oldest_bytes_on_overflow() {
        let mut sink = BoundedSink::new(4).unwrap();
        sink.write(b"abc");
        sink.write(b"def");
        assert_eq!(sink.contents(), b"cdef");
        assert_eq!(sink.total_written(), 6);
    }

    #[test]
    fn single_oversized_write_keeps_its_tail() {
        let mut sink = BoundedSink::new(3).unwrap();
        sink.write(b"xy");
        assert_eq!(sink.write(b"0123456789"), 10);
        assert_eq!(sink.contents(), b"789");
        assert_eq!(sink.len(), sink.capacity());
    }

    #[test]
    fn io_write_never_errors() {
        use std::io::Write;

        let mut sink = BoundedSink::new(2).unwrap();
        sink.write_all(b"hello").unwrap();
        sink.flush().unwrap();
        assert_eq!(sink.contents(), b"lo");
    }
}
