//! `ResourceBuffer`, the example shared resource protected by a
//! [`crate::gate::Gate`] in tests and the demo binary.
//!
//! The Gate is responsible for serializing access; this buffer's own
//! mutex only protects its write-position cursor, and a small
//! synthetic delay is added after each critical section to stress
//! timing in concurrent tests — mirroring a real disk or network
//! round trip without actually doing I/O.

use std::time::Duration;

use parking_lot::Mutex;

/// Default capacity used by [`ResourceBuffer::default`].
pub const DEFAULT_SIZE: usize = 4096;

const READ_DELAY: Duration = Duration::from_micros(200);
const WRITE_DELAY: Duration = Duration::from_micros(200);

struct Inner {
    buf: Vec<u8>,
    pos: usize,
}

/// A fixed-capacity byte buffer with an appendable write position.
pub struct ResourceBuffer {
    max_size: usize,
    inner: Mutex<Inner>,
}

impl ResourceBuffer {
    /// Creates a buffer that can hold at most `max_size` bytes.
    pub fn new(max_size: usize) -> Self {
        Self {
            max_size,
            inner: Mutex::new(Inner { buf: vec![0u8; max_size], pos: 0 }),
        }
    }

    /// Reads the last `n` bytes written into `out`, returning how many
    /// bytes were actually copied (fewer than `n` if the buffer holds
    /// less than that, or `out` is shorter).
    pub fn read(&self, out: &mut [u8], n: usize) -> usize {
        let copied = {
            let inner = self.inner.lock();
            let len = n.min(inner.pos).min(out.len());
            let start = inner.pos - len;
            out[..len].copy_from_slice(&inner.buf[start..inner.pos]);
            len
        };
        std::thread::sleep(READ_DELAY);
        copied
    }

    /// Appends `n` bytes of `data` to the buffer. Returns `0` without
    /// writing anything if that would overflow the buffer's capacity.
    pub fn write(&self, data: &[u8], n: usize) -> usize {
        let n = n.min(data.len());
        let written = {
            let mut inner = self.inner.lock();
            if inner.pos + n > self.max_size {
                0
            } else {
                inner.buf[inner.pos..inner.pos + n].copy_from_slice(&data[..n]);
                inner.pos += n;
                n
            }
        };
        if written > 0 {
            std::thread::sleep(WRITE_DELAY);
        }
        written
    }

    /// The current write position (how many bytes have been written
    /// since the last [`restart`](Self::restart)).
    pub fn size(&self) -> usize {
        self.inner.lock().pos
    }

    /// Resets the write position to zero without clearing the bytes.
    pub fn restart(&self) {
        self.inner.lock().pos = 0;
    }
}

impl Default for ResourceBuffer {
    fn default() -> Self {
        Self::new(DEFAULT_SIZE)
    }
}

/// Produces the bytes a [`crate::workers::Writer`] appends each cycle.
pub trait DataGenerator: Send + Sync {
    fn generate(&self) -> Vec<u8>;
}

/// The simplest [`DataGenerator`]: repeats a single byte value.
pub struct CharDataGenerator {
    value: u8,
    len: usize,
}

impl CharDataGenerator {
    pub fn new(value: u8, len: usize) -> Self {
        Self { value, len }
    }
}

impl DataGenerator for CharDataGenerator {
    fn generate(&self) -> Vec<u8> {
        vec![self.value; self.len]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_then_read_round_trips() {
        let res = ResourceBuffer::new(16);
        assert_eq!(res.write(b"hello", 5), 5);
        assert_eq!(res.size(), 5);
        let mut out = [0u8; 5];
        assert_eq!(res.read(&mut out, 5), 5);
        assert_eq!(&out, b"hello");
    }

    #[test]
    fn write_fails_on_overflow() {
        let res = ResourceBuffer::new(4);
        assert_eq!(res.write(b"hello", 5), 0);
        assert_eq!(res.size(), 0);
    }

    #[test]
    fn restart_resets_position() {
        let res = ResourceBuffer::new(16);
        res.write(b"abc", 3);
        res.restart();
        assert_eq!(res.size(), 0);
        assert_eq!(res.write(b"xyz", 3), 3);
    }

    #[test]
    fn read_returns_only_whats_been_written() {
        let res = ResourceBuffer::new(16);
        res.write(b"ab", 2);
        let mut out = [0xffu8; 8];
        assert_eq!(res.read(&mut out, 8), 2);
        assert_eq!(&out[..2], b"ab");
    }
}
