//! Fixed-capacity accumulator for server replies.
//!
//! A reply may arrive over several non-blocking reads. The buffer collects
//! them until the read loop sees a short read (fewer than [`READ_CHUNK`]
//! bytes) or end of stream, and refuses to grow past its capacity so that a
//! misbehaving relay cannot make an attempt allocate without bound.

use bytes::BytesMut;

use crate::error::{Error, Result};

/// Maximum size of one accumulated reply.
pub const RESPONSE_CAPACITY: usize = 1024;

/// Size of a single socket read.
pub const READ_CHUNK: usize = 512;

/// Returns true if a read of `n` bytes ends the current reply.
///
/// A short read is taken as the end of the reply; a zero-length read means
/// the peer closed the connection.
#[must_use]
pub const fn is_final_read(n: usize) -> bool {
    n < READ_CHUNK
}

/// Accumulated bytes of one server reply.
#[derive(Debug)]
pub struct ResponseBuffer {
    data: BytesMut,
    capacity: usize,
}

impl ResponseBuffer {
    /// Creates an empty buffer holding at most [`RESPONSE_CAPACITY`] bytes.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(RESPONSE_CAPACITY)
    }

    /// Creates an empty buffer holding at most `capacity` bytes.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            data: BytesMut::with_capacity(capacity),
            capacity,
        }
    }

    /// Appends one read's worth of bytes.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ResponseOverflow`] if the total would exceed the
    /// capacity. The buffer is left as it was before the call.
    pub fn push(&mut self, chunk: &[u8]) -> Result<()> {
        if self.data.len() + chunk.len() > self.capacity {
            return Err(Error::ResponseOverflow {
                capacity: self.capacity,
            });
        }
        self.data.extend_from_slice(chunk);
        Ok(())
    }

    /// Returns the accumulated bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Returns the three-byte reply code, or `None` if fewer than three bytes
    /// arrived.
    #[must_use]
    pub fn code_prefix(&self) -> Option<&[u8]> {
        self.data.get(..3)
    }

    /// Returns the number of accumulated bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns true if nothing has been accumulated.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns the fixed capacity.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns the reply as text for logging.
    #[must_use]
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.data).trim_end().to_string()
    }
}

impl Default for ResponseBuffer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::redundant_clone, clippy::manual_string_new, clippy::needless_collect, clippy::unreadable_literal, clippy::used_underscore_items, clippy::similar_names)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn accumulates_chunks() {
        let mut buf = ResponseBuffer::new();
        buf.push(b"250-mx.example.com\r\n").unwrap();
        buf.push(b"250 OK\r\n").unwrap();
        assert_eq!(buf.as_bytes(), b"250-mx.example.com\r\n250 OK\r\n");
        assert_eq!(buf.text(), "250-mx.example.com\r\n250 OK");
    }

    #[test]
    fn fills_to_exact_capacity() {
        let mut buf = ResponseBuffer::with_capacity(8);
        buf.push(b"1234").unwrap();
        buf.push(b"5678").unwrap();
        assert_eq!(buf.len(), 8);
    }

    #[test]
    fn overflow_is_rejected_and_leaves_buffer_intact() {
        let mut buf = ResponseBuffer::with_capacity(8);
        buf.push(b"12345").unwrap();
        let err = buf.push(b"6789").unwrap_err();
        assert!(matches!(err, Error::ResponseOverflow { capacity: 8 }));
        assert_eq!(buf.as_bytes(), b"12345");
    }

    #[test]
    fn default_capacity() {
        let buf = ResponseBuffer::default();
        assert!(buf.is_empty());
        assert_eq!(buf.capacity(), RESPONSE_CAPACITY);
    }

    #[test]
    fn code_prefix_needs_three_bytes() {
        let mut buf = ResponseBuffer::new();
        assert_eq!(buf.code_prefix(), None);
        buf.push(b"25").unwrap();
        assert_eq!(buf.code_prefix(), None);
        buf.push(b"0 OK\r\n").unwrap();
        assert_eq!(buf.code_prefix(), Some(&b"250"[..]));
    }

    #[test]
    fn final_read_heuristic() {
        assert!(is_final_read(0));
        assert!(is_final_read(8));
        assert!(is_final_read(READ_CHUNK - 1));
        assert!(!is_final_read(READ_CHUNK));
    }

    proptest! {
        #[test]
        fn never_exceeds_capacity(chunks in prop::collection::vec(
            prop::collection::vec(any::<u8>(), 0..=READ_CHUNK), 0..8)
        ) {
            let mut buf = ResponseBuffer::new();
            let mut overflowed = false;
            for chunk in &chunks {
                let before = buf.len();
                match buf.push(chunk) {
                    Ok(()) => prop_assert_eq!(buf.len(), before + chunk.len()),
                    Err(Error::ResponseOverflow { .. }) => {
                        overflowed = true;
                        prop_assert!(before + chunk.len() > RESPONSE_CAPACITY);
                        prop_assert_eq!(buf.len(), before);
                    }
                    Err(other) => prop_assert!(false, "unexpected error {other}"),
                }
                prop_assert!(buf.len() <= buf.capacity());
            }
            let total: usize = chunks.iter().map(Vec::len).sum();
            if total <= RESPONSE_CAPACITY {
                prop_assert!(!overflowed);
            }
        }
    }
}
