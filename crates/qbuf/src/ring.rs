//! Fixed-capacity contiguous ring buffer.
//!
//! All data is copied into one backing store allocated at construction.
//! Reads and writes that run past the physical end of the store continue at
//! offset zero, so each of them is at most two copies.

use alloc::{boxed::Box, vec::Vec};
use core::fmt;

use bstr::BStr;

use crate::{
    buffer::{ByteBuffer, try_alloc_bytes},
    error::BufferError,
    lines::Lines,
    options::RingOptions,
};

/// A byte ring of fixed capacity.
///
/// Popped bytes are always copied out: the backing store is overwritten by
/// later pushes, so no view into it is ever handed out.
///
/// # Examples
///
/// ```rust
/// use qbuf::{ByteBuffer, RingBuffer};
///
/// let mut ring = RingBuffer::new(8).unwrap();
/// ring.push(b"abcdef").unwrap();
/// assert_eq!(ring.pop_exact(4).unwrap(), b"abcd");
/// ring.push(b"ghijkl").unwrap();
/// assert_eq!(ring.pop_all().unwrap(), b"efghijkl");
/// ```
pub struct RingBuffer {
    storage: Box<[u8]>,
    read: usize,
    write: usize,
    len: usize,
    delimiter: Vec<u8>,
}

impl RingBuffer {
    /// Creates an empty ring holding at most `capacity` bytes.
    ///
    /// # Errors
    ///
    /// [`BufferError::InvalidArgument`] if `capacity` is zero,
    /// [`BufferError::AllocationFailure`] if the store cannot be allocated.
    pub fn new(capacity: usize) -> Result<Self, BufferError> {
        Self::with_options(RingOptions {
            capacity,
            delimiter: None,
        })
    }

    /// Creates an empty ring from `options`.
    ///
    /// # Errors
    ///
    /// Same as [`RingBuffer::new`].
    pub fn with_options(options: RingOptions) -> Result<Self, BufferError> {
        if options.capacity == 0 {
            return Err(BufferError::InvalidArgument(
                "ring capacity must be non-zero",
            ));
        }
        let mut storage = try_alloc_bytes(options.capacity)?;
        storage.resize(options.capacity, 0);
        Ok(Self {
            storage: storage.into_boxed_slice(),
            read: 0,
            write: 0,
            len: 0,
            delimiter: options.delimiter.unwrap_or_default(),
        })
    }

    /// Replaces the delimiter. An empty delimiter disables line popping.
    pub fn set_delimiter(&mut self, delimiter: impl Into<Vec<u8>>) {
        self.delimiter = delimiter.into();
    }

    /// Fixed size of the backing store in bytes.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.storage.len()
    }

    /// Bytes that can still be pushed.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.capacity() - self.len
    }

    /// Returns `true` when no more bytes can be pushed.
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.len == self.capacity()
    }

    fn overflow(&self, additional: usize) -> BufferError {
        log::debug!(
            "rejecting push of {additional} bytes: {}/{} bytes in use",
            self.len,
            self.capacity()
        );
        BufferError::Overflow {
            capacity: self.capacity(),
            length: self.len,
            additional,
        }
    }

    /// Copies `data` in behind the buffered bytes.
    ///
    /// # Errors
    ///
    /// [`BufferError::Overflow`] if `data` does not fit; nothing is written.
    pub fn push(&mut self, data: &[u8]) -> Result<(), BufferError> {
        if data.len() > self.remaining() {
            return Err(self.overflow(data.len()));
        }
        let capacity = self.capacity();
        let first = data.len().min(capacity - self.write);
        self.storage[self.write..self.write + first].copy_from_slice(&data[..first]);
        self.storage[..data.len() - first].copy_from_slice(&data[first..]);
        self.write = (self.write + data.len()) % capacity;
        self.len += data.len();
        Ok(())
    }

    /// Pushes every item of `items` in order.
    ///
    /// # Errors
    ///
    /// [`BufferError::Overflow`] if the items do not fit together; nothing is
    /// written.
    pub fn push_many<T: AsRef<[u8]>>(&mut self, items: &[T]) -> Result<(), BufferError> {
        let total = items
            .iter()
            .try_fold(0usize, |acc, item| acc.checked_add(item.as_ref().len()))
            .unwrap_or(usize::MAX);
        if total > self.remaining() {
            return Err(self.overflow(total));
        }
        items.iter().try_for_each(|item| self.push(item.as_ref()))
    }

    /// Forgets all buffered bytes.
    pub fn clear(&mut self) {
        self.read = 0;
        self.write = 0;
        self.len = 0;
    }

    /// Whether `delimiter` matches the bytes `delta` positions past the read
    /// cursor, comparing in two parts if the candidate crosses the wrap point.
    fn matches_at(&self, delta: usize, delimiter: &[u8]) -> bool {
        let begin = (self.read + delta) % self.capacity();
        let split = self.capacity() - begin;
        if delimiter.len() <= split {
            self.storage[begin..begin + delimiter.len()] == *delimiter
        } else {
            let (head, tail) = delimiter.split_at(split);
            self.storage[begin..] == *head && self.storage[..tail.len()] == *tail
        }
    }
}

impl ByteBuffer for RingBuffer {
    fn len(&self) -> usize {
        self.len
    }

    fn delimiter(&self) -> &[u8] {
        &self.delimiter
    }

    fn pop_exact(&mut self, n: usize) -> Result<Vec<u8>, BufferError> {
        if n > self.len {
            return Err(BufferError::underflow(self.len, n));
        }
        let mut out = try_alloc_bytes(n)?;
        let capacity = self.capacity();
        let first = n.min(capacity - self.read);
        out.extend_from_slice(&self.storage[self.read..self.read + first]);
        out.extend_from_slice(&self.storage[..n - first]);
        self.read = (self.read + n) % capacity;
        self.len -= n;
        Ok(out)
    }

    fn skip(&mut self, n: usize) -> Result<(), BufferError> {
        if n > self.len {
            return Err(BufferError::underflow(self.len, n));
        }
        self.read = (self.read + n) % self.capacity();
        self.len -= n;
        Ok(())
    }

    /// Naive scan over every candidate offset, `O(len * delimiter.len())`.
    fn find_delimiter_in(&self, delimiter: &[u8]) -> Option<usize> {
        if delimiter.is_empty() || delimiter.len() > self.len {
            return None;
        }
        (0..=self.len - delimiter.len()).find(|&delta| self.matches_at(delta, delimiter))
    }
}

impl<'a> IntoIterator for &'a mut RingBuffer {
    type Item = Result<Vec<u8>, BufferError>;
    type IntoIter = Lines<'a, RingBuffer>;

    fn into_iter(self) -> Self::IntoIter {
        Lines::new(self)
    }
}

impl fmt::Debug for RingBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RingBuffer")
            .field("len", &self.len)
            .field("capacity", &self.capacity())
            .field("read", &self.read)
            .field("write", &self.write)
            .field("delimiter", &BStr::new(&self.delimiter))
            .finish()
    }
}

impl fmt::Display for RingBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RingBuffer of {}/{} bytes", self.len, self.capacity())
    }
}
