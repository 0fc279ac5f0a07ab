//! Segmented byte queue.
//!
//! Pushed chunks are stored as they are, without copying, in a [`ChunkRing`].
//! Pops that line up with the front chunk hand that chunk back to the caller
//! unchanged; only pops that end inside a chunk or straddle several of them
//! copy bytes into a fresh buffer.

use alloc::{borrow::Cow, vec::Vec};
use core::fmt;

use bstr::BStr;

use crate::{
    buffer::{ByteBuffer, try_alloc_bytes},
    chunk_ring::ChunkRing,
    error::BufferError,
    lines::Lines,
    options::{DEFAULT_INITIAL_CAPACITY, QueueOptions},
};

/// A queue of byte chunks read back as one contiguous stream.
///
/// # Examples
///
/// ```rust
/// use qbuf::{BufferQueue, ByteBuffer};
///
/// let mut queue = BufferQueue::with_delimiter(b"\r\n".to_vec());
/// queue.push(b"ab".to_vec()).unwrap();
/// queue.push(b"c\r".to_vec()).unwrap();
/// queue.push(b"\nrest".to_vec()).unwrap();
///
/// assert_eq!(queue.pop_line().unwrap(), b"abc");
/// assert_eq!(queue.pop_all().unwrap(), b"rest");
/// ```
pub struct BufferQueue {
    chunks: ChunkRing,
    /// Bytes already consumed from the front chunk.
    offset: usize,
    total: usize,
    delimiter: Vec<u8>,
}

impl BufferQueue {
    /// Creates an empty queue with no delimiter.
    #[must_use]
    pub fn new() -> Self {
        Self::from_parts(DEFAULT_INITIAL_CAPACITY, Vec::new())
    }

    /// Creates an empty queue that splits lines on `delimiter`.
    #[must_use]
    pub fn with_delimiter(delimiter: impl Into<Vec<u8>>) -> Self {
        Self::from_parts(DEFAULT_INITIAL_CAPACITY, delimiter.into())
    }

    /// Creates an empty queue from `options`.
    ///
    /// # Errors
    ///
    /// [`BufferError::InvalidArgument`] if `initial_capacity` is zero.
    pub fn with_options(options: QueueOptions) -> Result<Self, BufferError> {
        if options.initial_capacity == 0 {
            return Err(BufferError::InvalidArgument(
                "initial queue capacity must be non-zero",
            ));
        }
        Ok(Self::from_parts(
            options.initial_capacity,
            options.delimiter.unwrap_or_default(),
        ))
    }

    fn from_parts(capacity: usize, delimiter: Vec<u8>) -> Self {
        Self {
            chunks: ChunkRing::with_capacity(capacity),
            offset: 0,
            total: 0,
            delimiter,
        }
    }

    /// Replaces the delimiter. An empty delimiter disables line popping.
    pub fn set_delimiter(&mut self, delimiter: impl Into<Vec<u8>>) {
        self.delimiter = delimiter.into();
    }

    /// Number of chunks currently held.
    #[must_use]
    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    /// Number of chunk slots allocated. Grows by doubling, never shrinks.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.chunks.capacity()
    }

    /// Appends a chunk. Empty chunks are ignored.
    ///
    /// # Errors
    ///
    /// [`BufferError::AllocationFailure`] if the chunk slots had to grow and
    /// could not. The queue is unchanged in that case.
    pub fn push(&mut self, data: impl Into<Vec<u8>>) -> Result<(), BufferError> {
        let data = data.into();
        if data.is_empty() {
            return Ok(());
        }
        let len = data.len();
        self.chunks.push_back(data)?;
        self.total += len;
        Ok(())
    }

    /// Appends every chunk of `items` in order.
    ///
    /// # Errors
    ///
    /// Stops at the first [`BufferError::AllocationFailure`]; chunks before
    /// it stay pushed.
    pub fn push_many<I>(&mut self, items: I) -> Result<(), BufferError>
    where
        I: IntoIterator,
        I::Item: Into<Vec<u8>>,
    {
        items.into_iter().try_for_each(|item| self.push(item))
    }

    /// Removes `n` bytes, borrowing them from the front chunk when possible.
    ///
    /// The result is borrowed when the request lies strictly inside the front
    /// chunk, and owned otherwise. A borrowed view keeps the queue borrowed,
    /// so it cannot outlive the next push or pop; call
    /// [`Cow::into_owned`] to keep the bytes longer.
    ///
    /// # Errors
    ///
    /// Same as [`ByteBuffer::pop_exact`].
    pub fn pop_view(&mut self, n: usize) -> Result<Cow<'_, [u8]>, BufferError> {
        if n > self.total {
            return Err(BufferError::underflow(self.total, n));
        }
        if n == 0 {
            return Ok(Cow::Borrowed(&[]));
        }
        let start = self.offset;
        let head_len = self.chunks.front().map_or(0, <[u8]>::len);
        if start + n < head_len {
            self.offset += n;
            self.total -= n;
            let head = self.chunks.front().unwrap_or_default();
            return Ok(Cow::Borrowed(&head[start..start + n]));
        }
        self.take(n).map(Cow::Owned)
    }

    /// Drops every chunk. Allocated slots are kept.
    pub fn clear(&mut self) {
        log::trace!(
            "clearing {} bytes in {} chunks",
            self.total,
            self.chunks.len()
        );
        self.chunks.clear();
        self.offset = 0;
        self.total = 0;
    }

    /// Removes exactly `n <= self.total` bytes.
    fn take(&mut self, n: usize) -> Result<Vec<u8>, BufferError> {
        debug_assert!(n <= self.total);
        if n == 0 {
            return Ok(Vec::new());
        }

        let head_len = self.chunks.front().map_or(0, <[u8]>::len);
        if self.offset == 0 && n == head_len {
            let chunk = self.chunks.pop_front().unwrap_or_default();
            self.total -= n;
            return Ok(chunk);
        }

        let mut out = try_alloc_bytes(n)?;
        while out.len() < n {
            let Some(head) = self.chunks.front() else {
                break;
            };
            let available = head.len() - self.offset;
            let step = available.min(n - out.len());
            out.extend_from_slice(&head[self.offset..self.offset + step]);
            if step == available {
                self.chunks.pop_front();
                self.offset = 0;
            } else {
                self.offset += step;
            }
        }
        self.total -= n;
        Ok(out)
    }

    /// Compares `delimiter` against the stream starting at byte `index` of
    /// physical slot `slot`, following the match across chunk boundaries.
    fn matches_across(&self, mut slot: usize, mut index: usize, delimiter: &[u8]) -> bool {
        let mut chunk = self.chunks.slot(slot);
        for &expected in delimiter {
            if chunk.get(index) != Some(&expected) {
                return false;
            }
            index += 1;
            if index == chunk.len() {
                index = 0;
                chunk = match self.chunks.next_slot(slot) {
                    Some(next) => {
                        slot = next;
                        self.chunks.slot(slot)
                    }
                    None => &[],
                };
            }
        }
        true
    }
}

impl ByteBuffer for BufferQueue {
    fn len(&self) -> usize {
        self.total
    }

    fn delimiter(&self) -> &[u8] {
        &self.delimiter
    }

    fn pop_exact(&mut self, n: usize) -> Result<Vec<u8>, BufferError> {
        if n > self.total {
            return Err(BufferError::underflow(self.total, n));
        }
        self.take(n)
    }

    fn skip(&mut self, mut n: usize) -> Result<(), BufferError> {
        if n > self.total {
            return Err(BufferError::underflow(self.total, n));
        }
        self.total -= n;
        while n > 0 {
            let Some(head) = self.chunks.front() else {
                break;
            };
            let available = head.len() - self.offset;
            if n >= available {
                self.chunks.pop_front();
                self.offset = 0;
                n -= available;
            } else {
                self.offset += n;
                n = 0;
            }
        }
        Ok(())
    }

    /// Naive scan: every start position is tried in turn, so the worst case
    /// is `O(len * delimiter.len())`.
    fn find_delimiter_in(&self, delimiter: &[u8]) -> Option<usize> {
        if delimiter.is_empty() || delimiter.len() > self.total {
            return None;
        }
        let mut slot = self.chunks.head()?;
        let mut index = self.offset;
        for pos in 0..=self.total - delimiter.len() {
            let chunk = self.chunks.slot(slot);
            let found = if chunk.len() - index >= delimiter.len() {
                chunk[index..].starts_with(delimiter)
            } else {
                self.matches_across(slot, index, delimiter)
            };
            if found {
                return Some(pos);
            }
            index += 1;
            if index == chunk.len() {
                index = 0;
                slot = self.chunks.next_slot(slot)?;
            }
        }
        None
    }
}

impl Default for BufferQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> IntoIterator for &'a mut BufferQueue {
    type Item = Result<Vec<u8>, BufferError>;
    type IntoIter = Lines<'a, BufferQueue>;

    fn into_iter(self) -> Self::IntoIter {
        Lines::new(self)
    }
}

impl fmt::Debug for BufferQueue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BufferQueue")
            .field("len", &self.total)
            .field("chunks", &self.chunks.len())
            .field("capacity", &self.chunks.capacity())
            .field("delimiter", &BStr::new(&self.delimiter))
            .finish()
    }
}

impl fmt::Display for BufferQueue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BufferQueue of {} bytes", self.total)
    }
}
