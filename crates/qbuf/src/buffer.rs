//! The extraction contract shared by [`BufferQueue`] and [`RingBuffer`].
//!
//! Each structure supplies four primitives: its length, its configured
//! delimiter, an exact-length pop and a delimiter search. Everything built on
//! top of those (clamped pops, line popping, line iteration and decoding
//! through an external codec) is written once here.
//!
//! [`BufferQueue`]: crate::BufferQueue
//! [`RingBuffer`]: crate::RingBuffer

use alloc::vec::Vec;

use crate::{
    error::{BufferError, UnpackError},
    lines::Lines,
    unpack::Unpack,
};

/// Allocates an empty vector able to hold `n` bytes, reporting failure
/// instead of aborting.
pub(crate) fn try_alloc_bytes(n: usize) -> Result<Vec<u8>, BufferError> {
    let mut out = Vec::new();
    out.try_reserve_exact(n)
        .map_err(|_| BufferError::AllocationFailure { bytes: n })?;
    Ok(out)
}

/// A byte buffer that records can be popped from.
///
/// All popping methods remove bytes from the front. On error nothing is
/// consumed.
pub trait ByteBuffer {
    /// Number of buffered bytes.
    fn len(&self) -> usize;

    /// The configured delimiter; empty when none is set.
    fn delimiter(&self) -> &[u8];

    /// Removes and returns exactly `n` bytes.
    ///
    /// # Errors
    ///
    /// [`BufferError::Underflow`] if fewer than `n` bytes are buffered, or
    /// [`BufferError::AllocationFailure`] if the result cannot be allocated.
    fn pop_exact(&mut self, n: usize) -> Result<Vec<u8>, BufferError>;

    /// Discards exactly `n` bytes without materializing them.
    ///
    /// # Errors
    ///
    /// [`BufferError::Underflow`] if fewer than `n` bytes are buffered.
    fn skip(&mut self, n: usize) -> Result<(), BufferError>;

    /// Offset from the front of the first occurrence of `delimiter`.
    ///
    /// Returns `None` for an empty delimiter, for one longer than the buffered
    /// data, and when there is no match.
    fn find_delimiter_in(&self, delimiter: &[u8]) -> Option<usize>;

    /// Returns `true` when no bytes are buffered.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Offset of the configured delimiter, see
    /// [`find_delimiter_in`](Self::find_delimiter_in).
    fn find_delimiter(&self) -> Option<usize> {
        self.find_delimiter_in(self.delimiter())
    }

    /// Removes up to `n` bytes, returning fewer if less is buffered.
    ///
    /// # Errors
    ///
    /// [`BufferError::AllocationFailure`] only.
    fn pop_at_most(&mut self, n: usize) -> Result<Vec<u8>, BufferError> {
        let n = n.min(self.len());
        self.pop_exact(n)
    }

    /// Drains the whole buffer.
    ///
    /// # Errors
    ///
    /// [`BufferError::AllocationFailure`] only.
    fn pop_all(&mut self) -> Result<Vec<u8>, BufferError> {
        let n = self.len();
        self.pop_exact(n)
    }

    /// Pops the bytes before the configured delimiter and discards the
    /// delimiter itself.
    ///
    /// # Errors
    ///
    /// [`BufferError::NoDelimiter`] if no delimiter is configured,
    /// [`BufferError::DelimiterNotFound`] if it does not occur yet.
    fn pop_line(&mut self) -> Result<Vec<u8>, BufferError> {
        self.pop_line_with(None)
    }

    /// Like [`pop_line`](Self::pop_line), searching for `delimiter` instead
    /// of the configured one when it is given.
    ///
    /// # Errors
    ///
    /// [`BufferError::NoDelimiter`] if the effective delimiter is empty,
    /// [`BufferError::DelimiterNotFound`] if it does not occur yet.
    fn pop_line_with(&mut self, delimiter: Option<&[u8]>) -> Result<Vec<u8>, BufferError> {
        let (offset, delimiter_len) = locate_line(self, delimiter)?;
        let line = self.pop_exact(offset)?;
        self.skip(delimiter_len)?;
        Ok(line)
    }

    /// Like [`pop_line_with`](Self::pop_line_with) but keeps the delimiter at
    /// the end of the returned line.
    ///
    /// # Errors
    ///
    /// Same as [`pop_line_with`](Self::pop_line_with).
    fn pop_line_with_end(&mut self, delimiter: Option<&[u8]>) -> Result<Vec<u8>, BufferError> {
        let (offset, delimiter_len) = locate_line(self, delimiter)?;
        self.pop_exact(offset + delimiter_len)
    }

    /// Pops every complete line using the configured delimiter.
    ///
    /// # Errors
    ///
    /// [`BufferError::NoDelimiter`] if no delimiter is configured.
    fn pop_lines(&mut self) -> Result<Vec<Vec<u8>>, BufferError> {
        self.pop_lines_with(None)
    }

    /// Pops every complete line, searching for `delimiter` when given.
    ///
    /// # Errors
    ///
    /// [`BufferError::NoDelimiter`] if the effective delimiter is empty.
    fn pop_lines_with(&mut self, delimiter: Option<&[u8]>) -> Result<Vec<Vec<u8>>, BufferError> {
        if delimiter.unwrap_or_else(|| self.delimiter()).is_empty() {
            return Err(BufferError::NoDelimiter);
        }
        let mut lines = Vec::new();
        loop {
            match self.pop_line_with(delimiter) {
                Ok(line) => lines.push(line),
                Err(BufferError::DelimiterNotFound) => return Ok(lines),
                Err(err) => return Err(err),
            }
        }
    }

    /// Iterates over complete lines, popping each one as it is yielded.
    fn lines(&mut self) -> Lines<'_, Self>
    where
        Self: Sized,
    {
        Lines::new(self)
    }

    /// Pops exactly `format.size()` bytes and decodes them with `format`.
    ///
    /// # Errors
    ///
    /// [`UnpackError::Buffer`] if too few bytes are buffered, in which case
    /// nothing is consumed. [`UnpackError::Decode`] if the codec rejects the
    /// bytes; they have been consumed by then.
    fn pop_unpack<U: Unpack>(&mut self, format: &U) -> Result<U::Output, UnpackError<U::Error>>
    where
        Self: Sized,
    {
        let raw = self.pop_exact(format.size())?;
        format.unpack(&raw).map_err(UnpackError::Decode)
    }
}

/// Resolves the effective delimiter and finds it, returning the line length
/// and the delimiter length.
fn locate_line<B: ByteBuffer + ?Sized>(
    buffer: &B,
    delimiter: Option<&[u8]>,
) -> Result<(usize, usize), BufferError> {
    let delimiter = delimiter.unwrap_or_else(|| buffer.delimiter());
    if delimiter.is_empty() {
        return Err(BufferError::NoDelimiter);
    }
    let offset = buffer
        .find_delimiter_in(delimiter)
        .ok_or(BufferError::DelimiterNotFound)?;
    Ok((offset, delimiter.len()))
}
