use thiserror::Error;

/// Errors returned by [`BufferQueue`](crate::BufferQueue),
/// [`RingBuffer`](crate::RingBuffer) and [`Framer`](crate::Framer).
///
/// None of these are retried internally. A failed call leaves the buffer
/// exactly as it was before the call.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BufferError {
    /// More bytes were requested than are currently buffered.
    #[error("buffer underflow: currently at {available} bytes, tried to pop {requested} bytes")]
    Underflow {
        /// Bytes buffered at the time of the call.
        available: usize,
        /// Bytes the caller asked for.
        requested: usize,
    },
    /// A push would exceed the fixed capacity of a ring buffer.
    #[error(
        "buffer overflow: holds {capacity} bytes, currently at {length} bytes, tried to add {additional} bytes"
    )]
    Overflow {
        /// Fixed capacity of the ring.
        capacity: usize,
        /// Bytes buffered at the time of the call.
        length: usize,
        /// Bytes the caller tried to add.
        additional: usize,
    },
    /// A size or mode argument that can never be satisfied.
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),
    /// A delimiter-based operation ran with no delimiter, or an empty one.
    #[error("no delimiter")]
    NoDelimiter,
    /// The delimiter does not occur in the buffered bytes.
    #[error("delimiter not found")]
    DelimiterNotFound,
    /// The allocator refused to provide memory for growth or a copy.
    #[error("allocation of {bytes} bytes failed")]
    AllocationFailure {
        /// Size of the allocation that failed, in bytes.
        bytes: usize,
    },
}

impl BufferError {
    pub(crate) fn underflow(available: usize, requested: usize) -> Self {
        Self::Underflow {
            available,
            requested,
        }
    }
}

/// Error returned by [`ByteBuffer::pop_unpack`](crate::ByteBuffer::pop_unpack).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum UnpackError<E> {
    /// Not enough bytes were buffered; nothing was consumed.
    #[error("buffer error: {0}")]
    Buffer(#[from] BufferError),
    /// The bytes were consumed but the external codec rejected them.
    #[error("decode error: {0}")]
    Decode(E),
}
