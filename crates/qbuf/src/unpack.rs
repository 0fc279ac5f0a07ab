//! Seam for decoding fixed-size binary records popped from a buffer.
//!
//! The buffers only know how many bytes a record occupies; interpreting them
//! is left to an [`Unpack`] implementation supplied by the caller.

use crate::error::BufferError;

/// A fixed-size binary format, such as a packed header.
///
/// See [`ByteBuffer::pop_unpack`](crate::ByteBuffer::pop_unpack).
pub trait Unpack {
    /// Decoded value.
    type Output;
    /// Error raised for bytes that do not form a valid record.
    type Error;

    /// Exact number of bytes one record occupies.
    fn size(&self) -> usize;

    /// Decodes one record. `raw` is exactly [`size`](Self::size) bytes long.
    ///
    /// # Errors
    ///
    /// Implementation defined.
    fn unpack(&self, raw: &[u8]) -> Result<Self::Output, Self::Error>;
}

/// Width of a big-endian unsigned length prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PrefixWidth {
    /// One byte.
    U8,
    /// Two bytes, network order.
    U16,
    /// Four bytes, network order.
    U32,
}

impl Unpack for PrefixWidth {
    type Output = usize;
    type Error = BufferError;

    fn size(&self) -> usize {
        match self {
            Self::U8 => 1,
            Self::U16 => 2,
            Self::U32 => 4,
        }
    }

    fn unpack(&self, raw: &[u8]) -> Result<usize, BufferError> {
        let value = raw
            .iter()
            .fold(0u64, |acc, &byte| (acc << 8) | u64::from(byte));
        usize::try_from(value)
            .map_err(|_| BufferError::InvalidArgument("length prefix does not fit in usize"))
    }
}
