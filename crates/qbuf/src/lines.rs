use alloc::vec::Vec;

use crate::{buffer::ByteBuffer, error::BufferError};

/// Iterator over the complete lines of a buffer, created by
/// [`ByteBuffer::lines`].
///
/// Each step pops one line with the configured delimiter, which is stripped
/// from the yielded bytes. Iteration ends as soon as no further delimiter is
/// buffered; bytes after the last delimiter stay in the buffer. A missing
/// delimiter is reported once as [`BufferError::NoDelimiter`], after which
/// the iterator is exhausted.
#[derive(Debug)]
pub struct Lines<'a, B: ?Sized> {
    buffer: &'a mut B,
    failed: bool,
}

impl<'a, B: ByteBuffer + ?Sized> Lines<'a, B> {
    pub(crate) fn new(buffer: &'a mut B) -> Self {
        Self {
            buffer,
            failed: false,
        }
    }
}

impl<B: ByteBuffer + ?Sized> Iterator for Lines<'_, B> {
    type Item = Result<Vec<u8>, BufferError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        match self.buffer.pop_line() {
            Ok(line) => Some(Ok(line)),
            Err(BufferError::DelimiterNotFound) => None,
            Err(err) => {
                self.failed = true;
                Some(Err(err))
            }
        }
    }
}
