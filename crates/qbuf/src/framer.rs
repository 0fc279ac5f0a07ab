//! Sans-I/O framing on top of [`BufferQueue`].
//!
//! A [`Framer`] is fed whatever bytes a transport delivers and yields complete
//! frames as an iterator, in one of several [`FrameMode`]s. It never reads or
//! writes a socket itself.
//!
//! ```rust
//! use qbuf::{FrameMode, Framer, PrefixWidth};
//!
//! let mut framer = Framer::new(FrameMode::LengthPrefixed(PrefixWidth::U16));
//! framer.feed(b"\x00\x05hel".to_vec()).unwrap();
//! assert!(framer.next().is_none());
//!
//! framer.feed(b"lo\x00\x00".to_vec()).unwrap();
//! let frames: Vec<_> = framer.by_ref().collect::<Result<_, _>>().unwrap();
//! assert_eq!(frames, vec![b"hello".to_vec(), Vec::new()]);
//! ```

use alloc::{collections::VecDeque, vec::Vec};

use crate::{
    buffer::ByteBuffer,
    error::{BufferError, UnpackError},
    queue::BufferQueue,
    unpack::{PrefixWidth, Unpack},
};

/// How the buffered stream is cut into frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FrameMode {
    /// Everything buffered is one frame.
    Raw,
    /// One frame per delimiter-terminated line, delimiter stripped.
    Delimited,
    /// Frames of exactly this many bytes. Must be non-zero.
    Fixed(usize),
    /// A big-endian length header followed by that many bytes of body.
    LengthPrefixed(PrefixWidth),
}

impl FrameMode {
    fn validate(self) -> Result<Self, BufferError> {
        match self {
            Self::Fixed(0) => Err(BufferError::InvalidArgument(
                "fixed frame size must be non-zero",
            )),
            mode => Ok(mode),
        }
    }
}

/// A queued one-shot read that overrides the default mode for one frame.
#[derive(Debug)]
struct Request {
    mode: FrameMode,
    delimiter: Option<Vec<u8>>,
}

/// Cuts an incoming byte stream into frames.
///
/// The default [`FrameMode`] applies unless one-shot requests are queued with
/// [`request`](Self::request) or [`request_line`](Self::request_line); those
/// are served first, in the order they were made, one frame each.
///
/// Iteration yields `Ok(frame)` for every complete frame and stops once the
/// buffered bytes do not make up another one. An error, such as a delimited
/// read with no delimiter configured, is yielded once without consuming
/// input; iteration then stops until the framer is fed or reconfigured.
///
/// Once a length header has been consumed, its body is the next frame, even
/// if one-shot requests are queued after the header was read.
#[derive(Debug)]
pub struct Framer {
    buffer: BufferQueue,
    mode: FrameMode,
    requests: VecDeque<Request>,
    pending_body: Option<PendingBody>,
    failed: bool,
    closed: bool,
}

/// A length-prefixed frame whose header was consumed.
#[derive(Debug, Clone, Copy)]
struct PendingBody {
    len: usize,
    /// The header was read for the front one-shot request.
    for_request: bool,
}

impl Framer {
    /// Creates a framer in `mode` with `\r\n` as line delimiter.
    ///
    /// A zero-sized [`FrameMode::Fixed`] falls back to [`FrameMode::Raw`];
    /// use [`set_mode`](Self::set_mode) to get an error instead.
    #[must_use]
    pub fn new(mode: FrameMode) -> Self {
        Self {
            buffer: BufferQueue::with_delimiter(b"\r\n".to_vec()),
            mode: mode.validate().unwrap_or(FrameMode::Raw),
            requests: VecDeque::new(),
            pending_body: None,
            failed: false,
            closed: false,
        }
    }

    /// Current default mode.
    #[must_use]
    pub fn mode(&self) -> FrameMode {
        self.mode
    }

    /// Switches the default mode. A length-prefixed frame partially read in
    /// the old default mode is forgotten; its body bytes stay buffered.
    ///
    /// # Errors
    ///
    /// [`BufferError::InvalidArgument`] for `FrameMode::Fixed(0)`.
    pub fn set_mode(&mut self, mode: FrameMode) -> Result<(), BufferError> {
        self.mode = mode.validate()?;
        if self.pending_body.is_some_and(|body| !body.for_request) {
            self.pending_body = None;
        }
        self.failed = false;
        log::trace!("framer mode set to {mode:?}");
        Ok(())
    }

    /// The line delimiter used in [`FrameMode::Delimited`].
    #[must_use]
    pub fn delimiter(&self) -> &[u8] {
        self.buffer.delimiter()
    }

    /// Replaces the line delimiter.
    pub fn set_delimiter(&mut self, delimiter: impl Into<Vec<u8>>) {
        self.buffer.set_delimiter(delimiter);
        self.failed = false;
    }

    /// Queues a one-shot read of a single frame in `mode`.
    ///
    /// # Errors
    ///
    /// [`BufferError::InvalidArgument`] for `FrameMode::Fixed(0)`.
    pub fn request(&mut self, mode: FrameMode) -> Result<(), BufferError> {
        self.requests.push_back(Request {
            mode: mode.validate()?,
            delimiter: None,
        });
        self.failed = false;
        Ok(())
    }

    /// Queues a one-shot read of a single line, split on `delimiter` if given
    /// and on the configured delimiter otherwise.
    pub fn request_line(&mut self, delimiter: Option<Vec<u8>>) {
        self.requests.push_back(Request {
            mode: FrameMode::Delimited,
            delimiter,
        });
        self.failed = false;
    }

    /// Number of one-shot requests not yet served.
    #[must_use]
    pub fn pending_requests(&self) -> usize {
        self.requests.len()
    }

    /// Buffers incoming bytes. Ignored once the framer is closed.
    ///
    /// # Errors
    ///
    /// [`BufferError::AllocationFailure`] from the underlying queue.
    pub fn feed(&mut self, data: impl Into<Vec<u8>>) -> Result<(), BufferError> {
        if self.closed {
            return Ok(());
        }
        self.failed = false;
        self.buffer.push(data)
    }

    /// Drops buffered input and outstanding requests; later input is ignored.
    pub fn close(&mut self) {
        log::debug!(
            "closing framer with {} buffered bytes and {} pending requests",
            self.buffer.len(),
            self.requests.len()
        );
        self.buffer.clear();
        self.requests.clear();
        self.pending_body = None;
        self.closed = true;
    }

    /// Whether [`close`](Self::close) was called.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// The bytes buffered so far.
    #[must_use]
    pub fn buffer(&self) -> &BufferQueue {
        &self.buffer
    }

    /// Gives up framing and returns the buffered bytes.
    #[must_use]
    pub fn into_buffer(self) -> BufferQueue {
        self.buffer
    }

    /// Reads a length header, then tries to complete its body.
    fn length_prefixed(
        &mut self,
        width: PrefixWidth,
        for_request: bool,
    ) -> Option<Result<Vec<u8>, BufferError>> {
        if self.buffer.len() < width.size() {
            return None;
        }
        match self.buffer.pop_unpack(&width) {
            Ok(len) => self.finish_body(PendingBody { len, for_request }),
            Err(UnpackError::Buffer(err) | UnpackError::Decode(err)) => Some(Err(err)),
        }
    }

    fn finish_body(&mut self, body: PendingBody) -> Option<Result<Vec<u8>, BufferError>> {
        if self.buffer.len() < body.len {
            self.pending_body = Some(body);
            return None;
        }
        self.pending_body = None;
        let frame = self.buffer.pop_exact(body.len);
        if body.for_request && frame.is_ok() {
            self.requests.pop_front();
        }
        Some(frame)
    }

    fn next_frame(&mut self) -> Option<Result<Vec<u8>, BufferError>> {
        if let Some(body) = self.pending_body {
            return self.finish_body(body);
        }
        let (mode, delimiter, for_request) = match self.requests.front() {
            Some(request) => (request.mode, request.delimiter.as_deref(), true),
            None => (self.mode, None, false),
        };
        let frame = match mode {
            FrameMode::Raw if self.buffer.is_empty() => return None,
            FrameMode::Raw => self.buffer.pop_all(),
            FrameMode::Delimited => match self.buffer.pop_line_with(delimiter) {
                Err(BufferError::DelimiterNotFound) => return None,
                result => result,
            },
            FrameMode::Fixed(n) if self.buffer.len() < n => return None,
            FrameMode::Fixed(n) => self.buffer.pop_exact(n),
            FrameMode::LengthPrefixed(width) => return self.length_prefixed(width, for_request),
        };
        if for_request && frame.is_ok() {
            self.requests.pop_front();
        }
        Some(frame)
    }
}

impl Iterator for Framer {
    type Item = Result<Vec<u8>, BufferError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.closed || self.failed {
            return None;
        }
        let frame = self.next_frame()?;
        self.failed = frame.is_err();
        Some(frame)
    }
}
