use alloc::vec::Vec;

/// Number of chunk slots a [`BufferQueue`](crate::BufferQueue) starts with.
pub const DEFAULT_INITIAL_CAPACITY: usize = 8;

/// Capacity in bytes of a [`RingBuffer`](crate::RingBuffer) built from
/// [`RingOptions::default`].
pub const DEFAULT_RING_CAPACITY: usize = 4096;

/// Configuration for a [`BufferQueue`](crate::BufferQueue).
///
/// # Examples
///
/// ```rust
/// use qbuf::{BufferQueue, ByteBuffer, QueueOptions};
///
/// let queue = BufferQueue::with_options(QueueOptions {
///     delimiter: Some(b"\r\n".to_vec()),
///     ..Default::default()
/// })
/// .unwrap();
/// assert_eq!(queue.delimiter(), b"\r\n");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct QueueOptions {
    /// Delimiter used by `pop_line`, `pop_lines` and line iteration when no
    /// override is given.
    ///
    /// An empty delimiter behaves exactly like no delimiter.
    ///
    /// # Default
    ///
    /// `None`
    pub delimiter: Option<Vec<u8>>,

    /// Number of chunk slots allocated up front.
    ///
    /// The slot array doubles whenever a push finds it full and never
    /// shrinks. Must be non-zero.
    ///
    /// # Default
    ///
    /// `8`
    pub initial_capacity: usize,
}

impl Default for QueueOptions {
    fn default() -> Self {
        Self {
            delimiter: None,
            initial_capacity: DEFAULT_INITIAL_CAPACITY,
        }
    }
}

/// Configuration for a [`RingBuffer`](crate::RingBuffer).
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RingOptions {
    /// Size of the backing store in bytes, fixed for the lifetime of the
    /// ring. Must be non-zero.
    ///
    /// # Default
    ///
    /// `4096`
    pub capacity: usize,

    /// Delimiter used by `pop_line`, `pop_lines` and line iteration.
    ///
    /// # Default
    ///
    /// `None`
    pub delimiter: Option<Vec<u8>>,
}

impl Default for RingOptions {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_RING_CAPACITY,
            delimiter: None,
        }
    }
}
