//! Byte buffers for incremental protocol parsing.
//!
//! Network code receives data in arbitrarily sized pieces and has to cut it
//! into records: fixed-size headers, length-prefixed bodies or
//! delimiter-terminated lines. This crate offers two buffers for that job,
//! sharing the [`ByteBuffer`] extraction contract:
//!
//! - [`BufferQueue`] keeps pushed chunks as they are and only copies when a
//!   pop ends inside a chunk or spans several of them. It grows without
//!   bound.
//! - [`RingBuffer`] copies everything into one fixed-size store. Memory use
//!   is bounded; pushes that would exceed it fail.
//!
//! Delimiters may straddle chunk boundaries (queue) or the wrap point (ring).
//! On top of the queue, [`Framer`] offers sans-I/O framing in raw, delimited,
//! fixed-size and length-prefixed modes.
//!
//! Neither buffer is synchronized; share them across threads only behind a
//! lock.
//!
//! ```rust
//! use qbuf::{BufferQueue, ByteBuffer};
//!
//! let mut queue = BufferQueue::with_delimiter(b"\n".to_vec());
//! queue.push(b"foo\nbar\nba".to_vec()).unwrap();
//! queue.push(b"z".to_vec()).unwrap();
//!
//! let lines: Vec<_> = queue.lines().collect::<Result<_, _>>().unwrap();
//! assert_eq!(lines, vec![b"foo".to_vec(), b"bar".to_vec()]);
//! assert_eq!(queue.pop_all().unwrap(), b"baz");
//! ```

#![no_std]
extern crate alloc;

#[cfg(test)]
extern crate std;

mod buffer;
mod chunk_ring;
mod error;
mod framer;
mod lines;
mod options;
mod queue;
mod ring;
mod unpack;

#[cfg(test)]
mod tests;

pub use buffer::ByteBuffer;
pub use error::{BufferError, UnpackError};
pub use framer::{FrameMode, Framer};
pub use lines::Lines;
pub use options::{DEFAULT_INITIAL_CAPACITY, DEFAULT_RING_CAPACITY, QueueOptions, RingOptions};
pub use queue::BufferQueue;
pub use ring::RingBuffer;
pub use unpack::{PrefixWidth, Unpack};
