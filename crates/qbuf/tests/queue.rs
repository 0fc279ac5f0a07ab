#![allow(missing_docs)]

mod common;

use std::borrow::Cow;

use qbuf::{BufferError, BufferQueue, ByteBuffer, QueueOptions};

use crate::common::{SESSION, init_test_logging, pieces};

#[test]
fn session_lines_survive_any_split() {
    init_test_logging();
    let stream = SESSION.concat();
    for size in 1..=stream.len() {
        let mut queue = BufferQueue::with_delimiter(b"\r\n".to_vec());
        let mut lines = Vec::new();
        for piece in pieces(&stream, size) {
            queue.push(piece).unwrap();
            lines.extend(queue.lines().map(Result::unwrap));
        }
        assert_eq!(
            lines,
            [
                &b"HELO example.org"[..],
                b"MAIL FROM:<a@example.org>",
                b"RCPT TO:<b@example.org>",
                b"DATA",
            ],
            "split into pieces of {size}"
        );
        assert!(queue.is_empty());
    }
}

#[test]
fn header_then_body() {
    init_test_logging();
    let mut queue = BufferQueue::new();
    queue
        .push_many([b"\x00\x00".to_vec(), b"\x00\x05he".to_vec(), b"llo!".to_vec()])
        .unwrap();

    let header = queue.pop_exact(4).unwrap();
    let len = u32::from_be_bytes(header.try_into().unwrap()) as usize;
    assert_eq!(queue.pop_exact(len).unwrap(), b"hello");
    assert_eq!(queue.pop_at_most(64).unwrap(), b"!");
    assert_eq!(queue.pop_at_most(64).unwrap(), b"");
}

#[test]
fn view_is_zero_copy_inside_a_chunk() {
    let mut queue = BufferQueue::new();
    queue.push(b"0123456789".to_vec()).unwrap();
    queue.push(b"abc".to_vec()).unwrap();

    assert!(matches!(queue.pop_view(3).unwrap(), Cow::Borrowed(b"012")));
    assert!(matches!(queue.pop_view(7).unwrap(), Cow::Owned(_)));
    assert_eq!(queue.pop_view(3).unwrap().into_owned(), b"abc");
    assert_eq!(
        queue.pop_view(1),
        Err(BufferError::Underflow {
            available: 0,
            requested: 1,
        })
    );
}

#[test]
fn many_small_chunks_force_growth() {
    init_test_logging();
    let mut queue = BufferQueue::with_options(QueueOptions {
        delimiter: Some(b"\n".to_vec()),
        initial_capacity: 2,
    })
    .unwrap();
    for i in 0..100u8 {
        queue.push(vec![b'a' + i % 26]).unwrap();
        if i % 10 == 9 {
            queue.push(b"\n".to_vec()).unwrap();
        }
    }
    assert_eq!(queue.chunk_count(), 110);
    assert!(queue.capacity() >= 110);

    let lines = queue.pop_lines().unwrap();
    assert_eq!(lines.len(), 10);
    assert_eq!(lines[0], b"abcdefghij");
    assert_eq!(lines[9], b"mnopqrstuv");
    assert!(queue.is_empty());
}

#[test]
fn iterating_without_delimiter_fails_once() {
    let mut queue = BufferQueue::new();
    queue.push(b"a\nb".to_vec()).unwrap();
    let results: Vec<_> = (&mut queue).into_iter().collect();
    assert!(matches!(results.as_slice(), [Err(BufferError::NoDelimiter)]));
    assert_eq!(queue.len(), 3);
}

#[test]
fn delimiter_can_change_between_reads() {
    let mut queue = BufferQueue::with_delimiter(b";".to_vec());
    queue.push(b"a;b|c;".to_vec()).unwrap();
    assert_eq!(queue.pop_line().unwrap(), b"a");
    queue.set_delimiter(b"|".to_vec());
    assert_eq!(queue.pop_line().unwrap(), b"b");
    assert_eq!(queue.pop_line_with_end(Some(&b";"[..])).unwrap(), b"c;");
}
