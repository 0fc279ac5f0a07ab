use alloc::{borrow::Cow, vec, vec::Vec};

use rstest::rstest;

use crate::{BufferError, BufferQueue, ByteBuffer, QueueOptions};

#[test]
fn empty_push_is_ignored() {
    let mut queue = BufferQueue::new();
    queue.push(Vec::new()).unwrap();
    queue.push(&b""[..]).unwrap();
    assert_eq!(queue.len(), 0);
    assert_eq!(queue.chunk_count(), 0);
    assert_eq!(queue.pop_exact(0).unwrap(), b"");
}

#[test]
fn whole_chunk_pop_returns_the_pushed_allocation() {
    let mut queue = BufferQueue::new();
    let chunk = b"hello".to_vec();
    let ptr = chunk.as_ptr();
    queue.push(chunk).unwrap();

    let popped = queue.pop_exact(5).unwrap();
    assert_eq!(popped, b"hello");
    assert_eq!(popped.as_ptr(), ptr);
    assert_eq!(queue.chunk_count(), 0);
}

#[test]
fn remainder_of_partially_read_chunk() {
    let mut queue = BufferQueue::new();
    queue.push(b"abcdef".to_vec()).unwrap();
    assert_eq!(queue.pop_exact(2).unwrap(), b"ab");
    assert_eq!(queue.pop_exact(4).unwrap(), b"cdef");
    assert_eq!(queue.chunk_count(), 0);
    assert!(queue.is_empty());
}

#[rstest]
#[case("foo|bar|baz", 4, "foob")]
#[case("foo|bar|baz", 9, "foobarbaz")]
#[case("f|o|o", 2, "fo")]
#[case("abc|d", 3, "abc")]
fn pop_spanning_chunks(#[case] chunks: &str, #[case] n: usize, #[case] expected: &str) {
    let mut queue = BufferQueue::new();
    queue.push_many(chunks.split('|').map(str::as_bytes)).unwrap();
    let total = queue.len();
    assert_eq!(queue.pop_exact(n).unwrap(), expected.as_bytes());
    assert_eq!(queue.len(), total - n);
}

#[test]
fn underflow_leaves_queue_untouched() {
    let mut queue = BufferQueue::new();
    queue.push(b"abc".to_vec()).unwrap();
    assert_eq!(
        queue.pop_exact(4),
        Err(BufferError::Underflow {
            available: 3,
            requested: 4
        })
    );
    assert_eq!(queue.skip(4), Err(BufferError::underflow(3, 4)));
    assert_eq!(queue.pop_all().unwrap(), b"abc");
}

#[test]
fn pop_at_most_clamps() {
    let mut queue = BufferQueue::new();
    queue.push_many([&b"foo"[..], b"bar", b"baz"]).unwrap();
    assert_eq!(queue.pop_at_most(10).unwrap(), b"foobarbaz");
    assert_eq!(queue.pop_at_most(10).unwrap(), b"");
}

#[test]
fn pop_view_borrows_inside_head_chunk() {
    let mut queue = BufferQueue::new();
    queue.push_many([&b"foo"[..], b"bar"]).unwrap();

    let parts: Vec<(Vec<u8>, bool)> = (0..3)
        .map(|_| {
            let view = queue.pop_view(2).unwrap();
            let borrowed = matches!(view, Cow::Borrowed(_));
            (view.into_owned(), borrowed)
        })
        .collect();
    assert_eq!(
        parts,
        vec![
            (b"fo".to_vec(), true),
            (b"ob".to_vec(), false),
            (b"ar".to_vec(), false),
        ]
    );
    assert_eq!(queue.pop_view(2), Err(BufferError::underflow(0, 2)));
    assert_eq!(queue.pop_view(0).unwrap(), Cow::Borrowed(&b""[..]));
}

#[test]
fn skip_crosses_chunks() {
    let mut queue = BufferQueue::new();
    queue.push_many([&b"ab"[..], b"cd", b"ef"]).unwrap();
    queue.skip(3).unwrap();
    assert_eq!(queue.len(), 3);
    assert_eq!(queue.pop_all().unwrap(), b"def");
}

#[test]
fn growth_preserves_order() {
    let mut queue = BufferQueue::new();
    let mut expected = Vec::new();
    for i in 0..128u8 {
        let chunk = vec![i; usize::from(i) + 1];
        expected.extend_from_slice(&chunk);
        queue.push(chunk).unwrap();
    }
    assert_eq!(queue.chunk_count(), 128);
    assert_eq!(queue.capacity(), 128);
    assert_eq!(queue.pop_all().unwrap(), expected);
}

#[test]
fn growth_while_wrapped_preserves_order() {
    let mut queue = BufferQueue::new();
    let mut expected = Vec::new();
    let mut popped = Vec::new();
    let mut next = 0u8;
    let mut push = |queue: &mut BufferQueue, expected: &mut Vec<u8>| {
        let chunk = vec![next; 23];
        next = next.wrapping_add(1);
        expected.extend_from_slice(&chunk);
        queue.push(chunk).unwrap();
    };
    push(&mut queue, &mut expected);
    for _ in 0..128 {
        push(&mut queue, &mut expected);
        popped.extend(queue.pop_exact(6).unwrap());
    }
    popped.extend(queue.pop_all().unwrap());
    assert_eq!(popped, expected);
}

#[test]
fn clear_resets_but_keeps_capacity() {
    let mut queue = BufferQueue::new();
    for _ in 0..24 {
        queue.push(vec![1u8; 8]).unwrap();
    }
    let capacity = queue.capacity();
    queue.clear();
    assert_eq!(queue.len(), 0);
    assert_eq!(queue.capacity(), capacity);
    assert_eq!(queue.pop_exact(1), Err(BufferError::underflow(0, 1)));

    queue.push(b"again".to_vec()).unwrap();
    assert_eq!(queue.pop_all().unwrap(), b"again");
}

#[test]
fn zero_initial_capacity_is_rejected() {
    let err = BufferQueue::with_options(QueueOptions {
        initial_capacity: 0,
        ..Default::default()
    })
    .unwrap_err();
    assert!(matches!(err, BufferError::InvalidArgument(_)));
}

#[test]
fn small_initial_capacity_grows() {
    let mut queue = BufferQueue::with_options(QueueOptions {
        initial_capacity: 1,
        delimiter: Some(b";".to_vec()),
    })
    .unwrap();
    queue.push_many([&b"a"[..], b"b;", b"c"]).unwrap();
    assert_eq!(queue.capacity(), 4);
    assert_eq!(queue.pop_line().unwrap(), b"ab");
}
