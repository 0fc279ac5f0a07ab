#![no_main]
use std::collections::VecDeque;

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use qbuf::{BufferError, BufferQueue, ByteBuffer, RingBuffer};

#[derive(Debug, Arbitrary)]
enum Op {
    Push(Vec<u8>),
    Pop(u8),
    PopAtMost(u8),
    PopLine,
    PopLineWithEnd,
    Skip(u8),
    Clear,
}

#[derive(Debug, Arbitrary)]
struct Input {
    capacity: u8,
    delimiter: Vec<u8>,
    ops: Vec<Op>,
}

/// Position of the first occurrence of `needle`, by brute force.
fn find(haystack: &VecDeque<u8>, needle: &[u8]) -> Option<usize> {
    if needle.is_empty() || needle.len() > haystack.len() {
        return None;
    }
    (0..=haystack.len() - needle.len())
        .find(|&at| needle.iter().enumerate().all(|(i, b)| haystack[at + i] == *b))
}

fn model_pop(model: &mut VecDeque<u8>, n: usize) -> Result<Vec<u8>, BufferError> {
    if n > model.len() {
        return Err(BufferError::Underflow {
            available: model.len(),
            requested: n,
        });
    }
    Ok(model.drain(..n).collect())
}

fn model_line(model: &mut VecDeque<u8>, delimiter: &[u8], keep: bool) -> Result<Vec<u8>, BufferError> {
    if delimiter.is_empty() {
        return Err(BufferError::NoDelimiter);
    }
    let at = find(model, delimiter).ok_or(BufferError::DelimiterNotFound)?;
    let line: Vec<u8> = model.drain(..at + delimiter.len()).collect();
    Ok(if keep { line } else { line[..at].to_vec() })
}

fn check(input: Input) {
    let capacity = usize::from(input.capacity) + 1;
    let delimiter = input.delimiter;

    let mut queue = BufferQueue::with_delimiter(delimiter.clone());
    let mut ring = RingBuffer::new(capacity).unwrap();
    ring.set_delimiter(delimiter.clone());
    let mut model = VecDeque::new();
    let mut ring_model = VecDeque::new();

    for op in input.ops {
        match op {
            Op::Push(data) => {
                queue.push(data.clone()).unwrap();
                let fits = ring_model.len() + data.len() <= capacity;
                assert_eq!(ring.push(&data).is_ok(), fits);
                if fits {
                    ring_model.extend(&data);
                }
                model.extend(data);
            }
            Op::Pop(n) => {
                let n = usize::from(n);
                assert_eq!(queue.pop_exact(n), model_pop(&mut model, n));
                assert_eq!(ring.pop_exact(n), model_pop(&mut ring_model, n));
            }
            Op::PopAtMost(n) => {
                let n = usize::from(n);
                let (queued, ringed) = (n.min(model.len()), n.min(ring_model.len()));
                assert_eq!(queue.pop_at_most(n), model_pop(&mut model, queued));
                assert_eq!(ring.pop_at_most(n), model_pop(&mut ring_model, ringed));
            }
            Op::PopLine => {
                assert_eq!(queue.pop_line(), model_line(&mut model, &delimiter, false));
                assert_eq!(ring.pop_line(), model_line(&mut ring_model, &delimiter, false));
            }
            Op::PopLineWithEnd => {
                assert_eq!(
                    queue.pop_line_with_end(None),
                    model_line(&mut model, &delimiter, true)
                );
                assert_eq!(
                    ring.pop_line_with_end(None),
                    model_line(&mut ring_model, &delimiter, true)
                );
            }
            Op::Skip(n) => {
                let n = usize::from(n);
                assert_eq!(queue.skip(n).is_ok(), model_pop(&mut model, n).is_ok());
                assert_eq!(ring.skip(n).is_ok(), model_pop(&mut ring_model, n).is_ok());
            }
            Op::Clear => {
                queue.clear();
                ring.clear();
                model.clear();
                ring_model.clear();
            }
        }
        assert_eq!(queue.len(), model.len());
        assert_eq!(ring.len(), ring_model.len());
    }
}

fuzz_target!(|input: Input| check(input));
