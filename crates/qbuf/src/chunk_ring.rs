//! Growable circular array of owned chunks backing [`BufferQueue`].
//!
//! Slots are addressed two ways: *physical* indices into the slot array, used
//! by the delimiter cursor, and the logical window `[start, end)` taken modulo
//! the capacity. The window is empty when `len == 0` and full when
//! `len == capacity`; in both cases `start == end`.
//!
//! [`BufferQueue`]: crate::BufferQueue

use alloc::vec::Vec;

use crate::error::BufferError;

type Slot = Option<Vec<u8>>;

#[derive(Debug)]
pub(crate) struct ChunkRing {
    slots: Vec<Slot>,
    start: usize,
    end: usize,
    len: usize,
}

fn try_alloc_slots(capacity: usize) -> Result<Vec<Slot>, BufferError> {
    let mut slots = Vec::new();
    slots
        .try_reserve_exact(capacity)
        .map_err(|_| BufferError::AllocationFailure {
            bytes: capacity.saturating_mul(core::mem::size_of::<Slot>()),
        })?;
    slots.resize_with(capacity, || None);
    Ok(slots)
}

impl ChunkRing {
    /// `capacity` must be non-zero; callers validate it.
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        debug_assert!(capacity > 0);
        let mut slots = Vec::with_capacity(capacity);
        slots.resize_with(capacity, || None);
        Self {
            slots,
            start: 0,
            end: 0,
            len: 0,
        }
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.len
    }

    #[cfg(test)]
    pub(crate) fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub(crate) fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Physical index of the front chunk, if any.
    #[inline]
    pub(crate) fn head(&self) -> Option<usize> {
        (self.len > 0).then_some(self.start)
    }

    /// Physical index following `slot`, or `None` once the window ends.
    #[inline]
    pub(crate) fn next_slot(&self, slot: usize) -> Option<usize> {
        let next = (slot + 1) % self.capacity();
        (next != self.end).then_some(next)
    }

    /// Bytes held in a physical slot; empty for slots outside the window.
    #[inline]
    pub(crate) fn slot(&self, slot: usize) -> &[u8] {
        self.slots[slot].as_deref().unwrap_or_default()
    }

    pub(crate) fn front(&self) -> Option<&[u8]> {
        self.head().map(|slot| self.slot(slot))
    }

    pub(crate) fn push_back(&mut self, chunk: Vec<u8>) -> Result<(), BufferError> {
        if self.len == self.capacity() {
            self.grow()?;
        }
        self.slots[self.end] = Some(chunk);
        self.end = (self.end + 1) % self.capacity();
        self.len += 1;
        Ok(())
    }

    /// Moves the front chunk out of the ring.
    pub(crate) fn pop_front(&mut self) -> Option<Vec<u8>> {
        if self.len == 0 {
            return None;
        }
        let chunk = self.slots[self.start].take();
        self.start = (self.start + 1) % self.capacity();
        self.len -= 1;
        chunk
    }

    /// Drops every chunk. The slot array keeps its size.
    pub(crate) fn clear(&mut self) {
        while self.pop_front().is_some() {}
        self.start = 0;
        self.end = 0;
    }

    /// Doubles the slot array, moving the window into the upper half so that
    /// logical order is preserved.
    fn grow(&mut self) -> Result<(), BufferError> {
        let old_capacity = self.capacity();
        let new_capacity = old_capacity
            .checked_mul(2)
            .ok_or(BufferError::AllocationFailure { bytes: usize::MAX })?;
        let mut slots = try_alloc_slots(new_capacity)?;
        for i in 0..self.len {
            let from = (self.start + i) % old_capacity;
            slots[old_capacity + i] = self.slots[from].take();
        }
        self.slots = slots;
        self.start = old_capacity;
        self.end = (old_capacity + self.len) % new_capacity;
        log::trace!("chunk ring grew from {old_capacity} to {new_capacity} slots");
        Ok(())
    }

    #[cfg(test)]
    pub(crate) fn iter(&self) -> impl Iterator<Item = &[u8]> {
        (0..self.len).map(move |i| self.slot((self.start + i) % self.capacity()))
    }
}

#[cfg(test)]
mod tests {
    use alloc::{vec, vec::Vec};

    use super::ChunkRing;

    fn chunk(byte: u8) -> Vec<u8> {
        vec![byte; usize::from(byte) + 1]
    }

    #[test]
    fn push_and_pop_in_order() {
        let mut ring = ChunkRing::with_capacity(4);
        for b in 0..3 {
            ring.push_back(chunk(b)).unwrap();
        }
        assert_eq!(ring.len(), 3);
        assert_eq!(ring.front(), Some(&[0u8][..]));
        assert_eq!(ring.pop_front(), Some(chunk(0)));
        assert_eq!(ring.pop_front(), Some(chunk(1)));
        assert_eq!(ring.pop_front(), Some(chunk(2)));
        assert_eq!(ring.pop_front(), None);
        assert!(ring.is_empty());
    }

    #[test]
    fn growth_relocates_window_to_upper_half() {
        let mut ring = ChunkRing::with_capacity(4);
        for b in 0..4 {
            ring.push_back(chunk(b)).unwrap();
        }
        // Rotate so the window wraps the physical end before growing.
        ring.pop_front();
        ring.pop_front();
        ring.push_back(chunk(4)).unwrap();
        ring.push_back(chunk(5)).unwrap();
        assert_eq!(ring.capacity(), 4);

        ring.push_back(chunk(6)).unwrap();
        assert_eq!(ring.capacity(), 8);
        assert_eq!(ring.head(), Some(4));

        let got: Vec<Vec<u8>> = ring.iter().map(<[u8]>::to_vec).collect();
        assert_eq!(got, (2..7).map(chunk).collect::<Vec<_>>());
    }

    #[test]
    fn cursor_walk_stops_at_window_end() {
        let mut ring = ChunkRing::with_capacity(2);
        ring.push_back(chunk(0)).unwrap();
        ring.push_back(chunk(1)).unwrap();
        ring.push_back(chunk(2)).unwrap();

        let mut seen = Vec::new();
        let mut slot = ring.head();
        while let Some(s) = slot {
            seen.push(ring.slot(s).to_vec());
            slot = ring.next_slot(s);
        }
        assert_eq!(seen, vec![chunk(0), chunk(1), chunk(2)]);
    }

    #[test]
    fn clear_keeps_capacity() {
        let mut ring = ChunkRing::with_capacity(1);
        for b in 0..5 {
            ring.push_back(chunk(b)).unwrap();
        }
        let capacity = ring.capacity();
        ring.clear();
        assert!(ring.is_empty());
        assert_eq!(ring.capacity(), capacity);
        assert_eq!(ring.head(), None);
    }
}
