//! Lock-free single-producer / single-consumer ring of PCM samples.
//!
//! `AudioRingBuffer<N>` sits between the file-reading producer task and the
//! fixed-rate consumer tick. Every slot and both cursors are atomics, so the
//! type is `Sync` without any `unsafe`, and a shared `&AudioRingBuffer` is all
//! either side needs.
//!
//! # Contract
//!
//! - Only ONE context calls [`write`](AudioRingBuffer::write) /
//!   [`try_write`](AudioRingBuffer::try_write) (the producer).
//! - Only ONE context calls [`read`](AudioRingBuffer::read) (the consumer).
//! - One slot always stays empty, so at most `N - 1` samples are held.
//!
//! `write` never blocks: on a full ring it advances the read cursor first,
//! evicting the oldest unread sample. The consumer claims each sample with a
//! compare-exchange on the read cursor, so a sample the producer evicted
//! concurrently is never delivered.

use core::sync::atomic::{AtomicI16, AtomicUsize, Ordering};

/// Fixed-capacity ring of signed 16-bit samples with drop-oldest overflow.
pub struct AudioRingBuffer<const N: usize> {
    slots: [AtomicI16; N],
    /// Next slot to write (only stored by the producer).
    head: AtomicUsize,
    /// Next slot to read (advanced by the consumer, or by the producer on eviction).
    tail: AtomicUsize,
    evicted: AtomicUsize,
}

impl<const N: usize> AudioRingBuffer<N> {
    /// Create an empty ring.
    ///
    /// # Panics
    ///
    /// Compile-time assertion: `N` must be at least 2 (usable capacity is `N - 1`).
    #[allow(clippy::panic)] // const-evaluated; a bad N fails the build, never at runtime
    pub const fn new() -> Self {
        assert!(N >= 2, "ring needs at least 2 slots (1 usable)");
        Self {
            slots: [const { AtomicI16::new(0) }; N],
            head: AtomicUsize::new(0),
            tail: AtomicUsize::new(0),
            evicted: AtomicUsize::new(0),
        }
    }

    /// Append `sample`, evicting the oldest unread sample if the ring is full.
    #[allow(clippy::arithmetic_side_effects)] // index wrap via % N, N >= 2
    pub fn write(&self, sample: i16) {
        let head = self.head.load(Ordering::Relaxed);
        let next = (head + 1) % N;
        let tail = self.tail.load(Ordering::Acquire);
        if next == tail {
            // Fails only if the consumer just freed the slot itself.
            if self
                .tail
                .compare_exchange(tail, (tail + 1) % N, Ordering::AcqRel, Ordering::Acquire)
                .is_ok()
            {
                self.evicted.fetch_add(1, Ordering::Relaxed);
            }
        }
        if let Some(slot) = self.slots.get(head) {
            slot.store(sample, Ordering::Relaxed);
        }
        self.head.store(next, Ordering::Release);
    }

    /// Append `sample` only if there is room.
    ///
    /// # Errors
    ///
    /// Gives the sample back when the ring is full.
    #[allow(clippy::arithmetic_side_effects)] // index wrap via % N, N >= 2
    pub fn try_write(&self, sample: i16) -> Result<(), i16> {
        if self.is_full() {
            return Err(sample);
        }
        let head = self.head.load(Ordering::Relaxed);
        if let Some(slot) = self.slots.get(head) {
            slot.store(sample, Ordering::Relaxed);
        }
        self.head.store((head + 1) % N, Ordering::Release);
        Ok(())
    }

    /// Take the oldest unread sample; `None` when empty.
    #[allow(clippy::arithmetic_side_effects)] // index wrap via % N, N >= 2
    pub fn read(&self) -> Option<i16> {
        let mut tail = self.tail.load(Ordering::Acquire);
        loop {
            if tail == self.head.load(Ordering::Acquire) {
                return None;
            }
            let sample = self.slots.get(tail)?.load(Ordering::Relaxed);
            match self.tail.compare_exchange_weak(
                tail,
                (tail + 1) % N,
                Ordering::AcqRel,
                Ordering::Acquire,
            ) {
                Ok(_) => return Some(sample),
                // Evicted under us: retry from the new oldest sample.
                Err(current) => tail = current,
            }
        }
    }

    /// Number of unread samples.
    #[allow(clippy::arithmetic_side_effects)] // head, tail < N
    pub fn len(&self) -> usize {
        let head = self.head.load(Ordering::Acquire);
        let tail = self.tail.load(Ordering::Acquire);
        (head + N - tail) % N
    }

    pub fn is_empty(&self) -> bool {
        self.head.load(Ordering::Acquire) == self.tail.load(Ordering::Acquire)
    }

    #[allow(clippy::arithmetic_side_effects)] // index wrap via % N, N >= 2
    pub fn is_full(&self) -> bool {
        let head = self.head.load(Ordering::Acquire);
        (head + 1) % N == self.tail.load(Ordering::Acquire)
    }

    /// Usable capacity, `N - 1`.
    pub const fn capacity(&self) -> usize {
        N.saturating_sub(1)
    }

    /// Samples lost to drop-oldest overflow since the last [`clear`](Self::clear).
    pub fn evicted(&self) -> usize {
        self.evicted.load(Ordering::Relaxed)
    }

    /// Forget all samples and the eviction count.
    ///
    /// Only call while neither side is running (between playbacks).
    pub fn clear(&self) {
        self.head.store(0, Ordering::Release);
        self.tail.store(0, Ordering::Release);
        self.evicted.store(0, Ordering::Relaxed);
    }
}

impl<const N: usize> Default for AudioRingBuffer<N> {
    fn default() -> Self {
        Self::new()
    }
}
