//! Bounded single-consumer queues with a drop counter.
//!
//! Posting never blocks and never allocates. The scheduler may run the
//! consumer long after a lower-priority producer posts; the message is
//! already in the queue by value, so nothing it refers to can go stale.
//! When the queue is full the new message is dropped and counted.

use core::sync::atomic::{AtomicU32, Ordering};

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;

use crate::fmt::warn;

pub struct BoundedQueue<T, const N: usize> {
    channel: Channel<CriticalSectionRawMutex, T, N>,
    dropped: AtomicU32,
    name: &'static str,
}

impl<T, const N: usize> BoundedQueue<T, N> {
    pub const fn new(name: &'static str) -> Self {
        Self {
            channel: Channel::new(),
            dropped: AtomicU32::new(0),
            name,
        }
    }

    /// Enqueue without waiting. Returns `false` if the queue was full and
    /// `msg` was dropped.
    pub fn post(&self, msg: T) -> bool {
        if self.channel.try_send(msg).is_ok() {
            return true;
        }
        let dropped = self.dropped.fetch_add(1, Ordering::Relaxed).saturating_add(1);
        warn!("{} queue full, dropped {}", self.name, dropped);
        false
    }

    /// Wait for the next message. Only one task may call this.
    pub async fn receive(&self) -> T {
        self.channel.receive().await
    }

    pub fn try_receive(&self) -> Option<T> {
        self.channel.try_receive().ok()
    }

    /// Messages dropped because the queue was full.
    pub fn dropped(&self) -> u32 {
        self.dropped.load(Ordering::Relaxed)
    }

    pub fn len(&self) -> usize {
        self.channel.len()
    }

    pub fn is_empty(&self) -> bool {
        self.channel.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_queue_drops_newest_and_counts() {
        let q: BoundedQueue<u8, 2> = BoundedQueue::new("test");
        assert!(q.post(1));
        assert!(q.post(2));
        assert!(!q.post(3));
        assert!(!q.post(4));
        assert_eq!(q.dropped(), 2);
        assert_eq!(q.try_receive(), Some(1));
        assert_eq!(q.try_receive(), Some(2));
        assert_eq!(q.try_receive(), None);
    }

    #[tokio::test]
    async fn test_receive_preserves_order() {
        let q: BoundedQueue<u8, 4> = BoundedQueue::new("test");
        q.post(7);
        q.post(9);
        assert_eq!(q.receive().await, 7);
        assert_eq!(q.receive().await, 9);
        assert!(q.is_empty());
    }
}
