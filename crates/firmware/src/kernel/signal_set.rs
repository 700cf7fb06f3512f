//! Level-triggered bit flags that tasks block on.
//!
//! Bits stay set until someone clears them; waiting never consumes a bit.
//! Any number of tasks may wait on the same set, each on its own mask.

use core::cell::RefCell;
use core::future::poll_fn;
use core::task::Poll;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::waitqueue::MultiWakerRegistration;

/// Tasks that can be parked on one set at the same time.
const MAX_WAITERS: usize = 8;

struct Inner {
    bits: u32,
    waiters: MultiWakerRegistration<MAX_WAITERS>,
}

/// A 32-bit signal set.
///
/// Safe to `set`/`clear` from interrupt context: every access runs inside a
/// critical section.
pub struct SignalSet {
    inner: Mutex<CriticalSectionRawMutex, RefCell<Inner>>,
}

impl SignalSet {
    /// All bits clear.
    pub const fn new() -> Self {
        Self {
            inner: Mutex::new(RefCell::new(Inner {
                bits: 0,
                waiters: MultiWakerRegistration::new(),
            })),
        }
    }

    /// Set `bits`, waking every waiter. Returns the value after setting.
    pub fn set(&self, bits: u32) -> u32 {
        self.update(|value| value | bits)
    }

    /// Clear `bits`, waking every waiter. Returns the value before clearing.
    pub fn clear(&self, bits: u32) -> u32 {
        let mut before = 0;
        self.update(|value| {
            before = value;
            value & !bits
        });
        before
    }

    pub fn get(&self) -> u32 {
        self.inner.lock(|inner| inner.borrow().bits)
    }

    /// Set `bits` only if every bit of `required` is already set, as one
    /// atomic step. Returns whether the bits were set.
    pub fn set_if(&self, required: u32, bits: u32) -> bool {
        self.inner.lock(|inner| {
            let mut inner = inner.borrow_mut();
            if inner.bits & required != required {
                return false;
            }
            inner.bits |= bits;
            inner.waiters.wake();
            true
        })
    }

    fn update(&self, f: impl FnOnce(u32) -> u32) -> u32 {
        self.inner.lock(|inner| {
            let mut inner = inner.borrow_mut();
            let next = f(inner.bits);
            if next != inner.bits {
                inner.bits = next;
                inner.waiters.wake();
            }
            next
        })
    }

    /// Wait until `ready(bits)` holds; resolves to the bits seen.
    async fn wait_until(&self, ready: impl Fn(u32) -> bool) -> u32 {
        poll_fn(|cx| {
            self.inner.lock(|inner| {
                let mut inner = inner.borrow_mut();
                if ready(inner.bits) {
                    Poll::Ready(inner.bits)
                } else {
                    inner.waiters.register(cx.waker());
                    Poll::Pending
                }
            })
        })
        .await
    }

    /// Wait until any bit of `mask` is set.
    pub async fn wait_any(&self, mask: u32) -> u32 {
        self.wait_until(|bits| bits & mask != 0).await
    }

    /// Wait until every bit of `mask` is set.
    pub async fn wait_all(&self, mask: u32) -> u32 {
        self.wait_until(|bits| bits & mask == mask).await
    }

    /// Wait until every bit of `mask` is clear.
    pub async fn wait_clear(&self, mask: u32) -> u32 {
        self.wait_until(|bits| bits & mask == 0).await
    }
}

impl Default for SignalSet {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use embassy_futures::join::join;
    use embassy_futures::yield_now;

    #[test]
    fn test_set_and_clear_return_values() {
        let set = SignalSet::new();
        assert_eq!(set.set(0b0101), 0b0101);
        assert_eq!(set.clear(0b0001), 0b0101);
        assert_eq!(set.get(), 0b0100);
    }

    #[test]
    fn test_set_if_requires_all_bits() {
        let set = SignalSet::new();
        assert!(!set.set_if(0b01, 0b10));
        set.set(0b01);
        assert!(set.set_if(0b01, 0b10));
        assert_eq!(set.get(), 0b11);
    }

    #[tokio::test]
    async fn test_wait_any_does_not_consume() {
        let set = SignalSet::new();
        set.set(0b100);
        assert_eq!(set.wait_any(0b110).await, 0b100);
        assert_eq!(set.wait_any(0b100).await, 0b100);
        assert_eq!(set.get(), 0b100);
    }

    #[tokio::test]
    async fn test_wait_all_blocks_until_complete() {
        let set = SignalSet::new();
        let waiter = set.wait_all(0b11);
        let setter = async {
            set.set(0b01);
            yield_now().await;
            set.set(0b10);
        };
        let (bits, ()) = join(waiter, setter).await;
        assert_eq!(bits, 0b11);
    }

    #[tokio::test]
    async fn test_wait_clear_wakes_on_clear() {
        let set = SignalSet::new();
        set.set(0b1000);
        let waiter = set.wait_clear(0b1000);
        let clearer = async {
            yield_now().await;
            set.clear(0b1000);
        };
        let (bits, ()) = join(waiter, clearer).await;
        assert_eq!(bits & 0b1000, 0);
    }
}
