use core::{
    cell::RefCell,
    future::poll_fn,
    ops::BitOr,
    sync::atomic::{AtomicU32, Ordering},
    task::Poll,
};

use embassy_sync::{
    blocking_mutex::{raw::CriticalSectionRawMutex, Mutex},
    waitqueue::MultiWakerRegistration,
};

const EVENT_BUS_WAITERS: usize = 4;

/// Set of independent connection conditions.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Conditions(u32);

impl Conditions {
    pub const NONE: Self = Self(0);
    pub const CONNECTED: Self = Self(1 << 0);
    pub const RETRY_IN_PROGRESS: Self = Self(1 << 1);
    /// Only meaningful while `RETRY_IN_PROGRESS` is set.
    pub const ATTEMPT_FAILED: Self = Self(1 << 2);

    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    pub const fn intersects(self, other: Self) -> bool {
        self.0 & other.0 != 0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl BitOr for Conditions {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

/// Atomic condition flags with async waiters, the only channel between the
/// link event handler and the retry driver.
///
/// Every `set` wakes all waiters; a woken waiter re-reads the flags instead of
/// trusting why it was woken.
pub struct EventBus {
    bits: AtomicU32,
    waiters: Mutex<CriticalSectionRawMutex, RefCell<MultiWakerRegistration<EVENT_BUS_WAITERS>>>,
}

impl EventBus {
    pub const fn new() -> Self {
        Self {
            bits: AtomicU32::new(0),
            waiters: Mutex::new(RefCell::new(MultiWakerRegistration::new())),
        }
    }

    pub fn get(&self) -> Conditions {
        Conditions(self.bits.load(Ordering::Acquire))
    }

    /// Returns the conditions as they were before the call.
    pub fn set(&self, conditions: Conditions) -> Conditions {
        let before = Conditions(self.bits.fetch_or(conditions.0, Ordering::AcqRel));
        self.waiters.lock(|waiters| waiters.borrow_mut().wake());
        before
    }

    /// Returns the conditions as they were before the call.
    pub fn clear(&self, conditions: Conditions) -> Conditions {
        Conditions(self.bits.fetch_and(!conditions.0, Ordering::AcqRel))
    }

    /// Resolves once any condition in `mask` is set; yields the matching subset.
    pub async fn wait_any(&self, mask: Conditions) -> Conditions {
        poll_fn(|cx| {
            self.waiters
                .lock(|waiters| waiters.borrow_mut().register(cx.waker()));
            let current = self.get();
            if current.intersects(mask) {
                Poll::Ready(Conditions(current.0 & mask.0))
            } else {
                Poll::Pending
            }
        })
        .await
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
