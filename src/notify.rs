// TiltSense — Data-Ready Notification
//
// Binary (saturating) signal from the capture handler to the classifier task,
// the equivalent of a FreeRTOS direct-to-task notification taken with
// clear-on-exit.  At most one signal is ever outstanding: notifying again
// before the waiter takes it is a no-op, so a burst of conversions wakes the
// classifier exactly once.
//
// Ordering: the flag is raised and consumed with `SeqCst` swaps (at least
// release/acquire), so anything the notifier wrote before notifying (the
// latest reading) is visible once `wait` returns.

use std::cell::Cell;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::{self, Thread, ThreadId};
#[cfg(test)]
use std::time::{Duration, Instant};

#[derive(Debug, Default)]
struct Slot {
    pending: AtomicBool,
    // Written only when the waiter moves to a new thread.
    waiter: Mutex<Option<Thread>>,
}

/// Give side.  Never blocks and never allocates.
#[derive(Debug)]
pub struct DataReadyNotifier {
    slot: Arc<Slot>,
}

/// Take side.  Follows whichever thread it is waited on from.
#[derive(Debug)]
pub struct DataReadyWaiter {
    slot: Arc<Slot>,
    bound_to: Cell<Option<ThreadId>>,
}

pub fn data_ready() -> (DataReadyNotifier, DataReadyWaiter) {
    let slot = Arc::new(Slot::default());
    (
        DataReadyNotifier { slot: Arc::clone(&slot) },
        DataReadyWaiter {
            slot,
            bound_to: Cell::new(None),
        },
    )
}

impl DataReadyNotifier {
    /// Raise the signal and wake the waiter.
    ///
    /// Returns `false` when a signal was already pending, i.e. this one
    /// coalesced into it.
    #[inline]
    pub fn notify(&self) -> bool {
        let raised = !self.slot.pending.swap(true, Ordering::SeqCst);
        // Contended only while the waiter re-registers; it re-checks the
        // flag after that, so skipping the unpark cannot lose the signal.
        if let Ok(waiter) = self.slot.waiter.try_lock() {
            if let Some(thread) = waiter.as_ref() {
                thread.unpark();
            }
        }
        raised
    }
}

impl DataReadyWaiter {
    /// Block with no timeout until a signal is pending, then consume it.
    pub fn wait(&self) {
        self.register();
        while !self.try_take() {
            thread::park();
        }
    }

    /// Like [`wait`](Self::wait) but gives up after `timeout`.
    /// Returns `true` if a signal was consumed.
    #[cfg(test)]
    pub fn wait_timeout(&self, timeout: Duration) -> bool {
        self.register();
        let deadline = Instant::now() + timeout;
        loop {
            if self.try_take() {
                return true;
            }
            let now = Instant::now();
            if now >= deadline {
                return false;
            }
            thread::park_timeout(deadline - now);
        }
    }

    /// Consume a pending signal without blocking.
    #[inline]
    pub fn try_take(&self) -> bool {
        self.slot.pending.swap(false, Ordering::SeqCst)
    }

    /// Whether a signal is outstanding, without consuming it.
    #[cfg(test)]
    pub fn is_pending(&self) -> bool {
        self.slot.pending.load(Ordering::Acquire)
    }

    fn register(&self) {
        let current = thread::current();
        if self.bound_to.get() == Some(current.id()) {
            return;
        }
        let id = current.id();
        *self.slot.waiter.lock().unwrap_or_else(PoisonError::into_inner) = Some(current);
        self.bound_to.set(Some(id));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signals_coalesce() {
        let (notifier, waiter) = data_ready();
        assert!(!waiter.try_take());

        assert!(notifier.notify());
        assert!(!notifier.notify());
        assert!(!notifier.notify());

        assert!(waiter.try_take());
        assert!(!waiter.try_take());
    }

    #[test]
    fn notify_before_first_wait_is_not_lost() {
        let (notifier, waiter) = data_ready();
        notifier.notify();
        let handle = thread::spawn(move || waiter.wait_timeout(Duration::from_secs(5)));
        assert!(handle.join().unwrap());
    }

    #[test]
    fn wait_wakes_on_notify_from_another_thread() {
        let (notifier, waiter) = data_ready();
        let handle = thread::spawn(move || {
            waiter.wait();
            waiter.is_pending()
        });
        thread::sleep(Duration::from_millis(20));
        notifier.notify();
        assert!(!handle.join().unwrap());
    }

    #[test]
    fn waiter_follows_the_thread_it_moves_to() {
        let (notifier, waiter) = data_ready();

        // First wait binds the waiter to thread A.
        let waiter = thread::spawn(move || {
            assert!(!waiter.wait_timeout(Duration::from_millis(1)));
            waiter
        })
        .join()
        .unwrap();

        // Thread B must be the one woken now.
        let handle = thread::spawn(move || {
            let start = Instant::now();
            let got = waiter.wait_timeout(Duration::from_secs(5));
            (got, start.elapsed())
        });
        thread::sleep(Duration::from_millis(50));
        notifier.notify();

        let (got, waited) = handle.join().unwrap();
        assert!(got);
        assert!(waited < Duration::from_secs(2), "woke after {waited:?}");
    }

    #[test]
    fn wait_timeout_expires_without_signal() {
        let (_notifier, waiter) = data_ready();
        let start = Instant::now();
        assert!(!waiter.wait_timeout(Duration::from_millis(20)));
        assert!(start.elapsed() >= Duration::from_millis(20));
    }
}
