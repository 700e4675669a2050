// TiltSense — Latest Reading Cell
//
// Single-slot holder for the most recent conversion.  The capture handler is
// the only writer and the classifier task the only reader; the split handles
// below are not `Clone`, so the type system keeps it that way.  Every
// conversion overwrites the slot; there is no history.

use std::sync::atomic::{AtomicU16, Ordering};
use std::sync::Arc;

use crate::events::RawReading;

/// Write side, owned by the capture handler.
#[derive(Debug)]
pub struct ReadingPublisher {
    slot: Arc<AtomicU16>,
}

/// Read side, owned by the classifier task.
#[derive(Debug)]
pub struct ReadingSubscriber {
    slot: Arc<AtomicU16>,
}

pub fn latest_reading() -> (ReadingPublisher, ReadingSubscriber) {
    let slot = Arc::new(AtomicU16::new(RawReading::default().value()));
    (
        ReadingPublisher { slot: Arc::clone(&slot) },
        ReadingSubscriber { slot },
    )
}

impl ReadingPublisher {
    /// Overwrite the slot.  Lock-free; safe from the capture path.
    #[inline]
    pub fn publish(&self, reading: RawReading) {
        self.slot.store(reading.value(), Ordering::Release);
    }
}

impl ReadingSubscriber {
    #[inline]
    pub fn latest(&self) -> RawReading {
        RawReading::new(self.slot.load(Ordering::Acquire))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn last_write_wins() {
        let (publisher, subscriber) = latest_reading();
        assert_eq!(subscriber.latest(), RawReading::default());

        publisher.publish(RawReading::new(100));
        publisher.publish(RawReading::new(12_000));
        assert_eq!(subscriber.latest().value(), 12_000);
        // Reads do not consume the value.
        assert_eq!(subscriber.latest().value(), 12_000);
    }
}
