// TiltSense — Conversion-Complete Handler (top half)
//
// Runs in interrupt context on hardware.  Moves the converted value into the
// latest-reading slot and wakes the classifier; nothing else.  No logging,
// locking, allocation or classification here.

use std::sync::Arc;

use crate::drivers::frontend::{CompletionHandler, SensorFrontEnd};
use crate::notify::DataReadyNotifier;
use crate::shared::ReadingPublisher;
use crate::stats::PipelineStats;

pub struct CaptureHandler {
    publisher: ReadingPublisher,
    notifier: DataReadyNotifier,
    stats: Arc<PipelineStats>,
}

impl CaptureHandler {
    pub fn new(
        publisher: ReadingPublisher,
        notifier: DataReadyNotifier,
        stats: Arc<PipelineStats>,
    ) -> Self {
        Self {
            publisher,
            notifier,
            stats,
        }
    }

    /// Read (and acknowledge) the conversion, publish it, signal data ready.
    /// If the previous signal has not been taken yet it coalesces and the
    /// older sample is simply overwritten.
    #[inline]
    pub fn on_conversion_complete(&self, frontend: &dyn SensorFrontEnd) {
        let reading = frontend.read_value();
        self.publisher.publish(reading);
        self.stats.record_capture();
        self.notifier.notify();
    }

    /// Box the handler for [`SensorFrontEnd::configure`].
    pub fn into_completion_handler(self) -> CompletionHandler {
        Box::new(move |frontend: &dyn SensorFrontEnd| {
            self.on_conversion_complete(frontend)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drivers::sim::SimulatedAdc;
    use crate::notify::data_ready;
    use crate::shared::latest_reading;

    #[test]
    fn completion_publishes_then_signals() {
        let (publisher, subscriber) = latest_reading();
        let (notifier, waiter) = data_ready();
        let stats = Arc::new(PipelineStats::new());

        let adc = SimulatedAdc::from_samples([1234, 4321]);
        adc.configure(CaptureHandler::new(publisher, notifier, Arc::clone(&stats)).into_completion_handler())
            .unwrap();

        adc.trigger_conversion();
        assert!(waiter.try_take());
        assert_eq!(subscriber.latest().value(), 1234);
        assert!(!adc.completion_pending());

        // Two completions, one signal, newest value.
        adc.trigger_conversion();
        adc.trigger_conversion();
        assert!(waiter.try_take());
        assert!(!waiter.try_take());
        assert_eq!(subscriber.latest().value(), 4321);
        assert_eq!(stats.snapshot().captures, 3);
    }
}
