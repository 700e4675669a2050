// TiltSense — Simulated Analog Front-End
//
// Stand-in for the converter on host builds and in tests.  A conversion
// completes on the triggering thread and the completion handler runs right
// away, which models the interrupt preempting the sampler task.

use std::sync::atomic::{AtomicBool, AtomicU16, AtomicU32, Ordering};
use std::sync::{Mutex, OnceLock, PoisonError};

use anyhow::bail;

use crate::drivers::frontend::{CompletionHandler, SensorFrontEnd};
use crate::events::RawReading;

type SampleSource = Box<dyn FnMut() -> u16 + Send>;

pub struct SimulatedAdc {
    source: Mutex<SampleSource>,
    on_complete: OnceLock<CompletionHandler>,
    busy: AtomicBool,
    result: AtomicU16,
    complete_flag: AtomicBool,
    triggers: AtomicU32,
    conversions: AtomicU32,
}

impl SimulatedAdc {
    pub fn new(source: impl FnMut() -> u16 + Send + 'static) -> Self {
        Self {
            source: Mutex::new(Box::new(source)),
            on_complete: OnceLock::new(),
            busy: AtomicBool::new(false),
            result: AtomicU16::new(0),
            complete_flag: AtomicBool::new(false),
            triggers: AtomicU32::new(0),
            conversions: AtomicU32::new(0),
        }
    }

    /// Plays back `samples` in order, then holds the last one.
    pub fn from_samples(samples: impl IntoIterator<Item = u16>) -> Self {
        let mut samples = samples.into_iter().collect::<Vec<_>>().into_iter();
        let mut last = 0;
        Self::new(move || {
            if let Some(next) = samples.next() {
                last = next;
            }
            last
        })
    }

    /// Number of `trigger_conversion` calls, including ignored ones.
    pub fn trigger_count(&self) -> u32 {
        self.triggers.load(Ordering::Relaxed)
    }

    /// Number of conversions that completed and raised the handler.
    pub fn conversion_count(&self) -> u32 {
        self.conversions.load(Ordering::Relaxed)
    }

    /// Completion condition raised and not yet cleared by `read_value`.
    pub fn completion_pending(&self) -> bool {
        self.complete_flag.load(Ordering::Acquire)
    }
}

impl SensorFrontEnd for SimulatedAdc {
    fn configure(&self, on_complete: CompletionHandler) -> anyhow::Result<()> {
        if self.on_complete.set(on_complete).is_err() {
            bail!("simulated ADC is already configured");
        }
        log::info!(
            "Simulated ADC armed ({}-bit, range 0..={})",
            crate::config::ADC_RESOLUTION_BITS,
            RawReading::MAX
        );
        Ok(())
    }

    fn trigger_conversion(&self) {
        self.triggers.fetch_add(1, Ordering::Relaxed);

        let Some(on_complete) = self.on_complete.get() else {
            return; // not armed
        };
        if self.busy.swap(true, Ordering::Acquire) {
            return;
        }

        let sample = {
            let mut source = self.source.lock().unwrap_or_else(PoisonError::into_inner);
            source()
        };
        self.result.store(RawReading::new(sample).value(), Ordering::Release);
        self.complete_flag.store(true, Ordering::Release);
        self.busy.store(false, Ordering::Release);
        self.conversions.fetch_add(1, Ordering::Relaxed);

        on_complete(self as &dyn SensorFrontEnd);
    }

    fn read_value(&self) -> RawReading {
        self.complete_flag.store(false, Ordering::Release);
        RawReading::new(self.result.load(Ordering::Acquire))
    }
}

/// Sample source sweeping the full reading range up and down in `step`
/// increments, so the host build cycles through Left, Center and Right.
pub fn triangle_wave(step: u16) -> impl FnMut() -> u16 + Send + 'static {
    let step = step.max(1);
    let mut value: u16 = 0;
    let mut rising = true;
    move || {
        let current = value;
        if rising {
            value = value.saturating_add(step).min(RawReading::MAX);
            rising = value < RawReading::MAX;
        } else {
            value = value.saturating_sub(step);
            rising = value == 0;
        }
        current
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    #[test]
    fn trigger_before_configure_is_ignored() {
        let adc = SimulatedAdc::from_samples([42]);
        adc.trigger_conversion();
        assert_eq!(adc.trigger_count(), 1);
        assert_eq!(adc.conversion_count(), 0);
        assert!(!adc.completion_pending());
    }

    #[test]
    fn completion_handler_reads_and_acknowledges() {
        let adc = SimulatedAdc::from_samples([10, 20]);
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        adc.configure(Box::new(move |fe: &dyn SensorFrontEnd| {
            sink.lock().unwrap().push(fe.read_value().value());
        }))
        .unwrap();

        adc.trigger_conversion();
        adc.trigger_conversion();
        adc.trigger_conversion();

        assert_eq!(*seen.lock().unwrap(), vec![10, 20, 20]);
        assert_eq!(adc.conversion_count(), 3);
        assert!(!adc.completion_pending());
    }

    #[test]
    fn configure_twice_fails() {
        let adc = SimulatedAdc::from_samples([0]);
        adc.configure(Box::new(|_: &dyn SensorFrontEnd| {})).unwrap();
        assert!(adc.configure(Box::new(|_: &dyn SensorFrontEnd| {})).is_err());
    }

    #[test]
    fn samples_are_clamped_to_range() {
        let adc = SimulatedAdc::from_samples([u16::MAX]);
        adc.configure(Box::new(|_: &dyn SensorFrontEnd| {})).unwrap();
        adc.trigger_conversion();
        assert!(adc.completion_pending());
        assert_eq!(adc.read_value().value(), RawReading::MAX);
        assert!(!adc.completion_pending());
    }

    #[test]
    fn triangle_wave_covers_both_ends() {
        let mut wave = triangle_wave(4096);
        let values: Vec<u16> = (0..10).map(|_| wave()).collect();
        assert_eq!(
            values,
            vec![0, 4096, 8192, 12288, 16383, 12287, 8191, 4095, 0, 4096]
        );
    }
}
