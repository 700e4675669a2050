// TiltSense — Sampler Task
//
// Periodic stimulus: triggers one conversion every sample period.  Touches
// nothing but the front-end and its own timer.

use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use crate::config::PipelineConfig;
use crate::drivers::frontend::SensorFrontEnd;

pub struct Sampler<F: SensorFrontEnd + ?Sized> {
    frontend: Arc<F>,
    period: Duration,
}

impl<F: SensorFrontEnd + ?Sized> Sampler<F> {
    pub fn new(frontend: Arc<F>, config: &PipelineConfig) -> Self {
        Self {
            frontend,
            period: config.sample_period,
        }
    }

    /// Start one conversion.  A busy converter ignores it.
    pub fn tick(&self) {
        self.frontend.trigger_conversion();
    }

    pub fn run(self) -> ! {
        log::info!("Sampler task started (period {:?})", self.period);
        loop {
            self.run_while(|| true);
        }
    }

    /// Trigger once per period for as long as `keep_running` holds.
    pub fn run_while(&self, mut keep_running: impl FnMut() -> bool) {
        while keep_running() {
            let tick_start = Instant::now();

            self.tick();

            // Sleep for the remainder of the period to hold the trigger rate.
            let elapsed = tick_start.elapsed();
            if elapsed < self.period {
                thread::sleep(self.period - elapsed);
            }
        }
    }
}

pub fn sampler_task<F: SensorFrontEnd + ?Sized>(frontend: Arc<F>, config: PipelineConfig) -> ! {
    Sampler::new(frontend, &config).run()
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, Ordering};

    use super::*;
    use crate::drivers::sim::SimulatedAdc;

    #[test]
    fn each_tick_triggers_once() {
        let adc = Arc::new(SimulatedAdc::from_samples([1, 2, 3]));
        adc.configure(Box::new(|_: &dyn SensorFrontEnd| {})).unwrap();

        let sampler = Sampler::new(Arc::clone(&adc), &PipelineConfig::default());
        sampler.tick();
        sampler.tick();

        assert_eq!(adc.trigger_count(), 2);
        assert_eq!(adc.conversion_count(), 2);
    }

    #[test]
    fn run_paces_triggers_by_period() {
        let adc = Arc::new(SimulatedAdc::from_samples([0]));
        adc.configure(Box::new(|_: &dyn SensorFrontEnd| {})).unwrap();

        let config = PipelineConfig::default().with_sample_period(Duration::from_millis(20));
        let sampler = Sampler::new(Arc::clone(&adc), &config);
        let running = Arc::new(AtomicBool::new(true));
        let flag = Arc::clone(&running);
        let started = Instant::now();
        let handle = thread::spawn(move || sampler.run_while(|| flag.load(Ordering::Acquire)));

        thread::sleep(Duration::from_millis(110));
        running.store(false, Ordering::Release);
        handle.join().unwrap();
        let elapsed = started.elapsed();

        // One trigger per started period, never more.
        let triggers = adc.trigger_count();
        let max = elapsed.as_millis() / 20 + 1;
        assert!(triggers >= 2, "triggers = {triggers}");
        assert!(u128::from(triggers) <= max, "triggers = {triggers}, max = {max}");
    }

    #[test]
    fn run_while_stops_when_told() {
        let adc = Arc::new(SimulatedAdc::from_samples([0]));
        adc.configure(Box::new(|_: &dyn SensorFrontEnd| {})).unwrap();

        let sampler = Sampler::new(Arc::clone(&adc), &PipelineConfig::default());
        sampler.run_while(|| false);
        assert_eq!(adc.trigger_count(), 0);

        let mut budget = 3;
        sampler.run_while(|| {
            budget -= 1;
            budget >= 0
        });
        assert_eq!(adc.trigger_count(), 3);
    }
}
