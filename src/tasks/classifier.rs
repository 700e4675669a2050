// TiltSense — Classifier Task (bottom half)
//
// Sleeps until the capture handler signals a fresh reading, maps it to a
// direction through the dead-band thresholds, and pushes the command to the
// player queue.  A full queue stalls this task, and with it the consumption
// of further signals; that is the pipeline's only flow control.  Every
// classification is sent, including repeats of the previous direction.

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crate::config::{PipelineConfig, Thresholds};
use crate::events::{Direction, DirectionalCommand, RawReading};
use crate::notify::DataReadyWaiter;
use crate::queue::{CommandQueue, QueueClosed};
use crate::shared::ReadingSubscriber;
use crate::stats::PipelineStats;

/// Above `high` → Right, below `low` → Left, `low..=high` → Center.
pub fn classify(reading: RawReading, thresholds: &Thresholds) -> Direction {
    let value = reading.value();
    if value > thresholds.high() {
        Direction::Right
    } else if value < thresholds.low() {
        Direction::Left
    } else {
        Direction::Center
    }
}

pub struct Classifier<Q: CommandQueue> {
    thresholds: Thresholds,
    settle_delay: Duration,
    data_ready: DataReadyWaiter,
    reading: ReadingSubscriber,
    queue: Q,
    stats: Arc<PipelineStats>,
    last_direction: Option<Direction>,
}

impl<Q: CommandQueue> Classifier<Q> {
    pub fn new(
        config: &PipelineConfig,
        data_ready: DataReadyWaiter,
        reading: ReadingSubscriber,
        queue: Q,
        stats: Arc<PipelineStats>,
    ) -> Self {
        Self {
            thresholds: config.thresholds,
            settle_delay: config.settle_delay,
            data_ready,
            reading,
            queue,
            stats,
            last_direction: None,
        }
    }

    /// One pass: wait for data, classify, send, settle.
    pub fn cycle(&mut self) -> Result<DirectionalCommand, QueueClosed> {
        // Unbounded wait; the reading is stable once the signal is observed.
        self.data_ready.wait();
        let reading = self.reading.latest();

        let direction = classify(reading, &self.thresholds);
        self.stats.record_classification();

        if self.last_direction != Some(direction) {
            log::info!("Tilt: {} (raw {})", direction.display_name(), reading.value());
            self.last_direction = Some(direction);
        } else {
            log::debug!("Tilt: {:?} (raw {})", direction, reading.value());
        }

        let command = DirectionalCommand::new(direction);
        self.queue.send_blocking(command)?;
        self.stats.record_send();

        thread::sleep(self.settle_delay);
        Ok(command)
    }

    /// Loop forever.  Returns only if the player side of the queue is gone.
    pub fn run(mut self) {
        log::info!(
            "Classifier task started (dead-band {}..={}, settle {:?})",
            self.thresholds.low(),
            self.thresholds.high(),
            self.settle_delay
        );

        loop {
            if let Err(e) = self.cycle() {
                log::warn!("{} — exiting classifier task", e);
                return;
            }
        }
    }
}

pub fn classifier_task<Q: CommandQueue>(classifier: Classifier<Q>) {
    classifier.run();
}
