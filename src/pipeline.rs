// TiltSense — Pipeline Wiring
//
// Front-end → capture handler → (latest reading + data-ready) → classifier.

use std::sync::Arc;

use crate::config::PipelineConfig;
use crate::drivers::frontend::SensorFrontEnd;
use crate::isr::CaptureHandler;
use crate::notify::data_ready;
use crate::queue::CommandQueue;
use crate::shared::latest_reading;
use crate::stats::PipelineStats;
use crate::tasks::classifier::Classifier;

/// Configure `frontend` with a capture handler and build the classifier that
/// consumes its readings.  Must run before any task is spawned; a front-end
/// that fails to configure is fatal.
pub fn connect<F, Q>(
    frontend: &F,
    config: &PipelineConfig,
    queue: Q,
) -> anyhow::Result<(Classifier<Q>, Arc<PipelineStats>)>
where
    F: SensorFrontEnd + ?Sized,
    Q: CommandQueue,
{
    let (publisher, subscriber) = latest_reading();
    let (notifier, waiter) = data_ready();
    let stats = Arc::new(PipelineStats::new());

    let capture = CaptureHandler::new(publisher, notifier, Arc::clone(&stats));
    frontend.configure(capture.into_completion_handler())?;

    let classifier = Classifier::new(config, waiter, subscriber, queue, Arc::clone(&stats));
    Ok((classifier, stats))
}
