// TiltSense — Firmware Entry Point
//
// Boot sequence:
//   1. Initialise logging.
//   2. Claim the analog front-end and arm it with the capture handler.
//   3. Spawn player, classifier, and sampler tasks (consumer first, so the
//      queue is drained before the first reading arrives).
//   4. Report pipeline counters from the main thread.
//
// On the board the front-end is ADC1/GPIO2; on a host build a simulated
// converter sweeps the full range so every direction is exercised.

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use tiltsense::config::*;
use tiltsense::drivers::frontend::SensorFrontEnd;
use tiltsense::pipeline;
use tiltsense::queue::command_queue;
use tiltsense::tasks;

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------
fn main() -> anyhow::Result<()> {
    init_logging();
    log::info!("TiltSense firmware starting…");

    let config = PipelineConfig::default();

    // ---- Front-end ---------------------------------------------------------
    let frontend = take_frontend()?;

    // ---- Queue + capture wiring -------------------------------------------
    let (command_tx, command_rx) = command_queue(config.queue_depth);
    let (classifier, stats) = pipeline::connect(frontend.as_ref(), &config, command_tx)?;

    // ---- Spawn tasks (map to FreeRTOS tasks via std::thread) ---------------

    // Player task — drains the command queue.
    thread::Builder::new()
        .name("player".into())
        .stack_size(STACK_PLAYER)
        .spawn(move || {
            tasks::player::player_task(command_rx);
        })?;

    // Classifier task — bottom half.
    thread::Builder::new()
        .name("classifier".into())
        .stack_size(STACK_CLASSIFIER)
        .spawn(move || {
            tasks::classifier::classifier_task(classifier);
        })?;

    // Sampler task — periodic conversion trigger.
    let sampler_frontend = Arc::clone(&frontend);
    thread::Builder::new()
        .name("sampler".into())
        .stack_size(STACK_SAMPLER)
        .spawn(move || {
            tasks::sampler::sampler_task(sampler_frontend, config);
        })?;

    // Main thread only reports counters from here on.
    let report_interval = Duration::from_millis(STATS_REPORT_INTERVAL_MS);
    loop {
        thread::sleep(report_interval);
        let snapshot = stats.snapshot();
        log::info!(
            "Captured {} / classified {} / sent {} (coalesced {})",
            snapshot.captures,
            snapshot.classifications,
            snapshot.sends,
            snapshot.coalesced()
        );
    }
}

// ---------------------------------------------------------------------------
// Board / host specifics
// ---------------------------------------------------------------------------

#[cfg(target_os = "espidf")]
fn init_logging() {
    // Link esp-idf-sys runtime patches and initialise logging.
    esp_idf_svc::sys::link_patches();
    esp_idf_svc::log::EspLogger::initialize_default();
}

#[cfg(not(target_os = "espidf"))]
fn init_logging() {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();
}

#[cfg(target_os = "espidf")]
fn take_frontend() -> anyhow::Result<Arc<dyn SensorFrontEnd>> {
    use esp_idf_hal::prelude::*;
    use tiltsense::drivers::adc::EspAdc;

    let peripherals = Peripherals::take()?;
    Ok(Arc::new(EspAdc::new(peripherals.adc1, peripherals.pins.gpio2)))
}

#[cfg(not(target_os = "espidf"))]
fn take_frontend() -> anyhow::Result<Arc<dyn SensorFrontEnd>> {
    use tiltsense::drivers::sim::{triangle_wave, SimulatedAdc};

    Ok(Arc::new(SimulatedAdc::new(triangle_wave(64))))
}
