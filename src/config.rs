// TiltSense — Hardware & System Configuration
// Target: Seeed Studio Xiao ESP32-C3 (RISC-V), tilt sensor X axis on A0

use std::time::Duration;

use anyhow::bail;

use crate::events::RawReading;

// ---------------------------------------------------------------------------
// Analog Front-End
// ---------------------------------------------------------------------------
pub const PIN_TILT_ADC: u32 = 2;          // D0/A0 — tilt sensor X output
pub const ADC_RESOLUTION_BITS: u32 = 14;  // reading range 0..=16383
pub const ADC_NATIVE_BITS: u32 = 12;      // ESP32-C3 one-shot bit width
pub const ADC_NORMALISE_SHIFT: u32 = ADC_RESOLUTION_BITS - ADC_NATIVE_BITS;
pub const ADC_VREF_MV: u32 = 3300;

/// Convert a voltage on the reference scale to converter counts.
pub const fn millivolts_to_counts(mv: u32) -> u16 {
    (mv * RawReading::MAX as u32 / ADC_VREF_MV) as u16
}

// ---------------------------------------------------------------------------
// Classification thresholds (1.6 V / 1.7 V on a 3.3 V reference)
// ---------------------------------------------------------------------------
pub const TILT_LOW_MV: u32 = 1600;
pub const TILT_HIGH_MV: u32 = 1700;
pub const TILT_LOW_COUNTS: u16 = millivolts_to_counts(TILT_LOW_MV);   // 7943
pub const TILT_HIGH_COUNTS: u16 = millivolts_to_counts(TILT_HIGH_MV); // 8439

// ---------------------------------------------------------------------------
// Task Stack Sizes (bytes)
// ---------------------------------------------------------------------------
pub const STACK_SAMPLER: usize = 3072;
pub const STACK_CLASSIFIER: usize = 4096;
pub const STACK_PLAYER: usize = 4096;

// ---------------------------------------------------------------------------
// Timing (milliseconds)
// ---------------------------------------------------------------------------
pub const SAMPLE_PERIOD_MS: u64 = 5;           // 200 Hz trigger rate
pub const SETTLE_DELAY_MS: u64 = 10;           // after every classification
pub const STATS_REPORT_INTERVAL_MS: u64 = 5_000;

// ---------------------------------------------------------------------------
// Downstream queue / player
// ---------------------------------------------------------------------------
pub const COMMAND_QUEUE_DEPTH: usize = 4;
pub const DEFAULT_SPEED: u8 = 1;
pub const LANE_WIDTH: u16 = 120;

/// Dead-band bounds over the reading range.
///
/// Readings strictly below `low` are Left, strictly above `high` are Right,
/// everything in `low..=high` is Center.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Thresholds {
    low: u16,
    high: u16,
}

impl Thresholds {
    pub const REFERENCE: Self = Self {
        low: TILT_LOW_COUNTS,
        high: TILT_HIGH_COUNTS,
    };

    pub fn new(low: u16, high: u16) -> anyhow::Result<Self> {
        if low >= high {
            bail!("threshold low ({low}) must be below high ({high})");
        }
        if high > RawReading::MAX {
            bail!("threshold high ({high}) exceeds reading range 0..={}", RawReading::MAX);
        }
        Ok(Self { low, high })
    }

    pub fn low(&self) -> u16 {
        self.low
    }

    pub fn high(&self) -> u16 {
        self.high
    }
}

impl Default for Thresholds {
    fn default() -> Self {
        Self::REFERENCE
    }
}

/// Runtime configuration handed to the sampler and classifier tasks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineConfig {
    pub sample_period: Duration,
    pub settle_delay: Duration,
    pub thresholds: Thresholds,
    pub queue_depth: usize,
}

impl PipelineConfig {
    pub fn with_sample_period(mut self, period: Duration) -> Self {
        self.sample_period = period;
        self
    }

    pub fn with_settle_delay(mut self, delay: Duration) -> Self {
        self.settle_delay = delay;
        self
    }

    pub fn with_thresholds(mut self, thresholds: Thresholds) -> Self {
        self.thresholds = thresholds;
        self
    }

    pub fn with_queue_depth(mut self, depth: usize) -> Self {
        self.queue_depth = depth;
        self
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            sample_period: Duration::from_millis(SAMPLE_PERIOD_MS),
            settle_delay: Duration::from_millis(SETTLE_DELAY_MS),
            thresholds: Thresholds::REFERENCE,
            queue_depth: COMMAND_QUEUE_DEPTH,
        }
    }
}
