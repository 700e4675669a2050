// TiltSense — Pipeline Counters
//
// Lock-free counters, safe to bump from the capture path.  Adds are release
// and a snapshot loads downstream-first with acquire, so it always satisfies
// sends <= classifications <= captures.

use std::sync::atomic::{AtomicU32, Ordering};

#[derive(Debug, Default)]
pub struct PipelineStats {
    captures: AtomicU32,
    classifications: AtomicU32,
    sends: AtomicU32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatsSnapshot {
    pub captures: u32,
    pub classifications: u32,
    pub sends: u32,
}

impl StatsSnapshot {
    /// Captured samples that were overwritten before the classifier read them.
    pub fn coalesced(&self) -> u32 {
        self.captures.saturating_sub(self.classifications)
    }
}

impl PipelineStats {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn record_capture(&self) {
        self.captures.fetch_add(1, Ordering::Release);
    }

    pub fn record_classification(&self) {
        self.classifications.fetch_add(1, Ordering::Release);
    }

    pub fn record_send(&self) {
        self.sends.fetch_add(1, Ordering::Release);
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        let sends = self.sends.load(Ordering::Acquire);
        let classifications = self.classifications.load(Ordering::Acquire);
        let captures = self.captures.load(Ordering::Acquire);
        StatsSnapshot {
            captures,
            classifications,
            sends,
        }
    }
}
