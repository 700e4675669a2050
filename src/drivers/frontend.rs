// TiltSense — Analog Front-End Interface
//
// One conversion per trigger; completion is reported through the handler
// registered at configure time, which runs in interrupt context on hardware.

use crate::events::RawReading;

/// Completion callback.  Receives the front-end so it can fetch (and thereby
/// acknowledge) the converted value.
pub type CompletionHandler = Box<dyn Fn(&dyn SensorFrontEnd) + Send + Sync>;

pub trait SensorFrontEnd: Send + Sync {
    /// One-shot setup before any task runs: channel, resolution, sample-and-
    /// hold timing, completion interrupt.  Leaves the converter powered and
    /// armed but does not start a conversion.  Errors here are fatal.
    fn configure(&self, on_complete: CompletionHandler) -> anyhow::Result<()>;

    /// Start a conversion.  Ignored while a conversion is in flight or
    /// before `configure` has succeeded.
    fn trigger_conversion(&self);

    /// Last converted value.  Clears the completion condition.
    fn read_value(&self) -> RawReading;
}
