// TiltSense — ESP32-C3 ADC Front-End
//
// Raw ESP-IDF one-shot ADC driver on ADC1 / GPIO2.  The C3's one-shot unit
// has no conversion-complete interrupt, so `trigger_conversion` performs the
// read itself and then dispatches the completion handler, keeping the same
// contract as an interrupt-driven converter.  Samples are 12-bit and get
// shifted up to the 14-bit reading range used by the classifier.

use std::sync::atomic::{AtomicBool, AtomicU16, Ordering};
use std::sync::{Mutex, OnceLock};

use esp_idf_hal::adc::ADC1;
use esp_idf_hal::gpio::Gpio2;
use esp_idf_sys::{self as sys, esp};

use crate::config::*;
use crate::drivers::frontend::{CompletionHandler, SensorFrontEnd};
use crate::events::RawReading;

const CHANNEL: sys::adc_channel_t = sys::adc_channel_t_ADC_CHANNEL_2; // GPIO2

struct OneshotUnit(sys::adc_oneshot_unit_handle_t);

// SAFETY: the handle is created once in `configure` and afterwards only used
// by `trigger_conversion`, which the `busy` flag serialises.
unsafe impl Send for OneshotUnit {}
unsafe impl Sync for OneshotUnit {}

pub struct EspAdc {
    // Held so nothing else can claim the converter or its pin.  The HAL
    // singletons are `Send` but not `Sync`, hence the mutex.
    _peripherals: Mutex<(ADC1, Gpio2)>,
    unit: OnceLock<OneshotUnit>,
    on_complete: OnceLock<CompletionHandler>,
    busy: AtomicBool,
    result: AtomicU16,
}

impl EspAdc {
    pub fn new(adc: ADC1, pin: Gpio2) -> Self {
        Self {
            _peripherals: Mutex::new((adc, pin)),
            unit: OnceLock::new(),
            on_complete: OnceLock::new(),
            busy: AtomicBool::new(false),
            result: AtomicU16::new(0),
        }
    }
}

impl SensorFrontEnd for EspAdc {
    fn configure(&self, on_complete: CompletionHandler) -> anyhow::Result<()> {
        if self.unit.get().is_some() {
            anyhow::bail!("ADC front-end already configured");
        }

        // Unit: ADC1, digital controller only (no ULP).
        let mut handle: sys::adc_oneshot_unit_handle_t = core::ptr::null_mut();
        let unit_cfg = sys::adc_oneshot_unit_init_cfg_t {
            unit_id: sys::adc_unit_t_ADC_UNIT_1,
            ulp_mode: sys::adc_ulp_mode_t_ADC_ULP_MODE_DISABLE,
            ..unsafe { core::mem::zeroed() }
        };
        esp!(unsafe { sys::adc_oneshot_new_unit(&unit_cfg, &mut handle) })?;

        // Channel: 11 dB attenuation (0–3.3 V), 12-bit samples.
        let chan_cfg = sys::adc_oneshot_chan_cfg_t {
            atten: sys::adc_atten_t_ADC_ATTEN_DB_11,
            bitwidth: sys::adc_bitwidth_t_ADC_BITWIDTH_12,
        };
        if let Err(e) = esp!(unsafe { sys::adc_oneshot_config_channel(handle, CHANNEL, &chan_cfg) }) {
            // Release the unit so a later configure can claim ADC1 again.
            unsafe { sys::adc_oneshot_del_unit(handle) };
            return Err(e.into());
        }

        if self.unit.set(OneshotUnit(handle)).is_err() || self.on_complete.set(on_complete).is_err() {
            anyhow::bail!("ADC front-end configured concurrently");
        }

        log::info!(
            "ADC1 armed on GPIO{} ({}-bit, normalised to {}-bit)",
            PIN_TILT_ADC,
            ADC_NATIVE_BITS,
            ADC_RESOLUTION_BITS
        );
        Ok(())
    }

    fn trigger_conversion(&self) {
        let (Some(unit), Some(on_complete)) = (self.unit.get(), self.on_complete.get()) else {
            return;
        };
        if self.busy.swap(true, Ordering::Acquire) {
            return;
        }

        let mut raw: i32 = 0;
        let ret = unsafe { sys::adc_oneshot_read(unit.0, CHANNEL, &mut raw) };
        if ret != sys::ESP_OK {
            // Treated like a missed interrupt: the sample is skipped.
            self.busy.store(false, Ordering::Release);
            return;
        }

        let counts = (raw.clamp(0, (1 << ADC_NATIVE_BITS) - 1) as u16) << ADC_NORMALISE_SHIFT;
        self.result.store(RawReading::new(counts).value(), Ordering::Release);
        self.busy.store(false, Ordering::Release);

        on_complete(self as &dyn SensorFrontEnd);
    }

    fn read_value(&self) -> RawReading {
        RawReading::new(self.result.load(Ordering::Acquire))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn front_end_can_be_shared_across_tasks() {
        fn assert_shareable<T: Send + Sync>() {}
        assert_shareable::<EspAdc>();
    }
}
