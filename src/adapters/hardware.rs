//! Hardware adapter for the analog reference path.
//!
//! Bridges the ADC1 oneshot channel to [`AnalogPort`].  On non-espidf
//! targets the underlying driver reads the simulated code injected with
//! [`hw_init::sim_set_analog_raw`](crate::drivers::hw_init).

use crate::app::ports::AnalogPort;
use crate::drivers::hw_init;
use crate::pins;
use crate::sensors::AnalogScale;

/// LM45 on ADC1.
pub struct AdcAnalog {
    channel: u32,
}

impl AdcAnalog {
    pub fn new() -> Self {
        Self {
            channel: hw_init::ADC1_CH_ANALOG_TEMP,
        }
    }

    /// Full-scale conversion for the 12-bit ESP32 ADC.
    pub const fn scale() -> AnalogScale {
        AnalogScale::new(pins::ADC_REFERENCE_VOLTS, pins::ADC_MAX_CODE)
    }
}

impl Default for AdcAnalog {
    fn default() -> Self {
        Self::new()
    }
}

impl AnalogPort for AdcAnalog {
    fn read_analog(&mut self) -> u16 {
        hw_init::adc1_read(self.channel)
    }
}
