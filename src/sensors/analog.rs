//! LM45 analog temperature path.
//!
//! The sensor outputs 10 mV/°C.  Firmware reports the raw voltage and a
//! `voltage * 100` approximation used only for on-board cross-checking; no
//! calibration offset is applied.

use serde::{Deserialize, Serialize};

/// Multiplier from volts to the approximate temperature scalar.
pub const APPROX_PER_VOLT: f32 = 100.0;

/// Full-scale description of an ADC: `max_code` maps to `reference_volts`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnalogScale {
    pub reference_volts: f32,
    pub max_code: u16,
}

impl Default for AnalogScale {
    /// 16-bit normalised sample against a 3.3 V reference.
    fn default() -> Self {
        Self {
            reference_volts: 3.3,
            max_code: u16::MAX,
        }
    }
}

impl AnalogScale {
    pub const fn new(reference_volts: f32, max_code: u16) -> Self {
        Self {
            reference_volts,
            max_code,
        }
    }

    /// `raw * reference / max_code`.  Codes above `max_code` saturate.
    pub fn to_volts(&self, raw: u16) -> f32 {
        let raw = raw.min(self.max_code);
        (f32::from(raw) * self.reference_volts) / f32::from(self.max_code)
    }
}

/// Approximate temperature from the analog voltage.
pub fn approx_temperature(volts: f32) -> f32 {
    volts * APPROX_PER_VOLT
}
