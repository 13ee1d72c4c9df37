//! Telemetry wire message.
//!
//! ```json
//! { "id": "inator-01", "status": "SYSTEM_STABLE",
//!   "metrics": { "analogue_approx": 25.0, "digital_ref": 27.5, "delta": 2.5 },
//!   "raw": { "v": 0.25, "h": 40.0 } }
//! ```
//!
//! `digital_ref` and `delta` are `null` exactly when the calibrated
//! temperature was absent; `h` is `null` exactly when humidity was absent.
//! Rounding is fixed so the same reading always produces the same bytes.

use serde::Serialize;

use crate::error::{Error, Result};
use crate::sensors::Reading;
use crate::status::{StatusCode, divergence};

use super::ports::MessageEncoder;

/// Decimal places for `analogue_approx` and `delta`.
pub const TEMPERATURE_PLACES: i32 = 2;
/// Decimal places for `raw.v`.
pub const VOLTAGE_PLACES: i32 = 4;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TelemetryMessage<'a> {
    pub id: &'a str,
    pub status: StatusCode,
    pub metrics: Metrics,
    pub raw: RawBlock,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Metrics {
    pub analogue_approx: f32,
    pub digital_ref: Option<f32>,
    pub delta: Option<f32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RawBlock {
    pub v: f32,
    pub h: Option<f32>,
}

impl<'a> TelemetryMessage<'a> {
    pub fn new(id: &'a str, reading: &Reading, status: StatusCode) -> Self {
        Self {
            id,
            status,
            metrics: Metrics {
                analogue_approx: round_to(reading.approx_temperature, TEMPERATURE_PLACES),
                digital_ref: reading.calibrated_temperature,
                delta: divergence(reading).map(|d| round_to(d, TEMPERATURE_PLACES)),
            },
            raw: RawBlock {
                v: round_to(reading.reference_voltage, VOLTAGE_PLACES),
                h: reading.calibrated_humidity,
            },
        }
    }

    /// Serialise to compact JSON.
    pub fn encode(&self) -> Result<Vec<u8>> {
        serde_json::to_vec(self).map_err(|_| Error::Encode)
    }
}

/// Compact JSON, the only encoding the broker side understands.
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonEncoder;

impl MessageEncoder for JsonEncoder {
    fn encode(&mut self, message: &TelemetryMessage<'_>) -> Result<Vec<u8>> {
        message.encode()
    }
}

/// Round half away from zero to `places` decimals.
pub fn round_to(value: f32, places: i32) -> f32 {
    let factor = 10f32.powi(places);
    (value * factor).round() / factor
}
