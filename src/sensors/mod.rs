//! Sensor subsystem: the two temperature paths, the manual trigger, and the
//! aggregating [`SensorReader`].
//!
//! The reader produces one [`Reading`] per cycle.  It never fails: a faulty
//! digital sensor degrades its own fields to `None` and the analog path and
//! manual input are still reported.

pub mod analog;
pub mod dht11;

use log::debug;

use crate::app::ports::{AnalogPort, ClimatePort, ManualInputPort};
pub use analog::AnalogScale;

/// A point-in-time snapshot of every input, produced once per cycle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Reading {
    /// Analog sample converted to volts (0.0 – full scale).
    pub reference_voltage: f32,
    /// `reference_voltage * 100.0`.  Proportional to voltage, not calibrated.
    pub approx_temperature: f32,
    /// Digital sensor temperature; `None` when offline or the read failed.
    pub calibrated_temperature: Option<f32>,
    /// Digital sensor humidity; `None` when offline or the read failed.
    pub calibrated_humidity: Option<f32>,
    /// Manual trigger pressed this cycle.
    pub manual_trigger: bool,
}

/// Owns the input ports and assembles a [`Reading`] each cycle.
///
/// The digital sensor is optional: when it failed to initialise at boot the
/// reader is built with `None` and both calibrated fields stay absent.
pub struct SensorReader<A, C, M> {
    analog: A,
    scale: AnalogScale,
    climate: Option<C>,
    button: M,
}

impl<A, C, M> SensorReader<A, C, M>
where
    A: AnalogPort,
    C: ClimatePort,
    M: ManualInputPort,
{
    pub fn new(analog: A, scale: AnalogScale, climate: Option<C>, button: M) -> Self {
        Self {
            analog,
            scale,
            climate,
            button,
        }
    }

    /// Sample every input once.  No retries.
    pub fn sample(&mut self) -> Reading {
        let raw = self.analog.read_analog();
        let reference_voltage = self.scale.to_volts(raw);
        let approx_temperature = analog::approx_temperature(reference_voltage);

        let (calibrated_temperature, calibrated_humidity) = match self.climate.as_mut() {
            Some(sensor) => {
                // Each attempt is scoped on its own so one fault cannot
                // erase the other field.
                let temperature = sensor
                    .read_temperature()
                    .map_err(|e| debug!("digital temperature unavailable: {e}"))
                    .ok();
                let humidity = sensor
                    .read_humidity()
                    .map_err(|e| debug!("digital humidity unavailable: {e}"))
                    .ok();
                (temperature, humidity)
            }
            None => (None, None),
        };

        // Physical convention is idle-high (pull-up); pressed pulls low.
        let manual_trigger = !self.button.read_level();

        Reading {
            reference_voltage,
            approx_temperature,
            calibrated_temperature,
            calibrated_humidity,
            manual_trigger,
        }
    }

    /// Whether a digital sensor was initialised.
    pub fn has_climate_sensor(&self) -> bool {
        self.climate.is_some()
    }
}
