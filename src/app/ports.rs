//! Port traits: the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ AgentService (domain)
//! ```
//!
//! Driven adapters (ADC, DHT11, button, LEDs, MQTT, log sink) implement these
//! traits.  The [`AgentService`](super::service::AgentService) consumes them
//! via generics, so the domain core never touches hardware directly.

use crate::error::{Error, SensorFault, TransportError};
use crate::status::{Indicator, IndicatorState};

use super::telemetry::TelemetryMessage;

// ───────────────────────────────────────────────────────────────
// Sensor ports (driven adapters: hardware → domain)
// ───────────────────────────────────────────────────────────────

/// Analog reference path: one raw ADC code per call.
pub trait AnalogPort {
    fn read_analog(&mut self) -> u16;
}

/// Digital calibrated path.  Each field is read, and may fail, on its own.
pub trait ClimatePort {
    fn read_temperature(&mut self) -> Result<f32, SensorFault>;
    fn read_humidity(&mut self) -> Result<f32, SensorFault>;
}

/// Manual trigger input.
pub trait ManualInputPort {
    /// Raw physical level (`true` = high).  The button idles high.
    fn read_level(&mut self) -> bool;
}

/// Monotonic time source.
pub trait ClockPort {
    /// Microseconds since boot.
    fn uptime_us(&self) -> u64;
}

// ───────────────────────────────────────────────────────────────
// Indicator port (driven adapter: domain → hardware)
// ───────────────────────────────────────────────────────────────

/// Write-only access to the three indicator LEDs.
pub trait IndicatorPort {
    fn set_indicator(&mut self, which: Indicator, on: bool);

    /// Drive all three LEDs to `state`.
    ///
    /// Switch-offs are written before switch-ons, so no two indicators are
    /// lit together at any point of a transition.
    fn apply(&mut self, state: IndicatorState) {
        for which in Indicator::ALL {
            if !state.get(which) {
                self.set_indicator(which, false);
            }
        }
        for which in Indicator::ALL {
            if state.get(which) {
                self.set_indicator(which, true);
            }
        }
    }
}

// ───────────────────────────────────────────────────────────────
// Telemetry transport (driven adapter: domain → broker)
// ───────────────────────────────────────────────────────────────

/// Message transport owned by the process and used only by the publisher.
pub trait TelemetryTransport {
    /// Deliver `payload` to `topic` once.
    fn send(&mut self, topic: &str, payload: &[u8]) -> Result<(), TransportError>;

    /// Re-establish the broker session.  Best effort.
    fn reconnect(&mut self) -> Result<(), TransportError>;
}

/// Turns a telemetry message into the bytes handed to the transport.
pub trait MessageEncoder {
    fn encode(&mut self, message: &TelemetryMessage<'_>) -> Result<Vec<u8>, Error>;
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}
