//! Telemetry publisher.
//!
//! One delivery attempt per cycle.  A failed send is not retried; instead the
//! publisher asks the transport to reconnect so the *next* cycle has a fresh
//! session, and reports [`PublishOutcome::DeliveryFailed`].

use heapless::String;
use log::warn;

use crate::config::AgentConfig;
use crate::error::Result;
use crate::sensors::Reading;
use crate::status::StatusCode;

use super::events::AppEvent;
use super::ports::{EventSink, MessageEncoder, TelemetryTransport};
use super::telemetry::{JsonEncoder, TelemetryMessage};

/// Result of one publish attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishOutcome {
    Delivered,
    /// Message dropped; reconnect was requested.
    DeliveryFailed,
}

pub struct TelemetryPublisher<E = JsonEncoder> {
    device_id: String<32>,
    topic: String<64>,
    encoder: E,
}

impl TelemetryPublisher {
    pub fn new(config: &AgentConfig) -> Self {
        Self::with_encoder(config, JsonEncoder)
    }
}

impl<E: MessageEncoder> TelemetryPublisher<E> {
    pub fn with_encoder(config: &AgentConfig, encoder: E) -> Self {
        Self {
            device_id: config.device_id.clone(),
            topic: config.topic.clone(),
            encoder,
        }
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    /// Build, encode and send one message.
    ///
    /// Transport faults never surface as `Err`: they become
    /// `Ok(DeliveryFailed)`.  `Err` is returned only if the encoder rejects
    /// the message, which the service handles at its cycle boundary.
    pub fn publish(
        &mut self,
        reading: &Reading,
        status: StatusCode,
        transport: &mut impl TelemetryTransport,
        sink: &mut impl EventSink,
    ) -> Result<PublishOutcome> {
        let message = TelemetryMessage::new(&self.device_id, reading, status);
        let payload = self.encoder.encode(&message)?;

        sink.emit(&AppEvent::Publishing(status));

        match transport.send(&self.topic, &payload) {
            Ok(()) => Ok(PublishOutcome::Delivered),
            Err(e) => {
                warn!("publish to '{}' failed: {}", self.topic, e);
                sink.emit(&AppEvent::DeliveryFailed {
                    status,
                    error: e.into(),
                });
                // Best effort; the next cycle is the retry.
                if let Err(re) = transport.reconnect() {
                    warn!("reconnect failed: {}", re);
                }
                Ok(PublishOutcome::DeliveryFailed)
            }
        }
    }
}
