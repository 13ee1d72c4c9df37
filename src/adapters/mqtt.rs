//! MQTT telemetry transport.
//!
//! Implements [`TelemetryTransport`] over a plain-TCP MQTT session
//! (`mqtt://host:port`).  Messages go out at QoS 0, not retained.
//!
//! ## Session lifecycle
//!
//! ```text
//!   connect() ──▶ session up ──send()──▶ ok
//!                      │
//!                 send() fails
//!                      ▼
//!                reconnect(): drop client, open a new one
//! ```
//!
//! ## cfg gating
//!
//! - **`target_os = "espidf"`**: `esp_idf_svc::mqtt::client::EspMqttClient`.
//!   Connection state is tracked from the client's event callback.
//! - **all other targets**: in-memory broker with injectable failures that
//!   records every delivered message.

use core::time::Duration;

use log::{info, warn};

use crate::app::ports::TelemetryTransport;
use crate::config::AgentConfig;
use crate::error::{ConnectivityError, TransportError};

/// How long `connect()` waits for the broker to acknowledge the session.
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

// ───────────────────────────────────────────────────────────────
// ESP-IDF client
// ───────────────────────────────────────────────────────────────

#[cfg(target_os = "espidf")]
mod esp {
    use core::sync::atomic::{AtomicBool, Ordering};
    use core::time::Duration;
    use std::sync::Arc;

    use esp_idf_svc::mqtt::client::{EspMqttClient, EventPayload, MqttClientConfiguration, QoS};
    use log::warn;

    use crate::error::TransportError;

    const POLL: Duration = Duration::from_millis(100);

    pub struct Session {
        client: EspMqttClient<'static>,
        connected: Arc<AtomicBool>,
    }

    impl Session {
        pub fn open(url: &str, client_id: &str) -> Result<Self, TransportError> {
            let connected = Arc::new(AtomicBool::new(false));
            let flag = connected.clone();
            let conf = MqttClientConfiguration {
                client_id: Some(client_id),
                ..Default::default()
            };
            let client = EspMqttClient::new_cb(url, &conf, move |event| {
                match event.payload() {
                    EventPayload::Connected(_) => flag.store(true, Ordering::Release),
                    EventPayload::Disconnected => flag.store(false, Ordering::Release),
                    EventPayload::Error(e) => warn!("MQTT: client error: {:?}", e),
                    _ => {}
                }
            })
            .map_err(|e| {
                warn!("MQTT: client init failed: {}", e);
                TransportError::Io
            })?;
            Ok(Self { client, connected })
        }

        pub fn wait_connected(&self, timeout: Duration) -> bool {
            let mut waited = Duration::ZERO;
            while !self.is_connected() {
                if waited >= timeout {
                    return false;
                }
                std::thread::sleep(POLL);
                waited += POLL;
            }
            true
        }

        pub fn is_connected(&self) -> bool {
            self.connected.load(Ordering::Acquire)
        }

        pub fn publish(&mut self, topic: &str, payload: &[u8]) -> Result<(), TransportError> {
            if !self.is_connected() {
                return Err(TransportError::NotConnected);
            }
            self.client
                .publish(topic, QoS::AtMostOnce, false, payload)
                .map(|_| ())
                .map_err(|e| {
                    warn!("MQTT: publish rejected: {}", e);
                    TransportError::PublishFailed
                })
        }
    }
}

// ───────────────────────────────────────────────────────────────
// Host simulation
// ───────────────────────────────────────────────────────────────

/// In-memory broker used on host builds.
#[cfg(not(target_os = "espidf"))]
#[derive(Debug, Default)]
pub struct SimBroker {
    pub connected: bool,
    /// Messages accepted by the broker, in order.
    pub delivered: Vec<(std::string::String, Vec<u8>)>,
    /// Upcoming sends that fail.
    pub fail_sends: u32,
    /// Upcoming session opens that fail.
    pub fail_opens: u32,
    pub opens: u32,
}

#[cfg(not(target_os = "espidf"))]
impl SimBroker {
    fn open(&mut self) -> Result<(), TransportError> {
        self.opens += 1;
        if self.fail_opens > 0 {
            self.fail_opens -= 1;
            self.connected = false;
            return Err(TransportError::ReconnectFailed);
        }
        self.connected = true;
        Ok(())
    }

    fn publish(&mut self, topic: &str, payload: &[u8]) -> Result<(), TransportError> {
        if !self.connected {
            return Err(TransportError::NotConnected);
        }
        if self.fail_sends > 0 {
            self.fail_sends -= 1;
            return Err(TransportError::PublishFailed);
        }
        self.delivered.push((topic.to_owned(), payload.to_vec()));
        Ok(())
    }
}

// ───────────────────────────────────────────────────────────────
// Transport
// ───────────────────────────────────────────────────────────────

pub struct MqttTransport {
    url: std::string::String,
    client_id: heapless::String<32>,
    #[cfg(target_os = "espidf")]
    session: Option<esp::Session>,
    #[cfg(not(target_os = "espidf"))]
    broker: SimBroker,
}

impl MqttTransport {
    /// Open the broker session for `config` and wait for the handshake.
    pub fn connect(config: &AgentConfig) -> Result<Self, ConnectivityError> {
        let mut transport = Self::unconnected(config);
        transport.open().map_err(|e| {
            warn!("MQTT: cannot reach {}: {}", transport.url, e);
            ConnectivityError::BrokerFailed
        })?;
        info!("MQTT: connected to {} as '{}'", transport.url, transport.client_id);
        Ok(transport)
    }

    fn unconnected(config: &AgentConfig) -> Self {
        Self {
            url: config.broker_url(),
            client_id: config.device_id.clone(),
            #[cfg(target_os = "espidf")]
            session: None,
            #[cfg(not(target_os = "espidf"))]
            broker: SimBroker::default(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    #[cfg(target_os = "espidf")]
    pub fn is_connected(&self) -> bool {
        self.session.as_ref().is_some_and(esp::Session::is_connected)
    }

    #[cfg(not(target_os = "espidf"))]
    pub fn is_connected(&self) -> bool {
        self.broker.connected
    }

    #[cfg(target_os = "espidf")]
    fn open(&mut self) -> Result<(), TransportError> {
        // Dropping the old client tears its session down first.
        self.session = None;
        let session = esp::Session::open(&self.url, &self.client_id)?;
        if !session.wait_connected(CONNECT_TIMEOUT) {
            return Err(TransportError::NotConnected);
        }
        self.session = Some(session);
        Ok(())
    }

    #[cfg(not(target_os = "espidf"))]
    fn open(&mut self) -> Result<(), TransportError> {
        self.broker.open()
    }

    /// Host-only view of the simulated broker.
    #[cfg(not(target_os = "espidf"))]
    pub fn sim_broker(&mut self) -> &mut SimBroker {
        &mut self.broker
    }

    /// A transport with an injected broker state, for host tests.
    #[cfg(not(target_os = "espidf"))]
    pub fn with_sim_broker(config: &AgentConfig, broker: SimBroker) -> Self {
        let mut transport = Self::unconnected(config);
        transport.broker = broker;
        transport
    }
}

impl TelemetryTransport for MqttTransport {
    #[cfg(target_os = "espidf")]
    fn send(&mut self, topic: &str, payload: &[u8]) -> Result<(), TransportError> {
        match self.session.as_mut() {
            Some(session) => session.publish(topic, payload),
            None => Err(TransportError::NotConnected),
        }
    }

    #[cfg(not(target_os = "espidf"))]
    fn send(&mut self, topic: &str, payload: &[u8]) -> Result<(), TransportError> {
        self.broker.publish(topic, payload)
    }

    fn reconnect(&mut self) -> Result<(), TransportError> {
        info!("MQTT: reconnecting to {}", self.url);
        self.open()
    }
}
