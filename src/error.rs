//! Error taxonomy for the Inator firmware.
//!
//! Per-cycle faults ([`SensorFault`], [`TransportError`]) are recoverable and
//! absorbed inside the sampling loop.  Bootstrap faults ([`ConfigError`],
//! [`ConnectivityError`]) are fatal and halt the device before the loop runs.
//! All variants are `Copy` so they can be logged and carried in events
//! without allocation.

use core::fmt;

// ---------------------------------------------------------------------------
// Top-level firmware error
// ---------------------------------------------------------------------------

/// Every fallible operation in the firmware funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// A single sensor attempt failed.
    Sensor(SensorFault),
    /// The telemetry transport rejected a send or reconnect.
    Transport(TransportError),
    /// The telemetry payload could not be encoded.
    Encode,
    /// Configuration is missing or malformed.
    Config(ConfigError),
    /// Network association or broker handshake failed at startup.
    Connectivity(ConnectivityError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sensor(e) => write!(f, "sensor: {e}"),
            Self::Transport(e) => write!(f, "transport: {e}"),
            Self::Encode => write!(f, "telemetry encoding failed"),
            Self::Config(e) => write!(f, "config: {e}"),
            Self::Connectivity(e) => write!(f, "connectivity: {e}"),
        }
    }
}

impl std::error::Error for Error {}

// ---------------------------------------------------------------------------
// Sensor faults
// ---------------------------------------------------------------------------

/// A single read attempt on the digital sensor failed.
///
/// Never escapes a sampling cycle: the affected field becomes `None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorFault {
    /// The sensor did not answer the start signal.
    NoResponse,
    /// A bit edge did not arrive in time.
    Timeout,
    /// The frame checksum did not match its payload.
    Checksum,
    /// The data line could not be driven or sampled.
    Bus,
}

impl fmt::Display for SensorFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoResponse => write!(f, "sensor did not respond"),
            Self::Timeout => write!(f, "timed out waiting for bit edge"),
            Self::Checksum => write!(f, "checksum mismatch"),
            Self::Bus => write!(f, "data line I/O error"),
        }
    }
}

impl From<SensorFault> for Error {
    fn from(e: SensorFault) -> Self {
        Self::Sensor(e)
    }
}

// ---------------------------------------------------------------------------
// Transport errors
// ---------------------------------------------------------------------------

/// Failure of the telemetry transport (MQTT client or simulation).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportError {
    /// No live broker session.
    NotConnected,
    /// The client accepted the call but the publish failed.
    PublishFailed,
    /// Re-establishing the broker session failed.
    ReconnectFailed,
    /// Underlying socket error.
    Io,
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotConnected => write!(f, "not connected to broker"),
            Self::PublishFailed => write!(f, "publish failed"),
            Self::ReconnectFailed => write!(f, "reconnect failed"),
            Self::Io => write!(f, "socket I/O error"),
        }
    }
}

impl From<TransportError> for Error {
    fn from(e: TransportError) -> Self {
        Self::Transport(e)
    }
}

// ---------------------------------------------------------------------------
// Configuration errors
// ---------------------------------------------------------------------------

/// A configuration key is missing or failed validation.
///
/// The `&'static str` is the offending key name (e.g. `"ACQUIRETIME"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// The key has no value.
    Missing(&'static str),
    /// The value could not be parsed or is out of range.
    Invalid(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing(key) => write!(f, "{key} is not set"),
            Self::Invalid(key) => write!(f, "{key} is invalid"),
        }
    }
}

impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

// ---------------------------------------------------------------------------
// Connectivity errors
// ---------------------------------------------------------------------------

/// Bootstrap-time network failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectivityError {
    /// SSID fails the 1-32 printable ASCII rule.
    InvalidSsid,
    /// Password is neither empty nor 8-64 bytes.
    InvalidPassword,
    /// The station could not associate with the access point.
    WifiFailed,
    /// The MQTT broker handshake failed.
    BrokerFailed,
}

impl fmt::Display for ConnectivityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidSsid => write!(f, "SSID invalid (must be 1-32 printable ASCII bytes)"),
            Self::InvalidPassword => {
                write!(f, "password invalid (must be 8-64 bytes, or empty for open)")
            }
            Self::WifiFailed => write!(f, "WiFi connection failed"),
            Self::BrokerFailed => write!(f, "MQTT broker connection failed"),
        }
    }
}

impl From<ConnectivityError> for Error {
    fn from(e: ConnectivityError) -> Self {
        Self::Connectivity(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Firmware-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
