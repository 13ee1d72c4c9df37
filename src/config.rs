//! Agent configuration.
//!
//! Loaded once at bootstrap and immutable afterwards.  Values come from the
//! device settings keys below; on the device image they are baked in at build
//! time, on host builds they are read from the process environment.
//!
//! | Key             | Field           |
//! |-----------------|-----------------|
//! | `WIFI_SSID`     | `wifi_ssid`     |
//! | `WIFI_PASSWORD` | `wifi_password` |
//! | `BROKER`        | `broker`        |
//! | `PORT`          | `port`          |
//! | `INATORNAME`    | `device_id`     |
//! | `INATORTOPIC`   | `topic`         |
//! | `ACQUIRETIME`   | `interval_secs` |
//!
//! Any missing or malformed value is a [`ConfigError`]; the agent never runs
//! on a partial configuration.

use core::time::Duration;

use heapless::String;
use serde::{Deserialize, Serialize};

use crate::adapters::wifi;
use crate::error::ConfigError;

pub const KEY_WIFI_SSID: &str = "WIFI_SSID";
pub const KEY_WIFI_PASSWORD: &str = "WIFI_PASSWORD";
pub const KEY_BROKER: &str = "BROKER";
pub const KEY_PORT: &str = "PORT";
pub const KEY_DEVICE_ID: &str = "INATORNAME";
pub const KEY_TOPIC: &str = "INATORTOPIC";
pub const KEY_INTERVAL: &str = "ACQUIRETIME";

/// Validated runtime configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentConfig {
    // --- Network ---
    pub wifi_ssid: String<32>,
    pub wifi_password: String<64>,

    // --- Broker ---
    pub broker: String<64>,
    pub port: u16,

    // --- Identity ---
    /// Device identifier carried in every telemetry message (`"id"`).
    pub device_id: String<32>,
    /// MQTT topic telemetry is published to.
    pub topic: String<64>,

    // --- Timing ---
    /// Fixed pause between sampling cycles (seconds, > 0).
    pub interval_secs: u32,
}

impl AgentConfig {
    /// Build a config from an arbitrary key lookup, then validate it.
    pub fn from_lookup<F>(mut lookup: F) -> Result<Self, ConfigError>
    where
        F: FnMut(&'static str) -> Option<std::string::String>,
    {
        let mut require = |key: &'static str| lookup(key).ok_or(ConfigError::Missing(key));

        let cfg = Self {
            wifi_ssid: fixed(KEY_WIFI_SSID, &require(KEY_WIFI_SSID)?)?,
            wifi_password: fixed(KEY_WIFI_PASSWORD, &require(KEY_WIFI_PASSWORD)?)?,
            broker: fixed(KEY_BROKER, require(KEY_BROKER)?.trim())?,
            port: require(KEY_PORT)?
                .trim()
                .parse()
                .map_err(|_| ConfigError::Invalid(KEY_PORT))?,
            device_id: fixed(KEY_DEVICE_ID, &require(KEY_DEVICE_ID)?)?,
            topic: fixed(KEY_TOPIC, &require(KEY_TOPIC)?)?,
            interval_secs: require(KEY_INTERVAL)?
                .trim()
                .parse()
                .map_err(|_| ConfigError::Invalid(KEY_INTERVAL))?,
        };
        cfg.validate()?;
        Ok(cfg)
    }

    /// Read every key from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read every key from values captured when the firmware was built.
    pub fn from_build_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| {
            let value = match key {
                KEY_WIFI_SSID => option_env!("WIFI_SSID"),
                KEY_WIFI_PASSWORD => option_env!("WIFI_PASSWORD"),
                KEY_BROKER => option_env!("BROKER"),
                KEY_PORT => option_env!("PORT"),
                KEY_DEVICE_ID => option_env!("INATORNAME"),
                KEY_TOPIC => option_env!("INATORTOPIC"),
                KEY_INTERVAL => option_env!("ACQUIRETIME"),
                _ => None,
            };
            value.map(str::to_owned)
        })
    }

    /// Range-check every field.  Rejects rather than clamps.
    pub fn validate(&self) -> Result<(), ConfigError> {
        wifi::validate_ssid(&self.wifi_ssid).map_err(|_| ConfigError::Invalid(KEY_WIFI_SSID))?;
        wifi::validate_password(&self.wifi_password)
            .map_err(|_| ConfigError::Invalid(KEY_WIFI_PASSWORD))?;
        if self.broker.is_empty() {
            return Err(ConfigError::Invalid(KEY_BROKER));
        }
        if self.port == 0 {
            return Err(ConfigError::Invalid(KEY_PORT));
        }
        if self.device_id.trim().is_empty() {
            return Err(ConfigError::Invalid(KEY_DEVICE_ID));
        }
        if self.topic.is_empty() || self.topic.contains(['+', '#']) {
            return Err(ConfigError::Invalid(KEY_TOPIC));
        }
        if self.interval_secs == 0 {
            return Err(ConfigError::Invalid(KEY_INTERVAL));
        }
        Ok(())
    }

    /// The fixed inter-cycle pause.
    pub fn interval(&self) -> Duration {
        Duration::from_secs(u64::from(self.interval_secs))
    }

    /// Broker URL understood by the MQTT client (plain TCP).
    pub fn broker_url(&self) -> std::string::String {
        format!("mqtt://{}:{}", self.broker, self.port)
    }
}

/// Copy `value` into a fixed-capacity string, rejecting overlong values.
fn fixed<const N: usize>(key: &'static str, value: &str) -> Result<String<N>, ConfigError> {
    let mut out = String::new();
    out.push_str(value).map_err(|_| ConfigError::Invalid(key))?;
    Ok(out)
}
