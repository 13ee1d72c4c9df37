//! Startup sequence and fatal halts.
//!
//! ```text
//!  load_config ──▶ connect_network (WiFi, then MQTT) ──▶ core loop
//!       │                   │
//!   ConfigError      ConnectivityError
//!       ▼                   ▼
//!  idle forever      red blink forever
//! ```
//!
//! Neither halt returns: the device stays visibly faulted until it is
//! power-cycled.

use core::time::Duration;

use log::{error, info};

use crate::adapters::mqtt::MqttTransport;
use crate::adapters::wifi::ConnectivityPort;
use crate::app::ports::IndicatorPort;
use crate::config::AgentConfig;
use crate::drivers::fault_blinker::{FAULT_BLINK_PERIOD, FaultBlinker};
use crate::error::{ConfigError, ConnectivityError};

/// Sleep granularity of the idle halt.
const IDLE_HALT_TICK: Duration = Duration::from_secs(1);

/// Load the configuration or halt.
pub fn load_config(load: impl FnOnce() -> Result<AgentConfig, ConfigError>) -> AgentConfig {
    match load() {
        Ok(config) => {
            info!(
                "config: id='{}' topic='{}' broker={}:{} interval={}s",
                config.device_id, config.topic, config.broker, config.port, config.interval_secs
            );
            config
        }
        Err(e) => halt_config_fault(e),
    }
}

/// Join the network, then open the broker session.
pub fn connect_network(
    wifi: &mut impl ConnectivityPort,
    config: &AgentConfig,
) -> Result<MqttTransport, ConnectivityError> {
    wifi.connect()?;
    MqttTransport::connect(config)
}

/// Toggle the red indicator `toggles` times, pausing [`FAULT_BLINK_PERIOD`]
/// after each toggle.
pub fn blink_fault(
    blinker: &mut FaultBlinker,
    leds: &mut impl IndicatorPort,
    toggles: u32,
    mut wait: impl FnMut(Duration),
) {
    for _ in 0..toggles {
        blinker.step(leds);
        wait(FAULT_BLINK_PERIOD);
    }
}

/// Missing or malformed settings: nothing can run, and no LED is touched.
pub fn halt_config_fault(e: ConfigError) -> ! {
    error!("config: {}; halting", e);
    loop {
        std::thread::sleep(IDLE_HALT_TICK);
    }
}

/// Network or broker unreachable at boot: blink red until reset.
pub fn halt_connectivity_fault(e: ConnectivityError, leds: &mut impl IndicatorPort) -> ! {
    error!("network: {}; halting", e);
    let mut blinker = FaultBlinker::new();
    loop {
        blink_fault(&mut blinker, leds, 2, std::thread::sleep);
    }
}
