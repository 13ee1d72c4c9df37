//! WiFi station-mode adapter.
//!
//! Implements [`ConnectivityPort`], the hexagonal boundary for network
//! association.  The agent joins one network at boot and does not manage the
//! link afterwards; a later drop surfaces as a transport failure and is
//! handled by the publisher's reconnect.
//!
//! ## cfg gating
//!
//! - **`target_os = "espidf"`**: `esp_idf_svc::wifi::BlockingWifi` over the
//!   modem peripheral.
//! - **all other targets**: simulation with injectable failures for
//!   host-side tests.

use log::{error, info};

#[cfg(target_os = "espidf")]
use esp_idf_svc::{
    eventloop::EspSystemEventLoop,
    hal::modem::Modem,
    nvs::EspDefaultNvsPartition,
    wifi::{AuthMethod, BlockingWifi, ClientConfiguration, Configuration, EspWifi},
};

use crate::error::ConnectivityError;

// ───────────────────────────────────────────────────────────────
// Port trait
// ───────────────────────────────────────────────────────────────

pub trait ConnectivityPort {
    /// Associate and wait until the network interface has an address.
    fn connect(&mut self) -> Result<(), ConnectivityError>;
    fn is_connected(&self) -> bool;
}

// ───────────────────────────────────────────────────────────────
// Validation
// ───────────────────────────────────────────────────────────────

fn is_printable_ascii(s: &str) -> bool {
    s.bytes().all(|b| (0x20..=0x7E).contains(&b))
}

pub fn validate_ssid(ssid: &str) -> Result<(), ConnectivityError> {
    if ssid.is_empty() || ssid.len() > 32 || !is_printable_ascii(ssid) {
        return Err(ConnectivityError::InvalidSsid);
    }
    Ok(())
}

/// Empty means an open network; otherwise WPA2 needs 8-64 bytes.
pub fn validate_password(password: &str) -> Result<(), ConnectivityError> {
    if password.is_empty() {
        return Ok(());
    }
    if password.len() < 8 || password.len() > 64 {
        return Err(ConnectivityError::InvalidPassword);
    }
    Ok(())
}

// ───────────────────────────────────────────────────────────────
// WiFi adapter
// ───────────────────────────────────────────────────────────────

pub struct WifiAdapter {
    ssid: heapless::String<32>,
    password: heapless::String<64>,
    connected: bool,
    #[cfg(target_os = "espidf")]
    wifi: BlockingWifi<EspWifi<'static>>,
    /// Simulation: number of upcoming connect attempts that fail.
    #[cfg(not(target_os = "espidf"))]
    sim_failures: u32,
}

impl WifiAdapter {
    #[cfg(target_os = "espidf")]
    pub fn new(
        ssid: &str,
        password: &str,
        modem: Modem,
        sysloop: EspSystemEventLoop,
        nvs: Option<EspDefaultNvsPartition>,
    ) -> Result<Self, ConnectivityError> {
        let (ssid, password) = Self::credentials(ssid, password)?;
        let driver = EspWifi::new(modem, sysloop.clone(), nvs).map_err(|e| {
            error!("WiFi: driver init failed: {}", e);
            ConnectivityError::WifiFailed
        })?;
        let wifi = BlockingWifi::wrap(driver, sysloop).map_err(|e| {
            error!("WiFi: event loop wrap failed: {}", e);
            ConnectivityError::WifiFailed
        })?;
        Ok(Self {
            ssid,
            password,
            connected: false,
            wifi,
        })
    }

    #[cfg(not(target_os = "espidf"))]
    pub fn new(ssid: &str, password: &str) -> Result<Self, ConnectivityError> {
        let (ssid, password) = Self::credentials(ssid, password)?;
        Ok(Self {
            ssid,
            password,
            connected: false,
            sim_failures: 0,
        })
    }

    fn credentials(
        ssid: &str,
        password: &str,
    ) -> Result<(heapless::String<32>, heapless::String<64>), ConnectivityError> {
        validate_ssid(ssid)?;
        validate_password(password)?;
        let mut s = heapless::String::new();
        s.push_str(ssid).map_err(|_| ConnectivityError::InvalidSsid)?;
        let mut p = heapless::String::new();
        p.push_str(password)
            .map_err(|_| ConnectivityError::InvalidPassword)?;
        Ok((s, p))
    }

    pub fn ssid(&self) -> &str {
        &self.ssid
    }

    /// Make the next `count` connect attempts fail.
    #[cfg(not(target_os = "espidf"))]
    pub fn sim_fail_next(&mut self, count: u32) {
        self.sim_failures = count;
    }

    // ── Platform-specific ─────────────────────────────────────

    #[cfg(target_os = "espidf")]
    fn platform_connect(&mut self) -> Result<(), ConnectivityError> {
        let auth_method = if self.password.is_empty() {
            AuthMethod::None
        } else {
            AuthMethod::WPA2Personal
        };
        let config = Configuration::Client(ClientConfiguration {
            ssid: self
                .ssid
                .as_str()
                .try_into()
                .map_err(|_| ConnectivityError::InvalidSsid)?,
            password: self
                .password
                .as_str()
                .try_into()
                .map_err(|_| ConnectivityError::InvalidPassword)?,
            auth_method,
            ..Default::default()
        });

        let fail = |e: esp_idf_svc::sys::EspError| {
            error!("WiFi: {}", e);
            ConnectivityError::WifiFailed
        };
        self.wifi.set_configuration(&config).map_err(fail)?;
        self.wifi.start().map_err(fail)?;
        self.wifi.connect().map_err(fail)?;
        self.wifi.wait_netif_up().map_err(fail)?;

        if let Ok(ip) = self.wifi.wifi().sta_netif().get_ip_info() {
            info!("WiFi: address {}", ip.ip);
        }
        Ok(())
    }

    #[cfg(not(target_os = "espidf"))]
    fn platform_connect(&mut self) -> Result<(), ConnectivityError> {
        if self.sim_failures > 0 {
            self.sim_failures -= 1;
            return Err(ConnectivityError::WifiFailed);
        }
        Ok(())
    }
}

// ───────────────────────────────────────────────────────────────
// ConnectivityPort
// ───────────────────────────────────────────────────────────────

impl ConnectivityPort for WifiAdapter {
    fn connect(&mut self) -> Result<(), ConnectivityError> {
        if self.connected {
            return Ok(());
        }
        info!("WiFi: connecting to '{}'", self.ssid);
        match self.platform_connect() {
            Ok(()) => {
                self.connected = true;
                info!("WiFi: connected");
                Ok(())
            }
            Err(e) => {
                error!("WiFi: connection failed: {}", e);
                Err(e)
            }
        }
    }

    fn is_connected(&self) -> bool {
        self.connected
    }
}

// ───────────────────────────────────────────────────────────────
// Tests
// ───────────────────────────────────────────────────────────────
