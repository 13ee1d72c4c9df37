//! Inator firmware main entry point.
//!
//! Cross-validates an analog temperature path against a calibrated digital
//! sensor and publishes the verdict over MQTT on a fixed interval.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  AdcAnalog   Dht11   ManualButton   IndicatorLeds              │
//! │  (Analog)    (Climate) (ManualInput) (Indicator)               │
//! │  WifiAdapter   MqttTransport   LogEventSink   UptimeClock      │
//! │  (Connectivity)(Telemetry)     (EventSink)    (Clock)          │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │            AgentService (pure logic)                   │    │
//! │  │  SensorReader · classify · TelemetryPublisher          │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! └────────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use anyhow::Result;
use esp_idf_hal::delay::Ets;
use esp_idf_hal::gpio::{PinDriver, Pull};
use esp_idf_hal::peripherals::Peripherals;
use esp_idf_svc::eventloop::EspSystemEventLoop;
use esp_idf_svc::nvs::EspDefaultNvsPartition;
use log::{info, warn};

use inator::adapters::hardware::AdcAnalog;
use inator::adapters::log_sink::LogEventSink;
use inator::adapters::time::UptimeClock;
use inator::adapters::wifi::WifiAdapter;
use inator::app::service::AgentService;
use inator::bootstrap;
use inator::config::AgentConfig;
use inator::drivers::button::ManualButton;
use inator::drivers::hw_init;
use inator::drivers::indicator_leds::IndicatorLeds;
use inator::pins;
use inator::sensors::SensorReader;
use inator::sensors::dht11::Dht11;

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("Inator v{}", env!("CARGO_PKG_VERSION"));

    // ── 2. Configuration (fatal, no LEDs touched) ─────────────
    let config = bootstrap::load_config(AgentConfig::from_build_env);

    // ── 3. Indicators ─────────────────────────────────────────
    let peripherals = Peripherals::take()?;
    let gpio = peripherals.pins;

    info!(
        "pins: led R{}/Y{}/G{} button {} dht11 {} lm45 {}",
        pins::LED_RED_GPIO,
        pins::LED_YELLOW_GPIO,
        pins::LED_GREEN_GPIO,
        pins::BUTTON_GPIO,
        pins::DHT11_GPIO,
        pins::ANALOG_TEMP_GPIO,
    );
    let mut leds = IndicatorLeds::new(
        PinDriver::output(gpio.gpio16)?,
        PinDriver::output(gpio.gpio17)?,
        PinDriver::output(gpio.gpio18)?,
    );

    // ── 4. Network (fatal, red blink) ─────────────────────────
    let sysloop = EspSystemEventLoop::take()?;
    let nvs = EspDefaultNvsPartition::take().ok();
    let mut wifi = match WifiAdapter::new(
        &config.wifi_ssid,
        &config.wifi_password,
        peripherals.modem,
        sysloop,
        nvs,
    ) {
        Ok(wifi) => wifi,
        Err(e) => bootstrap::halt_connectivity_fault(e, &mut leds),
    };
    let mut transport = match bootstrap::connect_network(&mut wifi, &config) {
        Ok(transport) => transport,
        Err(e) => bootstrap::halt_connectivity_fault(e, &mut leds),
    };

    // ── 5. Sensors ────────────────────────────────────────────
    hw_init::init_adc()?;

    let mut button_pin = PinDriver::input(gpio.gpio15)?;
    button_pin.set_pull(Pull::Up)?;

    let climate = Dht11::new(
        PinDriver::input_output_od(gpio.gpio5)?,
        Ets,
        UptimeClock::new(),
    )
        .map_err(|e| warn!("DHT11 unavailable ({}), calibrated path disabled", e))
        .ok();

    let reader = SensorReader::new(
        AdcAnalog::new(),
        AdcAnalog::scale(),
        climate,
        ManualButton::new(button_pin),
    );

    // ── 6. Core loop ──────────────────────────────────────────
    let mut agent = AgentService::new(&config, reader);
    let mut log_sink = LogEventSink::new();

    info!("System ready. Entering sampling loop.");
    agent.run_forever(&mut leds, &mut transport, &mut log_sink, std::thread::sleep)
}
