//! Bootstrap → core loop against the host-side adapters: simulated WiFi,
//! the simulated MQTT broker, the ADC injection hook and real LED drivers
//! over recording pins.

use std::cell::RefCell;
use std::convert::Infallible;
use std::rc::Rc;

use embedded_hal::digital::{ErrorType, OutputPin};
use inator::adapters::hardware::AdcAnalog;
use inator::adapters::log_sink::LogEventSink;
use inator::adapters::mqtt::{MqttTransport, SimBroker};
use inator::adapters::wifi::{ConnectivityPort, WifiAdapter};
use inator::app::publisher::PublishOutcome;
use inator::app::service::AgentService;
use inator::bootstrap;
use inator::drivers::fault_blinker::FaultBlinker;
use inator::drivers::hw_init;
use inator::drivers::indicator_leds::IndicatorLeds;
use inator::error::ConnectivityError;
use inator::sensors::SensorReader;
use inator::status::{IndicatorState, StatusCode};

use crate::mock_hw::{MockButton, MockClimate, test_config};

/// Output pin that appends every level it is driven to into a shared trace.
#[derive(Clone)]
struct TracedPin {
    trace: Rc<RefCell<Vec<bool>>>,
}

impl TracedPin {
    fn new() -> Self {
        Self {
            trace: Rc::new(RefCell::new(Vec::new())),
        }
    }

    fn level(&self) -> bool {
        self.trace.borrow().last().copied().unwrap_or(false)
    }
}

impl ErrorType for TracedPin {
    type Error = Infallible;
}

impl OutputPin for TracedPin {
    fn set_low(&mut self) -> Result<(), Infallible> {
        self.trace.borrow_mut().push(false);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Infallible> {
        self.trace.borrow_mut().push(true);
        Ok(())
    }
}

#[test]
fn boot_then_cycle_over_simulated_adapters() {
    let config = bootstrap::load_config(|| Ok(test_config()));
    let mut wifi = WifiAdapter::new(&config.wifi_ssid, &config.wifi_password).unwrap();
    let mut transport = bootstrap::connect_network(&mut wifi, &config).unwrap();
    assert!(wifi.is_connected());

    // 12-bit code for ~0.25 V at 3.3 V full scale.
    hw_init::init_adc().unwrap();
    hw_init::sim_set_analog_raw(310);

    let (r, y, g) = (TracedPin::new(), TracedPin::new(), TracedPin::new());
    let mut leds = IndicatorLeds::new(r.clone(), y.clone(), g.clone());

    let reader = SensorReader::new(
        AdcAnalog::new(),
        AdcAnalog::scale(),
        Some(MockClimate::ok(26.0, 45.0)),
        MockButton::released(),
    );
    let mut agent = AgentService::new(&config, reader);

    let report = agent.run_cycle(&mut leds, &mut transport, &mut LogEventSink::new());

    assert!((report.reading.reference_voltage - 0.2498).abs() < 1e-3);
    assert_eq!(report.status, StatusCode::SystemStable);
    assert_eq!(report.outcome, Some(PublishOutcome::Delivered));
    assert!(g.level() && !r.level() && !y.level());
    assert_eq!(leds.current(), IndicatorState::GREEN);

    let broker = transport.sim_broker();
    assert_eq!(broker.delivered.len(), 1);
    let (topic, payload) = &broker.delivered[0];
    assert_eq!(topic, "lab/inator-01/telemetry");
    let msg: serde_json::Value = serde_json::from_slice(payload).unwrap();
    assert_eq!(msg["id"], "inator-01");
    assert_eq!(msg["raw"]["h"], 45.0);
}

#[test]
fn broker_drop_is_recovered_by_next_cycle() {
    let config = test_config();
    let mut transport = MqttTransport::with_sim_broker(
        &config,
        SimBroker {
            connected: true,
            fail_sends: 1,
            ..SimBroker::default()
        },
    );
    let reader = SensorReader::new(
        crate::mock_hw::ScriptedAnalog::constant(250),
        crate::mock_hw::TEST_SCALE,
        None::<MockClimate>,
        MockButton::released(),
    );
    let mut agent = AgentService::new(&config, reader);
    let mut leds = IndicatorLeds::new(TracedPin::new(), TracedPin::new(), TracedPin::new());
    let mut sink = LogEventSink::new();

    let first = agent.run_cycle(&mut leds, &mut transport, &mut sink);
    let second = agent.run_cycle(&mut leds, &mut transport, &mut sink);

    assert_eq!(first.outcome, Some(PublishOutcome::DeliveryFailed));
    assert_eq!(second.outcome, Some(PublishOutcome::Delivered));
    let broker = transport.sim_broker();
    // Initial state was injected; the only open is the reconnect.
    assert_eq!(broker.opens, 1);
    assert_eq!(broker.delivered.len(), 1);
}

#[test]
fn unreachable_wifi_surfaces_connectivity_error() {
    let config = test_config();
    let mut wifi = WifiAdapter::new(&config.wifi_ssid, &config.wifi_password).unwrap();
    wifi.sim_fail_next(1);
    let result = bootstrap::connect_network(&mut wifi, &config);
    assert!(matches!(result, Err(ConnectivityError::WifiFailed)));
}

#[test]
fn fault_blink_drives_red_pin_only() {
    let (r, y, g) = (TracedPin::new(), TracedPin::new(), TracedPin::new());
    let mut leds = IndicatorLeds::new(r.clone(), y.clone(), g.clone());
    let mut blinker = FaultBlinker::new();
    let mut waited = 0;

    bootstrap::blink_fault(&mut blinker, &mut leds, 6, |_| waited += 1);

    assert_eq!(waited, 6);
    let red = r.trace.borrow();
    // new(): off; first step clears all (off), then six toggles.
    assert_eq!(&red[2..], &[true, false, true, false, true, false]);
    assert!(!y.level() && !g.level());
}
