//! Integration tests for the SensorReader → classify → publisher pipeline
//! driven by `AgentService::run_cycle`.

use std::time::Duration;

use inator::app::events::{AppEvent, CycleStats};
use inator::app::publisher::PublishOutcome;
use inator::app::service::{AgentService, CyclePhase};
use inator::error::{Error, SensorFault};
use inator::status::{IndicatorState, StatusCode};
use serde_json::json;

use crate::mock_hw::{
    FailingEncoder, MockButton, MockClimate, MockReader, MockTransport, RecordingLeds,
    RecordingSink, ScriptedAnalog, reader, test_config,
};

fn agent(reader: MockReader) -> AgentService<ScriptedAnalog, MockClimate, MockButton> {
    AgentService::new(&test_config(), reader)
}

// ── Happy path ────────────────────────────────────────────────

#[test]
fn agreeing_paths_publish_stable() {
    let mut agent = agent(reader(
        ScriptedAnalog::constant(250),
        Some(MockClimate::ok(27.5, 40.0)),
        MockButton::released(),
    ));
    let (mut leds, mut transport, mut sink) = (
        RecordingLeds::default(),
        MockTransport::new(),
        RecordingSink::default(),
    );

    let report = agent.run_cycle(&mut leds, &mut transport, &mut sink);

    assert_eq!(report.status, StatusCode::SystemStable);
    assert_eq!(report.outcome, Some(PublishOutcome::Delivered));
    assert_eq!(leds.state, IndicatorState::GREEN);
    assert_eq!(transport.sent[0].0, "lab/inator-01/telemetry");
    assert_eq!(
        transport.last_json(),
        json!({
            "id": "inator-01",
            "status": "SYSTEM_STABLE",
            "metrics": { "analogue_approx": 25.0, "digital_ref": 27.5, "delta": 2.5 },
            "raw": { "v": 0.25, "h": 40.0 }
        })
    );
    assert_eq!(transport.reconnects, 0);
}

#[test]
fn publishing_event_precedes_completion() {
    let mut agent = agent(reader(
        ScriptedAnalog::constant(250),
        Some(MockClimate::ok(25.0, 40.0)),
        MockButton::released(),
    ));
    let mut sink = RecordingSink::default();
    agent.run_cycle(
        &mut RecordingLeds::default(),
        &mut MockTransport::new(),
        &mut sink,
    );

    let publishing = sink
        .events
        .iter()
        .position(|e| matches!(e, AppEvent::Publishing(StatusCode::SystemStable)))
        .expect("publishing event emitted");
    assert_eq!(publishing, sink.events.len() - 3);
    assert!(matches!(
        sink.events.last(),
        Some(AppEvent::CycleCompleted {
            status: StatusCode::SystemStable,
            outcome: Some(PublishOutcome::Delivered),
            ..
        })
    ));
}

#[test]
fn phases_are_reported_in_cycle_order() {
    let mut agent = agent(reader(
        ScriptedAnalog::constant(250),
        Some(MockClimate::ok(25.0, 40.0)),
        MockButton::released(),
    ));
    let mut sink = RecordingSink::default();
    agent.run_cycle(
        &mut RecordingLeds::default(),
        &mut MockTransport::new(),
        &mut sink,
    );

    let phases: Vec<_> = sink
        .events
        .iter()
        .filter_map(|e| match e {
            AppEvent::PhaseChanged { from, to } => Some((*from, *to)),
            _ => None,
        })
        .collect();
    assert_eq!(
        phases,
        [
            (CyclePhase::Waiting, CyclePhase::Sampling),
            (CyclePhase::Sampling, CyclePhase::Classifying),
            (CyclePhase::Classifying, CyclePhase::Publishing),
            (CyclePhase::Publishing, CyclePhase::Waiting),
        ]
    );
    assert_eq!(agent.phase(), CyclePhase::Waiting);
}

// ── Degraded inputs ───────────────────────────────────────────

#[test]
fn missing_digital_sensor_publishes_unstable_with_nulls() {
    let mut agent = agent(reader(
        ScriptedAnalog::constant(250),
        None,
        MockButton::released(),
    ));
    let (mut leds, mut transport, mut sink) = (
        RecordingLeds::default(),
        MockTransport::new(),
        RecordingSink::default(),
    );

    let report = agent.run_cycle(&mut leds, &mut transport, &mut sink);

    assert_eq!(report.status, StatusCode::SystemUnstable);
    assert_eq!(leds.state, IndicatorState::RED);
    let msg = transport.last_json();
    assert_eq!(msg["status"], "SYSTEM_UNSTABLE");
    assert!(msg["metrics"]["digital_ref"].is_null());
    assert!(msg["metrics"]["delta"].is_null());
    assert!(msg["raw"]["h"].is_null());
    assert_eq!(msg["metrics"]["analogue_approx"], 25.0);
}

#[test]
fn humidity_fault_keeps_temperature() {
    let climate = MockClimate {
        temperature: Ok(26.0),
        humidity: Err(SensorFault::Checksum),
    };
    let mut agent = agent(reader(
        ScriptedAnalog::constant(250),
        Some(climate),
        MockButton::released(),
    ));
    let mut transport = MockTransport::new();
    let report = agent.run_cycle(
        &mut RecordingLeds::default(),
        &mut transport,
        &mut RecordingSink::default(),
    );

    assert_eq!(report.reading.calibrated_temperature, Some(26.0));
    assert_eq!(report.reading.calibrated_humidity, None);
    assert_eq!(report.status, StatusCode::SystemStable);
    let msg = transport.last_json();
    assert_eq!(msg["metrics"]["digital_ref"], 26.0);
    assert!(msg["raw"]["h"].is_null());
}

#[test]
fn temperature_fault_is_unstable_even_with_humidity() {
    let climate = MockClimate {
        temperature: Err(SensorFault::Timeout),
        humidity: Ok(55.0),
    };
    let mut agent = agent(reader(
        ScriptedAnalog::constant(250),
        Some(climate),
        MockButton::released(),
    ));
    let mut transport = MockTransport::new();
    let report = agent.run_cycle(
        &mut RecordingLeds::default(),
        &mut transport,
        &mut RecordingSink::default(),
    );

    assert_eq!(report.status, StatusCode::SystemUnstable);
    assert_eq!(transport.last_json()["raw"]["h"], 55.0);
}

#[test]
fn divergent_paths_are_unstable() {
    // 25.0 approx against 31.0 calibrated.
    let mut agent = agent(reader(
        ScriptedAnalog::constant(250),
        Some(MockClimate::ok(31.0, 40.0)),
        MockButton::released(),
    ));
    let mut leds = RecordingLeds::default();
    let mut transport = MockTransport::new();
    let report = agent.run_cycle(&mut leds, &mut transport, &mut RecordingSink::default());

    assert_eq!(report.status, StatusCode::SystemUnstable);
    assert_eq!(leds.state, IndicatorState::RED);
    assert_eq!(transport.last_json()["metrics"]["delta"], 6.0);
}

#[test]
fn manual_trigger_overrides_divergence() {
    let mut agent = agent(reader(
        ScriptedAnalog::constant(250),
        Some(MockClimate::ok(40.0, 40.0)),
        MockButton::pressed(),
    ));
    let mut leds = RecordingLeds::default();
    let mut transport = MockTransport::new();
    let report = agent.run_cycle(&mut leds, &mut transport, &mut RecordingSink::default());

    assert_eq!(report.status, StatusCode::EventTagged);
    assert_eq!(leds.state, IndicatorState::YELLOW);
    assert_eq!(transport.last_json()["status"], "EVENT_TAGGED");
}

// ── Transport failures ────────────────────────────────────────

#[test]
fn send_failure_reconnects_once_and_drops_message() {
    let mut agent = agent(reader(
        ScriptedAnalog::constant(250),
        Some(MockClimate::ok(27.5, 40.0)),
        MockButton::released(),
    ));
    let mut transport = MockTransport::failing(1);
    let mut sink = RecordingSink::default();

    let report = agent.run_cycle(&mut RecordingLeds::default(), &mut transport, &mut sink);

    assert_eq!(report.outcome, Some(PublishOutcome::DeliveryFailed));
    assert_eq!(transport.send_attempts, 1);
    assert_eq!(transport.reconnects, 1);
    assert!(transport.sent.is_empty());
    assert!(sink.events.iter().any(|e| matches!(
        e,
        AppEvent::DeliveryFailed {
            status: StatusCode::SystemStable,
            ..
        }
    )));
    assert_eq!(agent.phase(), CyclePhase::Waiting);
}

#[test]
fn loop_continues_after_failed_delivery() {
    let mut agent = agent(reader(
        ScriptedAnalog::constant(250),
        Some(MockClimate::ok(27.5, 40.0)),
        MockButton::released(),
    ));
    let mut transport = MockTransport::failing(1);
    transport.fail_reconnect = true;
    let mut leds = RecordingLeds::default();
    let mut sink = RecordingSink::default();

    let first = agent.run_cycle(&mut leds, &mut transport, &mut sink);
    let second = agent.run_cycle(&mut leds, &mut transport, &mut sink);

    assert_eq!(first.outcome, Some(PublishOutcome::DeliveryFailed));
    assert_eq!(second.outcome, Some(PublishOutcome::Delivered));
    assert_eq!(transport.sent.len(), 1);
    assert_eq!(transport.reconnects, 1);
    assert_eq!(
        agent.stats(),
        CycleStats {
            cycles: 2,
            delivered: 1,
            delivery_failures: 1,
            faults: 0,
        }
    );
}

#[test]
fn encode_fault_is_absorbed_at_cycle_boundary() {
    let mut agent = AgentService::with_encoder(
        &test_config(),
        reader(
            ScriptedAnalog::constant(250),
            Some(MockClimate::ok(27.5, 40.0)),
            MockButton::released(),
        ),
        FailingEncoder { fail: 1 },
    );
    let mut leds = RecordingLeds::default();
    let mut transport = MockTransport::new();
    let mut sink = RecordingSink::default();

    let first = agent.run_cycle(&mut leds, &mut transport, &mut sink);

    assert_eq!(first.outcome, None);
    assert_eq!(first.status, StatusCode::SystemStable);
    assert_eq!(leds.state, IndicatorState::GREEN);
    assert_eq!(
        sink.events
            .iter()
            .filter(|e| matches!(e, AppEvent::CycleFault(Error::Encode)))
            .count(),
        1
    );
    assert_eq!(agent.stats().faults, 1);
    assert_eq!(transport.send_attempts, 0);
    assert_eq!(transport.reconnects, 1);
    assert_eq!(agent.phase(), CyclePhase::Waiting);
    assert!(matches!(
        sink.events.last(),
        Some(AppEvent::CycleCompleted { outcome: None, .. })
    ));

    let second = agent.run_cycle(&mut leds, &mut transport, &mut sink);

    assert_eq!(second.outcome, Some(PublishOutcome::Delivered));
    assert_eq!(transport.sent.len(), 1);
    assert_eq!(transport.reconnects, 1);
    assert_eq!(
        agent.stats(),
        CycleStats {
            cycles: 2,
            delivered: 1,
            delivery_failures: 0,
            faults: 1,
        }
    );
}

// ── Loop bookkeeping ──────────────────────────────────────────

#[test]
fn each_cycle_samples_fresh() {
    // 0.25 V, then 0.30 V.
    let mut agent = agent(reader(
        ScriptedAnalog::sequence(&[250, 300]),
        Some(MockClimate::ok(27.5, 40.0)),
        MockButton::released(),
    ));
    let mut leds = RecordingLeds::default();
    let mut transport = MockTransport::new();
    let mut sink = RecordingSink::default();

    let first = agent.run_cycle(&mut leds, &mut transport, &mut sink);
    let second = agent.run_cycle(&mut leds, &mut transport, &mut sink);

    assert_eq!(first.status, StatusCode::SystemStable);
    assert!((second.reading.approx_temperature - 30.0).abs() < 1e-4);
    // |30.0 - 27.5| = 2.5, still stable.
    assert_eq!(second.status, StatusCode::SystemStable);
    assert_eq!(transport.sent.len(), 2);
}

#[test]
fn indicators_written_every_cycle() {
    let mut agent = agent(reader(
        ScriptedAnalog::constant(250),
        None,
        MockButton::released(),
    ));
    let mut leds = RecordingLeds::default();
    for _ in 0..3 {
        agent.run_cycle(
            &mut leds,
            &mut MockTransport::new(),
            &mut RecordingSink::default(),
        );
    }
    // Three LEDs per cycle.
    assert_eq!(leds.calls.len(), 9);
    assert_eq!(leds.state, IndicatorState::RED);
}

#[test]
fn interval_comes_from_config() {
    let agent = agent(reader(
        ScriptedAnalog::constant(0),
        None,
        MockButton::released(),
    ));
    assert_eq!(agent.interval().as_secs(), 5);
    assert_eq!(agent.stats(), CycleStats::default());
}

#[test]
fn wait_gets_the_interval_whatever_the_outcome() {
    let mut agent = agent(reader(
        ScriptedAnalog::constant(250),
        Some(MockClimate::ok(27.5, 40.0)),
        MockButton::released(),
    ));
    let mut transport = MockTransport::failing(1);
    let mut waits = Vec::new();

    agent.run_cycles(
        3,
        &mut RecordingLeds::default(),
        &mut transport,
        &mut RecordingSink::default(),
        &mut |d| waits.push(d),
    );

    assert_eq!(waits, [Duration::from_secs(5); 3]);
    assert_eq!(transport.send_attempts, 3);
    assert_eq!(transport.sent.len(), 2);
    assert_eq!(agent.stats().delivery_failures, 1);
    assert_eq!(agent.stats().cycles, 3);
}
