//! Application service, the hexagonal core.
//!
//! [`AgentService`] owns the [`SensorReader`] and the [`TelemetryPublisher`]
//! and runs the fixed-interval cycle:
//!
//! ```text
//!  SAMPLING ──▶ CLASSIFYING ──▶ PUBLISHING ──▶ WAITING ──┐
//!     ▲                                                   │
//!     └───────────────────────────────────────────────────┘
//! ```
//!
//! A failure inside a cycle is absorbed at the cycle boundary: it is logged,
//! a best-effort reconnect is requested, and the loop continues to WAITING.
//! Nothing in here terminates the loop.  The wait is constant, whatever the
//! previous cycle's outcome.

use core::time::Duration;

use log::{error, info, warn};

use crate::config::AgentConfig;
use crate::sensors::{Reading, SensorReader};
use crate::status::{StatusCode, classify};

use super::events::{AppEvent, CycleStats};
use super::ports::{
    AnalogPort, ClimatePort, EventSink, IndicatorPort, ManualInputPort, MessageEncoder,
    TelemetryTransport,
};
use super::publisher::{PublishOutcome, TelemetryPublisher};
use super::telemetry::JsonEncoder;

/// Where the loop currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CyclePhase {
    Sampling,
    Classifying,
    Publishing,
    Waiting,
}

/// What one cycle produced.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CycleReport {
    pub reading: Reading,
    pub status: StatusCode,
    /// `None` when the cycle faulted before delivery was attempted.
    pub outcome: Option<PublishOutcome>,
}

/// The telemetry agent.
pub struct AgentService<A, C, M, E = JsonEncoder> {
    reader: SensorReader<A, C, M>,
    publisher: TelemetryPublisher<E>,
    interval: Duration,
    phase: CyclePhase,
    stats: CycleStats,
}

impl<A, C, M> AgentService<A, C, M>
where
    A: AnalogPort,
    C: ClimatePort,
    M: ManualInputPort,
{
    /// Assumes `config` is validated and the transport is already connected.
    pub fn new(config: &AgentConfig, reader: SensorReader<A, C, M>) -> Self {
        Self::with_encoder(config, reader, JsonEncoder)
    }
}

impl<A, C, M, E> AgentService<A, C, M, E>
where
    A: AnalogPort,
    C: ClimatePort,
    M: ManualInputPort,
    E: MessageEncoder,
{
    pub fn with_encoder(config: &AgentConfig, reader: SensorReader<A, C, M>, encoder: E) -> Self {
        Self {
            reader,
            publisher: TelemetryPublisher::with_encoder(config, encoder),
            interval: config.interval(),
            phase: CyclePhase::Waiting,
            stats: CycleStats::default(),
        }
    }

    // ── Per-cycle orchestration ───────────────────────────────

    /// Run one SAMPLING → CLASSIFYING → PUBLISHING pass and stop in WAITING.
    pub fn run_cycle(
        &mut self,
        indicators: &mut impl IndicatorPort,
        transport: &mut impl TelemetryTransport,
        sink: &mut impl EventSink,
    ) -> CycleReport {
        self.stats.cycles += 1;

        // 1. Sample every input (never fails, degraded fields are None)
        self.enter(CyclePhase::Sampling, sink);
        let reading = self.reader.sample();

        // 2. Classify and show the result
        self.enter(CyclePhase::Classifying, sink);
        let (status, leds) = classify(&reading);
        indicators.apply(leds);

        // 3. Publish
        self.enter(CyclePhase::Publishing, sink);
        let outcome = match self.publisher.publish(&reading, status, transport, sink) {
            Ok(outcome) => {
                match outcome {
                    PublishOutcome::Delivered => self.stats.delivered += 1,
                    PublishOutcome::DeliveryFailed => self.stats.delivery_failures += 1,
                }
                Some(outcome)
            }
            Err(e) => {
                error!("cycle {} failed: {}", self.stats.cycles, e);
                self.stats.faults += 1;
                sink.emit(&AppEvent::CycleFault(e));
                if let Err(re) = transport.reconnect() {
                    warn!("reconnect after cycle fault failed: {}", re);
                }
                None
            }
        };

        // 4. Hand over to the fixed wait
        self.enter(CyclePhase::Waiting, sink);
        sink.emit(&AppEvent::CycleCompleted {
            status,
            outcome,
            stats: self.stats,
        });

        CycleReport {
            reading,
            status,
            outcome,
        }
    }

    /// Run `cycles` cycles, each followed by `wait(interval)`.
    ///
    /// The pause is the configured interval whatever the cycle's outcome.
    pub fn run_cycles(
        &mut self,
        cycles: u32,
        indicators: &mut impl IndicatorPort,
        transport: &mut impl TelemetryTransport,
        sink: &mut impl EventSink,
        wait: &mut impl FnMut(Duration),
    ) {
        for _ in 0..cycles {
            self.run_cycle(indicators, transport, sink);
            wait(self.interval);
        }
    }

    /// Cycle forever with a constant pause.  `wait` blocks for the interval.
    pub fn run_forever(
        &mut self,
        indicators: &mut impl IndicatorPort,
        transport: &mut impl TelemetryTransport,
        sink: &mut impl EventSink,
        mut wait: impl FnMut(Duration),
    ) -> ! {
        sink.emit(&AppEvent::Started {
            interval_secs: self.interval.as_secs() as u32,
        });
        info!(
            "agent loop started, publishing to '{}' every {}s",
            self.publisher.topic(),
            self.interval.as_secs()
        );
        loop {
            self.run_cycles(1, indicators, transport, sink, &mut wait);
        }
    }

    fn enter(&mut self, to: CyclePhase, sink: &mut impl EventSink) {
        let from = self.phase;
        self.phase = to;
        sink.emit(&AppEvent::PhaseChanged { from, to });
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn phase(&self) -> CyclePhase {
        self.phase
    }

    pub fn stats(&self) -> CycleStats {
        self.stats
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }
}
