//! Outbound application events.
//!
//! The [`AgentService`](super::service::AgentService) emits these through the
//! [`EventSink`](super::ports::EventSink) port.  Adapters on the other side
//! decide what to do with them (log to serial, count them in a test).

use crate::error::Error;
use crate::status::StatusCode;

use super::publisher::PublishOutcome;
use super::service::CyclePhase;

/// Structured events emitted by the application core.
#[derive(Debug, Clone)]
pub enum AppEvent {
    /// The service entered its loop.
    Started { interval_secs: u32 },

    /// The cycle moved to another phase.
    PhaseChanged { from: CyclePhase, to: CyclePhase },

    /// Classification done, about to hand the message to the transport.
    Publishing(StatusCode),

    /// The transport rejected the message; a reconnect was requested.
    DeliveryFailed { status: StatusCode, error: Error },

    /// A cycle failed before delivery was attempted.
    CycleFault(Error),

    /// End of cycle, before the fixed wait.
    CycleCompleted {
        status: StatusCode,
        /// `None` when the cycle faulted before delivery.
        outcome: Option<PublishOutcome>,
        stats: CycleStats,
    },
}

/// Running counters since boot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CycleStats {
    pub cycles: u64,
    pub delivered: u64,
    pub delivery_failures: u64,
    pub faults: u64,
}
