//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing application events to the ESP-IDF
//! logger (UART / USB-CDC in production, stderr on host).

use log::{debug, error, info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;
use crate::app::publisher::PublishOutcome;

/// Adapter that logs every [`AppEvent`] to the serial console.
#[derive(Debug, Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Started { interval_secs } => {
                info!("START | interval={}s", interval_secs);
            }
            AppEvent::PhaseChanged { from, to } => {
                debug!("PHASE | {:?} -> {:?}", from, to);
            }
            AppEvent::Publishing(status) => {
                info!("[{}] Publishing...", status);
            }
            AppEvent::DeliveryFailed { status, error } => {
                warn!("PUBLISH | {} dropped: {}", status, error);
            }
            AppEvent::CycleFault(e) => {
                error!("FAULT | cycle aborted: {}", e);
            }
            AppEvent::CycleCompleted {
                status,
                outcome,
                stats,
            } => {
                let outcome = match outcome {
                    Some(PublishOutcome::Delivered) => "delivered",
                    Some(PublishOutcome::DeliveryFailed) => "failed",
                    None => "aborted",
                };
                info!(
                    "CYCLE | #{} status={} publish={} | delivered={} failed={} faults={}",
                    stats.cycles,
                    status,
                    outcome,
                    stats.delivered,
                    stats.delivery_failures,
                    stats.faults,
                );
            }
        }
    }
}
