//! Red fault blink shown while the device is halted on a network failure.
//!
//! A square wave on the red LED with a 200 ms half-period; yellow and green
//! are held off.  The blinker only tracks phase; the caller owns the delay.

use core::time::Duration;

use crate::app::ports::IndicatorPort;
use crate::status::{Indicator, IndicatorState};

/// Time between toggles.
pub const FAULT_BLINK_PERIOD: Duration = Duration::from_millis(200);

#[derive(Debug, Default)]
pub struct FaultBlinker {
    lit: bool,
    started: bool,
}

impl FaultBlinker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip the red LED.  Returns the new red level.
    pub fn step(&mut self, leds: &mut impl IndicatorPort) -> bool {
        if !self.started {
            leds.apply(IndicatorState::OFF);
            self.started = true;
        }
        self.lit = !self.lit;
        leds.set_indicator(Indicator::Red, self.lit);
        self.lit
    }

    pub fn is_lit(&self) -> bool {
        self.lit
    }
}
