//! Three discrete indicator LEDs (red / yellow / green).
//!
//! Each LED is an active-high `embedded-hal` output.  Writes are best
//! effort: a failing GPIO is logged and skipped, never propagated into the
//! sampling cycle.

use embedded_hal::digital::{OutputPin, PinState};
use log::warn;

use crate::app::ports::IndicatorPort;
use crate::status::{Indicator, IndicatorState};

pub struct IndicatorLeds<R, Y, G> {
    red: R,
    yellow: Y,
    green: G,
    current: IndicatorState,
}

impl<R, Y, G> IndicatorLeds<R, Y, G>
where
    R: OutputPin,
    Y: OutputPin,
    G: OutputPin,
{
    /// Take the three pins and switch every LED off.
    pub fn new(red: R, yellow: Y, green: G) -> Self {
        let mut leds = Self {
            red,
            yellow,
            green,
            current: IndicatorState::OFF,
        };
        leds.apply(IndicatorState::OFF);
        leds
    }

    /// Last state written (what the LEDs should be showing).
    pub fn current(&self) -> IndicatorState {
        self.current
    }
}

impl<R, Y, G> IndicatorPort for IndicatorLeds<R, Y, G>
where
    R: OutputPin,
    Y: OutputPin,
    G: OutputPin,
{
    fn set_indicator(&mut self, which: Indicator, on: bool) {
        let level = PinState::from(on);
        let result = match which {
            Indicator::Red => self.red.set_state(level).map_err(|_| ()),
            Indicator::Yellow => self.yellow.set_state(level).map_err(|_| ()),
            Indicator::Green => self.green.set_state(level).map_err(|_| ()),
        };
        if result.is_err() {
            warn!("indicator {:?} write failed", which);
            return;
        }
        match which {
            Indicator::Red => self.current.red = on,
            Indicator::Yellow => self.current.yellow = on,
            Indicator::Green => self.current.green = on,
        }
    }
}
