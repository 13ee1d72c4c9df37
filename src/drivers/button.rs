//! Manual trigger button.
//!
//! ## Hardware
//!
//! Active-low momentary switch with the internal pull-up enabled: the line
//! idles high and reads low while pressed.  The driver reports the raw level;
//! [`SensorReader`](crate::sensors::SensorReader) applies the inversion.
//!
//! No debouncing: the level is sampled once per cycle, seconds apart.

use embedded_hal::digital::InputPin;
use log::warn;

use crate::app::ports::ManualInputPort;

pub struct ManualButton<P> {
    pin: P,
}

impl<P: InputPin> ManualButton<P> {
    pub fn new(pin: P) -> Self {
        Self { pin }
    }
}

impl<P: InputPin> ManualInputPort for ManualButton<P> {
    fn read_level(&mut self) -> bool {
        // An unreadable pin reads as idle so it cannot fake an event.
        self.pin.is_high().unwrap_or_else(|_| {
            warn!("button GPIO read failed, treating as released");
            true
        })
    }
}
