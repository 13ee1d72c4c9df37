//! Indicator, button and ADC drivers.

pub mod button;
pub mod fault_blinker;
pub mod hw_init;
pub mod indicator_leds;
