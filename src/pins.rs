//! GPIO / peripheral pin assignments for the Inator board.
//!
//! `main()` takes the matching typed pins from `Peripherals`; keep the two in
//! step when rewiring.

// ---------------------------------------------------------------------------
// Indicator LEDs (discrete, active HIGH)
// ---------------------------------------------------------------------------

pub const LED_RED_GPIO: i32 = 16;
pub const LED_YELLOW_GPIO: i32 = 17;
pub const LED_GREEN_GPIO: i32 = 18;

// ---------------------------------------------------------------------------
// Manual trigger (active-low with internal pull-up)
// ---------------------------------------------------------------------------

/// Momentary push-button that tags the current cycle as an event.
pub const BUTTON_GPIO: i32 = 15;

// ---------------------------------------------------------------------------
// Sensors
// ---------------------------------------------------------------------------

/// LM45 analog temperature sensor, 10 mV/°C, on ADC1.
pub const ANALOG_TEMP_GPIO: i32 = 4;

/// DHT11 single-wire data line (open-drain, external pull-up).
pub const DHT11_GPIO: i32 = 5;

// ---------------------------------------------------------------------------
// ADC scaling
// ---------------------------------------------------------------------------

/// Full-scale ADC reference voltage.
pub const ADC_REFERENCE_VOLTS: f32 = 3.3;

/// Highest code of the 12-bit ESP32 ADC.
pub const ADC_MAX_CODE: u16 = 4095;
