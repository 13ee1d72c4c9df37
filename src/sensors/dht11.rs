//! DHT11 temperature/humidity sensor (single-wire, open-drain).
//!
//! ## Protocol
//!
//! 1. Host pulls the line low for 18 ms, then releases it.
//! 2. Sensor answers with 80 µs low, 80 µs high.
//! 3. 40 data bits follow, MSB first.  Each bit is a 50 µs low preamble
//!    followed by a high pulse: ~26 µs for `0`, ~70 µs for `1`.
//! 4. Frame layout: `[rh_int, rh_dec, t_int, t_dec, checksum]`, where the
//!    checksum is the wrapping sum of the first four bytes.  Bit 7 of `t_dec`
//!    marks a negative temperature.
//!
//! The sensor must not be polled more than once every 2 s; a successful
//! measurement is reused inside that window, so the temperature and humidity
//! reads of one cycle share a frame.
//!
//! The driver is generic over `embedded-hal` 1.0, so it runs on the ESP-IDF
//! `PinDriver<InputOutput>` and on test doubles alike.

use core::time::Duration;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin};
use log::debug;

use crate::app::ports::{ClimatePort, ClockPort};
use crate::error::SensorFault;

const START_LOW_MS: u32 = 18;
/// Polls of ~1 µs before an expected edge is declared missing.
const EDGE_TIMEOUT_POLLS: u32 = 100;
/// High-pulse length (polls) above which a bit reads as `1`.
const ONE_THRESHOLD_POLLS: u32 = 40;
const MIN_REPOLL_INTERVAL: Duration = Duration::from_secs(2);

/// One decoded frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Measurement {
    pub temperature_c: f32,
    pub humidity_pct: f32,
}

/// Decode a raw 5-byte frame, validating its checksum.
pub fn decode(frame: [u8; 5]) -> Result<Measurement, SensorFault> {
    let sum = frame[..4].iter().fold(0u8, |acc, b| acc.wrapping_add(*b));
    if sum != frame[4] {
        return Err(SensorFault::Checksum);
    }
    let humidity_pct = f32::from(frame[0]) + f32::from(frame[1]) * 0.1;
    let magnitude = f32::from(frame[2]) + f32::from(frame[3] & 0x7F) * 0.1;
    let temperature_c = if frame[3] & 0x80 != 0 {
        -magnitude
    } else {
        magnitude
    };
    Ok(Measurement {
        temperature_c,
        humidity_pct,
    })
}

pub struct Dht11<P, D, T> {
    pin: P,
    delay: D,
    clock: T,
    /// Uptime (µs) and value of the last good frame.
    last: Option<(u64, Measurement)>,
}

impl<P, D, T> Dht11<P, D, T>
where
    P: InputPin + OutputPin,
    D: DelayNs,
    T: ClockPort,
{
    /// Take ownership of the data line and park it idle-high.
    pub fn new(mut pin: P, delay: D, clock: T) -> Result<Self, SensorFault> {
        pin.set_high().map_err(|_| SensorFault::Bus)?;
        Ok(Self {
            pin,
            delay,
            clock,
            last: None,
        })
    }

    /// Latest measurement, reusing a frame younger than 2 s.
    pub fn measure(&mut self) -> Result<Measurement, SensorFault> {
        let now = self.clock.uptime_us();
        if let Some((at, m)) = self.last {
            if now.saturating_sub(at) < MIN_REPOLL_INTERVAL.as_micros() as u64 {
                return Ok(m);
            }
        }
        let frame = self.read_frame();
        // Always leave the line released, even after a failed transfer.
        let _ = self.pin.set_high();
        let m = decode(frame?)?;
        debug!(
            "dht11: T={:.1}\u{00b0}C RH={:.1}%",
            m.temperature_c, m.humidity_pct
        );
        self.last = Some((now, m));
        Ok(m)
    }

    fn read_frame(&mut self) -> Result<[u8; 5], SensorFault> {
        self.pin.set_low().map_err(|_| SensorFault::Bus)?;
        self.delay.delay_ms(START_LOW_MS);
        self.pin.set_high().map_err(|_| SensorFault::Bus)?;

        self.wait_for(false).map_err(|_| SensorFault::NoResponse)?;
        self.wait_for(true)?;
        self.wait_for(false)?;

        let mut frame = [0u8; 5];
        for bit in 0..40 {
            self.wait_for(true)?;
            let high_polls = self.wait_for(false)?;
            if high_polls > ONE_THRESHOLD_POLLS {
                frame[bit / 8] |= 0x80 >> (bit % 8);
            }
        }
        Ok(frame)
    }

    /// Poll until the line reaches `high`; returns the polls spent waiting.
    fn wait_for(&mut self, high: bool) -> Result<u32, SensorFault> {
        for polls in 0..EDGE_TIMEOUT_POLLS {
            if self.pin.is_high().map_err(|_| SensorFault::Bus)? == high {
                return Ok(polls);
            }
            self.delay.delay_us(1);
        }
        Err(SensorFault::Timeout)
    }
}

impl<P, D, T> ClimatePort for Dht11<P, D, T>
where
    P: InputPin + OutputPin,
    D: DelayNs,
    T: ClockPort,
{
    fn read_temperature(&mut self) -> Result<f32, SensorFault> {
        self.measure().map(|m| m.temperature_c)
    }

    fn read_humidity(&mut self) -> Result<f32, SensorFault> {
        self.measure().map(|m| m.humidity_pct)
    }
}
