//! Monotonic uptime clock.
//!
//! On ESP-IDF this reads the high-resolution `esp_timer`; on host it counts
//! from construction with `std::time::Instant`.

use crate::app::ports::ClockPort;

/// Microsecond uptime source for rate-limited drivers.
#[derive(Debug)]
pub struct UptimeClock {
    #[cfg(not(target_os = "espidf"))]
    start: std::time::Instant,
}

impl Default for UptimeClock {
    fn default() -> Self {
        Self::new()
    }
}

impl UptimeClock {
    pub fn new() -> Self {
        Self {
            #[cfg(not(target_os = "espidf"))]
            start: std::time::Instant::now(),
        }
    }
}

impl ClockPort for UptimeClock {
    #[cfg(target_os = "espidf")]
    fn uptime_us(&self) -> u64 {
        // Never negative: the timer starts at zero on boot.
        (unsafe { esp_idf_svc::sys::esp_timer_get_time() }) as u64
    }

    #[cfg(not(target_os = "espidf"))]
    fn uptime_us(&self) -> u64 {
        self.start.elapsed().as_micros() as u64
    }
}
