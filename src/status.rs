//! Status classification.
//!
//! Maps one [`Reading`] to a [`StatusCode`] and the [`IndicatorState`] that
//! should be shown for it.  Pure: the result depends only on the reading, so
//! the indicator adapter applies it as a separate step.
//!
//! ## Priority (first match wins)
//!
//! | # | Condition                          | Status            | LEDs        |
//! |---|------------------------------------|-------------------|-------------|
//! | 1 | manual trigger pressed             | `EVENT_TAGGED`    | yellow only |
//! | 2 | calibrated temperature absent      | `SYSTEM_UNSTABLE` | red only    |
//! | 3 | `|approx - calibrated| > 3.0`      | `SYSTEM_UNSTABLE` | red only    |
//! | 4 | otherwise                          | `SYSTEM_STABLE`   | green only  |

use core::fmt;

use serde::{Deserialize, Serialize};

use crate::sensors::Reading;

/// Maximum tolerated divergence between the two temperature paths.
/// Exactly 3.0 still counts as stable.
pub const DIVERGENCE_THRESHOLD: f32 = 3.0;

/// Device health for one cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StatusCode {
    /// The operator pressed the manual trigger.
    EventTagged,
    /// Both paths present and in agreement.
    SystemStable,
    /// Paths diverge, or the calibrated path is offline.
    SystemUnstable,
}

impl StatusCode {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::EventTagged => "EVENT_TAGGED",
            Self::SystemStable => "SYSTEM_STABLE",
            Self::SystemUnstable => "SYSTEM_UNSTABLE",
        }
    }
}

impl fmt::Display for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One of the three discrete indicator LEDs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Indicator {
    Red,
    Yellow,
    Green,
}

impl Indicator {
    pub const ALL: [Indicator; 3] = [Indicator::Red, Indicator::Yellow, Indicator::Green];
}

/// Desired state of the three indicators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct IndicatorState {
    pub red: bool,
    pub yellow: bool,
    pub green: bool,
}

impl IndicatorState {
    pub const YELLOW: Self = Self {
        red: false,
        yellow: true,
        green: false,
    };
    pub const RED: Self = Self {
        red: true,
        yellow: false,
        green: false,
    };
    pub const GREEN: Self = Self {
        red: false,
        yellow: false,
        green: true,
    };
    pub const OFF: Self = Self {
        red: false,
        yellow: false,
        green: false,
    };

    pub const fn get(&self, which: Indicator) -> bool {
        match which {
            Indicator::Red => self.red,
            Indicator::Yellow => self.yellow,
            Indicator::Green => self.green,
        }
    }
}

/// Absolute divergence between the two paths, when both are present.
pub fn divergence(reading: &Reading) -> Option<f32> {
    reading
        .calibrated_temperature
        .map(|reference| (reading.approx_temperature - reference).abs())
}

/// Classify a reading.
pub fn classify(reading: &Reading) -> (StatusCode, IndicatorState) {
    if reading.manual_trigger {
        return (StatusCode::EventTagged, IndicatorState::YELLOW);
    }
    match divergence(reading) {
        // Reference sensor offline is a degraded state, not a neutral one.
        None => (StatusCode::SystemUnstable, IndicatorState::RED),
        Some(delta) if delta > DIVERGENCE_THRESHOLD => {
            (StatusCode::SystemUnstable, IndicatorState::RED)
        }
        Some(_) => (StatusCode::SystemStable, IndicatorState::GREEN),
    }
}
