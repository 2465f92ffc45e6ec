//! Slow breathing fade
//!
//! One shared triangular envelope: ramp up over the first third of the
//! period, down over the second third, then stay dark for the rest.

use embassy_time::{Duration, Instant};

use super::Pattern;
use crate::{cie::cie_lookup, math8::progress8_round};

const DEFAULT_PERIOD_MS: u64 = 6_000;

/// Configuration for the breathe pattern
#[derive(Debug, Clone, Copy)]
pub struct BreatheConfig {
    /// Length of one full breath including the dark third
    pub period: Duration,
}

/// Shared fade broadcast to every channel
#[derive(Debug, Clone)]
pub struct BreathePattern {
    period: Duration,
}

impl Default for BreathePattern {
    fn default() -> Self {
        Self::new(Duration::from_millis(DEFAULT_PERIOD_MS))
    }
}

impl BreathePattern {
    pub const fn new(period: Duration) -> Self {
        Self { period }
    }

    pub const fn from_config(config: &BreatheConfig) -> Self {
        Self::new(config.period)
    }

    pub const fn period(&self) -> Duration {
        self.period
    }

    /// Linear envelope level (0-255) at `now`
    fn envelope(&self, now: Instant) -> u8 {
        let period = self.period.as_micros();
        if period == 0 {
            return 0;
        }

        let third = period / 3;
        let phase = now.as_micros() % period;
        if phase < third {
            progress8_round(phase, third)
        } else if phase < third * 2 {
            255 - progress8_round(phase - third, third)
        } else {
            0
        }
    }
}

impl Pattern for BreathePattern {
    fn compute(&self, now: Instant, frame: &mut [u16]) {
        let level = cie_lookup(self.envelope(now));
        frame.fill(level);
    }
}
