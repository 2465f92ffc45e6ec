//! Virtual time base that survives deep sleep.
//!
//! The hardware counter stops while the MCU sleeps, so the clock keeps a
//! separate sleep accumulator that the scheduler advances by the known
//! sleep quantum after every wake-up:
//!
//! ```text
//! now = (raw - epoch) / ticks_per_unit + slept
//! ```

use embassy_time::{Duration, Instant};

use crate::platform::TickCounter;

/// Resolution of the virtual clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeUnit {
    /// Button driven boards count milliseconds
    Millis,
    /// Autonomous boards count microseconds
    Micros,
}

impl TimeUnit {
    const fn instant(self, units: u64) -> Instant {
        match self {
            Self::Millis => Instant::from_millis(units),
            Self::Micros => Instant::from_micros(units),
        }
    }
}

/// Configuration for the virtual clock
#[derive(Debug, Clone, Copy)]
pub struct ClockConfig {
    /// Raw counter ticks per clock unit (e.g. core MHz for microseconds)
    pub ticks_per_unit: u32,
    /// Unit the raw counter is divided down to
    pub unit: TimeUnit,
}

/// Monotonic clock derived from a free-running counter.
#[derive(Debug)]
pub struct VirtualClock<C: TickCounter> {
    counter: C,
    ticks_per_unit: u64,
    unit: TimeUnit,
    /// Raw counter value at the last epoch reset
    epoch: u64,
    /// Sleep time accumulated since the last epoch reset
    slept: Duration,
}

impl<C: TickCounter> VirtualClock<C> {
    /// Create a clock whose epoch starts now.
    pub fn new(counter: C, config: ClockConfig) -> Self {
        let epoch = counter.ticks();
        Self {
            counter,
            ticks_per_unit: u64::from(config.ticks_per_unit.max(1)),
            unit: config.unit,
            epoch,
            slept: Duration::from_ticks(0),
        }
    }

    /// Restart virtual time from zero.
    ///
    /// Clears the sleep accumulator as well.
    pub fn reset_epoch(&mut self) {
        self.epoch = self.counter.ticks();
        self.slept = Duration::from_ticks(0);
    }

    /// Elapsed virtual time since the last epoch reset.
    pub fn now(&self) -> Instant {
        // Counter wraparound is not handled
        let awake = self.counter.ticks().wrapping_sub(self.epoch) / self.ticks_per_unit;
        self.unit.instant(awake) + self.slept
    }

    /// Account for a sleep interval during which the counter was halted.
    ///
    /// Call exactly once per wake-up with the real sleep duration.
    pub fn advance_after_sleep(&mut self, duration: Duration) {
        self.slept += duration;
    }

    /// Total sleep time credited since the last epoch reset.
    pub const fn slept(&self) -> Duration {
        self.slept
    }

    /// Resolution of this clock
    pub const fn unit(&self) -> TimeUnit {
        self.unit
    }
}
