//! Heartbeat pulses
//!
//! Every channel pulses on its own period. A short dark gap (the dead zone)
//! opens each cycle, then brightness ramps up to a peak at half the period
//! and back down symmetrically.
//!
//! Periods are meant to be close but not equal, e.g. `60 s / 50.6` and
//! `60 s / 50.3`, so the channels slowly drift in and out of phase.
//!
//! Ramp progress truncates toward zero, so duty values match the badge
//! firmware step for step. Only the breathe envelope rounds.

use embassy_time::{Duration, Instant};
use heapless::Vec;

use super::Pattern;
use crate::{
    MAX_CHANNELS,
    cie::cie_lookup,
    math8::{fold_half, progress8},
};

/// Configuration for the beat pattern
#[derive(Debug, Clone, Copy)]
pub struct BeatConfig {
    /// Pulse period per channel, in channel order
    pub periods: &'static [Duration],
    /// Dark gap at the start (and end) of every period
    pub dead_zone: Duration,
    /// Shift applied to the time base before computing phases
    pub phase_offset: Duration,
}

/// Independent per-channel pulses
#[derive(Debug, Clone)]
pub struct BeatPattern {
    periods: Vec<Duration, MAX_CHANNELS>,
    dead_zone: Duration,
    phase_offset: Duration,
}

impl BeatPattern {
    /// Create a beat pattern
    ///
    /// Periods past [`MAX_CHANNELS`] are ignored.
    pub fn new(periods: &[Duration], dead_zone: Duration) -> Self {
        let mut stored = Vec::new();
        for period in periods.iter().take(MAX_CHANNELS) {
            let _ = stored.push(*period);
        }
        Self {
            periods: stored,
            dead_zone,
            phase_offset: Duration::from_ticks(0),
        }
    }

    pub fn from_config(config: &BeatConfig) -> Self {
        Self::new(config.periods, config.dead_zone).with_phase_offset(config.phase_offset)
    }

    /// Shift every channel's phase forward by `offset`
    #[must_use]
    pub fn with_phase_offset(mut self, offset: Duration) -> Self {
        self.phase_offset = offset;
        self
    }

    pub fn periods(&self) -> &[Duration] {
        &self.periods
    }

    pub const fn dead_zone(&self) -> Duration {
        self.dead_zone
    }

    /// Duty for a single channel at `now_us`
    fn level(&self, now_us: u64, period: Duration) -> u16 {
        let period_us = period.as_micros();
        if period_us == 0 {
            return 0;
        }

        let half = period_us / 2;
        let dead_zone = self.dead_zone.as_micros();
        let phase = fold_half(now_us % period_us, period_us);
        if phase < dead_zone || half <= dead_zone {
            return 0;
        }

        cie_lookup(progress8(phase - dead_zone, half - dead_zone))
    }
}

impl Pattern for BeatPattern {
    fn compute(&self, now: Instant, frame: &mut [u16]) {
        let now_us = now.as_micros() + self.phase_offset.as_micros();
        for (index, duty) in frame.iter_mut().enumerate() {
            // Channels without a period stay dark
            *duty = self
                .periods
                .get(index)
                .map_or(0, |period| self.level(now_us, *period));
        }
    }
}
