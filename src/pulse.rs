//! One-shot pulse driver
//!
//! Wraps a [`PulseTimer`] running in one-pulse mode. A scheduler cycle
//! programs every channel's compare value, fires exactly one pulse and
//! polls until the timer halts again.
//!
//! Two hardware quirks live here and nowhere else:
//! - a compare value equal to the reload value produces a pulse that never
//!   ends, so compare values are clamped to `period - 1`;
//! - active-low wiring inverts the duty (`period - duty`).

use core::fmt;

#[cfg(feature = "esp32-log")]
use esp_println::println;

use crate::{cie::CIE_STEPS, math8::rescale, platform::PulseTimer};

/// Output polarity of the LED wiring
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Polarity {
    /// LED lights while the channel output is high
    ActiveHigh,
    /// LED lights while the channel output is low
    ActiveLow,
}

/// Configuration for the pulse driver
#[derive(Debug, Clone, Copy)]
pub struct PulseConfig {
    /// Timer ticks per pulse; also the maximum duty
    pub period: u16,
    /// Timer clock prescaler
    pub prescale: u16,
    /// LED wiring
    pub polarity: Polarity,
    /// Status polls allowed before a pulse is declared stuck
    pub poll_budget: u32,
}

/// Errors reported by the pulse driver
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverError {
    /// Period too short to hold a compare value below it
    InvalidPeriod(u16),
    /// Channel index the timer does not have
    InvalidChannel(usize),
    /// Duty or trigger requested before `configure`
    NotConfigured,
    /// Pulse did not complete within the poll budget
    Timeout { polls: u32 },
}

impl fmt::Display for DriverError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidPeriod(period) => write!(f, "invalid pulse period {period}"),
            Self::InvalidChannel(channel) => write!(f, "invalid channel {channel}"),
            Self::NotConfigured => f.write_str("pulse timer not configured"),
            Self::Timeout { polls } => write!(f, "pulse still running after {polls} polls"),
        }
    }
}

/// Driver for a one-shot pulse timer
#[derive(Debug)]
pub struct PulseDriver<T: PulseTimer> {
    timer: T,
    /// Zero until configured
    period: u16,
    polarity: Polarity,
    poll_budget: u32,
}

impl<T: PulseTimer> PulseDriver<T> {
    /// Wrap a timer. Call [`configure`](Self::configure) before use.
    pub fn new(timer: T, config: &PulseConfig) -> Self {
        Self {
            timer,
            period: 0,
            polarity: config.polarity,
            poll_budget: config.poll_budget.max(1),
        }
    }

    /// Set up the timebase: one pulse spans `period` timer ticks.
    ///
    /// Leaves every channel dark.
    pub fn configure(&mut self, period: u16, prescale: u16) -> Result<(), DriverError> {
        if period < 2 {
            return Err(DriverError::InvalidPeriod(period));
        }
        self.timer.configure(period, prescale);
        self.period = period;
        self.force_idle_all();
        Ok(())
    }

    /// Largest duty value, equal to the configured period
    pub const fn max_duty(&self) -> u16 {
        self.period
    }

    pub const fn is_configured(&self) -> bool {
        self.period != 0
    }

    pub fn channel_count(&self) -> usize {
        self.timer.channel_count()
    }

    /// Program the duty of one channel, in timer ticks
    ///
    /// Takes effect on the next [`trigger`](Self::trigger). Values at or
    /// above [`max_duty`](Self::max_duty) are clamped.
    pub fn set_channel_duty(&mut self, channel: usize, duty: u16) -> Result<(), DriverError> {
        if !self.is_configured() {
            return Err(DriverError::NotConfigured);
        }
        if channel >= self.timer.channel_count() {
            return Err(DriverError::InvalidChannel(channel));
        }
        let compare = self.compare_for(duty);
        self.timer.set_compare(channel, compare);
        Ok(())
    }

    /// Program all channels from a frame in curve units
    ///
    /// Curve values are rescaled onto the configured period, which is the
    /// identity for a period of [`CIE_STEPS`].
    pub fn write_frame(&mut self, frame: &[u16]) -> Result<(), DriverError> {
        for (channel, level) in frame.iter().enumerate() {
            let duty = rescale(*level, CIE_STEPS, self.period);
            self.set_channel_duty(channel, duty)?;
        }
        Ok(())
    }

    /// Fire a single pulse on all channels. Does not block.
    pub fn trigger(&mut self) -> Result<(), DriverError> {
        if !self.is_configured() {
            return Err(DriverError::NotConfigured);
        }
        self.timer.start();
        Ok(())
    }

    /// Busy-poll until the pulse has finished.
    ///
    /// Gives up after the configured poll budget, halting the timer.
    pub fn wait_complete(&mut self) -> Result<(), DriverError> {
        for _ in 0..self.poll_budget {
            if !self.timer.is_running() {
                return Ok(());
            }
        }

        self.timer.stop();
        #[cfg(feature = "esp32-log")]
        println!("[pulse] timeout after {} polls", self.poll_budget);
        Err(DriverError::Timeout {
            polls: self.poll_budget,
        })
    }

    /// Halt the timer and drive every channel to its off level
    pub fn force_idle_all(&mut self) {
        self.timer.stop();
        let off = self.compare_for(0);
        for channel in 0..self.timer.channel_count() {
            self.timer.set_compare(channel, off);
        }
    }

    /// Get a reference to the underlying timer
    pub const fn timer(&self) -> &T {
        &self.timer
    }

    /// Get a mutable reference to the underlying timer
    pub fn timer_mut(&mut self) -> &mut T {
        &mut self.timer
    }

    /// Compare register value for a duty, after polarity and clamping
    fn compare_for(&self, duty: u16) -> u16 {
        let duty = duty.min(self.period);
        let compare = match self.polarity {
            Polarity::ActiveHigh => duty,
            Polarity::ActiveLow => self.period - duty,
        };
        // A compare equal to the reload value never ends the pulse
        compare.min(self.period.saturating_sub(1))
    }
}
