//! Hardware collaborator interfaces
//!
//! The core never touches registers. Boards implement these traits and
//! hand the implementations to the [`Scheduler`](crate::Scheduler).

/// Identifier of a physical pin, board specific.
pub type PinId = u8;

/// Logic level read from an input pin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Low,
    High,
}

/// Input bias applied to a pin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pull {
    None,
    Up,
    Down,
}

/// Free-running hardware tick counter backing the [`VirtualClock`](crate::VirtualClock).
///
/// The counter is expected to halt while the MCU is in deep sleep.
pub trait TickCounter {
    /// Current raw counter value
    fn ticks(&self) -> u64;
}

impl<T: TickCounter + ?Sized> TickCounter for &T {
    fn ticks(&self) -> u64 {
        (**self).ticks()
    }
}

/// One-shot pulse-width timer
///
/// Models a timer in one-pulse mode: after [`start`](PulseTimer::start) it
/// counts up to the configured period once, driving each channel active
/// while the counter is below that channel's compare value, then halts.
pub trait PulseTimer {
    /// Number of compare channels the timer exposes
    fn channel_count(&self) -> usize;

    /// Program the timebase (auto-reload and prescaler)
    fn configure(&mut self, period: u16, prescale: u16);

    /// Write the compare register of one channel
    fn set_compare(&mut self, channel: usize, value: u16);

    /// Start a single pulse cycle
    fn start(&mut self);

    /// Returns `true` while the pulse cycle is still counting
    fn is_running(&mut self) -> bool;

    /// Halt the counter immediately
    fn stop(&mut self);
}

/// Clock tree and low-power control
pub trait PowerControl {
    /// Restore the clock tree, also after waking from deep sleep
    fn system_init(&mut self);

    /// Block until the wake-up timer fires
    fn enter_low_power_wait(&mut self);

    /// Reset the MCU. Used when the core hits an unrecoverable fault.
    fn hard_reset(&mut self) -> !;
}

/// Pin multiplexer configuration
pub trait PinMux {
    /// Route a pin to its timer channel as a push-pull output
    fn configure_pin_as_pwm_output(&mut self, pin: PinId);

    /// Configure a pin as a digital input
    fn configure_pin_as_input(&mut self, pin: PinId, pull: Pull);
}

/// Mode button
pub trait ButtonInput {
    /// Current raw (undebounced) level
    fn read_level(&mut self) -> Level;
}

/// Button stand-in for boards without a mode button.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoButton;

impl ButtonInput for NoButton {
    fn read_level(&mut self) -> Level {
        Level::High
    }
}
