//! Host-side stand-ins for the hardware collaborators.
//!
//! Used by the tests and the desktop preview to run the full scheduler
//! without a board.

use core::cell::Cell;

use critical_section::Mutex;
use heapless::Vec;

use crate::{
    MAX_CHANNELS,
    platform::{ButtonInput, Level, PinId, PinMux, PowerControl, Pull, PulseTimer, TickCounter},
    wake::WakeSignal,
};

/// Tick counter advanced by hand.
///
/// Pass it by reference to the clock so the test keeps control of it.
pub struct SimTickCounter {
    ticks: Mutex<Cell<u64>>,
}

impl SimTickCounter {
    pub const fn new() -> Self {
        Self {
            ticks: Mutex::new(Cell::new(0)),
        }
    }

    /// Move the counter forward
    pub fn advance(&self, ticks: u64) {
        critical_section::with(|cs| {
            let cell = self.ticks.borrow(cs);
            cell.set(cell.get().wrapping_add(ticks));
        });
    }

    pub fn set(&self, ticks: u64) {
        critical_section::with(|cs| self.ticks.borrow(cs).set(ticks));
    }
}

impl Default for SimTickCounter {
    fn default() -> Self {
        Self::new()
    }
}

impl TickCounter for SimTickCounter {
    fn ticks(&self) -> u64 {
        critical_section::with(|cs| self.ticks.borrow(cs).get())
    }
}

/// One-shot timer model
///
/// Every status poll advances the counter by `ticks_per_poll`; the pulse
/// ends once the counter reaches the period, unless the timer is stuck.
#[derive(Debug, Clone)]
pub struct SimPulseTimer {
    channels: usize,
    period: u16,
    prescale: u16,
    compare: [u16; MAX_CHANNELS],
    counter: u32,
    running: bool,
    ticks_per_poll: u32,
    stuck: bool,
    pulses: u32,
}

impl Default for SimPulseTimer {
    fn default() -> Self {
        Self::new(MAX_CHANNELS)
    }
}

impl SimPulseTimer {
    /// Create a timer with `channels` compare channels (at most [`MAX_CHANNELS`])
    pub fn new(channels: usize) -> Self {
        Self {
            channels: channels.min(MAX_CHANNELS),
            period: 0,
            prescale: 0,
            compare: [0; MAX_CHANNELS],
            counter: 0,
            running: false,
            ticks_per_poll: 64,
            stuck: false,
            pulses: 0,
        }
    }

    /// Counter ticks that elapse between two status polls
    #[must_use]
    pub fn with_ticks_per_poll(mut self, ticks: u32) -> Self {
        self.ticks_per_poll = ticks.max(1);
        self
    }

    /// Simulate a timer whose pulse never completes
    #[must_use]
    pub fn stuck(mut self) -> Self {
        self.stuck = true;
        self
    }

    pub const fn period(&self) -> u16 {
        self.period
    }

    pub const fn prescale(&self) -> u16 {
        self.prescale
    }

    /// Programmed compare value of a channel
    pub fn compare(&self, channel: usize) -> Option<u16> {
        self.compare[..self.channels].get(channel).copied()
    }

    pub const fn is_active(&self) -> bool {
        self.running
    }

    /// Pulses started since creation
    pub const fn pulse_count(&self) -> u32 {
        self.pulses
    }
}

impl PulseTimer for SimPulseTimer {
    fn channel_count(&self) -> usize {
        self.channels
    }

    fn configure(&mut self, period: u16, prescale: u16) {
        self.period = period;
        self.prescale = prescale;
        self.counter = 0;
        self.running = false;
    }

    fn set_compare(&mut self, channel: usize, value: u16) {
        if let Some(compare) = self.compare[..self.channels].get_mut(channel) {
            *compare = value;
        }
    }

    fn start(&mut self) {
        self.counter = 0;
        self.running = true;
        self.pulses += 1;
    }

    fn is_running(&mut self) -> bool {
        if self.running {
            self.counter = self.counter.saturating_add(self.ticks_per_poll);
            if !self.stuck && self.counter >= u32::from(self.period) {
                self.running = false;
            }
        }
        self.running
    }

    fn stop(&mut self) {
        self.running = false;
    }
}

/// Pin function recorded by [`SimPlatform`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PinMode {
    PwmOutput,
    Input(Pull),
}

/// Power and pin-mux model
///
/// The wake-up "interrupt" fires as soon as the low-power wait starts.
/// A hard reset panics, so tests can observe it.
pub struct SimPlatform {
    wake: WakeSignal,
    pins: Vec<(PinId, PinMode), 8>,
    inits: u32,
    sleeps: u32,
}

impl SimPlatform {
    pub const fn new() -> Self {
        Self {
            wake: WakeSignal::new(),
            pins: Vec::new(),
            inits: 0,
            sleeps: 0,
        }
    }

    /// Pins configured so far, in call order
    pub fn pins(&self) -> &[(PinId, PinMode)] {
        &self.pins
    }

    /// Calls to `system_init`
    pub const fn inits(&self) -> u32 {
        self.inits
    }

    /// Completed low-power waits
    pub const fn sleeps(&self) -> u32 {
        self.sleeps
    }
}

impl Default for SimPlatform {
    fn default() -> Self {
        Self::new()
    }
}

impl PowerControl for SimPlatform {
    fn system_init(&mut self) {
        self.inits += 1;
    }

    fn enter_low_power_wait(&mut self) {
        // Wake timer expires immediately
        self.wake.signal();
        self.wake.wait_with(|| {});
        self.sleeps += 1;
    }

    fn hard_reset(&mut self) -> ! {
        panic!("hard reset requested");
    }
}

impl PinMux for SimPlatform {
    fn configure_pin_as_pwm_output(&mut self, pin: PinId) {
        let _ = self.pins.push((pin, PinMode::PwmOutput));
    }

    fn configure_pin_as_input(&mut self, pin: PinId, pull: Pull) {
        let _ = self.pins.push((pin, PinMode::Input(pull)));
    }
}

/// Button line whose level the test sets directly
pub struct SimButtonLine {
    level: Mutex<Cell<Level>>,
}

impl SimButtonLine {
    /// Create a released line (pulled up)
    pub const fn new() -> Self {
        Self {
            level: Mutex::new(Cell::new(Level::High)),
        }
    }

    pub fn set(&self, level: Level) {
        critical_section::with(|cs| self.level.borrow(cs).set(level));
    }

    /// Button reading this line
    pub const fn button(&self) -> SimButton<'_> {
        SimButton { line: self }
    }
}

impl Default for SimButtonLine {
    fn default() -> Self {
        Self::new()
    }
}

/// Button reading a [`SimButtonLine`]
#[derive(Clone, Copy)]
pub struct SimButton<'a> {
    line: &'a SimButtonLine,
}

impl ButtonInput for SimButton<'_> {
    fn read_level(&mut self) -> Level {
        critical_section::with(|cs| self.line.level.borrow(cs).get())
    }
}
