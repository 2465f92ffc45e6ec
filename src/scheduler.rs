//! Duty cycle scheduler
//!
//! The main loop of the badge. After a one-time `Init` it alternates
//! between `Running` (compute a frame, fire one pulse, wait for it) and
//! `Sleeping` (low-power wait, then credit the sleep to the virtual clock)
//! until power is removed.

use core::fmt;

use embassy_time::{Duration, Instant};
use heapless::Vec;

#[cfg(feature = "esp32-log")]
use esp_println::println;

use crate::{
    MAX_PATTERNS,
    clock::VirtualClock,
    mode_selector::{ButtonConfig, ModeSelector},
    pattern::PatternSlot,
    platform::{ButtonInput, NoButton, PinId, PinMux, PowerControl, Pull, PulseTimer, TickCounter},
    pulse::{DriverError, PulseConfig, PulseDriver},
};

/// Mode button wiring
#[derive(Debug, Clone, Copy)]
pub struct ButtonPin {
    pub pin: PinId,
    pub pull: Pull,
    pub config: ButtonConfig,
}

/// Configuration for the scheduler
#[derive(Debug, Clone, Copy)]
pub struct SchedulerConfig {
    /// Timer setup applied during `Init`
    pub pulse: PulseConfig,
    /// Real duration of one low-power wait
    pub sleep_duration: Duration,
    /// Pins routed to the timer channels, in channel order
    pub pwm_pins: &'static [PinId],
    /// Mode button, if the board has one
    pub button: Option<ButtonPin>,
}

/// Scheduler state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    Init,
    Running,
    Sleeping,
}

/// Unrecoverable scheduler faults. Each one ends in a hard reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fault {
    /// Pulse timer rejected its configuration
    Config(DriverError),
    /// Pulse cycle failed, usually a timeout
    Pulse(DriverError),
    /// Frame is wider than the timer
    TooManyChannels { requested: usize, available: usize },
    /// No pattern to run
    NoPatterns,
    /// Button attached without a pin in the configuration
    ButtonPinMissing,
}

impl fmt::Display for Fault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(err) => write!(f, "configuration failed: {err}"),
            Self::Pulse(err) => write!(f, "pulse failed: {err}"),
            Self::TooManyChannels {
                requested,
                available,
            } => write!(f, "{requested} channels requested, timer has {available}"),
            Self::NoPatterns => f.write_str("no patterns configured"),
            Self::ButtonPinMissing => {
                f.write_str("button attached but no button pin configured")
            }
        }
    }
}

/// Single-threaded control loop owning all core state.
///
/// `N` is the number of driven channels.
pub struct Scheduler<T, C, P, B, const N: usize>
where
    T: PulseTimer,
    C: TickCounter,
    P: PowerControl + PinMux,
    B: ButtonInput,
{
    // Hardware
    driver: PulseDriver<T>,
    clock: VirtualClock<C>,
    platform: P,
    selector: Option<ModeSelector<B>>,

    // Configuration
    config: SchedulerConfig,
    patterns: Vec<PatternSlot, MAX_PATTERNS>,

    // Internal state
    state: SchedulerState,
    active: usize,
    frame: [u16; N],
    cycles: u64,
}

impl<T, C, P, const N: usize> Scheduler<T, C, P, NoButton, N>
where
    T: PulseTimer,
    C: TickCounter,
    P: PowerControl + PinMux,
{
    /// Create a scheduler without a mode button
    ///
    /// Patterns past [`MAX_PATTERNS`] are dropped. The first pattern is
    /// active after `Init`.
    pub fn new(
        driver: PulseDriver<T>,
        clock: VirtualClock<C>,
        platform: P,
        patterns: impl IntoIterator<Item = PatternSlot>,
        config: &SchedulerConfig,
    ) -> Self {
        let mut slots = Vec::new();
        for pattern in patterns.into_iter().take(MAX_PATTERNS) {
            let _ = slots.push(pattern);
        }
        Self {
            driver,
            clock,
            platform,
            selector: None,
            config: *config,
            patterns: slots,
            state: SchedulerState::Init,
            active: 0,
            frame: [0; N],
            cycles: 0,
        }
    }

    /// Attach a mode button cycling through the configured patterns
    ///
    /// `config.button` must describe its pin, which `Init` sets up as an
    /// input; otherwise `Init` fails with [`Fault::ButtonPinMissing`].
    pub fn with_button<B: ButtonInput>(self, button: B) -> Scheduler<T, C, P, B, N> {
        let button_config = self
            .config
            .button
            .map(|pin| pin.config)
            .unwrap_or_default();
        let selector = ModeSelector::new(button, self.patterns.len(), &button_config);
        Scheduler {
            driver: self.driver,
            clock: self.clock,
            platform: self.platform,
            selector: Some(selector),
            config: self.config,
            patterns: self.patterns,
            state: self.state,
            active: self.active,
            frame: self.frame,
            cycles: self.cycles,
        }
    }
}

impl<T, C, P, B, const N: usize> Scheduler<T, C, P, B, N>
where
    T: PulseTimer,
    C: TickCounter,
    P: PowerControl + PinMux,
    B: ButtonInput,
{
    /// Run the loop forever. Any fault ends in a hard reset.
    pub fn run(mut self) -> ! {
        loop {
            if let Err(fault) = self.step() {
                self.fail(fault);
            }
        }
    }

    /// Execute the current state and move to the next one.
    pub fn step(&mut self) -> Result<SchedulerState, Fault> {
        self.state = match self.state {
            SchedulerState::Init => self.init()?,
            SchedulerState::Running => self.pulse()?,
            SchedulerState::Sleeping => self.sleep(),
        };
        Ok(self.state)
    }

    /// Run one full `Running` + `Sleeping` cycle, initializing first if needed.
    pub fn cycle(&mut self) -> Result<(), Fault> {
        if self.state == SchedulerState::Init {
            self.step()?;
        }
        if self.state == SchedulerState::Running {
            self.step()?;
        }
        self.step()?;
        Ok(())
    }

    /// Configure hardware and start virtual time
    fn init(&mut self) -> Result<SchedulerState, Fault> {
        self.platform.system_init();
        for pin in self.config.pwm_pins {
            self.platform.configure_pin_as_pwm_output(*pin);
        }
        match self.config.button {
            Some(button) => self.platform.configure_pin_as_input(button.pin, button.pull),
            None if self.selector.is_some() => return Err(Fault::ButtonPinMissing),
            None => {}
        }

        if self.patterns.is_empty() {
            return Err(Fault::NoPatterns);
        }
        let available = self.driver.channel_count();
        if N > available {
            return Err(Fault::TooManyChannels {
                requested: N,
                available,
            });
        }

        let pulse = self.config.pulse;
        self.driver
            .configure(pulse.period, pulse.prescale)
            .map_err(Fault::Config)?;

        self.clock.reset_epoch();
        if let Some(selector) = self.selector.as_mut() {
            selector.rebase(self.clock.now());
        }

        #[cfg(feature = "esp32-log")]
        println!(
            "[scheduler] {} channels, period {}, prescale {}, pattern {}",
            N,
            pulse.period,
            pulse.prescale,
            self.patterns[self.active].id().as_str()
        );

        Ok(SchedulerState::Running)
    }

    /// Compute the next frame and drive one pulse
    fn pulse(&mut self) -> Result<SchedulerState, Fault> {
        let selected = self
            .selector
            .as_mut()
            .and_then(|selector| selector.poll(self.clock.now()));
        if let Some(index) = selected {
            self.switch_pattern(index);
        }

        let now = self.clock.now();
        self.patterns[self.active].compute(now, &mut self.frame);

        // Whole frame is written before the trigger
        self.driver.write_frame(&self.frame).map_err(Fault::Pulse)?;
        self.driver.trigger().map_err(Fault::Pulse)?;
        self.driver.wait_complete().map_err(Fault::Pulse)?;

        Ok(SchedulerState::Sleeping)
    }

    /// Low-power wait, then credit the sleep to virtual time
    fn sleep(&mut self) -> SchedulerState {
        self.platform.enter_low_power_wait();
        self.platform.system_init();
        self.clock.advance_after_sleep(self.config.sleep_duration);
        self.cycles += 1;
        SchedulerState::Running
    }

    /// Activate a pattern and restart its phase from zero
    fn switch_pattern(&mut self, index: usize) {
        self.active = index.min(self.patterns.len().saturating_sub(1));
        self.clock.reset_epoch();
        if let Some(selector) = self.selector.as_mut() {
            selector.rebase(self.clock.now());
        }

        #[cfg(feature = "esp32-log")]
        println!(
            "[scheduler] pattern {}",
            self.patterns[self.active].id().as_str()
        );
    }

    fn fail(&mut self, fault: Fault) -> ! {
        #[cfg(feature = "esp32-log")]
        println!("[scheduler] fatal: {}, resetting", fault);
        #[cfg(not(feature = "esp32-log"))]
        let _ = fault;

        self.driver.force_idle_all();
        self.platform.hard_reset()
    }

    /// Current virtual time
    pub fn now(&self) -> Instant {
        self.clock.now()
    }

    pub const fn state(&self) -> SchedulerState {
        self.state
    }

    /// Completed `Running` + `Sleeping` cycles
    pub const fn cycles(&self) -> u64 {
        self.cycles
    }

    /// Last frame handed to the driver, in curve units
    pub const fn frame(&self) -> &[u16; N] {
        &self.frame
    }

    /// Currently active pattern
    pub fn active_pattern(&self) -> Option<&PatternSlot> {
        self.patterns.get(self.active)
    }

    pub const fn active_index(&self) -> usize {
        self.active
    }

    pub const fn clock(&self) -> &VirtualClock<C> {
        &self.clock
    }

    pub const fn driver(&self) -> &PulseDriver<T> {
        &self.driver
    }

    pub fn driver_mut(&mut self) -> &mut PulseDriver<T> {
        &mut self.driver
    }

    pub const fn platform(&self) -> &P {
        &self.platform
    }
}
