#![no_std]

pub mod cie;
pub mod clock;
pub mod math8;
pub mod mode_selector;
pub mod pattern;
pub mod platform;
pub mod preset;
pub mod pulse;
pub mod scheduler;
#[cfg(feature = "sim")]
pub mod sim;
pub mod wake;

pub use cie::{CIE_MAX, CIE_STEPS, cie_lookup};
pub use clock::{ClockConfig, TimeUnit, VirtualClock};
pub use mode_selector::{ButtonConfig, ModeSelector};
pub use pattern::{
    BeatConfig, BeatPattern, BreatheConfig, BreathePattern, Pattern, PatternId, PatternParams,
    PatternSlot,
};
pub use platform::{
    ButtonInput, Level, NoButton, PinId, PinMux, PowerControl, Pull, PulseTimer, TickCounter,
};
pub use pulse::{DriverError, Polarity, PulseConfig, PulseDriver};
pub use scheduler::{ButtonPin, Fault, Scheduler, SchedulerConfig, SchedulerState};
pub use wake::WakeSignal;

pub use embassy_time::{Duration, Instant};

/// Compare channels of the largest supported pulse timer
pub const MAX_CHANNELS: usize = 4;

/// Patterns the scheduler can hold
pub const MAX_PATTERNS: usize = 4;
