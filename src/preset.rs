//! Board presets
//!
//! The badge shipped in several near-identical variants that differ in
//! channel count, timer prescale, clock resolution and whether they deep
//! sleep. Each variant is captured as a constant here; firmware picks one.
//!
//! Pin ids are encoded as `port << 4 | pin` (port A = 0, C = 2, D = 3).

use embassy_time::Duration;
use heapless::Vec;

use crate::{
    MAX_PATTERNS,
    clock::{ClockConfig, TimeUnit},
    mode_selector::ButtonConfig,
    pattern::{BeatConfig, BreatheConfig, PatternId, PatternParams, PatternSlot},
    platform::{Level, PinId, Pull},
    pulse::{Polarity, PulseConfig},
    scheduler::{ButtonPin, SchedulerConfig},
};

/// Everything needed to bring up one board variant
#[derive(Debug, Clone, Copy)]
pub struct BoardPreset {
    pub clock: ClockConfig,
    pub scheduler: SchedulerConfig,
    pub patterns: PatternParams,
    /// Patterns the mode button cycles through, in order
    pub modes: &'static [PatternId],
}

impl BoardPreset {
    /// Build the pattern list for the scheduler
    pub fn pattern_slots(&self) -> Vec<PatternSlot, MAX_PATTERNS> {
        self.modes
            .iter()
            .take(MAX_PATTERNS)
            .map(|id| id.to_slot(&self.patterns))
            .collect()
    }

    /// Number of driven channels
    pub const fn channel_count(&self) -> usize {
        self.scheduler.pwm_pins.len()
    }
}

/// Core clock of the reference MCU
const CORE_CLOCK_HZ: u32 = 48_000_000;

/// Timer reload value; one curve step per timer tick
const PULSE_PERIOD: u16 = 1024;

/// Status polls allowed per pulse, well above one `period * (prescale + 1)` cycle
const POLL_BUDGET: u32 = 50_000;

// Timer 1 channel outputs
const PIN_PD2: PinId = 0x32;
const PIN_PA1: PinId = 0x01;
const PIN_PC3: PinId = 0x23;
const PIN_PC1: PinId = 0x21;

const THREE_CHANNEL_PINS: [PinId; 3] = [PIN_PD2, PIN_PA1, PIN_PC3];

/// Channels of [`BUTTON_BADGE`]
pub const BUTTON_BADGE_CHANNELS: usize = 3;

const BUTTON_BADGE_PERIODS: [Duration; BUTTON_BADGE_CHANNELS] = [
    Duration::from_millis(500),
    Duration::from_millis(505),
    Duration::from_millis(510),
];

const BUTTON_BADGE_MODES: [PatternId; 2] = [PatternId::Beat, PatternId::Breathe];

/// Button driven badge: millisecond clock, three fast heartbeats, and a
/// breathing mode one press away. The timer runs between pulses, so the
/// "sleep" is a plain delay.
pub const BUTTON_BADGE: BoardPreset = BoardPreset {
    clock: ClockConfig {
        ticks_per_unit: CORE_CLOCK_HZ / 1_000,
        unit: TimeUnit::Millis,
    },
    scheduler: SchedulerConfig {
        pulse: PulseConfig {
            period: PULSE_PERIOD,
            prescale: 6,
            polarity: Polarity::ActiveLow,
            poll_budget: POLL_BUDGET,
        },
        sleep_duration: Duration::from_micros(13_333),
        pwm_pins: &THREE_CHANNEL_PINS,
        button: Some(ButtonPin {
            pin: PIN_PC1,
            pull: Pull::Up,
            config: ButtonConfig {
                pressed: Level::Low,
                debounce: Duration::from_millis(30),
            },
        }),
    },
    patterns: PatternParams {
        beat: BeatConfig {
            periods: &BUTTON_BADGE_PERIODS,
            // An eighth of the period, split over both ends
            dead_zone: Duration::from_millis(500 / 8 / 2),
            phase_offset: Duration::from_millis(0),
        },
        breathe: BreatheConfig {
            period: Duration::from_millis(6_000),
        },
    },
    modes: &BUTTON_BADGE_MODES,
};

/// Channels of [`AUTONOMOUS_BADGE`]
pub const AUTONOMOUS_BADGE_CHANNELS: usize = 3;

// 50.6, 50.3 and 50.0 beats per minute
const AUTONOMOUS_BADGE_PERIODS: [Duration; AUTONOMOUS_BADGE_CHANNELS] = [
    Duration::from_micros(1_185_771),
    Duration::from_micros(1_192_843),
    Duration::from_micros(1_200_000),
];

const AUTONOMOUS_BADGE_MODES: [PatternId; 1] = [PatternId::Beat];

/// Autonomous badge: microsecond clock, slow drifting heartbeats and a
/// deep sleep between pulses. The sleep quantum is the measured period of
/// the auto-wakeup timer.
pub const AUTONOMOUS_BADGE: BoardPreset = BoardPreset {
    clock: ClockConfig {
        ticks_per_unit: CORE_CLOCK_HZ / 1_000_000,
        unit: TimeUnit::Micros,
    },
    scheduler: SchedulerConfig {
        pulse: PulseConfig {
            period: PULSE_PERIOD,
            prescale: 0,
            polarity: Polarity::ActiveLow,
            poll_budget: POLL_BUDGET,
        },
        sleep_duration: Duration::from_micros(16_000),
        pwm_pins: &THREE_CHANNEL_PINS,
        button: None,
    },
    patterns: PatternParams {
        beat: BeatConfig {
            periods: &AUTONOMOUS_BADGE_PERIODS,
            dead_zone: Duration::from_micros(74_000),
            phase_offset: Duration::from_millis(0),
        },
        breathe: BreatheConfig {
            period: Duration::from_millis(8_000),
        },
    },
    modes: &AUTONOMOUS_BADGE_MODES,
};
