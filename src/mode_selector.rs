//! Debounced mode button
//!
//! A two-state edge detector: a raw level must hold for the debounce
//! window before it becomes the stable level. Each stable transition into
//! the pressed level advances the selected mode index.

use embassy_time::{Duration, Instant};

use crate::platform::{ButtonInput, Level};

/// Default debounce window
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(30);

/// Configuration for the mode button
#[derive(Debug, Clone, Copy)]
pub struct ButtonConfig {
    /// Level the pin reads while the button is held
    pub pressed: Level,
    /// Time a level must hold before it counts
    pub debounce: Duration,
}

impl Default for ButtonConfig {
    fn default() -> Self {
        Self {
            pressed: Level::Low,
            debounce: DEFAULT_DEBOUNCE,
        }
    }
}

/// Cycles through `mode_count` modes on debounced button presses
#[derive(Debug)]
pub struct ModeSelector<B: ButtonInput> {
    button: B,
    pressed: Level,
    debounce: Duration,
    /// Debounced level
    stable: Level,
    /// Last raw level seen
    candidate: Level,
    /// When `candidate` was first seen
    since: Instant,
    current: usize,
    mode_count: usize,
}

impl<B: ButtonInput> ModeSelector<B> {
    /// Create a selector starting at mode 0.
    ///
    /// The button's current level is taken as stable, so a button held
    /// during boot does not switch modes.
    pub fn new(mut button: B, mode_count: usize, config: &ButtonConfig) -> Self {
        let level = button.read_level();
        Self {
            button,
            pressed: config.pressed,
            debounce: config.debounce,
            stable: level,
            candidate: level,
            since: Instant::from_ticks(0),
            current: 0,
            mode_count: mode_count.max(1),
        }
    }

    /// Sample the button.
    ///
    /// Returns the new mode index when a debounced press was detected.
    pub fn poll(&mut self, now: Instant) -> Option<usize> {
        let level = self.button.read_level();
        if level != self.candidate {
            self.candidate = level;
            self.since = now;
            return None;
        }
        if self.candidate == self.stable {
            return None;
        }
        if now.saturating_duration_since(self.since) < self.debounce {
            return None;
        }

        self.stable = self.candidate;
        if self.stable != self.pressed {
            return None;
        }
        self.current = (self.current + 1) % self.mode_count;
        Some(self.current)
    }

    /// Re-anchor debounce timing after the clock epoch was reset
    pub fn rebase(&mut self, now: Instant) {
        self.since = now;
    }

    /// Currently selected mode index
    pub const fn current(&self) -> usize {
        self.current
    }

    /// Debounced button level
    pub const fn stable_level(&self) -> Level {
        self.stable
    }
}
