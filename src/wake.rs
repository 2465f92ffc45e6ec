//! Wake-up flag shared between the wake interrupt and the main loop.
//!
//! The interrupt handler only raises the flag; all work happens after
//! the low-power wait returns, on the main loop.

use core::cell::Cell;

use critical_section::Mutex;

/// Interrupt-safe one-bit wake-up signal.
///
/// Intended to live in a `static` next to the board's wake interrupt.
pub struct WakeSignal {
    pending: Mutex<Cell<bool>>,
}

impl WakeSignal {
    /// Create a new, cleared signal.
    pub const fn new() -> Self {
        Self {
            pending: Mutex::new(Cell::new(false)),
        }
    }

    /// Raise the signal. Safe to call from an interrupt handler.
    pub fn signal(&self) {
        critical_section::with(|cs| self.pending.borrow(cs).set(true));
    }

    /// Consume the signal.
    ///
    /// Returns `true` if it was raised since the last call.
    pub fn take(&self) -> bool {
        critical_section::with(|cs| self.pending.borrow(cs).replace(false))
    }

    /// Check the signal without consuming it.
    pub fn is_pending(&self) -> bool {
        critical_section::with(|cs| self.pending.borrow(cs).get())
    }

    /// Spin until the signal is raised, then consume it.
    ///
    /// `idle` runs between checks, typically the core's wait-for-event
    /// instruction.
    pub fn wait_with(&self, mut idle: impl FnMut()) {
        while !self.take() {
            idle();
        }
    }
}

impl Default for WakeSignal {
    fn default() -> Self {
        Self::new()
    }
}
