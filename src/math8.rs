//! Integer helpers shared by the pattern generators.
//!
//! Everything here works on plain `u64` microsecond spans so patterns keep
//! sub-millisecond resolution on the microsecond clock.

/// Calculate progress (0-255) of `elapsed` through `span`
#[allow(clippy::cast_possible_truncation)]
#[inline]
pub const fn progress8(elapsed: u64, span: u64) -> u8 {
    if span == 0 {
        return 0;
    }
    if elapsed >= span {
        return 255;
    }

    ((elapsed as u128 * 255) / span as u128) as u8
}

/// Like [`progress8`], but rounds to the nearest step
///
/// An instant landing a fraction of a unit before the end of the span
/// (e.g. `period / 3` computed in milliseconds against a microsecond span)
/// still reports the peak.
#[allow(clippy::cast_possible_truncation)]
#[inline]
pub const fn progress8_round(elapsed: u64, span: u64) -> u8 {
    if span == 0 {
        return 0;
    }
    if elapsed >= span {
        return 255;
    }

    let scaled = (elapsed as u128 * 255 + span as u128 / 2) / span as u128;
    if scaled > 255 { 255 } else { scaled as u8 }
}

/// Fold a phase into the first half of its period
///
/// Phases past the midpoint are mirrored back (`period - phase`), which
/// makes any ramp built on the result symmetric around `period / 2`.
#[inline]
pub const fn fold_half(phase: u64, period: u64) -> u64 {
    if phase * 2 > period {
        period - phase
    } else {
        phase
    }
}

/// Rescale a value from a `0..from_steps` range onto `0..to_steps`
///
/// Saturates at `u16::MAX` when an out-of-range value scales past it.
#[allow(clippy::cast_possible_truncation)]
#[inline]
pub const fn rescale(value: u16, from_steps: u16, to_steps: u16) -> u16 {
    if from_steps == to_steps || from_steps == 0 {
        return value;
    }
    let scaled = value as u32 * to_steps as u32 / from_steps as u32;
    if scaled > u16::MAX as u32 {
        u16::MAX
    } else {
        scaled as u16
    }
}
