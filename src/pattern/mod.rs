//! Pattern system with compile-time known pattern variants
//!
//! All patterns are stored in an enum to avoid heap allocations.
//! Each pattern implements the `Pattern` trait and is a pure function of
//! virtual time: no phase is carried between frames.

mod beat;
mod breathe;

use embassy_time::Instant;

pub use beat::{BeatConfig, BeatPattern};
pub use breathe::{BreatheConfig, BreathePattern};

const PATTERN_NAME_BEAT: &str = "beat";
const PATTERN_NAME_BREATHE: &str = "breathe";

const PATTERN_ID_BEAT: u8 = 0;
const PATTERN_ID_BREATHE: u8 = 1;

pub trait Pattern {
    /// Compute the duty of every channel at `now`
    ///
    /// Values are in curve units: `0` is dark, [`CIE_MAX`](crate::cie::CIE_MAX)
    /// is brightest. Hardware polarity is the pulse driver's concern.
    fn compute(&self, now: Instant, frame: &mut [u16]);
}

/// Parameters needed to build any pattern from its id
#[derive(Debug, Clone, Copy)]
pub struct PatternParams {
    pub beat: BeatConfig,
    pub breathe: BreatheConfig,
}

/// Pattern slot - enum containing all possible patterns
#[derive(Debug, Clone)]
pub enum PatternSlot {
    /// Independent per-channel heartbeat pulses
    Beat(BeatPattern),
    /// Shared triangular breathing fade
    Breathe(BreathePattern),
}

/// Known pattern ids that can be requested.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum PatternId {
    Beat = PATTERN_ID_BEAT,
    Breathe = PATTERN_ID_BREATHE,
}

impl PatternId {
    pub fn from_raw(value: u8) -> Option<Self> {
        Some(match value {
            PATTERN_ID_BEAT => Self::Beat,
            PATTERN_ID_BREATHE => Self::Breathe,
            _ => return None,
        })
    }

    pub fn to_slot(self, params: &PatternParams) -> PatternSlot {
        match self {
            Self::Beat => PatternSlot::Beat(BeatPattern::from_config(&params.beat)),
            Self::Breathe => PatternSlot::Breathe(BreathePattern::from_config(&params.breathe)),
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Beat => PATTERN_NAME_BEAT,
            Self::Breathe => PATTERN_NAME_BREATHE,
        }
    }

    pub fn parse_from_str(s: &str) -> Option<Self> {
        match s {
            PATTERN_NAME_BEAT => Some(Self::Beat),
            PATTERN_NAME_BREATHE => Some(Self::Breathe),
            _ => None,
        }
    }
}

impl PatternSlot {
    /// Compute the current frame
    pub fn compute(&self, now: Instant, frame: &mut [u16]) {
        match self {
            Self::Beat(pattern) => pattern.compute(now, frame),
            Self::Breathe(pattern) => pattern.compute(now, frame),
        }
    }

    /// Get the pattern ID for external observation
    pub fn id(&self) -> PatternId {
        match self {
            Self::Beat(_) => PatternId::Beat,
            Self::Breathe(_) => PatternId::Breathe,
        }
    }
}

impl From<BeatPattern> for PatternSlot {
    fn from(pattern: BeatPattern) -> Self {
        Self::Beat(pattern)
    }
}

impl From<BreathePattern> for PatternSlot {
    fn from(pattern: BreathePattern) -> Self {
        Self::Breathe(pattern)
    }
}
