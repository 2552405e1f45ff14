//! Wall-clock frame pacing.
//!
//! The outer loop asks how many emulated frames are due since its last
//! iteration. At least one frame always runs, and catch-up is clamped so
//! a slow host trades visual smoothness for bounded lag instead of
//! falling behind without limit.

use crate::machine::FRAME_RATE;

/// Microseconds per emulated frame.
const FRAME_MICROS: u64 = 1_000_000 / FRAME_RATE as u64;

/// Default bound on catch-up frames per pacer tick.
pub const DEFAULT_MAX_FRAMESKIP: u32 = 8;

/// Converts elapsed wall-clock time into a bounded frame count.
#[derive(Debug)]
pub struct FramePacer {
    max_frameskip: u32,
    last_micros: u64,
}

impl FramePacer {
    /// Create a pacer. `max_frameskip` is the CPU work cap per tick; it
    /// is clamped to at least 1 so forward progress is always allowed.
    #[must_use]
    pub const fn new(max_frameskip: u32, now_micros: u64) -> Self {
        Self {
            max_frameskip: if max_frameskip == 0 { 1 } else { max_frameskip },
            last_micros: now_micros,
        }
    }

    /// Frames to run for the time elapsed since the previous call.
    pub const fn frames_due(&mut self, now_micros: u64) -> u32 {
        let elapsed = now_micros.saturating_sub(self.last_micros);
        self.last_micros = now_micros;

        let frames = (elapsed / FRAME_MICROS) as u32;
        if frames < 1 {
            1
        } else if frames > self.max_frameskip {
            self.max_frameskip
        } else {
            frames
        }
    }
}
