//! Abstract button input.
//!
//! The machine sees eight logical buttons as a bitmask, sampled once per
//! outer-loop cycle. Edge detection is derived by the sampler so sources
//! only have to report what is currently held.

/// One sample of the eight abstract buttons.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PadState {
    /// Buttons currently held, one bit per button.
    pub held: u8,
    /// Buttons that went down since the previous sample.
    pub pressed: u8,
}

impl PadState {
    pub const LEFT: u8 = 0x01;
    pub const UP: u8 = 0x02;
    pub const DOWN: u8 = 0x04;
    pub const RIGHT: u8 = 0x08;
    pub const ACT: u8 = 0x10;
    pub const ESC: u8 = 0x20;
    pub const LFT: u8 = 0x40;
    pub const RGT: u8 = 0x80;
    pub const ANY: u8 = 0xFF;

    /// Next sample from a fresh held mask, with edges against `self`.
    #[must_use]
    pub const fn advance(self, held: u8) -> Self {
        Self {
            held,
            pressed: (held ^ self.held) & held,
        }
    }

    #[must_use]
    pub const fn is_held(self, button: u8) -> bool {
        self.held & button != 0
    }

    #[must_use]
    pub const fn just_pressed(self, button: u8) -> bool {
        self.pressed & button != 0
    }
}

/// Per-cycle source of abstract button state.
pub trait InputSource {
    /// Sample the buttons. Called once per outer-loop cycle, before the
    /// frame executes.
    fn poll(&mut self) -> PadState;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edges_fire_on_press_only() {
        let s0 = PadState::default();
        let s1 = s0.advance(PadState::ACT);
        assert!(s1.just_pressed(PadState::ACT));
        assert!(s1.is_held(PadState::ACT));

        // Held across a second sample: no new edge
        let s2 = s1.advance(PadState::ACT);
        assert!(!s2.just_pressed(PadState::ACT));
        assert!(s2.is_held(PadState::ACT));

        // Released: neither held nor an edge
        let s3 = s2.advance(0);
        assert!(!s3.just_pressed(PadState::ACT));
        assert!(!s3.is_held(PadState::ACT));
    }

    #[test]
    fn simultaneous_buttons_keep_distinct_edges() {
        let s0 = PadState::default().advance(PadState::LEFT);
        let s1 = s0.advance(PadState::LEFT | PadState::UP);
        assert!(s1.just_pressed(PadState::UP));
        assert!(!s1.just_pressed(PadState::LEFT), "LEFT was already held");
        assert!(s1.is_held(PadState::LEFT | PadState::UP));
    }
}
