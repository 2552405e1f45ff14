//! Host keyboard and gamepad as the abstract pad.
//!
//! Keyboard: arrows for directions, Space for ACTION, Enter for ESCAPE,
//! comma/period for the two extra buttons. Any connected gamepad maps
//! its d-pad and left stick to directions, south/east to ACTION/ESCAPE
//! and the triggers to the extras.

use std::collections::HashSet;

use emu_core::{InputSource, PadState};
use gilrs::{Axis, Button, Event, GamepadId, Gilrs};
use winit::keyboard::KeyCode;

/// Stick deflection treated as a direction press.
const AXIS_THRESHOLD: f32 = 0.5;

/// Pad source combining host keyboard state and gamepads.
pub struct HostPad {
    keys: HashSet<KeyCode>,
    gilrs: Gilrs,
    active_gamepad: Option<GamepadId>,
    state: PadState,
}

impl HostPad {
    /// # Panics
    ///
    /// Panics if gamepad support cannot be initialised.
    #[must_use]
    pub fn new() -> Self {
        Self {
            keys: HashSet::new(),
            gilrs: Gilrs::new().expect("Failed to initialize gamepad support"),
            active_gamepad: None,
            state: PadState::default(),
        }
    }

    pub fn key_down(&mut self, key: KeyCode) {
        self.keys.insert(key);
    }

    pub fn key_up(&mut self, key: KeyCode) {
        self.keys.remove(&key);
    }

    fn keyboard_held(&self) -> u8 {
        let mut held = 0;
        let mut map = |key, button| {
            if self.keys.contains(&key) {
                held |= button;
            }
        };
        map(KeyCode::ArrowLeft, PadState::LEFT);
        map(KeyCode::ArrowRight, PadState::RIGHT);
        map(KeyCode::ArrowUp, PadState::UP);
        map(KeyCode::ArrowDown, PadState::DOWN);
        map(KeyCode::Space, PadState::ACT);
        map(KeyCode::Enter, PadState::ESC);
        map(KeyCode::Comma, PadState::LFT);
        map(KeyCode::Period, PadState::RGT);
        held
    }

    fn gamepad_held(&self) -> u8 {
        let Some(id) = self.active_gamepad else {
            return 0;
        };
        let Some(gamepad) = self.gilrs.connected_gamepad(id) else {
            return 0;
        };

        let mut held = 0;
        if gamepad.is_pressed(Button::DPadLeft) {
            held |= PadState::LEFT;
        }
        if gamepad.is_pressed(Button::DPadRight) {
            held |= PadState::RIGHT;
        }
        if gamepad.is_pressed(Button::DPadUp) {
            held |= PadState::UP;
        }
        if gamepad.is_pressed(Button::DPadDown) {
            held |= PadState::DOWN;
        }
        if gamepad.is_pressed(Button::South) {
            held |= PadState::ACT;
        }
        if gamepad.is_pressed(Button::East) {
            held |= PadState::ESC;
        }
        if gamepad.is_pressed(Button::LeftTrigger) || gamepad.is_pressed(Button::LeftTrigger2) {
            held |= PadState::LFT;
        }
        if gamepad.is_pressed(Button::RightTrigger) || gamepad.is_pressed(Button::RightTrigger2) {
            held |= PadState::RGT;
        }

        if let Some(axis) = gamepad.axis_data(Axis::LeftStickX) {
            if axis.value() > AXIS_THRESHOLD {
                held |= PadState::RIGHT;
            } else if axis.value() < -AXIS_THRESHOLD {
                held |= PadState::LEFT;
            }
        }
        if let Some(axis) = gamepad.axis_data(Axis::LeftStickY) {
            if axis.value() > AXIS_THRESHOLD {
                held |= PadState::UP;
            } else if axis.value() < -AXIS_THRESHOLD {
                held |= PadState::DOWN;
            }
        }

        held
    }
}

impl Default for HostPad {
    fn default() -> Self {
        Self::new()
    }
}

impl InputSource for HostPad {
    fn poll(&mut self) -> PadState {
        // Track whichever gamepad spoke last.
        while let Some(Event { id, .. }) = self.gilrs.next_event() {
            self.active_gamepad = Some(id);
        }

        let held = self.keyboard_held() | self.gamepad_held();
        self.state = self.state.advance(held);
        self.state
    }
}
