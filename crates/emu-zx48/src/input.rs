//! Per-cycle input mapping.
//!
//! Each outer-loop cycle the active scheme rebuilds the key matrix from
//! scratch and, in joystick mode, the Kempston register. Keyboard
//! peripherals and on-screen keyboards layer their own keys on top
//! afterwards, before the frame executes.

use emu_core::PadState;

use crate::bus::Zx48Bus;
use crate::keyboard::Key;
use crate::layout::KeyLayout;

/// Kempston joystick bits (active high).
const KEMPSTON_RIGHT: u8 = 0x01;
const KEMPSTON_LEFT: u8 = 0x02;
const KEMPSTON_DOWN: u8 = 0x04;
const KEMPSTON_UP: u8 = 0x08;
const KEMPSTON_FIRE: u8 = 0x10;

/// How the abstract buttons reach the machine.
#[derive(Debug, Clone, Copy)]
pub enum ControlScheme {
    /// Buttons press machine keys through the scan matrix.
    Keyboard(KeyLayout),
    /// Buttons drive the Kempston port. ESCAPE and the two extra buttons
    /// still press Space, 0 and 1, so menus stay reachable.
    Kempston,
}

impl ControlScheme {
    /// Rebuild keyboard and joystick state from a pad sample.
    pub fn apply(&self, pad: PadState, bus: &mut Zx48Bus) {
        bus.keyboard.clear();

        match self {
            Self::Keyboard(layout) => {
                set_key(bus, layout.left, pad.is_held(PadState::LEFT));
                set_key(bus, layout.right, pad.is_held(PadState::RIGHT));
                set_key(bus, layout.up, pad.is_held(PadState::UP));
                set_key(bus, layout.down, pad.is_held(PadState::DOWN));
                set_key(bus, layout.act, pad.is_held(PadState::ACT));
                set_key(bus, layout.esc, pad.is_held(PadState::ESC));
                set_key(bus, layout.lft, pad.is_held(PadState::LFT));
                set_key(bus, layout.rgt, pad.is_held(PadState::RGT));
            }
            Self::Kempston => {
                let mut port = 0;
                if pad.is_held(PadState::LEFT) {
                    port |= KEMPSTON_LEFT;
                }
                if pad.is_held(PadState::RIGHT) {
                    port |= KEMPSTON_RIGHT;
                }
                if pad.is_held(PadState::UP) {
                    port |= KEMPSTON_UP;
                }
                if pad.is_held(PadState::DOWN) {
                    port |= KEMPSTON_DOWN;
                }
                if pad.is_held(PadState::ACT) {
                    port |= KEMPSTON_FIRE;
                }
                bus.port_1f = port;

                bus.keyboard.set(Key::Space, pad.is_held(PadState::ESC));
                bus.keyboard.set(Key::N0, pad.is_held(PadState::LFT));
                bus.keyboard.set(Key::N1, pad.is_held(PadState::RGT));
            }
        }
    }
}

fn set_key(bus: &mut Zx48Bus, key: Option<Key>, held: bool) {
    if let Some(key) = key {
        bus.keyboard.set(key, held);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_bus() -> Zx48Bus {
        let rom = vec![0u8; 0x4000];
        Zx48Bus::new(&rom)
    }

    fn held(buttons: u8) -> PadState {
        PadState::default().advance(buttons)
    }

    #[test]
    fn keyboard_scheme_presses_mapped_keys() {
        let mut bus = make_bus();
        let scheme = ControlScheme::Keyboard(KeyLayout::default_keys());

        scheme.apply(held(PadState::UP | PadState::ACT), &mut bus);
        assert!(bus.keyboard.is_pressed(Key::Q));
        assert!(bus.keyboard.is_pressed(Key::Space));
        assert!(!bus.keyboard.is_pressed(Key::A));
        assert_eq!(bus.port_1f, 0, "joystick port untouched");
    }

    #[test]
    fn matrix_is_rebuilt_each_cycle() {
        let mut bus = make_bus();
        let scheme = ControlScheme::Keyboard(KeyLayout::default_keys());

        scheme.apply(held(PadState::LEFT), &mut bus);
        assert!(bus.keyboard.is_pressed(Key::Z));

        scheme.apply(held(PadState::RIGHT), &mut bus);
        assert!(!bus.keyboard.is_pressed(Key::Z), "stale press cleared");
        assert!(bus.keyboard.is_pressed(Key::X));
    }

    #[test]
    fn unmapped_slots_press_nothing() {
        let mut bus = make_bus();
        let scheme = ControlScheme::Keyboard(KeyLayout::default_keys());

        scheme.apply(held(PadState::LFT | PadState::RGT), &mut bus);
        assert_eq!(bus.keyboard, crate::keyboard::KeyMatrix::new());
    }

    #[test]
    fn kempston_scheme_sets_port_bits() {
        let mut bus = make_bus();

        ControlScheme::Kempston.apply(held(PadState::LEFT | PadState::ACT), &mut bus);
        assert_eq!(bus.port_1f, KEMPSTON_LEFT | KEMPSTON_FIRE);

        ControlScheme::Kempston.apply(held(PadState::RIGHT | PadState::DOWN), &mut bus);
        assert_eq!(bus.port_1f, KEMPSTON_RIGHT | KEMPSTON_DOWN);

        ControlScheme::Kempston.apply(held(0), &mut bus);
        assert_eq!(bus.port_1f, 0);
    }

    #[test]
    fn kempston_auxiliary_buttons_press_keys() {
        let mut bus = make_bus();

        ControlScheme::Kempston.apply(
            held(PadState::ESC | PadState::LFT | PadState::RGT),
            &mut bus,
        );
        assert!(bus.keyboard.is_pressed(Key::Space));
        assert!(bus.keyboard.is_pressed(Key::N0));
        assert!(bus.keyboard.is_pressed(Key::N1));
        assert_eq!(bus.port_1f, 0);
    }
}
