//! Control layouts: which machine keys the abstract buttons press.
//!
//! A layout comes from a built-in scheme or from an 8-character text
//! record stored next to the snapshot. Record order: UP, DOWN, LEFT,
//! RIGHT, ACTION, ESCAPE, extra-LEFT, extra-RIGHT. Letters and digits
//! name themselves, `_` is Space, `$` Enter, `@` Caps Shift, `#` Symbol
//! Shift; any other character leaves the slot unmapped.

use crate::keyboard::Key;

/// Key assignment for the eight abstract buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyLayout {
    pub up: Option<Key>,
    pub down: Option<Key>,
    pub left: Option<Key>,
    pub right: Option<Key>,
    pub act: Option<Key>,
    pub esc: Option<Key>,
    pub lft: Option<Key>,
    pub rgt: Option<Key>,
}

impl KeyLayout {
    /// Q/A/Z/X layout used until a scheme or record is chosen.
    #[must_use]
    pub const fn default_keys() -> Self {
        Self {
            up: Some(Key::Q),
            down: Some(Key::A),
            left: Some(Key::Z),
            right: Some(Key::X),
            act: Some(Key::Space),
            esc: Some(Key::Enter),
            lft: None,
            rgt: None,
        }
    }

    /// Parse an 8-character layout record. Returns `None` when the record
    /// is shorter than 8 bytes.
    #[must_use]
    pub fn from_record(record: &[u8]) -> Option<Self> {
        let r = record.get(..8)?;
        Some(Self {
            up: key_for_char(r[0]),
            down: key_for_char(r[1]),
            left: key_for_char(r[2]),
            right: key_for_char(r[3]),
            act: key_for_char(r[4]),
            esc: key_for_char(r[5]),
            lft: key_for_char(r[6]),
            rgt: key_for_char(r[7]),
        })
    }
}

/// Map a layout character to a machine key.
#[must_use]
pub fn key_for_char(c: u8) -> Option<Key> {
    match c.to_ascii_uppercase() {
        b'A' => Some(Key::A),
        b'B' => Some(Key::B),
        b'C' => Some(Key::C),
        b'D' => Some(Key::D),
        b'E' => Some(Key::E),
        b'F' => Some(Key::F),
        b'G' => Some(Key::G),
        b'H' => Some(Key::H),
        b'I' => Some(Key::I),
        b'J' => Some(Key::J),
        b'K' => Some(Key::K),
        b'L' => Some(Key::L),
        b'M' => Some(Key::M),
        b'N' => Some(Key::N),
        b'O' => Some(Key::O),
        b'P' => Some(Key::P),
        b'Q' => Some(Key::Q),
        b'R' => Some(Key::R),
        b'S' => Some(Key::S),
        b'T' => Some(Key::T),
        b'U' => Some(Key::U),
        b'V' => Some(Key::V),
        b'W' => Some(Key::W),
        b'X' => Some(Key::X),
        b'Y' => Some(Key::Y),
        b'Z' => Some(Key::Z),
        b'0' => Some(Key::N0),
        b'1' => Some(Key::N1),
        b'2' => Some(Key::N2),
        b'3' => Some(Key::N3),
        b'4' => Some(Key::N4),
        b'5' => Some(Key::N5),
        b'6' => Some(Key::N6),
        b'7' => Some(Key::N7),
        b'8' => Some(Key::N8),
        b'9' => Some(Key::N9),
        b'_' => Some(Key::Space),
        b'$' => Some(Key::Enter),
        b'@' => Some(Key::CapsShift),
        b'#' => Some(Key::SymShift),
        _ => None,
    }
}

/// A named built-in control scheme.
#[derive(Debug, Clone, Copy)]
pub struct Scheme {
    pub name: &'static str,
    /// `None` selects Kempston joystick emulation instead of key mapping.
    pub layout: Option<KeyLayout>,
}

/// Built-in schemes, cycled through by the frontend. A layout record next
/// to the snapshot overrides whichever is selected.
pub const SCHEMES: [Scheme; 5] = [
    Scheme {
        name: "KEMP",
        layout: None,
    },
    Scheme {
        name: "QAOP",
        layout: Some(KeyLayout {
            up: Some(Key::Q),
            down: Some(Key::A),
            left: Some(Key::O),
            right: Some(Key::P),
            act: Some(Key::Space),
            esc: Some(Key::M),
            lft: Some(Key::N0),
            rgt: Some(Key::N1),
        }),
    },
    Scheme {
        name: "ZXse",
        layout: Some(KeyLayout {
            up: Some(Key::Q),
            down: Some(Key::A),
            left: Some(Key::Z),
            right: Some(Key::X),
            act: Some(Key::Space),
            esc: Some(Key::Enter),
            lft: Some(Key::N0),
            rgt: Some(Key::N1),
        }),
    },
    Scheme {
        name: "SINC",
        layout: Some(KeyLayout {
            up: Some(Key::N9),
            down: Some(Key::N8),
            left: Some(Key::N6),
            right: Some(Key::N7),
            act: Some(Key::N0),
            esc: Some(Key::Enter),
            lft: Some(Key::Space),
            rgt: Some(Key::N1),
        }),
    },
    Scheme {
        name: "CURS",
        layout: Some(KeyLayout {
            up: Some(Key::N8),
            down: Some(Key::N7),
            left: Some(Key::N5),
            right: Some(Key::N8),
            act: Some(Key::N0),
            esc: Some(Key::Enter),
            lft: Some(Key::Space),
            rgt: Some(Key::N1),
        }),
    },
];
