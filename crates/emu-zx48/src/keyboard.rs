//! Keyboard scan matrix.
//!
//! The machine scans an 8×5 matrix of half-rows through the low port.
//! The high byte of the port address selects half-rows (one bit each,
//! active low); a pressed key reads as 0 on its line.
//!
//! # Half-row layout
//!
//! | Addr bit | Row | Keys (line 0-4)          |
//! |----------|-----|--------------------------|
//! | A8       | 0   | Caps Shift, Z, X, C, V   |
//! | A9       | 1   | A, S, D, F, G            |
//! | A10      | 2   | Q, W, E, R, T            |
//! | A11      | 3   | 1, 2, 3, 4, 5            |
//! | A12      | 4   | 0, 9, 8, 7, 6            |
//! | A13      | 5   | P, O, I, U, Y            |
//! | A14      | 6   | Enter, L, K, J, H        |
//! | A15      | 7   | Space, Sym Shift, M, N, B |

/// A machine key, numbered by scan position (`row * 5 + line`).
///
/// The final slot is reserved for the DELETE pseudo-key reported by
/// keyboard peripherals (Caps Shift + 0 on the real machine); it never
/// reaches the port scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Key {
    CapsShift = 0,
    Z,
    X,
    C,
    V,
    A,
    S,
    D,
    F,
    G,
    Q,
    W,
    E,
    R,
    T,
    N1,
    N2,
    N3,
    N4,
    N5,
    N0,
    N9,
    N8,
    N7,
    N6,
    P,
    O,
    I,
    U,
    Y,
    Enter,
    L,
    K,
    J,
    H,
    Space,
    SymShift,
    M,
    N,
    B,
    Del,
}

impl Key {
    /// Number of matrix slots, reserved ones included.
    pub const COUNT: usize = 41;

    /// Scan code: `half_row * 5 + line` for real keys.
    #[must_use]
    pub const fn code(self) -> u8 {
        self as u8
    }
}

/// The key-scan set: one bit per [`Key`] slot.
///
/// Rebuilt from scratch every outer-loop cycle by the input mapper (and
/// by any keyboard peripheral) before the frame executes; the bridge's
/// port-in handler only reads it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeyMatrix {
    bits: u64,
}

impl KeyMatrix {
    #[must_use]
    pub const fn new() -> Self {
        Self { bits: 0 }
    }

    /// Release every key.
    pub const fn clear(&mut self) {
        self.bits = 0;
    }

    pub const fn set(&mut self, key: Key, pressed: bool) {
        if pressed {
            self.bits |= 1 << key.code();
        } else {
            self.bits &= !(1 << key.code());
        }
    }

    pub const fn press(&mut self, key: Key) {
        self.set(key, true);
    }

    #[must_use]
    pub const fn is_pressed(self, key: Key) -> bool {
        self.bits & (1 << key.code()) != 0
    }

    /// Pressed lines of one half-row (0-7) as bits 0-4, active high.
    #[must_use]
    pub const fn half_row(self, row: u8) -> u8 {
        ((self.bits >> (row * 5)) & 0x1F) as u8
    }
}
