//! Memory/port bridge handed to the instruction engine.
//!
//! Routes memory traffic to [`AddressSpace`] and decodes the two ports
//! the machine answers on: the even-address control port (keyboard in,
//! border/MIC/speaker out) and the Kempston joystick port. The renderer
//! and the frame driver observe CPU activity exclusively through the
//! side effects recorded here; the bridge holds no frame-level logic.

use emu_core::Bus;

use crate::keyboard::KeyMatrix;
use crate::memory::AddressSpace;

/// Kempston joystick port (low address byte).
pub const KEMPSTON_PORT: u8 = 0x1F;

/// The machine bus.
pub struct Zx48Bus {
    pub memory: AddressSpace,
    pub keyboard: KeyMatrix,
    /// Control port latch: bits 0-2 border, bit 3 MIC, bit 4 speaker.
    pub port_fe: u8,
    /// Kempston register: bits 0-4 = right, left, down, up, fire
    /// (active high).
    pub port_1f: u8,
    /// Set when a port write changed the border colour; cleared by the
    /// renderer once the border bands are repainted.
    pub border_changed: bool,
}

impl Zx48Bus {
    /// Create the bus with the given 16K ROM image.
    #[must_use]
    pub fn new(rom: &[u8]) -> Self {
        Self {
            memory: AddressSpace::new(rom),
            keyboard: KeyMatrix::new(),
            port_fe: 0,
            port_1f: 0,
            border_changed: false,
        }
    }

    /// Reset to power-on state: RAM zeroed and fully dirty, keys
    /// released, ports idle.
    pub fn reset(&mut self) {
        self.memory.reset();
        self.keyboard.clear();
        self.port_fe = 0;
        self.port_1f = 0;
    }

    /// Current border colour index (0-7).
    #[must_use]
    pub const fn border_colour(&self) -> u8 {
        self.port_fe & 0x07
    }

    /// Is the speaker level currently high?
    #[must_use]
    pub const fn speaker_on(&self) -> bool {
        self.port_fe & 0x10 != 0
    }
}

impl Bus for Zx48Bus {
    fn read(&mut self, addr: u16) -> u8 {
        self.memory.read(addr)
    }

    fn write(&mut self, addr: u16, value: u8) {
        self.memory.write(addr, value);
    }

    fn port_in(&mut self, port: u16) -> u8 {
        // Control port: any even address (bit 0 clear).
        if port & 0x01 == 0 {
            // Each clear line A8-A15 selects a half-row. When several are
            // clear, the highest line wins: the real keyboard's wired-OR
            // leaves the last selection on the bus.
            let mut row = 0;
            for line in 0..8u8 {
                if port & (0x0100 << line) == 0 {
                    row = line;
                }
            }
            return !self.keyboard.half_row(row);
        }

        if port as u8 == KEMPSTON_PORT {
            return self.port_1f;
        }

        // Unattached ports float high.
        0xFF
    }

    fn port_out(&mut self, port: u16, value: u8) {
        if port & 0x01 == 0 {
            if (self.port_fe ^ value) & 0x07 != 0 {
                self.border_changed = true;
            }
            self.port_fe = value;
        }
    }
}
