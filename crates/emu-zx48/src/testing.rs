//! Shared test doubles.

use emu_core::{Bus, CpuCore, DisplayTransport, Registers};

use crate::config::Zx48Config;
use crate::machine::Zx48;

/// Engine stand-in: burns exactly the requested T-states and exposes
/// counters for the frame-driver tests.
pub struct FakeCpu {
    pub regs: Registers,
    pub int_cost: u32,
    pub executed: u32,
    pub interrupts: u32,
}

impl FakeCpu {
    pub fn new() -> Self {
        Self {
            regs: Registers::default(),
            int_cost: 13,
            executed: 0,
            interrupts: 0,
        }
    }
}

impl CpuCore for FakeCpu {
    fn reset(&mut self) {
        self.regs = Registers::default();
    }

    fn raise_interrupt<B: Bus>(&mut self, _bus: &mut B) -> u32 {
        self.interrupts += 1;
        self.int_cost
    }

    fn execute<B: Bus>(&mut self, _bus: &mut B, min_tstates: u32) -> u32 {
        self.executed += min_tstates;
        min_tstates
    }

    fn registers(&self) -> &Registers {
        &self.regs
    }

    fn registers_mut(&mut self) -> &mut Registers {
        &mut self.regs
    }
}

/// Machine with a [`FakeCpu`] and a zeroed ROM.
pub fn make_machine() -> Zx48<FakeCpu> {
    let config = Zx48Config::new(vec![0u8; 0x4000]);
    Zx48::new(FakeCpu::new(), &config)
}

/// A row pushed to the display.
pub struct RowPush {
    pub y: u16,
    pub pixels: Vec<u16>,
}

/// Display double recording every transport call.
pub struct RecordingDisplay {
    window: (u16, u16, u16, u16),
    in_batch: bool,
    pub rows: Vec<RowPush>,
    /// (x, y, w, h, colour, count) per solid fill.
    pub fills: Vec<(u16, u16, u16, u16, u16, u32)>,
}

impl RecordingDisplay {
    pub fn new() -> Self {
        Self {
            window: (0, 0, 0, 0),
            in_batch: false,
            rows: Vec::new(),
            fills: Vec::new(),
        }
    }
}

impl DisplayTransport for RecordingDisplay {
    fn begin_write(&mut self) {
        assert!(!self.in_batch, "nested begin_write");
        self.in_batch = true;
    }

    fn end_write(&mut self) {
        assert!(self.in_batch, "end_write outside a batch");
        self.in_batch = false;
    }

    fn set_window(&mut self, x: u16, y: u16, w: u16, h: u16) {
        assert!(self.in_batch, "set_window outside a batch");
        self.window = (x, y, w, h);
    }

    fn write_color(&mut self, color: u16, count: u32) {
        let (x, y, w, h) = self.window;
        self.fills.push((x, y, w, h, color, count));
    }

    fn write_row(&mut self, pixels: &[u16]) {
        self.rows.push(RowPush {
            y: self.window.1,
            pixels: pixels.to_vec(),
        });
    }
}
