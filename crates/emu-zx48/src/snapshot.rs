//! Snapshot application: machine-state files and raw screen dumps.
//!
//! Parsing lives in `format-z80`; this module consumes a parsed snapshot
//! into the register file and RAM, and handles the 6912-byte screen dump
//! shown as a splash before a snapshot starts. Both loads force a full
//! redraw so the next rendered frame reflects the restored contents.

use emu_core::CpuCore;
use format_z80::Z80Snapshot;

use crate::machine::Zx48;
use crate::memory::SCREEN_SIZE;

/// Load a .z80 snapshot, replacing the whole machine state.
///
/// # Errors
///
/// Returns an error for truncated snapshot data; the machine is left
/// untouched in that case.
pub fn load_z80<C: CpuCore>(machine: &mut Zx48<C>, data: &[u8]) -> Result<(), String> {
    let snap = Z80Snapshot::parse(data).map_err(|e| e.to_string())?;

    machine.reset();

    let regs = machine.cpu_mut().registers_mut();
    regs.a = snap.a;
    regs.f = snap.f;
    regs.b = snap.b;
    regs.c = snap.c;
    regs.d = snap.d;
    regs.e = snap.e;
    regs.h = snap.h;
    regs.l = snap.l;
    regs.a_alt = snap.a_alt;
    regs.f_alt = snap.f_alt;
    regs.b_alt = snap.b_alt;
    regs.c_alt = snap.c_alt;
    regs.d_alt = snap.d_alt;
    regs.e_alt = snap.e_alt;
    regs.h_alt = snap.h_alt;
    regs.l_alt = snap.l_alt;
    regs.ix = snap.ix;
    regs.iy = snap.iy;
    regs.sp = snap.sp;
    regs.pc = snap.pc;
    regs.i = snap.i;
    regs.r = snap.r;
    regs.iff1 = snap.iff1;
    regs.iff2 = snap.iff2;
    regs.im = snap.im;
    regs.ei_pending = snap.ei_pending;

    let bus = machine.bus_mut();
    bus.memory.load_ram(&snap.ram[..]);
    bus.memory.mark_all_dirty();
    // Border colour only; speaker and MIC start low.
    bus.port_fe = snap.border;
    bus.border_changed = true;

    Ok(())
}

/// Load a raw 6912-byte screen dump into display RAM.
///
/// Used for the splash image before a snapshot starts. The rest of the
/// machine is left alone.
///
/// # Errors
///
/// Returns an error when the dump is not exactly 6912 bytes.
pub fn load_scr<C: CpuCore>(machine: &mut Zx48<C>, data: &[u8]) -> Result<(), String> {
    if data.len() != SCREEN_SIZE {
        return Err(format!(
            "screen dump must be {SCREEN_SIZE} bytes, got {}",
            data.len()
        ));
    }

    let bus = machine.bus_mut();
    bus.memory.load_ram(data);
    bus.memory.mark_all_dirty();
    bus.border_changed = true;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::make_machine;
    use format_z80::{HEADER_SIZE, RAM_SIZE};

    /// Minimal v1 file: recognisable registers, uncompressed body.
    fn make_z80_file() -> Vec<u8> {
        let mut data = vec![0u8; HEADER_SIZE + RAM_SIZE];
        data[0] = 0xAA; // A
        data[1] = 0x51; // F
        data[6] = 0x34; // PC low
        data[7] = 0x12; // PC high
        data[8] = 0xFE; // SP low
        data[9] = 0x7F; // SP high
        data[10] = 0x3F; // I
        data[12] = 0x04; // border 2, uncompressed
        data[27] = 0x01; // interrupts enabled
        data[28] = 0x01; // IFF2
        data[29] = 0x02; // IM 2

        data[HEADER_SIZE] = 0x42; // RAM offset 0 = address $4000
        data[HEADER_SIZE + 0x6000] = 0x77; // address $A000
        data
    }

    #[test]
    fn z80_load_populates_registers_and_ram() {
        let mut machine = make_machine();
        load_z80(&mut machine, &make_z80_file()).expect("load should succeed");

        let regs = machine.cpu().registers();
        assert_eq!(regs.a, 0xAA);
        assert_eq!(regs.f, 0x51);
        assert_eq!(regs.pc, 0x1234);
        assert_eq!(regs.sp, 0x7FFE);
        assert_eq!(regs.i, 0x3F);
        assert!(regs.iff1);
        assert!(regs.ei_pending);
        assert_eq!(regs.im, 2);

        let bus = machine.bus();
        assert_eq!(bus.memory.read(0x4000), 0x42);
        assert_eq!(bus.memory.read(0xA000), 0x77);
        assert_eq!(bus.border_colour(), 2);
        assert!(bus.border_changed);
        assert!(bus.memory.dirty().is_marked(0));
        assert!(bus.memory.dirty().is_marked(191));
    }

    #[test]
    fn z80_load_is_idempotent() {
        let file = make_z80_file();

        let mut machine = make_machine();
        load_z80(&mut machine, &file).expect("first load");
        let regs_once = *machine.cpu().registers();
        let ram_once = machine.bus().memory.ram().to_vec();

        load_z80(&mut machine, &file).expect("second load");
        assert_eq!(*machine.cpu().registers(), regs_once);
        assert_eq!(machine.bus().memory.ram().to_vec(), ram_once);
    }

    #[test]
    fn z80_load_replaces_prior_state() {
        let mut machine = make_machine();
        machine.bus_mut().memory.write(0x9000, 0x99);
        machine.cpu_mut().registers_mut().sp = 0xBEEF;

        load_z80(&mut machine, &make_z80_file()).expect("load should succeed");
        assert_eq!(machine.bus().memory.read(0x9000), 0);
        assert_eq!(machine.cpu().registers().sp, 0x7FFE);
    }

    #[test]
    fn truncated_z80_leaves_machine_untouched() {
        let mut machine = make_machine();
        machine.bus_mut().memory.write(0x9000, 0x99);

        assert!(load_z80(&mut machine, &[0u8; 5]).is_err());
        assert_eq!(machine.bus().memory.read(0x9000), 0x99);
    }

    #[test]
    fn scr_load_fills_display_ram_only() {
        let mut machine = make_machine();
        machine.bus_mut().memory.write(0x9000, 0x99);
        machine.bus_mut().memory.dirty_mut().clear_all();

        let mut dump = vec![0u8; SCREEN_SIZE];
        dump[0] = 0xAB;
        dump[SCREEN_SIZE - 1] = 0xCD;
        load_scr(&mut machine, &dump).expect("load should succeed");

        let bus = machine.bus();
        assert_eq!(bus.memory.read(0x4000), 0xAB);
        assert_eq!(bus.memory.read(0x4000 + SCREEN_SIZE as u16 - 1), 0xCD);
        assert_eq!(bus.memory.read(0x9000), 0x99, "non-display RAM untouched");
        assert!(bus.memory.dirty().is_marked(0));
        assert!(bus.memory.dirty().is_marked(191));
    }

    #[test]
    fn scr_load_rejects_wrong_size() {
        let mut machine = make_machine();
        assert!(load_scr(&mut machine, &[0u8; 100]).is_err());
        assert!(load_scr(&mut machine, &[0u8; SCREEN_SIZE + 1]).is_err());
    }
}
