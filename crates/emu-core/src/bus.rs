//! Memory and port callbacks consumed by the instruction engine.

/// Memory and I/O view given to the CPU.
///
/// The machine's bridge implements this; the instruction engine calls it
/// for every memory access and every IN/OUT instruction. Side effects of
/// these calls (dirty-row tracking, border flagging, speaker latching) are
/// the only way the rest of the machine observes CPU activity.
pub trait Bus {
    /// Read a byte from the given address.
    fn read(&mut self, addr: u16) -> u8;

    /// Write a byte to the given address. ROM writes are silently ignored.
    fn write(&mut self, addr: u16, value: u8);

    /// Read a byte from an I/O port. The full 16-bit port address is
    /// passed; peripherals decode partial addresses.
    fn port_in(&mut self, port: u16) -> u8;

    /// Write a byte to an I/O port.
    fn port_out(&mut self, port: u16, value: u8);
}
