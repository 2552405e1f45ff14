//! Display transport contract.
//!
//! The renderer issues rectangular pixel-block writes; the transport maps
//! them onto the physical panel. Writes are bracketed by
//! `begin_write`/`end_write` so SPI-style transports can hold the bus for
//! a whole batch.
//!
//! # Pixel format
//!
//! 16-bit 5-6-5 RGB with the two bytes swapped relative to natural host
//! order, ready to stream to a big-endian panel. The renderer performs
//! the swap; transports forward pixels untouched.

/// A display accepting windowed pixel-block writes.
pub trait DisplayTransport {
    /// Begin a write batch.
    fn begin_write(&mut self);

    /// End the current write batch.
    fn end_write(&mut self);

    /// Set the target window. Subsequent pixel writes fill the window
    /// left-to-right, top-to-bottom.
    fn set_window(&mut self, x: u16, y: u16, w: u16, h: u16);

    /// Fill `count` pixels of the current window with a single colour.
    fn write_color(&mut self, color: u16, count: u32);

    /// Write a run of pixels to the current window.
    fn write_row(&mut self, pixels: &[u16]);
}
