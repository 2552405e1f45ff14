//! Contracts between the ZX48 machine layer and its host devices.
//!
//! The machine core consumes an instruction engine, a display, and a
//! button source entirely through these traits; the embedding binary
//! supplies the implementations.

mod bus;
mod cpu;
mod display;
mod input;

pub use bus::Bus;
pub use cpu::{CpuCore, Registers};
pub use display::DisplayTransport;
pub use input::{InputSource, PadState};
