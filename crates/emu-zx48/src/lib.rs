//! ZX Spectrum 48K machine layer.
//!
//! Sits between a Z80 instruction engine (consumed through the
//! [`emu_core::CpuCore`] contract) and the physical devices of a small
//! handheld: a 128×128 RGB565 display, a 1-bit speaker behind a
//! fixed-rate sample output, and an 8-button pad.
//!
//! The pieces, leaf-first: [`memory::AddressSpace`] (ROM/RAM with per-row
//! dirty tracking), [`Zx48Bus`] (the memory/port bridge handed to the
//! engine), [`Zx48::run_frame`] (one video frame of CPU time plus audio
//! accumulation), [`Renderer`] (dirty rows blended 2×2 down to the
//! panel), [`SoundRing`] (lock-free sample ring drained by the output
//! callback), and [`FramePacer`] (bounded wall-clock catch-up).

pub mod audio;
mod bus;
mod config;
pub mod input;
mod keyboard;
pub mod layout;
mod machine;
pub mod memory;
mod pacer;
mod palette;
pub mod snapshot;
mod video;

pub use audio::SoundRing;
pub use bus::Zx48Bus;
pub use config::Zx48Config;
pub use input::ControlScheme;
pub use keyboard::{Key, KeyMatrix};
pub use layout::{KeyLayout, SCHEMES, Scheme};
pub use machine::{CLOCK_FREQ, FRAME_RATE, TSTATES_PER_FRAME, Zx48};
pub use memory::AddressSpace;
pub use pacer::{DEFAULT_MAX_FRAMESKIP, FramePacer};
pub use palette::PALETTE;
pub use snapshot::{load_scr, load_z80};
pub use video::{DISPLAY_HEIGHT, DISPLAY_WIDTH, Renderer};

#[cfg(test)]
pub(crate) mod testing;
