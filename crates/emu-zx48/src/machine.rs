//! Top-level machine: instruction engine + bus + frame driver.
//!
//! `run_frame` advances emulated time by exactly one video frame's worth
//! of CPU cycles and folds speaker activity into the sample ring. The
//! accumulators live on the stack: this path allocates nothing, blocks on
//! nothing, and cannot fail.

use std::sync::Arc;

use emu_core::CpuCore;

use crate::audio::{SAMPLE_RATE, SoundRing};
use crate::bus::Zx48Bus;
use crate::config::Zx48Config;

/// CPU clock in Hz.
pub const CLOCK_FREQ: u32 = 3_500_000;

/// Video frame rate in Hz.
pub const FRAME_RATE: u32 = 50;

/// T-state budget per video frame.
pub const TSTATES_PER_FRAME: u32 = CLOCK_FREQ / FRAME_RATE;

/// T-states per output sample.
const TSTATES_PER_SAMPLE: u32 = CLOCK_FREQ / SAMPLE_RATE;

/// Instruction slice granularity.
const SLICE_TSTATES: u32 = 8;

/// Speaker contribution per T-state while the level is high.
const SPEAKER_LEVEL: u32 = 127;

/// The machine.
pub struct Zx48<C: CpuCore> {
    cpu: C,
    bus: Zx48Bus,
    sound: Arc<SoundRing>,
}

impl<C: CpuCore> Zx48<C> {
    #[must_use]
    pub fn new(cpu: C, config: &Zx48Config) -> Self {
        Self {
            cpu,
            bus: Zx48Bus::new(&config.rom),
            sound: Arc::new(SoundRing::new()),
        }
    }

    /// Reset CPU and machine state; forces a full redraw.
    pub fn reset(&mut self) {
        self.cpu.reset();
        self.bus.reset();
    }

    /// Run one frame of emulated time.
    ///
    /// The vertical-blank interrupt is signalled once, then the engine
    /// executes in small slices until the frame budget is spent. While
    /// the speaker level is high, full-scale amplitude accumulates per
    /// T-state; whenever a sample period's worth of T-states has elapsed,
    /// the average level over that window is pushed to the ring — a cheap
    /// box downsample of the 1-bit speaker into 8-bit PCM. The remainder
    /// of the period carries forward so sample phase stays accurate.
    pub fn run_frame(&mut self) {
        let mut sample_acc: u32 = 0;
        let mut level_sum: u32 = 0;

        let mut ticks = self.cpu.raise_interrupt(&mut self.bus);

        while ticks < TSTATES_PER_FRAME {
            let n = self.cpu.execute(&mut self.bus, SLICE_TSTATES);

            sample_acc += n;
            if self.bus.speaker_on() {
                level_sum += SPEAKER_LEVEL * n;
            }

            if sample_acc >= TSTATES_PER_SAMPLE {
                self.sound.push((level_sum / sample_acc) as u8);
                sample_acc -= TSTATES_PER_SAMPLE;
                level_sum = 0;
            }

            ticks += n;
        }
    }

    #[must_use]
    pub const fn cpu(&self) -> &C {
        &self.cpu
    }

    pub const fn cpu_mut(&mut self) -> &mut C {
        &mut self.cpu
    }

    #[must_use]
    pub const fn bus(&self) -> &Zx48Bus {
        &self.bus
    }

    pub const fn bus_mut(&mut self) -> &mut Zx48Bus {
        &mut self.bus
    }

    /// Handle to the sample ring, for the output consumer.
    #[must_use]
    pub fn sound(&self) -> Arc<SoundRing> {
        Arc::clone(&self.sound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::make_machine;

    #[test]
    fn frame_spends_the_tstate_budget() {
        let mut machine = make_machine();
        machine.run_frame();

        let spent = machine.cpu().executed + machine.cpu().int_cost;
        assert!(spent >= TSTATES_PER_FRAME, "budget not reached: {spent}");
        assert!(
            spent < TSTATES_PER_FRAME + SLICE_TSTATES,
            "overshot by more than a slice: {spent}"
        );
        assert_eq!(machine.cpu().interrupts, 1);
    }

    #[test]
    fn silent_frame_pushes_zero_samples() {
        let mut machine = make_machine();
        let ring = machine.sound();
        ring.set_cursors(0, 1); // unpark the writer

        machine.run_frame();

        let pushed = ring.write_cursor() - 1;
        assert!(pushed > 0);
        for i in 1..=pushed {
            assert_eq!(ring.sample_at(i), 0, "sample {i}");
        }
    }

    #[test]
    fn speaker_high_pushes_full_scale_samples() {
        let mut machine = make_machine();
        let ring = machine.sound();
        ring.set_cursors(0, 1);

        machine.bus_mut().port_fe = 0x10; // speaker on
        machine.run_frame();

        let pushed = ring.write_cursor() - 1;
        for i in 1..=pushed {
            assert_eq!(ring.sample_at(i), 127, "sample {i}");
        }
    }

    #[test]
    fn frame_emits_one_sample_per_period() {
        let mut machine = make_machine();
        let ring = machine.sound();
        ring.set_cursors(0, 1);

        machine.run_frame();

        // With 8-T-state slices from a 13-T-state interrupt, the slice
        // loop runs 69,992 T-states; one sample per full 72-T-state
        // period, remainders carried forward.
        let slices = (TSTATES_PER_FRAME - 13).div_ceil(SLICE_TSTATES);
        let expected = slices * SLICE_TSTATES / TSTATES_PER_SAMPLE;
        assert_eq!(ring.write_cursor() as u32 - 1, expected);
    }

    #[test]
    fn reset_forces_full_redraw() {
        let mut machine = make_machine();
        machine.bus_mut().memory.dirty_mut().clear_all();
        machine.reset();
        assert!(machine.bus().memory.dirty().is_marked(0));
        assert!(machine.bus().memory.dirty().is_marked(191));
    }
}
