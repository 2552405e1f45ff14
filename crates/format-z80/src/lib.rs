//! ZX Spectrum .Z80 snapshot parser.
//!
//! Three revisions share a 30-byte register header. A non-zero program
//! counter at offset 6 marks the oldest revision: the remainder of the
//! file is the 48K RAM image, optionally RLE-compressed as one block. A
//! zero program counter marks the later revisions: an extended header
//! follows (its first word is its own length, its next word the real
//! program counter), then a sequence of 16K page chunks, each prefixed by
//! a 2-byte length and a page identifier. A chunk length of $FFFF means
//! the page is stored as 16,384 literal bytes; anything else is
//! RLE-compressed.
//!
//! # RLE scheme
//!
//! A run is the 4-byte sequence `ED ED count value`. Expansion happens in
//! place: the tail of the buffer is shifted forward by `count - 4` with an
//! overlapping move, then `count` copies of the value are written over the
//! marker. Compressed v1 streams end with the marker `00 ED ED 00`; the
//! zero-count run deletes itself during expansion.

use std::fmt;

/// Register header size in bytes.
pub const HEADER_SIZE: usize = 30;

/// Size of the 48K RAM image.
pub const RAM_SIZE: usize = 0xC000;

/// Size of one memory page chunk when expanded.
pub const PAGE_SIZE: usize = 0x4000;

/// Chunk length sentinel: page data is uncompressed.
pub const RAW_PAGE_LEN: u16 = 0xFFFF;

/// Parse failures.
///
/// Chunk payloads are deliberately not inspected beyond their headers —
/// snapshots come from a trusted source. Unrecognised page identifiers
/// are skipped, not errors.
#[derive(Debug, PartialEq, Eq)]
pub enum Z80Error {
    /// File shorter than the fixed or extended register header.
    TruncatedHeader,
    /// A page chunk claims more data than the file contains.
    TruncatedData,
}

impl fmt::Display for Z80Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TruncatedHeader => write!(f, "z80 snapshot shorter than its header"),
            Self::TruncatedData => write!(f, "z80 snapshot truncated inside a page chunk"),
        }
    }
}

impl std::error::Error for Z80Error {}

/// A fully decoded snapshot: register state plus the expanded RAM image.
pub struct Z80Snapshot {
    pub a: u8,
    pub f: u8,
    pub b: u8,
    pub c: u8,
    pub d: u8,
    pub e: u8,
    pub h: u8,
    pub l: u8,

    pub a_alt: u8,
    pub f_alt: u8,
    pub b_alt: u8,
    pub c_alt: u8,
    pub d_alt: u8,
    pub e_alt: u8,
    pub h_alt: u8,
    pub l_alt: u8,

    pub ix: u16,
    pub iy: u16,
    pub sp: u16,
    pub pc: u16,
    pub i: u8,
    pub r: u8,

    pub iff1: bool,
    pub iff2: bool,
    pub im: u8,
    /// Interrupts were enabled by the final instruction before capture;
    /// acceptance is delayed by one instruction on resume.
    pub ei_pending: bool,

    /// Border colour index (0-7).
    pub border: u8,

    /// Expanded 48K RAM image, offset 0 = address $4000.
    pub ram: Box<[u8; RAM_SIZE]>,
}

impl Z80Snapshot {
    /// Parse a .z80 file.
    ///
    /// # Errors
    ///
    /// Returns [`Z80Error`] when the file is shorter than its headers
    /// claim. Unrecognised page identifiers are skipped silently.
    pub fn parse(data: &[u8]) -> Result<Self, Z80Error> {
        let header = data.get(..HEADER_SIZE).ok_or(Z80Error::TruncatedHeader)?;

        // Byte 12 quirk: $FF must be read as $01 (early files wrote it so).
        let mut flags = header[12];
        if flags == 0xFF {
            flags = 0x01;
        }
        let compressed = flags & 0x20 != 0;

        let iff1 = header[27] & 0x01 != 0;

        let mut snapshot = Self {
            a: header[0],
            f: header[1],
            c: header[2],
            b: header[3],
            l: header[4],
            h: header[5],
            pc: word(header[6], header[7]),
            sp: word(header[8], header[9]),
            i: header[10],
            r: header[11],
            e: header[13],
            d: header[14],
            c_alt: header[15],
            b_alt: header[16],
            e_alt: header[17],
            d_alt: header[18],
            l_alt: header[19],
            h_alt: header[20],
            a_alt: header[21],
            f_alt: header[22],
            ix: word(header[23], header[24]),
            iy: word(header[25], header[26]),
            iff1,
            iff2: header[28] != 0,
            im: header[29] & 0x03,
            ei_pending: iff1,
            border: (flags >> 1) & 0x07,
            ram: Box::new([0u8; RAM_SIZE]),
        };

        if snapshot.pc != 0 {
            snapshot.load_v1_body(&data[HEADER_SIZE..], compressed);
        } else {
            snapshot.load_paged_body(&data[HEADER_SIZE..])?;
        }

        Ok(snapshot)
    }

    /// Oldest revision: the body is the whole RAM image.
    fn load_v1_body(&mut self, body: &[u8], compressed: bool) {
        let len = body.len().min(RAM_SIZE);
        self.ram[..len].copy_from_slice(&body[..len]);
        if compressed {
            expand_rle(&mut self.ram[..]);
        }
    }

    /// Later revisions: extended header followed by page chunks.
    fn load_paged_body(&mut self, body: &[u8]) -> Result<(), Z80Error> {
        let ext = body.get(..4).ok_or(Z80Error::TruncatedHeader)?;
        let ext_len = word(ext[0], ext[1]) as usize;
        self.pc = word(ext[2], ext[3]);

        // The length word counts from the byte after itself; the program
        // counter just read accounts for two of those bytes.
        let mut pos = 4 + ext_len.saturating_sub(2);
        if pos > body.len() {
            return Err(Z80Error::TruncatedHeader);
        }

        while pos < body.len() {
            let chunk = body.get(pos..pos + 3).ok_or(Z80Error::TruncatedData)?;
            let len = word(chunk[0], chunk[1]);
            let target = page_target(chunk[2]);
            pos += 3;

            if len == RAW_PAGE_LEN {
                let bytes = body
                    .get(pos..pos + PAGE_SIZE)
                    .ok_or(Z80Error::TruncatedData)?;
                pos += PAGE_SIZE;
                if let Some(offset) = target {
                    self.ram[offset..offset + PAGE_SIZE].copy_from_slice(bytes);
                }
            } else {
                let len = len as usize;
                let bytes = body.get(pos..pos + len).ok_or(Z80Error::TruncatedData)?;
                pos += len;
                if let Some(offset) = target {
                    let page = &mut self.ram[offset..offset + PAGE_SIZE];
                    page[..len].copy_from_slice(bytes);
                    expand_rle(page);
                }
            }
        }

        Ok(())
    }
}

/// RAM offset for a page identifier, or `None` for pages that have no
/// home in a 48K machine (their data is skipped).
const fn page_target(page: u8) -> Option<usize> {
    match page {
        4 => Some(0x4000),
        5 => Some(0x8000),
        8 => Some(0x0000),
        _ => None,
    }
}

const fn word(lo: u8, hi: u8) -> u16 {
    u16::from_le_bytes([lo, hi])
}

/// Expand `ED ED count value` runs in place.
///
/// The buffer holds the compressed stream at its start and is already the
/// expanded size; each run shifts the tail forward to make room, so bytes
/// beyond the final image fall off the end. A zero-count run (the v1
/// stream terminator) deletes itself.
pub fn expand_rle(buf: &mut [u8]) {
    let len = buf.len();
    let mut ptr = 0;

    while ptr + 4 <= len {
        if buf[ptr] == 0xED && buf[ptr + 1] == 0xED {
            let count = buf[ptr + 2] as usize;
            let value = buf[ptr + 3];

            // Overlapping tail shift: the data after the marker moves to
            // where the expanded run ends. Clamped so short runs near the
            // end of the buffer cannot read past it.
            let moved = len.saturating_sub(ptr + count.max(4));
            buf.copy_within(ptr + 4..ptr + 4 + moved, ptr + count);
            buf[ptr..(ptr + count).min(len)].fill(value);

            // count is normally >= 1; stepping at least one byte keeps the
            // scan terminating on degenerate input.
            ptr += count.max(1);
        } else {
            ptr += 1;
        }
    }
}
