//! Fixed-width record views over raw byte buffers.
//!
//! A record is always four bytes wide regardless of the host's native
//! integer widths. Comparisons look at the full record, its leading two
//! bytes and its leading byte, in memory order.

use crate::defaults::{HALF_WIDTH, PREFIX_WIDTH, RECORD_WIDTH};

/// One four-byte record copied out of a buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Record([u8; RECORD_WIDTH]);

/// How closely two records agree, strongest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordMatch {
    Exact,
    Half,
    Prefix,
    Mismatch,
}

impl Record {
    pub const TERMINATOR: Record = Record([0; RECORD_WIDTH]);

    #[inline(always)]
    pub const fn new(bytes: [u8; RECORD_WIDTH]) -> Self {
        Record(bytes)
    }

    /// Build a record whose bytes are `value` in big-endian order, so that
    /// `0x11223344` reads as `11 22 33 44` in the buffer.
    #[inline]
    pub const fn from_be_u32(value: u32) -> Self {
        Record(value.to_be_bytes())
    }

    #[inline(always)]
    pub fn bytes(&self) -> &[u8; RECORD_WIDTH] {
        &self.0
    }

    #[inline(always)]
    pub fn half(&self) -> &[u8] {
        &self.0[..HALF_WIDTH]
    }

    #[inline(always)]
    pub fn prefix(&self) -> &[u8] {
        &self.0[..PREFIX_WIDTH]
    }

    /// An all-zero record ends a scoring walk.
    #[inline(always)]
    pub fn is_terminator(&self) -> bool {
        self.0 == [0; RECORD_WIDTH]
    }

    /// Classify agreement hierarchically: full, then leading half, then
    /// leading byte.
    #[inline]
    pub fn compare(&self, other: &Record) -> RecordMatch {
        if self.0 == other.0 {
            RecordMatch::Exact
        } else if self.half() == other.half() {
            RecordMatch::Half
        } else if self.prefix() == other.prefix() {
            RecordMatch::Prefix
        } else {
            RecordMatch::Mismatch
        }
    }
}

/// Borrowed, immutable sequence of records backed by a byte slice.
///
/// The slice length is always a whole number of records; any trailing
/// partial record is not addressable.
#[derive(Debug, Clone, Copy)]
pub struct RecordSeq<'a> {
    bytes: &'a [u8],
}

impl<'a> RecordSeq<'a> {
    /// View `bytes` as records, ignoring a trailing partial record.
    pub fn new(bytes: &'a [u8]) -> Self {
        let whole = bytes.len() - bytes.len() % RECORD_WIDTH;
        RecordSeq {
            bytes: &bytes[..whole],
        }
    }

    pub const fn empty() -> Self {
        RecordSeq { bytes: &[] }
    }

    /// Length in records, not bytes.
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.bytes.len() / RECORD_WIDTH
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Bounds-checked record read.
    #[inline]
    pub fn get(&self, index: usize) -> Option<Record> {
        let start = index.checked_mul(RECORD_WIDTH)?;
        let chunk = self.bytes.get(start..start + RECORD_WIDTH)?;
        let mut out = [0u8; RECORD_WIDTH];
        out.copy_from_slice(chunk);
        Some(Record(out))
    }

    /// Sub-sequence starting at record `start`. Starting at or past the end
    /// yields an empty sequence.
    #[inline]
    pub fn tail(&self, start: usize) -> RecordSeq<'a> {
        match start.checked_mul(RECORD_WIDTH) {
            Some(offset) if offset < self.bytes.len() => RecordSeq {
                bytes: &self.bytes[offset..],
            },
            _ => RecordSeq::empty(),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = Record> + 'a {
        self.bytes.chunks_exact(RECORD_WIDTH).map(|chunk| {
            let mut out = [0u8; RECORD_WIDTH];
            out.copy_from_slice(chunk);
            Record(out)
        })
    }
}

/// Pack records back into a contiguous byte buffer.
pub fn records_to_bytes(records: &[Record]) -> Vec<u8> {
    records.iter().flat_map(|r| r.0).collect()
}
