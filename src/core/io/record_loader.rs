//! Loading a region of a packed record file into an owned buffer.

use std::fs::File;
use std::io::{self, BufReader, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

use crate::core::alignment::record::RecordSeq;
use crate::defaults::RECORD_WIDTH;
use crate::error::CompareError;

/// Owned bytes for exactly `len` records. Dropped with the comparison run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordBuffer {
    bytes: Vec<u8>,
}

impl RecordBuffer {
    /// Read `len` records starting at record `offset` of `path`.
    ///
    /// Fails if the file cannot be opened, the seek fails, the buffer cannot
    /// be allocated, or fewer than `len` whole records are available.
    pub fn load(path: &Path, offset: u64, len: u64) -> Result<Self, CompareError> {
        let load_err = |source: io::Error| CompareError::Load {
            path: path.to_path_buf(),
            source,
        };

        let byte_offset = offset
            .checked_mul(RECORD_WIDTH as u64)
            .ok_or_else(|| overflow_err(path))?;
        let byte_len = len
            .checked_mul(RECORD_WIDTH as u64)
            .and_then(|n| usize::try_from(n).ok())
            .ok_or_else(|| overflow_err(path))?;

        let file = File::open(path).map_err(load_err)?;
        let mut reader = BufReader::new(file);
        reader.seek(SeekFrom::Start(byte_offset)).map_err(load_err)?;

        let mut bytes = Vec::new();
        bytes.try_reserve_exact(byte_len).map_err(|e| {
            load_err(io::Error::new(io::ErrorKind::OutOfMemory, e.to_string()))
        })?;
        bytes.resize(byte_len, 0);
        reader.read_exact(&mut bytes).map_err(load_err)?;

        log::debug!(
            "Loaded {} records ({} bytes) from {} at record offset {}",
            len,
            byte_len,
            path.display(),
            offset
        );

        Ok(RecordBuffer { bytes })
    }

    /// Wrap bytes already in memory. The length must be a whole number of
    /// records.
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self, CompareError> {
        if bytes.len() % RECORD_WIDTH != 0 {
            return Err(CompareError::Usage(format!(
                "buffer of {} bytes is not a whole number of {}-byte records",
                bytes.len(),
                RECORD_WIDTH
            )));
        }
        Ok(RecordBuffer { bytes })
    }

    pub fn len(&self) -> usize {
        self.bytes.len() / RECORD_WIDTH
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn records(&self) -> RecordSeq<'_> {
        RecordSeq::new(&self.bytes)
    }
}

fn overflow_err(path: &Path) -> CompareError {
    CompareError::Overflow {
        path: PathBuf::from(path),
    }
}
