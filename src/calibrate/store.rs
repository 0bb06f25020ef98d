//! Persisted calibration storage
//!
//! Learned per-key minimum capacitance survives restarts. Entries holding
//! the sentinel count as unset; callers substitute defaults and write them
//! back, so a wiped or first-boot store heals itself on load.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Marks an entry that has never been written (or has been wiped).
pub const SENTINEL: u16 = u16::MAX;

/// Errors from the persisted store backend
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("calibration store I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("calibration store is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),
}

/// Trait for calibration storage backends
///
/// Indices are bounded by `len()`; an out-of-range index is a programming
/// error and panics rather than returning an error.
pub trait CalibrationStore {
    /// Number of entries the store holds
    fn len(&self) -> usize;

    /// Read one entry; `SENTINEL` means unset
    fn get(&self, index: usize) -> Result<u16, StoreError>;

    /// Write one entry
    fn put(&mut self, index: usize, value: u16) -> Result<(), StoreError>;

    /// Reset every entry to `SENTINEL`
    fn wipe(&mut self) -> Result<(), StoreError>;
}

/// In-memory store for tests and hardware-less runs
pub struct MemoryStore {
    entries: Vec<u16>,
}

impl MemoryStore {
    /// Create a store with `len` unset entries
    pub fn new(len: usize) -> Self {
        Self {
            entries: vec![SENTINEL; len],
        }
    }
}

impl CalibrationStore for MemoryStore {
    fn len(&self) -> usize {
        self.entries.len()
    }

    fn get(&self, index: usize) -> Result<u16, StoreError> {
        Ok(self.entries[index])
    }

    fn put(&mut self, index: usize, value: u16) -> Result<(), StoreError> {
        self.entries[index] = value;
        Ok(())
    }

    fn wipe(&mut self) -> Result<(), StoreError> {
        self.entries.fill(SENTINEL);
        Ok(())
    }
}

/// File-backed store, written through on every update
///
/// The on-disk format is a plain JSON array of entries. A missing file
/// behaves like a wiped store; a shorter file (older layout) is padded with
/// sentinel entries.
pub struct FileStore {
    path: PathBuf,
    entries: Vec<u16>,
}

impl FileStore {
    /// Open or create a store with `len` entries at `path`
    pub fn open(path: impl Into<PathBuf>, len: usize) -> Result<Self, StoreError> {
        let path = path.into();
        let entries = match std::fs::read(&path) {
            Ok(bytes) => {
                let mut entries: Vec<u16> = serde_json::from_slice(&bytes)?;
                entries.resize(len, SENTINEL);
                entries
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => vec![SENTINEL; len],
            Err(e) => return Err(e.into()),
        };
        Ok(Self { path, entries })
    }

    fn flush(&self) -> Result<(), StoreError> {
        let bytes = serde_json::to_vec(&self.entries)?;
        std::fs::write(&self.path, bytes)?;
        Ok(())
    }
}

impl CalibrationStore for FileStore {
    fn len(&self) -> usize {
        self.entries.len()
    }

    fn get(&self, index: usize) -> Result<u16, StoreError> {
        Ok(self.entries[index])
    }

    fn put(&mut self, index: usize, value: u16) -> Result<(), StoreError> {
        self.entries[index] = value;
        self.flush()
    }

    fn wipe(&mut self) -> Result<(), StoreError> {
        self.entries.fill(SENTINEL);
        self.flush()
    }
}
