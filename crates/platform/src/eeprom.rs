//! Settings EEPROM backends for tests and the desktop simulator.
//!
//! Both implement `embedded_storage::{ReadStorage, Storage}`, which is the
//! firmware's [`NonVolatileStore`](crate::NonVolatileStore).

use std::fs;
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use embedded_storage::{ReadStorage, Storage};

/// Errors raised by the EEPROM backends.
#[derive(Debug)]
pub enum EepromError {
    /// Access past the end of the device
    OutOfBounds,
    /// Injected write failure (mock only)
    WriteFailed,
    /// Backing file I/O failed
    Io(std::io::Error),
}

impl core::fmt::Display for EepromError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::OutOfBounds => write!(f, "EEPROM access out of bounds"),
            Self::WriteFailed => write!(f, "EEPROM write failed"),
            Self::Io(e) => write!(f, "EEPROM image I/O error: {e}"),
        }
    }
}

impl std::error::Error for EepromError {}

fn span(offset: u32, len: usize, capacity: usize) -> Result<core::ops::Range<usize>, EepromError> {
    let start = usize::try_from(offset).map_err(|_| EepromError::OutOfBounds)?;
    let end = start.checked_add(len).ok_or(EepromError::OutOfBounds)?;
    if end > capacity {
        return Err(EepromError::OutOfBounds);
    }
    Ok(start..end)
}

// ── MockEeprom ───────────────────────────────────────────────────────────────

/// In-memory EEPROM of `N` bytes, erased to 0xFF.
pub struct MockEeprom<const N: usize> {
    cells: [u8; N],
    writes: usize,
    fail_writes: bool,
    fail_reads: bool,
}

impl<const N: usize> MockEeprom<N> {
    /// Create an erased device.
    pub fn new() -> Self {
        Self {
            cells: [0xFF; N],
            writes: 0,
            fail_writes: false,
            fail_reads: false,
        }
    }

    /// Make every subsequent write fail.
    pub fn fail_writes(&mut self, fail: bool) {
        self.fail_writes = fail;
    }

    /// Make every subsequent read fail.
    pub fn fail_reads(&mut self, fail: bool) {
        self.fail_reads = fail;
    }

    /// Number of successful write calls.
    pub fn write_count(&self) -> usize {
        self.writes
    }

    /// Raw device contents.
    pub fn contents(&self) -> &[u8] {
        &self.cells
    }

    /// Mutable raw contents, for corrupting a stored image in tests.
    pub fn contents_mut(&mut self) -> &mut [u8] {
        &mut self.cells
    }
}

impl<const N: usize> Default for MockEeprom<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> ReadStorage for MockEeprom<N> {
    type Error = EepromError;

    fn read(&mut self, offset: u32, bytes: &mut [u8]) -> Result<(), Self::Error> {
        if self.fail_reads {
            return Err(EepromError::Io(std::io::Error::other("injected read failure")));
        }
        let range = span(offset, bytes.len(), N)?;
        let src = self.cells.get(range).ok_or(EepromError::OutOfBounds)?;
        bytes.copy_from_slice(src);
        Ok(())
    }

    fn capacity(&self) -> usize {
        N
    }
}

impl<const N: usize> Storage for MockEeprom<N> {
    fn write(&mut self, offset: u32, bytes: &[u8]) -> Result<(), Self::Error> {
        if self.fail_writes {
            return Err(EepromError::WriteFailed);
        }
        let range = span(offset, bytes.len(), N)?;
        let dst = self.cells.get_mut(range).ok_or(EepromError::OutOfBounds)?;
        dst.copy_from_slice(bytes);
        self.writes = self.writes.saturating_add(1);
        Ok(())
    }
}

// ── FileEeprom ───────────────────────────────────────────────────────────────

/// EEPROM image kept in a file, so simulator settings survive restarts.
///
/// The file is created (erased to 0xFF) on first use and always holds exactly
/// `capacity` bytes.
pub struct FileEeprom {
    path: PathBuf,
    capacity: usize,
}

impl FileEeprom {
    /// Open or create the image at `path`.
    pub fn open(path: impl AsRef<Path>, capacity: usize) -> Result<Self, EepromError> {
        let path = path.as_ref().to_path_buf();
        let needs_init = fs::metadata(&path)
            .map(|m| m.len() != capacity as u64)
            .unwrap_or(true);
        if needs_init {
            fs::write(&path, vec![0xFF; capacity]).map_err(EepromError::Io)?;
        }
        Ok(Self { path, capacity })
    }

    /// Path of the backing image.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ReadStorage for FileEeprom {
    type Error = EepromError;

    fn read(&mut self, offset: u32, bytes: &mut [u8]) -> Result<(), Self::Error> {
        span(offset, bytes.len(), self.capacity)?;
        let mut file = fs::File::open(&self.path).map_err(EepromError::Io)?;
        file.seek(SeekFrom::Start(u64::from(offset)))
            .map_err(EepromError::Io)?;
        file.read_exact(bytes).map_err(EepromError::Io)
    }

    fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Storage for FileEeprom {
    fn write(&mut self, offset: u32, bytes: &[u8]) -> Result<(), Self::Error> {
        span(offset, bytes.len(), self.capacity)?;
        let mut file = fs::OpenOptions::new()
            .write(true)
            .open(&self.path)
            .map_err(EepromError::Io)?;
        file.seek(SeekFrom::Start(u64::from(offset)))
            .map_err(EepromError::Io)?;
        file.write_all(bytes).map_err(EepromError::Io)?;
        file.sync_data().map_err(EepromError::Io)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_mock_starts_erased() {
        let mut eeprom = MockEeprom::<16>::new();
        let mut buf = [0u8; 4];
        eeprom.read(0, &mut buf).unwrap();
        assert_eq!(buf, [0xFF; 4]);
        assert_eq!(eeprom.capacity(), 16);
    }

    #[test]
    fn test_mock_write_then_read() {
        let mut eeprom = MockEeprom::<16>::new();
        eeprom.write(4, &[1, 2, 3]).unwrap();
        let mut buf = [0u8; 3];
        eeprom.read(4, &mut buf).unwrap();
        assert_eq!(buf, [1, 2, 3]);
        assert_eq!(eeprom.write_count(), 1);
    }

    #[test]
    fn test_mock_rejects_out_of_bounds() {
        let mut eeprom = MockEeprom::<8>::new();
        assert!(matches!(eeprom.write(6, &[0; 3]), Err(EepromError::OutOfBounds)));
        let mut buf = [0u8; 9];
        assert!(matches!(eeprom.read(0, &mut buf), Err(EepromError::OutOfBounds)));
    }

    #[test]
    fn test_mock_injected_failure() {
        let mut eeprom = MockEeprom::<8>::new();
        eeprom.fail_writes(true);
        assert!(matches!(eeprom.write(0, &[0]), Err(EepromError::WriteFailed)));
        assert_eq!(eeprom.contents()[0], 0xFF);
    }

    #[test]
    fn test_file_image_persists_across_opens() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("eeprom.bin");
        {
            let mut eeprom = FileEeprom::open(&path, 64).unwrap();
            eeprom.write(10, b"abc").unwrap();
        }
        let mut eeprom = FileEeprom::open(&path, 64).unwrap();
        let mut buf = [0u8; 3];
        eeprom.read(10, &mut buf).unwrap();
        assert_eq!(&buf, b"abc");
        assert_eq!(fs::metadata(&path).unwrap().len(), 64);
    }

    #[test]
    fn test_file_image_resized_is_reset() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("eeprom.bin");
        fs::write(&path, [0u8; 10]).unwrap();
        let mut eeprom = FileEeprom::open(&path, 32).unwrap();
        let mut buf = [0u8; 1];
        eeprom.read(0, &mut buf).unwrap();
        assert_eq!(buf, [0xFF]);
    }
}
