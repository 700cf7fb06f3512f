//! Local filesystem Storage implementation for the desktop simulator.
//!
//! `LocalFileStorage` implements `platform::Storage` using `std::fs`, standing
//! in for the SD card. All paths are resolved relative to the `card_root`
//! provided at construction.

use std::fs;
use std::io::{Read, Seek, SeekFrom};
use std::path::PathBuf;

use crate::storage::{DirEntry, File, Storage};

/// Error type for local filesystem operations.
#[derive(Debug)]
pub struct LocalStorageError(pub std::io::Error);

impl core::fmt::Display for LocalStorageError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "local storage error: {}", self.0)
    }
}

impl std::error::Error for LocalStorageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.0)
    }
}

/// An open file on the local filesystem.
pub struct LocalFile {
    inner: fs::File,
    size: u64,
}

impl File for LocalFile {
    type Error = LocalStorageError;

    async fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        Read::read(&mut self.inner, buf).map_err(LocalStorageError)
    }

    async fn seek(&mut self, pos: u64) -> Result<u64, Self::Error> {
        Seek::seek(&mut self.inner, SeekFrom::Start(pos)).map_err(LocalStorageError)
    }

    fn size(&self) -> u64 {
        self.size
    }
}

/// A `platform::Storage` implementation backed by `std::fs`.
///
/// Directory entries are listed sorted by name so indices stay stable
/// between calls.
///
/// # Example
/// ```no_run
/// # async fn example() {
/// use platform::storage_local::LocalFileStorage;
/// use platform::Storage;
/// let mut card = LocalFileStorage::new("/home/user/sdcard");
/// let first = card.dir_entry(0).await.unwrap();
/// # }
/// ```
pub struct LocalFileStorage {
    root: PathBuf,
}

impl LocalFileStorage {
    /// Create a new storage rooted at `card_root`.
    #[must_use]
    pub fn new(card_root: &str) -> Self {
        Self {
            root: PathBuf::from(card_root),
        }
    }

    /// Create from the `SDCARD_PATH` environment variable.
    ///
    /// Returns `None` if `SDCARD_PATH` is not set or is not valid UTF-8.
    #[must_use]
    pub fn from_env() -> Option<Self> {
        std::env::var("SDCARD_PATH").ok().map(|p| Self::new(&p))
    }

    fn resolve(&self, path: &str) -> PathBuf {
        self.root.join(path)
    }

    fn sorted_entries(&self) -> Result<Vec<DirEntry>, LocalStorageError> {
        let mut entries = Vec::new();
        for entry in fs::read_dir(&self.root).map_err(LocalStorageError)? {
            let entry = entry.map_err(LocalStorageError)?;
            let meta = entry.metadata().map_err(LocalStorageError)?;
            let name = entry.file_name();
            let Some(name) = name.to_str() else {
                continue;
            };
            let size = if meta.is_dir() { 0 } else { meta.len() };
            entries.push(DirEntry::new(name, size, meta.is_dir()));
        }
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(entries)
    }
}

impl Storage for LocalFileStorage {
    type Error = LocalStorageError;
    type File = LocalFile;

    async fn open_file(&mut self, path: &str) -> Result<Self::File, Self::Error> {
        let full = self.resolve(path);
        let file = fs::File::open(&full).map_err(LocalStorageError)?;
        let meta = file.metadata().map_err(LocalStorageError)?;
        Ok(LocalFile {
            inner: file,
            size: meta.len(),
        })
    }

    async fn exists(&mut self, path: &str) -> Result<bool, Self::Error> {
        Ok(self.resolve(path).exists())
    }

    async fn dir_entry(&mut self, index: usize) -> Result<Option<DirEntry>, Self::Error> {
        Ok(self.sorted_entries()?.into_iter().nth(index))
    }
}
