//! Storage abstraction for the SD card

/// Longest entry name the browser keeps (long names are clipped).
pub const ENTRY_NAME_LEN: usize = 32;

/// Storage trait for SD card access
pub trait Storage {
    /// Error type
    type Error: core::fmt::Debug;
    /// File type
    type File: File;

    /// Open file for reading
    fn open_file(
        &mut self,
        path: &str,
    ) -> impl core::future::Future<Output = Result<Self::File, Self::Error>>;

    /// Check if path exists
    fn exists(
        &mut self,
        path: &str,
    ) -> impl core::future::Future<Output = Result<bool, Self::Error>>;

    /// Entry `index` of the card's root directory, in a stable order.
    ///
    /// Returns `Ok(None)` once `index` is past the last entry.
    fn dir_entry(
        &mut self,
        index: usize,
    ) -> impl core::future::Future<Output = Result<Option<DirEntry>, Self::Error>>;
}

/// File trait for reading files
pub trait File {
    /// Error type
    type Error: core::fmt::Debug;

    /// Read from current position
    fn read(
        &mut self,
        buf: &mut [u8],
    ) -> impl core::future::Future<Output = Result<usize, Self::Error>>;

    /// Seek to position
    fn seek(&mut self, pos: u64) -> impl core::future::Future<Output = Result<u64, Self::Error>>;

    /// Get file size
    fn size(&self) -> u64;
}

/// One directory entry as shown by the file browser
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    /// Entry name, clipped to [`ENTRY_NAME_LEN`] bytes
    pub name: heapless::String<ENTRY_NAME_LEN>,
    /// File size in bytes (0 for directories)
    pub size: u64,
    /// Whether the entry is a directory
    pub is_dir: bool,
}

impl DirEntry {
    /// Build an entry, clipping `name` on a char boundary.
    #[must_use]
    pub fn new(name: &str, size: u64, is_dir: bool) -> Self {
        let mut clipped = heapless::String::new();
        for c in name.chars() {
            if clipped.push(c).is_err() {
                break;
            }
        }
        Self {
            name: clipped,
            size,
            is_dir,
        }
    }

    /// Whether this is a file with a `.wav` extension (any case).
    #[must_use]
    pub fn is_wav(&self) -> bool {
        !self.is_dir
            && self
                .name
                .rsplit_once('.')
                .is_some_and(|(_, ext)| ext.eq_ignore_ascii_case("wav"))
    }
}
