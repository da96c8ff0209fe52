//! ZIP container access for `.xpi` packages.
//!
//! [`XpiReader`] opens an existing package and pulls single entries out of it.
//! [`XpiWriter`] assembles a new package entirely in memory; nothing touches
//! disk until the caller writes the bytes returned by [`XpiWriter::finish`].
//!
//! Written entries carry a fixed timestamp (the ZIP epoch, 1980-01-01) and
//! mode `0644`, so the same inputs added in the same order produce the same
//! bytes.

use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, Cursor, Read, Seek, Write};
use std::path::{Path, PathBuf};
use zip::result::ZipError;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, DateTime, ZipArchive, ZipWriter};

use crate::error::{Error, Result};

/// Upper bound on the buffer reserved up front when reading an entry.
const MAX_PREALLOCATION: u64 = 1 << 20;

/// Compression applied to written entries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Compression {
    Stored,
    #[default]
    Deflated,
}

impl Compression {
    fn method(self) -> CompressionMethod {
        match self {
            Compression::Stored => CompressionMethod::Stored,
            Compression::Deflated => CompressionMethod::Deflated,
        }
    }
}

/// Read access to a package archive.
///
/// The underlying file handle is released when the reader is dropped.
pub struct XpiReader<R: Read + Seek> {
    archive: ZipArchive<R>,
    origin: PathBuf,
}

impl XpiReader<BufReader<File>> {
    /// Opens the archive at `path`.
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|e| Error::io(path, e))?;
        Self::new(BufReader::new(file), path)
    }
}

impl XpiReader<Cursor<Vec<u8>>> {
    /// Opens an archive already held in memory. `origin` is only used in errors.
    pub fn from_bytes(bytes: Vec<u8>, origin: impl Into<PathBuf>) -> Result<Self> {
        Self::new(Cursor::new(bytes), origin)
    }
}

impl<R: Read + Seek> XpiReader<R> {
    fn new(reader: R, origin: impl Into<PathBuf>) -> Result<Self> {
        Ok(Self {
            archive: ZipArchive::new(reader)?,
            origin: origin.into(),
        })
    }

    pub fn len(&self) -> usize {
        self.archive.len()
    }

    pub fn is_empty(&self) -> bool {
        self.archive.is_empty()
    }

    /// Entry names in archive order.
    pub fn entry_names(&self) -> Vec<String> {
        (0..self.archive.len())
            .filter_map(|i| self.archive.name_for_index(i).map(str::to_string))
            .collect()
    }

    /// Reads the entry named exactly `name`, or `None` if there is no such entry.
    pub fn read_entry(&mut self, name: &str) -> Result<Option<Vec<u8>>> {
        let mut entry = match self.archive.by_name(name) {
            Ok(entry) => entry,
            Err(ZipError::FileNotFound) => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        // The declared size comes from the archive header and is not trusted
        let mut data = Vec::with_capacity(entry.size().min(MAX_PREALLOCATION) as usize);
        entry
            .read_to_end(&mut data)
            .map_err(|e| Error::io(self.origin.join(name), e))?;
        Ok(Some(data))
    }
}

/// Builds a package archive in memory.
pub struct XpiWriter {
    zip: ZipWriter<Cursor<Vec<u8>>>,
    compression: Compression,
    entries: usize,
}

impl XpiWriter {
    pub fn new(compression: Compression) -> Self {
        Self {
            zip: ZipWriter::new(Cursor::new(Vec::new())),
            compression,
            entries: 0,
        }
    }

    fn options(&self) -> SimpleFileOptions {
        SimpleFileOptions::default()
            .compression_method(self.compression.method())
            .last_modified_time(DateTime::default())
            .unix_permissions(0o644)
    }

    /// Appends one file entry. `name` uses `/` as the separator.
    pub fn add_entry(&mut self, name: &str, data: &[u8]) -> Result<()> {
        let options = self.options();
        self.zip.start_file(name, options)?;
        self.zip.write_all(data).map_err(|e| Error::io(name, e))?;
        self.entries += 1;
        Ok(())
    }

    pub fn entries(&self) -> usize {
        self.entries
    }

    /// Writes the central directory and returns the complete archive.
    pub fn finish(self) -> Result<Vec<u8>> {
        let cursor = self.zip.finish()?;
        Ok(cursor.into_inner())
    }
}
