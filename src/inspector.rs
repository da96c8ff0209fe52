//! Package inspection.
//!
//! A package is either an unpacked directory with `manifest.json` at its root
//! or an `.xpi` archive with a `manifest.json` entry. Both shapes feed the
//! same manifest resolution.
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use xpipack::inspector::inspect;
//!
//! let ext = inspect(Path::new("my-extension/"))?;
//! println!("{} {} ({})", ext.info.name, ext.info.version, ext.kind);
//! # Ok::<(), xpipack::Error>(())
//! ```

use std::fs;
use std::io::ErrorKind as IoErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::archive::XpiReader;
use crate::error::{Error, Result};
use crate::manifest::{resolve_identity, MANIFEST_FILE};
use crate::model::{ExtInfo, PackageKind};

/// Where a package lives and which shape it has.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PackageLocation {
    Directory(PathBuf),
    Archive(PathBuf),
}

impl PackageLocation {
    /// Classifies `path` as a directory or an archive file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if nothing exists at `path`.
    pub fn detect(path: &Path) -> Result<Self> {
        let metadata = fs::metadata(path).map_err(|e| match e.kind() {
            IoErrorKind::NotFound => Error::NotFound(path.to_path_buf()),
            _ => Error::io(path, e),
        })?;

        if metadata.is_dir() {
            Ok(PackageLocation::Directory(path.to_path_buf()))
        } else {
            Ok(PackageLocation::Archive(path.to_path_buf()))
        }
    }

    pub fn kind(&self) -> PackageKind {
        match self {
            PackageLocation::Directory(_) => PackageKind::Dir,
            PackageLocation::Archive(_) => PackageKind::Xpi,
        }
    }

    /// Returns the manifest text for this package.
    pub fn read_manifest(&self) -> Result<String> {
        let bytes = match self {
            PackageLocation::Directory(dir) => read_directory_manifest(dir)?,
            PackageLocation::Archive(file) => read_archive_manifest(file)?,
        };
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}

fn read_directory_manifest(dir: &Path) -> Result<Vec<u8>> {
    let manifest_path = dir.join(MANIFEST_FILE);
    debug!(path = %manifest_path.display(), "reading manifest from directory");

    fs::read(&manifest_path).map_err(|e| match e.kind() {
        IoErrorKind::NotFound => Error::MissingManifest(dir.to_path_buf()),
        _ => Error::io(&manifest_path, e),
    })
}

fn read_archive_manifest(file: &Path) -> Result<Vec<u8>> {
    debug!(path = %file.display(), "reading manifest from archive");

    let mut reader = XpiReader::open(file)?;
    reader
        .read_entry(MANIFEST_FILE)?
        .ok_or_else(|| Error::MissingManifest(file.to_path_buf()))
}

/// Inspects the package at `path` and returns its raw identity.
///
/// The id is not validated; an empty manifest still inspects successfully.
///
/// # Errors
///
/// - [`Error::NotFound`] if `path` does not exist
/// - [`Error::MissingManifest`] if there is no `manifest.json`
/// - [`Error::Parse`] if the manifest is not valid JSON
/// - [`Error::Io`] / [`Error::Archive`] on read failures
pub fn inspect(path: &Path) -> Result<ExtInfo> {
    let location = PackageLocation::detect(path)?;
    let manifest = location.read_manifest()?;
    let info = resolve_identity(&manifest)?;

    debug!(
        kind = location.kind().as_str(),
        id = %info.id,
        name = %info.name,
        version = %info.version,
        "inspected package"
    );

    Ok(ExtInfo::new(info, location.kind()))
}
