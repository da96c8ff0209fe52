//! Packaging an unpacked extension directory into an `.xpi`.
//!
//! The archive is assembled in memory. It is only written once the source
//! manifest has produced a valid identifier, and the output file is named
//! `<identifier>.xpi`.
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use xpipack::builder::build_package;
//!
//! #[tokio::main]
//! async fn main() -> xpipack::Result<()> {
//!     let written = build_package(Path::new("my-extension"), None).await?;
//!     println!("Wrote {}", written.display());
//!     Ok(())
//! }
//! ```

use futures::stream::{self, StreamExt};
use std::io;
use std::path::{Component, Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::archive::{Compression, XpiWriter};
use crate::error::{Error, Result};
use crate::inspector::{inspect, PackageLocation};
use crate::manifest::derive_identifier;

/// File extension of built packages.
pub const PACKAGE_EXTENSION: &str = "xpi";

/// Number of source files read ahead of the archive writer.
const DEFAULT_READ_AHEAD: usize = 8;

/// Returns the package file name for a validated identifier.
pub fn package_file_name(identifier: &str) -> String {
    format!("{}.{}", identifier, PACKAGE_EXTENSION)
}

/// Packaging options.
#[derive(Debug, Clone)]
pub struct PackageBuilder {
    compression: Compression,
    read_ahead: usize,
}

impl Default for PackageBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl PackageBuilder {
    pub fn new() -> Self {
        Self {
            compression: Compression::default(),
            read_ahead: DEFAULT_READ_AHEAD,
        }
    }

    pub fn with_compression(mut self, compression: Compression) -> Self {
        self.compression = compression;
        self
    }

    /// Sets how many file reads may be in flight at once. Zero is treated as one.
    pub fn with_read_ahead(mut self, read_ahead: usize) -> Self {
        self.read_ahead = read_ahead.max(1);
        self
    }

    /// Builds `source_dir` into `<output_dir>/<identifier>.xpi`.
    ///
    /// `output_dir` defaults to the current working directory and must
    /// already exist. An existing file at the output path is replaced.
    pub async fn build(&self, source_dir: &Path, output_dir: Option<&Path>) -> Result<PathBuf> {
        self.build_with_progress(source_dir, output_dir, |_| {}).await
    }

    /// Like [`build`](Self::build), calling `on_entry` with each entry name
    /// as it is added to the archive.
    pub async fn build_with_progress<F>(
        &self,
        source_dir: &Path,
        output_dir: Option<&Path>,
        mut on_entry: F,
    ) -> Result<PathBuf>
    where
        F: FnMut(&str),
    {
        if let PackageLocation::Archive(path) = PackageLocation::detect(source_dir)? {
            return Err(Error::io(
                path,
                io::Error::new(io::ErrorKind::InvalidInput, "source is not a directory"),
            ));
        }

        let payload = self.assemble(source_dir, &mut on_entry).await?;

        let ext = inspect(source_dir)?;
        let identifier = match derive_identifier(&ext.info) {
            Some(identifier) => identifier,
            None => {
                warn!(
                    id = %ext.info.id,
                    name = %ext.info.name,
                    "discarding archive, no valid identifier"
                );
                return Err(Error::InvalidIdentifier {
                    id: ext.info.id,
                    name: ext.info.name,
                });
            }
        };

        let output_dir = match output_dir {
            Some(dir) => dir.to_path_buf(),
            None => std::env::current_dir().map_err(|e| Error::io(".", e))?,
        };
        let output_path = output_dir.join(package_file_name(&identifier));

        write_replacing(&output_path, &payload).await?;
        info!(
            path = %output_path.display(),
            bytes = payload.len(),
            "wrote package"
        );

        Ok(output_path)
    }

    /// Walks `source_dir` depth-first, sorted by file name within each
    /// directory, and returns the finished archive bytes.
    async fn assemble<F>(&self, source_dir: &Path, on_entry: &mut F) -> Result<Vec<u8>>
    where
        F: FnMut(&str),
    {
        let files = WalkDir::new(source_dir)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|entry| match entry {
                Ok(entry) if entry.file_type().is_file() => Some(Ok(entry.into_path())),
                Ok(_) => None,
                Err(e) => Some(Err(Error::from(e))),
            });

        let mut reads = stream::iter(files)
            .map(|entry| async move {
                let path = entry?;
                let data = tokio::fs::read(&path)
                    .await
                    .map_err(|e| Error::io(&path, e))?;
                Ok::<_, Error>((path, data))
            })
            .buffered(self.read_ahead);

        let mut writer = XpiWriter::new(self.compression);
        while let Some(read) = reads.next().await {
            let (path, data) = read?;
            let name = entry_name(source_dir, &path);
            debug!(entry = %name, bytes = data.len(), "adding entry");
            writer.add_entry(&name, &data)?;
            on_entry(&name);
        }

        debug!(entries = writer.entries(), "archive assembled");
        writer.finish()
    }
}

/// Builds `source_dir` with default options. See [`PackageBuilder::build`].
pub async fn build_package(source_dir: &Path, output_dir: Option<&Path>) -> Result<PathBuf> {
    PackageBuilder::new().build(source_dir, output_dir).await
}

/// Archive entry name for `path`: relative to `root`, `/`-separated.
fn entry_name(root: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);
    relative
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// Writes `data` to a temporary sibling of `path`, then renames it over `path`.
async fn write_replacing(path: &Path, data: &[u8]) -> Result<()> {
    let temp_name = format!(
        ".{}.{}.tmp",
        path.file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_default(),
        std::process::id()
    );
    let temp_path = path.with_file_name(temp_name);

    if let Err(e) = tokio::fs::write(&temp_path, data).await {
        let _ = tokio::fs::remove_file(&temp_path).await;
        return Err(Error::io(&temp_path, e));
    }

    if let Err(e) = tokio::fs::rename(&temp_path, path).await {
        let _ = tokio::fs::remove_file(&temp_path).await;
        return Err(Error::io(path, e));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::archive::XpiReader;
    use crate::error::ErrorKind;
    use std::fs;
    use tempfile::TempDir;

    fn source_with_manifest(manifest: &str) -> TempDir {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("manifest.json"), manifest).unwrap();
        tmp
    }

    #[test]
    fn test_package_file_name() {
        assert_eq!(package_file_name("@myext"), "@myext.xpi");
        assert_eq!(
            package_file_name("{11111111-1111-1111-1111-111111111111}"),
            "{11111111-1111-1111-1111-111111111111}.xpi"
        );
    }

    #[test]
    fn test_entry_name_uses_forward_slashes() {
        let root = Path::new("src");
        let path = root.join("icons").join("48.png");
        assert_eq!(entry_name(root, &path), "icons/48.png");
        assert_eq!(entry_name(root, &root.join("manifest.json")), "manifest.json");
    }

    #[tokio::test]
    async fn test_build_nested_entries_in_order() {
        let src = source_with_manifest(r#"{"name":"nested","version":"1"}"#);
        fs::create_dir_all(src.path().join("icons")).unwrap();
        fs::create_dir_all(src.path().join("_locales/en")).unwrap();
        fs::write(src.path().join("icons/16.png"), [1u8, 2, 3]).unwrap();
        fs::write(src.path().join("_locales/en/messages.json"), "{}").unwrap();
        fs::write(src.path().join("background.js"), "// bg").unwrap();
        let out = TempDir::new().unwrap();

        let mut seen = Vec::new();
        let written = PackageBuilder::new()
            .with_read_ahead(2)
            .build_with_progress(src.path(), Some(out.path()), |name| {
                seen.push(name.to_string())
            })
            .await
            .unwrap();

        assert_eq!(written, out.path().join("@nested.xpi"));
        let expected = vec![
            "_locales/en/messages.json",
            "background.js",
            "icons/16.png",
            "manifest.json",
        ];
        assert_eq!(seen, expected);

        let reader = XpiReader::open(&written).unwrap();
        assert_eq!(reader.entry_names(), expected);
    }

    #[tokio::test]
    async fn test_build_orders_by_name_within_directory() {
        let src = source_with_manifest(r#"{"name":"order"}"#);
        fs::create_dir_all(src.path().join("a")).unwrap();
        fs::write(src.path().join("a/x.js"), "x").unwrap();
        fs::write(src.path().join("a-b.js"), "ab").unwrap();
        let out = TempDir::new().unwrap();

        let written = build_package(src.path(), Some(out.path())).await.unwrap();

        // "a" sorts before "a-b.js" as a directory name, so its children come first
        let reader = XpiReader::open(&written).unwrap();
        assert_eq!(reader.entry_names(), vec!["a/x.js", "a-b.js", "manifest.json"]);
    }

    #[tokio::test]
    async fn test_build_is_reproducible() {
        let src = source_with_manifest(r#"{"applications":{"gecko":{"id":"repro@example.com"}}}"#);
        fs::write(src.path().join("a.js"), "a").unwrap();
        let out_a = TempDir::new().unwrap();
        let out_b = TempDir::new().unwrap();

        let a = build_package(src.path(), Some(out_a.path())).await.unwrap();
        let b = build_package(src.path(), Some(out_b.path())).await.unwrap();

        assert_eq!(fs::read(a).unwrap(), fs::read(b).unwrap());
    }

    #[tokio::test]
    async fn test_build_overwrites_existing_output() {
        let src = source_with_manifest(r#"{"name":"over"}"#);
        let out = TempDir::new().unwrap();
        let target = out.path().join("@over.xpi");
        fs::write(&target, b"stale").unwrap();

        build_package(src.path(), Some(out.path())).await.unwrap();

        let reader = XpiReader::open(&target).unwrap();
        assert_eq!(reader.len(), 1);
        assert_eq!(fs::read_dir(out.path()).unwrap().count(), 1);
    }

    #[tokio::test]
    async fn test_build_invalid_explicit_id_writes_nothing() {
        let src = source_with_manifest(
            r#"{"browser_specific_settings":{"gecko":{"id":"not-an-id"}},"name":"foo"}"#,
        );
        let out = TempDir::new().unwrap();

        let err = build_package(src.path(), Some(out.path())).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidIdentifier);
        assert_eq!(fs::read_dir(out.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_build_missing_manifest() {
        let src = TempDir::new().unwrap();
        fs::write(src.path().join("content.js"), "x").unwrap();
        let out = TempDir::new().unwrap();

        let err = build_package(src.path(), Some(out.path())).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingManifest);
        assert_eq!(fs::read_dir(out.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_build_rejects_file_source() {
        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join("ext.xpi");
        fs::write(&file, b"").unwrap();

        let err = build_package(&file, Some(tmp.path())).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::IoError);
    }

    #[tokio::test]
    async fn test_build_missing_source() {
        let tmp = TempDir::new().unwrap();
        let err = build_package(&tmp.path().join("gone"), Some(tmp.path()))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_build_missing_output_dir() {
        let src = source_with_manifest(r#"{"name":"nowhere"}"#);
        let out = TempDir::new().unwrap();
        let missing = out.path().join("does/not/exist");

        let err = build_package(src.path(), Some(&missing)).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::IoError);
        assert!(!missing.exists());
    }
}
