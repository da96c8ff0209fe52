//! Error types for package inspection and building.

use std::path::PathBuf;

use zip::result::ZipError;

/// Result type for xpipack operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while inspecting or building a package.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Input path does not exist.
    #[error("path not found: {}", .0.display())]
    NotFound(PathBuf),

    /// Manifest text is not valid JSON.
    #[error("failed to parse manifest: {0}")]
    Parse(#[from] serde_json::Error),

    /// Archive contains no `manifest.json` entry.
    #[error("manifest.json not found in {}", .0.display())]
    MissingManifest(PathBuf),

    /// No identifier could be derived from the manifest.
    #[error("{}", invalid_identifier_message(.id, .name))]
    InvalidIdentifier { id: String, name: String },

    /// I/O error reading or writing a file.
    #[error("I/O error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Directory walk failed part way.
    #[error("failed to walk source directory: {0}")]
    Walk(#[from] walkdir::Error),

    /// Archive container could not be read or written.
    #[error("archive error: {0}")]
    Archive(#[from] ZipError),
}

/// Coarse classification of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    ParseError,
    MissingManifest,
    InvalidIdentifier,
    IoError,
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::NotFound(_) => ErrorKind::NotFound,
            Error::Parse(_) => ErrorKind::ParseError,
            Error::MissingManifest(_) => ErrorKind::MissingManifest,
            Error::InvalidIdentifier { .. } => ErrorKind::InvalidIdentifier,
            Error::Io { .. } | Error::Walk(_) | Error::Archive(_) => ErrorKind::IoError,
        }
    }
}

fn invalid_identifier_message(id: &str, name: &str) -> String {
    if !id.is_empty() {
        format!("invalid extension ID: {id:?}")
    } else if !name.is_empty() {
        format!("no extension ID and name {name:?} does not form a valid ID")
    } else {
        "manifest has neither an extension ID nor a name".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_classification() {
        assert_eq!(Error::NotFound(PathBuf::from("x")).kind(), ErrorKind::NotFound);
        assert_eq!(
            Error::MissingManifest(PathBuf::from("a.xpi")).kind(),
            ErrorKind::MissingManifest
        );
        assert_eq!(Error::Archive(ZipError::FileNotFound).kind(), ErrorKind::IoError);

        let parse = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        assert_eq!(Error::from(parse).kind(), ErrorKind::ParseError);
    }

    #[test]
    fn test_invalid_identifier_messages() {
        let err = Error::InvalidIdentifier {
            id: "not-an-id".to_string(),
            name: "foo".to_string(),
        };
        assert_eq!(err.to_string(), "invalid extension ID: \"not-an-id\"");

        let err = Error::InvalidIdentifier {
            id: String::new(),
            name: String::new(),
        };
        assert!(err.to_string().contains("neither"));
    }
}
