//! Configuration file handling.
//!
//! This module provides loading and saving of xpipack configuration
//! from a TOML file.
//!
//! # Configuration Location
//!
//! The configuration file is stored at:
//! - Linux: `~/.config/xpipack/config.toml`
//! - macOS: `~/Library/Application Support/xpipack/config.toml`
//! - Windows: `%APPDATA%\xpipack\config.toml`
//!
//! # Example Configuration
//!
//! ```toml
//! output_dir = "/home/me/dist"
//! compression = "deflated"
//! default_format = "table"
//! ```

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::archive::Compression;

/// Application configuration.
///
/// # Example
///
/// ```no_run
/// use xpipack::Config;
///
/// // Load from file (or use defaults if file doesn't exist)
/// let config = Config::load().unwrap();
///
/// println!("Compression: {:?}", config.compression);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Where `build` writes packages when no `--output` flag is given.
    ///
    /// Default: the current working directory
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_dir: Option<PathBuf>,

    /// Compression for archive entries.
    ///
    /// Valid values: "deflated", "stored"
    /// Default: "deflated"
    pub compression: Compression,

    /// Output format for `info` when no `--format` flag is given.
    ///
    /// Valid values: "table", "json"
    /// Default: "table"
    pub default_format: DefaultFormat,
}

/// Serialized name of the default `info` format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DefaultFormat {
    #[default]
    Table,
    Json,
}

impl DefaultFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            DefaultFormat::Table => "table",
            DefaultFormat::Json => "json",
        }
    }
}

impl Config {
    /// Loads configuration from the config file.
    ///
    /// If the config file doesn't exist, returns default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be read or parsed.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path())
    }

    /// Loads configuration from an explicit path, defaulting if it is absent.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Saves the configuration to the config file.
    ///
    /// Creates the parent directory if it doesn't exist.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path())
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Returns the path to the configuration file.
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("xpipack")
            .join("config.toml")
    }

    /// Generates a string containing the default configuration.
    pub fn generate_default_config() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_config_default() {
        let config = Config::default();

        assert_eq!(config.output_dir, None);
        assert_eq!(config.compression, Compression::Deflated);
        assert_eq!(config.default_format, DefaultFormat::Table);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: Config = toml::from_str("compression = \"stored\"").unwrap();

        assert_eq!(config.compression, Compression::Stored);
        assert_eq!(config.default_format, DefaultFormat::Table);
        assert!(config.output_dir.is_none());
    }

    #[test]
    fn test_unknown_compression_rejected() {
        assert!(toml::from_str::<Config>("compression = \"lzma\"").is_err());
    }

    #[test]
    fn test_load_missing_file_is_default() {
        let tmp = TempDir::new().unwrap();
        let config = Config::load_from(&tmp.path().join("config.toml")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_save_then_load() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("nested").join("config.toml");
        let config = Config {
            output_dir: Some(PathBuf::from("/tmp/dist")),
            compression: Compression::Stored,
            default_format: DefaultFormat::Json,
        };

        config.save_to(&path).unwrap();
        assert_eq!(Config::load_from(&path).unwrap(), config);
    }

    #[test]
    fn test_generate_default_config() {
        let text = Config::generate_default_config();
        assert!(text.contains("compression = \"deflated\""));
        assert!(text.contains("default_format = \"table\""));
    }
}
