mod cli;
mod json;

pub use cli::print_cli_table;
pub use json::{print_json, render_json};

use crate::manifest::derive_identifier;
use crate::model::ExtInfo;
use anyhow::Result;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Output format for inspection results
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable table format
    Table,
    /// JSON format for programmatic use
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "table" => Ok(OutputFormat::Table),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("Unknown format: {}. Use 'table' or 'json'", s)),
        }
    }
}

/// What `info` reports about one package.
#[derive(Debug, Clone, Serialize)]
pub struct InfoReport {
    pub path: PathBuf,
    #[serde(flatten)]
    pub ext: ExtInfo,
    /// Identifier the package would be built under, if one can be derived.
    pub identifier: Option<String>,
}

impl InfoReport {
    pub fn new(path: &Path, ext: ExtInfo) -> Self {
        let identifier = derive_identifier(&ext.info);
        Self {
            path: path.to_path_buf(),
            ext,
            identifier,
        }
    }
}

pub fn print_report(report: &InfoReport, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Table => print_cli_table(report),
        OutputFormat::Json => print_json(report),
    }
}
