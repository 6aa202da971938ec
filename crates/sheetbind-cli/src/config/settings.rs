//! Job configuration structures.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use sheetbind_data::SheetRequest;

/// Output format for extracted data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// JSON output for tool consumption
    #[default]
    Json,
    /// Tab-separated text for humans
    Text,
}

/// Top-level job configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct JobConfig {
    /// Output settings
    pub output: OutputSettings,
    /// Sheets to extract, in output order
    pub sheets: Vec<SheetSettings>,
}

impl JobConfig {
    /// Parse a job configuration from a TOML string
    pub fn from_toml_str(toml_str: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(toml_str)
    }

    /// Load a job configuration file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::from_toml_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Sheet requests described by the `[[sheets]]` entries
    pub fn requests(&self) -> Vec<SheetRequest> {
        self.sheets.iter().map(SheetSettings::to_request).collect()
    }
}

/// Output settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSettings {
    /// Output format
    pub format: OutputFormat,
    /// Pretty-print JSON
    pub pretty: bool,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            format: OutputFormat::Json,
            pretty: true,
        }
    }
}

/// One `[[sheets]]` entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SheetSettings {
    /// Sheet name
    pub name: String,
    /// Physical column indexes to keep (all columns when omitted)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub columns: Option<Vec<u32>>,
}

impl SheetSettings {
    /// Convert to a sheet request
    pub fn to_request(&self) -> SheetRequest {
        let request = SheetRequest::new(self.name.clone());
        match &self.columns {
            Some(columns) => request.with_columns(columns.iter().copied()),
            None => request,
        }
    }
}
