//! sheetbind CLI - Command-line interface library
//!
//! This library provides the CLI functionality for sheetbind:
//! - Sheets: List the sheets of a workbook
//! - Extract: Extract sheets as tables (JSON or text)
//! - Records: Dump the letter-keyed rows a record binder sees
//!
//! # Library Usage
//!
//! ```ignore
//! use sheetbind_cli::{extract_command, parse_sheet_arg, OutputSettings};
//!
//! let request = parse_sheet_arg("People:2,0")?;
//! extract_command(Path::new("book.xlsx"), &[request], &OutputSettings::default())?;
//! ```
//!
//! # Binary Usage
//!
//! ```bash
//! # List sheets
//! sheetbind sheets book.xlsx
//!
//! # Extract two sheets, the second projected onto columns C and A
//! sheetbind extract book.xlsx --sheet People --sheet Orders:2,0
//!
//! # Run a job file
//! sheetbind extract book.xlsx --config job.toml --format text
//! ```

pub mod app;
pub mod config;

// Re-export main entry point and types
pub use app::{
    extract_command, extraction_to_json, extraction_to_text, parse_sheet_arg, records_command,
    resolve_job, run_cli, sheets_command,
};
pub use config::{JobConfig, OutputFormat, OutputSettings, SheetSettings};
