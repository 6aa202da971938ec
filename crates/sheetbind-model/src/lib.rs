//! sheetbind-model - Canonical values and tables
//!
//! This crate provides the library-independent types produced when
//! spreadsheet sheets are extracted: normalized cell values and tables.

pub mod table;
pub mod value;

pub use table::{Column, Extraction, NamedTable, Table};
pub use value::{format_number, CellValue, ErrorCode};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
