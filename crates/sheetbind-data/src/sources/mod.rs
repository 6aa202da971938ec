//! Data source implementations.
//!
//! This module contains adapters that turn workbook files and streams into
//! [`RawSheet`]s for the table path, or into generic [`RowMap`]s for the
//! typed record path.

pub mod csv;
pub mod excel;
pub mod memory;

pub use self::csv::{CsvOptions, CsvSource};
pub use excel::ExcelSource;
pub use memory::MemoryWorkbook;

use std::collections::HashMap;

use sheetbind_model::CellValue;

use crate::cell::RawSheet;
use crate::error::{DataError, Result};
use crate::normalize::normalize;

/// One generic row: column key to value
pub type RowMap = HashMap<String, CellValue>;

/// Trait for workbooks that can provide raw sheets
pub trait WorkbookReader {
    /// List available sheets in workbook order
    fn list_sheets(&self) -> Result<Vec<String>>;

    /// Get the default (first) sheet name
    fn default_sheet(&self) -> Option<String>;

    /// Read a sheet
    ///
    /// # Returns
    /// `Ok(None)` if the workbook has no sheet with this name
    fn read_sheet(&mut self, name: &str) -> Result<Option<RawSheet>>;
}

/// Lazily converts the rows of a [`RawSheet`] into [`RowMap`]s
///
/// Rows are produced for every physical index from 0 (the header) through
/// the last populated row. Each map is keyed by column letter and holds one
/// entry per column of the sheet's used width; missing cells map to
/// [`CellValue::Absent`].
#[derive(Debug, Clone)]
pub struct SheetRows {
    sheet: RawSheet,
    next_row: u32,
    width: u32,
    keys: Vec<String>,
}

impl SheetRows {
    /// Iterate over the rows of `sheet`
    pub fn new(sheet: RawSheet) -> Self {
        let width = sheet
            .rows()
            .filter_map(|(_, row)| row.cells().map(|(col, _)| col).max())
            .max()
            .map_or(0, |col| col + 1);
        let keys = (0..width).map(column_letter).collect();

        Self {
            sheet,
            next_row: 0,
            width,
            keys,
        }
    }

    /// Name of the underlying sheet
    pub fn sheet_name(&self) -> &str {
        self.sheet.name()
    }

    /// Column keys every row map carries
    pub fn keys(&self) -> &[String] {
        &self.keys
    }
}

impl Iterator for SheetRows {
    type Item = Result<RowMap>;

    fn next(&mut self) -> Option<Self::Item> {
        let last = self.sheet.last_row_num()?;
        if self.next_row > last {
            return None;
        }

        let row = self.sheet.row(self.next_row);
        let map = (0..self.width)
            .zip(&self.keys)
            .map(|(col, key)| (key.clone(), normalize(row.and_then(|r| r.cell(col)))))
            .collect();

        self.next_row += 1;
        Some(Ok(map))
    }
}

/// Convert a 0-indexed column number to letters (0=A, 25=Z, 26=AA)
pub fn column_letter(index: u32) -> String {
    let mut letters = Vec::new();
    let mut n = u64::from(index) + 1;
    while n > 0 {
        let rem = ((n - 1) % 26) as u8;
        letters.push((b'A' + rem) as char);
        n = (n - 1) / 26;
    }
    letters.iter().rev().collect()
}

/// Convert column letters to a 0-indexed number (A=0, B=1, ..., Z=25, AA=26)
pub fn column_index(letters: &str) -> Result<u32> {
    let letters = letters.trim().to_ascii_uppercase();
    if letters.is_empty() || !letters.chars().all(|c| c.is_ascii_uppercase()) {
        return Err(DataError::InvalidColumn(letters));
    }

    let mut result: u64 = 0;
    for c in letters.chars() {
        let value = u64::from(c as u32 - 'A' as u32 + 1);
        result = result * 26 + value;
        if result > u64::from(u32::MAX) {
            return Err(DataError::InvalidColumn(letters));
        }
    }
    Ok((result - 1) as u32)
}
