//! Sheet extraction - one sheet to one [`Table`].

use sheetbind_model::{CellValue, Column, Table};
use tracing::debug;

use crate::cell::RawSheet;
use crate::error::{DataError, Result};
use crate::header::resolve_columns;
use crate::normalize::normalize;
use crate::sources::WorkbookReader;

/// A request to extract one sheet, optionally projected onto a column subset
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetRequest {
    /// Sheet name (must be non-empty)
    pub sheet: String,
    /// Physical column indexes to keep, in output order; `None` keeps all
    pub columns: Option<Vec<u32>>,
}

impl SheetRequest {
    /// Request every column of a sheet
    pub fn new(sheet: impl Into<String>) -> Self {
        Self {
            sheet: sheet.into(),
            columns: None,
        }
    }

    /// Restrict the request to these physical column indexes
    pub fn with_columns(mut self, columns: impl IntoIterator<Item = u32>) -> Self {
        self.columns = Some(columns.into_iter().collect());
        self
    }
}

/// Extracts tables from the sheets of a workbook
pub struct SheetExtractor;

impl SheetExtractor {
    /// Extract the sheet named by `request`
    ///
    /// Fails with [`DataError::SheetNotFound`] before reading any row when
    /// the workbook has no such sheet.
    pub fn extract<R: WorkbookReader + ?Sized>(
        reader: &mut R,
        request: &SheetRequest,
    ) -> Result<Table> {
        let sheet = reader
            .read_sheet(&request.sheet)?
            .ok_or_else(|| DataError::SheetNotFound(request.sheet.clone()))?;

        let columns = resolve_columns(&sheet, request.columns.as_deref())?;
        Ok(extract_rows(&sheet, columns))
    }
}

/// Walk the data rows of a sheet into a table
///
/// Rows run from physical index 1 through the last populated row. A row
/// that does not physically exist yields a record of absent values, so the
/// row count always equals the last row index.
pub fn extract_rows(sheet: &RawSheet, columns: Vec<Column>) -> Table {
    let last = sheet.last_row_num().unwrap_or(0);
    let mut table = Table::new(columns);

    for idx in 1..=last {
        let record = match sheet.row(idx) {
            Some(row) => table
                .columns
                .iter()
                .map(|col| normalize(row.cell(col.source_index)))
                .collect(),
            None => vec![CellValue::Absent; table.column_count()],
        };
        table.push_row(record);
    }

    debug!(
        "Sheet '{}': extracted {} row(s) x {} column(s)",
        sheet.name(),
        table.row_count(),
        table.column_count()
    );

    table
}
