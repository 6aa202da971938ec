//! # sheetbind-data
//!
//! Sheet extraction and typed record binding for spreadsheet workbooks.
//!
//! ## Features
//!
//! - **Excel Support**: Read `.xls`, `.xlsx` and `.xlsm` workbooks using `calamine`
//! - **Tables**: Extract one or many sheets into header-named tables, with
//!   optional column projection
//! - **Records**: Bind rows to plain structs through static field tables
//! - **CSV rows**: Feed the record binder from CSV streams
//!
//! ## Example
//!
//! ```rust,ignore
//! use sheetbind_data::{DataEngine, SheetRequest};
//!
//! let result = DataEngine::read_tables(
//!     "report.xlsx",
//!     &[SheetRequest::new("People"), SheetRequest::new("Orders").with_columns([0, 2])],
//! )?;
//!
//! let people = result.table("People").unwrap();
//! println!("{:?}", people.column_names());
//! ```

pub mod assembler;
pub mod binder;
pub mod cell;
pub mod error;
pub mod extractor;
pub mod header;
pub mod normalize;
pub mod sources;

use std::io::Read;
use std::path::Path;

// Re-exports
pub use assembler::WorkbookAssembler;
pub use binder::{Coerce, CoercionError, FieldBinding, FromRow, RecordBinder, Records};
pub use cell::{CellKind, RawRow, RawSheet, RawValue};
pub use error::{DataError, ErrorKind, Result};
pub use extractor::{SheetExtractor, SheetRequest};
pub use sheetbind_model::{CellValue, Column, ErrorCode, Extraction, NamedTable, Table};
pub use sources::{
    CsvOptions, CsvSource, ExcelSource, MemoryWorkbook, RowMap, SheetRows, WorkbookReader,
};

/// Data engine entry points
pub struct DataEngine;

impl DataEngine {
    /// Extract the requested sheets of a workbook file
    ///
    /// One request yields [`Extraction::Single`], several yield
    /// [`Extraction::Multiple`] in request order.
    pub fn read_tables(path: impl AsRef<Path>, requests: &[SheetRequest]) -> Result<Extraction> {
        WorkbookAssembler::assemble(path, requests)
    }

    /// Extract one whole sheet of a workbook file
    ///
    /// # Arguments
    /// * `path` - Path to the workbook
    /// * `sheet` - Sheet name (optional, uses first sheet if None)
    pub fn read_table(path: impl AsRef<Path>, sheet: Option<&str>) -> Result<Table> {
        let path = path.as_ref();
        assembler::check_extension(path)?;

        let mut workbook = ExcelSource::open(path)?;
        Self::read_table_from(&mut workbook, sheet)
    }

    /// Extract one whole sheet from an already-open workbook
    ///
    /// With no sheet name the reader's default (first) sheet is used.
    pub fn read_table_from<R: WorkbookReader + ?Sized>(
        reader: &mut R,
        sheet: Option<&str>,
    ) -> Result<Table> {
        let sheet_name = match sheet {
            Some(s) => s.to_string(),
            None => reader
                .default_sheet()
                .ok_or_else(|| DataError::SheetNotFound("No sheets in workbook".to_string()))?,
        };

        match WorkbookAssembler::assemble_from(reader, &[SheetRequest::new(sheet_name)])? {
            Extraction::Single(table) => Ok(table),
            Extraction::Multiple(mut tables) => tables
                .pop()
                .map(|named| named.table)
                .ok_or(DataError::NoSheetRequests),
        }
    }

    /// Bind the rows of one sheet of a workbook stream to records
    ///
    /// The stream is read fully and parsed; records are then produced
    /// lazily. Rows are keyed by column letter (`A`, `B`, ...), and the
    /// first row is skipped as the header.
    pub fn parse_sheet<T, R>(stream: R, sheet: &str) -> Result<Records<T, SheetRows>>
    where
        T: FromRow,
        R: Read,
    {
        if sheet.is_empty() {
            return Err(DataError::EmptySheetName);
        }

        let mut source = ExcelSource::from_reader(stream)?;
        let rows = source.row_maps(sheet)?;
        Ok(RecordBinder::bind(rows))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default)]
    struct Row {
        first: String,
    }

    impl FromRow for Row {
        fn bindings() -> Vec<FieldBinding<Self>> {
            field_bindings!(Row { first => "A" })
        }
    }

    #[test]
    fn test_parse_sheet_rejects_empty_name() {
        let result = DataEngine::parse_sheet::<Row, _>(&b""[..], "");
        assert!(matches!(result, Err(DataError::EmptySheetName)));
    }

    #[test]
    fn test_parse_sheet_rejects_garbage_stream() {
        let result = DataEngine::parse_sheet::<Row, _>(&b"not a workbook"[..], "Sheet1");
        let err = result.err().unwrap();
        assert_eq!(err.kind(), ErrorKind::Io);
    }

    #[test]
    fn test_read_table_from_uses_default_sheet() {
        let mut first = RawSheet::new("First");
        first.set_cell(0, 0, RawValue::text("Id"));
        first.set_cell(1, 0, RawValue::number(1.0));
        let mut second = RawSheet::new("Second");
        second.set_cell(0, 0, RawValue::text("Other"));

        let mut workbook = MemoryWorkbook::new().with_sheet(first).with_sheet(second);

        let table = DataEngine::read_table_from(&mut workbook, None).unwrap();
        assert_eq!(table.column_names(), vec!["Id"]);
        assert_eq!(table.rows, vec![vec![CellValue::Number(1.0)]]);

        let named = DataEngine::read_table_from(&mut workbook, Some("Second")).unwrap();
        assert_eq!(named.column_names(), vec!["Other"]);
    }

    #[test]
    fn test_read_table_from_empty_workbook() {
        let mut workbook = MemoryWorkbook::new();
        let err = DataEngine::read_table_from(&mut workbook, None).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);
    }

    #[test]
    fn test_read_table_checks_extension() {
        let err = DataEngine::read_table("people.csv", None).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Format);
    }
}
