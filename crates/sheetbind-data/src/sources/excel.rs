//! Excel workbook data source using calamine.
//!
//! Supports `.xls`, `.xlsx`, `.xlsm` (and anything else calamine detects when
//! reading from a stream). Values come from `worksheet_range`, formula text
//! from `worksheet_formula`; a cell with formula text becomes a
//! [`RawValue::Formula`] wrapping the value calamine cached for it.

use std::fs::File;
use std::io::{BufReader, Cursor, Read, Seek};
use std::path::Path;

use calamine::{
    open_workbook_auto, open_workbook_auto_from_rs, Data, ExcelDateTime, ExcelDateTimeType, Range,
    Reader, Sheets,
};
use sheetbind_model::ErrorCode;
use tracing::debug;

use crate::cell::{RawSheet, RawValue};
use crate::error::{DataError, Result};
use crate::normalize::parse_datetime_text;
use crate::sources::{SheetRows, WorkbookReader};

/// Days between the 1900 and 1904 date system epochs
const EPOCH_1904_OFFSET_DAYS: f64 = 1462.0;

/// Excel workbook data source
pub struct ExcelSource<RS> {
    /// Open workbook
    workbook: Sheets<RS>,
    /// Sheet names in workbook order
    sheet_names: Vec<String>,
}

impl ExcelSource<BufReader<File>> {
    /// Open an Excel workbook from a file path
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let path_str = path.display().to_string();

        if !path.exists() {
            return Err(DataError::FileNotFound(path_str));
        }

        let workbook = open_workbook_auto(path)
            .map_err(|e| DataError::WorkbookOpen(format!("{}: {}", path_str, e)))?;

        debug!("Opened workbook {}", path_str);
        Ok(Self::from_sheets(workbook))
    }
}

impl ExcelSource<Cursor<Vec<u8>>> {
    /// Open an Excel workbook from an already-open stream
    ///
    /// The stream is read to the end; the format is detected from content.
    pub fn from_reader<R: Read>(mut reader: R) -> Result<Self> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;

        let workbook = open_workbook_auto_from_rs(Cursor::new(bytes))
            .map_err(|e| DataError::WorkbookOpen(e.to_string()))?;

        Ok(Self::from_sheets(workbook))
    }
}

impl<RS: Read + Seek> ExcelSource<RS> {
    fn from_sheets(workbook: Sheets<RS>) -> Self {
        let sheet_names = workbook.sheet_names().to_vec();
        Self {
            workbook,
            sheet_names,
        }
    }

    /// Generic row maps of a sheet, keyed by column letter, header included
    pub fn row_maps(&mut self, sheet: &str) -> Result<SheetRows> {
        let raw = self
            .read_sheet(sheet)?
            .ok_or_else(|| DataError::SheetNotFound(sheet.to_string()))?;
        Ok(SheetRows::new(raw))
    }

    /// Build a raw sheet from calamine's value and formula ranges
    fn build_sheet(name: &str, values: &Range<Data>, formulas: Option<&Range<String>>) -> RawSheet {
        let mut sheet = RawSheet::new(name);

        let (row0, col0) = values.start().unwrap_or_default();
        for (row, col, data) in values.used_cells() {
            if let Some(value) = Self::convert_cell(data) {
                sheet.set_cell(row0 + row as u32, col0 + col as u32, value);
            }
        }

        if let Some(formulas) = formulas {
            let (row0, col0) = formulas.start().unwrap_or_default();
            for (row, col, expression) in formulas.used_cells() {
                if expression.is_empty() {
                    continue;
                }
                let (row, col) = (row0 + row as u32, col0 + col as u32);
                let cached = sheet
                    .cell(row, col)
                    .cloned()
                    .unwrap_or_else(|| RawValue::Blank(String::new()));
                sheet.set_cell(row, col, RawValue::formula(expression.clone(), cached));
            }
        }

        sheet
    }

    /// Convert a calamine cell to a raw value
    ///
    /// Returns `None` for empty cells. calamine drops cells that hold no
    /// value, styled blanks such as `<c r="B2" s="1"/>` included, so a blank
    /// cell cannot be told apart from a missing one and both read as
    /// absent.
    ///
    /// Date serials from 1904-system workbooks are rebased onto the 1900
    /// system.
    fn convert_cell(cell: &Data) -> Option<RawValue> {
        let value = match cell {
            Data::Empty => return None,
            Data::String(s) => RawValue::Text(s.clone()),
            Data::Float(f) => RawValue::number(*f),
            Data::Int(i) => RawValue::number(*i as f64),
            Data::Bool(b) => RawValue::Boolean(*b),
            Data::Error(e) => RawValue::Error(ErrorCode::from_code(&e.to_string())),
            Data::DateTime(dt) => RawValue::date_serial(Self::serial_1900(dt)),
            Data::DateTimeIso(s) => match parse_datetime_text(s) {
                Some(dt) => RawValue::Date(dt),
                None => RawValue::Text(s.clone()),
            },
            Data::DurationIso(s) => RawValue::Text(s.clone()),
        };
        Some(value)
    }

    /// Serial of a calamine date-time in the 1900 date system
    ///
    /// calamine only exposes the workbook's 1904 flag through equality, so
    /// the value is compared against its 1900-system twin.
    fn serial_1900(dt: &ExcelDateTime) -> f64 {
        let kind = if dt.is_duration() {
            ExcelDateTimeType::TimeDelta
        } else {
            ExcelDateTimeType::DateTime
        };

        let serial = dt.as_f64();
        if *dt == ExcelDateTime::new(serial, kind, false) {
            serial
        } else {
            serial + EPOCH_1904_OFFSET_DAYS
        }
    }
}

impl<RS: Read + Seek> WorkbookReader for ExcelSource<RS> {
    fn list_sheets(&self) -> Result<Vec<String>> {
        Ok(self.sheet_names.clone())
    }

    fn default_sheet(&self) -> Option<String> {
        self.sheet_names.first().cloned()
    }

    fn read_sheet(&mut self, name: &str) -> Result<Option<RawSheet>> {
        if !self.sheet_names.iter().any(|s| s == name) {
            return Ok(None);
        }

        let values = self.workbook.worksheet_range(name)?;
        let formulas = match self.workbook.worksheet_formula(name) {
            Ok(formulas) => Some(formulas),
            Err(e) => {
                debug!("Sheet '{}': formulas unavailable: {}", name, e);
                None
            }
        };

        let sheet = Self::build_sheet(name, &values, formulas.as_ref());
        debug!(
            "Sheet '{}': last row {:?}",
            name,
            sheet.last_row_num()
        );
        Ok(Some(sheet))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sheetbind_model::CellValue;

    type FileSource = ExcelSource<BufReader<File>>;

    #[test]
    fn test_convert_cell_scalars() {
        assert_eq!(FileSource::convert_cell(&Data::Empty), None);
        assert_eq!(
            FileSource::convert_cell(&Data::String("hello".to_string())),
            Some(RawValue::text("hello"))
        );
        assert_eq!(
            FileSource::convert_cell(&Data::Int(42)),
            Some(RawValue::number(42.0))
        );
        assert_eq!(
            FileSource::convert_cell(&Data::Float(3.5)),
            Some(RawValue::number(3.5))
        );
        assert_eq!(
            FileSource::convert_cell(&Data::Bool(true)),
            Some(RawValue::Boolean(true))
        );
    }

    #[test]
    fn test_convert_cell_error_code() {
        assert_eq!(
            FileSource::convert_cell(&Data::Error(calamine::CellErrorType::Div0)),
            Some(RawValue::Error(ErrorCode::Div0))
        );
        assert_eq!(
            FileSource::convert_cell(&Data::Error(calamine::CellErrorType::NA)),
            Some(RawValue::Error(ErrorCode::NA))
        );
    }

    #[test]
    fn test_convert_cell_date_systems() {
        let date_1900 = ExcelDateTime::new(45352.5, ExcelDateTimeType::DateTime, false);
        assert_eq!(
            FileSource::convert_cell(&Data::DateTime(date_1900)),
            Some(RawValue::date_serial(45352.5))
        );

        let date_1904 = ExcelDateTime::new(0.0, ExcelDateTimeType::DateTime, true);
        let converted = FileSource::convert_cell(&Data::DateTime(date_1904));
        assert_eq!(converted, Some(RawValue::date_serial(1462.0)));
        assert_eq!(
            crate::normalize::normalize(converted.as_ref()),
            CellValue::DateTime(
                chrono::NaiveDate::from_ymd_opt(1904, 1, 1)
                    .unwrap()
                    .and_hms_opt(0, 0, 0)
                    .unwrap()
            )
        );
    }

    #[test]
    fn test_convert_cell_iso_strings() {
        let date = FileSource::convert_cell(&Data::DateTimeIso("2024-03-01T10:00:00".to_string()));
        assert!(matches!(date, Some(RawValue::Date(_))));

        let duration = FileSource::convert_cell(&Data::DurationIso("PT1H".to_string()));
        assert_eq!(duration, Some(RawValue::text("PT1H")));
    }

    #[test]
    fn test_build_sheet_wraps_formulas() {
        let mut values: Range<Data> = Range::new((0, 0), (1, 1));
        values.set_value((0, 0), Data::String("X".to_string()));
        values.set_value((0, 1), Data::String("Double".to_string()));
        values.set_value((1, 0), Data::Float(4.0));
        values.set_value((1, 1), Data::Float(8.0));

        let mut formulas: Range<String> = Range::new((0, 0), (1, 1));
        formulas.set_value((1, 1), "A2*2".to_string());

        let sheet = FileSource::build_sheet("Calc", &values, Some(&formulas));
        assert_eq!(
            sheet.cell(1, 1),
            Some(&RawValue::formula("A2*2", RawValue::number(8.0)))
        );
        assert_eq!(sheet.cell(1, 0), Some(&RawValue::number(4.0)));
        assert_eq!(sheet.last_row_num(), Some(1));
    }

    #[test]
    fn test_build_sheet_keeps_absolute_positions() {
        let mut values: Range<Data> = Range::new((2, 1), (3, 2));
        values.set_value((2, 1), Data::String("Late".to_string()));
        values.set_value((3, 2), Data::Float(1.0));

        let sheet = FileSource::build_sheet("Offset", &values, None);
        assert!(sheet.header().is_none());
        assert_eq!(sheet.cell(2, 1), Some(&RawValue::text("Late")));
        assert_eq!(sheet.last_row_num(), Some(3));
    }

    #[test]
    fn test_formula_without_cached_value_is_blank() {
        let values: Range<Data> = Range::new((0, 0), (0, 0));
        let mut formulas: Range<String> = Range::new((0, 0), (0, 0));
        formulas.set_value((0, 0), "NOW()".to_string());

        let sheet = FileSource::build_sheet("Volatile", &values, Some(&formulas));
        let cell = sheet.cell(0, 0);
        assert_eq!(
            crate::normalize::normalize(cell),
            CellValue::Text(String::new())
        );
    }

    #[test]
    fn test_open_missing_file() {
        let result = ExcelSource::open("/nonexistent/path/file.xlsx");
        assert!(matches!(result, Err(DataError::FileNotFound(_))));
    }
}
