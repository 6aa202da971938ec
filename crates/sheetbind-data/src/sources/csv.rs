//! CSV row source.
//!
//! Produces the same letter-keyed [`RowMap`]s as
//! [`ExcelSource::row_maps`](crate::sources::ExcelSource::row_maps), so CSV
//! files can feed the record binder. Every field is text.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use sheetbind_model::CellValue;

use crate::error::{DataError, Result};
use crate::sources::{column_letter, RowMap};

/// Options for CSV parsing
#[derive(Debug, Clone)]
pub struct CsvOptions {
    /// Field delimiter (default: comma)
    pub delimiter: u8,
    /// Quote character (default: double quote)
    pub quote: u8,
    /// Whether to trim whitespace from fields
    pub trim: bool,
    /// Whether to allow rows with differing field counts
    pub flexible: bool,
}

impl Default for CsvOptions {
    fn default() -> Self {
        Self {
            delimiter: b',',
            quote: b'"',
            trim: true,
            flexible: true,
        }
    }
}

impl CsvOptions {
    /// Options for tab-separated values (TSV)
    pub fn tsv() -> Self {
        Self {
            delimiter: b'\t',
            ..Default::default()
        }
    }

    /// Options for semicolon-separated values (common in European locales)
    pub fn semicolon() -> Self {
        Self {
            delimiter: b';',
            ..Default::default()
        }
    }
}

/// Streaming CSV row source
pub struct CsvSource<R> {
    records: csv::StringRecordsIntoIter<R>,
    done: bool,
}

impl CsvSource<BufReader<File>> {
    /// Open a CSV file
    pub fn open(path: impl AsRef<Path>, options: CsvOptions) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(DataError::FileNotFound(path.display().to_string()));
        }

        let file = File::open(path)?;
        Ok(Self::from_reader(BufReader::new(file), options))
    }
}

impl<R: Read> CsvSource<R> {
    /// Read CSV from any stream
    ///
    /// The header line is not consumed here; it is the first row map, as
    /// with workbook sheets.
    pub fn from_reader(reader: R, options: CsvOptions) -> Self {
        let records = csv::ReaderBuilder::new()
            .delimiter(options.delimiter)
            .quote(options.quote)
            .has_headers(false)
            .trim(if options.trim {
                csv::Trim::All
            } else {
                csv::Trim::None
            })
            .flexible(options.flexible)
            .from_reader(reader)
            .into_records();

        Self {
            records,
            done: false,
        }
    }
}

impl<R: Read> Iterator for CsvSource<R> {
    type Item = Result<RowMap>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        match self.records.next()? {
            Ok(record) => Some(Ok(record
                .iter()
                .enumerate()
                .map(|(col, field)| (column_letter(col as u32), CellValue::from(field)))
                .collect())),
            Err(e) => {
                self.done = true;
                Some(Err(e.into()))
            }
        }
    }
}
