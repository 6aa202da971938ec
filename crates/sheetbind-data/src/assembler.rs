//! Workbook assembly - many sheet requests to one [`Extraction`].

use std::collections::HashSet;
use std::path::Path;

use sheetbind_model::{Extraction, NamedTable};
use tracing::{debug, info};

use crate::error::{DataError, Result};
use crate::extractor::{SheetExtractor, SheetRequest};
use crate::sources::{ExcelSource, WorkbookReader};

/// Workbook file extensions accepted by [`WorkbookAssembler::assemble`]
pub const SUPPORTED_EXTENSIONS: [&str; 3] = ["xls", "xlsx", "xlsm"];

/// Runs a set of sheet requests against one workbook
pub struct WorkbookAssembler;

impl WorkbookAssembler {
    /// Extract the requested sheets of the workbook at `path`
    ///
    /// Requests are validated and the extension checked before the file is
    /// opened. The workbook is opened once and released when this returns.
    pub fn assemble(path: impl AsRef<Path>, requests: &[SheetRequest]) -> Result<Extraction> {
        let path = path.as_ref();
        validate_requests(requests)?;
        check_extension(path)?;

        let mut workbook = ExcelSource::open(path)?;
        info!(
            "Assembling {} sheet(s) from {}",
            requests.len(),
            path.display()
        );
        Self::assemble_from(&mut workbook, requests)
    }

    /// Extract the requested sheets from an already-open workbook
    ///
    /// The first failing request aborts the whole assembly; its error is
    /// wrapped in [`DataError::Sheet`] naming the sheet.
    pub fn assemble_from<R: WorkbookReader + ?Sized>(
        reader: &mut R,
        requests: &[SheetRequest],
    ) -> Result<Extraction> {
        validate_requests(requests)?;

        let mut tables = Vec::with_capacity(requests.len());
        for request in requests {
            debug!("Extracting sheet '{}'", request.sheet);
            let table = SheetExtractor::extract(&mut *reader, request)
                .map_err(|e| e.in_sheet(request.sheet.as_str()))?;
            tables.push(NamedTable {
                name: request.sheet.clone(),
                table,
            });
        }

        if tables.len() == 1 {
            if let Some(named) = tables.pop() {
                return Ok(Extraction::Single(named.table));
            }
        }
        Ok(Extraction::Multiple(tables))
    }
}

/// Reject empty request lists, empty sheet names and repeated sheets
pub fn validate_requests(requests: &[SheetRequest]) -> Result<()> {
    if requests.is_empty() {
        return Err(DataError::NoSheetRequests);
    }

    let mut seen = HashSet::new();
    for request in requests {
        if request.sheet.is_empty() {
            return Err(DataError::EmptySheetName);
        }
        if !seen.insert(request.sheet.as_str()) {
            return Err(DataError::DuplicateSheet(request.sheet.clone()));
        }
    }
    Ok(())
}

/// Accept only `.xls`, `.xlsx` and `.xlsm` paths (case-insensitive)
pub fn check_extension(path: &Path) -> Result<()> {
    let supported = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            SUPPORTED_EXTENSIONS
                .iter()
                .any(|s| s.eq_ignore_ascii_case(ext))
        })
        .unwrap_or(false);

    if supported {
        Ok(())
    } else {
        Err(DataError::UnsupportedFormat(path.display().to_string()))
    }
}
