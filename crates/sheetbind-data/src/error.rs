//! Error types for the data engine.

use thiserror::Error;

use crate::binder::CoercionError;

/// Result type for data operations
pub type Result<T> = std::result::Result<T, DataError>;

/// Broad classification of a [`DataError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bad request configuration (no sheets, empty sheet name)
    Validation,
    /// Disallowed file type or malformed sheet layout
    Format,
    /// Request refers to something the workbook does not contain
    Configuration,
    /// A raw value could not be converted to a record field's type
    TypeCoercion,
    /// Failure while reading the underlying file or stream
    Io,
}

/// Errors that can occur during data source operations
#[derive(Debug, Error)]
pub enum DataError {
    /// No sheet requests were supplied
    #[error("No sheet requests given")]
    NoSheetRequests,

    /// A sheet request has an empty name
    #[error("Sheet name must not be empty")]
    EmptySheetName,

    /// The same sheet was requested twice
    #[error("Sheet requested more than once: {0}")]
    DuplicateSheet(String),

    /// Column reference is not a valid column letter sequence
    #[error("Invalid column reference: '{0}'")]
    InvalidColumn(String),

    /// File extension is not a supported workbook format
    #[error("Unsupported workbook format: {0} (expected .xls, .xlsx or .xlsm)")]
    UnsupportedFormat(String),

    /// The sheet has no header row (physical row 0)
    #[error("Sheet '{sheet}' has no header row")]
    MissingHeader {
        /// Sheet name
        sheet: String,
    },

    /// Sheet not found in workbook
    #[error("Sheet not found: {0}")]
    SheetNotFound(String),

    /// A row value could not be converted to a record field
    #[error("Row {row}: field '{field}' (column '{column}'): {source}")]
    TypeCoercion {
        /// Index of the row in the source sequence (header is row 0)
        row: usize,
        /// Record field name
        field: &'static str,
        /// Bound column name
        column: &'static str,
        /// Underlying conversion failure
        source: CoercionError,
    },

    /// Failure while processing one sheet of a multi-sheet request
    #[error("Sheet '{sheet}': {source}")]
    Sheet {
        /// Sheet being processed
        sheet: String,
        /// Underlying cause
        source: Box<DataError>,
    },

    /// File not found
    #[error("File not found: {0}")]
    FileNotFound(String),

    /// Failed to open workbook
    #[error("Failed to open workbook: {0}")]
    WorkbookOpen(String),

    /// Calamine error
    #[error("Excel error: {0}")]
    Calamine(String),

    /// CSV error
    #[error("CSV error: {0}")]
    Csv(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl DataError {
    /// Classify this error
    ///
    /// A [`DataError::Sheet`] reports the kind of the error it wraps.
    pub fn kind(&self) -> ErrorKind {
        match self {
            DataError::NoSheetRequests
            | DataError::EmptySheetName
            | DataError::DuplicateSheet(_)
            | DataError::InvalidColumn(_) => ErrorKind::Validation,
            DataError::UnsupportedFormat(_) | DataError::MissingHeader { .. } => {
                ErrorKind::Format
            }
            DataError::SheetNotFound(_) => ErrorKind::Configuration,
            DataError::TypeCoercion { .. } => ErrorKind::TypeCoercion,
            DataError::Sheet { source, .. } => source.kind(),
            DataError::FileNotFound(_)
            | DataError::WorkbookOpen(_)
            | DataError::Calamine(_)
            | DataError::Csv(_)
            | DataError::Io(_) => ErrorKind::Io,
        }
    }

    /// Wrap this error with the sheet it occurred on
    pub fn in_sheet(self, sheet: impl Into<String>) -> Self {
        DataError::Sheet {
            sheet: sheet.into(),
            source: Box::new(self),
        }
    }

    /// The innermost error, looking through [`DataError::Sheet`] wrappers
    pub fn root(&self) -> &DataError {
        match self {
            DataError::Sheet { source, .. } => source.root(),
            other => other,
        }
    }
}

impl From<calamine::Error> for DataError {
    fn from(err: calamine::Error) -> Self {
        DataError::Calamine(err.to_string())
    }
}

impl From<csv::Error> for DataError {
    fn from(err: csv::Error) -> Self {
        DataError::Csv(err.to_string())
    }
}
