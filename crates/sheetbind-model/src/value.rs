//! Canonical cell values
//!
//! Every spreadsheet cell, whatever its stored kind, is normalized into one
//! [`CellValue`]. The representation is independent of the parsing library
//! that produced the cell.

use std::fmt;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Spreadsheet error code stored in an error cell
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// `#NULL!`
    Null,
    /// `#DIV/0!`
    Div0,
    /// `#VALUE!`
    Value,
    /// `#REF!`
    Ref,
    /// `#NAME?`
    Name,
    /// `#NUM!`
    Num,
    /// `#N/A`
    NA,
    /// `#GETTING_DATA`
    GettingData,
    /// Any other code reported by the reader, kept verbatim
    Other(String),
}

impl ErrorCode {
    /// The code as it is displayed in a spreadsheet cell
    pub fn as_code(&self) -> &str {
        match self {
            ErrorCode::Null => "#NULL!",
            ErrorCode::Div0 => "#DIV/0!",
            ErrorCode::Value => "#VALUE!",
            ErrorCode::Ref => "#REF!",
            ErrorCode::Name => "#NAME?",
            ErrorCode::Num => "#NUM!",
            ErrorCode::NA => "#N/A",
            ErrorCode::GettingData => "#GETTING_DATA",
            ErrorCode::Other(code) => code,
        }
    }

    /// Parse a displayed error code (e.g. `#DIV/0!`)
    pub fn from_code(code: &str) -> Self {
        match code.trim().to_ascii_uppercase().as_str() {
            "#NULL!" => ErrorCode::Null,
            "#DIV/0!" => ErrorCode::Div0,
            "#VALUE!" => ErrorCode::Value,
            "#REF!" => ErrorCode::Ref,
            "#NAME?" => ErrorCode::Name,
            "#NUM!" => ErrorCode::Num,
            "#N/A" => ErrorCode::NA,
            "#GETTING_DATA" => ErrorCode::GettingData,
            _ => ErrorCode::Other(code.to_string()),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_code())
    }
}

/// A normalized cell value
///
/// `Absent` means no physical cell existed at the position. A cell that
/// exists but holds nothing normalizes to empty text instead.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum CellValue {
    /// No physical cell
    #[default]
    Absent,
    /// Text content
    Text(String),
    /// Floating-point number
    Number(f64),
    /// Boolean
    Boolean(bool),
    /// Date-time (from a date formatted numeric cell or a native date cell)
    DateTime(NaiveDateTime),
    /// Error code stored in the cell
    Error(ErrorCode),
}

impl CellValue {
    /// True if no physical cell existed
    pub fn is_absent(&self) -> bool {
        matches!(self, CellValue::Absent)
    }

    /// True for absent cells and empty text
    pub fn is_empty(&self) -> bool {
        match self {
            CellValue::Absent => true,
            CellValue::Text(s) => s.is_empty(),
            _ => false,
        }
    }

    /// Short name of the value's type, used in diagnostics
    pub fn type_name(&self) -> &'static str {
        match self {
            CellValue::Absent => "absent",
            CellValue::Text(_) => "text",
            CellValue::Number(_) => "number",
            CellValue::Boolean(_) => "boolean",
            CellValue::DateTime(_) => "datetime",
            CellValue::Error(_) => "error",
        }
    }
}

/// Render a number the way a spreadsheet shows a general-format cell
pub fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{:.0}", n)
    } else {
        n.to_string()
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Absent => Ok(()),
            CellValue::Text(s) => f.write_str(s),
            CellValue::Number(n) => f.write_str(&format_number(*n)),
            CellValue::Boolean(b) => write!(f, "{}", b),
            CellValue::DateTime(dt) => write!(f, "{}", dt.format("%Y-%m-%d %H:%M:%S")),
            CellValue::Error(code) => write!(f, "{}", code),
        }
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::Text(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::Text(s)
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        CellValue::Number(n)
    }
}

impl From<bool> for CellValue {
    fn from(b: bool) -> Self {
        CellValue::Boolean(b)
    }
}

impl From<NaiveDateTime> for CellValue {
    fn from(dt: NaiveDateTime) -> Self {
        CellValue::DateTime(dt)
    }
}

impl From<ErrorCode> for CellValue {
    fn from(code: ErrorCode) -> Self {
        CellValue::Error(code)
    }
}

impl<T: Into<CellValue>> From<Option<T>> for CellValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(CellValue::Absent, Into::into)
    }
}
