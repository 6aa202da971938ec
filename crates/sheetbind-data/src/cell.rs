//! Raw cells as delivered by a workbook reader.
//!
//! A [`RawSheet`] is a sparse grid: rows and cells that do not physically
//! exist in the sheet are simply missing from the maps. Each present cell
//! carries a [`RawValue`] whose variant is its kind tag.

use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use sheetbind_model::ErrorCode;

/// The kind tag of a raw cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CellKind {
    /// Blank or unknown cell
    Blank,
    /// Numeric cell (possibly date formatted)
    Numeric,
    /// Text cell
    Text,
    /// Boolean cell
    Boolean,
    /// Error cell
    Error,
    /// Formula cell with a cached result
    Formula,
    /// Native date cell
    Date,
}

/// A raw cell payload, tagged by kind
#[derive(Debug, Clone, PartialEq)]
pub enum RawValue {
    /// Blank or unknown cell, holding its rendered text
    Blank(String),
    /// A stored number; `date_formatted` is the cell's date format flag
    Number { value: f64, date_formatted: bool },
    /// Text content
    Text(String),
    /// Boolean
    Boolean(bool),
    /// Stored error code
    Error(ErrorCode),
    /// Native date-time (e.g. ISO dates from OpenDocument readers)
    Date(NaiveDateTime),
    /// Formula with the result cached by the application that saved the file
    Formula {
        expression: String,
        cached: Box<RawValue>,
    },
}

impl RawValue {
    /// The kind tag of this cell
    pub fn kind(&self) -> CellKind {
        match self {
            RawValue::Blank(_) => CellKind::Blank,
            RawValue::Number { .. } => CellKind::Numeric,
            RawValue::Text(_) => CellKind::Text,
            RawValue::Boolean(_) => CellKind::Boolean,
            RawValue::Error(_) => CellKind::Error,
            RawValue::Date(_) => CellKind::Date,
            RawValue::Formula { .. } => CellKind::Formula,
        }
    }

    /// A plain, non-date number
    pub fn number(value: f64) -> Self {
        RawValue::Number {
            value,
            date_formatted: false,
        }
    }

    /// A number carrying the date format flag
    pub fn date_serial(value: f64) -> Self {
        RawValue::Number {
            value,
            date_formatted: true,
        }
    }

    /// A text cell
    pub fn text(value: impl Into<String>) -> Self {
        RawValue::Text(value.into())
    }

    /// A formula cell with its cached result
    pub fn formula(expression: impl Into<String>, cached: RawValue) -> Self {
        RawValue::Formula {
            expression: expression.into(),
            cached: Box::new(cached),
        }
    }
}

/// One physical row: column index to cell
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RawRow {
    cells: BTreeMap<u32, RawValue>,
}

impl RawRow {
    /// Create an empty row
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a row from consecutive cells starting at column 0
    ///
    /// `None` entries leave a gap (no physical cell).
    pub fn from_cells(cells: impl IntoIterator<Item = Option<RawValue>>) -> Self {
        let mut row = Self::new();
        for (col, cell) in cells.into_iter().enumerate() {
            if let Some(value) = cell {
                row.set(col as u32, value);
            }
        }
        row
    }

    /// Set the cell at a physical column index
    pub fn set(&mut self, col: u32, value: RawValue) {
        self.cells.insert(col, value);
    }

    /// The cell at a physical column index, if it exists
    pub fn cell(&self, col: u32) -> Option<&RawValue> {
        self.cells.get(&col)
    }

    /// Present cells in left-to-right order
    pub fn cells(&self) -> impl Iterator<Item = (u32, &RawValue)> {
        self.cells.iter().map(|(col, value)| (*col, value))
    }

    /// Number of physically present cells
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// True if the row has no cells
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// A sheet as a sparse grid of raw cells
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RawSheet {
    name: String,
    rows: BTreeMap<u32, RawRow>,
}

impl RawSheet {
    /// Create an empty sheet
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            rows: BTreeMap::new(),
        }
    }

    /// Sheet name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Insert (or replace) a physical row
    pub fn set_row(&mut self, idx: u32, row: RawRow) {
        self.rows.insert(idx, row);
    }

    /// Builder form of [`RawSheet::set_row`]
    pub fn with_row(mut self, idx: u32, row: RawRow) -> Self {
        self.set_row(idx, row);
        self
    }

    /// Set a single cell, creating its row if needed
    pub fn set_cell(&mut self, row: u32, col: u32, value: RawValue) {
        self.rows.entry(row).or_default().set(col, value);
    }

    /// The physical row at an index, if it exists
    pub fn row(&self, idx: u32) -> Option<&RawRow> {
        self.rows.get(&idx)
    }

    /// The header row (physical row 0)
    pub fn header(&self) -> Option<&RawRow> {
        self.row(0)
    }

    /// The cell at (row, col), if it exists
    pub fn cell(&self, row: u32, col: u32) -> Option<&RawValue> {
        self.row(row).and_then(|r| r.cell(col))
    }

    /// Index of the last physical row (0-based), `None` for an empty sheet
    pub fn last_row_num(&self) -> Option<u32> {
        self.rows.keys().next_back().copied()
    }

    /// Physical rows in order
    pub fn rows(&self) -> impl Iterator<Item = (u32, &RawRow)> {
        self.rows.iter().map(|(idx, row)| (*idx, row))
    }
}
