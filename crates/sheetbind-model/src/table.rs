//! Tables extracted from sheets
//!
//! A [`Table`] is row-major: every row holds exactly one value per column,
//! in column order. [`Extraction`] is what an assembly over one or more
//! sheets returns.

use serde::{Deserialize, Serialize};

use crate::value::CellValue;

/// A column derived from a sheet's header row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    /// Display name read from the header cell
    pub name: String,
    /// Physical column index in the sheet (0-based)
    pub source_index: u32,
}

impl Column {
    /// Create a column
    pub fn new(name: impl Into<String>, source_index: u32) -> Self {
        Self {
            name: name.into(),
            source_index,
        }
    }
}

/// A generic table: header-defined columns plus row-major values
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Table {
    /// Columns in output order
    pub columns: Vec<Column>,
    /// Data rows
    pub rows: Vec<Vec<CellValue>>,
}

impl Table {
    /// Create an empty table with the given columns
    pub fn new(columns: Vec<Column>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    /// Append a row
    ///
    /// Short rows are padded with absent values, long rows truncated, so
    /// every row matches the column count.
    pub fn push_row(&mut self, mut row: Vec<CellValue>) {
        row.resize(self.columns.len(), CellValue::Absent);
        self.rows.push(row);
    }

    /// Column display names in output order
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// Output position of the first column with this name
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    /// Number of columns
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Number of data rows
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// True if the table has no data rows
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Value at (row, column) output positions
    pub fn get(&self, row: usize, col: usize) -> Option<&CellValue> {
        self.rows.get(row).and_then(|r| r.get(col))
    }

    /// Value at a row, addressed by column name
    pub fn value(&self, row: usize, column: &str) -> Option<&CellValue> {
        self.column_index(column).and_then(|col| self.get(row, col))
    }
}

/// A table tagged with the sheet it came from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedTable {
    /// Sheet name
    pub name: String,
    /// Extracted table
    pub table: Table,
}

/// Result of assembling one or more sheet requests
///
/// One request yields `Single`, more than one yields `Multiple` with the
/// entries in request order. Tables are never merged across sheets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "data", rename_all = "snake_case")]
pub enum Extraction {
    /// Exactly one sheet was requested
    Single(Table),
    /// Several sheets were requested
    Multiple(Vec<NamedTable>),
}

impl Extraction {
    /// Number of tables
    pub fn len(&self) -> usize {
        match self {
            Extraction::Single(_) => 1,
            Extraction::Multiple(tables) => tables.len(),
        }
    }

    /// Always false; an extraction holds at least one table
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The single table, if exactly one sheet was requested
    pub fn as_single(&self) -> Option<&Table> {
        match self {
            Extraction::Single(table) => Some(table),
            Extraction::Multiple(_) => None,
        }
    }

    /// Consume into the single table, if exactly one sheet was requested
    pub fn into_single(self) -> Option<Table> {
        match self {
            Extraction::Single(table) => Some(table),
            Extraction::Multiple(_) => None,
        }
    }

    /// Look up a table by sheet name (multi-sheet results only)
    pub fn table(&self, name: &str) -> Option<&Table> {
        match self {
            Extraction::Single(_) => None,
            Extraction::Multiple(tables) => {
                tables.iter().find(|t| t.name == name).map(|t| &t.table)
            }
        }
    }

    /// All tables in request order
    pub fn tables(&self) -> Vec<&Table> {
        match self {
            Extraction::Single(table) => vec![table],
            Extraction::Multiple(tables) => tables.iter().map(|t| &t.table).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn people() -> Table {
        let mut table = Table::new(vec![Column::new("Name", 0), Column::new("Age", 1)]);
        table.push_row(vec!["Alice".into(), 30.0.into()]);
        table.push_row(vec!["Bob".into()]);
        table
    }

    #[test]
    fn test_push_row_pads_to_column_count() {
        let table = people();
        assert_eq!(table.rows[1].len(), 2);
        assert_eq!(table.get(1, 1), Some(&CellValue::Absent));
    }

    #[test]
    fn test_value_by_name() {
        let table = people();
        assert_eq!(table.column_names(), vec!["Name", "Age"]);
        assert_eq!(table.value(0, "Age"), Some(&CellValue::Number(30.0)));
        assert_eq!(table.value(0, "Missing"), None);
    }

    #[test]
    fn test_extraction_single() {
        let extraction = Extraction::Single(people());
        assert_eq!(extraction.len(), 1);
        assert!(extraction.as_single().is_some());
        assert!(extraction.table("People").is_none());
    }

    #[test]
    fn test_extraction_multiple_preserves_order() {
        let extraction = Extraction::Multiple(vec![
            NamedTable {
                name: "B".to_string(),
                table: Table::default(),
            },
            NamedTable {
                name: "A".to_string(),
                table: people(),
            },
        ]);
        assert_eq!(extraction.len(), 2);
        assert!(extraction.as_single().is_none());
        assert_eq!(extraction.table("A").map(Table::row_count), Some(2));
        assert_eq!(extraction.tables()[0].row_count(), 0);
    }
}
