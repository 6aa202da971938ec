//! In-memory workbook, for callers that already hold parsed sheets.

use crate::cell::RawSheet;
use crate::error::Result;
use crate::sources::WorkbookReader;

/// A workbook made of [`RawSheet`]s held in memory
#[derive(Debug, Clone, Default)]
pub struct MemoryWorkbook {
    sheets: Vec<RawSheet>,
}

impl MemoryWorkbook {
    /// Create an empty workbook
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a sheet, replacing any sheet with the same name
    pub fn with_sheet(mut self, sheet: RawSheet) -> Self {
        self.add_sheet(sheet);
        self
    }

    /// Add a sheet, replacing any sheet with the same name
    pub fn add_sheet(&mut self, sheet: RawSheet) {
        match self.sheets.iter_mut().find(|s| s.name() == sheet.name()) {
            Some(existing) => *existing = sheet,
            None => self.sheets.push(sheet),
        }
    }
}

impl WorkbookReader for MemoryWorkbook {
    fn list_sheets(&self) -> Result<Vec<String>> {
        Ok(self.sheets.iter().map(|s| s.name().to_string()).collect())
    }

    fn default_sheet(&self) -> Option<String> {
        self.sheets.first().map(|s| s.name().to_string())
    }

    fn read_sheet(&mut self, name: &str) -> Result<Option<RawSheet>> {
        Ok(self.sheets.iter().find(|s| s.name() == name).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::RawValue;

    #[test]
    fn test_sheet_lookup() {
        let mut first = RawSheet::new("First");
        first.set_cell(0, 0, RawValue::text("A"));

        let mut workbook = MemoryWorkbook::new()
            .with_sheet(first)
            .with_sheet(RawSheet::new("Second"));

        assert_eq!(workbook.list_sheets().unwrap(), vec!["First", "Second"]);
        assert_eq!(workbook.default_sheet(), Some("First".to_string()));
        assert!(workbook.read_sheet("First").unwrap().is_some());
        assert!(workbook.read_sheet("Third").unwrap().is_none());
    }

    #[test]
    fn test_add_sheet_replaces_same_name() {
        let mut replacement = RawSheet::new("Data");
        replacement.set_cell(0, 0, RawValue::text("New"));

        let mut workbook = MemoryWorkbook::new()
            .with_sheet(RawSheet::new("Data"))
            .with_sheet(replacement);

        assert_eq!(workbook.list_sheets().unwrap().len(), 1);
        let sheet = workbook.read_sheet("Data").unwrap().unwrap();
        assert_eq!(sheet.cell(0, 0), Some(&RawValue::text("New")));
    }
}
