//! Header resolution - column names and positions from a sheet's first row.

use std::collections::HashSet;

use sheetbind_model::Column;
use tracing::debug;

use crate::cell::RawSheet;
use crate::error::{DataError, Result};
use crate::normalize::render_text;

/// Resolve the columns of a sheet from its header row (physical row 0)
///
/// Without `requested`, every present header cell becomes a column, left to
/// right. With `requested`, the result is the ordered intersection of the
/// requested physical indexes with the indexes present in the header; order
/// follows the request and indexes the header lacks are dropped.
pub fn resolve_columns(sheet: &RawSheet, requested: Option<&[u32]>) -> Result<Vec<Column>> {
    let header = sheet.header().ok_or_else(|| DataError::MissingHeader {
        sheet: sheet.name().to_string(),
    })?;

    let columns: Vec<Column> = match requested {
        None => header
            .cells()
            .map(|(idx, cell)| Column::new(render_text(cell), idx))
            .collect(),
        Some(indexes) => {
            let mut seen = HashSet::new();
            indexes
                .iter()
                .filter(|idx| seen.insert(**idx))
                .filter_map(|&idx| match header.cell(idx) {
                    Some(cell) => Some(Column::new(render_text(cell), idx)),
                    None => {
                        debug!(
                            "Sheet '{}': requested column {} not in header, dropped",
                            sheet.name(),
                            idx
                        );
                        None
                    }
                })
                .collect()
        }
    };

    debug!(
        "Sheet '{}': resolved {} column(s)",
        sheet.name(),
        columns.len()
    );

    Ok(columns)
}
