//! Value normalization for typed columns
//!
//! Boolean columns store one of two canonical tokens no matter how the
//! value arrived (a raw boolean, `"true"`, `"False"`, ...). Other column
//! types pass through untouched.

use crate::model::{Cell, Column, DataType, Row};

/// Canonical token for a true boolean cell
pub const TRUE_TOKEN: &str = "TRUE";

/// Canonical token for a false boolean cell
pub const FALSE_TOKEN: &str = "FALSE";

/// Canonicalize one boolean-column cell
pub fn normalize_boolean(cell: &Cell) -> Cell {
    match cell {
        Cell::Bool(true) => Cell::text(TRUE_TOKEN),
        Cell::Bool(false) => Cell::text(FALSE_TOKEN),
        Cell::Text(s) => Cell::Text(s.to_uppercase()),
        other => other.clone(),
    }
}

/// Normalize a row against its columns
///
/// Cells without a column (a row longer than the column list) are kept as-is.
pub fn normalize_row(columns: &[Column], row: &[Cell]) -> Row {
    row.iter()
        .enumerate()
        .map(|(idx, cell)| match columns.get(idx) {
            Some(col) if col.data_type == DataType::Boolean => normalize_boolean(cell),
            _ => cell.clone(),
        })
        .collect()
}

/// Normalize every row
pub fn normalize_rows(columns: &[Column], rows: &[Row]) -> Vec<Row> {
    if !columns.iter().any(|c| c.data_type == DataType::Boolean) {
        return rows.to_vec();
    }
    rows.iter().map(|row| normalize_row(columns, row)).collect()
}
