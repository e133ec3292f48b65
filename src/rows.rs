//! Row store operations
//!
//! Rows are positional: cell `i` belongs to column `i`. Every helper here
//! keeps row width equal to the column count it is given.

use crate::model::{Cell, Row, Table};
use tracing::warn;

/// A row-level edit
#[derive(Debug, Clone, PartialEq)]
pub enum RowEdit {
    /// Append a row of empty cells
    Add,
    /// Remove the row at this index
    Remove(usize),
    /// Overwrite one cell, stored as given
    UpdateCell { row: usize, col: usize, value: Cell },
}

/// Apply a row edit, returning the new table
pub fn apply_row_edit(table: &Table, edit: RowEdit) -> Table {
    match edit {
        RowEdit::Add => add_row(table),
        RowEdit::Remove(index) => remove_row(table, index),
        RowEdit::UpdateCell { row, col, value } => update_cell(table, row, col, value),
    }
}

/// Append a row of empty cells sized to the current columns
pub fn add_row(table: &Table) -> Table {
    let mut next = table.clone();
    next.rows.push(empty_row(table.columns.len()));
    next
}

/// Remove a row; out-of-range indices leave the table unchanged
pub fn remove_row(table: &Table, index: usize) -> Table {
    let mut next = table.clone();
    if index < next.rows.len() {
        next.rows.remove(index);
    } else {
        warn!(index, rows = table.rows.len(), "remove_row: index out of range");
    }
    next
}

/// Overwrite one cell
///
/// The raw value is stored; boolean normalization waits for the next
/// column mutation.
pub fn update_cell(table: &Table, row: usize, col: usize, value: Cell) -> Table {
    let mut next = table.clone();
    match next.rows.get_mut(row).and_then(|r| r.get_mut(col)) {
        Some(cell) => *cell = value,
        None => warn!(row, col, "update_cell: cell out of range"),
    }
    next
}

/// A row of `width` empty cells
pub fn empty_row(width: usize) -> Row {
    vec![Cell::empty(); width]
}

/// Pad with empty cells or truncate so every row has `width` cells
pub fn conform_rows(rows: &[Row], width: usize) -> Vec<Row> {
    rows.iter()
        .map(|row| {
            let mut row = row.clone();
            row.resize(width, Cell::empty());
            row
        })
        .collect()
}

/// Insert an empty cell at `index` in every row
pub fn insert_cell(rows: &[Row], index: usize) -> Vec<Row> {
    rows.iter()
        .map(|row| {
            let mut row = row.clone();
            let at = index.min(row.len());
            row.insert(at, Cell::empty());
            row
        })
        .collect()
}

/// Remove the cell at `index` from every row
pub fn remove_cell(rows: &[Row], index: usize) -> Vec<Row> {
    rows.iter()
        .map(|row| {
            let mut row = row.clone();
            if index < row.len() {
                row.remove(index);
            }
            row
        })
        .collect()
}

/// Reorder and select cells: output cell `i` is input cell `order[i]`
///
/// Missing source cells become empty.
pub fn select_cells(rows: &[Row], order: &[usize]) -> Vec<Row> {
    rows.iter()
        .map(|row| {
            order
                .iter()
                .map(|&i| row.get(i).cloned().unwrap_or_default())
                .collect()
        })
        .collect()
}
