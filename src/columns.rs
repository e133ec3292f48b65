//! Column set management
//!
//! Owns the ordered column list and its two invariants:
//!
//! - the output column (named `result`, `output` or `decision` by default)
//!   is always last; with no such name the last column is the output
//! - column names are unique, first occurrence wins
//!
//! Every column mutation funnels through [`set_columns`], which reorders
//! row cells to follow their columns, re-normalizes boolean cells, and
//! realigns the test suite against the new column set.

use crate::config::EngineConfig;
use crate::model::{Column, ComparisonMode, DataType, Table};
use crate::normalize::normalize_rows;
use crate::realign::realign_test_cases;
use crate::rows::{conform_rows, insert_cell, remove_cell, select_cells};
use std::collections::HashSet;
use tracing::warn;

/// A column-level edit
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnEdit {
    /// Replace the column list; rows are taken as aligned with it
    Set(Vec<Column>),
    /// Insert a synthesized condition column before the output column
    Add,
    /// Remove the column at this index
    Remove(usize),
    /// Patch one field of the column at this index
    Update { index: usize, field: ColumnField },
}

/// A single column field patch
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnField {
    Name(String),
    DataType(DataType),
    Comparison(ComparisonMode),
}

/// The resolved output column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputColumn {
    pub index: usize,
    /// False when no name matched and the last column was assumed
    pub by_name: bool,
}

/// Index of the first column whose name marks it as the output
pub fn find_output_by_name(columns: &[Column], config: &EngineConfig) -> Option<usize> {
    columns.iter().position(|c| config.is_output_name(&c.name))
}

/// Resolve the output column, falling back to the last column
pub fn resolve_output_column(columns: &[Column], config: &EngineConfig) -> Option<OutputColumn> {
    if let Some(index) = find_output_by_name(columns, config) {
        return Some(OutputColumn {
            index,
            by_name: true,
        });
    }
    columns.len().checked_sub(1).map(|index| OutputColumn {
        index,
        by_name: false,
    })
}

/// Column order with the named output column moved to the end
pub fn output_last_order(columns: &[Column], config: &EngineConfig) -> Vec<usize> {
    let mut order: Vec<usize> = (0..columns.len()).collect();
    if let Some(idx) = find_output_by_name(columns, config) {
        order.remove(idx);
        order.push(idx);
    }
    order
}

/// Input column indices in test-case order, i.e. `output_last_order` minus the output
pub fn input_positions(columns: &[Column], config: &EngineConfig) -> Vec<usize> {
    let mut order = output_last_order(columns, config);
    order.pop();
    order
}

/// Copy of `columns` with the output column last
pub fn ensure_output_last(columns: &[Column], config: &EngineConfig) -> Vec<Column> {
    output_last_order(columns, config)
        .into_iter()
        .map(|i| columns[i].clone())
        .collect()
}

/// Indices of the first column seen under each name
pub fn dedupe_by_name(columns: &[Column]) -> Vec<usize> {
    let mut seen = HashSet::new();
    columns
        .iter()
        .enumerate()
        .filter(|(_, c)| seen.insert(c.name.as_str()))
        .map(|(i, _)| i)
        .collect()
}

/// Where a new condition column goes: just before the named output column
pub fn insertion_index(columns: &[Column], config: &EngineConfig) -> usize {
    find_output_by_name(columns, config).unwrap_or(columns.len())
}

/// Name for a synthesized column, `"{prefix} {n}"` with `n = len + 1`
///
/// Bumps `n` until the name is free so the new column survives deduplication.
pub fn next_column_name(columns: &[Column], config: &EngineConfig) -> String {
    let taken: HashSet<&str> = columns.iter().map(|c| c.name.as_str()).collect();
    let mut n = columns.len() + 1;
    loop {
        let name = format!("{} {}", config.new_column_prefix, n);
        if !taken.contains(name.as_str()) {
            return name;
        }
        n += 1;
    }
}

/// Non-blocking warnings about the column set
pub fn column_warnings(columns: &[Column], config: &EngineConfig) -> Vec<String> {
    match resolve_output_column(columns, config) {
        Some(OutputColumn { by_name: false, index }) => vec![format!(
            "No output column named {}; treating '{}' as the output",
            config.output_column_names.join("/"),
            columns[index].name
        )],
        None => vec!["Table has no columns".into()],
        Some(_) => Vec::new(),
    }
}

/// Apply a column edit, returning the fully realigned table
pub fn apply_column_edit(table: &Table, edit: ColumnEdit, config: &EngineConfig) -> Table {
    match edit {
        ColumnEdit::Set(columns) => set_columns(table, columns, config),
        ColumnEdit::Add => add_column(table, config),
        ColumnEdit::Remove(index) => remove_column(table, index, config),
        ColumnEdit::Update { index, field } => update_column(table, index, field, config),
    }
}

/// Replace the column list and re-run every invariant
///
/// `table.rows` are read as positionally aligned with `new_columns`. The
/// previous `table.columns` drive test-case realignment by name.
pub fn set_columns(table: &Table, new_columns: Vec<Column>, config: &EngineConfig) -> Table {
    let rows = conform_rows(&table.rows, new_columns.len());

    let kept = dedupe_by_name(&new_columns);
    if kept.len() < new_columns.len() {
        warn!(
            dropped = new_columns.len() - kept.len(),
            "set_columns: dropping duplicate column names"
        );
    }
    let unique: Vec<Column> = kept.iter().map(|&i| new_columns[i].clone()).collect();
    let rows = select_cells(&rows, &kept);

    let order = output_last_order(&unique, config);
    let columns: Vec<Column> = order.iter().map(|&i| unique[i].clone()).collect();
    let rows = normalize_rows(&columns, &select_cells(&rows, &order));

    for warning in column_warnings(&columns, config) {
        warn!("{}", warning);
    }

    let test_cases = realign_test_cases(&table.columns, &columns, &table.test_cases, &rows, config);

    Table {
        title: table.title.clone(),
        columns,
        rows,
        test_cases,
    }
}

/// Insert a new `String`/`Equals` condition column before the output column
pub fn add_column(table: &Table, config: &EngineConfig) -> Table {
    let at = insertion_index(&table.columns, config);
    let mut columns = table.columns.clone();
    columns.insert(at, Column::string(next_column_name(&table.columns, config)));

    let staged = Table {
        rows: insert_cell(&conform_rows(&table.rows, table.columns.len()), at),
        ..table.clone()
    };
    set_columns(&staged, columns, config)
}

/// Remove a column and its cells; out-of-range indices leave the table unchanged
///
/// Removing the output column is allowed: the new last column takes over.
pub fn remove_column(table: &Table, index: usize, config: &EngineConfig) -> Table {
    if index >= table.columns.len() {
        warn!(index, columns = table.columns.len(), "remove_column: index out of range");
        return table.clone();
    }
    let mut columns = table.columns.clone();
    columns.remove(index);

    let staged = Table {
        rows: remove_cell(&conform_rows(&table.rows, table.columns.len()), index),
        ..table.clone()
    };
    set_columns(&staged, columns, config)
}

/// Patch one field and re-run the full pipeline
pub fn update_column(
    table: &Table,
    index: usize,
    field: ColumnField,
    config: &EngineConfig,
) -> Table {
    let mut columns = table.columns.clone();
    let Some(column) = columns.get_mut(index) else {
        warn!(index, columns = table.columns.len(), "update_column: index out of range");
        return table.clone();
    };
    match field {
        ColumnField::Name(name) => column.name = name,
        ColumnField::DataType(data_type) => column.data_type = data_type,
        ColumnField::Comparison(comparison) => column.comparison = comparison,
    }
    set_columns(table, columns, config)
}
