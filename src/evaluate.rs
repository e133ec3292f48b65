//! Rule evaluation
//!
//! Rows are scanned top to bottom and the first row whose condition cells
//! all match wins. A condition cell matches when it holds the wildcard or
//! when its text equals the input's text. Declared data types and
//! comparison modes are not consulted.

use crate::columns::{input_positions, resolve_output_column};
use crate::config::EngineConfig;
use crate::model::{Cell, Column, Row, Table};
use std::collections::BTreeMap;

/// Input values keyed by column name
pub type InputAssignment = BTreeMap<String, Cell>;

/// Outcome of evaluating an assignment
#[derive(Debug, Clone, PartialEq)]
pub enum MatchResult {
    Matched { row: usize, output: Cell },
    NoMatch,
}

impl MatchResult {
    pub fn is_match(&self) -> bool {
        matches!(self, MatchResult::Matched { .. })
    }

    /// The matched output, or `no_match_text`
    pub fn into_cell(self, no_match_text: &str) -> Cell {
        match self {
            MatchResult::Matched { output, .. } => output,
            MatchResult::NoMatch => Cell::text(no_match_text),
        }
    }
}

/// Build an assignment from `(column, value)` pairs
pub fn assignment<K, V, I>(pairs: I) -> InputAssignment
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<Cell>,
{
    pairs
        .into_iter()
        .map(|(k, v)| (k.into(), v.into()))
        .collect()
}

/// Whether `row` matches `assignment` on every input column
///
/// Columns absent from the assignment are compared against empty text.
pub fn row_matches(
    columns: &[Column],
    row: &[Cell],
    assignment: &InputAssignment,
    config: &EngineConfig,
) -> bool {
    let output = resolve_output_column(columns, config).map(|o| o.index);
    columns
        .iter()
        .enumerate()
        .filter(|(i, _)| Some(*i) != output)
        .all(|(i, col)| {
            let cell = row.get(i).cloned().unwrap_or_default();
            if cell.is_wildcard(&config.wildcard) {
                return true;
            }
            let value = assignment
                .get(&col.name)
                .map(Cell::as_text)
                .unwrap_or_default();
            cell.as_text() == value
        })
}

/// First matching row, first-match-wins
pub fn find_first_match(
    columns: &[Column],
    rows: &[Row],
    assignment: &InputAssignment,
    config: &EngineConfig,
) -> MatchResult {
    let Some(output) = resolve_output_column(columns, config) else {
        return MatchResult::NoMatch;
    };
    rows.iter()
        .enumerate()
        .find(|(_, row)| row_matches(columns, row, assignment, config))
        .map(|(row, cells)| MatchResult::Matched {
            row,
            output: cells.get(output.index).cloned().unwrap_or_default(),
        })
        .unwrap_or(MatchResult::NoMatch)
}

/// Evaluate an assignment against a table
pub fn evaluate(table: &Table, assignment: &InputAssignment, config: &EngineConfig) -> MatchResult {
    find_first_match(&table.columns, &table.rows, assignment, config)
}

/// Evaluate values given in input-column order
pub fn evaluate_positional(table: &Table, inputs: &[Cell], config: &EngineConfig) -> MatchResult {
    let assignment: InputAssignment = input_positions(&table.columns, config)
        .into_iter()
        .zip(inputs)
        .map(|(i, value)| (table.columns[i].name.clone(), value.clone()))
        .collect();
    evaluate(table, &assignment, config)
}
