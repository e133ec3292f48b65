//! Test case realignment
//!
//! When the column set changes, each test case's positional `inputs` must
//! be rebuilt for the new input-column order. Values follow their column
//! by name. A column with no carried-over value is filled from the first
//! table row that agrees with the test case on every other carried input
//! (a carried empty value only fits an empty cell); failing that it is
//! left empty.
//!
//! Realignment never mutates its arguments and keeps every non-input field
//! (`expected`, `description`, stale `result`/`status`, extra fields).

use crate::columns::ensure_output_last;
use crate::config::EngineConfig;
use crate::model::{Cell, Column, Row, TestCase};
use std::collections::HashMap;
use tracing::debug;

/// Rebuild test-case inputs for a new column set
///
/// `current_rows` must be aligned with `new_columns` (output last).
pub fn realign_test_cases(
    prev_columns: &[Column],
    new_columns: &[Column],
    prev_test_cases: &[TestCase],
    current_rows: &[Row],
    config: &EngineConfig,
) -> Vec<TestCase> {
    let prev_cols = ensure_output_last(prev_columns, config);
    let new_cols = ensure_output_last(new_columns, config);
    let prev_inputs = input_columns(&prev_cols);
    let new_inputs = input_columns(&new_cols);

    prev_test_cases
        .iter()
        .map(|tc| {
            let by_name: HashMap<&str, &Cell> = prev_inputs
                .iter()
                .zip(tc.inputs.iter())
                .map(|(col, value)| (col.name.as_str(), value))
                .collect();

            let inputs: Vec<Cell> = new_inputs
                .iter()
                .enumerate()
                .map(|(idx, col)| resolve_input(idx, col, new_inputs, &by_name, current_rows))
                .collect();

            debug!(inputs = ?inputs, expected = %tc.expected, "realigned test case");
            TestCase {
                inputs,
                ..tc.clone()
            }
        })
        .collect()
}

/// Value for input column `idx`: carried over, inferred from a row, or empty
fn resolve_input(
    idx: usize,
    column: &Column,
    inputs: &[Column],
    by_name: &HashMap<&str, &Cell>,
    rows: &[Row],
) -> Cell {
    if let Some(value) = known_value(by_name, &column.name) {
        debug!(column = %column.name, value = %value, "preserved input");
        return value.clone();
    }

    let pattern: Vec<Option<&Cell>> = inputs
        .iter()
        .enumerate()
        .map(|(i, c)| if i == idx { None } else { by_name.get(c.name.as_str()).copied() })
        .collect();

    if let Some((r, row)) = rows
        .iter()
        .enumerate()
        .find(|(_, row)| row_fits_pattern(row, &pattern))
    {
        let value = row.get(idx).cloned().unwrap_or_default();
        if !value.is_empty() {
            debug!(column = %column.name, row = r, value = %value, "inferred input from row");
            return value;
        }
    }

    debug!(column = %column.name, "no value for input, defaulting to empty");
    Cell::empty()
}

/// Non-empty value carried under `name`
///
/// Only carry-over skips empty values. Inference treats a carried empty
/// value as a constraint; only names absent from the map are unconstrained.
fn known_value<'a>(by_name: &HashMap<&str, &'a Cell>, name: &str) -> Option<&'a Cell> {
    by_name.get(name).copied().filter(|v| !v.is_empty())
}

/// Every constrained position holds the same text as the pattern
fn row_fits_pattern(row: &[Cell], pattern: &[Option<&Cell>]) -> bool {
    pattern.iter().enumerate().all(|(i, expected)| match expected {
        None => true,
        Some(value) => row.get(i).is_some_and(|cell| cell.text_eq(value)),
    })
}

fn input_columns(columns: &[Column]) -> &[Column] {
    match columns.len() {
        0 => &[],
        n => &columns[..n - 1],
    }
}
