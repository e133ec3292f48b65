//! Suggestion merging
//!
//! Folds a classified [`Proposal`] into a live table.
//!
//! Test-case proposals are remapped into the current input-column order by
//! name and appended; pairs with identical `(inputs, expected)` collapse to
//! their first occurrence. Once a proposal adds anything, duplicates already
//! in the suite collapse too, and the report counts them.
//!
//! Column/row proposals need columns: rows alone cannot be placed and are
//! ignored. Only columns the table does not already have are added,
//! placing them just before the output column. Proposed rows replace the
//! table's rows after being remapped into the merged column order; without
//! proposed rows the existing rows gain empty cells for the new columns.
//! The result then goes through the regular column pipeline, so the output
//! column is re-placed and the test suite realigned.

use crate::columns::{input_positions, insertion_index, set_columns};
use crate::config::EngineConfig;
use crate::model::{Cell, Column, Row, Table, TestCase, TestStatus};
use crate::proposal::{PartialTable, Proposal, ProposedTestCase, TestCaseProposal};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use tracing::{info, warn};

/// What a merge changed
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeReport {
    /// Proposal kind that was merged
    pub kind: String,
    /// Names of columns that were added
    pub added_columns: Vec<String>,
    /// Number of test cases that survived deduplication
    pub added_test_cases: usize,
    /// Existing test cases dropped as duplicates of earlier existing ones
    pub collapsed_test_cases: usize,
    /// Whether the table's rows were replaced by proposed rows
    pub rows_replaced: bool,
}

impl MergeReport {
    /// True when the proposal contributed nothing
    pub fn is_noop(&self) -> bool {
        self.added_columns.is_empty() && self.added_test_cases == 0 && !self.rows_replaced
    }
}

/// Merged table plus report
#[derive(Debug, Clone, PartialEq)]
pub struct MergeOutcome {
    pub table: Table,
    pub report: MergeReport,
}

impl MergeOutcome {
    fn unchanged(table: &Table, kind: &str) -> Self {
        Self {
            table: table.clone(),
            report: MergeReport {
                kind: kind.to_string(),
                ..Default::default()
            },
        }
    }
}

/// Merge a proposal into a table
pub fn merge_suggestion(table: &Table, proposal: &Proposal, config: &EngineConfig) -> MergeOutcome {
    let outcome = match proposal {
        Proposal::TestCases(p) => merge_test_cases(table, p, config),
        Proposal::PartialTable(p) => merge_partial_table(table, p, config),
        Proposal::Unrecognized => MergeOutcome::unchanged(table, proposal.kind()),
    };

    if outcome.report.is_noop() {
        info!(kind = %outcome.report.kind, "proposal contributed nothing; table unchanged");
    } else {
        info!(
            kind = %outcome.report.kind,
            added_columns = ?outcome.report.added_columns,
            added_test_cases = outcome.report.added_test_cases,
            collapsed_test_cases = outcome.report.collapsed_test_cases,
            rows_replaced = outcome.report.rows_replaced,
            "merged proposal"
        );
    }
    outcome
}

fn merge_test_cases(
    table: &Table,
    proposal: &TestCaseProposal,
    config: &EngineConfig,
) -> MergeOutcome {
    let current: Vec<&str> = input_positions(&table.columns, config)
        .into_iter()
        .map(|i| table.columns[i].name.as_str())
        .collect();

    let incoming: Vec<TestCase> = proposal
        .test_cases
        .iter()
        .map(|tc| {
            let names = tc
                .column_names
                .as_deref()
                .or(proposal.column_names.as_deref());
            adopt_test_case(tc, names, &current)
        })
        .collect();

    let existing = table.test_cases.len();
    let mut seen = HashSet::new();
    let mut added = 0;
    let mut collapsed = 0;
    let mut merged = Vec::with_capacity(existing + incoming.len());
    for (idx, tc) in table.test_cases.iter().chain(incoming.iter()).enumerate() {
        if seen.insert(dedupe_key(tc)) {
            if idx >= existing {
                added += 1;
            }
            merged.push(tc.clone());
        } else if idx < existing {
            collapsed += 1;
        }
    }

    if added == 0 {
        return MergeOutcome::unchanged(table, "test_cases");
    }

    MergeOutcome {
        table: Table {
            test_cases: merged,
            ..table.clone()
        },
        report: MergeReport {
            kind: "test_cases".into(),
            added_test_cases: added,
            collapsed_test_cases: collapsed,
            ..Default::default()
        },
    }
}

/// Turn a proposed test case into one aligned with `current` input names
fn adopt_test_case(tc: &ProposedTestCase, names: Option<&[String]>, current: &[&str]) -> TestCase {
    let mut extra = tc.extra.clone();
    extra.remove("result");
    extra.remove("status");
    TestCase {
        inputs: match names {
            Some(names) => remap_inputs(&tc.inputs, names, current),
            None => {
                let mut inputs = tc.inputs.clone();
                inputs.resize(current.len(), Cell::empty());
                inputs
            }
        },
        expected: tc.expected.clone(),
        description: tc.description.clone(),
        result: None,
        status: TestStatus::NotRun,
        extra,
    }
}

/// Reorder `inputs` (labelled by `names`) into `target` order; unknown names are empty
pub fn remap_inputs(inputs: &[Cell], names: &[String], target: &[&str]) -> Vec<Cell> {
    let by_name: HashMap<&str, &Cell> = names
        .iter()
        .map(String::as_str)
        .zip(inputs.iter())
        .collect();
    target
        .iter()
        .map(|name| by_name.get(name).map(|c| (*c).clone()).unwrap_or_default())
        .collect()
}

/// Identity of a test case for deduplication: serialized inputs plus expected
fn dedupe_key(tc: &TestCase) -> (String, String) {
    (
        serde_json::to_string(&tc.inputs).unwrap_or_default(),
        serde_json::to_string(&tc.expected).unwrap_or_default(),
    )
}

fn merge_partial_table(table: &Table, proposal: &PartialTable, config: &EngineConfig) -> MergeOutcome {
    match &proposal.columns {
        Some(columns) if !columns.is_empty() => {
            merge_columns(table, columns, proposal.rows.as_deref(), config)
        }
        _ => {
            if proposal.rows.as_ref().is_some_and(|rows| !rows.is_empty()) {
                warn!("ignoring proposed rows without columns to place them");
            }
            MergeOutcome::unchanged(table, "partial_table")
        }
    }
}

fn merge_columns(
    table: &Table,
    proposed: &[Column],
    rows: Option<&[Row]>,
    config: &EngineConfig,
) -> MergeOutcome {
    let mut known: HashSet<&str> = table.columns.iter().map(|c| c.name.as_str()).collect();
    let new_columns: Vec<Column> = proposed
        .iter()
        .filter(|c| known.insert(c.name.as_str()))
        .cloned()
        .collect();

    if new_columns.is_empty() && rows.is_none() {
        return MergeOutcome::unchanged(table, "partial_table");
    }

    let at = insertion_index(&table.columns, config);
    let mut merged = table.columns.clone();
    for (offset, col) in new_columns.iter().enumerate() {
        merged.insert(at + offset, col.clone());
    }

    let merged_rows: Vec<Row> = match rows {
        Some(rows) => {
            let index = name_positions(proposed.iter().map(|c| c.name.as_str()));
            rows.iter().map(|row| pick_by_name(&merged, &index, row)).collect()
        }
        None => {
            let index = name_positions(table.columns.iter().map(|c| c.name.as_str()));
            table
                .rows
                .iter()
                .map(|row| pick_by_name(&merged, &index, row))
                .collect()
        }
    };

    let staged = Table {
        rows: merged_rows,
        ..table.clone()
    };
    MergeOutcome {
        table: set_columns(&staged, merged, config),
        report: MergeReport {
            kind: "partial_table".into(),
            added_columns: new_columns.into_iter().map(|c| c.name).collect(),
            rows_replaced: rows.is_some(),
            ..Default::default()
        },
    }
}

/// Position of each name; a repeated name maps to its last position
fn name_positions<'a>(names: impl Iterator<Item = &'a str>) -> HashMap<&'a str, usize> {
    names.enumerate().map(|(i, name)| (name, i)).collect()
}

/// Cells of `row` (laid out per `index`) in `columns` order
fn pick_by_name(columns: &[Column], index: &HashMap<&str, usize>, row: &[Cell]) -> Row {
    columns
        .iter()
        .map(|col| {
            index
                .get(col.name.as_str())
                .and_then(|&i| row.get(i))
                .cloned()
                .unwrap_or_default()
        })
        .collect()
}
