//! Test suite running and editing
//!
//! The runner looks for the first row whose condition cells equal the test
//! case's inputs, in order and as text. Unlike evaluation, wildcard cells
//! get no special treatment here: a `-` cell only matches a `-` input.

use crate::columns::{input_positions, resolve_output_column};
use crate::config::EngineConfig;
use crate::model::{Cell, Table, TestCase, TestStatus};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// A test-case edit
#[derive(Debug, Clone, PartialEq)]
pub enum TestCaseEdit {
    /// Append a blank test case sized to the input columns
    Add,
    Remove(usize),
    UpdateInput { case: usize, input: usize, value: Cell },
    UpdateExpected { case: usize, value: Cell },
    UpdateDescription { case: usize, value: String },
}

/// Counts of test statuses
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuiteSummary {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub inconclusive: usize,
    pub not_run: usize,
}

impl SuiteSummary {
    pub fn from_test_cases(test_cases: &[TestCase]) -> Self {
        let mut summary = SuiteSummary {
            total: test_cases.len(),
            ..Default::default()
        };
        for tc in test_cases {
            match tc.status {
                TestStatus::Pass => summary.passed += 1,
                TestStatus::Fail => summary.failed += 1,
                TestStatus::Inconclusive => summary.inconclusive += 1,
                TestStatus::NotRun => summary.not_run += 1,
            }
        }
        summary
    }

    /// Every test with an expectation passed
    pub fn all_passed(&self) -> bool {
        self.failed == 0 && self.not_run == 0
    }
}

/// Run every test case, filling in `result` and `status`
pub fn run_test_suite(table: &Table, config: &EngineConfig) -> Table {
    let test_cases = table
        .test_cases
        .iter()
        .map(|tc| run_test_case(table, tc, config))
        .collect();
    Table {
        test_cases,
        ..table.clone()
    }
}

/// Run one test case against the table
///
/// Inputs and output are located the same way evaluation locates them, so a
/// snapshot whose output column is not last still runs correctly.
pub fn run_test_case(table: &Table, tc: &TestCase, config: &EngineConfig) -> TestCase {
    let result = resolve_output_column(&table.columns, config)
        .and_then(|output| {
            find_row_for_inputs(table, &tc.inputs, config)
                .map(|row| table.rows[row].get(output.index).cloned().unwrap_or_default())
        })
        .unwrap_or_else(|| Cell::text(&config.no_match_text));

    let status = if !tc.has_expectation() {
        TestStatus::Inconclusive
    } else if result.text_eq(&tc.expected) {
        TestStatus::Pass
    } else {
        TestStatus::Fail
    };

    TestCase {
        result: Some(result),
        status,
        ..tc.clone()
    }
}

/// Index of the first row whose input cells equal `inputs` in order
fn find_row_for_inputs(table: &Table, inputs: &[Cell], config: &EngineConfig) -> Option<usize> {
    let positions = input_positions(&table.columns, config);
    table.rows.iter().position(|row| {
        positions.iter().enumerate().all(|(idx, &pos)| {
            let cell = row.get(pos).cloned().unwrap_or_default();
            inputs.get(idx).is_some_and(|value| cell.text_eq(value))
        })
    })
}

/// Apply a test-case edit; `result`/`status` are left stale
pub fn apply_test_case_edit(table: &Table, edit: TestCaseEdit) -> Table {
    let mut next = table.clone();
    match edit {
        TestCaseEdit::Add => {
            let width = table.columns.len().saturating_sub(1);
            next.test_cases
                .push(TestCase::new(vec![Cell::empty(); width], Cell::empty()));
        }
        TestCaseEdit::Remove(case) => {
            if case < next.test_cases.len() {
                next.test_cases.remove(case);
            } else {
                warn!(case, "remove test case: index out of range");
            }
        }
        TestCaseEdit::UpdateInput { case, input, value } => {
            match next.test_cases.get_mut(case).and_then(|tc| tc.inputs.get_mut(input)) {
                Some(cell) => *cell = value,
                None => warn!(case, input, "update test input: index out of range"),
            }
        }
        TestCaseEdit::UpdateExpected { case, value } => match next.test_cases.get_mut(case) {
            Some(tc) => tc.expected = value,
            None => warn!(case, "update expected: index out of range"),
        },
        TestCaseEdit::UpdateDescription { case, value } => match next.test_cases.get_mut(case) {
            Some(tc) => tc.description = Some(value),
            None => warn!(case, "update description: index out of range"),
        },
    }
    next
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Column, Row};

    fn cells(values: &[&str]) -> Row {
        values.iter().map(|v| Cell::text(*v)).collect()
    }

    fn table(test_cases: Vec<TestCase>) -> Table {
        Table::from_parts(
            "t",
            vec![
                Column::string("Cond1"),
                Column::boolean("Cond2"),
                Column::string("Result"),
            ],
            vec![cells(&["Y", "TRUE", "r1"]), cells(&["-", "-", "r2"])],
            test_cases,
        )
    }

    #[test]
    fn test_pass_fail_inconclusive() {
        let config = EngineConfig::default();
        let t = table(vec![
            TestCase::new(cells(&["Y", "TRUE"]), "r1"),
            TestCase::new(cells(&["Y", "TRUE"]), "r2"),
            TestCase::new(cells(&["Y", "TRUE"]), ""),
        ]);
        let ran = run_test_suite(&t, &config);
        let statuses: Vec<_> = ran.test_cases.iter().map(|tc| tc.status).collect();
        assert_eq!(
            statuses,
            vec![TestStatus::Pass, TestStatus::Fail, TestStatus::Inconclusive]
        );
        assert_eq!(ran.test_cases[1].result, Some(Cell::text("r1")));
    }

    #[test]
    fn test_wildcards_not_expanded_for_test_inputs() {
        let config = EngineConfig::default();
        let t = table(vec![
            TestCase::new(cells(&["N", "FALSE"]), "r2"),
            TestCase::new(cells(&["-", "-"]), "r2"),
        ]);
        let ran = run_test_suite(&t, &config);
        assert_eq!(ran.test_cases[0].result, Some(Cell::text("No match found")));
        assert_eq!(ran.test_cases[0].status, TestStatus::Fail);
        assert_eq!(ran.test_cases[1].status, TestStatus::Pass);
    }

    #[test]
    fn test_output_column_found_by_name_when_not_last() {
        let config = EngineConfig::default();
        let t = Table::from_json(
            r#"{
            "title": "loaded",
            "columns": [{ "name": "Result" }, { "name": "A" }, { "name": "B" }],
            "rows": [["r1", "x", "y"], ["r2", "x", "z"]],
            "testCases": [
                { "inputs": ["x", "z"], "expected": "r2" },
                { "inputs": ["x", "y"], "expected": "r1" }
            ]
        }"#,
        )
        .unwrap();
        let ran = run_test_suite(&t, &config);
        for tc in &ran.test_cases {
            let evaluated = crate::evaluate::evaluate_positional(&t, &tc.inputs, &config)
                .into_cell(&config.no_match_text);
            assert_eq!(tc.result.as_ref(), Some(&evaluated));
            assert_eq!(tc.status, TestStatus::Pass);
        }
    }

    #[test]
    fn test_run_is_idempotent() {
        let config = EngineConfig::default();
        let t = table(vec![TestCase::new(cells(&["Y", "TRUE"]), "r1")]);
        let once = run_test_suite(&t, &config);
        let twice = run_test_suite(&once, &config);
        assert_eq!(once, twice);
        assert_eq!(once.rows, t.rows);
    }

    #[test]
    fn test_summary() {
        let config = EngineConfig::default();
        let t = table(vec![
            TestCase::new(cells(&["Y", "TRUE"]), "r1"),
            TestCase::new(cells(&["Y", "TRUE"]), "r2"),
            TestCase::new(cells(&["Y", "TRUE"]), ""),
        ]);
        assert_eq!(t.suite_summary().not_run, 3);
        let summary = run_test_suite(&t, &config).suite_summary();
        assert_eq!(summary.total, 3);
        assert_eq!(summary.passed, 1);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.inconclusive, 1);
        assert!(!summary.all_passed());
    }

    #[test]
    fn test_edits() {
        let t = table(vec![]);
        let t = apply_test_case_edit(&t, TestCaseEdit::Add);
        assert_eq!(t.test_cases[0].inputs, cells(&["", ""]));
        let t = apply_test_case_edit(
            &t,
            TestCaseEdit::UpdateInput {
                case: 0,
                input: 1,
                value: Cell::text("TRUE"),
            },
        );
        let t = apply_test_case_edit(
            &t,
            TestCaseEdit::UpdateExpected {
                case: 0,
                value: Cell::text("r1"),
            },
        );
        let t = apply_test_case_edit(
            &t,
            TestCaseEdit::UpdateDescription {
                case: 0,
                value: "flag set".into(),
            },
        );
        assert_eq!(t.test_cases[0].inputs, cells(&["", "TRUE"]));
        assert_eq!(t.test_cases[0].expected, Cell::text("r1"));
        assert_eq!(t.test_cases[0].description.as_deref(), Some("flag set"));
        assert_eq!(apply_test_case_edit(&t, TestCaseEdit::Remove(4)), t);
        assert!(apply_test_case_edit(&t, TestCaseEdit::Remove(0)).test_cases.is_empty());
    }
}
