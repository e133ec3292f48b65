// Production-quality lints
#![warn(
    clippy::todo,
    clippy::unimplemented,
    clippy::dbg_macro,
    clippy::print_stdout,
    clippy::print_stderr
)]
// Deny truly dangerous patterns
#![deny(clippy::mem_forget)]
#![allow(clippy::missing_errors_doc, clippy::missing_panics_doc)]

//! # dtable: Decision Table Consistency & Evaluation Engine
//!
//! Keeps a decision table, its rows and its test suite consistent while the
//! table is edited by hand or by an assistant.
//!
//! ## Core Concept
//!
//! A table is an ordered list of condition columns plus one output column
//! (always last), rows of cells, and test cases. From a table, dtable can:
//!
//! - **Evaluate** inputs first-match-wins, with `-` as a wildcard
//! - **Edit** columns and rows while keeping the output column last, rows
//!   the right width and boolean cells canonical
//! - **Realign** test cases by column name whenever columns change
//! - **Run** the test suite and report pass / fail / inconclusive
//! - **Merge** assistant proposals (new columns, rows, or test cases)
//!
//! ## Quick Start
//!
//! ```rust
//! use dtable::{assignment, ColumnEdit, Engine, Table};
//!
//! let table = Table::from_json(r#"{
//!   "title": "Authorization Indicator Check",
//!   "columns": [
//!     { "name": "Authorization Indicator", "type": "String", "condition": "Equals" },
//!     { "name": "UM Core Edit", "type": "Boolean", "condition": "Equals" },
//!     { "name": "Result", "type": "String", "condition": "Equals" }
//!   ],
//!   "rows": [
//!     ["Y", "TRUE", "Proceed"],
//!     ["-", "-", "No action specified"]
//!   ],
//!   "testCases": [{ "inputs": ["Y", "TRUE"], "expected": "Proceed" }]
//! }"#)?;
//!
//! let engine = Engine::new();
//! let output = engine.evaluate_to_cell(
//!     &table,
//!     &assignment([("Authorization Indicator", "N"), ("UM Core Edit", "FALSE")]),
//! );
//! assert_eq!(output.as_text(), "No action specified");
//!
//! // Columns can be added at any time; the test suite follows along.
//! let table = engine.apply_column_edit(&table, ColumnEdit::Add);
//! assert_eq!(table.test_cases[0].inputs.len(), 3);
//!
//! let table = engine.run_test_suite(&table);
//! assert_eq!(table.suite_summary().total, 1);
//! # Ok::<(), dtable::Error>(())
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                                                              │
//! │  TABLE ──► apply_column_edit ──► set_columns ──┬─► normalize │
//! │    │                                           └─► realign   │
//! │    ├──► apply_row_edit                                       │
//! │    ├──► evaluate(assignment) ──► MatchResult                 │
//! │    ├──► run_test_suite ──► TestCase.result / status          │
//! │    └──► merge_suggestion(Proposal) ──► MergeOutcome          │
//! │                                                              │
//! └──────────────────────────────────────────────────────────────┘
//! ```

pub mod config;
pub mod error;
pub mod model;

pub mod columns;
pub mod engine;
pub mod evaluate;
pub mod history;
pub mod merge;
pub mod normalize;
pub mod proposal;
pub mod realign;
pub mod rows;
pub mod suite;

// Re-exports
pub use columns::{ColumnEdit, ColumnField, OutputColumn};
pub use config::EngineConfig;
pub use engine::{
    apply_column_edit, apply_row_edit, apply_test_case_edit, evaluate, merge_suggestion,
    run_test_suite, Engine,
};
pub use error::{Error, Result};
pub use evaluate::{assignment, InputAssignment, MatchResult};
pub use history::{ChangeEntry, ChangeLog};
pub use merge::{MergeOutcome, MergeReport};
pub use model::{Cell, Column, ComparisonMode, DataType, Row, Table, TestCase, TestStatus};
pub use normalize::{normalize_row, FALSE_TOKEN, TRUE_TOKEN};
pub use proposal::{PartialTable, Proposal, ProposedTestCase, TestCaseProposal};
pub use realign::realign_test_cases;
pub use rows::RowEdit;
pub use suite::{SuiteSummary, TestCaseEdit};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
