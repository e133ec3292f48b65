//! Engine: the entry point for hosting applications
//!
//! Every operation takes a table and returns a new one; nothing is mutated
//! in place and no operation fails. Column edits always come back with the
//! output column last, rows re-normalized and the test suite realigned.
//!
//! The free functions at the bottom use the default configuration.

use crate::columns::{self, ColumnEdit};
use crate::config::EngineConfig;
use crate::evaluate::{self, InputAssignment, MatchResult};
use crate::merge::{self, MergeOutcome};
use crate::model::{Cell, Table};
use crate::proposal::Proposal;
use crate::rows::{self, RowEdit};
use crate::suite::{self, TestCaseEdit};

/// Decision table engine
#[derive(Debug, Clone, Default)]
pub struct Engine {
    config: EngineConfig,
}

impl Engine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn apply_column_edit(&self, table: &Table, edit: ColumnEdit) -> Table {
        columns::apply_column_edit(table, edit, &self.config)
    }

    pub fn apply_row_edit(&self, table: &Table, edit: RowEdit) -> Table {
        rows::apply_row_edit(table, edit)
    }

    pub fn apply_test_case_edit(&self, table: &Table, edit: TestCaseEdit) -> Table {
        suite::apply_test_case_edit(table, edit)
    }

    /// Populate `result`/`status` on every test case
    pub fn run_test_suite(&self, table: &Table) -> Table {
        suite::run_test_suite(table, &self.config)
    }

    pub fn merge_suggestion(&self, table: &Table, proposal: &Proposal) -> MergeOutcome {
        merge::merge_suggestion(table, proposal, &self.config)
    }

    pub fn evaluate(&self, table: &Table, assignment: &InputAssignment) -> MatchResult {
        evaluate::evaluate(table, assignment, &self.config)
    }

    /// Matched output, or the no-match text
    pub fn evaluate_to_cell(&self, table: &Table, assignment: &InputAssignment) -> Cell {
        self.evaluate(table, assignment)
            .into_cell(&self.config.no_match_text)
    }

    /// Non-blocking warnings for the editor to surface
    pub fn warnings(&self, table: &Table) -> Vec<String> {
        columns::column_warnings(&table.columns, &self.config)
    }
}

/// Apply a column edit with the default configuration
pub fn apply_column_edit(table: &Table, edit: ColumnEdit) -> Table {
    Engine::new().apply_column_edit(table, edit)
}

/// Apply a row edit
pub fn apply_row_edit(table: &Table, edit: RowEdit) -> Table {
    Engine::new().apply_row_edit(table, edit)
}

/// Apply a test-case edit
pub fn apply_test_case_edit(table: &Table, edit: TestCaseEdit) -> Table {
    Engine::new().apply_test_case_edit(table, edit)
}

/// Run the test suite with the default configuration
pub fn run_test_suite(table: &Table) -> Table {
    Engine::new().run_test_suite(table)
}

/// Merge a proposal with the default configuration
pub fn merge_suggestion(table: &Table, proposal: &Proposal) -> MergeOutcome {
    Engine::new().merge_suggestion(table, proposal)
}

/// Evaluate an assignment with the default configuration
pub fn evaluate(table: &Table, assignment: &InputAssignment) -> MatchResult {
    Engine::new().evaluate(table, assignment)
}
