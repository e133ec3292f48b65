//! End-to-end behavior of the engine on the authorization table

use dtable::{
    apply_column_edit, apply_row_edit, assignment, evaluate, run_test_suite, Cell, Column,
    ColumnEdit, ColumnField, Engine, MatchResult, Row, RowEdit, Table, TestCase, TestStatus,
};
use pretty_assertions::assert_eq;
use std::fs;
use std::path::PathBuf;

fn load_fixture(name: &str) -> Table {
    let path = PathBuf::from("tests/fixtures").join(name);
    let content = fs::read_to_string(&path).expect("Failed to read fixture");
    Table::from_json(&content).expect("Failed to parse fixture")
}

fn cells(values: &[&str]) -> Row {
    values.iter().map(|v| Cell::text(*v)).collect()
}

fn scenario_table(rows: Vec<Row>, test_cases: Vec<TestCase>) -> Table {
    Table::from_parts(
        "scenario",
        vec![
            Column::string("Cond1"),
            Column::boolean("Cond2"),
            Column::string("Result"),
        ],
        rows,
        test_cases,
    )
}

fn column_names(table: &Table) -> Vec<String> {
    table.columns.iter().map(|c| c.name.clone()).collect()
}

#[test]
fn test_first_match_wins_over_wildcard_row() {
    let table = scenario_table(
        vec![cells(&["Y", "TRUE", "r1"]), cells(&["-", "-", "r2"])],
        vec![],
    );
    let result = evaluate(&table, &assignment([("Cond1", "Y"), ("Cond2", "TRUE")]));
    assert_eq!(
        result,
        MatchResult::Matched {
            row: 0,
            output: Cell::text("r1")
        }
    );
}

#[test]
fn test_wildcard_row_catches_the_rest() {
    let table = scenario_table(
        vec![cells(&["Y", "TRUE", "r1"]), cells(&["-", "-", "r2"])],
        vec![],
    );
    let output = Engine::new()
        .evaluate_to_cell(&table, &assignment([("Cond1", "N"), ("Cond2", "FALSE")]));
    assert_eq!(output, Cell::text("r2"));
}

#[test]
fn test_no_match_is_a_result_not_an_error() {
    let table = scenario_table(vec![cells(&["Y", "TRUE", "r1"])], vec![]);
    let engine = Engine::new();
    let args = assignment([("Cond1", "N"), ("Cond2", "FALSE")]);
    assert_eq!(engine.evaluate(&table, &args), MatchResult::NoMatch);
    assert_eq!(
        engine.evaluate_to_cell(&table, &args),
        Cell::text("No match found")
    );
}

#[test]
fn test_suite_statuses() {
    let table = scenario_table(
        vec![cells(&["Y", "TRUE", "r1"]), cells(&["-", "-", "r2"])],
        vec![
            TestCase::new(cells(&["Y", "TRUE"]), "r1"),
            TestCase::new(cells(&["Y", "TRUE"]), "r2"),
            TestCase::new(cells(&["Y", "TRUE"]), ""),
        ],
    );
    let ran = run_test_suite(&table);
    let statuses: Vec<TestStatus> = ran.test_cases.iter().map(|tc| tc.status).collect();
    assert_eq!(
        statuses,
        vec![TestStatus::Pass, TestStatus::Fail, TestStatus::Inconclusive]
    );
}

#[test]
fn test_rename_keeps_unchanged_columns() {
    let table = Table::from_parts(
        "rename",
        vec![Column::string("A"), Column::string("B"), Column::string("Result")],
        vec![cells(&["x", "y", "z"])],
        vec![TestCase::new(cells(&["x", "y"]), "z")],
    );
    let renamed = apply_column_edit(
        &table,
        ColumnEdit::Update {
            index: 1,
            field: ColumnField::Name("C".into()),
        },
    );
    let tc = &renamed.test_cases[0];
    assert_eq!(tc.inputs.len(), 2);
    assert_eq!(tc.inputs[0], Cell::text("x"));
    // "C" has no carried value; the row matching A = "x" supplies it
    assert_eq!(tc.inputs[1], Cell::text("y"));
    assert_eq!(tc.expected, Cell::text("z"));
}

#[test]
fn test_rename_without_matching_row_leaves_blank() {
    let table = Table::from_parts(
        "rename",
        vec![Column::string("A"), Column::string("B"), Column::string("Result")],
        vec![cells(&["other", "y", "z"])],
        vec![TestCase::new(cells(&["x", "y"]), "z")],
    );
    let renamed = apply_column_edit(
        &table,
        ColumnEdit::Update {
            index: 1,
            field: ColumnField::Name("C".into()),
        },
    );
    assert_eq!(renamed.test_cases[0].inputs, cells(&["x", ""]));
}

#[test]
fn test_fixture_suite_passes() {
    let table = load_fixture("authorization.json");
    let ran = Engine::new().run_test_suite(&table);
    let summary = ran.suite_summary();
    assert_eq!(summary.total, 3);
    assert_eq!(summary.passed, 2);
    // ("N", "FALSE") only reaches the wildcard row during evaluation, not in the suite
    assert_eq!(summary.failed, 1);
    assert_eq!(ran.test_cases[2].result, Some(Cell::text("No match found")));
}

#[test]
fn test_column_lifecycle_on_fixture() {
    let engine = Engine::new();
    let table = load_fixture("authorization.json");

    let table = engine.apply_column_edit(&table, ColumnEdit::Add);
    assert_eq!(
        column_names(&table),
        vec![
            "Authorization Indicator",
            "UM Core Edit",
            "Condition 4",
            "Result"
        ]
    );
    assert!(table.rows.iter().all(|r| r.len() == 4));
    assert!(table.test_cases.iter().all(|tc| tc.inputs.len() == 3));

    // Second test case ("-", "-") infers "" for the new column from the wildcard row
    assert_eq!(table.test_cases[1].inputs, cells(&["-", "-", ""]));

    let table = engine.apply_column_edit(&table, ColumnEdit::Remove(0));
    assert_eq!(
        column_names(&table),
        vec!["UM Core Edit", "Condition 4", "Result"]
    );
    assert_eq!(table.test_cases[0].inputs, cells(&["TRUE", ""]));
    assert!(engine.warnings(&table).is_empty());
}

#[test]
fn test_reorder_moves_cells_and_inputs() {
    let table = load_fixture("authorization.json");
    let mut reordered = vec![
        table.columns[2].clone(),
        table.columns[1].clone(),
        table.columns[0].clone(),
    ];
    // rows are read positionally against the new list
    let staged = Table {
        rows: table
            .rows
            .iter()
            .map(|r| vec![r[2].clone(), r[1].clone(), r[0].clone()])
            .collect(),
        ..table.clone()
    };
    let next = apply_column_edit(&staged, ColumnEdit::Set(reordered.clone()));
    reordered.rotate_left(1);
    assert_eq!(next.columns, reordered);
    assert_eq!(
        next.rows[0],
        cells(&["TRUE", "Y", "Proceed to Claim Level Bypass Check"])
    );
    assert_eq!(next.test_cases[0].inputs, cells(&["TRUE", "Y"]));
    assert_eq!(next.test_cases[2].inputs, cells(&["FALSE", "N"]));
}

#[test]
fn test_cell_edits_are_raw_until_next_column_edit() {
    let table = load_fixture("authorization.json");
    let edited = apply_row_edit(
        &table,
        RowEdit::UpdateCell {
            row: 0,
            col: 1,
            value: Cell::Bool(false),
        },
    );
    assert_eq!(edited.rows[0][1], Cell::Bool(false));

    let retyped = apply_column_edit(
        &edited,
        ColumnEdit::Update {
            index: 0,
            field: ColumnField::Name("Indicator".into()),
        },
    );
    assert_eq!(retyped.rows[0][1], Cell::text("FALSE"));
}

#[test]
fn test_row_edits_keep_arity() {
    let table = load_fixture("authorization.json");
    let table = apply_row_edit(&table, RowEdit::Add);
    assert_eq!(table.rows.len(), 3);
    assert_eq!(table.rows[2], cells(&["", "", ""]));
    let table = apply_row_edit(&table, RowEdit::Remove(0));
    assert_eq!(table.rows.len(), 2);
    assert_eq!(table.rows[0][0], Cell::text("-"));
}

#[test]
fn test_snapshot_round_trip_after_run() {
    let table = run_test_suite(&load_fixture("authorization.json"));
    let json = table.to_json().unwrap();
    assert_eq!(Table::from_json(&json).unwrap(), table);
    assert_eq!(table.fingerprint(), Table::from_json(&json).unwrap().fingerprint());
}
