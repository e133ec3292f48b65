//! Proposals: externally supplied partial models
//!
//! An assistant reply (or a pasted snapshot) arrives as loosely shaped
//! JSON. [`Proposal::classify`] inspects its structure once, at the
//! boundary, and the merger only ever sees one of three variants:
//!
//! - an object with a `testCases` key, or a non-empty array whose every
//!   element has an `inputs` array and an `expected` field → test cases
//! - an object with `columns` and/or `rows` → partial table
//! - anything else → unrecognized (merged as a no-op)
//!
//! Elements that cannot be read are skipped rather than failing the whole
//! proposal.

use crate::error::Result;
use crate::model::{Cell, Column, Row};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::warn;

/// A classified proposal
#[derive(Debug, Clone, PartialEq)]
pub enum Proposal {
    TestCases(TestCaseProposal),
    PartialTable(PartialTable),
    Unrecognized,
}

/// Proposed test cases
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TestCaseProposal {
    /// Column order shared by every test case that carries none of its own
    pub column_names: Option<Vec<String>>,
    pub test_cases: Vec<ProposedTestCase>,
}

/// A proposed test case, possibly in a different column order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProposedTestCase {
    #[serde(default)]
    pub inputs: Vec<Cell>,

    #[serde(default)]
    pub expected: Cell,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Names of the columns `inputs` line up with
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column_names: Option<Vec<String>>,

    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// Proposed columns and/or rows
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PartialTable {
    pub columns: Option<Vec<Column>>,
    pub rows: Option<Vec<Row>>,
}

impl Proposal {
    /// Parse JSON text and classify it
    pub fn from_json(json: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(json)?;
        Ok(Self::classify(&value))
    }

    /// Classify an already-parsed payload by its structure
    pub fn classify(value: &Value) -> Self {
        match value {
            Value::Object(map) if map.contains_key("testCases") => {
                let incoming = match &map["testCases"] {
                    Value::Array(items) => items.iter().collect::<Vec<_>>(),
                    single => vec![single],
                };
                Proposal::TestCases(TestCaseProposal {
                    column_names: map.get("columnNames").and_then(string_list),
                    test_cases: read_test_cases(incoming),
                })
            }
            Value::Array(items) if !items.is_empty() && items.iter().all(looks_like_test_case) => {
                Proposal::TestCases(TestCaseProposal {
                    column_names: None,
                    test_cases: read_test_cases(items.iter().collect()),
                })
            }
            Value::Object(map) if is_present(map.get("columns")) || is_present(map.get("rows")) => {
                Proposal::PartialTable(PartialTable {
                    columns: map.get("columns").and_then(read_columns),
                    rows: map.get("rows").and_then(read_rows),
                })
            }
            _ => Proposal::Unrecognized,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Proposal::TestCases(_) => "test_cases",
            Proposal::PartialTable(_) => "partial_table",
            Proposal::Unrecognized => "unrecognized",
        }
    }
}

impl From<Value> for Proposal {
    fn from(value: Value) -> Self {
        Proposal::classify(&value)
    }
}

fn is_present(value: Option<&Value>) -> bool {
    value.is_some_and(|v| !v.is_null())
}

fn looks_like_test_case(value: &Value) -> bool {
    value.get("inputs").is_some_and(Value::is_array) && value.get("expected").is_some()
}

fn string_list(value: &Value) -> Option<Vec<String>> {
    value.as_array().map(|items| {
        items
            .iter()
            .map(|v| match v {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            })
            .collect()
    })
}

fn read_test_cases(items: Vec<&Value>) -> Vec<ProposedTestCase> {
    items
        .into_iter()
        .enumerate()
        .filter_map(|(idx, item)| {
            if !item.is_object() {
                warn!(index = idx, "skipping proposed test case that is not an object");
                return None;
            }
            match serde_json::from_value::<ProposedTestCase>(item.clone()) {
                Ok(tc) => Some(tc),
                Err(_) => Some(read_test_case_lossy(item)),
            }
        })
        .collect()
}

/// Field-by-field fallback for test cases serde rejects
fn read_test_case_lossy(item: &Value) -> ProposedTestCase {
    let inputs = item
        .get("inputs")
        .and_then(Value::as_array)
        .map(|values| values.iter().map(Cell::from_json_lossy).collect())
        .unwrap_or_default();
    ProposedTestCase {
        inputs,
        expected: item.get("expected").map(Cell::from_json_lossy).unwrap_or_default(),
        description: item
            .get("description")
            .and_then(Value::as_str)
            .map(str::to_string),
        column_names: item.get("columnNames").and_then(string_list),
        extra: BTreeMap::new(),
    }
}

fn read_columns(value: &Value) -> Option<Vec<Column>> {
    let items = value.as_array()?;
    Some(
        items
            .iter()
            .filter_map(|item| match serde_json::from_value::<Column>(item.clone()) {
                Ok(col) if !col.name.trim().is_empty() => Some(col),
                _ => {
                    warn!(column = %item, "skipping unreadable proposed column");
                    None
                }
            })
            .collect(),
    )
}

fn read_rows(value: &Value) -> Option<Vec<Row>> {
    let items = value.as_array()?;
    Some(
        items
            .iter()
            .filter_map(|item| match item.as_array() {
                Some(cells) => Some(cells.iter().map(Cell::from_json_lossy).collect()),
                None => {
                    warn!(row = %item, "skipping proposed row that is not an array");
                    None
                }
            })
            .collect(),
    )
}
