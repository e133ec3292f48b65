//! Table model: the core data types
//!
//! A `Table` is a decision table: an ordered list of condition columns
//! followed by exactly one output column, an ordered list of rows (one
//! cell per column), and a suite of test cases whose inputs line up with
//! the condition columns.
//!
//! ## Example Snapshot
//!
//! ```json
//! {
//!   "title": "Authorization Indicator Check",
//!   "columns": [
//!     { "name": "Authorization Indicator", "type": "String", "condition": "Equals" },
//!     { "name": "UM Core Edit", "type": "Boolean", "condition": "Equals" },
//!     { "name": "Result", "type": "String", "condition": "Equals" }
//!   ],
//!   "rows": [
//!     ["Y", "TRUE", "Proceed to Claim Level Bypass Check"],
//!     ["-", "-", "No action specified"]
//!   ],
//!   "testCases": [
//!     { "inputs": ["Y", "TRUE"], "expected": "Proceed to Claim Level Bypass Check" }
//!   ]
//! }
//! ```

use crate::error::{Error, Result};
use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

/// A row of cells, positionally aligned with `Table::columns`
pub type Row = Vec<Cell>;

/// A single cell value
///
/// Cells arrive from the editor as text, but snapshots and proposals may
/// carry raw booleans or numbers. All matching is done on the text form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum Cell {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Null,
}

impl Default for Cell {
    fn default() -> Self {
        Cell::Text(String::new())
    }
}

impl Cell {
    /// The empty cell
    pub fn empty() -> Self {
        Cell::default()
    }

    /// A text cell
    pub fn text(s: impl Into<String>) -> Self {
        Cell::Text(s.into())
    }

    /// Text form used for every comparison
    pub fn as_text(&self) -> String {
        match self {
            Cell::Bool(b) => b.to_string(),
            Cell::Int(i) => i.to_string(),
            Cell::Float(f) => f.to_string(),
            Cell::Text(s) => s.clone(),
            Cell::Null => String::new(),
        }
    }

    /// True for `""` and null
    pub fn is_empty(&self) -> bool {
        match self {
            Cell::Text(s) => s.is_empty(),
            Cell::Null => true,
            _ => false,
        }
    }

    /// Textual equality
    pub fn text_eq(&self, other: &Cell) -> bool {
        self.as_text() == other.as_text()
    }

    /// True if this cell holds exactly the wildcard token
    pub fn is_wildcard(&self, wildcard: &str) -> bool {
        matches!(self, Cell::Text(s) if s == wildcard)
    }

    /// Convert an arbitrary JSON value without failing
    ///
    /// Arrays and objects are kept as their JSON text.
    pub fn from_json_lossy(value: &serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Cell::Null,
            serde_json::Value::Bool(b) => Cell::Bool(*b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Cell::Int(i),
                None => Cell::Float(n.as_f64().unwrap_or_default()),
            },
            serde_json::Value::String(s) => Cell::Text(s.clone()),
            other => Cell::Text(other.to_string()),
        }
    }
}

impl std::fmt::Display for Cell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_text())
    }
}

impl From<&str> for Cell {
    fn from(s: &str) -> Self {
        Cell::Text(s.to_string())
    }
}

impl From<String> for Cell {
    fn from(s: String) -> Self {
        Cell::Text(s)
    }
}

impl From<bool> for Cell {
    fn from(b: bool) -> Self {
        Cell::Bool(b)
    }
}

impl From<i64> for Cell {
    fn from(i: i64) -> Self {
        Cell::Int(i)
    }
}

/// Column data types
///
/// Parsed leniently: unknown names fall back to `String`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum DataType {
    #[default]
    String,
    Number,
    Boolean,
    Date,
}

impl DataType {
    /// Display name as used in snapshots
    pub fn as_str(&self) -> &'static str {
        match self {
            DataType::String => "String",
            DataType::Number => "Number",
            DataType::Boolean => "Boolean",
            DataType::Date => "Date",
        }
    }
}

impl From<String> for DataType {
    fn from(s: String) -> Self {
        match s.trim().to_lowercase().as_str() {
            "number" | "int" | "float" => DataType::Number,
            "boolean" | "bool" => DataType::Boolean,
            "date" => DataType::Date,
            _ => DataType::String,
        }
    }
}

impl From<DataType> for String {
    fn from(t: DataType) -> Self {
        t.as_str().to_string()
    }
}

impl std::fmt::Display for DataType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Column comparison modes
///
/// Declared per column but not consulted by evaluation, which always
/// compares text exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ComparisonMode {
    #[default]
    Equals,
    GreaterThan,
    LessThan,
    Contains,
}

impl ComparisonMode {
    /// Display name as used in snapshots
    pub fn as_str(&self) -> &'static str {
        match self {
            ComparisonMode::Equals => "Equals",
            ComparisonMode::GreaterThan => "Greater Than",
            ComparisonMode::LessThan => "Less Than",
            ComparisonMode::Contains => "Contains",
        }
    }
}

impl From<String> for ComparisonMode {
    fn from(s: String) -> Self {
        let key: String = s
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '_')
            .collect::<String>()
            .to_lowercase();
        match key.as_str() {
            "greaterthan" | "gt" | ">" => ComparisonMode::GreaterThan,
            "lessthan" | "lt" | "<" => ComparisonMode::LessThan,
            "contains" => ComparisonMode::Contains,
            _ => ComparisonMode::Equals,
        }
    }
}

impl From<ComparisonMode> for String {
    fn from(m: ComparisonMode) -> Self {
        m.as_str().to_string()
    }
}

impl std::fmt::Display for ComparisonMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A table column
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Column {
    /// Column name, unique within a table
    #[serde(default)]
    pub name: String,

    /// Declared data type
    #[serde(rename = "type", alias = "dataType", default)]
    #[schemars(with = "String")]
    pub data_type: DataType,

    /// Declared comparison mode
    #[serde(rename = "condition", alias = "comparisonMode", default)]
    #[schemars(with = "String")]
    pub comparison: ComparisonMode,
}

impl Column {
    pub fn new(name: impl Into<String>, data_type: DataType, comparison: ComparisonMode) -> Self {
        Self {
            name: name.into(),
            data_type,
            comparison,
        }
    }

    /// A `String`/`Equals` column
    pub fn string(name: impl Into<String>) -> Self {
        Self::new(name, DataType::String, ComparisonMode::Equals)
    }

    /// A `Boolean`/`Equals` column
    pub fn boolean(name: impl Into<String>) -> Self {
        Self::new(name, DataType::Boolean, ComparisonMode::Equals)
    }
}

/// Outcome of the last suite run for a test case
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub enum TestStatus {
    Pass,
    Fail,
    /// No expectation was given
    Inconclusive,
    #[default]
    NotRun,
}

/// A test case: one value per input column plus an expected output
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, JsonSchema)]
pub struct TestCase {
    /// Values positionally aligned with the input columns
    #[serde(default)]
    pub inputs: Vec<Cell>,

    /// Expected output; empty means "no expectation"
    #[serde(default)]
    pub expected: Cell,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Output from the last suite run
    #[serde(default)]
    pub result: Option<Cell>,

    #[serde(default, deserialize_with = "status_or_not_run")]
    #[schemars(with = "Option<TestStatus>")]
    pub status: TestStatus,

    /// Fields this crate does not interpret, kept for round-tripping
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

fn status_or_not_run<'de, D>(deserializer: D) -> std::result::Result<TestStatus, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<TestStatus>::deserialize(deserializer)?.unwrap_or_default())
}

impl TestCase {
    pub fn new(inputs: Vec<Cell>, expected: impl Into<Cell>) -> Self {
        Self {
            inputs,
            expected: expected.into(),
            ..Default::default()
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Whether an expectation was given
    pub fn has_expectation(&self) -> bool {
        !self.expected.is_empty()
    }
}

/// A decision table with its test suite
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
#[schemars(title = "Decision Table", description = "Decision table snapshot")]
pub struct Table {
    #[serde(default = "default_title")]
    pub title: String,

    /// Condition columns followed by the output column
    #[serde(default)]
    pub columns: Vec<Column>,

    #[serde(default)]
    pub rows: Vec<Row>,

    #[serde(default)]
    pub test_cases: Vec<TestCase>,
}

fn default_title() -> String {
    "New Decision Table".to_string()
}

impl Default for Table {
    fn default() -> Self {
        Self::new(default_title())
    }
}

impl Table {
    /// A fresh table: one condition column, a `Result` column and one empty row
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            columns: vec![Column::string("Condition 1"), Column::string("Result")],
            rows: vec![vec![Cell::empty(), Cell::empty()]],
            test_cases: Vec::new(),
        }
    }

    /// Build a table from parts
    pub fn from_parts(
        title: impl Into<String>,
        columns: Vec<Column>,
        rows: Vec<Row>,
        test_cases: Vec<TestCase>,
    ) -> Self {
        Self {
            title: title.into(),
            columns,
            rows,
            test_cases,
        }
    }

    /// Parse a snapshot from JSON
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| Error::SnapshotParse(e.to_string()))
    }

    /// Serialize to a JSON snapshot
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| Error::SnapshotParse(e.to_string()))
    }

    /// Parse a snapshot from YAML
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_norway::from_str(yaml).map_err(|e| Error::SnapshotParse(e.to_string()))
    }

    /// Serialize to a YAML snapshot
    pub fn to_yaml(&self) -> Result<String> {
        serde_norway::to_string(self).map_err(|e| Error::SnapshotParse(e.to_string()))
    }

    /// JSON Schema of the snapshot format
    pub fn json_schema() -> serde_json::Value {
        serde_json::to_value(schemars::schema_for!(Table)).unwrap_or_default()
    }

    /// Hash of the snapshot for change detection
    pub fn fingerprint(&self) -> String {
        use sha2::{Digest, Sha256};
        let content = serde_json::to_string(self).unwrap_or_default();
        let mut hasher = Sha256::new();
        hasher.update(content.as_bytes());
        format!("sha256:{}", hex::encode(&hasher.finalize()[..8]))
    }

    /// Condition columns (every column but the last)
    pub fn input_columns(&self) -> &[Column] {
        match self.columns.len() {
            0 => &[],
            n => &self.columns[..n - 1],
        }
    }

    /// The output column (the last column)
    pub fn output_column(&self) -> Option<&Column> {
        self.columns.last()
    }

    /// Index of the first column with this exact name
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    /// Tally of test statuses
    pub fn suite_summary(&self) -> crate::suite::SuiteSummary {
        crate::suite::SuiteSummary::from_test_cases(&self.test_cases)
    }
}
