//! In-memory workforce table.
//!
//! A [`Dataset`] is an ordered sequence of [`Record`]s. Columns are allowed to
//! vary between records; the dataset keeps the union of every column it has
//! seen (in first-seen order) so that aggregations can check column presence
//! once per call instead of probing every row.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::datatype::Value;
use crate::error::{BenchscopeError, Result};

pub const STATUS: &str = "Status";
pub const LOCATION: &str = "Location";
pub const BENCH: &str = "Bench";
pub const ALLOCATED: &str = "Allocated";
pub const ALL: &str = "All";

// ------------- Record -------------
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    fields: HashMap<String, Value>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn with<K: Into<String>, V: Into<Value>>(mut self, column: K, value: V) -> Self {
        self.set(column, value);
        self
    }
    pub fn set<K: Into<String>, V: Into<Value>>(&mut self, column: K, value: V) {
        self.fields.insert(column.into(), value.into());
    }
    /// `None` when the column is absent from this record, which is different
    /// from a present column holding [`Value::Empty`].
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.fields.get(column)
    }
    pub fn number(&self, column: &str) -> Option<f64> {
        self.get(column).and_then(Value::as_number)
    }
    pub fn key(&self, column: &str) -> Option<String> {
        self.get(column).and_then(Value::key)
    }
    /// Exact match of the categorical key against a literal.
    pub fn is(&self, column: &str, literal: &str) -> bool {
        match self.get(column) {
            Some(Value::Text(s)) => s == literal,
            Some(Value::Empty) | None => false,
            Some(other) => other.to_string() == literal,
        }
    }
    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }
}

// ------------- ColumnSet -------------
#[derive(Debug, Clone, Default)]
pub struct ColumnSet {
    ordered: Vec<String>,
    known: HashSet<String>,
}

impl ColumnSet {
    pub fn insert(&mut self, column: &str) {
        if !self.known.contains(column) {
            self.known.insert(column.to_string());
            self.ordered.push(column.to_string());
        }
    }
    pub fn contains(&self, column: &str) -> bool {
        self.known.contains(column)
    }
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.ordered.iter().map(String::as_str)
    }
    pub fn len(&self) -> usize {
        self.ordered.len()
    }
    pub fn is_empty(&self) -> bool {
        self.ordered.is_empty()
    }
}

// ------------- Dataset -------------
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    records: Vec<Record>,
    columns: ColumnSet,
}

impl Dataset {
    pub fn new(records: Vec<Record>) -> Self {
        let mut columns = ColumnSet::default();
        for record in &records {
            // HashMap iteration order is arbitrary, so order each record's
            // columns before registering them
            let mut names: Vec<&str> = record.columns().collect();
            names.sort_unstable();
            for name in names {
                columns.insert(name);
            }
        }
        Self { records, columns }
    }

    /// Declares the column order explicitly, as a loader reading a header row would.
    pub fn with_columns<S: AsRef<str>>(header: &[S], records: Vec<Record>) -> Self {
        let mut columns = ColumnSet::default();
        for name in header {
            columns.insert(name.as_ref());
        }
        for record in &records {
            let mut names: Vec<&str> = record.columns().collect();
            names.sort_unstable();
            for name in names {
                columns.insert(name);
            }
        }
        Self { records, columns }
    }

    /// Loader output contract: a JSON array of flat objects.
    pub fn from_json_records(json: &str) -> Result<Self> {
        let raw: Vec<serde_json::Map<String, serde_json::Value>> = serde_json::from_str(json)
            .map_err(|e| BenchscopeError::InvalidParameter(format!("dataset is not an array of records: {e}")))?;
        let mut header = ColumnSet::default();
        let mut records = Vec::with_capacity(raw.len());
        for object in raw {
            let mut record = Record::new();
            for (column, value) in object {
                header.insert(&column);
                let value: Value = serde_json::from_value(value).map_err(|e| {
                    BenchscopeError::InvalidParameter(format!("column '{column}': {e}"))
                })?;
                record.set(column, value);
            }
            records.push(record);
        }
        let header: Vec<&str> = header.iter().collect();
        Ok(Self::with_columns(&header, records))
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }
    pub fn columns(&self) -> &ColumnSet {
        &self.columns
    }
    pub fn has_column(&self, column: &str) -> bool {
        self.columns.contains(column)
    }
    pub fn len(&self) -> usize {
        self.records.len()
    }
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
    pub fn all(&self) -> Selection<'_> {
        Selection { dataset: self, rows: self.records.iter().collect() }
    }
}

// ------------- Selection -------------
/// A borrowed subset of a dataset's rows, in dataset order.
#[derive(Debug, Clone)]
pub struct Selection<'a> {
    dataset: &'a Dataset,
    rows: Vec<&'a Record>,
}

impl<'a> Selection<'a> {
    pub fn dataset(&self) -> &'a Dataset {
        self.dataset
    }
    pub fn rows(&self) -> &[&'a Record] {
        &self.rows
    }
    pub fn into_rows(self) -> Vec<&'a Record> {
        self.rows
    }
    pub fn len(&self) -> usize {
        self.rows.len()
    }
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
    pub fn has_column(&self, column: &str) -> bool {
        self.dataset.has_column(column)
    }
    pub fn filter<P: Fn(&Record) -> bool>(&self, predicate: P) -> Selection<'a> {
        Selection {
            dataset: self.dataset,
            rows: self.rows.iter().copied().filter(|r| predicate(*r)).collect(),
        }
    }
}

// ------------- CategoryFilter -------------
/// Top-level inclusion filter applied before any aggregation or drill-down.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CategoryFilter {
    #[serde(default)]
    pub statuses: Vec<String>,
    #[serde(default)]
    pub locations: Vec<String>,
}

impl CategoryFilter {
    pub fn statuses<S: Into<String>>(statuses: impl IntoIterator<Item = S>) -> Self {
        Self { statuses: statuses.into_iter().map(Into::into).collect(), locations: Vec::new() }
    }

    fn active(values: &[String]) -> bool {
        !values.is_empty() && !values.iter().any(|v| v == ALL)
    }

    pub fn is_active(&self) -> bool {
        Self::active(&self.statuses) || Self::active(&self.locations)
    }

    fn admits(values: &[String], record: &Record, column: &str) -> bool {
        !Self::active(values)
            || record.key(column).is_some_and(|k| values.iter().any(|v| *v == k))
    }

    /// Applies the filter. When the filter would leave no rows at all the
    /// unfiltered dataset is returned instead, and the second element reports
    /// that the fallback happened.
    pub fn apply<'a>(&self, dataset: &'a Dataset) -> (Selection<'a>, bool) {
        let everything = dataset.all();
        if !self.is_active() {
            return (everything, false);
        }
        let filtered = everything.filter(|r| {
            Self::admits(&self.statuses, r, STATUS) && Self::admits(&self.locations, r, LOCATION)
        });
        if filtered.is_empty() {
            (everything, !dataset.is_empty())
        } else {
            (filtered, false)
        }
    }
}
