//! Small statistics toolkit shared by the aggregation engine.

use std::collections::{HashMap, HashSet};

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use crate::dataset::Record;

/// An ordered label -> value mapping. Serializes as a JSON object whose key
/// order is the breakdown order (largest first for counts).
#[derive(Debug, Clone, PartialEq)]
pub struct Breakdown<T>(Vec<(String, T)>);

impl<T> Default for Breakdown<T> {
    fn default() -> Self {
        Self(Vec::new())
    }
}

impl<T> Breakdown<T> {
    pub fn new(entries: Vec<(String, T)>) -> Self {
        Self(entries)
    }
    pub fn get(&self, label: &str) -> Option<&T> {
        self.0.iter().find(|(l, _)| l == label).map(|(_, v)| v)
    }
    pub fn iter(&self) -> impl Iterator<Item = (&str, &T)> {
        self.0.iter().map(|(l, v)| (l.as_str(), v))
    }
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(l, _)| l.as_str())
    }
    pub fn len(&self) -> usize {
        self.0.len()
    }
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
    pub fn map<U, F: Fn(&T) -> U>(&self, f: F) -> Breakdown<U> {
        Breakdown(self.0.iter().map(|(l, v)| (l.clone(), f(v))).collect())
    }
}

impl<T: Clone> Breakdown<T> {
    pub fn head(&self, n: usize) -> Breakdown<T> {
        Breakdown(self.0.iter().take(n).cloned().collect())
    }
}

impl Breakdown<usize> {
    pub fn count(&self, label: &str) -> usize {
        self.get(label).copied().unwrap_or(0)
    }
    pub fn total(&self) -> usize {
        self.0.iter().map(|(_, c)| c).sum()
    }
    /// Each count as a percentage of the breakdown total.
    pub fn shares(&self) -> Breakdown<f64> {
        let total = self.total();
        self.map(|c| percentage(*c, total))
    }
}

impl Breakdown<f64> {
    pub fn share(&self, label: &str) -> f64 {
        self.get(label).copied().unwrap_or(0.0)
    }
}

impl<T: Serialize> Serialize for Breakdown<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (label, value) in &self.0 {
            map.serialize_entry(label, value)?;
        }
        map.end()
    }
}

/// `part / whole * 100`, with an empty whole reported as zero.
pub fn percentage(part: usize, whole: usize) -> f64 {
    if whole == 0 { 0.0 } else { part as f64 / whole as f64 * 100.0 }
}

fn largest_first(counts: HashMap<String, usize>) -> Breakdown<usize> {
    let mut entries: Vec<(String, usize)> = counts.into_iter().collect();
    entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    Breakdown(entries)
}

/// Counts the categorical keys of `column`, largest first. Ties keep label
/// order. Empty and absent fields are not counted.
pub fn value_counts<'a, I>(rows: I, column: &str) -> Breakdown<usize>
where
    I: IntoIterator<Item = &'a Record>,
{
    let mut counts: HashMap<String, usize> = HashMap::new();
    for record in rows {
        if let Some(key) = record.key(column) {
            *counts.entry(key).or_insert(0) += 1;
        }
    }
    largest_first(counts)
}

/// `primary` key -> `secondary` key -> count, in one pass. Both levels are
/// ordered like [`value_counts`]; a row with a primary key but no secondary
/// key still counts toward its primary's position.
pub fn cross_counts<'a, I>(rows: I, primary: &str, secondary: &str) -> Breakdown<Breakdown<usize>>
where
    I: IntoIterator<Item = &'a Record>,
{
    let mut groups: HashMap<String, (usize, HashMap<String, usize>)> = HashMap::new();
    for record in rows {
        let Some(key) = record.key(primary) else { continue };
        let (total, inner) = groups.entry(key).or_default();
        *total += 1;
        if let Some(stack) = record.key(secondary) {
            *inner.entry(stack).or_insert(0) += 1;
        }
    }
    let mut entries: Vec<(String, (usize, HashMap<String, usize>))> = groups.into_iter().collect();
    entries.sort_by(|a, b| b.1.0.cmp(&a.1.0).then_with(|| a.0.cmp(&b.0)));
    Breakdown(entries.into_iter().map(|(label, (_, inner))| (label, largest_first(inner))).collect())
}

/// Per distinct key of `column`, in first-seen order: how many rows carry
/// the key and how many of those satisfy `hit`.
pub fn group_hits<'a, I, P>(rows: I, column: &str, hit: P) -> Vec<(String, usize, usize)>
where
    I: IntoIterator<Item = &'a Record>,
    P: Fn(&Record) -> bool,
{
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut groups: Vec<(String, usize, usize)> = Vec::new();
    for record in rows {
        let Some(key) = record.key(column) else { continue };
        let slot = match index.get(&key) {
            Some(&slot) => slot,
            None => {
                index.insert(key.clone(), groups.len());
                groups.push((key, 0, 0));
                groups.len() - 1
            }
        };
        groups[slot].1 += 1;
        if hit(record) {
            groups[slot].2 += 1;
        }
    }
    groups
}

/// Distinct keys of `column` in first-seen order.
pub fn distinct<'a, I>(rows: I, column: &str) -> Vec<String>
where
    I: IntoIterator<Item = &'a Record>,
{
    let mut known = HashSet::new();
    let mut seen = Vec::new();
    for record in rows {
        if let Some(key) = record.key(column) {
            if known.insert(key.clone()) {
                seen.push(key);
            }
        }
    }
    seen
}

/// Numeric-coerced values of `column`; unparseable values are dropped.
pub fn numbers<'a, I>(rows: I, column: &str) -> Vec<f64>
where
    I: IntoIterator<Item = &'a Record>,
{
    rows.into_iter().filter_map(|r| r.number(column)).collect()
}

pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

pub fn median(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct NumericSummary {
    pub count: usize,
    pub mean: f64,
    pub median: f64,
    pub min: f64,
    pub max: f64,
}

impl NumericSummary {
    pub fn of(values: &[f64]) -> Self {
        if values.is_empty() {
            return Self::default();
        }
        Self {
            count: values.len(),
            mean: mean(values),
            median: median(values),
            min: values.iter().copied().fold(f64::INFINITY, f64::min),
            max: values.iter().copied().fold(f64::NEG_INFINITY, f64::max),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_are_ordered_by_size_then_label() {
        let rows = vec![
            Record::new().with("Skill", "Java"),
            Record::new().with("Skill", "Python"),
            Record::new().with("Skill", "Python"),
            Record::new().with("Skill", "AWS"),
            Record::new().with("Skill", ""),
            Record::new(),
        ];
        let counts = value_counts(&rows, "Skill");
        let labels: Vec<&str> = counts.labels().collect();
        assert_eq!(labels, vec!["Python", "AWS", "Java"]);
        assert_eq!(counts.total(), 4);
        assert_eq!(counts.count("Go"), 0);
    }

    #[test]
    fn cross_counts_order_groups_by_their_row_count() {
        let rows = vec![
            Record::new().with("Location", "Pune").with("Status", "Bench"),
            Record::new().with("Location", "Delhi").with("Status", "Bench"),
            Record::new().with("Location", "Delhi").with("Status", "Allocated"),
            Record::new().with("Location", "Delhi").with("Status", "Allocated"),
            Record::new().with("Location", "Pune"),
            Record::new().with("Location", "Pune"),
            Record::new().with("Status", "Bench"),
        ];
        let cross = cross_counts(&rows, "Location", "Status");
        let labels: Vec<&str> = cross.labels().collect();
        assert_eq!(labels, vec!["Delhi", "Pune"]);
        let delhi: Vec<&str> = cross.get("Delhi").unwrap().labels().collect();
        assert_eq!(delhi, vec!["Allocated", "Bench"]);
        assert_eq!(cross.get("Pune").unwrap().total(), 1);
    }

    #[test]
    fn group_hits_keep_first_seen_order() {
        let rows = vec![
            Record::new().with("Skill", "Rust").with("Status", "Bench"),
            Record::new().with("Skill", "Java").with("Status", "Allocated"),
            Record::new().with("Skill", "Rust").with("Status", "Allocated"),
            Record::new().with("Status", "Allocated"),
        ];
        let hits = group_hits(&rows, "Skill", |r| r.is("Status", "Allocated"));
        assert_eq!(hits, vec![("Rust".to_string(), 2, 1), ("Java".to_string(), 1, 1)]);
        assert_eq!(distinct(&rows, "Skill"), vec!["Rust", "Java"]);
    }

    #[test]
    fn shares_sum_to_hundred() {
        let counts = Breakdown::new(vec![("a".to_string(), 1), ("b".to_string(), 3)]);
        let shares = counts.shares();
        assert!((shares.share("b") - 75.0).abs() < 1e-9);
        assert!((shares.iter().map(|(_, v)| v).sum::<f64>() - 100.0).abs() < 1e-9);
    }

    #[test]
    fn empty_summary_is_zero_not_nan() {
        let s = NumericSummary::of(&[]);
        assert_eq!(s, NumericSummary::default());
        assert_eq!(mean(&[]), 0.0);
        assert_eq!(percentage(3, 0), 0.0);
    }

    #[test]
    fn median_of_even_count_averages_middle() {
        assert_eq!(median(&[4.0, 1.0, 3.0, 2.0]), 2.5);
        assert_eq!(median(&[5.0, 1.0, 3.0]), 3.0);
    }

    #[test]
    fn breakdown_serializes_in_order() {
        let b = Breakdown::new(vec![("z".to_string(), 2usize), ("a".to_string(), 1)]);
        assert_eq!(serde_json::to_string(&b).unwrap(), r#"{"z":2,"a":1}"#);
    }
}
