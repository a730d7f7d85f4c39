//! Chart bindings: which column a dashboard chart is drawn from and how its
//! displayed labels are derived from raw values.
//!
//! The aggregation engine produces chart counts *through* this table and the
//! drill-down resolver reverses clicked labels *through* this table, so a
//! bucket boundary lives in exactly one place and drill-down totals always
//! reconcile with the counts that were displayed.

use std::collections::{BTreeMap, HashMap};

use chrono::Datelike;
use lazy_static::lazy_static;
use regex::Regex;

use crate::dataset::{BENCH, Record, STATUS};
use crate::datatype::Value;
use crate::stats::{Breakdown, cross_counts, value_counts};

pub const STATUS_CHART: &str = "status_chart";
pub const LOCATION_CHART: &str = "location_chart";
pub const GENDER_CHART: &str = "gender_chart";
pub const LEVEL_CHART: &str = "level_chart";
pub const DESIGNATION_CHART: &str = "designation_chart";
pub const WORK_MODE_CHART: &str = "work_mode_chart";
pub const SKILLS_CHART: &str = "skills_chart";
pub const BENCH_SKILLS_CHART: &str = "bench_skills_chart";
pub const BENCH_CATEGORY_CHART: &str = "bench_category_chart";
pub const BENCH_REASON_CHART: &str = "bench_reason_chart";
pub const RAG_CHART: &str = "rag_chart";
pub const ATL_CHART: &str = "atl_chart";
pub const CLIENT_CHART: &str = "client_chart";
pub const PROJECT_TYPE_CHART: &str = "project_type_chart";
pub const EXPERIENCE_CHART: &str = "experience_chart";
pub const BENCH_AGEING_CHART: &str = "bench_ageing_chart";
pub const BENCH_AGEING_DAYS_CHART: &str = "bench_ageing_days_chart";
pub const AGEING_WEEK_CHART: &str = "ageing_week_chart";
pub const LOADING_CHART: &str = "loading_chart";
pub const JOINING_TREND_CHART: &str = "joining_trend_chart";
pub const LOCATION_STATUS_CHART: &str = "location_status_chart";

// ------------- Range -------------
/// A labelled numeric interval. Bounds are `(value, inclusive)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Range {
    pub label: &'static str,
    lower: Option<(f64, bool)>,
    upper: Option<(f64, bool)>,
}

impl Range {
    /// `x <= max`
    pub const fn at_most(label: &'static str, max: f64) -> Self {
        Self { label, lower: None, upper: Some((max, true)) }
    }
    /// `x < max`
    pub const fn below(label: &'static str, max: f64) -> Self {
        Self { label, lower: None, upper: Some((max, false)) }
    }
    /// `min < x <= max`
    pub const fn over_until(label: &'static str, min: f64, max: f64) -> Self {
        Self { label, lower: Some((min, false)), upper: Some((max, true)) }
    }
    /// `min <= x < max`
    pub const fn from_below(label: &'static str, min: f64, max: f64) -> Self {
        Self { label, lower: Some((min, true)), upper: Some((max, false)) }
    }
    /// `min <= x <= max`
    pub const fn closed(label: &'static str, min: f64, max: f64) -> Self {
        Self { label, lower: Some((min, true)), upper: Some((max, true)) }
    }
    /// `x > min`
    pub const fn above(label: &'static str, min: f64) -> Self {
        Self { label, lower: Some((min, false)), upper: None }
    }

    pub fn contains(&self, x: f64) -> bool {
        let lower_ok = match self.lower {
            None => true,
            Some((min, true)) => x >= min,
            Some((min, false)) => x > min,
        };
        let upper_ok = match self.upper {
            None => true,
            Some((max, true)) => x <= max,
            Some((max, false)) => x < max,
        };
        lower_ok && upper_ok
    }
}

pub const AGEING_WEEK_RANGES: &[Range] = &[
    Range::at_most("0-2 weeks", 14.0),
    Range::over_until("2-4 weeks", 14.0, 28.0),
    Range::over_until("4-8 weeks", 28.0, 56.0),
    Range::above("8+ weeks", 56.0),
];

pub const AGEING_DAY_RANGES: &[Range] = &[
    Range::at_most("0-14_days", 14.0),
    Range::over_until("15-30_days", 14.0, 30.0),
    Range::over_until("31-60_days", 30.0, 60.0),
    Range::above("60+_days", 60.0),
];

pub const LOADING_RANGES: &[Range] = &[
    Range::below("under_50", 50.0),
    Range::from_below("50_75", 50.0, 75.0),
    Range::closed("75_100", 75.0, 100.0),
    Range::above("over_100", 100.0),
];

pub fn range_label(ranges: &'static [Range], x: f64) -> Option<&'static str> {
    ranges.iter().find(|r| r.contains(x)).map(|r| r.label)
}

// ------------- bucketing helpers -------------
/// Unit-wide bucket centred on an integer: `v - 0.5 <= x < v + 0.5`.
pub fn unit_bucket(x: f64) -> f64 {
    (x + 0.5).floor()
}

/// Week number of an ageing value in days. Day 1..=7 is week 1; anything at
/// or below zero is week 0.
pub fn week_of(days: f64) -> i64 {
    if days <= 0.0 { 0 } else { (days / 7.0).ceil() as i64 }
}

pub fn week_label(week: i64) -> String {
    format!("Week {week}")
}

const MONTHS: [&str; 12] = [
    "January", "February", "March", "April", "May", "June", "July", "August",
    "September", "October", "November", "December",
];

pub fn month_label(year: i32, month: u32) -> String {
    let name = MONTHS.get(month.saturating_sub(1) as usize).map(|m| &m[..3]).unwrap_or("???");
    format!("{name} {year}")
}

lazy_static! {
    static ref WEEK_LABEL: Regex = Regex::new(r"^(?i)(?:week|wk|w)?\s*(\d+)$").unwrap();
    static ref NAMED_MONTH: Regex = Regex::new(r"^([A-Za-z]+)[\s,\-_/]+(\d{4})$").unwrap();
    static ref YEAR_MONTH: Regex = Regex::new(r"^(\d{4})[-/](\d{1,2})$").unwrap();
    static ref MONTH_YEAR: Regex = Regex::new(r"^(\d{1,2})[-/](\d{4})$").unwrap();
}

pub fn parse_week_label(label: &str) -> Option<i64> {
    WEEK_LABEL.captures(label.trim()).and_then(|c| c[1].parse().ok())
}

fn month_number(name: &str) -> Option<u32> {
    MONTHS
        .iter()
        .position(|m| m.eq_ignore_ascii_case(name) || m[..3].eq_ignore_ascii_case(name))
        .map(|i| i as u32 + 1)
}

/// Accepts `Jan 2024`, `January 2024`, `2024-01` and `01/2024`.
pub fn parse_month_label(label: &str) -> Option<(i32, u32)> {
    let label = label.trim();
    let (year, month) = if let Some(c) = NAMED_MONTH.captures(label) {
        (c[2].parse().ok()?, month_number(&c[1])?)
    } else if let Some(c) = YEAR_MONTH.captures(label) {
        (c[1].parse().ok()?, c[2].parse().ok()?)
    } else if let Some(c) = MONTH_YEAR.captures(label) {
        (c[2].parse().ok()?, c[1].parse().ok()?)
    } else {
        return None;
    };
    (1..=12).contains(&month).then_some((year, month))
}

// ------------- binding table -------------
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    All,
    /// Only rows whose status is the bench marker.
    Bench,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Rule {
    /// Categorical: the label is the value itself.
    Exact,
    /// Fixed labelled intervals over a numeric column.
    Ranges(&'static [Range]),
    /// Integer-centred unit buckets over a numeric column.
    UnitBucket,
    /// `Week N` buckets over a day count.
    WeekNumber,
    /// `Mon YYYY` buckets over a date column.
    Month,
    /// Two-level chart: the bound column, then `secondary` as the stack.
    Stacked { secondary: &'static str },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartBinding {
    pub chart: &'static str,
    pub column: &'static str,
    pub rule: Rule,
    pub scope: Scope,
}

const fn bind(chart: &'static str, column: &'static str, rule: Rule, scope: Scope) -> ChartBinding {
    ChartBinding { chart, column, rule, scope }
}

pub const BINDINGS: &[ChartBinding] = &[
    bind(STATUS_CHART, "Status", Rule::Exact, Scope::All),
    bind(LOCATION_CHART, "Location", Rule::Exact, Scope::All),
    bind(GENDER_CHART, "Gender", Rule::Exact, Scope::All),
    bind(LEVEL_CHART, "Level", Rule::Exact, Scope::All),
    bind(DESIGNATION_CHART, "Designation", Rule::Exact, Scope::All),
    bind(WORK_MODE_CHART, "Work Mode", Rule::Exact, Scope::All),
    bind(SKILLS_CHART, "Tech1 Primary Skill", Rule::Exact, Scope::All),
    bind(BENCH_SKILLS_CHART, "Tech1 Primary Skill", Rule::Exact, Scope::Bench),
    bind(BENCH_CATEGORY_CHART, "Bench Category", Rule::Exact, Scope::Bench),
    bind(BENCH_REASON_CHART, "Reason For Bench", Rule::Exact, Scope::Bench),
    bind(RAG_CHART, "Associate RAG Status", Rule::Exact, Scope::All),
    bind(ATL_CHART, "ATL Eligible", Rule::Exact, Scope::All),
    bind(CLIENT_CHART, "Client Name", Rule::Exact, Scope::All),
    bind(PROJECT_TYPE_CHART, "Project Type", Rule::Exact, Scope::All),
    bind(EXPERIENCE_CHART, "Total Experience", Rule::UnitBucket, Scope::All),
    bind(BENCH_AGEING_CHART, "Current Ageing", Rule::Ranges(AGEING_WEEK_RANGES), Scope::Bench),
    bind(BENCH_AGEING_DAYS_CHART, "Current Ageing", Rule::Ranges(AGEING_DAY_RANGES), Scope::Bench),
    bind(AGEING_WEEK_CHART, "Current Ageing", Rule::WeekNumber, Scope::Bench),
    bind(LOADING_CHART, "Loading Percentage", Rule::Ranges(LOADING_RANGES), Scope::All),
    bind(JOINING_TREND_CHART, "Date of Joining", Rule::Month, Scope::All),
    bind(LOCATION_STATUS_CHART, "Location", Rule::Stacked { secondary: "Status" }, Scope::All),
];

pub fn binding(chart: &str) -> Option<&'static ChartBinding> {
    BINDINGS.iter().find(|b| b.chart == chart)
}

/// Looks up a binding that is known to be in [`BINDINGS`].
pub(crate) fn bound(chart: &'static str) -> &'static ChartBinding {
    match binding(chart) {
        Some(b) => b,
        None => panic!("chart '{chart}' missing from the binding table"),
    }
}

/// A clicked label resolved into a row predicate.
#[derive(Debug, Clone, PartialEq)]
pub enum Selector {
    Exact(String),
    Range(&'static Range),
    Unit(f64),
    Week(i64),
    Month { year: i32, month: u32 },
    Stacked { primary: String, secondary: Option<String> },
}

impl ChartBinding {
    pub fn in_scope(&self, record: &Record) -> bool {
        match self.scope {
            Scope::All => true,
            Scope::Bench => record.is(STATUS, BENCH),
        }
    }

    /// Columns that must exist in the dataset for this chart to resolve.
    pub fn columns(&self) -> Vec<&'static str> {
        match self.rule {
            Rule::Stacked { secondary } => vec![self.column, secondary],
            _ => vec![self.column],
        }
    }

    /// Parses a clicked label. `None` means the label cannot have come from
    /// this chart; callers resolve that to an empty selection.
    pub fn selector(&self, value: &str, secondary: Option<&str>) -> Option<Selector> {
        let value = value.trim();
        match self.rule {
            Rule::Exact => Some(Selector::Exact(value.to_string())),
            Rule::Ranges(ranges) => ranges.iter().find(|r| r.label == value).map(Selector::Range),
            Rule::UnitBucket => value.parse::<f64>().ok().filter(|v| v.is_finite()).map(Selector::Unit),
            Rule::WeekNumber => parse_week_label(value).map(Selector::Week),
            Rule::Month => parse_month_label(value).map(|(year, month)| Selector::Month { year, month }),
            Rule::Stacked { .. } => Some(Selector::Stacked {
                primary: value.to_string(),
                secondary: secondary.map(str::trim).filter(|s| !s.is_empty()).map(String::from),
            }),
        }
    }

    pub fn matches(&self, selector: &Selector, record: &Record) -> bool {
        let value = record.get(self.column);
        match selector {
            Selector::Exact(literal) => record.is(self.column, literal),
            Selector::Range(range) => value.and_then(Value::as_number).is_some_and(|x| range.contains(x)),
            Selector::Unit(v) => value.and_then(Value::as_number).is_some_and(|x| {
                if v.fract() == 0.0 {
                    unit_bucket(x) == *v
                } else {
                    x >= v - 0.5 && x < v + 0.5
                }
            }),
            Selector::Week(week) => value.and_then(Value::as_number).is_some_and(|x| week_of(x) == *week),
            Selector::Month { year, month } => value
                .and_then(Value::as_date)
                .is_some_and(|d| d.year() == *year && d.month() == *month),
            Selector::Stacked { primary, secondary } => {
                record.is(self.column, primary)
                    && match (secondary, self.rule) {
                        (Some(s), Rule::Stacked { secondary: column }) => record.is(column, s),
                        _ => true,
                    }
            }
        }
    }

    /// Chart counts over the in-scope rows. Range charts list every range
    /// (zeros included) in table order; numeric and month buckets are listed
    /// in ascending order; categorical charts are largest first.
    pub fn counts<'a>(&self, rows: &[&'a Record]) -> Breakdown<usize> {
        let scoped = rows.iter().copied().filter(|r| self.in_scope(r));
        match self.rule {
            Rule::Exact | Rule::Stacked { .. } => value_counts(scoped, self.column),
            Rule::Ranges(ranges) => {
                let mut counts: HashMap<&'static str, usize> = HashMap::new();
                for x in scoped.filter_map(|r| r.number(self.column)) {
                    if let Some(label) = range_label(ranges, x) {
                        *counts.entry(label).or_insert(0) += 1;
                    }
                }
                Breakdown::new(
                    ranges
                        .iter()
                        .map(|r| (r.label.to_string(), counts.get(r.label).copied().unwrap_or(0)))
                        .collect(),
                )
            }
            Rule::UnitBucket => {
                let mut counts: BTreeMap<i64, usize> = BTreeMap::new();
                for x in scoped.filter_map(|r| r.number(self.column)) {
                    *counts.entry(unit_bucket(x) as i64).or_insert(0) += 1;
                }
                Breakdown::new(counts.into_iter().map(|(b, c)| (b.to_string(), c)).collect())
            }
            Rule::WeekNumber => {
                let mut counts: BTreeMap<i64, usize> = BTreeMap::new();
                for x in scoped.filter_map(|r| r.number(self.column)) {
                    *counts.entry(week_of(x)).or_insert(0) += 1;
                }
                Breakdown::new(counts.into_iter().map(|(w, c)| (week_label(w), c)).collect())
            }
            Rule::Month => {
                let mut counts: BTreeMap<(i32, u32), usize> = BTreeMap::new();
                for d in scoped.filter_map(|r| r.get(self.column).and_then(Value::as_date)) {
                    *counts.entry((d.year(), d.month())).or_insert(0) += 1;
                }
                Breakdown::new(counts.into_iter().map(|((y, m), c)| (month_label(y, m), c)).collect())
            }
        }
    }

    /// Primary label -> stack label -> count, for [`Rule::Stacked`] charts.
    /// Primary labels are ordered as [`ChartBinding::counts`] orders them.
    pub fn stacked_counts<'a>(&self, rows: &[&'a Record]) -> Breakdown<Breakdown<usize>> {
        let Rule::Stacked { secondary } = self.rule else {
            return Breakdown::default();
        };
        cross_counts(rows.iter().copied().filter(|r| self.in_scope(r)), self.column, secondary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bench(ageing: f64) -> Record {
        Record::new().with(STATUS, BENCH).with("Current Ageing", ageing)
    }

    #[test]
    fn every_chart_is_bound_once() {
        for b in BINDINGS {
            assert_eq!(BINDINGS.iter().filter(|o| o.chart == b.chart).count(), 1, "{}", b.chart);
        }
    }

    #[test]
    fn week_ranges_have_the_documented_edges() {
        let chart = bound(BENCH_AGEING_CHART);
        let sel = chart.selector("4-8 weeks", None).unwrap();
        assert!(!chart.matches(&sel, &bench(28.0)));
        assert!(chart.matches(&sel, &bench(28.5)));
        assert!(chart.matches(&sel, &bench(56.0)));
        assert!(!chart.matches(&sel, &bench(56.1)));
    }

    #[test]
    fn ranges_partition_the_number_line() {
        for ranges in [AGEING_WEEK_RANGES, AGEING_DAY_RANGES, LOADING_RANGES] {
            for x in [-3.0, 0.0, 13.9, 14.0, 14.5, 30.0, 49.99, 50.0, 56.0, 60.0, 75.0, 100.0, 100.5, 400.0] {
                assert_eq!(ranges.iter().filter(|r| r.contains(x)).count(), 1, "{x}");
            }
        }
    }

    #[test]
    fn unknown_range_label_does_not_parse() {
        assert_eq!(bound(BENCH_AGEING_CHART).selector("9+ weeks", None), None);
    }

    #[test]
    fn week_numbers() {
        assert_eq!(week_of(0.0), 0);
        assert_eq!(week_of(1.0), 1);
        assert_eq!(week_of(7.0), 1);
        assert_eq!(week_of(7.5), 2);
        assert_eq!(parse_week_label("Week 3"), Some(3));
        assert_eq!(parse_week_label("wk12"), Some(12));
        assert_eq!(parse_week_label("7"), Some(7));
        assert_eq!(parse_week_label("Weekly"), None);
    }

    #[test]
    fn month_labels_round_trip_through_the_parser() {
        assert_eq!(month_label(2024, 3), "Mar 2024");
        assert_eq!(parse_month_label("Mar 2024"), Some((2024, 3)));
        assert_eq!(parse_month_label("march 2024"), Some((2024, 3)));
        assert_eq!(parse_month_label("2024-03"), Some((2024, 3)));
        assert_eq!(parse_month_label("03/2024"), Some((2024, 3)));
        assert_eq!(parse_month_label("2024-13"), None);
        assert_eq!(parse_month_label("Marchish 2024"), None);
        assert_eq!(parse_month_label("someday"), None);
    }

    #[test]
    fn unit_buckets_agree_between_label_and_selector() {
        let chart = bound(EXPERIENCE_CHART);
        for x in [0.2, 4.49, 4.5, 5.0, 5.49, 12.7] {
            let r = Record::new().with("Total Experience", x);
            let counts = chart.counts(&[&r]);
            let label = counts.labels().next().unwrap();
            let sel = chart.selector(label, None).unwrap();
            assert!(chart.matches(&sel, &r), "{x} -> {label}");
        }
        assert_eq!(chart.selector("five", None), None);
    }

    #[test]
    fn bench_scope_excludes_allocated_rows() {
        let rows = [bench(70.0), Record::new().with(STATUS, "Allocated").with("Current Ageing", 70.0)];
        let refs: Vec<&Record> = rows.iter().collect();
        let counts = bound(BENCH_AGEING_CHART).counts(&refs);
        assert_eq!(counts.count("8+ weeks"), 1);
        assert_eq!(counts.len(), AGEING_WEEK_RANGES.len());
    }

    #[test]
    fn stacked_counts_nest_status_under_location() {
        let rows = [
            Record::new().with("Location", "Pune").with(STATUS, "Bench"),
            Record::new().with("Location", "Pune").with(STATUS, "Allocated"),
            Record::new().with("Location", "Pune").with(STATUS, "Allocated"),
            Record::new().with("Location", "Delhi").with(STATUS, "Bench"),
        ];
        let refs: Vec<&Record> = rows.iter().collect();
        let chart = bound(LOCATION_STATUS_CHART);
        let stacked = chart.stacked_counts(&refs);
        assert_eq!(stacked.get("Pune").unwrap().count("Allocated"), 2);
        assert_eq!(stacked.get("Delhi").unwrap().count("Bench"), 1);
        let sel = chart.selector("Pune", Some("Allocated")).unwrap();
        assert_eq!(refs.iter().filter(|r| chart.matches(&sel, r)).count(), 2);
    }
}
