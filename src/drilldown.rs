//! Chart drill-down resolver.
//!
//! Turns a click on a dashboard chart back into the rows behind it:
//! category filter, chart predicate (reversed through the binding table),
//! column projection, search, sort, then either a page or an export file.

use std::cmp::Reverse;

use chrono::Local;
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use tracing::{debug, warn};

use crate::binding::binding;
use crate::dataset::{CategoryFilter, Dataset, Record, Selection};
use crate::datatype::{SortKey, Value};
use crate::error::Result;
use crate::export::{self, ExportFile, ExportFormat};

pub const DRILL_COLUMNS: &[&str] = &[
    "Employee Code",
    "Employee Name",
    "Designation",
    "Employment Status",
    "Date of Joining",
    "Status",
    "Location",
    "Tech1 Primary Skill",
    "Current Ageing",
    "Client Name",
    "Project Name",
];

pub const PREVIEW_COLUMNS: &[&str] = &[
    "Employee Code",
    "Employee Name",
    "Gender",
    "Level",
    "Location",
    "Status",
    "Tech1 Primary Skill",
    "Total Experience",
];

pub const DEFAULT_SORT_COLUMN: &str = "Employee Name";
pub const NO_DATA_MESSAGE: &str = "No data found for the selected filter";
const TABLE_EXPORT_NAME: &str = "table";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paging {
    pub default_page_size: usize,
    pub max_page_size: usize,
}

impl Default for Paging {
    fn default() -> Self {
        Self { default_page_size: 25, max_page_size: 1000 }
    }
}

/// One drill-down query, as sent by the dashboard.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DrillRequest {
    pub chart_id: Option<String>,
    pub filter_value: Option<String>,
    /// Second-level value for stacked charts.
    pub additional_filter: Option<String>,
    pub categories: CategoryFilter,
    pub search: Option<String>,
    pub sort_column: Option<String>,
    pub sort_direction: SortDirection,
    pub page: Option<usize>,
    pub page_size: Option<usize>,
    pub visible_columns: Vec<String>,
    pub export: Option<ExportFormat>,
}

impl DrillRequest {
    pub fn chart<C: Into<String>, V: Into<String>>(chart_id: C, value: V) -> Self {
        Self { chart_id: Some(chart_id.into()), filter_value: Some(value.into()), ..Self::default() }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilterInfo {
    pub chart_id: Option<String>,
    pub filter_value: Option<String>,
    pub additional_filter: Option<String>,
    pub categories: CategoryFilter,
    pub category_fallback: bool,
    pub predicate_applied: bool,
    pub search: Option<String>,
}

/// A projected row. Serializes as an object keyed in column order.
#[derive(Debug, Clone, PartialEq)]
pub struct Row(Vec<(String, Value)>);

impl Row {
    fn project(record: &Record, columns: &[String]) -> Self {
        Row(columns
            .iter()
            .map(|c| (c.clone(), record.get(c).cloned().unwrap_or(Value::Empty)))
            .collect())
    }
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.0.iter().find(|(c, _)| c == column).map(|(_, v)| v)
    }
}

impl Serialize for Row {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (column, value) in &self.0 {
            map.serialize_entry(column, value)?;
        }
        map.end()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DrillPage {
    pub rows: Vec<Row>,
    pub columns: Vec<String>,
    pub available_columns: Vec<String>,
    pub total_count: usize,
    pub page: usize,
    pub page_size: usize,
    pub total_pages: usize,
    pub sort_column: String,
    pub sort_direction: SortDirection,
    pub filter_info: FilterInfo,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrillOutcome {
    Page(DrillPage),
    Export(ExportFile),
    /// Nothing matched; distinct from an error.
    Empty { message: &'static str, filter_info: FilterInfo },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Preview {
    pub columns: Vec<String>,
    pub rows: Vec<Row>,
    pub total_rows: usize,
}

pub fn preview(dataset: &Dataset, limit: usize) -> Preview {
    let columns: Vec<String> = PREVIEW_COLUMNS
        .iter()
        .filter(|c| dataset.has_column(c))
        .map(|c| c.to_string())
        .collect();
    let rows = dataset.records().iter().take(limit).map(|r| Row::project(r, &columns)).collect();
    Preview { columns, rows, total_rows: dataset.len() }
}

// ------------- pipeline steps -------------
/// Applies the chart predicate. Returns the narrowed rows and whether a
/// predicate was applied at all.
fn chart_rows<'a>(selection: Selection<'a>, request: &DrillRequest) -> (Vec<&'a Record>, bool) {
    let (Some(chart_id), Some(value)) = (request.chart_id.as_deref(), request.filter_value.as_deref()) else {
        return (selection.into_rows(), false);
    };
    let Some(chart) = binding(chart_id) else {
        warn!(chart_id, "unknown chart id, drill-down left unfiltered");
        return (selection.into_rows(), false);
    };
    if let Some(column) = chart.columns().into_iter().find(|c| !selection.has_column(c)) {
        debug!(chart_id, column, "bound column not in dataset");
        return (Vec::new(), true);
    }
    let Some(selector) = chart.selector(value, request.additional_filter.as_deref()) else {
        debug!(chart_id, value, "label does not parse for this chart");
        return (Vec::new(), true);
    };
    let rows = selection
        .into_rows()
        .into_iter()
        .filter(|r| chart.in_scope(r) && chart.matches(&selector, r))
        .collect();
    (rows, true)
}

fn project_columns(dataset: &Dataset, visible: &[String]) -> (Vec<String>, Vec<String>) {
    let available: Vec<String> = DRILL_COLUMNS
        .iter()
        .filter(|c| dataset.has_column(c))
        .map(|c| c.to_string())
        .collect();
    let projected: Vec<String> = available.iter().filter(|c| visible.contains(c)).cloned().collect();
    if projected.is_empty() {
        (available.clone(), available)
    } else {
        (projected, available)
    }
}

fn search(rows: &mut Vec<&Record>, columns: &[String], term: Option<&str>) {
    let Some(term) = term.map(str::trim).filter(|t| !t.is_empty()) else {
        return;
    };
    let needle = term.to_lowercase();
    rows.retain(|r| {
        columns.iter().any(|c| {
            r.get(c).is_some_and(|v| v.to_string().to_lowercase().contains(&needle))
        })
    });
}

fn sort_key<'a>(record: &'a Record, column: &str) -> SortKey<'a> {
    record.get(column).map_or(SortKey::Empty, Value::sort_key)
}

fn sort<'a>(rows: &mut [&'a Record], dataset: &Dataset, column: &str, direction: SortDirection) {
    if !dataset.has_column(column) {
        return;
    }
    // empties stay at the end in both directions
    match direction {
        SortDirection::Asc => rows.sort_by_cached_key(|r| sort_key(*r, column)),
        SortDirection::Desc => rows.sort_by_cached_key(|r| {
            let key = sort_key(*r, column);
            (key.is_empty(), Reverse(key))
        }),
    }
}

/// Total page count and the clamped page number.
fn paginate(total: usize, page: Option<usize>, page_size: usize) -> (usize, usize) {
    let total_pages = total.div_ceil(page_size).max(1);
    (total_pages, page.unwrap_or(1).clamp(1, total_pages))
}

pub fn resolve(dataset: &Dataset, request: &DrillRequest, paging: Paging) -> Result<DrillOutcome> {
    let (selection, category_fallback) = request.categories.apply(dataset);
    let (mut rows, predicate_applied) = chart_rows(selection, request);
    let (columns, available_columns) = project_columns(dataset, &request.visible_columns);
    search(&mut rows, &columns, request.search.as_deref());

    let sort_column = request
        .sort_column
        .clone()
        .filter(|c| !c.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_SORT_COLUMN.to_string());
    sort(&mut rows, dataset, &sort_column, request.sort_direction);

    let filter_info = FilterInfo {
        chart_id: request.chart_id.clone(),
        filter_value: request.filter_value.clone(),
        additional_filter: request.additional_filter.clone(),
        categories: request.categories.clone(),
        category_fallback,
        predicate_applied,
        search: request.search.clone(),
    };
    debug!(
        chart_id = ?request.chart_id,
        matched = rows.len(),
        category_fallback,
        predicate_applied,
        "drill-down resolved"
    );

    if rows.is_empty() {
        return Ok(DrillOutcome::Empty { message: NO_DATA_MESSAGE, filter_info });
    }

    if let Some(format) = request.export {
        let name = request.chart_id.as_deref().unwrap_or(TABLE_EXPORT_NAME);
        let file = export::export(format, name, &columns, &rows, Local::now().naive_local())?;
        return Ok(DrillOutcome::Export(file));
    }

    let page_size = request
        .page_size
        .unwrap_or(paging.default_page_size)
        .clamp(1, paging.max_page_size.max(1));
    let total_count = rows.len();
    let (total_pages, page) = paginate(total_count, request.page, page_size);
    let page_rows = rows
        .iter()
        .skip((page - 1) * page_size)
        .take(page_size)
        .map(|r| Row::project(r, &columns))
        .collect();

    Ok(DrillOutcome::Page(DrillPage {
        rows: page_rows,
        columns,
        available_columns,
        total_count,
        page,
        page_size,
        total_pages,
        sort_column,
        sort_direction: request.sort_direction,
        filter_info,
    }))
}
