//! Benchscope – workforce bench analytics over an in-memory employee table.
//!
//! A dataset is a sequence of [`dataset::Record`]s, each a loose mapping from
//! column name to a dynamically kinded [`datatype::Value`]. Uploaded sheets are
//! rarely consistent, so every computation tolerates absent columns, absent
//! fields and values that do not coerce.
//!
//! ## Modules
//! * [`datatype`] – the cell value type and its numeric/date coercion rules.
//! * [`dataset`] – records, the column set, selections and the top-level
//!   category filter.
//! * [`schema`] – the static catalog of expected columns and coverage reporting.
//! * [`stats`] – ordered breakdowns and simple numeric summaries.
//! * [`binding`] – the chart binding table: which column each dashboard chart
//!   is drawn from and how its labels bucket raw values.
//! * [`analytics`] – the aggregation engine (overview, bench, skills,
//!   performance, location, allocation, risk indicators, recommendations).
//! * [`drilldown`] – reverses a chart click into its rows, then searches,
//!   sorts, paginates or exports them.
//! * [`export`] – CSV and Excel encoding of drill-down results.
//! * [`interface`] – the replace-only current-dataset holder that requests go through.
//! * [`settings`] / [`server`] – runtime configuration and the HTTP surface.
//!
//! ## Quick Start
//! ```
//! use benchscope::analytics::Analytics;
//! use benchscope::dataset::{Dataset, Record};
//! use benchscope::drilldown::{resolve, DrillOutcome, DrillRequest, Paging};
//!
//! let ds = Dataset::new(vec![
//!     Record::new().with("Employee Name", "Ann").with("Status", "Bench").with("Current Ageing", 70.0),
//!     Record::new().with("Employee Name", "Bob").with("Status", "Allocated"),
//! ]);
//! let insights = Analytics::new(ds.all()).insights();
//! assert_eq!(insights.risk_indicators[0].kind, "High Bench Percentage");
//!
//! let request = DrillRequest::chart("bench_ageing_chart", "8+ weeks");
//! match resolve(&ds, &request, Paging::default()).unwrap() {
//!     DrillOutcome::Page(page) => assert_eq!(page.total_count, 1),
//!     _ => unreachable!(),
//! }
//! ```

pub mod analytics;
pub mod binding;
pub mod dataset;
pub mod datatype;
pub mod drilldown;
pub mod error;
pub mod export;
pub mod interface;
pub mod schema;
pub mod server;
pub mod settings;
pub mod stats;
