mod common;

use benchscope::binding::{BINDINGS, LOCATION_STATUS_CHART, Rule, binding};
use benchscope::dataset::CategoryFilter;
use benchscope::drilldown::{DrillOutcome, DrillRequest, Paging, SortDirection, resolve};
use benchscope::export::ExportFormat;
use common::{BENCH, TOTAL, names, page, unpaged, workforce};

#[test]
fn eight_plus_weeks_returns_the_long_bench() {
    let ds = workforce();
    let request = DrillRequest::chart("bench_ageing_chart", "8+ weeks");
    let p = page(resolve(&ds, &request, Paging::default()).expect("drill ok"));
    assert_eq!(p.total_count, 10);
    assert_eq!(p.page, 1);
    assert_eq!(p.page_size, 25);
    assert_eq!(p.total_pages, 1);
    assert_eq!(p.sort_column, "Employee Name");
    assert_eq!(p.sort_direction, SortDirection::Asc);
    let got = names(&p);
    let expected: Vec<String> = (65..75).map(|i| format!("Employee {:03}", i)).collect();
    assert_eq!(got, expected);
    for row in &p.rows {
        let ageing = row.get("Current Ageing").and_then(|v| v.as_number()).unwrap();
        assert!(ageing > 56.0);
    }
}

#[test]
fn every_displayed_count_reconciles_with_its_drill_down() {
    let ds = workforce();
    let rows = ds.all().into_rows();
    for chart in BINDINGS {
        if let Rule::Stacked { .. } = chart.rule {
            continue;
        }
        for (label, count) in chart.counts(&rows).iter() {
            let request = DrillRequest::chart(chart.chart, label);
            match resolve(&ds, &request, unpaged()).expect("drill ok") {
                DrillOutcome::Page(p) => {
                    assert_eq!(p.total_count, *count, "{} / {label}", chart.chart)
                }
                DrillOutcome::Empty { .. } => assert_eq!(*count, 0, "{} / {label}", chart.chart),
                DrillOutcome::Export(_) => unreachable!(),
            }
        }
    }
}

#[test]
fn stacked_chart_reconciles_per_segment() {
    let ds = workforce();
    let rows = ds.all().into_rows();
    let chart = binding(LOCATION_STATUS_CHART).unwrap();
    let stacked = chart.stacked_counts(&rows);
    assert_eq!(stacked.len(), 4);
    for (location, statuses) in stacked.iter() {
        let primary = page(resolve(&ds, &DrillRequest::chart(chart.chart, location), unpaged()).unwrap());
        assert_eq!(primary.total_count, statuses.total());
        for (status, count) in statuses.iter() {
            let request = DrillRequest {
                additional_filter: Some(status.to_string()),
                ..DrillRequest::chart(chart.chart, location)
            };
            let p = page(resolve(&ds, &request, unpaged()).unwrap());
            assert_eq!(p.total_count, *count, "{location} / {status}");
        }
    }
}

#[test]
fn pages_concatenate_to_the_full_result() {
    let ds = workforce();
    let base = DrillRequest {
        search: Some("employee 1".into()),
        sort_direction: SortDirection::Desc,
        ..DrillRequest::default()
    };
    let full = names(&page(resolve(&ds, &base, unpaged()).unwrap()));
    assert_eq!(full.len(), 100, "Employee 100 through Employee 199");
    for k in [1, 7, 25, 99, 100, 500] {
        let first = page(resolve(&ds, &DrillRequest { page_size: Some(k), ..base.clone() }, unpaged()).unwrap());
        let mut collected = Vec::new();
        for n in 1..=first.total_pages {
            let request = DrillRequest { page: Some(n), page_size: Some(k), ..base.clone() };
            collected.extend(names(&page(resolve(&ds, &request, unpaged()).unwrap())));
        }
        assert_eq!(first.total_pages, full.len().div_ceil(k));
        assert_eq!(collected, full, "page size {k}");
    }
}

#[test]
fn csv_export_has_header_plus_rows() {
    let ds = workforce();
    let request = DrillRequest { export: Some(ExportFormat::Csv), ..DrillRequest::chart("bench_ageing_chart", "2-4 weeks") };
    let file = match resolve(&ds, &request, Paging::default()).unwrap() {
        DrillOutcome::Export(file) => file,
        other => panic!("expected export, got {other:?}"),
    };
    assert!(file.filename.starts_with("drilldown_bench_ageing_chart_"));
    assert!(file.filename.ends_with(".csv"));
    assert_eq!(file.content_type, "text/csv");
    let text = String::from_utf8(file.bytes).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 38);

    let listing = page(resolve(&ds, &DrillRequest::chart("bench_ageing_chart", "2-4 weeks"), Paging::default()).unwrap());
    assert_eq!(lines[0], listing.available_columns.join(","));
    assert_eq!(listing.total_count, 37);
}

#[test]
fn export_ignores_pagination() {
    let ds = workforce();
    let request = DrillRequest {
        export: Some(ExportFormat::Csv),
        page: Some(3),
        page_size: Some(5),
        ..DrillRequest::chart("status_chart", "Bench")
    };
    let DrillOutcome::Export(file) = resolve(&ds, &request, Paging::default()).unwrap() else {
        panic!("expected export");
    };
    assert_eq!(String::from_utf8(file.bytes).unwrap().lines().count(), BENCH + 1);
}

#[test]
fn zero_row_category_filter_falls_back() {
    let ds = workforce();
    let request = DrillRequest {
        categories: CategoryFilter::statuses(["Resigned"]),
        ..DrillRequest::chart("status_chart", "Bench")
    };
    let p = page(resolve(&ds, &request, Paging::default()).unwrap());
    assert_eq!(p.total_count, BENCH);
    assert!(p.filter_info.category_fallback);

    let request = DrillRequest {
        categories: CategoryFilter::statuses(["Allocated"]),
        ..DrillRequest::chart("location_chart", "Pune")
    };
    let p = page(resolve(&ds, &request, Paging::default()).unwrap());
    assert!(!p.filter_info.category_fallback);
    assert_eq!(p.total_count, (BENCH..TOTAL).filter(|i| i % 4 == 0).count());
}

#[test]
fn chart_on_a_narrowed_category_can_be_empty() {
    let ds = workforce();
    let request = DrillRequest {
        categories: CategoryFilter::statuses(["Allocated"]),
        ..DrillRequest::chart("bench_ageing_chart", "8+ weeks")
    };
    match resolve(&ds, &request, Paging::default()).unwrap() {
        DrillOutcome::Empty { message, filter_info } => {
            assert_eq!(message, "No data found for the selected filter");
            assert!(!filter_info.category_fallback);
        }
        other => panic!("expected empty, got {other:?}"),
    }
}

#[test]
fn experience_and_month_labels() {
    let ds = workforce();
    // 2.6 rounds into bucket 3 alongside 3.0
    let p = page(resolve(&ds, &DrillRequest::chart("experience_chart", "3"), unpaged()).unwrap());
    assert!(p.total_count > 0);
    let p_half = page(resolve(&ds, &DrillRequest::chart("experience_chart", "2.5"), unpaged()).unwrap());
    assert!(p_half.total_count > 0);
    assert!(matches!(
        resolve(&ds, &DrillRequest::chart("experience_chart", "three"), unpaged()).unwrap(),
        DrillOutcome::Empty { .. }
    ));

    // weekly joiners from 2020-01-01: January 2020 holds the 1st, 8th, 15th, 22nd and 29th
    for label in ["Jan 2020", "January 2020", "2020-01", "01/2020"] {
        let p = page(resolve(&ds, &DrillRequest::chart("joining_trend_chart", label), unpaged()).unwrap());
        assert_eq!(p.total_count, 5, "{label}");
    }
    assert!(matches!(
        resolve(&ds, &DrillRequest::chart("joining_trend_chart", "Smarch 2020"), unpaged()).unwrap(),
        DrillOutcome::Empty { .. }
    ));
}

#[test]
fn week_number_chart_accepts_bare_numbers() {
    let ds = workforce();
    let labelled = page(resolve(&ds, &DrillRequest::chart("ageing_week_chart", "Week 10"), unpaged()).unwrap());
    let bare = page(resolve(&ds, &DrillRequest::chart("ageing_week_chart", "10"), unpaged()).unwrap());
    assert_eq!(labelled.total_count, 10);
    assert_eq!(bare.total_count, 10);
}

#[test]
fn missing_value_browses_the_table() {
    let ds = workforce();
    let request = DrillRequest { chart_id: Some("status_chart".into()), ..DrillRequest::default() };
    let p = page(resolve(&ds, &request, Paging::default()).unwrap());
    assert_eq!(p.total_count, TOTAL);
    assert_eq!(p.total_pages, TOTAL.div_ceil(25));
    assert!(!p.filter_info.predicate_applied);
}

#[test]
fn unknown_sort_column_is_a_no_op() {
    let ds = workforce();
    let request = DrillRequest { sort_column: Some("Shoe Size".into()), page_size: Some(3), ..DrillRequest::default() };
    let p = page(resolve(&ds, &request, Paging::default()).unwrap());
    assert_eq!(names(&p), vec!["Employee 000", "Employee 001", "Employee 002"]);
    assert_eq!(p.sort_column, "Shoe Size");
}

#[test]
fn sort_by_a_numeric_column() {
    let ds = workforce();
    let request = DrillRequest {
        sort_column: Some("Current Ageing".into()),
        sort_direction: SortDirection::Desc,
        page_size: Some(1),
        ..DrillRequest::chart("status_chart", "Bench")
    };
    let p = page(resolve(&ds, &request, Paging::default()).unwrap());
    assert_eq!(names(&p), vec!["Employee 065"]);
}
