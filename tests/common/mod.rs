#![allow(dead_code)]

use benchscope::dataset::{Dataset, Record};
use benchscope::datatype::Value;
use benchscope::drilldown::{DrillOutcome, DrillPage, Paging};
use chrono::{Duration, NaiveDate};

pub const TOTAL: usize = 500;
pub const BENCH: usize = 75;

pub const HEADER: &[&str] = &[
    "Employee Code",
    "Employee Name",
    "Gender",
    "Level",
    "Employment Status",
    "Date of Joining",
    "Total Experience",
    "Location",
    "Work Mode",
    "Status",
    "Current Ageing",
    "Bench Category",
    "Tech1 Primary Skill",
    "Associate RAG Status",
    "Loading Percentage",
    "Client Name",
];

const LOCATIONS: [&str; 4] = ["Pune", "Chennai", "Bangalore", "Hyderabad"];
const SKILLS: [&str; 5] = ["Java", "Python", "AWS", "React", "Rust"];
const CLIENTS: [&str; 6] = ["Acme", "Globex", "Initech", "Umbrella", "Hooli", "Stark"];
const LOADINGS: [f64; 5] = [40.0, 60.0, 80.0, 100.0, 110.0];

/// Bench ageing, by bench index: 5 x 8, 37 x 20, 22 x 47, 1 x 51, 10 x 70.
/// Sums to 2565 over 75 rows, a mean of 34.2 days.
pub fn bench_ageing(b: usize) -> f64 {
    match b {
        0..=4 => 8.0,
        5..=41 => 20.0,
        42..=63 => 47.0,
        64 => 51.0,
        _ => 70.0,
    }
}

fn record(i: usize) -> Record {
    let bench = i < BENCH;
    let joined = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap() + Duration::days(7 * i as i64);
    let rag = if i % 25 == 0 { "Red" } else if i % 5 == 0 { "Amber" } else { "Green" };
    let mut r = Record::new()
        .with("Employee Code", format!("E{:04}", i))
        .with("Employee Name", format!("Employee {:03}", i))
        .with("Gender", if i % 2 == 0 { "Male" } else { "Female" })
        .with("Level", format!("L{}", 1 + i % 4))
        .with("Employment Status", "Active")
        .with("Date of Joining", joined)
        .with("Total Experience", (i % 15) as f64 + 0.3 * (i % 3) as f64)
        .with("Location", LOCATIONS[i % LOCATIONS.len()])
        .with("Work Mode", if i % 3 == 0 { "Remote" } else { "Office" })
        .with("Status", if bench { "Bench" } else { "Allocated" })
        .with("Tech1 Primary Skill", SKILLS[i % SKILLS.len()])
        .with("Associate RAG Status", rag);
    if bench {
        r.set("Current Ageing", bench_ageing(i));
        r.set("Bench Category", if i % 2 == 0 { "Fresher" } else { "Released" });
        r.set("Loading Percentage", Value::Empty);
        r.set("Client Name", Value::Empty);
    } else {
        r.set("Current Ageing", Value::Empty);
        r.set("Bench Category", Value::Empty);
        r.set("Loading Percentage", LOADINGS[i % LOADINGS.len()]);
        r.set("Client Name", CLIENTS[i % CLIENTS.len()]);
    }
    r
}

/// 500 employees, the first 75 on the bench.
pub fn workforce() -> Dataset {
    Dataset::with_columns(HEADER, (0..TOTAL).map(record).collect())
}

pub fn unpaged() -> Paging {
    Paging { default_page_size: 1000, max_page_size: 1000 }
}

pub fn page(outcome: DrillOutcome) -> DrillPage {
    match outcome {
        DrillOutcome::Page(p) => p,
        other => panic!("expected a page, got {other:?}"),
    }
}

pub fn names(page: &DrillPage) -> Vec<String> {
    page.rows
        .iter()
        .map(|r| r.get("Employee Name").map(|v| v.to_string()).unwrap_or_default())
        .collect()
}
