//! The aggregation engine.
//!
//! [`Analytics`] wraps a [`Selection`] (usually a category-filtered view of the
//! current dataset) and computes each insight section independently. Column
//! presence is checked once, up front, into [`Capabilities`]; a section whose
//! columns are absent leaves the corresponding fields out of its output rather
//! than failing. Every chart-shaped breakdown is produced through the binding
//! table in [`crate::binding`] so drill-down can reverse it exactly.

use std::collections::HashMap;

use serde::Serialize;

use crate::binding::{
    ATL_CHART, BENCH_AGEING_CHART, BENCH_AGEING_DAYS_CHART, AGEING_WEEK_CHART,
    BENCH_CATEGORY_CHART, BENCH_REASON_CHART, BENCH_SKILLS_CHART, CLIENT_CHART,
    EXPERIENCE_CHART, GENDER_CHART, JOINING_TREND_CHART, LEVEL_CHART, LOADING_CHART,
    LOCATION_CHART, LOCATION_STATUS_CHART, PROJECT_TYPE_CHART, RAG_CHART, SKILLS_CHART,
    STATUS_CHART, WORK_MODE_CHART, bound,
};
use crate::dataset::{ALLOCATED, BENCH, ColumnSet, Dataset, LOCATION, Record, STATUS, Selection};
use crate::stats::{
    Breakdown, NumericSummary, distinct, group_hits, mean, median, numbers, percentage, value_counts,
};

pub const EMPLOYMENT_STATUS: &str = "Employment Status";
pub const ACTIVE: &str = "Active";
pub const GENDER: &str = "Gender";
pub const LEVEL: &str = "Level";
pub const EXPERIENCE: &str = "Total Experience";
pub const JOINING_DATE: &str = "Date of Joining";
pub const AGEING: &str = "Current Ageing";
pub const BENCH_CATEGORY: &str = "Bench Category";
pub const BENCH_REASON: &str = "Reason For Bench";
pub const SKILL: &str = "Tech1 Primary Skill";
pub const TRAINING_STATUS: &str = "Training Status";
pub const RAG_STATUS: &str = "Associate RAG Status";
pub const SME_EVALUATION: &str = "SME Evaluation";
pub const ATL_ELIGIBLE: &str = "ATL Eligible";
pub const WORK_MODE: &str = "Work Mode";
pub const LOADING: &str = "Loading Percentage";
pub const CLIENT: &str = "Client Name";
pub const PROJECT_TYPE: &str = "Project Type";

pub const RAG_GREEN: &str = "Green";
pub const RAG_AMBER: &str = "Amber";
pub const RAG_RED: &str = "Red";

// ------------- thresholds -------------
pub const HIGH_BENCH_PERCENTAGE: f64 = 20.0;
pub const EXTENDED_AGEING_DAYS: f64 = 56.0;
pub const HIGH_RED_RAG_PERCENTAGE: f64 = 10.0;
pub const BENCH_ACTION_PERCENTAGE: f64 = 15.0;
pub const LOW_SKILL_ALLOCATION_RATE: f64 = 70.0;
pub const TARGET_BENCH_AGEING_DAYS: f64 = 30.0;
pub const NAMED_LOW_ALLOCATION_SKILLS: usize = 3;
pub const TOP_CLIENTS: usize = 10;
pub const CONCENTRATION_CLIENTS: usize = 3;
pub const DEFAULT_TOP_SKILLS: usize = 10;

/// A metric that is either computed or explicitly marked unavailable.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Metric<T> {
    Available(T),
    Unavailable { message: String },
}

impl<T> Metric<T> {
    pub fn unavailable<S: Into<String>>(message: S) -> Self {
        Metric::Unavailable { message: message.into() }
    }
    pub fn available(&self) -> Option<&T> {
        match self {
            Metric::Available(t) => Some(t),
            Metric::Unavailable { .. } => None,
        }
    }
    pub fn is_available(&self) -> bool {
        matches!(self, Metric::Available(_))
    }
}

/// Which optional columns this dataset carries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Capabilities {
    pub status: bool,
    pub employment_status: bool,
    pub gender: bool,
    pub level: bool,
    pub experience: bool,
    pub joining_date: bool,
    pub ageing: bool,
    pub bench_category: bool,
    pub bench_reason: bool,
    pub skill: bool,
    pub training_status: bool,
    pub rag_status: bool,
    pub sme_evaluation: bool,
    pub atl_eligible: bool,
    pub location: bool,
    pub work_mode: bool,
    pub loading: bool,
    pub client: bool,
    pub project_type: bool,
}

impl Capabilities {
    pub fn of(columns: &ColumnSet) -> Self {
        Self {
            status: columns.contains(STATUS),
            employment_status: columns.contains(EMPLOYMENT_STATUS),
            gender: columns.contains(GENDER),
            level: columns.contains(LEVEL),
            experience: columns.contains(EXPERIENCE),
            joining_date: columns.contains(JOINING_DATE),
            ageing: columns.contains(AGEING),
            bench_category: columns.contains(BENCH_CATEGORY),
            bench_reason: columns.contains(BENCH_REASON),
            skill: columns.contains(SKILL),
            training_status: columns.contains(TRAINING_STATUS),
            rag_status: columns.contains(RAG_STATUS),
            sme_evaluation: columns.contains(SME_EVALUATION),
            atl_eligible: columns.contains(ATL_ELIGIBLE),
            location: columns.contains(LOCATION),
            work_mode: columns.contains(WORK_MODE),
            loading: columns.contains(LOADING),
            client: columns.contains(CLIENT),
            project_type: columns.contains(PROJECT_TYPE),
        }
    }
}

// ------------- output documents -------------
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorkforceOverview {
    pub total_workforce: usize,
    pub active_employees: usize,
    pub workforce_utilization: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_breakdown: Option<Breakdown<f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_counts: Option<Breakdown<usize>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allocation_rate: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bench_rate: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender_diversity: Option<Breakdown<f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level_distribution: Option<Breakdown<usize>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avg_experience: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub experience_range: Option<NumericSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub experience_buckets: Option<Breakdown<usize>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub joining_trend: Option<Breakdown<usize>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BenchMetrics {
    pub total_bench_count: usize,
    pub bench_percentage: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub average_ageing_days: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub median_ageing_days: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ageing_distribution: Option<Breakdown<usize>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ageing_slabs: Option<Breakdown<usize>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ageing_weeks: Option<Breakdown<usize>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub critical_ageing: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_breakdown: Option<Breakdown<usize>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bench_reasons: Option<Breakdown<usize>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SkillsLandscape {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub primary_skills_distribution: Option<Breakdown<usize>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_skills: Option<Breakdown<usize>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skill_diversity: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bench_skills: Option<Breakdown<usize>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allocated_skills: Option<Breakdown<usize>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skill_allocation_rates: Option<Breakdown<f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub training_status: Option<Breakdown<usize>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PerformanceHealth {
    pub healthy: f64,
    pub at_risk: f64,
    pub critical: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PerformanceInsights {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rag_distribution: Option<Breakdown<f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub performance_health: Option<PerformanceHealth>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub evaluation_distribution: Option<Breakdown<usize>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub atl_eligibility: Option<Breakdown<usize>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LocationAnalytics {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location_distribution: Option<Breakdown<usize>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_locations: Option<usize>,
    /// location -> status -> percentage of that location's rows
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location_status_breakdown: Option<Breakdown<Breakdown<f64>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location_status_counts: Option<Breakdown<Breakdown<usize>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location_bench_rates: Option<Breakdown<f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub work_mode_distribution: Option<Breakdown<f64>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ClientConcentration {
    pub top_3_clients_share: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AllocationPatterns {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub average_loading: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub loading_summary: Option<NumericSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub loading_distribution: Option<Breakdown<usize>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_distribution: Option<Breakdown<usize>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_concentration: Option<ClientConcentration>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_type_distribution: Option<Breakdown<usize>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Severity {
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RiskIndicator {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub severity: Severity,
    pub value: String,
    pub description: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    pub category: &'static str,
    pub priority: Severity,
    pub action: &'static str,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Insights {
    pub workforce_overview: WorkforceOverview,
    pub bench_analytics: Metric<BenchMetrics>,
    pub skills_intelligence: SkillsLandscape,
    pub performance_insights: PerformanceInsights,
    pub location_analytics: LocationAnalytics,
    pub allocation_efficiency: AllocationPatterns,
    pub risk_indicators: Vec<RiskIndicator>,
    pub recommendations: Vec<Recommendation>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct KeyMetrics {
    pub total_employees: usize,
    pub active_employees: usize,
    pub bench_count: usize,
    pub allocated_count: usize,
    pub bench_percentage: f64,
    pub avg_experience: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FilterOptions {
    pub statuses: Vec<String>,
    pub locations: Vec<String>,
}

impl FilterOptions {
    pub fn of(dataset: &Dataset) -> Self {
        Self {
            statuses: distinct(dataset.records(), STATUS),
            locations: distinct(dataset.records(), LOCATION),
        }
    }
}

fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

// ------------- engine -------------
pub struct Analytics<'a> {
    selection: Selection<'a>,
    caps: Capabilities,
    top_skills: usize,
}

impl<'a> Analytics<'a> {
    pub fn new(selection: Selection<'a>) -> Self {
        let caps = Capabilities::of(selection.dataset().columns());
        Self { selection, caps, top_skills: DEFAULT_TOP_SKILLS }
    }

    pub fn with_top_skills(mut self, top_skills: usize) -> Self {
        self.top_skills = top_skills;
        self
    }

    pub fn capabilities(&self) -> Capabilities {
        self.caps
    }

    fn rows(&self) -> &[&'a Record] {
        self.selection.rows()
    }

    fn total(&self) -> usize {
        self.selection.len()
    }

    fn bench_rows(&self) -> Vec<&'a Record> {
        self.rows().iter().copied().filter(|r| r.is(STATUS, BENCH)).collect()
    }

    fn count_where(&self, column: &str, literal: &str) -> usize {
        self.rows().iter().filter(|r| r.is(column, literal)).count()
    }

    fn active_employees(&self) -> usize {
        if self.caps.employment_status {
            self.count_where(EMPLOYMENT_STATUS, ACTIVE)
        } else {
            self.total()
        }
    }

    fn bench_percentage(&self) -> f64 {
        percentage(self.count_where(STATUS, BENCH), self.total())
    }

    /// Ageing values the risk and recommendation rules look at: the bench
    /// rows when a status column exists, otherwise every row.
    fn ageing_under_watch(&self) -> Vec<f64> {
        if self.caps.status {
            numbers(self.bench_rows(), AGEING)
        } else {
            numbers(self.rows().iter().copied(), AGEING)
        }
    }

    /// Allocation rate per skill, skills in first-seen order.
    fn skill_allocation_rates(&self) -> Vec<(String, f64)> {
        group_hits(self.rows().iter().copied(), SKILL, |r| r.is(STATUS, ALLOCATED))
            .into_iter()
            .map(|(skill, total, allocated)| (skill, percentage(allocated, total)))
            .collect()
    }

    pub fn overview(&self) -> WorkforceOverview {
        let rows = self.rows();
        let total = self.total();
        let active = self.active_employees();
        let status_counts = self.caps.status.then(|| bound(STATUS_CHART).counts(rows));
        let status_breakdown = status_counts.as_ref().map(Breakdown::shares);
        let experience = self.caps.experience.then(|| numbers(rows.iter().copied(), EXPERIENCE));
        WorkforceOverview {
            total_workforce: total,
            active_employees: active,
            workforce_utilization: percentage(active, total),
            allocation_rate: status_breakdown.as_ref().map(|s| s.share(ALLOCATED)),
            bench_rate: status_breakdown.as_ref().map(|s| s.share(BENCH)),
            status_breakdown,
            status_counts,
            gender_diversity: self.caps.gender.then(|| bound(GENDER_CHART).counts(rows).shares()),
            level_distribution: self.caps.level.then(|| bound(LEVEL_CHART).counts(rows)),
            avg_experience: experience.as_deref().map(mean),
            experience_range: experience.as_deref().map(NumericSummary::of),
            experience_buckets: self.caps.experience.then(|| bound(EXPERIENCE_CHART).counts(rows)),
            joining_trend: self.caps.joining_date.then(|| bound(JOINING_TREND_CHART).counts(rows)),
        }
    }

    pub fn bench(&self) -> Metric<BenchMetrics> {
        if !self.caps.status {
            return Metric::unavailable("Status column not available for bench analysis");
        }
        let bench = self.bench_rows();
        if bench.is_empty() {
            return Metric::unavailable("No employees currently on bench");
        }
        let ageing = self.caps.ageing.then(|| numbers(bench.iter().copied(), AGEING));
        Metric::Available(BenchMetrics {
            total_bench_count: bench.len(),
            bench_percentage: percentage(bench.len(), self.total()),
            average_ageing_days: ageing.as_deref().map(mean),
            median_ageing_days: ageing.as_deref().map(median),
            ageing_distribution: self.caps.ageing.then(|| bound(BENCH_AGEING_DAYS_CHART).counts(&bench)),
            ageing_slabs: self.caps.ageing.then(|| bound(BENCH_AGEING_CHART).counts(&bench)),
            ageing_weeks: self.caps.ageing.then(|| bound(AGEING_WEEK_CHART).counts(&bench)),
            critical_ageing: ageing
                .as_ref()
                .map(|a| a.iter().filter(|d| **d > EXTENDED_AGEING_DAYS).count()),
            category_breakdown: self.caps.bench_category.then(|| bound(BENCH_CATEGORY_CHART).counts(&bench)),
            bench_reasons: self.caps.bench_reason.then(|| bound(BENCH_REASON_CHART).counts(&bench)),
        })
    }

    pub fn skills(&self) -> SkillsLandscape {
        let rows = self.rows();
        let mut skills = SkillsLandscape::default();
        if self.caps.skill {
            let distribution = bound(SKILLS_CHART).counts(rows);
            skills.top_skills = Some(distribution.head(self.top_skills));
            skills.skill_diversity = Some(distribution.len());
            if self.caps.status {
                let allocated = value_counts(rows.iter().copied().filter(|r| r.is(STATUS, ALLOCATED)), SKILL);
                let rates: HashMap<String, f64> = self.skill_allocation_rates().into_iter().collect();
                skills.bench_skills = Some(bound(BENCH_SKILLS_CHART).counts(rows));
                skills.skill_allocation_rates = Some(Breakdown::new(
                    distribution
                        .labels()
                        .map(|skill| (skill.to_string(), rates.get(skill).copied().unwrap_or(0.0)))
                        .collect(),
                ));
                skills.allocated_skills = Some(allocated);
            }
            skills.primary_skills_distribution = Some(distribution);
        }
        if self.caps.training_status {
            skills.training_status = Some(value_counts(rows.iter().copied(), TRAINING_STATUS));
        }
        skills
    }

    pub fn performance(&self) -> PerformanceInsights {
        let rows = self.rows();
        let mut performance = PerformanceInsights::default();
        if self.caps.rag_status {
            let rag = bound(RAG_CHART).counts(rows).shares();
            performance.performance_health = Some(PerformanceHealth {
                healthy: rag.share(RAG_GREEN),
                at_risk: rag.share(RAG_AMBER),
                critical: rag.share(RAG_RED),
            });
            performance.rag_distribution = Some(rag);
        }
        if self.caps.sme_evaluation {
            performance.evaluation_distribution = Some(value_counts(rows.iter().copied(), SME_EVALUATION));
        }
        if self.caps.atl_eligible {
            performance.atl_eligibility = Some(bound(ATL_CHART).counts(rows));
        }
        performance
    }

    pub fn location(&self) -> LocationAnalytics {
        let rows = self.rows();
        let mut location = LocationAnalytics::default();
        if self.caps.location {
            let distribution = bound(LOCATION_CHART).counts(rows);
            location.total_locations = Some(distribution.len());
            if self.caps.status {
                let stacked = bound(LOCATION_STATUS_CHART).stacked_counts(rows);
                let bench: HashMap<String, (usize, usize)> =
                    group_hits(rows.iter().copied(), LOCATION, |r| r.is(STATUS, BENCH))
                        .into_iter()
                        .map(|(place, total, bench)| (place, (total, bench)))
                        .collect();
                location.location_bench_rates = Some(Breakdown::new(
                    distribution
                        .labels()
                        .map(|place| {
                            let (total, on_bench) = bench.get(place).copied().unwrap_or((0, 0));
                            (place.to_string(), percentage(on_bench, total))
                        })
                        .collect(),
                ));
                location.location_status_breakdown = Some(stacked.map(Breakdown::shares));
                location.location_status_counts = Some(stacked);
            }
            location.location_distribution = Some(distribution);
        }
        if self.caps.work_mode {
            location.work_mode_distribution = Some(bound(WORK_MODE_CHART).counts(rows).shares());
        }
        location
    }

    pub fn allocation(&self) -> AllocationPatterns {
        let rows = self.rows();
        let mut allocation = AllocationPatterns::default();
        if self.caps.loading {
            let loading = numbers(rows.iter().copied(), LOADING);
            allocation.average_loading = Some(mean(&loading));
            allocation.loading_summary = Some(NumericSummary::of(&loading));
            allocation.loading_distribution = Some(bound(LOADING_CHART).counts(rows));
        }
        if self.caps.client {
            let clients = bound(CLIENT_CHART).counts(rows);
            let top = clients.head(CONCENTRATION_CLIENTS).total();
            allocation.client_concentration = Some(ClientConcentration {
                top_3_clients_share: percentage(top, clients.total()),
            });
            allocation.client_distribution = Some(clients.head(TOP_CLIENTS));
        }
        if self.caps.project_type {
            allocation.project_type_distribution = Some(bound(PROJECT_TYPE_CHART).counts(rows));
        }
        allocation
    }

    pub fn risk_indicators(&self) -> Vec<RiskIndicator> {
        let mut risks = Vec::new();
        if self.caps.status {
            let bench_pct = self.bench_percentage();
            if bench_pct > HIGH_BENCH_PERCENTAGE {
                risks.push(RiskIndicator {
                    kind: "High Bench Percentage",
                    severity: Severity::High,
                    value: format!("{bench_pct:.1}%"),
                    description: "Bench percentage exceeds 20% threshold",
                });
            }
        }
        if self.caps.ageing {
            let long_bench = self
                .ageing_under_watch()
                .into_iter()
                .filter(|d| *d > EXTENDED_AGEING_DAYS)
                .count();
            if long_bench > 0 {
                risks.push(RiskIndicator {
                    kind: "Extended Bench Ageing",
                    severity: Severity::Medium,
                    value: format!("{long_bench} employees"),
                    description: "Employees on bench for more than 8 weeks",
                });
            }
        }
        if self.caps.rag_status {
            let red_pct = percentage(self.count_where(RAG_STATUS, RAG_RED), self.total());
            if red_pct > HIGH_RED_RAG_PERCENTAGE {
                risks.push(RiskIndicator {
                    kind: "High Red RAG Status",
                    severity: Severity::High,
                    value: format!("{red_pct:.1}%"),
                    description: "High percentage of employees with Red RAG status",
                });
            }
        }
        risks
    }

    pub fn recommendations(&self) -> Vec<Recommendation> {
        let mut recommendations = Vec::new();
        if self.caps.status {
            let bench_pct = self.bench_percentage();
            if bench_pct > BENCH_ACTION_PERCENTAGE {
                recommendations.push(Recommendation {
                    category: "Bench Management",
                    priority: Severity::High,
                    action: "Implement aggressive allocation strategy",
                    description: format!("Current bench rate of {bench_pct:.1}% requires immediate attention"),
                });
            }
        }
        if self.caps.skill && self.caps.status {
            let low: Vec<String> = self
                .skill_allocation_rates()
                .into_iter()
                .filter(|(_, rate)| *rate < LOW_SKILL_ALLOCATION_RATE)
                .map(|(skill, _)| skill)
                .take(NAMED_LOW_ALLOCATION_SKILLS)
                .collect();
            if !low.is_empty() {
                recommendations.push(Recommendation {
                    category: "Skills Management",
                    priority: Severity::Medium,
                    action: "Focus on high-demand skills training",
                    description: format!("Skills with low allocation rates: {}", low.join(", ")),
                });
            }
        }
        if self.caps.ageing {
            let ageing = self.ageing_under_watch();
            let average = mean(&ageing);
            if !ageing.is_empty() && average > TARGET_BENCH_AGEING_DAYS {
                recommendations.push(Recommendation {
                    category: "Process Improvement",
                    priority: Severity::Medium,
                    action: "Reduce allocation cycle time",
                    description: format!("Average bench ageing of {average:.1} days exceeds target"),
                });
            }
        }
        recommendations.push(Recommendation {
            category: "Analytics",
            priority: Severity::Low,
            action: "Implement regular reporting cadence",
            description: "Schedule weekly bench reviews and monthly trend analysis".to_string(),
        });
        recommendations
    }

    pub fn key_metrics(&self) -> KeyMetrics {
        let bench_count = self.count_where(STATUS, BENCH);
        KeyMetrics {
            total_employees: self.total(),
            active_employees: self.active_employees(),
            bench_count,
            allocated_count: self.count_where(STATUS, ALLOCATED),
            bench_percentage: round2(percentage(bench_count, self.total())),
            avg_experience: mean(&numbers(self.rows().iter().copied(), EXPERIENCE)),
        }
    }

    pub fn insights(&self) -> Insights {
        Insights {
            workforce_overview: self.overview(),
            bench_analytics: self.bench(),
            skills_intelligence: self.skills(),
            performance_insights: self.performance(),
            location_analytics: self.location(),
            allocation_efficiency: self.allocation(),
            risk_indicators: self.risk_indicators(),
            recommendations: self.recommendations(),
        }
    }
}
