//! Static registry of the columns a workforce export is expected to carry,
//! grouped into semantic categories. Only used for coverage reporting; no
//! aggregation depends on it.

use serde::Serialize;

use crate::dataset::ColumnSet;

pub const UNCATEGORIZED: &str = "uncategorized";

#[derive(Debug, Clone, Copy, Serialize)]
pub struct ColumnCategory {
    pub name: &'static str,
    pub description: &'static str,
    pub columns: &'static [&'static str],
    pub key_metrics: &'static [&'static str],
}

pub const CATEGORIES: &[ColumnCategory] = &[
    ColumnCategory {
        name: "employee_info",
        description: "Core employee identification and basic information",
        columns: &[
            "Employee Code", "Employee Name", "Gender", "Level", "Designation",
            "Employment Status", "Nature Of Employment", "Date of Joining",
            "Total Experience", "Email ID", "Mobile Number", "Visa",
        ],
        key_metrics: &["headcount", "experience_distribution", "level_distribution"],
    },
    ColumnCategory {
        name: "location_info",
        description: "Geographic and work arrangement details",
        columns: &["Location", "Base Location", "State", "Region", "Work Mode"],
        key_metrics: &["location_distribution", "remote_vs_office", "regional_analysis"],
    },
    ColumnCategory {
        name: "project_allocation",
        description: "Current and historical project assignment information",
        columns: &[
            "Client Name", "Project Name", "Project Department", "Project Type",
            "Actual Allocation Start Date", "Expected Billing Start Date",
            "Allocation Start Date", "Allocation End Date", "Loading Percentage",
            "Planned ReleaseDate", "SOW Role", "Primary Ro", "ADM", "PMO Name",
        ],
        key_metrics: &["allocation_rate", "loading_efficiency", "client_distribution", "project_duration"],
    },
    ColumnCategory {
        name: "skills_training",
        description: "Technical skills, certifications, and training programs",
        columns: &[
            "Tech1 Primary Skill", "Tech1 NonPrimary Skill", "Tech2 Primary Skill",
            "Tech2 NonPrimary Skill", "Training Plan", "Training Need Identified",
            "Tech1 For Training", "Tech 2 For Training", "Training Status",
            "Certifications", "Skill", "Last Skill Update on",
        ],
        key_metrics: &["skill_inventory", "training_completion", "certification_status", "skill_gaps"],
    },
    ColumnCategory {
        name: "bench_management",
        description: "Bench status, ageing, and management tracking",
        columns: &[
            "Status", "Bench Category", "Reason For Bench", "Current Ageing",
            "Actual Ageing", "Current Ageing Slab", "Actual Ageing Slab",
            "Current Ageing Slab Sort", "Actual Ageing Slab Sort",
            "Bench Ageing >8Wks Reason", "Bench Ageing >8Wks Remarks",
        ],
        key_metrics: &["bench_percentage", "average_ageing", "ageing_distribution", "bench_reasons"],
    },
    ColumnCategory {
        name: "workforce_planning",
        description: "Future planning and workforce management",
        columns: &[
            "BU Owner", "WFM Owner Name", "WFM Plan Status", "WFM Plan Date",
            "Expected Allocation Start Date", "Expected Client Name",
            "Expected Project Name", "Available for Other BU", "WFM Capability Input",
            "Deployment Remarks",
        ],
        key_metrics: &["planning_accuracy", "cross_bu_availability", "deployment_timeline"],
    },
    ColumnCategory {
        name: "performance_metrics",
        description: "Performance evaluations and ratings",
        columns: &[
            "Associate RAG Status", "SME Evaluation", "Evaluation Tool",
            "Evaluation Tool/Training Remarks", "No Of Evaluation",
            "Last Evaluation Reason", "ATL Eligible", "ATL Remarks",
            "Associate Classification",
        ],
        key_metrics: &["rag_distribution", "evaluation_scores", "atl_eligibility"],
    },
    ColumnCategory {
        name: "hr_admin",
        description: "HR administrative and compliance information",
        columns: &[
            "HRBP", "BGV Status", "BGV Closure Status", "Expected BGV Closure Date",
            "Contract EndDate", "Notice Period", "Offer Type", "LOB", "MITy", "Load",
        ],
        key_metrics: &["bgv_compliance", "contract_expiry", "notice_period_analysis"],
    },
    ColumnCategory {
        name: "separation_info",
        description: "Employee separation and exit information",
        columns: &[
            "Date Of Resignation", "Last Working Day", "Nature Of Separation",
            "Reason", "Primary Reason", "Resignation Status", "Last Release Reason",
            "Released Feedback",
        ],
        key_metrics: &["attrition_rate", "separation_reasons", "exit_feedback"],
    },
    ColumnCategory {
        name: "historical_tracking",
        description: "Historical data and tracking information",
        columns: &[
            "Last Project Release Date", "Last BU Released From", "Last Client Released From",
            "Last Project Released From", "First On-Boarding Date", "First Project Allocation Date",
            "First Billing Date", "Previous Status", "Hired_Released", "Hired_Released Month",
        ],
        key_metrics: &["tenure_analysis", "project_history", "allocation_patterns"],
    },
    ColumnCategory {
        name: "leave_management",
        description: "Leave and absence tracking",
        columns: &["Leave Status", "Leave Type", "Leave Start Date", "Leave End Date"],
        key_metrics: &["leave_utilization", "absence_patterns"],
    },
    ColumnCategory {
        name: "recruitment_onboarding",
        description: "Recruitment and onboarding process tracking",
        columns: &[
            "Interview Panel Member", "CV Available", "CV Uploaded By", "CV Uploaded Date",
            "Allocated On SF ID", "SF ID Hired For", "BU Hired For", "Client Hired For",
            "Project Hired For", "Opportunity ID", "Greeting Mail Sent",
        ],
        key_metrics: &["onboarding_efficiency", "recruitment_pipeline"],
    },
    ColumnCategory {
        name: "system_tracking",
        description: "System and process tracking fields",
        columns: &[
            "Last Modified By", "Last Modified On", "Status SubType", "Allocation Remark",
            "Resource Remarks", "Replacement Required", "Allocation Req ID",
            "SupportingDocuments",
        ],
        key_metrics: &["data_freshness", "process_compliance"],
    },
];

pub fn expected_columns() -> impl Iterator<Item = &'static str> {
    CATEGORIES.iter().flat_map(|c| c.columns.iter().copied())
}

pub fn category_for_column(column: &str) -> &'static str {
    CATEGORIES
        .iter()
        .find(|c| c.columns.iter().any(|col| *col == column))
        .map(|c| c.name)
        .unwrap_or(UNCATEGORIZED)
}

pub fn missing_columns(columns: &ColumnSet) -> Vec<&'static str> {
    expected_columns().filter(|c| !columns.contains(c)).collect()
}

pub fn extra_columns(columns: &ColumnSet) -> Vec<String> {
    columns
        .iter()
        .filter(|c| category_for_column(c) == UNCATEGORIZED)
        .map(String::from)
        .collect()
}

#[derive(Debug, Clone, Serialize)]
pub struct CategoryCoverage {
    pub category: &'static str,
    pub description: &'static str,
    pub expected: usize,
    pub present: Vec<&'static str>,
    pub missing: Vec<&'static str>,
    pub coverage_percentage: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct CoverageReport {
    pub total_columns: usize,
    pub expected_columns: usize,
    pub categories: Vec<CategoryCoverage>,
    pub missing_columns: Vec<&'static str>,
    pub extra_columns: Vec<String>,
}

pub fn coverage(columns: &ColumnSet) -> CoverageReport {
    let categories = CATEGORIES
        .iter()
        .map(|c| {
            let (present, missing): (Vec<&'static str>, Vec<&'static str>) =
                c.columns.iter().copied().partition(|col| columns.contains(col));
            let coverage_percentage = if c.columns.is_empty() {
                0.0
            } else {
                present.len() as f64 / c.columns.len() as f64 * 100.0
            };
            CategoryCoverage {
                category: c.name,
                description: c.description,
                expected: c.columns.len(),
                present,
                missing,
                coverage_percentage,
            }
        })
        .collect();
    CoverageReport {
        total_columns: columns.len(),
        expected_columns: expected_columns().count(),
        categories,
        missing_columns: missing_columns(columns),
        extra_columns: extra_columns(columns),
    }
}
