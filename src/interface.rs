//! Request facade over the current dataset.
//!
//! The dataset is held behind an `RwLock<Option<Arc<Dataset>>>`. Loading a new
//! dataset replaces the `Arc` wholesale; a request takes a snapshot (a clone of
//! the `Arc`) up front and works on that for its whole duration, so a
//! concurrent upload never changes the rows a request is looking at.

use std::sync::{Arc, RwLock};

use serde::Serialize;
use tracing::{debug, info};

use crate::analytics::{Analytics, FilterOptions, Insights, KeyMetrics};
use crate::dataset::{CategoryFilter, Dataset};
use crate::drilldown::{self, DrillOutcome, DrillRequest, Paging, Preview};
use crate::error::{BenchscopeError, Result};
use crate::schema::{self, CoverageReport};
use crate::settings::Settings;

/// Insights over a category-filtered view, with the filter that produced it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InsightsReport {
    #[serde(flatten)]
    pub insights: Insights,
    pub categories: CategoryFilter,
    pub category_fallback: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DatasetSummary {
    pub rows: usize,
    pub columns: usize,
}

pub struct BenchInterface {
    current: RwLock<Option<Arc<Dataset>>>,
    paging: Paging,
    top_skills: usize,
    preview_rows: usize,
}

impl BenchInterface {
    pub fn new(settings: &Settings) -> Self {
        Self {
            current: RwLock::new(None),
            paging: Paging {
                default_page_size: settings.default_page_size,
                max_page_size: settings.max_page_size,
            },
            top_skills: settings.top_skills,
            preview_rows: settings.preview_rows,
        }
    }

    /// Replaces the current dataset.
    pub fn load(&self, dataset: Dataset) -> Result<DatasetSummary> {
        let summary = DatasetSummary { rows: dataset.len(), columns: dataset.columns().len() };
        let mut current = self.current.write().map_err(|e| BenchscopeError::Lock(e.to_string()))?;
        *current = Some(Arc::new(dataset));
        info!(rows = summary.rows, columns = summary.columns, "dataset loaded");
        Ok(summary)
    }

    pub fn load_json(&self, json: &str) -> Result<DatasetSummary> {
        self.load(Dataset::from_json_records(json)?)
    }

    pub fn clear(&self) -> Result<()> {
        let mut current = self.current.write().map_err(|e| BenchscopeError::Lock(e.to_string()))?;
        *current = None;
        Ok(())
    }

    /// The dataset as of now. Fails with [`BenchscopeError::NoDataset`]
    /// before anything has been loaded.
    pub fn snapshot(&self) -> Result<Arc<Dataset>> {
        let current = self.current.read().map_err(|e| BenchscopeError::Lock(e.to_string()))?;
        current.as_ref().map(Arc::clone).ok_or(BenchscopeError::NoDataset)
    }

    pub fn insights(&self, categories: &CategoryFilter) -> Result<InsightsReport> {
        let dataset = self.snapshot()?;
        let (selection, category_fallback) = categories.apply(&dataset);
        debug!(rows = selection.len(), category_fallback, "computing insights");
        let insights = Analytics::new(selection).with_top_skills(self.top_skills).insights();
        Ok(InsightsReport { insights, categories: categories.clone(), category_fallback })
    }

    pub fn key_metrics(&self, categories: &CategoryFilter) -> Result<KeyMetrics> {
        let dataset = self.snapshot()?;
        let (selection, _) = categories.apply(&dataset);
        Ok(Analytics::new(selection).key_metrics())
    }

    pub fn drill_down(&self, request: &DrillRequest) -> Result<DrillOutcome> {
        let dataset = self.snapshot()?;
        drilldown::resolve(&dataset, request, self.paging)
    }

    pub fn coverage(&self) -> Result<CoverageReport> {
        let dataset = self.snapshot()?;
        Ok(schema::coverage(dataset.columns()))
    }

    pub fn filter_options(&self) -> Result<FilterOptions> {
        let dataset = self.snapshot()?;
        Ok(FilterOptions::of(&dataset))
    }

    pub fn preview(&self) -> Result<Preview> {
        let dataset = self.snapshot()?;
        Ok(drilldown::preview(&dataset, self.preview_rows))
    }
}
