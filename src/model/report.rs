//! The Report: terminal artifact of one analysis.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::aux_data::AuxData;
use super::category::{Category, CategoryId};
use super::entitlement::Plan;
use super::finding::Status;
use super::snapshot::PageSnapshot;

/// Version of the serialized report layout. Bump on breaking field changes.
pub const REPORT_SCHEMA_VERSION: u32 = 1;

/// Counts of findings by status across all present categories.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FindingSummary {
    pub pass: usize,
    pub warn: usize,
    pub fail: usize,
    pub info: usize,
}

impl FindingSummary {
    pub fn from_categories(categories: &[Category]) -> Self {
        let mut summary = Self::default();
        for finding in categories.iter().flat_map(|c| c.findings.iter()) {
            match finding.status {
                Status::Pass => summary.pass += 1,
                Status::Warn => summary.warn += 1,
                Status::Fail => summary.fail += 1,
                Status::Info => summary.info += 1,
            }
        }
        summary
    }

    pub fn total(&self) -> usize {
        self.pass + self.warn + self.fail + self.info
    }
}

/// Scored, immutable analysis result.
///
/// The snapshot and aux data are shared with the freshness cache, hence the `Arc`s.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    /// Layout version, see [`REPORT_SCHEMA_VERSION`]
    pub schema_version: u32,
    /// URL that was analysed
    pub url: String,
    /// When this report was assembled (RFC 3339 / ISO-8601)
    pub timestamp: DateTime<Utc>,
    /// Plan the analysis ran under
    pub plan: Plan,
    /// Whether stages 1-4 were served from the freshness cache
    pub from_cache: bool,
    /// Mean of the category scores, 0-100
    pub overall_score: u8,
    /// Finding counts by status
    pub summary: FindingSummary,
    /// Categories in canonical order; skipped categories are absent
    pub categories: Vec<Category>,
    /// Raw rendered-page data for drill-down
    pub snapshot: Arc<PageSnapshot>,
    /// Raw crawl artifacts for drill-down
    pub aux: Arc<AuxData>,
}

impl Report {
    /// Looks up one category by id.
    pub fn category(&self, id: CategoryId) -> Option<&Category> {
        self.categories.iter().find(|c| c.id == id)
    }

    /// Per-category scores keyed by id.
    pub fn category_scores(&self) -> BTreeMap<CategoryId, u8> {
        self.categories.iter().map(|c| (c.id, c.score)).collect()
    }

    /// Serializes the report as JSON.
    ///
    /// # Errors
    ///
    /// Returns the serializer error; with the field types used here this only happens
    /// if the writer itself fails.
    pub fn to_json(&self, pretty: bool) -> serde_json::Result<String> {
        if pretty {
            serde_json::to_string_pretty(self)
        } else {
            serde_json::to_string(self)
        }
    }
}
