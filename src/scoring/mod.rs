//! Category Aggregator and Scoring Model.
//!
//! Two independent layers:
//! - a category score is a function of that category's findings only
//! - the overall score is a function of the category scores only
//!
//! Both are plain means of discrete values rounded half up, so anyone can
//! recompute a report's numbers from the visible findings.

use std::collections::BTreeMap;

use crate::model::{Category, CategoryId, Finding, Status};

/// Numeric weight of a status.
pub fn status_weight(status: Status) -> u32 {
    match status {
        Status::Pass => 100,
        Status::Warn => 50,
        Status::Fail => 0,
        Status::Info => 50,
    }
}

/// Mean of `values`, rounded half up. Empty input is 0.
fn rounded_mean(values: impl IntoIterator<Item = u32>) -> u8 {
    let (sum, count) = values
        .into_iter()
        .fold((0u64, 0u64), |(sum, count), v| (sum + u64::from(v), count + 1));
    if count == 0 {
        return 0;
    }
    let mean = (2 * sum + count) / (2 * count);
    u8::try_from(mean.min(100)).unwrap_or(100)
}

/// Category score 0-100: mean of the findings' status weights. No findings scores 0.
pub fn aggregate_category(findings: &[Finding]) -> u8 {
    rounded_mean(findings.iter().map(|f| status_weight(f.status)))
}

/// Overall score 0-100: unweighted mean of the category scores present.
///
/// Skipped categories must not be passed in; they are excluded, never counted as 0.
pub fn overall_score(category_scores: &[u8]) -> u8 {
    rounded_mean(category_scores.iter().map(|&s| u32::from(s)))
}

/// Scores grouped findings, keeping canonical category order.
pub fn build_categories(grouped: BTreeMap<CategoryId, Vec<Finding>>) -> Vec<Category> {
    grouped
        .into_iter()
        .map(|(id, findings)| Category {
            id,
            score: aggregate_category(&findings),
            findings,
        })
        .collect()
}
