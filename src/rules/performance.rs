//! Load-time heuristics and network resource checks.
//!
//! Not a real audit: the timing figures are all derived from the single measured
//! load time of the document.

use serde_json::json;

use crate::config::{LARGE_IMAGE_BYTES, LOAD_TIME_PASS_MS, LOAD_TIME_WARN_MS, MAX_DETAIL_ITEMS};
use crate::error_handling::RuleError;
use crate::model::{Finding, NetworkResource};

use super::RuleContext;

pub const LOAD_TIME: &str = "load_time";
pub const PERFORMANCE_ESTIMATE: &str = "performance_estimate";
pub const FAILED_RESOURCES: &str = "failed_resources";
pub const IMAGE_SIZES: &str = "image_sizes";

pub fn check_load_time(load_time_ms: u64) -> Finding {
    let seconds = load_time_ms as f64 / 1000.0;
    if load_time_ms < LOAD_TIME_PASS_MS {
        Finding::pass(LOAD_TIME, format!("Page loaded in {seconds:.2}s"))
    } else if load_time_ms < LOAD_TIME_WARN_MS {
        Finding::warn(LOAD_TIME, format!("Page load is slow ({seconds:.2}s)"))
    } else {
        Finding::fail(LOAD_TIME, format!("Page load is very slow ({seconds:.2}s)"))
    }
}

/// Heuristic score for a load time: 90 / 70 / 50 by the load-time bands.
pub fn estimate_score(load_time_ms: u64) -> u8 {
    if load_time_ms < LOAD_TIME_PASS_MS {
        90
    } else if load_time_ms < LOAD_TIME_WARN_MS {
        70
    } else {
        50
    }
}

pub fn check_performance_estimate(load_time_ms: u64) -> Finding {
    let score = estimate_score(load_time_ms);
    let estimate = |factor: f64| (load_time_ms as f64 * factor).round() as u64;
    let details = json!({
        "score": score,
        "first_contentful_paint_ms": estimate(0.3),
        "largest_contentful_paint_ms": estimate(0.8),
        "speed_index_ms": estimate(0.7),
    });
    let finding = if score >= 90 {
        Finding::pass(PERFORMANCE_ESTIMATE, format!("Estimated performance score {score}"))
    } else {
        Finding::warn(PERFORMANCE_ESTIMATE, format!("Estimated performance score {score}"))
    };
    finding.with_data(details)
}

/// Network responses with status >= 400 are listed (at most 10).
pub fn check_failed_resources(resources: &[NetworkResource]) -> Finding {
    let failed: Vec<&NetworkResource> = resources.iter().filter(|r| r.status >= 400).collect();
    if failed.is_empty() {
        Finding::pass(FAILED_RESOURCES, "No failed network requests")
    } else {
        Finding::warn(
            FAILED_RESOURCES,
            format!("{} network request(s) failed", failed.len()),
        )
        .with_list(
            failed
                .iter()
                .take(MAX_DETAIL_ITEMS)
                .map(|r| format!("{} ({})", r.url, r.status)),
        )
    }
}

/// Image responses larger than `LARGE_IMAGE_BYTES` -> warn listing at most 10 as
/// "file name (N KB)"; otherwise pass. Images without a known size are not judged.
pub fn check_image_sizes(resources: &[NetworkResource]) -> Finding {
    let large: Vec<(&NetworkResource, u64)> = resources
        .iter()
        .filter(|r| {
            r.content_type
                .as_deref()
                .is_some_and(|t| t.trim_start().to_ascii_lowercase().starts_with("image"))
        })
        .filter_map(|r| r.size.filter(|&size| size > LARGE_IMAGE_BYTES).map(|size| (r, size)))
        .collect();
    if large.is_empty() {
        return Finding::pass(IMAGE_SIZES, "All images are reasonably sized");
    }

    Finding::warn(
        IMAGE_SIZES,
        format!("{} large image(s) (>200KB) detected", large.len()),
    )
    .with_list(large.iter().take(MAX_DETAIL_ITEMS).map(|(r, size)| {
        let name = r
            .url
            .split(['?', '#'])
            .next()
            .and_then(|path| path.rsplit('/').next())
            .filter(|name| !name.is_empty())
            .unwrap_or(r.url.as_str());
        format!("{} ({} KB)", name, (*size as f64 / 1024.0).round() as u64)
    }))
}

pub(super) fn load_time_rule(ctx: &RuleContext<'_>) -> Result<Vec<Finding>, RuleError> {
    Ok(vec![check_load_time(ctx.snapshot.load_time_ms)])
}

pub(super) fn performance_estimate_rule(ctx: &RuleContext<'_>) -> Result<Vec<Finding>, RuleError> {
    Ok(vec![check_performance_estimate(ctx.snapshot.load_time_ms)])
}

pub(super) fn failed_resources_rule(ctx: &RuleContext<'_>) -> Result<Vec<Finding>, RuleError> {
    Ok(vec![check_failed_resources(&ctx.snapshot.resources)])
}

pub(super) fn image_sizes_rule(ctx: &RuleContext<'_>) -> Result<Vec<Finding>, RuleError> {
    Ok(vec![check_image_sizes(&ctx.snapshot.resources)])
}
