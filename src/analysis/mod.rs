//! Analysis Orchestrator.
//!
//! Per request: validate the URL, render the page (fatal on failure), run the
//! robots.txt, sitemap and link stages concurrently under one deadline (each
//! degrading to "unavailable" on failure), then evaluate the rules and score.
//! Stages 1-4 are skipped when the freshness cache already holds a crawl of the
//! same URL for the same plan.

mod analyzer;
mod cache;
mod settings;
mod stages;

pub use analyzer::Analyzer;
pub use cache::{CacheKey, CachedCrawl, ReportCache};
pub use settings::AnalyzerSettings;
