//! seo_audit library: single-URL SEO and technical-health analysis
//!
//! This library renders one URL, probes its robots.txt, sitemap and outbound links,
//! evaluates a fixed library of rules against the result, and produces a scored
//! [`Report`] grouped into categories.
//!
//! # Example
//!
//! ```no_run
//! use seo_audit::{Analyzer, Config, Entitlement, Plan};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config {
//!     url: "https://example.com".to_string(),
//!     max_links: 10,
//!     ..Default::default()
//! };
//!
//! let analyzer = Analyzer::from_config(&config)?;
//! let report = analyzer.analyze(&config.url, &Entitlement::new(Plan::Pro)).await?;
//! for category in &report.categories {
//!     println!("{}: {}", category.id, category.score);
//! }
//! println!("Overall: {}", report.overall_score);
//! # Ok(())
//! # }
//! ```
//!
//! # Requirements
//!
//! This library requires a Tokio runtime. Use `#[tokio::main]` in your application
//! or ensure you're calling library functions within an async context.

pub mod analysis;
pub mod collectors;
pub mod config;
pub mod error_handling;
pub mod initialization;
pub mod model;
pub mod parse;
pub mod rules;
pub mod scoring;
pub mod security;
mod utils;

// Re-export public API
pub use analysis::{Analyzer, AnalyzerSettings, ReportCache};
pub use collectors::{CrawlProbe, HttpProbe, HttpRenderer, PageRenderer, RenderOptions};
pub use config::{Config, LogFormat, LogLevel};
pub use error_handling::{AnalysisError, FetchError, InitializationError, RenderError, RuleError};
pub use model::{
    AuxData, Category, CategoryId, Entitlement, Finding, PageSnapshot, Plan, Report, Status,
};
