//! Error handling.
//!
//! This module provides:
//! - Error taxonomies for fatal, degraded and per-rule failures
//! - Transport error categorization
//! - Retry strategy configuration for the page fetch

mod categorization;
mod types;

// Re-export public API
pub use categorization::{categorize_reqwest_error, get_retry_strategy, is_retriable};
pub use types::{
    AnalysisError, FetchError, InitializationError, NetworkErrorKind, RenderError, RuleError,
};
