//! Category identifiers and scored categories.
//!
//! `CategoryId` is the single canonical list of categories. The rule registry
//! assigns every rule to one of these variants and the aggregator iterates the
//! same enum, so the two can never disagree about which categories exist.

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumIter, EnumString};

use super::finding::Finding;

/// Canonical category identifiers, in report order.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    EnumIter,
    EnumString,
    Display,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum CategoryId {
    /// Title, description, headings, body copy, images
    Content,
    /// Canonical, language, robots meta, hreflang, redirects, URL shape
    Technical,
    /// JSON-LD blocks
    StructuredData,
    /// HTTPS, mixed content, security headers
    Security,
    /// Viewport configuration
    Mobile,
    /// Validity of outbound links
    Links,
    /// robots.txt and sitemap
    Crawlability,
    /// Load-time heuristics
    Performance,
}

impl CategoryId {
    /// Human-readable label for report rendering.
    pub fn label(&self) -> &'static str {
        match self {
            CategoryId::Content => "Content",
            CategoryId::Technical => "Technical",
            CategoryId::StructuredData => "Structured Data",
            CategoryId::Security => "Security",
            CategoryId::Mobile => "Mobile",
            CategoryId::Links => "Links",
            CategoryId::Crawlability => "Crawlability",
            CategoryId::Performance => "Performance",
        }
    }
}

/// A named, ordered sequence of Findings with its aggregate score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    /// Category identifier
    pub id: CategoryId,
    /// Aggregate score, 0-100
    pub score: u8,
    /// Findings in rule-registration order
    pub findings: Vec<Finding>,
}
