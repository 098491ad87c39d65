//! Secondary crawl artifacts gathered alongside the page snapshot.
//!
//! Every field may independently be unavailable. Absence is a valid state that the
//! rules evaluate, never a failure of the whole analysis.

use serde::{Deserialize, Serialize};

use crate::parse::RobotsTxt;

/// Either the artifact, or the reason it could not be obtained.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum Availability<T> {
    /// The artifact was fetched
    Available(T),
    /// The probe failed, timed out, or was not attempted
    Unavailable {
        /// Human-readable cause
        reason: String,
    },
}

impl<T> Availability<T> {
    /// Builds the unavailable marker from any displayable cause.
    pub fn unavailable(reason: impl ToString) -> Self {
        Availability::Unavailable {
            reason: reason.to_string(),
        }
    }

    /// Returns the artifact, if present.
    pub fn as_available(&self) -> Option<&T> {
        match self {
            Availability::Available(value) => Some(value),
            Availability::Unavailable { .. } => None,
        }
    }

    /// Returns the failure reason, if unavailable.
    pub fn unavailable_reason(&self) -> Option<&str> {
        match self {
            Availability::Available(_) => None,
            Availability::Unavailable { reason } => Some(reason),
        }
    }
}

/// A fetched robots.txt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RobotsInfo {
    /// Where robots.txt was fetched from
    pub url: String,
    /// Raw content, truncated for payload size
    pub content: String,
    /// `Sitemap:` declarations
    pub sitemaps: Vec<String>,
    /// Parsed rule groups, evaluated against the full (untruncated) file
    pub rules: RobotsTxt,
}

impl RobotsInfo {
    /// Whether `agent` may crawl `url` under these rules.
    pub fn can_crawl(&self, url: &str, agent: &str) -> bool {
        self.rules.is_allowed(url, agent)
    }
}

/// A sitemap found at one of the conventional locations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SitemapInfo {
    /// Location that answered 200
    pub url: String,
    /// Leading excerpt of the body
    pub content_excerpt: String,
}

/// Result of validating one outbound link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkCheck {
    /// Link target
    pub href: String,
    /// Final HTTP status; 0 when the request itself failed
    pub status: u16,
    /// True iff 200 <= status < 400
    pub reachable: bool,
    /// Failure description for unreachable links that never got a status
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Why link validation was not attempted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkSkipReason {
    /// The plan does not include link validation
    NotEntitled,
    /// The page has no outbound links
    NoLinks,
    /// The caller excluded the links category from this run
    CategorySkipped,
}

/// Outcome of the link-validation stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum LinkValidation {
    /// Links were checked; one entry per checked link
    Checked {
        /// Per-link results in page order
        results: Vec<LinkCheck>,
    },
    /// Validation was deliberately not attempted
    Skipped {
        /// Why it was skipped
        reason: LinkSkipReason,
    },
    /// The whole batch failed or ran out of time
    Unavailable {
        /// Human-readable cause
        reason: String,
    },
}

/// Bundle of secondary crawl artifacts for one URL.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuxData {
    /// robots.txt probe
    pub robots: Availability<RobotsInfo>,
    /// Sitemap probe
    pub sitemap: Availability<SitemapInfo>,
    /// Link validation
    pub links: LinkValidation,
}

impl Default for AuxData {
    fn default() -> Self {
        Self {
            robots: Availability::unavailable("not attempted"),
            sitemap: Availability::unavailable("not attempted"),
            links: LinkValidation::Skipped {
                reason: LinkSkipReason::NoLinks,
            },
        }
    }
}
