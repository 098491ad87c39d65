//! Rendered-page data captured once per analysis request.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// An outbound `<a href>` link observed on the rendered page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageLink {
    /// Absolute link target
    pub href: String,
    /// Trimmed anchor text
    pub text: String,
    /// `rel` attribute, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rel: Option<String>,
    /// `target` attribute, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
}

/// A network response observed while loading the page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkResource {
    /// Resource URL
    pub url: String,
    /// HTTP status code
    pub status: u16,
    /// `Content-Type` header value, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    /// Size in bytes from `Content-Length`, if the server sent one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
}

/// Immutable result of rendering one URL once.
///
/// Created by the renderer, owned by the orchestrator for one request and shared
/// read-only (behind an `Arc`) with the report and the freshness cache.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PageSnapshot {
    /// URL the analysis was requested for
    pub requested_url: String,
    /// URL of the document after redirects
    pub final_url: String,
    /// Post-render HTML
    pub html: String,
    /// Title resolved by the renderer
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Outbound links
    pub links: Vec<PageLink>,
    /// Network responses observed during the load
    pub resources: Vec<NetworkResource>,
    /// Redirect chains: original URL -> ordered URLs ending at the final one
    pub redirect_chains: BTreeMap<String, Vec<String>>,
    /// Response headers of the document itself (lowercase names)
    pub response_headers: BTreeMap<String, String>,
    /// Elapsed load time in milliseconds
    pub load_time_ms: u64,
    /// Base64-encoded screenshot, absent when not captured or not entitled
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub screenshot: Option<String>,
}

impl PageSnapshot {
    /// Whether the final document was served over https.
    pub fn is_https(&self) -> bool {
        let url = if self.final_url.is_empty() {
            &self.requested_url
        } else {
            &self.final_url
        };
        url.to_ascii_lowercase().starts_with("https://")
    }
}
