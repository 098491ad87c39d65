//! Error type definitions.
//!
//! Errors are split by how far they propagate:
//! - **Fatal** (`AnalysisError`): abort the analysis, no report is produced
//! - **Degraded** (`FetchError`): a crawl stage is recorded as unavailable
//! - **Per-item** (`RuleError`): one rule yields a single `fail` finding

use log::SetLoggerError;
use reqwest::Error as ReqwestError;
use strum_macros::EnumIter as EnumIterMacro;
use thiserror::Error;

use super::categorization::categorize_reqwest_error;

/// Error types for initialization failures.
#[derive(Error, Debug)]
pub enum InitializationError {
    /// Error initializing the logger.
    #[error("Logger initialization error: {0}")]
    LoggerError(#[from] SetLoggerError),

    /// Error initializing the HTTP client.
    #[error("HTTP client initialization error: {0}")]
    HttpClientError(#[from] ReqwestError),

    /// Configuration values that cannot describe a runnable analysis.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Fatal analysis errors. Each variant maps to one user-visible classification.
#[derive(Error, Debug)]
pub enum AnalysisError {
    /// The target is not an absolute http(s) URL.
    #[error("Bad URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    /// Navigation failed or timed out.
    #[error("Page unreachable ({url}): {reason}")]
    PageUnreachable { url: String, reason: String },

    /// The rendering engine itself could not be started or crashed.
    #[error("Render engine failure: {0}")]
    RenderEngine(String),

    /// The caller cancelled the request.
    #[error("Analysis cancelled")]
    Cancelled,
}

impl AnalysisError {
    /// Stable machine-readable classification of the failure.
    pub fn kind(&self) -> &'static str {
        match self {
            AnalysisError::InvalidUrl { .. } => "bad_url",
            AnalysisError::PageUnreachable { .. } => "page_unreachable",
            AnalysisError::RenderEngine(_) => "render_engine",
            AnalysisError::Cancelled => "cancelled",
        }
    }
}

/// Failures surfaced by a page renderer.
///
/// Navigation problems are kept distinct from engine startup problems so the
/// orchestrator can classify them differently.
#[derive(Error, Debug)]
pub enum RenderError {
    /// The page could not be loaded (DNS, connect, TLS, HTTP error status).
    #[error("navigation to {url} failed: {reason}")]
    Navigation { url: String, reason: String },

    /// The page did not finish loading in time.
    #[error("navigation to {url} timed out after {seconds}s")]
    Timeout { url: String, seconds: u64 },

    /// The engine (browser, HTTP client) could not be started.
    #[error("render engine could not start: {0}")]
    BrowserLaunch(String),
}

impl From<RenderError> for AnalysisError {
    fn from(error: RenderError) -> Self {
        match error {
            RenderError::Navigation { url, reason } => AnalysisError::PageUnreachable { url, reason },
            RenderError::Timeout { url, seconds } => AnalysisError::PageUnreachable {
                url,
                reason: format!("timed out after {seconds}s"),
            },
            RenderError::BrowserLaunch(reason) => AnalysisError::RenderEngine(reason),
        }
    }
}

/// Failures of the auxiliary crawl probes (robots.txt, sitemap, link batch).
///
/// Always degraded into an "unavailable" marker, never propagated as fatal.
#[derive(Error, Debug)]
pub enum FetchError {
    /// Transport-level failure.
    #[error("{kind}: {0}", kind = categorize_reqwest_error(.0))]
    Http(#[from] ReqwestError),

    /// The server answered with a non-success status.
    #[error("HTTP status {0}")]
    Status(u16),

    /// The probe exceeded its timeout or the shared deadline.
    #[error("timed out")]
    Timeout,

    /// The page URL has no usable origin to probe against.
    #[error("invalid origin: {0}")]
    InvalidOrigin(String),
}

/// Per-rule failure for inputs a rule cannot interpret.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RuleError {
    #[error("malformed input: {detail}")]
    MalformedInput { detail: String },
}

impl RuleError {
    pub fn malformed(detail: impl Into<String>) -> Self {
        RuleError::MalformedInput {
            detail: detail.into(),
        }
    }
}

/// Coarse classification of a transport error, used in log lines and messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIterMacro)]
pub enum NetworkErrorKind {
    Builder,
    Redirect,
    Timeout,
    Connect,
    Request,
    Body,
    Decode,
    // Status-derived kinds
    BotDetection, // 403 Forbidden
    NotFound,
    TooManyRequests,
    ClientError,
    ServerError,
    Other,
}

impl std::fmt::Display for NetworkErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl NetworkErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NetworkErrorKind::Builder => "request builder error",
            NetworkErrorKind::Redirect => "redirect error",
            NetworkErrorKind::Timeout => "request timeout",
            NetworkErrorKind::Connect => "connection error",
            NetworkErrorKind::Request => "request error",
            NetworkErrorKind::Body => "body error",
            NetworkErrorKind::Decode => "decode error",
            NetworkErrorKind::BotDetection => "bot detection (403 Forbidden)",
            NetworkErrorKind::NotFound => "not found (404)",
            NetworkErrorKind::TooManyRequests => "too many requests (429)",
            NetworkErrorKind::ClientError => "client error (4xx)",
            NetworkErrorKind::ServerError => "server error (5xx)",
            NetworkErrorKind::Other => "network error",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_analysis_error_kinds() {
        let bad = AnalysisError::InvalidUrl {
            url: "ftp://x".into(),
            reason: "unsupported scheme".into(),
        };
        assert_eq!(bad.kind(), "bad_url");
        assert!(bad.to_string().contains("ftp://x"));
        assert_eq!(AnalysisError::Cancelled.kind(), "cancelled");
    }

    #[test]
    fn test_render_navigation_maps_to_page_unreachable() {
        let err: AnalysisError = RenderError::Navigation {
            url: "https://example.com".into(),
            reason: "connection refused".into(),
        }
        .into();
        assert_eq!(err.kind(), "page_unreachable");
    }

    #[test]
    fn test_render_timeout_maps_to_page_unreachable() {
        let err: AnalysisError = RenderError::Timeout {
            url: "https://example.com".into(),
            seconds: 30,
        }
        .into();
        assert_eq!(err.kind(), "page_unreachable");
        assert!(err.to_string().contains("30s"));
    }

    #[test]
    fn test_browser_launch_maps_to_render_engine() {
        let err: AnalysisError = RenderError::BrowserLaunch("no sandbox".into()).into();
        assert_eq!(err.kind(), "render_engine");
    }

    #[test]
    fn test_fetch_error_messages() {
        assert_eq!(FetchError::Status(404).to_string(), "HTTP status 404");
        assert_eq!(FetchError::Timeout.to_string(), "timed out");
    }

    #[tokio::test]
    async fn test_fetch_error_from_transport_failure_names_its_kind() {
        async fn fetch() -> Result<reqwest::Response, FetchError> {
            Ok(reqwest::get("http://127.0.0.1:9/robots.txt").await?)
        }
        let err = fetch().await.unwrap_err();
        assert!(matches!(err, FetchError::Http(_)));
        let message = err.to_string();
        assert!(
            message.starts_with("connection error: ") || message.starts_with("request error: "),
            "unexpected message: {message}"
        );
    }

    #[test]
    fn test_all_network_error_kinds_have_string_representation() {
        for kind in NetworkErrorKind::iter() {
            assert!(!kind.as_str().is_empty(), "{:?} should have non-empty string", kind);
        }
    }
}
