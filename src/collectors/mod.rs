//! Page rendering and auxiliary crawl probes.
//!
//! The orchestrator depends only on the `PageRenderer` and `CrawlProbe` traits, so
//! the HTTP implementations here can be swapped for a browser-backed renderer or
//! for in-memory fakes in tests.

mod probe;
mod redirects;
mod renderer;

use std::future::Future;
use std::time::Duration;

use url::Url;

use crate::config::{DEFAULT_RENDER_TIMEOUT_SECS, DEFAULT_USER_AGENT, DEFAULT_VIEWPORT};
use crate::error_handling::{FetchError, RenderError};
use crate::model::{LinkCheck, PageLink, PageSnapshot, RobotsInfo, SitemapInfo};

pub use probe::HttpProbe;
pub use redirects::{resolve_redirect_chain, ResolvedPage};
pub use renderer::HttpRenderer;

/// Per-request render settings.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Upper bound for the whole load, redirects and retries included
    pub timeout: Duration,
    /// Viewport (width, height)
    pub viewport: (u32, u32),
    pub user_agent: String,
    /// Only honored by renderers that can capture one, and only when entitled
    pub capture_screenshot: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_RENDER_TIMEOUT_SECS),
            viewport: DEFAULT_VIEWPORT,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            capture_screenshot: false,
        }
    }
}

/// Loads a URL once and captures everything the rules need.
pub trait PageRenderer: Send + Sync {
    /// Renders `url`.
    ///
    /// Any error here is fatal for the analysis.
    fn render(
        &self,
        url: &Url,
        options: &RenderOptions,
    ) -> impl Future<Output = Result<PageSnapshot, RenderError>> + Send;
}

/// Secondary fetches gathered alongside the render.
///
/// Errors are degraded by the caller into unavailable markers.
pub trait CrawlProbe: Send + Sync {
    /// Fetches `robots.txt` at the origin of `origin`.
    fn fetch_robots(&self, origin: &Url)
        -> impl Future<Output = Result<RobotsInfo, FetchError>> + Send;

    /// Tries the conventional sitemap locations at the origin of `origin`.
    fn fetch_sitemap(
        &self,
        origin: &Url,
    ) -> impl Future<Output = Result<SitemapInfo, FetchError>> + Send;

    /// Checks at most `max_count` links, in page order.
    ///
    /// A failing link is a result (`reachable: false`), not an error; `Err` means
    /// the batch as a whole could not run.
    fn check_links(
        &self,
        links: &[PageLink],
        max_count: usize,
    ) -> impl Future<Output = Result<Vec<LinkCheck>, FetchError>> + Send;
}

/// Reads a response body, keeping at most `max_bytes`.
///
/// Invalid UTF-8 is replaced rather than rejected.
pub(crate) async fn read_body_capped(
    mut response: reqwest::Response,
    max_bytes: usize,
) -> Result<String, reqwest::Error> {
    let mut body: Vec<u8> = Vec::new();
    while let Some(chunk) = response.chunk().await? {
        let remaining = max_bytes.saturating_sub(body.len());
        if chunk.len() >= remaining {
            body.extend_from_slice(&chunk[..remaining]);
            log::debug!("Response body truncated at {} bytes", max_bytes);
            break;
        }
        body.extend_from_slice(&chunk);
    }
    Ok(String::from_utf8_lossy(&body).into_owned())
}

/// Declared `Content-Length`, read from the header so it also works for `HEAD`.
pub(crate) fn content_length(headers: &reqwest::header::HeaderMap) -> Option<u64> {
    headers
        .get(reqwest::header::CONTENT_LENGTH)?
        .to_str()
        .ok()?
        .trim()
        .parse()
        .ok()
}
