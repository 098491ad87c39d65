//! HTTP page renderer.
//!
//! Fetches the document over HTTP and builds a `PageSnapshot` from the response.
//! No script execution: the snapshot's HTML is the served HTML. Network resources
//! are the redirect hops, the document, and a `HEAD` lookup of the first images
//! the document references.

use std::collections::BTreeMap;
use std::time::{Duration, Instant};

use futures::stream::{self, StreamExt};
use reqwest::header::CONTENT_TYPE;
use url::Url;

use crate::config::{
    DEFAULT_PROBE_TIMEOUT_SECS, DEFAULT_RENDER_TIMEOUT_SECS, DEFAULT_USER_AGENT,
    IMAGE_FETCH_CONCURRENCY, MAX_IMAGE_RESOURCES, MAX_REDIRECT_HOPS, MAX_RESPONSE_BODY_SIZE,
    MAX_SNAPSHOT_RESOURCES,
};
use crate::error_handling::{InitializationError, RenderError};
use crate::initialization::{init_link_client, init_redirect_client};
use crate::model::{NetworkResource, PageSnapshot};
use crate::parse::{extract_links, PageDocument};
use crate::security::is_redirect_target_allowed;
use crate::utils::duration_to_ms;

use super::redirects::resolve_redirect_chain;
use super::{content_length, read_body_capped, PageRenderer, RenderOptions};

/// Renderer backed by a redirect-disabled `reqwest::Client` for the document and
/// a guarded one for image lookups.
#[derive(Debug, Clone)]
pub struct HttpRenderer {
    client: reqwest::Client,
    asset_client: reqwest::Client,
    allow_private_hosts: bool,
}

impl HttpRenderer {
    /// Builds the renderer and its HTTP client.
    ///
    /// # Errors
    ///
    /// Returns `InitializationError::HttpClientError` if the client cannot be built.
    pub fn new(allow_private_hosts: bool) -> Result<Self, InitializationError> {
        let client = init_redirect_client(
            DEFAULT_USER_AGENT,
            Duration::from_secs(DEFAULT_RENDER_TIMEOUT_SECS),
        )?;
        let asset_client = init_link_client(
            DEFAULT_USER_AGENT,
            Duration::from_secs(DEFAULT_PROBE_TIMEOUT_SECS),
            allow_private_hosts,
        )?;
        Ok(Self {
            client,
            asset_client,
            allow_private_hosts,
        })
    }

    async fn load(&self, url: &Url, options: &RenderOptions) -> Result<PageSnapshot, RenderError> {
        let started = Instant::now();
        let resolved = resolve_redirect_chain(
            &self.client,
            url,
            &options.user_agent,
            MAX_REDIRECT_HOPS,
            self.allow_private_hosts,
        )
        .await?;

        let status = resolved.response.status().as_u16();
        if status >= 400 {
            log::warn!("{} answered HTTP {}; analysing the error page", resolved.final_url, status);
        }

        if resolved.looped {
            log::warn!("Stopped following redirects for {} at a loop; analysing the last response", url);
        }

        let response_headers = collect_headers(resolved.response.headers());
        let content_type = response_headers.get(CONTENT_TYPE.as_str()).cloned();
        let declared_size = content_length(resolved.response.headers());
        let final_url = resolved.final_url;

        let html = read_body_capped(resolved.response, MAX_RESPONSE_BODY_SIZE)
            .await
            .map_err(|e| RenderError::Navigation {
                url: final_url.to_string(),
                reason: format!("failed to read body: {e}"),
            })?;
        let load_time_ms = duration_to_ms(started.elapsed());

        let document = PageDocument::parse(&html);
        let image_urls = image_urls(&document, &final_url, self.allow_private_hosts);
        let title = document.title;
        let links = extract_links(&html, &final_url);

        let mut resources = resolved.hops;
        resources.push(NetworkResource {
            url: final_url.to_string(),
            status,
            content_type,
            size: declared_size.or(Some(html.len() as u64)),
        });

        // Image lookups get at most half of what is left of the render budget
        let budget = options.timeout.saturating_sub(started.elapsed()) / 2;
        match tokio::time::timeout(budget, self.fetch_images(image_urls)).await {
            Ok(images) => resources.extend(images),
            Err(_) => log::debug!("Image lookups for {} cut off after {:?}", final_url, budget),
        }
        resources.truncate(MAX_SNAPSHOT_RESOURCES);

        let mut redirect_chains = BTreeMap::new();
        redirect_chains.insert(url.to_string(), resolved.chain);

        if options.capture_screenshot {
            log::debug!("Screenshot requested for {} but the HTTP renderer cannot capture one", url);
        }

        Ok(PageSnapshot {
            requested_url: url.to_string(),
            final_url: final_url.to_string(),
            html,
            title,
            links,
            resources,
            redirect_chains,
            response_headers,
            load_time_ms,
            screenshot: None,
        })
    }
}

impl HttpRenderer {
    async fn fetch_images(&self, urls: Vec<Url>) -> Vec<NetworkResource> {
        let lookups: Vec<_> = urls
            .into_iter()
            .map(|url| image_resource(self.asset_client.clone(), url))
            .collect();
        stream::iter(lookups)
            .buffered(IMAGE_FETCH_CONCURRENCY)
            .filter_map(|resource| async move { resource })
            .collect()
            .await
    }
}

/// Absolute http(s) image URLs in document order, deduplicated and capped.
fn image_urls(document: &PageDocument, base: &Url, allow_private_hosts: bool) -> Vec<Url> {
    let mut urls: Vec<Url> = Vec::new();
    for image in &document.images {
        let Ok(url) = base.join(image.src.trim()) else {
            continue;
        };
        if image.src.trim().is_empty()
            || !is_redirect_target_allowed(&url, allow_private_hosts)
            || urls.contains(&url)
        {
            continue;
        }
        urls.push(url);
        if urls.len() == MAX_IMAGE_RESOURCES {
            break;
        }
    }
    urls
}

/// `HEAD` one image; a failed lookup is left out of the snapshot.
async fn image_resource(client: reqwest::Client, url: Url) -> Option<NetworkResource> {
    match client.head(url.clone()).send().await {
        Ok(response) => Some(NetworkResource {
            url: url.to_string(),
            status: response.status().as_u16(),
            content_type: response
                .headers()
                .get(CONTENT_TYPE)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string),
            size: content_length(response.headers()),
        }),
        Err(e) => {
            log::debug!("Image lookup failed for {}: {}", url, e);
            None
        }
    }
}

/// Lowercase header name -> value; repeated headers are joined with ", ".
fn collect_headers(headers: &reqwest::header::HeaderMap) -> BTreeMap<String, String> {
    let mut collected: BTreeMap<String, String> = BTreeMap::new();
    for (name, value) in headers {
        let Ok(value) = value.to_str() else {
            continue;
        };
        collected
            .entry(name.as_str().to_ascii_lowercase())
            .and_modify(|existing| {
                existing.push_str(", ");
                existing.push_str(value);
            })
            .or_insert_with(|| value.to_string());
    }
    collected
}

impl PageRenderer for HttpRenderer {
    async fn render(&self, url: &Url, options: &RenderOptions) -> Result<PageSnapshot, RenderError> {
        log::debug!("Rendering {} (viewport {:?})", url, options.viewport);
        match tokio::time::timeout(options.timeout, self.load(url, options)).await {
            Ok(result) => result,
            Err(_) => Err(RenderError::Timeout {
                url: url.to_string(),
                seconds: options.timeout.as_secs(),
            }),
        }
    }
}
