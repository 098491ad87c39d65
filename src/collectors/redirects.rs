//! Page fetch with manual redirect tracking.
//!
//! The page client has redirects disabled so every hop can be recorded: the
//! snapshot's redirect-chain table and resource list are built from what happens
//! here.

use reqwest::header::{HeaderValue, ACCEPT, ACCEPT_LANGUAGE, CONTENT_TYPE, LOCATION, USER_AGENT};
use tokio_retry::RetryIf;
use url::Url;

use crate::error_handling::{categorize_reqwest_error, get_retry_strategy, is_retriable, RenderError};
use crate::model::NetworkResource;
use crate::security::is_redirect_target_allowed;

use super::content_length;

const PAGE_ACCEPT: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8";
const PAGE_ACCEPT_LANGUAGE: &str = "en-US,en;q=0.9";

/// Final response of a page load plus the path taken to reach it.
#[derive(Debug)]
pub struct ResolvedPage {
    pub response: reqwest::Response,
    pub final_url: Url,
    /// Every URL requested, starting with the original and ending with `final_url`
    pub chain: Vec<String>,
    /// One entry per redirect hop (the final document is not included)
    pub hops: Vec<NetworkResource>,
    /// Following stopped because a hop pointed back into the chain; `response`
    /// is then the redirect that closed the loop and the repeated URL ends `chain`
    pub looped: bool,
}

/// Sends one page request, retrying transient failures with the shared backoff.
async fn send_page_request(
    client: &reqwest::Client,
    url: &Url,
    user_agent: &str,
) -> Result<reqwest::Response, reqwest::Error> {
    RetryIf::start(
        get_retry_strategy(),
        || {
            let mut request = client
                .get(url.clone())
                .header(ACCEPT, PAGE_ACCEPT)
                .header(ACCEPT_LANGUAGE, PAGE_ACCEPT_LANGUAGE);
            if let Ok(ua) = HeaderValue::from_str(user_agent) {
                request = request.header(USER_AGENT, ua);
            }
            async move {
                let response = request.send().await?;
                // Surface 429/5xx as errors so they go through the retry condition
                match response.status().as_u16() {
                    429 | 500..=599 => response.error_for_status(),
                    _ => Ok(response),
                }
            }
        },
        is_retriable,
    )
    .await
}

/// Follows `Location` headers from `start_url` for at most `max_hops` redirects.
///
/// # Errors
///
/// Returns `RenderError::Navigation` when a request fails, a redirect has no
/// usable `Location`, a hop targets a disallowed host, or the hop budget is
/// exhausted. A loop is not an error: see `ResolvedPage::looped`.
pub async fn resolve_redirect_chain(
    client: &reqwest::Client,
    start_url: &Url,
    user_agent: &str,
    max_hops: usize,
    allow_private_hosts: bool,
) -> Result<ResolvedPage, RenderError> {
    let navigation = |url: &Url, reason: String| RenderError::Navigation {
        url: url.to_string(),
        reason,
    };

    let mut chain: Vec<String> = Vec::new();
    let mut hops: Vec<NetworkResource> = Vec::new();
    let mut current = start_url.clone();

    loop {
        chain.push(current.to_string());
        let response = send_page_request(client, &current, user_agent)
            .await
            .map_err(|e| {
                let reason = match e.status() {
                    Some(status) => format!("{} (HTTP {})", categorize_reqwest_error(&e), status.as_u16()),
                    None => format!("{}: {}", categorize_reqwest_error(&e), e),
                };
                navigation(&current, reason)
            })?;

        let status = response.status().as_u16();
        if !matches!(status, 301 | 302 | 303 | 307 | 308) {
            return Ok(ResolvedPage {
                response,
                final_url: current,
                chain,
                hops,
                looped: false,
            });
        }

        let Some(location) = response
            .headers()
            .get(LOCATION)
            .and_then(|value| value.to_str().ok())
        else {
            log::warn!("Redirect status {} for {} but no Location header", status, current);
            return Err(navigation(
                &current,
                format!("redirect status {status} without a Location header"),
            ));
        };

        let next = current
            .join(location)
            .map_err(|e| navigation(&current, format!("invalid redirect target '{location}': {e}")))?;

        if !is_redirect_target_allowed(&next, allow_private_hosts) {
            return Err(navigation(
                &current,
                format!("redirect to disallowed target {next}"),
            ));
        }
        if chain.iter().any(|seen| seen == next.as_str()) {
            log::warn!("Redirect loop for {}: {} points back to {}", start_url, current, next);
            chain.push(next.to_string());
            return Ok(ResolvedPage {
                response,
                final_url: current,
                chain,
                hops,
                looped: true,
            });
        }

        hops.push(NetworkResource {
            url: current.to_string(),
            status,
            content_type: response
                .headers()
                .get(CONTENT_TYPE)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string),
            size: content_length(response.headers()),
        });
        if hops.len() > max_hops {
            return Err(navigation(
                start_url,
                format!("too many redirects (more than {max_hops})"),
            ));
        }

        log::debug!("Following redirect {} -> {}", current, next);
        current = next;
    }
}
