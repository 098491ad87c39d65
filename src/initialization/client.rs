//! HTTP client initialization.
//!
//! Three clients are built per analyzer: one for the page fetch (redirects disabled
//! so the chain can be recorded hop by hop), one for robots.txt and sitemap probes,
//! and one for link checks with a short redirect budget. The two probe clients vet
//! every redirect hop with the same host policy as the target URL.

use std::time::Duration;

use reqwest::redirect::{Attempt, Policy};
use reqwest::ClientBuilder;

use crate::config::{LINK_CHECK_MAX_REDIRECTS, MAX_REDIRECT_HOPS, TCP_CONNECT_TIMEOUT_SECS};
use crate::security::is_redirect_target_allowed;

fn base_builder(user_agent: &str, timeout: Duration) -> ClientBuilder {
    ClientBuilder::new()
        .timeout(timeout)
        .connect_timeout(Duration::from_secs(TCP_CONNECT_TIMEOUT_SECS))
        .user_agent(user_agent.to_string())
}

/// Redirect policy that stops on loops, on more than `max_hops` hops, and on any
/// hop whose target the host policy rejects.
fn guarded_redirects(max_hops: usize, allow_private_hosts: bool) -> Policy {
    Policy::custom(move |attempt: Attempt<'_>| {
        if attempt.previous().len() > max_hops {
            attempt.error(format!("more than {max_hops} redirects"))
        } else if attempt.previous().contains(attempt.url()) {
            let message = format!("redirect loop at {}", attempt.url());
            attempt.error(message)
        } else if !is_redirect_target_allowed(attempt.url(), allow_private_hosts) {
            let message = format!("redirect target not allowed: {}", attempt.url());
            attempt.error(message)
        } else {
            attempt.follow()
        }
    })
}

/// Initializes the client used for robots.txt and sitemap probes.
///
/// Follows up to `MAX_REDIRECT_HOPS` redirects, refusing private targets unless
/// `allow_private_hosts` is set.
///
/// # Errors
///
/// Returns a `reqwest::Error` if client creation fails.
pub fn init_client(
    user_agent: &str,
    timeout: Duration,
    allow_private_hosts: bool,
) -> Result<reqwest::Client, reqwest::Error> {
    base_builder(user_agent, timeout)
        .redirect(guarded_redirects(MAX_REDIRECT_HOPS, allow_private_hosts))
        .build()
}

/// Initializes the client used to fetch the page itself.
///
/// Redirects are disabled so each `Location` hop can be recorded in the snapshot's
/// redirect-chain table.
///
/// # Errors
///
/// Returns a `reqwest::Error` if client creation fails.
pub fn init_redirect_client(
    user_agent: &str,
    timeout: Duration,
) -> Result<reqwest::Client, reqwest::Error> {
    base_builder(user_agent, timeout)
        .redirect(Policy::none())
        .build()
}

/// Initializes the client used for link validation (at most
/// `LINK_CHECK_MAX_REDIRECTS` redirects, same host policy as the probes).
///
/// # Errors
///
/// Returns a `reqwest::Error` if client creation fails.
pub fn init_link_client(
    user_agent: &str,
    timeout: Duration,
    allow_private_hosts: bool,
) -> Result<reqwest::Client, reqwest::Error> {
    base_builder(user_agent, timeout)
        .redirect(guarded_redirects(LINK_CHECK_MAX_REDIRECTS, allow_private_hosts))
        .build()
}
