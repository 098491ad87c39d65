//! Target URL validation and SSRF protection.
//!
//! Every analysis starts here: the requested URL must be an absolute http(s) URL
//! with a host, of bounded length. Unless private targets are explicitly allowed,
//! loopback, private, link-local and multicast hosts are rejected so the engine
//! cannot be pointed at internal services. The same check is applied to every
//! redirect hop any client follows, and to link and image targets.

use std::net::{Ipv4Addr, Ipv6Addr};

use url::{Host, Url};

use crate::error_handling::AnalysisError;

/// Longest URL accepted for analysis.
pub const MAX_URL_LENGTH: usize = 2048;

/// Parses and validates a URL submitted for analysis.
///
/// # Errors
///
/// Returns `AnalysisError::InvalidUrl` with the reason when the URL is unparsable, too
/// long, uses a scheme other than http/https, has no host, or (with
/// `allow_private_hosts == false`) points at a private or local address.
///
/// # Examples
///
/// ```
/// use seo_audit::security::validate_target_url;
///
/// assert!(validate_target_url("https://example.com/page", false).is_ok());
/// assert!(validate_target_url("ftp://example.com", false).is_err());
/// assert!(validate_target_url("http://127.0.0.1:8080", false).is_err());
/// assert!(validate_target_url("http://127.0.0.1:8080", true).is_ok());
/// ```
pub fn validate_target_url(input: &str, allow_private_hosts: bool) -> Result<Url, AnalysisError> {
    let invalid = |reason: String| AnalysisError::InvalidUrl {
        url: input.to_string(),
        reason,
    };

    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(invalid("URL is empty".into()));
    }
    if trimmed.len() > MAX_URL_LENGTH {
        return Err(invalid(format!(
            "URL is longer than {MAX_URL_LENGTH} characters"
        )));
    }

    let url = Url::parse(trimmed).map_err(|e| invalid(format!("unparsable URL: {e}")))?;

    match url.scheme() {
        "http" | "https" => {}
        scheme => {
            return Err(invalid(format!(
                "unsupported scheme '{scheme}' (only http:// and https:// are allowed)"
            )))
        }
    }

    if url.host().is_none() {
        return Err(invalid("URL has no host".into()));
    }

    if !allow_private_hosts {
        if let Some(reason) = private_host_reason(&url) {
            return Err(invalid(reason));
        }
    }

    Ok(url)
}

/// Whether a redirect target is acceptable under the same host policy.
pub fn is_redirect_target_allowed(url: &Url, allow_private_hosts: bool) -> bool {
    matches!(url.scheme(), "http" | "https")
        && url.host().is_some()
        && (allow_private_hosts || private_host_reason(url).is_none())
}

fn private_host_reason(url: &Url) -> Option<String> {
    match url.host()? {
        Host::Domain(domain) if is_localhost_domain(domain) => {
            Some(format!("localhost domain '{domain}' is not allowed"))
        }
        Host::Domain(_) => None,
        Host::Ipv4(ip) if is_private_ipv4(ip) => {
            Some(format!("private IPv4 address '{ip}' is not allowed"))
        }
        Host::Ipv6(ip) if is_private_ipv6(ip) => {
            Some(format!("private IPv6 address '{ip}' is not allowed"))
        }
        Host::Ipv4(_) | Host::Ipv6(_) => None,
    }
}

/// Loopback, RFC 1918, link-local, "this network", multicast and reserved ranges.
fn is_private_ipv4(ip: Ipv4Addr) -> bool {
    ip.is_loopback()
        || ip.is_private()
        || ip.is_link_local()
        || ip.is_unspecified()
        || ip.octets()[0] == 0
        || ip.is_multicast()
        || ip.octets()[0] >= 240
}

/// Loopback, unique-local (fc00::/7), link-local (fe80::/10) and multicast.
fn is_private_ipv6(ip: Ipv6Addr) -> bool {
    if let Some(mapped) = ip.to_ipv4_mapped() {
        return is_private_ipv4(mapped);
    }
    let first = ip.segments()[0];
    ip.is_loopback()
        || ip.is_unspecified()
        || (first & 0xfe00) == 0xfc00
        || (first & 0xffc0) == 0xfe80
        || ip.is_multicast()
}

fn is_localhost_domain(domain: &str) -> bool {
    let domain = domain.trim_end_matches('.').to_ascii_lowercase();
    domain == "localhost" || domain == "localhost.localdomain" || domain.ends_with(".localhost")
}
