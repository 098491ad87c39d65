//! Security rules: HTTPS, mixed content, response headers.

use std::collections::BTreeMap;

use crate::config::{MAX_DETAIL_ITEMS, REQUIRED_SECURITY_HEADERS};
use crate::error_handling::RuleError;
use crate::model::Finding;
use crate::parse::InsecureElement;

use super::RuleContext;

pub const HTTPS: &str = "https";
pub const MIXED_CONTENT: &str = "mixed_content";
pub const SECURITY_HEADERS: &str = "security_headers";

pub fn check_https(is_https: bool) -> Finding {
    if is_https {
        Finding::pass(HTTPS, "Page is served over HTTPS")
    } else {
        Finding::fail(HTTPS, "Page is not served over HTTPS")
    }
}

/// `http://` sub-resources on an https page fail, listing at most 10 of them.
/// On a plain-http page the check does not apply and yields `info`.
pub fn check_mixed_content(is_https: bool, insecure: &[InsecureElement]) -> Finding {
    if !is_https {
        return Finding::info(
            MIXED_CONTENT,
            "Mixed content check not applicable: page is not served over HTTPS",
        );
    }
    if insecure.is_empty() {
        return Finding::pass(MIXED_CONTENT, "No mixed content found");
    }
    Finding::fail(
        MIXED_CONTENT,
        format!("{} insecure (http://) resources on an HTTPS page", insecure.len()),
    )
    .with_list(
        insecure
            .iter()
            .take(MAX_DETAIL_ITEMS)
            .map(|el| format!("<{}> {}", el.tag, el.url)),
    )
}

/// Checks the document response for HSTS, X-Content-Type-Options and X-Frame-Options.
///
/// `headers` must use lowercase names. An empty map means the renderer captured
/// nothing, which is reported as `info` rather than blamed on the site.
pub fn check_security_headers(headers: &BTreeMap<String, String>) -> Finding {
    if headers.is_empty() {
        return Finding::info(SECURITY_HEADERS, "No response headers were captured");
    }
    let missing: Vec<&str> = REQUIRED_SECURITY_HEADERS
        .iter()
        .copied()
        .filter(|name| !headers.contains_key(*name))
        .collect();
    if missing.is_empty() {
        Finding::pass(SECURITY_HEADERS, "Recommended security headers are present")
    } else {
        Finding::warn(
            SECURITY_HEADERS,
            format!("Missing {} recommended security header(s)", missing.len()),
        )
        .with_list(missing)
    }
}

pub(super) fn https_rule(ctx: &RuleContext<'_>) -> Result<Vec<Finding>, RuleError> {
    Ok(vec![check_https(ctx.snapshot.is_https())])
}

pub(super) fn mixed_content_rule(ctx: &RuleContext<'_>) -> Result<Vec<Finding>, RuleError> {
    Ok(vec![check_mixed_content(
        ctx.snapshot.is_https(),
        &ctx.document.insecure_elements,
    )])
}

pub(super) fn security_headers_rule(ctx: &RuleContext<'_>) -> Result<Vec<Finding>, RuleError> {
    Ok(vec![check_security_headers(&ctx.snapshot.response_headers)])
}
