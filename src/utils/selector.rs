//! CSS selector parsing utilities.

use scraper::Selector;

/// Parses a CSS selector with a safe fallback.
///
/// If parsing fails, logs an error and returns a selector that matches nothing
/// (`*:not(*)`), so extraction degrades to "absent" instead of panicking.
///
/// `context` names the extraction site for the log line (e.g. "hreflang extraction").
pub fn parse_selector_with_fallback(selector_str: &str, context: &str) -> Selector {
    Selector::parse(selector_str).unwrap_or_else(|e| {
        log::error!(
            "Failed to parse CSS selector '{}' in {}: {}. Using fallback selector.",
            selector_str,
            context,
            e
        );
        match Selector::parse("*:not(*)") {
            Ok(selector) => selector,
            Err(_) => unreachable!("'*:not(*)' is a valid selector"),
        }
    })
}
