//! Technical rules: canonical, language, robots meta, hreflang, redirects, URL shape.

use std::collections::{BTreeMap, HashSet};

use url::Url;

use crate::config::{
    MAX_ACCEPTABLE_REDIRECT_CHAIN, MAX_DETAIL_ITEMS, MAX_RECOMMENDED_URL_LENGTH,
    ROBOTS_META_DIRECTIVES, TRACKING_PARAMETERS,
};
use crate::error_handling::RuleError;
use crate::model::Finding;
use crate::parse::HreflangTag;

use super::RuleContext;

pub const CANONICAL: &str = "canonical";
pub const LANGUAGE: &str = "language";
pub const ROBOTS_META: &str = "robots_meta";
pub const HREFLANG: &str = "hreflang";
pub const REDIRECT_CHAIN: &str = "redirect_chain";
pub const URL_STRUCTURE: &str = "url_structure";

/// Canonical tag: absent -> warn, same as the page -> pass, different -> warn.
///
/// Relative canonicals are resolved against the page URL before comparing.
pub fn check_canonical(canonical: Option<&str>, page_url: &str) -> Finding {
    let Some(canonical) = canonical.map(str::trim).filter(|c| !c.is_empty()) else {
        return Finding::warn(CANONICAL, "No canonical tag found");
    };
    if same_url(canonical, page_url) {
        Finding::pass(CANONICAL, "Canonical URL points to this page").with_text(canonical)
    } else {
        Finding::warn(CANONICAL, "Canonical URL points to a different page").with_text(canonical)
    }
}

fn same_url(canonical: &str, page_url: &str) -> bool {
    let Ok(page) = Url::parse(page_url) else {
        return canonical == page_url;
    };
    match page.join(canonical) {
        Ok(mut resolved) => {
            resolved.set_fragment(None);
            let mut page = page;
            page.set_fragment(None);
            resolved == page
        }
        Err(_) => false,
    }
}

/// `<html lang>`: present -> pass naming it, absent -> warn.
pub fn check_language(lang: Option<&str>) -> Finding {
    match lang {
        Some(lang) => Finding::pass(LANGUAGE, format!("Page declares language '{lang}'")),
        None => Finding::warn(LANGUAGE, "No lang attribute on the html element"),
    }
}

/// One finding per known robots meta directive: present -> warn, absent -> pass.
///
/// `none` is shorthand for `noindex, nofollow`.
pub fn check_robots_meta(content: Option<&str>) -> Vec<Finding> {
    let tokens: HashSet<String> = content
        .unwrap_or_default()
        .split(|c: char| c == ',' || c.is_whitespace())
        .map(|t| t.trim().to_ascii_lowercase())
        .filter(|t| !t.is_empty())
        .collect();
    let shorthand_none = tokens.contains("none");

    ROBOTS_META_DIRECTIVES
        .iter()
        .map(|&directive| {
            let present = tokens.contains(directive)
                || (shorthand_none && matches!(directive, "noindex" | "nofollow"));
            if present {
                Finding::warn(ROBOTS_META, format!("Page sets the '{directive}' directive"))
            } else {
                Finding::pass(ROBOTS_META, format!("No '{directive}' directive"))
            }
        })
        .collect()
}

/// Hreflang: none -> warn, duplicate languages -> fail, otherwise pass.
pub fn check_hreflang(tags: &[HreflangTag]) -> Finding {
    if tags.is_empty() {
        return Finding::warn(HREFLANG, "No hreflang tags found");
    }
    let mut seen = HashSet::new();
    let mut duplicates: Vec<String> = Vec::new();
    for tag in tags {
        let lang = tag.lang.to_ascii_lowercase();
        if !seen.insert(lang.clone()) && !duplicates.contains(&lang) {
            duplicates.push(lang);
        }
    }
    if duplicates.is_empty() {
        Finding::pass(
            HREFLANG,
            format!("{} hreflang tags with unique values", tags.len()),
        )
        .with_list(tags.iter().map(|t| t.lang.clone()))
    } else {
        Finding::fail(HREFLANG, "Duplicate hreflang values").with_list(duplicates)
    }
}

/// Classifies one redirect chain.
///
/// Length (in URLs) <= 1 -> pass, up to 3 -> info, longer -> warn. A chain that
/// revisits a URL additionally yields a `fail`, so a long loop produces both.
pub fn check_redirect_chain(chain: &[String]) -> Vec<Finding> {
    let mut findings = Vec::with_capacity(2);
    let length = chain.len();
    let start = chain.first().map(String::as_str).unwrap_or_default();

    if length <= 1 {
        findings.push(Finding::pass(REDIRECT_CHAIN, format!("No redirects for {start}")));
    } else if length <= MAX_ACCEPTABLE_REDIRECT_CHAIN {
        findings.push(
            Finding::info(
                REDIRECT_CHAIN,
                format!("{start} redirects through {length} URLs"),
            )
            .with_list(chain.iter().cloned()),
        );
    } else {
        findings.push(
            Finding::warn(
                REDIRECT_CHAIN,
                format!("Long redirect chain for {start} ({length} URLs)"),
            )
            .with_list(chain.iter().cloned()),
        );
    }

    let mut seen = HashSet::new();
    if let Some(repeated) = chain.iter().find(|url| !seen.insert(url.as_str())) {
        findings.push(
            Finding::fail(REDIRECT_CHAIN, format!("Redirect loop detected at {repeated}"))
                .with_list(chain.iter().cloned()),
        );
    }

    findings
}

/// Classifies every chain in the snapshot's redirect table.
pub fn check_redirect_chains(chains: &BTreeMap<String, Vec<String>>) -> Vec<Finding> {
    if chains.is_empty() {
        return vec![Finding::pass(REDIRECT_CHAIN, "No redirects recorded")];
    }
    chains
        .values()
        .flat_map(|chain| check_redirect_chain(chain))
        .collect()
}

/// URL hygiene: underscores in the path, overall length, tracking parameters.
///
/// # Errors
///
/// Returns `RuleError::MalformedInput` if the URL cannot be parsed.
pub fn check_url_structure(page_url: &str) -> Result<Finding, RuleError> {
    let url = Url::parse(page_url)
        .map_err(|e| RuleError::malformed(format!("cannot parse page URL '{page_url}': {e}")))?;

    let mut problems = Vec::new();
    if url.path().contains('_') {
        problems.push("Path contains underscores; prefer hyphens".to_string());
    }
    let length = page_url.chars().count();
    if length > MAX_RECOMMENDED_URL_LENGTH {
        problems.push(format!(
            "URL is {length} characters long (recommended at most {MAX_RECOMMENDED_URL_LENGTH})"
        ));
    }
    let tracking: Vec<String> = url
        .query_pairs()
        .map(|(key, _)| key.to_ascii_lowercase())
        .filter(|key| TRACKING_PARAMETERS.contains(&key.as_str()))
        .collect();
    if !tracking.is_empty() {
        problems.push(format!("Tracking parameters in URL: {}", tracking.join(", ")));
    }

    Ok(if problems.is_empty() {
        Finding::pass(URL_STRUCTURE, "URL structure is clean")
    } else {
        Finding::warn(
            URL_STRUCTURE,
            format!("{} URL structure issue(s)", problems.len()),
        )
        .with_list(problems.into_iter().take(MAX_DETAIL_ITEMS))
    })
}

pub(super) fn canonical_rule(ctx: &RuleContext<'_>) -> Result<Vec<Finding>, RuleError> {
    Ok(vec![check_canonical(ctx.document.canonical.as_deref(), ctx.target_url)])
}

pub(super) fn language_rule(ctx: &RuleContext<'_>) -> Result<Vec<Finding>, RuleError> {
    Ok(vec![check_language(ctx.document.lang.as_deref())])
}

pub(super) fn robots_meta_rule(ctx: &RuleContext<'_>) -> Result<Vec<Finding>, RuleError> {
    Ok(check_robots_meta(ctx.document.meta_content("robots")))
}

pub(super) fn hreflang_rule(ctx: &RuleContext<'_>) -> Result<Vec<Finding>, RuleError> {
    Ok(vec![check_hreflang(&ctx.document.hreflangs)])
}

pub(super) fn redirect_chain_rule(ctx: &RuleContext<'_>) -> Result<Vec<Finding>, RuleError> {
    Ok(check_redirect_chains(&ctx.snapshot.redirect_chains))
}

pub(super) fn url_structure_rule(ctx: &RuleContext<'_>) -> Result<Vec<Finding>, RuleError> {
    check_url_structure(ctx.target_url).map(|finding| vec![finding])
}
