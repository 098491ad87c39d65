//! Rule registration and the evaluation boundary.

use std::any::Any;
use std::collections::BTreeMap;
use std::panic::{self, AssertUnwindSafe};

use strum::IntoEnumIterator;

use crate::model::{CategoryId, Finding};

use super::{
    content, crawlability, links, mobile, performance, security, structured_data, technical,
    Rule, RuleContext,
};

/// Every rule, in registration order. Within a category, findings appear in
/// this order.
pub static RULES: &[Rule] = &[
    // Content
    Rule::new(content::TITLE, CategoryId::Content, content::title_rule),
    Rule::new(content::META_DESCRIPTION, CategoryId::Content, content::meta_description_rule),
    Rule::new(content::H1, CategoryId::Content, content::h1_rule),
    Rule::new(content::HEADING_HIERARCHY, CategoryId::Content, content::heading_hierarchy_rule),
    Rule::new(content::CONTENT_LENGTH, CategoryId::Content, content::content_length_rule),
    Rule::new(content::IMAGE_ALT, CategoryId::Content, content::image_alt_rule),
    // Technical
    Rule::new(technical::CANONICAL, CategoryId::Technical, technical::canonical_rule),
    Rule::new(technical::LANGUAGE, CategoryId::Technical, technical::language_rule),
    Rule::new(technical::ROBOTS_META, CategoryId::Technical, technical::robots_meta_rule),
    Rule::new(technical::HREFLANG, CategoryId::Technical, technical::hreflang_rule),
    Rule::new(technical::REDIRECT_CHAIN, CategoryId::Technical, technical::redirect_chain_rule),
    Rule::new(technical::URL_STRUCTURE, CategoryId::Technical, technical::url_structure_rule),
    // Structured data
    Rule::new(
        structured_data::STRUCTURED_DATA,
        CategoryId::StructuredData,
        structured_data::structured_data_rule,
    ),
    // Security
    Rule::new(security::HTTPS, CategoryId::Security, security::https_rule),
    Rule::new(security::MIXED_CONTENT, CategoryId::Security, security::mixed_content_rule),
    Rule::new(security::SECURITY_HEADERS, CategoryId::Security, security::security_headers_rule),
    // Mobile
    Rule::new(mobile::VIEWPORT, CategoryId::Mobile, mobile::viewport_rule),
    // Links
    Rule::new(links::LINK_VALIDATION, CategoryId::Links, links::link_validation_rule),
    // Crawlability
    Rule::new(crawlability::ROBOTS_TXT, CategoryId::Crawlability, crawlability::robots_txt_rule),
    Rule::new(crawlability::SITEMAP, CategoryId::Crawlability, crawlability::sitemap_rule),
    // Performance
    Rule::new(performance::LOAD_TIME, CategoryId::Performance, performance::load_time_rule),
    Rule::new(
        performance::PERFORMANCE_ESTIMATE,
        CategoryId::Performance,
        performance::performance_estimate_rule,
    ),
    Rule::new(
        performance::FAILED_RESOURCES,
        CategoryId::Performance,
        performance::failed_resources_rule,
    ),
    Rule::new(performance::IMAGE_SIZES, CategoryId::Performance, performance::image_sizes_rule),
];

/// Runs one rule behind the isolation boundary.
///
/// A returned `RuleError` or a panic becomes a single `fail` finding named after
/// the rule; nothing escapes to the caller.
pub fn evaluate_rule(rule: &Rule, ctx: &RuleContext<'_>) -> Vec<Finding> {
    match panic::catch_unwind(AssertUnwindSafe(|| (rule.check)(ctx))) {
        Ok(Ok(findings)) => findings,
        Ok(Err(err)) => {
            log::error!("Rule '{}' failed for {}: {}", rule.name, ctx.target_url, err);
            vec![Finding::fail(rule.name, format!("Rule '{}' could not be evaluated", rule.name))
                .with_text(err.to_string())]
        }
        Err(payload) => {
            let reason = panic_message(payload.as_ref());
            log::error!("Rule '{}' panicked for {}: {}", rule.name, ctx.target_url, reason);
            vec![Finding::fail(rule.name, format!("Rule '{}' could not be evaluated", rule.name))
                .with_text(reason)]
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

/// Evaluates `rules` and groups their findings by category.
///
/// Every category not in `skip` gets an entry, even when its rules produced
/// nothing; skipped categories get none and their rules are not run.
pub fn evaluate_rules(
    rules: &[Rule],
    ctx: &RuleContext<'_>,
    skip: &[CategoryId],
) -> BTreeMap<CategoryId, Vec<Finding>> {
    let mut grouped: BTreeMap<CategoryId, Vec<Finding>> = CategoryId::iter()
        .filter(|id| !skip.contains(id))
        .map(|id| (id, Vec::new()))
        .collect();

    for rule in rules {
        if let Some(findings) = grouped.get_mut(&rule.category) {
            findings.extend(evaluate_rule(rule, ctx));
        }
    }

    grouped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error_handling::RuleError;
    use crate::model::{AuxData, PageSnapshot, Plan, Status};
    use crate::parse::PageDocument;
    use std::collections::HashSet;

    fn broken_rule(_: &RuleContext<'_>) -> Result<Vec<Finding>, RuleError> {
        Err(RuleError::malformed("unexpected payload"))
    }

    fn panicking_rule(_: &RuleContext<'_>) -> Result<Vec<Finding>, RuleError> {
        panic!("index out of bounds")
    }

    fn ok_rule(_: &RuleContext<'_>) -> Result<Vec<Finding>, RuleError> {
        Ok(vec![Finding::pass("ok_rule", "fine")])
    }

    fn with_context<T>(f: impl FnOnce(&RuleContext<'_>) -> T) -> T {
        let document = PageDocument::default();
        let snapshot = PageSnapshot::default();
        let aux = AuxData::default();
        let ctx = RuleContext {
            document: &document,
            snapshot: &snapshot,
            aux: &aux,
            target_url: "https://example.com/",
            plan: Plan::Free,
            robots_agent: "SEOChecker",
        };
        f(&ctx)
    }

    #[test]
    fn test_every_category_has_at_least_one_rule() {
        let covered: HashSet<CategoryId> = RULES.iter().map(|r| r.category).collect();
        for id in CategoryId::iter() {
            assert!(covered.contains(&id), "{:?} has no registered rule", id);
        }
    }

    #[test]
    fn test_rule_names_are_unique() {
        let names: HashSet<&str> = RULES.iter().map(|r| r.name).collect();
        assert_eq!(names.len(), RULES.len());
    }

    #[test]
    fn test_rule_error_becomes_single_fail() {
        let rule = Rule::new("broken", CategoryId::Content, broken_rule);
        let findings = with_context(|ctx| evaluate_rule(&rule, ctx));
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].status, Status::Fail);
        assert_eq!(findings[0].rule, "broken");
    }

    #[test]
    fn test_panicking_rule_does_not_abort_the_rest() {
        let rules = [
            Rule::new("panics", CategoryId::Technical, panicking_rule),
            Rule::new("ok_rule", CategoryId::Technical, ok_rule),
        ];
        let grouped = with_context(|ctx| evaluate_rules(&rules, ctx, &[]));
        let technical = &grouped[&CategoryId::Technical];
        assert_eq!(technical.len(), 2);
        assert_eq!(technical[0].status, Status::Fail);
        assert_eq!(technical[0].rule, "panics");
        assert_eq!(technical[1].status, Status::Pass);
    }

    #[test]
    fn test_skipped_categories_are_absent_and_empty_ones_present() {
        let rules = [Rule::new("ok_rule", CategoryId::Content, ok_rule)];
        let grouped = with_context(|ctx| {
            evaluate_rules(&rules, ctx, &[CategoryId::Performance, CategoryId::Links])
        });
        assert!(!grouped.contains_key(&CategoryId::Performance));
        assert!(!grouped.contains_key(&CategoryId::Links));
        assert_eq!(grouped[&CategoryId::Content].len(), 1);
        assert!(grouped[&CategoryId::Mobile].is_empty());
        assert_eq!(grouped.len(), CategoryId::iter().count() - 2);
    }

    #[test]
    fn test_full_registry_runs_on_an_empty_page() {
        let grouped = with_context(|ctx| evaluate_rules(RULES, ctx, &[]));
        for (id, findings) in &grouped {
            assert!(!findings.is_empty(), "{:?} produced no findings", id);
            assert!(
                findings.iter().all(|f| !f.message.contains("could not be evaluated")),
                "{:?} had a rule failure",
                id
            );
        }
    }
}
