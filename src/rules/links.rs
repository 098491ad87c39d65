//! Outbound link validity.

use crate::error_handling::RuleError;
use crate::model::{Finding, LinkSkipReason, LinkValidation};

use super::RuleContext;

pub const LINK_VALIDATION: &str = "link_validation";

/// One finding per checked link; a skipped or failed batch yields a single warn.
pub fn check_links(validation: &LinkValidation) -> Vec<Finding> {
    match validation {
        LinkValidation::Checked { results } if results.is_empty() => {
            vec![Finding::warn(LINK_VALIDATION, "No links were checked")]
        }
        LinkValidation::Checked { results } => results
            .iter()
            .map(|check| {
                if check.reachable {
                    Finding::pass(
                        LINK_VALIDATION,
                        format!("Link reachable ({}): {}", check.status, check.href),
                    )
                } else {
                    let finding = Finding::fail(
                        LINK_VALIDATION,
                        match check.status {
                            0 => format!("Broken link (no response): {}", check.href),
                            status => format!("Broken link ({status}): {}", check.href),
                        },
                    );
                    match &check.error {
                        Some(error) => finding.with_text(error.clone()),
                        None => finding,
                    }
                }
            })
            .collect(),
        LinkValidation::Skipped { reason } => {
            let why = match reason {
                LinkSkipReason::NotEntitled => "link validation is not included in this plan",
                LinkSkipReason::NoLinks => "the page has no links",
                LinkSkipReason::CategorySkipped => "link validation was skipped for this run",
            };
            vec![Finding::warn(LINK_VALIDATION, "No links were checked").with_text(why)]
        }
        LinkValidation::Unavailable { reason } => vec![Finding::warn(
            LINK_VALIDATION,
            "No links were checked: link validation unavailable",
        )
        .with_text(reason.clone())],
    }
}

pub(super) fn link_validation_rule(ctx: &RuleContext<'_>) -> Result<Vec<Finding>, RuleError> {
    Ok(check_links(&ctx.aux.links))
}
