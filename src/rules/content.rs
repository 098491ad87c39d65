//! Content rules: title, description, headings, body copy, images.

use serde_json::json;

use crate::config::{
    CONTENT_WORDS_PASS, CONTENT_WORDS_WARN, DESCRIPTION_MAX_LENGTH, DESCRIPTION_MIN_LENGTH,
    MAX_DETAIL_ITEMS, TITLE_MAX_LENGTH, TITLE_MIN_LENGTH,
};
use crate::error_handling::RuleError;
use crate::model::Finding;
use crate::parse::ImageTag;

use super::RuleContext;

pub const TITLE: &str = "title";
pub const META_DESCRIPTION: &str = "meta_description";
pub const H1: &str = "h1";
pub const HEADING_HIERARCHY: &str = "heading_hierarchy";
pub const CONTENT_LENGTH: &str = "content_length";
pub const IMAGE_ALT: &str = "image_alt";

/// Title length: missing -> fail, outside 30-60 chars -> warn, else pass.
pub fn check_title(title: Option<&str>) -> Finding {
    let Some(title) = title.map(str::trim).filter(|t| !t.is_empty()) else {
        return Finding::fail(TITLE, "No title tag found");
    };
    let length = title.chars().count();
    if length < TITLE_MIN_LENGTH {
        Finding::warn(
            TITLE,
            format!("Title is too short ({length} characters, recommended {TITLE_MIN_LENGTH}-{TITLE_MAX_LENGTH})"),
        )
        .with_text(title)
    } else if length > TITLE_MAX_LENGTH {
        Finding::warn(
            TITLE,
            format!("Title is too long ({length} characters, recommended {TITLE_MIN_LENGTH}-{TITLE_MAX_LENGTH})"),
        )
        .with_text(title)
    } else {
        Finding::pass(TITLE, format!("Title length is good ({length} characters)")).with_text(title)
    }
}

/// Meta description length: missing -> fail, outside 120-160 chars -> warn, else pass.
pub fn check_meta_description(description: Option<&str>) -> Finding {
    let Some(description) = description.map(str::trim).filter(|d| !d.is_empty()) else {
        return Finding::fail(META_DESCRIPTION, "No meta description found");
    };
    let length = description.chars().count();
    let finding = if length < DESCRIPTION_MIN_LENGTH {
        Finding::warn(
            META_DESCRIPTION,
            format!("Meta description is too short ({length} characters)"),
        )
    } else if length > DESCRIPTION_MAX_LENGTH {
        Finding::warn(
            META_DESCRIPTION,
            format!("Meta description is too long ({length} characters)"),
        )
    } else {
        Finding::pass(
            META_DESCRIPTION,
            format!("Meta description length is good ({length} characters)"),
        )
    };
    finding.with_text(description)
}

/// H1 count: none -> fail, several -> warn listing them, exactly one -> pass.
pub fn check_h1(h1s: &[String]) -> Finding {
    match h1s {
        [] => Finding::fail(H1, "No H1 tag found"),
        [only] => Finding::pass(H1, "Page has exactly one H1 tag").with_text(only.clone()),
        many => Finding::warn(H1, format!("Page has {} H1 tags", many.len()))
            .with_list(many.iter().cloned()),
    }
}

/// Flags heading levels that are skipped (an `hN+1` present without any `hN`).
pub fn check_heading_hierarchy(counts: [usize; 6]) -> Finding {
    let gaps: Vec<String> = (0..5)
        .filter(|&i| counts[i] == 0 && counts[i + 1] > 0)
        .map(|i| format!("h{} used without h{}", i + 2, i + 1))
        .collect();
    let details = json!({
        "h1": counts[0], "h2": counts[1], "h3": counts[2],
        "h4": counts[3], "h5": counts[4], "h6": counts[5],
        "gaps": &gaps,
    });
    if gaps.is_empty() {
        Finding::pass(HEADING_HIERARCHY, "Heading levels are used in order").with_data(details)
    } else {
        Finding::warn(
            HEADING_HIERARCHY,
            format!("Heading hierarchy skips {} level(s)", gaps.len()),
        )
        .with_data(details)
    }
}

/// Body copy length by word count.
pub fn check_content_length(word_count: usize) -> Finding {
    if word_count > CONTENT_WORDS_PASS {
        Finding::pass(CONTENT_LENGTH, format!("Page has {word_count} words of content"))
    } else if word_count > CONTENT_WORDS_WARN {
        Finding::warn(
            CONTENT_LENGTH,
            format!("Thin content: {word_count} words (recommended more than {CONTENT_WORDS_PASS})"),
        )
    } else {
        Finding::fail(
            CONTENT_LENGTH,
            format!("Very little content: {word_count} words"),
        )
    }
}

/// Every image should carry a non-blank `alt`.
pub fn check_image_alt(images: &[ImageTag]) -> Finding {
    if images.is_empty() {
        return Finding::pass(IMAGE_ALT, "No images found");
    }
    let missing: Vec<&ImageTag> = images
        .iter()
        .filter(|img| img.alt.as_deref().map_or(true, |alt| alt.trim().is_empty()))
        .collect();
    if missing.is_empty() {
        Finding::pass(
            IMAGE_ALT,
            format!("All {} images have alt text", images.len()),
        )
    } else {
        Finding::warn(
            IMAGE_ALT,
            format!("{} of {} images are missing alt text", missing.len(), images.len()),
        )
        .with_list(
            missing
                .iter()
                .take(MAX_DETAIL_ITEMS)
                .map(|img| img.src.clone()),
        )
    }
}

pub(super) fn title_rule(ctx: &RuleContext<'_>) -> Result<Vec<Finding>, RuleError> {
    let title = ctx
        .snapshot
        .title
        .as_deref()
        .filter(|t| !t.trim().is_empty())
        .or(ctx.document.title.as_deref());
    Ok(vec![check_title(title)])
}

pub(super) fn meta_description_rule(ctx: &RuleContext<'_>) -> Result<Vec<Finding>, RuleError> {
    Ok(vec![check_meta_description(ctx.document.meta_content("description"))])
}

pub(super) fn h1_rule(ctx: &RuleContext<'_>) -> Result<Vec<Finding>, RuleError> {
    Ok(vec![check_h1(ctx.document.headings(1))])
}

pub(super) fn heading_hierarchy_rule(ctx: &RuleContext<'_>) -> Result<Vec<Finding>, RuleError> {
    let counts = std::array::from_fn(|i| ctx.document.headings(i + 1).len());
    Ok(vec![check_heading_hierarchy(counts)])
}

pub(super) fn content_length_rule(ctx: &RuleContext<'_>) -> Result<Vec<Finding>, RuleError> {
    Ok(vec![check_content_length(ctx.document.word_count)])
}

pub(super) fn image_alt_rule(ctx: &RuleContext<'_>) -> Result<Vec<Finding>, RuleError> {
    Ok(vec![check_image_alt(&ctx.document.images)])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Details, Status};

    #[test]
    fn test_title_boundaries() {
        assert_eq!(check_title(Some("")).status, Status::Fail);
        assert_eq!(check_title(None).status, Status::Fail);
        assert_eq!(check_title(Some(&"x".repeat(29))).status, Status::Warn);
        assert_eq!(check_title(Some(&"x".repeat(30))).status, Status::Pass);
        assert_eq!(check_title(Some(&"x".repeat(60))).status, Status::Pass);
        assert_eq!(check_title(Some(&"x".repeat(61))).status, Status::Warn);
    }

    #[test]
    fn test_title_whitespace_only_is_missing() {
        assert_eq!(check_title(Some("   ")).status, Status::Fail);
    }

    #[test]
    fn test_title_counts_characters_not_bytes() {
        // 30 two-byte characters
        assert_eq!(check_title(Some(&"é".repeat(30))).status, Status::Pass);
    }

    #[test]
    fn test_warn_reports_measured_length() {
        let finding = check_title(Some("Short"));
        assert!(finding.message.contains("5 characters"));
    }

    #[test]
    fn test_meta_description_boundaries() {
        assert_eq!(check_meta_description(None).status, Status::Fail);
        assert_eq!(check_meta_description(Some(&"d".repeat(119))).status, Status::Warn);
        assert_eq!(check_meta_description(Some(&"d".repeat(120))).status, Status::Pass);
        assert_eq!(check_meta_description(Some(&"d".repeat(160))).status, Status::Pass);
        assert_eq!(check_meta_description(Some(&"d".repeat(161))).status, Status::Warn);
    }

    #[test]
    fn test_h1_counts() {
        assert_eq!(check_h1(&[]).status, Status::Fail);
        let one = check_h1(&["Welcome".to_string()]);
        assert_eq!(one.status, Status::Pass);
        assert_eq!(one.details, Some(Details::Text("Welcome".into())));
        let two = check_h1(&["A".to_string(), "B".to_string()]);
        assert_eq!(two.status, Status::Warn);
        assert_eq!(two.details, Some(Details::List(vec!["A".into(), "B".into()])));
    }

    #[test]
    fn test_heading_hierarchy_gap() {
        assert_eq!(check_heading_hierarchy([1, 2, 0, 0, 0, 0]).status, Status::Pass);
        assert_eq!(check_heading_hierarchy([0; 6]).status, Status::Pass);
        let gap = check_heading_hierarchy([1, 0, 3, 0, 0, 0]);
        assert_eq!(gap.status, Status::Warn);
        assert!(gap.message.contains("1 level"));
    }

    #[test]
    fn test_content_length_bands() {
        assert_eq!(check_content_length(301).status, Status::Pass);
        assert_eq!(check_content_length(300).status, Status::Warn);
        assert_eq!(check_content_length(151).status, Status::Warn);
        assert_eq!(check_content_length(150).status, Status::Fail);
        assert_eq!(check_content_length(0).status, Status::Fail);
    }

    #[test]
    fn test_image_alt_lists_at_most_ten() {
        let images: Vec<ImageTag> = (0..15)
            .map(|i| ImageTag {
                src: format!("/img/{i}.png"),
                alt: if i == 0 { Some("ok".into()) } else { Some("  ".into()) },
            })
            .collect();
        let finding = check_image_alt(&images);
        assert_eq!(finding.status, Status::Warn);
        assert!(finding.message.starts_with("14 of 15"));
        match finding.details {
            Some(Details::List(items)) => assert_eq!(items.len(), 10),
            other => panic!("expected list details, got {:?}", other),
        }
        assert_eq!(check_image_alt(&[]).status, Status::Pass);
    }
}
