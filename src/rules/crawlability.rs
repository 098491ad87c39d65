//! Crawlability: robots.txt and sitemap.
//!
//! Absence of either file is a `fail` here (unlike canonical or hreflang, where
//! absence is a `warn`): a crawler relies on both to discover and scope the site.

use crate::error_handling::RuleError;
use crate::model::{Availability, Finding, RobotsInfo, SitemapInfo};

use super::RuleContext;

pub const ROBOTS_TXT: &str = "robots_txt";
pub const ROBOTS_ACCESS: &str = "robots_access";
pub const SITEMAP: &str = "sitemap";

pub fn check_robots_presence(robots: &Availability<RobotsInfo>) -> Finding {
    match robots {
        Availability::Available(info) => {
            let finding = Finding::pass(ROBOTS_TXT, format!("robots.txt found at {}", info.url));
            if info.sitemaps.is_empty() {
                finding
            } else {
                finding.with_list(info.sitemaps.iter().cloned())
            }
        }
        Availability::Unavailable { reason } => {
            Finding::fail(ROBOTS_TXT, "robots.txt unavailable").with_text(reason.clone())
        }
    }
}

/// Whether robots.txt lets `agent` crawl the page. Nothing to say when robots.txt
/// itself is unavailable; the presence rule already reports that.
pub fn check_robots_access(
    robots: &Availability<RobotsInfo>,
    page_url: &str,
    agent: &str,
) -> Vec<Finding> {
    let Some(info) = robots.as_available() else {
        return Vec::new();
    };
    if info.can_crawl(page_url, agent) {
        vec![Finding::pass(
            ROBOTS_ACCESS,
            format!("robots.txt allows {agent} to crawl this page"),
        )]
    } else {
        vec![Finding::fail(
            ROBOTS_ACCESS,
            format!("robots.txt disallows {agent} from crawling this page"),
        )]
    }
}

pub fn check_sitemap(sitemap: &Availability<SitemapInfo>) -> Finding {
    match sitemap {
        Availability::Available(info) => {
            Finding::pass(SITEMAP, format!("Sitemap found at {}", info.url))
        }
        Availability::Unavailable { reason } => {
            Finding::fail(SITEMAP, "Sitemap unavailable").with_text(reason.clone())
        }
    }
}

pub(super) fn robots_txt_rule(ctx: &RuleContext<'_>) -> Result<Vec<Finding>, RuleError> {
    let mut findings = vec![check_robots_presence(&ctx.aux.robots)];
    findings.extend(check_robots_access(
        &ctx.aux.robots,
        ctx.target_url,
        ctx.robots_agent,
    ));
    Ok(findings)
}

pub(super) fn sitemap_rule(ctx: &RuleContext<'_>) -> Result<Vec<Finding>, RuleError> {
    Ok(vec![check_sitemap(&ctx.aux.sitemap)])
}
