//! robots.txt parsing and evaluation.
//!
//! Follows the common interpretation of the robots exclusion protocol:
//! - records are grouped by consecutive `User-agent` lines
//! - an agent uses the groups naming it, falling back to `*` groups
//! - the longest matching `Allow`/`Disallow` path wins; on a tie `Allow` wins
//! - `*` matches any run of characters and a trailing `$` anchors the end

use regex::Regex;
use serde::{Deserialize, Serialize};
use url::Url;

/// A single `Allow` or `Disallow` line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RobotsRule {
    pub allow: bool,
    pub path: String,
}

/// Rules that apply to a set of user agents.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RobotsGroup {
    /// Lowercase agent tokens
    pub agents: Vec<String>,
    pub rules: Vec<RobotsRule>,
}

/// Parsed robots.txt.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RobotsTxt {
    pub groups: Vec<RobotsGroup>,
    pub sitemaps: Vec<String>,
}

impl RobotsTxt {
    /// Parses robots.txt content. Unknown directives and malformed lines are ignored.
    pub fn parse(content: &str) -> Self {
        let mut robots = RobotsTxt::default();
        let mut current: Option<RobotsGroup> = None;

        for raw_line in content.lines() {
            let line = raw_line.split('#').next().unwrap_or_default().trim();
            let Some((key, value)) = line.split_once(':') else {
                continue;
            };
            let value = value.trim();

            match key.trim().to_ascii_lowercase().as_str() {
                "user-agent" => {
                    // A user-agent after rules starts a new group
                    let starts_new = current.as_ref().is_some_and(|g| !g.rules.is_empty());
                    if starts_new {
                        robots.groups.extend(current.take());
                    }
                    current
                        .get_or_insert_with(RobotsGroup::default)
                        .agents
                        .push(value.to_ascii_lowercase());
                }
                directive @ ("allow" | "disallow") => {
                    if let Some(group) = current.as_mut() {
                        group.rules.push(RobotsRule {
                            allow: directive == "allow",
                            path: value.to_string(),
                        });
                    }
                }
                "sitemap" if !value.is_empty() => robots.sitemaps.push(value.to_string()),
                _ => {}
            }
        }

        robots.groups.extend(current);
        robots
    }

    /// Whether `agent` may fetch `url`.
    ///
    /// `url` may be absolute or a bare path. No matching rule means allowed.
    pub fn is_allowed(&self, url: &str, agent: &str) -> bool {
        let path = match Url::parse(url) {
            Ok(parsed) => match parsed.query() {
                Some(query) => format!("{}?{}", parsed.path(), query),
                None => parsed.path().to_string(),
            },
            Err(_) => url.to_string(),
        };

        let mut best: Option<(usize, bool)> = None;
        for rule in self.rules_for(agent) {
            // An empty Disallow allows everything
            if rule.path.is_empty() {
                continue;
            }
            if !path_matches(&rule.path, &path) {
                continue;
            }
            let len = rule.path.len();
            best = match best {
                Some((best_len, best_allow))
                    if best_len > len || (best_len == len && best_allow) =>
                {
                    Some((best_len, best_allow))
                }
                _ => Some((len, rule.allow)),
            };
        }

        best.map_or(true, |(_, allow)| allow)
    }

    fn rules_for(&self, agent: &str) -> impl Iterator<Item = &RobotsRule> {
        let agent = agent.to_ascii_lowercase();
        let specific: Vec<&RobotsGroup> = self
            .groups
            .iter()
            .filter(|g| g.agents.iter().any(|a| a != "*" && agent.starts_with(a.as_str())))
            .collect();
        let groups = if specific.is_empty() {
            self.groups
                .iter()
                .filter(|g| g.agents.iter().any(|a| a == "*"))
                .collect()
        } else {
            specific
        };
        groups.into_iter().flat_map(|g| g.rules.iter())
    }
}

fn path_matches(pattern: &str, path: &str) -> bool {
    if !pattern.contains('*') && !pattern.ends_with('$') {
        return path.starts_with(pattern);
    }
    let (body, anchored) = match pattern.strip_suffix('$') {
        Some(body) => (body, true),
        None => (pattern, false),
    };
    let mut expr = format!("^{}", regex::escape(body).replace(r"\*", ".*"));
    if anchored {
        expr.push('$');
    }
    Regex::new(&expr).is_ok_and(|re| re.is_match(path))
}

#[cfg(test)]
mod tests {
    use super::*;

    const ROBOTS: &str = "\
# Example robots.txt
User-agent: *
Disallow: /private
Allow: /private/open
Disallow: /*.pdf$

User-agent: BadBot
User-agent: OtherBot
Disallow: /

Sitemap: https://example.com/sitemap.xml
Sitemap: https://example.com/news-sitemap.xml
";

    #[test]
    fn test_groups_and_sitemaps() {
        let robots = RobotsTxt::parse(ROBOTS);
        assert_eq!(robots.groups.len(), 2);
        assert_eq!(robots.groups[1].agents, ["badbot", "otherbot"]);
        assert_eq!(robots.sitemaps.len(), 2);
    }

    #[test]
    fn test_wildcard_group_rules() {
        let robots = RobotsTxt::parse(ROBOTS);
        assert!(robots.is_allowed("https://example.com/", "SEOChecker"));
        assert!(!robots.is_allowed("https://example.com/private/page", "SEOChecker"));
        assert!(robots.is_allowed("https://example.com/private/open/page", "SEOChecker"));
        assert!(!robots.is_allowed("https://example.com/files/report.pdf", "SEOChecker"));
        assert!(robots.is_allowed("https://example.com/files/report.pdf?v=1", "SEOChecker"));
    }

    #[test]
    fn test_specific_group_overrides_wildcard() {
        let robots = RobotsTxt::parse(ROBOTS);
        assert!(!robots.is_allowed("https://example.com/", "BadBot"));
        assert!(!robots.is_allowed("/anything", "otherbot/2.1"));
    }

    #[test]
    fn test_empty_disallow_allows_everything() {
        let robots = RobotsTxt::parse("User-agent: *\nDisallow:\n");
        assert!(robots.is_allowed("https://example.com/any", "SEOChecker"));
    }

    #[test]
    fn test_tie_prefers_allow() {
        let robots = RobotsTxt::parse("User-agent: *\nDisallow: /page\nAllow: /page\n");
        assert!(robots.is_allowed("/page", "SEOChecker"));
    }

    #[test]
    fn test_empty_and_garbage_input() {
        assert!(RobotsTxt::parse("").is_allowed("/", "SEOChecker"));
        let robots = RobotsTxt::parse("<html>not robots</html>\nDisallow: /\n");
        assert!(robots.groups.is_empty());
        assert!(robots.is_allowed("/", "SEOChecker"));
    }
}
