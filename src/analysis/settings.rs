//! Runtime settings of an `Analyzer`.

use std::time::Duration;

use crate::collectors::RenderOptions;
use crate::config::{
    Config, DEFAULT_CACHE_CAPACITY, DEFAULT_CACHE_WINDOW_SECS, DEFAULT_DEADLINE_SECS,
    DEFAULT_LINK_CONCURRENCY, DEFAULT_PROBE_TIMEOUT_SECS, DEFAULT_RENDER_TIMEOUT_SECS,
    DEFAULT_USER_AGENT, DEFAULT_VIEWPORT, MAX_LINKS_TO_CHECK, ROBOTS_AGENT,
};
use crate::model::{CategoryId, Plan};

/// Settings shared by every analysis an `Analyzer` runs.
#[derive(Debug, Clone)]
pub struct AnalyzerSettings {
    pub render_timeout: Duration,
    /// Per robots.txt / sitemap / link call
    pub probe_timeout: Duration,
    /// Shared upper bound for the concurrent crawl stages
    pub deadline: Duration,
    /// Link validation batch cap, never above `MAX_LINKS_TO_CHECK`
    pub max_links: usize,
    pub link_concurrency: usize,
    pub cache_window: Duration,
    pub cache_capacity: usize,
    pub user_agent: String,
    pub viewport: (u32, u32),
    /// Categories left out of every report
    pub skip: Vec<CategoryId>,
    pub allow_private_hosts: bool,
    /// Agent name for robots.txt evaluation
    pub robots_agent: String,
}

impl Default for AnalyzerSettings {
    fn default() -> Self {
        Self {
            render_timeout: Duration::from_secs(DEFAULT_RENDER_TIMEOUT_SECS),
            probe_timeout: Duration::from_secs(DEFAULT_PROBE_TIMEOUT_SECS),
            deadline: Duration::from_secs(DEFAULT_DEADLINE_SECS),
            max_links: MAX_LINKS_TO_CHECK,
            link_concurrency: DEFAULT_LINK_CONCURRENCY,
            cache_window: Duration::from_secs(DEFAULT_CACHE_WINDOW_SECS),
            cache_capacity: DEFAULT_CACHE_CAPACITY,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            viewport: DEFAULT_VIEWPORT,
            skip: Vec::new(),
            allow_private_hosts: false,
            robots_agent: ROBOTS_AGENT.to_string(),
        }
    }
}

impl From<&Config> for AnalyzerSettings {
    fn from(config: &Config) -> Self {
        Self {
            render_timeout: Duration::from_secs(config.render_timeout_seconds),
            probe_timeout: Duration::from_secs(config.probe_timeout_seconds),
            deadline: Duration::from_secs(config.deadline_seconds),
            max_links: config.max_links.min(MAX_LINKS_TO_CHECK),
            link_concurrency: config.link_concurrency.max(1),
            cache_window: Duration::from_secs(config.cache_window_seconds),
            cache_capacity: config.cache_capacity,
            user_agent: config.user_agent.clone(),
            viewport: DEFAULT_VIEWPORT,
            skip: config.skip.clone(),
            allow_private_hosts: config.allow_private_hosts,
            robots_agent: ROBOTS_AGENT.to_string(),
        }
    }
}

impl AnalyzerSettings {
    /// Render options for one request under `plan`.
    pub fn render_options(&self, plan: Plan) -> RenderOptions {
        RenderOptions {
            timeout: self.render_timeout,
            viewport: self.viewport,
            user_agent: self.user_agent.clone(),
            capture_screenshot: plan.allows_screenshot(),
        }
    }

    pub fn is_skipped(&self, category: CategoryId) -> bool {
        self.skip.contains(&category)
    }
}
