//! Configuration types and CLI options.
//!
//! This module defines enums and structs used for command-line argument parsing
//! and configuration.

use clap::{Parser, ValueEnum};

use crate::config::constants::{
    DEFAULT_CACHE_CAPACITY, DEFAULT_CACHE_WINDOW_SECS, DEFAULT_DEADLINE_SECS,
    DEFAULT_LINK_CONCURRENCY, DEFAULT_PROBE_TIMEOUT_SECS, DEFAULT_RENDER_TIMEOUT_SECS,
    DEFAULT_USER_AGENT, MAX_LINKS_TO_CHECK,
};
use crate::error_handling::InitializationError;
use crate::model::{CategoryId, Plan};

/// Logging level for the application.
///
/// Controls the verbosity of log output, from most restrictive (Error) to most
/// verbose (Trace).
#[derive(Clone, Debug, ValueEnum)]
pub enum LogLevel {
    /// Only error messages
    Error,
    /// Error and warning messages
    Warn,
    /// Error, warning, and informational messages
    Info,
    /// All messages except trace
    Debug,
    /// All messages including trace
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(l: LogLevel) -> Self {
        match l {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Log output format.
///
/// Controls how log messages are formatted:
/// - `Plain`: Human-readable format with colors (default)
/// - `Json`: Structured JSON format for machine parsing
#[derive(Clone, Debug, ValueEnum)]
pub enum LogFormat {
    /// Human-readable format with colors (default)
    Plain,
    /// Structured JSON format for machine parsing
    Json,
}

/// Analysis configuration.
///
/// Parsed from the command line by the `seo_audit` binary, or constructed
/// programmatically by library users via `Default`.
///
/// # Examples
///
/// ```no_run
/// use seo_audit::Config;
///
/// let config = Config {
///     url: "https://example.com".to_string(),
///     max_links: 10,
///     ..Default::default()
/// };
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Parser)]
#[command(
    name = "seo_audit",
    about = "Renders a URL and prints a scored SEO / technical-health report as JSON."
)]
pub struct Config {
    /// URL to analyse (http:// or https://)
    pub url: String,

    /// Entitlement tier: free|pro|enterprise
    #[arg(long, default_value = "free")]
    pub plan: Plan,

    /// Log level: error|warn|info|debug|trace
    #[arg(long, value_enum, default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,

    /// Log format: plain|json
    #[arg(long, value_enum, default_value_t = LogFormat::Plain)]
    pub log_format: LogFormat,

    /// Page fetch/render timeout in seconds
    #[arg(long, default_value_t = DEFAULT_RENDER_TIMEOUT_SECS)]
    pub render_timeout_seconds: u64,

    /// Timeout for each robots.txt, sitemap and link probe in seconds
    #[arg(long, default_value_t = DEFAULT_PROBE_TIMEOUT_SECS)]
    pub probe_timeout_seconds: u64,

    /// Overall deadline for the auxiliary crawl stages in seconds
    #[arg(long, default_value_t = DEFAULT_DEADLINE_SECS)]
    pub deadline_seconds: u64,

    /// Maximum number of page links to validate (at most 20)
    #[arg(long, default_value_t = MAX_LINKS_TO_CHECK)]
    pub max_links: usize,

    /// Number of link checks in flight at once
    #[arg(long, default_value_t = DEFAULT_LINK_CONCURRENCY)]
    pub link_concurrency: usize,

    /// Freshness window in seconds for reusing a previous crawl of the same URL
    #[arg(long, default_value_t = DEFAULT_CACHE_WINDOW_SECS)]
    pub cache_window_seconds: u64,

    /// Maximum number of cached crawls kept in memory
    #[arg(long, default_value_t = DEFAULT_CACHE_CAPACITY)]
    pub cache_capacity: usize,

    /// HTTP User-Agent header value
    #[arg(long, default_value = DEFAULT_USER_AGENT)]
    pub user_agent: String,

    /// Allow analysing loopback, private and link-local hosts
    #[arg(long)]
    pub allow_private_hosts: bool,

    /// Category to leave out of this run (repeatable)
    #[arg(long = "skip")]
    pub skip: Vec<CategoryId>,

    /// Pretty-print the JSON report
    #[arg(long)]
    pub pretty: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            url: String::new(),
            plan: Plan::Free,
            log_level: LogLevel::Info,
            log_format: LogFormat::Plain,
            render_timeout_seconds: DEFAULT_RENDER_TIMEOUT_SECS,
            probe_timeout_seconds: DEFAULT_PROBE_TIMEOUT_SECS,
            deadline_seconds: DEFAULT_DEADLINE_SECS,
            max_links: MAX_LINKS_TO_CHECK,
            link_concurrency: DEFAULT_LINK_CONCURRENCY,
            cache_window_seconds: DEFAULT_CACHE_WINDOW_SECS,
            cache_capacity: DEFAULT_CACHE_CAPACITY,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            allow_private_hosts: false,
            skip: Vec::new(),
            pretty: false,
        }
    }
}

impl Config {
    /// Checks that the numeric settings describe a runnable analysis.
    ///
    /// # Errors
    ///
    /// Returns `InitializationError::InvalidConfig` naming the first offending field.
    pub fn validate(&self) -> Result<(), InitializationError> {
        let invalid = |msg: String| Err(InitializationError::InvalidConfig(msg));

        if self.render_timeout_seconds == 0 {
            return invalid("render_timeout_seconds must be greater than 0".into());
        }
        if self.probe_timeout_seconds == 0 {
            return invalid("probe_timeout_seconds must be greater than 0".into());
        }
        if self.deadline_seconds == 0 {
            return invalid("deadline_seconds must be greater than 0".into());
        }
        if self.max_links > MAX_LINKS_TO_CHECK {
            return invalid(format!(
                "max_links must be at most {MAX_LINKS_TO_CHECK} (got {})",
                self.max_links
            ));
        }
        if self.link_concurrency == 0 {
            return invalid("link_concurrency must be greater than 0".into());
        }
        if self.cache_window_seconds == 0 {
            return invalid("cache_window_seconds must be greater than 0".into());
        }
        if self.cache_capacity == 0 {
            return invalid("cache_capacity must be greater than 0".into());
        }
        if self.user_agent.trim().is_empty() {
            return invalid("user_agent must not be empty".into());
        }
        Ok(())
    }
}
