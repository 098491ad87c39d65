//! Configuration constants.
//!
//! This module defines the rule thresholds, payload caps, and network timeouts used
//! throughout the analysis engine. Thresholds are part of the report contract: changing
//! one changes the verdicts users see.

// Content thresholds
/// Minimum recommended `<title>` length in characters
pub const TITLE_MIN_LENGTH: usize = 30;
/// Maximum recommended `<title>` length in characters
pub const TITLE_MAX_LENGTH: usize = 60;
/// Minimum recommended meta description length in characters
pub const DESCRIPTION_MIN_LENGTH: usize = 120;
/// Maximum recommended meta description length in characters
pub const DESCRIPTION_MAX_LENGTH: usize = 160;
/// Body word count above which content length passes
pub const CONTENT_WORDS_PASS: usize = 300;
/// Body word count above which content length warns instead of failing
pub const CONTENT_WORDS_WARN: usize = 150;

// Technical thresholds
/// URLs longer than this are flagged by the URL structure rule
pub const MAX_RECOMMENDED_URL_LENGTH: usize = 115;
/// Query parameters that mark a URL as carrying tracking state
pub const TRACKING_PARAMETERS: &[&str] = &["utm_source", "utm_medium", "utm_campaign", "fbclid", "gclid"];
/// Robots meta directives evaluated independently, in report order
pub const ROBOTS_META_DIRECTIVES: &[&str] = &[
    "noindex",
    "nofollow",
    "noarchive",
    "nosnippet",
    "noodp",
    "noimageindex",
];
/// Redirect chains longer than this (in URLs) are flagged as excessive
pub const MAX_ACCEPTABLE_REDIRECT_CHAIN: usize = 3;

// Performance thresholds
/// Load times below this pass
pub const LOAD_TIME_PASS_MS: u64 = 3000;
/// Load times below this warn; anything slower fails
pub const LOAD_TIME_WARN_MS: u64 = 6000;
/// Images larger than this many bytes are flagged by the image size rule
pub const LARGE_IMAGE_BYTES: u64 = 200_000;

// Finding payload caps
/// Maximum offending items listed in a single Finding's details
pub const MAX_DETAIL_ITEMS: usize = 10;
/// Maximum robots.txt content retained in AuxData (characters)
pub const MAX_ROBOTS_CONTENT_CHARS: usize = 5000;
/// Maximum sitemap excerpt retained in AuxData (characters)
pub const MAX_SITEMAP_EXCERPT_CHARS: usize = 1000;
/// Maximum network resources retained on a PageSnapshot
pub const MAX_SNAPSHOT_RESOURCES: usize = 100;

// Link validation
/// Hard cap on links checked per analysis
pub const MAX_LINKS_TO_CHECK: usize = 20;
/// Default number of link checks in flight at once
pub const DEFAULT_LINK_CONCURRENCY: usize = 5;
/// Maximum redirects followed by a single link check
pub const LINK_CHECK_MAX_REDIRECTS: usize = 5;

// Crawl probes
/// Conventional sitemap locations, tried in order until one answers 200
pub const SITEMAP_CANDIDATE_PATHS: &[&str] = &["/sitemap.xml", "/sitemap_index.xml", "/sitemap"];
/// Agent name used when evaluating robots.txt rules for the target URL
pub const ROBOTS_AGENT: &str = "SEOChecker";

// Network operation timeouts
/// Page fetch/render timeout in seconds
pub const DEFAULT_RENDER_TIMEOUT_SECS: u64 = 30;
/// Per-call timeout for robots.txt, sitemap and link probes in seconds
pub const DEFAULT_PROBE_TIMEOUT_SECS: u64 = 5;
/// Upper bound for the concurrent auxiliary stages in seconds
pub const DEFAULT_DEADLINE_SECS: u64 = 60;
/// TCP connection timeout in seconds
pub const TCP_CONNECT_TIMEOUT_SECS: u64 = 5;

// Rendering
/// Viewport requested from the renderer (width, height)
pub const DEFAULT_VIEWPORT: (u32, u32) = (1366, 768);
/// Maximum response body size in bytes (2MB)
/// Larger documents are truncated before parsing
pub const MAX_RESPONSE_BODY_SIZE: usize = 2 * 1024 * 1024;
/// Maximum number of redirect hops to follow while resolving the page
pub const MAX_REDIRECT_HOPS: usize = 10;
/// Images whose size is looked up (`HEAD`) while rendering, in document order
pub const MAX_IMAGE_RESOURCES: usize = 20;
/// Image lookups in flight at once
pub const IMAGE_FETCH_CONCURRENCY: usize = 5;

/// Default User-Agent string for outbound requests.
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36 SEOChecker/1.0";

// Freshness cache
/// Width of one freshness bucket in seconds (5 minutes)
pub const DEFAULT_CACHE_WINDOW_SECS: u64 = 300;
/// Maximum cached analyses kept in memory
pub const DEFAULT_CACHE_CAPACITY: usize = 256;

// Retry strategy (page fetch only; probes are single-shot)
/// Initial delay in milliseconds before first retry
pub const RETRY_INITIAL_DELAY_MS: u64 = 500;
/// Factor by which retry delay is multiplied on each attempt
pub const RETRY_FACTOR: u64 = 2;
/// Maximum delay between retries in seconds
pub const RETRY_MAX_DELAY_SECS: u64 = 5;
/// Maximum number of retries after the initial attempt
pub const RETRY_MAX_ATTEMPTS: usize = 2;
