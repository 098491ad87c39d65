//! HTML and robots.txt parsing.
//!
//! All DOM access goes through `scraper` CSS selectors; the rules never see raw HTML.

mod html;
mod robots;

// Re-export public API
pub use html::{extract_links, HreflangTag, ImageTag, InsecureElement, PageDocument};
pub use robots::{RobotsGroup, RobotsRule, RobotsTxt};
