//! Application initialization and resource setup.
//!
//! This module provides functions to initialize the shared resources:
//! - Logger (plain or JSON)
//! - HTTP clients for the page fetch, crawl probes and link checks

mod client;
mod logger;

// Re-export public API
pub use client::{init_client, init_link_client, init_redirect_client};
pub use logger::init_logger_with;
