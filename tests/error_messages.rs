//! Tests to ensure error messages are actionable and consistent
//!
//! These tests verify that configuration errors name the offending field and that
//! fatal analysis errors carry a stable classification plus a readable message.

use seo_audit::{AnalysisError, Config, InitializationError, RenderError};

#[test]
fn test_config_validation_errors_name_the_field() {
    let cases: Vec<(Config, &str)> = vec![
        (
            Config {
                render_timeout_seconds: 0,
                ..Default::default()
            },
            "render_timeout_seconds",
        ),
        (
            Config {
                deadline_seconds: 0,
                ..Default::default()
            },
            "deadline_seconds",
        ),
        (
            Config {
                link_concurrency: 0,
                ..Default::default()
            },
            "link_concurrency",
        ),
        (
            Config {
                cache_window_seconds: 0,
                ..Default::default()
            },
            "cache_window_seconds",
        ),
        (
            Config {
                user_agent: "   ".to_string(),
                ..Default::default()
            },
            "user_agent",
        ),
    ];

    for (config, field) in cases {
        match config.validate() {
            Err(InitializationError::InvalidConfig(message)) => {
                assert!(message.contains(field), "'{message}' should mention {field}");
            }
            other => panic!("expected InvalidConfig for {field}, got {other:?}"),
        }
    }
}

#[test]
fn test_link_cap_error_states_the_limit() {
    let config = Config {
        max_links: 100,
        ..Default::default()
    };
    let message = config.validate().unwrap_err().to_string();
    assert!(message.contains("at most 20"), "{message}");
    assert!(message.contains("100"), "{message}");
}

#[test]
fn test_fatal_errors_are_classified() {
    let cases = [
        (
            AnalysisError::InvalidUrl {
                url: "ftp://example.com".into(),
                reason: "unsupported scheme 'ftp'".into(),
            },
            "bad_url",
            "ftp://example.com",
        ),
        (
            RenderError::Navigation {
                url: "https://example.com".into(),
                reason: "connection error".into(),
            }
            .into(),
            "page_unreachable",
            "connection error",
        ),
        (
            RenderError::Timeout {
                url: "https://example.com".into(),
                seconds: 30,
            }
            .into(),
            "page_unreachable",
            "timed out after 30s",
        ),
        (
            RenderError::BrowserLaunch("executable not found".into()).into(),
            "render_engine",
            "executable not found",
        ),
        (AnalysisError::Cancelled, "cancelled", "cancelled"),
    ];

    for (error, kind, fragment) in cases {
        assert_eq!(error.kind(), kind);
        let message = error.to_string();
        assert!(message.contains(fragment), "'{message}' should contain '{fragment}'");
        assert!(!message.contains('\n'), "fatal messages are single-line");
    }
}
