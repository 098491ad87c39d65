//! Full pipeline over HTTP against a mock server.
//!
//! Uses `httptest` for the site under analysis; no real network access.

use httptest::{matchers::*, responders::*, Expectation, Server};
use seo_audit::model::{Details, LinkValidation, Status};
use std::time::Duration;

use seo_audit::model::PageLink;
use seo_audit::{Analyzer, CategoryId, Config, CrawlProbe, Entitlement, FetchError, HttpProbe, Plan};
use url::Url;

const PAGE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <title>Mock Server Landing Page For Integration Tests</title>
  <meta name="description" content="Short description.">
  <script type="application/ld+json">{"@context": "https://schema.org", "@type": "WebSite"}</script>
  <script type="application/ld+json">{"@type": "Organization",</script>
</head>
<body>
  <h1>Landing</h1>
  <h3>Skipped a level</h3>
  <a href="/about">About</a>
  <a href="/missing">Missing</a>
</body>
</html>"#;

fn config_for(server: &Server, path: &str) -> Config {
    Config {
        url: server.url(path).to_string(),
        allow_private_hosts: true,
        render_timeout_seconds: 5,
        probe_timeout_seconds: 2,
        deadline_seconds: 5,
        ..Default::default()
    }
}

#[tokio::test]
async fn test_pipeline_over_http() {
    let server = Server::run();
    server.expect(
        Expectation::matching(request::method_path("GET", "/start")).respond_with(
            status_code(301).append_header("Location", "/"),
        ),
    );
    server.expect(
        Expectation::matching(request::method_path("GET", "/")).respond_with(
            status_code(200)
                .append_header("Content-Type", "text/html")
                .append_header("X-Content-Type-Options", "nosniff")
                .body(PAGE),
        ),
    );
    server.expect(
        Expectation::matching(request::method_path("GET", "/robots.txt")).respond_with(
            status_code(200).body("User-agent: *\nDisallow: /start\n"),
        ),
    );
    server.expect(
        Expectation::matching(request::method_path("GET", "/sitemap.xml"))
            .respond_with(status_code(200).body("<urlset></urlset>")),
    );
    server.expect(
        Expectation::matching(request::method_path("HEAD", "/about"))
            .respond_with(status_code(200)),
    );
    server.expect(
        Expectation::matching(request::method_path("HEAD", "/missing"))
            .respond_with(status_code(404)),
    );

    let config = config_for(&server, "/start");
    let analyzer = Analyzer::from_config(&config).expect("analyzer should build");
    let report = analyzer
        .analyze(&config.url, &Entitlement::new(Plan::Pro))
        .await
        .expect("analysis should succeed");

    // Snapshot facts
    assert!(report.snapshot.final_url.ends_with('/'));
    assert_eq!(report.snapshot.redirect_chains[&config.url].len(), 2);
    assert_eq!(report.snapshot.links.len(), 2);

    let findings = |id: CategoryId| &report.category(id).unwrap().findings;
    let status_of = |id: CategoryId, rule: &str| {
        findings(id)
            .iter()
            .find(|f| f.rule == rule)
            .map(|f| f.status)
            .unwrap_or_else(|| panic!("no {rule} finding"))
    };

    assert_eq!(status_of(CategoryId::Content, "title"), Status::Pass);
    assert_eq!(status_of(CategoryId::Content, "meta_description"), Status::Warn);
    assert_eq!(status_of(CategoryId::Content, "heading_hierarchy"), Status::Warn);
    assert_eq!(status_of(CategoryId::Security, "https"), Status::Fail);
    assert_eq!(status_of(CategoryId::Security, "mixed_content"), Status::Info);
    assert_eq!(status_of(CategoryId::Security, "security_headers"), Status::Warn);
    assert_eq!(status_of(CategoryId::Mobile, "viewport"), Status::Fail);
    assert_eq!(status_of(CategoryId::Technical, "redirect_chain"), Status::Info);

    // One valid and one malformed JSON-LD block, each with its own finding
    let structured: Vec<Status> = findings(CategoryId::StructuredData)
        .iter()
        .map(|f| f.status)
        .collect();
    assert_eq!(structured, [Status::Pass, Status::Fail]);
    assert!(findings(CategoryId::StructuredData)[0].message.contains("WebSite"));

    // robots.txt disallows /start, the URL that was requested
    assert_eq!(status_of(CategoryId::Crawlability, "robots_txt"), Status::Pass);
    assert_eq!(status_of(CategoryId::Crawlability, "robots_access"), Status::Fail);
    assert_eq!(status_of(CategoryId::Crawlability, "sitemap"), Status::Pass);

    match &report.aux.links {
        LinkValidation::Checked { results } => {
            assert_eq!(results.len(), 2);
            assert!(results[0].reachable);
            assert_eq!(results[1].status, 404);
        }
        other => panic!("links were not checked: {other:?}"),
    }
    let link_statuses: Vec<Status> = findings(CategoryId::Links).iter().map(|f| f.status).collect();
    assert_eq!(link_statuses, [Status::Pass, Status::Fail]);
}

#[tokio::test]
async fn test_unreachable_page_is_fatal() {
    let config = Config {
        url: "http://127.0.0.1:9/".to_string(),
        allow_private_hosts: true,
        render_timeout_seconds: 5,
        ..Default::default()
    };
    let analyzer = Analyzer::from_config(&config).unwrap();
    let err = analyzer
        .analyze(&config.url, &Entitlement::default())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), "page_unreachable");
}

/// robots.txt and every sitemap candidate answer 404.
fn expect_no_crawl_files(server: &Server) {
    for path in ["/robots.txt", "/sitemap.xml", "/sitemap_index.xml", "/sitemap"] {
        server.expect(
            Expectation::matching(request::method_path("GET", path))
                .respond_with(status_code(404)),
        );
    }
}

#[tokio::test]
async fn test_missing_robots_and_sitemap_degrade() {
    let server = Server::run();
    server.expect(
        Expectation::matching(request::method_path("GET", "/")).respond_with(
            status_code(200).body("<html><head><title>Tiny</title></head><body></body></html>"),
        ),
    );
    expect_no_crawl_files(&server);

    let config = config_for(&server, "/");
    let analyzer = Analyzer::from_config(&config).unwrap();
    let report = analyzer
        .analyze(&config.url, &Entitlement::new(Plan::Free))
        .await
        .expect("degraded probes must not fail the analysis");

    assert_eq!(report.aux.robots.unavailable_reason(), Some("HTTP status 404"));
    assert_eq!(report.aux.sitemap.unavailable_reason(), Some("HTTP status 404"));
    let crawl = &report.category(CategoryId::Crawlability).unwrap();
    assert_eq!(crawl.score, 0);
    assert!(crawl.findings.iter().any(|f| f.message == "robots.txt unavailable"));
}

#[tokio::test]
async fn test_redirect_loop_is_reported_not_fatal() {
    let server = Server::run();
    server.expect(
        Expectation::matching(request::method_path("GET", "/loop-a"))
            .respond_with(status_code(302).append_header("Location", "/loop-b")),
    );
    server.expect(
        Expectation::matching(request::method_path("GET", "/loop-b"))
            .respond_with(status_code(302).append_header("Location", "/loop-a")),
    );
    expect_no_crawl_files(&server);

    let config = config_for(&server, "/loop-a");
    let analyzer = Analyzer::from_config(&config).unwrap();
    let report = analyzer
        .analyze(&config.url, &Entitlement::new(Plan::Free))
        .await
        .expect("a redirect loop must not abort the analysis");

    let chain = &report.snapshot.redirect_chains[&config.url];
    assert_eq!(chain.len(), 3);
    assert_eq!(chain[0], chain[2]);

    let redirect: Vec<Status> = report
        .category(CategoryId::Technical)
        .unwrap()
        .findings
        .iter()
        .filter(|f| f.rule == "redirect_chain")
        .map(|f| f.status)
        .collect();
    assert_eq!(redirect, [Status::Info, Status::Fail]);
}

#[tokio::test]
async fn test_large_images_are_flagged() {
    let server = Server::run();
    server.expect(
        Expectation::matching(request::method_path("GET", "/")).respond_with(
            status_code(200).body(
                "<html><head><title>Photos</title></head><body>\
                 <img src=\"/hero.jpg\" alt=\"Hero\"><img src=\"/thumb.jpg\" alt=\"Thumb\">\
                 </body></html>",
            ),
        ),
    );
    server.expect(
        Expectation::matching(request::method_path("HEAD", "/hero.jpg")).respond_with(
            status_code(200)
                .append_header("Content-Type", "image/jpeg")
                .append_header("Content-Length", "409600"),
        ),
    );
    server.expect(
        Expectation::matching(request::method_path("HEAD", "/thumb.jpg")).respond_with(
            status_code(200)
                .append_header("Content-Type", "image/jpeg")
                .append_header("Content-Length", "8000"),
        ),
    );
    expect_no_crawl_files(&server);

    let config = config_for(&server, "/");
    let analyzer = Analyzer::from_config(&config).unwrap();
    let report = analyzer
        .analyze(&config.url, &Entitlement::new(Plan::Free))
        .await
        .unwrap();

    let image_sizes = report
        .category(CategoryId::Performance)
        .unwrap()
        .findings
        .iter()
        .find(|f| f.rule == "image_sizes")
        .expect("image_sizes finding");
    assert_eq!(image_sizes.status, Status::Warn);
    assert_eq!(image_sizes.message, "1 large image(s) (>200KB) detected");
    assert_eq!(
        image_sizes.details,
        Some(Details::List(vec!["hero.jpg (400 KB)".to_string()]))
    );
}

#[tokio::test]
async fn test_crawl_fetches_do_not_follow_redirects_into_private_networks() {
    let server = Server::run();
    server.expect(
        Expectation::matching(request::method_path("GET", "/robots.txt")).respond_with(
            status_code(301).append_header("Location", "http://169.254.169.254/latest/meta-data/"),
        ),
    );
    for path in ["/sitemap.xml", "/sitemap_index.xml", "/sitemap"] {
        server.expect(
            Expectation::matching(request::method_path("GET", path)).respond_with(
                status_code(302).append_header("Location", "http://10.0.0.1/sitemap.xml"),
            ),
        );
    }

    // The origin is vetted by the analyzer, so a strict probe still reaches the
    // loopback mock server; only the redirect hops are refused here
    let probe = HttpProbe::new("test-agent", Duration::from_secs(2), 2, false).unwrap();
    let origin = Url::parse(&server.url("/").to_string()).unwrap();

    let robots = probe.fetch_robots(&origin).await.unwrap_err();
    assert!(matches!(&robots, FetchError::Http(e) if e.is_redirect()), "{robots}");
    let sitemap = probe.fetch_sitemap(&origin).await.unwrap_err();
    assert!(matches!(&sitemap, FetchError::Http(e) if e.is_redirect()), "{sitemap}");

    // A private link target is refused before any request is made
    let links = [PageLink {
        href: "http://10.0.0.1/admin".to_string(),
        ..Default::default()
    }];
    let results = probe.check_links(&links, 20).await.unwrap();
    assert!(!results[0].reachable);
    assert_eq!(results[0].error.as_deref(), Some("link target not allowed"));
}

#[test]
fn test_from_config_rejects_invalid_config() {
    let config = Config {
        link_concurrency: 0,
        ..Default::default()
    };
    assert!(Analyzer::from_config(&config).is_err());
}
