//! robots.txt, sitemap and link probes over HTTP.

use std::error::Error as StdError;
use std::time::Duration;

use futures::stream::{self, StreamExt};
use url::Url;

use crate::config::{
    MAX_RESPONSE_BODY_SIZE, MAX_ROBOTS_CONTENT_CHARS, MAX_SITEMAP_EXCERPT_CHARS,
    SITEMAP_CANDIDATE_PATHS,
};
use crate::error_handling::{categorize_reqwest_error, FetchError, InitializationError};
use crate::initialization::{init_client, init_link_client};
use crate::model::{LinkCheck, PageLink, RobotsInfo, SitemapInfo};
use crate::parse::RobotsTxt;
use crate::security::is_redirect_target_allowed;
use crate::utils::sanitize::{sanitize_message, truncate_chars};

use super::{read_body_capped, CrawlProbe};

/// Single-shot HTTP probes. Each request is bounded by the probe timeout.
#[derive(Debug, Clone)]
pub struct HttpProbe {
    client: reqwest::Client,
    link_client: reqwest::Client,
    link_concurrency: usize,
    allow_private_hosts: bool,
}

impl HttpProbe {
    /// # Errors
    ///
    /// Returns `InitializationError::HttpClientError` if a client cannot be built.
    pub fn new(
        user_agent: &str,
        timeout: Duration,
        link_concurrency: usize,
        allow_private_hosts: bool,
    ) -> Result<Self, InitializationError> {
        Ok(Self {
            client: init_client(user_agent, timeout, allow_private_hosts)?,
            link_client: init_link_client(user_agent, timeout, allow_private_hosts)?,
            link_concurrency: link_concurrency.max(1),
            allow_private_hosts,
        })
    }

    async fn get_ok(&self, url: &Url) -> Result<String, FetchError> {
        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }
        Ok(read_body_capped(response, MAX_RESPONSE_BODY_SIZE).await?)
    }
}

/// Checks one link. Never fails: transport errors and refused targets become an
/// unreachable result with status 0.
async fn check_link(client: reqwest::Client, href: String, allow_private_hosts: bool) -> LinkCheck {
    let allowed = Url::parse(&href)
        .map(|url| is_redirect_target_allowed(&url, allow_private_hosts))
        .unwrap_or(false);
    if !allowed {
        return LinkCheck {
            href,
            status: 0,
            reachable: false,
            error: Some("link target not allowed".to_string()),
        };
    }

    let mut outcome = client.head(&href).send().await;
    // Some servers refuse HEAD outright; fall back to GET before judging the link
    if let Ok(response) = &outcome {
        if matches!(response.status().as_u16(), 405 | 501) {
            outcome = client.get(&href).send().await;
        }
    }

    match outcome {
        Ok(response) => {
            let status = response.status().as_u16();
            LinkCheck {
                href,
                status,
                reachable: (200..400).contains(&status),
                error: None,
            }
        }
        Err(e) => {
            log::debug!("Link check failed for {}: {}", href, e);
            LinkCheck {
                status: e.status().map(|s| s.as_u16()).unwrap_or(0),
                reachable: false,
                error: Some(describe_link_error(&e)),
                href,
            }
        }
    }
}

/// Category, message and causes of a failed link request. Redirect refusals carry
/// their reason in the source chain, not in reqwest's own message.
fn describe_link_error(error: &reqwest::Error) -> String {
    let mut message = format!("{}: {}", categorize_reqwest_error(error), error);
    let mut source = StdError::source(error);
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    sanitize_message(&message)
}

fn join_origin(origin: &Url, path: &str) -> Result<Url, FetchError> {
    if origin.cannot_be_a_base() || origin.host_str().is_none() {
        return Err(FetchError::InvalidOrigin(origin.to_string()));
    }
    origin
        .join(path)
        .map_err(|e| FetchError::InvalidOrigin(format!("{origin}: {e}")))
}

impl CrawlProbe for HttpProbe {
    async fn fetch_robots(&self, origin: &Url) -> Result<RobotsInfo, FetchError> {
        let url = join_origin(origin, "/robots.txt")?;
        log::debug!("Fetching {}", url);
        let body = self.get_ok(&url).await?;
        let rules = RobotsTxt::parse(&body);
        Ok(RobotsInfo {
            url: url.to_string(),
            content: truncate_chars(&body, MAX_ROBOTS_CONTENT_CHARS),
            sitemaps: rules.sitemaps.clone(),
            rules,
        })
    }

    async fn fetch_sitemap(&self, origin: &Url) -> Result<SitemapInfo, FetchError> {
        let mut last_error = FetchError::Status(404);
        for path in SITEMAP_CANDIDATE_PATHS {
            let url = join_origin(origin, path)?;
            match self.get_ok(&url).await {
                Ok(body) => {
                    log::debug!("Sitemap found at {}", url);
                    return Ok(SitemapInfo {
                        url: url.to_string(),
                        content_excerpt: truncate_chars(&body, MAX_SITEMAP_EXCERPT_CHARS),
                    });
                }
                Err(e) => {
                    log::debug!("No sitemap at {}: {}", url, e);
                    last_error = e;
                }
            }
        }
        Err(last_error)
    }

    async fn check_links(
        &self,
        links: &[PageLink],
        max_count: usize,
    ) -> Result<Vec<LinkCheck>, FetchError> {
        let checks: Vec<_> = links
            .iter()
            .take(max_count)
            .map(|link| {
                check_link(
                    self.link_client.clone(),
                    link.href.clone(),
                    self.allow_private_hosts,
                )
            })
            .collect();
        let results = stream::iter(checks)
            .buffered(self.link_concurrency)
            .collect::<Vec<_>>()
            .await;
        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httptest::{matchers::*, responders::*, Expectation, Server};

    fn probe() -> HttpProbe {
        HttpProbe::new("test-agent", Duration::from_secs(2), 3, true).unwrap()
    }

    fn origin(server: &Server) -> Url {
        Url::parse(&server.url("/some/page").to_string()).unwrap()
    }

    fn link(href: String) -> PageLink {
        PageLink {
            href,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_fetch_robots_parses_rules_and_sitemaps() {
        let server = Server::run();
        server.expect(
            Expectation::matching(request::method_path("GET", "/robots.txt")).respond_with(
                status_code(200).body(
                    "User-agent: *\nDisallow: /private\nSitemap: https://example.com/sitemap.xml\n",
                ),
            ),
        );
        let info = probe().fetch_robots(&origin(&server)).await.unwrap();
        assert!(info.url.ends_with("/robots.txt"));
        assert_eq!(info.sitemaps, ["https://example.com/sitemap.xml"]);
        assert!(!info.can_crawl("https://example.com/private/x", "SEOChecker"));
        assert!(info.can_crawl("https://example.com/public", "SEOChecker"));
    }

    #[tokio::test]
    async fn test_fetch_robots_missing_is_status_error() {
        let server = Server::run();
        server.expect(
            Expectation::matching(request::method_path("GET", "/robots.txt"))
                .respond_with(status_code(404)),
        );
        let err = probe().fetch_robots(&origin(&server)).await.unwrap_err();
        assert!(matches!(err, FetchError::Status(404)));
    }

    #[tokio::test]
    async fn test_fetch_robots_truncates_content() {
        let server = Server::run();
        let long = format!("User-agent: *\n{}", "# comment line\n".repeat(1000));
        server.expect(
            Expectation::matching(request::method_path("GET", "/robots.txt"))
                .respond_with(status_code(200).body(long)),
        );
        let info = probe().fetch_robots(&origin(&server)).await.unwrap();
        assert_eq!(info.content.chars().count(), MAX_ROBOTS_CONTENT_CHARS);
    }

    #[tokio::test]
    async fn test_fetch_sitemap_tries_candidates_in_order() {
        let server = Server::run();
        server.expect(
            Expectation::matching(request::method_path("GET", "/sitemap.xml"))
                .respond_with(status_code(404)),
        );
        server.expect(
            Expectation::matching(request::method_path("GET", "/sitemap_index.xml"))
                .respond_with(status_code(200).body("<sitemapindex></sitemapindex>")),
        );
        let info = probe().fetch_sitemap(&origin(&server)).await.unwrap();
        assert!(info.url.ends_with("/sitemap_index.xml"));
        assert_eq!(info.content_excerpt, "<sitemapindex></sitemapindex>");
    }

    #[tokio::test]
    async fn test_fetch_sitemap_none_found() {
        let server = Server::run();
        server.expect(
            Expectation::matching(request::method("GET"))
                .times(SITEMAP_CANDIDATE_PATHS.len())
                .respond_with(status_code(404)),
        );
        let err = probe().fetch_sitemap(&origin(&server)).await.unwrap_err();
        assert!(matches!(err, FetchError::Status(404)));
    }

    #[tokio::test]
    async fn test_check_links_keeps_order_and_cap() {
        let server = Server::run();
        server.expect(
            Expectation::matching(request::method_path("HEAD", "/ok"))
                .times(2)
                .respond_with(status_code(200)),
        );
        server.expect(
            Expectation::matching(request::method_path("HEAD", "/gone"))
                .respond_with(status_code(404)),
        );
        server.expect(
            Expectation::matching(request::method_path("HEAD", "/moved"))
                .respond_with(status_code(301).insert_header("Location", "/ok")),
        );

        let links = vec![
            link(server.url("/ok").to_string()),
            link(server.url("/gone").to_string()),
            link(server.url("/moved").to_string()),
            link(server.url("/never-checked").to_string()),
        ];
        let results = probe().check_links(&links, 3).await.unwrap();
        assert_eq!(results.len(), 3);
        assert_eq!(results[0].status, 200);
        assert!(results[0].reachable);
        assert_eq!(results[1].status, 404);
        assert!(!results[1].reachable);
        assert!(results[2].href.ends_with("/moved"));
        assert!(results[2].reachable);
    }

    #[tokio::test]
    async fn test_check_links_falls_back_to_get() {
        let server = Server::run();
        server.expect(
            Expectation::matching(request::method_path("HEAD", "/no-head"))
                .respond_with(status_code(405)),
        );
        server.expect(
            Expectation::matching(request::method_path("GET", "/no-head"))
                .respond_with(status_code(200)),
        );
        let links = vec![link(server.url("/no-head").to_string())];
        let results = probe().check_links(&links, 20).await.unwrap();
        assert!(results[0].reachable);
        assert_eq!(results[0].status, 200);
    }

    #[tokio::test]
    async fn test_check_links_transport_error_is_a_result() {
        let links = vec![link("http://127.0.0.1:9/".to_string())];
        let results = probe().check_links(&links, 20).await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].status, 0);
        assert!(!results[0].reachable);
        assert!(results[0].error.is_some());
    }

    #[tokio::test]
    async fn test_check_links_refuses_private_targets_by_default() {
        let strict = HttpProbe::new("test-agent", Duration::from_secs(2), 3, false).unwrap();
        let links = vec![link("http://192.168.1.1/admin".to_string())];
        let results = strict.check_links(&links, 20).await.unwrap();
        assert!(!results[0].reachable);
        assert_eq!(results[0].error.as_deref(), Some("link target not allowed"));
    }

    #[tokio::test]
    async fn test_check_links_stops_at_redirect_into_private_network() {
        let server = Server::run();
        server.expect(
            Expectation::matching(request::method_path("HEAD", "/partner")).respond_with(
                status_code(302).insert_header("Location", "http://10.0.0.1/internal"),
            ),
        );
        // Only the redirect hop is subject to the host policy here
        let guarded = HttpProbe {
            link_client: init_link_client("test-agent", Duration::from_secs(2), false).unwrap(),
            ..probe()
        };
        let links = vec![link(server.url("/partner").to_string())];
        let results = guarded.check_links(&links, 20).await.unwrap();
        assert_eq!(results[0].status, 0);
        assert!(!results[0].reachable);
        let error = results[0].error.as_deref().unwrap();
        assert!(error.contains("redirect target not allowed"), "{error}");
    }

    #[test]
    fn test_join_origin_rejects_non_base_urls() {
        let url = Url::parse("mailto:someone@example.com").unwrap();
        assert!(matches!(
            join_origin(&url, "/robots.txt"),
            Err(FetchError::InvalidOrigin(_))
        ));
    }
}
