//! Pipeline stages 1-4: render, then robots.txt, sitemap and links concurrently.

use std::future::Future;
use std::time::Instant;

use tokio::time::{timeout_at, Instant as Deadline};
use url::Url;

use crate::collectors::{CrawlProbe, PageRenderer, RenderOptions};
use crate::error_handling::{AnalysisError, FetchError};
use crate::model::{
    AuxData, Availability, CategoryId, LinkSkipReason, LinkValidation, PageSnapshot, Plan,
};
use crate::utils::sanitize::sanitize_message;

use super::AnalyzerSettings;

/// Stage 1. Any failure is fatal.
pub(crate) async fn render_page<R: PageRenderer>(
    renderer: &R,
    target: &Url,
    options: &RenderOptions,
) -> Result<PageSnapshot, AnalysisError> {
    log::debug!("Render stage started for {}", target);
    let started = Instant::now();
    let mut snapshot = renderer.render(target, options).await.map_err(|e| {
        log::error!("Render stage failed for {}: {}", target, e);
        AnalysisError::from(e)
    })?;
    if !options.capture_screenshot {
        snapshot.screenshot = None;
    }
    log::debug!(
        "Render stage finished for {} in {:.2?} ({} links)",
        target,
        started.elapsed(),
        snapshot.links.len()
    );
    Ok(snapshot)
}

/// Runs one probe under the shared deadline, logging its outcome.
async fn bounded<T>(
    stage: &str,
    target: &Url,
    deadline: Deadline,
    probe: impl Future<Output = Result<T, FetchError>>,
) -> Result<T, FetchError> {
    log::debug!("{} stage started for {}", stage, target);
    let result = match timeout_at(deadline, probe).await {
        Ok(result) => result,
        Err(_) => Err(FetchError::Timeout),
    };
    match &result {
        Ok(_) => log::debug!("{} stage finished for {}", stage, target),
        Err(e) => log::warn!("{} stage degraded for {}: {}", stage, target, e),
    }
    result
}

fn degrade<T>(result: Result<T, FetchError>) -> Availability<T> {
    match result {
        Ok(value) => Availability::Available(value),
        Err(e) => Availability::unavailable(sanitize_message(&e.to_string())),
    }
}

/// Stages 2-4. Never fails: every problem becomes an unavailable or skipped marker.
pub(crate) async fn collect_aux<P: CrawlProbe>(
    probe: &P,
    target: &Url,
    snapshot: &PageSnapshot,
    plan: Plan,
    settings: &AnalyzerSettings,
) -> AuxData {
    let deadline = Deadline::now() + settings.deadline;
    let crawl_skipped = settings.is_skipped(CategoryId::Crawlability);

    let robots = async {
        if crawl_skipped {
            return Availability::unavailable("category skipped");
        }
        degrade(bounded("robots.txt", target, deadline, probe.fetch_robots(target)).await)
    };

    let sitemap = async {
        if crawl_skipped {
            return Availability::unavailable("category skipped");
        }
        degrade(bounded("sitemap", target, deadline, probe.fetch_sitemap(target)).await)
    };

    let links = async {
        let skip = if settings.is_skipped(CategoryId::Links) {
            Some(LinkSkipReason::CategorySkipped)
        } else if !plan.allows_link_validation() {
            Some(LinkSkipReason::NotEntitled)
        } else if snapshot.links.is_empty() {
            Some(LinkSkipReason::NoLinks)
        } else {
            None
        };
        if let Some(reason) = skip {
            log::debug!("Link validation skipped for {}: {:?}", target, reason);
            return LinkValidation::Skipped { reason };
        }

        let checked = bounded(
            "Link validation",
            target,
            deadline,
            probe.check_links(&snapshot.links, settings.max_links),
        )
        .await;
        match checked {
            Ok(results) => LinkValidation::Checked { results },
            Err(e) => LinkValidation::Unavailable {
                reason: sanitize_message(&e.to_string()),
            },
        }
    };

    let (robots, sitemap, links) = tokio::join!(robots, sitemap, links);
    AuxData {
        robots,
        sitemap,
        links,
    }
}
