//! The Analysis Orchestrator.

use std::sync::Arc;

use chrono::Utc;
use tokio_util::sync::CancellationToken;
use url::Url;

use crate::collectors::{CrawlProbe, HttpProbe, HttpRenderer, PageRenderer};
use crate::config::Config;
use crate::error_handling::{AnalysisError, InitializationError};
use crate::model::{AuxData, Entitlement, FindingSummary, PageSnapshot, Plan, Report, REPORT_SCHEMA_VERSION};
use crate::parse::PageDocument;
use crate::rules::{evaluate_rules, RuleContext, RULES};
use crate::scoring::{build_categories, overall_score};
use crate::security::validate_target_url;

use super::cache::{CachedCrawl, ReportCache};
use super::stages::{collect_aux, render_page};
use super::AnalyzerSettings;

/// Runs the analysis pipeline for one URL at a time per call; calls may run
/// concurrently and share the freshness cache.
///
/// # Examples
///
/// ```no_run
/// use seo_audit::{Analyzer, Config, Entitlement, Plan};
///
/// # async fn run() -> Result<(), Box<dyn std::error::Error>> {
/// let analyzer = Analyzer::from_config(&Config::default())?;
/// let report = analyzer
///     .analyze("https://example.com", &Entitlement::new(Plan::Pro))
///     .await?;
/// println!("{} scored {}", report.url, report.overall_score);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Analyzer<R = HttpRenderer, P = HttpProbe> {
    renderer: R,
    probe: P,
    settings: AnalyzerSettings,
    cache: ReportCache,
}

impl Analyzer<HttpRenderer, HttpProbe> {
    /// Builds an analyzer with the HTTP collectors described by `config`.
    ///
    /// # Errors
    ///
    /// Returns `InitializationError` if the configuration is invalid or an HTTP
    /// client cannot be built.
    pub fn from_config(config: &Config) -> Result<Self, InitializationError> {
        config.validate()?;
        let settings = AnalyzerSettings::from(config);
        let renderer = HttpRenderer::new(settings.allow_private_hosts)?;
        let probe = HttpProbe::new(
            &settings.user_agent,
            settings.probe_timeout,
            settings.link_concurrency,
            settings.allow_private_hosts,
        )?;
        Ok(Self::new(renderer, probe, settings))
    }
}

impl<R: PageRenderer, P: CrawlProbe> Analyzer<R, P> {
    pub fn new(renderer: R, probe: P, settings: AnalyzerSettings) -> Self {
        let cache = ReportCache::new(settings.cache_window, settings.cache_capacity);
        Self {
            renderer,
            probe,
            settings,
            cache,
        }
    }

    pub fn settings(&self) -> &AnalyzerSettings {
        &self.settings
    }

    pub fn cache(&self) -> &ReportCache {
        &self.cache
    }

    /// Analyses `url` under `entitlement` and returns the scored report.
    ///
    /// # Errors
    ///
    /// Only fatal failures are errors: an invalid URL, or a page that could not be
    /// rendered. Probe failures are recorded inside the report.
    pub async fn analyze(&self, url: &str, entitlement: &Entitlement) -> Result<Report, AnalysisError> {
        self.analyze_with_cancellation(url, entitlement, &CancellationToken::new())
            .await
    }

    /// Like [`Analyzer::analyze`], but stops as soon as `token` is cancelled.
    ///
    /// In-flight fetches are dropped and nothing is written to the cache.
    ///
    /// # Errors
    ///
    /// Returns `AnalysisError::Cancelled` when the token fires first.
    pub async fn analyze_with_cancellation(
        &self,
        url: &str,
        entitlement: &Entitlement,
        token: &CancellationToken,
    ) -> Result<Report, AnalysisError> {
        tokio::select! {
            biased;
            _ = token.cancelled() => {
                log::info!("Analysis of {} cancelled", url);
                Err(AnalysisError::Cancelled)
            }
            result = self.run(url, entitlement.plan) => result,
        }
    }

    async fn run(&self, url: &str, plan: Plan) -> Result<Report, AnalysisError> {
        let mut target = validate_target_url(url, self.settings.allow_private_hosts)?;
        target.set_fragment(None);

        let key = self.cache.key(target.as_str(), plan, Utc::now());
        if let Some(cached) = self.cache.get(&key) {
            log::info!("Serving crawl of {} from cache", target);
            return Ok(self.assemble(&target, plan, cached.snapshot, cached.aux, true));
        }

        let options = self.settings.render_options(plan);
        let snapshot = Arc::new(render_page(&self.renderer, &target, &options).await?);
        let aux = Arc::new(collect_aux(&self.probe, &target, &snapshot, plan, &self.settings).await);

        self.cache.insert(
            key,
            CachedCrawl {
                snapshot: Arc::clone(&snapshot),
                aux: Arc::clone(&aux),
            },
        );

        let report = self.assemble(&target, plan, snapshot, aux, false);
        log::info!(
            "Analysed {}: overall score {} ({} findings)",
            report.url,
            report.overall_score,
            report.summary.total()
        );
        Ok(report)
    }

    /// Stages 5-7: rules, aggregation, assembly.
    fn assemble(
        &self,
        target: &Url,
        plan: Plan,
        snapshot: Arc<PageSnapshot>,
        aux: Arc<AuxData>,
        from_cache: bool,
    ) -> Report {
        let document = PageDocument::parse(&snapshot.html);
        let ctx = RuleContext {
            document: &document,
            snapshot: &snapshot,
            aux: &aux,
            target_url: target.as_str(),
            plan,
            robots_agent: &self.settings.robots_agent,
        };

        let categories = build_categories(evaluate_rules(RULES, &ctx, &self.settings.skip));
        let scores: Vec<u8> = categories.iter().map(|c| c.score).collect();

        Report {
            schema_version: REPORT_SCHEMA_VERSION,
            url: target.to_string(),
            timestamp: Utc::now(),
            plan,
            from_cache,
            overall_score: overall_score(&scores),
            summary: FindingSummary::from_categories(&categories),
            categories,
            snapshot,
            aux,
        }
    }
}
