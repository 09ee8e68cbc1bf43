use anyhow::Result;
use bloat_browser::PageDriver;
use bloat_core::config::AnalysisConfig;
use bloat_core::pipeline::{PageReport, analyze_page};
use indicatif::ProgressBar;
use serde::Serialize;

/// Result of processing one URL of a batch
#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PageOutcome {
    Analyzed(PageReport),
    Failed { url: String, error: String },
}

impl PageOutcome {
    fn from_result(url: &str, result: Result<PageReport>) -> Self {
        match result {
            Ok(report) => PageOutcome::Analyzed(report),
            Err(e) => {
                tracing::warn!("Skipping {}: {:#}", url, e);
                PageOutcome::Failed {
                    url: url.to_string(),
                    error: format!("{:#}", e),
                }
            }
        }
    }

    pub fn url(&self) -> &str {
        match self {
            PageOutcome::Analyzed(report) => &report.url,
            PageOutcome::Failed { url, .. } => url,
        }
    }

    pub fn report(&self) -> Option<&PageReport> {
        match self {
            PageOutcome::Analyzed(report) => Some(report),
            PageOutcome::Failed { .. } => None,
        }
    }
}

/// Analyze already-captured artifacts for each URL, one after another
pub fn analyze_batch(config: &AnalysisConfig, urls: &[String]) -> Vec<PageOutcome> {
    urls.iter()
        .map(|url| {
            let result = analyze_page(config, url).map_err(anyhow::Error::from);
            PageOutcome::from_result(url, result)
        })
        .collect()
}

/// Capture then analyze each URL, one after another
///
/// A URL that fails to load or analyze is recorded as failed and the batch
/// moves on to the next one.
pub async fn crawl_batch<D>(
    driver: &D,
    config: &AnalysisConfig,
    urls: &[String],
    progress: &ProgressBar,
) -> Vec<PageOutcome>
where
    D: PageDriver + ?Sized,
{
    let mut outcomes = Vec::with_capacity(urls.len());

    for url in urls {
        progress.set_message(url.clone());
        let result = capture_and_analyze(driver, config, url).await;
        outcomes.push(PageOutcome::from_result(url, result));
        progress.inc(1);
    }

    progress.finish_and_clear();
    outcomes
}

async fn capture_and_analyze<D>(driver: &D, config: &AnalysisConfig, url: &str) -> Result<PageReport>
where
    D: PageDriver + ?Sized,
{
    let paths = config.layout.paths_for(url)?;
    let summary = driver.capture(url, &paths).await?;
    tracing::debug!("Captured {} network events for {}", summary.events, summary.url);
    Ok(analyze_page(config, url)?)
}

/// Number of failed URLs in a batch
pub fn failure_count(outcomes: &[PageOutcome]) -> usize {
    outcomes.iter().filter(|o| o.report().is_none()).count()
}

/// A batch fails as a whole only when no URL succeeded
pub fn ensure_any_succeeded(outcomes: &[PageOutcome]) -> Result<()> {
    let failures = failure_count(outcomes);
    if !outcomes.is_empty() && failures == outcomes.len() {
        anyhow::bail!("All {} URLs failed", failures);
    }
    Ok(())
}
