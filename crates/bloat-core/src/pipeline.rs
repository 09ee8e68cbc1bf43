use crate::Result;
use crate::analysis::{Analyzer, DocumentStats, PageWeightAnalyzer};
use crate::config::AnalysisConfig;
use crate::score::BloatScore;
use crate::trace::{TraceCorrelator, TraceReader};
use serde::Serialize;

/// Weight statistics and bloat score for one URL
#[derive(Debug, Clone, Serialize)]
pub struct PageReport {
    pub url: String,
    pub stats: DocumentStats,
    pub score: BloatScore,
}

/// Analyze the artifacts already captured for `url`
///
/// A page with no trace yet reports zero bytes; a page with no screenshots
/// reports an unavailable score. A trace that cannot be parsed is an error.
pub fn analyze_page(config: &AnalysisConfig, url: &str) -> Result<PageReport> {
    tracing::debug!("Analyzing captured artifacts for {}", url);

    let paths = config.layout.paths_for(url)?;
    let events = TraceReader::from_file(&paths.trace)?;
    let records = TraceCorrelator::correlate(&events)?;
    let stats = PageWeightAnalyzer::new(&config.classifier).analyze(&records)?;
    let score = BloatScore::compute(
        stats.total.encoded_bytes(),
        &paths.aft_screenshot,
        &paths.full_screenshot,
    );

    Ok(PageReport {
        url: url.to_string(),
        stats,
        score,
    })
}
