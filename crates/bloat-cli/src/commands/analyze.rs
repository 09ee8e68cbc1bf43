use crate::OutputFormat;
use crate::batch::{PageOutcome, analyze_batch, ensure_any_succeeded};
use crate::report;
use anyhow::Result;
use bloat_core::config::AnalysisConfig;
use std::path::Path;

/// Analyze previously captured artifacts without launching a browser
pub fn analyze_urls(urls: &[String], output_dir: &Path) -> Vec<PageOutcome> {
    let config = AnalysisConfig::new(output_dir);
    analyze_batch(&config, urls)
}

pub fn execute(urls: &[String], output_dir: &Path, format: OutputFormat) -> Result<()> {
    tracing::info!(
        "Analyzing {} URLs from {}",
        urls.len(),
        output_dir.display()
    );

    let outcomes = analyze_urls(urls, output_dir);
    print!("{}", report::render(&outcomes, format)?);

    ensure_any_succeeded(&outcomes)
}
