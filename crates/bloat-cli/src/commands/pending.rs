use crate::OutputFormat;
use crate::report;
use anyhow::Result;
use bloat_core::config::ArtifactLayout;
use bloat_core::crawl::CrawlPlanner;
use std::path::Path;

/// URLs whose artifacts are missing or unreadable under `output_dir`
pub fn pending_urls(urls: &[String], output_dir: &Path) -> Vec<String> {
    CrawlPlanner::new(ArtifactLayout::new(output_dir)).pending(urls)
}

pub fn execute(urls: &[String], output_dir: &Path, format: OutputFormat) -> Result<()> {
    let pending = pending_urls(urls, output_dir);
    print!("{}", report::render_pending(&pending, format)?);
    Ok(())
}
