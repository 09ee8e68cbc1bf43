use crate::OutputFormat;
use crate::batch::{crawl_batch, ensure_any_succeeded};
use crate::commands::pending::pending_urls;
use crate::report;
use anyhow::Result;
use bloat_browser::{CaptureOptions, CdpPageDriver};
use bloat_core::config::AnalysisConfig;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use std::time::Duration;

pub fn execute(
    urls: Vec<String>,
    output_dir: &Path,
    retry: bool,
    options: CaptureOptions,
    format: OutputFormat,
) -> Result<()> {
    let urls = if retry {
        let pending = pending_urls(&urls, output_dir);
        tracing::info!(
            "Retry mode: {} of {} URLs still need crawling",
            pending.len(),
            urls.len()
        );
        pending
    } else {
        urls
    };

    if urls.is_empty() {
        tracing::info!("Nothing to crawl");
        print!("{}", report::render(&[], format)?);
        return Ok(());
    }

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    let result = runtime.block_on(async {
        let config = AnalysisConfig::new(output_dir);

        tracing::info!("Launching Chrome");
        let driver = CdpPageDriver::launch(options).await?;

        let progress = progress_bar(urls.len() as u64)?;
        let outcomes = crawl_batch(&driver, &config, &urls, &progress).await;

        if let Err(e) = driver.close().await {
            tracing::warn!("Chrome did not shut down cleanly: {}", e);
        }

        print!("{}", report::render(&outcomes, format)?);
        ensure_any_succeeded(&outcomes)
    });

    // Don't hang on the browser's blocking tasks
    runtime.shutdown_timeout(Duration::from_millis(100));

    result
}

fn progress_bar(len: u64) -> Result<ProgressBar> {
    let progress = ProgressBar::new(len);
    progress.set_style(
        ProgressStyle::with_template("{spinner} [{pos}/{len}] {wide_msg}")?
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏ "),
    );
    progress.enable_steady_tick(Duration::from_millis(120));
    Ok(progress)
}
