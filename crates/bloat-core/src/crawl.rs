use crate::config::{ArtifactLayout, ArtifactPaths};
use serde::Serialize;
use std::fs;
use std::path::Path;

/// Which of a URL's expected artifacts are present and readable
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CrawlOutputState {
    pub dir: bool,
    pub aft_screenshot: bool,
    pub full_screenshot: bool,
}

impl CrawlOutputState {
    pub fn probe(paths: &ArtifactPaths) -> Self {
        Self {
            dir: is_readable_dir(&paths.dir),
            aft_screenshot: is_readable_file(&paths.aft_screenshot),
            full_screenshot: is_readable_file(&paths.full_screenshot),
        }
    }

    pub fn is_complete(&self) -> bool {
        self.dir && self.aft_screenshot && self.full_screenshot
    }
}

/// Decides which URLs of a batch still need to be crawled
///
/// Only existence and readability are checked; file contents are not validated.
#[derive(Debug, Clone)]
pub struct CrawlPlanner {
    layout: ArtifactLayout,
}

impl CrawlPlanner {
    pub fn new(layout: ArtifactLayout) -> Self {
        Self { layout }
    }

    pub fn probe(&self, url: &str) -> CrawlOutputState {
        match self.layout.paths_for(url) {
            Ok(paths) => CrawlOutputState::probe(&paths),
            Err(e) => {
                tracing::warn!("Cannot locate artifacts for {}: {}", url, e);
                CrawlOutputState::default()
            }
        }
    }

    pub fn needs_retry(&self, url: &str) -> bool {
        !self.probe(url).is_complete()
    }

    /// URLs missing any artifact, in their original order
    pub fn pending<I, S>(&self, urls: I) -> Vec<String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut total = 0usize;
        let pending: Vec<String> = urls
            .into_iter()
            .inspect(|_| total += 1)
            .filter(|url| self.needs_retry(url.as_ref()))
            .map(|url| url.as_ref().to_string())
            .collect();

        tracing::info!(
            "{} of {} URLs need crawling under {}",
            pending.len(),
            total,
            self.layout.root().display()
        );

        pending
    }
}

fn is_readable_dir(path: &Path) -> bool {
    fs::read_dir(path).is_ok()
}

fn is_readable_file(path: &Path) -> bool {
    path.is_file() && fs::File::open(path).is_ok()
}
