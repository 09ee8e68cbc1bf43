use crate::classify::ResourceClassifier;
use crate::{Error, Result};
use std::path::{Path, PathBuf};
use url::Url;

pub const AFT_SCREENSHOT_FILE: &str = "screenshot_aft.png";
pub const FULL_SCREENSHOT_FILE: &str = "screenshot_full.png";
pub const TRACE_FILE: &str = "trace.json";

/// Settings for analyzing captured pages
#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    pub layout: ArtifactLayout,
    pub classifier: ResourceClassifier,
}

impl AnalysisConfig {
    pub fn new(output_root: impl Into<PathBuf>) -> Self {
        Self {
            layout: ArtifactLayout::new(output_root),
            classifier: ResourceClassifier::builtin(),
        }
    }

    pub fn with_classifier(mut self, classifier: ResourceClassifier) -> Self {
        self.classifier = classifier;
        self
    }
}

/// Where a URL's capture artifacts live: `{root}/{host}/...`
#[derive(Debug, Clone)]
pub struct ArtifactLayout {
    root: PathBuf,
}

impl ArtifactLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn paths_for(&self, url: &str) -> Result<ArtifactPaths> {
        let host = url_host(url)?;
        Ok(ArtifactPaths::in_dir(self.root.join(host)))
    }
}

/// Expected artifact paths for one URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPaths {
    pub dir: PathBuf,
    pub aft_screenshot: PathBuf,
    pub full_screenshot: PathBuf,
    pub trace: PathBuf,
}

impl ArtifactPaths {
    pub fn in_dir(dir: PathBuf) -> Self {
        Self {
            aft_screenshot: dir.join(AFT_SCREENSHOT_FILE),
            full_screenshot: dir.join(FULL_SCREENSHOT_FILE),
            trace: dir.join(TRACE_FILE),
            dir,
        }
    }
}

/// Add an https scheme to bare host names
pub fn normalize_url(url: &str) -> String {
    let url = url.trim();
    if url.starts_with("http://") || url.starts_with("https://") {
        url.to_string()
    } else {
        format!("https://{}", url)
    }
}

/// Host component of a URL, lowercased
pub fn url_host(url: &str) -> Result<String> {
    let parsed = Url::parse(&normalize_url(url)).map_err(|e| Error::InvalidUrl {
        url: url.to_string(),
        reason: e.to_string(),
    })?;

    match parsed.host_str() {
        Some(host) if !host.is_empty() => Ok(host.to_string()),
        _ => Err(Error::InvalidUrl {
            url: url.to_string(),
            reason: "no host".to_string(),
        }),
    }
}
