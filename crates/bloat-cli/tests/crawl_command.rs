use assert_cmd::Command;
use async_trait::async_trait;
use bloat_browser::{CaptureSummary, Error, PageDriver};
use bloat_cli::batch::{crawl_batch, ensure_any_succeeded, failure_count};
use bloat_core::config::{AnalysisConfig, ArtifactPaths};
use indicatif::ProgressBar;
use predicates::prelude::*;
use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;

#[allow(deprecated)]
fn get_bloat_bin() -> PathBuf {
    assert_cmd::cargo::cargo_bin("bloat")
}

fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .unwrap()
        .parent()
        .unwrap()
        .join("tests")
        .join("fixtures")
        .join(name)
}

/// Writes the sample trace and fixed-size screenshots instead of driving Chrome
struct FakeDriver {
    failing_host: Option<&'static str>,
    visited: Mutex<Vec<String>>,
}

impl FakeDriver {
    fn new() -> Self {
        Self {
            failing_host: None,
            visited: Mutex::new(Vec::new()),
        }
    }

    fn failing_on(host: &'static str) -> Self {
        Self {
            failing_host: Some(host),
            visited: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl PageDriver for FakeDriver {
    async fn capture(
        &self,
        url: &str,
        paths: &ArtifactPaths,
    ) -> bloat_browser::Result<CaptureSummary> {
        self.visited.lock().unwrap().push(url.to_string());

        if self.failing_host.is_some_and(|host| url.contains(host)) {
            return Err(Error::Timeout {
                url: url.to_string(),
                seconds: 30,
            });
        }

        fs::create_dir_all(&paths.dir)?;
        fs::copy(fixture_path("sample-trace.json"), &paths.trace)?;
        fs::write(&paths.aft_screenshot, vec![0u8; 3500])?;
        fs::write(&paths.full_screenshot, vec![0u8; 14000])?;

        Ok(CaptureSummary {
            url: url.to_string(),
            events: 14,
        })
    }
}

#[tokio::test]
async fn test_crawl_captures_then_analyzes() {
    let root = tempfile::tempdir().unwrap();
    let config = AnalysisConfig::new(root.path());
    let driver = FakeDriver::new();
    let urls = vec!["https://news.test/".to_string()];

    let outcomes = crawl_batch(&driver, &config, &urls, &ProgressBar::hidden()).await;

    assert_eq!(outcomes.len(), 1);
    let report = outcomes[0].report().expect("page should analyze");
    assert_eq!(report.stats.total.encoded_bytes(), 7000);
    assert_eq!(report.score.aft, 2.0);
    assert_eq!(report.score.full, 0.5);

    let dir = root.path().join("news.test");
    assert!(dir.join("trace.json").is_file());
    assert!(dir.join("screenshot_aft.png").is_file());
    assert!(dir.join("screenshot_full.png").is_file());
}

#[tokio::test]
async fn test_crawl_failure_does_not_stop_batch() {
    let root = tempfile::tempdir().unwrap();
    let config = AnalysisConfig::new(root.path());
    let driver = FakeDriver::failing_on("slow.test");
    let urls = vec![
        "https://slow.test/".to_string(),
        "https://news.test/".to_string(),
    ];

    let outcomes = crawl_batch(&driver, &config, &urls, &ProgressBar::hidden()).await;

    assert_eq!(*driver.visited.lock().unwrap(), urls);
    assert_eq!(failure_count(&outcomes), 1);
    assert_eq!(outcomes[0].url(), "https://slow.test/");
    assert!(outcomes[0].report().is_none());
    assert!(outcomes[1].report().is_some());
    assert!(ensure_any_succeeded(&outcomes).is_ok());
}

#[tokio::test]
async fn test_crawl_fails_when_every_url_fails() {
    let root = tempfile::tempdir().unwrap();
    let config = AnalysisConfig::new(root.path());
    let driver = FakeDriver::failing_on(".test");
    let urls = vec!["https://a.test/".to_string(), "https://b.test/".to_string()];

    let outcomes = crawl_batch(&driver, &config, &urls, &ProgressBar::hidden()).await;

    assert_eq!(failure_count(&outcomes), 2);
    let err = ensure_any_succeeded(&outcomes).unwrap_err();
    assert!(err.to_string().contains("All 2 URLs failed"));
}

#[test]
fn test_crawl_command_help() {
    let mut cmd = Command::new(get_bloat_bin());
    cmd.arg("crawl").arg("--help");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("--retry"))
        .stdout(predicate::str::contains("--output-dir"))
        .stdout(predicate::str::contains("--chrome-path"))
        .stdout(predicate::str::contains("--url-file"));
}

#[test]
fn test_crawl_retry_with_nothing_pending_skips_chrome() {
    let root = tempfile::tempdir().unwrap();
    let dir = root.path().join("a.test");
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("screenshot_aft.png"), b"png").unwrap();
    fs::write(dir.join("screenshot_full.png"), b"png").unwrap();

    let mut cmd = Command::new(get_bloat_bin());
    cmd.arg("crawl")
        .arg("--retry")
        .arg("--output-dir")
        .arg(root.path())
        .arg("--chrome-path")
        .arg("/nonexistent/chrome")
        .arg("https://a.test/");

    cmd.assert()
        .success()
        .stderr(predicate::str::contains("Nothing to crawl"));
}

#[test]
fn test_crawl_retry_json_stdout_is_a_report() {
    let root = tempfile::tempdir().unwrap();
    let dir = root.path().join("a.test");
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("screenshot_aft.png"), b"png").unwrap();
    fs::write(dir.join("screenshot_full.png"), b"png").unwrap();

    let mut cmd = Command::new(get_bloat_bin());
    cmd.arg("crawl")
        .arg("--retry")
        .arg("--format")
        .arg("json")
        .arg("--output-dir")
        .arg(root.path())
        .arg("https://a.test/");

    let output = cmd.assert().success().get_output().stdout.clone();
    let report: serde_json::Value = serde_json::from_slice(&output).unwrap();

    assert_eq!(report["pages"], serde_json::json!([]));
    assert!(report["generated_at"].is_string());
}
