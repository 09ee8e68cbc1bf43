use bloat_cli::batch::PageOutcome;
use bloat_cli::commands::analyze::analyze_urls;
use bloat_core::classify::{CSS, HTML, JAVASCRIPT};
use bloat_core::config::ArtifactLayout;
use std::fs;
use std::path::{Path, PathBuf};

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

/// Lay out a crawled page the way a crawl leaves it
fn seed_artifacts(root: &Path, url: &str, screenshots: Option<(usize, usize)>) {
    let paths = ArtifactLayout::new(root).paths_for(url).unwrap();
    fs::create_dir_all(&paths.dir).unwrap();
    fs::copy(fixture_path("sample-trace.json"), &paths.trace).unwrap();
    if let Some((aft, full)) = screenshots {
        fs::write(&paths.aft_screenshot, vec![0u8; aft]).unwrap();
        fs::write(&paths.full_screenshot, vec![0u8; full]).unwrap();
    }
}

#[test]
fn test_analyze_reports_weight_by_type() {
    let root = tempfile::tempdir().unwrap();
    seed_artifacts(root.path(), "https://news.test/", Some((3500, 14000)));

    let outcomes = analyze_urls(&["https://news.test/".to_string()], root.path());

    assert_eq!(outcomes.len(), 1);
    let report = outcomes[0].report().expect("page should analyze");

    // Failed CSS and the finish without a start are not counted
    assert_eq!(report.stats.total.count(), 3);
    assert_eq!(report.stats.total.encoded_bytes(), 7000);
    assert_eq!(report.stats.total.decoded_bytes(), 22000);

    let html = report.stats.category(HTML).unwrap();
    assert_eq!(html.encoded_bytes(), 4000);

    let javascript = report.stats.category(JAVASCRIPT).unwrap();
    assert_eq!(javascript.count(), 2);
    assert_eq!(javascript.encoded_bytes(), 3000);
    assert_eq!(
        javascript.largest().unwrap().url,
        "https://cdn.test/vendor.js"
    );

    let percent = javascript.percent_of(&report.stats.total);
    assert_eq!(percent.encoded, 42.86);

    assert_eq!(report.stats.category(CSS).unwrap().count(), 0);
}

#[test]
fn test_analyze_scores_against_screenshots() {
    let root = tempfile::tempdir().unwrap();
    seed_artifacts(root.path(), "https://news.test/", Some((3500, 14000)));

    let outcomes = analyze_urls(&["https://news.test/".to_string()], root.path());
    let report = outcomes[0].report().unwrap();

    assert_eq!(report.score.aft, 2.0);
    assert_eq!(report.score.full, 0.5);
}

#[test]
fn test_analyze_without_screenshots_is_unavailable() {
    let root = tempfile::tempdir().unwrap();
    seed_artifacts(root.path(), "https://news.test/", None);

    let outcomes = analyze_urls(&["https://news.test/".to_string()], root.path());
    let report = outcomes[0].report().unwrap();

    assert_eq!(report.stats.total.encoded_bytes(), 7000);
    assert_eq!(report.score.aft, -1.0);
    assert_eq!(report.score.full, -1.0);
}

#[test]
fn test_analyze_continues_past_bad_pages() {
    let root = tempfile::tempdir().unwrap();
    seed_artifacts(root.path(), "https://news.test/", Some((3500, 14000)));

    let broken = ArtifactLayout::new(root.path())
        .paths_for("https://broken.test/")
        .unwrap();
    fs::create_dir_all(&broken.dir).unwrap();
    fs::write(&broken.trace, "not json").unwrap();

    let urls = vec![
        "https://broken.test/".to_string(),
        "https://news.test/".to_string(),
    ];
    let outcomes = analyze_urls(&urls, root.path());

    assert_eq!(outcomes.len(), 2);
    assert!(matches!(outcomes[0], PageOutcome::Failed { .. }));
    assert_eq!(outcomes[0].url(), "https://broken.test/");
    assert!(outcomes[1].report().is_some());
}
