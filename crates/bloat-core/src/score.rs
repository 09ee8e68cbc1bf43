use serde::Serialize;
use std::fs::File;
use std::path::Path;

/// Score value meaning "could not be computed"
pub const UNAVAILABLE: f64 = -1.0;

/// Transferred bytes per screenshot byte; higher means more bloat
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BloatScore {
    /// Against the above-the-fold screenshot
    pub aft: f64,
    /// Against the full-page screenshot
    pub full: f64,
}

impl BloatScore {
    pub const UNAVAILABLE: BloatScore = BloatScore {
        aft: UNAVAILABLE,
        full: UNAVAILABLE,
    };

    /// Score a page from its screenshot files
    ///
    /// Both fields are unavailable if either screenshot cannot be read.
    pub fn compute(total_encoded_bytes: u64, aft_screenshot: &Path, full_screenshot: &Path) -> Self {
        let (Some(aft_bytes), Some(full_bytes)) = (
            screenshot_size(aft_screenshot),
            screenshot_size(full_screenshot),
        ) else {
            return Self::UNAVAILABLE;
        };

        let score = Self::from_sizes(total_encoded_bytes, aft_bytes, full_bytes);
        tracing::debug!(
            "Bloat score: aft={:.2} full={:.2} ({} bytes transferred)",
            score.aft,
            score.full,
            total_encoded_bytes
        );
        score
    }

    /// Score a page from known screenshot sizes; an empty screenshot scores unavailable
    pub fn from_sizes(total_encoded_bytes: u64, aft_bytes: u64, full_bytes: u64) -> Self {
        if aft_bytes == 0 || full_bytes == 0 {
            tracing::warn!("Empty screenshot, bloat score unavailable");
            return Self::UNAVAILABLE;
        }
        let total = total_encoded_bytes as f64;
        Self {
            aft: total / aft_bytes as f64,
            full: total / full_bytes as f64,
        }
    }

    pub fn is_available(&self) -> bool {
        self.aft != UNAVAILABLE && self.full != UNAVAILABLE
    }
}

/// Byte length of a readable regular file
fn screenshot_size(path: &Path) -> Option<u64> {
    let metadata = File::open(path).and_then(|file| file.metadata());
    match metadata {
        Ok(metadata) if metadata.is_file() => Some(metadata.len()),
        Ok(_) => {
            tracing::warn!("Screenshot {} is not a file", path.display());
            None
        }
        Err(e) => {
            tracing::warn!("Screenshot {} unavailable: {}", path.display(), e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write_file(dir: &Path, name: &str, len: usize) -> std::path::PathBuf {
        let path = dir.join(name);
        fs::write(&path, vec![0u8; len]).unwrap();
        path
    }

    #[test]
    fn test_scores_from_file_sizes() {
        let dir = tempfile::tempdir().unwrap();
        let aft = write_file(dir.path(), "aft.png", 200_000);
        let full = write_file(dir.path(), "full.png", 400_000);

        let score = BloatScore::compute(500_000, &aft, &full);

        assert_eq!(score.aft, 2.5);
        assert_eq!(score.full, 1.25);
        assert!(score.is_available());
    }

    #[test]
    fn test_missing_aft_makes_both_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let full = write_file(dir.path(), "full.png", 400_000);

        let score = BloatScore::compute(500_000, &dir.path().join("aft.png"), &full);

        assert_eq!(score.aft, -1.0);
        assert_eq!(score.full, -1.0);
        assert!(!score.is_available());
    }

    #[test]
    fn test_missing_full_makes_both_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let aft = write_file(dir.path(), "aft.png", 200_000);

        let score = BloatScore::compute(500_000, &aft, &dir.path().join("full.png"));

        assert_eq!(score, BloatScore::UNAVAILABLE);
    }

    #[test]
    fn test_directory_is_not_a_screenshot() {
        let dir = tempfile::tempdir().unwrap();
        let full = write_file(dir.path(), "full.png", 10);

        let score = BloatScore::compute(10, dir.path(), &full);

        assert_eq!(score, BloatScore::UNAVAILABLE);
    }

    #[test]
    fn test_empty_screenshot_is_unavailable() {
        assert_eq!(BloatScore::from_sizes(100, 0, 50), BloatScore::UNAVAILABLE);
    }

    #[test]
    fn test_no_transfer_scores_zero() {
        let score = BloatScore::from_sizes(0, 10, 20);
        assert_eq!(score.aft, 0.0);
        assert_eq!(score.full, 0.0);
    }

    #[cfg(unix)]
    #[test]
    fn test_unreadable_screenshot_is_unavailable() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let aft = dir.path().join("aft.png");
        let full = dir.path().join("full.png");
        fs::write(&aft, vec![0u8; 100]).unwrap();
        fs::write(&full, vec![0u8; 400]).unwrap();
        fs::set_permissions(&full, fs::Permissions::from_mode(0o000)).unwrap();

        // Permission bits are not enforced for root
        if fs::File::open(&full).is_ok() {
            return;
        }

        assert_eq!(BloatScore::compute(1000, &aft, &full), BloatScore::UNAVAILABLE);
    }
}
