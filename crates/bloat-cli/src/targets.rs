use anyhow::{Context, Result, bail};
use std::fs;
use std::path::Path;

/// Combine URLs given on the command line with those listed in a file
///
/// The file holds one URL per line; blank lines and `#` comments are skipped.
/// Order is preserved: arguments first, then file entries.
pub fn collect_urls(args: Vec<String>, url_file: Option<&Path>) -> Result<Vec<String>> {
    let mut urls: Vec<String> = args
        .into_iter()
        .map(|u| u.trim().to_string())
        .filter(|u| !u.is_empty())
        .collect();

    if let Some(path) = url_file {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read URL list {}", path.display()))?;
        urls.extend(parse_url_list(&content));
    }

    if urls.is_empty() {
        bail!("No URLs given. Pass URLs as arguments or use --url-file.");
    }

    tracing::debug!("Collected {} URLs", urls.len());
    Ok(urls)
}

fn parse_url_list(content: &str) -> impl Iterator<Item = String> + '_ {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
}
