use crate::OutputFormat;
use crate::batch::PageOutcome;
use anyhow::Result;
use bloat_core::analysis::CategoryTotals;
use bloat_core::pipeline::PageReport;
use serde::Serialize;

#[derive(Serialize)]
struct JsonReport<'a> {
    generated_at: String,
    pages: &'a [PageOutcome],
}

/// Render batch results in the requested format
pub fn render(outcomes: &[PageOutcome], format: OutputFormat) -> Result<String> {
    tracing::debug!("Rendering {} results as {}", outcomes.len(), format.as_str());
    match format {
        OutputFormat::Json => format_json(outcomes),
        OutputFormat::Table => Ok(format_table(outcomes)),
        OutputFormat::Pretty => Ok(format_pretty(outcomes)),
    }
}

/// Render the retry list
pub fn render_pending(urls: &[String], format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(format!("{}\n", serde_json::to_string_pretty(urls)?)),
        OutputFormat::Pretty | OutputFormat::Table => {
            Ok(urls.iter().map(|url| format!("{}\n", url)).collect())
        }
    }
}

fn format_json(outcomes: &[PageOutcome]) -> Result<String> {
    let report = JsonReport {
        generated_at: chrono::Utc::now().to_rfc3339(),
        pages: outcomes,
    };
    Ok(format!("{}\n", serde_json::to_string_pretty(&report)?))
}

fn format_table(outcomes: &[PageOutcome]) -> String {
    let category_names: Vec<String> = outcomes
        .iter()
        .find_map(PageOutcome::report)
        .map(|report| {
            report
                .stats
                .categories
                .iter()
                .map(|c| c.name.clone())
                .collect()
        })
        .unwrap_or_default();

    let mut output = String::from("url,status,resources,encoded_bytes,decoded_bytes");
    for name in &category_names {
        output.push_str(&format!(",{}_bytes", name.to_lowercase()));
    }
    output.push_str(",aft_score,full_score,error\n");

    for outcome in outcomes {
        match outcome {
            PageOutcome::Analyzed(report) => {
                let total = &report.stats.total;
                output.push_str(&format!(
                    "{},ok,{},{},{}",
                    csv_field(&report.url),
                    total.count(),
                    total.encoded_bytes(),
                    total.decoded_bytes()
                ));
                for name in &category_names {
                    let bytes = report
                        .stats
                        .category(name)
                        .map(CategoryTotals::encoded_bytes)
                        .unwrap_or(0);
                    output.push_str(&format!(",{}", bytes));
                }
                output.push_str(&format!(",{:.2},{:.2},\n", report.score.aft, report.score.full));
            }
            PageOutcome::Failed { url, error } => {
                output.push_str(&format!("{},failed,,,", csv_field(url)));
                output.push_str(&",".repeat(category_names.len()));
                output.push_str(&format!(",,,\"{}\"\n", error.replace('"', "'")));
            }
        }
    }

    output
}

/// Quote a table cell when it would otherwise split or end the row
fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

fn format_pretty(outcomes: &[PageOutcome]) -> String {
    use console::style;

    let mut output = String::new();
    output.push_str(&format!("\n{}\n", style("Web Bloat Score Report").bold().cyan()));
    output.push_str(&format!("{}\n", style("======================").cyan()));

    for report in outcomes.iter().filter_map(PageOutcome::report) {
        output.push_str(&format_page(report));
    }

    let failures: Vec<_> = outcomes
        .iter()
        .filter_map(|o| match o {
            PageOutcome::Failed { url, error } => Some((url, error)),
            PageOutcome::Analyzed(_) => None,
        })
        .collect();

    if !failures.is_empty() {
        output.push_str(&format!("\n{}\n", style("Failed:").bold().red()));
        for (url, error) in failures {
            output.push_str(&format!("  {} {}: {}\n", style("✗").red(), url, error));
        }
    }

    output.push('\n');
    output
}

fn format_page(report: &PageReport) -> String {
    use console::style;

    let total = &report.stats.total;
    let mut output = format!("\n{}\n", style(&report.url).bold());

    output.push_str(&format!("  Resources:     {}\n", total.count()));
    output.push_str(&format!(
        "  Transferred:   {} (decoded {})\n",
        format_bytes(total.encoded_bytes()),
        format_bytes(total.decoded_bytes())
    ));

    if report.score.is_available() {
        output.push_str(&format!(
            "  Bloat score:   {} above the fold, {} full page\n",
            style(format!("{:.2}", report.score.aft)).yellow(),
            style(format!("{:.2}", report.score.full)).yellow()
        ));
    } else {
        output.push_str(&format!(
            "  Bloat score:   {}\n",
            style("unavailable (screenshots missing)").dim()
        ));
    }

    if total.count() == 0 {
        output.push_str(&format!("  {}\n", style("No resources recorded").dim()));
        return output;
    }

    output.push_str(&format!("  {}\n", style("By type:").bold()));
    for category in &report.stats.categories {
        let percent = category.percent_of(total);
        output.push_str(&format!(
            "    {:<12} {:>10} {:>7.2}%",
            category.name,
            format_bytes(category.encoded_bytes()),
            percent.encoded
        ));
        if let Some(largest) = category.largest() {
            output.push_str(&format!(
                "  largest: {} ({})",
                largest.url,
                format_bytes(largest.encoded_bytes)
            ));
        }
        output.push('\n');
    }

    let other = report.stats.uncategorized_encoded_bytes();
    if other > 0 {
        output.push_str(&format!("    {:<12} {:>10}\n", "Other", format_bytes(other)));
    }

    output
}

/// Human-readable byte size using 1024-based units
pub fn format_bytes(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["KB", "MB", "GB", "TB"];

    if bytes < 1024 {
        return format!("{} B", bytes);
    }

    let mut value = bytes as f64 / 1024.0;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    format!("{:.1} {}", value, UNITS[unit])
}
