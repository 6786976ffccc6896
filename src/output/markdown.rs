//! Markdown summary generation
//!
//! This module renders [`CrawlStatistics`] as a markdown report.

use crate::output::stats::CrawlStatistics;
use crate::output::OutputResult;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Failed URLs listed before the report truncates
const MAX_FAILED_LISTED: usize = 50;

/// Generates a markdown summary from crawl statistics
///
/// # Arguments
///
/// * `stats` - The statistics gathered during the crawl
/// * `output_path` - Path where the markdown file should be written
///
/// # Returns
///
/// * `Ok(())` - Successfully wrote markdown summary
/// * `Err(OutputError)` - Failed to write summary
pub fn generate_markdown_summary(stats: &CrawlStatistics, output_path: &Path) -> OutputResult<()> {
    let markdown = format_markdown_summary(stats);

    let mut file = File::create(output_path)?;
    file.write_all(markdown.as_bytes())?;

    tracing::info!("Wrote crawl summary to {}", output_path.display());
    Ok(())
}

/// Formats crawl statistics as markdown
pub fn format_markdown_summary(stats: &CrawlStatistics) -> String {
    let mut md = String::new();

    md.push_str("# Sitewalk Crawl Summary\n\n");

    md.push_str("## Run Information\n\n");
    md.push_str(&format!("- **Site**: {}\n", stats.site));
    md.push_str(&format!("- **Started**: {}\n", stats.started_at.to_rfc3339()));
    if let Some(finished) = &stats.finished_at {
        md.push_str(&format!("- **Finished**: {}\n", finished.to_rfc3339()));
    }
    if let Some(seconds) = stats.duration_seconds() {
        md.push_str(&format!("- **Duration**: {:.2} seconds\n", seconds));
    }
    md.push('\n');

    md.push_str("## Overall Statistics\n\n");
    md.push_str(&format!("- **Pages Fetched**: {}\n", stats.pages_fetched));
    md.push_str(&format!("- **Succeeded**: {}\n", stats.pages_succeeded));
    md.push_str(&format!("- **Failed**: {}\n", stats.pages_failed));
    md.push_str(&format!("- **Success Rate**: {:.2}%\n", stats.success_rate()));
    md.push_str(&format!("- **Links Found**: {}\n", stats.links_discovered));
    md.push_str(&format!("- **Bytes Received**: {}\n", stats.bytes_fetched));
    md.push_str(&format!(
        "- **Deepest Page**: {}\n\n",
        stats.max_depth_reached()
    ));

    if !stats.pages_by_status.is_empty() {
        md.push_str("## Status Breakdown\n\n");
        md.push_str("| Status | Pages |\n");
        md.push_str("|--------|-------|\n");
        for (status, count) in &stats.pages_by_status {
            md.push_str(&format!("| {} | {} |\n", status, count));
        }
        md.push('\n');
    }

    if !stats.pages_by_depth.is_empty() {
        md.push_str("## Depth Breakdown\n\n");
        md.push_str("| Depth | Pages |\n");
        md.push_str("|-------|-------|\n");
        for (depth, count) in &stats.pages_by_depth {
            md.push_str(&format!("| {} | {} |\n", depth, count));
        }
        md.push('\n');
    }

    if !stats.failed_urls.is_empty() {
        md.push_str("## Failed Pages\n\n");
        md.push_str("| URL | Status |\n");
        md.push_str("|-----|--------|\n");
        for (url, status) in stats.failed_urls.iter().take(MAX_FAILED_LISTED) {
            md.push_str(&format!("| {} | {} |\n", url, status));
        }
        if stats.failed_urls.len() > MAX_FAILED_LISTED {
            md.push_str(&format!(
                "\n... and {} more\n",
                stats.failed_urls.len() - MAX_FAILED_LISTED
            ));
        }
        md.push('\n');
    }

    md
}
