//! Output module for persisting check results
//!
//! This module handles:
//! - Writing structured JSON artifacts per check
//! - Appending human-readable lines to the running Markdown summary
//! - Publishing a crawl report through a [`ReportSink`]

mod files;
mod markdown;
mod traits;

pub use files::FileReportSink;
pub use markdown::{crawl_summary_lines, findings_lines, TOP_FINDINGS};
pub use traits::{OutputError, OutputResult, ReportSink};

use crate::crawler::CrawlReport;
use serde::Serialize;

/// Artifact name of the crawl report
pub const SEO_CRAWLER_ARTIFACT: &str = "seo_crawler";

/// Name of the running Markdown summary
pub const SUMMARY: &str = "summary";

/// Serializes `value` and saves it as the artifact `name`
pub fn save_artifact<T: Serialize>(
    sink: &dyn ReportSink,
    name: &str,
    value: &T,
) -> OutputResult<()> {
    let value = serde_json::to_value(value)?;
    sink.save_json(name, &value)
}

/// Appends every line to the running summary
pub fn append_summary(sink: &dyn ReportSink, lines: &[String]) -> OutputResult<()> {
    for line in lines {
        sink.append_markdown(SUMMARY, line)?;
    }
    Ok(())
}

/// Persists a crawl report: the `seo_crawler` artifact plus its summary lines
pub fn publish_crawl_report(sink: &dyn ReportSink, report: &CrawlReport) -> OutputResult<()> {
    save_artifact(sink, SEO_CRAWLER_ARTIFACT, report)?;
    append_summary(sink, &crawl_summary_lines(report))
}
