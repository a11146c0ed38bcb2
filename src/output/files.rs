//! File-backed report sink
//!
//! Artifacts land in `<reports_dir>/<name>.json` as pretty-printed JSON;
//! summaries are appended to `<reports_dir>/<name>.md`.

use crate::output::traits::{validate_name, OutputResult, ReportSink};
use serde_json::Value;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

/// [`ReportSink`] writing into a directory
#[derive(Debug, Clone)]
pub struct FileReportSink {
    dir: PathBuf,
}

impl FileReportSink {
    /// Creates a sink rooted at `dir`; the directory is created on first write
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the JSON artifact `name`
    pub fn json_path(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{}.json", name))
    }

    /// Path of the Markdown summary `name`
    pub fn markdown_path(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{}.md", name))
    }
}

impl ReportSink for FileReportSink {
    fn save_json(&self, name: &str, value: &Value) -> OutputResult<()> {
        validate_name(name)?;
        fs::create_dir_all(&self.dir)?;

        let path = self.json_path(name);
        let mut content = serde_json::to_string_pretty(value)?;
        content.push('\n');
        fs::write(&path, content)?;

        tracing::debug!("Wrote {}", path.display());
        Ok(())
    }

    fn append_markdown(&self, name: &str, line: &str) -> OutputResult<()> {
        validate_name(name)?;
        fs::create_dir_all(&self.dir)?;

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(self.markdown_path(name))?;
        writeln!(file, "{}", line)?;

        Ok(())
    }
}
