//! The training evaluation report.
//!
//! Built incrementally from instructor records, in acceptance order, and
//! persisted once at session end: a header plus a numbered list of
//! evaluation comments. The only persisted artifact.

use super::evaluator::EvaluationRecord;
use anyhow::{Context, Result};
use std::path::Path;

#[derive(Debug, Default)]
pub struct Report {
    records: Vec<EvaluationRecord>,
}

impl Report {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, record: EvaluationRecord) {
        self.records.push(record);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[EvaluationRecord] {
        &self.records
    }

    /// Render the report as markdown.
    pub fn render(&self) -> String {
        let mut out = format!(
            "# Training Evaluation Report\n\nGenerated: {}\n\n## Instructor Comments\n",
            chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
        );
        for (i, record) in self.records.iter().enumerate() {
            out.push_str(&format!("{}. {}", i + 1, record.to_comment()));
        }
        out
    }

    /// Write the report file. Called once, at session end.
    pub fn save(&self, path: &Path) -> Result<()> {
        std::fs::write(path, self.render())
            .with_context(|| format!("Failed to write report to {}", path.display()))?;
        tracing::info!("Evaluation report written to {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::evaluator::parse_record;

    #[test]
    fn renders_numbered_comments_in_order() {
        let mut report = Report::new();
        report.push(parse_record("user", "relevance: 9 | clear briefing"));
        report.push(parse_record("Bob", "relevance: 7 | solid plan"));

        let rendered = report.render();
        assert!(rendered.starts_with("# Training Evaluation Report"));
        let user_pos = rendered.find("1. **user**").unwrap();
        let bob_pos = rendered.find("2. **Bob**").unwrap();
        assert!(user_pos < bob_pos);
    }

    #[test]
    fn saves_to_disk_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.md");

        let mut report = Report::new();
        report.push(parse_record("Steve", "relevance: 6 | fine"));
        report.save(&path).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.contains("Instructor Comments"));
        assert!(written.contains("**Steve**"));
    }
}
