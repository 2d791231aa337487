//! Feedback Formatter: buckets findings and renders reports.
//!
//! The output contract is three labeled buckets, "Required Changes
//! (Blocking)", "Suggested Improvements (Non-blocking)", and "Positive
//! Feedback", each an ordered sequence of findings. Positive entries exist
//! only for explicit positive-rule matches, never inferred from the absence
//! of negatives.

pub mod console;
pub mod markdown;

pub use console::ConsoleReporter;
pub use markdown::MarkdownReporter;

use serde::{Deserialize, Serialize};

use crate::evaluator::Finding;
use crate::registry::Severity;

/// Terminal artifact of one review run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    pub blocking: Vec<Finding>,
    pub suggested: Vec<Finding>,
    pub positive: Vec<Finding>,
}

impl Report {
    pub fn total(&self) -> usize {
        self.blocking.len() + self.suggested.len() + self.positive.len()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    /// Whether the change-set can merge as far as automated checks go.
    pub fn mergeable(&self) -> bool {
        self.blocking.is_empty()
    }
}

/// Partition findings into severity buckets, preserving evaluator order
/// within each bucket. Never drops or duplicates a finding.
pub fn format(findings: Vec<Finding>) -> Report {
    let mut report = Report::default();
    for finding in findings {
        match finding.severity {
            Severity::Blocking => report.blocking.push(finding),
            Severity::Suggested => report.suggested.push(finding),
            Severity::Positive => report.positive.push(finding),
        }
    }
    report
}

/// Rendering failures. A reporter that cannot produce output indicates a
/// logic defect and is fatal to the run.
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("{reporter} reporter failed: {reason}")]
    Render { reporter: &'static str, reason: String },
}

/// Trait for report renderers.
pub trait Reporter {
    fn name(&self) -> &'static str;
    fn generate(&self, report: &Report) -> Result<String, ReportError>;
}

/// Create a reporter by format name.
pub fn create_reporter(format: &str) -> Option<Box<dyn Reporter>> {
    match format {
        "markdown" => Some(Box::new(markdown::MarkdownReporter)),
        "console" => Some(Box::new(console::ConsoleReporter::default())),
        _ => None,
    }
}

/// List all available reporter format names.
pub fn available_formats() -> &'static [&'static str] {
    &["markdown", "console"]
}
