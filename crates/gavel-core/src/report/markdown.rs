//! Markdown reporter: the review-comment format reviewers paste into a PR.

use super::{Report, ReportError, Reporter};
use crate::evaluator::Finding;

/// Markdown reporter with the three-bucket review layout.
pub struct MarkdownReporter;

impl MarkdownReporter {
    fn bucket(&self, out: &mut String, heading: &str, findings: &[Finding], empty_note: &str) {
        out.push_str("## ");
        out.push_str(heading);
        out.push_str("\n\n");

        if findings.is_empty() {
            out.push_str("_");
            out.push_str(empty_note);
            out.push_str("_\n\n");
            return;
        }

        for finding in findings {
            let loc = finding.location();
            out.push_str(&format!(
                "- **[{}]** {} (`{}:{}`)\n",
                finding.rule_id, finding.message, loc.file, loc.line
            ));
        }
        out.push('\n');
    }
}

impl Reporter for MarkdownReporter {
    fn name(&self) -> &'static str {
        "markdown"
    }

    fn generate(&self, report: &Report) -> Result<String, ReportError> {
        let mut out = String::new();

        self.bucket(
            &mut out,
            "Required Changes (Blocking)",
            &report.blocking,
            "No blocking issues found.",
        );
        self.bucket(
            &mut out,
            "Suggested Improvements (Non-blocking)",
            &report.suggested,
            "No suggestions.",
        );
        self.bucket(
            &mut out,
            "Positive Feedback",
            &report.positive,
            "No notable positives recorded.",
        );

        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::facts::Location;
    use crate::registry::{Category, Severity};
    use smallvec::smallvec;

    #[test]
    fn test_markdown_buckets_and_headings() {
        let report = Report {
            blocking: vec![Finding {
                rule_id: "R-SDI-110".into(),
                category: Category::SpringDi,
                severity: Severity::Blocking,
                message: "Field 'repo' in OrderService is injected with @Autowired".into(),
                locations: smallvec![Location {
                    file: "OrderService.java".into(),
                    line: 12,
                    column: 4
                }],
                fingerprint: 1,
            }],
            suggested: Vec::new(),
            positive: Vec::new(),
        };

        let text = MarkdownReporter.generate(&report).unwrap();
        assert!(text.contains("## Required Changes (Blocking)"));
        assert!(text.contains("## Suggested Improvements (Non-blocking)"));
        assert!(text.contains("## Positive Feedback"));
        assert!(text.contains("R-SDI-110"));
        assert!(text.contains("`OrderService.java:12`"));
        assert!(text.contains("_No suggestions._"));
    }
}
