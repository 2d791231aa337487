//! Console reporter: human-readable output with color codes.

use super::{Report, ReportError, Reporter};
use crate::evaluator::Finding;
use crate::registry::Severity;

/// Console reporter for human-readable terminal output.
pub struct ConsoleReporter {
    pub use_color: bool,
}

impl ConsoleReporter {
    pub fn new(use_color: bool) -> Self {
        Self { use_color }
    }

    fn severity_prefix(&self, severity: &Severity) -> &'static str {
        match severity {
            Severity::Blocking => "blocking",
            Severity::Suggested => "suggested",
            Severity::Positive => "positive",
        }
    }

    fn color_start(&self, severity: &Severity) -> &'static str {
        if !self.use_color {
            return "";
        }
        match severity {
            Severity::Blocking => "\x1b[31m",  // red
            Severity::Suggested => "\x1b[33m", // yellow
            Severity::Positive => "\x1b[32m",  // green
        }
    }

    fn color_end(&self) -> &'static str {
        if self.use_color {
            "\x1b[0m"
        } else {
            ""
        }
    }

    fn section(&self, out: &mut String, label: &str, findings: &[Finding]) {
        out.push_str(&format!("── {} ({}) ──\n", label, findings.len()));
        for finding in findings {
            let loc = finding.location();
            let cs = self.color_start(&finding.severity);
            let ce = self.color_end();
            out.push_str(&format!(
                "  {}{}{}: {}:{}: [{}] {}\n",
                cs,
                self.severity_prefix(&finding.severity),
                ce,
                loc.file,
                loc.line,
                finding.rule_id,
                finding.message,
            ));
        }
        out.push('\n');
    }
}

impl Default for ConsoleReporter {
    fn default() -> Self {
        Self::new(true)
    }
}

impl Reporter for ConsoleReporter {
    fn name(&self) -> &'static str {
        "console"
    }

    fn generate(&self, report: &Report) -> Result<String, ReportError> {
        let mut output = String::new();

        output.push_str("╔══════════════════════════════════════════╗\n");
        output.push_str("║            Gavel Review Report           ║\n");
        output.push_str("╚══════════════════════════════════════════╝\n\n");

        self.section(&mut output, "Required Changes (Blocking)", &report.blocking);
        self.section(&mut output, "Suggested Improvements (Non-blocking)", &report.suggested);
        self.section(&mut output, "Positive Feedback", &report.positive);

        output.push_str(&format!(
            "─── Summary: {} blocking, {} suggested, {} positive ───\n",
            report.blocking.len(),
            report.suggested.len(),
            report.positive.len()
        ));

        if report.mergeable() {
            output.push_str("Result: MERGEABLE ✓\n");
        } else {
            output.push_str("Result: CHANGES REQUIRED ✗\n");
        }

        Ok(output)
    }
}
