//! Review pipeline: Idle → Analyzing → Evaluating → Formatting → Done.
//!
//! One pass, no retries. The analyzer completes fully before evaluation
//! starts, since the evaluator needs the complete fact set. Independent
//! change-sets run in parallel over a shared read-only rule set; facts,
//! findings, and reports are confined to one run.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::analyzer::{AnalyzeError, ChangeAnalyzer, FileError};
use crate::changeset::ChangeSet;
use crate::evaluator::{self, EvalError};
use crate::registry::RuleSet;
use crate::report::{self, Report, ReportError};

/// Pipeline stages, in run order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Idle,
    Analyzing,
    Evaluating,
    Formatting,
    Done,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Idle => "idle",
            Stage::Analyzing => "analyzing",
            Stage::Evaluating => "evaluating",
            Stage::Formatting => "formatting",
            Stage::Done => "done",
        }
    }
}

/// A run failure, tagged with the stage it originated in.
/// Aggregates subsystem errors via `From` conversions.
#[derive(Debug, thiserror::Error)]
pub enum ReviewError {
    #[error("analyzing stage failed: {0}")]
    Analyze(#[from] AnalyzeError),

    #[error("evaluating stage failed: {0}")]
    Evaluate(#[from] EvalError),

    #[error("formatting stage failed: {0}")]
    Format(#[from] ReportError),
}

impl ReviewError {
    pub fn stage(&self) -> Stage {
        match self {
            ReviewError::Analyze(_) => Stage::Analyzing,
            ReviewError::Evaluate(_) => Stage::Evaluating,
            ReviewError::Format(_) => Stage::Formatting,
        }
    }
}

/// What one completed run produced. Per-file analyzer errors ride along so
/// callers can distinguish "could not analyze" from "no issues found".
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewOutcome {
    pub change_id: String,
    pub report: Report,
    pub file_errors: Vec<FileError>,
    pub files_analyzed: usize,
    pub facts_extracted: usize,
}

/// A single review run over one change-set.
pub struct ReviewRun<'a> {
    rules: &'a RuleSet,
    stage: Stage,
}

impl<'a> ReviewRun<'a> {
    pub fn new(rules: &'a RuleSet) -> Self {
        Self {
            rules,
            stage: Stage::Idle,
        }
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    /// Drive the pipeline to completion. A failure in any stage aborts the
    /// run; no partial report is emitted.
    pub fn run(&mut self, change: &ChangeSet) -> Result<ReviewOutcome, ReviewError> {
        let span = tracing::info_span!("review", change = %change.id);
        let _guard = span.enter();

        self.stage = Stage::Analyzing;
        tracing::debug!(stage = self.stage.as_str(), files = change.files.len());
        let mut analyzer = ChangeAnalyzer::new()?;
        let analysis = analyzer.analyze(change);

        self.stage = Stage::Evaluating;
        tracing::debug!(stage = self.stage.as_str(), facts = analysis.facts.len());
        let findings = evaluator::evaluate(&analysis.facts, self.rules)?;

        self.stage = Stage::Formatting;
        tracing::debug!(stage = self.stage.as_str(), findings = findings.len());
        let report = report::format(findings);

        self.stage = Stage::Done;
        tracing::info!(
            blocking = report.blocking.len(),
            suggested = report.suggested.len(),
            positive = report.positive.len(),
            "review complete"
        );

        Ok(ReviewOutcome {
            change_id: change.id.clone(),
            report,
            file_errors: analysis.file_errors,
            files_analyzed: analysis.files_analyzed,
            facts_extracted: analysis.facts.len(),
        })
    }
}

/// Review one change-set.
pub fn review(rules: &RuleSet, change: &ChangeSet) -> Result<ReviewOutcome, ReviewError> {
    ReviewRun::new(rules).run(change)
}

/// Review independent change-sets in parallel. Results come back in input
/// order; each run is isolated, so one failing change-set does not affect
/// the others.
pub fn review_all(
    rules: &RuleSet,
    changes: &[ChangeSet],
) -> Vec<Result<ReviewOutcome, ReviewError>> {
    changes
        .par_iter()
        .map(|change| ReviewRun::new(rules).run(change))
        .collect()
}
