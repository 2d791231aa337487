//! gavel-core: rule-based review evaluation for Java/Spring change-sets
//!
//! This crate turns a PR-review checklist into software:
//! - Changeset: change representations (full source or unified diff)
//! - Parsers: native tree-sitter parsing for Java
//! - Analyzer: fact extraction (robustness, immutability, types, contracts,
//!   Spring wiring and layering, transactions, test quality, naming)
//! - Registry: immutable, versioned, data-driven rule records
//! - Evaluator: deterministic fact-to-finding matching
//! - Report: three-bucket feedback formatting and rendering
//! - Skill: checklist-document front matter and advisory rules
//! - Review: the single-pass pipeline tying the stages together

pub mod analyzer;
pub mod changeset;
pub mod evaluator;
pub mod facts;
pub mod parsers;
pub mod registry;
pub mod report;
pub mod review;
pub mod skill;

// Re-exports for convenience
pub use analyzer::{AnalysisResult, AnalyzeError, ChangeAnalyzer, FileError};
pub use changeset::{ChangeError, ChangeSet, FileChange};
pub use evaluator::{evaluate, EvalError, Finding};
pub use facts::{Fact, FactKind, Location};
pub use parsers::{JavaParser, ParseResult};
pub use registry::{Applicability, Category, RegistryError, Rule, RuleSet, Severity};
pub use report::{
    create_reporter, format, ConsoleReporter, MarkdownReporter, Report, ReportError, Reporter,
};
pub use review::{review, review_all, ReviewError, ReviewOutcome, ReviewRun, Stage};
pub use skill::{FrontMatter, Section, SkillDoc, SkillError, SECTION_ORDER};
