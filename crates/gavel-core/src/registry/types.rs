//! Rule registry types.
//!
//! Rules are immutable, individually-versioned data records. Adding a rule
//! is a data change (a new record in the builtin table or an external JSON
//! file), not a code change.

use serde::{Deserialize, Serialize};

use crate::facts::FactKind;

/// Review category a rule belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    Robustness,
    Immutability,
    Types,
    Contracts,
    SpringDi,
    SpringLayers,
    Transactions,
    Testing,
    Consistency,
}

impl Category {
    /// Evaluation and report order.
    pub const ALL: [Category; 9] = [
        Category::Robustness,
        Category::Immutability,
        Category::Types,
        Category::Contracts,
        Category::SpringDi,
        Category::SpringLayers,
        Category::Transactions,
        Category::Testing,
        Category::Consistency,
    ];

    pub fn order(&self) -> usize {
        Self::ALL.iter().position(|c| c == self).unwrap_or(usize::MAX)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Robustness => "robustness",
            Category::Immutability => "immutability",
            Category::Types => "types",
            Category::Contracts => "contracts",
            Category::SpringDi => "spring-di",
            Category::SpringLayers => "spring-layers",
            Category::Transactions => "transactions",
            Category::Testing => "testing",
            Category::Consistency => "consistency",
        }
    }
}

/// How severe a matched rule is for the review outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Blocking,
    Suggested,
    Positive,
}

/// Machine-checkable applicability condition over extracted facts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Applicability {
    /// Matches every fact of one of the given kinds.
    AnyOf { kinds: Vec<FactKind> },
    /// Matches a `present` fact that has no `absent` counterpart sharing the
    /// `join` attribute (e.g. equals overridden without hashCode, joined on
    /// the class name).
    MissingCounterpart {
        present: FactKind,
        absent: FactKind,
        join: String,
    },
    /// Human-only checklist item. Never matches a fact, so it can never
    /// produce a finding (or a false positive).
    Advisory,
}

/// A named, reusable check mapping facts to findings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rule {
    /// Unique id, stable across registry revisions.
    pub id: String,
    /// Bumped whenever the rule's text or applicability changes.
    pub version: u32,
    pub category: Category,
    pub severity: Severity,
    pub title: String,
    /// Finding message template; `{attr}` placeholders are filled from the
    /// matched fact's attributes.
    pub message: String,
    pub applicability: Applicability,
}

impl Rule {
    /// Whether the rule is syntax-detectable (as opposed to advisory-only).
    pub fn automated(&self) -> bool {
        !matches!(self.applicability, Applicability::Advisory)
    }
}

/// Registry configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("duplicate rule id: {id}")]
    DuplicateRuleId { id: String },

    #[error("failed to parse rule file: {0}")]
    Parse(#[from] serde_json::Error),
}
