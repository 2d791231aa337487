//! Rule Registry: immutable, data-driven rule definitions.

pub mod builtin;
pub mod types;

pub use types::{Applicability, Category, RegistryError, Rule, Severity};

use rustc_hash::FxHashSet;

/// An ordered, id-unique set of rules, grouped by category in registry
/// order. Read-only after loading; safe to share across review runs.
#[derive(Debug, Clone)]
pub struct RuleSet {
    rules: Vec<Rule>,
}

impl RuleSet {
    /// Load the builtin rules.
    pub fn load() -> Result<Self, RegistryError> {
        Self::from_rules(builtin::builtin_rules())
    }

    /// Build a rule set from explicit records (builtin, JSON, or both).
    pub fn from_rules(rules: Vec<Rule>) -> Result<Self, RegistryError> {
        let mut seen = FxHashSet::default();
        for r in &rules {
            if !seen.insert(r.id.clone()) {
                return Err(RegistryError::DuplicateRuleId { id: r.id.clone() });
            }
        }

        // Stable: insertion order within a category is preserved.
        let mut rules = rules;
        rules.sort_by_key(|r| r.category.order());
        Ok(Self { rules })
    }

    /// Parse rules from a JSON array.
    pub fn from_json(json: &str) -> Result<Self, RegistryError> {
        let rules: Vec<Rule> = serde_json::from_str(json)?;
        Self::from_rules(rules)
    }

    /// Extend with additional records, re-checking id uniqueness.
    pub fn with_rules(self, extra: Vec<Rule>) -> Result<Self, RegistryError> {
        let mut rules = self.rules;
        rules.extend(extra);
        Self::from_rules(rules)
    }

    /// All rules, grouped by category in registry order.
    pub fn iter(&self) -> impl Iterator<Item = &Rule> {
        self.rules.iter()
    }

    /// Rules of one category, in insertion order.
    pub fn by_category(&self, category: Category) -> impl Iterator<Item = &Rule> {
        self.rules.iter().filter(move |r| r.category == category)
    }

    pub fn get(&self, id: &str) -> Option<&Rule> {
        self.rules.iter().find(|r| r.id == id)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Count of syntax-detectable (non-advisory) rules.
    pub fn automated_count(&self) -> usize {
        self.rules.iter().filter(|r| r.automated()).count()
    }
}
