//! Contract detectors: equals/hashCode override facts.
//!
//! The asymmetry judgement (equals without hashCode) lives in the rule
//! registry as a missing-counterpart condition; this pass only records what
//! each class overrides.

use crate::facts::{Fact, FactKind};

use super::AnalyzedFile;

pub(crate) fn detect(file: &AnalyzedFile, facts: &mut Vec<Fact>) {
    for class in &file.parse.classes {
        if class.is_interface {
            continue;
        }
        for method in file.parse.methods_of(&class.name) {
            if method.is_static || method.is_constructor {
                continue;
            }
            let kind = match method.name.as_str() {
                "equals" if method.parameter_types.len() == 1 => FactKind::EqualsOverridden,
                "hashCode" if method.parameter_types.is_empty() => FactKind::HashCodeOverridden,
                _ => continue,
            };
            facts.push(
                Fact::new(kind, file.location(&method.range))
                    .with_attr("class", class.name.clone()),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::ChangeAnalyzer;
    use crate::changeset::ChangeSet;

    fn facts_for(source: &str) -> Vec<Fact> {
        let change = ChangeSet::new("t").with_source("T.java", source);
        ChangeAnalyzer::new().unwrap().analyze(&change).facts
    }

    #[test]
    fn test_equals_only() {
        let facts = facts_for(
            "class Money { public boolean equals(Object o) { return true; } }",
        );
        assert!(facts.iter().any(|f| f.kind == FactKind::EqualsOverridden));
        assert!(!facts.iter().any(|f| f.kind == FactKind::HashCodeOverridden));
    }

    #[test]
    fn test_both_overridden() {
        let facts = facts_for(
            "class Money { public boolean equals(Object o) { return true; } public int hashCode() { return 1; } }",
        );
        let eq = facts.iter().find(|f| f.kind == FactKind::EqualsOverridden).unwrap();
        let hc = facts.iter().find(|f| f.kind == FactKind::HashCodeOverridden).unwrap();
        assert_eq!(eq.attr("class"), hc.attr("class"));
    }

    #[test]
    fn test_unrelated_equals_signature_ignored() {
        let facts = facts_for(
            "class Money { public boolean equals(Object a, Object b) { return true; } }",
        );
        assert!(!facts.iter().any(|f| f.kind == FactKind::EqualsOverridden));
    }
}
