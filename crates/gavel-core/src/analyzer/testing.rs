//! Test-quality detectors: assertion strength and test independence.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::facts::{Fact, FactKind};

use super::AnalyzedFile;

const TEST_ANNOTATIONS: &[&str] = &["Test", "ParameterizedTest", "RepeatedTest"];

/// Call prefixes that count as verifying something.
const ASSERTION_PREFIXES: &[&str] = &["assert", "verify", "expect", "fail"];

pub(crate) fn detect(file: &AnalyzedFile, facts: &mut Vec<Fact>) {
    let test_classes: Vec<String> = file
        .parse
        .classes
        .iter()
        .filter(|c| {
            file.parse
                .methods_of(&c.name)
                .any(|m| TEST_ANNOTATIONS.iter().any(|a| m.has_annotation(a)))
        })
        .map(|c| c.name.clone())
        .collect();

    detect_weak_assertions(file, &test_classes, facts);
    detect_shared_state(file, &test_classes, facts);
}

fn detect_weak_assertions(file: &AnalyzedFile, test_classes: &[String], facts: &mut Vec<Fact>) {
    static CONSTANT_TRUE: Lazy<Regex> =
        Lazy::new(|| Regex::new(r"assertTrue\(\s*true\s*[,)]").expect("assertTrue regex"));

    for class in test_classes {
        for method in file.parse.methods_of(class) {
            if !TEST_ANNOTATIONS.iter().any(|a| method.has_annotation(a)) {
                continue;
            }
            let body = match &method.body_range {
                Some(r) => file.slice(r),
                None => continue,
            };

            let has_assertion = file.parse.calls.iter().any(|c| {
                c.method_name.as_deref() == Some(method.name.as_str())
                    && c.class_name.as_deref() == Some(class.as_str())
                    && ASSERTION_PREFIXES.iter().any(|p| c.callee.starts_with(p))
            });

            let reason = if !has_assertion {
                Some("has no assertions; it only proves the code does not throw")
            } else if CONSTANT_TRUE.is_match(&body) {
                Some("asserts a constant; the assertion can never fail")
            } else {
                None
            };

            if let Some(reason) = reason {
                facts.push(
                    Fact::new(FactKind::WeakAssertion, file.location(&method.range))
                        .with_attr("class", class.clone())
                        .with_attr("method", method.name.clone())
                        .with_attr("reason", reason),
                );
            }
        }
    }
}

fn detect_shared_state(file: &AnalyzedFile, test_classes: &[String], facts: &mut Vec<Fact>) {
    for class in test_classes {
        for field in file.parse.fields_of(class) {
            if !field.is_static || field.is_final {
                continue;
            }
            facts.push(
                Fact::new(FactKind::TestSharedState, file.location(&field.range))
                    .with_attr("class", class.clone())
                    .with_attr("field", field.name.clone()),
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
    fn test_assertion_free_test_flagged() {
        let facts = facts_for(
            "class OrderServiceTest {\n    @Test\n    void placesOrder() { service.place(1L); }\n}",
        );
        let f = facts.iter().find(|f| f.kind == FactKind::WeakAssertion).unwrap();
        assert!(f.attr("reason").unwrap().contains("no assertions"));
    }

    #[test]
    fn test_constant_assertion_flagged() {
        let facts = facts_for(
            "class OrderServiceTest {\n    @Test\n    void alwaysPasses() { assertTrue(true); }\n}",
        );
        assert!(facts.iter().any(|f| f.kind == FactKind::WeakAssertion));
    }

    #[test]
    fn test_real_assertion_is_fine() {
        let facts = facts_for(
            "class OrderServiceTest {\n    @Test\n    void placesOrder() { assertEquals(1, service.place(1L).getId()); }\n}",
        );
        assert!(!facts.iter().any(|f| f.kind == FactKind::WeakAssertion));
    }

    #[test]
    fn test_mutable_static_state_flagged() {
        let facts = facts_for(
            "class OrderServiceTest {\n    static List<Order> shared = new ArrayList<>();\n    @Test\n    void one() { assertNotNull(shared); }\n}",
        );
        let f = facts.iter().find(|f| f.kind == FactKind::TestSharedState).unwrap();
        assert_eq!(f.attr("field"), Some("shared"));
    }

    #[test]
    fn test_static_final_fixture_is_fine() {
        let facts = facts_for(
            "class OrderServiceTest {\n    static final String FIXTURE = \"x\";\n    @Test\n    void one() { assertNotNull(FIXTURE); }\n}",
        );
        assert!(!facts.iter().any(|f| f.kind == FactKind::TestSharedState));
    }

    #[test]
    fn test_non_test_class_not_scanned() {
        let facts = facts_for("class Util { static int counter; }");
        assert!(!facts.iter().any(|f| f.kind == FactKind::TestSharedState));
    }
}
