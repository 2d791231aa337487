//! Type-usage detectors: raw generics and Optional misuse.

use crate::facts::{Fact, FactKind};

use super::AnalyzedFile;

pub(crate) fn detect(file: &AnalyzedFile, facts: &mut Vec<Fact>) {
    detect_raw_generics(file, facts);
    detect_optional_fields_and_params(file, facts);
    detect_optional_get(file, facts);
}

fn detect_raw_generics(file: &AnalyzedFile, facts: &mut Vec<Fact>) {
    for raw in &file.parse.raw_types {
        let class = raw.class_name.clone().unwrap_or_default();
        if class.is_empty() {
            continue;
        }
        facts.push(
            Fact::new(FactKind::RawGenericType, file.location(&raw.range))
                .with_attr("type", raw.type_name.clone())
                .with_attr("class", class),
        );
    }
}

fn is_optional(type_name: &str) -> bool {
    type_name == "Optional" || type_name.starts_with("Optional<")
}

fn detect_optional_fields_and_params(file: &AnalyzedFile, facts: &mut Vec<Fact>) {
    for field in &file.parse.fields {
        if !is_optional(&field.type_name) {
            continue;
        }
        let class = field.class_name.clone().unwrap_or_default();
        facts.push(
            Fact::new(FactKind::OptionalMisuse, file.location(&field.range))
                .with_attr("class", class.clone())
                .with_attr(
                    "reason",
                    format!(
                        "Optional is not meant as a field type; {}.{} should hold the value or null semantics explicitly",
                        class, field.name
                    ),
                ),
        );
    }

    for method in &file.parse.methods {
        if method.is_constructor {
            continue;
        }
        if !method.parameter_types.iter().any(|t| is_optional(t)) {
            continue;
        }
        let class = method.class_name.clone().unwrap_or_default();
        facts.push(
            Fact::new(FactKind::OptionalMisuse, file.location(&method.range))
                .with_attr("class", class.clone())
                .with_attr(
                    "reason",
                    format!(
                        "Optional parameter on {}.{}() forces callers to wrap; overload or accept the value directly",
                        class, method.name
                    ),
                ),
        );
    }
}

fn detect_optional_get(file: &AnalyzedFile, facts: &mut Vec<Fact>) {
    for call in &file.parse.calls {
        if call.callee != "get" || call.arg_count != 0 {
            continue;
        }
        let receiver = match &call.receiver {
            Some(r) => r,
            None => continue,
        };
        let class = call.class_name.clone().unwrap_or_default();

        // Chained: repo.findById(id).get(); Spring Data findBy* returns
        // Optional, so the bypass is certain.
        if receiver.ends_with(')')
            && (receiver.contains(".findById(") || receiver.contains(".findBy"))
        {
            facts.push(
                Fact::new(FactKind::OptionalMisuse, file.location(&call.range))
                    .with_attr("class", class)
                    .with_attr(
                        "reason",
                        format!(
                            "{}.get() bypasses the Optional; use orElseThrow() with a meaningful exception",
                            receiver
                        ),
                    ),
            );
            continue;
        }

        // Local Optional variable: `opt.get()` with no presence check in
        // the same method.
        let method = match &call.method_name {
            Some(m) => m,
            None => continue,
        };
        let is_optional_local = file.parse.locals.iter().any(|l| {
            l.name == *receiver && is_optional(&l.type_name) && l.method_name.as_deref() == Some(method)
        });
        if !is_optional_local {
            continue;
        }

        let body = file
            .parse
            .methods
            .iter()
            .find(|m| m.name == *method)
            .and_then(|m| m.body_range.as_ref())
            .map(|r| file.slice(r))
            .unwrap_or_default();
        let checked = body.contains(&format!("{}.isPresent()", receiver))
            || body.contains(&format!("{}.isEmpty()", receiver));
        if checked {
            continue;
        }

        facts.push(
            Fact::new(FactKind::OptionalMisuse, file.location(&call.range))
                .with_attr("class", class)
                .with_attr(
                    "reason",
                    format!(
                        "{}.get() is called without a presence check; use orElse/orElseThrow or check isPresent first",
                        receiver
                    ),
                ),
        );
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
    fn test_raw_list_flagged() {
        let facts = facts_for("class A { List items; }");
        let f = facts
            .iter()
            .find(|f| f.kind == FactKind::RawGenericType)
            .unwrap();
        assert_eq!(f.attr("type"), Some("List"));
    }

    #[test]
    fn test_parameterized_list_not_flagged() {
        let facts = facts_for("class A { List<String> items; }");
        assert!(!facts.iter().any(|f| f.kind == FactKind::RawGenericType));
    }

    #[test]
    fn test_optional_field_flagged() {
        let facts = facts_for("class A { Optional<String> name; }");
        assert!(facts.iter().any(|f| f.kind == FactKind::OptionalMisuse));
    }

    #[test]
    fn test_chained_find_by_id_get() {
        let facts = facts_for(
            "class A { Order load(Long id) { return repo.findById(id).get(); } }",
        );
        let f = facts
            .iter()
            .find(|f| f.kind == FactKind::OptionalMisuse)
            .unwrap();
        assert!(f.attr("reason").unwrap().contains("orElseThrow"));
    }

    #[test]
    fn test_checked_optional_get_is_fine() {
        let facts = facts_for(
            "class A { String f(Optional<String> src) { Optional<String> v = src; if (v.isPresent()) { return v.get(); } return \"\"; } }",
        );
        // The parameter itself is a misuse fact; the guarded get() is not.
        let gets: Vec<_> = facts
            .iter()
            .filter(|f| {
                f.kind == FactKind::OptionalMisuse
                    && f.attr("reason").unwrap().contains("presence check")
            })
            .collect();
        assert!(gets.is_empty());
    }

    #[test]
    fn test_unchecked_optional_get_flagged() {
        let facts = facts_for(
            "class A { String f() { Optional<String> v = find(); return v.get(); } }",
        );
        assert!(facts.iter().any(|f| {
            f.kind == FactKind::OptionalMisuse
                && f.attr("reason").unwrap().contains("presence check")
        }));
    }
}
