//! Immutability detectors: fields that can be final, immutable value types.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::facts::{Fact, FactKind};
use crate::parsers::FieldInfo;

use super::AnalyzedFile;

pub(crate) fn detect(file: &AnalyzedFile, facts: &mut Vec<Fact>) {
    detect_final_candidates(file, facts);
    detect_immutable_value_classes(file, facts);
}

fn detect_final_candidates(file: &AnalyzedFile, facts: &mut Vec<Fact>) {
    for field in &file.parse.fields {
        if field.is_final || field.is_static || !field.is_private {
            continue;
        }
        // Annotated fields (injection, configuration, JPA) have lifecycles
        // the annotation controls; not a final candidate we can be sure of.
        if !field.annotations.is_empty() {
            continue;
        }
        let class = match &field.class_name {
            Some(c) => c.clone(),
            None => continue,
        };

        if has_setter(file, &class, &field.name) {
            continue;
        }

        let (in_ctor, outside_ctor) = assignment_counts(file, &class, field);
        let initialized_at_decl = file.slice(&field.range).contains('=');

        // Assigned exactly once, and only where a final field could be.
        if outside_ctor == 0 && (initialized_at_decl || in_ctor >= 1) {
            facts.push(
                Fact::new(FactKind::NonFinalField, file.location(&field.range))
                    .with_attr("class", class)
                    .with_attr("field", field.name.clone()),
            );
        }
    }
}

fn has_setter(file: &AnalyzedFile, class: &str, field: &str) -> bool {
    let mut setter = String::from("set");
    let mut chars = field.chars();
    if let Some(first) = chars.next() {
        setter.extend(first.to_uppercase());
        setter.push_str(chars.as_str());
    }
    file.parse.methods_of(class).any(|m| m.name == setter)
}

/// Count mutations of the field inside constructor bodies and outside
/// them (the declaration line itself is neither). Plain assignments,
/// compound assignments, and increments/decrements all count.
fn assignment_counts(file: &AnalyzedFile, class: &str, field: &FieldInfo) -> (usize, usize) {
    static ASSIGN: Lazy<Regex> = Lazy::new(|| {
        Regex::new(r"(?:^|[^.\w])(?:this\.)?([A-Za-z_]\w*)\s*=[^=]").expect("assignment regex")
    });
    static COMPOUND: Lazy<Regex> = Lazy::new(|| {
        Regex::new(r"(?:^|[^.\w])(?:this\.)?([A-Za-z_]\w*)\s*(?:<<|>>>|>>|[-+*/%&|^])=")
            .expect("compound assignment regex")
    });
    static INC_DEC: Lazy<Regex> = Lazy::new(|| {
        Regex::new(
            r"(?:\+\+|--)\s*(?:this\.)?([A-Za-z_]\w*)|(?:^|[^.\w])(?:this\.)?([A-Za-z_]\w*)\s*(?:\+\+|--)",
        )
        .expect("increment regex")
    });

    let ctor_ranges: Vec<_> = file
        .parse
        .methods_of(class)
        .filter(|m| m.is_constructor)
        .filter_map(|m| m.body_range)
        .collect();

    let mut in_ctor = 0;
    let mut outside = 0;
    for (idx, line) in file.source.lines().enumerate() {
        let line_no = idx as u32;
        if field.range.contains_line(line_no) {
            continue; // the declaration
        }
        let mut hits = 0;
        for cap in ASSIGN.captures_iter(line).chain(COMPOUND.captures_iter(line)) {
            if &cap[1] == field.name.as_str() {
                hits += 1;
            }
        }
        for cap in INC_DEC.captures_iter(line) {
            let name = cap.get(1).or_else(|| cap.get(2)).map(|m| m.as_str());
            if name == Some(field.name.as_str()) {
                hits += 1;
            }
        }
        if ctor_ranges.iter().any(|r| r.contains_line(line_no)) {
            in_ctor += hits;
        } else {
            outside += hits;
        }
    }
    (in_ctor, outside)
}

fn detect_immutable_value_classes(file: &AnalyzedFile, facts: &mut Vec<Fact>) {
    for class in &file.parse.classes {
        if class.is_interface {
            continue;
        }
        let instance_fields: Vec<_> = file
            .parse
            .fields_of(&class.name)
            .filter(|f| !f.is_static)
            .collect();
        if instance_fields.len() < 2 {
            continue;
        }
        if !instance_fields.iter().all(|f| f.is_final) {
            continue;
        }
        let has_setters = file
            .parse
            .methods_of(&class.name)
            .any(|m| m.name.starts_with("set") && m.parameter_types.len() == 1);
        if has_setters {
            continue;
        }

        facts.push(
            Fact::new(FactKind::ImmutableValueClass, file.location(&class.range))
                .with_attr("class", class.name.clone()),
        );
    }
}
