//! Rule Evaluator: matches extracted facts against registry rules.
//!
//! Deterministic and idempotent: given the same fact and rule sets, the
//! same ordered finding sequence comes out. Ordering is rules grouped by
//! category in registry order, then matched facts by source location.

pub mod types;

pub use types::{EvalError, Finding};

use rustc_hash::FxHashSet;
use smallvec::smallvec;
use xxhash_rust::xxh3::Xxh3;

use crate::facts::Fact;
use crate::registry::{Applicability, Rule, RuleSet};

/// Evaluate all facts against all rules.
///
/// A rule whose applicability condition is unmet produces no finding; every
/// emitted finding references exactly one rule and at least one fact.
pub fn evaluate(facts: &[Fact], rules: &RuleSet) -> Result<Vec<Finding>, EvalError> {
    let mut sorted: Vec<&Fact> = facts.iter().collect();
    sorted.sort_by(|a, b| a.location.cmp(&b.location));

    let mut findings = Vec::new();
    let mut seen = FxHashSet::default();

    for rule in rules.iter() {
        match &rule.applicability {
            Applicability::AnyOf { kinds } => {
                for fact in sorted.iter().copied().filter(|f| kinds.contains(&f.kind)) {
                    push_finding(rule, fact, &mut findings, &mut seen)?;
                }
            }
            Applicability::MissingCounterpart { present, absent, join } => {
                for fact in sorted.iter().copied().filter(|f| f.kind == *present) {
                    let key = fact.attr(join);
                    let has_counterpart = sorted.iter().any(|other| {
                        other.kind == *absent && other.attr(join) == key
                    });
                    if !has_counterpart {
                        push_finding(rule, fact, &mut findings, &mut seen)?;
                    }
                }
            }
            Applicability::Advisory => {}
        }
    }

    tracing::debug!(
        facts = facts.len(),
        findings = findings.len(),
        "evaluation complete"
    );
    Ok(findings)
}

fn push_finding(
    rule: &Rule,
    fact: &Fact,
    findings: &mut Vec<Finding>,
    seen: &mut FxHashSet<u64>,
) -> Result<(), EvalError> {
    let message = render_message(rule, fact)?;
    let fingerprint = fingerprint(&rule.id, fact);

    // The same fact can surface twice when a change-set repeats a file.
    if !seen.insert(fingerprint) {
        return Ok(());
    }

    findings.push(Finding {
        rule_id: rule.id.clone(),
        category: rule.category,
        severity: rule.severity,
        message,
        locations: smallvec![fact.location.clone()],
        fingerprint,
    });
    Ok(())
}

/// Fill `{attr}` placeholders in the rule's message template from the
/// fact's attributes. An unknown placeholder is a registry defect.
fn render_message(rule: &Rule, fact: &Fact) -> Result<String, EvalError> {
    let template = &rule.message;
    let mut out = String::with_capacity(template.len());
    let mut chars = template.char_indices();

    while let Some((_, c)) = chars.next() {
        if c != '{' {
            out.push(c);
            continue;
        }
        let mut name = String::new();
        let mut closed = false;
        for (_, c) in chars.by_ref() {
            if c == '}' {
                closed = true;
                break;
            }
            name.push(c);
        }
        if !closed || name.is_empty() {
            return Err(EvalError::UnknownPlaceholder {
                rule_id: rule.id.clone(),
                placeholder: name,
            });
        }
        match fact.attr(&name) {
            Some(value) => out.push_str(value),
            None => {
                return Err(EvalError::UnknownPlaceholder {
                    rule_id: rule.id.clone(),
                    placeholder: name,
                });
            }
        }
    }

    Ok(out)
}

fn fingerprint(rule_id: &str, fact: &Fact) -> u64 {
    let mut hasher = Xxh3::new();
    hasher.update(rule_id.as_bytes());
    hasher.update(fact.location.file.as_bytes());
    hasher.update(&fact.location.line.to_le_bytes());
    hasher.update(&fact.location.column.to_le_bytes());
    for (k, v) in &fact.attrs {
        hasher.update(k.as_bytes());
        hasher.update(v.as_bytes());
    }
    hasher.digest()
}
