//! Builtin rule table.
//!
//! One record per checklist item the analyzer can verify syntactically, plus
//! a handful of advisory records for checks that stay with a human reviewer.

use crate::facts::FactKind;

use super::types::{Applicability, Category, Rule, Severity};

fn any_of(kinds: &[FactKind]) -> Applicability {
    Applicability::AnyOf { kinds: kinds.to_vec() }
}

fn rule(
    id: &str,
    version: u32,
    category: Category,
    severity: Severity,
    title: &str,
    message: &str,
    applicability: Applicability,
) -> Rule {
    Rule {
        id: id.to_string(),
        version,
        category,
        severity,
        title: title.to_string(),
        message: message.to_string(),
        applicability,
    }
}

/// The builtin rules, in registry (category) order.
pub fn builtin_rules() -> Vec<Rule> {
    vec![
        // Robustness
        rule(
            "R-ROB-110",
            1,
            Category::Robustness,
            Severity::Blocking,
            "Swallowed exception",
            "Catch block in {class} swallows {exception} without logging, rethrowing, or handling it",
            any_of(&[FactKind::SwallowedException]),
        ),
        rule(
            "R-ROB-120",
            1,
            Category::Robustness,
            Severity::Blocking,
            "Unclosed resource",
            "{type} created in {method}() is never closed; use try-with-resources",
            any_of(&[FactKind::ResourceNotClosed]),
        ),
        rule(
            "R-ROB-190",
            1,
            Category::Robustness,
            Severity::Positive,
            "Resource-safe try",
            "{method}() manages its resources with try-with-resources",
            any_of(&[FactKind::TryWithResources]),
        ),
        // Immutability
        rule(
            "R-IMM-110",
            1,
            Category::Immutability,
            Severity::Suggested,
            "Field can be final",
            "{class}.{field} is only assigned once and can be final",
            any_of(&[FactKind::NonFinalField]),
        ),
        rule(
            "R-IMM-190",
            1,
            Category::Immutability,
            Severity::Positive,
            "Immutable value type",
            "{class} is an immutable value type: all instance fields are final",
            any_of(&[FactKind::ImmutableValueClass]),
        ),
        // Types
        rule(
            "R-TYP-110",
            1,
            Category::Types,
            Severity::Suggested,
            "Raw generic type",
            "Raw use of generic type {type} in {class}; add type arguments",
            any_of(&[FactKind::RawGenericType]),
        ),
        rule(
            "R-TYP-120",
            1,
            Category::Types,
            Severity::Suggested,
            "Optional misuse",
            "{reason}",
            any_of(&[FactKind::OptionalMisuse]),
        ),
        rule(
            "R-TYP-910",
            1,
            Category::Types,
            Severity::Suggested,
            "Optional idiom (advisory)",
            "Judge whether Optional usage is idiomatic in its surrounding context",
            Applicability::Advisory,
        ),
        // Contracts
        rule(
            "R-CTR-110",
            1,
            Category::Contracts,
            Severity::Blocking,
            "equals without hashCode",
            "{class} overrides equals() but not hashCode(); the hash contract is broken",
            Applicability::MissingCounterpart {
                present: FactKind::EqualsOverridden,
                absent: FactKind::HashCodeOverridden,
                join: "class".to_string(),
            },
        ),
        // Spring DI
        rule(
            "R-SDI-110",
            1,
            Category::SpringDi,
            Severity::Blocking,
            "Field injection",
            "Field '{field}' in {class} is injected with @Autowired; use constructor injection",
            any_of(&[FactKind::FieldInjection]),
        ),
        rule(
            "R-SDI-190",
            1,
            Category::SpringDi,
            Severity::Positive,
            "Constructor injection",
            "{class} wires its dependencies through the constructor",
            any_of(&[FactKind::ConstructorInjection]),
        ),
        // Spring layers
        rule(
            "R-SLY-110",
            1,
            Category::SpringLayers,
            Severity::Blocking,
            "Repository access from controller",
            "{class} accesses repository '{field}' directly from the web layer",
            any_of(&[FactKind::RepositoryAccessFromController]),
        ),
        rule(
            "R-SLY-120",
            1,
            Category::SpringLayers,
            Severity::Suggested,
            "Business logic in controller",
            "{class}.{method}() carries business logic that belongs in a service",
            any_of(&[FactKind::BusinessLogicInController]),
        ),
        // Transactions
        rule(
            "R-TXN-110",
            1,
            Category::Transactions,
            Severity::Blocking,
            "Ineffective @Transactional",
            "@Transactional on {class}.{method}() has no effect: {reason}",
            any_of(&[FactKind::TransactionalMisplaced]),
        ),
        rule(
            "R-TXN-120",
            1,
            Category::Transactions,
            Severity::Suggested,
            "Query in loop",
            "{method}() calls {call}() inside a loop; batch the query to avoid N+1 access",
            any_of(&[FactKind::RepositoryCallInLoop]),
        ),
        // Testing
        rule(
            "R-TST-110",
            1,
            Category::Testing,
            Severity::Suggested,
            "Weak assertion",
            "Test {class}.{method}() {reason}",
            any_of(&[FactKind::WeakAssertion]),
        ),
        rule(
            "R-TST-120",
            1,
            Category::Testing,
            Severity::Suggested,
            "Shared test state",
            "Test class {class} shares mutable static state through '{field}'",
            any_of(&[FactKind::TestSharedState]),
        ),
        rule(
            "R-TST-910",
            1,
            Category::Testing,
            Severity::Suggested,
            "Test intent (advisory)",
            "Judge whether each test would still fail if the implementation broke",
            Applicability::Advisory,
        ),
        // Consistency
        rule(
            "R-NAM-110",
            1,
            Category::Consistency,
            Severity::Suggested,
            "Naming inconsistency",
            "{class} does not follow the {expected} naming used by the rest of this change",
            any_of(&[FactKind::NamingInconsistency]),
        ),
    ]
}
