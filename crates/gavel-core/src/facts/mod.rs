//! The Fact model: atomic, objectively-extracted observations about a change.
//!
//! Facts are produced once per analysis pass and never mutated. Attribute
//! maps are `BTreeMap` so serialization and message rendering stay
//! deterministic across runs.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Where a fact was observed.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Location {
    pub file: String,
    /// 1-based line number in the new version of the file.
    pub line: u32,
    pub column: u32,
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.file, self.line, self.column)
    }
}

/// The kind of observation a detector made.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FactKind {
    // Robustness
    ResourceNotClosed,
    SwallowedException,
    TryWithResources,
    // Immutability
    NonFinalField,
    ImmutableValueClass,
    // Types
    RawGenericType,
    OptionalMisuse,
    // Contracts
    EqualsOverridden,
    HashCodeOverridden,
    // Spring
    FieldInjection,
    ConstructorInjection,
    BusinessLogicInController,
    RepositoryAccessFromController,
    TransactionalMisplaced,
    RepositoryCallInLoop,
    // Testing
    WeakAssertion,
    TestSharedState,
    // Consistency
    NamingInconsistency,
}

/// An atomic observation about a code change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fact {
    pub kind: FactKind,
    pub location: Location,
    /// Free-form attributes (class, field, method, ...) used by rule
    /// applicability joins and message rendering.
    pub attrs: BTreeMap<String, String>,
}

impl Fact {
    pub fn new(kind: FactKind, location: Location) -> Self {
        Self {
            kind,
            location,
            attrs: BTreeMap::new(),
        }
    }

    pub fn with_attr(mut self, key: &str, value: impl Into<String>) -> Self {
        self.attrs.insert(key.to_string(), value.into());
        self
    }

    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attrs.get(key).map(String::as_str)
    }
}
