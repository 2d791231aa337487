//! Native tree-sitter parsing for the Java sources in a change-set.

pub mod java;
pub mod types;

pub use java::JavaParser;
pub use types::{
    CallSite, CatchInfo, ClassInfo, FieldInfo, ImportInfo, LocalVar, MethodInfo,
    ObjectCreation, ParseError, ParseResult, Position, Range, RawTypeUse, TryInfo,
};
