//! Parse result types shared by the Java parser and the detectors.

use serde::{Deserialize, Serialize};

/// A position in a source file (0-based, as tree-sitter reports it).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    pub line: u32,
    pub column: u32,
}

/// A range in a source file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Range {
    pub start: Position,
    pub end: Position,
}

impl Range {
    pub fn new(start_line: u32, start_col: u32, end_line: u32, end_col: u32) -> Self {
        Self {
            start: Position { line: start_line, column: start_col },
            end: Position { line: end_line, column: end_col },
        }
    }

    /// Whether `other` lies entirely within this range.
    pub fn contains(&self, other: &Range) -> bool {
        (other.start.line > self.start.line
            || (other.start.line == self.start.line && other.start.column >= self.start.column))
            && (other.end.line < self.end.line
                || (other.end.line == self.end.line && other.end.column <= self.end.column))
    }

    pub fn contains_line(&self, line: u32) -> bool {
        line >= self.start.line && line <= self.end.line
    }
}

/// A class or interface declaration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassInfo {
    pub name: String,
    /// Annotation simple names, without the `@` (e.g. `RestController`).
    pub annotations: Vec<String>,
    pub extends: Option<String>,
    pub implements: Vec<String>,
    pub is_interface: bool,
    pub is_public: bool,
    pub is_abstract: bool,
    pub range: Range,
}

impl ClassInfo {
    pub fn has_annotation(&self, name: &str) -> bool {
        self.annotations.iter().any(|a| a == name)
    }
}

/// A method or constructor declaration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MethodInfo {
    pub name: String,
    /// Simple name of the enclosing class, when one exists.
    pub class_name: Option<String>,
    pub annotations: Vec<String>,
    pub return_type: Option<String>,
    /// Parameter types as written in the source, generics included.
    pub parameter_types: Vec<String>,
    pub is_public: bool,
    pub is_private: bool,
    pub is_static: bool,
    pub is_constructor: bool,
    pub range: Range,
    /// Range of the method body block, absent for abstract/interface methods.
    pub body_range: Option<Range>,
}

impl MethodInfo {
    pub fn has_annotation(&self, name: &str) -> bool {
        self.annotations.iter().any(|a| a == name)
    }
}

/// A field declaration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldInfo {
    pub name: String,
    pub class_name: Option<String>,
    /// Field type as written, generics included.
    pub type_name: String,
    pub annotations: Vec<String>,
    pub is_final: bool,
    pub is_static: bool,
    pub is_private: bool,
    pub range: Range,
}

impl FieldInfo {
    pub fn has_annotation(&self, name: &str) -> bool {
        self.annotations.iter().any(|a| a == name)
    }
}

/// An import declaration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportInfo {
    pub path: String,
    pub is_static: bool,
    pub range: Range,
}

/// A method invocation site.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallSite {
    pub callee: String,
    /// Receiver expression text, when present (`repo` in `repo.save(x)`).
    pub receiver: Option<String>,
    pub arg_count: usize,
    pub class_name: Option<String>,
    pub method_name: Option<String>,
    /// True when the call sits inside a for/while/do loop body.
    pub in_loop: bool,
    pub range: Range,
}

/// A catch clause.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatchInfo {
    pub caught_types: Vec<String>,
    pub param_name: String,
    /// Number of statements in the catch body.
    pub statement_count: usize,
    /// Catch body text, braces included.
    pub body_source: String,
    pub class_name: Option<String>,
    pub range: Range,
}

/// A try statement, with or without a resource specification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TryInfo {
    pub with_resources: bool,
    pub class_name: Option<String>,
    pub method_name: Option<String>,
    pub range: Range,
}

/// A `new T(...)` expression.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObjectCreation {
    pub type_name: String,
    pub method_name: Option<String>,
    /// True when the expression appears inside a try-with-resources specification.
    pub in_resource_spec: bool,
    /// True when the expression is an argument of another creation, as in
    /// `new BufferedReader(new FileReader(f))`.
    pub nested: bool,
    /// True when the expression is returned or passed to a call, so
    /// ownership transfers away from the creating method.
    pub escapes: bool,
    pub range: Range,
}

/// A use of a collection-like type without type arguments.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawTypeUse {
    pub type_name: String,
    pub class_name: Option<String>,
    pub range: Range,
}

/// A local variable declaration (types tracked for `Optional` analysis).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocalVar {
    pub name: String,
    pub type_name: String,
    pub method_name: Option<String>,
    pub range: Range,
}

/// Parse error for a file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParseError {
    pub message: String,
    pub range: Range,
}

/// Everything the Java parser extracts from one file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ParseResult {
    pub classes: Vec<ClassInfo>,
    pub methods: Vec<MethodInfo>,
    pub fields: Vec<FieldInfo>,
    pub imports: Vec<ImportInfo>,
    pub calls: Vec<CallSite>,
    pub catches: Vec<CatchInfo>,
    pub tries: Vec<TryInfo>,
    pub creations: Vec<ObjectCreation>,
    pub raw_types: Vec<RawTypeUse>,
    pub locals: Vec<LocalVar>,
    pub errors: Vec<ParseError>,
    pub parse_time_us: u64,
}

impl ParseResult {
    pub fn class_by_name(&self, name: &str) -> Option<&ClassInfo> {
        self.classes.iter().find(|c| c.name == name)
    }

    pub fn methods_of<'a>(&'a self, class: &'a str) -> impl Iterator<Item = &'a MethodInfo> {
        self.methods
            .iter()
            .filter(move |m| m.class_name.as_deref() == Some(class))
    }

    pub fn fields_of<'a>(&'a self, class: &'a str) -> impl Iterator<Item = &'a FieldInfo> {
        self.fields
            .iter()
            .filter(move |f| f.class_name.as_deref() == Some(class))
    }
}
