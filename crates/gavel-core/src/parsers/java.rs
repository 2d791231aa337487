//! Java parser using native tree-sitter
//!
//! Extracts classes, methods, fields, imports, call sites, catch clauses,
//! try statements, and object creations from Java code. Annotation-aware so
//! the detectors can see Spring, JPA, and JUnit stereotypes.

use std::time::Instant;

use streaming_iterator::StreamingIterator;
use tree_sitter::{Node, Parser, Query, QueryCursor};

use super::types::*;

/// Collection-like types that warrant a raw-usage record when written
/// without type arguments.
const RAW_SENSITIVE_TYPES: &[&str] = &[
    "List", "Map", "Set", "Collection", "Iterable", "ArrayList", "HashMap", "HashSet",
    "LinkedList", "Queue", "Deque", "Optional",
];

/// Java parser
pub struct JavaParser {
    parser: Parser,
    class_query: Query,
    import_query: Query,
    call_query: Query,
    decl_query: Query,
}

impl JavaParser {
    pub fn new() -> Result<Self, String> {
        let mut parser = Parser::new();
        let language = tree_sitter_java::LANGUAGE;
        parser
            .set_language(&language.into())
            .map_err(|e| format!("Failed to set language: {}", e))?;

        let class_query = Query::new(
            &language.into(),
            r#"
            (class_declaration
                (modifiers)? @modifiers
                name: (identifier) @name
                (superclass (type_identifier) @extends)?
                (super_interfaces (type_list (type_identifier) @implements))?
            ) @class

            (interface_declaration
                name: (identifier) @name
            ) @interface
            "#,
        )
        .map_err(|e| format!("Failed to create class query: {}", e))?;

        let import_query = Query::new(
            &language.into(),
            r#"
            (import_declaration
                (scoped_identifier) @import
            ) @import_stmt
            "#,
        )
        .map_err(|e| format!("Failed to create import query: {}", e))?;

        let call_query = Query::new(
            &language.into(),
            r#"
            (method_invocation
                object: (_)? @receiver
                name: (identifier) @callee
                arguments: (argument_list) @args
            ) @call
            "#,
        )
        .map_err(|e| format!("Failed to create call query: {}", e))?;

        // Single-node patterns; the surrounding structure is read off the
        // captured node with field lookups.
        let decl_query = Query::new(
            &language.into(),
            r#"
            (method_declaration) @method
            (constructor_declaration) @constructor
            (field_declaration) @field
            (catch_clause) @catch
            (try_statement) @try
            (try_with_resources_statement) @try_resources
            (object_creation_expression) @new
            (local_variable_declaration) @local
            "#,
        )
        .map_err(|e| format!("Failed to create declaration query: {}", e))?;

        Ok(Self {
            parser,
            class_query,
            import_query,
            call_query,
            decl_query,
        })
    }

    pub fn parse(&mut self, source: &str) -> ParseResult {
        let start = Instant::now();

        let tree = match self.parser.parse(source, None) {
            Some(t) => t,
            None => {
                let mut result = ParseResult::default();
                result.errors.push(ParseError {
                    message: "Failed to parse source".to_string(),
                    range: Range::new(0, 0, 0, 0),
                });
                return result;
            }
        };

        let root = tree.root_node();
        let source_bytes = source.as_bytes();

        let mut result = ParseResult::default();

        if root.has_error() {
            result.errors.push(ParseError {
                message: "Source contains syntax errors".to_string(),
                range: node_range(&root),
            });
        }

        self.extract_classes(&root, source_bytes, &mut result);
        self.extract_imports(&root, source_bytes, &mut result);
        self.extract_calls(&root, source_bytes, &mut result);
        self.extract_declarations(&root, source_bytes, &mut result);

        result.parse_time_us = start.elapsed().as_micros() as u64;
        result
    }

    fn extract_classes(&self, root: &Node, source: &[u8], result: &mut ParseResult) {
        let mut cursor = QueryCursor::new();
        let mut matches = cursor.matches(&self.class_query, *root, source);

        while let Some(m) = matches.next() {
            let mut name = String::new();
            let mut extends = None;
            let mut implements = Vec::new();
            let mut annotations = Vec::new();
            let mut range = Range::new(0, 0, 0, 0);
            let mut is_public = false;
            let mut is_abstract = false;
            let mut is_interface = false;

            for capture in m.captures {
                let node = capture.node;
                let capture_name = self.class_query.capture_names()[capture.index as usize];

                match capture_name {
                    "name" => {
                        name = node_text(&node, source);
                    }
                    "extends" => {
                        extends = Some(node_text(&node, source));
                    }
                    "implements" => {
                        implements.push(node_text(&node, source));
                    }
                    "modifiers" => {
                        let mods = node_text(&node, source);
                        is_public = mods.contains("public");
                        is_abstract = mods.contains("abstract");
                        annotations = annotations_of(&node, source);
                    }
                    "class" => {
                        range = node_range(&node);
                    }
                    "interface" => {
                        range = node_range(&node);
                        is_interface = true;
                    }
                    _ => {}
                }
            }

            if !name.is_empty() {
                result.classes.push(ClassInfo {
                    name,
                    annotations,
                    extends,
                    implements,
                    is_interface,
                    is_public,
                    is_abstract,
                    range,
                });
            }
        }
    }

    fn extract_imports(&self, root: &Node, source: &[u8], result: &mut ParseResult) {
        let mut cursor = QueryCursor::new();
        let mut matches = cursor.matches(&self.import_query, *root, source);

        while let Some(m) = matches.next() {
            let mut import_path = String::new();
            let mut is_static = false;
            let mut range = Range::new(0, 0, 0, 0);

            for capture in m.captures {
                let node = capture.node;
                let capture_name = self.import_query.capture_names()[capture.index as usize];

                match capture_name {
                    "import" => {
                        import_path = node_text(&node, source);
                    }
                    "import_stmt" => {
                        range = node_range(&node);
                        is_static = node_text(&node, source).contains("import static");
                    }
                    _ => {}
                }
            }

            if !import_path.is_empty() {
                result.imports.push(ImportInfo {
                    path: import_path,
                    is_static,
                    range,
                });
            }
        }
    }

    fn extract_calls(&self, root: &Node, source: &[u8], result: &mut ParseResult) {
        let mut cursor = QueryCursor::new();
        let mut matches = cursor.matches(&self.call_query, *root, source);

        while let Some(m) = matches.next() {
            let mut callee = String::new();
            let mut receiver = None;
            let mut arg_count = 0;
            let mut range = Range::new(0, 0, 0, 0);
            let mut call_node = None;

            for capture in m.captures {
                let node = capture.node;
                let capture_name = self.call_query.capture_names()[capture.index as usize];

                match capture_name {
                    "callee" => {
                        callee = node_text(&node, source);
                    }
                    "receiver" => {
                        receiver = Some(node_text(&node, source));
                    }
                    "args" => {
                        arg_count = node.named_child_count();
                    }
                    "call" => {
                        range = node_range(&node);
                        call_node = Some(node);
                    }
                    _ => {}
                }
            }

            let node = match call_node {
                Some(n) => n,
                None => continue,
            };
            if !callee.is_empty() {
                result.calls.push(CallSite {
                    callee,
                    receiver,
                    arg_count,
                    class_name: enclosing_class(&node, source),
                    method_name: enclosing_method(&node, source),
                    in_loop: in_loop(&node),
                    range,
                });
            }
        }
    }

    fn extract_declarations(&self, root: &Node, source: &[u8], result: &mut ParseResult) {
        let mut cursor = QueryCursor::new();
        let mut matches = cursor.matches(&self.decl_query, *root, source);

        while let Some(m) = matches.next() {
            for capture in m.captures {
                let node = capture.node;
                let capture_name = self.decl_query.capture_names()[capture.index as usize];

                match capture_name {
                    "method" => self.collect_method(&node, source, false, result),
                    "constructor" => self.collect_method(&node, source, true, result),
                    "field" => self.collect_field(&node, source, result),
                    "catch" => self.collect_catch(&node, source, result),
                    "try" => result.tries.push(TryInfo {
                        with_resources: false,
                        class_name: enclosing_class(&node, source),
                        method_name: enclosing_method(&node, source),
                        range: node_range(&node),
                    }),
                    "try_resources" => result.tries.push(TryInfo {
                        with_resources: true,
                        class_name: enclosing_class(&node, source),
                        method_name: enclosing_method(&node, source),
                        range: node_range(&node),
                    }),
                    "new" => self.collect_creation(&node, source, result),
                    "local" => self.collect_local(&node, source, result),
                    _ => {}
                }
            }
        }
    }

    fn collect_method(&self, node: &Node, source: &[u8], is_constructor: bool, result: &mut ParseResult) {
        let name = match node.child_by_field_name("name") {
            Some(n) => node_text(&n, source),
            None => return,
        };

        let modifiers = modifiers_child(node);
        let mods_text = modifiers.map(|n| node_text(&n, source)).unwrap_or_default();
        let annotations = modifiers
            .map(|n| annotations_of(&n, source))
            .unwrap_or_default();

        let return_type = node
            .child_by_field_name("type")
            .map(|n| node_text(&n, source));

        // Raw collection types in the return position.
        if let Some(ty) = node.child_by_field_name("type") {
            self.record_raw_type(&ty, source, result);
        }

        let mut parameter_types = Vec::new();
        if let Some(params) = node.child_by_field_name("parameters") {
            let mut c = params.walk();
            for param in params.named_children(&mut c) {
                if let Some(ty) = param.child_by_field_name("type") {
                    parameter_types.push(node_text(&ty, source));
                    self.record_raw_type(&ty, source, result);
                }
            }
        }

        result.methods.push(MethodInfo {
            name,
            class_name: enclosing_class(node, source),
            annotations,
            return_type,
            parameter_types,
            is_public: mods_text.contains("public"),
            is_private: mods_text.contains("private"),
            is_static: mods_text.contains("static"),
            is_constructor,
            range: node_range(node),
            body_range: node.child_by_field_name("body").map(|b| node_range(&b)),
        });
    }

    fn collect_field(&self, node: &Node, source: &[u8], result: &mut ParseResult) {
        let type_node = match node.child_by_field_name("type") {
            Some(n) => n,
            None => return,
        };
        let type_name = node_text(&type_node, source);
        self.record_raw_type(&type_node, source, result);

        let modifiers = modifiers_child(node);
        let mods_text = modifiers.map(|n| node_text(&n, source)).unwrap_or_default();
        let annotations = modifiers
            .map(|n| annotations_of(&n, source))
            .unwrap_or_default();

        let mut c = node.walk();
        for child in node.named_children(&mut c) {
            if child.kind() != "variable_declarator" {
                continue;
            }
            let name = match child.child_by_field_name("name") {
                Some(n) => node_text(&n, source),
                None => continue,
            };
            result.fields.push(FieldInfo {
                name,
                class_name: enclosing_class(node, source),
                type_name: type_name.clone(),
                annotations: annotations.clone(),
                is_final: mods_text.contains("final"),
                is_static: mods_text.contains("static"),
                is_private: mods_text.contains("private"),
                range: node_range(node),
            });
        }
    }

    fn collect_catch(&self, node: &Node, source: &[u8], result: &mut ParseResult) {
        let mut caught_types = Vec::new();
        let mut param_name = String::new();

        let mut c = node.walk();
        for child in node.named_children(&mut c) {
            if child.kind() == "catch_formal_parameter" {
                let mut cc = child.walk();
                for part in child.named_children(&mut cc) {
                    match part.kind() {
                        "catch_type" => {
                            let text = node_text(&part, source);
                            caught_types
                                .extend(text.split('|').map(|t| t.trim().to_string()));
                        }
                        "identifier" => {
                            param_name = node_text(&part, source);
                        }
                        _ => {}
                    }
                }
            }
        }

        let (statement_count, body_source) = match node.child_by_field_name("body") {
            Some(body) => {
                let mut bc = body.walk();
                let count = body
                    .named_children(&mut bc)
                    .filter(|n| n.kind() != "line_comment" && n.kind() != "block_comment")
                    .count();
                (count, node_text(&body, source))
            }
            None => (0, String::new()),
        };

        result.catches.push(CatchInfo {
            caught_types,
            param_name,
            statement_count,
            body_source,
            class_name: enclosing_class(node, source),
            range: node_range(node),
        });
    }

    fn collect_creation(&self, node: &Node, source: &[u8], result: &mut ParseResult) {
        let type_name = match node.child_by_field_name("type") {
            Some(n) => node_text(&n, source),
            None => return,
        };

        let mut in_resource_spec = false;
        let mut nested = false;
        let mut escapes = false;
        let mut current = node.parent();
        while let Some(parent) = current {
            match parent.kind() {
                "resource_specification" | "resource" => {
                    in_resource_spec = true;
                    break;
                }
                "object_creation_expression" => {
                    nested = true;
                    current = parent.parent();
                }
                "return_statement" | "method_invocation" => {
                    escapes = true;
                    break;
                }
                "method_declaration" | "constructor_declaration" | "class_declaration" => break,
                _ => current = parent.parent(),
            }
        }

        result.creations.push(ObjectCreation {
            type_name,
            method_name: enclosing_method(node, source),
            in_resource_spec,
            nested,
            escapes,
            range: node_range(node),
        });
    }

    fn collect_local(&self, node: &Node, source: &[u8], result: &mut ParseResult) {
        let type_node = match node.child_by_field_name("type") {
            Some(n) => n,
            None => return,
        };
        let type_name = node_text(&type_node, source);
        self.record_raw_type(&type_node, source, result);

        let mut c = node.walk();
        for child in node.named_children(&mut c) {
            if child.kind() != "variable_declarator" {
                continue;
            }
            if let Some(name) = child.child_by_field_name("name") {
                result.locals.push(LocalVar {
                    name: node_text(&name, source),
                    type_name: type_name.clone(),
                    method_name: enclosing_method(node, source),
                    range: node_range(node),
                });
            }
        }
    }

    fn record_raw_type(&self, type_node: &Node, source: &[u8], result: &mut ParseResult) {
        if type_node.kind() != "type_identifier" {
            return;
        }
        let name = node_text(type_node, source);
        if RAW_SENSITIVE_TYPES.contains(&name.as_str()) {
            result.raw_types.push(RawTypeUse {
                type_name: name,
                class_name: enclosing_class(type_node, source),
                range: node_range(type_node),
            });
        }
    }
}

impl Default for JavaParser {
    fn default() -> Self {
        Self::new().expect("Failed to create Java parser")
    }
}

fn node_text(node: &Node, source: &[u8]) -> String {
    node.utf8_text(source).unwrap_or("").to_string()
}

fn node_range(node: &Node) -> Range {
    Range {
        start: Position {
            line: node.start_position().row as u32,
            column: node.start_position().column as u32,
        },
        end: Position {
            line: node.end_position().row as u32,
            column: node.end_position().column as u32,
        },
    }
}

/// The `modifiers` child of a declaration node, when present.
fn modifiers_child<'a>(node: &Node<'a>) -> Option<Node<'a>> {
    let mut c = node.walk();
    let found = node.named_children(&mut c).find(|n| n.kind() == "modifiers");
    found
}

/// Annotation simple names inside a `modifiers` node, without the `@`.
fn annotations_of(modifiers: &Node, source: &[u8]) -> Vec<String> {
    let mut annotations = Vec::new();
    let mut c = modifiers.walk();
    for child in modifiers.named_children(&mut c) {
        if child.kind() == "marker_annotation" || child.kind() == "annotation" {
            if let Some(name) = child.child_by_field_name("name") {
                annotations.push(node_text(&name, source));
            }
        }
    }
    annotations
}

fn enclosing_class(node: &Node, source: &[u8]) -> Option<String> {
    let mut current = node.parent();
    while let Some(parent) = current {
        if parent.kind() == "class_declaration" || parent.kind() == "interface_declaration" {
            return parent
                .child_by_field_name("name")
                .map(|n| node_text(&n, source));
        }
        current = parent.parent();
    }
    None
}

fn enclosing_method(node: &Node, source: &[u8]) -> Option<String> {
    let mut current = node.parent();
    while let Some(parent) = current {
        match parent.kind() {
            "method_declaration" | "constructor_declaration" => {
                return parent
                    .child_by_field_name("name")
                    .map(|n| node_text(&n, source));
            }
            "class_declaration" => return None,
            _ => current = parent.parent(),
        }
    }
    None
}

fn in_loop(node: &Node) -> bool {
    let mut current = node.parent();
    while let Some(parent) = current {
        match parent.kind() {
            "for_statement" | "enhanced_for_statement" | "while_statement" | "do_statement" => {
                return true;
            }
            "method_declaration" | "constructor_declaration" | "class_declaration"
            | "lambda_expression" => return false,
            _ => current = parent.parent(),
        }
    }
    false
}
