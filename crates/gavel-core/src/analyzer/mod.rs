//! Change Analyzer: turns a change-set into facts.
//!
//! AST-first, with line heuristics beside it where the tree alone is not
//! enough. Each file is analyzed in isolation: an unparseable file is
//! recorded as a per-file error and never aborts the rest of the change-set.
//! Detectors prefer silence over speculation: a construct that cannot be
//! classified confidently produces no fact.

pub mod consistency;
pub mod contracts;
pub mod generics;
pub mod immutability;
pub mod robustness;
pub mod spring;
pub mod testing;

use serde::{Deserialize, Serialize};

use crate::changeset::{self, ChangeSet, FileChange};
use crate::facts::{Fact, Location};
use crate::parsers::{JavaParser, ParseResult, Range};

/// Fatal analyzer construction failure (grammar or query defect).
#[derive(Debug, thiserror::Error)]
pub enum AnalyzeError {
    #[error("failed to initialize Java parser: {0}")]
    ParserInit(String),
}

/// A per-file problem recorded during analysis. Distinguishes "could not
/// analyze" from "no issues found".
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileError {
    pub path: String,
    pub reason: String,
}

/// Output of one analysis pass over a change-set.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub facts: Vec<Fact>,
    pub file_errors: Vec<FileError>,
    pub files_analyzed: usize,
}

/// One successfully parsed file, with the line map needed to cite real
/// new-file line numbers for patched files.
pub(crate) struct AnalyzedFile {
    pub path: String,
    pub source: String,
    pub parse: ParseResult,
    line_map: Option<Vec<u32>>,
}

impl AnalyzedFile {
    /// Location of a parse range, 1-based, mapped through the patch view
    /// when the file arrived as a diff.
    pub fn location(&self, range: &Range) -> Location {
        let line = match &self.line_map {
            Some(map) => map
                .get(range.start.line as usize)
                .copied()
                .unwrap_or(range.start.line + 1),
            None => range.start.line + 1,
        };
        Location {
            file: self.path.clone(),
            line,
            column: range.start.column,
        }
    }

    /// Source lines of a range, for the text heuristics.
    pub fn slice(&self, range: &Range) -> String {
        let lines: Vec<&str> = self.source.lines().collect();
        let start = range.start.line as usize;
        let end = ((range.end.line as usize) + 1).min(lines.len());
        if start >= lines.len() {
            return String::new();
        }
        lines[start..end].join("\n")
    }
}

/// Change Analyzer - AST-first
pub struct ChangeAnalyzer {
    parser: JavaParser,
}

impl ChangeAnalyzer {
    pub fn new() -> Result<Self, AnalyzeError> {
        Ok(Self {
            parser: JavaParser::new().map_err(AnalyzeError::ParserInit)?,
        })
    }

    /// Analyze a change-set into a complete fact set.
    pub fn analyze(&mut self, change: &ChangeSet) -> AnalysisResult {
        let mut result = AnalysisResult::default();
        let mut analyzed = Vec::new();

        for file in &change.files {
            match self.read_file(file) {
                Ok(Some(af)) => analyzed.push(af),
                Ok(None) => result.file_errors.push(FileError {
                    path: file.path().to_string(),
                    reason: "could not analyze: source does not parse as Java".to_string(),
                }),
                Err(e) => result.file_errors.push(FileError {
                    path: file.path().to_string(),
                    reason: format!("could not analyze: {}", e),
                }),
            }
        }

        for af in &analyzed {
            tracing::debug!(file = %af.path, "running detector passes");
            robustness::detect(af, &mut result.facts);
            immutability::detect(af, &mut result.facts);
            generics::detect(af, &mut result.facts);
            contracts::detect(af, &mut result.facts);
            spring::detect(af, &mut result.facts);
            testing::detect(af, &mut result.facts);
        }

        // The only cross-file pass; runs after every file is in.
        consistency::detect(&analyzed, &mut result.facts);

        result.files_analyzed = analyzed.len();
        result
    }

    /// Parse one file change. `Ok(None)` means the source was read but is
    /// not analyzable Java.
    fn read_file(
        &mut self,
        file: &FileChange,
    ) -> Result<Option<AnalyzedFile>, crate::changeset::ChangeError> {
        let (source, line_map) = match file {
            FileChange::Source { content, .. } => (content.clone(), None),
            FileChange::Patch { path, diff } => {
                let view = changeset::new_side(path, diff)?;
                (view.content, Some(view.line_map))
            }
        };

        let parse = self.parser.parse(&source);
        let usable = !parse.classes.is_empty() || !parse.methods.is_empty();
        if !usable && !parse.errors.is_empty() {
            return Ok(None);
        }

        Ok(Some(AnalyzedFile {
            path: file.path().to_string(),
            source,
            parse,
            line_map,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::facts::FactKind;

    fn analyze(files: &[(&str, &str)]) -> AnalysisResult {
        let mut change = ChangeSet::new("test");
        for (path, content) in files {
            change = change.with_source(*path, *content);
        }
        ChangeAnalyzer::new().unwrap().analyze(&change)
    }

    #[test]
    fn test_empty_changeset_yields_no_facts() {
        let result = analyze(&[]);
        assert!(result.facts.is_empty());
        assert!(result.file_errors.is_empty());
    }

    #[test]
    fn test_unparseable_file_is_isolated() {
        let result = analyze(&[
            ("Broken.java", "this is not java at all ::: %%%"),
            (
                "Ok.java",
                "public class Ok { @Autowired private OrderRepository repo; }",
            ),
        ]);

        assert_eq!(result.file_errors.len(), 1);
        assert_eq!(result.file_errors[0].path, "Broken.java");
        assert_eq!(result.files_analyzed, 1);
        assert!(result
            .facts
            .iter()
            .any(|f| f.kind == FactKind::FieldInjection));
    }

    #[test]
    fn test_patch_lines_are_mapped() {
        let patch = "\
--- a/OrderService.java
+++ b/OrderService.java
@@ -10,3 +10,4 @@
 public class OrderService {
+    @Autowired private OrderRepository repo;
 }
";
        let mut change = ChangeSet::new("pr-42");
        change = change.with_patch("OrderService.java", patch);
        let result = ChangeAnalyzer::new().unwrap().analyze(&change);

        let fact = result
            .facts
            .iter()
            .find(|f| f.kind == FactKind::FieldInjection)
            .expect("field injection fact");
        assert_eq!(fact.location.line, 11);
    }
}
