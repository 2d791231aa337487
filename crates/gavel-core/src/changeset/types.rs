//! Change-set types.

use serde::{Deserialize, Serialize};

/// One reviewable unit of work, e.g. a pull request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangeSet {
    /// Caller-supplied identifier (PR number, branch name, ...).
    pub id: String,
    pub files: Vec<FileChange>,
}

impl ChangeSet {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            files: Vec::new(),
        }
    }

    pub fn with_source(mut self, path: impl Into<String>, content: impl Into<String>) -> Self {
        self.files.push(FileChange::Source {
            path: path.into(),
            content: content.into(),
        });
        self
    }

    pub fn with_patch(mut self, path: impl Into<String>, diff: impl Into<String>) -> Self {
        self.files.push(FileChange::Patch {
            path: path.into(),
            diff: diff.into(),
        });
        self
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

/// A changed file, polymorphic over change representations.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "repr", rename_all = "snake_case")]
pub enum FileChange {
    /// Full new contents of the file.
    Source { path: String, content: String },
    /// Unified diff hunks for the file.
    Patch { path: String, diff: String },
}

impl FileChange {
    pub fn path(&self) -> &str {
        match self {
            FileChange::Source { path, .. } => path,
            FileChange::Patch { path, .. } => path,
        }
    }
}

/// A per-file problem while reading a change representation.
#[derive(Debug, Clone, thiserror::Error, Serialize, Deserialize)]
pub enum ChangeError {
    #[error("{path}: malformed hunk header at patch line {line}: {reason}")]
    MalformedHunk { path: String, line: usize, reason: String },

    #[error("{path}: patch contains no hunks")]
    EmptyPatch { path: String },
}
