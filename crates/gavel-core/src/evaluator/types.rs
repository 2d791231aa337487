//! Finding types.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::facts::Location;
use crate::registry::{Category, Severity};

/// One concrete, verified issue or commendation tied to a specific rule and
/// location. Created during evaluation, consumed once by the formatter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    pub rule_id: String,
    pub category: Category,
    pub severity: Severity,
    /// Rendered message with fact attributes substituted.
    pub message: String,
    /// At least one fact location backs every finding.
    pub locations: SmallVec<[Location; 1]>,
    /// Stable xxh3 fingerprint of rule id + backing fact, used to
    /// deduplicate within one run.
    pub fingerprint: u64,
}

impl Finding {
    /// Primary location for display and sorting.
    pub fn location(&self) -> &Location {
        &self.locations[0]
    }
}

/// Evaluator failures. These indicate a registry or logic defect, not an
/// environmental condition, and are fatal to the run.
#[derive(Debug, thiserror::Error)]
pub enum EvalError {
    #[error("rule {rule_id}: message template references unknown attribute {{{placeholder}}}")]
    UnknownPlaceholder { rule_id: String, placeholder: String },
}
