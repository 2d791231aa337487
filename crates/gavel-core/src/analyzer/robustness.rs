//! Robustness detectors: swallowed exceptions and resource cleanup.

use regex::Regex;

use crate::facts::{Fact, FactKind};

use super::AnalyzedFile;

/// Types whose construction demands a close. Wrapping streams count: closing
/// the outermost closes the chain, so nested creations are skipped.
const CLOSEABLE_TYPES: &[&str] = &[
    "FileInputStream", "FileOutputStream", "FileReader", "FileWriter",
    "BufferedReader", "BufferedWriter", "InputStreamReader", "OutputStreamWriter",
    "PrintWriter", "Scanner", "Socket", "ServerSocket", "RandomAccessFile",
];

pub(crate) fn detect(file: &AnalyzedFile, facts: &mut Vec<Fact>) {
    detect_swallowed(file, facts);
    detect_unclosed(file, facts);
    detect_try_with_resources(file, facts);
}

fn detect_swallowed(file: &AnalyzedFile, facts: &mut Vec<Fact>) {
    for catch in &file.parse.catches {
        let exception = if catch.caught_types.is_empty() {
            "Exception".to_string()
        } else {
            catch.caught_types.join(" | ")
        };
        let class = catch.class_name.clone().unwrap_or_default();
        if class.is_empty() {
            continue;
        }

        let swallowed = if catch.statement_count == 0 {
            true
        } else if catch.param_name.is_empty() {
            false
        } else {
            // A non-empty body that never references the exception and never
            // throws discards the failure. A body that throws something else
            // is at least propagating; leave it alone. The reference check is
            // whole-word so a one-letter parameter does not match inside
            // unrelated identifiers.
            let references_param =
                Regex::new(&format!(r"\b{}\b", regex::escape(&catch.param_name)))
                    .map(|re| re.is_match(&catch.body_source))
                    .unwrap_or(true);
            !references_param && !catch.body_source.contains("throw")
        };

        if swallowed {
            facts.push(
                Fact::new(FactKind::SwallowedException, file.location(&catch.range))
                    .with_attr("class", class)
                    .with_attr("exception", exception),
            );
        }
    }
}

fn detect_unclosed(file: &AnalyzedFile, facts: &mut Vec<Fact>) {
    for creation in &file.parse.creations {
        if creation.in_resource_spec || creation.nested || creation.escapes {
            continue;
        }
        let base_type = creation
            .type_name
            .split('<')
            .next()
            .unwrap_or(&creation.type_name);
        if !CLOSEABLE_TYPES.contains(&base_type) {
            continue;
        }
        // Field initializers and other non-method contexts are skipped; the
        // lifetime is not visible there.
        let method = match &creation.method_name {
            Some(m) => m,
            None => continue,
        };
        let body = file
            .parse
            .methods
            .iter()
            .find(|m| m.name == *method && m.body_range.is_some())
            .and_then(|m| m.body_range.as_ref())
            .map(|r| file.slice(r))
            .unwrap_or_default();

        if body.contains(".close(") {
            continue;
        }

        facts.push(
            Fact::new(FactKind::ResourceNotClosed, file.location(&creation.range))
                .with_attr("type", base_type)
                .with_attr("method", method.clone()),
        );
    }
}

fn detect_try_with_resources(file: &AnalyzedFile, facts: &mut Vec<Fact>) {
    for t in &file.parse.tries {
        if !t.with_resources {
            continue;
        }
        if let Some(method) = &t.method_name {
            facts.push(
                Fact::new(FactKind::TryWithResources, file.location(&t.range))
                    .with_attr("method", method.clone()),
            );
        }
    }
}
