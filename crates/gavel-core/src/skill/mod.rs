//! Skill-document interface.
//!
//! The review checklist ships as a Markdown document with YAML front matter
//! (`name`, `description`) and a fixed section sequence the reviewing agent
//! reads in order. This module parses that document, validates the section
//! order, and lifts its checklist bullets into advisory rule records so the
//! registry, not prose growth, is the source of truth.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::registry::{Applicability, Category, Rule, Severity};

/// The section sequence the agent is expected to read, in order.
pub const SECTION_ORDER: &[&str] = &[
    "Understanding the Change",
    "Java Checks",
    "Spring Checks",
    "Architecture Checks",
    "Test Quality",
    "Feedback Format",
];

/// Machine-readable front-matter block.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrontMatter {
    pub name: String,
    pub description: String,
}

/// One `##` section of the document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Section {
    pub title: String,
    pub body: String,
}

/// A parsed skill document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillDoc {
    pub front_matter: FrontMatter,
    pub sections: Vec<Section>,
}

#[derive(Debug, thiserror::Error)]
pub enum SkillError {
    #[error("document has no front-matter block")]
    MissingFrontMatter,

    #[error("invalid front matter: {0}")]
    FrontMatter(#[from] serde_yaml::Error),

    #[error("section {section:?} appears out of the expected reading order")]
    OutOfOrder { section: String },
}

impl SkillDoc {
    /// Parse front matter and sections out of a Markdown document.
    /// Line endings are normalized, so CRLF documents parse the same way.
    pub fn parse(text: &str) -> Result<Self, SkillError> {
        let text = text.replace("\r\n", "\n");
        let rest = text.strip_prefix("---").ok_or(SkillError::MissingFrontMatter)?;
        let end = rest.find("\n---").ok_or(SkillError::MissingFrontMatter)?;
        let front_matter: FrontMatter = serde_yaml::from_str(&rest[..end])?;
        let body = &rest[end + 4..];

        let mut sections: Vec<Section> = Vec::new();
        for line in body.lines() {
            if let Some(title) = line.strip_prefix("## ") {
                sections.push(Section {
                    title: title.trim().to_string(),
                    body: String::new(),
                });
            } else if let Some(section) = sections.last_mut() {
                section.body.push_str(line);
                section.body.push('\n');
            }
        }

        Ok(Self { front_matter, sections })
    }

    /// Check that the known sections appear in the fixed reading order.
    /// Sections outside `SECTION_ORDER` are tolerated anywhere.
    pub fn validate_order(&self) -> Result<(), SkillError> {
        let mut last = 0usize;
        for section in &self.sections {
            if let Some(pos) = SECTION_ORDER.iter().position(|s| *s == section.title) {
                if pos < last {
                    return Err(SkillError::OutOfOrder {
                        section: section.title.clone(),
                    });
                }
                last = pos;
            }
        }
        Ok(())
    }

    /// Lift checklist bullets into advisory rule records, one versioned
    /// record per bullet, ids prefixed `R-DOC-`.
    pub fn advisory_rules(&self) -> Vec<Rule> {
        static BULLET: Lazy<Regex> =
            Lazy::new(|| Regex::new(r"(?m)^\s*[-*]\s+(.+)$").expect("bullet regex"));

        let mut rules = Vec::new();
        for section in &self.sections {
            let category = match section.title.as_str() {
                "Understanding the Change" => Category::Consistency,
                "Java Checks" => Category::Robustness,
                "Spring Checks" => Category::SpringDi,
                "Architecture Checks" => Category::SpringLayers,
                "Test Quality" => Category::Testing,
                _ => continue, // feedback-format rules are not review rules
            };
            for cap in BULLET.captures_iter(&section.body) {
                let text = cap[1].trim().to_string();
                if text.is_empty() {
                    continue;
                }
                let id = format!("R-DOC-{:03}", rules.len() + 1);
                rules.push(Rule {
                    id,
                    version: 1,
                    category,
                    severity: Severity::Suggested,
                    title: section.title.clone(),
                    message: text,
                    applicability: Applicability::Advisory,
                });
            }
        }
        rules
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::RuleSet;

    const DOC: &str = "\
---
name: java-spring-review
description: Review Java/Spring pull requests against the team checklist.
---

# Review skill

## Understanding the Change

- Read the PR description and confirm it matches the diff.

## Java Checks

- Watch for swallowed exceptions.
- Prefer final fields.

## Test Quality

- Every test should fail when the implementation breaks.
";

    #[test]
    fn test_front_matter() {
        let doc = SkillDoc::parse(DOC).unwrap();
        assert_eq!(doc.front_matter.name, "java-spring-review");
        assert!(doc.front_matter.description.starts_with("Review Java"));
    }

    #[test]
    fn test_sections_in_order_validate() {
        let doc = SkillDoc::parse(DOC).unwrap();
        doc.validate_order().unwrap();
    }

    #[test]
    fn test_out_of_order_rejected() {
        let shuffled = "\
---
name: x
description: y
---
## Test Quality

- a bullet

## Java Checks

- another bullet
";
        let doc = SkillDoc::parse(shuffled).unwrap();
        let err = doc.validate_order().unwrap_err();
        assert!(matches!(err, SkillError::OutOfOrder { section } if section == "Java Checks"));
    }

    #[test]
    fn test_crlf_document_parses() {
        let crlf = DOC.replace('\n', "\r\n");
        let doc = SkillDoc::parse(&crlf).unwrap();
        assert_eq!(doc.front_matter.name, "java-spring-review");
        doc.validate_order().unwrap();
        assert_eq!(doc.advisory_rules().len(), 4);
    }

    #[test]
    fn test_missing_front_matter() {
        let err = SkillDoc::parse("# no front matter").unwrap_err();
        assert!(matches!(err, SkillError::MissingFrontMatter));
    }

    #[test]
    fn test_bullets_become_advisory_rules() {
        let doc = SkillDoc::parse(DOC).unwrap();
        let rules = doc.advisory_rules();
        assert_eq!(rules.len(), 4);
        assert!(rules.iter().all(|r| !r.automated()));
        assert_eq!(rules[0].id, "R-DOC-001");

        // Advisory records merge into the registry without clashing.
        let merged = RuleSet::load().unwrap().with_rules(rules).unwrap();
        assert!(merged.get("R-DOC-001").is_some());
    }
}
