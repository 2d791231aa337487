//! Registry and skill-document tests: rules as data, loaded from disk.

use std::fs;

use gavel_core::{Category, RegistryError, RuleSet, SkillDoc};

const RULE_JSON: &str = r#"[
    {
        "id": "X-CUSTOM-001",
        "version": 1,
        "category": "spring-di",
        "severity": "blocking",
        "title": "Team-specific injection rule",
        "message": "Field '{field}' in {class} must use constructor injection",
        "applicability": { "type": "any_of", "kinds": ["field_injection"] }
    }
]"#;

#[test]
fn rules_load_from_a_json_file() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("rules.json");
    fs::write(&path, RULE_JSON)?;

    let rules = RuleSet::from_json(&fs::read_to_string(&path)?)?;
    assert_eq!(rules.len(), 1);
    let rule = rules.get("X-CUSTOM-001").expect("rule present");
    assert_eq!(rule.category, Category::SpringDi);
    assert!(rule.automated());
    Ok(())
}

#[test]
fn duplicate_id_across_sources_is_a_config_error() -> anyhow::Result<()> {
    let extra = RuleSet::from_json(RULE_JSON)?;
    let merged = RuleSet::load()?.with_rules(extra.iter().cloned().collect());
    assert!(merged.is_ok());

    // Adding the same record twice trips the duplicate check.
    let extra = RuleSet::from_json(RULE_JSON)?;
    let doubled = merged
        .unwrap()
        .with_rules(extra.iter().cloned().collect());
    match doubled {
        Err(RegistryError::DuplicateRuleId { id }) => assert_eq!(id, "X-CUSTOM-001"),
        other => panic!("expected duplicate-id error, got {:?}", other.map(|r| r.len())),
    }
    Ok(())
}

#[test]
fn malformed_rule_file_is_a_parse_error() {
    let err = RuleSet::from_json("{ not json ]").unwrap_err();
    assert!(matches!(err, RegistryError::Parse(_)));
}

#[test]
fn skill_document_loads_from_disk_and_extends_the_registry() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("SKILL.md");
    fs::write(
        &path,
        "\
---
name: java-spring-review
description: Review Java/Spring pull requests against the team checklist.
---

## Understanding the Change

- Confirm the PR description matches the diff.

## Java Checks

- Watch for swallowed exceptions.
",
    )?;

    let doc = SkillDoc::parse(&fs::read_to_string(&path)?)?;
    doc.validate_order()?;
    assert_eq!(doc.front_matter.name, "java-spring-review");

    let base_len = RuleSet::load()?.len();
    let merged = RuleSet::load()?.with_rules(doc.advisory_rules())?;
    assert_eq!(merged.len(), base_len + 2);
    // Advisory records never match facts, so automated count is unchanged.
    assert_eq!(merged.automated_count(), RuleSet::load()?.automated_count());
    Ok(())
}
