//! Cross-file consistency: naming mismatches inside one change-set.
//!
//! The one detector that looks at the whole change at once. A stereotype
//! suffix convention only exists when the change itself demonstrates it, so
//! a deviant is flagged only when a clear majority of the change's own
//! classes follow the suffix.

use rustc_hash::FxHashMap;

use crate::facts::{Fact, FactKind};

use super::AnalyzedFile;

/// Stereotype annotation → expected class-name suffix.
const SUFFIX_CONVENTIONS: &[(&str, &str)] = &[
    ("Service", "Service"),
    ("Repository", "Repository"),
    ("RestController", "Controller"),
    ("Controller", "Controller"),
];

pub(crate) fn detect(files: &[AnalyzedFile], facts: &mut Vec<Fact>) {
    // suffix → (conforming count, deviants)
    let mut tally: FxHashMap<&'static str, (usize, Vec<(usize, usize)>)> = FxHashMap::default();

    for (file_idx, file) in files.iter().enumerate() {
        for (class_idx, class) in file.parse.classes.iter().enumerate() {
            let suffix = SUFFIX_CONVENTIONS
                .iter()
                .find(|(ann, _)| class.has_annotation(ann))
                .map(|(_, suffix)| *suffix);
            let suffix = match suffix {
                Some(s) => s,
                None => continue,
            };
            let entry = tally.entry(suffix).or_default();
            if class.name.ends_with(suffix) {
                entry.0 += 1;
            } else {
                entry.1.push((file_idx, class_idx));
            }
        }
    }

    for (suffix, (conforming, deviants)) in tally {
        // The change must establish the convention before anyone can break it.
        if conforming < 2 || deviants.is_empty() || conforming <= deviants.len() {
            continue;
        }
        for (file_idx, class_idx) in deviants {
            let file = &files[file_idx];
            let class = &file.parse.classes[class_idx];
            facts.push(
                Fact::new(FactKind::NamingInconsistency, file.location(&class.range))
                    .with_attr("class", class.name.clone())
                    .with_attr("expected", format!("'*{}'", suffix)),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::analyzer::ChangeAnalyzer;
    use crate::changeset::ChangeSet;
    use crate::facts::FactKind;

    #[test]
    fn test_deviant_among_conforming_classes() {
        let change = ChangeSet::new("t")
            .with_source("A.java", "@Service public class OrderService { }")
            .with_source("B.java", "@Service public class BillingService { }")
            .with_source("C.java", "@Service public class InventoryManager { }");
        let result = ChangeAnalyzer::new().unwrap().analyze(&change);

        let f = result
            .facts
            .iter()
            .find(|f| f.kind == FactKind::NamingInconsistency)
            .unwrap();
        assert_eq!(f.attr("class"), Some("InventoryManager"));
        assert_eq!(f.attr("expected"), Some("'*Service'"));
        assert_eq!(f.location.file, "C.java");
    }

    #[test]
    fn test_no_convention_no_fact() {
        // One conforming class does not make a convention.
        let change = ChangeSet::new("t")
            .with_source("A.java", "@Service public class OrderService { }")
            .with_source("B.java", "@Service public class InventoryManager { }");
        let result = ChangeAnalyzer::new().unwrap().analyze(&change);
        assert!(!result
            .facts
            .iter()
            .any(|f| f.kind == FactKind::NamingInconsistency));
    }

    #[test]
    fn test_all_conforming_is_silent() {
        let change = ChangeSet::new("t")
            .with_source("A.java", "@Service public class OrderService { }")
            .with_source("B.java", "@Service public class BillingService { }");
        let result = ChangeAnalyzer::new().unwrap().analyze(&change);
        assert!(!result
            .facts
            .iter()
            .any(|f| f.kind == FactKind::NamingInconsistency));
    }
}
