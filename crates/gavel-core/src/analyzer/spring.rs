//! Spring detectors: injection style, layering, transactions, N+1 access.

use crate::facts::{Fact, FactKind};
use crate::parsers::ClassInfo;

use super::AnalyzedFile;

const STEREOTYPES: &[&str] = &[
    "Service", "Component", "Repository", "Controller", "RestController",
];

/// Callees that read or write through a Spring Data repository.
const REPOSITORY_CALLS: &[&str] = &[
    "findById", "findAll", "findOne", "getById", "getOne", "getReferenceById",
    "save", "saveAll", "delete", "deleteById", "count", "existsById",
];

fn is_controller(class: &ClassInfo) -> bool {
    class.has_annotation("RestController") || class.has_annotation("Controller")
}

fn is_stereotype(class: &ClassInfo) -> bool {
    STEREOTYPES.iter().any(|s| class.has_annotation(s))
}

pub(crate) fn detect(file: &AnalyzedFile, facts: &mut Vec<Fact>) {
    detect_field_injection(file, facts);
    detect_constructor_injection(file, facts);
    detect_layering(file, facts);
    detect_transactional(file, facts);
    detect_repository_call_in_loop(file, facts);
}

fn detect_field_injection(file: &AnalyzedFile, facts: &mut Vec<Fact>) {
    for field in &file.parse.fields {
        if !(field.has_annotation("Autowired") || field.has_annotation("Inject")) {
            continue;
        }
        let class = field.class_name.clone().unwrap_or_default();
        if class.is_empty() {
            continue;
        }
        facts.push(
            Fact::new(FactKind::FieldInjection, file.location(&field.range))
                .with_attr("class", class)
                .with_attr("field", field.name.clone()),
        );
    }
}

fn detect_constructor_injection(file: &AnalyzedFile, facts: &mut Vec<Fact>) {
    for class in &file.parse.classes {
        if !is_stereotype(class) {
            continue;
        }
        let any_field_injected = file.parse.fields_of(&class.name).any(|f| {
            f.has_annotation("Autowired") || f.has_annotation("Inject")
        });
        if any_field_injected {
            continue;
        }
        let ctor = file
            .parse
            .methods_of(&class.name)
            .find(|m| m.is_constructor && !m.parameter_types.is_empty());
        if let Some(ctor) = ctor {
            facts.push(
                Fact::new(FactKind::ConstructorInjection, file.location(&ctor.range))
                    .with_attr("class", class.name.clone()),
            );
        }
    }
}

fn detect_layering(file: &AnalyzedFile, facts: &mut Vec<Fact>) {
    for class in &file.parse.classes {
        if !is_controller(class) {
            continue;
        }

        let repo_fields: Vec<_> = file
            .parse
            .fields_of(&class.name)
            .filter(|f| f.type_name.split('<').next().unwrap_or("").ends_with("Repository"))
            .collect();

        for field in &repo_fields {
            facts.push(
                Fact::new(
                    FactKind::RepositoryAccessFromController,
                    file.location(&field.range),
                )
                .with_attr("class", class.name.clone())
                .with_attr("field", field.name.clone()),
            );
        }

        // A handler that both branches/loops and talks to a repository is
        // doing service work in the web layer.
        for method in file.parse.methods_of(&class.name) {
            if method.is_constructor || !method.is_public {
                continue;
            }
            let body = match &method.body_range {
                Some(r) => file.slice(r),
                None => continue,
            };
            let has_control_flow =
                body.contains("if (") || body.contains("for (") || body.contains("while (");
            if !has_control_flow {
                continue;
            }
            let calls_repository = file.parse.calls.iter().any(|c| {
                c.method_name.as_deref() == Some(method.name.as_str())
                    && c.class_name.as_deref() == Some(class.name.as_str())
                    && c.receiver
                        .as_deref()
                        .map(|r| repo_fields.iter().any(|f| f.name == r))
                        .unwrap_or(false)
            });
            if calls_repository {
                facts.push(
                    Fact::new(
                        FactKind::BusinessLogicInController,
                        file.location(&method.range),
                    )
                    .with_attr("class", class.name.clone())
                    .with_attr("method", method.name.clone()),
                );
            }
        }
    }
}

fn detect_transactional(file: &AnalyzedFile, facts: &mut Vec<Fact>) {
    for method in &file.parse.methods {
        if !method.has_annotation("Transactional") {
            continue;
        }
        let class_name = method.class_name.clone().unwrap_or_default();
        if class_name.is_empty() {
            continue;
        }

        let reason = if method.is_private {
            Some("Spring proxies cannot intercept private methods")
        } else if file
            .parse
            .class_by_name(&class_name)
            .map(is_controller)
            .unwrap_or(false)
        {
            Some("transaction boundaries belong in the service layer, not the web layer")
        } else {
            None
        };

        if let Some(reason) = reason {
            facts.push(
                Fact::new(FactKind::TransactionalMisplaced, file.location(&method.range))
                    .with_attr("class", class_name)
                    .with_attr("method", method.name.clone())
                    .with_attr("reason", reason),
            );
        }
    }
}

fn detect_repository_call_in_loop(file: &AnalyzedFile, facts: &mut Vec<Fact>) {
    for call in &file.parse.calls {
        if !call.in_loop {
            continue;
        }
        let method = match &call.method_name {
            Some(m) => m.clone(),
            None => continue,
        };
        let receiver = match &call.receiver {
            Some(r) => r,
            None => continue,
        };
        let receiver_is_repo = file.parse.fields.iter().any(|f| {
            f.name == *receiver
                && f.class_name == call.class_name
                && f.type_name.split('<').next().unwrap_or("").ends_with("Repository")
        });
        if !receiver_is_repo {
            continue;
        }
        let is_query = REPOSITORY_CALLS.contains(&call.callee.as_str())
            || call.callee.starts_with("findBy");
        if !is_query {
            continue;
        }

        facts.push(
            Fact::new(FactKind::RepositoryCallInLoop, file.location(&call.range))
                .with_attr("method", method)
                .with_attr("call", call.callee.clone()),
        );
    }
}
