//! Reference checks over a parsed document.

use std::collections::HashSet;

use crate::{
    error::{Diagnostic, DiagnosticCollector, ErrorCode},
    parser_types as types,
};

/// Warn about every relationship endpoint naming a context that no
/// `contains` declares. Declarations count wherever they appear in the block.
pub(crate) fn check_references(document: &types::Document<'_>) -> DiagnosticCollector {
    let mut collector = DiagnosticCollector::new();

    let Some(block) = &document.context_map else {
        return collector;
    };

    let declared: HashSet<&str> = block
        .statements
        .iter()
        .filter_map(|statement| match statement {
            types::Statement::Contains(ids) => Some(ids),
            types::Statement::Relationship(_) => None,
        })
        .flatten()
        .map(|id| *id.inner())
        .collect();

    for statement in &block.statements {
        let types::Statement::Relationship(rel) = statement else {
            continue;
        };

        for endpoint in [&rel.source, &rel.target] {
            let id = *endpoint.id.inner();
            if declared.contains(id) {
                continue;
            }
            collector.emit(
                Diagnostic::warning(format!("bounded context `{id}` is never declared"))
                    .with_code(ErrorCode::E200)
                    .with_label(endpoint.id.span(), "referenced here")
                    .with_secondary_label(rel.span(), "in this relationship")
                    .with_help(format!("add `contains {id}` to the context map")),
            );
        }
    }

    collector
}
