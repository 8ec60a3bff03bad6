//! Accumulates parsed statements into a [`ContextMapGraph`].

use log::{debug, trace};

use ctxmap_core::graph::{ContextMapGraph, Edge, Node, RelationshipEndpoint};

use crate::parser_types as types;

/// Builds a [`ContextMapGraph`] statement by statement.
///
/// Every parse owns its own builder, so parsing is re-entrant. The builder
/// records exactly what it is given: duplicate declarations are kept and
/// relationships to undeclared contexts are accepted.
///
/// # Examples
///
/// ```
/// # use ctxmap_core::graph::{ArrowDirection, Edge, Node, RelationshipEndpoint};
/// # use ctxmap_parser::GraphBuilder;
/// let mut builder = GraphBuilder::new();
/// builder.set_name("Insurance");
/// builder.add_node(Node::new("Policy"));
/// builder.add_edge(Edge::new(
///     RelationshipEndpoint::untyped("Policy"),
///     RelationshipEndpoint::untyped("Claims"),
///     ArrowDirection::Right,
/// ));
///
/// assert_eq!(builder.graph().context_map(), Some("Insurance"));
/// assert_eq!(builder.graph().edges().len(), 1);
///
/// builder.clear();
/// assert!(builder.graph().is_empty());
/// ```
#[derive(Debug, Default)]
pub struct GraphBuilder {
    graph: ContextMapGraph,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.graph.set_context_map(Some(name.into()));
    }

    pub fn add_node(&mut self, node: Node) {
        trace!(id = node.id(); "Adding node");
        self.graph.push_node(node);
    }

    pub fn add_edge(&mut self, edge: Edge) {
        trace!(
            source = edge.source().id(),
            target = edge.target().id(),
            arrow:% = edge.arrow();
            "Adding edge"
        );
        self.graph.push_edge(edge);
    }

    /// The graph built so far.
    pub fn graph(&self) -> &ContextMapGraph {
        &self.graph
    }

    /// Reset to an empty graph with no name.
    pub fn clear(&mut self) {
        self.graph = ContextMapGraph::default();
    }

    pub fn into_graph(self) -> ContextMapGraph {
        self.graph
    }

    /// Feed every statement of a parsed document, in source order.
    pub(crate) fn add_document(&mut self, document: &types::Document<'_>) {
        let Some(block) = &document.context_map else {
            debug!("Document has no context map");
            return;
        };

        if let Some(name) = &block.name {
            self.set_name(*name.inner());
        }

        for statement in &block.statements {
            match statement {
                types::Statement::Contains(ids) => {
                    for id in ids {
                        self.add_node(Node::new(*id.inner()));
                    }
                }
                types::Statement::Relationship(rel) => {
                    self.add_edge(Edge::new(
                        endpoint(&rel.source),
                        endpoint(&rel.target),
                        *rel.arrow.inner(),
                    ));
                }
            }
        }

        debug!(
            nodes = self.graph.nodes().len(),
            edges = self.graph.edges().len();
            "Context map built"
        );
    }
}

fn endpoint(endpoint: &types::Endpoint<'_>) -> RelationshipEndpoint {
    RelationshipEndpoint::new(
        *endpoint.id.inner(),
        endpoint
            .types
            .iter()
            .map(|tag| tag.inner().to_string())
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use ctxmap_core::graph::ArrowDirection;

    use super::*;
    use crate::span::{Span, Spanned};

    fn spanned(value: &str) -> Spanned<&str> {
        Spanned::new(value, Span::default())
    }

    #[test]
    fn test_new_builder_is_empty() {
        let builder = GraphBuilder::new();

        assert!(builder.graph().is_empty());
        assert_eq!(builder.graph().context_map(), None);
    }

    #[test]
    fn test_duplicate_nodes_are_kept() {
        let mut builder = GraphBuilder::new();
        builder.add_node(Node::new("A"));
        builder.add_node(Node::new("A"));

        assert_eq!(builder.graph().nodes().len(), 2);
    }

    #[test]
    fn test_clear_resets_name_nodes_and_edges() {
        let mut builder = GraphBuilder::new();
        builder.set_name("Map");
        builder.add_node(Node::new("A"));
        builder.add_edge(Edge::new(
            RelationshipEndpoint::untyped("A"),
            RelationshipEndpoint::untyped("B"),
            ArrowDirection::Left,
        ));

        builder.clear();

        assert_eq!(builder.into_graph(), ContextMapGraph::default());
    }

    #[test]
    fn test_add_document_in_statement_order() {
        let document = types::Document {
            context_map: Some(Spanned::new(
                types::ContextMapBlock {
                    name: Some(spanned("Demo")),
                    statements: vec![
                        types::Statement::Contains(vec![spanned("B"), spanned("A")]),
                        types::Statement::Relationship(types::Relationship {
                            source: types::Endpoint {
                                id: spanned("A"),
                                types: vec![spanned("U"), spanned("OHS")],
                            },
                            arrow: Spanned::new(ArrowDirection::Right, Span::default()),
                            target: types::Endpoint {
                                id: spanned("B"),
                                types: vec![spanned("D")],
                            },
                        }),
                    ],
                },
                Span::default(),
            )),
        };

        let mut builder = GraphBuilder::new();
        builder.add_document(&document);
        let graph = builder.into_graph();

        assert_eq!(graph.context_map(), Some("Demo"));
        let ids: Vec<_> = graph.nodes().iter().map(Node::id).collect();
        assert_eq!(ids, vec!["B", "A"]);

        let edge = &graph.edges()[0];
        assert_eq!(edge.source().types(), &["U".to_string(), "OHS".to_string()]);
        assert_eq!(edge.target().types(), &["D".to_string()]);
        assert_eq!(edge.arrow(), ArrowDirection::Right);
    }
}
