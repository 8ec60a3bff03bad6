//! The canonical context map model.
//!
//! A [`ContextMapGraph`] is what the parser produces and what layout
//! consumes: an optional map name, the declared bounded contexts in
//! declaration order and the relationships between them.

use std::{fmt, str::FromStr};

/// A declared bounded context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    id: String,
    label: Option<String>,
}

impl Node {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: None,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// Text shown inside the node: the label when present, the id otherwise.
    pub fn display_label(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.id)
    }
}

/// One side of a relationship: the referenced context and its type tags.
///
/// Tags are free-form (`U`, `D`, `OHS`, `PL`, `ACL`, `CF`, `SK`, `P`, `C`,
/// `S`, ...) and are kept in written order, duplicates included.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelationshipEndpoint {
    id: String,
    types: Vec<String>,
}

impl RelationshipEndpoint {
    pub fn new(id: impl Into<String>, types: Vec<String>) -> Self {
        Self {
            id: id.into(),
            types,
        }
    }

    pub fn untyped(id: impl Into<String>) -> Self {
        Self::new(id, Vec::new())
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn types(&self) -> &[String] {
        &self.types
    }

    pub fn has_type(&self, tag: &str) -> bool {
        self.types.iter().any(|t| t == tag)
    }
}

/// A side of a relationship an arrowhead can be drawn on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArrowSide {
    Left,
    Right,
}

/// Which ends of a relationship carry an arrowhead.
///
/// `Left` is written `<-` and points at the source, `Right` is written `->`
/// and points at the target, `Bidirectional` is written `<->`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArrowDirection {
    Left,
    Right,
    Bidirectional,
}

impl ArrowDirection {
    /// The sides carrying an arrowhead, in `left, right` order.
    ///
    /// Never empty and never contains a side twice.
    pub fn sides(self) -> &'static [ArrowSide] {
        match self {
            Self::Left => &[ArrowSide::Left],
            Self::Right => &[ArrowSide::Right],
            Self::Bidirectional => &[ArrowSide::Left, ArrowSide::Right],
        }
    }

    pub fn has_left(self) -> bool {
        matches!(self, Self::Left | Self::Bidirectional)
    }

    pub fn has_right(self) -> bool {
        matches!(self, Self::Right | Self::Bidirectional)
    }

    /// Source syntax of this arrow.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Left => "<-",
            Self::Right => "->",
            Self::Bidirectional => "<->",
        }
    }
}

impl fmt::Display for ArrowDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ArrowDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "<-" => Ok(Self::Left),
            "->" => Ok(Self::Right),
            "<->" => Ok(Self::Bidirectional),
            _ => Err(format!("invalid arrow `{s}`")),
        }
    }
}

/// A relationship between two bounded contexts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edge {
    source: RelationshipEndpoint,
    target: RelationshipEndpoint,
    arrow: ArrowDirection,
}

impl Edge {
    pub fn new(
        source: RelationshipEndpoint,
        target: RelationshipEndpoint,
        arrow: ArrowDirection,
    ) -> Self {
        Self {
            source,
            target,
            arrow,
        }
    }

    pub fn source(&self) -> &RelationshipEndpoint {
        &self.source
    }

    pub fn target(&self) -> &RelationshipEndpoint {
        &self.target
    }

    pub fn arrow(&self) -> ArrowDirection {
        self.arrow
    }
}

/// A parsed context map.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContextMapGraph {
    context_map: Option<String>,
    nodes: Vec<Node>,
    edges: Vec<Edge>,
}

impl ContextMapGraph {
    pub fn new(context_map: Option<String>, nodes: Vec<Node>, edges: Vec<Edge>) -> Self {
        Self {
            context_map,
            nodes,
            edges,
        }
    }

    pub fn context_map(&self) -> Option<&str> {
        self.context_map.as_deref()
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty()
    }

    pub fn set_context_map(&mut self, name: Option<String>) {
        self.context_map = name;
    }

    pub fn push_node(&mut self, node: Node) {
        self.nodes.push(node);
    }

    pub fn push_edge(&mut self, edge: Edge) {
        self.edges.push(edge);
    }
}
