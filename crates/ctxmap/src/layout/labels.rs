//! Relationship labels derived from endpoint type tags.
//!
//! Pattern tags that only make sense as a pair are shown once, in the middle
//! of the link:
//!
//! | Source | Target | Middle text |
//! |--------|--------|-------------|
//! | `SK`   | `SK`   | Shared Kernel |
//! | `P`    | `P`    | Partnership |
//! | `C`/`S`| `S`/`C`| Customer/Supplier |
//!
//! The first matching row wins. Upstream and downstream markers (`U`, `D`)
//! go into the small box next to each endpoint, and every other tag is
//! listed under it.

use ctxmap_core::graph::{Edge, RelationshipEndpoint};

const SHARED_KERNEL: &str = "SK";
const PARTNERSHIP: &str = "P";
const CUSTOMER: &str = "C";
const SUPPLIER: &str = "S";
const UPSTREAM: &str = "U";
const DOWNSTREAM: &str = "D";

const NO_TAGS: &[&str] = &[];
const SHARED_KERNEL_TAGS: &[&str] = &[SHARED_KERNEL];
const PARTNERSHIP_TAGS: &[&str] = &[PARTNERSHIP];
const CUSTOMER_SUPPLIER_TAGS: &[&str] = &[CUSTOMER, SUPPLIER];

/// Text drawn next to one end of a relationship.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EndpointLabel {
    box_text: Option<String>,
    body_text: Option<String>,
}

impl EndpointLabel {
    pub fn new(box_text: Option<String>, body_text: Option<String>) -> Self {
        Self {
            box_text,
            body_text,
        }
    }

    /// `U` or `D`, when the endpoint carries one.
    pub fn box_text(&self) -> Option<&str> {
        self.box_text.as_deref()
    }

    /// Remaining tags joined by `", "`.
    pub fn body_text(&self) -> Option<&str> {
        self.body_text.as_deref()
    }

    pub fn is_empty(&self) -> bool {
        self.box_text.is_none() && self.body_text.is_none()
    }
}

/// All labels of one relationship.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RelationshipLabels {
    middle: Option<&'static str>,
    source: EndpointLabel,
    target: EndpointLabel,
}

impl RelationshipLabels {
    pub fn middle(&self) -> Option<&'static str> {
        self.middle
    }

    pub fn source(&self) -> &EndpointLabel {
        &self.source
    }

    pub fn target(&self) -> &EndpointLabel {
        &self.target
    }
}

/// Derive the labels of `edge` from its endpoint tags.
pub fn relationship_labels(edge: &Edge) -> RelationshipLabels {
    let (source, target) = (edge.source(), edge.target());
    let pairs_with = |a: &str, b: &str| source.has_type(a) && target.has_type(b);

    let (middle, consumed): (Option<&'static str>, &[&str]) =
        if pairs_with(SHARED_KERNEL, SHARED_KERNEL) {
            (Some("Shared Kernel"), SHARED_KERNEL_TAGS)
        } else if pairs_with(PARTNERSHIP, PARTNERSHIP) {
            (Some("Partnership"), PARTNERSHIP_TAGS)
        } else if pairs_with(CUSTOMER, SUPPLIER) || pairs_with(SUPPLIER, CUSTOMER) {
            (Some("Customer/Supplier"), CUSTOMER_SUPPLIER_TAGS)
        } else {
            (None, NO_TAGS)
        };

    RelationshipLabels {
        middle,
        source: endpoint_label(source, consumed),
        target: endpoint_label(target, consumed),
    }
}

fn endpoint_label(endpoint: &RelationshipEndpoint, consumed: &[&str]) -> EndpointLabel {
    let is_direction = |tag: &&String| tag.as_str() == UPSTREAM || tag.as_str() == DOWNSTREAM;

    let box_text = join(endpoint.types().iter().filter(is_direction));
    let body_text = join(
        endpoint
            .types()
            .iter()
            .filter(|tag| !is_direction(tag) && !consumed.iter().any(|c| *c == tag.as_str())),
    );

    EndpointLabel::new(box_text, body_text)
}

fn join<'a>(tags: impl Iterator<Item = &'a String>) -> Option<String> {
    let tags: Vec<&str> = tags.map(String::as_str).collect();
    (!tags.is_empty()).then(|| tags.join(", "))
}
