//! Node sizing.
//!
//! A node is an ellipse whose diameters are the measured label extents plus
//! the configured padding:
//!
//! ```text
//! width  = padding.horizontal + text_width
//! height = padding.vertical   + text_height
//! ```
//!
//! The label is drawn from `(-text_width / 2, text_height / 4)` relative to
//! the center, which puts the baseline slightly below the middle so the
//! glyphs appear vertically centered.

use log::trace;

use ctxmap_core::{
    geometry::{Point, Size},
    graph::Node,
};

use super::{Configuration, LayoutNode};

/// Size a single node. The result has no position yet.
pub fn size_node(node: &Node, config: &Configuration<'_>) -> LayoutNode {
    let label = node.display_label();
    let font = config.font();
    let text_width = config.measure().measure_width(label, font);
    let text_height = config.measure().measure_height(label, font);

    let padding = config.node_padding();
    let size = Size::new(
        padding.horizontal() + text_width,
        padding.vertical() + text_height,
    );
    let label_offset = Point::new(-text_width / 2.0, text_height / 4.0);

    trace!(
        id = node.id(),
        width = size.width(),
        height = size.height();
        "Sized node"
    );

    LayoutNode::new(node.id(), label, size).with_label_offset(label_offset)
}

/// Size every node, keeping declaration order.
pub fn size_nodes(nodes: &[Node], config: &Configuration<'_>) -> Vec<LayoutNode> {
    nodes.iter().map(|node| size_node(node, config)).collect()
}
