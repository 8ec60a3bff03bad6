//! Deterministic layout of a context map.
//!
//! Layout runs in three stages over a [`ContextMapGraph`]:
//!
//! 1. [`sizing`] - measure each label and derive the ellipse diameters
//! 2. [`distribution`] - place the sized nodes in centered rows on the canvas
//! 3. [`routing`] - connect positioned nodes with straight or arced links
//!
//! Stage 2 is all-or-nothing and fails the whole pass. Stage 3 collects
//! failures per relationship so that the rest of the map still routes.

pub mod distribution;
pub mod labels;
pub mod routing;
pub mod sizing;

use std::sync::LazyLock;

use log::{debug, info};

use ctxmap_core::{
    geometry::{Point, Size},
    graph::ContextMapGraph,
    text::{FontDefinition, TextMeasure},
};

use crate::{
    config::{AppConfig, Spacing},
    error::LayoutError,
};

pub use routing::{Curve, Link};

/// Inputs of a layout pass.
///
/// # Examples
///
/// ```
/// # use ctxmap::{config::Spacing, layout::Configuration};
/// # use ctxmap_core::{geometry::Size, text::{FnMeasure, FontDefinition}};
/// let measure = FnMeasure::new(|text: &str, _: &FontDefinition| text.len() as f32, |_: &str, _: &FontDefinition| 15.0);
/// let config = Configuration::new(Size::new(500.0, 500.0), &measure)
///     .with_node_padding(Spacing::new(50.0, 10.0));
///
/// assert_eq!(config.node_margin(), Spacing::default());
/// ```
#[derive(Clone, Copy)]
pub struct Configuration<'a> {
    canvas: Size,
    font: &'a FontDefinition,
    measure: &'a dyn TextMeasure,
    node_padding: Spacing,
    node_margin: Spacing,
}

static DEFAULT_FONT: LazyLock<FontDefinition> = LazyLock::new(FontDefinition::default);

impl<'a> Configuration<'a> {
    /// Creates a configuration with the default font, no padding and no margins.
    pub fn new(canvas: Size, measure: &'a dyn TextMeasure) -> Self {
        Self {
            canvas,
            font: &DEFAULT_FONT,
            measure,
            node_padding: Spacing::default(),
            node_margin: Spacing::default(),
        }
    }

    /// Creates a configuration from the `[layout]` and `[font]` sections.
    pub fn from_app_config(config: &'a AppConfig, measure: &'a dyn TextMeasure) -> Self {
        let layout = config.layout();
        Self::new(Size::new(layout.width(), layout.height()), measure)
            .with_font(config.font())
            .with_node_padding(layout.node_padding())
            .with_node_margin(layout.node_margin())
    }

    pub fn with_font(mut self, font: &'a FontDefinition) -> Self {
        self.font = font;
        self
    }

    /// Sets the ellipse base size added to every measured label (`rx`, `ry`).
    pub fn with_node_padding(mut self, padding: Spacing) -> Self {
        self.node_padding = padding;
        self
    }

    pub fn with_node_margin(mut self, margin: Spacing) -> Self {
        self.node_margin = margin;
        self
    }

    pub fn canvas(&self) -> Size {
        self.canvas
    }

    pub fn font(&self) -> &'a FontDefinition {
        self.font
    }

    pub fn measure(&self) -> &'a dyn TextMeasure {
        self.measure
    }

    pub fn node_padding(&self) -> Spacing {
        self.node_padding
    }

    pub fn node_margin(&self) -> Spacing {
        self.node_margin
    }
}

/// A bounded context with its derived geometry.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutNode {
    id: String,
    label: String,
    size: Size,
    label_offset: Point,
    position: Option<Point>,
}

impl LayoutNode {
    /// Creates an unpositioned node of `size` (full ellipse diameters).
    pub fn new(id: impl Into<String>, label: impl Into<String>, size: Size) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            size,
            label_offset: Point::default(),
            position: None,
        }
    }

    /// Sets where the label baseline starts relative to the node center.
    pub fn with_label_offset(mut self, offset: Point) -> Self {
        self.label_offset = offset;
        self
    }

    /// Creates a node that is already placed at `position`.
    pub fn with_position(mut self, position: Point) -> Self {
        self.position = Some(position);
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn size(&self) -> Size {
        self.size
    }

    /// Ellipse radii.
    pub fn radii(&self) -> Size {
        self.size.half()
    }

    pub fn label_offset(&self) -> Point {
        self.label_offset
    }

    /// Center of the node, or `None` before distribution.
    pub fn position(&self) -> Option<Point> {
        self.position
    }

    fn place(&mut self, position: Point) {
        debug_assert!(self.position.is_none(), "node placed twice");
        self.position = Some(position);
    }
}

/// Result of a layout pass.
///
/// Relationships that could not be routed are absent from [`links`] and
/// described in [`errors`].
///
/// [`links`]: ContextMapLayout::links
/// [`errors`]: ContextMapLayout::errors
#[derive(Debug, Clone, PartialEq)]
pub struct ContextMapLayout {
    canvas: Size,
    nodes: Vec<LayoutNode>,
    links: Vec<Link>,
    errors: Vec<LayoutError>,
}

impl ContextMapLayout {
    pub fn canvas(&self) -> Size {
        self.canvas
    }

    pub fn nodes(&self) -> &[LayoutNode] {
        &self.nodes
    }

    pub fn links(&self) -> &[Link] {
        &self.links
    }

    pub fn errors(&self) -> &[LayoutError] {
        &self.errors
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn into_errors(self) -> Vec<LayoutError> {
        self.errors
    }
}

/// Size, distribute and route every element of `graph`.
///
/// # Errors
///
/// Returns [`LayoutError::DegenerateConfiguration`] when the canvas, margins
/// or measured sizes leave no valid placement. Per-relationship failures do
/// not fail the pass; they are reported by [`ContextMapLayout::errors`].
pub fn compute(
    graph: &ContextMapGraph,
    config: &Configuration<'_>,
) -> Result<ContextMapLayout, LayoutError> {
    info!(
        nodes = graph.nodes().len(),
        edges = graph.edges().len();
        "Computing context map layout"
    );

    let mut nodes = sizing::size_nodes(graph.nodes(), config);
    distribution::distribute(&mut nodes, config.canvas(), config.node_margin())?;
    debug!(nodes = nodes.len(); "Nodes distributed");

    let (links, errors) = routing::route_links(graph.edges(), &nodes);
    debug!(links = links.len(), errors = errors.len(); "Links routed");

    Ok(ContextMapLayout {
        canvas: config.canvas(),
        nodes,
        links,
        errors,
    })
}
