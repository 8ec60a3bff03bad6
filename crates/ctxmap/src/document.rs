//! Backend-agnostic drawable document.
//!
//! A [`DrawableDocument`] is a plain aggregation of a [`ContextMapLayout`]:
//! it carries everything a renderer needs, in canvas coordinates, and no
//! layout logic. Rendering backends live in [`crate::export`].

use std::fmt;

use log::warn;

use ctxmap_core::{
    geometry::{Point, Size},
    graph::ArrowDirection,
    text::FontDefinition,
};

use crate::layout::{ContextMapLayout, labels::EndpointLabel};

/// The visible region of the canvas, centered on the origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewBox {
    min_x: f32,
    min_y: f32,
    width: f32,
    height: f32,
}

impl ViewBox {
    /// View box of a `width × height` canvas: `(-w/2, -h/2, w, h)`.
    pub fn centered(canvas: Size) -> Self {
        Self {
            min_x: -canvas.width() / 2.0,
            min_y: -canvas.height() / 2.0,
            width: canvas.width(),
            height: canvas.height(),
        }
    }

    pub fn min_x(&self) -> f32 {
        self.min_x
    }

    pub fn min_y(&self) -> f32 {
        self.min_y
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn height(&self) -> f32 {
        self.height
    }
}

impl fmt::Display for ViewBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{},{},{},{}",
            self.min_x, self.min_y, self.width, self.height
        )
    }
}

/// An ellipse with its centered label.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeShape {
    id: String,
    center: Point,
    radii: Size,
    label: String,
    label_offset: Point,
}

impl NodeShape {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn center(&self) -> Point {
        self.center
    }

    pub fn radii(&self) -> Size {
        self.radii
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Label start relative to [`center`](Self::center).
    pub fn label_offset(&self) -> Point {
        self.label_offset
    }
}

/// Text attached to one end of a link.
#[derive(Debug, Clone, PartialEq)]
pub struct EndpointText {
    anchor: Point,
    label: EndpointLabel,
}

impl EndpointText {
    pub fn anchor(&self) -> Point {
        self.anchor
    }

    pub fn box_text(&self) -> Option<&str> {
        self.label.box_text()
    }

    pub fn body_text(&self) -> Option<&str> {
        self.label.body_text()
    }
}

/// A routed relationship ready to draw.
#[derive(Debug, Clone, PartialEq)]
pub struct LinkShape {
    path: String,
    arrow: ArrowDirection,
    middle_label: Option<(Point, &'static str)>,
    source_text: Option<EndpointText>,
    target_text: Option<EndpointText>,
}

impl LinkShape {
    /// SVG path data.
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn arrow(&self) -> ArrowDirection {
        self.arrow
    }

    pub fn has_start_marker(&self) -> bool {
        self.arrow.has_left()
    }

    pub fn has_end_marker(&self) -> bool {
        self.arrow.has_right()
    }

    /// Anchor and text of the relationship pattern label, if any.
    pub fn middle_label(&self) -> Option<(Point, &'static str)> {
        self.middle_label
    }

    pub fn source_text(&self) -> Option<&EndpointText> {
        self.source_text.as_ref()
    }

    pub fn target_text(&self) -> Option<&EndpointText> {
        self.target_text.as_ref()
    }
}

/// Everything needed to draw a context map.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawableDocument {
    view_box: ViewBox,
    font: FontDefinition,
    nodes: Vec<NodeShape>,
    links: Vec<LinkShape>,
}

impl DrawableDocument {
    /// Collect the shapes of `layout`, in declaration order.
    ///
    /// Nodes without a position are skipped; after a successful layout pass
    /// every node has one.
    pub fn from_layout(layout: &ContextMapLayout, font: &FontDefinition) -> Self {
        let nodes = layout
            .nodes()
            .iter()
            .filter_map(|node| {
                let Some(center) = node.position() else {
                    warn!(id = node.id(); "Skipping node without position");
                    return None;
                };
                Some(NodeShape {
                    id: node.id().to_string(),
                    center,
                    radii: node.radii(),
                    label: node.label().to_string(),
                    label_offset: node.label_offset(),
                })
            })
            .collect();

        let links = layout
            .links()
            .iter()
            .map(|link| {
                let labels = link.labels();
                LinkShape {
                    path: link.path_data(),
                    arrow: link.arrow(),
                    middle_label: labels.middle().map(|text| (link.label_anchor(), text)),
                    source_text: endpoint_text(link.source_anchor(), labels.source()),
                    target_text: endpoint_text(link.target_anchor(), labels.target()),
                }
            })
            .collect();

        Self {
            view_box: ViewBox::centered(layout.canvas()),
            font: font.clone(),
            nodes,
            links,
        }
    }

    pub fn view_box(&self) -> ViewBox {
        self.view_box
    }

    pub fn font(&self) -> &FontDefinition {
        &self.font
    }

    pub fn nodes(&self) -> &[NodeShape] {
        &self.nodes
    }

    pub fn links(&self) -> &[LinkShape] {
        &self.links
    }
}

fn endpoint_text(anchor: Point, label: &EndpointLabel) -> Option<EndpointText> {
    (!label.is_empty()).then(|| EndpointText {
        anchor,
        label: label.clone(),
    })
}
