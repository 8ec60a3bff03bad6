//! SVG backend.
//!
//! Nodes become a translated `<g>` holding an `<ellipse>` and a `<text>`.
//! Links become `<path>` elements whose arrowheads reference two shared
//! `<marker>` definitions. Endpoint labels are drawn as a small boxed tag
//! (`U`/`D`) followed by the remaining pattern names.

use log::{debug, info};
use svg::{
    Document,
    node::{
        Text as SvgText,
        element::{self as svg_element, Definitions, Marker},
    },
};

use ctxmap_core::{color::Color, geometry::Point, text::FontDefinition};

use super::{Error, Exporter};
use crate::{
    config::StyleConfig,
    document::{DrawableDocument, EndpointText, LinkShape, NodeShape},
};

const ARROW_START_ID: &str = "ctxmap-arrow-start";
const ARROW_END_ID: &str = "ctxmap-arrow-end";
const BOX_PADDING: f32 = 3.0;
/// Approximate glyph advance, as a share of the font size, for sizing the tag box.
const GLYPH_WIDTH_FACTOR: f32 = 0.6;

/// Renders documents to SVG strings.
///
/// # Examples
///
/// ```
/// # use ctxmap::{config::StyleConfig, export::{Exporter, svg::SvgExporter}};
/// let exporter = SvgExporter::new(&StyleConfig::default()).unwrap();
/// # let _ = exporter;
/// ```
#[derive(Debug, Clone)]
pub struct SvgExporter {
    background: Option<Color>,
    node_fill: Color,
    line: Color,
}

impl SvgExporter {
    /// Creates an exporter using the colors of `style`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Render`] if a configured color is invalid.
    pub fn new(style: &StyleConfig) -> Result<Self, Error> {
        let background = style.background_color().map_err(Error::Render)?;
        let node_fill = style
            .node_fill_color()
            .map_err(Error::Render)?
            .map_or_else(default_node_fill, Ok)?;
        let line = style.line_color().map_err(Error::Render)?.unwrap_or_default();

        Ok(Self {
            background,
            node_fill,
            line,
        })
    }

    fn render_node(&self, node: &NodeShape, font: &FontDefinition) -> svg_element::Group {
        let center = node.center();
        let radii = node.radii();

        let ellipse = svg_element::Ellipse::new()
            .set("cx", 0)
            .set("cy", 0)
            .set("rx", radii.width())
            .set("ry", radii.height())
            .set("fill", self.node_fill.to_string())
            .set("fill-opacity", self.node_fill.alpha())
            .set("stroke", self.line.to_string())
            .set("stroke-width", 1);

        let text = font_attributes(svg_element::Text::new(""), font)
            .set("x", node.label_offset().x())
            .set("y", node.label_offset().y())
            .add(SvgText::new(node.label()));

        svg_element::Group::new()
            .set("class", "node")
            .set("transform", format!("translate({},{})", center.x(), center.y()))
            .add(ellipse)
            .add(text)
    }

    fn render_link(&self, link: &LinkShape, font: &FontDefinition) -> svg_element::Group {
        let mut path = svg_element::Path::new()
            .set("d", link.path())
            .set("fill", "none")
            .set("stroke", self.line.to_string())
            .set("stroke-width", 1);

        if link.has_start_marker() {
            path = path.set("marker-start", format!("url(#{ARROW_START_ID})"));
        }
        if link.has_end_marker() {
            path = path.set("marker-end", format!("url(#{ARROW_END_ID})"));
        }

        let mut group = svg_element::Group::new().set("class", "link").add(path);

        if let Some((anchor, text)) = link.middle_label() {
            group = group.add(
                font_attributes(svg_element::Text::new(""), font)
                    .set("x", anchor.x())
                    .set("y", anchor.y())
                    .set("text-anchor", "middle")
                    .add(SvgText::new(text)),
            );
        }

        for endpoint in [link.source_text(), link.target_text()].into_iter().flatten() {
            group = group.add(self.render_endpoint(endpoint, font));
        }

        group
    }

    fn render_endpoint(&self, endpoint: &EndpointText, font: &FontDefinition) -> svg_element::Group {
        let anchor = endpoint.anchor();
        let mut group = svg_element::Group::new()
            .set("class", "endpoint")
            .set("transform", format!("translate({},{})", anchor.x(), anchor.y()));

        let mut cursor = Point::default();

        if let Some(box_text) = endpoint.box_text() {
            let width = box_text.chars().count() as f32 * font.size() * GLYPH_WIDTH_FACTOR
                + 2.0 * BOX_PADDING;
            let height = font.size() + 2.0 * BOX_PADDING;

            group = group
                .add(
                    svg_element::Rectangle::new()
                        .set("x", 0)
                        .set("y", -height)
                        .set("width", width)
                        .set("height", height)
                        .set("fill", self.node_fill.to_string())
                        .set("stroke", self.line.to_string()),
                )
                .add(
                    font_attributes(svg_element::Text::new(""), font)
                        .set("x", BOX_PADDING)
                        .set("y", -BOX_PADDING)
                        .add(SvgText::new(box_text)),
                );
            cursor = Point::new(width + BOX_PADDING, 0.0);
        }

        if let Some(body_text) = endpoint.body_text() {
            group = group.add(
                font_attributes(svg_element::Text::new(""), font)
                    .set("x", cursor.x())
                    .set("y", -BOX_PADDING)
                    .add(SvgText::new(body_text)),
            );
        }

        group
    }
}

impl Exporter for SvgExporter {
    type Output = String;

    fn export_document(&self, document: &DrawableDocument) -> Result<String, Error> {
        let view_box = document.view_box();
        info!(
            nodes = document.nodes().len(),
            links = document.links().len();
            "Rendering SVG document"
        );

        let mut doc = Document::new()
            .set(
                "viewBox",
                format!(
                    "{} {} {} {}",
                    view_box.min_x(),
                    view_box.min_y(),
                    view_box.width(),
                    view_box.height()
                ),
            )
            .set("width", view_box.width())
            .set("height", view_box.height());

        if let Some(background) = self.background {
            doc = doc.add(
                svg_element::Rectangle::new()
                    .set("x", view_box.min_x())
                    .set("y", view_box.min_y())
                    .set("width", view_box.width())
                    .set("height", view_box.height())
                    .set("fill", background.to_string())
                    .set("fill-opacity", background.alpha()),
            );
        }

        doc = doc.add(marker_definitions(self.line));

        // Links first so that ellipses cover the path ends.
        for link in document.links() {
            doc = doc.add(self.render_link(link, document.font()));
        }
        for node in document.nodes() {
            doc = doc.add(self.render_node(node, document.font()));
        }

        let rendered = doc.to_string();
        debug!(bytes = rendered.len(); "SVG document rendered");
        Ok(rendered)
    }
}

/// Render `document` with the colors of `style`.
///
/// # Errors
///
/// Returns [`Error::Render`] if a configured color is invalid.
pub fn render(document: &DrawableDocument, style: &StyleConfig) -> Result<String, Error> {
    SvgExporter::new(style)?.export_document(document)
}

fn default_node_fill() -> Result<Color, Error> {
    Color::new("white").map_err(Error::Render)
}

fn font_attributes(text: svg_element::Text, font: &FontDefinition) -> svg_element::Text {
    text.set("font-family", font.family())
        .set("font-size", font.size())
        .set("font-weight", u32::from(font.weight()))
}

fn marker_definitions(color: Color) -> Definitions {
    let arrow_end = Marker::new()
        .set("id", ARROW_END_ID)
        .set("viewBox", "0 0 10 10")
        .set("refX", 9)
        .set("refY", 5)
        .set("markerWidth", 6)
        .set("markerHeight", 6)
        .set("orient", "auto")
        .add(
            svg_element::Path::new()
                .set("d", "M 0 0 L 10 5 L 0 10 z")
                .set("fill", color.to_string()),
        );

    let arrow_start = Marker::new()
        .set("id", ARROW_START_ID)
        .set("viewBox", "0 0 10 10")
        .set("refX", 1)
        .set("refY", 5)
        .set("markerWidth", 6)
        .set("markerHeight", 6)
        .set("orient", "auto")
        .add(
            svg_element::Path::new()
                .set("d", "M 10 0 L 0 5 L 10 10 z")
                .set("fill", color.to_string()),
        );

    Definitions::new().add(arrow_end).add(arrow_start)
}

#[cfg(test)]
mod tests {
    use ctxmap_core::{
        geometry::Size,
        graph::{ArrowDirection, ContextMapGraph, Edge, Node, RelationshipEndpoint},
        text::FnMeasure,
    };

    use super::*;
    use crate::{
        config::Spacing,
        layout::{self, Configuration},
    };

    fn document(graph: &ContextMapGraph) -> DrawableDocument {
        let measure = FnMeasure::new(
            |text: &str, _: &FontDefinition| text.len() as f32 * 6.0,
            |_: &str, _: &FontDefinition| 12.0,
        );
        let config = Configuration::new(Size::new(500.0, 500.0), &measure)
            .with_node_padding(Spacing::new(40.0, 20.0))
            .with_node_margin(Spacing::new(20.0, 20.0));
        let layout = layout::compute(graph, &config).unwrap();
        DrawableDocument::from_layout(&layout, config.font())
    }

    fn sample_graph() -> ContextMapGraph {
        let mut graph = ContextMapGraph::default();
        graph.push_node(Node::new("Orders"));
        graph.push_node(Node::new("Billing"));
        graph.push_edge(Edge::new(
            RelationshipEndpoint::new("Orders", vec!["U".into(), "OHS".into()]),
            RelationshipEndpoint::new("Billing", vec!["D".into(), "ACL".into()]),
            ArrowDirection::Right,
        ));
        graph
    }

    #[test]
    fn test_render_contains_elements() {
        let svg = render(&document(&sample_graph()), &StyleConfig::default()).unwrap();

        assert!(svg.contains("<svg"));
        assert!(svg.contains("viewBox=\"-250 -250 500 500\""));
        assert_eq!(svg.matches("<ellipse").count(), 2);
        assert!(svg.contains("Orders"));
        assert!(svg.contains("Billing"));
        assert!(svg.contains(&format!("marker-end=\"url(#{ARROW_END_ID})\"")));
        assert!(!svg.contains("marker-start="));
        assert!(svg.contains("OHS"));
        assert!(svg.contains("ACL"));
        // Two node labels, two boxed tags and two pattern lists
        assert_eq!(svg.matches("<text").count(), 6);
        assert!(svg.contains("</svg>"));
    }

    #[test]
    fn test_render_empty_document() {
        let svg = render(&document(&ContextMapGraph::default()), &StyleConfig::default()).unwrap();

        assert!(svg.contains("<svg"));
        assert!(!svg.contains("<ellipse"));
        assert!(!svg.contains("class=\"link\""));
    }

    #[test]
    fn test_background_color() {
        let style = StyleConfig::new(Some("#ffcc00".to_string()), None, None);
        let svg = render(&document(&sample_graph()), &style).unwrap();

        assert!(svg.contains("<rect"));
        assert!(svg.contains("x=\"-250\""));
    }

    #[test]
    fn test_invalid_color_is_reported() {
        let style = StyleConfig::new(None, Some("definitely-not-a-color".to_string()), None);

        let err = SvgExporter::new(&style).unwrap_err();
        assert!(err.to_string().contains("node fill"), "error: {err}");
    }
}
