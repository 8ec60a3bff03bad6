//! Link routing between positioned nodes.
//!
//! Each relationship becomes a [`Link`] between the boundaries of its two
//! ellipses. Nodes sharing an `x` or a `y` coordinate are joined by a
//! straight segment; any other pair gets a circular arc whose radius is the
//! distance between the anchors, which keeps crossing links apart.

use indexmap::IndexMap;
use log::{debug, warn};

use ctxmap_core::{
    geometry::{Point, Size},
    graph::{ArrowDirection, Edge},
};

use super::{
    LayoutNode,
    labels::{self, RelationshipLabels},
};
use crate::error::LayoutError;

/// Shape of a routed link.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Curve {
    Straight,
    /// Circular arc drawn with SVG flags `large-arc = 0` and `sweep = 1`.
    Arc { radius: f32 },
}

/// A routed relationship.
#[derive(Debug, Clone, PartialEq)]
pub struct Link {
    edge_index: usize,
    source_id: String,
    target_id: String,
    source_anchor: Point,
    target_anchor: Point,
    curve: Curve,
    arrow: ArrowDirection,
    label_anchor: Point,
    labels: RelationshipLabels,
}

impl Link {
    /// Position of the relationship in the graph's edge list.
    pub fn edge_index(&self) -> usize {
        self.edge_index
    }

    pub fn source_id(&self) -> &str {
        &self.source_id
    }

    pub fn target_id(&self) -> &str {
        &self.target_id
    }

    /// Where the link leaves the source ellipse.
    pub fn source_anchor(&self) -> Point {
        self.source_anchor
    }

    /// Where the link meets the target ellipse.
    pub fn target_anchor(&self) -> Point {
        self.target_anchor
    }

    pub fn curve(&self) -> Curve {
        self.curve
    }

    pub fn arrow(&self) -> ArrowDirection {
        self.arrow
    }

    /// Arrowhead at the source end (`<-` and `<->`).
    pub fn has_start_marker(&self) -> bool {
        self.arrow.has_left()
    }

    /// Arrowhead at the target end (`->` and `<->`).
    pub fn has_end_marker(&self) -> bool {
        self.arrow.has_right()
    }

    /// Midpoint of the routed path, used to anchor the middle label.
    pub fn label_anchor(&self) -> Point {
        self.label_anchor
    }

    pub fn labels(&self) -> &RelationshipLabels {
        &self.labels
    }

    /// SVG path data for the link.
    ///
    /// ```text
    /// M x1,y1 L x2,y2          straight
    /// M x1,y1 A r,r 0 0,1 x2,y2  arc
    /// ```
    pub fn path_data(&self) -> String {
        let (start, end) = (self.source_anchor, self.target_anchor);
        match self.curve {
            Curve::Straight => {
                format!("M {},{} L {},{}", start.x(), start.y(), end.x(), end.y())
            }
            Curve::Arc { radius } => format!(
                "M {},{} A {radius},{radius} 0 0,1 {},{}",
                start.x(),
                start.y(),
                end.x(),
                end.y()
            ),
        }
    }
}

/// Route every edge in declaration order.
///
/// Endpoint ids are resolved against `nodes`; when an id is declared twice
/// the first node wins. Edges that cannot be resolved produce errors instead
/// of links, and routing carries on with the next edge.
pub fn route_links(edges: &[Edge], nodes: &[LayoutNode]) -> (Vec<Link>, Vec<LayoutError>) {
    let mut index: IndexMap<&str, &LayoutNode> = IndexMap::with_capacity(nodes.len());
    for node in nodes {
        index.entry(node.id()).or_insert(node);
    }

    let mut links = Vec::with_capacity(edges.len());
    let mut errors = Vec::new();

    for (edge_index, edge) in edges.iter().enumerate() {
        let source = resolve(&index, edge_index, edge.source().id());
        let target = resolve(&index, edge_index, edge.target().id());

        match (source, target) {
            (Ok(source), Ok(target)) => links.push(route(edge_index, edge, source, target)),
            (source, target) => {
                for err in [source.err(), target.err()].into_iter().flatten() {
                    warn!(edge_index, err:%; "Skipping relationship");
                    errors.push(err);
                }
            }
        }
    }

    (links, errors)
}

/// A node together with its center.
#[derive(Clone, Copy)]
struct Placed<'a> {
    node: &'a LayoutNode,
    center: Point,
}

fn resolve<'a>(
    index: &IndexMap<&str, &'a LayoutNode>,
    edge_index: usize,
    id: &str,
) -> Result<Placed<'a>, LayoutError> {
    let node = index
        .get(id)
        .copied()
        .ok_or_else(|| LayoutError::UnresolvedReference {
            edge_index,
            id: id.to_string(),
        })?;
    let center = node
        .position()
        .ok_or_else(|| LayoutError::Unpositioned { id: id.to_string() })?;

    Ok(Placed { node, center })
}

fn route(edge_index: usize, edge: &Edge, source: Placed<'_>, target: Placed<'_>) -> Link {
    let source_anchor = boundary_anchor(source.center, source.node.radii(), target.center);
    let target_anchor = boundary_anchor(target.center, target.node.radii(), source.center);

    let (curve, label_anchor) = if source.center.is_axis_aligned_with(target.center) {
        (Curve::Straight, source_anchor.midpoint(target_anchor))
    } else {
        let radius = source_anchor.distance(target_anchor);
        (
            Curve::Arc { radius },
            arc_apex(source_anchor, target_anchor, radius),
        )
    };

    debug!(
        edge_index,
        source = edge.source().id(),
        target = edge.target().id(),
        curve:? = curve;
        "Routed link"
    );

    Link {
        edge_index,
        source_id: edge.source().id().to_string(),
        target_id: edge.target().id().to_string(),
        source_anchor,
        target_anchor,
        curve,
        arrow: edge.arrow(),
        label_anchor,
        labels: labels::relationship_labels(edge),
    }
}

/// Point where the ray from `center` toward `toward` leaves the ellipse with
/// the given radii.
///
/// With `a`, `b` the radii and `θ` the ray angle, the boundary lies at
/// `a·b / hypot(b·cosθ, a·sinθ)` from the center.
pub fn boundary_anchor(center: Point, radii: Size, toward: Point) -> Point {
    let delta = toward.sub_point(center);
    let length = delta.hypot();
    if length == 0.0 {
        return center;
    }

    let (cos, sin) = (delta.x() / length, delta.y() / length);
    let (a, b) = (radii.width(), radii.height());
    let denominator = (b * cos).hypot(a * sin);
    if denominator == 0.0 {
        return center;
    }

    let radius = a * b / denominator;
    center.add_point(Point::new(cos, sin).scale(radius))
}

/// Midpoint of the minor arc of radius `radius` from `start` to `end`
/// drawn with positive sweep.
///
/// In SVG orientation a positive sweep bulges to the left of the direction
/// of travel, along `(dy, -dx)`.
fn arc_apex(start: Point, end: Point, radius: f32) -> Point {
    let chord = end.sub_point(start);
    let length = chord.hypot();
    let mid = start.midpoint(end);
    if length == 0.0 {
        return mid;
    }

    let half = length / 2.0;
    let sagitta = radius - (radius * radius - half * half).max(0.0).sqrt();
    let normal = Point::new(chord.y(), -chord.x()).scale(1.0 / length);

    mid.add_point(normal.scale(sagitta))
}

#[cfg(test)]
mod tests {
    use float_cmp::approx_eq;

    use ctxmap_core::graph::RelationshipEndpoint;

    use super::*;

    fn placed(id: &str, x: f32, y: f32) -> LayoutNode {
        LayoutNode::new(id, id, Size::new(100.0, 20.0)).with_position(Point::new(x, y))
    }

    fn edge(source: &str, target: &str, arrow: ArrowDirection) -> Edge {
        Edge::new(
            RelationshipEndpoint::untyped(source),
            RelationshipEndpoint::untyped(target),
            arrow,
        )
    }

    #[test]
    fn test_straight_link_between_aligned_nodes() {
        let nodes = [placed("A", -100.0, 0.0), placed("B", 100.0, 0.0)];
        let (links, errors) = route_links(&[edge("A", "B", ArrowDirection::Right)], &nodes);

        assert!(errors.is_empty());
        let link = &links[0];
        assert_eq!(link.source_anchor(), Point::new(-50.0, 0.0));
        assert_eq!(link.target_anchor(), Point::new(50.0, 0.0));
        assert_eq!(link.curve(), Curve::Straight);
        assert_eq!(link.label_anchor(), Point::new(0.0, 0.0));
        assert_eq!(link.path_data(), "M -50,0 L 50,0");
    }

    #[test]
    fn test_vertical_link_is_straight() {
        let nodes = [placed("A", 0.0, -100.0), placed("B", 0.0, 100.0)];
        let (links, _) = route_links(&[edge("A", "B", ArrowDirection::Left)], &nodes);

        assert_eq!(links[0].curve(), Curve::Straight);
        assert_eq!(links[0].source_anchor(), Point::new(0.0, -90.0));
        assert_eq!(links[0].target_anchor(), Point::new(0.0, 90.0));
    }

    #[test]
    fn test_diagonal_link_is_an_arc() {
        let nodes = [placed("A", -100.0, 0.0), placed("C", 200.0, 200.0)];
        let (links, errors) = route_links(&[edge("A", "C", ArrowDirection::Right)], &nodes);

        assert!(errors.is_empty());
        let link = &links[0];
        let Curve::Arc { radius } = link.curve() else {
            panic!("expected an arc, got {:?}", link.curve());
        };
        assert!(approx_eq!(
            f32,
            radius,
            link.source_anchor().distance(link.target_anchor()),
            epsilon = 0.001
        ));
        assert!(link.path_data().contains(" 0 0,1 "));
        assert!(link.path_data().starts_with("M "));
    }

    #[test]
    fn test_arc_apex_bulges_up_for_left_to_right() {
        let apex = arc_apex(Point::new(-1.0, 0.0), Point::new(1.0, 0.0), 2.0);

        assert!(approx_eq!(f32, apex.x(), 0.0, epsilon = 1e-6));
        assert!(approx_eq!(f32, apex.y(), -(2.0 - 3.0f32.sqrt()), epsilon = 1e-6));
    }

    #[test]
    fn test_anchor_on_ellipse_boundary() {
        let center = Point::new(0.0, 0.0);
        let radii = Size::new(50.0, 10.0);

        let anchor = boundary_anchor(center, radii, Point::new(100.0, 100.0));

        // (x/a)² + (y/b)² = 1 on the boundary
        let on_ellipse = (anchor.x() / 50.0).powi(2) + (anchor.y() / 10.0).powi(2);
        assert!(approx_eq!(f32, on_ellipse, 1.0, epsilon = 1e-5));
        assert!(approx_eq!(f32, anchor.x(), anchor.y(), epsilon = 1e-4));
    }

    #[test]
    fn test_coincident_centers_anchor_at_center() {
        let center = Point::new(10.0, 10.0);
        assert_eq!(boundary_anchor(center, Size::new(50.0, 10.0), center), center);
    }

    #[test]
    fn test_markers_follow_arrow_direction() {
        let nodes = [placed("A", -100.0, 0.0), placed("B", 100.0, 0.0)];
        let edges = [
            edge("A", "B", ArrowDirection::Left),
            edge("A", "B", ArrowDirection::Right),
            edge("A", "B", ArrowDirection::Bidirectional),
        ];

        let (links, _) = route_links(&edges, &nodes);
        let markers: Vec<_> = links
            .iter()
            .map(|l| (l.has_start_marker(), l.has_end_marker()))
            .collect();

        assert_eq!(markers, vec![(true, false), (false, true), (true, true)]);
    }

    #[test]
    fn test_unresolved_references_are_collected_per_edge() {
        let nodes = [placed("A", -100.0, 0.0), placed("B", 100.0, 0.0)];
        let edges = [
            edge("A", "Ghost", ArrowDirection::Right),
            edge("A", "B", ArrowDirection::Right),
            edge("Phantom", "Ghost", ArrowDirection::Left),
        ];

        let (links, errors) = route_links(&edges, &nodes);

        assert_eq!(links.len(), 1);
        assert_eq!(links[0].edge_index(), 1);
        assert_eq!(
            errors,
            vec![
                LayoutError::UnresolvedReference {
                    edge_index: 0,
                    id: "Ghost".to_string()
                },
                LayoutError::UnresolvedReference {
                    edge_index: 2,
                    id: "Phantom".to_string()
                },
                LayoutError::UnresolvedReference {
                    edge_index: 2,
                    id: "Ghost".to_string()
                },
            ]
        );
    }

    #[test]
    fn test_unpositioned_node() {
        let nodes = [
            placed("A", -100.0, 0.0),
            LayoutNode::new("B", "B", Size::new(100.0, 20.0)),
        ];

        let (links, errors) = route_links(&[edge("A", "B", ArrowDirection::Right)], &nodes);

        assert!(links.is_empty());
        assert_eq!(
            errors,
            vec![LayoutError::Unpositioned {
                id: "B".to_string()
            }]
        );
    }

    #[test]
    fn test_duplicate_ids_resolve_to_first_declaration() {
        let nodes = [
            placed("A", -100.0, 0.0),
            placed("B", 100.0, 0.0),
            placed("B", 0.0, 300.0),
        ];

        let (links, _) = route_links(&[edge("A", "B", ArrowDirection::Right)], &nodes);

        assert_eq!(links[0].target_anchor(), Point::new(50.0, 0.0));
    }

    #[test]
    fn test_self_relationship() {
        let nodes = [placed("A", 0.0, 0.0)];
        let (links, errors) = route_links(&[edge("A", "A", ArrowDirection::Right)], &nodes);

        assert!(errors.is_empty());
        assert_eq!(links[0].curve(), Curve::Straight);
        assert_eq!(links[0].source_anchor(), Point::new(0.0, 0.0));
    }
}
