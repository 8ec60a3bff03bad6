//! Plane distribution.
//!
//! Nodes are laid out in rows, in declaration order, and the rows are
//! centered on the canvas origin. Each node occupies a cell made of its
//! size plus the margin on every side. A row holds at most
//! `ceil(sqrt(n))` cells, so two nodes share one row, four form a 2×2 grid
//! and nine a 3×3 grid. A row also ends early when the next cell would make
//! it wider than the canvas; a row always takes at least one cell.
//!
//! Cells in a row sit on a uniform pitch set by the widest cell of that row,
//! so the centers of mirrored slots satisfy `x_left = -x_right`. The first
//! row is placed at the most positive `y`.

use std::ops::Range;

use log::{debug, trace};

use ctxmap_core::geometry::{Point, Size};

use super::LayoutNode;
use crate::{config::Spacing, error::LayoutError};

#[derive(Debug, Clone, PartialEq)]
struct Row {
    cells: Range<usize>,
    pitch: f32,
    height: f32,
}

impl Row {
    fn starting_at(index: usize) -> Self {
        Self {
            cells: index..index,
            pitch: 0.0,
            height: 0.0,
        }
    }

    fn len(&self) -> usize {
        self.cells.len()
    }

    fn width(&self) -> f32 {
        self.len() as f32 * self.pitch
    }

    /// Width of the row if `cell` were appended.
    fn width_with(&self, cell: Size) -> f32 {
        (self.len() + 1) as f32 * self.pitch.max(cell.width())
    }

    fn push(&mut self, cell: Size) {
        self.cells.end += 1;
        self.pitch = self.pitch.max(cell.width());
        self.height = self.height.max(cell.height());
    }

    /// Horizontal center of the `slot`-th cell of the row.
    fn slot_x(&self, slot: usize) -> f32 {
        (slot as f32 - (self.len() - 1) as f32 / 2.0) * self.pitch
    }
}

/// Assign a position to every node.
///
/// # Errors
///
/// Returns [`LayoutError::DegenerateConfiguration`] when the canvas is not
/// positive and finite, a margin is negative or not finite, a node size is
/// negative or not finite, or the rows do not fit inside the canvas. No node
/// is positioned in that case.
pub fn distribute(
    nodes: &mut [LayoutNode],
    canvas: Size,
    margin: Spacing,
) -> Result<(), LayoutError> {
    validate(nodes, canvas, margin)?;

    if nodes.is_empty() {
        return Ok(());
    }

    let cells: Vec<Size> = nodes
        .iter()
        .map(|node| node.size().grow(margin.horizontal(), margin.vertical()))
        .collect();
    let rows = split_rows(&cells, row_capacity(nodes.len()), canvas.width());
    check_fits(&rows, nodes, canvas)?;
    debug!(rows = rows.len(), nodes = nodes.len(); "Distributing nodes");

    let total_height: f32 = rows.iter().map(|row| row.height).sum();
    let mut top = total_height / 2.0;

    for row in &rows {
        let y = top - row.height / 2.0;

        for (slot, index) in row.cells.clone().enumerate() {
            let position = Point::new(row.slot_x(slot), y);
            trace!(id = nodes[index].id(), x = position.x(), y = position.y(); "Placed node");

            nodes[index].place(position);
        }

        top -= row.height;
    }

    Ok(())
}

/// Target number of cells per row for `count` nodes.
fn row_capacity(count: usize) -> usize {
    ((count as f64).sqrt().ceil() as usize).max(1)
}

fn split_rows(cells: &[Size], capacity: usize, canvas_width: f32) -> Vec<Row> {
    let mut rows = Vec::new();
    let mut current = Row::starting_at(0);

    for (index, &cell) in cells.iter().enumerate() {
        let full = current.len() >= capacity;
        let overflows = current.len() > 0 && current.width_with(cell) > canvas_width;

        if full || overflows {
            rows.push(std::mem::replace(&mut current, Row::starting_at(index)));
        }
        current.push(cell);
    }

    if current.len() > 0 {
        rows.push(current);
    }

    rows
}

fn validate(nodes: &[LayoutNode], canvas: Size, margin: Spacing) -> Result<(), LayoutError> {
    if !canvas.is_valid() || canvas.width() <= 0.0 || canvas.height() <= 0.0 {
        return Err(LayoutError::DegenerateConfiguration(format!(
            "canvas must be positive and finite, got {}×{}",
            canvas.width(),
            canvas.height()
        )));
    }

    if !margin.is_valid() {
        return Err(LayoutError::DegenerateConfiguration(format!(
            "node margins must be non-negative and finite, got {}/{}",
            margin.horizontal(),
            margin.vertical()
        )));
    }

    if let Some(node) = nodes.iter().find(|node| !node.size().is_valid()) {
        return Err(LayoutError::DegenerateConfiguration(format!(
            "bounded context `{}` has an invalid size {}×{}",
            node.id(),
            node.size().width(),
            node.size().height()
        )));
    }

    Ok(())
}

/// Rows must stay inside the canvas in both directions.
fn check_fits(rows: &[Row], nodes: &[LayoutNode], canvas: Size) -> Result<(), LayoutError> {
    if let Some(row) = rows.iter().find(|row| row.width() > canvas.width()) {
        return Err(LayoutError::DegenerateConfiguration(format!(
            "bounded context `{}` needs a width of {} but the canvas is {} wide",
            nodes[row.cells.start].id(),
            row.width(),
            canvas.width()
        )));
    }

    let total_height: f32 = rows.iter().map(|row| row.height).sum();
    if total_height > canvas.height() {
        return Err(LayoutError::DegenerateConfiguration(format!(
            "{} rows need a height of {total_height} but the canvas is {} high",
            rows.len(),
            canvas.height()
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nodes(count: usize) -> Vec<LayoutNode> {
        (0..count)
            .map(|i| LayoutNode::new(format!("N{i}"), "any", Size::new(100.0, 20.0)))
            .collect()
    }

    fn positions(nodes: &[LayoutNode]) -> Vec<(f32, f32)> {
        nodes
            .iter()
            .map(|node| {
                let p = node.position().expect("node should be positioned");
                (p.x(), p.y())
            })
            .collect()
    }

    #[test]
    fn test_single_node_at_origin() {
        let mut nodes = nodes(1);
        distribute(&mut nodes, Size::new(500.0, 500.0), Spacing::default()).unwrap();

        assert_eq!(positions(&nodes), vec![(0.0, 0.0)]);
    }

    #[test]
    fn test_two_nodes_share_a_row() {
        let mut nodes = nodes(2);
        distribute(&mut nodes, Size::new(500.0, 500.0), Spacing::default()).unwrap();

        assert_eq!(positions(&nodes), vec![(-50.0, 0.0), (50.0, 0.0)]);
    }

    #[test]
    fn test_four_nodes_form_a_grid() {
        let mut nodes = nodes(4);
        distribute(&mut nodes, Size::new(500.0, 500.0), Spacing::default()).unwrap();

        assert_eq!(
            positions(&nodes),
            vec![(-50.0, 10.0), (50.0, 10.0), (-50.0, -10.0), (50.0, -10.0)]
        );
    }

    #[test]
    fn test_narrow_canvas_stacks_nodes() {
        let mut nodes = nodes(4);
        distribute(&mut nodes, Size::new(120.0, 800.0), Spacing::default()).unwrap();

        assert_eq!(
            positions(&nodes),
            vec![(0.0, 30.0), (0.0, 10.0), (0.0, -10.0), (0.0, -30.0)]
        );
    }

    #[test]
    fn test_margins_widen_cells() {
        let mut nodes = nodes(4);
        distribute(
            &mut nodes,
            Size::new(400.0, 800.0),
            Spacing::new(10.0, 10.0),
        )
        .unwrap();

        assert_eq!(
            positions(&nodes),
            vec![(-60.0, 20.0), (60.0, 20.0), (-60.0, -20.0), (60.0, -20.0)]
        );
    }

    #[test]
    fn test_nine_nodes_form_three_rows() {
        let mut nodes = nodes(9);
        distribute(&mut nodes, Size::new(500.0, 500.0), Spacing::default()).unwrap();

        let positions = positions(&nodes);
        assert_eq!(&positions[0..3], &[(-100.0, 20.0), (0.0, 20.0), (100.0, 20.0)]);
        assert_eq!(&positions[6..9], &[(-100.0, -20.0), (0.0, -20.0), (100.0, -20.0)]);
    }

    #[test]
    fn test_last_row_may_be_shorter() {
        let mut nodes = nodes(3);
        distribute(&mut nodes, Size::new(500.0, 500.0), Spacing::default()).unwrap();

        assert_eq!(
            positions(&nodes),
            vec![(-50.0, 10.0), (50.0, 10.0), (0.0, -10.0)]
        );
    }

    #[test]
    fn test_unequal_widths_are_mirrored() {
        let mut nodes = vec![
            LayoutNode::new("Narrow", "Narrow", Size::new(100.0, 20.0)),
            LayoutNode::new("Wide", "Wide", Size::new(200.0, 40.0)),
        ];
        distribute(&mut nodes, Size::new(500.0, 500.0), Spacing::default()).unwrap();

        assert_eq!(positions(&nodes), vec![(-100.0, 0.0), (100.0, 0.0)]);
    }

    #[test]
    fn test_unequal_widths_share_the_widest_pitch() {
        let mut nodes = vec![
            LayoutNode::new("A", "A", Size::new(60.0, 20.0)),
            LayoutNode::new("B", "B", Size::new(150.0, 20.0)),
            LayoutNode::new("C", "C", Size::new(90.0, 20.0)),
            LayoutNode::new("D", "D", Size::new(60.0, 20.0)),
        ];
        distribute(&mut nodes, Size::new(500.0, 500.0), Spacing::new(5.0, 0.0)).unwrap();

        assert_eq!(
            positions(&nodes),
            vec![(-80.0, 10.0), (80.0, 10.0), (-50.0, -10.0), (50.0, -10.0)]
        );
    }

    #[test]
    fn test_node_wider_than_canvas_is_rejected() {
        let mut nodes = vec![LayoutNode::new("Wide", "Wide", Size::new(800.0, 20.0))];
        let result = distribute(&mut nodes, Size::new(500.0, 500.0), Spacing::default());

        assert!(matches!(result, Err(LayoutError::DegenerateConfiguration(_))));
        assert!(nodes[0].position().is_none());
    }

    #[test]
    fn test_rows_taller_than_canvas_are_rejected() {
        // Narrow canvas forces one node per row: 4 × 20 exceeds 70
        let mut nodes = nodes(4);
        let result = distribute(&mut nodes, Size::new(120.0, 70.0), Spacing::default());

        assert!(matches!(result, Err(LayoutError::DegenerateConfiguration(_))));
        assert!(nodes.iter().all(|node| node.position().is_none()));
    }

    #[test]
    fn test_rows_filling_canvas_exactly_fit() {
        let mut nodes = nodes(4);
        distribute(&mut nodes, Size::new(200.0, 40.0), Spacing::default()).unwrap();

        assert_eq!(
            positions(&nodes),
            vec![(-50.0, 10.0), (50.0, 10.0), (-50.0, -10.0), (50.0, -10.0)]
        );
    }

    #[test]
    fn test_empty_input() {
        let mut nodes: Vec<LayoutNode> = Vec::new();
        distribute(&mut nodes, Size::new(500.0, 500.0), Spacing::default()).unwrap();
    }

    #[test]
    fn test_degenerate_configuration_is_all_or_nothing() {
        let cases = [
            (Size::new(0.0, 500.0), Spacing::default()),
            (Size::new(500.0, -1.0), Spacing::default()),
            (Size::new(f32::NAN, 500.0), Spacing::default()),
            (Size::new(500.0, 500.0), Spacing::new(-5.0, 0.0)),
            (Size::new(500.0, 500.0), Spacing::new(0.0, f32::INFINITY)),
        ];

        for (canvas, margin) in cases {
            let mut nodes = nodes(4);
            let result = distribute(&mut nodes, canvas, margin);

            assert!(
                matches!(result, Err(LayoutError::DegenerateConfiguration(_))),
                "canvas {canvas:?} margin {margin:?}"
            );
            assert!(nodes.iter().all(|node| node.position().is_none()));
        }
    }

    #[test]
    fn test_invalid_node_size_is_rejected() {
        let mut nodes = nodes(2);
        nodes.push(LayoutNode::new("Bad", "Bad", Size::new(f32::NAN, 10.0)));

        let result = distribute(&mut nodes, Size::new(500.0, 500.0), Spacing::default());

        assert!(matches!(result, Err(LayoutError::DegenerateConfiguration(_))));
        assert!(nodes.iter().all(|node| node.position().is_none()));
    }

    #[test]
    fn test_row_capacity() {
        assert_eq!(row_capacity(1), 1);
        assert_eq!(row_capacity(2), 2);
        assert_eq!(row_capacity(4), 2);
        assert_eq!(row_capacity(5), 3);
        assert_eq!(row_capacity(9), 3);
        assert_eq!(row_capacity(10), 4);
    }
}
