//! Renderable geometry built from a loaded graph

use crate::{graph::*, point::*};
use serde::{Deserialize, Serialize};

/// Fixed visual style of the graph lines
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LineStyle {
    /// sRGB in [0, 1], as written to the MTL `Kd` line
    pub color: [f32; 3],
    pub line_width: f32,
}

impl LineStyle {
    /// Royal blue (65, 105, 225)
    pub const ROYAL_BLUE: [f32; 3] = [65.0 / 255.0, 105.0 / 255.0, 225.0 / 255.0];
}

impl Default for LineStyle {
    fn default() -> Self {
        Self {
            color: Self::ROYAL_BLUE,
            line_width: 2.0,
        }
    }
}

/// Points plus line segments ready to hand to a renderer.
/// Point `i` is vertex `i`, so line indices can address points directly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderableGraph {
    pub points: Vec<Point3f>,
    pub lines: Vec<[usize; 2]>,
    pub style: LineStyle,
}

impl RenderableGraph {
    /// Get the number of points
    pub fn point_count(&self) -> usize {
        self.points.len()
    }

    /// Get the number of line primitives
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Line endpoints flattened into a `u32` index list (two per line)
    pub fn line_indices(&self) -> Vec<u32> {
        self.lines
            .iter()
            .flat_map(|&[a, b]| [a as u32, b as u32])
            .collect()
    }
}

/// Build renderable geometry: one point per vertex in order, one line per
/// edge whose endpoints both exist. Out-of-range edges are dropped.
pub fn build_geometry(vertices: &[Vertex], edges: &[Edge]) -> RenderableGraph {
    let count = vertices.len();
    let lines: Vec<[usize; 2]> = edges
        .iter()
        .filter_map(|e| e.resolve(count))
        .map(|(a, b)| [a, b])
        .collect();

    let dropped = edges.len() - lines.len();
    if dropped > 0 {
        log::debug!("Dropped {} edges referencing missing vertices", dropped);
    }

    RenderableGraph {
        points: vertices.to_vec(),
        lines,
        style: LineStyle::default(),
    }
}

impl From<&Graph> for RenderableGraph {
    fn from(graph: &Graph) -> Self {
        build_geometry(&graph.vertices, &graph.edges)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn triangle_vertices() -> Vec<Vertex> {
        vec![
            Point3f::new(0.0, 0.0, 0.0),
            Point3f::new(1.0, 0.0, 0.0),
            Point3f::new(0.0, 1.0, 0.0),
        ]
    }

    #[test]
    fn test_out_of_range_edges_dropped() {
        let edges = vec![Edge::new(0, 1), Edge::new(1, 5), Edge::new(2, 0)];
        let geometry = build_geometry(&triangle_vertices(), &edges);

        assert_eq!(geometry.line_count(), 2);
        assert_eq!(geometry.lines, vec![[0, 1], [2, 0]]);
        assert_eq!(geometry.line_indices(), vec![0, 1, 2, 0]);
    }

    #[test]
    fn test_negative_indices_dropped() {
        let edges = vec![Edge::new(-1, 0), Edge::new(0, -2), Edge::new(1, 2)];
        let geometry = build_geometry(&triangle_vertices(), &edges);
        assert_eq!(geometry.lines, vec![[1, 2]]);
    }

    #[test]
    fn test_points_preserve_vertex_order() {
        let vertices = triangle_vertices();
        let geometry = build_geometry(&vertices, &[]);
        assert_eq!(geometry.point_count(), 3);
        assert_eq!(geometry.points, vertices);
        assert_eq!(geometry.line_count(), 0);
    }

    #[test]
    fn test_default_style() {
        let geometry = RenderableGraph::from(&Graph::new(triangle_vertices(), vec![]));
        assert_relative_eq!(geometry.style.color[0], 0.255, epsilon = 1e-3);
        assert_relative_eq!(geometry.style.color[1], 0.412, epsilon = 1e-3);
        assert_relative_eq!(geometry.style.color[2], 0.882, epsilon = 1e-3);
        assert_eq!(geometry.style.line_width, 2.0);
    }
}
