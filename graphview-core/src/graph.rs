//! Graph data: vertex positions plus edge index pairs

use crate::point::*;
use serde::{Deserialize, Serialize};

/// An edge as an ordered pair of vertex indices.
///
/// Indices are kept signed as read from disk; whether they point at an
/// existing vertex is decided against a concrete vertex count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Edge {
    pub source: i64,
    pub target: i64,
}

impl Edge {
    /// Create a new edge
    pub fn new(source: i64, target: i64) -> Self {
        Self { source, target }
    }

    /// Both endpoints as `usize` indices if they lie in `[0, vertex_count)`
    pub fn resolve(&self, vertex_count: usize) -> Option<(usize, usize)> {
        let in_range = |i: i64| usize::try_from(i).ok().filter(|&i| i < vertex_count);
        Some((in_range(self.source)?, in_range(self.target)?))
    }
}

impl From<(i64, i64)> for Edge {
    fn from((source, target): (i64, i64)) -> Self {
        Self::new(source, target)
    }
}

/// A graph loaded from disk. Immutable once loaded.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Graph {
    pub vertices: Vec<Vertex>,
    pub edges: Vec<Edge>,
}

impl Graph {
    /// Create a graph from vertices and edges
    pub fn new(vertices: Vec<Vertex>, edges: Vec<Edge>) -> Self {
        Self { vertices, edges }
    }

    /// Get the number of vertices
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Get the number of edges, including ones that reference missing vertices
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Check if the graph has no vertices
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Iterate over edges whose endpoints both exist, as resolved index pairs
    pub fn valid_edges(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        let count = self.vertices.len();
        self.edges.iter().filter_map(move |e| e.resolve(count))
    }
}
