//! I/O operations for graphview
//!
//! Reading graphs from the whitespace-separated vertex/edge text format and
//! exporting the rendered scene as a Wavefront OBJ/MTL file pair.

pub mod graph_txt;
pub mod obj;

pub use graph_txt::GraphTxtReader;
pub use obj::{ObjExportPaths, ObjExporter};

use graphview_core::{Edge, Graph, RenderableGraph, Result, Vertex};
use nalgebra::Matrix4;
use std::path::Path;

/// Read a vertex file
pub fn read_vertices<P: AsRef<Path>>(path: P) -> Result<Vec<Vertex>> {
    GraphTxtReader::read_vertices(path)
}

/// Read an edge file
pub fn read_edges<P: AsRef<Path>>(path: P) -> Result<Vec<Edge>> {
    GraphTxtReader::read_edges(path)
}

/// Read a vertex file and an edge file into one graph
pub fn read_graph<P: AsRef<Path>, Q: AsRef<Path>>(vertex_path: P, edge_path: Q) -> Result<Graph> {
    GraphTxtReader::read_graph(vertex_path, edge_path)
}

/// Export the scene to `<prefix>.obj` and `<prefix>.mtl`
pub fn export_obj<P: AsRef<Path>>(
    prefix: P,
    graph: &RenderableGraph,
    transform: &Matrix4<f32>,
) -> Result<ObjExportPaths> {
    ObjExporter::write(prefix, graph, transform)
}
