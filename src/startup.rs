//! Loading the input graph and reporting what was loaded

use anyhow::Context;
use graphview_core::Graph;
use std::io::Write;
use std::path::Path;

/// Load vertices then edges and print the counts to `out`.
///
/// Returns `None` after printing `No vertices loaded!` when the vertex file
/// holds no usable vertex; the viewer must not start in that case.
pub fn load_graph<W: Write>(vertex_path: &Path, edge_path: &Path, out: &mut W) -> anyhow::Result<Option<Graph>> {
    let vertices = graphview_io::read_vertices(vertex_path)
        .with_context(|| format!("Failed to load vertices from {}", vertex_path.display()))?;

    let edges = graphview_io::read_edges(edge_path)
        .with_context(|| format!("Failed to load edges from {}", edge_path.display()))?;

    writeln!(out, "Loaded {} vertices", vertices.len())?;
    writeln!(out, "Loaded {} edges", edges.len())?;

    if vertices.is_empty() {
        writeln!(out, "No vertices loaded!")?;
        return Ok(None);
    }

    Ok(Some(Graph::new(vertices, edges)))
}
