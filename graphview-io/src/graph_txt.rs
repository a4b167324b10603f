//! Whitespace-separated graph text format
//!
//! Two plain text files describe a graph:
//! - vertex file: one vertex per line, `x y` or `x y z` (extra fields ignored)
//! - edge file: one edge per line, `u v` (extra fields ignored)
//!
//! Blank lines and lines with too few fields are skipped. A field that must
//! be a number but is not fails the whole read.

use graphview_core::{Edge, Error, Graph, Point3f, Result, Vertex};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Reader for the graph text format
pub struct GraphTxtReader;

impl GraphTxtReader {
    /// Read vertices from a file
    pub fn read_vertices<P: AsRef<Path>>(path: P) -> Result<Vec<Vertex>> {
        let path = path.as_ref();
        log::info!("Reading vertices from {}", path.display());
        let file = File::open(path)?;
        Self::parse_vertices(BufReader::new(file), path)
    }

    /// Read edges from a file
    pub fn read_edges<P: AsRef<Path>>(path: P) -> Result<Vec<Edge>> {
        let path = path.as_ref();
        log::info!("Reading edges from {}", path.display());
        let file = File::open(path)?;
        Self::parse_edges(BufReader::new(file), path)
    }

    /// Parse vertex records; `source` only labels errors
    pub fn parse_vertices<R: BufRead>(reader: R, source: &Path) -> Result<Vec<Vertex>> {
        let mut vertices = Vec::new();

        for (index, line_result) in reader.lines().enumerate() {
            let line = line_result?;
            let parts: Vec<&str> = line.split_whitespace().collect();
            let line_no = index + 1;

            let vertex = match parts.len() {
                0 => continue,
                1 => {
                    log::debug!("{}:{}: skipping vertex with a single field", source.display(), line_no);
                    continue;
                }
                2 => Point3f::new(
                    parse_coordinate(parts[0], source, line_no)?,
                    parse_coordinate(parts[1], source, line_no)?,
                    0.0,
                ),
                _ => Point3f::new(
                    parse_coordinate(parts[0], source, line_no)?,
                    parse_coordinate(parts[1], source, line_no)?,
                    parse_coordinate(parts[2], source, line_no)?,
                ),
            };

            vertices.push(vertex);
        }

        Ok(vertices)
    }

    /// Parse edge records; `source` only labels errors
    pub fn parse_edges<R: BufRead>(reader: R, source: &Path) -> Result<Vec<Edge>> {
        let mut edges = Vec::new();

        for (index, line_result) in reader.lines().enumerate() {
            let line = line_result?;
            let mut parts = line.split_whitespace();
            let (Some(u), Some(v)) = (parts.next(), parts.next()) else {
                continue;
            };

            let line_no = index + 1;
            edges.push(Edge::new(
                parse_index(u, source, line_no)?,
                parse_index(v, source, line_no)?,
            ));
        }

        Ok(edges)
    }

    /// Read a vertex file and an edge file into one graph
    pub fn read_graph<P: AsRef<Path>, Q: AsRef<Path>>(vertex_path: P, edge_path: Q) -> Result<Graph> {
        let vertices = Self::read_vertices(vertex_path)?;
        let edges = Self::read_edges(edge_path)?;
        Ok(Graph::new(vertices, edges))
    }
}

fn parse_coordinate(field: &str, source: &Path, line: usize) -> Result<f32> {
    field
        .parse::<f32>()
        .map_err(|_| Error::parse(source, line, format!("invalid coordinate '{}'", field)))
}

fn parse_index(field: &str, source: &Path, line: usize) -> Result<i64> {
    field
        .parse::<i64>()
        .map_err(|_| Error::parse(source, line, format!("invalid vertex index '{}'", field)))
}
