//! Wavefront OBJ/MTL export of the rendered graph scene
//!
//! Writes `<prefix>.obj` with the transformed vertex positions and one `l`
//! record per line primitive, and `<prefix>.mtl` with the line material.
//! Existing files at those paths are overwritten.

use graphview_core::{CompositeTransform, LineStyle, RenderableGraph, Result};
use nalgebra::Matrix4;
use std::ffi::OsString;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Name of the single material written to the MTL file
pub const MATERIAL_NAME: &str = "mtl0";

/// Paths written by an export
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjExportPaths {
    pub obj: PathBuf,
    pub mtl: PathBuf,
}

impl ObjExportPaths {
    /// `<prefix>.obj` and `<prefix>.mtl`; the prefix is never treated as having an extension
    pub fn from_prefix<P: AsRef<Path>>(prefix: P) -> Self {
        let with_suffix = |suffix: &str| {
            let mut name = OsString::from(prefix.as_ref().as_os_str());
            name.push(suffix);
            PathBuf::from(name)
        };

        Self {
            obj: with_suffix(".obj"),
            mtl: with_suffix(".mtl"),
        }
    }
}

/// OBJ scene exporter
pub struct ObjExporter;

impl ObjExporter {
    /// Export `graph` as seen through `transform`
    pub fn write<P: AsRef<Path>>(
        prefix: P,
        graph: &RenderableGraph,
        transform: &Matrix4<f32>,
    ) -> Result<ObjExportPaths> {
        let paths = ObjExportPaths::from_prefix(prefix);
        let mtl_name = paths
            .mtl
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| format!("{}.mtl", MATERIAL_NAME));

        let obj_file = File::create(&paths.obj)?;
        Self::write_obj(BufWriter::new(obj_file), graph, transform, &mtl_name)?;

        let mtl_file = File::create(&paths.mtl)?;
        Self::write_mtl(BufWriter::new(mtl_file), &graph.style)?;

        log::info!(
            "Exported scene to {} and {}",
            paths.obj.display(),
            paths.mtl.display()
        );
        Ok(paths)
    }

    /// Write the geometry part
    pub fn write_obj<W: Write>(
        mut writer: W,
        graph: &RenderableGraph,
        transform: &Matrix4<f32>,
        mtl_name: &str,
    ) -> Result<()> {
        let transform = CompositeTransform::from(*transform);

        writeln!(writer, "# wavefront obj file written by graphview")?;
        writeln!(writer)?;
        writeln!(writer, "mtllib {}", mtl_name)?;
        writeln!(writer)?;
        writeln!(writer, "g grp0")?;

        for point in &graph.points {
            let p = transform.transform_point(point);
            writeln!(writer, "v {} {} {}", p.x, p.y, p.z)?;
        }

        writeln!(writer)?;
        writeln!(writer, "usemtl {}", MATERIAL_NAME)?;
        for [a, b] in &graph.lines {
            writeln!(writer, "l {} {}", a + 1, b + 1)?;
        }

        writer.flush()?;
        Ok(())
    }

    /// Write the material part
    pub fn write_mtl<W: Write>(mut writer: W, style: &LineStyle) -> Result<()> {
        let [r, g, b] = style.color;

        writeln!(writer, "# wavefront mtl file written by graphview")?;
        writeln!(writer)?;
        writeln!(writer, "newmtl {}", MATERIAL_NAME)?;
        writeln!(writer, "Ka 0 0 0")?;
        writeln!(writer, "Kd {} {} {}", r, g, b)?;
        writeln!(writer, "Ks 0 0 0")?;
        writeln!(writer, "Ns 1")?;
        writeln!(writer, "d 1")?;
        writeln!(writer, "illum 1")?;

        writer.flush()?;
        Ok(())
    }
}
