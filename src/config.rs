//! Command line configuration

use clap::Parser;
use graphview_core::Vector3f;
use graphview_visualization::ViewerConfig;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "graphview")]
#[command(about = "Interactive 3D graph viewer with a rotation-tracking orientation HUD")]
pub struct Cli {
    /// Vertex file: one `x y [z]` position per line
    #[arg(long, default_value = "./tmp/graph/embedding.txt")]
    pub vertices: PathBuf,

    /// Edge file: one `source target` index pair per line
    #[arg(long, default_value = "graph.txt")]
    pub edges: PathBuf,

    /// Scene export prefix; writes `<PREFIX>.obj` and `<PREFIX>.mtl`
    #[arg(long, default_value = "graph")]
    pub export_prefix: PathBuf,

    /// Initial translation of the graph
    #[arg(
        long,
        num_args = 3,
        value_names = ["X", "Y", "Z"],
        default_values_t = [0.0, 0.0, 0.0],
        allow_negative_numbers = true
    )]
    pub start_position: Vec<f32>,

    /// Run in verbose mode
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    pub fn start_position(&self) -> Vector3f {
        match self.start_position.as_slice() {
            [x, y, z] => Vector3f::new(*x, *y, *z),
            _ => Vector3f::zeros(),
        }
    }

    pub fn log_level(&self) -> log::LevelFilter {
        if self.verbose {
            log::LevelFilter::Debug
        } else {
            log::LevelFilter::Info
        }
    }

    pub fn viewer_config(&self) -> ViewerConfig {
        ViewerConfig {
            start_position: self.start_position(),
            export_prefix: self.export_prefix.clone(),
            ..ViewerConfig::default()
        }
    }
}
