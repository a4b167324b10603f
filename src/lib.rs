//! # graphview
//!
//! Interactive 3D graph viewer. Loads vertex positions and edge index pairs
//! from text files, draws them as points and lines, and rotates the graph in
//! 5° steps with the arrow keys while an orientation indicator in the corner
//! follows the rotation. Space restores the initial view.
//!
//! The pieces live in their own crates and are re-exported here:
//! - [`graphview_core`]: graph data, transforms, HUD math, errors
//! - [`graphview_io`]: text loaders and OBJ/MTL export
//! - [`graphview_visualization`]: camera, input handling and the window

pub mod config;
pub mod startup;

pub use graphview_core;
pub use graphview_io;
pub use graphview_visualization;

pub use config::Cli;
pub use startup::load_graph;
