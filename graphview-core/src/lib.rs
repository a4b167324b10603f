//! Core data structures and math for graphview
//!
//! This crate provides the graph data model, the composite transform that
//! rotates the rendered graph, the rotation-only HUD matrix derived from it,
//! and the renderable geometry built from a loaded graph.

pub mod point;
pub mod graph;
pub mod scene;
pub mod transform;
pub mod hud;
pub mod camera_state;
pub mod traits;
pub mod error;

pub use point::*;
pub use graph::*;
pub use scene::*;
pub use transform::*;
pub use hud::*;
pub use camera_state::*;
pub use traits::*;
pub use error::*;

/// Re-export commonly used types from nalgebra
pub use nalgebra::{Matrix3, Matrix4, Point3, Vector3};
