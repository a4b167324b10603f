//! Visualization for graphview
//!
//! This crate provides the interactive side of the viewer using wgpu and winit:
//! - Perspective camera with auto-fit, clipping range and trackball moves
//! - Arrow-key rotation and Space reset layered over the default interaction
//! - The window and event loop

pub mod camera;
pub mod input;
pub mod session;
pub mod interactive_viewer;

pub use camera::*;
pub use input::*;
pub use session::*;
pub use interactive_viewer::*;
