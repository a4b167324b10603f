//! # graphview GPU
//!
//! wgpu rendering for graphview: the graph's line segments and points drawn
//! with the composite transform, plus the orientation HUD axes drawn into a
//! fixed corner viewport with the rotation-only HUD matrix.
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use graphview_gpu::{GraphRenderer, RenderConfig};
//!
//! async fn example(window: Arc<winit::window::Window>) -> graphview_core::Result<()> {
//!     let mut renderer = GraphRenderer::new(window, RenderConfig::default()).await?;
//!     // renderer.set_graph(&geometry);
//!     // renderer.render(&scene, &hud)?;
//!     Ok(())
//! }
//! ```

pub mod device;
pub mod renderer;

pub use device::GpuContext;
pub use renderer::{
    graph_to_vertices, hud_axes_vertices, srgb_to_linear, viewport_rect, FrameMatrices,
    GraphRenderer, GraphVertex, RenderConfig, TransformUniform, HUD_AXIS_COLORS,
};
