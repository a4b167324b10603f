//! Interactive graph viewer window
//!
//! Opens a window, renders the graph with the composite transform, keeps the
//! orientation HUD in the lower-left corner and routes keyboard and pointer
//! input through a [`ViewerSession`].

use std::path::PathBuf;
use std::sync::Arc;
use winit::{
    event::{ElementState, Event, MouseScrollDelta, WindowEvent},
    event_loop::{ControlFlow, EventLoop, EventLoopWindowTarget},
    window::{Window, WindowBuilder},
};

use crate::input::{KeySym, PointerButton, ViewerHandle};
use crate::session::ViewerSession;
use graphview_core::{Error, RenderableGraph, Result, Vector3f};
use graphview_gpu::{GraphRenderer, RenderConfig};

/// Window title used when none is configured
pub const DEFAULT_TITLE: &str = "3D Graph with Rotating Coordinates (Rust - wgpu)";

/// Pixels of smooth scrolling counted as one wheel notch
const PIXELS_PER_NOTCH: f64 = 100.0;

/// Viewer configuration
#[derive(Debug, Clone)]
pub struct ViewerConfig {
    /// Logical window size
    pub width: u32,
    pub height: u32,
    pub title: String,
    /// Initial translation of the graph
    pub start_position: Vector3f,
    /// The scene is written to `<prefix>.obj` and `<prefix>.mtl` before interaction starts
    pub export_prefix: PathBuf,
    pub render: RenderConfig,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            title: DEFAULT_TITLE.to_string(),
            start_position: Vector3f::zeros(),
            export_prefix: PathBuf::from("graph"),
            render: RenderConfig::default(),
        }
    }
}

/// Aspect ratio of the HUD viewport inside a `width` x `height` window
pub fn hud_aspect(viewport: [f32; 4], width: u32, height: u32) -> f32 {
    let w = (viewport[2] - viewport[0]) * width as f32;
    let h = (viewport[3] - viewport[1]) * height as f32;
    if w <= 0.0 || h <= 0.0 {
        1.0
    } else {
        w / h
    }
}

/// Convert a wheel delta to notches, positive when scrolling forward
pub fn wheel_notches(delta: MouseScrollDelta) -> f32 {
    match delta {
        MouseScrollDelta::LineDelta(_, y) => y,
        MouseScrollDelta::PixelDelta(pos) => (pos.y / PIXELS_PER_NOTCH) as f32,
    }
}

/// Redraw/exit requests made while handling one event
struct WindowRequests<'a> {
    window: &'a Window,
    target: &'a EventLoopWindowTarget<()>,
}

impl ViewerHandle for WindowRequests<'_> {
    fn request_redraw(&mut self) {
        self.window.request_redraw();
    }

    fn request_exit(&mut self) {
        self.target.exit();
    }
}

/// Interactive viewer for one graph
pub struct GraphViewer {
    geometry: RenderableGraph,
    config: ViewerConfig,
}

impl GraphViewer {
    pub fn new(geometry: RenderableGraph, config: ViewerConfig) -> Self {
        Self { geometry, config }
    }

    /// Open the window, export the scene and block until the window closes
    pub fn run(self) -> Result<()> {
        let Self { geometry, config } = self;

        let event_loop = EventLoop::new()
            .map_err(|e| Error::Visualization(format!("Failed to create event loop: {}", e)))?;
        let window = Arc::new(
            WindowBuilder::new()
                .with_title(config.title.as_str())
                .with_inner_size(winit::dpi::LogicalSize::new(config.width, config.height))
                .build(&event_loop)
                .map_err(|e| Error::Visualization(format!("Failed to create window: {}", e)))?,
        );

        let mut renderer =
            pollster::block_on(GraphRenderer::new(window.clone(), config.render.clone()))?;
        renderer.set_graph(&geometry);

        let mut session = ViewerSession::new(&geometry, config.start_position, renderer.size());

        graphview_io::export_obj(
            &config.export_prefix,
            &geometry,
            &session.controller().current(),
        )?;

        let hud_viewport = config.render.hud_viewport;
        let mut shift = false;
        window.request_redraw();

        event_loop
            .run(move |event, target| {
                target.set_control_flow(ControlFlow::Wait);

                let Event::WindowEvent { event, .. } = event else {
                    return;
                };
                let mut requests = WindowRequests {
                    window: &window,
                    target,
                };

                match event {
                    WindowEvent::CloseRequested => target.exit(),
                    WindowEvent::Resized(new_size) => {
                        log::debug!("Resized to {}x{}", new_size.width, new_size.height);
                        renderer.resize(new_size);
                        session.set_viewport(new_size.width, new_size.height);
                        window.request_redraw();
                    }
                    WindowEvent::ModifiersChanged(modifiers) => {
                        shift = modifiers.state().shift_key();
                    }
                    WindowEvent::KeyboardInput { event, .. } => {
                        if event.state == ElementState::Pressed {
                            let key = KeySym::from_winit(&event.logical_key);
                            session.handle_key(&key, &mut requests);
                        }
                    }
                    WindowEvent::MouseInput { state, button, .. } => {
                        if let Some(button) = PointerButton::from_winit(button) {
                            session.handle_button(button, state == ElementState::Pressed, shift);
                        }
                    }
                    WindowEvent::CursorMoved { position, .. } => {
                        session.handle_pointer_move(position.x, position.y, &mut requests);
                    }
                    WindowEvent::MouseWheel { delta, .. } => {
                        session.handle_wheel(wheel_notches(delta), &mut requests);
                    }
                    WindowEvent::RedrawRequested => {
                        let (width, height) = renderer.size();
                        let (scene, hud) =
                            session.frame_matrices(hud_aspect(hud_viewport, width, height));
                        if let Err(e) = renderer.render(&scene, &hud) {
                            log::error!("Render error: {}", e);
                        }
                    }
                    _ => {}
                }
            })
            .map_err(|e| Error::Visualization(format!("Event loop error: {}", e)))
    }
}
