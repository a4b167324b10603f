//! Viewer state independent of the window
//!
//! A [`ViewerSession`] owns the transform controller, the camera, the HUD
//! axes and the key filter, and turns input events into state changes and
//! per-frame matrices. The windowed viewer drives one of these; tests drive
//! it directly.

use crate::camera::Camera;
use crate::input::{
    GraphKeyFilter, KeyOutcome, KeySym, PointerButton, SceneState, TrackballCamera, ViewerHandle,
    DefaultInteraction,
};
use graphview_core::{Bounds, Drawable, HudAxes, RenderableGraph, TransformController, Vector3f};
use graphview_gpu::FrameMatrices;

pub struct ViewerSession {
    controller: TransformController,
    camera: Camera,
    hud: HudAxes,
    filter: GraphKeyFilter<TrackballCamera>,
    graph_bounds: Bounds,
    viewport: (u32, u32),
}

impl ViewerSession {
    /// Place the graph at `start_position`, fit the camera to it and
    /// remember that camera as the reset target
    pub fn new(geometry: &RenderableGraph, start_position: Vector3f, viewport: (u32, u32)) -> Self {
        let controller = TransformController::new(start_position);
        let graph_bounds = geometry.bounding_box();

        let mut camera = Camera::default();
        camera.aspect_ratio = aspect_of(viewport);
        camera.reset_to_bounds(&controller.transform().transform_bounds(&graph_bounds));
        let initial_camera = camera.snapshot();
        log::debug!("Initial camera: {:?}", initial_camera);

        let hud = HudAxes::from_transform(controller.transform());

        Self {
            controller,
            camera,
            hud,
            filter: GraphKeyFilter::new(TrackballCamera::new(), initial_camera),
            graph_bounds,
            viewport,
        }
    }

    pub fn controller(&self) -> &TransformController {
        &self.controller
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn hud(&self) -> &HudAxes {
        &self.hud
    }

    pub fn viewport(&self) -> (u32, u32) {
        self.viewport
    }

    /// Track a window resize; zero-sized viewports are ignored
    pub fn set_viewport(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.viewport = (width, height);
        self.camera.aspect_ratio = aspect_of(self.viewport);
    }

    /// Split the session into the borrowed scene and the key filter
    fn scene_and_filter(&mut self) -> (SceneState<'_>, &mut GraphKeyFilter<TrackballCamera>) {
        let scene = SceneState {
            controller: &mut self.controller,
            camera: &mut self.camera,
            hud: &mut self.hud,
            graph_bounds: self.graph_bounds,
            viewport: self.viewport,
        };
        (scene, &mut self.filter)
    }

    pub fn handle_key(&mut self, key: &KeySym, viewer: &mut dyn ViewerHandle) -> KeyOutcome {
        let (mut scene, filter) = self.scene_and_filter();
        filter.on_key_press(key, &mut scene, viewer)
    }

    pub fn handle_button(&mut self, button: PointerButton, pressed: bool, shift: bool) {
        self.filter
            .default_interaction()
            .on_button(button, pressed, shift);
    }

    pub fn handle_pointer_move(&mut self, x: f64, y: f64, viewer: &mut dyn ViewerHandle) {
        let (mut scene, filter) = self.scene_and_filter();
        filter
            .default_interaction()
            .on_pointer_move(x, y, &mut scene, viewer);
    }

    pub fn handle_wheel(&mut self, notches: f32, viewer: &mut dyn ViewerHandle) {
        let (mut scene, filter) = self.scene_and_filter();
        filter.default_interaction().on_wheel(notches, &mut scene, viewer);
    }

    /// Matrices for the graph and for the HUD axes, whose viewport has
    /// aspect ratio `hud_aspect`
    pub fn frame_matrices(&self, hud_aspect: f32) -> (FrameMatrices, FrameMatrices) {
        let scene = FrameMatrices {
            view_proj: self.camera.view_projection(),
            model: self.controller.current(),
        };
        let hud = FrameMatrices {
            view_proj: self.camera.orientation_view_projection(hud_aspect),
            model: self.hud.user_matrix(),
        };
        (scene, hud)
    }
}

fn aspect_of((width, height): (u32, u32)) -> f32 {
    if width == 0 || height == 0 {
        1.0
    } else {
        width as f32 / height as f32
    }
}
