//! Keyboard and pointer interaction
//!
//! Input is handled by composition: [`GraphKeyFilter`] claims the arrow keys
//! and Space, and hands every other event to a wrapped
//! [`DefaultInteraction`] (normally [`TrackballCamera`]) unchanged.
//! Neither owns the scene: the composite transform, camera and HUD are
//! borrowed per event through [`SceneState`], and redraw/exit requests go
//! through a [`ViewerHandle`].

use crate::camera::Camera;
use graphview_core::{Bounds, CameraState, HudAxes, RotationSign, TransformController};
use winit::keyboard::{Key, NamedKey};

/// Keys the viewer distinguishes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeySym {
    Up,
    Down,
    Left,
    Right,
    Space,
    Char(char),
    Other,
}

impl KeySym {
    /// Map a winit logical key
    pub fn from_winit(key: &Key) -> Self {
        match key {
            Key::Named(NamedKey::ArrowUp) => KeySym::Up,
            Key::Named(NamedKey::ArrowDown) => KeySym::Down,
            Key::Named(NamedKey::ArrowLeft) => KeySym::Left,
            Key::Named(NamedKey::ArrowRight) => KeySym::Right,
            Key::Named(NamedKey::Space) => KeySym::Space,
            Key::Character(text) => match text.chars().next() {
                Some(' ') => KeySym::Space,
                Some(c) => KeySym::Char(c),
                None => KeySym::Other,
            },
            _ => KeySym::Other,
        }
    }
}

/// Pointer buttons used by camera manipulation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Left,
    Middle,
    Right,
}

impl PointerButton {
    pub fn from_winit(button: winit::event::MouseButton) -> Option<Self> {
        match button {
            winit::event::MouseButton::Left => Some(PointerButton::Left),
            winit::event::MouseButton::Middle => Some(PointerButton::Middle),
            winit::event::MouseButton::Right => Some(PointerButton::Right),
            _ => None,
        }
    }
}

/// Requests an interaction can make of the window it runs in
pub trait ViewerHandle {
    /// Schedule a redraw of the viewer
    fn request_redraw(&mut self);

    /// Close the viewer
    fn request_exit(&mut self);
}

/// Mutable view of the session state an event may touch
pub struct SceneState<'a> {
    pub controller: &'a mut TransformController,
    pub camera: &'a mut Camera,
    pub hud: &'a mut HudAxes,
    /// Untransformed bounds of the graph geometry
    pub graph_bounds: Bounds,
    /// Window size in pixels
    pub viewport: (u32, u32),
}

impl SceneState<'_> {
    /// Bounds of the geometry as rendered, i.e. through the composite transform
    pub fn world_bounds(&self) -> Bounds {
        self.controller.transform().transform_bounds(&self.graph_bounds)
    }
}

/// Default toolkit interaction: camera manipulation and built-in keys
pub trait DefaultInteraction {
    fn on_key_press(&mut self, key: &KeySym, scene: &mut SceneState<'_>, viewer: &mut dyn ViewerHandle);

    fn on_button(&mut self, button: PointerButton, pressed: bool, shift: bool);

    fn on_pointer_move(&mut self, x: f64, y: f64, scene: &mut SceneState<'_>, viewer: &mut dyn ViewerHandle);

    /// `notches > 0` scrolls forward
    fn on_wheel(&mut self, notches: f32, scene: &mut SceneState<'_>, viewer: &mut dyn ViewerHandle);
}

/// Camera-moving drag in progress
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Motion {
    Rotate,
    Pan,
    Dolly,
}

/// Degrees of rotation for a drag across the full window extent
const ROTATION_DEGREES_PER_EXTENT: f64 = 200.0;
const MOTION_FACTOR: f64 = 10.0;
const WHEEL_MOTION: f32 = 2.0;

/// Trackball-style camera manipulation
///
/// Left drag orbits the camera around its focal point, shift+left or middle
/// drag pans, right drag and the wheel dolly. `r` refits the camera to the
/// scene and `q`/`e` close the viewer.
#[derive(Debug, Default)]
pub struct TrackballCamera {
    motion: Option<Motion>,
    last_position: Option<(f64, f64)>,
}

impl TrackballCamera {
    pub fn new() -> Self {
        Self::default()
    }

    /// The drag currently in progress
    pub fn motion(&self) -> Option<Motion> {
        self.motion
    }

    fn finish_camera_move(scene: &mut SceneState<'_>, viewer: &mut dyn ViewerHandle) {
        let bounds = scene.world_bounds();
        scene.camera.reset_clipping_range(&bounds);
        viewer.request_redraw();
    }
}

impl DefaultInteraction for TrackballCamera {
    fn on_key_press(&mut self, key: &KeySym, scene: &mut SceneState<'_>, viewer: &mut dyn ViewerHandle) {
        match key {
            KeySym::Char('r') | KeySym::Char('R') => {
                let bounds = scene.world_bounds();
                scene.camera.reset_to_bounds(&bounds);
                viewer.request_redraw();
            }
            KeySym::Char('q') | KeySym::Char('Q') | KeySym::Char('e') | KeySym::Char('E') => {
                viewer.request_exit();
            }
            _ => {}
        }
    }

    fn on_button(&mut self, button: PointerButton, pressed: bool, shift: bool) {
        if !pressed {
            self.motion = None;
            return;
        }

        self.motion = Some(match button {
            PointerButton::Left if shift => Motion::Pan,
            PointerButton::Left => Motion::Rotate,
            PointerButton::Middle => Motion::Pan,
            PointerButton::Right => Motion::Dolly,
        });
    }

    fn on_pointer_move(&mut self, x: f64, y: f64, scene: &mut SceneState<'_>, viewer: &mut dyn ViewerHandle) {
        let last = self.last_position.replace((x, y));
        let (Some(motion), Some((last_x, last_y))) = (self.motion, last) else {
            return;
        };

        let (width, height) = scene.viewport;
        if width == 0 || height == 0 {
            return;
        }
        let (w, h) = (width as f64, height as f64);
        let (dx, dy) = (x - last_x, y - last_y);

        match motion {
            Motion::Rotate => {
                // Pixel y grows downwards
                scene.camera.azimuth((-ROTATION_DEGREES_PER_EXTENT * dx / w) as f32);
                scene.camera.elevation((ROTATION_DEGREES_PER_EXTENT * dy / h) as f32);
                scene.camera.orthogonalize_view_up();
            }
            Motion::Pan => {
                scene.camera.pan(dx as f32, dy as f32, h as f32);
            }
            Motion::Dolly => {
                let factor = 1.1f64.powf(MOTION_FACTOR * -dy / (h * 0.5));
                scene.camera.dolly(factor as f32);
            }
        }

        Self::finish_camera_move(scene, viewer);
    }

    fn on_wheel(&mut self, notches: f32, scene: &mut SceneState<'_>, viewer: &mut dyn ViewerHandle) {
        if notches == 0.0 {
            return;
        }
        scene.camera.dolly(1.1f32.powf(WHEEL_MOTION * notches));
        Self::finish_camera_move(scene, viewer);
    }
}

/// Result of offering a key to [`GraphKeyFilter`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    /// Rotated or reset the graph; the HUD was synced and a redraw requested
    Handled,
    /// Passed to the default interaction
    Forwarded,
}

/// Graph rotation keys layered over a default interaction
pub struct GraphKeyFilter<D: DefaultInteraction> {
    default: D,
    initial_camera: CameraState,
}

impl<D: DefaultInteraction> GraphKeyFilter<D> {
    /// `initial_camera` is restored on Space
    pub fn new(default: D, initial_camera: CameraState) -> Self {
        Self {
            default,
            initial_camera,
        }
    }

    /// The wrapped default interaction, for pointer events
    pub fn default_interaction(&mut self) -> &mut D {
        &mut self.default
    }

    /// Handle one key press atomically
    pub fn on_key_press(
        &mut self,
        key: &KeySym,
        scene: &mut SceneState<'_>,
        viewer: &mut dyn ViewerHandle,
    ) -> KeyOutcome {
        match key {
            KeySym::Up => scene.controller.rotate_x(RotationSign::Positive),
            KeySym::Down => scene.controller.rotate_x(RotationSign::Negative),
            KeySym::Left => scene.controller.rotate_y(RotationSign::Positive),
            KeySym::Right => scene.controller.rotate_y(RotationSign::Negative),
            KeySym::Space => {
                scene.controller.reset();
                scene.camera.restore(&self.initial_camera);
            }
            _ => {
                self.default.on_key_press(key, scene, viewer);
                return KeyOutcome::Forwarded;
            }
        }

        // Rotation turns the geometry out of the old depth range
        let bounds = scene.world_bounds();
        scene.camera.reset_clipping_range(&bounds);

        log::debug!("Handled {:?}, composite transform now {:?}", key, scene.controller.current());
        scene.hud.sync(scene.controller);
        viewer.request_redraw();
        KeyOutcome::Handled
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use graphview_core::{sync_hud, Point3f, Vector3f};
    use nalgebra::Matrix4;

    #[derive(Default)]
    struct RecordingViewer {
        redraws: usize,
        exits: usize,
    }

    impl ViewerHandle for RecordingViewer {
        fn request_redraw(&mut self) {
            self.redraws += 1;
        }

        fn request_exit(&mut self) {
            self.exits += 1;
        }
    }

    #[derive(Default)]
    struct RecordingInteraction {
        keys: Vec<KeySym>,
    }

    impl DefaultInteraction for RecordingInteraction {
        fn on_key_press(&mut self, key: &KeySym, _: &mut SceneState<'_>, _: &mut dyn ViewerHandle) {
            self.keys.push(key.clone());
        }

        fn on_button(&mut self, _: PointerButton, _: bool, _: bool) {}

        fn on_pointer_move(&mut self, _: f64, _: f64, _: &mut SceneState<'_>, _: &mut dyn ViewerHandle) {}

        fn on_wheel(&mut self, _: f32, _: &mut SceneState<'_>, _: &mut dyn ViewerHandle) {}
    }

    struct Fixture {
        controller: TransformController,
        camera: Camera,
        hud: HudAxes,
        bounds: Bounds,
    }

    impl Fixture {
        fn new() -> Self {
            let controller = TransformController::new(Vector3f::new(1.0, 0.0, 0.0));
            let bounds = (Point3f::new(-1.0, -1.0, 0.0), Point3f::new(1.0, 1.0, 0.0));
            let mut camera = Camera::default();
            camera.reset_to_bounds(&controller.transform().transform_bounds(&bounds));
            let hud = HudAxes::from_transform(controller.transform());
            Self {
                controller,
                camera,
                hud,
                bounds,
            }
        }

        fn scene(&mut self) -> SceneState<'_> {
            SceneState {
                controller: &mut self.controller,
                camera: &mut self.camera,
                hud: &mut self.hud,
                graph_bounds: self.bounds,
                viewport: (800, 600),
            }
        }
    }

    fn filter_for(fixture: &Fixture) -> GraphKeyFilter<RecordingInteraction> {
        GraphKeyFilter::new(RecordingInteraction::default(), fixture.camera.snapshot())
    }

    #[test]
    fn test_arrow_keys_rotate_and_redraw() {
        let mut fixture = Fixture::new();
        let mut filter = filter_for(&fixture);
        let mut viewer = RecordingViewer::default();

        let mut expected = *fixture.controller.transform();
        for (key, rotate_x, degrees) in [
            (KeySym::Up, true, 5.0),
            (KeySym::Left, false, 5.0),
            (KeySym::Down, true, -5.0),
            (KeySym::Right, false, -5.0),
            (KeySym::Right, false, -5.0),
        ] {
            let outcome = filter.on_key_press(&key, &mut fixture.scene(), &mut viewer);
            assert_eq!(outcome, KeyOutcome::Handled);
            if rotate_x {
                expected.rotate_x(degrees);
            } else {
                expected.rotate_y(degrees);
            }
            assert_relative_eq!(fixture.controller.current(), expected.matrix, epsilon = 1e-6);
            assert_eq!(fixture.hud.user_matrix(), sync_hud(&fixture.controller.current()));
        }

        assert_eq!(viewer.redraws, 5);
        assert!(filter.default_interaction().keys.is_empty());
    }

    #[test]
    fn test_rotation_does_not_move_camera() {
        let mut fixture = Fixture::new();
        let mut filter = filter_for(&fixture);
        let mut viewer = RecordingViewer::default();
        let before = fixture.camera.snapshot();

        filter.on_key_press(&KeySym::Up, &mut fixture.scene(), &mut viewer);
        filter.on_key_press(&KeySym::Left, &mut fixture.scene(), &mut viewer);
        assert_eq!(fixture.camera.snapshot(), before);
    }

    #[test]
    fn test_space_resets_transform_and_camera() {
        let mut fixture = Fixture::new();
        let mut filter = filter_for(&fixture);
        let mut viewer = RecordingViewer::default();
        let initial_transform = fixture.controller.current();
        let initial_camera = fixture.camera.snapshot();

        filter.on_key_press(&KeySym::Up, &mut fixture.scene(), &mut viewer);
        filter.on_key_press(&KeySym::Left, &mut fixture.scene(), &mut viewer);
        fixture.camera.azimuth(45.0);
        fixture.camera.dolly(3.0);

        let outcome = filter.on_key_press(&KeySym::Space, &mut fixture.scene(), &mut viewer);
        assert_eq!(outcome, KeyOutcome::Handled);
        assert_eq!(fixture.controller.current(), initial_transform);
        assert_eq!(fixture.camera.snapshot(), initial_camera);
        assert_eq!(fixture.hud.user_matrix(), Matrix4::identity());
        assert!(fixture.camera.near > 0.0 && fixture.camera.far > fixture.camera.distance());
        assert_eq!(viewer.redraws, 3);
    }

    #[test]
    fn test_other_keys_forwarded_without_redraw() {
        let mut fixture = Fixture::new();
        let mut filter = filter_for(&fixture);
        let mut viewer = RecordingViewer::default();
        let before = fixture.controller.current();

        for key in [KeySym::Char('w'), KeySym::Other, KeySym::Char('r')] {
            let outcome = filter.on_key_press(&key, &mut fixture.scene(), &mut viewer);
            assert_eq!(outcome, KeyOutcome::Forwarded);
        }

        assert_eq!(fixture.controller.current(), before);
        assert_eq!(viewer.redraws, 0);
        assert_eq!(
            filter.default_interaction().keys,
            vec![KeySym::Char('w'), KeySym::Other, KeySym::Char('r')]
        );
    }

    #[test]
    fn test_trackball_keys() {
        let mut fixture = Fixture::new();
        let mut trackball = TrackballCamera::new();
        let mut viewer = RecordingViewer::default();
        let fitted = fixture.camera.snapshot();

        fixture.camera.dolly(4.0);
        trackball.on_key_press(&KeySym::Char('r'), &mut fixture.scene(), &mut viewer);
        assert_relative_eq!(fixture.camera.position, fitted.position, epsilon = 1e-4);
        assert_eq!(viewer.redraws, 1);

        trackball.on_key_press(&KeySym::Char('q'), &mut fixture.scene(), &mut viewer);
        trackball.on_key_press(&KeySym::Char('x'), &mut fixture.scene(), &mut viewer);
        assert_eq!(viewer.exits, 1);
        assert_eq!(viewer.redraws, 1);
    }

    #[test]
    fn test_trackball_drag_orbits_camera() {
        let mut fixture = Fixture::new();
        let mut trackball = TrackballCamera::new();
        let mut viewer = RecordingViewer::default();
        let distance = fixture.camera.distance();
        let before = fixture.camera.position;

        // Moving without a pressed button only tracks the pointer
        trackball.on_pointer_move(400.0, 300.0, &mut fixture.scene(), &mut viewer);
        assert_eq!(viewer.redraws, 0);

        trackball.on_button(PointerButton::Left, true, false);
        assert_eq!(trackball.motion(), Some(Motion::Rotate));
        trackball.on_pointer_move(440.0, 300.0, &mut fixture.scene(), &mut viewer);
        assert_eq!(viewer.redraws, 1);
        assert_ne!(fixture.camera.position, before);
        assert_relative_eq!(fixture.camera.distance(), distance, epsilon = 1e-3);

        trackball.on_button(PointerButton::Left, false, false);
        assert_eq!(trackball.motion(), None);
    }

    #[test]
    fn test_trackball_wheel_dollies() {
        let mut fixture = Fixture::new();
        let mut trackball = TrackballCamera::new();
        let mut viewer = RecordingViewer::default();
        let distance = fixture.camera.distance();

        trackball.on_wheel(1.0, &mut fixture.scene(), &mut viewer);
        assert_relative_eq!(fixture.camera.distance(), distance / 1.21, epsilon = 1e-3);
        assert_eq!(viewer.redraws, 1);
    }

    #[test]
    fn test_shift_left_pans() {
        let mut trackball = TrackballCamera::new();
        trackball.on_button(PointerButton::Left, true, true);
        assert_eq!(trackball.motion(), Some(Motion::Pan));
        trackball.on_button(PointerButton::Right, true, false);
        assert_eq!(trackball.motion(), Some(Motion::Dolly));
    }

    #[test]
    fn test_key_mapping() {
        assert_eq!(KeySym::from_winit(&Key::Named(NamedKey::ArrowUp)), KeySym::Up);
        assert_eq!(KeySym::from_winit(&Key::Named(NamedKey::ArrowRight)), KeySym::Right);
        assert_eq!(KeySym::from_winit(&Key::Named(NamedKey::Space)), KeySym::Space);
        assert_eq!(KeySym::from_winit(&Key::Character(" ".into())), KeySym::Space);
        assert_eq!(KeySym::from_winit(&Key::Character("r".into())), KeySym::Char('r'));
        assert_eq!(KeySym::from_winit(&Key::Named(NamedKey::Escape)), KeySym::Other);
    }
}
