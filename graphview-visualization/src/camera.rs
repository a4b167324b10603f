//! Camera utilities for 3D visualization

use graphview_core::{Bounds, CameraState, Point3f, Vector3f};
use nalgebra::{Matrix4, Perspective3, Rotation3, Unit};

/// Default vertical view angle in degrees
pub const DEFAULT_VIEW_ANGLE: f32 = 30.0;

/// Distance of the HUD camera from the axes origin
pub const HUD_CAMERA_DISTANCE: f32 = 4.0;

/// Maps OpenGL clip-space depth [-1, 1] to wgpu's [0, 1]
#[rustfmt::skip]
pub fn opengl_to_wgpu_matrix() -> Matrix4<f32> {
    Matrix4::new(
        1.0, 0.0, 0.0, 0.0,
        0.0, 1.0, 0.0, 0.0,
        0.0, 0.0, 0.5, 0.5,
        0.0, 0.0, 0.0, 1.0,
    )
}

/// A perspective camera looking at a focal point
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    pub position: Point3f,
    pub focal_point: Point3f,
    pub view_up: Vector3f,
    /// Vertical field of view in degrees
    pub view_angle: f32,
    pub aspect_ratio: f32,
    pub near: f32,
    pub far: f32,
}

impl Camera {
    /// Create a new camera
    pub fn new(position: Point3f, focal_point: Point3f, view_up: Vector3f, aspect_ratio: f32) -> Self {
        Self {
            position,
            focal_point,
            view_up,
            view_angle: DEFAULT_VIEW_ANGLE,
            aspect_ratio,
            near: 0.01,
            far: 1000.01,
        }
    }

    /// Get the view matrix
    pub fn view_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_at_rh(&self.position, &self.focal_point, &self.view_up)
    }

    /// Get the projection matrix with wgpu depth conventions
    pub fn projection_matrix(&self) -> Matrix4<f32> {
        let perspective = Perspective3::new(
            self.aspect_ratio,
            self.view_angle.to_radians(),
            self.near,
            self.far,
        );
        opengl_to_wgpu_matrix() * perspective.into_inner()
    }

    /// Projection times view
    pub fn view_projection(&self) -> Matrix4<f32> {
        self.projection_matrix() * self.view_matrix()
    }

    /// View-projection for the orientation indicator: same orientation as
    /// this camera, looking at the origin from a fixed distance
    pub fn orientation_view_projection(&self, aspect_ratio: f32) -> Matrix4<f32> {
        let eye = Point3f::origin() - self.direction_of_projection() * HUD_CAMERA_DISTANCE;
        let view = Matrix4::look_at_rh(&eye, &Point3f::origin(), &self.view_up);
        let perspective = Perspective3::new(
            aspect_ratio,
            self.view_angle.to_radians(),
            0.1,
            HUD_CAMERA_DISTANCE * 2.0,
        );
        opengl_to_wgpu_matrix() * perspective.into_inner() * view
    }

    /// Unit vector from the position towards the focal point
    pub fn direction_of_projection(&self) -> Vector3f {
        (self.focal_point - self.position)
            .try_normalize(f32::EPSILON)
            .unwrap_or_else(|| -Vector3f::z())
    }

    /// Distance between position and focal point
    pub fn distance(&self) -> f32 {
        (self.focal_point - self.position).norm()
    }

    /// Capture position, focal point and view-up
    pub fn snapshot(&self) -> CameraState {
        CameraState::new(self.position, self.focal_point, self.view_up)
    }

    /// Put back a captured position, focal point and view-up
    pub fn restore(&mut self, state: &CameraState) {
        self.position = state.position;
        self.focal_point = state.focal_point;
        self.view_up = state.view_up;
    }

    /// Center on `bounds` and back off along the current view direction
    /// until the bounding sphere fits the view angle
    pub fn reset_to_bounds(&mut self, bounds: &Bounds) {
        let (min, max) = bounds;
        let center = nalgebra::center(min, max);
        let mut radius = (max - min).norm() * 0.5;
        if radius <= 0.0 {
            radius = 1.0;
        }

        let distance = radius / (self.view_angle.to_radians() * 0.5).sin();
        let normal = -self.direction_of_projection();

        if self.view_up.cross(&normal).norm() < 1e-4 {
            log::warn!("View-up parallel to view plane normal, resetting view-up");
            self.view_up = if normal.y.abs() < 0.9 {
                Vector3f::y()
            } else {
                Vector3f::z()
            };
        }

        self.focal_point = center;
        self.position = center + normal * distance;
        self.reset_clipping_range(bounds);
    }

    /// Fit near/far planes around every corner of `bounds`
    pub fn reset_clipping_range(&mut self, bounds: &Bounds) {
        let (min, max) = bounds;
        let direction = self.direction_of_projection();

        let mut near = f32::INFINITY;
        let mut far = f32::NEG_INFINITY;
        for i in 0..8 {
            let corner = Point3f::new(
                if i & 1 == 0 { min.x } else { max.x },
                if i & 2 == 0 { min.y } else { max.y },
                if i & 4 == 0 { min.z } else { max.z },
            );
            let depth = (corner - self.position).dot(&direction);
            near = near.min(depth);
            far = far.max(depth);
        }

        if far <= 0.0 {
            // Everything is behind the camera
            self.near = 0.001;
            self.far = 1.0;
            return;
        }

        let padding = ((far - near) * 0.01).max(far * 1e-4);
        far += padding;
        near -= padding;
        self.near = near.max(far * 0.001);
        self.far = far;
    }

    /// Rotate the position about the view-up vector centered at the focal point
    pub fn azimuth(&mut self, degrees: f32) {
        if let Some(axis) = Unit::try_new(self.view_up, f32::EPSILON) {
            self.orbit_about(axis, degrees);
        }
    }

    /// Rotate the position about the right axis centered at the focal point
    pub fn elevation(&mut self, degrees: f32) {
        let normal = self.position - self.focal_point;
        if let Some(axis) = Unit::try_new(normal.cross(&self.view_up), f32::EPSILON) {
            self.orbit_about(axis, degrees);
        }
    }

    fn orbit_about(&mut self, axis: Unit<Vector3f>, degrees: f32) {
        let rotation = Rotation3::from_axis_angle(&axis, degrees.to_radians());
        let offset = self.position - self.focal_point;
        self.position = self.focal_point + rotation * offset;
    }

    /// Make view-up perpendicular to the direction of projection
    pub fn orthogonalize_view_up(&mut self) {
        let direction = self.direction_of_projection();
        let up = self.view_up - direction * self.view_up.dot(&direction);
        if let Some(up) = up.try_normalize(1e-6) {
            self.view_up = up;
        }
    }

    /// Translate position and focal point in the view plane by a pixel delta
    /// (x right, y down) on a viewport `viewport_height` pixels tall
    pub fn pan(&mut self, dx: f32, dy: f32, viewport_height: f32) {
        if viewport_height <= 0.0 {
            return;
        }

        let direction = self.direction_of_projection();
        let right = direction.cross(&self.view_up).normalize();
        let up = right.cross(&direction);
        let world_per_pixel =
            2.0 * self.distance() * (self.view_angle.to_radians() * 0.5).tan() / viewport_height;

        let offset = (-right * dx + up * dy) * world_per_pixel;
        self.position += offset;
        self.focal_point += offset;
    }

    /// Move towards the focal point; `factor > 1` moves closer
    pub fn dolly(&mut self, factor: f32) {
        if factor <= 0.0 {
            return;
        }
        let distance = self.distance() / factor;
        self.position = self.focal_point - self.direction_of_projection() * distance;
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(
            Point3f::new(0.0, 0.0, 1.0),
            Point3f::origin(),
            Vector3f::y(),
            800.0 / 600.0,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn unit_cube() -> Bounds {
        (Point3f::new(-1.0, -1.0, -1.0), Point3f::new(1.0, 1.0, 1.0))
    }

    #[test]
    fn test_reset_to_bounds_centers_and_fits() {
        let mut camera = Camera::default();
        let bounds = (Point3f::new(0.0, 0.0, 0.0), Point3f::new(2.0, 2.0, 0.0));
        camera.reset_to_bounds(&bounds);

        assert_relative_eq!(camera.focal_point, Point3f::new(1.0, 1.0, 0.0));
        let radius = 2.0f32.sqrt();
        let expected = radius / 15.0f32.to_radians().sin();
        assert_relative_eq!(camera.distance(), expected, epsilon = 1e-4);
        assert_relative_eq!(camera.direction_of_projection(), -Vector3f::z(), epsilon = 1e-6);
        assert_eq!(camera.view_up, Vector3f::y());
    }

    #[test]
    fn test_reset_to_degenerate_bounds_uses_unit_radius() {
        let mut camera = Camera::default();
        let p = Point3f::new(3.0, 3.0, 3.0);
        camera.reset_to_bounds(&(p, p));
        assert_relative_eq!(camera.focal_point, p);
        assert_relative_eq!(camera.distance(), 1.0 / 15.0f32.to_radians().sin(), epsilon = 1e-4);
    }

    #[test]
    fn test_clipping_range_encloses_bounds() {
        let mut camera = Camera::default();
        camera.reset_to_bounds(&unit_cube());
        let d = camera.distance();
        assert!(camera.near > 0.0);
        assert!(camera.near <= d - 1.0);
        assert!(camera.far >= d + 1.0);
    }

    #[test]
    fn test_snapshot_restore() {
        let mut camera = Camera::default();
        camera.reset_to_bounds(&unit_cube());
        let state = camera.snapshot();

        camera.azimuth(40.0);
        camera.elevation(-25.0);
        camera.orthogonalize_view_up();
        camera.pan(12.0, -7.0, 600.0);
        camera.dolly(1.5);
        assert_ne!(camera.snapshot(), state);

        camera.restore(&state);
        assert_eq!(camera.snapshot(), state);
    }

    #[test]
    fn test_azimuth_keeps_distance() {
        let mut camera = Camera::default();
        camera.reset_to_bounds(&unit_cube());
        let distance = camera.distance();
        camera.azimuth(90.0);
        assert_relative_eq!(camera.distance(), distance, epsilon = 1e-4);
        assert_relative_eq!(
            camera.direction_of_projection(),
            -Vector3f::x(),
            epsilon = 1e-5
        );
    }

    #[test]
    fn test_elevation_moves_camera_up() {
        let mut camera = Camera::default();
        camera.elevation(30.0);
        assert!(camera.position.y > 0.0);
        camera.orthogonalize_view_up();
        assert_relative_eq!(
            camera.view_up.dot(&camera.direction_of_projection()),
            0.0,
            epsilon = 1e-6
        );
    }

    #[test]
    fn test_dolly_and_pan() {
        let mut camera = Camera::default();
        camera.dolly(2.0);
        assert_relative_eq!(camera.distance(), 0.5, epsilon = 1e-6);

        let before = camera.focal_point;
        camera.pan(100.0, 0.0, 600.0);
        assert!(camera.focal_point.x < before.x);
        assert_relative_eq!(camera.distance(), 0.5, epsilon = 1e-6);
    }

    #[test]
    fn test_projection_maps_near_far_to_unit_depth() {
        let camera = Camera::default();
        let proj = camera.projection_matrix();
        let near = proj * nalgebra::Vector4::new(0.0, 0.0, -camera.near, 1.0);
        let far = proj * nalgebra::Vector4::new(0.0, 0.0, -camera.far, 1.0);
        assert_relative_eq!(near.z / near.w, 0.0, epsilon = 1e-4);
        assert_relative_eq!(far.z / far.w, 1.0, epsilon = 1e-4);
    }
}
