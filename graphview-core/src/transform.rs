//! Composite transform applied to the graph geometry and the controller that
//! mutates it from user input.
//!
//! Every operation concatenates in the transform's local frame: the new
//! operation is multiplied on the right of the current matrix. Starting from
//! `translate(start)`, the matrix is therefore always `T(start) * R` for some
//! pure rotation `R`, and a second rotation turns about the already-rotated
//! axes rather than the world axes.

use crate::point::*;
use nalgebra::{Matrix3, Matrix4, Rotation3, Vector3};
use serde::{Deserialize, Serialize};

/// Rotation applied per arrow key press, in degrees
pub const ANGLE_STEP_DEGREES: f32 = 5.0;

/// A 4x4 affine transform built by local-frame concatenation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CompositeTransform {
    pub matrix: Matrix4<f32>,
}

impl CompositeTransform {
    /// Create an identity transformation
    pub fn identity() -> Self {
        Self {
            matrix: Matrix4::identity(),
        }
    }

    /// Create a translation transformation
    pub fn from_translation(translation: Vector3f) -> Self {
        Self {
            matrix: Matrix4::new_translation(&translation),
        }
    }

    /// Reset to the identity transformation
    pub fn set_identity(&mut self) {
        self.matrix = Matrix4::identity();
    }

    /// Concatenate a translation in the local frame
    pub fn translate(&mut self, translation: Vector3f) {
        self.matrix *= Matrix4::new_translation(&translation);
    }

    /// Concatenate a rotation about the local X axis
    pub fn rotate_x(&mut self, degrees: f32) {
        self.rotate_about(Vector3::x_axis(), degrees);
    }

    /// Concatenate a rotation about the local Y axis
    pub fn rotate_y(&mut self, degrees: f32) {
        self.rotate_about(Vector3::y_axis(), degrees);
    }

    fn rotate_about(&mut self, axis: nalgebra::Unit<Vector3f>, degrees: f32) {
        let rotation = Rotation3::from_axis_angle(&axis, degrees.to_radians());
        self.matrix *= rotation.to_homogeneous();
    }

    /// The upper-left 3x3 rotation block
    pub fn rotation_block(&self) -> Matrix3<f32> {
        self.matrix.fixed_view::<3, 3>(0, 0).into_owned()
    }

    /// The translation column (rows 0..2 of column 3)
    pub fn translation(&self) -> Vector3f {
        self.matrix.fixed_view::<3, 1>(0, 3).into_owned()
    }

    /// Apply the transformation to a point
    pub fn transform_point(&self, point: &Point3f) -> Point3f {
        let homogeneous = self.matrix * point.to_homogeneous();
        Point3f::from_homogeneous(homogeneous).unwrap_or(*point)
    }

    /// Axis-aligned bounds of `bounds` after transformation
    pub fn transform_bounds(&self, bounds: &Bounds) -> Bounds {
        let (min, max) = bounds;
        let mut out_min = Point3f::new(f32::INFINITY, f32::INFINITY, f32::INFINITY);
        let mut out_max = Point3f::new(f32::NEG_INFINITY, f32::NEG_INFINITY, f32::NEG_INFINITY);

        for i in 0..8 {
            let corner = Point3f::new(
                if i & 1 == 0 { min.x } else { max.x },
                if i & 2 == 0 { min.y } else { max.y },
                if i & 4 == 0 { min.z } else { max.z },
            );
            let p = self.transform_point(&corner);
            out_min = out_min.inf(&p);
            out_max = out_max.sup(&p);
        }

        (out_min, out_max)
    }
}

impl Default for CompositeTransform {
    fn default() -> Self {
        Self::identity()
    }
}

impl From<Matrix4<f32>> for CompositeTransform {
    fn from(matrix: Matrix4<f32>) -> Self {
        Self { matrix }
    }
}

/// Direction of a single rotation step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RotationSign {
    Positive,
    Negative,
}

impl RotationSign {
    /// +1.0 or -1.0
    pub fn factor(self) -> f32 {
        match self {
            RotationSign::Positive => 1.0,
            RotationSign::Negative => -1.0,
        }
    }
}

/// Owns the composite transform of one viewer session
#[derive(Debug, Clone)]
pub struct TransformController {
    transform: CompositeTransform,
    start_position: Vector3f,
    angle_step: f32,
}

impl TransformController {
    /// Create a controller translated to `start_position`
    pub fn new(start_position: Vector3f) -> Self {
        let mut controller = Self {
            transform: CompositeTransform::identity(),
            start_position,
            angle_step: ANGLE_STEP_DEGREES,
        };
        controller.reset();
        controller
    }

    /// Rotate about the local X axis by one step
    pub fn rotate_x(&mut self, sign: RotationSign) {
        self.transform.rotate_x(sign.factor() * self.angle_step);
    }

    /// Rotate about the local Y axis by one step
    pub fn rotate_y(&mut self, sign: RotationSign) {
        self.transform.rotate_y(sign.factor() * self.angle_step);
    }

    /// Discard accumulated rotation and return to `translate(start_position)`
    pub fn reset(&mut self) {
        self.transform.set_identity();
        self.transform.translate(self.start_position);
    }

    /// Snapshot of the current matrix
    pub fn current(&self) -> Matrix4<f32> {
        self.transform.matrix
    }

    /// The composite transform itself
    pub fn transform(&self) -> &CompositeTransform {
        &self.transform
    }

    pub fn start_position(&self) -> Vector3f {
        self.start_position
    }

    /// Degrees per rotation step
    pub fn angle_step(&self) -> f32 {
        self.angle_step
    }
}

impl Default for TransformController {
    fn default() -> Self {
        Self::new(Vector3f::zeros())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_relative_eq, relative_eq};

    fn rx(degrees: f32) -> Matrix4<f32> {
        Rotation3::from_axis_angle(&Vector3::x_axis(), degrees.to_radians()).to_homogeneous()
    }

    fn ry(degrees: f32) -> Matrix4<f32> {
        Rotation3::from_axis_angle(&Vector3::y_axis(), degrees.to_radians()).to_homogeneous()
    }

    #[test]
    fn test_initial_state_is_start_translation() {
        let start = Vector3f::new(1.0, -2.0, 3.0);
        let controller = TransformController::new(start);
        assert_eq!(controller.current(), Matrix4::new_translation(&start));
        assert_eq!(controller.angle_step(), 5.0);
    }

    #[test]
    fn test_rotation_composes_in_local_frame() {
        let start = Vector3f::new(0.5, 0.0, -1.0);
        let mut controller = TransformController::new(start);
        controller.rotate_x(RotationSign::Positive);
        controller.rotate_y(RotationSign::Positive);

        let expected = Matrix4::new_translation(&start) * rx(5.0) * ry(5.0);
        assert_relative_eq!(controller.current(), expected, epsilon = 1e-6);
    }

    #[test]
    fn test_rotation_order_matters() {
        let mut xy = TransformController::default();
        xy.rotate_x(RotationSign::Positive);
        xy.rotate_y(RotationSign::Positive);

        let mut yx = TransformController::default();
        yx.rotate_y(RotationSign::Positive);
        yx.rotate_x(RotationSign::Positive);

        assert!(!relative_eq!(xy.current(), yx.current(), epsilon = 1e-6));
    }

    #[test]
    fn test_opposite_steps_cancel() {
        let mut controller = TransformController::new(Vector3f::new(2.0, 0.0, 0.0));
        let initial = controller.current();
        controller.rotate_y(RotationSign::Positive);
        controller.rotate_y(RotationSign::Negative);
        assert_relative_eq!(controller.current(), initial, epsilon = 1e-6);
    }

    #[test]
    fn test_reset_restores_start_translation() {
        let start = Vector3f::new(1.0, 2.0, 3.0);
        let fresh = TransformController::new(start);

        let mut controller = TransformController::new(start);
        for _ in 0..7 {
            controller.rotate_x(RotationSign::Positive);
        }
        controller.rotate_y(RotationSign::Negative);
        controller.rotate_x(RotationSign::Negative);
        controller.reset();
        assert_eq!(controller.current(), fresh.current());

        controller.reset();
        assert_eq!(controller.current(), fresh.current());
    }

    #[test]
    fn test_always_translation_times_pure_rotation() {
        let start = Vector3f::new(-3.0, 4.0, 0.25);
        let mut controller = TransformController::new(start);
        let steps = [
            (true, RotationSign::Positive),
            (false, RotationSign::Negative),
            (true, RotationSign::Positive),
            (false, RotationSign::Positive),
            (true, RotationSign::Negative),
        ];

        for (about_x, sign) in steps {
            if about_x {
                controller.rotate_x(sign);
            } else {
                controller.rotate_y(sign);
            }

            let transform = controller.transform();
            assert_relative_eq!(transform.translation(), start, epsilon = 1e-5);

            let r = transform.rotation_block();
            assert_relative_eq!(r * r.transpose(), Matrix3::identity(), epsilon = 1e-5);
            assert_relative_eq!(r.determinant(), 1.0, epsilon = 1e-5);

            let bottom = controller.current().fixed_view::<1, 4>(3, 0).into_owned();
            assert_eq!(bottom, nalgebra::RowVector4::new(0.0, 0.0, 0.0, 1.0));
        }
    }

    #[test]
    fn test_transform_bounds_translation() {
        let transform = CompositeTransform::from_translation(Vector3f::new(1.0, 0.0, 0.0));
        let bounds = (Point3f::new(0.0, 0.0, 0.0), Point3f::new(1.0, 1.0, 1.0));
        let (min, max) = transform.transform_bounds(&bounds);
        assert_relative_eq!(min, Point3f::new(1.0, 0.0, 0.0));
        assert_relative_eq!(max, Point3f::new(2.0, 1.0, 1.0));
    }

    #[test]
    fn test_transform_bounds_rotation() {
        let mut transform = CompositeTransform::identity();
        transform.rotate_y(90.0);
        let bounds = (Point3f::new(0.0, 0.0, 0.0), Point3f::new(2.0, 1.0, 0.0));
        let (min, max) = transform.transform_bounds(&bounds);
        assert_relative_eq!(min, Point3f::new(0.0, 0.0, -2.0), epsilon = 1e-5);
        assert_relative_eq!(max, Point3f::new(0.0, 1.0, 0.0), epsilon = 1e-5);
    }
}
