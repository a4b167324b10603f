//! Point and vector types

use nalgebra::{Point3, Vector3};

/// A 3D point with floating point coordinates
pub type Point3f = Point3<f32>;

/// A 3D vector with floating point components
pub type Vector3f = Vector3<f32>;

/// A graph vertex position. Its index in the loaded sequence is its identity.
pub type Vertex = Point3f;

/// Axis-aligned bounds as (min, max) corners
pub type Bounds = (Point3f, Point3f);
