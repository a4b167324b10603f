//! Captured camera parameters

use crate::point::*;
use serde::{Deserialize, Serialize};

/// Snapshot of a camera taken once after the first auto-fit.
/// Only used to put the camera back on reset.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraState {
    pub position: Point3f,
    pub focal_point: Point3f,
    pub view_up: Vector3f,
}

impl CameraState {
    pub fn new(position: Point3f, focal_point: Point3f, view_up: Vector3f) -> Self {
        Self {
            position,
            focal_point,
            view_up,
        }
    }
}
