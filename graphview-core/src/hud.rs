//! Orientation indicator state
//!
//! The HUD axes show only the rotational part of the composite transform.
//! Their display matrix is rebuilt from the composite transform after every
//! mutation, before the next redraw.

use crate::transform::{CompositeTransform, TransformController};
use nalgebra::Matrix4;

/// Copy `composite` with its translation column (rows 0..2, column 3) zeroed
pub fn sync_hud(composite: &Matrix4<f32>) -> Matrix4<f32> {
    let mut matrix = *composite;
    matrix[(0, 3)] = 0.0;
    matrix[(1, 3)] = 0.0;
    matrix[(2, 3)] = 0.0;
    matrix
}

/// Axes actor shown by the orientation indicator
#[derive(Debug, Clone, PartialEq)]
pub struct HudAxes {
    user_matrix: Matrix4<f32>,
}

impl HudAxes {
    /// Axes with an identity display matrix
    pub fn new() -> Self {
        Self {
            user_matrix: Matrix4::identity(),
        }
    }

    /// Axes already synchronized with `composite`
    pub fn from_transform(composite: &CompositeTransform) -> Self {
        Self {
            user_matrix: sync_hud(&composite.matrix),
        }
    }

    /// Recompute the display matrix from the controller's current transform
    pub fn sync(&mut self, controller: &TransformController) {
        self.user_matrix = sync_hud(&controller.current());
    }

    /// The rotation-only matrix the indicator is drawn with
    pub fn user_matrix(&self) -> Matrix4<f32> {
        self.user_matrix
    }
}

impl Default for HudAxes {
    fn default() -> Self {
        Self::new()
    }
}
