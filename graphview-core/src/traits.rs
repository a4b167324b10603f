//! Core traits for graphview

use crate::{graph::Graph, point::*, scene::RenderableGraph};

/// Trait for drawable/renderable objects
pub trait Drawable {
    /// Get the bounding box of the object
    fn bounding_box(&self) -> Bounds;

    /// Get the center point of the object
    fn center(&self) -> Point3f {
        let (min, max) = self.bounding_box();
        nalgebra::center(&min, &max)
    }
}

/// Bounding box of a point set, or a degenerate box at the origin when empty
pub fn points_bounding_box(points: &[Point3f]) -> Bounds {
    let Some(first) = points.first() else {
        return (Point3f::origin(), Point3f::origin());
    };

    points
        .iter()
        .fold((*first, *first), |(min, max), p| (min.inf(p), max.sup(p)))
}

impl Drawable for Graph {
    fn bounding_box(&self) -> Bounds {
        points_bounding_box(&self.vertices)
    }
}

impl Drawable for RenderableGraph {
    fn bounding_box(&self) -> Bounds {
        points_bounding_box(&self.points)
    }
}
