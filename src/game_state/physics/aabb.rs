//! Axis-aligned bounding boxes for the collision and raycasting systems.

use cgmath::{Point3, Vector3};

/// An axis-aligned box described by its minimum and maximum corners.
#[derive(Debug, Clone, Copy)]
pub struct Aabb {
    pub min: Point3<f32>,
    pub max: Point3<f32>,
}

impl Aabb {
    /// Builds a box from its center and full extents on each axis.
    ///
    /// Block cells are centered on their integer coordinates, so a unit
    /// block at `(x, y, z)` spans `[x - 0.5, x + 0.5]` per axis.
    pub fn centered(center: Point3<f32>, width: f32, height: f32, depth: f32) -> Self {
        let half = Vector3::new(width / 2.0, height / 2.0, depth / 2.0);
        Aabb {
            min: center - half,
            max: center + half,
        }
    }

    /// Tests whether two boxes overlap, boundaries included.
    pub fn intersects(&self, other: &Aabb) -> bool {
        self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.y <= other.max.y
            && self.max.y >= other.min.y
            && self.min.z <= other.max.z
            && self.max.z >= other.min.z
    }
}
