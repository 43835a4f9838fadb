//! Point cloud accumulator.
//!
//! Stores the emitted points as five parallel, index-aligned flat arrays in
//! the layout the render adapter consumes directly: positions (3 floats),
//! colors (4 floats, unit scale), sizes (2 floats), angles (1 float), and a
//! dense, strictly increasing index per point. Append-only during generation,
//! read-only afterward.
use glam::Vec2;

/// One renderable point, already in the centered output frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub position: Vec2,
    /// RGBA, each channel in `[0, 1]` after clamping.
    pub color: [f32; 4],
    pub size: [f32; 2],
    /// Rotation in radians.
    pub angle: f32,
}

/// Ordered collection of all points emitted across layers.
#[derive(Debug, Clone, Default)]
pub struct PointCloud {
    positions: Vec<f32>,
    colors: Vec<f32>,
    sizes: Vec<f32>,
    angles: Vec<f32>,
    indices: Vec<u32>,
    next_index: u32,
}

impl PointCloud {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a point, clamping color channels to `[0, 1]` and assigning the
    /// next dense index. `z` is always 0; depth ordering is insertion order.
    pub fn push(&mut self, point: Point) {
        self.positions
            .extend_from_slice(&[point.position.x, point.position.y, 0.0]);
        self.colors
            .extend(point.color.iter().map(|c| c.clamp(0.0, 1.0)));
        self.sizes.extend_from_slice(&point.size);
        self.angles.push(point.angle);
        self.indices.push(self.next_index);
        self.next_index += 1;
    }

    /// Number of points appended so far.
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Flat positions, 3 floats per point.
    pub fn positions(&self) -> &[f32] {
        &self.positions
    }

    /// Flat colors, 4 floats per point, each in `[0, 1]`.
    pub fn colors(&self) -> &[f32] {
        &self.colors
    }

    /// Flat sizes, 2 floats per point.
    pub fn sizes(&self) -> &[f32] {
        &self.sizes
    }

    /// Rotation angles in radians, 1 per point.
    pub fn angles(&self) -> &[f32] {
        &self.angles
    }

    /// Dense per-point indices, strictly increasing from 0.
    pub fn indices(&self) -> &[u32] {
        &self.indices
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(x: f32, y: f32) -> Point {
        Point {
            position: Vec2::new(x, y),
            color: [0.5, 0.5, 0.5, 1.0],
            size: [2.0, 3.0],
            angle: 0.1,
        }
    }

    #[test]
    fn arrays_stay_index_aligned() {
        let mut cloud = PointCloud::new();
        for i in 0..100 {
            cloud.push(point(i as f32, -(i as f32)));
        }
        assert_eq!(cloud.len(), 100);
        assert_eq!(cloud.positions().len(), 300);
        assert_eq!(cloud.colors().len(), 400);
        assert_eq!(cloud.sizes().len(), 200);
        assert_eq!(cloud.angles().len(), 100);
        assert_eq!(cloud.indices().len(), 100);
    }

    #[test]
    fn indices_are_dense_from_zero() {
        let mut cloud = PointCloud::new();
        for _ in 0..1000 {
            cloud.push(point(0.0, 0.0));
        }
        for (expected, &actual) in cloud.indices().iter().enumerate() {
            assert_eq!(expected as u32, actual);
        }
    }

    #[test]
    fn colors_are_clamped_on_append() {
        let mut cloud = PointCloud::new();
        cloud.push(Point {
            position: Vec2::ZERO,
            color: [-0.5, 1.5, 0.25, 2.0],
            size: [1.0, 1.0],
            angle: 0.0,
        });
        assert_eq!(cloud.colors(), &[0.0, 1.0, 0.25, 1.0]);
    }

    #[test]
    fn z_is_always_zero() {
        let mut cloud = PointCloud::new();
        cloud.push(point(4.0, 5.0));
        assert_eq!(cloud.positions(), &[4.0, 5.0, 0.0]);
    }
}
