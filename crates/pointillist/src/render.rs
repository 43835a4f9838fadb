//! Render adapter boundary.
//!
//! The generator ends at [`RenderFrame`]: index-aligned attribute arrays plus
//! the handful of scene scalars a renderer needs for an orthographic
//! point-sprite pass and the post-process stage. Nothing else crosses the
//! boundary; camera setup, sprite shaping, and the blur/tone kernel are the
//! adapter's business.
use mint::Vector2;

use crate::error::Result;
use crate::params::PostProcessSeeds;
use crate::scene::Scene;

/// Borrowed view of one generated scene, ready for upload.
#[non_exhaustive]
#[derive(Debug, Clone, Copy)]
pub struct RenderFrame<'a> {
    /// Positions, 3 floats per point, centered origin, z = 0.
    pub positions: &'a [f32],
    /// Colors, 4 floats per point, each in `[0, 1]`.
    pub colors: &'a [f32],
    /// Sizes, 2 floats per point.
    pub sizes: &'a [f32],
    /// Rotations in radians, 1 per point.
    pub angles: &'a [f32],
    /// Dense per-point indices for deterministic per-point shader effects.
    pub indices: &'a [u32],
    /// Clear color, RGB in `[0, 1]`.
    pub background: [f32; 3],
    /// Logical plane the projection should frame.
    pub base_size: Vector2<f32>,
    /// Device render-target size.
    pub canvas_size: Vector2<f32>,
    /// Ratio between device canvas and target resolution.
    pub win_scale: f32,
    /// Per-generation uniforms for the post-process pass.
    pub post_seeds: PostProcessSeeds,
}

impl Scene {
    /// Assemble the render-adapter view of this scene.
    pub fn frame(&self) -> RenderFrame<'_> {
        let cloud = self.cloud();
        let canvas = self.canvas();
        RenderFrame {
            positions: cloud.positions(),
            colors: cloud.colors(),
            sizes: cloud.sizes(),
            angles: cloud.angles(),
            indices: cloud.indices(),
            background: self.params().background,
            base_size: Vector2 {
                x: canvas.base_width,
                y: canvas.base_height,
            },
            canvas_size: Vector2 {
                x: canvas.canvas_width,
                y: canvas.canvas_height,
            },
            win_scale: canvas.win_scale,
            post_seeds: self.params().post_seeds,
        }
    }
}

/// Consumer of generated frames.
pub trait RenderAdapter {
    fn present(&mut self, frame: &RenderFrame<'_>) -> Result<()>;
}
