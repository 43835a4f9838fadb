//! Canvas geometry: the logical drawing plane and the device render target.
//!
//! The logical plane is fixed at generation time from a target resolution;
//! the device canvas follows the viewport and may be resized afterward
//! without touching generated content.
use glam::Vec2;

/// Border inset between the target resolution and the logical plane.
const FRAME_INSET: f32 = 33.0;

/// Logical and device dimensions for one generation.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CanvasGeometry {
    /// Target resolution the scene was generated for.
    pub resolution: f32,
    /// Logical plane width; placement happens in `[0, base_width]`.
    pub base_width: f32,
    /// Logical plane height; placement happens in `[0, base_height]`.
    pub base_height: f32,
    /// Device render-target width.
    pub canvas_width: f32,
    /// Device render-target height.
    pub canvas_height: f32,
    /// Ratio between device canvas and target resolution.
    pub win_scale: f32,
}

impl CanvasGeometry {
    pub fn new(resolution: u32, viewport: Vec2) -> Self {
        let resolution = resolution as f32;
        let base = resolution - FRAME_INSET;
        let mut geometry = Self {
            resolution,
            base_width: base,
            base_height: base,
            canvas_width: 0.0,
            canvas_height: 0.0,
            win_scale: 0.0,
        };
        geometry.resize_viewport(viewport);
        geometry
    }

    /// Recompute the device canvas for a new viewport. Only the render-target
    /// fields change; the logical plane is immutable after generation.
    pub fn resize_viewport(&mut self, viewport: Vec2) {
        let m = viewport.x.min(viewport.y);
        let canvas = m - FRAME_INSET * m / self.resolution;
        self.canvas_width = canvas;
        self.canvas_height = canvas;
        self.win_scale = self.canvas_width / self.resolution;
    }

    /// True when `p` lies on the logical plane.
    #[inline]
    pub fn contains(&self, p: Vec2) -> bool {
        (0.0..=self.base_width).contains(&p.x) && (0.0..=self.base_height).contains(&p.y)
    }

    /// Translate a logical position to the center-origin frame handed to the
    /// render adapter, flipping y so logical "up" is positive.
    #[inline]
    pub fn to_centered(&self, p: Vec2) -> Vec2 {
        Vec2::new(p.x - self.base_width / 2.0, -(p.y - self.base_height / 2.0))
    }
}
