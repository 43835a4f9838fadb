//! Layer generators: the three point-emitting passes over the canvas.
//!
//! Layers run in a fixed order (sky, ground, trees), each appending to the
//! shared accumulator through [`GenerationContext::emit`]. Placement never
//! retries geometry: candidates falling outside the canvas are dropped, so a
//! layer's emitted count is at most its requested count.
//!
//! [`GenerationContext::emit`]: crate::scene::GenerationContext::emit
use crate::scene::GenerationContext;

pub mod ground;
pub mod sky;
pub mod trees;

pub use ground::GroundLayer;
pub use sky::SkyLayer;
pub use trees::TreeLayer;

/// A single point-generating pass.
pub trait LayerGenerator {
    fn id(&self) -> &'static str;
    fn run(&self, ctx: &mut GenerationContext);
}

/// Side length of the logical plane the density constants were tuned for
/// (target resolution 1000 minus the frame inset).
const REFERENCE_PLANE: f32 = 967.0;

/// Scale factor applied to layer point budgets so density per canvas area
/// matches the reference plane at any target resolution.
pub(crate) fn density_scale(canvas: &crate::canvas::CanvasGeometry) -> f32 {
    (canvas.base_width * canvas.base_height) / (REFERENCE_PLANE * REFERENCE_PLANE)
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::scene::{GenerationContext, GeneratorConfig};

    /// Context at a reduced resolution so per-layer tests stay fast.
    pub fn small_ctx(seed: u32) -> GenerationContext {
        let config = GeneratorConfig::new(seed).with_resolution(300);
        GenerationContext::new(&config, None).expect("test context")
    }
}
