#![forbid(unsafe_code)]
//! pointillist: Deterministic procedural landscape scenes as point clouds.
//!
//! Modules:
//! - rng, noise, math: the seeded draw chain (LCG, lattice value noise, remaps)
//! - params, palette, horizon, canvas: per-scene parameter and color selection
//! - layers: the sky, ground, and tree passes emitting into the point cloud
//! - scene, cloud, render: generation entry point, accumulator, adapter boundary
//!
//! One call to [`scene::generate`] turns a seed into a [`scene::Scene`]; the
//! same seed always yields the same scene.
pub mod canvas;
pub mod cloud;
pub mod error;
pub mod horizon;
pub mod layers;
pub mod math;
pub mod noise;
pub mod palette;
pub mod params;
pub mod render;
pub mod rng;
pub mod scene;

/// Convenient re-exports for common types. Import with `use pointillist::prelude::*;`.
pub mod prelude {
    pub use crate::canvas::CanvasGeometry;
    pub use crate::cloud::{Point, PointCloud};
    pub use crate::error::{Error, Result};
    pub use crate::layers::{GroundLayer, LayerGenerator, SkyLayer, TreeLayer};
    pub use crate::noise::ValueNoise;
    pub use crate::palette::{PaletteSource, Palettes};
    pub use crate::params::{PostProcessSeeds, SceneParams};
    pub use crate::render::{RenderAdapter, RenderFrame};
    pub use crate::rng::Lcg;
    pub use crate::scene::{
        generate, generate_with_palette, GenerationContext, GeneratorConfig, LayerStats, Scene,
    };
}
