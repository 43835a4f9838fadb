//! Generation entry point and the context threaded through every layer.
//!
//! One call to [`generate`] turns a seed into an immutable [`Scene`]. All
//! mutable state lives in a [`GenerationContext`] owned by the entry point
//! and passed by reference through the layer generators, so a generation can
//! never observe another generation's state.
use glam::Vec2;
use tracing::{debug, info};

use crate::canvas::CanvasGeometry;
use crate::cloud::{Point, PointCloud};
use crate::error::{Error, Result};
use crate::horizon::horizon_at;
use crate::layers::{GroundLayer, LayerGenerator, SkyLayer, TreeLayer};
use crate::noise::ValueNoise;
use crate::palette::{PaletteSource, Palettes};
use crate::params::SceneParams;
use crate::rng::Lcg;

const NOISE_SEED_RANGE: f32 = 100_000.0;

/// Configuration for one generation run.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GeneratorConfig {
    /// Seed driving every placement decision.
    pub seed: u32,
    /// Target logical resolution; the reference behavior is square.
    pub resolution: u32,
    /// Current viewport size in device units.
    pub viewport: Vec2,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            resolution: 1000,
            viewport: Vec2::new(1000.0, 1000.0),
        }
    }
}

impl GeneratorConfig {
    /// Creates a config for `seed` with the default resolution and viewport.
    pub fn new(seed: u32) -> Self {
        Self {
            seed,
            ..Default::default()
        }
    }

    /// Sets the target logical resolution.
    pub fn with_resolution(mut self, resolution: u32) -> Self {
        self.resolution = resolution;
        self
    }

    /// Sets the viewport size.
    pub fn with_viewport(mut self, viewport: Vec2) -> Self {
        self.viewport = viewport;
        self
    }

    /// Validates the configuration, returning an error if invalid.
    pub fn validate(&self) -> Result<()> {
        if self.resolution <= 33 {
            return Err(Error::InvalidConfig(
                "resolution must exceed the 33-unit frame inset".into(),
            ));
        }
        if self.viewport.x <= 0.0 || self.viewport.y <= 0.0 {
            return Err(Error::InvalidConfig(
                "viewport must be > 0 in both components".into(),
            ));
        }
        Ok(())
    }
}

/// All state a layer generator may read or append to.
pub struct GenerationContext {
    pub rng: Lcg,
    pub noise: ValueNoise,
    pub params: SceneParams,
    pub palettes: Palettes,
    pub canvas: CanvasGeometry,
    pub cloud: PointCloud,
}

impl GenerationContext {
    /// Seed the RNG, build the noise field (explicit two-phase construction),
    /// and select scene parameters. Layers run against the result.
    pub fn new(config: &GeneratorConfig, palette: Option<&dyn PaletteSource>) -> Result<Self> {
        config.validate()?;

        let mut rng = Lcg::new(config.seed);
        let noise_seed = rng.uniform(0.0, NOISE_SEED_RANGE) as u32;
        let noise = ValueNoise::new(noise_seed);
        debug!("Noise lattice seeded with {noise_seed}.");

        let canvas = CanvasGeometry::new(config.resolution, config.viewport);
        let params = SceneParams::select(&mut rng, &noise, &canvas);

        let mut palettes = Palettes::default();
        if let Some(source) = palette {
            palettes.recolor_from(source, &mut rng);
        }

        Ok(Self {
            rng,
            noise,
            params,
            palettes,
            canvas,
            cloud: PointCloud::new(),
        })
    }

    /// Horizon boundary at logical `x`.
    #[inline]
    pub fn horizon_at(&self, x: f32) -> f32 {
        horizon_at(
            &self.noise,
            self.params.horizon,
            self.canvas.base_height,
            x,
        )
    }

    /// Append a point given in logical coordinates and 0-255 color scale.
    ///
    /// Out-of-canvas positions are silently dropped, never retried; kept
    /// points are translated to the center-origin frame and their colors
    /// normalized. Returns whether the point was kept.
    pub fn emit(&mut self, position: Vec2, color255: [f32; 4], size: [f32; 2], angle: f32) -> bool {
        if !self.canvas.contains(position) {
            return false;
        }
        self.cloud.push(Point {
            position: self.canvas.to_centered(position),
            color: color255.map(|c| c / 255.0),
            size,
            angle,
        });
        true
    }
}

/// Points emitted by a single layer, for diagnostics and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayerStats {
    pub id: &'static str,
    pub points: usize,
}

/// An immutable generated scene: the accumulated point cloud plus the scene
/// scalars the render adapter needs.
#[derive(Debug, Clone)]
pub struct Scene {
    params: SceneParams,
    canvas: CanvasGeometry,
    cloud: PointCloud,
    layer_stats: Vec<LayerStats>,
}

impl Scene {
    pub fn params(&self) -> &SceneParams {
        &self.params
    }

    pub fn canvas(&self) -> &CanvasGeometry {
        &self.canvas
    }

    pub fn cloud(&self) -> &PointCloud {
        &self.cloud
    }

    /// Per-layer point counts in generation order.
    pub fn layer_stats(&self) -> &[LayerStats] {
        &self.layer_stats
    }

    /// Total number of points across all layers.
    pub fn len(&self) -> usize {
        self.cloud.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cloud.is_empty()
    }

    /// Rescale the camera frustum for a new viewport. The only supported
    /// post-generation mutation; point data is never touched.
    pub fn resize_viewport(&mut self, viewport: Vec2) {
        self.canvas.resize_viewport(viewport);
    }
}

/// Run one full generation for `config`, with the default palettes.
pub fn generate(config: &GeneratorConfig) -> Result<Scene> {
    generate_with_palette(config, None)
}

/// Run one full generation, optionally recoloring the palette tables from a
/// reference image before any layer runs.
pub fn generate_with_palette(
    config: &GeneratorConfig,
    palette: Option<&dyn PaletteSource>,
) -> Result<Scene> {
    let mut ctx = GenerationContext::new(config, palette)?;
    info!(
        seed = config.seed,
        horizon = ctx.params.horizon,
        "Generating scene."
    );

    let layers: [&dyn LayerGenerator; 3] = [&SkyLayer, &GroundLayer, &TreeLayer];
    let mut layer_stats = Vec::with_capacity(layers.len());
    for layer in layers {
        let before = ctx.cloud.len();
        layer.run(&mut ctx);
        let points = ctx.cloud.len() - before;
        info!("Layer '{}': {} points.", layer.id(), points);
        layer_stats.push(LayerStats {
            id: layer.id(),
            points,
        });
    }

    Ok(Scene {
        params: ctx.params,
        canvas: ctx.canvas,
        cloud: ctx.cloud,
        layer_stats,
    })
}
