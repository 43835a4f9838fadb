//! Scene parameter selection.
//!
//! All whole-scene constants are derived here, once, before any layer runs.
//! Order matters: the draws below consume the scene RNG stream in a fixed
//! sequence, which is part of the reproducibility contract.
use glam::Vec2;
use tracing::warn;

use crate::canvas::CanvasGeometry;
use crate::horizon::horizon_at;
use crate::noise::ValueNoise;
use crate::palette::{color_similarity, hsv_to_rgb};
use crate::rng::Lcg;

/// Retry budget for background-hue rejection sampling. The HSV ranges are
/// chosen so rejection succeeds almost immediately; the bound exists so a
/// misconfigured range degrades to "keep last candidate" instead of spinning.
pub const MAX_COLOR_REJECTS: usize = 1000;

const GREEN: [f32; 3] = [0.0, 1.0, 0.0];
const GREEN_SIMILARITY_LIMIT: f32 = 0.5;

/// Per-generation uniforms for the post-processing pass.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PostProcessSeeds {
    pub seed1: f32,
    pub seed2: f32,
    pub seed3: f32,
}

/// Whole-scene constants, computed once per generation and immutable after.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SceneParams {
    /// Horizon height as a fraction of canvas height.
    pub horizon: f32,
    /// Sun position as fractions of the logical plane.
    pub sun_position: Vec2,
    /// Sun RGB in `[0, 1]`.
    pub sun_color: [f32; 3],
    /// Falloff factor for the sun glow.
    pub sun_spread: f32,
    /// Background RGB in `[0, 1]`.
    pub background: [f32; 3],
    /// Wind angle in radians; bimodal around 0 and pi.
    pub wind: f32,
    /// Seeds handed to the post-process shader.
    pub post_seeds: PostProcessSeeds,
}

impl SceneParams {
    /// Draw all scene parameters from the RNG stream.
    pub fn select(rng: &mut Lcg, noise: &ValueNoise, canvas: &CanvasGeometry) -> Self {
        let horizon = rng.uniform(0.24, 0.93);
        let sun_x = rng.uniform(0.05, 0.95);

        let mut wind = rng.uniform(-0.4, 0.4);
        if rng.next_f32() < 0.5 {
            wind += std::f32::consts::PI;
        }

        // The sun sits near, not exactly on, the horizon line.
        let sun_y = horizon_at(noise, horizon, canvas.base_height, sun_x * canvas.base_width)
            / canvas.base_height
            + rng.uniform(0.0, 0.1);
        let sun_position = Vec2::new(sun_x, sun_y);
        let sun_spread = 1.85;

        let background = select_background(rng, horizon, sun_y);
        let sun_color = hsv_to_rgb(
            rng.uniform(0.0, 0.026),
            rng.uniform(0.9, 0.99),
            rng.uniform(0.8, 1.0),
        );

        let post_seeds = PostProcessSeeds {
            seed1: rng.uniform(0.45, 1.65),
            seed2: rng.uniform(0.5, 1.5),
            seed3: rng.uniform(0.5, 1.5),
        };

        Self {
            horizon,
            sun_position,
            sun_color,
            sun_spread,
            background,
            wind,
            post_seeds,
        }
    }
}

/// Pick a background color, rejecting hues too close to pure green.
fn select_background(rng: &mut Lcg, horizon: f32, sun_y: f32) -> [f32; 3] {
    let h = rng.uniform(0.5, 0.9);
    let mut s = rng.uniform(0.2, 0.56);
    if h > 0.5 {
        s = rng.uniform(0.2, 0.26);
    }
    let mut v = rng.uniform(0.25, 0.35);
    if sun_y > horizon {
        v = rng.uniform(0.2, 0.56);
    }
    let mut background = hsv_to_rgb(h, s, v);

    let mut rejects = 0;
    while color_similarity(background, GREEN) > GREEN_SIMILARITY_LIMIT {
        if rejects >= MAX_COLOR_REJECTS {
            warn!("Background rejection budget exhausted; keeping last candidate.");
            break;
        }
        rejects += 1;
        let h = (rng.next_f32() * 0.5).powi(2);
        let s = rng.uniform(0.2, 0.36);
        let v = rng.uniform(0.35, 0.55);
        background = hsv_to_rgb(h, s, v);
    }

    background
}
