//! Background layer: the sky gradient, cloud streaks, and the sun glow.
use glam::Vec2;

use crate::layers::{density_scale, LayerGenerator};
use crate::math::map_range;
use crate::palette::color_similarity;
use crate::scene::GenerationContext;

/// Point budget at full horizon, scaled by the horizon fraction.
const SKY_DENSITY: f32 = 230_000.0;
/// Retry budget for the per-point color rejection loop. The gradient bases
/// lean warm enough to sit above the yellow threshold, so the loop commonly
/// runs out of attempts and keeps its final draw.
const COLOR_ATTEMPTS: usize = 10;

/// Hues rejected for sky points: too green, too yellow, too magenta.
const REJECTED_HUES: [([f32; 3], f32); 3] = [
    ([0.0, 1.0, 0.0], 0.7),
    ([1.0, 1.0, 0.0], 0.75),
    ([1.0, 0.0, 1.0], 0.7),
];

fn hue_allowed(color: &[f32; 4]) -> bool {
    let rgb = [color[0], color[1], color[2]];
    REJECTED_HUES
        .iter()
        .all(|&(hue, limit)| color_similarity(rgb, hue) <= limit)
}

pub struct SkyLayer;

impl LayerGenerator for SkyLayer {
    fn id(&self) -> &'static str {
        "sky"
    }

    fn run(&self, ctx: &mut GenerationContext) {
        let base_w = ctx.canvas.base_width;
        let base_h = ctx.canvas.base_height;
        let horizon = ctx.params.horizon;
        let wind = ctx.params.wind;
        let sun = ctx.params.sun_position;
        let sun_spread = ctx.params.sun_spread;
        let sun_rgb = ctx.params.sun_color.map(|c| c * 255.0);
        let sky = ctx.palettes.sky;

        // Whole-layer tint offset, shared by both gradient bands.
        let offset = [
            ctx.rng.uniform(-33.0, 33.0),
            ctx.rng.uniform(-33.0, 17.0),
            ctx.rng.uniform(-77.0, 5.0),
        ];

        let count = (SKY_DENSITY * horizon * density_scale(&ctx.canvas)) as usize;
        for _ in 0..count {
            let x = ctx.rng.uniform(0.0, base_w);
            let horizon_y = ctx.horizon_at(x);
            // Bias vertical placement toward the horizon.
            let y = ctx.rng.next_f32().powf(0.7) * horizon_y + ctx.rng.jitter(5.0);
            let pos = Vec2::new(x, y);

            let mut col = [0.0f32; 4];
            let mut size = [0.0f32; 2];
            let mut angle = 0.0f32;

            for _ in 0..COLOR_ATTEMPTS {
                if ctx.rng.uniform(0.0, 1000.0) > 980.0 {
                    // Wispy cloud streak, stretched along the wind.
                    let streak = sky.streak;
                    col = [
                        offset[0] + streak.base[0] + ctx.rng.jitter(streak.delta[0]),
                        offset[1] + streak.base[1] + ctx.rng.jitter(streak.delta[1]),
                        offset[2] + streak.base[2] + ctx.rng.jitter(streak.delta[2]),
                        streak.base[3] * 0.5 + ctx.rng.jitter(streak.delta[3]),
                    ];
                    size = [
                        ctx.rng.uniform(5.0, 10.0) * 1.7 * 0.35,
                        ctx.rng.uniform(5.0, 10.0) * 0.9 * 0.35,
                    ];
                    let sway = ctx.noise.sample(x * 0.01, y * 0.01);
                    angle = (-20.0 + 40.0 * sway).to_radians() + wind;
                } else if ctx.rng.next_f32() > 0.998 {
                    // Rare gray speck.
                    let gray = ctx.rng.uniform(0.0, 255.0);
                    col = [gray, gray, gray, ctx.rng.uniform(140.0, 190.0)];
                    let sway = ctx.noise.sample(x * 0.01, y * 0.01);
                    angle = (-20.0 + 40.0 * sway).to_radians() + wind * 0.15;
                    size = [
                        ctx.rng.uniform(10.0, 20.0) * 0.12,
                        ctx.rng.uniform(10.0, 20.0) * 0.12,
                    ];
                } else {
                    // Gradient band keyed on height, then tinted by the sun.
                    let stop = if ctx.rng.next_f32() < map_range(y, 0.0, base_h * horizon, 0.0, 1.0)
                    {
                        sky.upper
                    } else {
                        sky.lower
                    };
                    col = [
                        offset[0] + stop.base[0] + ctx.rng.jitter(stop.delta[0]),
                        offset[1] + stop.base[1] + ctx.rng.jitter(stop.delta[1]),
                        offset[2] + stop.base[2] + ctx.rng.jitter(stop.delta[2]),
                        stop.base[3] * 0.85 + ctx.rng.jitter(stop.delta[3]),
                    ];

                    let dx = ctx.rng.uniform(2.0, 10.0) * 0.215;
                    size = [dx, dx * (1.0 + ctx.rng.uniform(1.5, 1.8))];

                    let glow_center = Vec2::new(
                        sun.x * base_w + ctx.rng.jitter(30.0),
                        sun.y * base_h + ctx.rng.jitter(77.0),
                    );
                    let falloff = pos.distance(glow_center) / glow_center.length();
                    let dd = (falloff * sun_spread).min(1.0);

                    let sway = ctx.noise.sample(x * 0.01, y * 0.01);
                    angle = (-20.0 + 40.0 * sway).to_radians() + wind + ctx.rng.jitter(0.1);

                    col[0] = sun_rgb[0] * (1.0 - dd) * (0.5 + 0.5 * sun.y) + dd * col[0];
                    col[1] = sun_rgb[1] * (1.0 - dd) * (2.0 - sun.y) + dd * col[1];
                    col[2] = sun_rgb[2] * (1.0 - dd) * (2.0 - sun.y) + dd * col[2];
                    col[3] = 127.0;
                }

                if hue_allowed(&col) {
                    break;
                }
            }

            ctx.emit(pos, col, size, angle);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layers::test_support::small_ctx;

    #[test]
    fn emits_points_below_the_horizon_budget() {
        let mut ctx = small_ctx(42);
        SkyLayer.run(&mut ctx);

        let requested =
            (SKY_DENSITY * ctx.params.horizon * density_scale(&ctx.canvas)) as usize;
        assert!(ctx.cloud.len() > 0);
        assert!(ctx.cloud.len() <= requested);
    }

    #[test]
    fn hue_filter_flags_saturated_hues() {
        assert!(!hue_allowed(&[20.0, 220.0, 30.0, 255.0]));
        assert!(!hue_allowed(&[230.0, 230.0, 10.0, 255.0]));
        assert!(!hue_allowed(&[220.0, 10.0, 220.0, 255.0]));
        // The upper gradient base itself reads as yellow to the filter.
        assert!(!hue_allowed(&[155.0, 121.0, 122.0, 255.0]));
        // A cool teal clears all three thresholds.
        assert!(hue_allowed(&[10.0, 140.0, 190.0, 255.0]));
    }

    #[test]
    fn hue_rejection_gives_up_and_keeps_the_final_candidate() {
        let mut ctx = small_ctx(7);
        SkyLayer.run(&mut ctx);

        // The loop is bounded, not a guarantee: gradient draws rarely pass
        // the yellow check, so most points carry an exhausted-loop color and
        // none are dropped for hue.
        let disallowed = ctx
            .cloud
            .colors()
            .chunks_exact(4)
            .filter(|c| !hue_allowed(&[c[0] * 255.0, c[1] * 255.0, c[2] * 255.0, c[3] * 255.0]))
            .count();
        assert!(ctx.cloud.len() > 0);
        assert!(disallowed > ctx.cloud.len() / 2);
    }

    #[test]
    fn points_sit_above_the_horizon_band() {
        let mut ctx = small_ctx(11);
        SkyLayer.run(&mut ctx);

        // Logical y near the top of the canvas maps to positive centered y;
        // sky points live above the (inverted) horizon line minus jitter.
        let half_h = ctx.canvas.base_height / 2.0;
        let horizon_floor = ctx.canvas.base_height * ctx.params.horizon + 5.0;
        for chunk in ctx.cloud.positions().chunks_exact(3) {
            let logical_y = half_h - chunk[1];
            assert!(logical_y <= horizon_floor);
        }
    }

    #[test]
    fn is_deterministic() {
        let mut a = small_ctx(3);
        let mut b = small_ctx(3);
        SkyLayer.run(&mut a);
        SkyLayer.run(&mut b);
        assert_eq!(a.cloud.positions(), b.cloud.positions());
        assert_eq!(a.cloud.colors(), b.cloud.colors());
    }
}
