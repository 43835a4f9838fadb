//! Foreground layer: the ground plane between horizon and canvas bottom.
use glam::Vec2;

use crate::layers::{density_scale, LayerGenerator};
use crate::math::map_range;
use crate::scene::GenerationContext;

/// Point budget at an empty sky, scaled by `1 - horizon`.
const GROUND_DENSITY: f32 = 290_000.0;

pub struct GroundLayer;

impl LayerGenerator for GroundLayer {
    fn id(&self) -> &'static str {
        "ground"
    }

    fn run(&self, ctx: &mut GenerationContext) {
        let base_w = ctx.canvas.base_width;
        let base_h = ctx.canvas.base_height;
        let horizon = ctx.params.horizon;
        let wind = ctx.params.wind;
        let ground = ctx.palettes.ground;

        let patch_offset = [
            ctx.rng.uniform(-33.0, 34.0),
            ctx.rng.uniform(-5.0, 34.0),
            ctx.rng.uniform(-34.0, 14.0),
        ];
        let soil_offset = [
            ctx.rng.jitter(14.0),
            ctx.rng.jitter(14.0),
            ctx.rng.jitter(14.0),
        ];

        let count = (GROUND_DENSITY * (1.0 - horizon) * density_scale(&ctx.canvas)) as usize;
        for _ in 0..count {
            let x = ctx.rng.uniform(0.0, base_w);
            let horizon_y = ctx.horizon_at(x);
            let y = ctx.rng.uniform(horizon_y, base_h);
            let perspective = map_range(y, horizon_y, base_h, 0.6, 1.0);

            // Patch thresholds vary smoothly across the field.
            let rr1 = map_range(ctx.noise.sample(x * 0.01, y * 0.01 + 241.2141), 0.0, 1.0, 0.25, 0.5);
            let rr2 = map_range(ctx.noise.sample(x * 0.01, y * 0.01 + 33.44), 0.0, 1.0, rr1, rr1 + 0.35);
            let dispr = map_range(ctx.noise.sample(x * 0.01, y * 0.01 + 55.55), 0.0, 1.0, 0.03, 0.13);

            let yy = y + ctx.rng.jitter(5.0);
            let pos = Vec2::new(x, yy);

            let mut col = [
                soil_offset[0] + ground.soil.base[0] + ctx.rng.jitter(ground.soil.delta[0]),
                soil_offset[1] + ground.soil.base[1] + ctx.rng.jitter(ground.soil.delta[1]),
                soil_offset[2] + ground.soil.base[2] + ctx.rng.jitter(ground.soil.delta[2]),
                ground.soil.base[3] * 0.85 + ctx.rng.jitter(ground.soil.delta[3]),
            ];
            let size;
            let angle;

            if ctx.rng.next_f32() > 0.998 {
                // Rare gray speck.
                let gray = ctx.rng.uniform(0.0, 255.0);
                col = [gray, gray, gray, ctx.rng.uniform(140.0, 190.0)];
                let sway = ctx.noise.sample(x * 0.01, y * 0.01);
                angle = (-20.0 + 40.0 * sway).to_radians() + wind * 0.15;
                size = [
                    ctx.rng.uniform(10.0, 20.0) * 0.2 * perspective,
                    ctx.rng.uniform(10.0, 20.0) * 0.3 * perspective,
                ];
            } else {
                let patch = ctx.noise.sample(x * 0.004 * 0.5, yy * 0.02 * 0.5);

                let sand_gate = ctx.rng.uniform(0.0, 1000.0) > 960.0;
                if sand_gate
                    || (patch + dispr * ctx.rng.jitter(1.0) < rr1 && ctx.rng.next_f32() > 0.4)
                {
                    col = [
                        soil_offset[0] + ground.sand.base[0] + ctx.rng.jitter(ground.sand.delta[0]),
                        soil_offset[1] + ground.sand.base[1] + ctx.rng.jitter(ground.sand.delta[1]),
                        soil_offset[2] + ground.sand.base[2] + ctx.rng.jitter(ground.sand.delta[2]),
                        ctx.rng.jitter(ground.sand.delta[3]),
                    ];
                } else {
                    let violet_gate = ctx.rng.uniform(0.0, 1000.0) > 960.0;
                    if violet_gate
                        || (patch + dispr * ctx.rng.jitter(1.0) < rr2 && ctx.rng.next_f32() > 0.4)
                    {
                        col = [
                            patch_offset[0]
                                + ground.violet.base[0]
                                + ctx.rng.jitter(ground.violet.delta[0]),
                            patch_offset[1]
                                + ground.violet.base[1]
                                + ctx.rng.jitter(ground.violet.delta[1]),
                            patch_offset[2]
                                + ground.violet.base[2]
                                + ctx.rng.jitter(ground.violet.delta[2]),
                            ground.violet.base[3] + ctx.rng.jitter(ground.violet.delta[3]),
                        ];
                    }
                }

                let dx = ctx.rng.uniform(5.0, 10.0) * 0.25 * perspective;
                size = [dx, dx * (1.0 + ctx.rng.uniform(1.5, 1.8))];
                let sway = ctx.noise.sample(x * 0.01, y * 0.01);
                angle = (-20.0 + 40.0 * sway).to_radians() + wind * 0.15 + ctx.rng.jitter(0.1);
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
    fn emits_points_below_budget() {
        let mut ctx = small_ctx(42);
        GroundLayer.run(&mut ctx);

        let requested =
            (GROUND_DENSITY * (1.0 - ctx.params.horizon) * density_scale(&ctx.canvas)) as usize;
        assert!(ctx.cloud.len() > 0);
        assert!(ctx.cloud.len() <= requested);
    }

    #[test]
    fn points_sit_below_the_horizon_curve() {
        let mut ctx = small_ctx(5);
        GroundLayer.run(&mut ctx);

        // Vertical placement draws from [horizon_at(x), base_h] with +-5 jitter.
        let half_w = ctx.canvas.base_width / 2.0;
        let half_h = ctx.canvas.base_height / 2.0;
        let positions = ctx.cloud.positions().to_vec();
        for chunk in positions.chunks_exact(3) {
            let logical_x = chunk[0] + half_w;
            let logical_y = half_h - chunk[1];
            assert!(logical_y >= ctx.horizon_at(logical_x) - 5.0 - 1e-3);
        }
    }

    #[test]
    fn is_deterministic() {
        let mut a = small_ctx(13);
        let mut b = small_ctx(13);
        GroundLayer.run(&mut a);
        GroundLayer.run(&mut b);
        assert_eq!(a.cloud.positions(), b.cloud.positions());
        assert_eq!(a.cloud.colors(), b.cloud.colors());
    }

    #[test]
    fn some_points_are_fully_transparent_sand() {
        let mut ctx = small_ctx(17);
        GroundLayer.run(&mut ctx);

        let transparent = ctx
            .cloud
            .colors()
            .chunks_exact(4)
            .filter(|c| c[3] == 0.0)
            .count();
        assert!(transparent > 0);
    }
}
