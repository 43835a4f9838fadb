//! Tree layer: trunk/canopy silhouettes scattered over the ground plane.
use glam::Vec2;

use crate::layers::LayerGenerator;
use crate::math::{map_range, power};
use crate::scene::GenerationContext;

/// Probability of the dense, middle-excluding forest over the sparse clump.
const DENSE_FOREST_PROBABILITY: f32 = 0.5;
/// Retry budget when rejecting anchors out of the bare central strip.
const MAX_ANCHOR_REJECTS: usize = 100;
/// Horizontal sway amplitude of the canopy, in canvas units.
const SWAY_AMPLITUDE: f32 = 133.0;
/// Frequency of the per-tree sway noise.
const SWAY_FREQ: f32 = 0.0002;
/// Half-width of a full-grown tree band before the root taper.
const MAX_HALF_WIDTH: f32 = 20.0;
/// Range of the per-tree noise decorrelation seed.
const TREE_SEED_RANGE: f32 = 100_000.0;

pub struct TreeLayer;

impl LayerGenerator for TreeLayer {
    fn id(&self) -> &'static str {
        "trees"
    }

    fn run(&self, ctx: &mut GenerationContext) {
        let base_w = ctx.canvas.base_width;
        let base_h = ctx.canvas.base_height;
        let sun = ctx.params.sun_position;

        // Lit palettes apply when the sun clears the horizon band.
        let sun_horizon = ctx.horizon_at(sun.x * base_w);
        let sun_high = sun.y * base_h > base_h * 0.15 + sun_horizon;

        if ctx.rng.next_f32() < DENSE_FOREST_PROBABILITY {
            // Dense forest with a bare central strip.
            let bare_spread = ctx.rng.uniform(0.1, 0.3);
            let count = ((1.0 - bare_spread) * ctx.rng.uniform(122.0, 128.0)) as usize;
            let middle = ctx.rng.uniform(0.4, 0.6);

            for k in 0..count {
                let mut rx = ctx.rng.next_f32();
                let mut rejects = 0;
                while rx > middle - bare_spread && rx < middle + bare_spread {
                    if rejects >= MAX_ANCHOR_REJECTS {
                        break;
                    }
                    rejects += 1;
                    rx = ctx.rng.next_f32();
                }

                let depth = map_range(k as f32, 0.0, count as f32, 0.03, 1.0).powf(12.0);
                let x = rx * base_w;
                let horizon_y = ctx.horizon_at(x);
                let y = map_range(depth, 0.0, 1.0, horizon_y, base_h);
                draw_tree(ctx, Vec2::new(x, y), sun_high);
            }
        } else {
            // Sparse clump scattered around the canvas middle.
            let count = ctx.rng.uniform(50.0, 200.0).floor() as usize;
            let spread = ctx.rng.uniform(0.38, 0.5);

            for k in 0..count {
                let depth = map_range(k as f32, 0.0, count as f32, 0.03, 1.0).powf(12.0);
                let rx = 0.5 + ctx.rng.jitter(spread);
                let x = rx * base_w;
                let horizon_y = ctx.horizon_at(x);
                let y = map_range(depth, 0.0, 1.0, horizon_y, base_h);
                draw_tree(ctx, Vec2::new(x, y), sun_high);
            }
        }
    }
}

/// Scan upward from the anchor, scattering a narrowing band of points per
/// step. The anchor's depth drives perspective scale, step size, and fade.
fn draw_tree(ctx: &mut GenerationContext, anchor: Vec2, sun_high: bool) {
    let base_h = ctx.canvas.base_height;
    let horizon = ctx.params.horizon;
    let tree = ctx.palettes.tree;
    let (rx, ry) = (anchor.x, anchor.y);

    let anchor_horizon = ctx.horizon_at(rx);
    let perspective = map_range(ry, anchor_horizon, base_h, 0.5, 0.8);
    let density_falloff = map_range(ry, anchor_horizon, base_h, 0.1, 0.6);
    // Distant trees do not sway; near ones do.
    let sway_gate = if map_range(ry, 0.0, base_h, 0.0, 1.0) < 0.25 {
        0.0
    } else {
        1.0
    };

    let tree_seed = ctx.rng.uniform(0.0, TREE_SEED_RANGE);
    let detail = ctx.rng.uniform(5.0, 8.0) * 0.45;
    let point_scale = map_range(ry, anchor_horizon, base_h, 0.1, 1.0);
    let fade = map_range(ry, base_h * horizon, base_h, 0.88, 1.0);
    let start_root = ctx.rng.uniform(0.92, 0.95);
    let root_max = ctx.rng.uniform(0.9, 2.2);
    let tint = [
        ctx.rng.uniform(-25.0, 9.0),
        ctx.rng.uniform(-15.0, 14.0),
        ctx.rng.uniform(-25.0, 9.0),
    ];

    let step_y = detail * perspective;
    let step_x = (4.0 * perspective).max(1.0);
    let vertical_shade = map_range(ry, base_h * horizon, base_h, -0.2, 0.2);

    let mut y = ry;
    while y > 0.0 {
        // Root taper: the band widens toward the tree base.
        let root = map_range(y, ry, ry * start_root, 1.0, 0.0).clamp(0.0, 1.0);
        let band = point_scale * MAX_HALF_WIDTH * (1.0 + root_max * root.powi(4));

        let mut x = rx - band;
        while x < rx + band {
            let rise = map_range(y, ry, 0.0, 0.0, 1.0);
            let sway = sway_gate
                * rise
                * SWAY_AMPLITUDE
                * (-0.5 + power(ctx.noise.sample3(rx * SWAY_FREQ, y * SWAY_FREQ, tree_seed), 2.0));
            let scatter = ctx.rng.jitter(detail) * 1.7 * (0.4 + 0.6 * (1.0 - density_falloff).powi(4));
            let xx = x + sway + scatter;
            let yy = y
                + ctx.rng.jitter(detail) * 1.9
                + 40.0 * ctx.noise.sample(x * 0.04, y * 0.04).powi(4) * root;

            let canopy = ctx.noise.sample(xx * 0.05, yy * 0.004) + vertical_shade
                < 0.05 + ctx.rng.jitter(0.4) + y / base_h;

            let stop = if sun_high {
                tree.lit
            } else if canopy {
                tree.shade
            } else {
                tree.trunk
            };
            // Sunlit foliage dims its red channel slightly.
            let red_scale = if sun_high { 0.8 } else { 1.0 };
            let mut col = [
                tint[0] + fade * stop.base[0] * red_scale + ctx.rng.jitter(stop.delta[0]),
                tint[1] + fade * stop.base[1] + ctx.rng.jitter(stop.delta[1]),
                tint[2] + fade * stop.base[2] + ctx.rng.jitter(stop.delta[2]),
                stop.base[3] + ctx.rng.jitter(stop.delta[3]),
            ];

            let angle = ctx.rng.uniform(-16.0, 16.0).to_radians();
            let size;
            if ctx.rng.next_f32() > 0.97 {
                // White speck; zero-sized when it would poke out of the band.
                let gray = ctx.rng.uniform(110.0, 255.0);
                col = [gray, gray, gray, ctx.rng.uniform(0.0, 88.0)];
                let speck_reach = 10.0 * point_scale * ctx.rng.uniform(0.9, 1.1);
                if xx - speck_reach > rx - band && xx + speck_reach < rx + band {
                    size = [5.0, 5.0];
                } else {
                    size = [0.0, 0.0];
                }
            } else {
                size = [
                    5.15 * ctx.rng.uniform(0.8, 1.2) * perspective,
                    5.0 * ctx.rng.uniform(0.9, 1.1) * perspective,
                ];
            }

            ctx.emit(Vec2::new(xx, yy), col, size, angle);
            x += step_x;
        }
        y -= step_y;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layers::test_support::small_ctx;

    #[test]
    fn emits_points() {
        let mut ctx = small_ctx(42);
        TreeLayer.run(&mut ctx);
        assert!(ctx.cloud.len() > 0);
    }

    #[test]
    fn is_deterministic() {
        let mut a = small_ctx(23);
        let mut b = small_ctx(23);
        TreeLayer.run(&mut a);
        TreeLayer.run(&mut b);
        assert_eq!(a.cloud.positions(), b.cloud.positions());
        assert_eq!(a.cloud.colors(), b.cloud.colors());
        assert_eq!(a.cloud.sizes(), b.cloud.sizes());
    }

    #[test]
    fn both_forest_modes_appear_across_seeds() {
        // Mode choice is the first draw of the layer; count how often each
        // side of the gate is taken over many generations.
        let mut dense = 0;
        let mut sparse = 0;
        for seed in 0..100 {
            let mut ctx = small_ctx(seed);
            if ctx.rng.next_f32() < DENSE_FOREST_PROBABILITY {
                dense += 1;
            } else {
                sparse += 1;
            }
        }
        assert!(dense > 10);
        assert!(sparse > 10);
    }

    #[test]
    fn single_tree_points_cluster_around_anchor_column() {
        let mut ctx = small_ctx(31);
        let base_w = ctx.canvas.base_width;
        let base_h = ctx.canvas.base_height;
        let anchor = Vec2::new(base_w * 0.5, base_h * 0.9);
        draw_tree(&mut ctx, anchor, false);

        assert!(ctx.cloud.len() > 0);
        let half_w = base_w / 2.0;
        let reach = MAX_HALF_WIDTH * (1.0 + 2.2) + SWAY_AMPLITUDE + 8.0 * 0.45 * 1.7;
        for chunk in ctx.cloud.positions().chunks_exact(3) {
            let logical_x = chunk[0] + half_w;
            assert!((logical_x - anchor.x).abs() <= reach + 1.0);
        }
    }
}
