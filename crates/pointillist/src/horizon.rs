//! The horizon curve separating sky from ground.
//!
//! Every layer treats `horizon_at` as its placement boundary, so the curve
//! must be continuous and stay inside the logical canvas.
use crate::math::power;
use crate::noise::ValueNoise;

const HORIZON_NOISE_FREQ: f32 = 0.003;

/// Y-coordinate of the ground/sky boundary at logical `x`, in canvas units
/// with y growing downward.
///
/// A constant offset from the `horizon` fraction plus a power-shaped noise
/// dip, clamped to `[0, base_height]`.
pub fn horizon_at(noise: &ValueNoise, horizon: f32, base_height: f32, x: f32) -> f32 {
    let dip = -0.5 * power(noise.sample(x * HORIZON_NOISE_FREQ, 0.0), 2.0);
    let y = base_height * horizon + (1.0 - horizon * 0.8) * 0.6 * base_height * dip;
    y.clamp(0.0, base_height)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stays_inside_canvas() {
        let noise = ValueNoise::new(42);
        for horizon in [0.24, 0.5, 0.93] {
            for i in 0..=967 {
                let y = horizon_at(&noise, horizon, 967.0, i as f32);
                assert!((0.0..=967.0).contains(&y), "horizon({i}) = {y}");
            }
        }
    }

    #[test]
    fn is_continuous_at_fine_steps() {
        let noise = ValueNoise::new(7);
        let base_height = 967.0;
        let mut prev = horizon_at(&noise, 0.6, base_height, 0.0);
        for i in 1..=96_700 {
            let x = i as f32 * 0.01;
            let y = horizon_at(&noise, 0.6, base_height, x);
            assert!((y - prev).abs() < 1.0, "jump at x = {x}");
            prev = y;
        }
    }

    #[test]
    fn sits_at_or_below_the_horizon_fraction() {
        // The noise dip only ever pulls the boundary upward (smaller y).
        let noise = ValueNoise::new(3);
        for i in 0..1000 {
            let y = horizon_at(&noise, 0.7, 967.0, i as f32);
            assert!(y <= 0.7 * 967.0 + 1e-3);
        }
    }
}
