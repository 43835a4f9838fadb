//! Small remapping helpers shared by the parameter selector and layers.

/// S-shaped remapping of `p` in `[0, 1]` biasing samples toward 0 or 1.
///
/// For `p < 0.5` this is `0.5 * (2p)^g`, otherwise `1 - 0.5 * (2(1 - p))^g`.
/// With `g > 1` values pile up near the extremes; `g = 1` is the identity.
#[inline]
pub fn power(p: f32, g: f32) -> f32 {
    if p < 0.5 {
        0.5 * (2.0 * p).powf(g)
    } else {
        1.0 - 0.5 * (2.0 * (1.0 - p)).powf(g)
    }
}

/// Linear remap of `x` from `[a, b]` to `[c, d]`, unclamped.
#[inline]
pub fn map_range(x: f32, a: f32, b: f32, c: f32, d: f32) -> f32 {
    (x - a) / (b - a) * (d - c) + c
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn power_fixes_endpoints_and_midpoint() {
        for g in [0.5, 1.0, 2.0, 12.0] {
            assert!((power(0.0, g) - 0.0).abs() < 1e-6);
            assert!((power(0.5, g) - 0.5).abs() < 1e-6);
            assert!((power(1.0, g) - 1.0).abs() < 1e-6);
        }
    }

    #[test]
    fn power_with_gamma_above_one_biases_toward_extremes() {
        assert!(power(0.25, 3.0) < 0.25);
        assert!(power(0.75, 3.0) > 0.75);
    }

    #[test]
    fn power_with_gamma_one_is_identity() {
        for i in 0..=10 {
            let p = i as f32 / 10.0;
            assert!((power(p, 1.0) - p).abs() < 1e-6);
        }
    }

    #[test]
    fn map_range_remaps_linearly() {
        assert!((map_range(5.0, 0.0, 10.0, 0.0, 1.0) - 0.5).abs() < 1e-6);
        assert!((map_range(0.0, -1.0, 1.0, 10.0, 20.0) - 15.0).abs() < 1e-6);
        // Unclamped outside the source interval.
        assert!((map_range(20.0, 0.0, 10.0, 0.0, 1.0) - 2.0).abs() < 1e-6);
    }
}
