//! Color-stop tables, color conversions, and the palette-image sampler.
//!
//! Each layer owns a small table of color stops in 0-255 scale; a color is
//! sampled as `base ± uniform(0, delta)` per channel. The tuned literals are
//! kept here as one block of configuration so placement logic never needs to
//! change when the palette does.
use crate::rng::Lcg;

/// A `base ± delta` RGBA stop in 0-255 scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorStop {
    pub base: [f32; 4],
    pub delta: [f32; 4],
}

impl ColorStop {
    pub const fn new(base: [f32; 4], delta: [f32; 4]) -> Self {
        Self { base, delta }
    }

    /// Draw an RGBA color, jittering each channel independently.
    pub fn sample(&self, rng: &mut Lcg) -> [f32; 4] {
        [
            self.base[0] + rng.jitter(self.delta[0]),
            self.base[1] + rng.jitter(self.delta[1]),
            self.base[2] + rng.jitter(self.delta[2]),
            self.base[3] + rng.jitter(self.delta[3]),
        ]
    }
}

/// Sky layer stops.
#[derive(Debug, Clone, Copy)]
pub struct SkyPalette {
    /// Upper gradient band.
    pub upper: ColorStop,
    /// Wispy cloud streaks.
    pub streak: ColorStop,
    /// Lower gradient band, toward the horizon.
    pub lower: ColorStop,
}

/// Tree layer stops.
#[derive(Debug, Clone, Copy)]
pub struct TreePalette {
    /// Sunlit foliage and trunk.
    pub lit: ColorStop,
    /// Bright accent, reserved.
    pub bright: ColorStop,
    /// Trunk in shadow.
    pub trunk: ColorStop,
    /// Translucent haze, reserved.
    pub haze: ColorStop,
    /// Canopy in shadow.
    pub shade: ColorStop,
}

/// Ground layer stops.
#[derive(Debug, Clone, Copy)]
pub struct GroundPalette {
    /// Dominant soil tone.
    pub soil: ColorStop,
    /// Cool violet patches.
    pub violet: ColorStop,
    /// Sandy patches (emitted fully transparent).
    pub sand: ColorStop,
}

/// All per-layer color tables for one generation.
#[derive(Debug, Clone, Copy)]
pub struct Palettes {
    pub sky: SkyPalette,
    pub tree: TreePalette,
    pub ground: GroundPalette,
}

impl Default for Palettes {
    fn default() -> Self {
        Self {
            sky: SkyPalette {
                upper: ColorStop::new([155.0, 121.0, 122.0, 255.0], [88.0, 22.0, 22.0, 0.0]),
                streak: ColorStop::new([88.0, 77.0, 83.0, 88.0], [11.0, 55.0, 17.0, 88.0]),
                lower: ColorStop::new([130.0, 85.0, 62.0, 255.0], [39.0, 25.0, 22.0, 0.0]),
            },
            tree: TreePalette {
                lit: ColorStop::new([154.0, 82.0, 70.0, 255.0], [39.0, 25.0, 22.0, 0.0]),
                bright: ColorStop::new([191.0, 95.0, 80.0, 255.0], [39.0, 25.0, 22.0, 0.0]),
                trunk: ColorStop::new([183.0, 82.0, 70.0, 188.0], [39.0, 25.0, 22.0, 33.0]),
                haze: ColorStop::new([88.0, 77.0, 83.0, 118.0], [11.0, 28.0, 17.0, 55.0]),
                shade: ColorStop::new([88.0, 77.0, 83.0, 140.0], [39.0, 25.0, 22.0, 30.0]),
            },
            ground: GroundPalette {
                soil: ColorStop::new([200.0, 125.0, 62.0, 255.0], [44.0, 25.0, 22.0, 0.0]),
                violet: ColorStop::new([88.0, 77.0, 99.0, 188.0], [11.0, 28.0, 17.0, 55.0]),
                sand: ColorStop::new([166.0, 134.0, 69.0, 255.0], [49.0, 25.0, 22.0, 0.0]),
            },
        }
    }
}

/// A reference image addressable by pixel coordinate, used to recolor the
/// palette tables. Implementors map out-of-range coordinates however they
/// like; the sampler clamps into `width()`/`height()` before calling.
pub trait PaletteSource {
    fn width(&self) -> u32;
    fn height(&self) -> u32;
    /// RGBA at `(x, y)`, each channel in 0-255.
    fn pixel(&self, x: u32, y: u32) -> [u8; 4];
}

impl Palettes {
    /// Re-derive palette bases by walking RNG-chosen coordinates through a
    /// reference image. Deltas and the original alpha roles are kept.
    pub fn recolor_from(&mut self, source: &dyn PaletteSource, rng: &mut Lcg) {
        let mut walk = PaletteWalk::new(source, rng.next_f32() * 33.0 + 128.0, rng.next_f32() * 33.0 + 128.0);

        self.ground.soil.base = walk.step(rng, 44.0, 255.0);
        self.ground.violet.base = walk.step(rng, 44.0, 255.0);
        self.ground.sand.base = walk.step(rng, 44.0, 255.0);

        self.sky.upper.base = walk.step(rng, 16.0, 255.0);
        self.sky.streak.base = walk.step(rng, 16.0, 188.0);
        self.sky.lower.base = walk.step(rng, 16.0, 188.0);

        self.tree.lit.base = walk.step(rng, 36.0, 255.0);
        self.tree.bright.base = walk.step(rng, 36.0, 188.0);
        self.tree.trunk.base = walk.step(rng, 36.0, 255.0);
    }
}

struct PaletteWalk<'a> {
    source: &'a dyn PaletteSource,
    x: f32,
    y: f32,
}

impl<'a> PaletteWalk<'a> {
    fn new(source: &'a dyn PaletteSource, x: f32, y: f32) -> Self {
        Self { source, x, y }
    }

    fn step(&mut self, rng: &mut Lcg, spread: f32, alpha: f32) -> [f32; 4] {
        let px = self.sample();
        self.x += rng.jitter(spread);
        self.y += rng.jitter(spread);
        [px[0] as f32, px[1] as f32, px[2] as f32, alpha]
    }

    fn sample(&self) -> [u8; 4] {
        let max_x = self.source.width().saturating_sub(1) as f32;
        let max_y = self.source.height().saturating_sub(1) as f32;
        let x = self.x.clamp(0.0, max_x) as u32;
        let y = self.y.clamp(0.0, max_y) as u32;
        self.source.pixel(x, y)
    }
}

/// Convert HSV (each component in `[0, 1]`) to RGB in `[0, 1]`.
pub fn hsv_to_rgb(h: f32, s: f32, v: f32) -> [f32; 3] {
    let i = (h * 6.0).floor();
    let f = h * 6.0 - i;
    let p = v * (1.0 - s);
    let q = v * (1.0 - f * s);
    let t = v * (1.0 - (1.0 - f) * s);
    match (i as i32).rem_euclid(6) {
        0 => [v, t, p],
        1 => [q, v, p],
        2 => [p, v, t],
        3 => [p, q, v],
        4 => [t, p, v],
        _ => [v, p, q],
    }
}

/// Cosine similarity of two colors as normalized RGB vectors.
///
/// Returns 0 for degenerate (all-zero) inputs so rejection predicates never
/// divide by zero.
pub fn color_similarity(a: [f32; 3], b: [f32; 3]) -> f32 {
    let la = (a[0] * a[0] + a[1] * a[1] + a[2] * a[2]).sqrt();
    let lb = (b[0] * b[0] + b[1] * b[1] + b[2] * b[2]).sqrt();
    if la == 0.0 || lb == 0.0 {
        return 0.0;
    }
    (a[0] * b[0] + a[1] * b[1] + a[2] * b[2]) / (la * lb)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stop_sample_stays_within_delta() {
        let stop = ColorStop::new([100.0, 50.0, 25.0, 200.0], [10.0, 5.0, 0.0, 20.0]);
        let mut rng = Lcg::new(8);
        for _ in 0..1000 {
            let c = stop.sample(&mut rng);
            assert!((90.0..110.0).contains(&c[0]));
            assert!((45.0..55.0).contains(&c[1]));
            assert_eq!(c[2], 25.0);
            assert!((180.0..220.0).contains(&c[3]));
        }
    }

    #[test]
    fn hsv_primaries() {
        let red = hsv_to_rgb(0.0, 1.0, 1.0);
        assert_eq!(red, [1.0, 0.0, 0.0]);

        let green = hsv_to_rgb(1.0 / 3.0, 1.0, 1.0);
        assert!((green[0] - 0.0).abs() < 1e-5);
        assert!((green[1] - 1.0).abs() < 1e-5);

        let gray = hsv_to_rgb(0.7, 0.0, 0.5);
        assert_eq!(gray, [0.5, 0.5, 0.5]);
    }

    #[test]
    fn similarity_flags_green() {
        let green = [0.1, 0.9, 0.1];
        assert!(color_similarity(green, [0.0, 1.0, 0.0]) > 0.5);

        let warm = [0.8, 0.4, 0.3];
        assert!(color_similarity(warm, [0.0, 1.0, 0.0]) < 0.5);
    }

    #[test]
    fn similarity_handles_black() {
        assert_eq!(color_similarity([0.0, 0.0, 0.0], [0.0, 1.0, 0.0]), 0.0);
    }

    struct FlatSource([u8; 4]);

    impl PaletteSource for FlatSource {
        fn width(&self) -> u32 {
            256
        }
        fn height(&self) -> u32 {
            256
        }
        fn pixel(&self, _x: u32, _y: u32) -> [u8; 4] {
            self.0
        }
    }

    #[test]
    fn recolor_replaces_bases_and_keeps_alpha_roles() {
        let mut palettes = Palettes::default();
        let mut rng = Lcg::new(4);
        palettes.recolor_from(&FlatSource([10, 20, 30, 255]), &mut rng);

        assert_eq!(&palettes.ground.soil.base[..3], &[10.0, 20.0, 30.0]);
        assert_eq!(palettes.ground.soil.base[3], 255.0);
        assert_eq!(palettes.sky.streak.base[3], 188.0);
        assert_eq!(palettes.tree.trunk.base[3], 255.0);
        // Deltas are untouched.
        assert_eq!(palettes.ground.soil.delta, [44.0, 25.0, 22.0, 0.0]);
    }
}
