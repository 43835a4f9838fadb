//! Coherent value-noise field.
//!
//! Gradient-free lattice noise with raised-cosine interpolation and octave
//! summation, sampled over a 4096-entry table populated from its own [`Lcg`]
//! stream. Construction is explicit and two-phase: a [`ValueNoise`] is always
//! seeded, so "noise used before seeded" is unrepresentable.
use crate::rng::Lcg;

/// Bit mask for lattice indexing; the table holds `LATTICE_MASK + 1` entries.
pub const LATTICE_MASK: u32 = 4095;
/// Wrap period along y, in bits. Small on purpose: y and z mostly serve as
/// seed decorrelation axes, not spatial extent, and recycling the lattice
/// quickly there is fine.
const Y_WRAP_BITS: u32 = 4;
const Y_WRAP: u32 = 1 << Y_WRAP_BITS;
const Z_WRAP_BITS: u32 = 8;
const Z_WRAP: u32 = 1 << Z_WRAP_BITS;

const DEFAULT_OCTAVES: u32 = 4;
const DEFAULT_FALLOFF: f32 = 0.5;

#[inline]
fn scaled_cosine(i: f32) -> f32 {
    0.5 * (1.0 - (i * std::f32::consts::PI).cos())
}

/// Seeded 3D value-noise field.
///
/// Output is approximately in `[0, 1]`: the octave sum is not hard-clamped and
/// can slightly exceed the nominal range.
#[derive(Debug, Clone)]
pub struct ValueNoise {
    lattice: Vec<f32>,
    octaves: u32,
    falloff: f32,
}

impl ValueNoise {
    /// Build a field by drawing the full lattice from a fresh LCG stream
    /// seeded with `seed`.
    pub fn new(seed: u32) -> Self {
        let mut rng = Lcg::new(seed);
        let lattice = (0..=LATTICE_MASK).map(|_| rng.next_f32()).collect();
        Self {
            lattice,
            octaves: DEFAULT_OCTAVES,
            falloff: DEFAULT_FALLOFF,
        }
    }

    /// Set octave count and amplitude falloff. Non-positive values leave the
    /// current setting untouched. Configure once, before generation.
    pub fn with_detail(mut self, octaves: i32, falloff: f32) -> Self {
        if octaves > 0 {
            self.octaves = octaves as u32;
        }
        if falloff > 0.0 {
            self.falloff = falloff;
        }
        self
    }

    /// Sample the field in the z = 0 plane.
    #[inline]
    pub fn sample(&self, x: f32, y: f32) -> f32 {
        self.sample3(x, y, 0.0)
    }

    /// Sample the field at `(x, y, z)`.
    ///
    /// Negative inputs are folded to positive via absolute value; this is a
    /// deliberate simplification, not true periodic noise.
    pub fn sample3(&self, x: f32, y: f32, z: f32) -> f32 {
        let (x, y, z) = (x.abs(), y.abs(), z.abs());

        let mut xi = x.floor() as u32;
        let mut yi = y.floor() as u32;
        let mut zi = z.floor() as u32;
        let mut xf = x - x.floor();
        let mut yf = y - y.floor();
        let mut zf = z - z.floor();

        let mut r = 0.0;
        let mut ampl = 0.5;

        for _ in 0..self.octaves {
            let mut of = xi
                .wrapping_add(yi.wrapping_shl(Y_WRAP_BITS))
                .wrapping_add(zi.wrapping_shl(Z_WRAP_BITS));

            let rxf = scaled_cosine(xf);
            let ryf = scaled_cosine(yf);

            let mut n1 = self.at(of);
            n1 += rxf * (self.at(of.wrapping_add(1)) - n1);
            let mut n2 = self.at(of.wrapping_add(Y_WRAP));
            n2 += rxf * (self.at(of.wrapping_add(Y_WRAP + 1)) - n2);
            n1 += ryf * (n2 - n1);

            of = of.wrapping_add(Z_WRAP);
            n2 = self.at(of);
            n2 += rxf * (self.at(of.wrapping_add(1)) - n2);
            let mut n3 = self.at(of.wrapping_add(Y_WRAP));
            n3 += rxf * (self.at(of.wrapping_add(Y_WRAP + 1)) - n3);
            n2 += ryf * (n3 - n2);

            n1 += scaled_cosine(zf) * (n2 - n1);

            r += n1 * ampl;
            ampl *= self.falloff;

            xi = xi.wrapping_shl(1);
            xf *= 2.0;
            yi = yi.wrapping_shl(1);
            yf *= 2.0;
            zi = zi.wrapping_shl(1);
            zf *= 2.0;

            if xf >= 1.0 {
                xi = xi.wrapping_add(1);
                xf -= 1.0;
            }
            if yf >= 1.0 {
                yi = yi.wrapping_add(1);
                yf -= 1.0;
            }
            if zf >= 1.0 {
                zi = zi.wrapping_add(1);
                zf -= 1.0;
            }
        }

        r
    }

    #[inline]
    fn at(&self, of: u32) -> f32 {
        self.lattice[(of & LATTICE_MASK) as usize]
    }
}
