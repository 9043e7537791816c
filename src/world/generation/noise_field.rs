//! Continuous scalar noise over the XZ plane
//!
//! Every field is a pure function of `(x, z)`: no interior mutability, no
//! caches. Adjacent chunks sample the same coordinates independently, so
//! identical float inputs must produce bit-identical heights.

use noise::{NoiseFn, Perlin};

use crate::config::{NoiseConfig, NoiseKind};
use crate::constants::noise::{
    HASH_A, HASH_B, HASH_C, HASH_SEED_STEP, START_AMPLITUDE,
};

/// A deterministic height field sampled in world units
pub trait NoiseField: Send + Sync {
    /// Raw height at world position `(x, z)`, hovering around 0.5
    fn sample(&self, x: f32, z: f32) -> f32;
}

/// Lattice hash in `[0, 1)`: `fract(sin(ix*A + iz*B + seed) * C)`
pub fn lattice_hash(ix: f64, iz: f64, seed_offset: f64) -> f64 {
    let value = (ix * HASH_A + iz * HASH_B + seed_offset).sin() * HASH_C;
    let fract = value - value.floor();
    // fract of a tiny negative value can round up to exactly 1.0
    if fract >= 1.0 {
        0.0
    } else {
        fract
    }
}

#[inline]
fn smoothstep(t: f64) -> f64 {
    t * t * (3.0 - 2.0 * t)
}

#[inline]
fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

/// Bilinear value noise with a `3u^2 - 2u^3` blend, in `[0, 1)`
pub fn value_noise(x: f64, z: f64, seed_offset: f64) -> f64 {
    let x0 = x.floor();
    let z0 = z.floor();
    let u = smoothstep(x - x0);
    let v = smoothstep(z - z0);

    let v00 = lattice_hash(x0, z0, seed_offset);
    let v10 = lattice_hash(x0 + 1.0, z0, seed_offset);
    let v01 = lattice_hash(x0, z0 + 1.0, seed_offset);
    let v11 = lattice_hash(x0 + 1.0, z0 + 1.0, seed_offset);

    lerp(lerp(v00, v10, u), lerp(v01, v11, u), v)
}

fn seed_offset(seed: u32) -> f64 {
    seed as f64 * HASH_SEED_STEP
}

/// Single-octave value noise
#[derive(Debug, Clone, Copy)]
pub struct ValueNoiseField {
    scale: f64,
    seed_offset: f64,
}

impl ValueNoiseField {
    pub fn new(seed: u32, scale: f32) -> Self {
        Self {
            scale: scale as f64,
            seed_offset: seed_offset(seed),
        }
    }
}

impl NoiseField for ValueNoiseField {
    fn sample(&self, x: f32, z: f32) -> f32 {
        value_noise(x as f64 * self.scale, z as f64 * self.scale, self.seed_offset) as f32
    }
}

/// Fractal Brownian motion over value noise
///
/// Octave `i` samples at frequency `2^i` with amplitude `0.5^(i+1)`; the sum
/// is clamped to be non-negative.
#[derive(Debug, Clone, Copy)]
pub struct FbmField {
    scale: f64,
    octaves: u32,
    seed_offset: f64,
}

impl FbmField {
    pub fn new(seed: u32, scale: f32, octaves: u32) -> Self {
        Self {
            scale: scale as f64,
            octaves,
            seed_offset: seed_offset(seed),
        }
    }
}

impl NoiseField for FbmField {
    fn sample(&self, x: f32, z: f32) -> f32 {
        let mut px = x as f64 * self.scale;
        let mut pz = z as f64 * self.scale;
        let mut amplitude = START_AMPLITUDE as f64;
        let mut value = 0.0;

        for _ in 0..self.octaves {
            value += amplitude * value_noise(px, pz, self.seed_offset);
            px *= 2.0;
            pz *= 2.0;
            amplitude *= 0.5;
        }

        value.max(0.0) as f32
    }
}

/// Gradient noise variant built on `noise::Perlin`
///
/// Octaves are summed and normalized to `[0, 1]`, then pushed away from the
/// midpoint with a cubic curve. Below 0.5 the curve is only blended in at
/// 75% so lowlands stay broad.
pub struct PerlinField {
    perlin: Perlin,
    frequency: f64,
    octaves: u32,
}

impl PerlinField {
    pub fn new(seed: u32, frequency: f64, octaves: u32) -> Self {
        Self {
            perlin: Perlin::new(seed),
            frequency,
            octaves,
        }
    }

    fn octave_sum(&self, x: f64, z: f64) -> f64 {
        let mut frequency = self.frequency;
        let mut amplitude = 1.0;
        let mut total = 0.0;
        let mut max_amplitude = 0.0;

        for _ in 0..self.octaves {
            total += self.perlin.get([x * frequency, z * frequency]) * amplitude;
            max_amplitude += amplitude;
            frequency *= 2.0;
            amplitude *= 0.5;
        }

        // [-1, 1] -> [0, 1]
        ((total / max_amplitude) * 0.5 + 0.5).clamp(0.0, 1.0)
    }
}

impl NoiseField for PerlinField {
    fn sample(&self, x: f32, z: f32) -> f32 {
        let p = self.octave_sum(x as f64, z as f64);
        let curved = (p * 2.0 - 1.0).powi(3) / 2.0 + 0.5;
        let shaped = if p <= 0.5 {
            curved * 0.75 + p * 0.25
        } else {
            curved
        };
        shaped as f32
    }
}

/// Build the field selected by the world config
pub fn create_noise_field(kind: NoiseKind, seed: u32, config: &NoiseConfig) -> Box<dyn NoiseField> {
    match kind {
        NoiseKind::Value => Box::new(ValueNoiseField::new(seed, config.scale)),
        NoiseKind::Fbm => Box::new(FbmField::new(seed, config.scale, config.octaves)),
        NoiseKind::Perlin => Box::new(PerlinField::new(
            seed,
            config.perlin_frequency,
            config.perlin_octaves,
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_POINTS: [(f32, f32); 6] = [
        (0.0, 0.0),
        (1234.5, -987.25),
        (-20000.0, 40000.0),
        (999.999, 1000.001),
        (-0.5, 0.5),
        (250_000.0, -250_000.0),
    ];

    #[test]
    fn test_lattice_hash_range() {
        for ix in -50..50 {
            for iz in -50..50 {
                let h = lattice_hash(ix as f64, iz as f64, 0.0);
                assert!((0.0..1.0).contains(&h), "hash {} out of range at ({}, {})", h, ix, iz);
            }
        }
    }

    #[test]
    fn test_value_noise_matches_lattice_at_integer_points() {
        for &(ix, iz) in &[(0.0, 0.0), (3.0, -7.0), (-12.0, 5.0)] {
            assert_eq!(value_noise(ix, iz, 0.0), lattice_hash(ix, iz, 0.0));
        }
    }

    #[test]
    fn test_value_noise_is_continuous() {
        // Smoothstep blending means tiny input steps give tiny output steps,
        // including across lattice lines.
        let eps = 1e-6;
        for &x in &[0.999_999, 1.0, 4.5, -2.000_001] {
            let a = value_noise(x, 0.3, 0.0);
            let b = value_noise(x + eps, 0.3, 0.0);
            assert!((a - b).abs() < 1e-4, "discontinuity at x={}: {} vs {}", x, a, b);
        }
    }

    #[test]
    fn test_fields_are_deterministic() {
        let config = NoiseConfig::default();
        for kind in [NoiseKind::Value, NoiseKind::Fbm, NoiseKind::Perlin] {
            let first = create_noise_field(kind, 7, &config);
            let second = create_noise_field(kind, 7, &config);
            for &(x, z) in &SAMPLE_POINTS {
                let a = first.sample(x, z);
                assert_eq!(a.to_bits(), first.sample(x, z).to_bits());
                assert_eq!(a.to_bits(), second.sample(x, z).to_bits());
            }
        }
    }

    #[test]
    fn test_fbm_is_non_negative_and_bounded() {
        let field = FbmField::new(0, 0.0005, 6);
        for i in 0..200 {
            let x = i as f32 * 173.0 - 17_000.0;
            let z = i as f32 * -91.0 + 3_000.0;
            let h = field.sample(x, z);
            assert!(h >= 0.0 && h < 1.0, "fbm height {} out of range", h);
        }
    }

    #[test]
    fn test_fbm_single_octave_is_half_value_noise() {
        let fbm = FbmField::new(3, 0.0005, 1);
        let value = ValueNoiseField::new(3, 0.0005);
        for &(x, z) in &SAMPLE_POINTS {
            let expected = value.sample(x, z) as f64 * 0.5;
            assert!((fbm.sample(x, z) as f64 - expected).abs() < 1e-6);
        }
    }

    #[test]
    fn test_seed_changes_field() {
        let a = FbmField::new(1, 0.0005, 6);
        let b = FbmField::new(2, 0.0005, 6);
        let differs = SAMPLE_POINTS
            .iter()
            .any(|&(x, z)| a.sample(x, z) != b.sample(x, z));
        assert!(differs);
    }

    #[test]
    fn test_perlin_field_range() {
        let field = PerlinField::new(0, 0.0001, 5);
        for &(x, z) in &SAMPLE_POINTS {
            let h = field.sample(x, z);
            assert!((0.0..=1.0).contains(&h), "perlin height {} out of range", h);
        }
    }
}
