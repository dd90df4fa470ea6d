//! Coherent elevation noise for the endless terrain.
//!
//! [`NoiseField`] wraps a seeded `FastNoiseLite` sampler (OpenSimplex2 with
//! fBm stacking) behind two tiny methods: [`NoiseField::sample`] for the
//! normalized [0,1] field and [`NoiseField::elevation`] for world-unit
//! terrain height. Every chunk pulls its vertices from this one field, so
//! elevation is continuous across chunk seams and fully determined by
//! (seed, world position).

use bevy::prelude::*;
use fastnoise_lite::{FastNoiseLite, FractalType, NoiseType};

use crate::config::{
    MAX_ELEVATION, TERRAIN_FREQUENCY, TERRAIN_GAIN, TERRAIN_LACUNARITY, TERRAIN_OCTAVES,
};

/// Seeded 2D noise field shared by all terrain chunks.
#[derive(Resource)]
pub struct NoiseField {
    noise: FastNoiseLite,
}

impl Default for NoiseField {
    fn default() -> Self {
        Self::from_seed(crate::sim_rng::DEFAULT_SEED as i32)
    }
}

impl NoiseField {
    /// Build the sampler for a seed. Two fields with the same seed return
    /// identical values everywhere.
    pub fn from_seed(seed: i32) -> Self {
        let mut noise = FastNoiseLite::with_seed(seed);
        noise.set_noise_type(Some(NoiseType::OpenSimplex2));
        noise.set_frequency(Some(TERRAIN_FREQUENCY));
        noise.set_fractal_type(Some(FractalType::FBm));
        noise.set_fractal_octaves(Some(TERRAIN_OCTAVES));
        noise.set_fractal_gain(Some(TERRAIN_GAIN));
        noise.set_fractal_lacunarity(Some(TERRAIN_LACUNARITY));
        Self { noise }
    }

    /// Normalized field value at a world position.
    pub fn sample(&self, x: f32, y: f32) -> f32 {
        let raw = self.noise.get_noise_2d(x, y);
        // fBm with OpenSimplex2 outputs in [-1, 1]; normalize to [0, 1]
        ((raw + 1.0) * 0.5).clamp(0.0, 1.0)
    }

    /// Terrain height in world units at a world position.
    pub fn elevation(&self, x: f32, y: f32) -> f32 {
        self.sample(x, y) * MAX_ELEVATION
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_stays_normalized() {
        let field = NoiseField::from_seed(7);
        for i in -50..50 {
            let v = field.sample(i as f32 * 917.3, i as f32 * -311.9);
            assert!((0.0..=1.0).contains(&v), "sample out of range: {v}");
        }
    }

    #[test]
    fn test_same_seed_same_field() {
        let a = NoiseField::from_seed(1234);
        let b = NoiseField::from_seed(1234);
        for i in 0..100 {
            let (x, y) = (i as f32 * 101.0, i as f32 * -53.0);
            assert_eq!(a.sample(x, y), b.sample(x, y));
        }
    }

    #[test]
    fn test_different_seeds_diverge() {
        let a = NoiseField::from_seed(1);
        let b = NoiseField::from_seed(2);
        let diverged = (0..100).any(|i| {
            let (x, y) = (i as f32 * 101.0, i as f32 * 53.0);
            a.sample(x, y) != b.sample(x, y)
        });
        assert!(diverged);
    }

    #[test]
    fn test_field_is_continuous() {
        // Neighboring samples one world unit apart should never jump; at
        // TERRAIN_FREQUENCY the field varies over thousands of units.
        let field = NoiseField::from_seed(99);
        for i in 0..200 {
            let x = i as f32 * 37.0 - 3700.0;
            let a = field.sample(x, x * 0.5);
            let b = field.sample(x + 1.0, x * 0.5);
            assert!((a - b).abs() < 0.01, "field jumped {} at x={x}", (a - b).abs());
        }
    }

    #[test]
    fn test_elevation_scales_sample() {
        let field = NoiseField::from_seed(5);
        let (x, y) = (1500.0, -800.0);
        assert_eq!(field.elevation(x, y), field.sample(x, y) * MAX_ELEVATION);
        assert!(field.elevation(x, y) <= MAX_ELEVATION);
    }
}
