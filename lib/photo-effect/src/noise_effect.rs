use crate::{Effect, PhotoEffectResult};
use derivative::Derivative;
use derive_setters::Setters;
use image::{GrayImage, Luma, RgbImage};
use imageproc::noise::gaussian_noise_mut;
use rand::Rng;

/// Amplitude used when grain is switched on without an explicit strength.
pub const DEFAULT_GRAIN_STRENGTH: u32 = 15;

/// Film grain: one gaussian noise field centered on 128, shared by all three
/// channels and added with `(value + noise) / scale`.
#[derive(Debug, Clone, Derivative, Setters)]
#[derivative(Default)]
#[setters(prefix = "with_")]
#[non_exhaustive]
pub struct GrainConfig {
    #[derivative(Default(value = "DEFAULT_GRAIN_STRENGTH"))]
    strength: u32,

    #[derivative(Default(value = "2.0"))]
    scale: f32,

    #[setters(strip_option)]
    seed: Option<u64>,
}

impl GrainConfig {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Effect for GrainConfig {
    fn apply(&self, image: &mut RgbImage) -> PhotoEffectResult<()> {
        let seed = self.seed.unwrap_or_else(|| rand::rng().random());
        let noise = noise_field(image.width(), image.height(), self.strength, seed);
        let scale = if self.scale > 0.0 { self.scale } else { 1.0 };

        for (pixel, grain) in image.pixels_mut().zip(noise.pixels()) {
            let grain = grain[0] as f32;
            for i in 0..3 {
                let sum = (pixel[i] as f32 + grain) / scale;
                pixel[i] = sum.round().clamp(0.0, 255.0) as u8;
            }
        }

        Ok(())
    }
}

/// Single channel noise with mean 128 and standard deviation `sigma`.
pub fn noise_field(width: u32, height: u32, sigma: u32, seed: u64) -> GrayImage {
    let mut field = GrayImage::from_pixel(width, height, Luma([128]));
    if sigma > 0 {
        gaussian_noise_mut(&mut field, 0.0, sigma as f64, seed);
    }
    field
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    #[test]
    fn test_zero_sigma_noise_is_flat() {
        let noise = noise_field(5, 5, 0, 7);
        assert!(noise.pixels().all(|p| p[0] == 128));
    }

    #[test]
    fn test_noise_statistics() {
        let noise = noise_field(64, 64, 20, 42);
        let count = (64 * 64) as f32;
        let mean = noise.pixels().map(|p| p[0] as f32).sum::<f32>() / count;
        let var = noise
            .pixels()
            .map(|p| (p[0] as f32 - mean).powi(2))
            .sum::<f32>()
            / count;

        assert!((mean - 128.0).abs() < 3.0, "mean {mean}");
        assert!((var.sqrt() - 20.0).abs() < 3.0, "stddev {}", var.sqrt());
    }

    #[test]
    fn test_grain_is_gray_noise() {
        let mut img = RgbImage::from_pixel(16, 16, Rgb([120, 120, 120]));
        GrainConfig::new().with_seed(3).apply(&mut img).unwrap();

        // Same noise value on every channel of a gray pixel keeps it gray.
        assert!(img.pixels().all(|p| p[0] == p[1] && p[1] == p[2]));
        assert!(img.pixels().any(|p| p[0] != 124));
    }

    #[test]
    fn test_seeded_grain_is_reproducible() {
        let base = RgbImage::from_fn(10, 10, |x, y| Rgb([(x * 20) as u8, (y * 20) as u8, 50]));

        let mut a = base.clone();
        let mut b = base.clone();
        GrainConfig::new().with_seed(11).apply(&mut a).unwrap();
        GrainConfig::new().with_seed(11).apply(&mut b).unwrap();

        assert_eq!(a, b);
        assert_eq!(noise_field(8, 8, 15, 5), noise_field(8, 8, 15, 5));
        assert_ne!(noise_field(8, 8, 15, 5), noise_field(8, 8, 15, 6));
    }

    #[test]
    fn test_flat_noise_averages_with_mid_gray() {
        let mut img = RgbImage::from_pixel(3, 3, Rgb([0, 100, 255]));
        GrainConfig::new()
            .with_strength(0)
            .with_seed(1)
            .apply(&mut img)
            .unwrap();

        // (v + 128) / 2
        assert_eq!(img.get_pixel(0, 0).0, [64, 114, 192]);
    }
}
