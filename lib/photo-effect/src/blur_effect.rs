use crate::{Effect, PhotoEffectResult};
use derivative::Derivative;
use derive_setters::Setters;
use image::RgbImage;

/// Gaussian blur of a copy of `image`. A radius of zero returns the copy unchanged.
pub fn gaussian_blur(image: &RgbImage, radius: f32) -> RgbImage {
    if radius <= 0.0 || image.width() == 0 || image.height() == 0 {
        return image.clone();
    }

    imageproc::filter::gaussian_blur_f32(image, radius)
}

/// Blend `overlay` over `base` in place: base * (1 - alpha) + overlay * alpha
pub fn blend(base: &mut RgbImage, overlay: &RgbImage, alpha: f32) {
    let alpha = alpha.clamp(0.0, 1.0);

    for (pixel, top) in base.pixels_mut().zip(overlay.pixels()) {
        for i in 0..3 {
            let mixed = pixel[i] as f32 * (1.0 - alpha) + top[i] as f32 * alpha;
            pixel[i] = mixed.round().clamp(0.0, 255.0) as u8;
        }
    }
}

/// Soft glow: a blurred copy blended over the original.
#[derive(Debug, Clone, Derivative, Setters)]
#[derivative(Default)]
#[setters(prefix = "with_")]
#[non_exhaustive]
pub struct GlowConfig {
    #[derivative(Default(value = "0.15"))]
    strength: f32,

    #[derivative(Default(value = "8"))]
    radius: u32,
}

impl GlowConfig {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Effect for GlowConfig {
    fn apply(&self, image: &mut RgbImage) -> PhotoEffectResult<()> {
        if self.strength <= 0.0 {
            return Ok(());
        }

        let blurred = gaussian_blur(image, self.radius as f32);
        blend(image, &blurred, self.strength);

        Ok(())
    }
}
