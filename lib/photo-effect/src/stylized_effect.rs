use crate::{Effect, PhotoEffectResult, blur_effect::gaussian_blur};
use derivative::Derivative;
use derive_setters::Setters;
use image::RgbImage;

/// Unsharp mask: `value + (value - blurred) * amount`.
///
/// `amount` is `sharpness - 1.0`, so a sharpness of 1.0 leaves the image
/// alone and values below 1.0 soften it. When sharpening, differences below
/// `threshold` are left untouched to keep flat areas clean.
#[derive(Debug, Clone, Derivative, Setters)]
#[derivative(Default)]
#[setters(prefix = "with_")]
#[non_exhaustive]
pub struct UnsharpMaskConfig {
    #[derivative(Default(value = "0.3"))]
    amount: f32,

    #[derivative(Default(value = "2.0"))]
    radius: f32,

    #[derivative(Default(value = "3"))]
    threshold: u8,
}

impl UnsharpMaskConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_sharpness(sharpness: f32) -> Self {
        Self::default().with_amount(sharpness - 1.0)
    }
}

impl Effect for UnsharpMaskConfig {
    fn apply(&self, image: &mut RgbImage) -> PhotoEffectResult<()> {
        if self.amount == 0.0 {
            return Ok(());
        }

        let blurred = gaussian_blur(image, self.radius);
        let threshold = self.threshold as f32;

        for (pixel, soft) in image.pixels_mut().zip(blurred.pixels()) {
            for i in 0..3 {
                let value = pixel[i] as f32;
                let diff = value - soft[i] as f32;

                if self.amount > 0.0 && diff.abs() < threshold {
                    continue;
                }

                pixel[i] = (value + diff * self.amount).round().clamp(0.0, 255.0) as u8;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    fn edge() -> RgbImage {
        RgbImage::from_fn(20, 20, |x, _| {
            if x < 10 {
                Rgb([80, 80, 80])
            } else {
                Rgb([170, 170, 170])
            }
        })
    }

    #[test]
    fn test_neutral_sharpness_is_noop() {
        let mut img = edge();
        UnsharpMaskConfig::from_sharpness(1.0).apply(&mut img).unwrap();
        assert_eq!(img, edge());
    }

    #[test]
    fn test_sharpen_boosts_edge() {
        let mut img = edge();
        UnsharpMaskConfig::from_sharpness(2.0).apply(&mut img).unwrap();

        assert!(img.get_pixel(9, 10)[0] < 80);
        assert!(img.get_pixel(10, 10)[0] > 170);
        // flat areas far from the edge stay put
        assert_eq!(img.get_pixel(0, 10)[0], 80);
        assert_eq!(img.get_pixel(19, 10)[0], 170);
    }

    #[test]
    fn test_low_sharpness_softens_edge() {
        let mut img = edge();
        UnsharpMaskConfig::from_sharpness(0.5).apply(&mut img).unwrap();

        assert!(img.get_pixel(9, 10)[0] > 80);
        assert!(img.get_pixel(10, 10)[0] < 170);
    }

    #[test]
    fn test_flat_image_untouched() {
        let mut img = RgbImage::from_pixel(8, 8, Rgb([128, 128, 128]));
        UnsharpMaskConfig::from_sharpness(1.3).apply(&mut img).unwrap();
        assert!(img.pixels().all(|p| p.0 == [128, 128, 128]));
    }
}
