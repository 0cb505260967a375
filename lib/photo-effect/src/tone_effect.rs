use crate::{Effect, PhotoEffectResult};
use derivative::Derivative;
use derive_setters::Setters;
use image::RgbImage;

/// Multiply a channel value and clamp it back into the display range.
#[inline]
pub fn scale_channel(value: u8, factor: f32) -> u8 {
    (value as f32 * factor).round().clamp(0.0, 255.0) as u8
}

/// Move a channel value away from (or toward) a reference level.
#[inline]
fn stretch_channel(value: u8, reference: f32, factor: f32) -> u8 {
    (reference + (value as f32 - reference) * factor)
        .round()
        .clamp(0.0, 255.0) as u8
}

/// Rec. 601 luma: 0.299*R + 0.587*G + 0.114*B
#[inline]
pub fn luma(pixel: &image::Rgb<u8>) -> f32 {
    0.299 * pixel[0] as f32 + 0.587 * pixel[1] as f32 + 0.114 * pixel[2] as f32
}

/// Rounded mean luma of the whole image, used as the contrast pivot.
pub fn mean_luma(image: &RgbImage) -> f32 {
    let count = image.width() as u64 * image.height() as u64;
    if count == 0 {
        return 0.0;
    }

    let sum: f64 = image.pixels().map(|p| luma(p).round() as f64).sum();
    (sum / count as f64).round() as f32
}

/// Warm tone: scales red and green, blue is left untouched.
#[derive(Debug, Clone, Derivative, Setters)]
#[derivative(Default)]
#[setters(prefix = "with_")]
#[non_exhaustive]
pub struct WarmthConfig {
    #[derivative(Default(value = "1.08"))]
    red: f32,

    #[derivative(Default(value = "0.97"))]
    green: f32,
}

impl WarmthConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_factors(red: f32, green: f32) -> Self {
        Self { red, green }
    }
}

impl Effect for WarmthConfig {
    fn apply(&self, image: &mut RgbImage) -> PhotoEffectResult<()> {
        for pixel in image.pixels_mut() {
            pixel[0] = scale_channel(pixel[0], self.red);
            pixel[1] = scale_channel(pixel[1], self.green);
        }

        Ok(())
    }
}

/// Brightness multiplier, 1.0 keeps the image as is.
#[derive(Debug, Clone, Derivative, Setters)]
#[derivative(Default)]
#[setters(prefix = "with_")]
#[non_exhaustive]
pub struct BrightnessConfig {
    #[derivative(Default(value = "1.05"))]
    factor: f32,
}

impl BrightnessConfig {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Effect for BrightnessConfig {
    fn apply(&self, image: &mut RgbImage) -> PhotoEffectResult<()> {
        for pixel in image.pixels_mut() {
            for i in 0..3 {
                pixel[i] = scale_channel(pixel[i], self.factor);
            }
        }

        Ok(())
    }
}

/// Contrast multiplier around the mean luma of the image.
#[derive(Debug, Clone, Derivative, Setters)]
#[derivative(Default)]
#[setters(prefix = "with_")]
#[non_exhaustive]
pub struct ContrastConfig {
    #[derivative(Default(value = "1.12"))]
    factor: f32,
}

impl ContrastConfig {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Effect for ContrastConfig {
    fn apply(&self, image: &mut RgbImage) -> PhotoEffectResult<()> {
        // new_color = (old_color - mean) * factor + mean
        let mean = mean_luma(image);

        for pixel in image.pixels_mut() {
            for i in 0..3 {
                pixel[i] = stretch_channel(pixel[i], mean, self.factor);
            }
        }

        Ok(())
    }
}

/// Saturation multiplier: interpolates between the pixel's gray and its color.
/// Used for both vibrance and the legacy color stage.
#[derive(Debug, Clone, Derivative, Setters)]
#[derivative(Default)]
#[setters(prefix = "with_")]
#[non_exhaustive]
pub struct SaturationConfig {
    #[derivative(Default(value = "1.10"))]
    factor: f32,
}

impl SaturationConfig {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Effect for SaturationConfig {
    fn apply(&self, image: &mut RgbImage) -> PhotoEffectResult<()> {
        for pixel in image.pixels_mut() {
            let gray = luma(pixel).round();

            for i in 0..3 {
                pixel[i] = stretch_channel(pixel[i], gray, self.factor);
            }
        }

        Ok(())
    }
}
