//! Photo effects for the batch pipeline.
//!
//! Every effect is a small config struct implementing [`Effect`]. The
//! [`Pipeline`] turns a [`ParameterSet`] into the fixed chain of effects and
//! [`PresetStore`] keeps named parameter sets on disk.

pub mod blur_effect;
pub mod codec;
pub mod noise_effect;
pub mod overlay_effect;
pub mod params;
pub mod pipeline;
pub mod preset;
pub mod stylized_effect;
pub mod tone_effect;

use image::RgbImage;

pub use codec::{DEFAULT_JPEG_QUALITY, decode, edited_name, encode_jpeg, process_bytes};
pub use params::ParameterSet;
pub use pipeline::{Pipeline, process};
pub use preset::{BASE_PRESET, PresetStore, TEMPLATE_PRESET};

pub type PhotoEffectResult<T> = Result<T, PhotoEffectError>;

#[derive(thiserror::Error, Debug)]
pub enum PhotoEffectError {
    #[error("Decode error: {0}")]
    Decode(#[from] image::ImageError),
    #[error("Encode error: {0}")]
    Encode(String),
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Json error: {0}")]
    Json(#[from] serde_json::Error),
}

pub trait Effect {
    fn apply(&self, image: &mut RgbImage) -> PhotoEffectResult<()>;
}

#[derive(Debug, Clone)]
pub enum ImageEffect {
    // Tone effects
    Warmth(tone_effect::WarmthConfig),
    Brightness(tone_effect::BrightnessConfig),
    Contrast(tone_effect::ContrastConfig),
    Vibrance(tone_effect::SaturationConfig),
    Color(tone_effect::SaturationConfig),

    // Glow
    Glow(blur_effect::GlowConfig),

    // Texture and light
    Grain(noise_effect::GrainConfig),
    SunTraces(overlay_effect::RadialOverlayConfig),
    LightLeak(overlay_effect::RadialOverlayConfig),

    // Stylized effects
    Sharpness(stylized_effect::UnsharpMaskConfig),
}

impl ImageEffect {
    pub fn name(&self) -> &'static str {
        match self {
            ImageEffect::Warmth(_) => "warmth",
            ImageEffect::Brightness(_) => "brightness",
            ImageEffect::Contrast(_) => "contrast",
            ImageEffect::Vibrance(_) => "vibrance",
            ImageEffect::Color(_) => "color",
            ImageEffect::Glow(_) => "glow",
            ImageEffect::Grain(_) => "grain",
            ImageEffect::SunTraces(_) => "sun_traces",
            ImageEffect::LightLeak(_) => "light_leak",
            ImageEffect::Sharpness(_) => "sharpness",
        }
    }
}

impl Effect for ImageEffect {
    fn apply(&self, image: &mut RgbImage) -> PhotoEffectResult<()> {
        match self {
            // Tone effects
            ImageEffect::Warmth(config) => config.apply(image),
            ImageEffect::Brightness(config) => config.apply(image),
            ImageEffect::Contrast(config) => config.apply(image),
            ImageEffect::Vibrance(config) => config.apply(image),
            ImageEffect::Color(config) => config.apply(image),

            // Glow
            ImageEffect::Glow(config) => config.apply(image),

            // Texture and light
            ImageEffect::Grain(config) => config.apply(image),
            ImageEffect::SunTraces(config) => config.apply(image),
            ImageEffect::LightLeak(config) => config.apply(image),

            // Stylized effects
            ImageEffect::Sharpness(config) => config.apply(image),
        }
    }
}
