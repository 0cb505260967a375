use crate::{
    Effect, ImageEffect, ParameterSet, PhotoEffectResult,
    blur_effect::GlowConfig,
    noise_effect::{DEFAULT_GRAIN_STRENGTH, GrainConfig},
    overlay_effect::RadialOverlayConfig,
    stylized_effect::UnsharpMaskConfig,
    tone_effect::{BrightnessConfig, ContrastConfig, SaturationConfig, WarmthConfig},
};
use image::RgbImage;

/// The fixed effect chain for one parameter set.
#[derive(Debug, Clone, Default)]
pub struct Pipeline {
    effects: Vec<ImageEffect>,
}

impl Pipeline {
    /// Build the chain in its fixed order: warmth, glow, brightness,
    /// contrast, vibrance, color, grain, sun traces, sharpness.
    pub fn from_params(params: &ParameterSet) -> Self {
        let params = params.sanitized();
        let mut effects = Vec::with_capacity(9);

        let (red, green) = params.warmth_factors();
        effects.push(ImageEffect::Warmth(WarmthConfig::from_factors(red, green)));

        if params.glow_strength > 0.0 {
            effects.push(ImageEffect::Glow(
                GlowConfig::new()
                    .with_strength(params.glow_strength)
                    .with_radius(params.glow_blur as u32),
            ));
        }

        effects.push(ImageEffect::Brightness(
            BrightnessConfig::new().with_factor(params.brightness),
        ));
        effects.push(ImageEffect::Contrast(
            ContrastConfig::new().with_factor(params.contrast),
        ));
        effects.push(ImageEffect::Vibrance(
            SaturationConfig::new().with_factor(params.vibrance),
        ));
        effects.push(ImageEffect::Color(
            SaturationConfig::new().with_factor(params.color),
        ));

        if params.grain_enabled() {
            let strength = if params.grain_strength > 0 {
                params.grain_strength as u32
            } else {
                DEFAULT_GRAIN_STRENGTH
            };
            effects.push(ImageEffect::Grain(
                GrainConfig::new().with_strength(strength),
            ));
        }

        if params.sun_traces_enabled() {
            effects.push(ImageEffect::SunTraces(RadialOverlayConfig::sun_traces()));
        }

        if params.sharpness > 0.0 {
            effects.push(ImageEffect::Sharpness(UnsharpMaskConfig::from_sharpness(
                params.sharpness,
            )));
        }

        Self { effects }
    }

    /// Append an extra effect after the fixed chain, e.g. a light leak.
    pub fn push(&mut self, effect: ImageEffect) {
        self.effects.push(effect);
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.effects.iter().map(ImageEffect::name).collect()
    }
}

impl Effect for Pipeline {
    fn apply(&self, image: &mut RgbImage) -> PhotoEffectResult<()> {
        for effect in &self.effects {
            log::trace!("apply {}", effect.name());
            effect.apply(image)?;
        }

        Ok(())
    }
}

/// Run the full chain for `params` over `image`.
pub fn process(mut image: RgbImage, params: &ParameterSet) -> PhotoEffectResult<RgbImage> {
    let pipeline = Pipeline::from_params(params);
    log::debug!(
        "process {}x{} image: {:?}",
        image.width(),
        image.height(),
        pipeline.names()
    );

    pipeline.apply(&mut image)?;
    Ok(image)
}
