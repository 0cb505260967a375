//! The typed parameter set driving the filter pipeline.

use crate::{PhotoEffectError, PhotoEffectResult};
use serde::{Deserialize, Serialize};

/// Upper bound for `glow_blur`. The blur kernel grows with the radius.
pub const MAX_GLOW_BLUR: i32 = 250;

/// All filter controls. `ParameterSet::default()` is the canonical base preset.
///
/// Missing fields in a persisted preset fall back to their defaults one by
/// one, except `warm_r`/`warm_g`: older presets without them fall back to the
/// single `warmth_factor`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterSet {
    #[serde(default = "default_warmth_factor")]
    pub warmth_factor: f32,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warm_r: Option<f32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warm_g: Option<f32>,

    #[serde(default = "default_glow_strength")]
    pub glow_strength: f32,

    #[serde(default = "default_glow_blur")]
    pub glow_blur: i32,

    #[serde(default = "default_brightness")]
    pub brightness: f32,

    #[serde(default = "default_contrast")]
    pub contrast: f32,

    #[serde(default = "default_vibrance")]
    pub vibrance: f32,

    #[serde(default = "default_color")]
    pub color: f32,

    #[serde(default)]
    pub grain_strength: i32,

    #[serde(default = "default_sharpness")]
    pub sharpness: f32,

    #[serde(default)]
    pub sun_traces: i32,

    #[serde(default)]
    pub grain_effect: bool,

    #[serde(default)]
    pub sun_traces_effect: bool,
}

fn default_warmth_factor() -> f32 {
    1.08
}

fn default_glow_strength() -> f32 {
    0.15
}

fn default_glow_blur() -> i32 {
    8
}

fn default_brightness() -> f32 {
    1.05
}

fn default_contrast() -> f32 {
    1.12
}

fn default_vibrance() -> f32 {
    1.10
}

fn default_color() -> f32 {
    1.0
}

fn default_sharpness() -> f32 {
    1.3
}

impl Default for ParameterSet {
    fn default() -> Self {
        Self {
            warmth_factor: default_warmth_factor(),
            warm_r: Some(1.08),
            warm_g: Some(0.97),
            glow_strength: default_glow_strength(),
            glow_blur: default_glow_blur(),
            brightness: default_brightness(),
            contrast: default_contrast(),
            vibrance: default_vibrance(),
            color: default_color(),
            grain_strength: 0,
            sharpness: default_sharpness(),
            sun_traces: 0,
            grain_effect: false,
            sun_traces_effect: false,
        }
    }
}

impl ParameterSet {
    /// Field names accepted by [`ParameterSet::set_field`].
    pub const FIELDS: [&'static str; 14] = [
        "warmth_factor",
        "warm_r",
        "warm_g",
        "glow_strength",
        "glow_blur",
        "brightness",
        "contrast",
        "vibrance",
        "color",
        "grain_strength",
        "sharpness",
        "sun_traces",
        "grain_effect",
        "sun_traces_effect",
    ];

    pub fn base() -> Self {
        Self::default()
    }

    /// Every factor 1.0 and every optional stage off.
    pub fn neutral() -> Self {
        Self {
            warmth_factor: 1.0,
            warm_r: Some(1.0),
            warm_g: Some(1.0),
            glow_strength: 0.0,
            glow_blur: 0,
            brightness: 1.0,
            contrast: 1.0,
            vibrance: 1.0,
            color: 1.0,
            grain_strength: 0,
            sharpness: 1.0,
            sun_traces: 0,
            grain_effect: false,
            sun_traces_effect: false,
        }
    }

    /// Red and green multipliers for the warmth stage.
    ///
    /// Without `warm_g` the green factor is half as far from 1.0 as the
    /// legacy `warmth_factor`.
    pub fn warmth_factors(&self) -> (f32, f32) {
        let red = self.warm_r.unwrap_or(self.warmth_factor);
        let green = self
            .warm_g
            .unwrap_or(1.0 + (self.warmth_factor - 1.0) / 2.0);
        (red, green)
    }

    pub fn grain_enabled(&self) -> bool {
        self.grain_strength > 0 || self.grain_effect
    }

    pub fn sun_traces_enabled(&self) -> bool {
        self.sun_traces > 0 || self.sun_traces_effect
    }

    /// Clamp every value to its safe range. Radii and strengths can't go
    /// below zero, glow strength is a blend weight in [0, 1] and the glow
    /// radius stops at [`MAX_GLOW_BLUR`].
    pub fn sanitized(&self) -> Self {
        let factor = |v: f32| if v.is_finite() { v.max(0.0) } else { 1.0 };

        Self {
            warmth_factor: factor(self.warmth_factor),
            warm_r: self.warm_r.map(factor),
            warm_g: self.warm_g.map(factor),
            glow_strength: if self.glow_strength.is_finite() {
                self.glow_strength.clamp(0.0, 1.0)
            } else {
                0.0
            },
            glow_blur: self.glow_blur.clamp(0, MAX_GLOW_BLUR),
            brightness: factor(self.brightness),
            contrast: factor(self.contrast),
            vibrance: factor(self.vibrance),
            color: factor(self.color),
            grain_strength: self.grain_strength.max(0),
            sharpness: factor(self.sharpness),
            sun_traces: self.sun_traces.max(0),
            grain_effect: self.grain_effect,
            sun_traces_effect: self.sun_traces_effect,
        }
    }

    /// Set one field from its textual form value.
    pub fn set_field(&mut self, key: &str, value: &str) -> PhotoEffectResult<()> {
        let value = value.trim();

        match key {
            "warmth_factor" => self.warmth_factor = parse_float(key, value)?,
            "warm_r" => self.warm_r = Some(parse_float(key, value)?),
            "warm_g" => self.warm_g = Some(parse_float(key, value)?),
            "glow_strength" => self.glow_strength = parse_float(key, value)?,
            "glow_blur" => self.glow_blur = parse_int(key, value)?,
            "brightness" => self.brightness = parse_float(key, value)?,
            "contrast" => self.contrast = parse_float(key, value)?,
            "vibrance" => self.vibrance = parse_float(key, value)?,
            "color" => self.color = parse_float(key, value)?,
            "grain_strength" => self.grain_strength = parse_int(key, value)?,
            "sharpness" => self.sharpness = parse_float(key, value)?,
            "sun_traces" => self.sun_traces = parse_int(key, value)?,
            "grain_effect" => self.grain_effect = parse_bool(key, value)?,
            "sun_traces_effect" => self.sun_traces_effect = parse_bool(key, value)?,
            _ => {
                return Err(PhotoEffectError::InvalidParameter(format!(
                    "unknown field `{key}`"
                )));
            }
        }

        Ok(())
    }

    /// Overlay form fields on top of `self`. Fields that are unknown or fail
    /// to parse keep their current value.
    pub fn merge_form<'a, I>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        for (key, value) in fields {
            if let Err(e) = self.set_field(key, value) {
                log::warn!("ignore form field {key}={value:?}: {e}");
            }
        }

        self
    }
}

fn parse_float(key: &str, value: &str) -> PhotoEffectResult<f32> {
    value
        .parse::<f32>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| PhotoEffectError::InvalidParameter(format!("`{key}` expects a number")))
}

fn parse_int(key: &str, value: &str) -> PhotoEffectResult<i32> {
    // Sliders may post "8.0" for integer fields
    let in_range = |v: &f32| (i32::MIN as f32..=i32::MAX as f32).contains(v);

    value
        .parse::<i32>()
        .ok()
        .or_else(|| {
            value
                .parse::<f32>()
                .ok()
                .filter(in_range)
                .map(|v| v.round() as i32)
        })
        .ok_or_else(|| PhotoEffectError::InvalidParameter(format!("`{key}` expects an integer")))
}

fn parse_bool(key: &str, value: &str) -> PhotoEffectResult<bool> {
    match value.to_ascii_lowercase().as_str() {
        "on" | "true" | "1" | "yes" => Ok(true),
        "off" | "false" | "0" | "no" | "" => Ok(false),
        _ => Err(PhotoEffectError::InvalidParameter(format!(
            "`{key}` expects a boolean"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        let p = ParameterSet::default();
        assert_eq!(p.warmth_factors(), (1.08, 0.97));
        assert_eq!(p.glow_blur, 8);
        assert_eq!(p.sharpness, 1.3);
        assert!(!p.grain_enabled());
        assert!(!p.sun_traces_enabled());
    }

    #[test]
    fn test_legacy_warmth_fallback() {
        let p: ParameterSet = serde_json::from_str(r#"{"warmth_factor": 1.1}"#).unwrap();
        assert_eq!(p.warm_r, None);

        let (red, green) = p.warmth_factors();
        assert!((red - 1.1).abs() < 1e-6);
        assert!((green - 1.05).abs() < 1e-6);

        // everything else falls back to the base values
        assert_eq!(p.contrast, 1.12);
        assert_eq!(p.glow_strength, 0.15);
    }

    #[test]
    fn test_json_field_names() {
        let value = serde_json::to_value(ParameterSet::default()).unwrap();
        let object = value.as_object().unwrap();

        for field in ParameterSet::FIELDS {
            assert!(object.contains_key(field), "missing {field}");
        }
        assert_eq!(object.len(), ParameterSet::FIELDS.len());
    }

    #[test]
    fn test_sanitized_clamps() {
        let p = ParameterSet {
            glow_blur: -4,
            glow_strength: 3.0,
            grain_strength: -1,
            brightness: -2.0,
            sharpness: f32::NAN,
            ..ParameterSet::default()
        }
        .sanitized();

        assert_eq!(p.glow_blur, 0);
        assert_eq!(p.glow_strength, 1.0);
        assert_eq!(p.grain_strength, 0);
        assert_eq!(p.brightness, 0.0);
        assert_eq!(p.sharpness, 1.0);
    }

    #[test]
    fn test_huge_glow_blur_is_capped() {
        let p = ParameterSet::default().merge_form([("glow_blur", "1e9")]);
        assert_eq!(p.glow_blur, 1_000_000_000);
        assert_eq!(p.sanitized().glow_blur, MAX_GLOW_BLUR);
    }

    #[test]
    fn test_int_fields_reject_non_finite() {
        let mut p = ParameterSet::default();
        assert!(p.set_field("glow_blur", "NaN").is_err());
        assert!(p.set_field("grain_strength", "inf").is_err());
        assert!(p.set_field("sun_traces", "-1e20").is_err());
        assert_eq!(p.glow_blur, 8);
        assert_eq!(p.grain_strength, 0);

        let p = ParameterSet::default().merge_form([("glow_blur", "nan")]);
        assert_eq!(p.glow_blur, 8);
    }

    #[test]
    fn test_set_field() {
        let mut p = ParameterSet::default();
        p.set_field("glow_blur", "12").unwrap();
        p.set_field("grain_strength", "7.6").unwrap();
        p.set_field("vibrance", " 1.4 ").unwrap();
        p.set_field("grain_effect", "on").unwrap();

        assert_eq!(p.glow_blur, 12);
        assert_eq!(p.grain_strength, 8);
        assert_eq!(p.vibrance, 1.4);
        assert!(p.grain_effect);

        assert!(p.set_field("exposure", "1").is_err());
        assert!(p.set_field("contrast", "high").is_err());
        assert!(p.set_field("sun_traces_effect", "maybe").is_err());
    }

    #[test]
    fn test_merge_form_keeps_fallback_on_bad_values() {
        let p = ParameterSet::default().merge_form([
            ("contrast", "abc"),
            ("brightness", "1.2"),
            ("unknown", "1"),
        ]);

        assert_eq!(p.contrast, 1.12);
        assert_eq!(p.brightness, 1.2);
    }
}
