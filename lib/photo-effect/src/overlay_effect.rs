//! Synthetic light overlays.
//!
//! An overlay is a set of concentric rings around a point near the top-left
//! corner. Each ring is a little larger than the previous one and its color
//! shades from `inner_color` to `outer_color`; outside the last ring the
//! overlay is `background`. The ring edge is softened over `softness` pixels,
//! which stands in for a heavy gaussian blur of the drawn rings.

use crate::{Effect, PhotoEffectResult, blur_effect::blend};
use derivative::Derivative;
use derive_setters::Setters;
use image::{Rgb, RgbImage};

#[derive(Debug, Clone, Derivative, Setters)]
#[derivative(Default)]
#[setters(prefix = "with_")]
#[non_exhaustive]
pub struct RadialOverlayConfig {
    #[derivative(Default(value = "100.0"))]
    center_x: f32,

    #[derivative(Default(value = "100.0"))]
    center_y: f32,

    /// Radius of the first ring
    #[derivative(Default(value = "300.0"))]
    inner_radius: f32,

    /// One pixel of radius per ring
    #[derivative(Default(value = "400"))]
    rings: u32,

    #[derivative(Default(value = "[255, 210, 160]"))]
    inner_color: [u8; 3],

    #[derivative(Default(value = "[255, 200, 150]"))]
    outer_color: [u8; 3],

    #[derivative(Default(value = "[255, 200, 150]"))]
    background: [u8; 3],

    #[derivative(Default(value = "100.0"))]
    softness: f32,

    #[derivative(Default(value = "0.12"))]
    opacity: f32,
}

impl RadialOverlayConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Warm sun traces blended at 12%.
    pub fn sun_traces() -> Self {
        Self::default()
    }

    /// Red/orange light leak, fading toward black, blended at 15%.
    pub fn light_leak() -> Self {
        Self::default()
            .with_inner_radius(200.0)
            .with_rings(300)
            .with_inner_color([255, 80, 60])
            .with_outer_color([200, 60, 45])
            .with_background([0, 0, 0])
            .with_softness(80.0)
            .with_opacity(0.15)
    }

    /// Render the overlay at the given size.
    pub fn render(&self, width: u32, height: u32) -> RgbImage {
        let outer_radius = self.inner_radius + self.rings as f32;
        let softness = self.softness.max(0.0);

        RgbImage::from_fn(width, height, |x, y| {
            let dx = x as f32 - self.center_x;
            let dy = y as f32 - self.center_y;
            let distance = (dx * dx + dy * dy).sqrt();

            let ring_color = if distance <= self.inner_radius || self.rings == 0 {
                self.inner_color
            } else {
                let ring = (distance - self.inner_radius).ceil().min(self.rings as f32);
                mix(self.inner_color, self.outer_color, ring / self.rings as f32)
            };

            let fade = if softness > 0.0 {
                smoothstep(outer_radius - softness, outer_radius + softness, distance)
            } else if distance > outer_radius {
                1.0
            } else {
                0.0
            };

            Rgb(mix(ring_color, self.background, fade))
        })
    }
}

impl Effect for RadialOverlayConfig {
    fn apply(&self, image: &mut RgbImage) -> PhotoEffectResult<()> {
        let overlay = self.render(image.width(), image.height());
        blend(image, &overlay, self.opacity);
        Ok(())
    }
}

fn mix(a: [u8; 3], b: [u8; 3], t: f32) -> [u8; 3] {
    let t = t.clamp(0.0, 1.0);
    let channel = |i: usize| (a[i] as f32 + (b[i] as f32 - a[i] as f32) * t).round() as u8;
    [channel(0), channel(1), channel(2)]
}

fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}
