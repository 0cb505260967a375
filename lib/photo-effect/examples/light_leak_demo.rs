/// Light leak example
/// Runs the base preset and appends the light leak overlay, which is not
/// part of the default chain.
use image::ImageReader;
use photo_effect::{
    Effect, ImageEffect, ParameterSet, Pipeline, overlay_effect::RadialOverlayConfig,
};
use std::path::Path;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let output_dir = Path::new("tmp");
    std::fs::create_dir_all(output_dir)?;

    let img_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "data/test.png".to_string());
    let mut img = ImageReader::open(&img_path)?.decode()?.to_rgb8();

    let mut pipeline = Pipeline::from_params(&ParameterSet::base());
    pipeline.push(ImageEffect::LightLeak(RadialOverlayConfig::light_leak()));
    pipeline.apply(&mut img)?;

    img.save(output_dir.join("light_leak_effect.jpg"))?;

    println!("✓ Light leak effect applied successfully!");
    println!("  Stages: {:?}", pipeline.names());
    println!("  Effect: tmp/light_leak_effect.jpg");

    Ok(())
}
