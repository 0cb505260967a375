use crate::{ParameterSet, PhotoEffectError, PhotoEffectResult, process};
use image::{RgbImage, codecs::jpeg::JpegEncoder};

pub const DEFAULT_JPEG_QUALITY: u8 = 90;

/// Decode any supported image format into 8-bit RGB.
pub fn decode(bytes: &[u8]) -> PhotoEffectResult<RgbImage> {
    let image = image::load_from_memory(bytes)?;
    Ok(image.to_rgb8())
}

pub fn encode_jpeg(image: &RgbImage, quality: u8) -> PhotoEffectResult<Vec<u8>> {
    let mut buffer = Vec::new();
    let encoder = JpegEncoder::new_with_quality(&mut buffer, quality.clamp(1, 100));
    image
        .write_with_encoder(encoder)
        .map_err(|e| PhotoEffectError::Encode(e.to_string()))?;

    Ok(buffer)
}

/// Decode, run the pipeline and encode the result as JPEG.
pub fn process_bytes(bytes: &[u8], params: &ParameterSet, quality: u8) -> PhotoEffectResult<Vec<u8>> {
    let image = decode(bytes)?;
    let image = process(image, params)?;
    encode_jpeg(&image, quality)
}

/// Archive name for an uploaded file: `edited_<file name>`, without any
/// directory part the client may have sent.
pub fn edited_name(filename: &str) -> String {
    let base = filename
        .rsplit(['/', '\\'])
        .next()
        .filter(|s| !s.is_empty())
        .unwrap_or("image.jpg");

    format!("edited_{base}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    #[test]
    fn test_edited_name() {
        assert_eq!(edited_name("cat.jpg"), "edited_cat.jpg");
        assert_eq!(edited_name("trip/day1/beach.png"), "edited_beach.png");
        assert_eq!(edited_name(r"C:\photos\dog.jpeg"), "edited_dog.jpeg");
        assert_eq!(edited_name("dir/"), "edited_image.jpg");
    }

    #[test]
    fn test_decode_garbage_fails() {
        let err = decode(b"definitely not an image").unwrap_err();
        assert!(matches!(err, PhotoEffectError::Decode(_)));
    }

    #[test]
    fn test_jpeg_round_trip_dimensions() {
        let img = RgbImage::from_pixel(31, 17, Rgb([10, 200, 30]));
        let bytes = encode_jpeg(&img, DEFAULT_JPEG_QUALITY).unwrap();
        assert_eq!(&bytes[..2], &[0xFF, 0xD8]);

        let decoded = decode(&bytes).unwrap();
        assert_eq!(decoded.dimensions(), (31, 17));
    }
}
