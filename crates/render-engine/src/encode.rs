//! Still-image encoding for captured frames.

use image::buffer::ConvertBuffer;
use image::codecs::jpeg::JpegEncoder;
use image::{RgbImage, RgbaImage};

use carelab_common::error::{CarelabError, CarelabResult};

/// Container format of an [`EncodedImage`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Jpeg,
}

impl ImageFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ImageFormat::Jpeg => "jpg",
        }
    }
}

/// A compressed still together with its pixel dimensions.
#[derive(Debug, Clone)]
pub struct EncodedImage {
    pub format: ImageFormat,
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

/// JPEG-encode a capture at `quality` (1..=100). Alpha is discarded.
pub fn encode_jpeg(frame: &RgbaImage, quality: u8) -> CarelabResult<EncodedImage> {
    let rgb: RgbImage = frame.convert();
    let mut data = Vec::new();
    JpegEncoder::new_with_quality(&mut data, quality.clamp(1, 100))
        .encode_image(&rgb)
        .map_err(|e| CarelabError::assembly(format!("JPEG encoding failed: {e}")))?;

    tracing::trace!(
        width = rgb.width(),
        height = rgb.height(),
        quality,
        bytes = data.len(),
        "Encoded JPEG"
    );

    Ok(EncodedImage {
        format: ImageFormat::Jpeg,
        width: rgb.width(),
        height: rgb.height(),
        data,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn test_jpeg_has_soi_marker_and_dimensions() {
        let frame = RgbaImage::from_pixel(40, 30, Rgba([12, 74, 110, 255]));
        let encoded = encode_jpeg(&frame, 90).unwrap();
        assert_eq!(&encoded.data[..2], &[0xFF, 0xD8]);
        assert_eq!((encoded.width, encoded.height), (40, 30));
        assert_eq!(encoded.format.extension(), "jpg");

        let decoded = image::load_from_memory(&encoded.data).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (40, 30));
    }

    #[test]
    fn test_higher_quality_is_not_smaller() {
        let mut frame = RgbaImage::new(64, 64);
        for (x, y, px) in frame.enumerate_pixels_mut() {
            *px = Rgba([(x * 4) as u8, (y * 4) as u8, ((x + y) * 2) as u8, 255]);
        }
        let low = encode_jpeg(&frame, 10).unwrap();
        let high = encode_jpeg(&frame, 95).unwrap();
        assert!(high.data.len() >= low.data.len());
    }
}
