use crate::client::MAX_COVER_BYTES;
use anyhow::{Context, Result, anyhow};
use image::RgbImage;
use image::codecs::jpeg::JpegEncoder;
use log::debug;

/// Bounding box edge lengths tried in order, largest first
const COVER_SIZES: [u32; 3] = [640, 480, 300];

/// JPEG qualities tried at each size, best first
const COVER_QUALITIES: [u8; 4] = [90, 75, 60, 45];

/// Re-encode a generated image as a JPEG whose base64 form fits the cover upload limit
///
/// The image generator returns large PNGs; the playlist cover endpoint only takes
/// small JPEGs. Sizes and qualities are stepped down until the payload fits.
pub fn to_cover_jpeg(bytes: &[u8]) -> Result<Vec<u8>> {
    let source =
        image::load_from_memory(bytes).context("Generated cover is not a decodable image")?;

    for size in COVER_SIZES {
        let scaled = source.thumbnail(size, size).to_rgb8();
        for quality in COVER_QUALITIES {
            let jpeg = encode_jpeg(&scaled, quality)?;
            let encoded_len = base64_len(jpeg.len());
            if encoded_len <= MAX_COVER_BYTES {
                debug!(
                    "Cover encoded at {}x{} quality {quality}: {encoded_len} bytes",
                    scaled.width(),
                    scaled.height()
                );
                return Ok(jpeg);
            }
        }
    }

    Err(anyhow!(
        "Cover could not be compressed under {MAX_COVER_BYTES} bytes"
    ))
}

fn encode_jpeg(image: &RgbImage, quality: u8) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    JpegEncoder::new_with_quality(&mut buffer, quality)
        .encode_image(image)
        .context("Failed to encode cover as JPEG")?;
    Ok(buffer)
}

/// Length of the padded standard base64 encoding of `raw` bytes
pub fn base64_len(raw: usize) -> usize {
    raw.div_ceil(3) * 4
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, ImageFormat, Rgb};
    use std::io::Cursor;

    fn png(size: u32, pixel: impl Fn(u32, u32) -> Rgb<u8>) -> Vec<u8> {
        let mut bytes = Vec::new();
        DynamicImage::ImageRgb8(RgbImage::from_fn(size, size, pixel))
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .unwrap();
        bytes
    }

    #[test]
    fn test_png_becomes_small_jpeg() {
        let source = png(1024, |x, y| Rgb([(x % 256) as u8, (y % 256) as u8, 128]));
        assert!(source.starts_with(&[0x89, 0x50, 0x4E, 0x47]));

        let jpeg = to_cover_jpeg(&source).unwrap();

        assert!(jpeg.starts_with(&[0xFF, 0xD8, 0xFF]));
        assert!(base64_len(jpeg.len()) <= MAX_COVER_BYTES);
        let decoded = image::load_from_memory(&jpeg).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (640, 640));
    }

    #[test]
    fn test_noisy_image_steps_down_until_it_fits() {
        // A cheap hash gives pixel noise that JPEG compresses poorly
        let source = png(700, |x, y| {
            let h = x.wrapping_mul(2_654_435_761) ^ y.wrapping_mul(40_503);
            Rgb([h as u8, (h >> 8) as u8, (h >> 16) as u8])
        });

        let jpeg = to_cover_jpeg(&source).unwrap();
        assert!(base64_len(jpeg.len()) <= MAX_COVER_BYTES);
    }

    #[test]
    fn test_undecodable_bytes_are_rejected() {
        assert!(to_cover_jpeg(&[0x89, 0x50, 0x4E, 0x47]).is_err());
        assert!(to_cover_jpeg(b"not an image").is_err());
    }

    #[test]
    fn test_base64_len_matches_padded_encoding() {
        assert_eq!(base64_len(0), 0);
        assert_eq!(base64_len(1), 4);
        assert_eq!(base64_len(3), 4);
        assert_eq!(base64_len(4), 8);
    }
}
