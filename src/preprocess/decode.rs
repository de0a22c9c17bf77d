/// Image decoding with EXIF orientation, via the image crate.

use super::raster::Image;
use crate::error::AppError;
use crate::geometry::Orientation;
use image::{DynamicImage, ImageDecoder, ImageReader};
use std::io::Cursor;

/// Decode image bytes onto the upright grid, honoring embedded orientation.
pub fn decode_image(data: &[u8]) -> Result<Image, AppError> {
    let (stored, orientation) = decode_stored(data)?;
    Ok(Image::from_stored(stored, orientation))
}

/// Decode image bytes using orientation metadata supplied by the caller
/// (e.g. a camera capture that reports it out of band).
pub fn decode_with_orientation(data: &[u8], orientation: Orientation) -> Result<Image, AppError> {
    let (stored, _) = decode_stored(data)?;
    Ok(Image::from_stored(stored, orientation))
}

fn decode_stored(data: &[u8]) -> Result<(DynamicImage, Orientation), AppError> {
    if data.is_empty() {
        return Err(AppError::ImageDecode("empty image data".to_string()));
    }

    let reader = ImageReader::new(Cursor::new(data))
        .with_guessed_format()
        .map_err(|e| AppError::ImageDecode(format!("format probe: {e}")))?;

    let mut decoder = reader
        .into_decoder()
        .map_err(|e| AppError::ImageDecode(format!("decoder init: {e}")))?;

    // Formats without EXIF simply report no transform.
    let orientation = decoder
        .orientation()
        .map(Orientation::from)
        .unwrap_or_default();

    let stored = DynamicImage::from_decoder(decoder)
        .map_err(|e| AppError::ImageDecode(format!("decode: {e}")))?;

    if stored.width() == 0 || stored.height() == 0 {
        return Err(AppError::ImageDecode("image has no pixels".to_string()));
    }

    Ok((stored, orientation))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgba, RgbaImage};

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = RgbaImage::from_pixel(width, height, Rgba([10, 20, 30, 255]));
        let mut out = Cursor::new(Vec::new());
        img.write_to(&mut out, ImageFormat::Png).unwrap();
        out.into_inner()
    }

    #[test]
    fn decodes_png() {
        let img = decode_image(&png_bytes(7, 5)).unwrap();
        assert_eq!((img.width(), img.height()), (7, 5));
        assert_eq!(img.orientation(), Orientation::Up);
    }

    #[test]
    fn explicit_orientation_rotates() {
        let img = decode_with_orientation(&png_bytes(7, 5), Orientation::Left).unwrap();
        assert_eq!((img.width(), img.height()), (5, 7));
        assert_eq!(img.stored_size(), (7, 5));
    }

    #[test]
    fn garbage_is_invalid_image_data() {
        let err = decode_image(b"definitely not an image").unwrap_err();
        assert!(matches!(err, AppError::ImageDecode(_)));
    }

    #[test]
    fn empty_is_invalid_image_data() {
        assert!(matches!(decode_image(&[]), Err(AppError::ImageDecode(_))));
    }
}
