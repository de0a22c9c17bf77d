/// Bilinear resize onto a fixed working canvas.

use super::raster::Image;
use crate::error::AppError;
use image::RgbaImage;

/// Resize `image` to `width` x `height` with SIMD bilinear interpolation.
///
/// The aspect ratio is not preserved; normalized boxes still land on the
/// same content because they scale with each axis independently.
pub fn resize_to(image: &Image, width: u32, height: u32) -> Result<Image, AppError> {
    if width == 0 || height == 0 {
        return Err(AppError::Internal(format!(
            "Resize target must be non-empty, got {width}x{height}"
        )));
    }

    if (image.width(), image.height()) == (width, height) {
        return Ok(image.clone());
    }

    let resized = resize_bilinear(image.pixels(), width, height)?;
    Ok(Image::from_upright(resized, image.orientation()))
}

fn resize_bilinear(src: &RgbaImage, dst_w: u32, dst_h: u32) -> Result<RgbaImage, AppError> {
    use fast_image_resize as fr;

    let src_image = fr::images::Image::from_vec_u8(
        src.width(),
        src.height(),
        src.as_raw().clone(),
        fr::PixelType::U8x4,
    )
    .map_err(|e| AppError::Internal(format!("Resize source buffer: {e}")))?;

    let mut dst_image = fr::images::Image::new(dst_w, dst_h, fr::PixelType::U8x4);

    let mut resizer = fr::Resizer::new();
    resizer
        .resize(
            &src_image,
            &mut dst_image,
            &fr::ResizeOptions::new().resize_alg(fr::ResizeAlg::Interpolation(
                fr::FilterType::Bilinear,
            )),
        )
        .map_err(|e| AppError::Internal(format!("Resize failed: {e}")))?;

    RgbaImage::from_raw(dst_w, dst_h, dst_image.into_vec())
        .ok_or_else(|| AppError::Internal("Resized buffer has wrong length".to_string()))
}
