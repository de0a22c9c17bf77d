/// Crop detection regions out of an upright image.

use super::raster::Image;
use crate::geometry::{to_pixel_rect, NormalizedBox, PixelRect};
use image::imageops;

/// Edges closer than this to a pixel boundary are treated as on it.
const EDGE_EPSILON: f64 = 1e-6;

/// Cut `rect` out of `image`, clamped to the image bounds.
///
/// Returns `None` when the clamped region has zero area: a box lying
/// entirely outside the frame has nothing to show. Partially outside boxes
/// are clipped, never rejected. Fractional edges are expanded outward to
/// whole pixels, after edges within float noise of a pixel boundary are
/// snapped onto it. The crop keeps the source's orientation tag.
pub fn crop(image: &Image, rect: &PixelRect) -> Option<Image> {
    let bounds = PixelRect::new(0.0, 0.0, image.width() as f64, image.height() as f64);
    let valid = rect.intersection(&bounds)?;

    // `valid` lies inside `bounds`, so the casts cannot go negative.
    let x0 = snap_edge(valid.x).floor() as u32;
    let y0 = snap_edge(valid.y).floor() as u32;
    let x1 = (snap_edge(valid.max_x()).ceil() as u32).min(image.width());
    let y1 = (snap_edge(valid.max_y()).ceil() as u32).min(image.height());

    if x1 <= x0 || y1 <= y0 {
        return None;
    }

    let sub = imageops::crop_imm(image.pixels(), x0, y0, x1 - x0, y1 - y0).to_image();
    Some(Image::from_upright(sub, image.orientation()))
}

fn snap_edge(v: f64) -> f64 {
    let nearest = v.round();
    if (v - nearest).abs() < EDGE_EPSILON {
        nearest
    } else {
        v
    }
}

/// Crop the region a normalized detector box covers on `image`.
pub fn crop_box(image: &Image, bbox: &NormalizedBox) -> Option<Image> {
    crop(image, &to_pixel_rect(bbox, image.size()))
}
