/// Box geometry: normalized detector boxes to pixel rectangles.

pub mod orientation;
pub mod transform;

pub use orientation::Orientation;
pub use transform::{
    aspect_fit, to_display_rect, to_pixel_rect, DisplayFit, NormalizedBox, PixelRect, Size,
};
