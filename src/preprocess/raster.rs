/// In-memory raster with its orientation tag.

use crate::geometry::{Orientation, Size};
use image::{DynamicImage, RgbaImage};

/// Decoded image kept on the upright pixel grid.
///
/// `orientation` records how the source buffer was stored. The pixels are
/// already rotated/mirrored into the upright grid, so width, height and
/// every pixel operation refer to what the user sees.
#[derive(Clone, Debug, PartialEq)]
pub struct Image {
    pixels: RgbaImage,
    orientation: Orientation,
}

impl Image {
    /// Build from a buffer as stored on disk, applying `orientation`.
    pub fn from_stored(stored: DynamicImage, orientation: Orientation) -> Self {
        let mut upright = stored;
        upright.apply_orientation(orientation.to_image());
        Self {
            pixels: upright.to_rgba8(),
            orientation,
        }
    }

    /// Wrap pixels that are already on the upright grid.
    pub fn from_upright(pixels: RgbaImage, orientation: Orientation) -> Self {
        Self {
            pixels,
            orientation,
        }
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    /// Upright dimensions as a transform target.
    pub fn size(&self) -> Size {
        Size::from_pixels(self.width(), self.height())
    }

    /// Dimensions of the buffer as it was stored before orientation.
    pub fn stored_size(&self) -> (u32, u32) {
        // Swapping is its own inverse.
        self.orientation.upright_size(self.width(), self.height())
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }

    pub fn into_pixels(self) -> RgbaImage {
        self.pixels
    }

    /// Exact equality of the decoded pixel content.
    pub fn same_pixels(&self, other: &Image) -> bool {
        self.pixels.dimensions() == other.pixels.dimensions()
            && self.pixels.as_raw() == other.pixels.as_raw()
    }
}
