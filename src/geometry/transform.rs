/// Detection coordinate transformation.
///
/// Detector boxes are normalized to [0, 1] with the origin at the bottom-left
/// of the upright image. Everything downstream (display composition and
/// cropping) works in pixels with a top-left origin.

use serde::{Deserialize, Serialize};

/// Bounding box as reported by the detector: normalized, bottom-left origin.
///
/// `y` is the distance from the image's bottom edge to the box's bottom edge.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NormalizedBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl NormalizedBox {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }
}

/// Axis-aligned rectangle in pixel units, top-left origin.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PixelRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl PixelRect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    pub fn max_x(&self) -> f64 {
        self.x + self.width
    }

    pub fn max_y(&self) -> f64 {
        self.y + self.height
    }

    pub fn translate(&self, dx: f64, dy: f64) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            ..*self
        }
    }

    /// Intersection with `other`, or `None` when the overlap has zero area.
    pub fn intersection(&self, other: &PixelRect) -> Option<PixelRect> {
        let x0 = self.x.max(other.x);
        let y0 = self.y.max(other.y);
        let x1 = self.max_x().min(other.max_x());
        let y1 = self.max_y().min(other.max_y());

        // NaN comparisons are false, so a NaN edge also lands here.
        if !(x1 > x0 && y1 > y0) {
            return None;
        }

        Some(PixelRect::new(x0, y0, x1 - x0, y1 - y0))
    }
}

/// Width/height pair in pixels (display points for the canvas).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn from_pixels(width: u32, height: u32) -> Self {
        Self::new(width as f64, height as f64)
    }
}

/// Map a normalized box into a top-left-origin rectangle of `target`.
///
/// `target` is either the display area or the upright pixel grid; the
/// mapping is the same for both:
///
/// - x      = box.x * W
/// - y      = (1 - box.y - box.height) * H
/// - width  = box.width * W
/// - height = box.height * H
pub fn to_pixel_rect(bbox: &NormalizedBox, target: Size) -> PixelRect {
    PixelRect {
        x: bbox.x * target.width,
        // Distance from the image top to the box top edge.
        y: (1.0 - bbox.y - bbox.height) * target.height,
        width: bbox.width * target.width,
        height: bbox.height * target.height,
    }
}

/// Aspect-fit placement of an image inside a canvas.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplayFit {
    pub scale: f64,
    /// Size of the scaled image on the canvas.
    pub display: Size,
    pub offset_x: f64,
    pub offset_y: f64,
}

/// Uniform scale that fits `image` inside `canvas`, centered.
pub fn aspect_fit(image: Size, canvas: Size) -> DisplayFit {
    let scale = if image.width > 0.0 && image.height > 0.0 {
        (canvas.width / image.width).min(canvas.height / image.height)
    } else {
        0.0
    };

    let display = Size::new(image.width * scale, image.height * scale);

    DisplayFit {
        scale,
        display,
        offset_x: (canvas.width - display.width) / 2.0,
        offset_y: (canvas.height - display.height) / 2.0,
    }
}

/// Rectangle of `bbox` on a canvas showing `image` aspect-fit and centered.
pub fn to_display_rect(bbox: &NormalizedBox, image: Size, canvas: Size) -> PixelRect {
    let fit = aspect_fit(image, canvas);
    to_pixel_rect(bbox, fit.display).translate(fit.offset_x, fit.offset_y)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn assert_rect_eq(actual: PixelRect, expected: PixelRect) {
        assert_abs_diff_eq!(actual.x, expected.x, epsilon = 1e-9);
        assert_abs_diff_eq!(actual.y, expected.y, epsilon = 1e-9);
        assert_abs_diff_eq!(actual.width, expected.width, epsilon = 1e-9);
        assert_abs_diff_eq!(actual.height, expected.height, epsilon = 1e-9);
    }

    #[test]
    fn flips_bottom_left_origin() {
        let bbox = NormalizedBox::new(0.1, 0.2, 0.3, 0.4);
        let rect = to_pixel_rect(&bbox, Size::new(1000.0, 2000.0));
        assert_rect_eq(rect, PixelRect::new(100.0, 800.0, 300.0, 800.0));
    }

    #[test]
    fn bottom_edge_matches_flipped_origin() {
        let target = Size::new(640.0, 480.0);
        for &(y, h) in &[(0.0, 1.0), (0.25, 0.5), (0.9, 0.1), (0.0, 0.0), (0.5, 0.3)] {
            let rect = to_pixel_rect(&NormalizedBox::new(0.2, y, 0.1, h), target);
            assert_abs_diff_eq!(rect.max_y(), (1.0 - y) * target.height, epsilon = 1e-9);
        }
    }

    #[test]
    fn box_past_edge_keeps_negative_origin() {
        let bbox = NormalizedBox::new(0.9, 0.9, 0.3, 0.3);
        let rect = to_pixel_rect(&bbox, Size::new(100.0, 100.0));
        assert_rect_eq(rect, PixelRect::new(90.0, -20.0, 30.0, 30.0));
    }

    #[test]
    fn intersection_clamps_to_bounds() {
        let bounds = PixelRect::new(0.0, 0.0, 100.0, 100.0);
        let clipped = PixelRect::new(90.0, -20.0, 30.0, 30.0)
            .intersection(&bounds)
            .unwrap();
        assert_rect_eq(clipped, PixelRect::new(90.0, 0.0, 10.0, 10.0));
    }

    #[test]
    fn touching_rects_do_not_intersect() {
        let bounds = PixelRect::new(0.0, 0.0, 100.0, 100.0);
        assert!(PixelRect::new(100.0, 10.0, 5.0, 5.0).intersection(&bounds).is_none());
        assert!(PixelRect::new(10.0, 10.0, 0.0, 5.0).intersection(&bounds).is_none());
        assert!(PixelRect::new(-10.0, -10.0, 5.0, 5.0).intersection(&bounds).is_none());
    }

    #[test]
    fn aspect_fit_letterboxes_tall_image() {
        // 1000x2000 image on a 400x400 canvas: scale 0.2, display 200x400.
        let fit = aspect_fit(Size::new(1000.0, 2000.0), Size::new(400.0, 400.0));
        assert_abs_diff_eq!(fit.scale, 0.2, epsilon = 1e-12);
        assert_abs_diff_eq!(fit.display.width, 200.0, epsilon = 1e-9);
        assert_abs_diff_eq!(fit.offset_x, 100.0, epsilon = 1e-9);
        assert_abs_diff_eq!(fit.offset_y, 0.0, epsilon = 1e-9);
    }

    #[test]
    fn display_rect_is_scaled_then_offset() {
        let bbox = NormalizedBox::new(0.1, 0.2, 0.3, 0.4);
        let image = Size::new(1000.0, 2000.0);
        let canvas = Size::new(400.0, 400.0);

        let rect = to_display_rect(&bbox, image, canvas);
        // Base transform against the 200x400 display, then shifted by (100, 0).
        assert_rect_eq(rect, PixelRect::new(120.0, 160.0, 60.0, 160.0));
    }

    #[test]
    fn empty_image_fits_to_nothing() {
        let fit = aspect_fit(Size::new(0.0, 10.0), Size::new(100.0, 100.0));
        assert_eq!(fit.scale, 0.0);
        assert_eq!(fit.offset_x, 50.0);
    }
}
