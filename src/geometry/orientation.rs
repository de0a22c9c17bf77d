/// Stored image orientation (EXIF tag 0x0112).

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Orientation {
    #[default]
    Up,
    UpMirrored,
    Down,
    DownMirrored,
    LeftMirrored,
    Right,
    RightMirrored,
    Left,
}

impl Orientation {
    /// Orientation for an EXIF value; unknown values read as upright.
    pub fn from_exif(value: u32) -> Self {
        match value {
            2 => Orientation::UpMirrored,
            3 => Orientation::Down,
            4 => Orientation::DownMirrored,
            5 => Orientation::LeftMirrored,
            6 => Orientation::Right,
            7 => Orientation::RightMirrored,
            8 => Orientation::Left,
            _ => Orientation::Up,
        }
    }

    pub fn to_exif(self) -> u8 {
        match self {
            Orientation::Up => 1,
            Orientation::UpMirrored => 2,
            Orientation::Down => 3,
            Orientation::DownMirrored => 4,
            Orientation::LeftMirrored => 5,
            Orientation::Right => 6,
            Orientation::RightMirrored => 7,
            Orientation::Left => 8,
        }
    }

    /// True for the 90-degree family, where the stored buffer is transposed.
    pub fn swaps_axes(self) -> bool {
        matches!(
            self,
            Orientation::Left
                | Orientation::Right
                | Orientation::LeftMirrored
                | Orientation::RightMirrored
        )
    }

    /// Upright dimensions for a stored buffer of `width` x `height`.
    pub fn upright_size(self, width: u32, height: u32) -> (u32, u32) {
        if self.swaps_axes() {
            (height, width)
        } else {
            (width, height)
        }
    }

    pub(crate) fn to_image(self) -> image::metadata::Orientation {
        use image::metadata::Orientation as Exif;
        match self {
            Orientation::Up => Exif::NoTransforms,
            Orientation::UpMirrored => Exif::FlipHorizontal,
            Orientation::Down => Exif::Rotate180,
            Orientation::DownMirrored => Exif::FlipVertical,
            Orientation::LeftMirrored => Exif::Rotate90FlipH,
            Orientation::Right => Exif::Rotate90,
            Orientation::RightMirrored => Exif::Rotate270FlipH,
            Orientation::Left => Exif::Rotate270,
        }
    }
}

impl From<image::metadata::Orientation> for Orientation {
    fn from(value: image::metadata::Orientation) -> Self {
        Orientation::from_exif(value.to_exif() as u32)
    }
}
