/// Image loading, cropping and resizing.

pub mod crop;
pub mod decode;
pub mod raster;
pub mod resize;

pub use crop::{crop, crop_box};
pub use decode::{decode_image, decode_with_orientation};
pub use raster::Image;
pub use resize::resize_to;
