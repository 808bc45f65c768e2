//! Image loading
//!
//! Decoding is delegated to the `image` crate; this module only converts the
//! decoded picture to 8-bit luma and resizes it to the configured square.

mod native;

pub use native::{read_image, read_image_from_buffer, read_images};
