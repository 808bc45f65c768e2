//! Native image reading through the `image` crate

use crate::error::{Error, Result};
use crate::raster::Image;
use ::image::imageops::{self, FilterType};
use ::image::{DynamicImage, GrayImage};
use std::path::Path;

/// Read an image file as 8-bit grayscale.
///
/// When `image_size` is given the picture is resized to
/// `image_size × image_size` with a bilinear filter; otherwise the native
/// dimensions are kept.
pub fn read_image<P: AsRef<Path>>(path: P, image_size: Option<u32>) -> Result<Image> {
    let decoded = ::image::open(path.as_ref())?;
    convert(decoded, image_size)
}

/// Read an encoded image (PNG, JPEG, BMP, TIFF) from an in-memory buffer
pub fn read_image_from_buffer(data: &[u8], image_size: Option<u32>) -> Result<Image> {
    let decoded = ::image::load_from_memory(data)?;
    convert(decoded, image_size)
}

/// Read several images in order, stopping at the first failure
pub fn read_images<P: AsRef<Path>>(paths: &[P], image_size: Option<u32>) -> Result<Vec<Image>> {
    paths.iter().map(|p| read_image(p, image_size)).collect()
}

/// Internal: luma conversion and optional square resize
fn convert(decoded: DynamicImage, image_size: Option<u32>) -> Result<Image> {
    let gray: GrayImage = decoded.to_luma8();
    let gray = match image_size {
        Some(0) => {
            return Err(Error::invalid_parameter("image_size", 0, "must be > 0"));
        }
        Some(size) if gray.width() != size || gray.height() != size => {
            imageops::resize(&gray, size, size, FilterType::Triangle)
        }
        _ => gray,
    };

    let (cols, rows) = (gray.width() as usize, gray.height() as usize);
    Image::from_vec(gray.into_raw(), rows, cols)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ::image::Luma;

    fn write_png(width: u32, height: u32) -> tempfile::NamedTempFile {
        let tmp = tempfile::NamedTempFile::with_suffix(".png").unwrap();
        let img = GrayImage::from_fn(width, height, |x, y| Luma([((x + y * width) % 256) as u8]));
        img.save(tmp.path()).unwrap();
        tmp
    }

    #[test]
    fn test_read_native_size() {
        let tmp = write_png(6, 4);
        let image = read_image(tmp.path(), None).unwrap();
        assert_eq!(image.shape(), (4, 6));
        // pixel (row 1, col 2) was written at x = 2, y = 1
        assert_eq!(image.get(1, 2).unwrap(), 8);
    }

    #[test]
    fn test_read_resizes_to_square() {
        let tmp = write_png(20, 10);
        let image = read_image(tmp.path(), Some(8)).unwrap();
        assert_eq!(image.shape(), (8, 8));
    }

    #[test]
    fn test_read_images_keeps_order() {
        let a = write_png(3, 3);
        let b = write_png(5, 5);
        let images = read_images(&[a.path(), b.path()], None).unwrap();
        assert_eq!(images[0].shape(), (3, 3));
        assert_eq!(images[1].shape(), (5, 5));
    }

    #[test]
    fn test_missing_file_is_an_error() {
        assert!(read_image("/definitely/not/here.png", None).is_err());
    }

    #[test]
    fn test_garbage_buffer_is_an_error() {
        assert!(read_image_from_buffer(b"not an image", None).is_err());
    }
}
