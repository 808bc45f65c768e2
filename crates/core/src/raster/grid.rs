//! Main Image type

use crate::error::{Error, Result};
use ndarray::{Array2, ArrayView2};

/// An 8-bit grayscale image.
///
/// `Image` stores gray levels (0..=255) in a 2D grid in row-major order.
/// It is built once by a loader or a constructor and read afterwards;
/// there is no in-place mutation API.
///
/// # Example
///
/// ```
/// use texnet_core::Image;
///
/// let image = Image::from_fn(4, 4, |row, col| ((row + col) * 10) as u8);
/// assert_eq!(image.get(1, 2).unwrap(), 30);
/// assert!(image.is_square());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Image {
    /// Pixel data stored as (row, col)
    data: Array2<u8>,
}

impl Image {
    /// Create a new image filled with zeros
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            data: Array2::zeros((rows, cols)),
        }
    }

    /// Create a new image filled with a single gray level
    pub fn filled(rows: usize, cols: usize, value: u8) -> Self {
        Self {
            data: Array2::from_elem((rows, cols), value),
        }
    }

    /// Create an image from row-major pixel data
    pub fn from_vec(data: Vec<u8>, rows: usize, cols: usize) -> Result<Self> {
        if data.len() != rows * cols {
            return Err(Error::InvalidDimensions {
                width: cols,
                height: rows,
            });
        }

        let array = Array2::from_shape_vec((rows, cols), data)
            .map_err(|e| Error::Other(e.to_string()))?;

        Ok(Self { data: array })
    }

    /// Create an image from an ndarray
    pub fn from_array(data: Array2<u8>) -> Self {
        Self { data }
    }

    /// Create an image by evaluating `f(row, col)` for every pixel
    pub fn from_fn<F>(rows: usize, cols: usize, mut f: F) -> Self
    where
        F: FnMut(usize, usize) -> u8,
    {
        Self {
            data: Array2::from_shape_fn((rows, cols), |(r, c)| f(r, c)),
        }
    }

    // Dimensions

    /// Number of rows
    pub fn rows(&self) -> usize {
        self.data.nrows()
    }

    /// Number of columns
    pub fn cols(&self) -> usize {
        self.data.ncols()
    }

    /// Dimensions as (rows, cols)
    pub fn shape(&self) -> (usize, usize) {
        self.data.dim()
    }

    /// Total number of pixels
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the image has no pixels
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Whether rows == cols
    pub fn is_square(&self) -> bool {
        self.rows() == self.cols()
    }

    // Data access

    /// Get the gray level at (row, col)
    pub fn get(&self, row: usize, col: usize) -> Result<u8> {
        self.data
            .get((row, col))
            .copied()
            .ok_or(Error::IndexOutOfBounds {
                row,
                col,
                rows: self.rows(),
                cols: self.cols(),
            })
    }

    /// Get the gray level at (row, col) without bounds checking
    ///
    /// # Safety
    /// Caller must ensure row < self.rows() and col < self.cols()
    pub unsafe fn get_unchecked(&self, row: usize, col: usize) -> u8 {
        unsafe { *self.data.uget((row, col)) }
    }

    /// Get a view of the underlying data
    pub fn view(&self) -> ArrayView2<'_, u8> {
        self.data.view()
    }

    /// Get a reference to the underlying array
    pub fn data(&self) -> &Array2<u8> {
        &self.data
    }

    /// Consume the image and return the underlying array
    pub fn into_array(self) -> Array2<u8> {
        self.data
    }

    // Statistics

    /// Smallest and largest gray level, `None` for an empty image
    pub fn min_max(&self) -> Option<(u8, u8)> {
        let mut iter = self.data.iter().copied();
        let first = iter.next()?;
        Some(iter.fold((first, first), |(lo, hi), v| (lo.min(v), hi.max(v))))
    }

    /// Basic intensity statistics
    pub fn statistics(&self) -> ImageStatistics {
        let (min, max) = match self.min_max() {
            Some((lo, hi)) => (Some(lo), Some(hi)),
            None => (None, None),
        };
        let mean = if self.is_empty() {
            None
        } else {
            let sum: u64 = self.data.iter().map(|&v| v as u64).sum();
            Some(sum as f64 / self.len() as f64)
        };

        ImageStatistics {
            min,
            max,
            mean,
            pixel_count: self.len(),
        }
    }
}

/// Basic statistics for an image
#[derive(Debug, Clone, PartialEq)]
pub struct ImageStatistics {
    pub min: Option<u8>,
    pub max: Option<u8>,
    pub mean: Option<f64>,
    pub pixel_count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_creation() {
        let image = Image::new(100, 200);
        assert_eq!(image.rows(), 100);
        assert_eq!(image.cols(), 200);
        assert_eq!(image.shape(), (100, 200));
        assert!(!image.is_square());
    }

    #[test]
    fn test_image_from_vec_checks_length() {
        assert!(Image::from_vec(vec![0; 15], 4, 4).is_err());
        let image = Image::from_vec((0..16).collect(), 4, 4).unwrap();
        assert_eq!(image.get(3, 3).unwrap(), 15);
    }

    #[test]
    fn test_image_access_out_of_bounds() {
        let image = Image::filled(3, 3, 7);
        assert_eq!(image.get(2, 2).unwrap(), 7);
        assert!(matches!(
            image.get(3, 0),
            Err(Error::IndexOutOfBounds { row: 3, col: 0, .. })
        ));
    }

    #[test]
    fn test_image_statistics() {
        let image = Image::from_fn(10, 10, |i, j| (i * 10 + j) as u8);

        let stats = image.statistics();
        assert_eq!(stats.min, Some(0));
        assert_eq!(stats.max, Some(99));
        assert_eq!(stats.pixel_count, 100);
        assert!((stats.mean.unwrap() - 49.5).abs() < 1e-12);
    }

    #[test]
    fn test_empty_image_statistics() {
        let stats = Image::new(0, 0).statistics();
        assert_eq!(stats.min, None);
        assert_eq!(stats.mean, None);
    }
}
