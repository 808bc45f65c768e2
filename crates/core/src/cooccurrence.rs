//! Gray-level co-occurrence matrix container

use crate::error::{Error, Result};
use crate::offset::Offset;
use ndarray::{s, Array4, ArrayView2};

/// A stack of co-occurrence matrices, one per (distance, angle) pair.
///
/// Shape is `(levels, levels, distances.len(), angles.len())`; cell
/// `[i, j, d, a]` holds the count (or probability when normalized) of pixel
/// pairs at offset `(distances[d], angles[a])` with gray levels `i` and `j`.
#[derive(Debug, Clone, PartialEq)]
pub struct Cooccurrence {
    data: Array4<f64>,
    distances: Vec<usize>,
    angles: Vec<i32>,
    symmetric: bool,
    normalized: bool,
}

impl Cooccurrence {
    /// Wrap a 4-D tally array.
    ///
    /// Fails if the array is not `(L, L, distances.len(), angles.len())`.
    pub fn from_parts(
        data: Array4<f64>,
        distances: Vec<usize>,
        angles: Vec<i32>,
        symmetric: bool,
        normalized: bool,
    ) -> Result<Self> {
        let (li, lj, nd, na) = data.dim();
        if li != lj {
            return Err(Error::InvalidDimensions {
                width: lj,
                height: li,
            });
        }
        if nd != distances.len() || na != angles.len() {
            return Err(Error::Algorithm(format!(
                "co-occurrence array has {nd}x{na} offsets, expected {}x{}",
                distances.len(),
                angles.len()
            )));
        }
        Ok(Self {
            data,
            distances,
            angles,
            symmetric,
            normalized,
        })
    }

    /// Number of gray levels L
    pub fn levels(&self) -> usize {
        self.data.dim().0
    }

    /// (L, L, D, A)
    pub fn shape(&self) -> (usize, usize, usize, usize) {
        self.data.dim()
    }

    pub fn distances(&self) -> &[usize] {
        &self.distances
    }

    pub fn angles(&self) -> &[i32] {
        &self.angles
    }

    pub fn is_symmetric(&self) -> bool {
        self.symmetric
    }

    pub fn is_normalized(&self) -> bool {
        self.normalized
    }

    /// Offset stored at `(d_idx, a_idx)`
    pub fn offset(&self, d_idx: usize, a_idx: usize) -> Option<Offset> {
        Some(Offset::new(
            *self.distances.get(d_idx)?,
            *self.angles.get(a_idx)?,
        ))
    }

    /// The L×L matrix for one (distance, angle) index pair.
    pub fn slice(&self, d_idx: usize, a_idx: usize) -> Result<ArrayView2<'_, f64>> {
        let (_, _, nd, na) = self.data.dim();
        if d_idx >= nd || a_idx >= na {
            return Err(Error::IndexOutOfBounds {
                row: d_idx,
                col: a_idx,
                rows: nd,
                cols: na,
            });
        }
        Ok(self.data.slice(s![.., .., d_idx, a_idx]))
    }

    /// The L×L matrix for a given offset, if it was computed.
    pub fn slice_for(&self, offset: Offset) -> Option<ArrayView2<'_, f64>> {
        let d_idx = self.distances.iter().position(|&d| d == offset.distance)?;
        let a_idx = self.angles.iter().position(|&a| a == offset.angle)?;
        self.slice(d_idx, a_idx).ok()
    }

    /// Sum of every cell
    pub fn sum(&self) -> f64 {
        self.data.sum()
    }

    /// Get a reference to the underlying array
    pub fn data(&self) -> &Array4<f64> {
        &self.data
    }

    /// Consume and return the underlying array
    pub fn into_array(self) -> Array4<f64> {
        self.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Cooccurrence {
        let mut data = Array4::<f64>::zeros((3, 3, 2, 2));
        data[[0, 1, 1, 0]] = 5.0;
        data[[2, 2, 0, 1]] = 1.0;
        Cooccurrence::from_parts(data, vec![1, 2], vec![0, 90], false, false).unwrap()
    }

    #[test]
    fn test_shape_and_slices() {
        let m = sample();
        assert_eq!(m.shape(), (3, 3, 2, 2));
        assert_eq!(m.levels(), 3);
        assert_eq!(m.slice(1, 0).unwrap()[[0, 1]], 5.0);
        assert_eq!(m.slice(0, 1).unwrap()[[2, 2]], 1.0);
        assert_eq!(m.sum(), 6.0);
    }

    #[test]
    fn test_slice_out_of_range() {
        assert!(sample().slice(2, 0).is_err());
    }

    #[test]
    fn test_slice_for_offset() {
        let m = sample();
        let view = m.slice_for(Offset::new(2, 0)).unwrap();
        assert_eq!(view[[0, 1]], 5.0);
        assert!(m.slice_for(Offset::new(3, 0)).is_none());
        assert_eq!(m.offset(1, 1), Some(Offset::new(2, 90)));
    }

    #[test]
    fn test_rejects_mismatched_offsets() {
        let data = Array4::<f64>::zeros((3, 3, 1, 2));
        assert!(Cooccurrence::from_parts(data, vec![1, 2], vec![0, 90], false, false).is_err());
        let data = Array4::<f64>::zeros((3, 4, 1, 1));
        assert!(Cooccurrence::from_parts(data, vec![1], vec![0], false, false).is_err());
    }
}
