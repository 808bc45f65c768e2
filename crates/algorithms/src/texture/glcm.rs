//! Gray-Level Co-occurrence Matrix (GLCM) construction
//!
//! Tallies, for every (distance, angle) offset, how often gray level `i`
//! at `(r, c)` co-occurs with gray level `j` at `(r + d_row, c + d_col)`.
//! Pixels whose partner falls outside the image are not counted.

use ndarray::Array4;
use crate::maybe_rayon::*;
use texnet_core::config::{validate_offsets, MAX_LEVELS};
use texnet_core::{Algorithm, Cooccurrence, Error, Image, Offset, Result};

/// Parameters for GLCM computation
#[derive(Debug, Clone, PartialEq)]
pub struct GlcmParams {
    /// Pixel distances (default: `[1]`)
    pub distances: Vec<usize>,
    /// Angles in degrees (default: `[0]`)
    pub angles: Vec<i32>,
    /// Number of gray levels; every pixel must be below it (default: 256)
    pub levels: usize,
    /// Add the transpose to each matrix (default: false)
    pub symmetric: bool,
    /// Divide each matrix by its sum (default: false)
    pub normalize: bool,
}

impl Default for GlcmParams {
    fn default() -> Self {
        Self {
            distances: vec![1],
            angles: vec![0],
            levels: MAX_LEVELS,
            symmetric: false,
            normalize: false,
        }
    }
}

/// Source of co-occurrence matrices for the offset search.
///
/// [`Glcm`] is the bundled implementation; anything producing a
/// `(L, L, distances.len(), angles.len())` stack can stand in for it.
pub trait CooccurrenceBuilder: Sync {
    fn build(
        &self,
        image: &Image,
        distances: &[usize],
        angles: &[i32],
        symmetric: bool,
        normalize: bool,
    ) -> Result<Cooccurrence>;
}

/// Direct pixel-pair counting with a fixed number of gray levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Glcm {
    pub levels: usize,
}

impl Glcm {
    pub fn new(levels: usize) -> Self {
        Self { levels }
    }
}

impl Default for Glcm {
    fn default() -> Self {
        Self { levels: MAX_LEVELS }
    }
}

impl CooccurrenceBuilder for Glcm {
    fn build(
        &self,
        image: &Image,
        distances: &[usize],
        angles: &[i32],
        symmetric: bool,
        normalize: bool,
    ) -> Result<Cooccurrence> {
        graycomatrix(
            image,
            &GlcmParams {
                distances: distances.to_vec(),
                angles: angles.to_vec(),
                levels: self.levels,
                symmetric,
                normalize,
            },
        )
    }
}

/// GLCM algorithm
#[derive(Debug, Clone, Default)]
pub struct Graycomatrix;

impl Algorithm for Graycomatrix {
    type Input = Image;
    type Output = Cooccurrence;
    type Params = GlcmParams;
    type Error = Error;

    fn name(&self) -> &'static str {
        "Graycomatrix"
    }

    fn description(&self) -> &'static str {
        "Gray-level co-occurrence matrices for a set of distance/angle offsets"
    }

    fn execute(&self, input: Self::Input, params: Self::Params) -> Result<Self::Output> {
        graycomatrix(&input, &params)
    }
}

/// Compute the co-occurrence stack of an image.
///
/// Offsets are counted independently (in parallel when the `parallel`
/// feature is on). Slices that sum to zero stay zero under `normalize`.
///
/// # Arguments
/// * `image` - Input image; every pixel must be `< params.levels`
/// * `params` - Offsets, level count and symmetric/normalize flags
pub fn graycomatrix(image: &Image, params: &GlcmParams) -> Result<Cooccurrence> {
    validate_offsets(&params.distances, &params.angles)?;
    let levels = params.levels;
    if levels == 0 || levels > MAX_LEVELS {
        return Err(Error::invalid_parameter(
            "levels",
            levels,
            format!("must be in 1..={MAX_LEVELS}"),
        ));
    }
    if let Some((_, max)) = image.min_max() {
        if max as usize >= levels {
            return Err(Error::invalid_parameter(
                "levels",
                levels,
                format!("image contains gray level {max}"),
            ));
        }
    }

    let nd = params.distances.len();
    let na = params.angles.len();
    let offsets = Offset::candidates(&params.distances, &params.angles);

    let slices: Vec<Vec<f64>> = offsets
        .into_par_iter()
        .map(|offset| {
            let mut counts = count_pairs(image, offset, levels);
            if params.symmetric {
                symmetrize(&mut counts, levels);
            }
            if params.normalize {
                normalize(&mut counts);
            }
            counts
        })
        .collect();

    let data = Array4::from_shape_fn((levels, levels, nd, na), |(i, j, d, a)| {
        slices[d * na + a][i * levels + j]
    });

    Cooccurrence::from_parts(
        data,
        params.distances.clone(),
        params.angles.clone(),
        params.symmetric,
        params.normalize,
    )
}

/// Row-major `levels × levels` tally for a single offset
fn count_pairs(image: &Image, offset: Offset, levels: usize) -> Vec<f64> {
    let (rows, cols) = image.shape();
    let (rows, cols) = (rows as isize, cols as isize);
    let (d_row, d_col) = offset.displacement();

    let row_start = 0_isize.max(-d_row);
    let row_end = rows.min(rows - d_row);
    let col_start = 0_isize.max(-d_col);
    let col_end = cols.min(cols - d_col);

    let mut counts = vec![0.0; levels * levels];
    for r in row_start..row_end {
        for c in col_start..col_end {
            let i = unsafe { image.get_unchecked(r as usize, c as usize) } as usize;
            let j = unsafe {
                image.get_unchecked((r + d_row) as usize, (c + d_col) as usize)
            } as usize;
            counts[i * levels + j] += 1.0;
        }
    }
    counts
}

/// P + Pᵀ in place
fn symmetrize(counts: &mut [f64], levels: usize) {
    for i in 0..levels {
        for j in i..levels {
            let sum = counts[i * levels + j] + counts[j * levels + i];
            counts[i * levels + j] = sum;
            counts[j * levels + i] = sum;
        }
    }
}

fn normalize(counts: &mut [f64]) {
    let total: f64 = counts.iter().sum();
    if total > 0.0 {
        for v in counts.iter_mut() {
            *v /= total;
        }
    }
}
