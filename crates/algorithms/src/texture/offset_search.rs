//! Optimal offset search
//!
//! Scores every (distance, angle) candidate with the chi-square statistic of
//! its raw count matrix and keeps the best one. The winning offset is then
//! used to build a normalized single-offset matrix for feature extraction.

use ndarray::Array2;
use texnet_core::config::validate_offsets;
use texnet_core::{Algorithm, Cooccurrence, Error, Image, Offset, Result, TextureConfig};
use tracing::debug;

use super::chi_square::chi_square;
use super::glcm::{CooccurrenceBuilder, Glcm};

/// Scores of every candidate in a count stack
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreScan {
    /// Chi-square score per (distance index, angle index)
    pub scores: Array2<f64>,
    /// Index of the first maximum in row-major order
    pub best: (usize, usize),
    /// Best offset known after each candidate, in scan order
    pub trace: Vec<Offset>,
}

/// Result of an optimal offset search
#[derive(Debug, Clone)]
pub struct OffsetSearch {
    /// Normalized matrix at the optimal offset, shape `(L, L, 1, 1)`
    pub matrix: Cooccurrence,
    /// The selected offset
    pub offset: Offset,
    /// Its (distance index, angle index) in the score grid
    pub best_index: (usize, usize),
    /// Chi-square score per candidate, shape `(distances, angles)`
    pub scores: Array2<f64>,
    /// Best offset known after each candidate; the last entry is `offset`
    pub trace: Vec<Offset>,
}

impl OffsetSearch {
    /// Score of the selected offset
    pub fn best_score(&self) -> f64 {
        self.scores[self.best_index]
    }
}

/// Optimal offset algorithm using the bundled [`Glcm`] builder
#[derive(Debug, Clone, Default)]
pub struct OptimalOffset;

impl Algorithm for OptimalOffset {
    type Input = Image;
    type Output = OffsetSearch;
    type Params = TextureConfig;
    type Error = Error;

    fn name(&self) -> &'static str {
        "OptimalOffset"
    }

    fn description(&self) -> &'static str {
        "Select the distance/angle offset with the highest chi-square score"
    }

    fn execute(&self, input: Self::Input, params: Self::Params) -> Result<Self::Output> {
        params.validate()?;
        select_offset_with(
            &Glcm::new(params.levels),
            &input,
            &params.distances,
            &params.angles,
            params.symmetric,
        )
    }
}

/// Score every slice of a raw count stack.
///
/// Slices are visited distance-index outer, angle-index inner. A candidate
/// replaces the current best only when its score is strictly greater, so
/// ties resolve to the earliest candidate and equal scores everywhere
/// select index `(0, 0)`.
pub fn scan_scores(counts: &Cooccurrence) -> Result<ScoreScan> {
    let nd = counts.distances().len();
    let na = counts.angles().len();
    validate_offsets(counts.distances(), counts.angles())?;

    let mut scores = Array2::zeros((nd, na));
    let mut best = (0, 0);
    let mut best_score = f64::NEG_INFINITY;
    let mut trace = Vec::with_capacity(nd * na);

    for d in 0..nd {
        for a in 0..na {
            let score = chi_square(counts.slice(d, a)?);
            scores[[d, a]] = score;
            if score > best_score {
                best_score = score;
                best = (d, a);
            }
            trace.push(Offset::new(counts.distances()[best.0], counts.angles()[best.1]));
        }
    }

    Ok(ScoreScan {
        scores,
        best,
        trace,
    })
}

/// Find the optimal offset of an image with 256 gray levels.
///
/// Shorthand for [`select_offset_with`] using [`Glcm::default`] and a
/// non-symmetric optimal matrix.
pub fn select_offset(image: &Image, distances: &[usize], angles: &[i32]) -> Result<OffsetSearch> {
    select_offset_with(&Glcm::default(), image, distances, angles, false)
}

/// Find the optimal offset of an image.
///
/// 1. builds the raw (non-normalized, non-symmetric) count stack for every
///    candidate,
/// 2. scores each slice with [`chi_square`] (see [`scan_scores`]),
/// 3. rebuilds a normalized matrix restricted to the winning offset,
///    symmetrized only when `symmetric` is set.
///
/// # Arguments
/// * `builder` - Co-occurrence matrix source
/// * `image` - Input image
/// * `distances` - Candidate distances, non-empty, each > 0
/// * `angles` - Candidate angles in degrees, non-empty
/// * `symmetric` - Symmetrize the returned optimal matrix
pub fn select_offset_with<B>(
    builder: &B,
    image: &Image,
    distances: &[usize],
    angles: &[i32],
    symmetric: bool,
) -> Result<OffsetSearch>
where
    B: CooccurrenceBuilder + ?Sized,
{
    validate_offsets(distances, angles)?;

    let counts = builder.build(image, distances, angles, false, false)?;
    if counts.distances() != distances || counts.angles() != angles {
        return Err(Error::Algorithm(format!(
            "builder returned offsets {:?} x {:?}, requested {:?} x {:?}",
            counts.distances(),
            counts.angles(),
            distances,
            angles
        )));
    }

    let ScoreScan {
        scores,
        best,
        trace,
    } = scan_scores(&counts)?;
    let offset = Offset::new(distances[best.0], angles[best.1]);
    debug!(
        "Optimal offset {} (score {:.3}) among {} candidates",
        offset,
        scores[best],
        scores.len()
    );

    let matrix = builder.build(image, &[offset.distance], &[offset.angle], symmetric, true)?;

    Ok(OffsetSearch {
        matrix,
        offset,
        best_index: best,
        scores,
        trace,
    })
}
