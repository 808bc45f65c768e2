//! Chi-square goodness of fit of a co-occurrence matrix
//!
//! Measures how far observed counts deviate from the counts expected if the
//! row and column gray levels were independent (Zucker & Terzopoulos, 1980).
//! Larger values mean the offset captures more texture structure.

use ndarray::{Array2, ArrayView2, Axis};
use texnet_core::{Algorithm, Error, Result};

/// Chi-square scoring algorithm
#[derive(Debug, Clone, Default)]
pub struct ChiSquare;

impl Algorithm for ChiSquare {
    type Input = Array2<f64>;
    type Output = f64;
    type Params = ();
    type Error = Error;

    fn name(&self) -> &'static str {
        "ChiSquare"
    }

    fn description(&self) -> &'static str {
        "Chi-square deviation of a count matrix from row/column independence"
    }

    fn execute(&self, input: Self::Input, _params: Self::Params) -> Result<Self::Output> {
        Ok(chi_square(input.view()))
    }
}

/// Independence expectation `E[i, j] = row_total[i] * col_total[j] / total`.
///
/// All zeros when the matrix sums to zero.
pub fn expected_frequencies(matrix: ArrayView2<f64>) -> Array2<f64> {
    let total = matrix.sum();
    if total == 0.0 {
        return Array2::zeros(matrix.dim());
    }
    let row_totals = matrix.sum_axis(Axis(1));
    let col_totals = matrix.sum_axis(Axis(0));
    Array2::from_shape_fn(matrix.dim(), |(i, j)| row_totals[i] * col_totals[j] / total)
}

/// Chi-square score of a raw count matrix.
///
/// `Σ (O - E)² / E` over every cell with `E != 0`; cells with `E == 0`
/// contribute nothing. An all-zero matrix scores 0.
///
/// The input should hold raw counts, not probabilities: the score scales
/// with the number of observations.
pub fn chi_square(matrix: ArrayView2<f64>) -> f64 {
    let expected = expected_frequencies(matrix);
    matrix
        .iter()
        .zip(expected.iter())
        .filter(|&(_, &e)| e != 0.0)
        .map(|(&o, &e)| {
            let diff = o - e;
            diff * diff / e
        })
        .sum()
}
