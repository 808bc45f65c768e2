//! Haralick texture features
//!
//! Closed-form statistics of a normalized co-occurrence matrix
//! (Haralick, Shanmugam & Dinstein, 1973):
//!
//! - **Contrast group**: homogeneity, contrast
//! - **Orderliness group**: angular second moment, energy
//! - **Descriptive group**: correlation, mean, standard deviation,
//!   cluster shade, cluster prominence

use ndarray::{Array1, Array2, ArrayView2, Axis};
use texnet_core::{Algorithm, Error, Result};

/// Feature names in output order
pub const FEATURE_NAMES: [&str; 9] = [
    "homogeneity",
    "asm",
    "contrast",
    "energy",
    "correlation",
    "mean",
    "stdev",
    "cluster_shade",
    "cluster_prominence",
];

/// The nine Haralick features of one matrix
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HaralickFeatures {
    /// Σ p / (1 + (i-j)²), 1 for a purely diagonal matrix
    pub homogeneity: f64,
    /// Angular second moment, Σ p²
    pub asm: f64,
    /// Σ p (i-j)²
    pub contrast: f64,
    /// √asm
    pub energy: f64,
    /// Linear dependency of neighbouring gray levels; 1 when either
    /// marginal has zero variance
    pub correlation: f64,
    /// Mean of the sum distribution p₊
    pub mean: f64,
    /// Standard deviation of the sum distribution p₊
    pub stdev: f64,
    /// Σ (i+j-μx-μy)³ p
    pub cluster_shade: f64,
    /// Σ (i+j-μx-μy)⁴ p
    pub cluster_prominence: f64,
}

impl HaralickFeatures {
    /// Features in the order of [`FEATURE_NAMES`]
    pub fn to_array(&self) -> [f64; 9] {
        [
            self.homogeneity,
            self.asm,
            self.contrast,
            self.energy,
            self.correlation,
            self.mean,
            self.stdev,
            self.cluster_shade,
            self.cluster_prominence,
        ]
    }

    pub fn to_vec(&self) -> Vec<f64> {
        self.to_array().to_vec()
    }

    /// (name, value) pairs in output order
    pub fn named(&self) -> impl Iterator<Item = (&'static str, f64)> {
        FEATURE_NAMES.into_iter().zip(self.to_array())
    }

    /// No NaN or infinite entry
    pub fn is_finite(&self) -> bool {
        self.to_array().iter().all(|v| v.is_finite())
    }
}

impl From<HaralickFeatures> for [f64; 9] {
    fn from(features: HaralickFeatures) -> Self {
        features.to_array()
    }
}

/// Sum and difference distributions of a matrix
#[derive(Debug, Clone, PartialEq)]
pub struct SumDifference {
    /// `plus[k] = Σ_{i+j=k} p[i, j]`, length 2L
    pub plus: Array1<f64>,
    /// `minus[k] = Σ_{|i-j|=k} p[i, j]`, length L
    pub minus: Array1<f64>,
}

/// Haralick feature algorithm
#[derive(Debug, Clone, Default)]
pub struct Haralick;

impl Algorithm for Haralick {
    type Input = Array2<f64>;
    type Output = HaralickFeatures;
    type Params = ();
    type Error = Error;

    fn name(&self) -> &'static str {
        "Haralick"
    }

    fn description(&self) -> &'static str {
        "Nine Haralick texture statistics of a normalized co-occurrence matrix"
    }

    fn execute(&self, input: Self::Input, _params: Self::Params) -> Result<Self::Output> {
        haralick(input.view())
    }
}

/// Aggregate a square matrix along its anti-diagonals (i + j) and
/// diagonals (|i - j|).
pub fn sum_difference(matrix: ArrayView2<f64>) -> SumDifference {
    let n = matrix.nrows();
    let mut plus = Array1::zeros(2 * n);
    let mut minus = Array1::zeros(n);
    for ((i, j), &p) in matrix.indexed_iter() {
        plus[i + j] += p;
        minus[i.abs_diff(j)] += p;
    }
    SumDifference { plus, minus }
}

/// Compute the Haralick features of a normalized L×L matrix.
///
/// The matrix should sum to 1; feed the single slice of the optimal matrix,
/// not raw counts. Marginals are taken from the matrix divided by its sum.
///
/// # Errors
/// [`Error::InvalidDimensions`] when the matrix is not square.
pub fn haralick(matrix: ArrayView2<f64>) -> Result<HaralickFeatures> {
    let (rows, cols) = matrix.dim();
    if rows != cols {
        return Err(Error::InvalidDimensions {
            width: cols,
            height: rows,
        });
    }

    let mut homogeneity = 0.0;
    let mut contrast = 0.0;
    let mut asm = 0.0;
    for ((i, j), &p) in matrix.indexed_iter() {
        let diff = i as f64 - j as f64;
        let diff2 = diff * diff;
        homogeneity += p / (1.0 + diff2);
        contrast += p * diff2;
        asm += p * p;
    }
    let energy = asm.sqrt();

    // Marginals
    let total = matrix.sum();
    let scale = if total > 0.0 { 1.0 / total } else { 1.0 };
    let px = matrix.sum_axis(Axis(1)) * scale;
    let py = matrix.sum_axis(Axis(0)) * scale;

    let (ux, vx) = moments(&px);
    let (uy, vy) = moments(&py);
    let sx = vx.sqrt();
    let sy = vy.sqrt();

    let correlation = if sx == 0.0 || sy == 0.0 {
        1.0
    } else {
        let sum_ij: f64 = matrix
            .indexed_iter()
            .map(|((i, j), &p)| (i * j) as f64 * p)
            .sum::<f64>()
            * scale;
        (sum_ij - ux * uy) / (sx * sy)
    };

    let SumDifference { plus, .. } = sum_difference(matrix);
    let (mean, var_plus) = moments(&plus);
    let stdev = var_plus.sqrt();

    let mut cluster_shade = 0.0;
    let mut cluster_prominence = 0.0;
    for ((i, j), &p) in matrix.indexed_iter() {
        let t = (i + j) as f64 - ux - uy;
        let t3 = t * t * t;
        cluster_shade += t3 * p;
        cluster_prominence += t3 * t * p;
    }

    Ok(HaralickFeatures {
        homogeneity,
        asm,
        contrast,
        energy,
        correlation,
        mean,
        stdev,
        cluster_shade,
        cluster_prominence,
    })
}

/// Mean and variance of an index-valued distribution.
///
/// Variance is `E[k²] - E[k]²`, clamped at zero against rounding.
fn moments(dist: &Array1<f64>) -> (f64, f64) {
    let mut mean = 0.0;
    let mut second = 0.0;
    for (k, &p) in dist.iter().enumerate() {
        let k = k as f64;
        mean += k * p;
        second += k * k * p;
    }
    (mean, (second - mean * mean).max(0.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    const TOL: f64 = 1e-9;

    fn one_hot(n: usize, i: usize, j: usize) -> Array2<f64> {
        let mut m = Array2::zeros((n, n));
        m[[i, j]] = 1.0;
        m
    }

    fn uniform_diagonal(n: usize) -> Array2<f64> {
        Array2::from_shape_fn((n, n), |(i, j)| if i == j { 1.0 / n as f64 } else { 0.0 })
    }

    #[test]
    fn test_one_hot_origin() {
        let f = haralick(one_hot(8, 0, 0).view()).unwrap();
        assert_eq!(f.homogeneity, 1.0);
        assert_eq!(f.contrast, 0.0);
        assert_eq!(f.asm, 1.0);
        assert_eq!(f.energy, 1.0);
        assert_eq!(f.correlation, 1.0);
        assert_eq!(f.mean, 0.0);
        assert_eq!(f.stdev, 0.0);
        assert!(f.is_finite());
    }

    #[test]
    fn test_zero_marginal_variance_gives_unit_correlation() {
        // all mass in row 2: the row marginal is constant
        let mut m = Array2::zeros((5, 5));
        m[[2, 0]] = 0.25;
        m[[2, 1]] = 0.5;
        m[[2, 4]] = 0.25;
        let f = haralick(m.view()).unwrap();
        assert_eq!(f.correlation, 1.0);

        // all mass in column 2
        let f = haralick(m.t().view()).unwrap();
        assert_eq!(f.correlation, 1.0);
    }

    #[test]
    fn test_diagonal_correlation_is_one() {
        let f = haralick(uniform_diagonal(4).view()).unwrap();
        assert!((f.correlation - 1.0).abs() < TOL);
        assert_eq!(f.contrast, 0.0);
        assert!((f.homogeneity - 1.0).abs() < TOL);
    }

    #[test]
    fn test_anti_diagonal_correlation_is_minus_one() {
        let m = Array2::from_shape_fn((4, 4), |(i, j)| if i + j == 3 { 0.25 } else { 0.0 });
        let f = haralick(m.view()).unwrap();
        assert!((f.correlation + 1.0).abs() < TOL);
        // (i-j)² over the anti-diagonal: 9, 1, 1, 9
        assert!((f.contrast - 5.0).abs() < TOL);
    }

    #[test]
    fn test_off_diagonal_pair() {
        let m = array![[0.0, 0.5], [0.5, 0.0]];
        let f = haralick(m.view()).unwrap();
        assert!((f.contrast - 1.0).abs() < TOL);
        assert!((f.homogeneity - 0.5).abs() < TOL);
        assert!((f.asm - 0.5).abs() < TOL);
        assert!((f.mean - 1.0).abs() < TOL);
        assert!(f.stdev.abs() < TOL);
    }

    #[test]
    fn test_energy_is_sqrt_asm() {
        let m = Array2::from_shape_fn((6, 6), |(i, j)| ((i * 7 + j * 3) % 5 + 1) as f64);
        let m = &m / m.sum();
        let f = haralick(m.view()).unwrap();
        assert!((f.energy - f.asm.sqrt()).abs() < TOL);
    }

    #[test]
    fn test_symmetric_mean_is_twice_marginal_mean() {
        let a = Array2::from_shape_fn((6, 6), |(i, j)| ((i * 5 + j * 2) % 7) as f64);
        let sym = &a + &a.t();
        let sym = &sym / sym.sum();

        let px = sym.sum_axis(Axis(1));
        let ux: f64 = px.iter().enumerate().map(|(i, &p)| i as f64 * p).sum();

        let f = haralick(sym.view()).unwrap();
        assert!((f.mean - 2.0 * ux).abs() < TOL);
    }

    #[test]
    fn test_cluster_statistics_on_diagonal() {
        // t = i + j - 3 over the diagonal: -3, -1, 1, 3
        let f = haralick(uniform_diagonal(4).view()).unwrap();
        assert!(f.cluster_shade.abs() < TOL);
        assert!((f.cluster_prominence - 41.0).abs() < TOL);
    }

    #[test]
    fn test_sum_difference_distributions() {
        let m = array![[0.1, 0.2], [0.3, 0.4]];
        let sd = sum_difference(m.view());
        assert_eq!(sd.plus.len(), 4);
        assert_eq!(sd.minus.len(), 2);
        assert!((sd.plus[0] - 0.1).abs() < TOL);
        assert!((sd.plus[1] - 0.5).abs() < TOL);
        assert!((sd.plus[2] - 0.4).abs() < TOL);
        assert_eq!(sd.plus[3], 0.0);
        assert!((sd.minus[0] - 0.5).abs() < TOL);
        assert!((sd.minus[1] - 0.5).abs() < TOL);
    }

    #[test]
    fn test_output_order() {
        let f = HaralickFeatures {
            homogeneity: 1.0,
            asm: 2.0,
            contrast: 3.0,
            energy: 4.0,
            correlation: 5.0,
            mean: 6.0,
            stdev: 7.0,
            cluster_shade: 8.0,
            cluster_prominence: 9.0,
        };
        assert_eq!(f.to_array(), [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0]);
        let names: Vec<_> = f.named().map(|(name, _)| name).collect();
        assert_eq!(names, FEATURE_NAMES);
    }

    #[test]
    fn test_zero_matrix_stays_finite() {
        let f = haralick(Array2::<f64>::zeros((4, 4)).view()).unwrap();
        assert!(f.is_finite());
        assert_eq!(f.correlation, 1.0);
    }

    #[test]
    fn test_rejects_non_square() {
        let m = Array2::<f64>::zeros((3, 4));
        assert!(matches!(
            haralick(m.view()),
            Err(Error::InvalidDimensions { width: 4, height: 3 })
        ));
    }

    #[test]
    fn test_algorithm_wrapper() {
        let f = Haralick.execute_default(one_hot(3, 1, 1)).unwrap();
        assert_eq!(f.mean, 2.0);
        assert_eq!(f.homogeneity, 1.0);
    }
}
