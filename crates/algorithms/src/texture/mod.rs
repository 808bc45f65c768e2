//! Co-occurrence texture analysis
//!
//! - **GLCM**: gray-level co-occurrence matrices per (distance, angle) offset
//! - **Chi-square**: goodness of fit of a count matrix against independence
//! - **Offset search**: the offset whose matrix scores highest
//! - **Haralick**: nine statistics of a normalized matrix

mod chi_square;
mod glcm;
mod haralick;
mod offset_search;

pub use chi_square::{chi_square, expected_frequencies, ChiSquare};
pub use glcm::{graycomatrix, CooccurrenceBuilder, Glcm, GlcmParams, Graycomatrix};
pub use haralick::{
    haralick, sum_difference, Haralick, HaralickFeatures, SumDifference, FEATURE_NAMES,
};
pub use offset_search::{
    scan_scores, select_offset, select_offset_with, OffsetSearch, OptimalOffset, ScoreScan,
};
