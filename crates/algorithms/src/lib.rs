//! # texnet Algorithms
//!
//! Texture descriptors from gray-level co-occurrence matrices.
//!
//! For every image the offset search scores each candidate (distance,
//! angle) pair with a chi-square statistic, keeps the best one, builds a
//! normalized matrix at that offset and derives nine Haralick features from
//! it.
//!
//! - **texture**: GLCM builder, chi-square scorer, offset search, Haralick features
//! - **batch**: the pipeline over a list of images

pub mod batch;
pub(crate) mod maybe_rayon;
pub mod texture;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::batch::{
        image_texture, process, process_each, BatchOutput, BatchParams, ImageTexture,
    };
    pub use crate::texture::{
        chi_square, graycomatrix, haralick, select_offset, select_offset_with,
        CooccurrenceBuilder, Glcm, GlcmParams, HaralickFeatures, OffsetSearch, FEATURE_NAMES,
    };
    pub use texnet_core::prelude::*;
    pub use texnet_parallel::ProcessingMode;
}
