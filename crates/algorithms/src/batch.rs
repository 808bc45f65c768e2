//! Batch texture extraction
//!
//! Runs the offset search and the Haralick extractor over a list of images.
//! Images are independent; they are spread over the configured
//! [`ProcessingMode`] and results always come back in input order.

use ndarray::Array2;
use texnet_core::{Cooccurrence, Image, Offset, Result, TextureConfig};
use texnet_parallel::{ParallelStrategy, ProcessingMode};
use tracing::{debug, warn};

use crate::texture::{haralick, select_offset_with, CooccurrenceBuilder, Glcm, HaralickFeatures};

/// Parameters for batch processing
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchParams {
    /// Offsets, gray levels and symmetry of the optimal matrix
    pub config: TextureConfig,
    /// How images are spread over threads (default: all cores)
    pub mode: ProcessingMode,
}

/// Everything computed for one image
#[derive(Debug, Clone)]
pub struct ImageTexture {
    /// Normalized matrix at the optimal offset, shape `(L, L, 1, 1)`
    pub matrix: Cooccurrence,
    /// The optimal offset
    pub offset: Offset,
    /// Haralick features of `matrix`
    pub features: HaralickFeatures,
    /// Chi-square score per candidate
    pub scores: Array2<f64>,
    /// Best offset known after each candidate
    pub trace: Vec<Offset>,
}

/// Parallel per-image sequences, in input order.
///
/// `matrices`, `offsets` and `haralick` hold exactly one entry per image.
/// `offset_trace` concatenates every image's search trace (one entry per
/// candidate per image).
#[derive(Debug, Clone, Default)]
pub struct BatchOutput {
    pub matrices: Vec<Cooccurrence>,
    pub offsets: Vec<Offset>,
    pub haralick: Vec<HaralickFeatures>,
    pub offset_trace: Vec<Offset>,
}

impl BatchOutput {
    /// Number of images
    pub fn len(&self) -> usize {
        self.matrices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matrices.is_empty()
    }

    /// Append one image's results
    pub fn push(&mut self, texture: ImageTexture) {
        self.matrices.push(texture.matrix);
        self.offsets.push(texture.offset);
        self.haralick.push(texture.features);
        self.offset_trace.extend(texture.trace);
    }
}

impl FromIterator<ImageTexture> for BatchOutput {
    fn from_iter<I: IntoIterator<Item = ImageTexture>>(iter: I) -> Self {
        let mut output = BatchOutput::default();
        for texture in iter {
            output.push(texture);
        }
        output
    }
}

/// Offset search plus Haralick features for one image
pub fn image_texture(image: &Image, config: &TextureConfig) -> Result<ImageTexture> {
    image_texture_with(&Glcm::new(config.levels), image, config)
}

/// [`image_texture`] with a custom co-occurrence builder
pub fn image_texture_with<B>(builder: &B, image: &Image, config: &TextureConfig) -> Result<ImageTexture>
where
    B: CooccurrenceBuilder + ?Sized,
{
    config.validate()?;
    let search = select_offset_with(
        builder,
        image,
        &config.distances,
        &config.angles,
        config.symmetric,
    )?;
    let features = haralick(search.matrix.slice(0, 0)?)?;

    Ok(ImageTexture {
        matrix: search.matrix,
        offset: search.offset,
        features,
        scores: search.scores,
        trace: search.trace,
    })
}

/// Process a batch, failing on the first bad image (in input order).
///
/// # Returns
/// One matrix, offset and feature vector per image, in input order
pub fn process(images: &[Image], params: &BatchParams) -> Result<BatchOutput> {
    process_with(&Glcm::new(params.config.levels), images, params)
}

/// [`process`] with a custom co-occurrence builder
pub fn process_with<B>(builder: &B, images: &[Image], params: &BatchParams) -> Result<BatchOutput>
where
    B: CooccurrenceBuilder + ?Sized,
{
    params.config.validate()?;
    run(builder, images, params).into_iter().collect()
}

/// Process a batch, isolating failures.
///
/// Each image gets its own `Result`; a bad image is logged and does not
/// affect the others.
pub fn process_each(images: &[Image], params: &BatchParams) -> Vec<Result<ImageTexture>> {
    process_each_with(&Glcm::new(params.config.levels), images, params)
}

/// [`process_each`] with a custom co-occurrence builder
pub fn process_each_with<B>(
    builder: &B,
    images: &[Image],
    params: &BatchParams,
) -> Vec<Result<ImageTexture>>
where
    B: CooccurrenceBuilder + ?Sized,
{
    let results = run(builder, images, params);
    for (index, result) in results.iter().enumerate() {
        if let Err(e) = result {
            warn!("Image {index} skipped: {e}");
        }
    }
    results
}

fn run<B>(builder: &B, images: &[Image], params: &BatchParams) -> Vec<Result<ImageTexture>>
where
    B: CooccurrenceBuilder + ?Sized,
{
    debug!(
        "Processing {} images over {} candidate offsets ({:?})",
        images.len(),
        params.config.candidate_count(),
        params.mode
    );
    params.mode.par_map(0..images.len(), |index| -> Result<ImageTexture> {
        let texture = image_texture_with(builder, &images[index], &params.config)?;
        debug!("Image {index}: offset {}", texture.offset);
        Ok(texture)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use texnet_core::Error;

    fn stripes(size: usize, period: usize) -> Image {
        Image::from_fn(size, size, |_, c| if (c / period) % 2 == 0 { 10 } else { 200 })
    }

    fn gradient(size: usize) -> Image {
        Image::from_fn(size, size, |r, c| ((r * 13 + c * 7) % 256) as u8)
    }

    fn params(distances: Vec<usize>, angles: Vec<i32>) -> BatchParams {
        BatchParams {
            config: TextureConfig::with_offsets(distances, angles),
            mode: ProcessingMode::Sequential,
        }
    }

    #[test]
    fn test_one_entry_per_image() {
        let images = vec![stripes(16, 2), gradient(16), stripes(16, 3)];
        let out = process(&images, &params(vec![1, 3], vec![0, 90])).unwrap();

        assert_eq!(out.len(), 3);
        assert_eq!(out.offsets.len(), 3);
        assert_eq!(out.haralick.len(), 3);
        // 4 candidates per image
        assert_eq!(out.offset_trace.len(), 12);
        for (i, offset) in out.offsets.iter().enumerate() {
            assert_eq!(&out.offset_trace[i * 4 + 3], offset);
        }
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let images: Vec<Image> = (1..6).map(|p| stripes(20, p)).collect();
        let sequential = process(&images, &params(vec![1, 2], vec![0, 45, 90, 135])).unwrap();

        let parallel_params = BatchParams {
            mode: ProcessingMode::ParallelWith(3),
            ..params(vec![1, 2], vec![0, 45, 90, 135])
        };
        let parallel = process(&images, &parallel_params).unwrap();

        assert_eq!(sequential.offsets, parallel.offsets);
        assert_eq!(sequential.haralick, parallel.haralick);
        assert_eq!(sequential.offset_trace, parallel.offset_trace);
    }

    #[test]
    fn test_features_come_from_optimal_matrix() {
        let image = gradient(24);
        let config = TextureConfig::with_offsets(vec![1, 2, 4], vec![0, 90]);
        let texture = image_texture(&image, &config).unwrap();

        let direct = haralick(texture.matrix.slice(0, 0).unwrap()).unwrap();
        assert_eq!(texture.features, direct);
        assert_eq!(texture.matrix.distances(), &[texture.offset.distance]);
        assert_eq!(texture.scores.dim(), (3, 2));
    }

    #[test]
    fn test_failures_are_isolated() {
        let mut p = params(vec![1], vec![0, 90]);
        p.config.levels = 16;
        let images = vec![
            Image::from_fn(8, 8, |r, c| ((r + c) % 16) as u8),
            Image::filled(8, 8, 200),
            Image::from_fn(8, 8, |r, _| (r % 4) as u8),
        ];

        let each = process_each(&images, &p);
        assert_eq!(each.len(), 3);
        assert!(each[0].is_ok());
        assert!(matches!(each[1], Err(Error::InvalidParameter { name: "levels", .. })));
        assert!(each[2].is_ok());

        assert!(process(&images, &p).is_err());
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let images = vec![gradient(8)];
        assert!(process(&images, &params(vec![], vec![0])).is_err());
        assert!(process(&images, &params(vec![1], vec![])).is_err());
        assert!(process_each(&images, &params(vec![0], vec![0]))[0].is_err());
    }

    #[test]
    fn test_empty_batch() {
        let out = process(&[], &params(vec![1], vec![0])).unwrap();
        assert!(out.is_empty());
        assert!(out.offset_trace.is_empty());
    }
}
