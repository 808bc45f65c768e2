//! Texture extraction settings

use crate::error::{Error, Result};

/// Maximum number of gray levels an 8-bit image can populate
pub const MAX_LEVELS: usize = 256;

/// Settings shared by the offset search, the feature extractor and the
/// image loader.
#[derive(Debug, Clone, PartialEq)]
pub struct TextureConfig {
    /// Candidate pixel distances (default: `[1]`)
    pub distances: Vec<usize>,
    /// Candidate angles in degrees (default: `[0, 45, 90, 135]`)
    pub angles: Vec<i32>,
    /// Number of gray levels L (default: 256)
    pub levels: usize,
    /// Square side length images are resized to on load; `None` keeps the
    /// native size (default: 256)
    pub image_size: Option<u32>,
    /// Symmetrize the optimal matrix. Offset scoring always uses the
    /// non-symmetric counts.
    pub symmetric: bool,
}

impl Default for TextureConfig {
    fn default() -> Self {
        Self {
            distances: vec![1],
            angles: vec![0, 45, 90, 135],
            levels: MAX_LEVELS,
            image_size: Some(256),
            symmetric: false,
        }
    }
}

impl TextureConfig {
    /// Config searching the given distances and angles, defaults elsewhere
    pub fn with_offsets(distances: Vec<usize>, angles: Vec<i32>) -> Self {
        Self {
            distances,
            angles,
            ..Default::default()
        }
    }

    /// Check every field, returning the first offending one.
    pub fn validate(&self) -> Result<()> {
        validate_offsets(&self.distances, &self.angles)?;
        if self.levels == 0 || self.levels > MAX_LEVELS {
            return Err(Error::invalid_parameter(
                "levels",
                self.levels,
                format!("must be in 1..={MAX_LEVELS}"),
            ));
        }
        if self.image_size == Some(0) {
            return Err(Error::invalid_parameter("image_size", 0, "must be > 0"));
        }
        Ok(())
    }

    /// Number of (distance, angle) candidates
    pub fn candidate_count(&self) -> usize {
        self.distances.len() * self.angles.len()
    }
}

/// Reject empty candidate lists and zero distances.
pub fn validate_offsets(distances: &[usize], angles: &[i32]) -> Result<()> {
    if distances.is_empty() {
        return Err(Error::invalid_parameter(
            "distances",
            "[]",
            "at least one distance is required",
        ));
    }
    if angles.is_empty() {
        return Err(Error::invalid_parameter(
            "angles",
            "[]",
            "at least one angle is required",
        ));
    }
    if distances.contains(&0) {
        return Err(Error::invalid_parameter(
            "distances",
            format!("{distances:?}"),
            "distances must be > 0",
        ));
    }
    Ok(())
}
