//! # texnet core
//!
//! Core types and I/O for the texnet texture-descriptor library.
//!
//! This crate provides:
//! - `Image`: 8-bit grayscale pixel grid
//! - `Offset`: (distance, angle) pixel-pair candidate
//! - `Cooccurrence`: 4-D stack of gray-level co-occurrence matrices
//! - `TextureConfig`: search and loading settings
//! - Algorithm trait for a consistent API
//! - Image loading through the `image` crate (feature `io`)

pub mod config;
pub mod cooccurrence;
pub mod error;
#[cfg(feature = "io")]
pub mod io;
pub mod offset;
pub mod raster;

pub use config::TextureConfig;
pub use cooccurrence::Cooccurrence;
pub use error::{Error, Result};
pub use offset::Offset;
pub use raster::Image;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::config::TextureConfig;
    pub use crate::cooccurrence::Cooccurrence;
    pub use crate::error::{Error, Result};
    pub use crate::offset::Offset;
    pub use crate::raster::Image;
    pub use crate::Algorithm;
}

/// Core trait for all algorithms in texnet.
///
/// Algorithms are pure functions that transform input data according to parameters.
pub trait Algorithm {
    /// Input type for the algorithm
    type Input;
    /// Output type for the algorithm
    type Output;
    /// Parameters controlling algorithm behavior
    type Params: Default;
    /// Error type for algorithm execution
    type Error: std::error::Error;

    /// Returns the algorithm name
    fn name(&self) -> &'static str;

    /// Returns a description of what the algorithm does
    fn description(&self) -> &'static str;

    /// Execute the algorithm
    fn execute(&self, input: Self::Input, params: Self::Params) -> std::result::Result<Self::Output, Self::Error>;

    /// Execute with default parameters
    fn execute_default(&self, input: Self::Input) -> std::result::Result<Self::Output, Self::Error> {
        self.execute(input, Self::Params::default())
    }
}
