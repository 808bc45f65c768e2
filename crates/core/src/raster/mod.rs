//! Grayscale image grid

mod grid;

pub use grid::{Image, ImageStatistics};
