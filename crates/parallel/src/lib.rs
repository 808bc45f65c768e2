//! # texnet Parallel
//!
//! Execution strategies for per-image work.
//!
//! Images in a batch are independent, so a batch is a parallel map over
//! indices whose output keeps input order. With the `parallel` feature
//! disabled every mode runs sequentially.

pub mod strategy;

pub use strategy::{num_cpus, set_num_threads, ParallelStrategy, ProcessingMode};
