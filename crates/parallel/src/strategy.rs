//! Parallel processing strategies

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Processing mode for batch work
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProcessingMode {
    /// Single-threaded processing
    Sequential,
    /// Parallel processing using all available cores
    #[default]
    Parallel,
    /// Parallel with specified number of threads
    ParallelWith(usize),
}

/// Strategy for parallel execution
pub trait ParallelStrategy {
    /// Execute a function over indices in parallel
    fn par_for_each<F>(&self, range: std::ops::Range<usize>, f: F)
    where
        F: Fn(usize) + Sync + Send;

    /// Map a function over indices and collect results in index order
    fn par_map<T, F>(&self, range: std::ops::Range<usize>, f: F) -> Vec<T>
    where
        T: Send,
        F: Fn(usize) -> T + Sync + Send;
}

#[cfg(feature = "parallel")]
fn build_pool(threads: usize) -> Option<rayon::ThreadPool> {
    match rayon::ThreadPoolBuilder::new().num_threads(threads).build() {
        Ok(pool) => Some(pool),
        Err(e) => {
            tracing::warn!("Failed to build {threads}-thread pool, using global pool: {e}");
            None
        }
    }
}

impl ParallelStrategy for ProcessingMode {
    fn par_for_each<F>(&self, range: std::ops::Range<usize>, f: F)
    where
        F: Fn(usize) + Sync + Send,
    {
        match self {
            ProcessingMode::Sequential => range.for_each(f),
            #[cfg(feature = "parallel")]
            ProcessingMode::Parallel => range.into_par_iter().for_each(f),
            #[cfg(feature = "parallel")]
            ProcessingMode::ParallelWith(threads) => match build_pool(*threads) {
                Some(pool) => pool.install(|| range.into_par_iter().for_each(f)),
                None => range.into_par_iter().for_each(f),
            },
            #[cfg(not(feature = "parallel"))]
            _ => range.for_each(f),
        }
    }

    fn par_map<T, F>(&self, range: std::ops::Range<usize>, f: F) -> Vec<T>
    where
        T: Send,
        F: Fn(usize) -> T + Sync + Send,
    {
        match self {
            ProcessingMode::Sequential => range.map(f).collect(),
            #[cfg(feature = "parallel")]
            ProcessingMode::Parallel => range.into_par_iter().map(f).collect(),
            #[cfg(feature = "parallel")]
            ProcessingMode::ParallelWith(threads) => match build_pool(*threads) {
                Some(pool) => pool.install(|| range.into_par_iter().map(f).collect()),
                None => range.into_par_iter().map(f).collect(),
            },
            #[cfg(not(feature = "parallel"))]
            _ => range.map(f).collect(),
        }
    }
}

/// Get the number of worker threads available
pub fn num_cpus() -> usize {
    #[cfg(feature = "parallel")]
    {
        rayon::current_num_threads()
    }
    #[cfg(not(feature = "parallel"))]
    {
        1
    }
}

/// Configure the global thread pool
pub fn set_num_threads(threads: usize) {
    #[cfg(feature = "parallel")]
    {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
            .ok(); // Ignore if already initialized
    }
    #[cfg(not(feature = "parallel"))]
    {
        let _ = threads;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_par_map_keeps_order() {
        for mode in [
            ProcessingMode::Sequential,
            ProcessingMode::Parallel,
            ProcessingMode::ParallelWith(2),
        ] {
            let out = mode.par_map(0..100, |i| i * i);
            assert_eq!(out, (0..100).map(|i| i * i).collect::<Vec<_>>(), "{mode:?}");
        }
    }

    #[test]
    fn test_par_for_each_visits_every_index() {
        let counter = AtomicUsize::new(0);
        ProcessingMode::Parallel.par_for_each(0..50, |i| {
            counter.fetch_add(i, Ordering::Relaxed);
        });
        assert_eq!(counter.load(Ordering::Relaxed), (0..50).sum::<usize>());
    }

    #[test]
    fn test_default_mode_is_parallel() {
        assert_eq!(ProcessingMode::default(), ProcessingMode::Parallel);
        assert!(num_cpus() >= 1);
    }
}
