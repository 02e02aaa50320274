//! Fixed-size batch processing on rayon, with a wall-clock deadline

use std::sync::Arc;
use std::time::{Duration, Instant};

use rayon::ThreadPool;
use rayon::prelude::*;

/// Point in time after which in-flight work should stop.
#[derive(Debug, Clone, Copy, Default)]
pub struct Deadline {
    at: Option<Instant>,
    budget: Duration,
}

impl Deadline {
    /// A deadline that never expires.
    pub fn none() -> Self {
        Self::default()
    }

    pub fn after(budget: Duration) -> Self {
        Self {
            at: Instant::now().checked_add(budget),
            budget,
        }
    }

    pub fn expired(&self) -> bool {
        self.at.is_some_and(|at| Instant::now() >= at)
    }

    pub fn budget(&self) -> Duration {
        self.budget
    }
}

/// The deadline passed between two batches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeadlineExceeded;

/// Runs items in consecutive batches. Members of one batch run in parallel;
/// the next batch starts only once the previous one has fully finished.
#[derive(Clone)]
pub struct BatchRunner {
    batch_size: usize,
    pool: Option<Arc<ThreadPool>>,
}

impl BatchRunner {
    /// `workers == 0` uses rayon's global pool.
    pub fn new(batch_size: usize, workers: usize) -> Self {
        let pool = if workers == 0 {
            None
        } else {
            match rayon::ThreadPoolBuilder::new().num_threads(workers).build() {
                Ok(pool) => Some(Arc::new(pool)),
                Err(e) => {
                    // Fall back to rayon's global pool
                    log::warn!("could not build a {}-thread pool: {}", workers, e);
                    None
                }
            }
        };
        Self {
            batch_size: batch_size.max(1),
            pool,
        }
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Process every item, checking `deadline` after each batch.
    /// Results keep the input order.
    pub fn run<T, R, F>(
        &self,
        items: &[T],
        deadline: Deadline,
        f: F,
    ) -> Result<Vec<R>, DeadlineExceeded>
    where
        T: Sync,
        R: Send,
        F: Fn(&T) -> R + Sync,
    {
        let mut results = Vec::with_capacity(items.len());
        for (index, batch) in items.chunks(self.batch_size).enumerate() {
            let done: Vec<R> = match &self.pool {
                Some(pool) => pool.install(|| batch.par_iter().map(&f).collect()),
                None => batch.par_iter().map(&f).collect(),
            };
            results.extend(done);
            log::trace!("batch {} finished ({} item(s))", index, batch.len());

            if deadline.expired() {
                return Err(DeadlineExceeded);
            }
        }
        Ok(results)
    }
}

impl std::fmt::Debug for BatchRunner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BatchRunner")
            .field("batch_size", &self.batch_size)
            .field("dedicated_pool", &self.pool.is_some())
            .finish()
    }
}
