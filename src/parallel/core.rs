use std::future::Future;

use super::concurrent::for_each_concurrent_async;
use super::scoped::for_each_parallel;
use super::sequential::{for_each, for_each_async};
use crate::cancel::CancelSignal;
use crate::error::ForEachError;

/// Whether a run fans out, and over how many workers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionStrategy {
    Sequential,
    Concurrent { workers: usize },
}

impl ExecutionStrategy {
    /// Runs a blocking action with this strategy.
    ///
    /// Sequential errors are wrapped in [`ForEachError::Action`] so both
    /// strategies report through the same type.
    pub fn execute<I, F, E, C>(&self, items: I, action: F, cancel: C) -> Result<(), ForEachError<E>>
    where
        I: IntoIterator,
        I::Item: Send,
        F: Fn(I::Item) -> Result<(), E> + Sync,
        E: Send,
        C: CancelSignal + Sync,
    {
        match self {
            ExecutionStrategy::Sequential => {
                for_each(items, action, cancel).map_err(ForEachError::Action)
            }
            ExecutionStrategy::Concurrent { workers } => {
                for_each_parallel(items, action, *workers, cancel)
            }
        }
    }

    /// Runs an async action with this strategy on the current tokio runtime.
    pub async fn execute_async<I, F, Fut, E, C>(
        &self,
        items: I,
        action: F,
        cancel: C,
    ) -> Result<(), ForEachError<E>>
    where
        I: IntoIterator,
        I::Item: Send + 'static,
        F: Fn(I::Item) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), E>> + Send + 'static,
        E: Send + 'static,
        C: CancelSignal + Send + Sync + 'static,
    {
        match *self {
            ExecutionStrategy::Sequential => for_each_async(items, action, cancel)
                .await
                .map_err(ForEachError::Action),
            ExecutionStrategy::Concurrent { workers } => {
                for_each_concurrent_async(items, action, workers, cancel).await
            }
        }
    }

    /// Fans out only when there are at least `min_items_for_concurrency` items.
    ///
    /// ```rust
    /// use fanout::ExecutionStrategy;
    ///
    /// assert_eq!(ExecutionStrategy::auto(1, 2, 4), ExecutionStrategy::Sequential);
    /// assert_eq!(
    ///     ExecutionStrategy::auto(1000, 2, 100),
    ///     ExecutionStrategy::Concurrent { workers: 100 }
    /// );
    /// ```
    pub fn auto(item_count: usize, min_items_for_concurrency: usize, workers: usize) -> Self {
        if item_count >= min_items_for_concurrency {
            ExecutionStrategy::Concurrent { workers }
        } else {
            ExecutionStrategy::Sequential
        }
    }

    /// Worker count for CPU-bound blocking actions: `thread_percentage` of the
    /// cores, capped by `max_threads_config` when non-zero, never below 1.
    pub fn calculate_optimal_workers(max_threads_config: usize, thread_percentage: u8) -> usize {
        let share = (num_cpus::get() * usize::from(thread_percentage) / 100).max(1);
        match max_threads_config {
            0 => share,
            cap => share.min(cap),
        }
    }
}
