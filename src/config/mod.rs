//! Configuration for fan-out calls
//!
//! Values are layered by [`figment`] (see [`core`]): embedded defaults, then
//! `fanout.toml` or a custom file, then `FANOUT_*` environment variables.

pub mod core;

use serde::{Deserialize, Serialize};

use crate::error::InvalidWorkerCount;
use crate::parallel::limit::{DEFAULT_MAX_WORKERS, WorkerLimit};
use crate::parallel::ExecutionStrategy;

/// Settings consumed by [`ExecutionStrategy`] and the concurrent entry points
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForEachConfig {
    /// Maximum concurrent workers. Kept signed so that bad values from files or
    /// the environment surface as [`InvalidWorkerCount`] instead of a parse error.
    #[serde(default = "default_max_workers")]
    pub max_workers: i64,

    /// Minimum number of items before fan-out is worth it
    #[serde(default = "default_min_items_for_concurrency")]
    pub min_items_for_concurrency: usize,

    /// Percentage of CPU cores to use (1-100)
    #[serde(default = "default_thread_percentage")]
    pub thread_percentage: u8,

    /// Maximum number of CPU-derived workers (0 = no limit)
    #[serde(default)]
    pub max_threads: usize,
}

fn default_max_workers() -> i64 {
    DEFAULT_MAX_WORKERS as i64
}

fn default_min_items_for_concurrency() -> usize {
    2
}

fn default_thread_percentage() -> u8 {
    75
}

impl Default for ForEachConfig {
    fn default() -> Self {
        Self {
            max_workers: default_max_workers(),
            min_items_for_concurrency: default_min_items_for_concurrency(),
            thread_percentage: default_thread_percentage(),
            max_threads: 0,
        }
    }
}

impl ForEachConfig {
    /// Validated `max_workers`.
    pub fn worker_limit(&self) -> Result<WorkerLimit, InvalidWorkerCount> {
        WorkerLimit::try_from(self.max_workers)
    }

    /// Strategy for a workload of `item_count` items.
    pub fn strategy(&self, item_count: usize) -> Result<ExecutionStrategy, InvalidWorkerCount> {
        let limit = self.worker_limit()?;
        Ok(ExecutionStrategy::auto(
            item_count,
            self.min_items_for_concurrency,
            limit.get(),
        ))
    }

    /// CPU-derived worker count, still capped by `max_workers`.
    pub fn cpu_bound_workers(&self) -> Result<WorkerLimit, InvalidWorkerCount> {
        let limit = self.worker_limit()?;
        let by_cpu =
            ExecutionStrategy::calculate_optimal_workers(self.max_threads, self.thread_percentage);
        WorkerLimit::new(std::cmp::min(limit.get(), by_cpu))
    }
}
