//! Bounded fan-out over a sequence of items
//!
//! # Execution Modes
//!
//! ## Sequential
//! - [`for_each`] / [`for_each_async`]: one item at a time, in source order, on
//!   the calling task. The action error is returned as-is.
//!
//! ## Concurrent
//! - [`for_each_concurrent_async`]: async action, workers are tokio tasks
//! - [`for_each_concurrent`]: blocking action, workers run on tokio's blocking pool
//! - [`for_each_parallel`]: blocking action on scoped threads, no runtime needed
//!
//! Every concurrent entry point follows the same plan:
//! ```text
//! items ──▶ WorkQueue (fully seeded) ──▶ min(W, N) workers ──▶ join all
//!                                          │
//!                                          └─ loop: cancelled? → stop
//!                                                   pop()      → none: stop
//!                                                   action()   → err: stop
//! ```
//!
//! # Worker Count
//! - `max_workers` must be at least 1; `0` is rejected before the input is touched
//! - Effective workers is `min(max_workers, item_count)`; no items means no workers
//! - [`DEFAULT_MAX_WORKERS`] is 5
//!
//! # Example Usage
//!
//! ```rust
//! use fanout::{CancelFlag, ExecutionStrategy};
//!
//! let strategy = ExecutionStrategy::auto(100, 50, 4);
//! let cancel = CancelFlag::new();
//! strategy
//!     .execute(0..100, |_item| Ok::<_, std::io::Error>(()), &cancel)
//!     .unwrap();
//! ```

pub mod concurrent;
pub mod core;
pub mod limit;
pub mod queue;
pub mod scoped;
pub mod sequential;
mod worker;

// Re-export main types for easier access
pub use concurrent::{for_each_concurrent, for_each_concurrent_async};
pub use self::core::ExecutionStrategy;
pub use limit::{DEFAULT_MAX_WORKERS, WorkerLimit};
pub use queue::WorkQueue;
pub use scoped::for_each_parallel;
pub use sequential::{for_each, for_each_async};
