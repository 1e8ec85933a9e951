//! # fanout - bounded-concurrency `for_each` helpers
//!
//! Apply an action to every item of a sequence, either one at a time or with a
//! fixed cap on concurrently running workers, with cooperative cancellation.
//!
//! ## Features
//!
//! - **Sequential**: [`for_each`] and [`for_each_async`] keep source order
//! - **Bounded concurrency**: [`for_each_concurrent_async`], [`for_each_concurrent`]
//!   and [`for_each_parallel`] never run more than `max_workers` actions at once
//! - **Exactly once**: workers pull from one lock-free queue, no item runs twice
//! - **Cooperative cancellation**: any [`CancelSignal`] is polled between items;
//!   in-flight actions always finish
//! - **Transparent errors**: action errors come back unwrapped (sequential) or
//!   collected in [`ForEachError`] (concurrent)
//!
//! ## Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use std::sync::atomic::{AtomicUsize, Ordering};
//! use fanout::{CancelFlag, for_each_concurrent_async};
//!
//! # #[tokio::main]
//! # async fn main() -> anyhow::Result<()> {
//! let done = Arc::new(AtomicUsize::new(0));
//! let cancel = CancelFlag::new();
//!
//! let counter = done.clone();
//! for_each_concurrent_async(
//!     0..1000,
//!     move |_item| {
//!         let counter = counter.clone();
//!         async move {
//!             counter.fetch_add(1, Ordering::Relaxed);
//!             Ok::<_, anyhow::Error>(())
//!         }
//!     },
//!     100,
//!     cancel.clone(),
//! )
//! .await?;
//!
//! assert_eq!(done.load(Ordering::Relaxed), 1000);
//! # Ok(())
//! # }
//! ```

pub mod cancel;
pub mod config;
pub mod error;
pub mod parallel;

pub use cancel::{CancelFlag, CancelSignal, Deadline, Never};
pub use config::ForEachConfig;
pub use error::{ForEachError, InvalidWorkerCount};
pub use parallel::{
    DEFAULT_MAX_WORKERS, ExecutionStrategy, WorkQueue, WorkerLimit, for_each, for_each_async,
    for_each_concurrent, for_each_concurrent_async, for_each_parallel,
};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const PKG_NAME: &str = env!("CARGO_PKG_NAME");
