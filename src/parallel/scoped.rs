use super::limit::WorkerLimit;
use super::queue::WorkQueue;
use super::worker::drain;
use crate::cancel::CancelSignal;
use crate::error::{ForEachError, combine_outcomes, panic_message};

/// Blocking fan-out on scoped OS threads, for callers without an async runtime.
///
/// Behaves like [`for_each_concurrent`](super::for_each_concurrent) but returns
/// only after every worker thread has been joined. Because the threads are scoped,
/// `action`, the items and `cancel` may borrow from the caller's stack.
///
/// ```rust
/// use std::sync::atomic::{AtomicUsize, Ordering};
/// use fanout::{Never, for_each_parallel};
///
/// let calls = AtomicUsize::new(0);
/// for_each_parallel(
///     0..1000,
///     |_| {
///         calls.fetch_add(1, Ordering::Relaxed);
///         Ok::<_, ()>(())
///     },
///     8,
///     Never,
/// )
/// .unwrap();
/// assert_eq!(calls.load(Ordering::Relaxed), 1000);
/// ```
pub fn for_each_parallel<I, F, E, C>(
    items: I,
    action: F,
    max_workers: usize,
    cancel: C,
) -> Result<(), ForEachError<E>>
where
    I: IntoIterator,
    I::Item: Send,
    F: Fn(I::Item) -> Result<(), E> + Sync,
    E: Send,
    C: CancelSignal + Sync,
{
    let limit = WorkerLimit::new(max_workers)?;
    let queue = WorkQueue::seeded(items);
    let item_count = queue.len();
    let workers = limit.workers_for(item_count);
    if workers == 0 {
        return Ok(());
    }
    tracing::debug!("spawning {} worker threads for {} items", workers, item_count);

    // Use crossbeam::thread::scope for safe borrowing
    let outcomes = crossbeam::thread::scope(|s| {
        let handles: Vec<_> = (0..workers)
            .map(|worker_id| {
                let queue = &queue;
                let action = &action;
                let cancel = &cancel;
                s.spawn(move |_| drain(worker_id, queue, action, cancel))
            })
            .collect();

        handles
            .into_iter()
            .map(|handle| handle.join())
            .collect::<Vec<_>>()
    })
    .map_err(|payload| ForEachError::<E>::WorkerPanicked {
        message: panic_message(payload.as_ref()),
    })?;

    let mut processed = 0;
    let mut failures = Vec::new();
    let mut panic = None;
    for outcome in outcomes {
        match outcome {
            Ok(Ok(count)) => processed += count,
            Ok(Err(err)) => failures.push(err),
            Err(payload) => {
                let message = panic_message(payload.as_ref());
                tracing::warn!("worker panicked: {}", message);
                panic.get_or_insert(message);
            }
        }
    }

    tracing::debug!(
        "parallel for_each done: {}/{} items processed, {} workers failed",
        processed,
        item_count,
        failures.len()
    );
    combine_outcomes(failures, panic)
}
