use std::future::Future;
use std::sync::Arc;

use tokio::task::{JoinError, JoinSet};

use super::limit::WorkerLimit;
use super::queue::WorkQueue;
use super::worker::{drain, drain_async};
use crate::cancel::CancelSignal;
use crate::error::{ForEachError, combine_outcomes, panic_message};

/// Runs an async `action` on every item with at most `max_workers` invocations in flight.
///
/// The input is enumerated into a shared queue before any worker starts. Then
/// `min(max_workers, item_count)` tasks are spawned on the current tokio runtime,
/// each pulling items until the queue is empty, the signal reports cancellation,
/// or its own action fails. The call resolves after every worker has stopped.
///
/// # Errors
///
/// - [`ForEachError::InvalidArgument`] when `max_workers` is 0; nothing runs.
/// - [`ForEachError::Action`] / [`ForEachError::Aggregate`] with every action
///   error that stopped a worker.
/// - [`ForEachError::WorkerPanicked`] if a worker panicked.
///
/// # Panics
///
/// Must be polled from within a tokio runtime.
///
/// ```rust
/// use std::sync::Arc;
/// use std::sync::atomic::{AtomicUsize, Ordering};
/// use fanout::{Never, for_each_concurrent_async};
///
/// # #[tokio::main]
/// # async fn main() {
/// let total = Arc::new(AtomicUsize::new(0));
/// let sum = total.clone();
/// for_each_concurrent_async(
///     1..=100,
///     move |i| {
///         let sum = sum.clone();
///         async move {
///             sum.fetch_add(i, Ordering::Relaxed);
///             Ok::<_, std::io::Error>(())
///         }
///     },
///     8,
///     Never,
/// )
/// .await
/// .unwrap();
/// assert_eq!(total.load(Ordering::Relaxed), 5050);
/// # }
/// ```
pub async fn for_each_concurrent_async<I, F, Fut, E, C>(
    items: I,
    action: F,
    max_workers: usize,
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
    let limit = WorkerLimit::new(max_workers)?;
    let queue = Arc::new(WorkQueue::seeded(items));
    let item_count = queue.len();
    let workers = limit.workers_for(item_count);
    if workers == 0 {
        return Ok(());
    }
    tracing::debug!("spawning {} async workers for {} items", workers, item_count);

    let action = Arc::new(action);
    let cancel = Arc::new(cancel);
    let mut tasks = JoinSet::new();
    for worker_id in 0..workers {
        let queue = queue.clone();
        let action = action.clone();
        let cancel = cancel.clone();
        tasks.spawn(async move { drain_async(worker_id, &*queue, &*action, &*cancel).await });
    }

    join_workers(tasks, item_count).await
}

/// Runs a blocking `action` on every item with at most `max_workers` invocations in flight.
///
/// Same contract as [`for_each_concurrent_async`], but each worker is a loop on
/// tokio's blocking pool, so `action` may block or do CPU-heavy work without
/// stalling the async executor.
///
/// # Panics
///
/// Must be polled from within a tokio runtime.
pub async fn for_each_concurrent<I, F, E, C>(
    items: I,
    action: F,
    max_workers: usize,
    cancel: C,
) -> Result<(), ForEachError<E>>
where
    I: IntoIterator,
    I::Item: Send + 'static,
    F: Fn(I::Item) -> Result<(), E> + Send + Sync + 'static,
    E: Send + 'static,
    C: CancelSignal + Send + Sync + 'static,
{
    let limit = WorkerLimit::new(max_workers)?;
    let queue = Arc::new(WorkQueue::seeded(items));
    let item_count = queue.len();
    let workers = limit.workers_for(item_count);
    if workers == 0 {
        return Ok(());
    }
    tracing::debug!("spawning {} blocking workers for {} items", workers, item_count);

    let action = Arc::new(action);
    let cancel = Arc::new(cancel);
    let mut tasks = JoinSet::new();
    for worker_id in 0..workers {
        let queue = queue.clone();
        let action = action.clone();
        let cancel = cancel.clone();
        tasks.spawn_blocking(move || drain(worker_id, &*queue, &*action, &*cancel));
    }

    join_workers(tasks, item_count).await
}

/// Awaits every worker, then folds their outcomes into one result.
async fn join_workers<E>(
    mut tasks: JoinSet<Result<usize, E>>,
    item_count: usize,
) -> Result<(), ForEachError<E>>
where
    E: Send + 'static,
{
    let mut processed = 0;
    let mut failures = Vec::new();
    let mut panic = None;

    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok(Ok(count)) => processed += count,
            Ok(Err(err)) => failures.push(err),
            Err(join_err) => {
                let message = join_error_message(join_err);
                tracing::warn!("worker panicked: {}", message);
                panic.get_or_insert(message);
            }
        }
    }

    tracing::debug!(
        "concurrent for_each done: {}/{} items processed, {} workers failed",
        processed,
        item_count,
        failures.len()
    );
    combine_outcomes(failures, panic)
}

fn join_error_message(err: JoinError) -> String {
    if err.is_panic() {
        panic_message(err.into_panic().as_ref())
    } else {
        err.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cancel::{CancelFlag, Never};
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test]
    async fn test_zero_workers_rejected_before_enumeration() {
        let enumerated = Arc::new(AtomicUsize::new(0));
        let counter = enumerated.clone();
        let items = (0..10).inspect(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        let result =
            for_each_concurrent_async(items, |_| async { Ok::<_, ()>(()) }, 0, Never).await;
        assert!(matches!(result, Err(ForEachError::InvalidArgument(_))));
        assert_eq!(enumerated.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_empty_input_completes() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        for_each_concurrent(
            Vec::<u32>::new(),
            move |_| {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok::<_, ()>(())
            },
            3,
            Never,
        )
        .await
        .unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_blocking_workers_process_everything() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        for_each_concurrent(
            0..500,
            move |i| {
                sink.lock().unwrap().push(i);
                Ok::<_, ()>(())
            },
            16,
            Never,
        )
        .await
        .unwrap();

        let mut seen = seen.lock().unwrap().clone();
        seen.sort();
        assert_eq!(seen, (0..500).collect::<Vec<_>>());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_failing_worker_does_not_stop_siblings() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let result = for_each_concurrent_async(
            0..100,
            move |i| {
                let counter = counter.clone();
                async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    if i == 0 { Err("first item") } else { Ok(()) }
                }
            },
            4,
            Never,
        )
        .await;

        match result {
            Err(ForEachError::Action(err)) => assert_eq!(err, "first item"),
            other => panic!("unexpected outcome: {other:?}"),
        }
        // the other three workers drain the rest of the queue
        assert_eq!(calls.load(Ordering::SeqCst), 100);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_every_failure_is_aggregated() {
        let result = for_each_concurrent(
            0..3,
            |i| Err::<(), _>(i),
            3,
            Never,
        )
        .await;

        let mut errors = result.unwrap_err().into_action_errors();
        errors.sort();
        assert_eq!(errors, vec![0, 1, 2]);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_panicking_worker_is_reported() {
        let result = for_each_concurrent(
            0..4,
            |i| {
                if i == 2 {
                    panic!("bad item {i}");
                }
                Ok::<_, ()>(())
            },
            2,
            Never,
        )
        .await;

        match result {
            Err(ForEachError::WorkerPanicked { message }) => assert_eq!(message, "bad item 2"),
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_pre_cancelled_signal_runs_nothing() {
        let flag = CancelFlag::new();
        flag.cancel();
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        for_each_concurrent_async(
            0..50,
            move |_| {
                let counter = counter.clone();
                async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    Ok::<_, ()>(())
                }
            },
            5,
            flag,
        )
        .await
        .unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }
}
