//! The worker loop shared by every concurrent entry point.
//!
//! Each worker repeats: check the signal, pop one item, run the action. It stops
//! on cancellation, on an empty queue, or on its own first action error. Siblings
//! are not told about a failure; they keep draining until one of their own exits.

use std::future::Future;

use super::queue::WorkQueue;
use crate::cancel::CancelSignal;

/// Blocking worker loop. Returns how many items this worker processed.
pub(crate) fn drain<T, E, F, C>(
    worker_id: usize,
    queue: &WorkQueue<T>,
    action: &F,
    cancel: &C,
) -> Result<usize, E>
where
    F: Fn(T) -> Result<(), E> + ?Sized,
    C: CancelSignal + ?Sized,
{
    let mut processed = 0;
    loop {
        if cancel.is_cancelled() {
            tracing::trace!("worker-{} observed cancellation after {} items", worker_id, processed);
            break;
        }
        let Some(item) = queue.pop() else {
            break;
        };
        if let Err(err) = action(item) {
            tracing::warn!("worker-{} stopping: action failed after {} items", worker_id, processed);
            return Err(err);
        }
        processed += 1;
    }
    tracing::trace!("worker-{} finished, processed {} items", worker_id, processed);
    Ok(processed)
}

/// Async worker loop. The queue is only touched between invocations, never
/// across an `.await`.
pub(crate) async fn drain_async<T, E, F, Fut, C>(
    worker_id: usize,
    queue: &WorkQueue<T>,
    action: &F,
    cancel: &C,
) -> Result<usize, E>
where
    F: Fn(T) -> Fut + ?Sized,
    Fut: Future<Output = Result<(), E>>,
    C: CancelSignal + ?Sized,
{
    let mut processed = 0;
    loop {
        if cancel.is_cancelled() {
            tracing::trace!("worker-{} observed cancellation after {} items", worker_id, processed);
            break;
        }
        let Some(item) = queue.pop() else {
            break;
        };
        if let Err(err) = action(item).await {
            tracing::warn!("worker-{} stopping: action failed after {} items", worker_id, processed);
            return Err(err);
        }
        processed += 1;
    }
    tracing::trace!("worker-{} finished, processed {} items", worker_id, processed);
    Ok(processed)
}
