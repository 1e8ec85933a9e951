use std::future::Future;

use crate::cancel::CancelSignal;

/// Runs `action` on every item in source order on the calling thread.
///
/// The signal is checked before each item; once it reports cancellation the
/// remaining items are left untouched. The first action error stops the loop
/// and is returned unchanged.
///
/// ```rust
/// use fanout::{Never, for_each};
///
/// let mut seen = Vec::new();
/// for_each(1..=3, |i| { seen.push(i); Ok::<_, ()>(()) }, Never).unwrap();
/// assert_eq!(seen, vec![1, 2, 3]);
/// ```
pub fn for_each<I, F, E, C>(items: I, mut action: F, cancel: C) -> Result<(), E>
where
    I: IntoIterator,
    F: FnMut(I::Item) -> Result<(), E>,
    C: CancelSignal,
{
    for item in items {
        if cancel.is_cancelled() {
            tracing::trace!("for_each: cancellation observed, stopping");
            return Ok(());
        }
        action(item)?;
    }
    Ok(())
}

/// Async counterpart of [`for_each`]: each invocation is awaited before the
/// next item is pulled from the source, so there is never more than one in flight.
///
/// The returned future does not depend on any particular runtime.
pub async fn for_each_async<I, F, Fut, E, C>(items: I, mut action: F, cancel: C) -> Result<(), E>
where
    I: IntoIterator,
    F: FnMut(I::Item) -> Fut,
    Fut: Future<Output = Result<(), E>>,
    C: CancelSignal,
{
    for item in items {
        if cancel.is_cancelled() {
            tracing::trace!("for_each_async: cancellation observed, stopping");
            return Ok(());
        }
        action(item).await?;
    }
    Ok(())
}
