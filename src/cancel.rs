//! Cooperative cancellation signals
//!
//! The iteration helpers never own a signal; they only ask [`CancelSignal::is_cancelled`]
//! at loop boundaries (before each sequential step and before each dequeue in every
//! worker). Anything that can answer that question synchronously can be plugged in.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use tokio_util::sync::CancellationToken;

/// A caller-owned source of cancellation, polled but never awaited.
pub trait CancelSignal {
    fn is_cancelled(&self) -> bool;
}

/// The signal for callers that never cancel.
#[derive(Debug, Clone, Copy, Default)]
pub struct Never;

impl CancelSignal for Never {
    #[inline]
    fn is_cancelled(&self) -> bool {
        false
    }
}

/// Shared cancellation flag. Clones observe the same flag.
///
/// ```rust
/// use fanout::{CancelFlag, CancelSignal};
///
/// let flag = CancelFlag::new();
/// let worker_view = flag.clone();
/// assert!(!worker_view.is_cancelled());
/// flag.cancel();
/// assert!(worker_view.is_cancelled());
/// ```
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation. Idempotent.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }
}

impl CancelSignal for CancelFlag {
    #[inline]
    fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

impl CancelSignal for AtomicBool {
    #[inline]
    fn is_cancelled(&self) -> bool {
        self.load(Ordering::Acquire)
    }
}

/// Reports cancellation once a point in time has passed.
///
/// This is how a timeout is layered on top of the helpers: no invocation starts
/// after the deadline, in-flight ones run to completion.
#[derive(Debug, Clone, Copy)]
pub struct Deadline(Instant);

impl Deadline {
    pub fn at(instant: Instant) -> Self {
        Self(instant)
    }

    pub fn after(timeout: Duration) -> Self {
        Self(Instant::now() + timeout)
    }

    pub fn instant(&self) -> Instant {
        self.0
    }
}

impl CancelSignal for Deadline {
    fn is_cancelled(&self) -> bool {
        Instant::now() >= self.0
    }
}

impl CancelSignal for CancellationToken {
    #[inline]
    fn is_cancelled(&self) -> bool {
        CancellationToken::is_cancelled(self)
    }
}

impl<C: CancelSignal + ?Sized> CancelSignal for &C {
    #[inline]
    fn is_cancelled(&self) -> bool {
        (**self).is_cancelled()
    }
}

impl<C: CancelSignal + ?Sized> CancelSignal for Arc<C> {
    #[inline]
    fn is_cancelled(&self) -> bool {
        (**self).is_cancelled()
    }
}

impl<C: CancelSignal + ?Sized> CancelSignal for Box<C> {
    #[inline]
    fn is_cancelled(&self) -> bool {
        (**self).is_cancelled()
    }
}
