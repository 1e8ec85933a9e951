use std::num::NonZeroUsize;

use crate::error::InvalidWorkerCount;

/// Worker count used when the caller has no opinion.
pub const DEFAULT_MAX_WORKERS: usize = 5;

/// A validated maximum worker count (always at least 1).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WorkerLimit(NonZeroUsize);

impl WorkerLimit {
    pub fn new(max_workers: usize) -> Result<Self, InvalidWorkerCount> {
        NonZeroUsize::new(max_workers)
            .map(WorkerLimit)
            .ok_or(InvalidWorkerCount { value: 0 })
    }

    pub fn get(self) -> usize {
        self.0.get()
    }

    /// Number of workers actually spawned for `item_count` items.
    pub fn workers_for(self, item_count: usize) -> usize {
        std::cmp::min(self.get(), item_count)
    }
}

impl Default for WorkerLimit {
    fn default() -> Self {
        WorkerLimit(NonZeroUsize::MIN.saturating_add(DEFAULT_MAX_WORKERS - 1))
    }
}

impl TryFrom<usize> for WorkerLimit {
    type Error = InvalidWorkerCount;

    fn try_from(value: usize) -> Result<Self, Self::Error> {
        WorkerLimit::new(value)
    }
}

impl TryFrom<i64> for WorkerLimit {
    type Error = InvalidWorkerCount;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        usize::try_from(value)
            .ok()
            .and_then(NonZeroUsize::new)
            .map(WorkerLimit)
            .ok_or(InvalidWorkerCount { value })
    }
}

impl From<NonZeroUsize> for WorkerLimit {
    fn from(value: NonZeroUsize) -> Self {
        WorkerLimit(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_five() {
        assert_eq!(WorkerLimit::default().get(), DEFAULT_MAX_WORKERS);
    }

    #[test]
    fn test_rejects_below_one() {
        assert_eq!(WorkerLimit::new(0), Err(InvalidWorkerCount { value: 0 }));
        assert_eq!(
            WorkerLimit::try_from(-5i64),
            Err(InvalidWorkerCount { value: -5 })
        );
        assert_eq!(
            WorkerLimit::try_from(0i64),
            Err(InvalidWorkerCount { value: 0 })
        );
    }

    #[test]
    fn test_accepts_positive() {
        assert_eq!(WorkerLimit::try_from(1i64).unwrap().get(), 1);
        assert_eq!(WorkerLimit::try_from(5usize).unwrap().get(), 5);
    }

    #[test]
    fn test_workers_for_caps_at_item_count() {
        let limit = WorkerLimit::new(200).unwrap();
        assert_eq!(limit.workers_for(1000), 200);
        assert_eq!(limit.workers_for(3), 3);
        assert_eq!(limit.workers_for(0), 0);
    }
}
