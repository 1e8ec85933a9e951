//! Error types for the fan-out entry points
//!
//! Sequential helpers hand the caller's own error back untouched. The concurrent
//! helpers need one more layer: they can reject their configuration up front, they
//! can see several workers fail in the same call, and a worker can panic.

use std::any::Any;
use thiserror::Error;

/// A maximum worker count below 1 was supplied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("invalid argument max_workers ({value}): can not be less than 1")]
pub struct InvalidWorkerCount {
    pub value: i64,
}

/// Failure of a concurrent `for_each` call.
///
/// Every worker is joined before one of these is returned, so by the time the
/// caller sees it no action invocation from the call is still running.
#[derive(Debug, Error)]
pub enum ForEachError<E> {
    /// Rejected before any item was touched.
    #[error(transparent)]
    InvalidArgument(#[from] InvalidWorkerCount),

    /// Exactly one action invocation failed. Displays as the action's own error.
    #[error("{0}")]
    Action(E),

    /// More than one worker stopped on a failing action.
    /// Errors are kept in the order the workers were joined.
    #[error("{} workers failed", .0.len())]
    Aggregate(Vec<E>),

    /// A worker panicked while running the action.
    #[error("worker panicked: {message}")]
    WorkerPanicked { message: String },
}

impl<E> ForEachError<E> {
    /// Builds the error for a set of failed workers. `errors` must not be empty.
    pub(crate) fn from_failures(mut errors: Vec<E>) -> Self {
        if errors.len() == 1 {
            if let Some(err) = errors.pop() {
                return ForEachError::Action(err);
            }
        }
        ForEachError::Aggregate(errors)
    }

    /// Action errors carried by this failure, in join order.
    pub fn action_errors(&self) -> &[E] {
        match self {
            ForEachError::Action(err) => std::slice::from_ref(err),
            ForEachError::Aggregate(errors) => errors,
            _ => &[],
        }
    }

    /// Consumes the failure and returns the action errors it carried.
    pub fn into_action_errors(self) -> Vec<E> {
        match self {
            ForEachError::Action(err) => vec![err],
            ForEachError::Aggregate(errors) => errors,
            _ => Vec::new(),
        }
    }

    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, ForEachError::InvalidArgument(_))
    }
}

/// Collects the outcome of every joined worker into a single result.
///
/// Panics win over action errors; otherwise all action errors are aggregated.
pub(crate) fn combine_outcomes<E>(
    failures: Vec<E>,
    panic: Option<String>,
) -> Result<(), ForEachError<E>> {
    if let Some(message) = panic {
        return Err(ForEachError::WorkerPanicked { message });
    }
    if failures.is_empty() {
        Ok(())
    } else {
        Err(ForEachError::from_failures(failures))
    }
}

/// Renders a panic payload the way the standard panic hook does.
pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&'static str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_failure_is_action() {
        let err = ForEachError::from_failures(vec!["boom"]);
        assert!(matches!(err, ForEachError::Action("boom")));
        assert_eq!(err.action_errors(), &["boom"]);
    }

    #[test]
    fn test_single_failure_displays_unchanged() {
        let err = ForEachError::from_failures(vec!["disk full on /dev/sda1"]);
        assert_eq!(err.to_string(), "disk full on /dev/sda1");
    }

    #[test]
    fn test_multiple_failures_are_aggregated() {
        let err = ForEachError::from_failures(vec!["a", "b", "c"]);
        assert_eq!(err.to_string(), "3 workers failed");
        assert_eq!(err.into_action_errors(), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_panic_takes_precedence() {
        let result = combine_outcomes(vec!["a"], Some("kaboom".to_string()));
        match result {
            Err(ForEachError::WorkerPanicked { message }) => assert_eq!(message, "kaboom"),
            other => panic!("unexpected outcome: {other:?}"),
        }
        assert!(combine_outcomes::<&str>(Vec::new(), None).is_ok());
    }

    #[test]
    fn test_invalid_worker_count_message() {
        let err: ForEachError<String> = InvalidWorkerCount { value: -5 }.into();
        assert!(err.is_invalid_argument());
        assert_eq!(
            err.to_string(),
            "invalid argument max_workers (-5): can not be less than 1"
        );
    }

    #[test]
    fn test_panic_message_payloads() {
        let payload: Box<dyn Any + Send> = Box::new("static str");
        assert_eq!(panic_message(payload.as_ref()), "static str");
        let payload: Box<dyn Any + Send> = Box::new(String::from("owned"));
        assert_eq!(panic_message(payload.as_ref()), "owned");
        let payload: Box<dyn Any + Send> = Box::new(7u32);
        assert_eq!(panic_message(payload.as_ref()), "unknown panic payload");
    }
}
