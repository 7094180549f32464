//! Failure classification for backend operations.
//!
//! The executor never inspects concrete error types. An operation's error
//! reports its own [`FailureKind`] through [`Classify`], and the retry decision
//! is made on that tag alone.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Classification tag of a failed attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FailureKind {
    /// The backend signaled a recoverable condition (timeout, unavailable, ...).
    TransientBackend,

    /// Anything else: validation, business logic, non-backend errors.
    Other,
}

impl FailureKind {
    pub fn is_transient(self) -> bool {
        matches!(self, FailureKind::TransientBackend)
    }
}

/// Errors that can tell the executor whether they are worth retrying.
///
/// `Cause` is what the caller finally sees. Plain error types are their own
/// cause; tagging wrappers such as [`Failure`] unwrap to the inner error.
pub trait Classify {
    type Cause;

    fn failure_kind(&self) -> FailureKind;

    fn into_cause(self) -> Self::Cause;
}

/// Explicitly tagged failure.
///
/// Useful when the operation's own error type carries no classification:
/// the operation decides the tag at the point of failure.
///
/// ```ignore
/// let r = executor.execute("pop", "queue:orders", || {
///     client.pop().map_err(|e| match e {
///         ClientError::Timeout(_) => Failure::transient(e),
///         _ => Failure::other(e),
///     })
/// });
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Failure<E> {
    Transient(E),
    Other(E),
}

impl<E> Failure<E> {
    pub fn transient(cause: E) -> Self {
        Failure::Transient(cause)
    }

    pub fn other(cause: E) -> Self {
        Failure::Other(cause)
    }

    pub fn cause(&self) -> &E {
        match self {
            Failure::Transient(e) | Failure::Other(e) => e,
        }
    }

    /// Unwrap to the underlying cause, dropping the tag.
    pub fn into_cause(self) -> E {
        match self {
            Failure::Transient(e) | Failure::Other(e) => e,
        }
    }
}

impl<E> Classify for Failure<E> {
    type Cause = E;

    fn failure_kind(&self) -> FailureKind {
        match self {
            Failure::Transient(_) => FailureKind::TransientBackend,
            Failure::Other(_) => FailureKind::Other,
        }
    }

    fn into_cause(self) -> E {
        Failure::into_cause(self)
    }
}

impl<E: fmt::Display> fmt::Display for Failure<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.cause().fmt(f)
    }
}

impl<E: std::error::Error + 'static> std::error::Error for Failure<E> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(self.cause())
    }
}

/// Errors raised by the backing store client.
///
/// Connection-level conditions are transient; request-level rejections are not.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BackendError {
    #[error("backend timed out: {0}")]
    Timeout(String),

    #[error("backend unavailable: {0}")]
    Unavailable(String),

    #[error("connection pool exhausted: {0}")]
    PoolExhausted(String),

    #[error("connection failed: {0}")]
    Connection(String),

    #[error("validation failed: {0}")]
    Validation(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("rejected by backend: {0}")]
    Rejected(String),
}

impl BackendError {
    pub fn timeout(msg: impl Into<String>) -> Self {
        Self::Timeout(msg.into())
    }

    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self::Unavailable(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}

impl Classify for BackendError {
    type Cause = Self;

    fn failure_kind(&self) -> FailureKind {
        match self {
            BackendError::Timeout(_)
            | BackendError::Unavailable(_)
            | BackendError::PoolExhausted(_)
            | BackendError::Connection(_) => FailureKind::TransientBackend,
            BackendError::Validation(_) | BackendError::NotFound(_) | BackendError::Rejected(_) => {
                FailureKind::Other
            }
        }
    }

    fn into_cause(self) -> Self {
        self
    }
}
