use thiserror::Error;

/// Result of [`RetryExecutor::execute`](crate::retry::RetryExecutor::execute).
pub type ExecuteResult<R, E> = Result<R, ExecuteError<E>>;

/// Terminal failure of one logical backend operation.
///
/// `E` is the operation's own error type. Both variants hand it back untouched
/// so callers can branch on it.
#[derive(Debug, Error)]
pub enum ExecuteError<E>
where
    E: std::error::Error + 'static,
{
    /// The backend kept failing transiently after every allowed attempt.
    /// `cause` is the failure of the last attempt.
    #[error("{cause}")]
    RetryExhausted {
        op_name: String,
        key_name: String,
        attempts: u32,
        #[source]
        cause: E,
    },

    /// Non-transient failure. Never retried.
    #[error("Operation: ( {op_name} ) failed on key: [{key_name} ].")]
    Operation {
        op_name: String,
        key_name: String,
        #[source]
        source: E,
    },
}

impl<E> ExecuteError<E>
where
    E: std::error::Error + 'static,
{
    pub fn op_name(&self) -> &str {
        match self {
            ExecuteError::RetryExhausted { op_name, .. }
            | ExecuteError::Operation { op_name, .. } => op_name,
        }
    }

    pub fn key_name(&self) -> &str {
        match self {
            ExecuteError::RetryExhausted { key_name, .. }
            | ExecuteError::Operation { key_name, .. } => key_name,
        }
    }

    pub fn cause(&self) -> &E {
        match self {
            ExecuteError::RetryExhausted { cause, .. } => cause,
            ExecuteError::Operation { source, .. } => source,
        }
    }

    pub fn into_cause(self) -> E {
        match self {
            ExecuteError::RetryExhausted { cause, .. } => cause,
            ExecuteError::Operation { source, .. } => source,
        }
    }

    pub fn is_retry_exhausted(&self) -> bool {
        matches!(self, ExecuteError::RetryExhausted { .. })
    }
}
