//! Retry: bounded, immediate re-execution of backend operations.

mod executor;
mod policy;

pub use executor::{RetryExecutor, execute};
pub use policy::{DEFAULT_RETRY_COUNT, RetryPolicy};
