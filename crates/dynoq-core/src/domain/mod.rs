//! Domain model: failure classification and the queue message payload.

pub mod failure;
pub mod message;

pub use failure::{BackendError, Classify, Failure, FailureKind};
pub use message::Message;
