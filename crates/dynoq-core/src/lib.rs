//! dynoq-core
//!
//! Building blocks shared by the Dyno queue client when it talks to the
//! backing store.
//!
//! # モジュール構成
//! - **domain**: 失敗の分類（FailureKind, Classify, BackendError）と Message
//! - **retry**: RetryPolicy + RetryExecutor（一時的な障害だけを即時リトライ）
//! - **codec**: SerializerConfig と、それに従う MessageCodec
//! - **error**: executor が返すエラー型
//! - **observability**: tracing の初期化

pub mod codec;
pub mod domain;
pub mod error;
pub mod observability;
pub mod retry;

pub use codec::{CodecError, MessageCodec, SerializerConfig, build_config};
pub use domain::{BackendError, Classify, Failure, FailureKind, Message};
pub use error::{ExecuteError, ExecuteResult};
pub use retry::{DEFAULT_RETRY_COUNT, RetryExecutor, RetryPolicy, execute};
