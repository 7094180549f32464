//! Message - キューに積まれるペイロード
//!
//! バックエンドには JSON 文字列として保存される（MessageCodec 経由）。

use serde::{Deserialize, Serialize};
use ulid::Ulid;

/// A queue message as stored in the backing store.
///
/// Every field has a default so that payloads written by older clients (or
/// carrying `null` for numeric fields) still decode.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Message {
    pub id: String,

    pub payload: String,

    /// Visibility timeout in milliseconds. 0 means deliver immediately.
    pub timeout: u64,

    /// 0 is the highest priority.
    pub priority: u32,

    /// Shard the message was pushed to. Filled in by the queue.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shard: Option<String>,
}

impl Message {
    /// New message with a freshly generated ULID id.
    pub fn new(payload: impl Into<String>) -> Self {
        Self::with_id(Ulid::new().to_string(), payload)
    }

    pub fn with_id(id: impl Into<String>, payload: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            payload: payload.into(),
            ..Self::default()
        }
    }

    pub fn with_timeout(mut self, timeout_ms: u64) -> Self {
        self.timeout = timeout_ms;
        self
    }

    pub fn with_priority(mut self, priority: u32) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_shard(mut self, shard: impl Into<String>) -> Self {
        self.shard = Some(shard.into());
        self
    }
}
