//! MessageCodec - SerializerConfig に従って JSON を読み書きする
//!
//! # エンコード
//! 1. serde_json で `Value` に変換
//! 2. null / 空のメンバーを除去（設定による）
//! 3. compact（pretty_print = false）で文字列化
//!
//! # デコード
//! 1. `Value` にパース
//! 2. トップレベルの null メンバーを除去（`#[serde(default)]` のフィールドはデフォルト値になる）
//! 3. T にデシリアライズ（strict モードでは serde_ignored で未知のメンバーを検出）

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

use super::{SerializerConfig, build_config};

#[derive(Debug, Error)]
pub enum CodecError {
    #[error("encode failed: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("decode failed: {0}")]
    Decode(#[source] serde_json::Error),

    #[error("unknown field: {0}")]
    UnknownField(String),
}

/// JSON codec for queue payloads, driven by a [`SerializerConfig`].
///
/// `ignore_unrecognized_properties` has no runtime effect here: serde never
/// rejects members a type marks as skipped. Only strict mode reports them,
/// as unknown fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MessageCodec {
    config: SerializerConfig,
}

impl Default for MessageCodec {
    fn default() -> Self {
        Self::new(build_config())
    }
}

impl MessageCodec {
    pub fn new(config: SerializerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SerializerConfig {
        &self.config
    }

    pub fn encode<T: Serialize>(&self, value: &T) -> Result<String, CodecError> {
        let mut v = serde_json::to_value(value).map_err(CodecError::Encode)?;

        if self.config.include_only_non_empty_fields {
            prune_members(&mut v, &is_empty);
        } else if self.config.include_only_non_null_fields {
            prune_members(&mut v, &Value::is_null);
        }

        let out = if self.config.pretty_print {
            serde_json::to_string_pretty(&v)
        } else {
            serde_json::to_string(&v)
        };
        out.map_err(CodecError::Encode)
    }

    /// Decode `input` into `T`.
    ///
    /// Strict mode (`ignore_unknown_fields = false`) fails on the first member
    /// `T` does not declare, at any depth. Members `T` marks `#[serde(skip)]`
    /// count as undeclared there.
    pub fn decode<T: DeserializeOwned>(&self, input: &str) -> Result<T, CodecError> {
        let mut v: Value = serde_json::from_str(input).map_err(CodecError::Decode)?;

        if self.config.tolerate_null_for_primitive {
            drop_null_members(&mut v);
        }

        if self.config.ignore_unknown_fields {
            return serde_json::from_value(v).map_err(CodecError::Decode);
        }

        let mut unknown = Vec::new();
        let decoded: T = serde_ignored::deserialize(v, |path| unknown.push(path.to_string()))
            .map_err(CodecError::Decode)?;

        match unknown.into_iter().next() {
            Some(field) => Err(CodecError::UnknownField(field)),
            None => Ok(decoded),
        }
    }
}

/// Null members of the top-level object only. Nested maps may carry
/// meaningful nulls (`Map<String, Option<_>>`) and are left untouched.
fn drop_null_members(v: &mut Value) {
    if let Value::Object(map) = v {
        map.retain(|_, member| !member.is_null());
    }
}

fn is_empty(v: &Value) -> bool {
    match v {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Array(a) => a.is_empty(),
        Value::Object(o) => o.is_empty(),
        Value::Bool(_) | Value::Number(_) => false,
    }
}

/// Remove object members matching `drop`, depth first.
/// Array elements are visited but never removed.
fn prune_members(v: &mut Value, drop: &dyn Fn(&Value) -> bool) {
    match v {
        Value::Object(map) => {
            for child in map.values_mut() {
                prune_members(child, drop);
            }
            map.retain(|_, child| !drop(child));
        }
        Value::Array(items) => {
            for item in items.iter_mut() {
                prune_members(item, drop);
            }
        }
        _ => {}
    }
}
