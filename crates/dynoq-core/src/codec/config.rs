//! SerializerConfig - メッセージの読み書きに使う固定設定
//!
//! 読み込みは寛容に、書き出しはコンパクトに。

use serde::{Deserialize, Serialize};

/// Flags applied when reading and writing queue messages.
///
/// Obtain the canonical value through [`build_config`]; the fields are public
/// so codecs can read them, not so callers can tweak them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SerializerConfig {
    /// Decode: members the target type does not know about are skipped.
    pub ignore_unknown_fields: bool,

    /// Decode: members the target type explicitly ignores are not an error.
    pub ignore_unrecognized_properties: bool,

    /// Decode: `null` for a primitive field falls back to its default.
    pub tolerate_null_for_primitive: bool,

    /// Encode: omit members whose value is `null`.
    pub include_only_non_null_fields: bool,

    /// Encode: omit members that are `null`, `""`, `[]` or `{}`.
    pub include_only_non_empty_fields: bool,

    pub pretty_print: bool,
}

/// Build the canonical serializer configuration.
///
/// Pure and deterministic: every call returns an identical value, so callers
/// may build it once and share it.
pub fn build_config() -> SerializerConfig {
    SerializerConfig {
        ignore_unknown_fields: true,
        ignore_unrecognized_properties: true,
        tolerate_null_for_primitive: true,
        include_only_non_null_fields: true,
        include_only_non_empty_fields: true,
        pretty_print: false,
    }
}

impl Default for SerializerConfig {
    fn default() -> Self {
        build_config()
    }
}
