//! Codec: serializer configuration and the JSON codec that honors it.

mod config;
mod json;

pub use config::{SerializerConfig, build_config};
pub use json::{CodecError, MessageCodec};
