//! Value codec for cache payloads.
//!
//! Entries are stored as self-describing JSON bytes. The only contract is
//! round-trip fidelity: `decode(encode(v)) == v` for every record the
//! repositories can return. No schema evolution rules apply; a payload that
//! no longer decodes is simply treated as a miss upstream.

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CodecError {
    #[error("failed to encode cache value: {0}")]
    Encode(#[source] serde_json::Error),
    #[error("failed to decode cache value: {0}")]
    Decode(#[source] serde_json::Error),
}

pub fn encode<T: Serialize>(value: &T) -> Result<Vec<u8>, CodecError> {
    serde_json::to_vec(value).map_err(CodecError::Encode)
}

pub fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, CodecError> {
    serde_json::from_slice(bytes).map_err(CodecError::Decode)
}
