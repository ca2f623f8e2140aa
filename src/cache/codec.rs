//! Encoding of records to the opaque blobs held by the store.
//!
//! The format is private to this crate: blobs only need to round-trip
//! between writes and reads of the same deployment, not across versions or
//! consumers.

use color_eyre::{eyre::eyre, Result};
use serde::{de::DeserializeOwned, Serialize};

/// Encode a record into an opaque blob.
pub fn encode<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>> {
  serde_json::to_vec(value).map_err(|e| eyre!("Failed to encode cache record: {}", e))
}

/// Decode a blob produced by [`encode`].
pub fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T> {
  serde_json::from_slice(bytes).map_err(|e| eyre!("Failed to decode cache record: {}", e))
}
