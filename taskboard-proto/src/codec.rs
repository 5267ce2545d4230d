//! JSON encoding and decoding for collaborator request and response bodies.
//!
//! Also understands the collaborator's error payload shape
//! (`{"detail": "..."}`), which is surfaced verbatim to the user.

use serde::Serialize;
use serde::de::DeserializeOwned;

/// Error type for codec encode/decode operations.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// A value could not be serialized to JSON.
    #[error("serialization error: {0}")]
    Serialization(String),
    /// Bytes were not valid JSON for the expected type.
    #[error("decode error: {0}")]
    Decode(String),
}

/// Encodes a request body as JSON bytes.
///
/// # Errors
///
/// Returns `CodecError::Serialization` if the value cannot be serialized.
pub fn encode<T: Serialize>(value: &T) -> Result<Vec<u8>, CodecError> {
    serde_json::to_vec(value).map_err(|e| CodecError::Serialization(e.to_string()))
}

/// Decodes a response body from JSON bytes.
///
/// # Errors
///
/// Returns `CodecError::Decode` if the bytes are not valid JSON for `T`.
pub fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, CodecError> {
    serde_json::from_slice(bytes).map_err(|e| CodecError::Decode(e.to_string()))
}

/// Error payload returned by the collaborator on non-2xx responses.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, serde::Deserialize)]
pub struct ErrorBody {
    /// Human-readable reason, when the collaborator provides one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<serde_json::Value>,
}

impl ErrorBody {
    /// Wraps a textual detail message.
    #[must_use]
    pub fn with_detail(detail: impl Into<String>) -> Self {
        Self {
            detail: Some(serde_json::Value::String(detail.into())),
        }
    }

    /// Returns the detail as display text.
    ///
    /// String details are returned as-is, other non-null JSON values in
    /// compact form. Empty strings count as absent.
    #[must_use]
    pub fn detail_text(&self) -> Option<String> {
        match self.detail.as_ref()? {
            serde_json::Value::Null => None,
            serde_json::Value::String(s) if s.is_empty() => None,
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }
}

/// Extracts the detail message from an error response body.
///
/// Returns `None` when the body is not JSON, not an object, or has no
/// usable `detail` field. Never fails.
#[must_use]
pub fn decode_error_detail(bytes: &[u8]) -> Option<String> {
    decode::<ErrorBody>(bytes).ok()?.detail_text()
}
