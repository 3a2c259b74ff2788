//! Error types for the protocol layer.

/// Errors that can occur while encoding or decoding snapshots and reports.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// Serialization failed.
    #[cfg(feature = "json")]
    #[error("encode failed: {0}")]
    Encode(serde_json::Error),

    /// Deserialization failed: malformed JSON, missing fields, wrong types.
    #[cfg(feature = "json")]
    #[error("decode failed: {0}")]
    Decode(serde_json::Error),

    /// The payload parsed but is not usable, e.g. an empty room ID.
    #[error("invalid snapshot: {0}")]
    InvalidSnapshot(String),
}
