//! Codec trait and implementations for moving snapshots and reports
//! across the collaborator boundary.
//!
//! The engine never touches bytes itself. The collaborator picks a
//! [`Codec`], decodes its [`SwapSnapshot`](crate::SwapSnapshot) with it,
//! and encodes the resulting [`PassReport`](crate::PassReport) back.

use serde::{Serialize, de::DeserializeOwned};

use crate::{ProtocolError, SwapSnapshot};

/// A codec that can encode Rust types to bytes and decode bytes back.
///
/// ## Trait bounds
///
/// - `Send + Sync`: a codec may be shared by every task that talks to
///   the swap service, on any Tokio worker thread.
/// - `'static`: the codec owns what it needs, so it can live inside a
///   long-running task.
///
/// `decode` asks for `DeserializeOwned` rather than `Deserialize<'de>`:
/// the decoded snapshot owns its strings, and the input buffer can be
/// dropped as soon as decoding returns.
pub trait Codec: Send + Sync + 'static {
    /// Serializes a value into bytes.
    ///
    /// # Errors
    /// Returns `ProtocolError::Encode` if serialization fails.
    fn encode<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, ProtocolError>;

    /// Deserializes bytes back into a value.
    ///
    /// # Errors
    /// Returns `ProtocolError::Decode` if the bytes are malformed or don't
    /// match the expected type.
    fn decode<T: DeserializeOwned>(&self, data: &[u8]) -> Result<T, ProtocolError>;

    /// Decodes a snapshot and runs [`SwapSnapshot::validate`] on it.
    ///
    /// Provided once here so every codec validates the same way; an
    /// implementation only has to supply `encode` and `decode`.
    ///
    /// # Errors
    /// `ProtocolError::Decode` for bytes that don't parse, or
    /// `ProtocolError::InvalidSnapshot` for a blank identifier.
    fn decode_snapshot(&self, data: &[u8]) -> Result<SwapSnapshot, ProtocolError> {
        let snapshot: SwapSnapshot = self.decode(data)?;
        snapshot.validate()?;
        Ok(snapshot)
    }
}

// ---------------------------------------------------------------------------
// JsonCodec
// ---------------------------------------------------------------------------

/// A [`Codec`] that uses JSON (via `serde_json`).
///
/// Behind the `json` feature flag (enabled by default).
///
/// ## Example
///
/// ```rust
/// use roomswap_protocol::{Codec, JsonCodec, SwapSnapshot};
///
/// let codec = JsonCodec;
/// let snapshot: SwapSnapshot = codec
///     .decode_snapshot(br#"{"rooms":[{"room_id":"R101","occupant":"A"}],
///                         "requests":[{"from":"R101","to":"R101"}]}"#)
///     .unwrap();
/// assert_eq!(snapshot.requests.len(), 1);
/// ```
#[cfg(feature = "json")]
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

#[cfg(feature = "json")]
impl Codec for JsonCodec {
    fn encode<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, ProtocolError> {
        serde_json::to_vec(value).map_err(ProtocolError::Encode)
    }

    fn decode<T: DeserializeOwned>(&self, data: &[u8]) -> Result<T, ProtocolError> {
        serde_json::from_slice(data).map_err(ProtocolError::Decode)
    }
}
