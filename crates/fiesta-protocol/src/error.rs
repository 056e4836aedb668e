//! Error types for the protocol layer.

/// Errors that can occur while encoding or decoding events.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// Serialization failed.
    #[cfg(feature = "json")]
    #[error("encode failed: {0}")]
    Encode(serde_json::Error),

    /// The frame isn't a known event, or its payload is missing fields
    /// or has the wrong shape.
    #[cfg(feature = "json")]
    #[error("decode failed: {0}")]
    Decode(serde_json::Error),
}
