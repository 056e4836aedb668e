//! Codec trait and implementations for serializing/deserializing events.

use serde::{Serialize, de::DeserializeOwned};

use crate::ProtocolError;

/// Converts events to bytes and back.
///
/// `Send + Sync + 'static` so a codec can live inside long-running
/// server tasks.
pub trait Codec: Send + Sync + 'static {
    /// # Errors
    /// [`ProtocolError::Encode`] if the value can't be represented.
    fn encode<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, ProtocolError>;

    /// # Errors
    /// [`ProtocolError::Decode`] if the bytes are malformed or don't
    /// match `T`.
    fn decode<T: DeserializeOwned>(&self, data: &[u8]) -> Result<T, ProtocolError>;
}

/// A [`Codec`] that speaks JSON text frames.
///
/// ```rust
/// use fiesta_protocol::{ClientEvent, Codec, JsonCodec};
///
/// let codec = JsonCodec;
/// let event: ClientEvent =
///     codec.decode(br#"{"event":"createRoom","payload":"Ana"}"#).unwrap();
/// assert_eq!(event, ClientEvent::CreateRoom("Ana".into()));
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

#[cfg(all(test, feature = "json"))]
mod tests {
    use super::*;
    use crate::ServerEvent;

    #[test]
    fn test_decode_garbage_is_decode_error() {
        let result: Result<ServerEvent, _> = JsonCodec.decode(b"not json");
        assert!(matches!(result, Err(ProtocolError::Decode(_))));
    }

    #[test]
    fn test_encode_produces_text() {
        let bytes = JsonCodec.encode(&ServerEvent::SessionNotFound).unwrap();
        assert_eq!(std::str::from_utf8(&bytes).unwrap(), r#"{"event":"sessionNotFound"}"#);
    }
}
