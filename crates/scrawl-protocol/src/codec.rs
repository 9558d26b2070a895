//! Turning actions and events into bytes and back.

use serde::{Serialize, de::DeserializeOwned};

use crate::{ClientAction, MAX_FRAME_LEN, ProtocolError, ServerEvent};

/// Encodes and decodes protocol values.
///
/// `Send + Sync + 'static` so one codec can be shared by every connection
/// task.
pub trait Codec: Send + Sync + 'static {
    /// # Errors
    /// Returns `ProtocolError::Encode` if the value can't be represented.
    fn encode<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, ProtocolError>;

    /// # Errors
    /// Returns `ProtocolError::Decode` if the bytes are malformed or don't
    /// match `T`.
    fn decode<T: DeserializeOwned>(&self, data: &[u8]) -> Result<T, ProtocolError>;

    /// Encodes one outbound event.
    fn encode_event(&self, event: &ServerEvent) -> Result<Vec<u8>, ProtocolError> {
        self.encode(event)
    }

    /// Decodes one inbound frame, refusing oversized ones before parsing.
    fn decode_action(&self, data: &[u8]) -> Result<ClientAction, ProtocolError> {
        if data.len() > MAX_FRAME_LEN {
            return Err(ProtocolError::InvalidMessage(format!(
                "frame of {} bytes exceeds the {MAX_FRAME_LEN} byte limit",
                data.len()
            )));
        }
        self.decode(data)
    }
}

/// JSON over text frames. Behind the `json` feature (on by default).
///
/// ```rust
/// use scrawl_protocol::{ClientAction, Codec, JsonCodec};
///
/// let action = JsonCodec
///     .decode_action(br#"{"type":"Chat","text":"dog"}"#)
///     .unwrap();
/// assert_eq!(action, ClientAction::Chat { text: "dog".into() });
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
