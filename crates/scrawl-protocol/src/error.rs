//! Error types for the protocol layer.

/// Errors that can occur while encoding outbound events or decoding
/// inbound actions.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// Serializing an event failed.
    #[cfg(feature = "json")]
    #[error("encode failed: {0}")]
    Encode(serde_json::Error),

    /// The frame is not a well-formed action (bad JSON, unknown `type`,
    /// missing or mistyped fields).
    #[cfg(feature = "json")]
    #[error("decode failed: {0}")]
    Decode(serde_json::Error),

    /// The frame decoded but breaks a protocol rule, such as exceeding the
    /// frame size limit.
    #[error("invalid message: {0}")]
    InvalidMessage(String),
}
