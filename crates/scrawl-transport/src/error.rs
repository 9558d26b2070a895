/// Errors that can occur in the transport layer.
///
/// WebSocket library errors are flattened to strings so callers never
/// need `tokio-tungstenite` in their own dependency list.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The listening socket could not be bound.
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    /// Accepting a TCP connection failed.
    #[error("accept failed: {0}")]
    Accept(#[source] std::io::Error),

    /// The TCP stream connected but the WebSocket upgrade did not finish.
    #[error("websocket upgrade failed: {0}")]
    Upgrade(String),

    /// Writing a frame failed. The peer is treated as gone.
    #[error("send failed: {0}")]
    Send(String),

    /// Reading a frame failed.
    #[error("receive failed: {0}")]
    Receive(String),
}
