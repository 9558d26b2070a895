//! Sockets for Scrawl.
//!
//! Rooms never see a socket. They push server events into a channel per
//! player, and the server's connection task drains that channel into
//! the [`Connection`] it got from [`Transport::accept`] while reading
//! client actions from the same connection. That one task therefore has a
//! `recv` and a `send` in flight at once, which is the contract
//! [`Connection`] spells out.
//!
//! # Feature Flags
//!
//! - `websocket` (default): [`WebSocketTransport`] on `tokio-tungstenite`

#![allow(async_fn_in_trait)]

mod error;
#[cfg(feature = "websocket")]
mod websocket;

pub use error::TransportError;
#[cfg(feature = "websocket")]
pub use websocket::{WebSocketConnection, WebSocketTransport};

use std::fmt;

/// Names one socket for as long as it is open.
///
/// Seats outlive sockets: a reconnecting player keeps their seat but
/// arrives on a new `ConnectionId`. Rooms store the id a seat is bound to
/// and drop any close or action from an id that no longer matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConnectionId(u64);

impl ConnectionId {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn into_inner(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "conn-{}", self.0)
    }
}

/// A listener that hands out connections.
pub trait Transport: Send + Sync + 'static {
    type Connection: Connection;
    type Error: std::error::Error + Send + Sync;

    /// Waits for the next client. Each result carries a fresh
    /// [`ConnectionId`]; ids are never reused within a process.
    async fn accept(&mut self) -> Result<Self::Connection, Self::Error>;

    /// Stops accepting. Connections already handed out stay open.
    async fn shutdown(&self) -> Result<(), Self::Error>;
}

/// One client socket carrying whole frames (one encoded action or event
/// each).
///
/// `send` and `recv` take `&self` and may be pending at the same time, one
/// in each arm of a `select!`. A `recv` blocked on a quiet client must not
/// hold up an outgoing event, and a slow `send` must not stall reads.
/// Concurrent calls to the *same* method are serialised.
pub trait Connection: Send + Sync + 'static {
    type Error: std::error::Error + Send + Sync;

    /// Writes one frame.
    async fn send(&self, data: &[u8]) -> Result<(), Self::Error>;

    /// Reads the next frame, skipping control traffic. `Ok(None)` once the
    /// client has closed cleanly; an error ends the connection.
    async fn recv(&self) -> Result<Option<Vec<u8>>, Self::Error>;

    async fn close(&self) -> Result<(), Self::Error>;

    fn id(&self) -> ConnectionId;
}
