//! # Scrawl
//!
//! A server-authoritative backend for a multiplayer drawing-and-guessing
//! game. One player draws a secret word, the others race to guess it in
//! chat, and the server owns every timer, score and reveal.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use scrawl::prelude::*;
//!
//! # async fn start() -> Result<(), ScrawlError> {
//! let server = ScrawlServer::builder()
//!     .bind("0.0.0.0:8080")
//!     .room_config(RoomConfig::default())
//!     .build()
//!     .await?;
//! server.run().await
//! # }
//! ```

mod error;
mod handler;
mod server;

pub use error::ScrawlError;
pub use server::{ScrawlServer, ScrawlServerBuilder, ServerConfig};

/// The types most servers and clients need.
pub mod prelude {
    pub use crate::{ScrawlError, ScrawlServer, ScrawlServerBuilder, ServerConfig};
    pub use scrawl_game::{GuessEvaluator, WordBank, WordBankError};
    pub use scrawl_protocol::{
        ChatKind, ChatMessage, ClientAction, Codec, GameSettings, GameStatus, HintCadence,
        JsonCodec, PlayerId, PlayerToken, PlayerView, ProtocolError, RoomId, RoomSnapshot,
        ServerEvent, Stroke, Visibility, WordMode,
    };
    pub use scrawl_room::{RoomConfig, RoomError};
    pub use scrawl_tick::{CountdownConfig, TickPolicy};
    pub use scrawl_transport::TransportError;
}
