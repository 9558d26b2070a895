//! Wire protocol for Scrawl.
//!
//! - **Actions** ([`ClientAction`]): what a client may ask for.
//! - **Events** ([`ServerEvent`]): what the server tells a client.
//! - **Types** ([`GameSettings`], [`RoomSnapshot`], [`Stroke`], ...): the
//!   data both directions share.
//! - **Codec** ([`Codec`], [`JsonCodec`]): bytes in, bytes out.
//!
//! The protocol knows nothing about rooms or timers. It only describes
//! messages and how they are framed.
//!
//! ```text
//! Transport (bytes) → Protocol (ClientAction / ServerEvent) → Room
//! ```

mod action;
mod codec;
mod error;
mod event;
mod types;

pub use action::ClientAction;
pub use codec::Codec;
#[cfg(feature = "json")]
pub use codec::JsonCodec;
pub use error::ProtocolError;
pub use event::ServerEvent;
pub use scrawl_transport::ConnectionId;
pub use types::{
    ChatAuthor, ChatKind, ChatMessage, GameSettings, GameStatus, HintCadence,
    PlayerId, PlayerToken, PlayerView, Point, RankEntry, Recipient, RoomId,
    RoomListEntry, RoomSnapshot, ScoreGain, Stroke, StrokeTool, Visibility,
    WordMode,
};

/// Largest inbound frame the server will try to decode, in bytes.
pub const MAX_FRAME_LEN: usize = 64 * 1024;
