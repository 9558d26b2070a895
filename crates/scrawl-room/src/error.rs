//! Error types for the room layer.

use scrawl_protocol::{ConnectionId, PlayerId, RoomId};

/// Broad class of a [`RoomError`], used to pick a status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The request was understood but not allowed right now.
    Validation,
    NotFound,
    Internal,
}

/// Errors that can occur during room operations.
///
/// Validation and not-found errors leave the room untouched and are
/// reported only to the connection that caused them.
#[derive(Debug, thiserror::Error)]
pub enum RoomError {
    #[error("room {0} not found")]
    NotFound(RoomId),

    #[error("player {0} not found")]
    PlayerNotFound(PlayerId),

    #[error("{0} is not in a room")]
    NotInRoom(ConnectionId),

    #[error("{0} is already in room {1}")]
    AlreadyInRoom(ConnectionId, RoomId),

    #[error("room {0} is full")]
    RoomFull(RoomId),

    #[error("only the host can do that")]
    NotHost,

    #[error("only the drawer can do that")]
    NotDrawer,

    #[error("that word was not offered")]
    WordNotOffered,

    #[error("need at least {required} connected players, have {connected}")]
    NotEnoughPlayers { required: usize, connected: usize },

    /// The room's status doesn't allow this operation.
    #[error("invalid room state: {0}")]
    InvalidState(String),

    #[error("invalid settings: {0}")]
    InvalidSettings(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The room's command channel is full or closed.
    #[error("room {0} is unavailable")]
    Unavailable(RoomId),

    /// Room state contradicts itself. Logged; the game is ended.
    #[error("internal inconsistency: {0}")]
    Internal(String),
}

impl RoomError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound(_) | Self::PlayerNotFound(_) | Self::NotInRoom(_) => {
                ErrorKind::NotFound
            }
            Self::Unavailable(_) | Self::Internal(_) => ErrorKind::Internal,
            _ => ErrorKind::Validation,
        }
    }

    /// HTTP-style status code sent to the client.
    pub fn code(&self) -> u16 {
        match self {
            Self::InvalidSettings(_) | Self::InvalidInput(_) => 400,
            Self::NotHost | Self::NotDrawer => 403,
            Self::NotFound(_) | Self::PlayerNotFound(_) | Self::NotInRoom(_) => 404,
            Self::AlreadyInRoom(..)
            | Self::RoomFull(_)
            | Self::WordNotOffered
            | Self::NotEnoughPlayers { .. }
            | Self::InvalidState(_) => 409,
            Self::Internal(_) => 500,
            Self::Unavailable(_) => 503,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_follow_kind() {
        assert_eq!(RoomError::NotHost.code(), 403);
        assert_eq!(RoomError::NotHost.kind(), ErrorKind::Validation);
        assert_eq!(RoomError::NotFound(RoomId(1)).code(), 404);
        assert_eq!(RoomError::NotFound(RoomId(1)).kind(), ErrorKind::NotFound);
        assert_eq!(RoomError::InvalidInput("empty".into()).code(), 400);
        assert_eq!(RoomError::Unavailable(RoomId(1)).kind(), ErrorKind::Internal);
        assert_eq!(
            RoomError::NotEnoughPlayers { required: 2, connected: 1 }.to_string(),
            "need at least 2 connected players, have 1"
        );
    }
}
