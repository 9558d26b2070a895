//! Inbound actions: what a client may ask the server to do.

use serde::{Deserialize, Serialize};

use crate::{GameSettings, PlayerToken, RoomId, Stroke, Visibility};

/// A request from one connection.
///
/// Internally tagged, so the JSON form is
/// `{ "type": "JoinRoom", "room_id": 4, "name": "Bob", "avatar": "🦊" }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ClientAction {
    /// Open a new room with the sender as host.
    CreateRoom {
        name: String,
        #[serde(default)]
        avatar: String,
        #[serde(default)]
        visibility: Visibility,
    },

    /// Enter an existing room as a new player.
    JoinRoom {
        room_id: RoomId,
        name: String,
        #[serde(default)]
        avatar: String,
    },

    /// Reclaim a player record after a dropped connection. `name` and
    /// `avatar` are used only if the token no longer matches anybody.
    Reconnect {
        room_id: RoomId,
        token: PlayerToken,
        #[serde(default)]
        name: Option<String>,
        #[serde(default)]
        avatar: Option<String>,
    },

    LeaveRoom,

    /// Ask for the public room list.
    ListRooms,

    /// Host only.
    StartGame {
        #[serde(default)]
        settings: GameSettings,
    },

    /// Drawer only, while selecting.
    SelectWord { word: String },

    /// A chat line, which doubles as a guess while a word is live.
    Chat { text: String },

    /// Drawer only, while playing.
    Stroke { stroke: Stroke },

    /// Drawer only, while playing.
    ClearCanvas,
}

impl ClientAction {
    /// Short name for logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::CreateRoom { .. } => "CreateRoom",
            Self::JoinRoom { .. } => "JoinRoom",
            Self::Reconnect { .. } => "Reconnect",
            Self::LeaveRoom => "LeaveRoom",
            Self::ListRooms => "ListRooms",
            Self::StartGame { .. } => "StartGame",
            Self::SelectWord { .. } => "SelectWord",
            Self::Chat { .. } => "Chat",
            Self::Stroke { .. } => "Stroke",
            Self::ClearCanvas => "ClearCanvas",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Point, StrokeTool, WordMode};

    #[test]
    fn test_join_room_json_shape() {
        let json = r#"{"type":"JoinRoom","room_id":4,"name":"Bob"}"#;
        let action: ClientAction = serde_json::from_str(json).unwrap();
        assert_eq!(
            action,
            ClientAction::JoinRoom {
                room_id: RoomId(4),
                name: "Bob".into(),
                avatar: String::new(),
            }
        );
    }

    #[test]
    fn test_create_room_defaults_to_public() {
        let json = r#"{"type":"CreateRoom","name":"Alice","avatar":"cat"}"#;
        let action: ClientAction = serde_json::from_str(json).unwrap();
        match action {
            ClientAction::CreateRoom { visibility, .. } => {
                assert_eq!(visibility, Visibility::Public);
            }
            other => panic!("expected CreateRoom, got {other:?}"),
        }
    }

    #[test]
    fn test_start_game_with_partial_settings() {
        let json = r#"{"type":"StartGame","settings":{"rounds":2,"word_mode":"CustomWords","custom_words":["dog","cat","fish"]}}"#;
        let action: ClientAction = serde_json::from_str(json).unwrap();
        match action {
            ClientAction::StartGame { settings } => {
                assert_eq!(settings.rounds, 2);
                assert_eq!(settings.draw_seconds, 80);
                assert_eq!(settings.word_mode, WordMode::CustomWords);
                assert_eq!(settings.custom_words.len(), 3);
            }
            other => panic!("expected StartGame, got {other:?}"),
        }
    }

    #[test]
    fn test_unit_actions_need_only_a_tag() {
        let action: ClientAction =
            serde_json::from_str(r#"{"type":"ClearCanvas"}"#).unwrap();
        assert_eq!(action, ClientAction::ClearCanvas);
        assert_eq!(action.name(), "ClearCanvas");
    }

    #[test]
    fn test_stroke_tool_defaults_to_pen() {
        let json = r##"{"type":"Stroke","stroke":{"color":"#000","width":3.0,"points":[{"x":1.0,"y":2.0}]}}"##;
        let action: ClientAction = serde_json::from_str(json).unwrap();
        match action {
            ClientAction::Stroke { stroke } => {
                assert_eq!(stroke.tool, StrokeTool::Pen);
                assert_eq!(stroke.points, vec![Point { x: 1.0, y: 2.0 }]);
            }
            other => panic!("expected Stroke, got {other:?}"),
        }
    }

    #[test]
    fn test_unknown_action_is_rejected() {
        let result = serde_json::from_str::<ClientAction>(r#"{"type":"Teleport"}"#);
        assert!(result.is_err());
    }
}
