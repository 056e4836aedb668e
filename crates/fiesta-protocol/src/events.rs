//! Client and server events.

use fiesta_games::bomba::BombaConfig;
use fiesta_games::{BombaState, GameKind, Statement, YoNuncaMode, YoNuncaState};
use fiesta_room::RoomView;
use fiesta_transport::ConnectionId;
use serde::{Deserialize, Serialize};

/// Everything a client may send.
///
/// Room-scoped events name their room explicitly; the server never
/// infers a room from the connection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "payload", rename_all_fields = "camelCase")]
pub enum ClientEvent {
    /// Payload: the host's name.
    #[serde(rename = "createRoom")]
    CreateRoom(String),

    /// Joins, or reconnects if the name is already seated.
    #[serde(rename = "joinRoom")]
    JoinRoom { room_code: String, player_name: String },

    /// Asks whether this connection is still seated somewhere.
    #[serde(rename = "checkSession")]
    CheckSession,

    /// Payload: room code.
    #[serde(rename = "yonunca:start")]
    YoNuncaStart(String),

    #[serde(rename = "yonunca:setMode")]
    YoNuncaSetMode { room_code: String, mode: YoNuncaMode },

    #[serde(rename = "yonunca:action")]
    YoNuncaAction {
        room_code: String,
        #[serde(rename = "type")]
        action: YoNuncaAction,
        #[serde(default)]
        payload: Option<StatementRef>,
    },

    #[serde(rename = "yonunca:drink")]
    YoNuncaDrink {
        room_code: String,
        player_id: ConnectionId,
        player_name: String,
    },

    /// Payload: room code.
    #[serde(rename = "yonunca:requestState")]
    YoNuncaRequestState(String),

    #[serde(rename = "bomba:start")]
    BombaStart {
        room_code: String,
        #[serde(default)]
        config: Option<BombaConfig>,
    },

    #[serde(rename = "bomba:reveal")]
    BombaReveal { room_code: String, cell_index: usize },

    /// Payload: room code.
    #[serde(rename = "bomba:restart")]
    BombaRestart(String),

    #[serde(rename = "bomba:selectTarget")]
    BombaSelectTarget {
        room_code: String,
        target_player_id: ConnectionId,
    },

    /// Payload: room code.
    #[serde(rename = "bomba:requestState")]
    BombaRequestState(String),

    /// Single-device play. Payload: player names, host first.
    #[serde(rename = "offline:start")]
    OfflineStart(Vec<String>),
}

impl ClientEvent {
    /// The wire name, for logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::CreateRoom(_) => "createRoom",
            Self::JoinRoom { .. } => "joinRoom",
            Self::CheckSession => "checkSession",
            Self::YoNuncaStart(_) => "yonunca:start",
            Self::YoNuncaSetMode { .. } => "yonunca:setMode",
            Self::YoNuncaAction { .. } => "yonunca:action",
            Self::YoNuncaDrink { .. } => "yonunca:drink",
            Self::YoNuncaRequestState(_) => "yonunca:requestState",
            Self::BombaStart { .. } => "bomba:start",
            Self::BombaReveal { .. } => "bomba:reveal",
            Self::BombaRestart(_) => "bomba:restart",
            Self::BombaSelectTarget { .. } => "bomba:selectTarget",
            Self::BombaRequestState(_) => "bomba:requestState",
            Self::OfflineStart(_) => "offline:start",
        }
    }

    /// The room this event targets, if it names one.
    pub fn room_code(&self) -> Option<&str> {
        match self {
            Self::JoinRoom { room_code, .. }
            | Self::YoNuncaSetMode { room_code, .. }
            | Self::YoNuncaAction { room_code, .. }
            | Self::YoNuncaDrink { room_code, .. }
            | Self::BombaStart { room_code, .. }
            | Self::BombaReveal { room_code, .. }
            | Self::BombaSelectTarget { room_code, .. } => Some(room_code),
            Self::YoNuncaStart(code)
            | Self::YoNuncaRequestState(code)
            | Self::BombaRestart(code)
            | Self::BombaRequestState(code) => Some(code),
            Self::CreateRoom(_) | Self::CheckSession | Self::OfflineStart(_) => None,
        }
    }
}

/// The `type` of a `yonunca:action`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum YoNuncaAction {
    /// Draw a random statement.
    Random,
    /// Look up the statement whose number the players typed.
    Specific,
    /// Pick a statement from the list.
    Select,
}

/// A statement number as sent by clients: a JSON number, or the digits
/// typed into a text box.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StatementRef {
    Number(i64),
    Text(String),
}

impl StatementRef {
    /// The numeric id, if there is one. Text is trimmed and parsed.
    pub fn id(&self) -> Option<i64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Text(s) => s.trim().parse().ok(),
        }
    }
}

/// Everything the server may push.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "payload")]
pub enum ServerEvent {
    /// To the creator only.
    #[serde(rename = "roomCreated")]
    RoomCreated(RoomView),

    /// To everyone subscribed to the room.
    #[serde(rename = "roomUpdated")]
    RoomUpdated(RoomView),

    /// Reply to `checkSession` when the connection is seated.
    #[serde(rename = "sessionRestored")]
    SessionRestored(RoomView),

    /// Reply to `checkSession` otherwise.
    #[serde(rename = "sessionNotFound")]
    SessionNotFound,

    #[serde(rename = "gameStarted")]
    GameStarted(GameKind),

    #[serde(rename = "yonunca:state")]
    YoNuncaState(YoNuncaState),

    /// The full statement catalog.
    #[serde(rename = "yonunca:list")]
    YoNuncaList(Vec<Statement>),

    #[serde(rename = "bomba:state")]
    BombaState(BombaState),

    /// A human-readable rejection, sent to the requester only.
    #[serde(rename = "error")]
    Error(String),
}

impl ServerEvent {
    /// The wire name, for logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::RoomCreated(_) => "roomCreated",
            Self::RoomUpdated(_) => "roomUpdated",
            Self::SessionRestored(_) => "sessionRestored",
            Self::SessionNotFound => "sessionNotFound",
            Self::GameStarted(_) => "gameStarted",
            Self::YoNuncaState(_) => "yonunca:state",
            Self::YoNuncaList(_) => "yonunca:list",
            Self::BombaState(_) => "bomba:state",
            Self::Error(_) => "error",
        }
    }
}
