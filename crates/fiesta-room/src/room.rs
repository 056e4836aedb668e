//! Rooms, players, and the client-facing room view.

use fiesta_games::bomba::BombaPlayer;
use fiesta_games::{BombaEngine, GameKind, YoNuncaEngine};
use fiesta_transport::ConnectionId;
use serde::{Deserialize, Serialize};

/// A player seated in a room.
///
/// `name` is the identity: it survives reconnects, while `id` is rebound
/// to whatever connection the player currently uses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    pub id: ConnectionId,
    pub name: String,
    pub is_host: bool,
}

impl Player {
    pub fn new(id: ConnectionId, name: impl Into<String>, is_host: bool) -> Self {
        Self {
            id,
            name: name.into(),
            is_host,
        }
    }
}

/// The game slot of a room. Starting a game replaces whatever was here.
#[derive(Default)]
pub enum ActiveGame {
    #[default]
    Idle,
    YoNunca(YoNuncaEngine),
    Bomba(BombaEngine),
}

impl ActiveGame {
    pub fn kind(&self) -> Option<GameKind> {
        match self {
            Self::Idle => None,
            Self::YoNunca(_) => Some(GameKind::YoNunca),
            Self::Bomba(_) => Some(GameKind::Bomba),
        }
    }
}

impl std::fmt::Debug for ActiveGame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.kind() {
            Some(kind) => write!(f, "ActiveGame({kind})"),
            None => write!(f, "ActiveGame(idle)"),
        }
    }
}

/// A live room. Never serialized directly; see [`RoomView`].
#[derive(Debug)]
pub struct Room {
    pub code: String,
    /// Join order. Never empty while the room is registered.
    pub players: Vec<Player>,
    pub game: ActiveGame,
}

impl Room {
    pub(crate) fn new(code: String, host: Player) -> Self {
        Self {
            code,
            players: vec![host],
            game: ActiveGame::Idle,
        }
    }

    pub fn view(&self) -> RoomView {
        RoomView {
            code: self.code.clone(),
            players: self.players.clone(),
            game: self.game.kind(),
        }
    }

    pub fn player_by_id(&self, id: &ConnectionId) -> Option<&Player> {
        self.players.iter().find(|p| &p.id == id)
    }

    pub fn player_by_name(&self, name: &str) -> Option<&Player> {
        self.players.iter().find(|p| p.name == name)
    }

    pub fn host(&self) -> Option<&Player> {
        self.players.iter().find(|p| p.is_host)
    }

    /// The Bomba seat whose turn it is, if that player has left the room.
    ///
    /// Seats are fixed at game start, so nobody can play until the game
    /// is restarted.
    pub fn absent_turn_holder(&self) -> Option<&BombaPlayer> {
        let ActiveGame::Bomba(engine) = &self.game else {
            return None;
        };
        engine
            .current_player()
            .filter(|seat| self.player_by_id(&seat.id).is_none())
    }

    /// Current players as Bomba seats, in join order.
    pub fn bomba_seats(&self) -> Vec<BombaPlayer> {
        self.players
            .iter()
            .map(|p| BombaPlayer::new(p.id.clone(), p.name.clone(), p.is_host))
            .collect()
    }
}

/// What clients see of a room: code, players and which game is on.
/// The engine itself never goes over the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomView {
    pub code: String,
    pub players: Vec<Player>,
    pub game: Option<GameKind>,
}
