//! The Bomba snapshot sent to clients.

use std::collections::BTreeMap;

use fiesta_transport::ConnectionId;
use serde::{Deserialize, Serialize};

use super::content::{BombKind, CellContent};

/// A seat at the table. `index` is fixed for the life of the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BombaPlayer {
    pub id: ConnectionId,
    pub name: String,
    pub is_host: bool,
    pub index: usize,
}

impl BombaPlayer {
    /// A player not yet seated. The engine assigns `index`.
    pub fn new(id: ConnectionId, name: impl Into<String>, is_host: bool) -> Self {
        Self {
            id,
            name: name.into(),
            is_host,
            index: 0,
        }
    }
}

/// Which way the turn moves. On the wire: `1` or `-1`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "i8", try_from = "i8")]
pub enum TurnDirection {
    #[default]
    Forward,
    Backward,
}

impl TurnDirection {
    pub fn reversed(self) -> Self {
        match self {
            Self::Forward => Self::Backward,
            Self::Backward => Self::Forward,
        }
    }

    pub fn step(self) -> isize {
        match self {
            Self::Forward => 1,
            Self::Backward => -1,
        }
    }
}

impl From<TurnDirection> for i8 {
    fn from(dir: TurnDirection) -> Self {
        match dir {
            TurnDirection::Forward => 1,
            TurnDirection::Backward => -1,
        }
    }
}

impl TryFrom<i8> for TurnDirection {
    type Error = String;

    fn try_from(value: i8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::Forward),
            -1 => Ok(Self::Backward),
            other => Err(format!("turn direction must be 1 or -1, got {other}")),
        }
    }
}

/// A revealed cell: what it was and who opened it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RevealedCell {
    #[serde(flatten)]
    pub content: CellContent,
    pub revealed_by: ConnectionId,
}

/// Who drank, and how much, when a bomb resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BombEffect {
    #[serde(rename = "type")]
    pub kind: BombKind,
    pub amount: u64,
    /// Name of the revealer.
    pub player: String,
    /// Name of the sniper's pick.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
}

/// One line of the game log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RevealEvent {
    /// Name of the revealer.
    pub player: String,
    pub cell_index: usize,
    pub content: CellContent,
    pub drink_counter_before: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bomb_effect: Option<BombEffect>,
}

/// A sniper bomb waiting for its revealer to pick a target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingSniper {
    pub cell_index: usize,
    pub player_id: ConnectionId,
}

/// Full Bomba state as sent to clients.
///
/// `waiting_for_target` is kept alongside `pending_sniper_data` because
/// clients read the flag directly; the engine sets and clears both
/// together.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BombaState {
    pub players: Vec<BombaPlayer>,
    pub current_turn_index: usize,
    pub drink_counter: u64,
    /// Cell indices in reveal order.
    pub revealed_cells: Vec<usize>,
    pub cells: BTreeMap<usize, RevealedCell>,
    pub bombs_revealed: usize,
    pub game_over: bool,
    pub turn_direction: TurnDirection,
    pub history: Vec<RevealEvent>,
    pub waiting_for_target: bool,
    pub pending_sniper_data: Option<PendingSniper>,
    pub grid_size: usize,
    pub total_squares: usize,
    pub total_bombs: usize,
}

impl BombaState {
    /// The player whose turn it is.
    pub fn current_player(&self) -> Option<&BombaPlayer> {
        self.players.get(self.current_turn_index)
    }

    pub fn player_by_id(&self, id: &ConnectionId) -> Option<&BombaPlayer> {
        self.players.iter().find(|p| &p.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_turn_direction_wire_values() {
        assert_eq!(serde_json::to_string(&TurnDirection::Forward).unwrap(), "1");
        assert_eq!(serde_json::to_string(&TurnDirection::Backward).unwrap(), "-1");
        let dir: TurnDirection = serde_json::from_str("-1").unwrap();
        assert_eq!(dir, TurnDirection::Backward);
        assert!(serde_json::from_str::<TurnDirection>("0").is_err());
    }

    #[test]
    fn test_turn_direction_reversed() {
        assert_eq!(TurnDirection::Forward.reversed(), TurnDirection::Backward);
        assert_eq!(TurnDirection::Backward.reversed().step(), 1);
    }

    #[test]
    fn test_revealed_cell_flattens_content() {
        let cell = RevealedCell {
            content: CellContent::Bomb { kind: BombKind::Nuke },
            revealed_by: ConnectionId::new("conn-1"),
        };
        let json = serde_json::to_value(&cell).unwrap();
        assert_eq!(json["category"], "BOMB");
        assert_eq!(json["type"], "BOMB_NUKE");
        assert_eq!(json["name"], "La Bomba Nuclear");
        assert_eq!(json["description"], "TODOS beben");
        assert_eq!(json["revealedBy"], "conn-1");
        let back: RevealedCell = serde_json::from_value(json).unwrap();
        assert_eq!(back, cell);
    }
}
