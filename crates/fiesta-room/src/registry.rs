//! The room registry: every open room, keyed by code.

use std::collections::HashMap;

use fiesta_transport::ConnectionId;
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::room::{ActiveGame, Player, Room, RoomView};
use crate::{RoomError, code};

/// Outcome of [`RoomRegistry::remove_player`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Removal {
    /// The player left; others remain. `room` is the updated view.
    Left { code: String, room: RoomView },
    /// The last player left and the room is gone.
    Closed { code: String },
}

impl Removal {
    pub fn code(&self) -> &str {
        match self {
            Self::Left { code, .. } | Self::Closed { code } => code,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Closed { .. })
    }
}

/// Owns every open room.
///
/// Invariants held between calls:
/// - codes are unique among open rooms;
/// - every registered room has at least one player;
/// - every registered room has exactly one host.
pub struct RoomRegistry {
    rooms: HashMap<String, Room>,
    rng: StdRng,
}

impl RoomRegistry {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_os_rng())
    }

    /// Same as [`new`](Self::new) with a caller-supplied RNG for codes.
    pub fn with_rng(rng: StdRng) -> Self {
        Self {
            rooms: HashMap::new(),
            rng,
        }
    }

    /// Opens a room with `host_name` as its only player and host.
    pub fn create_room(&mut self, host_id: ConnectionId, host_name: impl Into<String>) -> &Room {
        let code = loop {
            let candidate = code::generate(&mut self.rng);
            if !self.rooms.contains_key(&candidate) {
                break candidate;
            }
            tracing::debug!(code = %candidate, "room code collision, retrying");
        };

        let host = Player::new(host_id, host_name, true);
        tracing::info!(room = %code, host = %host.name, "room created");
        let room = Room::new(code.clone(), host);
        self.rooms.entry(code).insert_entry(room).into_mut()
    }

    /// Appends a non-host player.
    ///
    /// # Errors
    /// [`RoomError::NotFound`] for an unknown code,
    /// [`RoomError::NameTaken`] if the name is already seated. The first
    /// claimant of a name keeps it.
    pub fn join_room(
        &mut self,
        code: &str,
        id: ConnectionId,
        name: impl Into<String>,
    ) -> Result<&Room, RoomError> {
        let name = name.into();
        let room = self
            .rooms
            .get_mut(code)
            .ok_or_else(|| RoomError::NotFound(code.to_string()))?;

        if room.player_by_name(&name).is_some() {
            return Err(RoomError::NameTaken(name));
        }

        tracing::info!(room = %code, player = %name, %id, "player joined");
        room.players.push(Player::new(id, name, false));
        Ok(&*room)
    }

    /// Rebinds the player called `name` to `new_id`, keeping their seat
    /// and host flag. A running Bomba game follows the player to the new
    /// connection.
    ///
    /// Returns `None` if the room or the name doesn't exist.
    pub fn reconnect_player(
        &mut self,
        code: &str,
        name: &str,
        new_id: ConnectionId,
    ) -> Option<&Room> {
        let room = self.rooms.get_mut(code)?;
        let player = room.players.iter_mut().find(|p| p.name == name)?;
        let old_id = std::mem::replace(&mut player.id, new_id.clone());

        if let ActiveGame::Bomba(engine) = &mut room.game {
            engine.rebind_player(name, &new_id);
        }

        tracing::info!(room = %code, player = %name, %old_id, %new_id, "player reconnected");
        Some(&*room)
    }

    /// Removes whichever player is bound to `id`.
    ///
    /// Deletes the room if it empties; otherwise promotes the first
    /// remaining player when the host left. Returns `None` if `id` isn't
    /// seated anywhere.
    pub fn remove_player(&mut self, id: &ConnectionId) -> Option<Removal> {
        let (code, room) = self
            .rooms
            .iter_mut()
            .find(|(_, room)| room.player_by_id(id).is_some())?;
        let code = code.clone();

        let removed = match room.players.iter().position(|p| &p.id == id) {
            Some(index) => room.players.remove(index),
            None => return None,
        };
        tracing::info!(room = %code, player = %removed.name, %id, "player left");

        if room.players.is_empty() {
            self.rooms.remove(&code);
            tracing::info!(room = %code, "room closed");
            return Some(Removal::Closed { code });
        }

        if room.host().is_none() {
            if let Some(first) = room.players.first_mut() {
                first.is_host = true;
                tracing::info!(room = %code, host = %first.name, "host promoted");
            }
        }

        let view = room.view();
        Some(Removal::Left { code, room: view })
    }

    /// Drops a room outright, whoever is still in it.
    pub fn close_room(&mut self, code: &str) -> Option<Room> {
        let room = self.rooms.remove(code)?;
        tracing::info!(room = %code, players = room.players.len(), "room closed");
        Some(room)
    }

    pub fn get_room(&self, code: &str) -> Option<&Room> {
        self.rooms.get(code)
    }

    pub fn get_room_mut(&mut self, code: &str) -> Option<&mut Room> {
        self.rooms.get_mut(code)
    }

    /// The room `id` is seated in, if any.
    pub fn find_by_connection(&self, id: &ConnectionId) -> Option<&Room> {
        self.rooms.values().find(|room| room.player_by_id(id).is_some())
    }

    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }

    pub fn codes(&self) -> Vec<String> {
        self.rooms.keys().cloned().collect()
    }
}

impl Default for RoomRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(s: &str) -> ConnectionId {
        ConnectionId::new(s)
    }

    #[test]
    fn test_remove_player_unknown_returns_none() {
        let mut registry = RoomRegistry::with_rng(StdRng::seed_from_u64(0));
        registry.create_room(id("c1"), "Ana");
        assert!(registry.remove_player(&id("nope")).is_none());
        assert_eq!(registry.room_count(), 1);
    }

    #[test]
    fn test_close_room_removes_everyone() {
        let mut registry = RoomRegistry::with_rng(StdRng::seed_from_u64(0));
        let code = registry.create_room(id("c1"), "Ana").code.clone();
        registry.join_room(&code, id("c2"), "Beto").unwrap();
        let room = registry.close_room(&code).unwrap();
        assert_eq!(room.players.len(), 2);
        assert!(registry.find_by_connection(&id("c2")).is_none());
        assert!(registry.close_room(&code).is_none());
    }

    #[test]
    fn test_removal_accessors() {
        let closed = Removal::Closed { code: "AAAAAA".into() };
        assert!(closed.is_empty());
        assert_eq!(closed.code(), "AAAAAA");
    }
}
