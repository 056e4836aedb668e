//! The session coordinator: routes client events to rooms and engines.
//!
//! # Error policy
//!
//! - Rejections the player should see (`RoomError`, `GameError`) become
//!   an `error` event to the sender and nobody else.
//! - Structural misses (unknown room, no engine, wrong engine kind) are
//!   logged at `debug` and absorbed. Clients act on stale views all the
//!   time; that's not an error worth surfacing.

use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::sync::Arc;

use fiesta_games::{BombTable, StatementCatalog};
use fiesta_protocol::{ClientEvent, ServerEvent};
use fiesta_room::{Removal, RoomError, RoomRegistry};
use fiesta_transport::ConnectionId;
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::{Binding, Outbound};

/// Single writer of all room and game state.
///
/// Owns the [`RoomRegistry`] and the room subscriptions. Every call to
/// [`handle`](Self::handle) or [`disconnect`](Self::disconnect) runs to
/// completion and returns the events to deliver, in order.
pub struct SessionCoordinator {
    pub(crate) registry: RoomRegistry,
    pub(crate) catalog: Arc<StatementCatalog>,
    pub(crate) bomb_table: BombTable,
    pub(crate) binding: Binding,
    /// Room code → connections that receive the room's broadcasts.
    subscriptions: HashMap<String, BTreeSet<ConnectionId>>,
    /// The one room the offline binding is playing in.
    offline_room: Option<String>,
    /// Seeds engine RNGs.
    pub(crate) rng: StdRng,
}

impl SessionCoordinator {
    pub fn new(binding: Binding, catalog: Arc<StatementCatalog>, bomb_table: BombTable) -> Self {
        Self::with_rng(binding, catalog, bomb_table, StdRng::from_os_rng())
    }

    /// Same as [`new`](Self::new), with every room code and engine draw
    /// derived from `rng`.
    pub fn with_rng(
        binding: Binding,
        catalog: Arc<StatementCatalog>,
        bomb_table: BombTable,
        mut rng: StdRng,
    ) -> Self {
        Self {
            registry: RoomRegistry::with_rng(StdRng::from_rng(&mut rng)),
            catalog,
            bomb_table,
            binding,
            subscriptions: HashMap::new(),
            offline_room: None,
            rng,
        }
    }

    pub fn registry(&self) -> &RoomRegistry {
        &self.registry
    }

    pub fn binding(&self) -> Binding {
        self.binding
    }

    /// Connections currently receiving broadcasts for `code`.
    pub fn subscribers(&self, code: &str) -> Vec<ConnectionId> {
        self.subscriptions
            .get(code)
            .map(|subs| subs.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Applies one client event from `from`.
    pub fn handle(&mut self, from: &ConnectionId, event: ClientEvent) -> Vec<Outbound> {
        tracing::debug!(%from, event = event.name(), room = ?event.room_code(), "client event");

        let mut out = Vec::new();
        match event {
            ClientEvent::CreateRoom(name) => self.create_room(&mut out, from, name),
            ClientEvent::JoinRoom {
                room_code,
                player_name,
            } => self.join_room(&mut out, from, &room_code, player_name),
            ClientEvent::CheckSession => self.check_session(&mut out, from),
            ClientEvent::OfflineStart(names) => self.offline_start(&mut out, from, names),
            other => self.handle_game(&mut out, from, other),
        }
        out
    }

    /// Forgets `conn`: drops its subscriptions and removes its player
    /// from every room it sits in, telling each room if anyone is left.
    pub fn disconnect(&mut self, conn: &ConnectionId) -> Vec<Outbound> {
        for subs in self.subscriptions.values_mut() {
            subs.remove(conn);
        }
        self.subscriptions.retain(|_, subs| !subs.is_empty());

        // The offline device going away ends its whole table.
        if self.binding.is_offline() {
            self.close_offline_room();
            return Vec::new();
        }

        // A connection may hold seats in several rooms; free all of them.
        let mut out = Vec::new();
        let mut seats = 0;
        while let Some(removal) = self.registry.remove_player(conn) {
            seats += 1;
            match removal {
                Removal::Left { code, room } => {
                    self.broadcast(&mut out, &code, ServerEvent::RoomUpdated(room));
                }
                Removal::Closed { code } => {
                    self.subscriptions.remove(&code);
                }
            }
        }
        if seats == 0 {
            tracing::debug!(%conn, "disconnected connection had no seat");
        }
        out
    }

    // ---------------------------------------------------------------------
    // Room events
    // ---------------------------------------------------------------------

    fn create_room(&mut self, out: &mut Vec<Outbound>, from: &ConnectionId, name: String) {
        if name.is_empty() {
            tracing::debug!(%from, "createRoom without a name");
            return;
        }
        if self.binding.is_offline() {
            self.close_offline_room();
        }

        let view = self.registry.create_room(from.clone(), name).view();
        if self.binding.is_offline() {
            self.offline_room = Some(view.code.clone());
        }
        self.subscribe(&view.code, from);
        send(out, from, ServerEvent::RoomCreated(view));
    }

    fn join_room(
        &mut self,
        out: &mut Vec<Outbound>,
        from: &ConnectionId,
        code: &str,
        name: String,
    ) {
        if self.binding.is_offline() {
            tracing::debug!(%from, "joinRoom ignored offline");
            return;
        }
        if code.is_empty() || name.is_empty() {
            tracing::debug!(%from, "joinRoom with empty code or name");
            return;
        }

        let joined = self
            .registry
            .join_room(code, from.clone(), name.as_str())
            .map(|room| room.view());
        let view = match joined {
            Ok(view) => view,
            Err(RoomError::NameTaken(_)) => {
                match self.registry.reconnect_player(code, &name, from.clone()) {
                    Some(room) => room.view(),
                    None => {
                        tracing::warn!(room = %code, player = %name, "name taken but not seated");
                        return reject(out, from, RoomError::NameTaken(name));
                    }
                }
            }
            Err(err) => return reject(out, from, err),
        };

        self.subscribe(code, from);
        self.broadcast(out, code, ServerEvent::RoomUpdated(view));
    }

    fn check_session(&mut self, out: &mut Vec<Outbound>, from: &ConnectionId) {
        match self.registry.find_by_connection(from) {
            Some(room) => {
                let view = room.view();
                tracing::info!(%from, room = %view.code, "session restored");
                send(out, from, ServerEvent::SessionRestored(view));
            }
            None => send(out, from, ServerEvent::SessionNotFound),
        }
    }

    fn offline_start(&mut self, out: &mut Vec<Outbound>, from: &ConnectionId, names: Vec<String>) {
        if !self.binding.is_offline() {
            tracing::debug!(%from, "offline:start ignored on network binding");
            return;
        }
        let mut names = names.into_iter().filter(|n| !n.is_empty());
        let Some(host) = names.next() else {
            tracing::debug!("offline:start without players");
            return;
        };

        self.close_offline_room();
        let code = self
            .registry
            .create_room(Binding::offline_player(0), host)
            .code
            .clone();
        for (index, name) in names.enumerate() {
            if let Err(err) = self
                .registry
                .join_room(&code, Binding::offline_player(index + 1), name)
            {
                reject(out, from, err);
            }
        }

        self.offline_room = Some(code.clone());
        self.subscribe(&code, from);
        if let Some(room) = self.registry.get_room(&code) {
            tracing::info!(room = %code, players = room.players.len(), "offline room ready");
            send(out, from, ServerEvent::RoomCreated(room.view()));
        }
    }

    fn close_offline_room(&mut self) {
        if let Some(code) = self.offline_room.take() {
            self.registry.close_room(&code);
            self.subscriptions.remove(&code);
        }
    }

    // ---------------------------------------------------------------------
    // Delivery
    // ---------------------------------------------------------------------

    pub(crate) fn subscribe(&mut self, code: &str, conn: &ConnectionId) {
        self.subscriptions
            .entry(code.to_string())
            .or_default()
            .insert(conn.clone());
    }

    /// Queues one copy of `event` per subscriber of `code`.
    pub(crate) fn broadcast(&self, out: &mut Vec<Outbound>, code: &str, event: ServerEvent) {
        let Some(subs) = self.subscriptions.get(code) else {
            tracing::debug!(room = %code, event = event.name(), "broadcast with no subscribers");
            return;
        };
        out.extend(subs.iter().map(|to| Outbound::new(to.clone(), event.clone())));
    }
}

pub(crate) fn send(out: &mut Vec<Outbound>, to: &ConnectionId, event: ServerEvent) {
    out.push(Outbound::new(to.clone(), event));
}

/// Reports a user-visible rejection to `to` only.
pub(crate) fn reject(out: &mut Vec<Outbound>, to: &ConnectionId, err: impl fmt::Display) {
    tracing::debug!(%to, error = %err, "request rejected");
    send(out, to, ServerEvent::Error(err.to_string()));
}

#[cfg(test)]
mod tests {
    use fiesta_games::Statement;

    use super::*;

    fn coordinator(binding: Binding) -> SessionCoordinator {
        let catalog = StatementCatalog::from_statements(vec![Statement {
            id: 1,
            text: "Yo nunca he cantado en público".into(),
        }]);
        SessionCoordinator::with_rng(
            binding,
            Arc::new(catalog),
            BombTable::default(),
            StdRng::seed_from_u64(9),
        )
    }

    #[test]
    fn test_create_room_subscribes_creator() {
        let mut c = coordinator(Binding::Network);
        let me = ConnectionId::numbered(1);
        let out = c.handle(&me, ClientEvent::CreateRoom("Ana".into()));
        assert_eq!(out.len(), 1);
        let ServerEvent::RoomCreated(view) = &out[0].event else {
            panic!("roomCreated expected");
        };
        assert_eq!(c.subscribers(&view.code), vec![me]);
    }

    #[test]
    fn test_create_room_empty_name_ignored() {
        let mut c = coordinator(Binding::Network);
        let out = c.handle(&ConnectionId::numbered(1), ClientEvent::CreateRoom(String::new()));
        assert!(out.is_empty());
        assert_eq!(c.registry().room_count(), 0);
    }

    #[test]
    fn test_broadcast_copies_per_subscriber() {
        let mut c = coordinator(Binding::Network);
        c.subscribe("ROOM01", &ConnectionId::numbered(2));
        c.subscribe("ROOM01", &ConnectionId::numbered(1));
        let mut out = Vec::new();
        c.broadcast(&mut out, "ROOM01", ServerEvent::SessionNotFound);
        let to: Vec<_> = out.iter().map(|o| o.to.clone()).collect();
        assert_eq!(to, vec![ConnectionId::numbered(1), ConnectionId::numbered(2)]);
    }

    #[test]
    fn test_disconnect_unknown_connection_is_quiet() {
        let mut c = coordinator(Binding::Network);
        assert!(c.disconnect(&ConnectionId::numbered(5)).is_empty());
    }

    #[test]
    fn test_offline_start_ignored_on_network() {
        let mut c = coordinator(Binding::Network);
        let out = c.handle(
            &ConnectionId::numbered(1),
            ClientEvent::OfflineStart(vec!["Ana".into()]),
        );
        assert!(out.is_empty());
        assert_eq!(c.registry().room_count(), 0);
    }
}
