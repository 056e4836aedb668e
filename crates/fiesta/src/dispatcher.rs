//! The dispatcher task: sole owner of the [`SessionCoordinator`].
//!
//! Connection handlers never touch room or game state. They forward
//! [`Inbound`] messages over one channel, and the dispatcher applies them
//! in arrival order, each to completion, before encoding the resulting
//! events into the recipients' outbound queues.

use std::collections::HashMap;

use fiesta_protocol::{ClientEvent, Codec};
use fiesta_session::{Outbound, SessionCoordinator};
use fiesta_transport::ConnectionId;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Frames queued for one connection.
pub(crate) type OutboundTx = mpsc::UnboundedSender<Vec<u8>>;

/// Sender half handlers use to reach the dispatcher.
pub(crate) type InboundTx = mpsc::UnboundedSender<Inbound>;

/// What a connection handler reports to the dispatcher.
#[derive(Debug)]
pub(crate) enum Inbound {
    /// A connection is ready to receive events.
    Connect { id: ConnectionId, outbound: OutboundTx },
    /// A decoded client event.
    Event { id: ConnectionId, event: ClientEvent },
    /// The connection is gone.
    Disconnect { id: ConnectionId },
}

/// Spawns the dispatcher. It runs until every [`InboundTx`] is dropped.
pub(crate) fn spawn_dispatcher<K: Codec>(
    coordinator: SessionCoordinator,
    codec: K,
) -> (InboundTx, JoinHandle<()>) {
    let (tx, rx) = mpsc::unbounded_channel();
    let handle = tokio::spawn(Dispatcher::new(coordinator, codec).run(rx));
    (tx, handle)
}

struct Dispatcher<K: Codec> {
    coordinator: SessionCoordinator,
    codec: K,
    peers: HashMap<ConnectionId, OutboundTx>,
}

impl<K: Codec> Dispatcher<K> {
    fn new(coordinator: SessionCoordinator, codec: K) -> Self {
        Self {
            coordinator,
            codec,
            peers: HashMap::new(),
        }
    }

    async fn run(mut self, mut rx: mpsc::UnboundedReceiver<Inbound>) {
        while let Some(msg) = rx.recv().await {
            self.apply(msg);
        }
        tracing::debug!("dispatcher stopped");
    }

    fn apply(&mut self, msg: Inbound) {
        match msg {
            Inbound::Connect { id, outbound } => {
                tracing::debug!(%id, "peer registered");
                self.peers.insert(id, outbound);
            }
            Inbound::Event { id, event } => {
                let out = self.coordinator.handle(&id, event);
                self.deliver(out);
            }
            Inbound::Disconnect { id } => {
                self.peers.remove(&id);
                let out = self.coordinator.disconnect(&id);
                self.deliver(out);
            }
        }
    }

    /// Encodes each event separately, so every recipient gets its own bytes.
    fn deliver(&mut self, out: Vec<Outbound>) {
        for Outbound { to, event } in out {
            let Some(peer) = self.peers.get(&to) else {
                tracing::debug!(%to, event = event.name(), "no peer for outbound event");
                continue;
            };
            let bytes = match self.codec.encode(&event) {
                Ok(bytes) => bytes,
                Err(e) => {
                    tracing::error!(%to, event = event.name(), error = %e, "failed to encode event");
                    continue;
                }
            };
            if peer.send(bytes).is_err() {
                tracing::debug!(%to, "peer queue closed");
                self.peers.remove(&to);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use fiesta_games::{BombTable, StatementCatalog};
    use fiesta_protocol::{JsonCodec, ServerEvent};
    use fiesta_session::Binding;

    use super::*;

    fn dispatcher() -> Dispatcher<JsonCodec> {
        let coordinator = SessionCoordinator::new(
            Binding::Network,
            Arc::new(StatementCatalog::default()),
            BombTable::default(),
        );
        Dispatcher::new(coordinator, JsonCodec)
    }

    fn decode(bytes: &[u8]) -> ServerEvent {
        JsonCodec.decode(bytes).unwrap()
    }

    #[test]
    fn test_apply_event_reaches_registered_peer() {
        let mut d = dispatcher();
        let (tx, mut rx) = mpsc::unbounded_channel();
        let id = ConnectionId::numbered(1);
        d.apply(Inbound::Connect { id: id.clone(), outbound: tx });
        d.apply(Inbound::Event { id, event: ClientEvent::CheckSession });

        let frame = rx.try_recv().unwrap();
        assert_eq!(decode(&frame), ServerEvent::SessionNotFound);
    }

    #[test]
    fn test_apply_event_from_unregistered_peer_is_dropped() {
        let mut d = dispatcher();
        d.apply(Inbound::Event {
            id: ConnectionId::numbered(9),
            event: ClientEvent::CheckSession,
        });
        assert!(d.peers.is_empty());
    }

    #[test]
    fn test_apply_disconnect_notifies_room() {
        let mut d = dispatcher();
        let (host_tx, mut host_rx) = mpsc::unbounded_channel();
        let (guest_tx, _guest_rx) = mpsc::unbounded_channel();
        let host = ConnectionId::numbered(1);
        let guest = ConnectionId::numbered(2);
        d.apply(Inbound::Connect { id: host.clone(), outbound: host_tx });
        d.apply(Inbound::Connect { id: guest.clone(), outbound: guest_tx });

        d.apply(Inbound::Event { id: host.clone(), event: ClientEvent::CreateRoom("Ana".into()) });
        let ServerEvent::RoomCreated(view) = decode(&host_rx.try_recv().unwrap()) else {
            panic!("roomCreated expected");
        };
        d.apply(Inbound::Event {
            id: guest.clone(),
            event: ClientEvent::JoinRoom { room_code: view.code, player_name: "Luis".into() },
        });
        let _ = host_rx.try_recv().unwrap();

        d.apply(Inbound::Disconnect { id: guest.clone() });
        let ServerEvent::RoomUpdated(view) = decode(&host_rx.try_recv().unwrap()) else {
            panic!("roomUpdated expected");
        };
        assert_eq!(view.players.len(), 1);
        assert!(!d.peers.contains_key(&guest));
    }

    #[test]
    fn test_deliver_closed_queue_forgets_peer() {
        let mut d = dispatcher();
        let (tx, rx) = mpsc::unbounded_channel();
        let id = ConnectionId::numbered(1);
        d.apply(Inbound::Connect { id: id.clone(), outbound: tx });
        drop(rx);
        d.apply(Inbound::Event { id: id.clone(), event: ClientEvent::CheckSession });
        assert!(!d.peers.contains_key(&id));
    }
}
