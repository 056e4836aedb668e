//! Single-device play over the in-process transport.
//!
//! The offline runner is the same dispatcher and connection handler the
//! network server uses, bound to a [`local_pair`] instead of a socket.
//! One client (`local-host`) drives a room of synthetic players created
//! with `offline:start`; turn-gated Bomba actions are taken on behalf of
//! whoever's turn it is.

use std::sync::Arc;

use fiesta_games::{BombTable, StatementCatalog};
use fiesta_protocol::{ClientEvent, Codec, JsonCodec, ServerEvent};
use fiesta_session::{Binding, SessionCoordinator};
use fiesta_transport::{LocalClient, local_pair};

use crate::FiestaError;
use crate::dispatcher::spawn_dispatcher;
use crate::handler::handle_connection;

/// Typed handle on an offline session.
///
/// Dropping it ends the session and discards the room.
pub struct OfflineClient {
    client: LocalClient,
    codec: JsonCodec,
}

/// Starts an offline session on the current Tokio runtime.
pub fn start_offline(catalog: Arc<StatementCatalog>, bomb_table: BombTable) -> OfflineClient {
    let coordinator = SessionCoordinator::new(Binding::Offline, catalog, bomb_table);
    let (inbound, _dispatcher) = spawn_dispatcher(coordinator, JsonCodec);
    let (client, conn) = local_pair(Binding::offline_host());

    tokio::spawn(async move {
        if let Err(e) = handle_connection(conn, inbound, JsonCodec).await {
            tracing::debug!(error = %e, "offline session ended with error");
        }
    });
    tracing::info!("offline session started");

    OfflineClient {
        client,
        codec: JsonCodec,
    }
}

impl OfflineClient {
    /// Sends one event to the session.
    pub fn send(&self, event: &ClientEvent) -> Result<(), FiestaError> {
        let bytes = self.codec.encode(event)?;
        self.client.send(bytes)?;
        Ok(())
    }

    /// Waits for the next event. `Ok(None)` once the session has ended.
    pub async fn recv(&mut self) -> Result<Option<ServerEvent>, FiestaError> {
        match self.client.recv().await {
            Some(bytes) => Ok(Some(self.codec.decode(&bytes)?)),
            None => Ok(None),
        }
    }

    /// Returns the next event if one is already queued.
    pub fn try_recv(&mut self) -> Result<Option<ServerEvent>, FiestaError> {
        match self.client.try_recv() {
            Some(bytes) => Ok(Some(self.codec.decode(&bytes)?)),
            None => Ok(None),
        }
    }
}
