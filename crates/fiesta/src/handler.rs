//! Per-connection handler: decode, forward, deliver.
//!
//! Each connection gets its own Tokio task running [`handle_connection`].
//! The flow is:
//!   1. Register an outbound queue with the dispatcher
//!   2. Loop: decode incoming frames and forward them as events, while
//!      writing whatever the dispatcher queued for this connection
//!   3. On close or error, report the disconnect and close the socket

use fiesta_protocol::{ClientEvent, Codec};
use fiesta_transport::{Connection, TransportError};
use tokio::sync::mpsc;

use crate::FiestaError;
use crate::dispatcher::{Inbound, InboundTx};

/// Handles a single connection from accept to close.
///
/// Only ever spawned with concrete connection types, whose futures are
/// `Send`.
pub(crate) async fn handle_connection<C, K>(
    conn: C,
    inbound: InboundTx,
    codec: K,
) -> Result<(), FiestaError>
where
    C: Connection<Error = TransportError>,
    K: Codec,
{
    let id = conn.id();
    let (outbound_tx, mut outbound_rx) = mpsc::unbounded_channel();
    if inbound
        .send(Inbound::Connect { id: id.clone(), outbound: outbound_tx })
        .is_err()
    {
        tracing::warn!(%id, "dispatcher gone, refusing connection");
        let _ = conn.close().await;
        return Ok(());
    }
    tracing::info!(%id, "client connected");

    let result = loop {
        tokio::select! {
            received = conn.recv() => {
                let data = match received {
                    Ok(Some(data)) => data,
                    Ok(None) => {
                        tracing::info!(%id, "connection closed cleanly");
                        break Ok(());
                    }
                    Err(e) => {
                        tracing::debug!(%id, error = %e, "recv error");
                        break Ok(());
                    }
                };

                let event: ClientEvent = match codec.decode(&data) {
                    Ok(event) => event,
                    Err(e) => {
                        tracing::debug!(%id, error = %e, "dropping malformed frame");
                        continue;
                    }
                };
                if inbound.send(Inbound::Event { id: id.clone(), event }).is_err() {
                    tracing::warn!(%id, "dispatcher gone");
                    break Ok(());
                }
            }
            queued = outbound_rx.recv() => {
                let Some(bytes) = queued else {
                    break Ok(());
                };
                if let Err(e) = conn.send(&bytes).await {
                    break Err(FiestaError::from(e));
                }
            }
        }
    };

    let _ = inbound.send(Inbound::Disconnect { id: id.clone() });
    let _ = conn.close().await;
    tracing::info!(%id, "client disconnected");
    result
}
