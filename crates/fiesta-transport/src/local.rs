//! In-process transport for single-device play.
//!
//! [`local_pair`] returns two ends of an unbounded channel pair: the
//! [`LocalConnection`] implements [`Connection`] and is handed to the same
//! connection handler the network server uses, while the [`LocalClient`]
//! is what the embedding UI talks to. No sockets are involved.

use tokio::sync::{Mutex, mpsc};

use crate::{Connection, ConnectionId, TransportError};

/// Server side of an in-process connection.
pub struct LocalConnection {
    id: ConnectionId,
    outbound: mpsc::UnboundedSender<Vec<u8>>,
    inbound: Mutex<mpsc::UnboundedReceiver<Vec<u8>>>,
}

/// Client side of an in-process connection.
pub struct LocalClient {
    outbound: mpsc::UnboundedSender<Vec<u8>>,
    inbound: mpsc::UnboundedReceiver<Vec<u8>>,
}

/// Creates a connected client/server pair with the given connection id.
pub fn local_pair(id: ConnectionId) -> (LocalClient, LocalConnection) {
    let (to_server, server_rx) = mpsc::unbounded_channel();
    let (to_client, client_rx) = mpsc::unbounded_channel();

    let client = LocalClient {
        outbound: to_server,
        inbound: client_rx,
    };
    let conn = LocalConnection {
        id,
        outbound: to_client,
        inbound: Mutex::new(server_rx),
    };
    (client, conn)
}

impl LocalClient {
    /// Sends a frame to the server side.
    pub fn send(&self, data: impl Into<Vec<u8>>) -> Result<(), TransportError> {
        self.outbound.send(data.into()).map_err(|_| {
            TransportError::ConnectionClosed("local server dropped".into())
        })
    }

    /// Waits for the next frame from the server side.
    ///
    /// Returns `None` once the server side has closed.
    pub async fn recv(&mut self) -> Option<Vec<u8>> {
        self.inbound.recv().await
    }

    /// Returns the next frame if one is already queued.
    pub fn try_recv(&mut self) -> Option<Vec<u8>> {
        self.inbound.try_recv().ok()
    }
}

impl Connection for LocalConnection {
    type Error = TransportError;

    async fn send(&self, data: &[u8]) -> Result<(), Self::Error> {
        self.outbound.send(data.to_vec()).map_err(|_| {
            TransportError::ConnectionClosed("local client dropped".into())
        })
    }

    async fn recv(&self) -> Result<Option<Vec<u8>>, Self::Error> {
        Ok(self.inbound.lock().await.recv().await)
    }

    async fn close(&self) -> Result<(), Self::Error> {
        self.inbound.lock().await.close();
        Ok(())
    }

    fn id(&self) -> ConnectionId {
        self.id.clone()
    }
}
