//! Transport abstraction layer for Fiesta.
//!
//! Provides the [`Transport`] and [`Connection`] traits that abstract over
//! the two ways a client reaches the game core: a WebSocket over the
//! network, or an in-process channel pair for single-device (offline) play.
//!
//! # Feature Flags
//!
//! - `websocket` (default): WebSocket transport via `tokio-tungstenite`

#![allow(async_fn_in_trait)]

mod error;
mod local;
#[cfg(feature = "websocket")]
mod websocket;

pub use error::TransportError;
pub use local::{LocalClient, LocalConnection, local_pair};
#[cfg(feature = "websocket")]
pub use websocket::{WebSocketConnection, WebSocketTransport};

use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque identifier for a connection.
///
/// This is also the ephemeral player id seen by clients: a player's id is
/// whatever connection they are currently bound to, and it changes when
/// they reconnect. Serialized as a plain string.
#[derive(
    Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct ConnectionId(String);

impl ConnectionId {
    /// Creates a new `ConnectionId` from any string-like value.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Creates the id used for the `n`-th accepted network connection.
    pub fn numbered(n: u64) -> Self {
        Self(format!("conn-{n}"))
    }

    /// Returns the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ConnectionId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Accepts new incoming connections.
pub trait Transport: Send + Sync + 'static {
    /// The connection type produced by this transport.
    type Connection: Connection;
    /// The error type for transport operations.
    type Error: std::error::Error + Send + Sync;

    /// Waits for and accepts the next incoming connection.
    async fn accept(&mut self) -> Result<Self::Connection, Self::Error>;
}

/// A single connection that can send and receive bytes.
pub trait Connection: Send + Sync + 'static {
    /// The error type for connection operations.
    type Error: std::error::Error + Send + Sync;

    /// Sends data to the remote peer.
    async fn send(&self, data: &[u8]) -> Result<(), Self::Error>;

    /// Receives the next message from the remote peer.
    ///
    /// Returns `Ok(None)` when the connection is cleanly closed.
    async fn recv(&self) -> Result<Option<Vec<u8>>, Self::Error>;

    /// Closes the connection.
    async fn close(&self) -> Result<(), Self::Error>;

    /// Returns the unique identifier for this connection.
    fn id(&self) -> ConnectionId;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connection_id_numbered_display() {
        let id = ConnectionId::numbered(7);
        assert_eq!(id.to_string(), "conn-7");
        assert_eq!(id.as_str(), "conn-7");
    }

    #[test]
    fn test_connection_id_equality() {
        let a = ConnectionId::new("local-host");
        let b = ConnectionId::from("local-host");
        let c = ConnectionId::numbered(2);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_connection_id_serializes_as_plain_string() {
        // Clients compare ids against `players[i].id`, so it must be a
        // bare string on the wire, not `{"0": "..."}`.
        let json = serde_json::to_string(&ConnectionId::numbered(3)).unwrap();
        assert_eq!(json, "\"conn-3\"");
        let back: ConnectionId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ConnectionId::numbered(3));
    }

    #[test]
    fn test_connection_id_hash_works_as_map_key() {
        use std::collections::HashMap;
        let mut map = HashMap::new();
        map.insert(ConnectionId::numbered(1), "ana");
        map.insert(ConnectionId::numbered(2), "luis");
        assert_eq!(map[&ConnectionId::numbered(1)], "ana");
    }
}
