//! `FiestaServer` builder and server loop.
//!
//! This is the entry point for running a Fiesta server. It ties together
//! the layers: transport → protocol → session → rooms and engines.

use std::sync::Arc;

use fiesta_games::{BombTable, StatementCatalog};
use fiesta_protocol::JsonCodec;
use fiesta_session::{Binding, SessionCoordinator};
use fiesta_transport::{Transport, WebSocketTransport};

use crate::FiestaError;
use crate::dispatcher::spawn_dispatcher;
use crate::handler::handle_connection;

/// Builder for configuring and starting a Fiesta server.
///
/// # Example
///
/// ```rust,no_run
/// use std::sync::Arc;
/// use fiesta::prelude::*;
///
/// # async fn run() -> Result<(), FiestaError> {
/// let catalog = StatementCatalog::from_path("statements.json")?;
/// let server = FiestaServer::builder()
///     .bind("0.0.0.0:3001")
///     .bomb_table(BombTable::compact())
///     .catalog(Arc::new(catalog))
///     .build()
///     .await?;
/// server.run().await
/// # }
/// ```
pub struct FiestaServerBuilder {
    bind_addr: String,
    bomb_table: BombTable,
    catalog: Arc<StatementCatalog>,
}

impl FiestaServerBuilder {
    /// Creates a builder with default settings: `127.0.0.1:3001`, the
    /// default bomb table and an empty catalog.
    pub fn new() -> Self {
        Self {
            bind_addr: "127.0.0.1:3001".to_string(),
            bomb_table: BombTable::default(),
            catalog: Arc::new(StatementCatalog::default()),
        }
    }

    /// Sets the address to bind the server to.
    pub fn bind(mut self, addr: &str) -> Self {
        self.bind_addr = addr.to_string();
        self
    }

    /// Sets how many bombs each grid size gets by default.
    pub fn bomb_table(mut self, table: BombTable) -> Self {
        self.bomb_table = table;
        self
    }

    /// Sets the Yo Nunca statement catalog.
    pub fn catalog(mut self, catalog: Arc<StatementCatalog>) -> Self {
        self.catalog = catalog;
        self
    }

    /// Binds the listener. Uses `JsonCodec` and `WebSocketTransport`.
    pub async fn build(self) -> Result<FiestaServer, FiestaError> {
        let transport = WebSocketTransport::bind(&self.bind_addr).await?;
        tracing::info!(
            statements = self.catalog.len(),
            table = ?self.bomb_table,
            "server configured"
        );
        let coordinator = SessionCoordinator::new(Binding::Network, self.catalog, self.bomb_table);
        Ok(FiestaServer {
            transport,
            coordinator,
        })
    }
}

impl Default for FiestaServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A bound Fiesta server.
///
/// Call [`run()`](Self::run) to start accepting connections.
pub struct FiestaServer {
    transport: WebSocketTransport,
    coordinator: SessionCoordinator,
}

impl FiestaServer {
    /// Creates a new builder.
    pub fn builder() -> FiestaServerBuilder {
        FiestaServerBuilder::new()
    }

    /// Returns the local address the server is bound to.
    pub fn local_addr(&self) -> std::io::Result<std::net::SocketAddr> {
        self.transport.local_addr()
    }

    /// Runs the server accept loop.
    ///
    /// Starts the dispatcher, then accepts connections and spawns a
    /// handler task for each. Runs until the process is terminated.
    pub async fn run(self) -> Result<(), FiestaError> {
        let Self {
            mut transport,
            coordinator,
        } = self;
        let (inbound, _dispatcher) = spawn_dispatcher(coordinator, JsonCodec);
        tracing::info!("fiesta server running");

        loop {
            match transport.accept().await {
                Ok(conn) => {
                    let inbound = inbound.clone();
                    tokio::spawn(async move {
                        if let Err(e) = handle_connection(conn, inbound, JsonCodec).await {
                            tracing::debug!(error = %e, "connection ended with error");
                        }
                    });
                }
                Err(e) => {
                    tracing::error!(error = %e, "accept failed");
                }
            }
        }
    }
}
