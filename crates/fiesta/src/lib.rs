//! # Fiesta
//!
//! Real-time backend for party drinking games played from phones.
//!
//! Players gather in a room identified by a six-character code, and the
//! host starts one of two games: **Yo Nunca** (reveal a statement, mark who
//! drinks) or **La Bomba** (take turns uncovering cells on a grid until the
//! bombs go off). All state is server-authoritative; every mutation is
//! pushed to the whole room as a full snapshot.
//!
//! ```text
//! WebSocket / local ──→ handler ──Inbound──→ dispatcher (SessionCoordinator)
//!        ▲                                          │
//!        └───────────── encoded ServerEvent ────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use fiesta::prelude::*;
//!
//! # async fn run() -> Result<(), FiestaError> {
//! fiesta::init_tracing();
//! let server = FiestaServer::builder()
//!     .bind("0.0.0.0:3001")
//!     .build()
//!     .await?;
//! server.run().await
//! # }
//! ```

mod dispatcher;
mod error;
mod handler;
mod offline;
mod server;
mod telemetry;

pub use error::FiestaError;
pub use offline::{OfflineClient, start_offline};
pub use server::{FiestaServer, FiestaServerBuilder};
pub use telemetry::init_tracing;

/// Re-exports for servers and embedding clients.
pub mod prelude {
    pub use crate::{FiestaError, FiestaServer, FiestaServerBuilder, OfflineClient, start_offline};
    pub use fiesta_games::{
        BombTable, BombaConfig, BombaState, GameKind, GridSize, Statement, StatementCatalog,
        YoNuncaMode, YoNuncaState,
    };
    pub use fiesta_protocol::{ClientEvent, ServerEvent, StatementRef, YoNuncaAction};
    pub use fiesta_room::RoomView;
    pub use fiesta_transport::ConnectionId;
}
