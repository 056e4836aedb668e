//! Unified error type for Fiesta.

use fiesta_games::{CatalogError, GameError};
use fiesta_protocol::ProtocolError;
use fiesta_room::RoomError;
use fiesta_transport::TransportError;

/// Top-level error that wraps every crate-specific error.
///
/// The `#[from]` impls let `?` lift sub-crate errors without ceremony.
#[derive(Debug, thiserror::Error)]
pub enum FiestaError {
    /// Binding, accepting, sending or receiving failed.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A frame couldn't be encoded or decoded.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// A room lookup or join was refused.
    #[error(transparent)]
    Room(#[from] RoomError),

    /// An engine refused an action.
    #[error(transparent)]
    Game(#[from] GameError),

    /// The statement catalog couldn't be loaded.
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}
