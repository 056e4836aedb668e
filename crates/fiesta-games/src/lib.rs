//! Game engines for Fiesta.
//!
//! Each room owns at most one engine at a time. Engines are plain,
//! synchronous state machines: every mutating call runs to completion and
//! hands back an owned snapshot of the new state for broadcasting. They
//! never touch the network and never see the room registry.
//!
//! # Key types
//!
//! - [`StatementCatalog`]: read-only list of "Yo Nunca" prompts
//! - [`YoNuncaEngine`]: statement reveal and drink tracking
//! - [`BombaEngine`]: the grid-reveal turn game
//! - [`GameError`]: recoverable, user-visible rejections
//!
//! # Return convention
//!
//! An operation that can be silently absorbed returns `Option<Snapshot>`
//! (`None` = nothing changed, nothing to broadcast). An operation that can
//! be refused returns `Result<Snapshot, GameError>`, and the error goes
//! back to the caller only.

pub mod bomba;
mod catalog;
mod error;
mod yonunca;

pub use bomba::{BombaConfig, BombaEngine, BombaState, BombTable, Grid, GridSize};
pub use catalog::{Statement, StatementCatalog};
pub use error::{CatalogError, GameError};
pub use yonunca::{CurrentStatement, PlayerStat, YoNuncaEngine, YoNuncaMode, YoNuncaState};

use serde::{Deserialize, Serialize};

/// Which game a room is currently bound to.
///
/// Serialized in lowercase (`"yonunca"`, `"bomba"`), which is also the
/// payload of the `gameStarted` event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameKind {
    YoNunca,
    Bomba,
}

impl std::fmt::Display for GameKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::YoNunca => write!(f, "yonunca"),
            Self::Bomba => write!(f, "bomba"),
        }
    }
}
