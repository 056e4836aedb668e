//! "La Bomba": a turn-based grid reveal.
//!
//! Players take turns opening cells on a square board. Each cell's content
//! is decided the moment it is opened (see [`CellContent`]): modifiers
//! grow or shrink a shared drink counter, specials may flip turn order,
//! and bombs make someone drink the counter before resetting it to 1.
//!
//! ```text
//!                 reveal_cell (non-sniper)
//!        ┌──────────────────────────────────────┐
//!        ▼                                      │
//!   ┌─────────┐   reveal_cell (sniper)   ┌──────┴──────────┐
//!   │ Playing │ ───────────────────────→ │ WaitingForTarget│
//!   └────┬────┘ ←─────────────────────── └─────────────────┘
//!        │       select_sniper_target
//!        │ last cell revealed
//!        ▼
//!   ┌──────────┐   restart_game
//!   │ GameOver │ ──────────────→ Playing
//!   └──────────┘
//! ```

mod config;
mod content;
mod engine;
mod state;

pub use config::{BombTable, BombaConfig, Grid, GridSize};
pub use content::{BombKind, CellContent, Modifier, SpecialKind};
pub use engine::BombaEngine;
pub use state::{
    BombEffect, BombaPlayer, BombaState, PendingSniper, RevealEvent, RevealedCell, TurnDirection,
};
