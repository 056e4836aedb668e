//! Session coordination for Fiesta.
//!
//! The [`SessionCoordinator`] is the single writer of all room and game
//! state. It takes one [`ClientEvent`](fiesta_protocol::ClientEvent) at a
//! time, runs it to completion against the [`RoomRegistry`](fiesta_room::RoomRegistry)
//! and the room's engine, and returns the [`Outbound`] events that should
//! be delivered as a result.
//!
//! ```text
//! connection ──ClientEvent──→ SessionCoordinator ──→ RoomRegistry / engine
//!                                    │
//!                                    ▼
//!                       Vec<Outbound { to, event }>
//! ```
//!
//! It never performs I/O. Whatever drives it (a server task, an offline
//! runner, a test) owns delivery.

mod binding;
mod coordinator;
mod games;
mod outbound;

pub use binding::{Binding, OFFLINE_HOST};
pub use coordinator::SessionCoordinator;
pub use outbound::Outbound;
