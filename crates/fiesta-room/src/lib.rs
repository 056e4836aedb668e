//! Room membership for Fiesta.
//!
//! A room is a short code, an ordered list of players and at most one
//! running game. The [`RoomRegistry`] owns every room; it is constructed
//! explicitly and handed to whoever drives it, never reached through a
//! global.
//!
//! # Key types
//!
//! - [`RoomRegistry`]: create, join, reconnect, remove
//! - [`Room`]: players plus the [`ActiveGame`] slot
//! - [`RoomView`]: what clients see of a room
//! - [`RoomError`]: user-visible join failures
//!
//! The registry never broadcasts. Callers decide who hears about a
//! change.

mod code;
mod error;
mod registry;
mod room;

pub use code::ROOM_CODE_LEN;
pub use error::RoomError;
pub use registry::{Removal, RoomRegistry};
pub use room::{ActiveGame, Player, Room, RoomView};
