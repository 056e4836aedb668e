//! Event contract for Fiesta.
//!
//! Clients and the server exchange named events, each with a JSON
//! payload:
//!
//! ```text
//! {"event": "joinRoom", "payload": {"roomCode": "K3F9QZ", "playerName": "Ana"}}
//! ```
//!
//! - [`ClientEvent`]: everything a client may send
//! - [`ServerEvent`]: everything the server may push
//! - [`Codec`] / [`JsonCodec`]: bytes in, events out (and back)
//!
//! This crate knows nothing about connections or rooms beyond the types
//! that appear in payloads.

mod codec;
mod error;
mod events;

pub use codec::Codec;
#[cfg(feature = "json")]
pub use codec::JsonCodec;
pub use error::ProtocolError;
pub use events::{ClientEvent, ServerEvent, StatementRef, YoNuncaAction};
