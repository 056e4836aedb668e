//! Error types for the room layer.

/// Errors that can occur during room operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RoomError {
    /// No room is registered under this code.
    #[error("room {0} not found")]
    NotFound(String),

    /// Someone in the room already uses this name.
    #[error("name {0} is already taken in this room")]
    NameTaken(String),
}
