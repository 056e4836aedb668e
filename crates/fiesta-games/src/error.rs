//! Error types for the game layer.

/// Recoverable errors raised by the engines.
///
/// Every variant is user-visible: the coordinator forwards its `Display`
/// text to the connection that triggered it and to nobody else.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GameError {
    /// No statement in the catalog carries this number.
    #[error("statement {0} not found")]
    StatementNotFound(i64),

    /// The action doesn't fit the engine's current state: wrong turn,
    /// wrong phase, unknown cell, unknown target, bad configuration.
    #[error("invalid action: {0}")]
    InvalidAction(String),
}

impl GameError {
    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        Self::InvalidAction(reason.into())
    }
}

/// Errors raised while loading the statement catalog.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// The catalog file could not be read.
    #[error("failed to read catalog: {0}")]
    Io(#[from] std::io::Error),

    /// The catalog contents are not a JSON array of `{id, text}` records.
    #[error("failed to parse catalog: {0}")]
    Parse(#[from] serde_json::Error),
}
