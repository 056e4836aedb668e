//! The "Yo Nunca" statement catalog.
//!
//! Loaded once at startup and never mutated afterwards. Source data comes
//! from a hand-numbered list, so ids may repeat or skip; lookups are a
//! linear scan that returns the *first* match.

use std::path::Path;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::CatalogError;

/// One prompt: a number and its text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Statement {
    pub id: i64,
    pub text: String,
}

/// Ordered, read-only collection of statements.
#[derive(Debug, Clone, Default)]
pub struct StatementCatalog {
    statements: Vec<Statement>,
}

impl StatementCatalog {
    /// Builds a catalog from already-parsed statements, keeping their order.
    pub fn from_statements(statements: Vec<Statement>) -> Self {
        Self { statements }
    }

    /// Parses a JSON array of `{ "id": .., "text": .. }` records.
    pub fn from_json(data: &str) -> Result<Self, CatalogError> {
        let statements: Vec<Statement> = serde_json::from_str(data)?;
        Ok(Self { statements })
    }

    /// Reads and parses a catalog file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let data = std::fs::read_to_string(path)?;
        let catalog = Self::from_json(&data)?;
        tracing::info!(
            path = %path.display(),
            statements = catalog.len(),
            "statement catalog loaded"
        );
        Ok(catalog)
    }

    /// All statements in load order.
    pub fn all(&self) -> &[Statement] {
        &self.statements
    }

    /// First statement with the given id.
    pub fn by_id(&self, id: i64) -> Option<&Statement> {
        self.statements.iter().find(|s| s.id == id)
    }

    /// Uniform pick over [`all()`](Self::all). `None` only when empty.
    pub fn random_one(&self, rng: &mut impl Rng) -> Option<&Statement> {
        if self.statements.is_empty() {
            return None;
        }
        let idx = rng.random_range(0..self.statements.len());
        self.statements.get(idx)
    }

    pub fn len(&self) -> usize {
        self.statements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;

    fn stmt(id: i64, text: &str) -> Statement {
        Statement { id, text: text.into() }
    }

    #[test]
    fn test_from_json_keeps_order() {
        let catalog = StatementCatalog::from_json(
            r#"[{"id": 2, "text": "b"}, {"id": 1, "text": "a"}]"#,
        )
        .unwrap();
        let ids: Vec<i64> = catalog.all().iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![2, 1]);
    }

    #[test]
    fn test_from_json_malformed_returns_parse_error() {
        let result = StatementCatalog::from_json(r#"{"id": 1}"#);
        assert!(matches!(result, Err(CatalogError::Parse(_))));
    }

    #[test]
    fn test_from_path_missing_file_returns_io_error() {
        let result = StatementCatalog::from_path("/definitely/not/here.json");
        assert!(matches!(result, Err(CatalogError::Io(_))));
    }

    #[test]
    fn test_by_id_duplicate_returns_first_match() {
        let catalog = StatementCatalog::from_statements(vec![
            stmt(7, "first"),
            stmt(8, "other"),
            stmt(7, "second"),
        ]);
        assert_eq!(catalog.by_id(7).unwrap().text, "first");
    }

    #[test]
    fn test_by_id_missing_returns_none() {
        let catalog = StatementCatalog::from_statements(vec![stmt(1, "a")]);
        assert!(catalog.by_id(99).is_none());
    }

    #[test]
    fn test_random_one_empty_returns_none() {
        let catalog = StatementCatalog::default();
        let mut rng = StdRng::seed_from_u64(1);
        assert!(catalog.random_one(&mut rng).is_none());
    }

    #[test]
    fn test_random_one_always_returns_catalog_member() {
        let catalog = StatementCatalog::from_statements(vec![
            stmt(1, "a"),
            stmt(2, "b"),
            stmt(3, "c"),
        ]);
        let mut rng = StdRng::seed_from_u64(9);
        for _ in 0..50 {
            let picked = catalog.random_one(&mut rng).unwrap();
            assert!(catalog.all().contains(picked));
        }
    }
}
