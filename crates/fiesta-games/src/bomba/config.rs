//! Grid sizes and bomb counts.

use serde::{Deserialize, Serialize};

use crate::GameError;

/// Board size picked by the host.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GridSize {
    /// 4×4
    Small,
    /// 6×6
    #[default]
    Medium,
    /// 8×8
    Large,
}

impl GridSize {
    /// Number of cells per side.
    pub fn side(self) -> usize {
        match self {
            Self::Small => 4,
            Self::Medium => 6,
            Self::Large => 8,
        }
    }
}

/// Bomb count per grid size.
///
/// Two tables have been used in the wild (3/7/12 and 3/5/7), so the count
/// is configuration rather than a constant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BombTable {
    pub small: usize,
    pub medium: usize,
    pub large: usize,
}

impl BombTable {
    /// The sparser table: 3 / 5 / 7.
    pub const fn compact() -> Self {
        Self {
            small: 3,
            medium: 5,
            large: 7,
        }
    }

    pub fn bombs_for(&self, size: GridSize) -> usize {
        match size {
            GridSize::Small => self.small,
            GridSize::Medium => self.medium,
            GridSize::Large => self.large,
        }
    }
}

impl Default for BombTable {
    /// 3 / 7 / 12.
    fn default() -> Self {
        Self {
            small: 3,
            medium: 7,
            large: 12,
        }
    }
}

/// The `config` object of a `bomba:start` request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BombaConfig {
    #[serde(default)]
    pub size: GridSize,
    /// Overrides the table's bomb count for this game.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bombs: Option<usize>,
}

/// A validated board: side length and bomb budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Grid {
    side: usize,
    total_bombs: usize,
}

impl Grid {
    /// # Errors
    /// [`GameError::InvalidAction`] unless `side >= 1` and
    /// `1 <= total_bombs <= side * side`. At least one bomb is needed
    /// because the last cell of every game is a bomb.
    pub fn new(side: usize, total_bombs: usize) -> Result<Self, GameError> {
        if side == 0 {
            return Err(GameError::invalid("grid must have at least one cell"));
        }
        let squares = side * side;
        if total_bombs == 0 || total_bombs > squares {
            return Err(GameError::invalid(format!(
                "bomb count must be between 1 and {squares}, got {total_bombs}"
            )));
        }
        Ok(Self { side, total_bombs })
    }

    /// Resolves a start request against a bomb table.
    pub fn resolve(config: &BombaConfig, table: &BombTable) -> Result<Self, GameError> {
        let bombs = config.bombs.unwrap_or_else(|| table.bombs_for(config.size));
        Self::new(config.size.side(), bombs)
    }

    pub fn side(&self) -> usize {
        self.side
    }

    pub fn total_squares(&self) -> usize {
        self.side * self.side
    }

    pub fn total_bombs(&self) -> usize {
        self.total_bombs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_size_sides() {
        assert_eq!(GridSize::Small.side(), 4);
        assert_eq!(GridSize::Medium.side(), 6);
        assert_eq!(GridSize::Large.side(), 8);
        assert_eq!(GridSize::default(), GridSize::Medium);
    }

    #[test]
    fn test_bomb_tables() {
        let t = BombTable::default();
        assert_eq!((t.small, t.medium, t.large), (3, 7, 12));
        let c = BombTable::compact();
        assert_eq!((c.small, c.medium, c.large), (3, 5, 7));
    }

    #[test]
    fn test_resolve_uses_table_for_size() {
        let config = BombaConfig { size: GridSize::Large, bombs: None };
        let grid = Grid::resolve(&config, &BombTable::compact()).unwrap();
        assert_eq!(grid.side(), 8);
        assert_eq!(grid.total_squares(), 64);
        assert_eq!(grid.total_bombs(), 7);
    }

    #[test]
    fn test_resolve_explicit_bombs_override_table() {
        let config = BombaConfig { size: GridSize::Small, bombs: Some(5) };
        let grid = Grid::resolve(&config, &BombTable::default()).unwrap();
        assert_eq!(grid.total_bombs(), 5);
    }

    #[test]
    fn test_grid_new_rejects_zero_bombs() {
        assert!(matches!(Grid::new(4, 0), Err(GameError::InvalidAction(_))));
    }

    #[test]
    fn test_grid_new_rejects_more_bombs_than_cells() {
        assert!(Grid::new(4, 16).is_ok());
        assert!(matches!(Grid::new(4, 17), Err(GameError::InvalidAction(_))));
    }

    #[test]
    fn test_bomba_config_defaults_when_fields_missing() {
        let config: BombaConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, BombaConfig::default());
        let config: BombaConfig = serde_json::from_str(r#"{"size":"small"}"#).unwrap();
        assert_eq!(config.size, GridSize::Small);
    }
}
