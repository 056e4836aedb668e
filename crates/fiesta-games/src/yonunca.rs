//! "Yo Nunca": reveal a statement, mark who drinks.
//!
//! ```text
//!            set_mode(m)
//!   (none) ─────────────→ m ∈ {random, specific, list}
//!                          │
//!                          │ next_random / set_specific_number / select_from_list
//!                          ▼
//!                 current statement (drinkers = [])
//!                          │
//!                          │ mark_drink (toggle)
//!                          ▼
//!                 drinkers ± id, playerStats[name] ± 1
//! ```
//!
//! The engine doesn't gate actions on the mode. Clients are expected to
//! send the action that matches their screen, and an out-of-mode call
//! just does what it says.

use std::collections::BTreeMap;
use std::sync::Arc;

use fiesta_transport::ConnectionId;
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

use crate::{GameError, Statement, StatementCatalog};

/// How the room picks its next statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum YoNuncaMode {
    Random,
    Specific,
    List,
}

/// The statement on screen plus who drank for it this round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentStatement {
    pub id: i64,
    pub text: String,
    /// Connection ids, in the order they were marked. Volatile across
    /// reconnects.
    pub drinkers: Vec<ConnectionId>,
}

/// Running drink total for one player, keyed by name in the state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerStat {
    pub name: String,
    pub drink_count: i64,
}

/// Full Yo Nunca state as sent to clients.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YoNuncaState {
    pub mode: Option<YoNuncaMode>,
    pub current_statement: Option<CurrentStatement>,
    pub player_stats: BTreeMap<String, PlayerStat>,
}

/// Per-room Yo Nunca state machine.
pub struct YoNuncaEngine {
    state: YoNuncaState,
    catalog: Arc<StatementCatalog>,
    rng: StdRng,
}

impl YoNuncaEngine {
    pub fn new(catalog: Arc<StatementCatalog>) -> Self {
        Self::with_rng(catalog, StdRng::from_os_rng())
    }

    /// Same as [`new`](Self::new) with a caller-supplied RNG for
    /// reproducible draws.
    pub fn with_rng(catalog: Arc<StatementCatalog>, rng: StdRng) -> Self {
        Self {
            state: YoNuncaState::default(),
            catalog,
            rng,
        }
    }

    /// Owned copy of the current state.
    pub fn snapshot(&self) -> YoNuncaState {
        self.state.clone()
    }

    /// The catalog this engine draws from.
    pub fn catalog(&self) -> &Arc<StatementCatalog> {
        &self.catalog
    }

    /// Switches mode and clears the current statement. Stats survive.
    pub fn set_mode(&mut self, mode: YoNuncaMode) -> YoNuncaState {
        tracing::debug!(?mode, "yo nunca mode set");
        self.state.mode = Some(mode);
        self.state.current_statement = None;
        self.snapshot()
    }

    /// Draws a uniformly random statement. No-op on an empty catalog.
    pub fn next_random(&mut self) -> Option<YoNuncaState> {
        let statement = self.catalog.random_one(&mut self.rng)?.clone();
        Some(self.install(statement))
    }

    /// Installs the statement with this number.
    ///
    /// # Errors
    /// [`GameError::StatementNotFound`] when no statement has the id; the
    /// state is left untouched.
    pub fn set_specific_number(
        &mut self,
        id: i64,
    ) -> Result<YoNuncaState, GameError> {
        let statement = self
            .catalog
            .by_id(id)
            .cloned()
            .ok_or(GameError::StatementNotFound(id))?;
        Ok(self.install(statement))
    }

    /// Installs the statement picked from the list. Silently ignores an
    /// unknown id.
    pub fn select_from_list(&mut self, id: i64) -> Option<YoNuncaState> {
        let statement = self.catalog.by_id(id)?.clone();
        Some(self.install(statement))
    }

    /// Toggles `player_id` in the current drinker set and moves the stat
    /// for `player_name` up or down by one.
    ///
    /// No-op when no statement is showing. The decrement isn't floored, so
    /// a stat can go negative if the id used to mark it has since changed.
    pub fn mark_drink(
        &mut self,
        player_id: &ConnectionId,
        player_name: &str,
    ) -> Option<YoNuncaState> {
        let current = self.state.current_statement.as_mut()?;

        match current.drinkers.iter().position(|d| d == player_id) {
            None => {
                current.drinkers.push(player_id.clone());
                self.state
                    .player_stats
                    .entry(player_name.to_owned())
                    .or_insert_with(|| PlayerStat {
                        name: player_name.to_owned(),
                        drink_count: 0,
                    })
                    .drink_count += 1;
            }
            Some(pos) => {
                current.drinkers.remove(pos);
                if let Some(stat) = self.state.player_stats.get_mut(player_name) {
                    stat.drink_count -= 1;
                }
            }
        }

        Some(self.snapshot())
    }

    fn install(&mut self, statement: Statement) -> YoNuncaState {
        tracing::debug!(statement = statement.id, "yo nunca statement shown");
        self.state.current_statement = Some(CurrentStatement {
            id: statement.id,
            text: statement.text,
            drinkers: Vec::new(),
        });
        self.snapshot()
    }
}
