//! The Bomba state machine.

use std::collections::BTreeMap;

use fiesta_transport::ConnectionId;
use rand::SeedableRng;
use rand::rngs::StdRng;

use super::config::Grid;
use super::content::{self, BombKind, CellContent, Progress, SpecialKind};
use super::state::{
    BombEffect, BombaPlayer, BombaState, PendingSniper, RevealEvent, RevealedCell, TurnDirection,
};
use crate::GameError;

/// Per-room Bomba engine.
///
/// Owns the live [`BombaState`] and never hands it out by reference:
/// every mutating call returns an owned snapshot.
pub struct BombaEngine {
    grid: Grid,
    state: BombaState,
    rng: StdRng,
}

impl BombaEngine {
    /// Seats `players` in the given order and opens a fresh board.
    ///
    /// # Errors
    /// [`GameError::InvalidAction`] if `players` is empty.
    pub fn new(grid: Grid, players: Vec<BombaPlayer>) -> Result<Self, GameError> {
        Self::with_rng(grid, players, StdRng::from_os_rng())
    }

    /// Same as [`new`](Self::new) with a caller-supplied RNG.
    pub fn with_rng(
        grid: Grid,
        players: Vec<BombaPlayer>,
        rng: StdRng,
    ) -> Result<Self, GameError> {
        if players.is_empty() {
            return Err(GameError::invalid("bomba needs at least one player"));
        }
        let players = players
            .into_iter()
            .enumerate()
            .map(|(index, p)| BombaPlayer { index, ..p })
            .collect();

        Ok(Self {
            grid,
            state: fresh_state(grid, players),
            rng,
        })
    }

    pub fn snapshot(&self) -> BombaState {
        self.state.clone()
    }

    /// The player whose turn it is.
    pub fn current_player(&self) -> Option<&BombaPlayer> {
        self.state.current_player()
    }

    pub fn pending_sniper(&self) -> Option<&PendingSniper> {
        self.state.pending_sniper_data.as_ref()
    }

    /// Opens `cell_index` on behalf of `requester`.
    ///
    /// # Errors
    /// [`GameError::InvalidAction`] when the game is over, a sniper target
    /// is pending, the cell is off the board or already open, or it isn't
    /// `requester`'s turn. State is untouched on error.
    pub fn reveal_cell(
        &mut self,
        cell_index: usize,
        requester: &ConnectionId,
    ) -> Result<BombaState, GameError> {
        let state = &self.state;
        if state.game_over {
            return Err(GameError::invalid("game is over"));
        }
        if state.waiting_for_target {
            return Err(GameError::invalid("waiting for sniper target"));
        }
        if cell_index >= state.total_squares {
            return Err(GameError::invalid(format!("no cell {cell_index}")));
        }
        if state.cells.contains_key(&cell_index) {
            return Err(GameError::invalid(format!("cell {cell_index} already revealed")));
        }
        let player = match state.current_player() {
            Some(p) if &p.id == requester => p.name.clone(),
            _ => return Err(GameError::invalid("not your turn")),
        };

        let progress = Progress {
            revealed: state.revealed_cells.len(),
            bombs_revealed: state.bombs_revealed,
            total_squares: state.total_squares,
            total_bombs: state.total_bombs,
            drink_counter: state.drink_counter,
        };
        let content = content::generate(&mut self.rng, &progress);

        let state = &mut self.state;
        state.cells.insert(
            cell_index,
            RevealedCell {
                content,
                revealed_by: requester.clone(),
            },
        );
        state.revealed_cells.push(cell_index);
        state.history.push(RevealEvent {
            player: player.clone(),
            cell_index,
            content,
            drink_counter_before: state.drink_counter,
            bomb_effect: None,
        });

        tracing::debug!(cell = cell_index, ?content, %requester, "bomba cell revealed");

        match content {
            CellContent::Bomb { kind: BombKind::Sniper } => {
                state.bombs_revealed += 1;
                state.waiting_for_target = true;
                state.pending_sniper_data = Some(PendingSniper {
                    cell_index,
                    player_id: requester.clone(),
                });
                return Ok(self.snapshot());
            }
            CellContent::Bomb { kind } => {
                state.bombs_revealed += 1;
                let effect = BombEffect {
                    kind,
                    amount: state.drink_counter,
                    player,
                    target: None,
                };
                if let Some(last) = state.history.last_mut() {
                    last.bomb_effect = Some(effect);
                }
                state.drink_counter = 1;
                self.check_game_over();
            }
            CellContent::Modifier { kind } => {
                state.drink_counter = kind.apply(state.drink_counter);
            }
            CellContent::Special { kind: SpecialKind::Reverse } => {
                state.turn_direction = state.turn_direction.reversed();
            }
            CellContent::Special { kind: SpecialKind::Safe } => {}
        }

        self.advance_turn();
        Ok(self.snapshot())
    }

    /// Resolves a pending sniper bomb: `target` drinks the counter.
    ///
    /// # Errors
    /// [`GameError::InvalidAction`] if no sniper is pending, `requester`
    /// isn't the one who revealed it, or `target` isn't seated.
    pub fn select_sniper_target(
        &mut self,
        requester: &ConnectionId,
        target: &ConnectionId,
    ) -> Result<BombaState, GameError> {
        let pending = match &self.state.pending_sniper_data {
            Some(p) if self.state.waiting_for_target => p,
            _ => return Err(GameError::invalid("no sniper target pending")),
        };
        if &pending.player_id != requester {
            return Err(GameError::invalid("only the sniper picks the target"));
        }
        let Some(target_name) = self.state.player_by_id(target).map(|p| p.name.clone()) else {
            return Err(GameError::invalid(format!("unknown target {target}")));
        };
        let player = self
            .state
            .player_by_id(requester)
            .map(|p| p.name.clone())
            .unwrap_or_default();

        let state = &mut self.state;
        let effect = BombEffect {
            kind: BombKind::Sniper,
            amount: state.drink_counter,
            player,
            target: Some(target_name),
        };
        if let Some(last) = state.history.last_mut() {
            last.bomb_effect = Some(effect);
        }
        state.waiting_for_target = false;
        state.pending_sniper_data = None;
        state.drink_counter = 1;

        tracing::debug!(%requester, %target, "sniper target selected");

        self.check_game_over();
        self.advance_turn();
        Ok(self.snapshot())
    }

    /// Clears the board for a new round with the same players and grid.
    pub fn restart_game(&mut self) -> BombaState {
        let players = std::mem::take(&mut self.state.players);
        self.state = fresh_state(self.grid, players);
        tracing::info!(players = self.state.players.len(), "bomba game restarted");
        self.snapshot()
    }

    /// Points a seated player (by name) at a new connection id. Also moves
    /// a pending sniper over. Returns `false` if no player has that name.
    pub fn rebind_player(&mut self, name: &str, new_id: &ConnectionId) -> bool {
        let Some(player) = self.state.players.iter_mut().find(|p| p.name == name) else {
            return false;
        };
        let old_id = std::mem::replace(&mut player.id, new_id.clone());
        if let Some(pending) = self.state.pending_sniper_data.as_mut() {
            if pending.player_id == old_id {
                pending.player_id = new_id.clone();
            }
        }
        true
    }

    fn advance_turn(&mut self) {
        let n = self.state.players.len() as isize;
        let next = (self.state.current_turn_index as isize + self.state.turn_direction.step() + n) % n;
        self.state.current_turn_index = next as usize;
    }

    fn check_game_over(&mut self) {
        if self.state.revealed_cells.len() == self.state.total_squares {
            self.state.game_over = true;
            tracing::info!(bombs = self.state.bombs_revealed, "bomba game over");
        }
    }
}

fn fresh_state(grid: Grid, players: Vec<BombaPlayer>) -> BombaState {
    BombaState {
        players,
        current_turn_index: 0,
        drink_counter: 1,
        revealed_cells: Vec::new(),
        cells: BTreeMap::new(),
        bombs_revealed: 0,
        game_over: false,
        turn_direction: TurnDirection::Forward,
        history: Vec::new(),
        waiting_for_target: false,
        pending_sniper_data: None,
        grid_size: grid.side(),
        total_squares: grid.total_squares(),
        total_bombs: grid.total_bombs(),
    }
}
