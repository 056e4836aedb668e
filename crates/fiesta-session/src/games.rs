//! Game events: Yo Nunca and Bomba.

use fiesta_games::{BombaConfig, BombaEngine, GameKind, Grid, YoNuncaEngine, YoNuncaMode};
use fiesta_protocol::{ClientEvent, ServerEvent, StatementRef, YoNuncaAction};
use fiesta_room::ActiveGame;
use fiesta_transport::ConnectionId;
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::coordinator::{reject, send};
use crate::{Outbound, SessionCoordinator};

impl SessionCoordinator {
    pub(crate) fn handle_game(
        &mut self,
        out: &mut Vec<Outbound>,
        from: &ConnectionId,
        event: ClientEvent,
    ) {
        match event {
            ClientEvent::YoNuncaStart(code) => self.yonunca_start(out, from, &code),
            ClientEvent::YoNuncaSetMode { room_code, mode } => {
                self.yonunca_set_mode(out, from, &room_code, mode)
            }
            ClientEvent::YoNuncaAction {
                room_code,
                action,
                payload,
            } => self.yonunca_action(out, from, &room_code, action, payload),
            ClientEvent::YoNuncaDrink {
                room_code,
                player_id,
                player_name,
            } => {
                let Some(engine) = self.yonunca_engine(&room_code) else {
                    return;
                };
                if let Some(state) = engine.mark_drink(&player_id, &player_name) {
                    self.broadcast(out, &room_code, ServerEvent::YoNuncaState(state));
                }
            }
            ClientEvent::YoNuncaRequestState(code) => self.yonunca_request_state(out, from, &code),
            ClientEvent::BombaStart { room_code, config } => {
                self.bomba_start(out, from, &room_code, config.unwrap_or_default())
            }
            ClientEvent::BombaReveal {
                room_code,
                cell_index,
            } => self.bomba_reveal(out, from, &room_code, cell_index),
            ClientEvent::BombaRestart(code) => {
                let Some(engine) = self.bomba_engine(&code) else {
                    return;
                };
                let state = engine.restart_game();
                self.broadcast(out, &code, ServerEvent::BombaState(state));
            }
            ClientEvent::BombaSelectTarget {
                room_code,
                target_player_id,
            } => self.bomba_select_target(out, from, &room_code, &target_player_id),
            ClientEvent::BombaRequestState(code) => {
                let Some(engine) = self.bomba_engine(&code) else {
                    return;
                };
                let state = engine.snapshot();
                self.subscribe(&code, from);
                send(out, from, ServerEvent::BombaState(state));
            }
            ClientEvent::CreateRoom(_)
            | ClientEvent::JoinRoom { .. }
            | ClientEvent::CheckSession
            | ClientEvent::OfflineStart(_) => {
                tracing::warn!(%from, "room event routed to game handler");
            }
        }
    }

    // ---------------------------------------------------------------------
    // Yo Nunca
    // ---------------------------------------------------------------------

    fn yonunca_start(&mut self, out: &mut Vec<Outbound>, from: &ConnectionId, code: &str) {
        let seed = StdRng::from_rng(&mut self.rng);
        let catalog = self.catalog.clone();
        let Some(room) = self.registry.get_room_mut(code) else {
            tracing::debug!(room = %code, "yonunca:start for unknown room");
            return;
        };

        // Restarting Yo Nunca keeps the running engine and its stats.
        let state = match &room.game {
            ActiveGame::YoNunca(engine) => engine.snapshot(),
            _ => {
                let engine = YoNuncaEngine::with_rng(catalog, seed);
                let state = engine.snapshot();
                room.game = ActiveGame::YoNunca(engine);
                tracing::info!(room = %code, "yo nunca started");
                state
            }
        };

        self.broadcast(out, code, ServerEvent::YoNuncaState(state));
        send(out, from, self.statement_list());
        self.broadcast(out, code, ServerEvent::GameStarted(GameKind::YoNunca));
    }

    fn yonunca_set_mode(
        &mut self,
        out: &mut Vec<Outbound>,
        from: &ConnectionId,
        code: &str,
        mode: YoNuncaMode,
    ) {
        let Some(engine) = self.yonunca_engine(code) else {
            return;
        };
        let state = engine.set_mode(mode);
        self.broadcast(out, code, ServerEvent::YoNuncaState(state));
        send(out, from, self.statement_list());
    }

    fn yonunca_action(
        &mut self,
        out: &mut Vec<Outbound>,
        from: &ConnectionId,
        code: &str,
        action: YoNuncaAction,
        payload: Option<StatementRef>,
    ) {
        let id = payload.as_ref().and_then(StatementRef::id);
        let Some(engine) = self.yonunca_engine(code) else {
            return;
        };

        let state = match (action, id) {
            (YoNuncaAction::Random, _) => engine.next_random(),
            (YoNuncaAction::Specific, Some(id)) => match engine.set_specific_number(id) {
                Ok(state) => Some(state),
                Err(err) => return reject(out, from, err),
            },
            (YoNuncaAction::Select, Some(id)) => engine.select_from_list(id),
            (_, None) => {
                tracing::debug!(room = %code, ?action, ?payload, "yonunca:action without a usable id");
                None
            }
        };

        if let Some(state) = state {
            self.broadcast(out, code, ServerEvent::YoNuncaState(state));
        }
    }

    fn yonunca_request_state(&mut self, out: &mut Vec<Outbound>, from: &ConnectionId, code: &str) {
        let Some(room) = self.registry.get_room(code) else {
            tracing::debug!(room = %code, "yonunca:requestState for unknown room");
            return;
        };
        let view = room.view();
        let state = match &room.game {
            ActiveGame::YoNunca(engine) => Some(engine.snapshot()),
            _ => None,
        };

        // Self-healing: a client asking for state wants the room's traffic.
        self.subscribe(code, from);
        if let Some(state) = state {
            send(out, from, ServerEvent::YoNuncaState(state));
            send(out, from, self.statement_list());
        }
        self.broadcast(out, code, ServerEvent::RoomUpdated(view));
    }

    fn statement_list(&self) -> ServerEvent {
        ServerEvent::YoNuncaList(self.catalog.all().to_vec())
    }

    fn yonunca_engine(&mut self, code: &str) -> Option<&mut YoNuncaEngine> {
        match self.registry.get_room_mut(code).map(|room| &mut room.game) {
            Some(ActiveGame::YoNunca(engine)) => Some(engine),
            Some(other) => {
                tracing::debug!(room = %code, game = ?other, "room isn't playing yo nunca");
                None
            }
            None => {
                tracing::debug!(room = %code, "unknown room");
                None
            }
        }
    }

    // ---------------------------------------------------------------------
    // Bomba
    // ---------------------------------------------------------------------

    fn bomba_start(
        &mut self,
        out: &mut Vec<Outbound>,
        from: &ConnectionId,
        code: &str,
        config: BombaConfig,
    ) {
        let seed = StdRng::from_rng(&mut self.rng);
        let table = self.bomb_table;
        let Some(room) = self.registry.get_room_mut(code) else {
            tracing::debug!(room = %code, "bomba:start for unknown room");
            return;
        };

        let engine = Grid::resolve(&config, &table)
            .and_then(|grid| BombaEngine::with_rng(grid, room.bomba_seats(), seed));
        let engine = match engine {
            Ok(engine) => engine,
            Err(err) => return reject(out, from, err),
        };

        let state = engine.snapshot();
        room.game = ActiveGame::Bomba(engine);
        tracing::info!(
            room = %code,
            grid = state.grid_size,
            bombs = state.total_bombs,
            players = state.players.len(),
            "bomba started"
        );

        self.broadcast(out, code, ServerEvent::BombaState(state));
        self.broadcast(out, code, ServerEvent::GameStarted(GameKind::Bomba));
    }

    fn bomba_reveal(
        &mut self,
        out: &mut Vec<Outbound>,
        from: &ConnectionId,
        code: &str,
        cell_index: usize,
    ) {
        let offline = self.binding.is_offline();
        let Some(engine) = self.bomba_engine(code) else {
            return;
        };
        // Offline, the single device plays whoever's turn it is.
        let actor = if offline {
            match engine.current_player() {
                Some(player) => player.id.clone(),
                None => return,
            }
        } else {
            from.clone()
        };

        match engine.reveal_cell(cell_index, &actor) {
            Ok(state) => self.broadcast(out, code, ServerEvent::BombaState(state)),
            Err(err) => {
                self.warn_if_turn_stalled(code);
                reject(out, from, err)
            }
        }
    }

    fn warn_if_turn_stalled(&self, code: &str) {
        let Some(seat) = self
            .registry
            .get_room(code)
            .and_then(|room| room.absent_turn_holder())
        else {
            return;
        };
        tracing::warn!(
            room = %code,
            player = %seat.name,
            "bomba turn belongs to a player who left; restart to continue"
        );
    }

    fn bomba_select_target(
        &mut self,
        out: &mut Vec<Outbound>,
        from: &ConnectionId,
        code: &str,
        target: &ConnectionId,
    ) {
        let offline = self.binding.is_offline();
        let Some(engine) = self.bomba_engine(code) else {
            return;
        };
        let actor = if offline {
            match engine.pending_sniper() {
                Some(pending) => pending.player_id.clone(),
                None => from.clone(),
            }
        } else {
            from.clone()
        };

        match engine.select_sniper_target(&actor, target) {
            Ok(state) => self.broadcast(out, code, ServerEvent::BombaState(state)),
            Err(err) => reject(out, from, err),
        }
    }

    fn bomba_engine(&mut self, code: &str) -> Option<&mut BombaEngine> {
        match self.registry.get_room_mut(code).map(|room| &mut room.game) {
            Some(ActiveGame::Bomba(engine)) => Some(engine),
            Some(other) => {
                tracing::debug!(room = %code, game = ?other, "room isn't playing bomba");
                None
            }
            None => {
                tracing::debug!(room = %code, "unknown room");
                None
            }
        }
    }
}
