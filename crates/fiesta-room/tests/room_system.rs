//! Integration tests for room membership.

use std::collections::HashSet;

use fiesta_games::{BombaEngine, Grid};
use fiesta_room::{ActiveGame, ROOM_CODE_LEN, Removal, RoomError, RoomRegistry};
use fiesta_transport::ConnectionId;
use rand::SeedableRng;
use rand::rngs::StdRng;

fn id(n: u64) -> ConnectionId {
    ConnectionId::numbered(n)
}

fn registry() -> RoomRegistry {
    RoomRegistry::with_rng(StdRng::seed_from_u64(42))
}

fn host_count(registry: &RoomRegistry, code: &str) -> usize {
    registry
        .get_room(code)
        .map(|room| room.players.iter().filter(|p| p.is_host).count())
        .unwrap_or(0)
}

// =========================================================================
// create / join
// =========================================================================

#[test]
fn test_create_room_host_is_only_player() {
    let mut registry = registry();
    let room = registry.create_room(id(1), "Ana");
    assert_eq!(room.code.len(), ROOM_CODE_LEN);
    assert_eq!(room.players.len(), 1);
    assert!(room.players[0].is_host);
    assert_eq!(room.players[0].name, "Ana");
    assert!(room.game.kind().is_none());
}

#[test]
fn test_create_room_codes_unique() {
    let mut registry = registry();
    let mut seen = HashSet::new();
    for n in 0..500 {
        let code = registry.create_room(id(n), format!("host{n}")).code.clone();
        assert!(seen.insert(code), "duplicate code after {n} rooms");
    }
    assert_eq!(registry.room_count(), 500);
}

#[test]
fn test_join_room_appends_non_host() {
    let mut registry = registry();
    let code = registry.create_room(id(1), "Ana").code.clone();
    let room = registry.join_room(&code, id(2), "Beto").unwrap();
    assert_eq!(room.players.len(), 2);
    assert_eq!(room.players[1].name, "Beto");
    assert!(!room.players[1].is_host);
}

#[test]
fn test_join_room_unknown_code_not_found() {
    let mut registry = registry();
    let err = registry.join_room("ZZZZZZ", id(1), "Ana").unwrap_err();
    assert_eq!(err, RoomError::NotFound("ZZZZZZ".into()));
}

#[test]
fn test_join_room_same_name_first_wins() {
    let mut registry = registry();
    let code = registry.create_room(id(1), "Ana").code.clone();
    let err = registry.join_room(&code, id(2), "Ana").unwrap_err();
    assert_eq!(err, RoomError::NameTaken("Ana".into()));
    let room = registry.get_room(&code).unwrap();
    assert_eq!(room.players.len(), 1);
    assert_eq!(room.players[0].id, id(1));
}

#[test]
fn test_join_room_names_case_sensitive() {
    let mut registry = registry();
    let code = registry.create_room(id(1), "Ana").code.clone();
    assert!(registry.join_room(&code, id(2), "ana").is_ok());
}

// =========================================================================
// reconnect
// =========================================================================

#[test]
fn test_reconnect_player_rebinds_in_place() {
    let mut registry = registry();
    let code = registry.create_room(id(1), "Ana").code.clone();
    registry.join_room(&code, id(2), "Beto").unwrap();

    let room = registry.reconnect_player(&code, "Ana", id(9)).unwrap();
    assert_eq!(room.players[0].id, id(9));
    assert!(room.players[0].is_host);
    assert_eq!(room.players[1].name, "Beto");
    assert!(registry.find_by_connection(&id(1)).is_none());
}

#[test]
fn test_reconnect_player_unknown_name_none() {
    let mut registry = registry();
    let code = registry.create_room(id(1), "Ana").code.clone();
    assert!(registry.reconnect_player(&code, "Nadie", id(9)).is_none());
    assert!(registry.reconnect_player("ZZZZZZ", "Ana", id(9)).is_none());
}

#[test]
fn test_reconnect_player_rebinds_bomba_turn() {
    let mut registry = registry();
    let code = registry.create_room(id(1), "Ana").code.clone();
    registry.join_room(&code, id(2), "Beto").unwrap();

    let room = registry.get_room_mut(&code).unwrap();
    let engine = BombaEngine::with_rng(
        Grid::new(4, 3).unwrap(),
        room.bomba_seats(),
        StdRng::seed_from_u64(1),
    )
    .unwrap();
    room.game = ActiveGame::Bomba(engine);

    registry.reconnect_player(&code, "Ana", id(9)).unwrap();
    let room = registry.get_room_mut(&code).unwrap();
    let ActiveGame::Bomba(engine) = &mut room.game else {
        panic!("bomba engine expected");
    };
    assert!(engine.reveal_cell(0, &id(1)).is_err());
    assert!(engine.reveal_cell(0, &id(9)).is_ok());
}

#[test]
fn test_absent_turn_holder_after_current_player_leaves() {
    let mut registry = registry();
    let code = registry.create_room(id(1), "Ana").code.clone();
    registry.join_room(&code, id(2), "Beto").unwrap();

    let room = registry.get_room_mut(&code).unwrap();
    assert!(room.absent_turn_holder().is_none());
    let engine = BombaEngine::with_rng(
        Grid::new(4, 3).unwrap(),
        room.bomba_seats(),
        StdRng::seed_from_u64(1),
    )
    .unwrap();
    room.game = ActiveGame::Bomba(engine);
    assert!(room.absent_turn_holder().is_none());

    // Ana holds the first turn and leaves.
    registry.remove_player(&id(1)).unwrap();
    let room = registry.get_room(&code).unwrap();
    let seat = room.absent_turn_holder().expect("stalled seat");
    assert_eq!(seat.name, "Ana");
}

// =========================================================================
// remove
// =========================================================================

#[test]
fn test_remove_player_last_closes_room() {
    let mut registry = registry();
    let code = registry.create_room(id(1), "Ana").code.clone();
    let removal = registry.remove_player(&id(1)).unwrap();
    assert_eq!(removal, Removal::Closed { code: code.clone() });
    assert!(removal.is_empty());
    assert!(registry.get_room(&code).is_none());
    assert_eq!(registry.room_count(), 0);
}

#[test]
fn test_remove_player_host_promotes_first_remaining() {
    let mut registry = registry();
    let code = registry.create_room(id(1), "Ana").code.clone();
    registry.join_room(&code, id(2), "Beto").unwrap();
    registry.join_room(&code, id(3), "Carla").unwrap();

    let removal = registry.remove_player(&id(1)).unwrap();
    let Removal::Left { code: left_code, room } = removal else {
        panic!("room should survive");
    };
    assert_eq!(left_code, code);
    assert_eq!(room.players.len(), 2);
    assert_eq!(room.players[0].name, "Beto");
    assert!(room.players[0].is_host);
    assert!(!room.players[1].is_host);
}

#[test]
fn test_remove_player_non_host_keeps_host() {
    let mut registry = registry();
    let code = registry.create_room(id(1), "Ana").code.clone();
    registry.join_room(&code, id(2), "Beto").unwrap();
    registry.join_room(&code, id(3), "Carla").unwrap();

    registry.remove_player(&id(3)).unwrap();
    let room = registry.get_room(&code).unwrap();
    assert_eq!(room.host().unwrap().name, "Ana");
}

#[test]
fn test_host_invariant_over_join_leave_sequence() {
    let mut registry = registry();
    let code = registry.create_room(id(0), "p0").code.clone();
    for n in 1..6 {
        registry.join_room(&code, id(n), format!("p{n}")).unwrap();
        assert_eq!(host_count(&registry, &code), 1);
    }
    // Leave in an order that removes the host twice.
    for n in [0, 3, 1, 5, 2] {
        let removal = registry.remove_player(&id(n)).unwrap();
        assert!(!removal.is_empty());
        assert_eq!(host_count(&registry, &code), 1, "after removing p{n}");
    }
    let removal = registry.remove_player(&id(4)).unwrap();
    assert!(removal.is_empty());
    assert_eq!(host_count(&registry, &code), 0);
}

#[test]
fn test_find_by_connection() {
    let mut registry = registry();
    let a = registry.create_room(id(1), "Ana").code.clone();
    let b = registry.create_room(id(2), "Beto").code.clone();
    assert_eq!(registry.find_by_connection(&id(1)).unwrap().code, a);
    assert_eq!(registry.find_by_connection(&id(2)).unwrap().code, b);
    assert!(registry.find_by_connection(&id(3)).is_none());
}
