use dungeon_crawler_core::{
    BattleError, BattleOutcome, BattlePhase, CellCoord, CellTags, Command, Cue, Direction, Enemy,
    Event, GenerationError, InventoryError, LootItem, MoveError, PlacementError, PlayerStats,
    ProgressionError, INVENTORY_SLOTS,
};
use dungeon_crawler_world::{self as world, query, World, WorldConfig};

const MIN_FREE_CELLS: u32 = 90;

fn built_world(config: WorldConfig) -> (World, Vec<Event>) {
    let mut world = World::with_config(config);
    let mut events = Vec::new();
    world::apply(
        &mut world,
        Command::BuildRoom {
            min_free_cells: MIN_FREE_CELLS,
        },
        &mut events,
    );
    (world, events)
}

fn strong_player() -> WorldConfig {
    WorldConfig {
        player_stats: PlayerStats::new(20, 17, 0),
        ..WorldConfig::default()
    }
}

fn apply(world: &mut World, command: Command) -> Vec<Event> {
    let mut events = Vec::new();
    world::apply(world, command, &mut events);
    events
}

fn plain_free_interior_cell(world: &World) -> CellCoord {
    let grid = query::grid(world).expect("room built");
    let last = grid.side() - 2;
    grid.cells_with(CellTags::FREE)
        .find(|cell| {
            grid.tags(*cell) == Some(CellTags::FREE)
                && (2..=last).contains(&cell.column())
                && (2..=last).contains(&cell.row())
        })
        .expect("room has interior floor")
}

/// Places an enemy on the exit route and walks the player into it.
fn walk_into_enemy(world: &mut World) -> CellCoord {
    let exit = query::exit(world).expect("room built").cell();
    let route = query::route_to(world, exit).expect("exit reachable");
    let grid = query::grid(world).expect("room built");
    let last = grid.side() - 2;
    let lair = route
        .iter()
        .copied()
        .find(|cell| {
            grid.tags(*cell) == Some(CellTags::FREE)
                && (2..=last).contains(&cell.column())
                && (2..=last).contains(&cell.row())
        })
        .expect("route crosses interior floor");

    let placed = apply(world, Command::PlaceEnemy { cell: lair });
    assert_eq!(placed, vec![Event::EnemyPlaced { cell: lair }]);

    for cell in route {
        let events = apply(world, Command::MovePlayer { to: cell });
        if events.contains(&Event::EnemyEncountered { cell: lair }) {
            return lair;
        }
    }
    panic!("never met the enemy at {lair:?}");
}

fn fight_to_the_end(world: &mut World) -> Vec<Event> {
    let mut log = Vec::new();
    for _ in 0..64 {
        let events = apply(world, Command::ResolveTurn);
        let finished = events
            .iter()
            .any(|event| matches!(event, Event::BattleEnded { .. }));
        log.extend(events);
        if finished {
            return log;
        }
    }
    panic!("battle never ended");
}

#[test]
fn build_room_installs_a_connected_layout() {
    let (world, events) = built_world(WorldConfig::default());

    let Some(Event::RoomBuilt {
        side,
        cells,
        player,
        exit,
        chunks,
    }) = events.first().cloned()
    else {
        panic!("expected RoomBuilt, got {events:?}");
    };

    assert_eq!(side, query::side(&world));
    assert!(cells > MIN_FREE_CELLS);
    assert_eq!(cells, query::cells(&world));
    assert_eq!(chunks, query::chunks(&world).len());
    assert_eq!(query::player_position(&world), Some(player));
    assert_eq!(query::exit(&world).map(|exit| exit.cell()), Some(exit));
    assert!(query::is_revealed(&world, player));

    let grid = query::grid(&world).expect("room built");
    assert!(grid.has(player, CellTags::PLAYER | CellTags::FREE));
    assert!(grid.has(exit, CellTags::FINISH | CellTags::FREE));
    assert_eq!(grid.free_cells(), cells);
}

#[test]
fn failed_generation_leaves_no_room() {
    let config = WorldConfig {
        side: 9,
        max_chunks: 16,
        ..WorldConfig::default()
    };
    let (world, events) = built_world(config);

    assert!(matches!(
        events.as_slice(),
        [Event::RoomRejected {
            reason: GenerationError::Exhausted { attempts: 16, .. }
        }]
    ));
    assert!(query::grid(&world).is_none());
    assert_eq!(query::player_position(&world), None);
}

#[test]
fn enemies_only_take_plain_interior_floor() {
    let (mut world, _) = built_world(WorldConfig::default());
    let cells_before = query::cells(&world);
    let cell = plain_free_interior_cell(&world);

    assert_eq!(
        apply(&mut world, Command::PlaceEnemy { cell }),
        vec![Event::EnemyPlaced { cell }]
    );
    assert_eq!(
        apply(&mut world, Command::PlaceEnemy { cell }),
        vec![Event::EnemyPlacementRejected {
            cell,
            reason: PlacementError::NotFree,
        }]
    );

    let border = CellCoord::new(1, 1);
    assert_eq!(
        apply(&mut world, Command::PlaceEnemy { cell: border }),
        vec![Event::EnemyPlacementRejected {
            cell: border,
            reason: PlacementError::OutsideInterior,
        }]
    );

    let grid = query::grid(&world).expect("room built");
    assert_eq!(grid.tags(cell), Some(CellTags::ENEMY));
    assert_eq!(query::enemy_cells(&world), vec![cell]);
    assert_eq!(query::cells(&world), cells_before);
}

#[test]
fn moves_are_validated_against_the_grid() {
    let (mut world, _) = built_world(WorldConfig::default());

    let rock = CellCoord::new(0, 0);
    assert_eq!(
        apply(&mut world, Command::MovePlayer { to: rock }),
        vec![Event::MoveRejected {
            to: rock,
            reason: MoveError::Blocked,
        }]
    );

    let outside = CellCoord::new(500, 3);
    assert_eq!(
        apply(&mut world, Command::MovePlayer { to: outside }),
        vec![Event::MoveRejected {
            to: outside,
            reason: MoveError::OutOfBounds,
        }]
    );

    let start = query::player_position(&world).expect("player placed");
    let exit = query::exit(&world).expect("room built").cell();
    let route = query::route_to(&world, exit).expect("exit reachable");
    let first = route[0];
    let events = apply(&mut world, Command::MovePlayer { to: first });
    assert_eq!(
        events.first(),
        Some(&Event::PlayerMoved {
            from: start,
            to: first,
        })
    );

    let grid = query::grid(&world).expect("room built");
    assert_eq!(grid.cells_with(CellTags::PLAYER).collect::<Vec<_>>(), vec![first]);
    assert!(grid.has(start, CellTags::FREE));
}

#[test]
fn stepping_off_the_map_is_rejected() {
    let mut world = World::new();
    let events = apply(
        &mut world,
        Command::StepPlayer {
            direction: Direction::North,
        },
    );
    assert_eq!(
        events,
        vec![Event::StepRejected {
            direction: Direction::North,
            reason: MoveError::NoRoom,
        }]
    );
}

#[test]
fn enemies_need_a_room() {
    let mut world = World::new();
    let cell = CellCoord::new(4, 4);
    assert_eq!(
        apply(&mut world, Command::PlaceEnemy { cell }),
        vec![Event::EnemyPlacementRejected {
            cell,
            reason: PlacementError::NoRoom,
        }]
    );
}

#[test]
fn failed_rebuild_keeps_the_previous_room() {
    let (mut world, _) = built_world(WorldConfig::default());
    let grid = query::grid(&world).cloned();
    let player = query::player_position(&world);
    let exit = query::exit(&world);
    let cells = query::cells(&world);

    // A 20-cell side cannot hold this much floor.
    let events = apply(
        &mut world,
        Command::BuildRoom {
            min_free_cells: 10_000,
        },
    );
    assert!(matches!(
        events.as_slice(),
        [Event::RoomRejected {
            reason: GenerationError::Exhausted { .. }
        }]
    ));

    assert_eq!(query::grid(&world).cloned(), grid);
    assert_eq!(query::player_position(&world), player);
    assert_eq!(query::exit(&world), exit);
    assert_eq!(query::cells(&world), cells);
}

#[test]
fn battles_only_start_on_enemy_cells() {
    let (mut world, _) = built_world(strong_player());
    let events = apply(
        &mut world,
        Command::StartBattle {
            enemy: Enemy::new("rat", 10, 5),
        },
    );
    assert_eq!(
        events,
        vec![Event::BattleRejected {
            reason: BattleError::NoEnemyHere,
        }]
    );
    assert_eq!(query::battle_session(&world).phase, BattlePhase::Idle);
    assert!(query::battle_session(&world).can_move);
    assert!(apply(&mut world, Command::ResolveTurn).is_empty());
}

#[test]
fn room_and_level_stay_put_while_a_battle_is_pending() {
    let (mut world, _) = built_world(WorldConfig::default());
    let lair = walk_into_enemy(&mut world);
    let _ = apply(
        &mut world,
        Command::StartBattle {
            enemy: Enemy::new("ogre", 500, 10),
        },
    );
    let _ = apply(&mut world, Command::ResolveTurn);
    let _ = apply(&mut world, Command::ResolveTurn);
    let wounded = query::player_vitals(&world);
    assert!(wounded.hp() < wounded.max_hp());

    assert_eq!(
        apply(
            &mut world,
            Command::BuildRoom {
                min_free_cells: MIN_FREE_CELLS,
            },
        ),
        vec![Event::RoomRejected {
            reason: GenerationError::BattleInProgress,
        }]
    );
    assert_eq!(
        apply(&mut world, Command::DescendLevel),
        vec![Event::DescentRejected {
            reason: ProgressionError::BattleInProgress,
        }]
    );
    assert_eq!(query::player_vitals(&world), wounded);
    assert_eq!(query::battle_session(&world).phase, BattlePhase::PlayerTurn);
    assert_eq!(query::player_position(&world), Some(lair));

    let log = fight_to_the_end(&mut world);
    assert!(log.iter().any(|event| matches!(event, Event::BattleEnded { .. })));
    let vitals = query::player_vitals(&world);
    assert_eq!(vitals.hp(), vitals.max_hp());

    // Still pending until dismissed.
    assert!(matches!(
        apply(&mut world, Command::BuildRoom { min_free_cells: MIN_FREE_CELLS }).as_slice(),
        [Event::RoomRejected {
            reason: GenerationError::BattleInProgress
        }]
    ));
    let _ = apply(&mut world, Command::DismissBattle);
    let rebuilt = apply(
        &mut world,
        Command::BuildRoom {
            min_free_cells: MIN_FREE_CELLS,
        },
    );
    assert!(matches!(rebuilt.first(), Some(Event::RoomBuilt { .. })));
}

#[test]
fn winning_a_battle_frees_the_cell_and_restores_health() {
    let (mut world, _) = built_world(strong_player());
    let lair = walk_into_enemy(&mut world);

    let started = apply(
        &mut world,
        Command::StartBattle {
            enemy: Enemy::new("rat", 10, 5),
        },
    );
    assert_eq!(
        started[0],
        Event::BattleStarted {
            enemy: "rat".into(),
            hp: 10,
        }
    );
    assert!(!query::battle_session(&world).can_move);
    assert_eq!(query::battle_session(&world).phase, BattlePhase::PlayerTurn);

    let again = apply(
        &mut world,
        Command::StartBattle {
            enemy: Enemy::new("rat", 10, 5),
        },
    );
    assert_eq!(
        again,
        vec![Event::BattleRejected {
            reason: BattleError::AlreadyInProgress,
        }]
    );

    let log = fight_to_the_end(&mut world);
    assert!(log.contains(&Event::AudioCue { cue: Cue::Victory }));
    assert!(log.contains(&Event::BattleEnded {
        outcome: BattleOutcome::Victory,
    }));
    assert!(log.contains(&Event::EnemyDefeated {
        cell: lair,
        enemy: "rat".into(),
    }));

    let vitals = query::player_vitals(&world);
    assert_eq!(vitals.hp(), vitals.max_hp());
    let grid = query::grid(&world).expect("room built");
    assert!(grid.has(lair, CellTags::FREE));
    assert!(!grid.has(lair, CellTags::ENEMY));

    let session = query::battle_session(&world);
    assert_eq!(session.phase, BattlePhase::Idle);
    assert_eq!(session.turn_count, 0);
    assert!(!session.can_move, "movement stays locked until dismissal");
}

#[test]
fn movement_is_locked_until_the_battle_is_dismissed() {
    let (mut world, _) = built_world(strong_player());
    let _ = walk_into_enemy(&mut world);
    let _ = apply(
        &mut world,
        Command::StartBattle {
            enemy: Enemy::new("rat", 10, 5),
        },
    );
    let here = query::player_position(&world).expect("player placed");

    let locked = apply(&mut world, Command::MovePlayer { to: here });
    assert_eq!(
        locked,
        vec![Event::MoveRejected {
            to: here,
            reason: MoveError::MovementLocked,
        }]
    );

    let _ = fight_to_the_end(&mut world);
    assert_eq!(
        apply(&mut world, Command::DismissBattle),
        vec![Event::BattleDismissed]
    );
    assert!(query::battle_session(&world).can_move);

    let moved = apply(&mut world, Command::MovePlayer { to: here });
    assert!(matches!(moved.first(), Some(Event::PlayerMoved { .. })));
}

#[test]
fn post_battle_reset_is_idempotent() {
    let (mut world, _) = built_world(strong_player());
    let _ = walk_into_enemy(&mut world);
    let _ = apply(
        &mut world,
        Command::StartBattle {
            enemy: Enemy::new("rat", 10, 5),
        },
    );
    let _ = fight_to_the_end(&mut world);

    assert!(apply(&mut world, Command::ResolveTurn).is_empty());
    assert_eq!(
        apply(&mut world, Command::DismissBattle),
        vec![Event::BattleDismissed]
    );
    assert!(apply(&mut world, Command::DismissBattle).is_empty());

    let vitals = query::player_vitals(&world);
    assert_eq!(vitals.hp(), vitals.max_hp());
    assert!(query::battle_session(&world).can_move);
}

#[test]
fn defeat_restores_health_without_a_win_signal() {
    let config = WorldConfig {
        player_max_hp: 10,
        player_stats: PlayerStats::new(0, 0, 0),
        ..WorldConfig::default()
    };
    let (mut world, _) = built_world(config);
    let lair = walk_into_enemy(&mut world);
    let _ = apply(
        &mut world,
        Command::StartBattle {
            enemy: Enemy::new("ogre", 500, 50),
        },
    );

    let log = fight_to_the_end(&mut world);
    let endings: Vec<_> = log
        .iter()
        .filter(|event| matches!(event, Event::BattleEnded { .. }))
        .collect();
    assert_eq!(
        endings,
        vec![&Event::BattleEnded {
            outcome: BattleOutcome::Defeat,
        }]
    );
    assert!(!log
        .iter()
        .any(|event| matches!(event, Event::EnemyDefeated { .. })));

    assert_eq!(query::player_vitals(&world).hp(), 10);
    let grid = query::grid(&world).expect("room built");
    assert!(grid.has(lair, CellTags::ENEMY), "enemy keeps its cell");
}

#[test]
fn battle_needs_a_room() {
    let mut world = World::new();
    assert_eq!(
        apply(
            &mut world,
            Command::StartBattle {
                enemy: Enemy::new("rat", 10, 5),
            },
        ),
        vec![Event::BattleRejected {
            reason: BattleError::NoRoom,
        }]
    );
}

#[test]
fn reaching_the_exit_unlocks_a_single_descent() {
    let (mut world, _) = built_world(WorldConfig::default());
    assert_eq!(
        apply(&mut world, Command::DescendLevel),
        vec![Event::DescentRejected {
            reason: ProgressionError::ExitNotReached,
        }]
    );

    let exit = query::exit(&world).expect("room built").cell();
    let route = query::route_to(&world, exit).expect("exit reachable");
    let mut reached = false;
    for cell in route {
        let events = apply(&mut world, Command::MovePlayer { to: cell });
        reached |= events.contains(&Event::ExitReached { level: 1 });
    }
    assert!(reached);
    assert!(query::exit(&world).is_some_and(|exit| exit.reached()));

    assert_eq!(
        apply(&mut world, Command::DescendLevel),
        vec![Event::LevelDescended { level: 2 }]
    );
    assert_eq!(query::level(&world), 2);
    assert!(matches!(
        apply(&mut world, Command::DescendLevel).as_slice(),
        [Event::DescentRejected { .. }]
    ));
}

#[test]
fn inventory_holds_a_fixed_number_of_items() {
    let mut world = World::new();
    let item = LootItem {
        slot: "ring".into(),
        name: "Copper Band".into(),
        rarity: "common".into(),
        kind: "jewelry".into(),
    };

    for _ in 0..INVENTORY_SLOTS {
        let events = apply(&mut world, Command::AwardLoot { item: item.clone() });
        assert_eq!(events, vec![Event::LootAwarded { item: item.clone() }]);
    }
    assert_eq!(
        apply(&mut world, Command::AwardLoot { item: item.clone() }),
        vec![Event::LootRejected {
            item,
            reason: InventoryError::Full,
        }]
    );
    assert_eq!(query::inventory(&world).len(), INVENTORY_SLOTS);
}

#[test]
fn ticks_are_echoed_as_time_advanced() {
    let mut world = World::new();
    let dt = std::time::Duration::from_millis(250);
    assert_eq!(
        apply(&mut world, Command::Tick { dt }),
        vec![Event::TimeAdvanced { dt }]
    );
    assert_eq!(query::ticks(&world), 1);
}
