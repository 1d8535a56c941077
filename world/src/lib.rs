#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative dungeon state.
//!
//! The [`World`] owns the current room, the player, the level counter, and the
//! battle session. It is only ever mutated through [`apply`], which executes a
//! [`Command`] and reports what happened as [`Event`] values. Read access goes
//! through the [`query`] module.

use dungeon_crawler_core::{
    BattleError, BattleOutcome, CellCoord, CellTags, Chunk, Command, Enemy, Event,
    GenerationError, Grid, InventoryError, LootItem, MoveError, PlacementError, PlayerStats,
    ProgressionError, Vitals, INVENTORY_SLOTS, WELCOME_BANNER,
};
use dungeon_crawler_system_battle::Battle;
use dungeon_crawler_system_generation::{self as generation, Layout, DEFAULT_MAX_CHUNKS};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

mod navigation;

use navigation::NavigationField;

const DEFAULT_SIDE: u32 = 20;
const DEFAULT_SEED: u64 = 0x42f0_e1eb_d4a5_3c21;
const DEFAULT_MAX_HP: i32 = 100;

/// Settings applied when a world is created.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WorldConfig {
    /// Side length of every generated room.
    pub side: u32,
    /// Seed for the world's random number generator.
    pub seed: u64,
    /// Number of chunks carved before room generation gives up.
    pub max_chunks: u32,
    /// Maximum health of the player.
    pub player_max_hp: i32,
    /// Combat statistics of the player.
    pub player_stats: PlayerStats,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            side: DEFAULT_SIDE,
            seed: DEFAULT_SEED,
            max_chunks: DEFAULT_MAX_CHUNKS,
            player_max_hp: DEFAULT_MAX_HP,
            player_stats: PlayerStats::default(),
        }
    }
}

/// Exit of the current room.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Exit {
    cell: CellCoord,
    reached: bool,
}

impl Exit {
    /// Cell holding the exit.
    #[must_use]
    pub const fn cell(&self) -> CellCoord {
        self.cell
    }

    /// Reports whether the player stepped onto the exit since the room was built.
    #[must_use]
    pub const fn reached(&self) -> bool {
        self.reached
    }
}

#[derive(Debug)]
struct Player {
    vitals: Vitals,
    stats: PlayerStats,
    position: Option<CellCoord>,
    inventory: Vec<LootItem>,
}

#[derive(Debug)]
struct Room {
    grid: Grid,
    chunks: Vec<Chunk>,
    cells: u32,
    exit: Exit,
    revealed: Vec<bool>,
}

impl Room {
    fn from_layout(layout: Layout) -> Self {
        let side = usize::try_from(layout.grid.side()).unwrap_or(0);
        Self {
            grid: layout.grid,
            chunks: layout.chunks,
            cells: layout.cells,
            exit: Exit {
                cell: layout.exit,
                reached: false,
            },
            revealed: vec![false; side * side],
        }
    }

    /// Marks the 3×3 neighbourhood of `center` as revealed and returns the
    /// cells that were hidden before, in row-major order.
    fn reveal_around(&mut self, center: CellCoord) -> Vec<CellCoord> {
        let side = self.grid.side();
        let mut revealed = Vec::new();
        for row in center.row().saturating_sub(1)..=center.row().saturating_add(1) {
            for column in center.column().saturating_sub(1)..=center.column().saturating_add(1) {
                let cell = CellCoord::new(column, row);
                if !self.grid.contains(cell) {
                    continue;
                }
                let Some(index) = reveal_index(side, cell) else {
                    continue;
                };
                if !self.revealed[index] {
                    self.revealed[index] = true;
                    revealed.push(cell);
                }
            }
        }
        revealed
    }

    fn is_revealed(&self, cell: CellCoord) -> bool {
        if !self.grid.contains(cell) {
            return false;
        }
        reveal_index(self.grid.side(), cell)
            .and_then(|index| self.revealed.get(index).copied())
            .unwrap_or(false)
    }

    fn is_interior(&self, cell: CellCoord) -> bool {
        let low = 2;
        let high = self.grid.side().saturating_sub(2);
        (low..=high).contains(&cell.column()) && (low..=high).contains(&cell.row())
    }
}

fn reveal_index(side: u32, cell: CellCoord) -> Option<usize> {
    let side = usize::try_from(side).ok()?;
    let column = usize::try_from(cell.column()).ok()?;
    let row = usize::try_from(cell.row()).ok()?;
    row.checked_mul(side)?.checked_add(column)
}

#[derive(Debug)]
struct ActiveBattle {
    battle: Battle,
    cell: CellCoord,
}

/// Represents the authoritative dungeon state.
#[derive(Debug)]
pub struct World {
    banner: &'static str,
    config: WorldConfig,
    room: Option<Room>,
    player: Player,
    level: u32,
    battle: Option<ActiveBattle>,
    can_move: bool,
    awaiting_dismissal: bool,
    tick_index: u64,
    rng: ChaCha8Rng,
}

impl World {
    /// Creates a world using the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(WorldConfig::default())
    }

    /// Creates a world from the provided configuration. No room exists until
    /// a [`Command::BuildRoom`] is applied.
    #[must_use]
    pub fn with_config(config: WorldConfig) -> Self {
        Self {
            banner: WELCOME_BANNER,
            room: None,
            player: Player {
                vitals: Vitals::full(config.player_max_hp),
                stats: config.player_stats,
                position: None,
                inventory: Vec::new(),
            },
            level: 1,
            battle: None,
            can_move: true,
            awaiting_dismissal: false,
            tick_index: 0,
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            config,
        }
    }

    fn battle_pending(&self) -> bool {
        self.battle.is_some() || self.awaiting_dismissal
    }

    fn build_room(&mut self, min_free_cells: u32, out_events: &mut Vec<Event>) {
        if self.battle_pending() {
            out_events.push(Event::RoomRejected {
                reason: GenerationError::BattleInProgress,
            });
            return;
        }

        let config = generation::Config::new(self.config.side, min_free_cells)
            .with_max_chunks(self.config.max_chunks);
        let layout = match generation::generate(&config, &mut self.rng) {
            Ok(layout) => layout,
            Err(reason) => {
                tracing::warn!(%reason, level = self.level, "room generation failed");
                out_events.push(Event::RoomRejected { reason });
                return;
            }
        };

        let player = layout.player;
        let exit = layout.exit;
        let cells = layout.cells;
        let chunks = layout.chunks.len();
        let mut room = Room::from_layout(layout);
        let revealed = room.reveal_around(player);

        self.room = Some(room);
        self.player.position = Some(player);
        self.battle = None;
        self.can_move = true;
        self.awaiting_dismissal = false;

        tracing::info!(level = self.level, cells, chunks, "room built");
        out_events.push(Event::RoomBuilt {
            side: self.config.side,
            cells,
            player,
            exit,
            chunks,
        });
        out_events.push(Event::CellsRevealed { cells: revealed });
    }

    fn place_enemy(&mut self, cell: CellCoord, out_events: &mut Vec<Event>) {
        let Some(room) = self.room.as_mut() else {
            out_events.push(Event::EnemyPlacementRejected {
                cell,
                reason: PlacementError::NoRoom,
            });
            return;
        };

        if !room.is_interior(cell) {
            out_events.push(Event::EnemyPlacementRejected {
                cell,
                reason: PlacementError::OutsideInterior,
            });
            return;
        }

        if room.grid.tags(cell) != Some(CellTags::FREE) {
            out_events.push(Event::EnemyPlacementRejected {
                cell,
                reason: PlacementError::NotFree,
            });
            return;
        }

        room.grid.remove(cell, CellTags::FREE);
        room.grid.insert(cell, CellTags::ENEMY);
        out_events.push(Event::EnemyPlaced { cell });
    }

    fn move_player(&mut self, to: CellCoord, out_events: &mut Vec<Event>) {
        if let Err(reason) = self.validate_move(to) {
            out_events.push(Event::MoveRejected { to, reason });
            return;
        }
        let (Some(room), Some(from)) = (self.room.as_mut(), self.player.position) else {
            return;
        };

        room.grid.remove(from, CellTags::PLAYER);
        room.grid.insert(to, CellTags::PLAYER);
        self.player.position = Some(to);
        out_events.push(Event::PlayerMoved { from, to });

        let revealed = room.reveal_around(to);
        if !revealed.is_empty() {
            out_events.push(Event::CellsRevealed { cells: revealed });
        }

        if room.grid.has(to, CellTags::ENEMY) {
            out_events.push(Event::EnemyEncountered { cell: to });
        }

        if room.grid.has(to, CellTags::FINISH) {
            room.exit.reached = true;
            out_events.push(Event::ExitReached { level: self.level });
        }
    }

    fn validate_move(&self, to: CellCoord) -> Result<(), MoveError> {
        let room = self.room.as_ref().ok_or(MoveError::NoRoom)?;
        if !self.can_move {
            return Err(MoveError::MovementLocked);
        }
        if !room.grid.contains(to) {
            return Err(MoveError::OutOfBounds);
        }
        if !room.grid.is_traversable(to) {
            return Err(MoveError::Blocked);
        }
        Ok(())
    }

    fn start_battle(&mut self, enemy: Enemy, out_events: &mut Vec<Event>) {
        let (Some(room), Some(cell)) = (self.room.as_ref(), self.player.position) else {
            out_events.push(Event::BattleRejected {
                reason: BattleError::NoRoom,
            });
            return;
        };

        if self.battle_pending() {
            out_events.push(Event::BattleRejected {
                reason: BattleError::AlreadyInProgress,
            });
            return;
        }

        if !room.grid.has(cell, CellTags::ENEMY) {
            out_events.push(Event::BattleRejected {
                reason: BattleError::NoEnemyHere,
            });
            return;
        }

        let name = enemy.name.clone();
        let hp = enemy.hp;
        let (battle, opening) = Battle::start(enemy);
        self.battle = Some(ActiveBattle { battle, cell });
        self.can_move = false;

        tracing::info!(enemy = %name, hp, "battle started");
        out_events.push(Event::BattleStarted { enemy: name, hp });
        out_events.push(Event::BattleLogged { entry: opening });
    }

    fn resolve_turn(&mut self, out_events: &mut Vec<Event>) {
        let Some(active) = self.battle.as_mut() else {
            return;
        };

        let report = match active
            .battle
            .step(self.player.stats, &mut self.player.vitals, &mut self.rng)
        {
            Ok(report) => report,
            Err(reason) => {
                tracing::debug!(%reason, "ignoring turn for a finished battle");
                return;
            }
        };

        out_events.push(Event::BattleLogged {
            entry: report.entry,
        });
        out_events.push(Event::AudioCue { cue: report.cue });

        if let Some(outcome) = report.phase.outcome() {
            self.conclude_battle(outcome, out_events);
        }
    }

    fn conclude_battle(&mut self, outcome: BattleOutcome, out_events: &mut Vec<Event>) {
        let Some(active) = self.battle.take() else {
            return;
        };

        self.player.vitals.restore();
        self.awaiting_dismissal = true;
        tracing::info!(?outcome, turns = active.battle.turn_count(), "battle ended");
        out_events.push(Event::BattleEnded { outcome });

        if outcome == BattleOutcome::Victory {
            if let Some(room) = self.room.as_mut() {
                room.grid.remove(active.cell, CellTags::ENEMY);
                room.grid.insert(active.cell, CellTags::FREE);
            }
            out_events.push(Event::EnemyDefeated {
                cell: active.cell,
                enemy: active.battle.enemy().name.clone(),
            });
        }
    }

    fn dismiss_battle(&mut self, out_events: &mut Vec<Event>) {
        if !self.awaiting_dismissal {
            return;
        }
        self.awaiting_dismissal = false;
        self.can_move = true;
        out_events.push(Event::BattleDismissed);
    }

    fn award_loot(&mut self, item: LootItem, out_events: &mut Vec<Event>) {
        if self.player.inventory.len() >= INVENTORY_SLOTS {
            out_events.push(Event::LootRejected {
                item,
                reason: InventoryError::Full,
            });
            return;
        }
        self.player.inventory.push(item.clone());
        out_events.push(Event::LootAwarded { item });
    }

    fn descend(&mut self, out_events: &mut Vec<Event>) {
        if self.battle_pending() {
            out_events.push(Event::DescentRejected {
                reason: ProgressionError::BattleInProgress,
            });
            return;
        }

        let Some(room) = self.room.as_mut().filter(|room| room.exit.reached) else {
            out_events.push(Event::DescentRejected {
                reason: ProgressionError::ExitNotReached,
            });
            return;
        };

        room.exit.reached = false;
        self.level = self.level.saturating_add(1);
        tracing::info!(level = self.level, "descended");
        out_events.push(Event::LevelDescended { level: self.level });
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::Tick { dt } => {
            world.tick_index = world.tick_index.saturating_add(1);
            out_events.push(Event::TimeAdvanced { dt });
        }
        Command::BuildRoom { min_free_cells } => world.build_room(min_free_cells, out_events),
        Command::PlaceEnemy { cell } => world.place_enemy(cell, out_events),
        Command::MovePlayer { to } => world.move_player(to, out_events),
        Command::StepPlayer { direction } => {
            let Some(from) = world.player.position else {
                out_events.push(Event::StepRejected {
                    direction,
                    reason: MoveError::NoRoom,
                });
                return;
            };
            match from.step(direction) {
                Some(to) => world.move_player(to, out_events),
                None => out_events.push(Event::StepRejected {
                    direction,
                    reason: MoveError::OutOfBounds,
                }),
            }
        }
        Command::StartBattle { enemy } => world.start_battle(enemy, out_events),
        Command::ResolveTurn => world.resolve_turn(out_events),
        Command::DismissBattle => world.dismiss_battle(out_events),
        Command::AwardLoot { item } => world.award_loot(item, out_events),
        Command::DescendLevel => world.descend(out_events),
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use dungeon_crawler_core::{
        BattlePhase, CellCoord, CellTags, Chunk, Enemy, Grid, LootItem, PlayerStats, Vitals,
    };

    use super::{Exit, NavigationField, World};

    /// Retrieves the welcome banner that adapters may display to players.
    #[must_use]
    pub fn welcome_banner(world: &World) -> &'static str {
        world.banner
    }

    /// Side length of generated rooms.
    #[must_use]
    pub fn side(world: &World) -> u32 {
        world.config.side
    }

    /// Provides read-only access to the current room's grid, if one was built.
    #[must_use]
    pub fn grid(world: &World) -> Option<&Grid> {
        world.room.as_ref().map(|room| &room.grid)
    }

    /// Chunks of the current room in generation order.
    #[must_use]
    pub fn chunks(world: &World) -> &[Chunk] {
        world.room.as_ref().map_or(&[], |room| room.chunks.as_slice())
    }

    /// Number of free cells carved when the current room was built.
    #[must_use]
    pub fn cells(world: &World) -> u32 {
        world.room.as_ref().map_or(0, |room| room.cells)
    }

    /// Exit of the current room.
    #[must_use]
    pub fn exit(world: &World) -> Option<Exit> {
        world.room.as_ref().map(|room| room.exit)
    }

    /// Number of ticks applied since the world was created.
    #[must_use]
    pub fn ticks(world: &World) -> u64 {
        world.tick_index
    }

    /// Current dungeon level, starting at one.
    #[must_use]
    pub fn level(world: &World) -> u32 {
        world.level
    }

    /// Cell occupied by the player, if a room was built.
    #[must_use]
    pub fn player_position(world: &World) -> Option<CellCoord> {
        world.player.position
    }

    /// Current and maximum health of the player.
    #[must_use]
    pub fn player_vitals(world: &World) -> Vitals {
        world.player.vitals
    }

    /// Combat statistics of the player.
    #[must_use]
    pub fn player_stats(world: &World) -> PlayerStats {
        world.player.stats
    }

    /// Items collected by the player.
    #[must_use]
    pub fn inventory(world: &World) -> &[LootItem] {
        &world.player.inventory
    }

    /// Reports whether the cell was revealed by the player's movement.
    #[must_use]
    pub fn is_revealed(world: &World, cell: CellCoord) -> bool {
        world
            .room
            .as_ref()
            .is_some_and(|room| room.is_revealed(cell))
    }

    /// Cells currently occupied by enemies, in row-major order.
    #[must_use]
    pub fn enemy_cells(world: &World) -> Vec<CellCoord> {
        grid(world).map_or_else(Vec::new, |grid| grid.cells_with(CellTags::ENEMY).collect())
    }

    /// Enemy of the running battle, if any.
    #[must_use]
    pub fn active_enemy(world: &World) -> Option<&Enemy> {
        world.battle.as_ref().map(|active| active.battle.enemy())
    }

    /// Captures the transient battle session state.
    #[must_use]
    pub fn battle_session(world: &World) -> BattleSession {
        match world.battle.as_ref() {
            Some(active) => BattleSession {
                phase: active.battle.phase(),
                turn_count: active.battle.turn_count(),
                player_turn: active.battle.player_turn(),
                can_move: world.can_move,
            },
            None => BattleSession {
                phase: BattlePhase::Idle,
                turn_count: 0,
                player_turn: false,
                can_move: world.can_move,
            },
        }
    }

    /// Shortest walk from the player to `goal`, excluding the starting cell.
    ///
    /// Enemy cells count as traversable, so the route may lead into an
    /// encounter. Returns `None` when no room exists or the goal is unreachable.
    #[must_use]
    pub fn route_to(world: &World, goal: CellCoord) -> Option<Vec<CellCoord>> {
        let room = world.room.as_ref()?;
        let start = world.player.position?;
        let mut field = NavigationField::default();
        field.rebuild_with(&room.grid, &[goal], |cell| !room.grid.is_traversable(cell));
        field.descend_from(&room.grid, start)
    }

    /// Snapshot of the transient battle session.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct BattleSession {
        /// Phase of the running battle, or [`BattlePhase::Idle`].
        pub phase: BattlePhase,
        /// Number of enemy attacks resolved so far.
        pub turn_count: u32,
        /// Whether the player attacks next.
        pub player_turn: bool,
        /// Whether the player may move.
        pub can_move: bool,
    }
}
