#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the dungeon crawler.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values for systems and
//! presentation layers to react to. Systems consume event streams, query
//! immutable snapshots, and respond exclusively with new command batches.

use std::{fmt, time::Duration};

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

mod error;

pub use error::{
    BattleError, GenerationError, InventoryError, MoveError, PlacementError, PlacementExhausted,
    ProgressionError,
};

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Welcome to the dungeon.";

/// Number of free cells that justify one enemy placement.
pub const FREE_CELLS_PER_ENEMY: u32 = 14;

/// Maximum number of loot items the player's inventory can hold.
pub const INVENTORY_SLOTS: usize = 30;

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Advances the simulation clock by the provided delta time.
    Tick {
        /// Duration of simulated time that elapsed since the previous tick.
        dt: Duration,
    },
    /// Generates a fresh room holding strictly more free cells than requested.
    BuildRoom {
        /// Minimum number of free cells the room must exceed.
        min_free_cells: u32,
    },
    /// Requests that an enemy occupy the provided free cell.
    PlaceEnemy {
        /// Interior cell that should host the enemy.
        cell: CellCoord,
    },
    /// Requests that the player move to the provided cell.
    MovePlayer {
        /// Destination cell.
        to: CellCoord,
    },
    /// Requests that the player advance a single cell in the given direction.
    StepPlayer {
        /// Direction of travel for the attempted step.
        direction: Direction,
    },
    /// Starts a battle between the player and the provided enemy.
    StartBattle {
        /// Enemy confronting the player for the duration of the encounter.
        enemy: Enemy,
    },
    /// Resolves the next turn of the active battle.
    ResolveTurn,
    /// Dismisses a concluded battle and unlocks player movement.
    DismissBattle,
    /// Appends a loot item to the player's inventory.
    AwardLoot {
        /// Item awarded by the loot collaborator.
        item: LootItem,
    },
    /// Advances to the next dungeon level once the exit has been reached.
    DescendLevel,
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Duration of simulated time that elapsed in the tick.
        dt: Duration,
    },
    /// Announces that a new room was generated and installed.
    RoomBuilt {
        /// Side length of the square grid.
        side: u32,
        /// Number of free cells carved into the room.
        cells: u32,
        /// Cell where the player starts.
        player: CellCoord,
        /// Cell that holds the room exit.
        exit: CellCoord,
        /// Number of chunks carved into the room.
        chunks: usize,
    },
    /// Reports that room generation failed and the previous room was kept.
    RoomRejected {
        /// Specific reason generation failed.
        reason: GenerationError,
    },
    /// Confirms that an enemy now occupies a cell.
    EnemyPlaced {
        /// Cell converted from free floor into an enemy cell.
        cell: CellCoord,
    },
    /// Reports that an enemy placement request was rejected.
    EnemyPlacementRejected {
        /// Cell provided in the placement request.
        cell: CellCoord,
        /// Specific reason the placement failed.
        reason: PlacementError,
    },
    /// Confirms that the player moved between two cells.
    PlayerMoved {
        /// Cell the player occupied before moving.
        from: CellCoord,
        /// Cell the player occupies after moving.
        to: CellCoord,
    },
    /// Lists the cells revealed around the player after a move.
    CellsRevealed {
        /// Newly revealed cells in row-major order.
        cells: Vec<CellCoord>,
    },
    /// Reports that a movement request was ignored.
    MoveRejected {
        /// Destination provided in the request.
        to: CellCoord,
        /// Specific reason the move failed.
        reason: MoveError,
    },
    /// Reports that a step request was ignored before a destination existed.
    StepRejected {
        /// Direction provided in the request.
        direction: Direction,
        /// Specific reason the step failed.
        reason: MoveError,
    },
    /// Announces that the player stepped onto an enemy cell.
    EnemyEncountered {
        /// Cell occupied by the enemy.
        cell: CellCoord,
    },
    /// Announces that the player stepped onto the exit.
    ExitReached {
        /// Level the exit belongs to.
        level: u32,
    },
    /// Announces that a battle started and movement is locked.
    BattleStarted {
        /// Name of the confronted enemy.
        enemy: String,
        /// Health the enemy starts the encounter with.
        hp: i32,
    },
    /// Reports that a battle request was ignored.
    BattleRejected {
        /// Specific reason the request failed.
        reason: BattleError,
    },
    /// Carries a single battle log entry for presentation.
    BattleLogged {
        /// Entry describing the resolved turn.
        entry: BattleLogEntry,
    },
    /// Semantic audio cue for an external audio collaborator.
    AudioCue {
        /// Cue that should be played.
        cue: Cue,
    },
    /// Announces that the battle reached a terminal state.
    BattleEnded {
        /// Terminal outcome of the encounter.
        outcome: BattleOutcome,
    },
    /// Win signal raised once an enemy is defeated; loot may be awarded here.
    EnemyDefeated {
        /// Cell the defeated enemy occupied.
        cell: CellCoord,
        /// Name of the defeated enemy.
        enemy: String,
    },
    /// Confirms that the concluded battle was dismissed and movement unlocked.
    BattleDismissed,
    /// Confirms that a loot item was appended to the inventory.
    LootAwarded {
        /// Item stored in the inventory.
        item: LootItem,
    },
    /// Reports that a loot item could not be stored.
    LootRejected {
        /// Item that was refused.
        item: LootItem,
        /// Specific reason the item was refused.
        reason: InventoryError,
    },
    /// Confirms that the dungeon advanced to a deeper level.
    LevelDescended {
        /// Level that became active.
        level: u32,
    },
    /// Reports that a descent request was ignored.
    DescentRejected {
        /// Specific reason the descent failed.
        reason: ProgressionError,
    },
}

/// Cardinal movement directions available to the player.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Movement toward decreasing row indices.
    North,
    /// Movement toward increasing column indices.
    East,
    /// Movement toward increasing row indices.
    South,
    /// Movement toward decreasing column indices.
    West,
}

/// Location of a single grid cell expressed as column and row coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    column: u32,
    row: u32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell (the `x` coordinate).
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the cell (the `y` coordinate).
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Computes the Manhattan distance between two cell coordinates.
    #[must_use]
    pub fn manhattan_distance(self, other: CellCoord) -> u32 {
        self.column().abs_diff(other.column()) + self.row().abs_diff(other.row())
    }

    /// Cell reached by stepping once in `direction`, if it does not underflow.
    #[must_use]
    pub fn step(self, direction: Direction) -> Option<CellCoord> {
        match direction {
            Direction::North => self.row.checked_sub(1).map(|row| Self::new(self.column, row)),
            Direction::East => self.column.checked_add(1).map(|column| Self::new(column, self.row)),
            Direction::South => self.row.checked_add(1).map(|row| Self::new(self.column, row)),
            Direction::West => self.column.checked_sub(1).map(|column| Self::new(column, self.row)),
        }
    }
}

bitflags! {
    /// Set of tags attached to a single grid cell.
    ///
    /// `FREE` and `ENEMY` never coexist: an enemy occupies floor space and
    /// removes its free tag. The player start and the finish keep `FREE`.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct CellTags: u8 {
        /// Traversable floor carved by a chunk or tunnel.
        const FREE   = 1 << 0;
        /// Floor occupied by an enemy awaiting an encounter.
        const ENEMY  = 1 << 1;
        /// Exit of the current room.
        const FINISH = 1 << 2;
        /// Cell currently occupied by the player.
        const PLAYER = 1 << 3;
    }
}

impl CellTags {
    /// Reports whether the player may stand on a cell with these tags.
    #[must_use]
    pub const fn is_traversable(self) -> bool {
        self.intersects(Self::FREE.union(Self::ENEMY).union(Self::FINISH).union(Self::PLAYER))
    }
}

/// Square matrix of tagged cells stored in row-major order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    side: u32,
    tags: Vec<CellTags>,
}

impl Grid {
    /// Creates a grid of solid rock with the provided side length.
    #[must_use]
    pub fn new(side: u32) -> Self {
        let len = usize::try_from(side).unwrap_or(0).pow(2);
        Self {
            side,
            tags: vec![CellTags::empty(); len],
        }
    }

    /// Number of cells along each edge of the grid.
    #[must_use]
    pub const fn side(&self) -> u32 {
        self.side
    }

    /// Reports whether the cell lies within the grid bounds.
    #[must_use]
    pub const fn contains(&self, cell: CellCoord) -> bool {
        cell.column < self.side && cell.row < self.side
    }

    /// Tags attached to the provided cell, if it lies within the grid.
    #[must_use]
    pub fn tags(&self, cell: CellCoord) -> Option<CellTags> {
        self.index(cell).map(|index| self.tags[index])
    }

    /// Adds `tags` to the cell. Out-of-bounds cells are ignored.
    pub fn insert(&mut self, cell: CellCoord, tags: CellTags) {
        if let Some(index) = self.index(cell) {
            self.tags[index].insert(tags);
        }
    }

    /// Removes `tags` from the cell. Out-of-bounds cells are ignored.
    pub fn remove(&mut self, cell: CellCoord, tags: CellTags) {
        if let Some(index) = self.index(cell) {
            self.tags[index].remove(tags);
        }
    }

    /// Reports whether the cell lies within the grid and carries every tag in `tags`.
    #[must_use]
    pub fn has(&self, cell: CellCoord, tags: CellTags) -> bool {
        self.tags(cell).is_some_and(|current| current.contains(tags))
    }

    /// Reports whether the player may stand on the cell.
    #[must_use]
    pub fn is_traversable(&self, cell: CellCoord) -> bool {
        self.tags(cell).is_some_and(CellTags::is_traversable)
    }

    /// Number of cells tagged [`CellTags::FREE`].
    #[must_use]
    pub fn free_cells(&self) -> u32 {
        let count = self
            .tags
            .iter()
            .filter(|tags| tags.contains(CellTags::FREE))
            .count();
        u32::try_from(count).unwrap_or(u32::MAX)
    }

    /// Iterates over every cell and its tags in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (CellCoord, CellTags)> + '_ {
        let side = self.side;
        self.tags.iter().enumerate().map(move |(index, tags)| {
            let index = u32::try_from(index).unwrap_or(u32::MAX);
            (CellCoord::new(index % side, index / side), *tags)
        })
    }

    /// Iterates over the cells carrying every tag in `tags`, in row-major order.
    pub fn cells_with(&self, tags: CellTags) -> impl Iterator<Item = CellCoord> + '_ {
        self.iter()
            .filter(move |(_, current)| current.contains(tags))
            .map(|(cell, _)| cell)
    }

    /// Orthogonal neighbours of `cell` that lie within the grid.
    pub fn neighbors(&self, cell: CellCoord) -> impl Iterator<Item = CellCoord> + '_ {
        [
            Direction::North,
            Direction::East,
            Direction::South,
            Direction::West,
        ]
        .into_iter()
        .filter_map(move |direction| cell.step(direction))
        .filter(move |neighbor| self.contains(*neighbor))
    }

    fn index(&self, cell: CellCoord) -> Option<usize> {
        if !self.contains(cell) {
            return None;
        }
        let side = usize::try_from(self.side).ok()?;
        let column = usize::try_from(cell.column).ok()?;
        let row = usize::try_from(cell.row).ok()?;
        row.checked_mul(side)?.checked_add(column)
    }
}

/// Rectangular block of carved floor space with odd dimensions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Chunk {
    origin: CellCoord,
    width: u32,
    height: u32,
}

impl Chunk {
    /// Creates a chunk anchored at its upper-left cell.
    #[must_use]
    pub const fn new(origin: CellCoord, width: u32, height: u32) -> Self {
        Self {
            origin,
            width,
            height,
        }
    }

    /// Upper-left cell of the chunk.
    #[must_use]
    pub const fn origin(&self) -> CellCoord {
        self.origin
    }

    /// Width of the chunk in cells.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Height of the chunk in cells.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Integer center of the chunk.
    #[must_use]
    pub const fn center(&self) -> CellCoord {
        CellCoord::new(
            self.origin.column + self.width / 2,
            self.origin.row + self.height / 2,
        )
    }

    /// Iterates over every cell covered by the chunk in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = CellCoord> {
        let Self {
            origin,
            width,
            height,
        } = *self;
        (origin.row..origin.row + height).flat_map(move |row| {
            (origin.column..origin.column + width).map(move |column| CellCoord::new(column, row))
        })
    }
}

/// Combat statistics feeding the player's damage formula.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerStats {
    /// Weapon damage rating.
    pub damage: u32,
    /// Strength scaling the weapon damage.
    pub strength: u32,
    /// Agility deciding whether hits become critical.
    pub agility: u32,
}

impl PlayerStats {
    /// Creates a new stat block.
    #[must_use]
    pub const fn new(damage: u32, strength: u32, agility: u32) -> Self {
        Self {
            damage,
            strength,
            agility,
        }
    }
}

impl Default for PlayerStats {
    fn default() -> Self {
        Self::new(20, 17, 5)
    }
}

/// Current and maximum health of a combatant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Vitals {
    hp: i32,
    max_hp: i32,
}

impl Vitals {
    /// Creates vitals at full health.
    #[must_use]
    pub const fn full(max_hp: i32) -> Self {
        Self { hp: max_hp, max_hp }
    }

    /// Current health, always within `[0, max_hp]`.
    #[must_use]
    pub const fn hp(&self) -> i32 {
        self.hp
    }

    /// Maximum health.
    #[must_use]
    pub const fn max_hp(&self) -> i32 {
        self.max_hp
    }

    /// Subtracts `damage` and reports whether health would have dropped below zero.
    ///
    /// Health is clamped to zero in that case. Reaching exactly zero is not a knockout.
    pub fn take_damage(&mut self, damage: i32) -> bool {
        let remaining = self.hp.saturating_sub(damage);
        if remaining < 0 {
            self.hp = 0;
            return true;
        }
        self.hp = remaining.min(self.max_hp);
        false
    }

    /// Restores health to its maximum.
    pub fn restore(&mut self) {
        self.hp = self.max_hp;
    }
}

/// Ephemeral opponent created for a single encounter.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Enemy {
    /// Display name of the enemy.
    pub name: String,
    /// Remaining health; may fall below zero on the finishing blow.
    pub hp: i32,
    /// Base damage dealt by each enemy attack.
    pub damage: i32,
}

impl Enemy {
    /// Creates a new enemy.
    #[must_use]
    pub fn new(name: impl Into<String>, hp: i32, damage: i32) -> Self {
        Self {
            name: name.into(),
            hp,
            damage,
        }
    }
}

/// Item handed out by the loot collaborator after a victory.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LootItem {
    /// Equipment slot the item occupies.
    pub slot: String,
    /// Display name of the item.
    pub name: String,
    /// Rarity label of the item.
    pub rarity: String,
    /// Item category.
    pub kind: String,
}

/// Phases of the battle turn state machine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BattlePhase {
    /// No battle is running.
    Idle,
    /// The player attacks next.
    PlayerTurn,
    /// The enemy attacks next.
    EnemyTurn,
    /// The enemy was defeated.
    Victory,
    /// The player was defeated.
    Defeat,
}

impl BattlePhase {
    /// Terminal outcome represented by the phase, if any.
    #[must_use]
    pub const fn outcome(self) -> Option<BattleOutcome> {
        match self {
            Self::Victory => Some(BattleOutcome::Victory),
            Self::Defeat => Some(BattleOutcome::Defeat),
            Self::Idle | Self::PlayerTurn | Self::EnemyTurn => None,
        }
    }
}

/// Terminal result of a battle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BattleOutcome {
    /// The player defeated the enemy.
    Victory,
    /// The enemy defeated the player.
    Defeat,
}

/// Semantic audio cue mapped to sound playback by an external collaborator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cue {
    /// A blow landed.
    Hit,
    /// An enemy was defeated.
    Victory,
}

/// Single line of the battle log.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BattleLogEntry {
    /// The encounter opened.
    Encounter {
        /// Name of the enemy.
        enemy: String,
        /// Health the enemy starts with.
        hp: i32,
    },
    /// The player struck without finishing the enemy.
    PlayerHit {
        /// Name of the enemy.
        enemy: String,
        /// Damage dealt.
        damage: i32,
        /// Whether the strike was critical.
        critical: bool,
    },
    /// The player landed the finishing blow.
    EnemyFinished {
        /// Name of the enemy.
        enemy: String,
        /// Damage dealt.
        damage: i32,
    },
    /// The enemy struck the player.
    EnemyHit {
        /// Name of the enemy.
        enemy: String,
        /// Damage dealt.
        damage: i32,
        /// Whether the enemy was enraged.
        enraged: bool,
    },
    /// The enemy's strike killed the player.
    PlayerDied {
        /// Name of the enemy.
        enemy: String,
        /// Damage dealt.
        damage: i32,
        /// Whether the enemy was enraged.
        enraged: bool,
    },
}

impl fmt::Display for BattleLogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Encounter { enemy, hp } => {
                write!(f, "A foul {enemy} with {hp}hp stands before you!")
            }
            Self::PlayerHit {
                enemy,
                damage,
                critical,
            } => {
                let verb = if *critical { "crit" } else { "hit" };
                write!(f, "You {verb} {enemy}: -{damage}hp")
            }
            Self::EnemyFinished { enemy, damage } => {
                write!(f, "You finish {enemy} with {damage}hp hit!")
            }
            Self::EnemyHit {
                enemy,
                damage,
                enraged,
            } => {
                let prefix = if *enraged { "Enraged " } else { "" };
                write!(f, "{prefix}{enemy} hits you: -{damage}hp")
            }
            Self::PlayerDied {
                enemy,
                damage,
                enraged,
            } => {
                let prefix = if *enraged { "Enraged " } else { "" };
                write!(f, "{prefix}{enemy} hits you: -{damage}hp\nYou died!")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{
        BattleLogEntry, CellCoord, CellTags, Chunk, Direction, Enemy, Grid, LootItem, Vitals,
    };
    use serde::{de::DeserializeOwned, Serialize};

    #[test]
    fn manhattan_distance_matches_expectation() {
        let origin = CellCoord::new(1, 1);
        let destination = CellCoord::new(4, 3);
        assert_eq!(origin.manhattan_distance(destination), 5);
        assert_eq!(destination.manhattan_distance(origin), 5);
    }

    #[test]
    fn step_refuses_to_underflow() {
        let origin = CellCoord::new(0, 0);
        assert_eq!(origin.step(Direction::North), None);
        assert_eq!(origin.step(Direction::West), None);
        assert_eq!(origin.step(Direction::South), Some(CellCoord::new(0, 1)));
        assert_eq!(origin.step(Direction::East), Some(CellCoord::new(1, 0)));
    }

    #[test]
    fn chunk_center_lies_inside_odd_rectangle() {
        let chunk = Chunk::new(CellCoord::new(2, 3), 5, 7);
        assert_eq!(chunk.center(), CellCoord::new(4, 6));
        assert_eq!(chunk.cells().count(), 35);
        assert!(chunk.cells().any(|cell| cell == chunk.center()));
    }

    #[test]
    fn grid_ignores_out_of_bounds_mutation() {
        let mut grid = Grid::new(4);
        grid.insert(CellCoord::new(4, 0), CellTags::FREE);
        grid.insert(CellCoord::new(1, 2), CellTags::FREE);
        assert_eq!(grid.free_cells(), 1);
        assert_eq!(grid.tags(CellCoord::new(9, 9)), None);
        assert_eq!(
            grid.cells_with(CellTags::FREE).collect::<Vec<_>>(),
            vec![CellCoord::new(1, 2)]
        );
    }

    #[test]
    fn enemy_cells_are_traversable_rock_is_not() {
        let mut grid = Grid::new(3);
        let cell = CellCoord::new(1, 1);
        grid.insert(cell, CellTags::FREE);
        grid.remove(cell, CellTags::FREE);
        grid.insert(cell, CellTags::ENEMY);
        assert!(grid.is_traversable(cell));
        assert!(!grid.is_traversable(CellCoord::new(0, 0)));
    }

    #[test]
    fn neighbors_stay_within_grid() {
        let grid = Grid::new(3);
        let corner: Vec<_> = grid.neighbors(CellCoord::new(0, 0)).collect();
        assert_eq!(corner, vec![CellCoord::new(1, 0), CellCoord::new(0, 1)]);
        assert_eq!(grid.neighbors(CellCoord::new(1, 1)).count(), 4);
    }

    #[test]
    fn vitals_clamp_below_zero_only() {
        let mut vitals = Vitals::full(10);
        assert!(!vitals.take_damage(10));
        assert_eq!(vitals.hp(), 0);
        assert!(vitals.take_damage(1));
        assert_eq!(vitals.hp(), 0);
        vitals.restore();
        assert_eq!(vitals.hp(), 10);
    }

    #[test]
    fn log_entries_render_like_the_battle_feed() {
        let hit = BattleLogEntry::EnemyHit {
            enemy: "rat".into(),
            damage: 14,
            enraged: true,
        };
        assert_eq!(hit.to_string(), "Enraged rat hits you: -14hp");

        let crit = BattleLogEntry::PlayerHit {
            enemy: "rat".into(),
            damage: 40,
            critical: true,
        };
        assert_eq!(crit.to_string(), "You crit rat: -40hp");
    }

    fn assert_round_trip<T>(value: &T)
    where
        T: Serialize + DeserializeOwned + PartialEq + std::fmt::Debug,
    {
        let bytes = bincode::serialize(value).expect("serialize");
        let restored: T = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(&restored, value);
    }

    #[test]
    fn grid_round_trips_through_bincode() {
        let mut grid = Grid::new(5);
        grid.insert(CellCoord::new(2, 2), CellTags::FREE | CellTags::PLAYER);
        grid.insert(CellCoord::new(3, 2), CellTags::ENEMY);
        assert_round_trip(&grid);
    }

    #[test]
    fn encounter_payloads_round_trip_through_bincode() {
        assert_round_trip(&Enemy::new("goblin", 30, 4));
        assert_round_trip(&LootItem {
            slot: "helmet".into(),
            name: "Rusty Cap".into(),
            rarity: "common".into(),
            kind: "armor".into(),
        });
    }
}
