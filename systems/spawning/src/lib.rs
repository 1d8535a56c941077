#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Enemy placement and the roster of foes met in encounters.
//!
//! [`Spawning`] reacts to freshly built rooms by emitting one
//! [`Command::PlaceEnemy`] per fourteen free cells. [`Roster`] creates the
//! ephemeral enemy an encounter is fought against.

use std::collections::HashSet;

use dungeon_crawler_core::{
    CellCoord, CellTags, Command, Enemy, Event, Grid, PlacementExhausted, FREE_CELLS_PER_ENEMY,
};
use rand::Rng;

/// Random draws allowed per enemy before its placement is skipped.
pub const DEFAULT_MAX_RETRIES: u32 = 10_000;

/// Distance kept between enemies and the grid edge.
const INTERIOR_MARGIN: u32 = 2;

const BESTIARY: [(&str, i32, i32); 5] = [
    ("rat", 30, 4),
    ("goblin", 45, 6),
    ("skeleton", 60, 7),
    ("orc", 80, 9),
    ("troll", 110, 12),
];

/// Configuration parameters required to construct the spawning system.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
    max_retries: u32,
}

impl Config {
    /// Creates a new configuration allowing `max_retries` draws per enemy.
    #[must_use]
    pub const fn new(max_retries: u32) -> Self {
        Self { max_retries }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_RETRIES)
    }
}

/// Summary of a placement pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlacementReport {
    /// Number of enemies the room called for.
    pub requested: u32,
    /// Number of placement commands emitted.
    pub placed: u32,
}

impl PlacementReport {
    /// Exhaustion report when fewer enemies were placed than requested.
    #[must_use]
    pub fn exhaustion(&self) -> Option<PlacementExhausted> {
        (self.placed < self.requested).then_some(PlacementExhausted {
            requested: self.requested,
            placed: self.placed,
        })
    }
}

/// Number of enemies a room with `cells` free cells holds.
#[must_use]
pub const fn enemy_count(cells: u32) -> u32 {
    cells / FREE_CELLS_PER_ENEMY
}

/// Pure system that scatters enemies across newly built rooms.
#[derive(Debug)]
pub struct Spawning {
    max_retries: u32,
    chosen: HashSet<CellCoord>,
}

impl Spawning {
    /// Creates a new spawning system using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            max_retries: config.max_retries,
            chosen: HashSet::new(),
        }
    }

    /// Consumes world events and the current grid to emit placement commands.
    ///
    /// Returns a report for every room announced in `events`. Placements are
    /// drawn uniformly from the interior band `[2, side - 2]` and only target
    /// plain free floor.
    pub fn handle<R>(
        &mut self,
        events: &[Event],
        grid: Option<&Grid>,
        rng: &mut R,
        out: &mut Vec<Command>,
    ) -> Option<PlacementReport>
    where
        R: Rng + ?Sized,
    {
        let cells = events.iter().rev().find_map(|event| match event {
            Event::RoomBuilt { cells, .. } => Some(*cells),
            _ => None,
        })?;
        let grid = grid?;

        let requested = enemy_count(cells);
        self.chosen.clear();

        for _ in 0..requested {
            if let Some(cell) = self.draw_cell(grid, rng) {
                let _ = self.chosen.insert(cell);
                out.push(Command::PlaceEnemy { cell });
            }
        }

        let report = PlacementReport {
            requested,
            placed: u32::try_from(self.chosen.len()).unwrap_or(u32::MAX),
        };
        if let Some(exhausted) = report.exhaustion() {
            tracing::warn!(%exhausted, retries = self.max_retries, "enemy placement exhausted");
        } else {
            tracing::debug!(placed = report.placed, "enemies scattered");
        }
        Some(report)
    }

    fn draw_cell<R>(&self, grid: &Grid, rng: &mut R) -> Option<CellCoord>
    where
        R: Rng + ?Sized,
    {
        let high = grid.side().checked_sub(INTERIOR_MARGIN)?;
        if high < INTERIOR_MARGIN {
            return None;
        }

        for _ in 0..self.max_retries {
            let cell = CellCoord::new(
                rng.gen_range(INTERIOR_MARGIN..=high),
                rng.gen_range(INTERIOR_MARGIN..=high),
            );
            if grid.tags(cell) == Some(CellTags::FREE) && !self.chosen.contains(&cell) {
                return Some(cell);
            }
        }
        None
    }
}

impl Default for Spawning {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

/// Bestiary of enemies encountered across the dungeon.
#[derive(Clone, Copy, Debug, Default)]
pub struct Roster;

impl Roster {
    /// Creates the enemy for an encounter on `level`.
    ///
    /// Deeper levels add a quarter of the base health and one point of damage
    /// per level below the first.
    pub fn enemy_for<R>(&self, level: u32, rng: &mut R) -> Enemy
    where
        R: Rng + ?Sized,
    {
        let (name, hp, damage) = BESTIARY[rng.gen_range(0..BESTIARY.len())];
        let depth = i32::try_from(level.saturating_sub(1)).unwrap_or(i32::MAX);
        Enemy::new(
            name,
            hp.saturating_add(hp.saturating_mul(depth) / 4),
            damage.saturating_add(depth),
        )
    }
}
