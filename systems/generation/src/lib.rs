#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Procedural room generator that carves chunks of floor joined by tunnels.
//!
//! Rooms are built from randomly sized and placed rectangular chunks. Once the
//! carved floor exceeds the requested size, consecutive chunks are joined by
//! L-shaped tunnels in generation order, which links every chunk to the one
//! carved after it. The result is verified with a flood fill before it is
//! handed back to the caller.

use dungeon_crawler_core::{CellCoord, CellTags, Chunk, GenerationError, Grid};
use rand::Rng;

mod connectivity;

pub use connectivity::unreachable_free_cells;

/// Smallest width or height a chunk may have.
pub const MIN_CHUNK_SIDE: u32 = 3;
/// Largest width or height a chunk may have.
pub const MAX_CHUNK_SIDE: u32 = 7;
/// Smallest grid side that fits the largest chunk inside a one-cell border.
pub const MIN_GRID_SIDE: u32 = MAX_CHUNK_SIDE + 2;
/// Number of chunks carved before generation gives up.
pub const DEFAULT_MAX_CHUNKS: u32 = 512;

/// Configuration parameters required to generate a room.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
    side: u32,
    min_free_cells: u32,
    max_chunks: u32,
}

impl Config {
    /// Creates a configuration for a `side × side` grid that must carve more
    /// than `min_free_cells` free cells.
    #[must_use]
    pub const fn new(side: u32, min_free_cells: u32) -> Self {
        Self {
            side,
            min_free_cells,
            max_chunks: DEFAULT_MAX_CHUNKS,
        }
    }

    /// Overrides the number of chunks carved before generation gives up.
    #[must_use]
    pub const fn with_max_chunks(mut self, max_chunks: u32) -> Self {
        self.max_chunks = max_chunks;
        self
    }

    /// Side length of the generated grid.
    #[must_use]
    pub const fn side(&self) -> u32 {
        self.side
    }

    /// Free-cell count the room must exceed.
    #[must_use]
    pub const fn min_free_cells(&self) -> u32 {
        self.min_free_cells
    }

    /// Number of chunks carved before generation gives up.
    #[must_use]
    pub const fn max_chunks(&self) -> u32 {
        self.max_chunks
    }
}

/// Fully carved room ready to be installed into the world.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Layout {
    /// Tagged cells of the room.
    pub grid: Grid,
    /// Chunks in generation order.
    pub chunks: Vec<Chunk>,
    /// Cell where the player starts.
    pub player: CellCoord,
    /// Cell holding the exit.
    pub exit: CellCoord,
    /// Number of free cells once tunnels were carved.
    pub cells: u32,
}

/// Generates a connected room according to `config`.
///
/// # Errors
///
/// Returns [`GenerationError::GridTooSmall`] when the grid cannot hold the
/// largest chunk, [`GenerationError::Exhausted`] when `max_chunks` chunks do
/// not carve enough floor, and [`GenerationError::Disconnected`] if the flood
/// fill finds free cells the player cannot reach.
pub fn generate<R>(config: &Config, rng: &mut R) -> Result<Layout, GenerationError>
where
    R: Rng + ?Sized,
{
    let side = config.side();
    if side < MIN_GRID_SIDE {
        return Err(GenerationError::GridTooSmall {
            side,
            minimum: MIN_GRID_SIDE,
        });
    }

    let target = config.min_free_cells();
    let mut grid = Grid::new(side);
    let mut chunks: Vec<Chunk> = Vec::new();
    let mut attempts = 0;

    while grid.free_cells() <= target {
        if attempts >= config.max_chunks() {
            return Err(GenerationError::Exhausted {
                attempts,
                free_cells: grid.free_cells(),
                target,
            });
        }
        attempts += 1;

        let chunk = random_chunk(side, rng);
        for cell in chunk.cells() {
            grid.insert(cell, CellTags::FREE);
        }
        chunks.push(chunk);
    }

    let exhausted = GenerationError::Exhausted {
        attempts,
        free_cells: grid.free_cells(),
        target,
    };
    let player = first_free(&grid, Scan::Forward).ok_or(exhausted)?;
    let exit = first_free(&grid, Scan::Reverse).ok_or(exhausted)?;
    grid.insert(player, CellTags::PLAYER);
    grid.insert(exit, CellTags::FINISH);

    for pair in chunks.windows(2) {
        let from = pair[0].center();
        let to = pair[1].center();
        horizontal_tunnel(&mut grid, from.column(), to.column(), from.row());
        vertical_tunnel(&mut grid, from.row(), to.row(), to.column());
    }

    let unreachable = unreachable_free_cells(&grid, player);
    if unreachable > 0 {
        return Err(GenerationError::Disconnected { unreachable });
    }

    let cells = grid.free_cells();
    tracing::debug!(side, cells, chunks = chunks.len(), "room carved");

    Ok(Layout {
        grid,
        chunks,
        player,
        exit,
        cells,
    })
}

fn random_chunk<R>(side: u32, rng: &mut R) -> Chunk
where
    R: Rng + ?Sized,
{
    let width = odd_dimension(rng);
    let height = odd_dimension(rng);
    let column = rng.gen_range(1..=side - 1 - width);
    let row = rng.gen_range(1..=side - 1 - height);
    Chunk::new(CellCoord::new(column, row), width, height)
}

fn odd_dimension<R>(rng: &mut R) -> u32
where
    R: Rng + ?Sized,
{
    let value = rng.gen_range(MIN_CHUNK_SIDE..=MAX_CHUNK_SIDE);
    if value % 2 == 0 {
        value + 1
    } else {
        value
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Scan {
    Forward,
    Reverse,
}

/// Finds the first free cell scanning columns in the outer loop and rows in
/// the inner loop.
fn first_free(grid: &Grid, scan: Scan) -> Option<CellCoord> {
    let side = grid.side();
    let mut order = (0..side).flat_map(|column| (0..side).map(move |row| (column, row)));
    let is_free =
        |&(column, row): &(u32, u32)| grid.has(CellCoord::new(column, row), CellTags::FREE);
    let found = match scan {
        Scan::Forward => order.find(is_free),
        Scan::Reverse => order.collect::<Vec<_>>().into_iter().rev().find(is_free),
    };
    found.map(|(column, row)| CellCoord::new(column, row))
}

fn horizontal_tunnel(grid: &mut Grid, from: u32, to: u32, row: u32) {
    for column in from.min(to)..=from.max(to) {
        grid.insert(CellCoord::new(column, row), CellTags::FREE);
    }
}

fn vertical_tunnel(grid: &mut Grid, from: u32, to: u32, column: u32) {
    for row in from.min(to)..=from.max(to) {
        grid.insert(CellCoord::new(column, row), CellTags::FREE);
    }
}
