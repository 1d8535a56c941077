#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure bootstrap system that prepares what presentation layers render.

use dungeon_crawler_core::{CellCoord, CellTags, Vitals};
use dungeon_crawler_world::{query, World};

/// Immutable picture of the current room handed to presentation layers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderView {
    /// Side length of the room.
    pub side: u32,
    /// Every cell of the room with its tags and visibility, in row-major order.
    pub cells: Vec<RenderCell>,
    /// Cell occupied by the player.
    pub player: CellCoord,
    /// Cell holding the exit.
    pub exit: CellCoord,
    /// Current dungeon level.
    pub level: u32,
    /// Player health.
    pub vitals: Vitals,
}

/// Single cell of a [`RenderView`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RenderCell {
    /// Position of the cell.
    pub cell: CellCoord,
    /// Tags attached to the cell.
    pub tags: CellTags,
    /// Whether the player's movement revealed the cell.
    pub revealed: bool,
}

/// Produces data required to greet the player and draw the room.
#[derive(Debug, Default)]
pub struct Bootstrap;

impl Bootstrap {
    /// Derives the banner that should be shown when the experience starts.
    #[must_use]
    pub fn welcome_banner<'world>(&self, world: &'world World) -> &'world str {
        query::welcome_banner(world)
    }

    /// Captures the current room for rendering, if one was built.
    #[must_use]
    pub fn render_view(&self, world: &World) -> Option<RenderView> {
        let grid = query::grid(world)?;
        let player = query::player_position(world)?;
        let exit = query::exit(world)?.cell();
        let cells = grid
            .iter()
            .map(|(cell, tags)| RenderCell {
                cell,
                tags,
                revealed: query::is_revealed(world, cell),
            })
            .collect();

        Some(RenderView {
            side: grid.side(),
            cells,
            player,
            exit,
            level: query::level(world),
            vitals: query::player_vitals(world),
        })
    }
}
