//! Text rendering of the room for terminal output.

use std::fmt::Write as _;

use dungeon_crawler_core::CellTags;
use dungeon_crawler_system_bootstrap::{RenderCell, RenderView};

/// Draws the room as one line of glyphs per row followed by a status line.
///
/// Revealed floor is drawn as `,` so the explored area stands out from the
/// rest of the floor.
pub(crate) fn ascii_map(view: &RenderView) -> String {
    let side = usize::try_from(view.side).unwrap_or(0);
    let mut map = String::with_capacity(side.saturating_add(1).saturating_mul(side) + 64);

    for row in view.cells.chunks(side.max(1)) {
        for cell in row {
            map.push(glyph(cell));
        }
        map.push('\n');
    }

    let _ = write!(
        map,
        "level {} | hp {}/{} | player ({}, {}) | exit ({}, {})",
        view.level,
        view.vitals.hp(),
        view.vitals.max_hp(),
        view.player.column(),
        view.player.row(),
        view.exit.column(),
        view.exit.row(),
    );
    map
}

fn glyph(cell: &RenderCell) -> char {
    let tags = cell.tags;
    if tags.contains(CellTags::PLAYER) {
        '@'
    } else if tags.contains(CellTags::ENEMY) {
        'e'
    } else if tags.contains(CellTags::FINISH) {
        '>'
    } else if tags.contains(CellTags::FREE) {
        if cell.revealed {
            ','
        } else {
            '.'
        }
    } else {
        '#'
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dungeon_crawler_core::{CellCoord, Vitals};

    fn cell(column: u32, row: u32, tags: CellTags, revealed: bool) -> RenderCell {
        RenderCell {
            cell: CellCoord::new(column, row),
            tags,
            revealed,
        }
    }

    #[test]
    fn draws_rows_and_status() {
        let view = RenderView {
            side: 2,
            cells: vec![
                cell(0, 0, CellTags::FREE | CellTags::PLAYER, true),
                cell(1, 0, CellTags::FREE, true),
                cell(0, 1, CellTags::ENEMY, false),
                cell(1, 1, CellTags::FREE | CellTags::FINISH, false),
            ],
            player: CellCoord::new(0, 0),
            exit: CellCoord::new(1, 1),
            level: 2,
            vitals: Vitals::full(100),
        };

        let map = ascii_map(&view);
        let mut lines = map.lines();
        assert_eq!(lines.next(), Some("@,"));
        assert_eq!(lines.next(), Some("e>"));
        assert_eq!(
            lines.next(),
            Some("level 2 | hp 100/100 | player (0, 0) | exit (1, 1)")
        );
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn walls_and_unexplored_floor_differ() {
        assert_eq!(glyph(&cell(0, 0, CellTags::empty(), false)), '#');
        assert_eq!(glyph(&cell(0, 0, CellTags::FREE, false)), '.');
    }
}
