//! Flood fill used to verify that every carved cell can be reached.

use std::collections::VecDeque;

use dungeon_crawler_core::{CellCoord, CellTags, Grid};

/// Counts the free cells that cannot be reached from `start` by orthogonal
/// steps over traversable cells.
///
/// A `start` outside the grid or on rock reaches nothing, so every free cell
/// is reported as unreachable.
#[must_use]
pub fn unreachable_free_cells(grid: &Grid, start: CellCoord) -> u32 {
    let side = usize::try_from(grid.side()).unwrap_or(0);
    let mut visited = vec![false; side * side];
    let mut queue = VecDeque::new();

    if grid.is_traversable(start) {
        if let Some(index) = index(side, start) {
            visited[index] = true;
            queue.push_back(start);
        }
    }

    while let Some(cell) = queue.pop_front() {
        for neighbor in grid.neighbors(cell) {
            if !grid.is_traversable(neighbor) {
                continue;
            }

            let Some(neighbor_index) = index(side, neighbor) else {
                continue;
            };

            if visited[neighbor_index] {
                continue;
            }

            visited[neighbor_index] = true;
            queue.push_back(neighbor);
        }
    }

    let unreachable = grid
        .cells_with(CellTags::FREE)
        .filter(|cell| index(side, *cell).is_some_and(|offset| !visited[offset]))
        .count();
    u32::try_from(unreachable).unwrap_or(u32::MAX)
}

fn index(side: usize, cell: CellCoord) -> Option<usize> {
    let column = usize::try_from(cell.column()).ok()?;
    let row = usize::try_from(cell.row()).ok()?;
    row.checked_mul(side)?.checked_add(column)
}
