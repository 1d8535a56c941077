//! Breadth-first distance field used to route the player across a room.

use std::collections::VecDeque;

use dungeon_crawler_core::{CellCoord, Grid};

/// Dense Manhattan-distance grid seeded from one or more goal cells.
///
/// Distances default to `u16::MAX` for unreachable cells so callers can
/// distinguish rock from traversable floor.
#[derive(Clone, Debug, Default)]
pub(crate) struct NavigationField {
    side: u32,
    distances: Vec<u16>,
}

impl NavigationField {
    /// Rebuilds the distances using a reverse breadth-first search from `goals`.
    pub(crate) fn rebuild_with<F>(&mut self, grid: &Grid, goals: &[CellCoord], mut is_blocked: F)
    where
        F: FnMut(CellCoord) -> bool,
    {
        let side = grid.side();
        let side_usize = usize::try_from(side).unwrap_or(0);
        let cell_count = side_usize.checked_mul(side_usize).unwrap_or(0);

        self.side = side;
        if self.distances.len() != cell_count {
            self.distances = vec![u16::MAX; cell_count];
        } else {
            self.distances.fill(u16::MAX);
        }

        let mut queue = VecDeque::new();

        for &goal in goals {
            if !grid.contains(goal) || is_blocked(goal) {
                continue;
            }

            if let Some(index) = index(side_usize, goal) {
                if self.distances[index] == 0 {
                    continue;
                }

                self.distances[index] = 0;
                queue.push_back(goal);
            }
        }

        while let Some(cell) = queue.pop_front() {
            let Some(current_index) = index(side_usize, cell) else {
                continue;
            };
            let current_distance = self.distances[current_index];

            if current_distance >= u16::MAX.saturating_sub(1) {
                continue;
            }

            let next_distance = current_distance + 1;

            for neighbor in grid.neighbors(cell) {
                if is_blocked(neighbor) {
                    continue;
                }

                let Some(neighbor_index) = index(side_usize, neighbor) else {
                    continue;
                };

                if self.distances[neighbor_index] <= next_distance {
                    continue;
                }

                self.distances[neighbor_index] = next_distance;
                queue.push_back(neighbor);
            }
        }
    }

    /// Distance captured for the provided cell, if it lies within the field.
    #[must_use]
    pub(crate) fn distance(&self, cell: CellCoord) -> Option<u16> {
        if cell.column() >= self.side || cell.row() >= self.side {
            return None;
        }

        let side = usize::try_from(self.side).ok()?;
        index(side, cell).and_then(|offset| self.distances.get(offset).copied())
    }

    /// Walks downhill from `start` until a goal is reached.
    ///
    /// The returned route excludes `start` and ends on a goal cell. Returns
    /// `None` when `start` cannot reach any goal.
    #[must_use]
    pub(crate) fn descend_from(&self, grid: &Grid, start: CellCoord) -> Option<Vec<CellCoord>> {
        let mut distance = self.distance(start).filter(|distance| *distance != u16::MAX)?;
        let mut cell = start;
        let mut route = Vec::with_capacity(usize::from(distance));

        while distance > 0 {
            let next = grid
                .neighbors(cell)
                .find(|neighbor| self.distance(*neighbor) == Some(distance - 1))?;
            route.push(next);
            cell = next;
            distance -= 1;
        }

        Some(route)
    }
}

fn index(side: usize, cell: CellCoord) -> Option<usize> {
    let column = usize::try_from(cell.column()).ok()?;
    let row = usize::try_from(cell.row()).ok()?;
    row.checked_mul(side)?.checked_add(column)
}
