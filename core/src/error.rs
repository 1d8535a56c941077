//! Rejection reasons reported by the world and its systems.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Reasons room generation may fail.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Error, Serialize, Deserialize)]
pub enum GenerationError {
    /// The grid cannot hold the largest chunk inside its border.
    #[error("grid side {side} is too small, rooms need a side of at least {minimum}")]
    GridTooSmall {
        /// Side length that was requested.
        side: u32,
        /// Smallest side length that fits every chunk.
        minimum: u32,
    },
    /// Chunk generation ran out of attempts before carving enough floor.
    #[error(
        "generation exhausted after {attempts} chunks with {free_cells} free cells, \
         needed more than {target}"
    )]
    Exhausted {
        /// Number of chunks carved before giving up.
        attempts: u32,
        /// Free cells carved when generation stopped.
        free_cells: u32,
        /// Free-cell count the room had to exceed.
        target: u32,
    },
    /// Some free cells cannot be reached from the player start.
    #[error("{unreachable} free cells are unreachable from the player start")]
    Disconnected {
        /// Number of unreachable free cells.
        unreachable: u32,
    },
    /// A battle is running or awaits dismissal, so the room cannot be replaced.
    #[error("a battle is in progress")]
    BattleInProgress,
}

/// Reasons an enemy placement request may be rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Error, Serialize, Deserialize)]
pub enum PlacementError {
    /// No room has been built yet.
    #[error("no room has been built")]
    NoRoom,
    /// The cell lies outside the interior band reserved for enemies.
    #[error("cell lies outside the room interior")]
    OutsideInterior,
    /// The cell is not plain free floor.
    #[error("cell is not free floor")]
    NotFree,
}

/// Report raised when placement retries run dry before every enemy found a cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Error, Serialize, Deserialize)]
#[error("placed {placed} of {requested} enemies before running out of retries")]
pub struct PlacementExhausted {
    /// Number of enemies the room called for.
    pub requested: u32,
    /// Number of enemies that found a cell.
    pub placed: u32,
}

/// Reasons a movement request may be ignored.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Error, Serialize, Deserialize)]
pub enum MoveError {
    /// No room has been built yet.
    #[error("no room has been built")]
    NoRoom,
    /// The destination lies outside the grid.
    #[error("destination lies outside the grid")]
    OutOfBounds,
    /// The destination is solid rock.
    #[error("destination is not traversable")]
    Blocked,
    /// Movement is locked while a battle runs or awaits dismissal.
    #[error("movement is locked during battle")]
    MovementLocked,
}

/// Reasons a battle request may be ignored.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Error, Serialize, Deserialize)]
pub enum BattleError {
    /// A battle is already running or awaiting dismissal.
    #[error("a battle is already in progress")]
    AlreadyInProgress,
    /// No room has been built yet.
    #[error("no room has been built")]
    NoRoom,
    /// No battle is running.
    #[error("no battle is in progress")]
    NotInBattle,
    /// The player is not standing on an enemy cell.
    #[error("no enemy occupies the player's cell")]
    NoEnemyHere,
}

/// Reasons a loot item may be refused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Error, Serialize, Deserialize)]
pub enum InventoryError {
    /// Every inventory slot is taken.
    #[error("inventory is full")]
    Full,
}

/// Reasons a level descent may be refused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Error, Serialize, Deserialize)]
pub enum ProgressionError {
    /// The player has not reached the exit of the current room.
    #[error("the exit has not been reached")]
    ExitNotReached,
    /// A battle is running or awaits dismissal.
    #[error("a battle is in progress")]
    BattleInProgress,
}
